//! Integration tests for RosterService using wiremock

mod common;

use jiaxiao::error::{Error, NotFoundError, ValidationError};
use jiaxiao::models::Student;
use jiaxiao::roster::{RosterService, SortField};
use jiaxiao::store::{RemoteStoreClient, StoreConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(uri: &str) -> RosterService {
    let store =
        RemoteStoreClient::new(StoreConfig::new(uri).with_timeout(Duration::from_secs(2))).unwrap();
    RosterService::new(store)
}

fn roster_json() -> serde_json::Value {
    json!([
        {"id": "s-1", "idCard": "110101199001011234", "name": "张三", "subject2Pass": true,
         "subject3Status": "已合格", "vehicleType": "C1"},
        {"id": "s-2", "idCard": "待录入", "name": "李四", "subject2Pass": false,
         "subject3Status": "练习中", "vehicleType": "C2"},
        {"id": "s-3", "idCard": "440301200001011230", "name": "王五", "subject2Pass": false,
         "subject3Status": "需补考", "vehicleType": "C1"}
    ])
}

async fn mount_roster(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster_json()))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_list_unfiltered() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    let students = service(&mock_server.uri()).list(None).await.unwrap();
    assert_eq!(students.len(), 3);
}

#[tokio::test]
async fn test_filter_matches_name_and_id() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;
    let roster = service(&mock_server.uri());

    // name substring
    let students = roster.list(Some("李")).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "李四");

    // id substring
    let students = roster.list(Some("440301")).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "王五");

    // blank filter returns everyone
    let students = roster.list(Some("  ")).await.unwrap();
    assert_eq!(students.len(), 3);
}

#[tokio::test]
async fn test_filter_ignores_sentinel_ids() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    // "待" appears in the sentinel but sentinel IDs are not searched
    let students = service(&mock_server.uri()).list(Some("待")).await.unwrap();
    assert!(students.is_empty());
}

#[tokio::test]
async fn test_sort_toggles_direction_on_repeat() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;
    let mut roster = service(&mock_server.uri());

    let ascending = roster.sort(SortField::Name).await.unwrap();
    let names: Vec<&str> = ascending.iter().map(|s| s.name.as_str()).collect();
    let mut expected = names.clone();
    expected.sort();
    assert_eq!(names, expected);

    // same field again flips to descending
    let descending = roster.sort(SortField::Name).await.unwrap();
    let reversed: Vec<&str> = descending.iter().map(|s| s.name.as_str()).collect();
    let mut expected_desc = reversed.clone();
    expected_desc.sort();
    expected_desc.reverse();
    assert_eq!(reversed, expected_desc);

    // a new field resets to ascending
    roster.sort(SortField::VehicleType).await.unwrap();
    assert_eq!(
        roster.sort_state(),
        Some((SortField::VehicleType, jiaxiao::roster::SortOrder::Ascending))
    );
}

#[tokio::test]
async fn test_create_rejects_duplicate_id_card() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    // no POST may happen
    Mock::given(method("POST"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let student = common::create_test_student("", "赵六", "110101199001011234");
    let result = service(&mock_server.uri()).create(student).await;

    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::DuplicateIdCard))
    ));
}

#[tokio::test]
async fn test_create_allows_more_sentinel_students() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    // blank id card defaults to the sentinel even though one already exists
    let student = common::create_test_student("", "赵六", "");
    let students = service(&mock_server.uri()).create(student).await.unwrap();
    assert_eq!(students.len(), 3); // refreshed snapshot from the mock

    // the POSTed record got a generated id
    let requests = mock_server.received_requests().await.unwrap();
    let post = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    let body: Student = serde_json::from_slice(&post.body).unwrap();
    assert!(!body.id.is_empty());
    assert_eq!(body.id_card, "待录入");
}

#[tokio::test]
async fn test_create_validates_before_any_request() {
    let mock_server = MockServer::start().await;
    // nothing mounted: a request would 404 and fail differently

    let student = common::create_test_student("", "", "");
    let result = service(&mock_server.uri()).create(student).await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::EmptyName))
    ));

    let student = common::create_test_student("", "赵六", "garbage");
    let result = service(&mock_server.uri()).create(student).await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidIdCard))
    ));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_excludes_self_from_uniqueness() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    Mock::given(method("PUT"))
        .and(path("/students/s-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    // keeping one's own id card is not a duplicate
    let mut student = common::create_test_student("s-1", "张三改", "110101199001011234");
    student.subject2_pass = true;
    service(&mock_server.uri())
        .update("s-1", student)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_rejects_taking_anothers_id_card() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    let student = common::create_test_student("s-3", "王五", "110101199001011234");
    let result = service(&mock_server.uri()).update("s-3", student).await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::DuplicateIdCard))
    ));
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    let student = common::create_test_student("s-99", "无名", "");
    let result = service(&mock_server.uri()).update("s-99", student).await;
    assert!(matches!(
        result,
        Err(Error::NotFound(NotFoundError::Student))
    ));
}

#[tokio::test]
async fn test_delete_missing_id_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    let result = service(&mock_server.uri()).delete("s-99").await;
    assert!(matches!(
        result,
        Err(Error::NotFound(NotFoundError::Student))
    ));
}

#[tokio::test]
async fn test_delete_refreshes_snapshot() {
    let mock_server = MockServer::start().await;
    mount_roster(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path("/students/s-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let students = service(&mock_server.uri()).delete("s-2").await.unwrap();
    // the mock keeps returning the same roster; the point is the re-fetch
    assert_eq!(students.len(), 3);
}
