//! Roster subcommands

use tracing::info;

use crate::config::Config;
use crate::error::{NotFoundError, Result};
use crate::models::{Student, Subject3Status, VehicleType};
use crate::roster::{sort_students, RosterService, SortField, SortOrder};
use crate::store::RemoteStoreClient;
use crate::validate::mask_id_card;

/// Field values for a new student
#[derive(Debug, Clone)]
pub struct StudentFields {
    pub name: String,
    pub id_card: Option<String>,
    pub subject2_pass: bool,
    pub subject3_status: Subject3Status,
    pub vehicle_type: VehicleType,
    pub remarks: String,
    pub static_hours: u32,
    pub dynamic_hours: u32,
}

/// Partial field overrides for an edit
#[derive(Debug, Clone, Default)]
pub struct StudentOverrides {
    pub name: Option<String>,
    pub id_card: Option<String>,
    pub subject2_pass: Option<bool>,
    pub subject3_status: Option<Subject3Status>,
    pub vehicle_type: Option<VehicleType>,
    pub remarks: Option<String>,
    pub static_hours: Option<u32>,
    pub dynamic_hours: Option<u32>,
}

fn service(config: &Config) -> Result<RosterService> {
    let store = RemoteStoreClient::new(config.store_config())?;
    Ok(RosterService::new(store))
}

/// Print the roster, optionally filtered and sorted
pub async fn list(
    config: &Config,
    filter: Option<String>,
    sort: Option<SortField>,
    descending: bool,
    unmask: bool,
) -> Result<()> {
    info!(filter = ?filter, sort = ?sort, "listing roster");
    let roster = service(config)?;
    let mut students = roster.list(filter.as_deref()).await?;

    if let Some(field) = sort {
        let order = if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        sort_students(&mut students, field, order);
    }

    println!("姓名\t身份证号码\t科目二状态\t科目三状态\t车型\t备注\t记录号");
    for student in &students {
        let id_card = if unmask {
            student.id_card.clone()
        } else {
            mask_id_card(&student.id_card)
        };
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            student.name,
            id_card,
            student.subject2_label(),
            student.subject3_status,
            student.vehicle_type,
            student.remarks,
            student.id,
        );
    }
    println!("共 {} 名学员", students.len());
    Ok(())
}

/// Add a student
pub async fn add(config: &Config, fields: StudentFields) -> Result<()> {
    info!(name = %fields.name, "adding student");
    let roster = service(config)?;

    let student = Student {
        id: String::new(),
        id_card: fields.id_card.unwrap_or_default(),
        name: fields.name.clone(),
        subject2_pass: fields.subject2_pass,
        subject3_status: fields.subject3_status,
        vehicle_type: fields.vehicle_type,
        remarks: fields.remarks,
        static_hours: fields.static_hours,
        dynamic_hours: fields.dynamic_hours,
    };

    let students = roster.create(student).await?;
    println!("已添加学员：{}（当前共 {} 名）", fields.name, students.len());
    Ok(())
}

/// Edit a student by record id, changing only the given fields
pub async fn edit(config: &Config, id: String, overrides: StudentOverrides) -> Result<()> {
    info!(id = %id, "editing student");
    let roster = service(config)?;

    let current = roster.list(None).await?;
    let mut student = current
        .into_iter()
        .find(|s| s.id == id)
        .ok_or(NotFoundError::Student)?;

    if let Some(name) = overrides.name {
        student.name = name;
    }
    if let Some(id_card) = overrides.id_card {
        student.id_card = id_card;
    }
    if let Some(pass) = overrides.subject2_pass {
        student.subject2_pass = pass;
    }
    if let Some(status) = overrides.subject3_status {
        student.subject3_status = status;
    }
    if let Some(vehicle) = overrides.vehicle_type {
        student.vehicle_type = vehicle;
    }
    if let Some(remarks) = overrides.remarks {
        student.remarks = remarks;
    }
    if let Some(hours) = overrides.static_hours {
        student.static_hours = hours;
    }
    if let Some(hours) = overrides.dynamic_hours {
        student.dynamic_hours = hours;
    }

    let name = student.name.clone();
    roster.update(&id, student).await?;
    println!("已保存学员：{name}");
    Ok(())
}

/// Remove a student by record id
pub async fn remove(config: &Config, id: String) -> Result<()> {
    info!(id = %id, "removing student");
    let roster = service(config)?;
    let students = roster.delete(&id).await?;
    println!("已删除学员（剩余 {} 名）", students.len());
    Ok(())
}
