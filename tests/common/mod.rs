//! Common test utilities

use jiaxiao::models::{Student, Subject3Status, TrainingRecord, VehicleType, WeakItem};

/// Create a test student with default values
#[allow(dead_code)]
pub fn create_test_student(id: &str, name: &str, id_card: &str) -> Student {
    Student {
        id: id.to_string(),
        id_card: id_card.to_string(),
        name: name.to_string(),
        subject2_pass: false,
        subject3_status: Subject3Status::InProgress,
        vehicle_type: VehicleType::C1,
        remarks: String::new(),
        static_hours: 0,
        dynamic_hours: 0,
    }
}

/// Create a test training record for one session
#[allow(dead_code)]
pub fn create_test_record(
    id: &str,
    id_card: &str,
    date: &str,
    start: &str,
    end: &str,
    duration: u32,
) -> TrainingRecord {
    TrainingRecord {
        id: id.to_string(),
        id_card: id_card.to_string(),
        training_date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        duration,
        weak_items: vec![WeakItem::Overtaking],
        remarks: String::new(),
    }
}
