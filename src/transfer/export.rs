//! CSV export
//!
//! Serializes the student and training-record collections to
//! BOM-prefixed UTF-8 CSV with the fixed Chinese headers. Enum and bool
//! fields are rendered to their display labels; weak items join with
//! `;`. File names are fixed so repeated exports overwrite in place.

use crate::error::Result;
use crate::models::{Student, TrainingRecord};
use crate::transfer::schema::{STUDENT_COLUMNS, TRAINING_COLUMNS};

/// UTF-8 byte-order mark prepended to every exported file
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Fixed student export file name
pub const STUDENTS_FILE_NAME: &str = "students.csv";

/// Fixed training-record export file name
pub const TRAINING_FILE_NAME: &str = "trainingRecords.csv";

/// One exported file: fixed name plus its full byte content
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub name: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize the full student collection
pub fn export_students(students: &[Student]) -> Result<ExportFile> {
    let mut bytes = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        writer.write_record(STUDENT_COLUMNS)?;

        for student in students {
            let static_hours = student.static_hours.to_string();
            let dynamic_hours = student.dynamic_hours.to_string();
            writer.write_record([
                student.name.as_str(),
                student.id_card.as_str(),
                student.subject2_label(),
                student.subject3_status.chinese_name(),
                student.vehicle_type.as_str(),
                student.remarks.as_str(),
                static_hours.as_str(),
                dynamic_hours.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    Ok(ExportFile {
        name: STUDENTS_FILE_NAME,
        bytes,
    })
}

/// Serialize the full training-record collection
pub fn export_training(records: &[TrainingRecord]) -> Result<ExportFile> {
    let mut bytes = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut bytes);
        writer.write_record(TRAINING_COLUMNS)?;

        for record in records {
            let duration = record.duration.to_string();
            let weak_items = record.weak_items_label(";");
            writer.write_record([
                record.id_card.as_str(),
                record.training_date.as_str(),
                record.start_time.as_str(),
                record.end_time.as_str(),
                duration.as_str(),
                weak_items.as_str(),
                record.remarks.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    Ok(ExportFile {
        name: TRAINING_FILE_NAME,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Subject3Status, VehicleType, WeakItem, SENTINEL_ID_CARD};

    #[test]
    fn test_export_students_shape() {
        let students = vec![Student {
            id: "s-1".to_string(),
            id_card: "110101199001011234".to_string(),
            name: "张三".to_string(),
            subject2_pass: true,
            subject3_status: Subject3Status::Passed,
            vehicle_type: VehicleType::C1,
            remarks: "备注内容".to_string(),
            static_hours: 12,
            dynamic_hours: 8,
        }];

        let file = export_students(&students).unwrap();
        assert_eq!(file.name, "students.csv");
        assert!(file.bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(file.bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "姓名,身份证号码,科目二状态,科目三状态,车型,备注,静态学时,动态学时"
        );
        assert_eq!(
            lines.next().unwrap(),
            "张三,110101199001011234,合格,已合格,C1,备注内容,12,8"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_students_sentinel_and_labels() {
        let students = vec![Student {
            id_card: SENTINEL_ID_CARD.to_string(),
            name: "李四".to_string(),
            ..Default::default()
        }];

        let file = export_students(&students).unwrap();
        let text = String::from_utf8(file.bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("李四,待录入,未合格,练习中,C1,,0,0"));
    }

    #[test]
    fn test_export_training_joins_weak_items() {
        let records = vec![TrainingRecord {
            id: "r-1".to_string(),
            id_card: "110101199001011234".to_string(),
            training_date: "2024-01-01".to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            duration: 60,
            weak_items: vec![WeakItem::Overtaking, WeakItem::GearShifting],
            remarks: String::new(),
        }];

        let file = export_training(&records).unwrap();
        assert_eq!(file.name, "trainingRecords.csv");

        let text = String::from_utf8(file.bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text
            .contains("110101199001011234,2024-01-01,08:00,09:00,60,超车;换挡,"));
    }

    #[test]
    fn test_export_empty_collections() {
        let file = export_students(&[]).unwrap();
        let text = String::from_utf8(file.bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1); // header only
    }
}
