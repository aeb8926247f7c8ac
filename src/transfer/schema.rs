//! CSV schema descriptors
//!
//! Each importable/exportable file shape is declared once as a
//! [`CsvSchema`]; the import path selects a schema by matching the
//! parsed header row against these descriptors rather than comparing
//! raw header strings inline.

/// Which collection a CSV file maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Students,
    TrainingRecords,
}

impl SchemaKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::TrainingRecords => "trainingRecords",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared column set for one CSV file shape
#[derive(Debug)]
pub struct CsvSchema {
    pub kind: SchemaKind,
    pub columns: &'static [&'static str],
}

/// Student file columns, in order
pub const STUDENT_COLUMNS: &[&str] = &[
    "姓名",
    "身份证号码",
    "科目二状态",
    "科目三状态",
    "车型",
    "备注",
    "静态学时",
    "动态学时",
];

/// Training-record file columns, in order
pub const TRAINING_COLUMNS: &[&str] = &[
    "身份证号码",
    "练车日期",
    "开始时间",
    "结束时间",
    "练习时长",
    "需加强项目",
    "备注",
];

pub static STUDENT_SCHEMA: CsvSchema = CsvSchema {
    kind: SchemaKind::Students,
    columns: STUDENT_COLUMNS,
};

pub static TRAINING_SCHEMA: CsvSchema = CsvSchema {
    kind: SchemaKind::TrainingRecords,
    columns: TRAINING_COLUMNS,
};

/// Match a parsed header row against the known schemas
pub fn detect_schema(header: &[&str]) -> Option<&'static CsvSchema> {
    [&STUDENT_SCHEMA, &TRAINING_SCHEMA]
        .into_iter()
        .find(|schema| {
            header.len() == schema.columns.len()
                && header
                    .iter()
                    .map(|h| h.trim())
                    .eq(schema.columns.iter().copied())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_student_schema() {
        let header: Vec<&str> = STUDENT_COLUMNS.to_vec();
        let schema = detect_schema(&header).unwrap();
        assert_eq!(schema.kind, SchemaKind::Students);
    }

    #[test]
    fn test_detect_training_schema() {
        let header: Vec<&str> = TRAINING_COLUMNS.to_vec();
        let schema = detect_schema(&header).unwrap();
        assert_eq!(schema.kind, SchemaKind::TrainingRecords);
    }

    #[test]
    fn test_header_whitespace_tolerated() {
        let header = vec![
            " 姓名",
            "身份证号码 ",
            "科目二状态",
            "科目三状态",
            "车型",
            "备注",
            "静态学时",
            "动态学时",
        ];
        assert!(detect_schema(&header).is_some());
    }

    #[test]
    fn test_unknown_header_rejected() {
        assert!(detect_schema(&["a", "b", "c"]).is_none());
        assert!(detect_schema(&[]).is_none());

        // reordered columns are not the student schema
        let mut reordered: Vec<&str> = STUDENT_COLUMNS.to_vec();
        reordered.swap(0, 1);
        assert!(detect_schema(&reordered).is_none());
    }

    #[test]
    fn test_truncated_header_rejected() {
        let header: Vec<&str> = STUDENT_COLUMNS[..7].to_vec();
        assert!(detect_schema(&header).is_none());
    }
}
