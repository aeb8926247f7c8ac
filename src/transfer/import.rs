//! CSV import
//!
//! Parses an uploaded CSV file, selects the target collection from its
//! header row via the schema descriptors, validates every data row, and
//! merges the accepted rows into the remote store under the caller's
//! chosen mode. Store calls run strictly sequentially; the first failure
//! aborts the remaining rows with no rollback of rows already written.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    dedup_weak_items, new_record_id, Student, Subject3Status, TrainingRecord, VehicleType,
    WeakItem, SENTINEL_ID_CARD,
};
use crate::store::{Collection, RemoteStoreClient};
use crate::transfer::schema::{detect_schema, SchemaKind};
use crate::validate;

// ============================================================================
// Modes and Report
// ============================================================================

/// Merge policy for rows whose key matches an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Replace same-key records, insert the rest in one bulk request
    Overwrite,
    /// Insert only rows whose key is absent
    Append,
}

impl ImportMode {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Append => "append",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "overwrite" => Some(Self::Overwrite),
            "append" => Some(Self::Append),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an import run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Which collection the file mapped to
    pub kind: SchemaKind,
    /// Data rows present in the file
    pub rows_read: usize,
    /// Rows dropped by validation
    pub dropped: usize,
    /// Existing records replaced (overwrite mode)
    pub replaced: usize,
    /// New records inserted
    pub inserted: usize,
    /// Rows skipped because their key already existed (append mode)
    pub skipped: usize,
}

// ============================================================================
// Import flow
// ============================================================================

/// Run a full import: decode, detect schema, validate rows, merge
pub(crate) async fn run(
    store: &RemoteStoreClient,
    bytes: &[u8],
    mode: ImportMode,
) -> Result<ImportReport> {
    let text = decode(bytes)?;
    let rows = read_rows(&text)?;

    let header = rows
        .first()
        .ok_or_else(|| Error::format("empty CSV file"))?;
    let header_cells: Vec<&str> = header.iter().collect();
    let schema = detect_schema(&header_cells)
        .ok_or_else(|| Error::format(format!("unrecognized CSV header: {header_cells:?}")))?;
    debug!(kind = %schema.kind, rows = rows.len() - 1, mode = %mode, "importing CSV");

    // rows shorter than the schema are not data rows
    let data: Vec<&csv::StringRecord> = rows
        .iter()
        .skip(1)
        .filter(|row| row.len() >= schema.columns.len())
        .collect();

    match schema.kind {
        SchemaKind::Students => import_students(store, &data, mode).await,
        SchemaKind::TrainingRecords => import_training(store, &data, mode).await,
    }
}

fn decode(bytes: &[u8]) -> Result<String> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        return Err(Error::format("file is not valid UTF-8"));
    }
    Ok(text.into_owned())
}

fn read_rows(text: &str) -> Result<Vec<csv::StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }
    Ok(rows)
}

async fn import_students(
    store: &RemoteStoreClient,
    rows: &[&csv::StringRecord],
    mode: ImportMode,
) -> Result<ImportReport> {
    let rows_read = rows.len();
    let parsed: Vec<Student> = rows.iter().filter_map(|r| parse_student_row(r)).collect();
    let dropped = rows_read - parsed.len();
    if dropped > 0 {
        warn!(dropped, "student rows failed validation and were dropped");
    }

    let existing: Vec<Student> = store.list(Collection::Students).await?;

    let mut report = ImportReport {
        kind: SchemaKind::Students,
        rows_read,
        dropped,
        replaced: 0,
        inserted: 0,
        skipped: 0,
    };

    match mode {
        ImportMode::Overwrite => {
            let mut to_insert = Vec::new();
            for mut student in parsed {
                let matched = if student.has_id_card() {
                    existing.iter().find(|e| e.id_card == student.id_card)
                } else {
                    None
                };
                match matched {
                    // a key-less legacy record cannot be addressed for
                    // replacement; skip the row rather than duplicate its ID
                    Some(old) if old.id.is_empty() => report.skipped += 1,
                    Some(old) => {
                        student.id = old.id.clone();
                        store
                            .update(Collection::Students, &old.id, &student)
                            .await?;
                        report.replaced += 1;
                    }
                    None => {
                        student.id = new_record_id();
                        to_insert.push(student);
                    }
                }
            }
            report.inserted = to_insert.len();
            if !to_insert.is_empty() {
                store.create_many(Collection::Students, &to_insert).await?;
            }
        }
        ImportMode::Append => {
            for mut student in parsed {
                // sentinel-keyed rows have no natural key and always insert
                let exists = student.has_id_card()
                    && existing.iter().any(|e| e.id_card == student.id_card);
                if exists {
                    report.skipped += 1;
                    continue;
                }
                student.id = new_record_id();
                store.create(Collection::Students, &student).await?;
                report.inserted += 1;
            }
        }
    }

    Ok(report)
}

async fn import_training(
    store: &RemoteStoreClient,
    rows: &[&csv::StringRecord],
    mode: ImportMode,
) -> Result<ImportReport> {
    let rows_read = rows.len();
    let parsed: Vec<TrainingRecord> =
        rows.iter().filter_map(|r| parse_training_row(r)).collect();
    let dropped = rows_read - parsed.len();
    if dropped > 0 {
        warn!(dropped, "training rows failed validation and were dropped");
    }

    let existing: Vec<TrainingRecord> = store.list(Collection::TrainingRecords).await?;

    let mut report = ImportReport {
        kind: SchemaKind::TrainingRecords,
        rows_read,
        dropped,
        replaced: 0,
        inserted: 0,
        skipped: 0,
    };

    match mode {
        ImportMode::Overwrite => {
            let mut to_insert = Vec::new();
            for mut record in parsed {
                let matched = existing.iter().find(|e| e.merge_key() == record.merge_key());
                match matched {
                    Some(old) if old.id.is_empty() => report.skipped += 1,
                    Some(old) => {
                        record.id = old.id.clone();
                        store
                            .update(Collection::TrainingRecords, &old.id, &record)
                            .await?;
                        report.replaced += 1;
                    }
                    None => {
                        record.id = new_record_id();
                        to_insert.push(record);
                    }
                }
            }
            report.inserted = to_insert.len();
            if !to_insert.is_empty() {
                store
                    .create_many(Collection::TrainingRecords, &to_insert)
                    .await?;
            }
        }
        ImportMode::Append => {
            for mut record in parsed {
                let exists = existing.iter().any(|e| e.merge_key() == record.merge_key());
                if exists {
                    report.skipped += 1;
                    continue;
                }
                record.id = new_record_id();
                store
                    .create(Collection::TrainingRecords, &record)
                    .await?;
                report.inserted += 1;
            }
        }
    }

    Ok(report)
}

// ============================================================================
// Row parsing
// ============================================================================

fn cell<'a>(record: &'a csv::StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

/// Parse one student data row; `None` drops the row
fn parse_student_row(record: &csv::StringRecord) -> Option<Student> {
    let name = cell(record, 0).trim();
    let raw_id = cell(record, 1).trim();
    let id_card = if raw_id.is_empty() {
        SENTINEL_ID_CARD
    } else {
        raw_id
    };

    if name.is_empty() || !validate::validate_id_card(id_card) {
        return None;
    }

    Some(Student {
        id: String::new(),
        id_card: id_card.to_string(),
        name: name.to_string(),
        subject2_pass: cell(record, 2).trim() == "合格",
        subject3_status: Subject3Status::parse(cell(record, 3)).unwrap_or_default(),
        vehicle_type: VehicleType::parse(cell(record, 4)).unwrap_or_default(),
        remarks: cell(record, 5).to_string(),
        static_hours: parse_hours(cell(record, 6)),
        dynamic_hours: parse_hours(cell(record, 7)),
    })
}

fn parse_hours(value: &str) -> u32 {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .map(|v| v.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Parse one training data row; `None` drops the row
///
/// The stated duration must be a positive multiple of 30 and must equal
/// the duration recomputed from the start and end times. Unknown
/// weak-item labels are dropped from the set silently.
fn parse_training_row(record: &csv::StringRecord) -> Option<TrainingRecord> {
    let raw_id = cell(record, 0).trim();
    let id_card = if raw_id.is_empty() {
        SENTINEL_ID_CARD
    } else {
        raw_id
    };
    let training_date = cell(record, 1).trim();
    let start_time = cell(record, 2).trim();
    let end_time = cell(record, 3).trim();
    let stated: i64 = cell(record, 4).trim().parse().ok()?;

    if !validate::validate_id_card(id_card)
        || training_date.is_empty()
        || !validate::validate_time_format(start_time)
        || !validate::validate_time_format(end_time)
        || stated < 30
        || stated % 30 != 0
    {
        return None;
    }
    if validate::calculate_duration(start_time, end_time) != Some(stated as u32) {
        return None;
    }

    let weak_items: Vec<WeakItem> = cell(record, 5)
        .split(';')
        .filter_map(WeakItem::parse)
        .collect();

    Some(TrainingRecord {
        id: String::new(),
        id_card: id_card.to_string(),
        training_date: training_date.to_string(),
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        duration: stated as u32,
        weak_items: dedup_weak_items(weak_items),
        remarks: cell(record, 6).to_string(),
    })
}
