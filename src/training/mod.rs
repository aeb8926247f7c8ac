//! Training service
//!
//! CRUD over practice-session records scoped to one student's ID card.
//! The session duration is never accepted from the caller: it is always
//! derived from the start and end times and stored alongside them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NotFoundError, Result, ValidationError};
use crate::models::{dedup_weak_items, new_record_id, Student, TrainingRecord, WeakItem};
use crate::store::{Collection, RemoteStoreClient};
use crate::validate;

/// One student's training page: the owning student, their records, and
/// the summed practice minutes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingOverview {
    pub student: Student,
    pub records: Vec<TrainingRecord>,
    pub total_training_minutes: u32,
}

/// Caller-supplied fields for a new or edited training record
///
/// Carries no duration; [`TrainingService`] derives it.
#[derive(Debug, Clone, Default)]
pub struct TrainingDraft {
    pub id_card: String,
    pub training_date: String,
    pub start_time: String,
    pub end_time: String,
    pub weak_items: Vec<WeakItem>,
    pub remarks: String,
}

/// Service over the training-record collection
pub struct TrainingService {
    store: RemoteStoreClient,
}

impl TrainingService {
    /// Create a new training service
    pub fn new(store: RemoteStoreClient) -> Self {
        Self { store }
    }

    /// Fetch one student's training page
    ///
    /// Fails with [`NotFoundError::Student`] when no student on the
    /// roster has `id_card`; callers fall back to the roster view.
    pub async fn overview(&self, id_card: &str) -> Result<TrainingOverview> {
        let students: Vec<Student> = self.store.list(Collection::Students).await?;
        let student = students
            .into_iter()
            .find(|s| s.id_card == id_card)
            .ok_or(NotFoundError::Student)?;

        let records: Vec<TrainingRecord> = self.store.list(Collection::TrainingRecords).await?;
        let records: Vec<TrainingRecord> = records
            .into_iter()
            .filter(|r| r.id_card == id_card)
            .collect();

        let total_training_minutes = records.iter().map(|r| r.duration).sum();
        Ok(TrainingOverview {
            student,
            records,
            total_training_minutes,
        })
    }

    /// Add a training record and return the student's refreshed page
    pub async fn create(&self, draft: TrainingDraft) -> Result<TrainingOverview> {
        let mut record = build_record(draft)?;
        self.require_student(&record.id_card).await?;

        record.id = new_record_id();
        debug!(id = %record.id, id_card = %record.id_card, duration = record.duration, "creating training record");
        self.store
            .create(Collection::TrainingRecords, &record)
            .await?;

        self.overview(&record.id_card).await
    }

    /// Replace the training record with the given record id and return
    /// the student's refreshed page
    pub async fn update(&self, id: &str, draft: TrainingDraft) -> Result<TrainingOverview> {
        let mut record = build_record(draft)?;
        self.require_student(&record.id_card).await?;

        let current: Vec<TrainingRecord> = self.store.list(Collection::TrainingRecords).await?;
        if !current.iter().any(|r| r.id == id) {
            return Err(NotFoundError::TrainingRecord.into());
        }

        record.id = id.to_string();
        debug!(id = %id, id_card = %record.id_card, "updating training record");
        self.store
            .update(Collection::TrainingRecords, id, &record)
            .await?;

        self.overview(&record.id_card).await
    }

    /// Remove the training record with the given record id and return
    /// the student's refreshed page
    pub async fn delete(&self, id_card: &str, id: &str) -> Result<TrainingOverview> {
        let current: Vec<TrainingRecord> = self.store.list(Collection::TrainingRecords).await?;
        if !current.iter().any(|r| r.id == id) {
            return Err(NotFoundError::TrainingRecord.into());
        }

        debug!(id = %id, "deleting training record");
        self.store.delete(Collection::TrainingRecords, id).await?;

        self.overview(id_card).await
    }

    async fn require_student(&self, id_card: &str) -> Result<()> {
        let students: Vec<Student> = self.store.list(Collection::Students).await?;
        if students.iter().any(|s| s.id_card == id_card) {
            Ok(())
        } else {
            Err(NotFoundError::Student.into())
        }
    }
}

/// Validate a draft and derive its duration
fn build_record(draft: TrainingDraft) -> Result<TrainingRecord> {
    if draft.training_date.trim().is_empty()
        || draft.start_time.trim().is_empty()
        || draft.end_time.trim().is_empty()
    {
        return Err(ValidationError::MissingTrainingFields.into());
    }

    let duration = validate::calculate_duration(&draft.start_time, &draft.end_time)
        .ok_or(ValidationError::InvalidDuration)?;

    Ok(TrainingRecord {
        id: String::new(),
        id_card: draft.id_card,
        training_date: draft.training_date,
        start_time: draft.start_time,
        end_time: draft.end_time,
        duration,
        weak_items: dedup_weak_items(draft.weak_items),
        remarks: draft.remarks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TrainingDraft {
        TrainingDraft {
            id_card: "110101199001011234".to_string(),
            training_date: "2024-01-01".to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:30".to_string(),
            weak_items: vec![WeakItem::Overtaking, WeakItem::Overtaking],
            remarks: String::new(),
        }
    }

    #[test]
    fn test_build_record_derives_duration() {
        let record = build_record(draft()).unwrap();
        assert_eq!(record.duration, 90);
        // duplicates collapse
        assert_eq!(record.weak_items, vec![WeakItem::Overtaking]);
    }

    #[test]
    fn test_build_record_requires_fields() {
        let mut d = draft();
        d.training_date = String::new();
        assert!(matches!(
            build_record(d),
            Err(crate::error::Error::Validation(
                ValidationError::MissingTrainingFields
            ))
        ));

        let mut d = draft();
        d.start_time = "  ".to_string();
        assert!(build_record(d).is_err());
    }

    #[test]
    fn test_build_record_rejects_bad_duration() {
        let mut d = draft();
        d.end_time = "08:00".to_string(); // equal to start
        assert!(matches!(
            build_record(d),
            Err(crate::error::Error::Validation(
                ValidationError::InvalidDuration
            ))
        ));

        let mut d = draft();
        d.end_time = "07:00".to_string(); // before start
        assert!(build_record(d).is_err());
    }
}
