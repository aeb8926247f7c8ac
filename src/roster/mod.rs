//! Roster service
//!
//! CRUD, search, and sort over the student collection. Every call
//! fetches a fresh snapshot from the remote store and returns it to the
//! caller; nothing is cached across calls. Mutating operations validate
//! before touching the store and return the refreshed roster so the
//! caller always renders server state.

use tracing::debug;

use crate::error::{NotFoundError, Result, ValidationError};
use crate::models::{new_record_id, Student, SENTINEL_ID_CARD};
use crate::store::{Collection, RemoteStoreClient};
use crate::validate;

// ============================================================================
// Sorting
// ============================================================================

/// Student fields the roster can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    IdCard,
    Subject2Pass,
    Subject3Status,
    VehicleType,
    Remarks,
}

impl SortField {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::IdCard => "idCard",
            Self::Subject2Pass => "subject2Pass",
            Self::Subject3Status => "subject3Status",
            Self::VehicleType => "vehicleType",
            Self::Remarks => "remarks",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "name" => Some(Self::Name),
            "idCard" | "id-card" => Some(Self::IdCard),
            "subject2Pass" | "subject2" => Some(Self::Subject2Pass),
            "subject3Status" | "subject3" => Some(Self::Subject3Status),
            "vehicleType" | "vehicle-type" => Some(Self::VehicleType),
            "remarks" => Some(Self::Remarks),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// The opposite direction
    pub fn toggled(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Stable sort by the display string of `field`
///
/// `subject2Pass` compares the 合格/未合格 label rather than the bool, so
/// its order matches what the user sees. Equal keys keep their relative
/// order.
pub fn sort_students(students: &mut [Student], field: SortField, order: SortOrder) {
    students.sort_by(|a, b| {
        let ordering = sort_key(a, field).cmp(&sort_key(b, field));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn sort_key(student: &Student, field: SortField) -> String {
    match field {
        SortField::Name => student.name.clone(),
        SortField::IdCard => student.id_card.clone(),
        SortField::Subject2Pass => student.subject2_label().to_string(),
        SortField::Subject3Status => student.subject3_status.chinese_name().to_string(),
        SortField::VehicleType => student.vehicle_type.as_str().to_string(),
        SortField::Remarks => student.remarks.clone(),
    }
}

// ============================================================================
// Roster Service
// ============================================================================

/// Service over the student collection
pub struct RosterService {
    store: RemoteStoreClient,
    sort_field: Option<SortField>,
    sort_order: SortOrder,
}

impl RosterService {
    /// Create a new roster service
    pub fn new(store: RemoteStoreClient) -> Self {
        Self {
            store,
            sort_field: None,
            sort_order: SortOrder::Ascending,
        }
    }

    /// Fetch the roster, optionally filtered
    ///
    /// A non-empty filter retains students whose non-sentinel ID card
    /// contains the query or whose name contains it, case-insensitive.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Student>> {
        let students: Vec<Student> = self.store.list(Collection::Students).await?;

        let query = match filter {
            Some(q) if !q.trim().is_empty() => q.trim().to_lowercase(),
            _ => return Ok(students),
        };

        Ok(students
            .into_iter()
            .filter(|s| {
                (s.has_id_card() && s.id_card.to_lowercase().contains(&query))
                    || s.name.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// Fetch the roster sorted on `field`
    ///
    /// Repeating the previous field toggles the direction; a new field
    /// resets to ascending.
    pub async fn sort(&mut self, field: SortField) -> Result<Vec<Student>> {
        if self.sort_field == Some(field) {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = Some(field);
            self.sort_order = SortOrder::Ascending;
        }
        debug!(field = %field, order = ?self.sort_order, "sorting roster");

        let mut students = self.list(None).await?;
        sort_students(&mut students, field, self.sort_order);
        Ok(students)
    }

    /// Current sort state, if any field has been sorted on
    pub fn sort_state(&self) -> Option<(SortField, SortOrder)> {
        self.sort_field.map(|f| (f, self.sort_order))
    }

    /// Add a student and return the refreshed roster
    ///
    /// A blank ID card defaults to the sentinel. Rejects an empty name,
    /// a malformed ID, or a non-sentinel ID already on the roster.
    pub async fn create(&self, mut student: Student) -> Result<Vec<Student>> {
        normalize_id_card(&mut student);
        validate_student(&student)?;

        let current: Vec<Student> = self.store.list(Collection::Students).await?;
        if student.has_id_card() && current.iter().any(|s| s.id_card == student.id_card) {
            return Err(ValidationError::DuplicateIdCard.into());
        }

        if student.id.is_empty() {
            student.id = new_record_id();
        }
        debug!(id = %student.id, name = %student.name, "creating student");
        self.store.create(Collection::Students, &student).await?;

        Ok(self.store.list(Collection::Students).await?)
    }

    /// Replace the student with the given record id and return the
    /// refreshed roster
    ///
    /// Validation matches [`create`](Self::create), except the
    /// uniqueness check ignores the record under edit.
    pub async fn update(&self, id: &str, mut student: Student) -> Result<Vec<Student>> {
        normalize_id_card(&mut student);
        validate_student(&student)?;

        let current: Vec<Student> = self.store.list(Collection::Students).await?;
        if !current.iter().any(|s| s.id == id) {
            return Err(NotFoundError::Student.into());
        }
        if student.has_id_card()
            && current
                .iter()
                .any(|s| s.id_card == student.id_card && s.id != id)
        {
            return Err(ValidationError::DuplicateIdCard.into());
        }

        student.id = id.to_string();
        debug!(id = %id, name = %student.name, "updating student");
        self.store.update(Collection::Students, id, &student).await?;

        Ok(self.store.list(Collection::Students).await?)
    }

    /// Remove the student with the given record id and return the
    /// refreshed roster
    pub async fn delete(&self, id: &str) -> Result<Vec<Student>> {
        let current: Vec<Student> = self.store.list(Collection::Students).await?;
        if !current.iter().any(|s| s.id == id) {
            return Err(NotFoundError::Student.into());
        }

        debug!(id = %id, "deleting student");
        self.store.delete(Collection::Students, id).await?;

        Ok(self.store.list(Collection::Students).await?)
    }
}

fn normalize_id_card(student: &mut Student) {
    let trimmed = student.id_card.trim();
    student.id_card = if trimmed.is_empty() {
        SENTINEL_ID_CARD.to_string()
    } else {
        trimmed.to_string()
    };
}

fn validate_student(student: &Student) -> Result<()> {
    if student.name.trim().is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    if !validate::validate_id_card(&student.id_card) {
        return Err(ValidationError::InvalidIdCard.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, id_card: &str) -> Student {
        Student {
            name: name.to_string(),
            id_card: id_card.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!(SortField::parse("name"), Some(SortField::Name));
        assert_eq!(SortField::parse("idCard"), Some(SortField::IdCard));
        assert_eq!(SortField::parse("subject2"), Some(SortField::Subject2Pass));
        assert!(SortField::parse("duration").is_none());
    }

    #[test]
    fn test_sort_order_toggle() {
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.toggled(), SortOrder::Ascending);
    }

    #[test]
    fn test_sort_students_by_name() {
        let mut students = vec![student("王五", "待录入"), student("李四", "待录入")];
        sort_students(&mut students, SortField::Name, SortOrder::Ascending);
        assert_eq!(students[0].name, "李四");

        sort_students(&mut students, SortField::Name, SortOrder::Descending);
        assert_eq!(students[0].name, "王五");
    }

    #[test]
    fn test_sort_subject2_compares_labels() {
        let mut passed = student("甲", "待录入");
        passed.subject2_pass = true;
        let failed = student("乙", "待录入");

        let mut students = vec![failed, passed];
        sort_students(&mut students, SortField::Subject2Pass, SortOrder::Ascending);
        // 合格 sorts before 未合格
        assert!(students[0].subject2_pass);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut a = student("甲", "待录入");
        a.remarks = "first".to_string();
        let mut b = student("乙", "待录入");
        b.remarks = "second".to_string();

        // equal sort keys on idCard: relative order must survive
        let mut students = vec![a, b];
        sort_students(&mut students, SortField::IdCard, SortOrder::Ascending);
        assert_eq!(students[0].remarks, "first");
        sort_students(&mut students, SortField::IdCard, SortOrder::Descending);
        assert_eq!(students[0].remarks, "first");
    }

    #[test]
    fn test_validate_student_rules() {
        assert!(validate_student(&student("张三", "待录入")).is_ok());
        assert!(validate_student(&student("", "待录入")).is_err());
        assert!(validate_student(&student("张三", "not-an-id")).is_err());
        assert!(validate_student(&student("张三", "110101199001011234")).is_ok());
    }

    #[test]
    fn test_normalize_id_card_defaults_to_sentinel() {
        let mut s = student("张三", "  ");
        normalize_id_card(&mut s);
        assert_eq!(s.id_card, SENTINEL_ID_CARD);

        let mut s = student("张三", " 110101199001011234 ");
        normalize_id_card(&mut s);
        assert_eq!(s.id_card, "110101199001011234");
    }
}
