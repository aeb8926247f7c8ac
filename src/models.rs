// Core record types for the driving-school roster

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder ID card value meaning "not yet recorded"
pub const SENTINEL_ID_CARD: &str = "待录入";

/// Generate a stable record identifier
///
/// Assigned once at creation time; all mutations address records by this
/// key, never by list position.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Roster entry for one student
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Stable record key, immutable after creation
    #[serde(default)]
    pub id: String,
    /// 18-character national ID, or [`SENTINEL_ID_CARD`]
    pub id_card: String,
    pub name: String,
    pub subject2_pass: bool,
    #[serde(default)]
    pub subject3_status: Subject3Status,
    #[serde(default)]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub static_hours: u32,
    #[serde(default)]
    pub dynamic_hours: u32,
}

impl Student {
    /// Whether a real ID card has been recorded (not the sentinel)
    pub fn has_id_card(&self) -> bool {
        self.id_card != SENTINEL_ID_CARD
    }

    /// Display label for the subject-two outcome
    pub fn subject2_label(&self) -> &'static str {
        if self.subject2_pass {
            "合格"
        } else {
            "未合格"
        }
    }
}

/// Subject-three curriculum stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Subject3Status {
    #[default]
    #[serde(rename = "练习中")]
    InProgress,
    #[serde(rename = "需补考")]
    NeedsRetest,
    #[serde(rename = "已合格")]
    Passed,
}

impl Subject3Status {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::NeedsRetest => "needs_retest",
            Self::Passed => "passed",
        }
    }

    /// Get Chinese display label (also the wire and CSV representation)
    pub fn chinese_name(&self) -> &'static str {
        match self {
            Self::InProgress => "练习中",
            Self::NeedsRetest => "需补考",
            Self::Passed => "已合格",
        }
    }

    /// Create from string (supports both English and Chinese names)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "in_progress" | "练习中" => Some(Self::InProgress),
            "needs_retest" | "需补考" => Some(Self::NeedsRetest),
            "passed" | "已合格" => Some(Self::Passed),
            _ => None,
        }
    }

    /// Get all stages
    pub fn all() -> Vec<Self> {
        vec![Self::InProgress, Self::NeedsRetest, Self::Passed]
    }
}

impl std::fmt::Display for Subject3Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chinese_name())
    }
}

/// Vehicle type a student is licensed to train on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VehicleType {
    #[default]
    C1,
    C2,
}

impl VehicleType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "C1" | "c1" => Some(Self::C1),
            "C2" | "c2" => Some(Self::C2),
            _ => None,
        }
    }

    /// Get all vehicle types
    pub fn all() -> Vec<Self> {
        vec![Self::C1, Self::C2]
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Driving-skill deficiency tag attachable to a training record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeakItem {
    #[serde(rename = "超车")]
    Overtaking,
    #[serde(rename = "直线行驶")]
    StraightLineDriving,
    #[serde(rename = "会车")]
    MeetingTraffic,
    #[serde(rename = "靠边停车")]
    PullingOver,
    #[serde(rename = "换挡")]
    GearShifting,
}

impl WeakItem {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overtaking => "overtaking",
            Self::StraightLineDriving => "straight_line_driving",
            Self::MeetingTraffic => "meeting_traffic",
            Self::PullingOver => "pulling_over",
            Self::GearShifting => "gear_shifting",
        }
    }

    /// Get Chinese display label (also the wire and CSV representation)
    pub fn chinese_name(&self) -> &'static str {
        match self {
            Self::Overtaking => "超车",
            Self::StraightLineDriving => "直线行驶",
            Self::MeetingTraffic => "会车",
            Self::PullingOver => "靠边停车",
            Self::GearShifting => "换挡",
        }
    }

    /// Create from string (supports both English and Chinese names)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "overtaking" | "超车" => Some(Self::Overtaking),
            "straight_line_driving" | "直线行驶" => Some(Self::StraightLineDriving),
            "meeting_traffic" | "会车" => Some(Self::MeetingTraffic),
            "pulling_over" | "靠边停车" => Some(Self::PullingOver),
            "gear_shifting" | "换挡" => Some(Self::GearShifting),
            _ => None,
        }
    }

    /// Get the full 5-item skill taxonomy
    pub fn all() -> Vec<Self> {
        vec![
            Self::Overtaking,
            Self::StraightLineDriving,
            Self::MeetingTraffic,
            Self::PullingOver,
            Self::GearShifting,
        ]
    }
}

impl std::fmt::Display for WeakItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chinese_name())
    }
}

/// Remove duplicate weak items while preserving first-seen order
pub fn dedup_weak_items(items: Vec<WeakItem>) -> Vec<WeakItem> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// One practice session for one student
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    /// Stable record key, immutable after creation
    #[serde(default)]
    pub id: String,
    /// Owning student's ID card (sentinel allowed)
    pub id_card: String,
    pub training_date: String,
    /// Half-hour grid value, e.g. "08:00"
    pub start_time: String,
    /// Half-hour grid value, strictly after `start_time`
    pub end_time: String,
    /// Minutes, always `end_time - start_time`, positive multiple of 30
    pub duration: u32,
    #[serde(default)]
    pub weak_items: Vec<WeakItem>,
    #[serde(default)]
    pub remarks: String,
}

impl TrainingRecord {
    /// Natural merge key used by CSV import
    pub fn merge_key(&self) -> (&str, &str, &str) {
        (&self.id_card, &self.training_date, &self.start_time)
    }

    /// Weak-item labels joined for display
    pub fn weak_items_label(&self, separator: &str) -> String {
        self.weak_items
            .iter()
            .map(|w| w.chinese_name())
            .collect::<Vec<_>>()
            .join(separator)
    }
}
