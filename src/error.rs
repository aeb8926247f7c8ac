//! Unified error handling for the jiaxiao crate
//!
//! This module consolidates the domain error taxonomy into a single
//! [`Error`] enum: validation failures, missing records, remote store
//! failures, and CSV format failures. Every error carries a Chinese
//! user-facing description mirroring what the staff-facing front end
//! shows, separate from the English `Display` text used in logs.

use std::io;
use thiserror::Error;

pub use crate::store::StoreError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad or missing input, rule violation; no mutation was attempted
    Validation,
    /// Referenced record or ID card does not exist
    NotFound,
    /// Failed read/write against the remote store
    Network,
    /// Unrecognized CSV header or unparseable file
    Format,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get Chinese description for the category
    pub fn chinese_desc(&self) -> &'static str {
        match self {
            Self::Validation => "输入校验错误",
            Self::NotFound => "记录不存在",
            Self::Network => "网络错误",
            Self::Format => "文件格式错误",
            Self::Other => "其他错误",
        }
    }
}

/// Rule violations raised before any mutation is attempted
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// ID card fails the structural format check
    #[error("ID card fails format check")]
    InvalidIdCard,

    /// Student name is empty
    #[error("student name is empty")]
    EmptyName,

    /// Non-sentinel ID card duplicates an existing student's
    #[error("ID card already exists")]
    DuplicateIdCard,

    /// Training date, start time, or end time missing
    #[error("training date, start time and end time are required")]
    MissingTrainingFields,

    /// End not after start, or duration not a positive multiple of 30
    #[error("duration is not a positive multiple of 30 minutes")]
    InvalidDuration,
}

impl ValidationError {
    /// Get Chinese user-facing message
    pub fn chinese_desc(&self) -> &'static str {
        match self {
            Self::InvalidIdCard => "身份证号码格式不正确！",
            Self::EmptyName => "请输入姓名！",
            Self::DuplicateIdCard => "身份证号码已存在！",
            Self::MissingTrainingFields => "请填写所有必填字段！",
            Self::InvalidDuration => "结束时间必须晚于开始时间，且练习时长必须为30分钟的倍数！",
        }
    }
}

/// Referenced identifier absent from the store
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundError {
    /// No student with the given ID card or record id
    #[error("student not found")]
    Student,

    /// No training record with the given record id
    #[error("training record not found")]
    TrainingRecord,
}

impl NotFoundError {
    /// Get Chinese user-facing message
    pub fn chinese_desc(&self) -> &'static str {
        match self {
            Self::Student => "学员不存在！",
            Self::TrainingRecord => "学时记录不存在！",
        }
    }
}

/// Unified error type for the jiaxiao crate
#[derive(Error, Debug)]
pub enum Error {
    /// Validation rule violation
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Missing record
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Remote store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Unrecognized CSV header or unparseable file
    #[error("format error: {0}")]
    Format(String),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Store(_) => ErrorCategory::Network,
            Self::Format(_) | Self::Csv(_) => ErrorCategory::Format,
            Self::Io(_) | Self::Json(_) => ErrorCategory::Other,
        }
    }

    /// Whether re-invoking the failed operation may succeed
    ///
    /// True only for store failures. Nothing retries automatically; this
    /// tells the caller whether a manual retry is worth offering.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Get Chinese user-facing message
    pub fn user_desc(&self) -> String {
        match self {
            Self::Validation(e) => e.chinese_desc().to_string(),
            Self::NotFound(e) => e.chinese_desc().to_string(),
            Self::Store(_) => "网络请求失败，请检查网络！".to_string(),
            Self::Format(_) | Self::Csv(_) => "无效的CSV文件格式！".to_string(),
            Self::Io(e) => format!("文件读写失败：{e}"),
            Self::Json(e) => format!("数据解析失败：{e}"),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err: Error = ValidationError::EmptyName.into();
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err: Error = NotFoundError::Student.into();
        assert_eq!(err.category(), ErrorCategory::NotFound);

        let err: Error = StoreError::Network("timeout".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = Error::format("bad header");
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_is_retryable() {
        let err: Error = StoreError::Http {
            status: 503,
            message: String::new(),
        }
        .into();
        assert!(err.is_retryable());

        let err: Error = ValidationError::InvalidIdCard.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_desc_chinese() {
        let err: Error = ValidationError::InvalidIdCard.into();
        assert_eq!(err.user_desc(), "身份证号码格式不正确！");

        let err: Error = NotFoundError::Student.into();
        assert_eq!(err.user_desc(), "学员不存在！");

        let err = Error::format("unknown header");
        assert_eq!(err.user_desc(), "无效的CSV文件格式！");
    }

    #[test]
    fn test_category_chinese_desc() {
        assert_eq!(ErrorCategory::Network.chinese_desc(), "网络错误");
        assert_eq!(ErrorCategory::Validation.chinese_desc(), "输入校验错误");
    }
}
