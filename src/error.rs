use std::fmt;

use chrono::NaiveDate;

/// タイムエントリーの操作が拒否された理由。
///
/// いずれもシステム障害ではなく、呼び出し元へそのまま伝える。
#[derive(Debug, Clone, PartialEq)]
pub enum EntryError {
    /// 入力の形式が不正。
    InvalidShape {
        field: &'static str,
        reason: String,
    },
    /// 1日の上限時間を超える。
    DailyCapExceeded {
        date: NaiveDate,
        limit: f64,
        existing: f64,
        requested: f64,
    },
    /// 削除対象が存在しない。
    NotFound { id: u64 },
}

impl EntryError {
    pub(crate) fn invalid_shape(field: &'static str, reason: impl Into<String>) -> Self {
        EntryError::InvalidShape {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::DailyCapExceeded {
                date,
                limit,
                existing,
                requested,
            } => write!(
                f,
                "cannot log more than {limit} hours on {date} ({existing} already logged, {requested} requested)"
            ),
            Self::NotFound { id } => write!(f, "time entry {id} not found"),
        }
    }
}

impl std::error::Error for EntryError {}
