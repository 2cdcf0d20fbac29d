//! Leave model and related types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of absence a leave records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Planned holiday.
    Vacation,
    /// Unplanned absence due to illness.
    SickLeave,
    /// A public holiday observed by the developer.
    PublicHoliday,
    /// Anything else.
    Other,
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Vacation => write!(f, "Vacation"),
            LeaveType::SickLeave => write!(f, "Sick Leave"),
            LeaveType::PublicHoliday => write!(f, "Public Holiday"),
            LeaveType::Other => write!(f, "Other"),
        }
    }
}

/// Represents a dated absence period for a developer.
///
/// A leave with `hours` set is a partial-day absence and never displaces
/// allocations; only full-day leaves do.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Leave, LeaveType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut leave = Leave {
///     id: "leave_001".to_string(),
///     developer_id: "dev_001".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
///     leave_type: LeaveType::Vacation,
///     hours: None,
/// };
/// assert!(leave.is_full_day());
///
/// leave.hours = Some(Decimal::new(4, 0));
/// assert!(!leave.is_full_day());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leave {
    /// Unique identifier for the leave.
    pub id: String,
    /// The absent developer.
    pub developer_id: String,
    /// First day of absence (inclusive).
    pub start_date: NaiveDate,
    /// Last day of absence (inclusive).
    pub end_date: NaiveDate,
    /// The kind of absence.
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    /// Hours absent, for partial-day leave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Decimal>,
}

impl Leave {
    /// Returns true if this leave blocks whole days.
    ///
    /// Zero hours counts as full-day.
    pub fn is_full_day(&self) -> bool {
        !matches!(self.hours, Some(h) if h > Decimal::ZERO)
    }

    /// Checks the structural invariants callers are expected to uphold.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidLeave {
                leave_id: self.id.clone(),
                message: format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            });
        }
        if matches!(self.hours, Some(h) if h < Decimal::ZERO) {
            return Err(EngineError::InvalidLeave {
                leave_id: self.id.clone(),
                message: "hours cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}
