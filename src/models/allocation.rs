//! Allocation model and related types.
//!
//! An allocation is a dated, percentage-load assignment of a developer to a
//! project. Date ranges are inclusive whole days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Generates a fresh identifier for a newly created record.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether an allocation is committed or tentative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// Committed work.
    Confirmed,
    /// Tentative, pencilled-in work.
    Draft,
}

/// Represents a developer's assignment to a project over an inclusive date range.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Allocation, AllocationStatus};
/// use chrono::NaiveDate;
///
/// let alloc = Allocation {
///     id: "alloc_001".to_string(),
///     developer_id: "dev_001".to_string(),
///     project_id: "proj_001".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
///     load: 100,
///     status: AllocationStatus::Confirmed,
/// };
/// assert_eq!(alloc.days(), 181);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    /// Unique identifier for the allocation.
    pub id: String,
    /// The developer carrying the load.
    pub developer_id: String,
    /// The project the load is booked against.
    pub project_id: String,
    /// First allocated day (inclusive).
    pub start_date: NaiveDate,
    /// Last allocated day (inclusive).
    pub end_date: NaiveDate,
    /// Load as a percentage of a full workweek (0-100).
    pub load: u32,
    /// Committed or tentative.
    pub status: AllocationStatus,
}

impl Allocation {
    /// Returns a structural copy with a fresh id and the given date range.
    ///
    /// Every other field (developer, project, load, status) is carried over.
    pub fn with_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Allocation {
        Allocation {
            id: generate_id(),
            start_date,
            end_date,
            ..self.clone()
        }
    }

    /// Returns true if the allocation shares at least one day with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        crate::planning::is_overlapping(self.start_date, self.end_date, start, end)
    }

    /// Number of calendar days covered, inclusive of both ends.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Checks the structural invariants callers are expected to uphold.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidAllocation {
                allocation_id: self.id.clone(),
                message: format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            });
        }
        if self.load > 100 {
            return Err(EngineError::InvalidAllocation {
                allocation_id: self.id.clone(),
                message: format!("load {}% exceeds 100%", self.load),
            });
        }
        Ok(())
    }
}
