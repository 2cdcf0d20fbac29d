//! Removing a leave's span from an allocation.
//!
//! This is the leave-specific specialization of the splitter: the leave
//! window is cut out rather than isolated, since leave time is never
//! allocated.

use serde::{Deserialize, Serialize};

use crate::models::{Allocation, Leave};

use super::splitter::split_allocation;

/// What happened to an allocation when a leave was applied to it.
///
/// Splitting never preserves identity: a cut allocation is replaced by
/// structurally new records, so callers tracking allocations by id must treat
/// `Replaced` as a disappearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationChange {
    /// The leave did not touch the allocation; the original record survives.
    Kept(Allocation),
    /// The allocation was cut. Zero pieces means the leave consumed it.
    Replaced(Vec<Allocation>),
}

impl AllocationChange {
    /// Returns true if the original allocation survived unchanged.
    pub fn is_kept(&self) -> bool {
        matches!(self, AllocationChange::Kept(_))
    }

    /// Flattens the change into the list of surviving allocations.
    pub fn into_allocations(self) -> Vec<Allocation> {
        match self {
            AllocationChange::Kept(alloc) => vec![alloc],
            AllocationChange::Replaced(pieces) => pieces,
        }
    }
}

/// Applies `leave` to `alloc`, reporting whether the allocation was kept or replaced.
///
/// Overlap is checked on dates only; callers decide whether the leave is a
/// full-day leave that should disturb allocations at all.
pub fn adjust_for_leave(alloc: &Allocation, leave: &Leave) -> AllocationChange {
    if !alloc.overlaps(leave.start_date, leave.end_date) {
        return AllocationChange::Kept(alloc.clone());
    }
    AllocationChange::Replaced(split_allocation(alloc, leave.start_date, leave.end_date).outside())
}

/// Returns the allocation(s) remaining after removing the leave's span.
///
/// - No overlap: the original allocation, identity preserved.
/// - Partial overlap: the `pre` and/or `post` pieces with fresh ids.
/// - Leave covers the allocation: an empty list.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Allocation, AllocationStatus, Leave, LeaveType};
/// use allocation_engine::planning::adjust_allocation_for_leave;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let alloc = Allocation {
///     id: "alloc_001".to_string(),
///     developer_id: "dev_001".to_string(),
///     project_id: "proj_001".to_string(),
///     start_date: d(1, 1),
///     end_date: d(6, 30),
///     load: 100,
///     status: AllocationStatus::Confirmed,
/// };
/// let leave = Leave {
///     id: "leave_001".to_string(),
///     developer_id: "dev_001".to_string(),
///     start_date: d(2, 16),
///     end_date: d(2, 20),
///     leave_type: LeaveType::Vacation,
///     hours: None,
/// };
///
/// let remaining = adjust_allocation_for_leave(&alloc, &leave);
/// assert_eq!(remaining.len(), 2);
/// assert_eq!((remaining[0].start_date, remaining[0].end_date), (d(1, 1), d(2, 15)));
/// assert_eq!((remaining[1].start_date, remaining[1].end_date), (d(2, 21), d(6, 30)));
/// ```
pub fn adjust_allocation_for_leave(alloc: &Allocation, leave: &Leave) -> Vec<Allocation> {
    adjust_for_leave(alloc, leave).into_allocations()
}
