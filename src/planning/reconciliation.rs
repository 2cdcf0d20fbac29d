//! Reconciliation of allocations against full-day leaves.
//!
//! [`calculate_splits`] is the batch operation behind booking leave, editing
//! leave, adding allocations and bulk conflict resolution. It is a pure
//! function: it reads the snapshot it is given and returns the create/delete
//! instructions, which the caller must apply atomically.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Allocation, AllocationStatus, Leave};

use super::leave_adjustment::adjust_allocation_for_leave;

/// Everything reconciliation needs to know about one batch of changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitInput {
    /// Allocations being created or updated in this batch.
    #[serde(default)]
    pub new_allocations: Vec<Allocation>,
    /// The net leave set once this batch is applied.
    #[serde(default)]
    pub active_leaves: Vec<Leave>,
    /// Allocations currently persisted.
    #[serde(default)]
    pub existing_allocations: Vec<Allocation>,
    /// Ids of existing allocations the caller is already deleting.
    #[serde(default)]
    pub deletion_requests: Vec<String>,
    /// Leaves created or updated in this batch, in the order they were supplied.
    #[serde(default)]
    pub leave_changes: Vec<Leave>,
}

/// The instructions produced by reconciliation.
///
/// Apply all deletes, then all creates, inside one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Allocations to insert.
    pub to_create: Vec<Allocation>,
    /// Ids of allocations to remove.
    pub to_delete: Vec<String>,
}

impl SplitPlan {
    /// Returns true if the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }

    /// Applies the plan to an in-memory allocation list: deletes first, then creates.
    pub fn apply_to(&self, existing: &[Allocation]) -> Vec<Allocation> {
        let deleted: HashSet<&str> = self.to_delete.iter().map(String::as_str).collect();
        existing
            .iter()
            .filter(|a| !deleted.contains(a.id.as_str()))
            .chain(self.to_create.iter())
            .cloned()
            .collect()
    }
}

/// Computes the allocations to create and delete so that no allocation
/// overlaps a full-day leave touched by this batch.
///
/// Two passes run in order:
///
/// 1. Every new allocation is folded left-to-right over the developer's
///    active full-day leaves; each leave may further fragment the pieces left
///    by the previous one. Allocations no leave touches keep their id.
/// 2. Every existing allocation that is not already being deleted and that
///    overlaps one of the batch's full-day leave changes for its developer is
///    folded over those leave changes in supplied order, marked for deletion,
///    and replaced by its surviving pieces.
///
/// Re-running reconciliation on its own applied output with the same leave
/// set yields an empty plan.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Allocation, AllocationStatus, Leave, LeaveType};
/// use allocation_engine::planning::{calculate_splits, SplitInput};
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let existing = Allocation {
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
/// let plan = calculate_splits(&SplitInput {
///     active_leaves: vec![leave.clone()],
///     existing_allocations: vec![existing],
///     leave_changes: vec![leave],
///     ..SplitInput::default()
/// });
///
/// assert_eq!(plan.to_delete, vec!["alloc_001".to_string()]);
/// assert_eq!(plan.to_create.len(), 2);
/// ```
pub fn calculate_splits(input: &SplitInput) -> SplitPlan {
    let mut to_delete: Vec<String> = input.deletion_requests.clone();
    let mut deleted: HashSet<&str> = input.deletion_requests.iter().map(String::as_str).collect();

    // Pass A: shape new allocations against the active leave set.
    let mut to_create: Vec<Allocation> = Vec::with_capacity(input.new_allocations.len());
    for alloc in &input.new_allocations {
        let leaves = full_day_leaves_for(&input.active_leaves, &alloc.developer_id);
        let pieces = shape_against(alloc, leaves);
        debug!(
            allocation_id = %alloc.id,
            developer_id = %alloc.developer_id,
            pieces = pieces.len(),
            "shaped new allocation against active leaves"
        );
        to_create.extend(pieces);
    }

    // Pass B: shape existing allocations against this batch's leave changes.
    for victim in &input.existing_allocations {
        if deleted.contains(victim.id.as_str()) {
            continue;
        }

        let changes: Vec<&Leave> =
            full_day_leaves_for(&input.leave_changes, &victim.developer_id).collect();
        if !changes
            .iter()
            .any(|leave| victim.overlaps(leave.start_date, leave.end_date))
        {
            continue;
        }

        let pieces = shape_against(victim, changes.into_iter());
        debug!(
            allocation_id = %victim.id,
            developer_id = %victim.developer_id,
            pieces = pieces.len(),
            "existing allocation cut by leave change"
        );
        deleted.insert(victim.id.as_str());
        to_delete.push(victim.id.clone());
        to_create.extend(pieces);
    }

    SplitPlan {
        to_create,
        to_delete,
    }
}

/// Lists every (allocation id, leave id) pair where a confirmed allocation
/// overlaps a full-day leave of the same developer.
///
/// An empty result means the allocation set is consistent with the leave set.
pub fn find_leave_overlaps(
    allocations: &[Allocation],
    leaves: &[Leave],
) -> Vec<(String, String)> {
    allocations
        .iter()
        .filter(|a| a.status == AllocationStatus::Confirmed)
        .flat_map(|alloc| {
            full_day_leaves_for(leaves, &alloc.developer_id)
                .filter(|leave| alloc.overlaps(leave.start_date, leave.end_date))
                .map(|leave| (alloc.id.clone(), leave.id.clone()))
        })
        .collect()
}

fn full_day_leaves_for<'a>(
    leaves: &'a [Leave],
    developer_id: &'a str,
) -> impl Iterator<Item = &'a Leave> + 'a {
    leaves
        .iter()
        .filter(move |l| l.developer_id == developer_id && l.is_full_day())
}

fn shape_against<'a>(
    alloc: &Allocation,
    leaves: impl Iterator<Item = &'a Leave>,
) -> Vec<Allocation> {
    leaves.fold(vec![alloc.clone()], |pieces, leave| {
        pieces
            .iter()
            .flat_map(|piece| adjust_allocation_for_leave(piece, leave))
            .collect()
    })
}
