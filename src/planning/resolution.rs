//! Manual conflict resolution actions.
//!
//! These are user-driven counterparts of reconciliation: a person picks the
//! cut window (a conflict period or a specific leave) and the action produces
//! the same create/delete instructions reconciliation does.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::models::{Allocation, Developer, Leave};

use super::reconciliation::SplitPlan;
use super::splitter::split_allocation;

/// Scales every allocation of `developer` overlapping `[window_start, window_end]`
/// so the window fits within the developer's capacity.
///
/// Each impacted allocation is split around the window. The piece inside the
/// window gets `floor(load * capacity% / total%)`; the pieces outside keep
/// their load. Originals are deleted.
///
/// Returns an empty plan when nothing overlaps the window, the developer is
/// not overloaded there, or the window is inverted.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Allocation, AllocationStatus, Developer};
/// use allocation_engine::planning::auto_balance;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let dev = Developer {
///     id: "dev_001".to_string(),
///     name: "Ada".to_string(),
///     role: String::new(),
///     capacity: Decimal::ONE,
///     daily_rate: Decimal::ZERO,
///     is_placeholder: false,
/// };
/// let alloc = |id: &str, load| Allocation {
///     id: id.to_string(),
///     developer_id: "dev_001".to_string(),
///     project_id: format!("proj_{}", id),
///     start_date: d(3, 2),
///     end_date: d(3, 6),
///     load,
///     status: AllocationStatus::Confirmed,
/// };
///
/// let plan = auto_balance(&dev, &[alloc("a", 100), alloc("b", 100)], d(3, 2), d(3, 6));
/// assert_eq!(plan.to_delete.len(), 2);
/// assert!(plan.to_create.iter().all(|a| a.load == 50));
/// ```
pub fn auto_balance(
    developer: &Developer,
    allocations: &[Allocation],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> SplitPlan {
    if window_start > window_end {
        return SplitPlan::default();
    }

    let impacted: Vec<&Allocation> = allocations
        .iter()
        .filter(|a| a.developer_id == developer.id && a.overlaps(window_start, window_end))
        .collect();

    let total_load: u32 = impacted.iter().map(|a| a.load).sum();
    let capacity = developer.capacity_percent();
    if impacted.is_empty() || Decimal::from(total_load) <= capacity {
        return SplitPlan::default();
    }

    let factor = capacity / Decimal::from(total_load);
    let mut plan = SplitPlan::default();
    for alloc in impacted {
        let balanced = (Decimal::from(alloc.load) * factor)
            .floor()
            .to_u32()
            .unwrap_or(0);
        debug!(
            allocation_id = %alloc.id,
            from = alloc.load,
            to = balanced,
            "balancing allocation inside window"
        );
        plan.to_delete.push(alloc.id.clone());
        plan.to_create.extend(
            split_allocation(alloc, window_start, window_end)
                .with_during_load(balanced)
                .into_vec(),
        );
    }
    plan
}

/// Replaces `alloc` with its pieces before and after `leave`.
///
/// Returns an empty plan if the two do not overlap.
pub fn split_around_leave(alloc: &Allocation, leave: &Leave) -> SplitPlan {
    if !alloc.overlaps(leave.start_date, leave.end_date) {
        return SplitPlan::default();
    }
    SplitPlan {
        to_create: split_allocation(alloc, leave.start_date, leave.end_date).outside(),
        to_delete: vec![alloc.id.clone()],
    }
}

/// Finds someone else who could take over `alloc` for its whole range.
///
/// The first developer in `developers` who is not the current assignee, is
/// not a placeholder, has capacity for the allocation's load, and has no
/// allocation overlapping its range.
pub fn find_alternative_developer<'a>(
    alloc: &Allocation,
    developers: &'a [Developer],
    allocations: &[Allocation],
) -> Option<&'a Developer> {
    developers.iter().find(|dev| {
        dev.id != alloc.developer_id
            && !dev.is_placeholder
            && dev.capacity_percent() >= Decimal::from(alloc.load)
            && !allocations
                .iter()
                .any(|a| a.developer_id == dev.id && a.overlaps(alloc.start_date, alloc.end_date))
    })
}

/// Returns `alloc` reassigned to another developer, keeping its id.
///
/// Submit the result as an allocation update so it is shaped against the new
/// developer's leaves.
pub fn reassign(alloc: &Allocation, developer_id: &str) -> Allocation {
    Allocation {
        developer_id: developer_id.to_string(),
        ..alloc.clone()
    }
}
