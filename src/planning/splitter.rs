//! Allocation splitting around a cut window.
//!
//! Splitting decomposes one allocation into up to three date-disjoint
//! copies: the part before the window, the part inside it, and the part
//! after it. Every produced copy carries a fresh id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Allocation;

use super::interval::{next_day, previous_day};

/// The pieces of an allocation cut by a window.
///
/// Any piece may be absent. Pieces never overlap each other, and together
/// they cover exactly the original allocation's range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSegments {
    /// The part strictly before the window.
    pub pre: Option<Allocation>,
    /// The intersection with the window.
    pub during: Option<Allocation>,
    /// The part strictly after the window.
    pub post: Option<Allocation>,
}

impl SplitSegments {
    /// Overrides the load of the `during` piece, leaving `pre`/`post` untouched.
    ///
    /// Used for proportional auto-balancing inside a conflict window.
    pub fn with_during_load(mut self, load: u32) -> Self {
        if let Some(during) = self.during.as_mut() {
            during.load = load;
        }
        self
    }

    /// Returns the pieces outside the window (`pre`, then `post`).
    pub fn outside(self) -> Vec<Allocation> {
        self.pre.into_iter().chain(self.post).collect()
    }

    /// Returns all present pieces in chronological order.
    pub fn into_vec(self) -> Vec<Allocation> {
        self.pre
            .into_iter()
            .chain(self.during)
            .chain(self.post)
            .collect()
    }

    /// Returns true if no piece was produced.
    pub fn is_empty(&self) -> bool {
        self.pre.is_none() && self.during.is_none() && self.post.is_none()
    }
}

/// Splits `alloc` around the inclusive window `[cut_start, cut_end]`.
///
/// - `pre` is produced when the allocation starts before the window and ends
///   the day before `cut_start` (or at the allocation's own end, whichever is
///   earlier).
/// - `during` is the intersection of the allocation with the window and is
///   produced whenever they overlap.
/// - `post` is produced when the allocation ends after the window and starts
///   the day after `cut_end` (or at the allocation's own start, whichever is
///   later).
///
/// A piece whose range would be inverted is suppressed. An inverted window is
/// treated as empty, so the whole allocation comes back as `pre`.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Allocation, AllocationStatus};
/// use allocation_engine::planning::split_allocation;
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
///
/// let segments = split_allocation(&alloc, d(2, 16), d(2, 20)).with_during_load(50);
///
/// let pre = segments.pre.unwrap();
/// let during = segments.during.unwrap();
/// let post = segments.post.unwrap();
/// assert_eq!((pre.start_date, pre.end_date, pre.load), (d(1, 1), d(2, 15), 100));
/// assert_eq!((during.start_date, during.end_date, during.load), (d(2, 16), d(2, 20), 50));
/// assert_eq!((post.start_date, post.end_date, post.load), (d(2, 21), d(6, 30), 100));
/// ```
pub fn split_allocation(
    alloc: &Allocation,
    cut_start: NaiveDate,
    cut_end: NaiveDate,
) -> SplitSegments {
    if cut_start > cut_end {
        return SplitSegments {
            pre: segment(alloc, alloc.start_date, alloc.end_date),
            ..SplitSegments::default()
        };
    }

    let pre = if alloc.start_date < cut_start {
        previous_day(cut_start)
            .and_then(|day_before| segment(alloc, alloc.start_date, alloc.end_date.min(day_before)))
    } else {
        None
    };

    let during = segment(
        alloc,
        alloc.start_date.max(cut_start),
        alloc.end_date.min(cut_end),
    );

    let post = if alloc.end_date > cut_end {
        next_day(cut_end)
            .and_then(|day_after| segment(alloc, alloc.start_date.max(day_after), alloc.end_date))
    } else {
        None
    };

    SplitSegments { pre, during, post }
}

fn segment(alloc: &Allocation, start: NaiveDate, end: NaiveDate) -> Option<Allocation> {
    (start <= end).then(|| alloc.with_range(start, end))
}
