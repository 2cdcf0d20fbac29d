//! Planning logic for the allocation engine.
//!
//! Everything in this module is pure: it takes planning records by reference
//! and returns new records or instructions, leaving persistence to the
//! [`store`](crate::store) layer.
//!
//! - [`interval`]: overlap tests, business days and calendar bucketing
//! - [`splitter`]: cutting an allocation around a window
//! - [`leave_adjustment`]: shaping one allocation around one leave
//! - [`reconciliation`]: the batch create/delete plan for a change
//! - [`conflict_detection`]: the overload and leave conflict sweep
//! - [`resolution`]: user-driven fixes for detected conflicts

pub mod conflict_detection;
pub mod interval;
pub mod leave_adjustment;
pub mod reconciliation;
pub mod resolution;
pub mod splitter;

pub use conflict_detection::{
    DEFAULT_HIGH_SEVERITY_LOAD, DEFAULT_SCAN_WEEKS, DetectionSettings, detect_conflicts,
    detect_conflicts_with,
};
pub use interval::{
    WeekBucket, business_days, format_period, is_overlapping, month_range, weeks_for_month,
};
pub use leave_adjustment::{AllocationChange, adjust_allocation_for_leave, adjust_for_leave};
pub use reconciliation::{SplitInput, SplitPlan, calculate_splits, find_leave_overlaps};
pub use resolution::{auto_balance, find_alternative_developer, reassign, split_around_leave};
pub use splitter::{SplitSegments, split_allocation};
