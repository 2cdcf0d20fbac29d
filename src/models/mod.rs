//! Core data models for the allocation engine.
//!
//! This module contains the planning records (allocations, leaves,
//! developers, projects) and the derived conflict records.

mod allocation;
mod conflict;
mod developer;
mod leave;
mod snapshot;

pub use allocation::{Allocation, AllocationStatus};
pub use conflict::{Conflict, ConflictType, Severity};
pub use developer::{Developer, Project};
pub use leave::{Leave, LeaveType};
pub use snapshot::PlanningSnapshot;

pub(crate) use allocation::generate_id;
