//! In-memory persistence for planning records.
//!
//! The planning core never touches storage. This module owns the single
//! mutable copy of the records, hands out snapshots, and applies change sets
//! atomically with optimistic version checks.

mod bulk;
mod cache;
mod memory;

pub use bulk::{
    BulkResolveOutcome, BulkResolveRequest, LeaveChanges, bulk_resolve, bulk_resolve_with,
    plan_bulk_resolve, validate_request,
};
pub use cache::{CachedEntity, CachedList, EntityKind, SnapshotCache};
pub use memory::{ChangeSet, PlannerStore};
