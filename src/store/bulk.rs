//! Bulk resolution: read a snapshot, compute the reconciled change set,
//! apply it atomically, and retry if the store moved underneath.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Allocation, Leave, PlanningSnapshot};
use crate::planning::{SplitInput, SplitPlan, calculate_splits};

use super::memory::{ChangeSet, PlannerStore};

/// Leave edits carried by a [`BulkResolveRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveChanges {
    /// Leave ids to remove.
    pub to_delete: Vec<String>,
    /// New leaves.
    pub to_create: Vec<Leave>,
    /// Replacement versions of existing leaves.
    pub to_update: Vec<Leave>,
}

/// A caller-assembled set of edits to reconcile and apply together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkResolveRequest {
    /// Allocation ids to remove.
    pub to_delete: Vec<String>,
    /// New allocations. Shaped around leaves before they are stored.
    pub to_create: Vec<Allocation>,
    /// Replacement versions of existing allocations.
    pub to_update: Vec<Allocation>,
    /// Leave edits.
    pub leaves: LeaveChanges,
    /// Store version the request was computed against. When set, the
    /// request is applied only at that version and is never retried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl BulkResolveRequest {
    /// Returns true if the request carries no edits.
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
            && self.to_create.is_empty()
            && self.to_update.is_empty()
            && self.leaves.to_delete.is_empty()
            && self.leaves.to_create.is_empty()
            && self.leaves.to_update.is_empty()
    }
}

impl From<SplitPlan> for BulkResolveRequest {
    fn from(plan: SplitPlan) -> Self {
        Self {
            to_delete: plan.to_delete,
            to_create: plan.to_create,
            ..Default::default()
        }
    }
}

/// What a successful bulk resolve did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResolveOutcome {
    /// Store version after the apply.
    pub version: u64,
    /// How many compute/apply rounds it took.
    pub attempts: u32,
    /// The change set that was applied.
    pub changes: ChangeSet,
}

/// Checks every record in `request` and that its developers exist.
pub fn validate_request(
    request: &BulkResolveRequest,
    snapshot: &PlanningSnapshot,
) -> EngineResult<()> {
    for alloc in request.to_create.iter().chain(&request.to_update) {
        alloc.validate()?;
        require_developer(snapshot, &alloc.developer_id)?;
    }
    for leave in request.leaves.to_create.iter().chain(&request.leaves.to_update) {
        leave.validate()?;
        require_developer(snapshot, &leave.developer_id)?;
    }
    Ok(())
}

fn require_developer(snapshot: &PlanningSnapshot, id: &str) -> EngineResult<()> {
    match snapshot.developer(id) {
        Some(_) => Ok(()),
        None => Err(EngineError::DeveloperNotFound { id: id.to_string() }),
    }
}

/// Computes the change set for `request` against `snapshot`.
///
/// Allocation updates become a delete of the original plus a creation of the
/// new version, so both creations and updates are shaped around the
/// resulting active leaves. Created and updated leaves cut the stored
/// allocations they overlap.
pub fn plan_bulk_resolve(
    request: &BulkResolveRequest,
    snapshot: &PlanningSnapshot,
) -> EngineResult<ChangeSet> {
    validate_request(request, snapshot)?;

    let leaves = &request.leaves;
    let replaced: HashSet<&str> = leaves
        .to_delete
        .iter()
        .map(String::as_str)
        .chain(leaves.to_update.iter().map(|l| l.id.as_str()))
        .collect();

    let leave_changes: Vec<Leave> = leaves
        .to_update
        .iter()
        .chain(&leaves.to_create)
        .cloned()
        .collect();

    let active_leaves: Vec<Leave> = snapshot
        .leaves
        .iter()
        .filter(|l| !replaced.contains(l.id.as_str()))
        .cloned()
        .chain(leave_changes.iter().cloned())
        .collect();

    let deletion_requests: Vec<String> = dedup(
        request
            .to_delete
            .iter()
            .chain(request.to_update.iter().map(|a| &a.id))
            .cloned(),
    );

    let input = SplitInput {
        new_allocations: request
            .to_create
            .iter()
            .chain(&request.to_update)
            .cloned()
            .collect(),
        active_leaves,
        existing_allocations: snapshot.allocations.clone(),
        deletion_requests: deletion_requests.clone(),
        leave_changes: leave_changes.clone(),
    };
    let plan = calculate_splits(&input);

    Ok(ChangeSet {
        delete_allocations: dedup(deletion_requests.into_iter().chain(plan.to_delete)),
        create_allocations: plan.to_create,
        delete_leaves: leaves.to_delete.clone(),
        upsert_leaves: leave_changes,
    })
}

fn dedup(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}

/// Reconciles and applies `request` against the store.
///
/// Each attempt reads a fresh snapshot and recomputes the change set. A stale
/// apply is retried up to `max_attempts` times in total; the last
/// [`EngineError::StaleSnapshot`] is returned if every attempt loses the race.
/// A request pinned with `expected_version` gets a single attempt at that
/// version.
pub async fn bulk_resolve(
    store: &PlannerStore,
    request: &BulkResolveRequest,
    max_attempts: u32,
) -> EngineResult<BulkResolveOutcome> {
    let max_attempts = match request.expected_version {
        Some(_) => 1,
        None => max_attempts,
    };
    resolve_loop(store, max_attempts, |snapshot| {
        match request.expected_version {
            Some(expected) if expected != snapshot.version => Err(EngineError::StaleSnapshot {
                expected,
                actual: snapshot.version,
            }),
            _ => plan_bulk_resolve(request, snapshot).map(Some),
        }
    })
    .await
}

/// Like [`bulk_resolve`], but the request is built from each attempt's
/// snapshot by `build`.
///
/// Use this when the edits themselves depend on stored state (a resolution
/// plan, an existence check): a retry rebuilds them from the state the apply
/// is checked against. `build` returning `Ok(None)` means there is nothing
/// to do; the store is left alone and the outcome carries the snapshot's
/// version with no changes.
pub async fn bulk_resolve_with<F>(
    store: &PlannerStore,
    max_attempts: u32,
    mut build: F,
) -> EngineResult<BulkResolveOutcome>
where
    F: FnMut(&PlanningSnapshot) -> EngineResult<Option<BulkResolveRequest>>,
{
    resolve_loop(store, max_attempts, |snapshot| match build(snapshot)? {
        Some(request) if !request.is_empty() => plan_bulk_resolve(&request, snapshot).map(Some),
        _ => Ok(None),
    })
    .await
}

async fn resolve_loop<F>(
    store: &PlannerStore,
    max_attempts: u32,
    mut compute: F,
) -> EngineResult<BulkResolveOutcome>
where
    F: FnMut(&PlanningSnapshot) -> EngineResult<Option<ChangeSet>>,
{
    let max_attempts = max_attempts.max(1);
    let started = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let snapshot = store.snapshot().await;
        let Some(changes) = compute(&snapshot)? else {
            info!(version = snapshot.version, attempts, "bulk resolve found nothing to apply");
            return Ok(BulkResolveOutcome {
                version: snapshot.version,
                attempts,
                changes: ChangeSet::default(),
            });
        };

        match store.apply(&changes, snapshot.version).await {
            Ok(version) => {
                info!(
                    version,
                    attempts,
                    to_create = changes.create_allocations.len(),
                    to_delete = changes.delete_allocations.len(),
                    duration_us = started.elapsed().as_micros() as u64,
                    "bulk resolve applied"
                );
                return Ok(BulkResolveOutcome {
                    version,
                    attempts,
                    changes,
                });
            }
            Err(EngineError::StaleSnapshot { expected, actual }) if attempts < max_attempts => {
                warn!(expected, actual, attempts, "snapshot went stale, recomputing");
            }
            Err(e) => return Err(e),
        }
    }
}
