//! Versioned in-memory planning store.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{Allocation, Leave, PlanningSnapshot};

use super::cache::{CachedEntity, EntityKind, SnapshotCache};

/// A batch of mutations applied to the store in one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSet {
    /// Allocation ids to remove. Unknown ids are ignored.
    pub delete_allocations: Vec<String>,
    /// Allocations to insert after deletions.
    pub create_allocations: Vec<Allocation>,
    /// Leave ids to remove. Unknown ids are ignored.
    pub delete_leaves: Vec<String>,
    /// Leaves to insert, replacing any stored leave with the same id.
    pub upsert_leaves: Vec<Leave>,
}

impl ChangeSet {
    /// Returns true if applying the change set would change nothing.
    pub fn is_empty(&self) -> bool {
        self.delete_allocations.is_empty()
            && self.create_allocations.is_empty()
            && self.delete_leaves.is_empty()
            && self.upsert_leaves.is_empty()
    }

    /// The entity kinds this change set modifies.
    pub fn touched_kinds(&self) -> Vec<EntityKind> {
        let mut kinds = Vec::new();
        if !self.delete_allocations.is_empty() || !self.create_allocations.is_empty() {
            kinds.push(EntityKind::Allocations);
        }
        if !self.delete_leaves.is_empty() || !self.upsert_leaves.is_empty() {
            kinds.push(EntityKind::Leaves);
        }
        kinds
    }

    fn apply_to(&self, state: &mut PlanningSnapshot) {
        let deleted: HashSet<&str> = self.delete_allocations.iter().map(String::as_str).collect();
        state.allocations.retain(|a| !deleted.contains(a.id.as_str()));
        state
            .allocations
            .extend(self.create_allocations.iter().cloned());

        let deleted: HashSet<&str> = self.delete_leaves.iter().map(String::as_str).collect();
        state.leaves.retain(|l| !deleted.contains(l.id.as_str()));
        for leave in &self.upsert_leaves {
            match state.leaves.iter_mut().find(|l| l.id == leave.id) {
                Some(existing) => *existing = leave.clone(),
                None => state.leaves.push(leave.clone()),
            }
        }
    }
}

/// The planning store.
///
/// Holds a single [`PlanningSnapshot`] behind an async read/write lock. Every
/// successful [`apply`](Self::apply) bumps the version, so a change computed
/// from an older snapshot can be detected and recomputed.
#[derive(Debug, Default)]
pub struct PlannerStore {
    state: RwLock<PlanningSnapshot>,
    cache: SnapshotCache,
}

impl PlannerStore {
    /// Creates a store seeded with `seed`. The version is taken from the seed.
    pub fn new(seed: PlanningSnapshot) -> Self {
        Self {
            state: RwLock::new(seed),
            cache: SnapshotCache::new(),
        }
    }

    /// Wraps a new store for sharing between tasks.
    pub fn shared(seed: PlanningSnapshot) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Returns a consistent copy of the whole store.
    pub async fn snapshot(&self) -> PlanningSnapshot {
        self.state.read().await.clone()
    }

    /// Returns the current version.
    pub async fn version(&self) -> u64 {
        self.state.read().await.version
    }

    /// Lists every record of type `T`, reading through the entity cache.
    pub async fn list<T: CachedEntity>(&self) -> Arc<Vec<T>> {
        if let Some(cached) = self.cache.get::<T>() {
            return cached;
        }
        // Hold the read guard until the cache is filled so an apply cannot
        // invalidate in between.
        let state = self.state.read().await;
        let list = Arc::new(T::list(&state).to_vec());
        self.cache.put(T::into_cached(Arc::clone(&list)));
        debug!(kind = ?T::KIND, count = list.len(), "cache filled");
        list
    }

    /// Applies `changes` if the store is still at `expected_version`.
    ///
    /// Returns the new version. Fails with [`EngineError::StaleSnapshot`]
    /// without touching the store if another change was applied first.
    pub async fn apply(&self, changes: &ChangeSet, expected_version: u64) -> EngineResult<u64> {
        let mut state = self.state.write().await;
        if state.version != expected_version {
            return Err(EngineError::StaleSnapshot {
                expected: expected_version,
                actual: state.version,
            });
        }

        changes.apply_to(&mut state);
        state.version += 1;
        self.cache.invalidate(&changes.touched_kinds());

        info!(
            version = state.version,
            allocations_deleted = changes.delete_allocations.len(),
            allocations_created = changes.create_allocations.len(),
            leaves_deleted = changes.delete_leaves.len(),
            leaves_upserted = changes.upsert_leaves.len(),
            "change set applied"
        );
        Ok(state.version)
    }

    /// Exposes the cache for inspection.
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }
}
