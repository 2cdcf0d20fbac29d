//! Read-through cache of entity lists, invalidated by entity kind.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::models::{Allocation, Developer, Leave, PlanningSnapshot, Project};

/// The kinds of records a change can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Developer records.
    Developers,
    /// Project records.
    Projects,
    /// Allocation records.
    Allocations,
    /// Leave records.
    Leaves,
}

/// A cached list for one entity kind.
#[derive(Debug, Clone)]
pub enum CachedList {
    /// Cached developers.
    Developers(Arc<Vec<Developer>>),
    /// Cached projects.
    Projects(Arc<Vec<Project>>),
    /// Cached allocations.
    Allocations(Arc<Vec<Allocation>>),
    /// Cached leaves.
    Leaves(Arc<Vec<Leave>>),
}

impl CachedList {
    /// The entity kind this list holds.
    pub fn kind(&self) -> EntityKind {
        match self {
            CachedList::Developers(_) => EntityKind::Developers,
            CachedList::Projects(_) => EntityKind::Projects,
            CachedList::Allocations(_) => EntityKind::Allocations,
            CachedList::Leaves(_) => EntityKind::Leaves,
        }
    }
}

/// A record type that can be listed from a snapshot and cached.
pub trait CachedEntity: Clone + Send + Sync + 'static {
    /// The cache slot for this type.
    const KIND: EntityKind;

    /// Borrows this type's records from a snapshot.
    fn list(snapshot: &PlanningSnapshot) -> &[Self];

    /// Wraps a shared list for storage in the cache.
    fn into_cached(list: Arc<Vec<Self>>) -> CachedList;

    /// Extracts a shared list of this type, if `cached` holds one.
    fn from_cached(cached: &CachedList) -> Option<Arc<Vec<Self>>>;
}

macro_rules! cached_entity {
    ($ty:ty, $variant:ident, $field:ident) => {
        impl CachedEntity for $ty {
            const KIND: EntityKind = EntityKind::$variant;

            fn list(snapshot: &PlanningSnapshot) -> &[Self] {
                &snapshot.$field
            }

            fn into_cached(list: Arc<Vec<Self>>) -> CachedList {
                CachedList::$variant(list)
            }

            fn from_cached(cached: &CachedList) -> Option<Arc<Vec<Self>>> {
                match cached {
                    CachedList::$variant(list) => Some(Arc::clone(list)),
                    _ => None,
                }
            }
        }
    };
}

cached_entity!(Developer, Developers, developers);
cached_entity!(Project, Projects, projects);
cached_entity!(Allocation, Allocations, allocations);
cached_entity!(Leave, Leaves, leaves);

/// Per-kind cache of entity lists.
///
/// Lists are filled on first read and dropped whenever a change touching
/// their kind is applied.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: DashMap<EntityKind, CachedList>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached list for `T`, if present.
    pub fn get<T: CachedEntity>(&self) -> Option<Arc<Vec<T>>> {
        self.entries.get(&T::KIND).and_then(|entry| T::from_cached(entry.value()))
    }

    /// Stores a list, replacing any previous entry of the same kind.
    pub fn put(&self, list: CachedList) {
        self.entries.insert(list.kind(), list);
    }

    /// Drops the cached lists for `kinds`.
    pub fn invalidate(&self, kinds: &[EntityKind]) {
        for kind in kinds {
            self.entries.remove(kind);
        }
    }

    /// Returns true if a list for `kind` is cached.
    pub fn contains(&self, kind: EntityKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Number of cached kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
