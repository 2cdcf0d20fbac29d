//! Conflict records derived by the detection sweep.
//!
//! Conflicts are recomputed from a snapshot on every pass and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Allocation, Leave};

/// What kind of scheduling problem a conflict describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Total active load exceeds the developer's capacity.
    Overload,
    /// Work is booked while the developer is on leave.
    LeaveConflict,
}

impl ConflictType {
    /// Short tag used when synthesizing conflict ids.
    pub fn tag(&self) -> &'static str {
        match self {
            ConflictType::Overload => "overload",
            ConflictType::LeaveConflict => "leave_conflict",
        }
    }
}

/// How urgently a conflict needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth looking at.
    Medium,
    /// Needs resolving.
    High,
}

/// A consolidated period during which a developer is overloaded or booked
/// against leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Synthesized from type, developer and start date.
    pub id: String,
    /// The kind of conflict.
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// Urgency.
    pub severity: Severity,
    /// The affected developer.
    pub developer_id: String,
    /// The affected developer's display name.
    pub developer_name: String,
    /// First conflicting day (inclusive).
    pub start_date: NaiveDate,
    /// Last conflicting day (inclusive).
    pub end_date: NaiveDate,
    /// Formatted date range, e.g. `2026-01-15 to 2026-03-01`.
    pub period_label: String,
    /// Human-readable description of the first conflicting segment. A leave
    /// conflict names only its first allocation and leave.
    pub details: String,
    /// Allocations active throughout the conflict.
    pub allocations: Vec<Allocation>,
    /// Leaves active during the conflict.
    pub leaves: Vec<Leave>,
}

impl Conflict {
    /// Sorted ids of the involved allocations.
    pub fn allocation_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.allocations.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}
