//! Point-in-time view of everything the planning core reads.

use serde::{Deserialize, Serialize};

use super::{Allocation, Developer, Leave, Project};

/// A consistent, versioned read of the planning records.
///
/// The planning functions never read ambient state; callers hand them a
/// snapshot (or slices of one) explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    /// Store version the snapshot was taken at.
    #[serde(default)]
    pub version: u64,
    /// All developers.
    #[serde(default)]
    pub developers: Vec<Developer>,
    /// All projects.
    #[serde(default)]
    pub projects: Vec<Project>,
    /// All allocations.
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    /// All leaves.
    #[serde(default)]
    pub leaves: Vec<Leave>,
}

impl PlanningSnapshot {
    /// Looks up a developer by id.
    pub fn developer(&self, id: &str) -> Option<&Developer> {
        self.developers.iter().find(|d| d.id == id)
    }

    /// Looks up an allocation by id.
    pub fn allocation(&self, id: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.id == id)
    }

    /// Looks up a leave by id.
    pub fn leave(&self, id: &str) -> Option<&Leave> {
        self.leaves.iter().find(|l| l.id == id)
    }

    /// All allocations belonging to a developer, in snapshot order.
    pub fn allocations_for<'a>(
        &'a self,
        developer_id: &'a str,
    ) -> impl Iterator<Item = &'a Allocation> + 'a {
        self.allocations
            .iter()
            .filter(move |a| a.developer_id == developer_id)
    }

    /// All leaves belonging to a developer, in snapshot order.
    pub fn leaves_for<'a>(
        &'a self,
        developer_id: &'a str,
    ) -> impl Iterator<Item = &'a Leave> + 'a {
        self.leaves
            .iter()
            .filter(move |l| l.developer_id == developer_id)
    }
}
