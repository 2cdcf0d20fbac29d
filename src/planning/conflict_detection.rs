//! Conflict detection sweep.
//!
//! For each developer the scan window is cut at every date where the set of
//! active allocations or leaves changes. Each resulting segment is classified
//! as a leave conflict, an overload, or clean, and contiguous segments with
//! the same classification and the same allocations are consolidated into a
//! single human-scale conflict.

use std::collections::{BTreeSet, HashSet};

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Allocation, Conflict, ConflictType, Developer, Leave, Project, Severity};

use super::interval::{format_period, is_overlapping, next_day, previous_day};

/// Default number of weeks scanned from the scan start.
pub const DEFAULT_SCAN_WEEKS: u32 = 12;

/// Total load (percent) above which an overload is high severity.
pub const DEFAULT_HIGH_SEVERITY_LOAD: u32 = 120;

/// Tuning for a detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Length of the scan window in weeks.
    pub scan_weeks: u32,
    /// First day of the scan window.
    pub scan_start: NaiveDate,
    /// Overloads above this total load are [`Severity::High`].
    pub high_severity_load: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            scan_weeks: DEFAULT_SCAN_WEEKS,
            scan_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            high_severity_load: DEFAULT_HIGH_SEVERITY_LOAD,
        }
    }
}

impl DetectionSettings {
    /// Returns the exclusive end of the scan window.
    pub fn scan_end(&self) -> NaiveDate {
        self.scan_start
            .checked_add_days(Days::new(u64::from(self.scan_weeks) * 7))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Detects conflicts over `scan_weeks` weeks starting at `scan_start`,
/// with the default severity threshold.
///
/// # Example
///
/// ```
/// use allocation_engine::models::{Allocation, AllocationStatus, Developer};
/// use allocation_engine::planning::detect_conflicts;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let dev = Developer {
///     id: "dev_001".to_string(),
///     name: "Ada".to_string(),
///     role: "Backend".to_string(),
///     capacity: Decimal::ONE,
///     daily_rate: Decimal::ZERO,
///     is_placeholder: false,
/// };
/// let alloc = |id: &str, load| Allocation {
///     id: id.to_string(),
///     developer_id: "dev_001".to_string(),
///     project_id: "proj_001".to_string(),
///     start_date: d(1, 15),
///     end_date: d(2, 27),
///     load,
///     status: AllocationStatus::Confirmed,
/// };
///
/// let conflicts = detect_conflicts(&[dev], &[alloc("a", 60), alloc("b", 60)], &[], &[], 12, d(1, 1));
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].period_label, "2026-01-15 to 2026-02-27");
/// ```
pub fn detect_conflicts(
    developers: &[Developer],
    allocations: &[Allocation],
    leaves: &[Leave],
    projects: &[Project],
    scan_weeks: u32,
    scan_start: NaiveDate,
) -> Vec<Conflict> {
    let settings = DetectionSettings {
        scan_weeks,
        scan_start,
        high_severity_load: DEFAULT_HIGH_SEVERITY_LOAD,
    };
    detect_conflicts_with(developers, allocations, leaves, projects, &settings)
}

/// Detects conflicts for every developer, in developer order, using explicit settings.
pub fn detect_conflicts_with(
    developers: &[Developer],
    allocations: &[Allocation],
    leaves: &[Leave],
    projects: &[Project],
    settings: &DetectionSettings,
) -> Vec<Conflict> {
    developers
        .iter()
        .flat_map(|dev| {
            let dev_allocs: Vec<&Allocation> = allocations
                .iter()
                .filter(|a| a.developer_id == dev.id)
                .collect();
            let dev_leaves: Vec<&Leave> =
                leaves.iter().filter(|l| l.developer_id == dev.id).collect();
            scan_developer(dev, &dev_allocs, &dev_leaves, projects, settings)
        })
        .collect()
}

/// A classified segment before consolidation.
struct RawConflict {
    conflict_type: ConflictType,
    severity: Severity,
    start: NaiveDate,
    end: NaiveDate,
    /// For leave conflicts, names only the first active allocation and the
    /// first overlapping leave; `allocations` and `leaves` hold the full sets.
    details: String,
    allocations: Vec<Allocation>,
    leaves: Vec<Leave>,
}

impl RawConflict {
    fn allocation_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.allocations.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    fn continues_into(&self, next: &RawConflict) -> bool {
        next_day(self.end) == Some(next.start)
            && self.conflict_type == next.conflict_type
            && self.allocation_ids() == next.allocation_ids()
    }

    fn absorb(&mut self, next: RawConflict) {
        self.end = next.end;
        self.severity = self.severity.max(next.severity);
        let known: HashSet<String> = self.leaves.iter().map(|l| l.id.clone()).collect();
        self.leaves
            .extend(next.leaves.into_iter().filter(|l| !known.contains(&l.id)));
    }

    fn finish(self, dev: &Developer) -> Conflict {
        Conflict {
            id: format!("{}-{}-{}", self.conflict_type.tag(), dev.id, self.start),
            conflict_type: self.conflict_type,
            severity: self.severity,
            developer_id: dev.id.clone(),
            developer_name: dev.name.clone(),
            start_date: self.start,
            end_date: self.end,
            period_label: format_period(self.start, self.end),
            details: self.details,
            allocations: self.allocations,
            leaves: self.leaves,
        }
    }
}

fn scan_developer(
    dev: &Developer,
    allocations: &[&Allocation],
    leaves: &[&Leave],
    projects: &[Project],
    settings: &DetectionSettings,
) -> Vec<Conflict> {
    if allocations.is_empty() && leaves.is_empty() {
        return Vec::new();
    }

    let scan_start = settings.scan_start;
    let scan_end = settings.scan_end();
    let in_window = |date: NaiveDate| date >= scan_start && date <= scan_end;

    let mut boundaries = BTreeSet::from([scan_start, scan_end]);
    let spans = allocations
        .iter()
        .map(|a| (a.start_date, a.end_date))
        .chain(leaves.iter().map(|l| (l.start_date, l.end_date)));
    for (start, end) in spans {
        if in_window(start) {
            boundaries.insert(start);
        }
        if let Some(after) = next_day(end).filter(|d| in_window(*d)) {
            boundaries.insert(after);
        }
    }

    let capacity = dev.capacity_percent();
    let boundaries: Vec<NaiveDate> = boundaries.into_iter().collect();
    let mut raw: Vec<RawConflict> = Vec::new();

    for pair in boundaries.windows(2) {
        let seg_start = pair[0];
        let Some(seg_end) = previous_day(pair[1]).filter(|end| *end >= seg_start) else {
            continue;
        };

        let active_allocs: Vec<Allocation> = allocations
            .iter()
            .filter(|a| a.overlaps(seg_start, seg_end))
            .map(|a| (*a).clone())
            .collect();
        if active_allocs.is_empty() {
            continue;
        }
        let active_leaves: Vec<Leave> = leaves
            .iter()
            .filter(|l| is_overlapping(l.start_date, l.end_date, seg_start, seg_end))
            .map(|l| (*l).clone())
            .collect();

        let total_load: u32 = active_allocs.iter().map(|a| a.load).sum();

        if let Some(leave) = active_leaves.first() {
            let first = &active_allocs[0];
            raw.push(RawConflict {
                conflict_type: ConflictType::LeaveConflict,
                severity: Severity::High,
                start: seg_start,
                end: seg_end,
                details: format!(
                    "Booked for {}% on {} during {}",
                    first.load,
                    project_name(projects, &first.project_id),
                    leave.leave_type
                ),
                allocations: active_allocs,
                leaves: active_leaves,
            });
        } else if Decimal::from(total_load) > capacity {
            let severity = if total_load > settings.high_severity_load {
                Severity::High
            } else {
                Severity::Medium
            };
            raw.push(RawConflict {
                conflict_type: ConflictType::Overload,
                severity,
                start: seg_start,
                end: seg_end,
                details: format!(
                    "Allocated {}% (capacity {}%)",
                    total_load,
                    capacity.normalize()
                ),
                allocations: active_allocs,
                leaves: active_leaves,
            });
        }
    }

    consolidate(raw)
        .into_iter()
        .map(|c| c.finish(dev))
        .collect()
}

fn consolidate(raw: Vec<RawConflict>) -> Vec<RawConflict> {
    let mut merged: Vec<RawConflict> = Vec::with_capacity(raw.len());
    for next in raw {
        match merged.last_mut() {
            Some(current) if current.continues_into(&next) => current.absorb(next),
            _ => merged.push(next),
        }
    }
    merged
}

fn project_name<'a>(projects: &'a [Project], project_id: &'a str) -> &'a str {
    projects
        .iter()
        .find(|p| p.id == project_id)
        .map(|p| p.name.as_str())
        .unwrap_or(project_id)
}
