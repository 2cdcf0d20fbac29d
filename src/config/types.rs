//! Configuration types for the allocation engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::planning::{DEFAULT_HIGH_SEVERITY_LOAD, DEFAULT_SCAN_WEEKS, DetectionSettings};

/// Identifying information about a planner deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerMetadata {
    /// Human-readable name of the deployment.
    pub name: String,
    /// Configuration version.
    pub version: String,
}

/// Conflict detection section of `planner.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Length of the scan window in weeks.
    pub scan_weeks: u32,
    /// First day of the scan window.
    pub scan_start: NaiveDate,
    /// Overloads above this total load percentage are high severity.
    pub high_severity_load: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let defaults = DetectionSettings::default();
        Self {
            scan_weeks: DEFAULT_SCAN_WEEKS,
            scan_start: defaults.scan_start,
            high_severity_load: DEFAULT_HIGH_SEVERITY_LOAD,
        }
    }
}

/// Reconciliation section of `planner.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// How many times a bulk resolve recomputes after losing a race.
    pub max_apply_attempts: u32,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            max_apply_attempts: 3,
        }
    }
}

/// Server section of `planner.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Contents of `planner.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Deployment metadata.
    pub metadata: PlannerMetadata,
    /// Conflict detection tuning.
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Reconciliation tuning.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// A named public holiday.
#[derive(Debug, Clone, Deserialize)]
pub struct Holiday {
    /// The holiday's date.
    pub date: NaiveDate,
    /// Display name.
    pub name: String,
}

/// One file under `holidays/`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// Region or calendar name.
    pub region: String,
    /// Holidays in this calendar.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    planner: PlannerConfig,
    calendars: Vec<HolidayCalendar>,
    holiday_dates: BTreeSet<NaiveDate>,
}

impl EngineConfig {
    /// Creates an EngineConfig from its component parts.
    pub fn new(planner: PlannerConfig, calendars: Vec<HolidayCalendar>) -> Self {
        let holiday_dates = calendars
            .iter()
            .flat_map(|c| c.holidays.iter().map(|h| h.date))
            .collect();
        Self {
            planner,
            calendars,
            holiday_dates,
        }
    }

    /// Returns the `planner.yaml` contents.
    pub fn planner(&self) -> &PlannerConfig {
        &self.planner
    }

    /// Returns all loaded holiday calendars.
    pub fn calendars(&self) -> &[HolidayCalendar] {
        &self.calendars
    }

    /// Returns true if `date` is a configured public holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_dates.contains(&date)
    }
}
