//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading planner
//! configuration, holiday calendars and seed data from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::PlanningSnapshot;
use crate::planning::DetectionSettings;
use crate::planning::interval::is_weekday;

use super::types::{EngineConfig, Holiday, HolidayCalendar, PlannerConfig, PlannerMetadata};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── planner.yaml        # Metadata, detection, reconciliation and server settings
/// ├── seed.yaml           # Optional initial developers, projects, allocations, leaves
/// └── holidays/
///     └── 2026.yaml       # Public holidays excluded from business-day counts
/// ```
///
/// # Example
///
/// ```no_run
/// use allocation_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Loaded planner: {}", loader.metadata().name);
/// # Ok::<(), allocation_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    seed: PlanningSnapshot,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `planner.yaml` is missing, or if any present file
    /// contains invalid YAML. The `holidays/` directory and `seed.yaml` are
    /// optional.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let planner = Self::load_yaml::<PlannerConfig>(&path.join("planner.yaml"))?;
        let calendars = Self::load_holidays(&path.join("holidays"))?;

        let seed_path = path.join("seed.yaml");
        let seed = if seed_path.exists() {
            Self::load_yaml::<PlanningSnapshot>(&seed_path)?
        } else {
            PlanningSnapshot::default()
        };

        Ok(Self {
            config: EngineConfig::new(planner, calendars),
            seed,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every calendar file from the holidays directory, if it exists.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<Vec<HolidayCalendar>> {
        if !holidays_dir.exists() {
            return Ok(Vec::new());
        }

        let dir_str = holidays_dir.display().to_string();
        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .iter()
            .map(|p| Self::load_yaml::<HolidayCalendar>(p))
            .collect()
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the planner metadata.
    pub fn metadata(&self) -> &PlannerMetadata {
        &self.config.planner().metadata
    }

    /// Returns the seed snapshot (empty if no `seed.yaml` was present).
    pub fn seed(&self) -> &PlanningSnapshot {
        &self.seed
    }

    /// Detection settings from the `detection` section.
    pub fn detection_settings(&self) -> DetectionSettings {
        let detection = &self.config.planner().detection;
        DetectionSettings {
            scan_weeks: detection.scan_weeks,
            scan_start: detection.scan_start,
            high_severity_load: detection.high_severity_load,
        }
    }

    /// Maximum compute/apply rounds for a bulk resolve.
    pub fn max_apply_attempts(&self) -> u32 {
        self.config.planner().reconciliation.max_apply_attempts
    }

    /// Socket address the server should bind.
    pub fn bind_address(&self) -> &str {
        &self.config.planner().server.bind
    }

    /// Counts weekdays in `[start, end]` that are not configured holidays.
    ///
    /// ```no_run
    /// use allocation_engine::config::ConfigLoader;
    /// use chrono::NaiveDate;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    /// println!("{} working days", loader.business_days(start, end));
    /// # Ok::<(), allocation_engine::error::EngineError>(())
    /// ```
    pub fn business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| is_weekday(*d) && !self.config.is_holiday(*d))
            .count() as u32
    }

    /// Holidays falling within `[start, end]`, in date order.
    pub fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Holiday> {
        let mut holidays: Vec<&Holiday> = self
            .config
            .calendars()
            .iter()
            .flat_map(|c| c.holidays.iter())
            .filter(|h| h.date >= start && h.date <= end)
            .collect();
        holidays.sort_by_key(|h| h.date);
        holidays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_default_config() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.metadata().name, "Default Planner");
        assert_eq!(loader.max_apply_attempts(), 3);
        assert_eq!(loader.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_detection_settings_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let settings = loader.detection_settings();

        assert_eq!(settings.scan_weeks, 12);
        assert_eq!(settings.scan_start, make_date("2026-01-01"));
        assert_eq!(settings.high_severity_load, 120);
    }

    #[test]
    fn test_seed_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let seed = loader.seed();

        assert!(!seed.developers.is_empty());
        assert!(seed.developer("dev_001").is_some());
        assert!(!seed.allocations.is_empty());
    }

    #[test]
    fn test_business_days_excludes_holidays() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        // January 2026 has 22 weekdays; New Year's Day and Australia Day fall on weekdays
        assert_eq!(
            loader.business_days(make_date("2026-01-01"), make_date("2026-01-31")),
            20
        );
        assert_eq!(
            loader.business_days(make_date("2026-01-31"), make_date("2026-01-01")),
            0
        );
    }

    #[test]
    fn test_holidays_between() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let holidays = loader.holidays_between(make_date("2026-01-01"), make_date("2026-01-31"));

        let names: Vec<&str> = holidays.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["New Year's Day", "Australia Day"]);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("planner.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
