//! Configuration loading for the allocation engine.
//!
//! This module loads planner settings, public holiday calendars and optional
//! seed data from a directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use allocation_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded planner: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DetectionConfig, EngineConfig, Holiday, HolidayCalendar, PlannerConfig, PlannerMetadata,
    ReconciliationConfig, ServerConfig,
};
