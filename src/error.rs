//! Error types for the allocation engine.
//!
//! The planning core is total over its input domain and never fails; these
//! errors come from configuration loading, request validation and the
//! atomic apply step of the store.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the allocation engine.
///
/// # Example
///
/// ```
/// use allocation_engine::error::EngineError;
///
/// let error = EngineError::DeveloperNotFound {
///     id: "dev_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Developer not found: dev_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A referenced developer does not exist.
    #[error("Developer not found: {id}")]
    DeveloperNotFound {
        /// The developer id that was not found.
        id: String,
    },

    /// A referenced allocation does not exist.
    #[error("Allocation not found: {id}")]
    AllocationNotFound {
        /// The allocation id that was not found.
        id: String,
    },

    /// A referenced leave does not exist.
    #[error("Leave not found: {id}")]
    LeaveNotFound {
        /// The leave id that was not found.
        id: String,
    },

    /// An allocation record was malformed.
    #[error("Invalid allocation '{allocation_id}': {message}")]
    InvalidAllocation {
        /// The id of the offending allocation.
        allocation_id: String,
        /// What was wrong with it.
        message: String,
    },

    /// A leave record was malformed.
    #[error("Invalid leave '{leave_id}': {message}")]
    InvalidLeave {
        /// The id of the offending leave.
        leave_id: String,
        /// What was wrong with it.
        message: String,
    },

    /// Nobody else can take over an allocation.
    #[error("No alternative developer available for allocation {allocation_id}")]
    NoAlternativeDeveloper {
        /// The allocation that could not be reassigned.
        allocation_id: String,
    },

    /// A requested period had its start after its end.
    #[error("Invalid period: {start} is after {end}")]
    InvalidPeriod {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The store changed between snapshot and apply.
    #[error("Stale snapshot: expected version {expected}, store is at {actual}")]
    StaleSnapshot {
        /// The version the change set was computed against.
        expected: u64,
        /// The current store version.
        actual: u64,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
