//! Developer and project models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_capacity() -> Decimal {
    Decimal::ONE
}

/// Represents a person whose time is planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    /// Unique identifier for the developer.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title, used when suggesting replacements.
    #[serde(default)]
    pub role: String,
    /// Fractional FTE (1.0 = full time).
    #[serde(default = "default_capacity")]
    pub capacity: Decimal,
    /// Cost per working day.
    #[serde(default)]
    pub daily_rate: Decimal,
    /// Placeholder seats are never proposed as replacements.
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Developer {
    /// Returns the capacity expressed as a percentage load ceiling.
    ///
    /// # Examples
    ///
    /// ```
    /// use allocation_engine::models::Developer;
    /// use rust_decimal::Decimal;
    ///
    /// let dev = Developer {
    ///     id: "dev_001".to_string(),
    ///     name: "Ada".to_string(),
    ///     role: "Backend".to_string(),
    ///     capacity: Decimal::new(8, 1),
    ///     daily_rate: Decimal::new(600, 0),
    ///     is_placeholder: false,
    /// };
    /// assert_eq!(dev.capacity_percent(), Decimal::new(80, 0));
    /// ```
    pub fn capacity_percent(&self) -> Decimal {
        self.capacity * Decimal::ONE_HUNDRED
    }
}

/// A project allocations are booked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for the project.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Client the project is delivered for.
    #[serde(default)]
    pub client: String,
    /// Free-form lifecycle status (Active, Discovery, ...).
    #[serde(default)]
    pub status: String,
}
