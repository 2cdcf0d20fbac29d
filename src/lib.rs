//! Allocation Engine for resource planning
//!
//! This crate keeps developer allocations consistent with their leave and
//! surfaces scheduling conflicts. New and changed leave splits the
//! allocations it overlaps, and a detection sweep reports overloads and
//! work booked during leave as consolidated, human-scale periods.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod planning;
pub mod store;
