//! Request types for the allocation engine API.
//!
//! This module defines the JSON and query structures accepted by the
//! endpoints that do not take a domain type directly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Allocation, AllocationStatus, Leave, LeaveType, generate_id};

/// Query string for `GET /conflicts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictQuery {
    /// Overrides the configured scan length in weeks.
    #[serde(default)]
    pub weeks: Option<u32>,
    /// Overrides the configured scan start.
    #[serde(default)]
    pub start: Option<NaiveDate>,
}

/// Request body for `POST /allocations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Optional id; one is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The developer to book.
    pub developer_id: String,
    /// The project to book against.
    pub project_id: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Percentage of a full-time day.
    pub load: u32,
    /// Booking status, confirmed unless stated.
    #[serde(default = "default_status")]
    pub status: AllocationStatus,
}

fn default_status() -> AllocationStatus {
    AllocationStatus::Confirmed
}

impl From<AllocationRequest> for Allocation {
    fn from(req: AllocationRequest) -> Self {
        Allocation {
            id: req.id.unwrap_or_else(generate_id),
            developer_id: req.developer_id,
            project_id: req.project_id,
            start_date: req.start_date,
            end_date: req.end_date,
            load: req.load,
            status: req.status,
        }
    }
}

/// Request body for `POST /leaves` and `PUT /leaves/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Optional id; ignored on update, generated on create when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The absent developer.
    pub developer_id: String,
    /// First day of absence (inclusive).
    pub start_date: NaiveDate,
    /// Last day of absence (inclusive).
    pub end_date: NaiveDate,
    /// The kind of absence.
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    /// Hours absent, for partial-day leave.
    #[serde(default)]
    pub hours: Option<Decimal>,
}

impl LeaveRequest {
    /// Converts into a [`Leave`] with the given id.
    pub fn into_leave_with_id(self, id: String) -> Leave {
        Leave {
            id,
            developer_id: self.developer_id,
            start_date: self.start_date,
            end_date: self.end_date,
            leave_type: self.leave_type,
            hours: self.hours,
        }
    }
}

impl From<LeaveRequest> for Leave {
    fn from(mut req: LeaveRequest) -> Self {
        let id = req.id.take().unwrap_or_else(generate_id);
        req.into_leave_with_id(id)
    }
}

/// Request body for `POST /resolve/auto-balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoBalanceRequest {
    /// The overloaded developer.
    pub developer_id: String,
    /// First day of the window to balance (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the window to balance (inclusive).
    pub end_date: NaiveDate,
}

/// Request body for `POST /resolve/split-around-leave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitAroundLeaveRequest {
    /// The allocation to cut.
    pub allocation_id: String,
    /// The leave to cut it around.
    pub leave_id: String,
}

/// Request body for `POST /resolve/reassign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignRequest {
    /// The allocation to move.
    pub allocation_id: String,
    /// Target developer. When absent, the first available alternative is
    /// picked.
    #[serde(default)]
    pub developer_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_request_defaults() {
        let json = r#"{
            "developer_id": "dev_001",
            "project_id": "proj_001",
            "start_date": "2026-02-01",
            "end_date": "2026-02-28",
            "load": 50
        }"#;
        let req: AllocationRequest = serde_json::from_str(json).unwrap();
        let alloc: Allocation = req.into();

        assert_eq!(alloc.status, AllocationStatus::Confirmed);
        assert!(!alloc.id.is_empty());
    }

    #[test]
    fn test_allocation_request_keeps_supplied_id() {
        let json = r#"{
            "id": "alloc_009",
            "developer_id": "dev_001",
            "project_id": "proj_001",
            "start_date": "2026-02-01",
            "end_date": "2026-02-28",
            "load": 50,
            "status": "draft"
        }"#;
        let req: AllocationRequest = serde_json::from_str(json).unwrap();
        let alloc: Allocation = req.into();

        assert_eq!(alloc.id, "alloc_009");
        assert_eq!(alloc.status, AllocationStatus::Draft);
    }

    #[test]
    fn test_leave_request_with_hours() {
        let json = r#"{
            "developer_id": "dev_001",
            "start_date": "2026-02-16",
            "end_date": "2026-02-16",
            "type": "sick_leave",
            "hours": 4
        }"#;
        let req: LeaveRequest = serde_json::from_str(json).unwrap();
        let leave = req.into_leave_with_id("leave_009".to_string());

        assert_eq!(leave.id, "leave_009");
        assert_eq!(leave.leave_type, LeaveType::SickLeave);
        assert!(!leave.is_full_day());
    }
}
