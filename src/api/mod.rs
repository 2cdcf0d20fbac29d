//! HTTP API module for the allocation engine.
//!
//! This module exposes conflict detection, leave and allocation booking,
//! and the resolution actions over a REST API.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AllocationRequest, AutoBalanceRequest, ConflictQuery, LeaveRequest, ReassignRequest,
    SplitAroundLeaveRequest,
};
pub use response::{ApiError, ApiErrorResponse, ConflictsResponse};
pub use state::AppState;
