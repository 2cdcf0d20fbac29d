//! HTTP request handlers for the allocation engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Allocation, Developer, Leave, PlanningSnapshot, Project};
use crate::planning::{
    SplitInput, auto_balance, calculate_splits, detect_conflicts_with, find_alternative_developer,
    reassign, split_around_leave,
};
use crate::store::{
    BulkResolveOutcome, BulkResolveRequest, LeaveChanges, bulk_resolve, bulk_resolve_with,
};

use super::request::{
    AllocationRequest, AutoBalanceRequest, ConflictQuery, LeaveRequest, ReassignRequest,
    SplitAroundLeaveRequest,
};
use super::response::{ApiError, ApiErrorResponse, ConflictsResponse};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/conflicts", get(conflicts_handler))
        .route("/snapshot", get(snapshot_handler))
        .route("/allocations", post(create_allocation_handler))
        .route("/leaves", post(create_leave_handler))
        .route("/leaves/:id", put(update_leave_handler))
        .route("/bulk-resolve", post(bulk_resolve_handler))
        .route("/splits/preview", post(split_preview_handler))
        .route("/resolve/auto-balance", post(auto_balance_handler))
        .route("/resolve/split-around-leave", post(split_around_leave_handler))
        .route("/resolve/reassign", post(reassign_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn engine_failure(correlation_id: Uuid, err: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    err.into()
}

async fn apply(
    state: &AppState,
    correlation_id: Uuid,
    request: &BulkResolveRequest,
) -> Result<BulkResolveOutcome, ApiErrorResponse> {
    bulk_resolve(state.store(), request, state.config().max_apply_attempts())
        .await
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Like [`apply`], but the request is rebuilt from every snapshot the store
/// hands out, so lookups and plans are never older than the version the
/// apply is checked against.
async fn apply_with<F>(
    state: &AppState,
    correlation_id: Uuid,
    build: F,
) -> Result<BulkResolveOutcome, ApiErrorResponse>
where
    F: FnMut(&PlanningSnapshot) -> EngineResult<Option<BulkResolveRequest>>,
{
    bulk_resolve_with(state.store(), state.config().max_apply_attempts(), build)
        .await
        .map_err(|err| engine_failure(correlation_id, err))
}

/// Handler for GET /conflicts.
///
/// Runs the detection sweep over the current store. `weeks` and `start`
/// override the configured scan window.
async fn conflicts_handler(
    State(state): State<AppState>,
    query: Result<Query<ConflictQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Invalid conflict query"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })?;

    let mut settings = state.config().detection_settings();
    if let Some(weeks) = query.weeks {
        settings.scan_weeks = weeks;
    }
    if let Some(start) = query.start {
        settings.scan_start = start;
    }

    let store = state.store();
    let developers = store.list::<Developer>().await;
    let projects = store.list::<Project>().await;
    let allocations = store.list::<Allocation>().await;
    let leaves = store.list::<Leave>().await;

    let start_time = Instant::now();
    let conflicts =
        detect_conflicts_with(&developers, &allocations, &leaves, &projects, &settings);
    info!(
        correlation_id = %correlation_id,
        scan_weeks = settings.scan_weeks,
        conflicts = conflicts.len(),
        duration_us = start_time.elapsed().as_micros() as u64,
        "Conflict scan completed"
    );

    Ok(json_response(
        StatusCode::OK,
        ConflictsResponse {
            scan_start: settings.scan_start,
            scan_end: settings.scan_end(),
            count: conflicts.len(),
            conflicts,
        },
    ))
}

/// Handler for GET /snapshot.
async fn snapshot_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.store().snapshot().await)
}

/// Handler for POST /allocations.
///
/// The new allocation is shaped around the developer's full-day leaves
/// before it is stored, so it may be stored as several pieces.
async fn create_allocation_handler(
    State(state): State<AppState>,
    payload: Result<Json<AllocationRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let allocation: Allocation = parse_body(correlation_id, payload)?.into();
    info!(
        correlation_id = %correlation_id,
        developer_id = %allocation.developer_id,
        "Creating allocation"
    );

    let request = BulkResolveRequest {
        to_create: vec![allocation],
        ..Default::default()
    };
    let outcome = apply(&state, correlation_id, &request).await?;
    Ok(json_response(StatusCode::CREATED, outcome))
}

/// Handler for POST /leaves.
///
/// A full-day leave cuts every stored allocation of the developer it overlaps.
async fn create_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let leave: Leave = parse_body(correlation_id, payload)?.into();
    info!(
        correlation_id = %correlation_id,
        developer_id = %leave.developer_id,
        leave_id = %leave.id,
        "Booking leave"
    );

    let request = BulkResolveRequest {
        leaves: LeaveChanges {
            to_create: vec![leave],
            ..Default::default()
        },
        ..Default::default()
    };
    let outcome = apply(&state, correlation_id, &request).await?;
    Ok(json_response(StatusCode::CREATED, outcome))
}

/// Handler for PUT /leaves/:id.
async fn update_leave_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LeaveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let leave = parse_body(correlation_id, payload)?.into_leave_with_id(id);
    info!(
        correlation_id = %correlation_id,
        leave_id = %leave.id,
        "Updating leave"
    );

    let outcome = apply_with(&state, correlation_id, |snapshot| {
        if snapshot.leave(&leave.id).is_none() {
            return Err(EngineError::LeaveNotFound {
                id: leave.id.clone(),
            });
        }
        Ok(Some(BulkResolveRequest {
            leaves: LeaveChanges {
                to_update: vec![leave.clone()],
                ..Default::default()
            },
            ..Default::default()
        }))
    })
    .await?;
    Ok(json_response(StatusCode::OK, outcome))
}

/// Handler for POST /bulk-resolve.
async fn bulk_resolve_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkResolveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        to_delete = request.to_delete.len(),
        to_create = request.to_create.len(),
        to_update = request.to_update.len(),
        "Processing bulk resolve"
    );

    let outcome = apply(&state, correlation_id, &request).await?;
    Ok(json_response(StatusCode::OK, outcome))
}

/// Handler for POST /splits/preview.
///
/// Computes the reconciliation plan for the supplied records without
/// touching the store.
async fn split_preview_handler(
    payload: Result<Json<SplitInput>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let input = parse_body(correlation_id, payload)?;
    let plan = calculate_splits(&input);
    info!(
        correlation_id = %correlation_id,
        to_create = plan.to_create.len(),
        to_delete = plan.to_delete.len(),
        "Split preview computed"
    );
    Ok(json_response(StatusCode::OK, plan))
}

/// Handler for POST /resolve/auto-balance.
async fn auto_balance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AutoBalanceRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let body = parse_body(correlation_id, payload)?;

    if body.start_date > body.end_date {
        return Err(engine_failure(
            correlation_id,
            EngineError::InvalidPeriod {
                start: body.start_date,
                end: body.end_date,
            },
        ));
    }

    let outcome = apply_with(&state, correlation_id, |snapshot| {
        let developer =
            snapshot
                .developer(&body.developer_id)
                .ok_or_else(|| EngineError::DeveloperNotFound {
                    id: body.developer_id.clone(),
                })?;
        let plan = auto_balance(
            developer,
            &snapshot.allocations,
            body.start_date,
            body.end_date,
        );
        info!(
            correlation_id = %correlation_id,
            developer_id = %developer.id,
            version = snapshot.version,
            impacted = plan.to_delete.len(),
            "Auto-balance computed"
        );
        Ok((!plan.is_empty()).then(|| BulkResolveRequest::from(plan)))
    })
    .await?;
    Ok(json_response(StatusCode::OK, outcome))
}

/// Handler for POST /resolve/split-around-leave.
async fn split_around_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<SplitAroundLeaveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let body = parse_body(correlation_id, payload)?;

    let outcome = apply_with(&state, correlation_id, |snapshot| {
        let allocation = snapshot.allocation(&body.allocation_id).ok_or_else(|| {
            EngineError::AllocationNotFound {
                id: body.allocation_id.clone(),
            }
        })?;
        let leave = snapshot
            .leave(&body.leave_id)
            .ok_or_else(|| EngineError::LeaveNotFound {
                id: body.leave_id.clone(),
            })?;

        let plan = split_around_leave(allocation, leave);
        info!(
            correlation_id = %correlation_id,
            allocation_id = %allocation.id,
            leave_id = %leave.id,
            pieces = plan.to_create.len(),
            "Split around leave computed"
        );
        Ok((!plan.is_empty()).then(|| BulkResolveRequest::from(plan)))
    })
    .await?;
    Ok(json_response(StatusCode::OK, outcome))
}

/// Handler for POST /resolve/reassign.
///
/// Moves an allocation to the named developer, or to the first available
/// alternative when none is named. The moved allocation keeps its id and is
/// shaped around the new developer's leaves.
async fn reassign_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let body = parse_body(correlation_id, payload)?;

    let outcome = apply_with(&state, correlation_id, |snapshot| {
        let allocation = snapshot.allocation(&body.allocation_id).ok_or_else(|| {
            EngineError::AllocationNotFound {
                id: body.allocation_id.clone(),
            }
        })?;
        let target = match &body.developer_id {
            Some(id) => snapshot
                .developer(id)
                .ok_or_else(|| EngineError::DeveloperNotFound { id: id.clone() })?,
            None => find_alternative_developer(
                allocation,
                &snapshot.developers,
                &snapshot.allocations,
            )
            .ok_or_else(|| EngineError::NoAlternativeDeveloper {
                allocation_id: allocation.id.clone(),
            })?,
        };
        info!(
            correlation_id = %correlation_id,
            allocation_id = %allocation.id,
            from = %allocation.developer_id,
            to = %target.id,
            "Reassigning allocation"
        );
        if target.id == allocation.developer_id {
            return Ok(None);
        }
        Ok(Some(BulkResolveRequest {
            to_update: vec![reassign(allocation, &target.id)],
            ..Default::default()
        }))
    })
    .await?;
    Ok(json_response(StatusCode::OK, outcome))
}
