//! End-to-end tests for the allocation engine.
//!
//! These drive the HTTP API against a store seeded per test and cover:
//! - Leave booking splitting stored allocations
//! - New allocations pre-shaped around existing leave
//! - Overload detection at and above capacity
//! - Mixed batches touching both reconciliation passes
//! - Leave edits
//! - Error cases
//! - Concurrent bulk resolves against one store

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use allocation_engine::api::{AppState, create_router};
use allocation_engine::config::ConfigLoader;
use allocation_engine::models::{
    Allocation, AllocationStatus, Developer, Leave, LeaveType, PlanningSnapshot,
};
use allocation_engine::planning::is_overlapping;
use allocation_engine::store::{BulkResolveRequest, LeaveChanges, PlannerStore, bulk_resolve};

// =============================================================================
// Test Helpers
// =============================================================================

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn create_developer(id: &str, capacity: Decimal) -> Developer {
    Developer {
        id: id.to_string(),
        name: format!("Developer {}", id),
        role: "Engineer".to_string(),
        capacity,
        daily_rate: Decimal::new(500, 0),
        is_placeholder: false,
    }
}

fn create_allocation(id: &str, dev: &str, start: &str, end: &str, load: u32) -> Allocation {
    Allocation {
        id: id.to_string(),
        developer_id: dev.to_string(),
        project_id: "proj_001".to_string(),
        start_date: make_date(start),
        end_date: make_date(end),
        load,
        status: AllocationStatus::Confirmed,
    }
}

fn create_leave(id: &str, dev: &str, start: &str, end: &str) -> Leave {
    Leave {
        id: id.to_string(),
        developer_id: dev.to_string(),
        start_date: make_date(start),
        end_date: make_date(end),
        leave_type: LeaveType::Vacation,
        hours: None,
    }
}

fn create_state(seed: PlanningSnapshot) -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::with_store(config, PlannerStore::shared(seed))
}

fn single_developer_seed(allocations: Vec<Allocation>, leaves: Vec<Leave>) -> PlanningSnapshot {
    PlanningSnapshot {
        developers: vec![create_developer("dev_001", Decimal::ONE)],
        allocations,
        leaves,
        ..Default::default()
    }
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body
        .map(|b| Body::from(b.to_string()))
        .unwrap_or_else(Body::empty);
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn assert_no_leave_overlaps(snapshot: &PlanningSnapshot) {
    for leave in snapshot.leaves.iter().filter(|l| l.is_full_day()) {
        for alloc in snapshot
            .allocations_for(&leave.developer_id)
            .filter(|a| a.status == AllocationStatus::Confirmed)
        {
            assert!(
                !is_overlapping(alloc.start_date, alloc.end_date, leave.start_date, leave.end_date),
                "allocation {} overlaps leave {}",
                alloc.id,
                leave.id
            );
        }
    }
}

fn sorted_ranges(snapshot: &PlanningSnapshot) -> Vec<(NaiveDate, NaiveDate, u32)> {
    let mut ranges: Vec<_> = snapshot
        .allocations
        .iter()
        .map(|a| (a.start_date, a.end_date, a.load))
        .collect();
    ranges.sort();
    ranges
}

// =============================================================================
// Leave booking
// =============================================================================

#[tokio::test]
async fn test_booking_leave_cuts_allocation_around_it() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 100)],
        vec![],
    ));

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/leaves",
        Some(json!({
            "developer_id": "dev_001",
            "start_date": "2026-02-16",
            "end_date": "2026-02-20",
            "type": "vacation"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["changes"]["delete_allocations"], json!(["alloc_001"]));

    let snapshot = state.store().snapshot().await;
    assert_eq!(
        sorted_ranges(&snapshot),
        vec![
            (make_date("2026-01-01"), make_date("2026-02-15"), 100),
            (make_date("2026-02-21"), make_date("2026-06-30"), 100),
        ]
    );
    assert_no_leave_overlaps(&snapshot);
}

#[tokio::test]
async fn test_partial_leave_does_not_cut() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 100)],
        vec![],
    ));

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/leaves",
        Some(json!({
            "developer_id": "dev_001",
            "start_date": "2026-02-16",
            "end_date": "2026-02-16",
            "type": "sick_leave",
            "hours": 4
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["changes"]["delete_allocations"], json!([]));

    let snapshot = state.store().snapshot().await;
    assert_eq!(snapshot.allocations.len(), 1);
    assert_eq!(snapshot.allocations[0].id, "alloc_001");
}

#[tokio::test]
async fn test_new_allocation_shaped_around_existing_leave() {
    let state = create_state(single_developer_seed(
        vec![],
        vec![
            create_leave("leave_001", "dev_001", "2026-02-16", "2026-02-20"),
            create_leave("leave_002", "dev_001", "2026-03-09", "2026-03-13"),
        ],
    ));

    let (status, _) = send(
        create_router(state.clone()),
        "POST",
        "/allocations",
        Some(json!({
            "developer_id": "dev_001",
            "project_id": "proj_001",
            "start_date": "2026-02-01",
            "end_date": "2026-03-31",
            "load": 60
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let snapshot = state.store().snapshot().await;
    assert_eq!(
        sorted_ranges(&snapshot),
        vec![
            (make_date("2026-02-01"), make_date("2026-02-15"), 60),
            (make_date("2026-02-21"), make_date("2026-03-08"), 60),
            (make_date("2026-03-14"), make_date("2026-03-31"), 60),
        ]
    );
}

#[tokio::test]
async fn test_editing_leave_cuts_at_new_dates() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 100)],
        vec![],
    ));
    send(
        create_router(state.clone()),
        "POST",
        "/leaves",
        Some(json!({
            "id": "leave_001",
            "developer_id": "dev_001",
            "start_date": "2026-02-16",
            "end_date": "2026-02-20",
            "type": "vacation"
        })),
    )
    .await;

    let (status, _) = send(
        create_router(state.clone()),
        "PUT",
        "/leaves/leave_001",
        Some(json!({
            "developer_id": "dev_001",
            "start_date": "2026-04-06",
            "end_date": "2026-04-10",
            "type": "vacation"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snapshot = state.store().snapshot().await;
    assert_eq!(snapshot.leaves.len(), 1);
    assert_eq!(snapshot.leaves[0].start_date, make_date("2026-04-06"));
    // Moving a leave does not restore the gap it used to cut
    assert_eq!(
        sorted_ranges(&snapshot),
        vec![
            (make_date("2026-01-01"), make_date("2026-02-15"), 100),
            (make_date("2026-02-21"), make_date("2026-04-05"), 100),
            (make_date("2026-04-11"), make_date("2026-06-30"), 100),
        ]
    );
    assert_no_leave_overlaps(&snapshot);
}

// =============================================================================
// Conflict detection
// =============================================================================

#[tokio::test]
async fn test_overload_appears_only_above_capacity() {
    let state = create_state(single_developer_seed(
        vec![
            create_allocation("alloc_a", "dev_001", "2026-01-15", "2026-04-30", 50),
            create_allocation("alloc_b", "dev_001", "2026-01-15", "2026-04-30", 50),
        ],
        vec![],
    ));

    let uri = "/conflicts?weeks=20&start=2026-01-01";
    let (status, body) = send(create_router(state.clone()), "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, _) = send(
        create_router(state.clone()),
        "POST",
        "/bulk-resolve",
        Some(json!({
            "to_update": [{
                "id": "alloc_b",
                "developer_id": "dev_001",
                "project_id": "proj_001",
                "start_date": "2026-01-15",
                "end_date": "2026-04-30",
                "load": 60,
                "status": "confirmed"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(create_router(state), "GET", uri, None).await;
    assert_eq!(body["count"], 1);
    let conflict = &body["conflicts"][0];
    assert_eq!(conflict["type"], "overload");
    assert_eq!(conflict["severity"], "medium");
    assert_eq!(conflict["period_label"], "2026-01-15 to 2026-04-30");
    assert_eq!(conflict["id"], "overload-dev_001-2026-01-15");
}

#[tokio::test]
async fn test_leave_conflict_for_draft_booked_over_leave() {
    let mut draft = create_allocation("alloc_draft", "dev_001", "2026-02-02", "2026-02-27", 50);
    draft.status = AllocationStatus::Draft;
    let state = create_state(single_developer_seed(
        vec![draft],
        vec![create_leave("leave_001", "dev_001", "2026-02-16", "2026-02-20")],
    ));

    let (_, body) = send(create_router(state), "GET", "/conflicts", None).await;

    assert_eq!(body["count"], 1);
    let conflict = &body["conflicts"][0];
    assert_eq!(conflict["type"], "leave_conflict");
    assert_eq!(conflict["severity"], "high");
    assert_eq!(conflict["period_label"], "2026-02-16 to 2026-02-20");
}

// =============================================================================
// Bulk resolve
// =============================================================================

#[tokio::test]
async fn test_mixed_batch_runs_both_passes_once() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 50)],
        vec![create_leave("leave_001", "dev_001", "2026-03-02", "2026-03-06")],
    ));

    // The stored allocation predates leave_001 and still overlaps it.
    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/bulk-resolve",
        Some(json!({
            "to_create": [{
                "id": "alloc_new",
                "developer_id": "dev_001",
                "project_id": "proj_002",
                "start_date": "2026-02-23",
                "end_date": "2026-03-13",
                "load": 50,
                "status": "confirmed"
            }],
            "leaves": {
                "to_create": [{
                    "id": "leave_002",
                    "developer_id": "dev_001",
                    "start_date": "2026-02-09",
                    "end_date": "2026-02-13",
                    "type": "vacation"
                }]
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attempts"], 1);
    assert_eq!(body["changes"]["delete_allocations"], json!(["alloc_001"]));
    // alloc_new fragments around leave_001 (2) and alloc_001 around leave_002 (2)
    assert_eq!(body["changes"]["create_allocations"].as_array().unwrap().len(), 4);

    let snapshot = state.store().snapshot().await;
    assert_eq!(snapshot.allocations.len(), 4);
    assert_eq!(snapshot.leaves.len(), 2);
    let new_leave = snapshot.leave("leave_002").unwrap();
    assert!(
        snapshot
            .allocations
            .iter()
            .all(|a| !a.overlaps(new_leave.start_date, new_leave.end_date))
    );
}

#[tokio::test]
async fn test_unknown_deletes_are_noops() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 100)],
        vec![],
    ));

    let (status, _) = send(
        create_router(state.clone()),
        "POST",
        "/bulk-resolve",
        Some(json!({
            "to_delete": ["alloc_missing"],
            "leaves": { "to_delete": ["leave_missing"] }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.store().snapshot().await.allocations.len(), 1);
}

#[tokio::test]
async fn test_invalid_allocation_rejected_and_nothing_applied() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 100)],
        vec![],
    ));

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/bulk-resolve",
        Some(json!({
            "to_delete": ["alloc_001"],
            "to_create": [{
                "id": "alloc_bad",
                "developer_id": "dev_001",
                "project_id": "proj_001",
                "start_date": "2026-03-01",
                "end_date": "2026-02-01",
                "load": 50,
                "status": "confirmed"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ALLOCATION");

    let snapshot = state.store().snapshot().await;
    assert_eq!(snapshot.version, 0);
    assert_eq!(snapshot.allocations[0].id, "alloc_001");
}

#[tokio::test]
async fn test_preview_of_reconciled_state_is_empty() {
    let state = create_state(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-06-30", 100)],
        vec![],
    ));
    send(
        create_router(state.clone()),
        "POST",
        "/leaves",
        Some(json!({
            "developer_id": "dev_001",
            "start_date": "2026-02-16",
            "end_date": "2026-02-20",
            "type": "vacation"
        })),
    )
    .await;
    let snapshot = state.store().snapshot().await;

    // Replaying the same leave against the already-split allocations changes nothing
    let (status, plan) = send(
        create_router(state),
        "POST",
        "/splits/preview",
        Some(json!({
            "active_leaves": snapshot.leaves,
            "existing_allocations": snapshot.allocations,
            "leave_changes": snapshot.leaves
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan, json!({ "to_create": [], "to_delete": [] }));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_leave_bookings_all_land() {
    let store = PlannerStore::shared(single_developer_seed(
        vec![create_allocation("alloc_001", "dev_001", "2026-01-01", "2026-12-31", 100)],
        vec![],
    ));

    let weeks = [
        ("2026-02-02", "2026-02-06"),
        ("2026-03-02", "2026-03-06"),
        ("2026-04-06", "2026-04-10"),
        ("2026-05-04", "2026-05-08"),
        ("2026-06-01", "2026-06-05"),
        ("2026-07-06", "2026-07-10"),
        ("2026-08-03", "2026-08-07"),
        ("2026-09-07", "2026-09-11"),
    ];

    let mut handles = Vec::new();
    for (i, (start, end)) in weeks.iter().enumerate() {
        let store = Arc::clone(&store);
        let request = BulkResolveRequest {
            leaves: LeaveChanges {
                to_create: vec![create_leave(&format!("leave_{:03}", i), "dev_001", start, end)],
                ..Default::default()
            },
            ..Default::default()
        };
        handles.push(tokio::spawn(async move {
            // Each loss means another request landed, so this many attempts always suffice
            bulk_resolve(&store, &request, weeks.len() as u32).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.version, weeks.len() as u64);
    assert_eq!(snapshot.leaves.len(), weeks.len());
    assert_eq!(snapshot.allocations.len(), weeks.len() + 1);
    assert_no_leave_overlaps(&snapshot);
}
