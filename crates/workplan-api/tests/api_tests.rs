//! Integration tests for the timeline API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, backed by the in-memory collaborators.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use workplan_api::{AppState, MAX_EVENTS_PER_REQUEST, build_router};
use workplan_core::{InMemoryEventStore, StaticMovementHistory, TimelineService, TimelineZone};
use workplan_types::{
    ContextKey, PrisonId, PrisonNumber, Timeline, TimelineEvent, TimelineEventType, TimelineId,
};

const PRISONER: &str = "A1234BC";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

fn make_router() -> Router {
    let prison_number = PrisonNumber::new(PRISONER);

    let native = vec![
        TimelineEvent::new(
            "goal-1",
            TimelineEventType::GoalCreated,
            PrisonId::new("BXI"),
            "asmith_gen",
        )
        .with_context(ContextKey::GoalTitle, "Learn to drive")
        .with_actioned_by_display_name("Alex Smith")
        .with_timestamp(t0()),
        TimelineEvent::new(
            "induction-1",
            TimelineEventType::InductionCreated,
            PrisonId::new("MDI"),
            "asmith_gen",
        )
        .with_timestamp(t0() + Duration::days(40)),
    ];
    let movements = vec![
        TimelineEvent::system("1234", TimelineEventType::PrisonAdmission, PrisonId::new("BXI"))
            .with_timestamp(t0() - Duration::days(1)),
        TimelineEvent::system("1234", TimelineEventType::PrisonTransfer, PrisonId::new("MDI"))
            .with_context(ContextKey::PrisonTransferredFrom, "BXI")
            .with_timestamp(t0() + Duration::days(30)),
    ];

    let store = InMemoryEventStore::with_timelines([Timeline::new(
        TimelineId::new(),
        prison_number.clone(),
        native,
    )]);
    let history = StaticMovementHistory::new().with_movements(prison_number, movements);
    let service = TimelineService::new(store, history)
        .with_zone(TimelineZone::from_offset_minutes(Some(0)));

    build_router(Arc::new(AppState::new(service)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_json(router: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn event_types(json: &Value) -> Vec<String> {
    json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["eventType"].as_str().unwrap().to_owned())
        .collect()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_health() {
    let (status, json) = get(make_router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_unfiltered_timeline_is_merged_and_sorted() {
    let (status, json) = get(make_router(), "/timelines/A1234BC").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prisonNumber"], PRISONER);
    assert_eq!(
        event_types(&json),
        vec![
            "PRISON_ADMISSION",
            "GOAL_CREATED",
            "PRISON_TRANSFER",
            "INDUCTION_CREATED"
        ]
    );

    let goal = &json["events"][1];
    assert_eq!(goal["contextualInfo"]["GOAL_TITLE"], "Learn to drive");
    assert_eq!(goal["actionedByDisplayName"], "Alex Smith");
    let admission = &json["events"][0];
    assert_eq!(admission["actionedBy"], "system");
    assert!(admission.get("actionedByDisplayName").is_none());
}

#[tokio::test]
async fn test_category_filter() {
    let (status, json) = get(make_router(), "/timelines/A1234BC?prisonEvents=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event_types(&json), vec!["PRISON_ADMISSION", "PRISON_TRANSFER"]);
}

#[tokio::test]
async fn test_false_flag_enables_category() {
    let (_, json) = get(make_router(), "/timelines/A1234BC?goals=true&inductions=false").await;
    assert_eq!(event_types(&json), vec!["GOAL_CREATED", "INDUCTION_CREATED"]);
}

#[tokio::test]
async fn test_prison_and_recency_filters() {
    let (_, json) = get(make_router(), "/timelines/A1234BC?prisonId=MDI").await;
    assert_eq!(event_types(&json), vec!["PRISON_TRANSFER", "INDUCTION_CREATED"]);

    let (_, json) = get(make_router(), "/timelines/A1234BC?eventsSince=2024-05-02").await;
    assert_eq!(event_types(&json), vec!["PRISON_TRANSFER", "INDUCTION_CREATED"]);
}

#[tokio::test]
async fn test_filter_matching_nothing_is_empty_not_404() {
    let (status, json) = get(make_router(), "/timelines/A1234BC?eventsSince=2030-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["events"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_prisoner_is_not_found() {
    let (status, json) = get(make_router(), "/timelines/Z9999ZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_malformed_prison_number() {
    let (status, json) = get(make_router(), "/timelines/12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("12345"));
}

#[tokio::test]
async fn test_invalid_query_parameter() {
    let (status, _) = get(make_router(), "/timelines/A1234BC?eventsSince=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(make_router(), "/timelines/A1234BC?goals=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_events_then_read_back() {
    let router = make_router();
    let body = serde_json::json!([
        {
            "sourceReference": "step-1",
            "eventType": "STEP_STARTED",
            "prisonId": "MDI",
            "actionedBy": "asmith_gen",
            "timestamp": "2024-07-01T09:00:00Z"
        },
        {
            "sourceReference": "goal-2",
            "eventType": "GOAL_CREATED",
            "prisonId": "MDI",
            "actionedBy": "asmith_gen",
            "contextualInfo": { "GOAL_TITLE": "Get a CSCS card" },
            "timestamp": "2024-07-01T08:00:00Z"
        }
    ]);

    let (status, json) = post_json(router.clone(), "/timelines/A1234BC/events", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["recorded"], 2);

    let (_, json) = get(router, "/timelines/A1234BC?goals=true&prisonId=MDI").await;
    assert_eq!(event_types(&json), vec!["GOAL_CREATED", "STEP_STARTED"]);
    assert_eq!(
        json["events"][0]["correlationId"],
        json["events"][1]["correlationId"]
    );
}

#[tokio::test]
async fn test_record_events_for_new_prisoner() {
    let router = make_router();
    let body = serde_json::json!([{
        "sourceReference": "induction-9",
        "eventType": "INDUCTION_SCHEDULE_CREATED",
        "prisonId": "LEI",
        "actionedBy": "system"
    }]);

    let (status, _) = post_json(router.clone(), "/timelines/B7654CD/events", &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = get(router, "/timelines/B7654CD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event_types(&json), vec!["INDUCTION_SCHEDULE_CREATED"]);
}

#[tokio::test]
async fn test_record_events_rejects_bad_bodies() {
    let empty = serde_json::json!([]);
    let (status, _) = post_json(make_router(), "/timelines/A1234BC/events", &empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let blank = serde_json::json!([{
        "sourceReference": "",
        "eventType": "GOAL_CREATED",
        "prisonId": "BXI",
        "actionedBy": "asmith_gen"
    }]);
    let (status, _) = post_json(make_router(), "/timelines/A1234BC/events", &blank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown_type = serde_json::json!([{
        "sourceReference": "x",
        "eventType": "TICK_START",
        "prisonId": "BXI",
        "actionedBy": "asmith_gen"
    }]);
    let (status, _) = post_json(make_router(), "/timelines/A1234BC/events", &unknown_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let one = serde_json::json!({
        "sourceReference": "x",
        "eventType": "GOAL_CREATED",
        "prisonId": "BXI",
        "actionedBy": "asmith_gen"
    });
    let too_many = Value::Array(vec![one; MAX_EVENTS_PER_REQUEST + 1]);
    let (status, json) = post_json(make_router(), "/timelines/A1234BC/events", &too_many).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}
