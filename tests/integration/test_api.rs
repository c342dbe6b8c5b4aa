//! Tests for the calendar HTTP API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use almanac::calendar::{CalendarEntity, CalendarEvent, CalendarRegistry, Clock, FixedClock};
use almanac::{create_rest_router, RestApiConfig};

/// 2024-06-10 is a Monday.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap()
}

fn at(month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, month, day, hour, 0, 0)
        .unwrap()
}

fn event(title: &str, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> CalendarEvent {
    CalendarEvent::new(start, end).with_title(title)
}

/// Create a registry with two calendars and a fixed clock.
fn create_test_app() -> Router {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
    let registry = CalendarRegistry::new();

    let work = vec![
        event("Standup", at(6, 10, 9), at(6, 10, 10)),
        event("Review", at(6, 10, 14), at(6, 10, 16)),
        event("Offsite", at(6, 13, 9), at(6, 13, 17)),
        event("Planning", at(6, 25, 9), at(6, 25, 10)),
        event("Retro", at(7, 2, 9), at(7, 2, 10)),
    ];
    registry
        .register(CalendarEntity::new("calendar.work", "Work", work).with_clock(clock.clone()))
        .unwrap();
    registry
        .register(CalendarEntity::new("calendar.home", "Home", Vec::new()).with_clock(clock))
        .unwrap();

    create_rest_router(Arc::new(registry), &RestApiConfig::default())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "GET {} failed", uri);
    serde_json::from_slice(&body).unwrap()
}

fn titles(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_calendars_sorted_by_name() {
    let app = create_test_app();
    let body = get_json(&app, "/api/v2/calendars").await;

    assert_eq!(
        body,
        serde_json::json!([
            {"name": "Home", "entity_id": "calendar.home"},
            {"name": "Work", "entity_id": "calendar.work"},
        ])
    );
}

#[tokio::test]
async fn test_day_view() {
    let app = create_test_app();
    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=day").await;
    assert_eq!(titles(&body), vec!["Standup", "Review"]);
}

#[tokio::test]
async fn test_week_view() {
    let app = create_test_app();
    // Week window starts Monday 15:00; only Review's end and Offsite fall inside
    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=week").await;
    assert_eq!(titles(&body), vec!["Review", "Offsite"]);
}

#[tokio::test]
async fn test_month_view() {
    let app = create_test_app();
    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=month").await;
    assert_eq!(titles(&body), vec!["Standup", "Review", "Offsite", "Planning"]);
}

#[tokio::test]
async fn test_schedule_view_count() {
    let app = create_test_app();

    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=schedule&count=2").await;
    assert_eq!(titles(&body), vec!["Standup", "Review"]);

    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=schedule").await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_schedule_negative_count_returns_all() {
    let app = create_test_app();
    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=schedule&count=-1").await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_schedule_oversized_count_accepted() {
    let app = create_test_app();
    let body = get_json(
        &app,
        "/api/v2/calendars/calendar.work?mode=schedule&count=99999999999999999999",
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_event_attributes_in_response() {
    let app = create_test_app();
    let body = get_json(&app, "/api/v2/calendars/calendar.work?mode=schedule&count=1").await;

    let first = &body[0];
    assert_eq!(first["title"], "Standup");
    assert_eq!(first["start"], "2024-06-10T09:00:00+00:00");
    assert_eq!(first["end"], "2024-06-10T10:00:00+00:00");
    assert!(first.get("description").is_none());
}

#[tokio::test]
async fn test_empty_calendar_view() {
    let app = create_test_app();
    let body = get_json(&app, "/api/v2/calendars/calendar.home?mode=month").await;
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_bad_requests() {
    let app = create_test_app();

    for uri in [
        "/api/v2/calendars/calendar.test?mode=day",
        "/api/v2/calendars/calendar.work?mode=century",
        "/api/v2/calendars/calendar.work",
        "/api/v2/calendars/calendar.work?mode=schedule&count=ten",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", uri);
        assert!(body.is_empty(), "GET {} should have no body", uri);
    }
}

#[tokio::test]
async fn test_invalid_event_date_fails_only_that_query() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap(),
    ));
    let registry = CalendarRegistry::new();
    let leap = vec![event("Leap", at(2, 29, 9), at(2, 29, 10))];
    registry
        .register(CalendarEntity::new("calendar.leap", "Leap", leap).with_clock(clock))
        .unwrap();
    let app = create_rest_router(Arc::new(registry), &RestApiConfig::default());

    let (status, _) = get(&app, "/api/v2/calendars/calendar.leap?mode=month").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Schedule views do not normalize dates
    let body = get_json(&app, "/api/v2/calendars/calendar.leap?mode=schedule").await;
    assert_eq!(titles(&body), vec!["Leap"]);
}

#[tokio::test]
async fn test_state_endpoint() {
    let app = create_test_app();

    let body = get_json(&app, "/api/v2/states/calendar.work").await;
    assert_eq!(body["state"], "busy");
    assert_eq!(titles(&body["attributes"]["current"]), vec!["Review"]);
    assert_eq!(body["attributes"]["upcoming"].as_array().unwrap().len(), 5);

    let body = get_json(&app, "/api/v2/states/calendar.home").await;
    assert_eq!(body["state"], "free");
    assert_eq!(body["attributes"], serde_json::json!({}));

    let (status, _) = get(&app, "/api/v2/states/calendar.missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let body = get_json(&app, "/health").await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_custom_prefix() {
    let registry = CalendarRegistry::new();
    registry
        .register(CalendarEntity::new("calendar.home", "Home", Vec::new()))
        .unwrap();
    let config = RestApiConfig {
        prefix: "/cal".to_string(),
        ..Default::default()
    };
    let app = create_rest_router(Arc::new(registry), &config);

    let body = get_json(&app, "/cal/calendars").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = get(&app, "/api/v2/calendars").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
