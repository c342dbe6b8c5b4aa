//! Property-based tests for the window engine and calendar directory.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;

use almanac::calendar::{
    compute_view, current_events, derive_status, directory, CalendarEntity, CalendarEvent,
    CalendarRegistry, CalendarState, Clock, FixedClock, MatchPolicy, TimeWindow, ViewMode,
    ViewQuery,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 12, 11, 0, 0).unwrap()
}

/// Events between March and September 2024, avoiding leap days.
fn arb_event() -> impl Strategy<Value = CalendarEvent> {
    (0i64..200 * 24, 0i64..72, -12i32..=12).prop_map(|(start_hours, length_hours, offset_hours)| {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let base = offset.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let start = base + Duration::hours(start_hours);
        CalendarEvent::new(start, start + Duration::hours(length_hours))
            .with_title(format!("event-{}", start_hours))
    })
}

fn arb_mode() -> impl Strategy<Value = ViewMode> {
    prop_oneof![
        Just(ViewMode::Day),
        Just(ViewMode::Week),
        Just(ViewMode::Month),
    ]
}

/// Property: upcoming_events(count) returns min(n, count) events in list order
#[test]
fn proptest_schedule_truncation() {
    proptest!(|(events in prop::collection::vec(arb_event(), 0..30), count in 0usize..40)| {
        let entity = CalendarEntity::new("calendar.test", "Test", events.clone());

        let upcoming = entity.upcoming_events(count);
        prop_assert_eq!(upcoming.len(), events.len().min(count));
        prop_assert_eq!(&upcoming[..], &events[..upcoming.len()]);
    });
}

/// Property: view results are an order-preserving subsequence of the input
#[test]
fn proptest_view_preserves_order() {
    proptest!(|(events in prop::collection::vec(arb_event(), 0..30), mode in arb_mode())| {
        let view =
            compute_view(&events, &ViewQuery::new(mode), now(), MatchPolicy::Endpoint).unwrap();

        let mut remaining = events.iter();
        for matched in &view {
            prop_assert!(remaining.any(|e| std::ptr::eq(e, *matched)));
        }
    });
}

/// Property: identical inputs give identical views
#[test]
fn proptest_view_idempotent() {
    proptest!(|(events in prop::collection::vec(arb_event(), 0..20), mode in arb_mode())| {
        let query = ViewQuery::new(mode);
        let first = compute_view(&events, &query, now(), MatchPolicy::Endpoint).unwrap();
        let second = compute_view(&events, &query, now(), MatchPolicy::Endpoint).unwrap();
        prop_assert_eq!(first, second);
    });
}

/// Property: busy exactly when something is currently happening
#[test]
fn proptest_busy_iff_current() {
    proptest!(|(events in prop::collection::vec(arb_event(), 0..30))| {
        let state = derive_status(Some(events.as_slice()), now()).unwrap();
        let current = current_events(&events, now()).unwrap();
        prop_assert_eq!(state == CalendarState::Busy, !current.is_empty());
    });
}

/// Property: the directory is sorted by name and stable for ties
#[test]
fn proptest_directory_sorted() {
    proptest!(|(names in prop::collection::vec("[A-Ca-c]{1,3}", 0..20))| {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
        let registry = CalendarRegistry::new();
        for (i, name) in names.iter().enumerate() {
            let entity = CalendarEntity::new(format!("calendar.c{}", i), name.clone(), Vec::new())
                .with_clock(clock.clone());
            registry.register(entity).unwrap();
        }

        let listing = directory(&registry);
        prop_assert_eq!(listing.len(), names.len());
        for pair in listing.windows(2) {
            prop_assert!(pair[0].name <= pair[1].name);
            if pair[0].name == pair[1].name {
                let index = |id: &str| {
                    id.trim_start_matches("calendar.c").parse::<usize>().unwrap()
                };
                prop_assert!(index(&pair[0].entity_id) < index(&pair[1].entity_id));
            }
        }
    });
}

#[test]
fn test_window_start_inclusive_end_exclusive() {
    let utc = FixedOffset::east_opt(0).unwrap();
    for mode in [ViewMode::Day, ViewMode::Week, ViewMode::Month] {
        let window = TimeWindow::for_mode(mode, now()).unwrap();
        let at_start = CalendarEvent::new(
            window.start.with_timezone(&utc),
            (window.start + Duration::minutes(1)).with_timezone(&utc),
        );
        let at_end = CalendarEvent::new(
            window.end.with_timezone(&utc),
            (window.end + Duration::minutes(1)).with_timezone(&utc),
        );

        let events = vec![at_start, at_end];
        let view =
            compute_view(&events, &ViewQuery::new(mode), now(), MatchPolicy::Endpoint).unwrap();
        assert_eq!(view.len(), 1, "{} view", mode);
        assert_eq!(view[0], &events[0]);
    }
}
