// SPDX-FileCopyrightText: 2026 Deskroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Deskroute pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite, a mock
//! transport and all engine subsystems. Events are fed in their JSON wire
//! form. Tests are independent and order-insensitive.

use deskroute_core::types::{ConsultationStatus, NoticeKind, WorkingHours};
use deskroute_core::{LifecycleEvent, LogSink};
use deskroute_test_utils::TestHarness;
use deskroute_test_utils::fixtures::{assigned, at, consultation, finished, manager};

async fn feed(harness: &TestHarness, raw: &str) -> Vec<String> {
    let event = LifecycleEvent::from_json(raw).unwrap();
    harness
        .engine
        .handle_lifecycle_event(&event)
        .await
        .unwrap()
        .labels()
}

// ---- Test 1: Full consultation journey ----

#[tokio::test]
async fn test_consultation_journey_from_intake_to_rating() {
    let harness = TestHarness::builder()
        .with_manager(manager("m1", 3))
        .with_manager(manager("m2", 3))
        .with_consultation(consultation("100", at(9, 0)))
        .build()
        .await
        .unwrap();

    let created = feed(&harness, r#"{"kind":"created","cons_id":"100"}"#).await;
    assert_eq!(created, vec!["assigned", "notice_sent:accepted"]);

    let opened = feed(
        &harness,
        r#"{"kind":"status-changed","cons_id":"100","new_status":"open"}"#,
    )
    .await;
    assert_eq!(opened, vec!["status_changed"]);

    let first_manager = harness
        .consultation("100")
        .await
        .unwrap()
        .assigned_manager
        .unwrap();
    let other = if first_manager == "m1" { "m2" } else { "m1" };
    let moved = feed(
        &harness,
        &format!(r#"{{"kind":"assignment-changed","cons_id":"100","new_assignee":"ext-{other}"}}"#),
    )
    .await;
    assert_eq!(
        moved,
        vec![
            "assigned",
            "notice_sent:reassignment",
            "notice_sent:queue_update"
        ]
    );

    let client_wrote = feed(
        &harness,
        r#"{"kind":"message-received","cons_id":"100","direction":"incoming",
            "message":"any news?"}"#,
    )
    .await;
    assert_eq!(client_wrote, vec!["touched"]);

    let closed = feed(
        &harness,
        r#"{"kind":"status-changed","cons_id":"100","new_status":"resolved"}"#,
    )
    .await;
    assert_eq!(closed, vec!["status_changed", "notice_sent:closure"]);

    let closure = &harness.transport.sent_of(NoticeKind::Closure)[0];
    let five_stars = closure.buttons[0][4].callback_data.clone();
    let rated = feed(
        &harness,
        &format!(
            r#"{{"kind":"rating-submitted","cons_id":"100","token":"{five_stars}",
                "comment":"fast\nand kind"}}"#
        ),
    )
    .await;
    assert_eq!(rated, vec!["rating_recorded"]);

    let rating = harness.storage.get_rating("100").await.unwrap().unwrap();
    assert_eq!(rating.value, 5);
    assert_eq!(rating.comment, "fast and kind");
    assert_eq!(rating.manager_key.as_deref(), Some(other));

    let kinds: Vec<_> = harness.transport.sent().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NoticeKind::Accepted,
            NoticeKind::Reassignment,
            NoticeKind::QueueUpdate,
            NoticeKind::Closure
        ]
    );
    assert!(harness
        .transport
        .sent()
        .iter()
        .all(|n| !n.counts_toward_response_metrics));
}

// ---- Test 2: Duplicate webhook deliveries ----

#[tokio::test]
async fn test_duplicate_deliveries_send_each_notice_once() {
    let harness = TestHarness::builder()
        .with_manager(manager("m1", 3))
        .with_consultation(consultation("200", at(9, 0)))
        .build()
        .await
        .unwrap();

    for _ in 0..3 {
        feed(&harness, r#"{"kind":"created","cons_id":"200"}"#).await;
    }
    for _ in 0..3 {
        feed(
            &harness,
            r#"{"kind":"status-changed","cons_id":"200","new_status":"closed"}"#,
        )
        .await;
    }

    assert_eq!(harness.transport.sent_of(NoticeKind::Accepted).len(), 1);
    assert_eq!(harness.transport.sent_of(NoticeKind::Closure).len(), 1);
    assert_eq!(
        harness.storage.ledger_entries("200").await.unwrap(),
        vec!["accepted", "closure"]
    );
}

// ---- Test 3: Routing respects capacity, hours and history ----

#[tokio::test]
async fn test_routing_skips_off_hours_and_full_managers() {
    let mut night = manager("night", 5);
    night.working_hours = Some(WorkingHours {
        start_hour: 22,
        end_hour: 6,
    });
    let harness = TestHarness::builder()
        .with_manager(night)
        .with_manager(manager("full", 1))
        .with_manager(manager("busy", 4))
        .with_consultation(finished("old", "busy", at(8, 0), 45))
        .with_consultation(assigned("x", "full", at(8, 0)))
        .with_consultation(assigned("y", "busy", at(8, 0)))
        .with_consultation(consultation("300", at(9, 0)))
        .build()
        .await
        .unwrap();

    let labels = feed(
        &harness,
        r#"{"kind":"created","cons_id":"300","received_at":"2026-03-02T09:01:00Z"}"#,
    )
    .await;
    assert_eq!(labels, vec!["assigned", "notice_sent:accepted"]);

    let stored = harness.consultation("300").await.unwrap();
    assert_eq!(stored.assigned_manager.as_deref(), Some("busy"));

    // Position 2 behind "y", one 45-minute handling time ahead: under an hour,
    // so the confirmation shows the position without an hours phrase.
    let accepted = &harness.transport.sent()[0];
    assert!(accepted.text.contains("Ваше место в очереди: 2."));
    assert!(!accepted.text.contains("ожидания"));
}

// ---- Test 4: Late events after closure ----

#[tokio::test]
async fn test_late_reassignment_after_close_is_ignored() {
    let harness = TestHarness::builder()
        .with_manager(manager("m1", 3))
        .with_manager(manager("m2", 3))
        .with_consultation(assigned("400", "m1", at(9, 0)))
        .build()
        .await
        .unwrap();

    feed(
        &harness,
        r#"{"kind":"status-changed","cons_id":"400","new_status":"cancelled"}"#,
    )
    .await;
    let late = feed(
        &harness,
        r#"{"kind":"assignment-changed","cons_id":"400","new_assignee":"ext-m2"}"#,
    )
    .await;
    assert_eq!(late, vec!["ignored:already_terminal"]);

    let stored = harness.consultation("400").await.unwrap();
    assert_eq!(stored.status, ConsultationStatus::Cancelled);
    assert_eq!(stored.assigned_manager.as_deref(), Some("m1"));
    assert_eq!(harness.transport.sent().len(), 1);
    assert_eq!(harness.transport.sent()[0].kind, NoticeKind::Cancellation);
}

// ---- Test 5: Unrecognized input ----

#[tokio::test]
async fn test_unknown_event_kind_is_reported_not_failed() {
    let harness = TestHarness::builder().build().await.unwrap();
    let labels = feed(&harness, r#"{"kind":"conversation-typing","cons_id":"1"}"#).await;
    assert_eq!(labels, vec!["ignored:unknown_kind"]);

    let handled = harness.logs.for_sink(LogSink::Business);
    assert_eq!(handled.last().unwrap().message, "lifecycle event handled");
    assert_eq!(
        handled.last().unwrap().field_value("effects"),
        Some("ignored:unknown_kind")
    );
}
