//! Tests for audit sink

use std::sync::Arc;

use parking_lot::Mutex;
use restaurant_seating::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};
use restaurant_seating::util::serde::{GroupId, TableId};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);
    let group = GroupId::new();

    let event = build_audit_event(
        AuditAction::TableFound,
        Some(group),
        Some(TableId(2)),
        Some("exact".to_string()),
    );
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].group_id, Some(group));
    assert_eq!(events[0].table_id, Some(TableId(2)));
    assert_eq!(events[0].action, AuditAction::TableFound);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    for action in [AuditAction::Arrive, AuditAction::PassStarted, AuditAction::Leave] {
        sink.record(build_audit_event(action, None, None, None));
    }

    let actions: Vec<AuditAction> = sink.events().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::PassStarted, AuditAction::Leave]);
}

#[test]
fn test_zero_capacity_sink_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event(AuditAction::Arrive, None, None, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_events_for_filters_by_action() {
    let mut sink = InMemoryAuditSink::new(10);
    sink.record(build_audit_event(AuditAction::Arrive, None, None, None));
    sink.record(build_audit_event(AuditAction::Leave, None, None, None));
    sink.record(build_audit_event(AuditAction::Arrive, None, None, None));

    assert_eq!(sink.events_for(AuditAction::Arrive).len(), 2);
    assert_eq!(sink.events_for(AuditAction::PassFinished).len(), 0);
}

#[test]
fn test_shared_sink_records_through_handle() {
    let shared = Arc::new(Mutex::new(InMemoryAuditSink::new(4)));
    let mut writer = Arc::clone(&shared);
    writer.record(build_audit_event(AuditAction::Arrive, None, None, None));
    assert_eq!(shared.lock().events().len(), 1);
}

#[test]
fn test_audit_event_serializes_snake_case_action() {
    let event = build_audit_event(AuditAction::PassFinished, None, None, None);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "pass_finished");
}
