//! Tests for utility functions

use restaurant_seating::util::{init_tracing, now_ms, GroupId, TableId, DEFAULT_LOG_FILTER};
use uuid::Uuid;

#[test]
fn test_group_id_serializes_as_uuid() {
    let uuid = Uuid::new_v4();
    let id = GroupId::from(uuid);
    assert_eq!(serde_json::to_value(id).unwrap(), uuid.to_string());
    assert_eq!(id.as_uuid(), &uuid);
    assert_eq!(id.to_string(), uuid.to_string());
}

#[test]
fn test_table_id_display() {
    assert_eq!(TableId(7).to_string(), "table-7");
}

#[test]
fn test_now_ms_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(b >= a);
    assert!(a > 0);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    assert!(DEFAULT_LOG_FILTER.starts_with("restaurant_seating"));
}
