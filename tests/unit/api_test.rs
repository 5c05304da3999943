//! Tests for the API surface

use restaurant_seating::builders::SeatingManagerBuilder;
use restaurant_seating::config::SeatingConfig;
use restaurant_seating::core::{PipelineError, SeatingError};
use restaurant_seating::runtime::{
    arrive, health, leave, lookup, status_code, ArriveRequest, LookupResponse,
};
use restaurant_seating::util::serde::{GroupId, TableId};

fn manager() -> restaurant_seating::core::SeatingManager {
    SeatingManagerBuilder::new(SeatingConfig::new(vec![2, 3, 4, 5, 6]))
        .build()
        .unwrap()
}

#[test]
fn test_arrive_lookup_leave_round() {
    let manager = manager();
    let req: ArriveRequest = serde_json::from_str(r#"{ "size": 3 }"#).unwrap();
    let resp = arrive(&manager, req).unwrap();
    manager.flush().unwrap();

    let found = lookup(&manager, resp.group_id).unwrap();
    assert_eq!(found.group_id, resp.group_id);
    assert_eq!(found.table.map(|s| s.table), Some(TableId(1)));

    leave(&manager, resp.group_id).unwrap();
    let gone = lookup(&manager, resp.group_id).unwrap();
    assert_eq!(gone.group_id, resp.group_id);
    assert!(gone.table.is_none());

    let err = lookup(&manager, GroupId::new()).unwrap_err();
    assert_eq!(status_code(&err), 404);
    let err = leave(&manager, resp.group_id).unwrap_err();
    assert_eq!(status_code(&err), 404);
    manager.shutdown();
}

#[test]
fn test_waiting_lookup_omits_table() {
    let resp = LookupResponse {
        group_id: GroupId::new(),
        table: None,
    };
    let json = serde_json::to_value(resp).unwrap();
    assert!(json.get("table").is_none());
}

#[test]
fn test_status_codes() {
    assert_eq!(status_code(&SeatingError::InvalidGroupSize(0)), 422);
    assert_eq!(status_code(&SeatingError::GroupNotFound(GroupId::new())), 404);
    assert_eq!(status_code(&PipelineError::Shutdown.into()), 503);
    assert_eq!(status_code(&PipelineError::Full.into()), 503);
    assert_eq!(status_code(&SeatingError::InvalidConfig("x".into())), 500);
}

#[test]
fn test_health_reflects_pipeline_state() {
    let manager = manager();
    arrive(&manager, ArriveRequest { size: 2 }).unwrap();
    manager.flush().unwrap();

    let h = health(&manager);
    assert!(h.ok);
    assert_eq!(h.registered_groups, 1);
    assert_eq!(h.pending_tasks, 0);

    manager.shutdown();
    assert!(!health(&manager).ok);
}

#[test]
fn test_invalid_arrival_maps_to_422() {
    let manager = manager();
    let err = arrive(&manager, ArriveRequest { size: 0 }).unwrap_err();
    assert_eq!(status_code(&err), 422);
    manager.shutdown();
}
