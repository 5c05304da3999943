//! Tests for error types

use restaurant_seating::core::{PipelineError, SeatingError};
use restaurant_seating::util::serde::{GroupId, TableId};

#[test]
fn test_invalid_group_size_error() {
    let err = SeatingError::InvalidGroupSize(7);
    assert_eq!(format!("{}", err), "invalid group size 7: must be between 1 and 6");
}

#[test]
fn test_group_not_found_error() {
    let id = GroupId::new();
    let err = SeatingError::GroupNotFound(id);
    assert_eq!(format!("{}", err), format!("clients group {id} not found"));
}

#[test]
fn test_capacity_exceeded_error() {
    let err = SeatingError::CapacityExceeded {
        table: TableId(3),
        requested: 4,
        free: 1,
    };
    assert_eq!(
        format!("{}", err),
        "table-3 cannot seat 4 clients: only 1 seats free"
    );
}

#[test]
fn test_pipeline_error_is_transparent() {
    let err: SeatingError = PipelineError::Shutdown.into();
    assert_eq!(format!("{}", err), "admission pipeline has been shut down");
    assert!(matches!(err, SeatingError::Pipeline(PipelineError::Shutdown)));
}

#[test]
fn test_errors_convert_to_anyhow() {
    let err: anyhow::Error = SeatingError::InvalidConfig("tables".into()).into();
    assert_eq!(err.to_string(), "invalid configuration: tables");
    assert!(err.downcast_ref::<SeatingError>().is_some());
}
