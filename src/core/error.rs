//! Error types for seating operations.

use thiserror::Error;

use crate::core::pipeline::PipelineError;
use crate::util::serde::{GroupId, TableId};

/// Errors produced by seating components.
#[derive(Debug, Error)]
pub enum SeatingError {
    /// Arrival request with a party size outside 1..=6.
    #[error("invalid group size {0}: must be between 1 and 6")]
    InvalidGroupSize(u32),
    /// Table configured with a capacity outside 2..=6.
    #[error("invalid table size {0}: must be between 2 and 6")]
    InvalidTableSize(u32),
    /// Unknown group identifier.
    #[error("clients group {0} not found")]
    GroupNotFound(GroupId),
    /// Unknown table identifier.
    #[error("{0} not found")]
    TableNotFound(TableId),
    /// Seating would overflow the table.
    #[error("{table} cannot seat {requested} clients: only {free} seats free")]
    CapacityExceeded {
        /// Target table.
        table: TableId,
        /// Seats requested.
        requested: u32,
        /// Seats free at the time of the request.
        free: u32,
    },
    /// Vacating more seats than are occupied.
    #[error("{table} cannot release {requested} seats: only {occupied} occupied")]
    NegativeCapacity {
        /// Target table.
        table: TableId,
        /// Seats to release.
        requested: u32,
        /// Seats occupied at the time of the request.
        occupied: u32,
    },
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Admission pipeline rejected or lost a task.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
