//! API-facing request/response models.
//!
//! Transport-agnostic: a web layer deserializes the request types, calls the functions
//! here and maps errors with [`status_code`].

use serde::{Deserialize, Serialize};

use crate::core::{PipelineError, Seating, SeatingError, SeatingManager};
use crate::util::serde::GroupId;

/// Arrival payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArriveRequest {
    /// Party size.
    pub size: u32,
}

/// Arrival result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArriveResponse {
    /// Identifier to use for lookup and leave.
    pub group_id: GroupId,
}

/// Lookup result; `table` is absent while the group waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    /// Group identifier.
    pub group_id: GroupId,
    /// Assigned table.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub table: Option<Seating>,
}

/// Health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Groups registered and not yet gone.
    pub registered_groups: usize,
    /// Tasks waiting in the admission pipeline.
    pub pending_tasks: usize,
}

/// Register an arriving group.
///
/// # Errors
///
/// See [`SeatingManager::arrive`].
pub fn arrive(manager: &SeatingManager, req: ArriveRequest) -> Result<ArriveResponse, SeatingError> {
    manager
        .arrive(req.size)
        .map(|group_id| ArriveResponse { group_id })
}

/// Look a group up.
///
/// # Errors
///
/// See [`SeatingManager::lookup`].
pub fn lookup(manager: &SeatingManager, group_id: GroupId) -> Result<LookupResponse, SeatingError> {
    manager
        .lookup(group_id)
        .map(|table| LookupResponse { group_id, table })
}

/// Remove a group.
///
/// # Errors
///
/// See [`SeatingManager::leave`].
pub fn leave(manager: &SeatingManager, group_id: GroupId) -> Result<(), SeatingError> {
    manager.leave(group_id)
}

/// Return a health payload; unhealthy once the pipeline stops.
#[must_use]
pub fn health(manager: &SeatingManager) -> Health {
    let stats = manager.pipeline_stats();
    Health {
        ok: !manager.is_shutdown(),
        registered_groups: manager.registered_groups(),
        pending_tasks: stats.pending_tasks,
    }
}

/// HTTP status for an error: 422 for bad input, 404 for unknown groups, 503 when the
/// pipeline is stopped or full, 500 otherwise.
#[must_use]
pub const fn status_code(err: &SeatingError) -> u16 {
    match err {
        SeatingError::InvalidGroupSize(_) => 422,
        SeatingError::GroupNotFound(_) => 404,
        SeatingError::Pipeline(PipelineError::Shutdown | PipelineError::Full) => 503,
        _ => 500,
    }
}
