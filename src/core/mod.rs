//! Seating domain: tables, waiting queue, allocator, admission pipeline and manager.

pub mod allocator;
pub mod audit;
pub mod error;
pub mod floor;
pub mod group;
pub mod inventory;
pub mod manager;
pub mod pipeline;
pub mod table;
pub mod waiting;

pub use allocator::{find_table, run_pass, MatchKind, PassError, PassOutcome, Placement};
pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, SeatingError};
pub use floor::{Floor, FloorSnapshot, SeatingTask};
pub use group::{ClientsGroup, GroupSize, Seating, MAX_GROUP_SIZE, MIN_GROUP_SIZE};
pub use inventory::{TableInventory, TableSnapshot};
pub use manager::SeatingManager;
pub use pipeline::{AdmissionPipeline, PipelineError, PipelineStats, TaskHandler};
pub use table::{Table, MAX_TABLE_SIZE, MIN_TABLE_SIZE};
pub use waiting::{WaitingGroup, WaitingQueue};
