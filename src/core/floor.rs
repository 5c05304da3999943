//! Worker-owned seating state and the tasks that mutate it.
//!
//! The [`Floor`] owns the table inventory, the waiting queue and the record of which
//! group sits where. It lives on the admission worker thread, so arrivals, departures
//! and allocator passes are applied one at a time in scheduling order.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::allocator::{self, PassError, PassOutcome, Placement};
use crate::core::inventory::TableSnapshot;
use crate::core::{
    build_audit_event, AuditAction, AuditSink, GroupSize, Seating, SeatingError, TableInventory,
    TaskHandler, WaitingGroup, WaitingQueue,
};
use crate::infra::registry::GroupRegistry;
use crate::util::serde::{GroupId, TableId};

/// Work items executed by the admission worker.
#[derive(Debug)]
pub enum SeatingTask {
    /// Append a registered group to the waiting queue.
    Admit {
        /// Group identity.
        id: GroupId,
        /// Party size.
        size: GroupSize,
        /// Arrival time (ms since epoch).
        arrived_at_ms: u128,
    },
    /// Release the group's table, or drop it from the queue.
    Depart {
        /// Group identity.
        id: GroupId,
    },
    /// Run one allocator pass.
    Reallocate,
    /// Barrier: replies once every earlier task has run.
    Flush {
        /// Reply channel.
        reply: Sender<()>,
    },
    /// Reply with the current floor state.
    Snapshot {
        /// Reply channel.
        reply: Sender<FloorSnapshot>,
    },
}

/// Point-in-time view of the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    /// Every table with its occupancy.
    pub tables: Vec<TableSnapshot>,
    /// Waiting groups in queue order.
    pub waiting: Vec<GroupId>,
    /// Number of groups currently seated.
    pub seated: usize,
}

impl FloorSnapshot {
    /// Total free seats across all tables.
    #[must_use]
    pub fn free_seats(&self) -> u32 {
        self.tables.iter().map(|t| t.capacity - t.occupied).sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct Assignment {
    table: TableId,
    size: GroupSize,
}

/// Seating state owned by the admission worker.
pub struct Floor {
    inventory: TableInventory,
    queue: WaitingQueue,
    /// Single source of truth for seat/vacate pairing.
    assignments: HashMap<GroupId, Assignment>,
    registry: Arc<dyn GroupRegistry>,
    audit: Option<Box<dyn AuditSink>>,
}

impl Floor {
    /// Create a floor over an inventory and an initial waiting queue.
    #[must_use]
    pub fn new(
        inventory: TableInventory,
        queue: WaitingQueue,
        registry: Arc<dyn GroupRegistry>,
    ) -> Self {
        Self {
            inventory,
            queue,
            assignments: HashMap::new(),
            registry,
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Table inventory.
    #[must_use]
    pub const fn inventory(&self) -> &TableInventory {
        &self.inventory
    }

    /// Waiting queue.
    #[must_use]
    pub const fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    /// Table of a seated group.
    #[must_use]
    pub fn table_of(&self, id: GroupId) -> Option<TableId> {
        self.assignments.get(&id).map(|a| a.table)
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> FloorSnapshot {
        FloorSnapshot {
            tables: self.inventory.snapshot(),
            waiting: self.queue.ids(),
            seated: self.assignments.len(),
        }
    }

    /// Put a group at the tail of the waiting queue.
    pub fn admit(&mut self, group: WaitingGroup) {
        if self.assignments.contains_key(&group.id) || !self.queue.push_back(group) {
            warn!(group_id = %group.id, "group already admitted, ignoring");
            return;
        }
        info!(
            group_id = %group.id,
            size = group.size.get(),
            waiting = self.queue.len(),
            "group admitted to waiting queue"
        );
        self.record(AuditAction::Arrive, Some(group.id), None, None);
    }

    /// Release a departing group's seats or remove it from the queue.
    ///
    /// # Errors
    ///
    /// Propagates inventory invariant violations from `vacate`.
    pub fn depart(&mut self, id: GroupId) -> Result<(), SeatingError> {
        if let Some(assignment) = self.assignments.remove(&id) {
            self.inventory.vacate(assignment.table, assignment.size.get())?;
            self.registry.assign(id, None);
            info!(group_id = %id, table_id = %assignment.table, "group left its table");
            self.record(
                AuditAction::Leave,
                Some(id),
                Some(assignment.table),
                None,
            );
        } else if self.queue.remove(id).is_some() {
            info!(group_id = %id, "group left the waiting queue");
            self.record(AuditAction::Leave, Some(id), None, Some("from queue".into()));
        } else {
            debug!(group_id = %id, "departing group is neither seated nor queued");
        }
        Ok(())
    }

    /// Run one allocator pass and publish the seatings to the registry.
    ///
    /// # Errors
    ///
    /// Propagates inventory invariant violations; seatings made before the failure
    /// are still published.
    pub fn reallocate(&mut self) -> Result<PassOutcome, SeatingError> {
        if self.queue.is_empty() {
            debug!("waiting queue empty, skipping pass");
            return Ok(PassOutcome::default());
        }

        let waiting = self.queue.len();
        debug!(waiting, "allocator pass started");
        self.record(AuditAction::PassStarted, None, None, None);

        let (outcome, failure) = match allocator::run_pass(&mut self.inventory, &mut self.queue) {
            Ok(outcome) => (outcome, None),
            Err(PassError { outcome, source }) => (outcome, Some(source)),
        };

        for placement in &outcome.seated {
            self.seat(placement);
        }
        if let Some(e) = failure {
            return Err(e);
        }

        info!(
            seated = outcome.seated.len(),
            waiting = outcome.still_waiting,
            "allocator pass finished"
        );
        self.record(
            AuditAction::PassFinished,
            None,
            None,
            Some(format!(
                "seated {}, waiting {}",
                outcome.seated.len(),
                outcome.still_waiting
            )),
        );
        Ok(outcome)
    }

    fn seat(&mut self, placement: &Placement) {
        let Placement {
            group,
            table,
            capacity,
            size,
            ..
        } = *placement;
        self.assignments.insert(group, Assignment { table, size });
        if !self.registry.assign(group, Some(Seating { table, capacity })) {
            debug!(group_id = %group, "seated group no longer registered, departure pending");
        }
        self.record(AuditAction::TableFound, Some(group), Some(table), None);
    }

    fn record(
        &mut self,
        action: AuditAction,
        group_id: Option<GroupId>,
        table_id: Option<TableId>,
        detail: Option<String>,
    ) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(action, group_id, table_id, detail));
        }
    }
}

impl TaskHandler<SeatingTask> for Floor {
    fn handle(&mut self, task: SeatingTask) -> Result<(), SeatingError> {
        match task {
            SeatingTask::Admit {
                id,
                size,
                arrived_at_ms,
            } => {
                self.admit(WaitingGroup {
                    id,
                    size,
                    arrived_at_ms,
                });
                Ok(())
            }
            SeatingTask::Depart { id } => self.depart(id),
            SeatingTask::Reallocate => self.reallocate().map(|_| ()),
            SeatingTask::Flush { reply } => {
                let _ = reply.send(());
                Ok(())
            }
            SeatingTask::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
                Ok(())
            }
        }
    }
}
