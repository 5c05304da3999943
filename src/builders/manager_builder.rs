//! Wires inventory, registry, floor and admission pipeline into a [`SeatingManager`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::config::SeatingConfig;
use crate::core::{
    AdmissionPipeline, AuditSink, Floor, InMemoryAuditSink, SeatingError, SeatingManager,
    TableInventory, WaitingGroup, WaitingQueue,
};
use crate::infra::registry::{GroupRegistry, InMemoryGroupRegistry};
use crate::util::serde::GroupId;

/// Step-by-step construction of a [`SeatingManager`].
pub struct SeatingManagerBuilder {
    config: SeatingConfig,
    registry: Option<Arc<dyn GroupRegistry>>,
    waiting: Vec<GroupId>,
    audit: Option<Box<dyn AuditSink>>,
}

impl SeatingManagerBuilder {
    /// Start from a configuration; defaults to an in-memory registry and no audit.
    #[must_use]
    pub fn new(config: SeatingConfig) -> Self {
        Self {
            config,
            registry: None,
            waiting: Vec::new(),
            audit: None,
        }
    }

    /// Use an existing registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn GroupRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Pre-populate the waiting queue, in order, with unseated groups already in the registry.
    ///
    /// Nothing is seated until the first pass runs.
    #[must_use]
    pub fn with_waiting<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = GroupId>,
    {
        self.waiting.extend(ids);
        self
    }

    /// Record floor events into `sink`.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Box::new(sink));
        self
    }

    /// Validate the configuration and start the admission worker.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::InvalidConfig`] if the configuration is invalid or a pre-queued
    ///   group is already seated
    /// - [`SeatingError::GroupNotFound`] if a pre-queued id is not registered
    /// - [`SeatingError::Pipeline`] if the worker cannot be started
    pub fn build(self) -> Result<SeatingManager, SeatingError> {
        self.config.validate().map_err(SeatingError::InvalidConfig)?;

        let inventory = TableInventory::from_config(&self.config.tables)?;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(InMemoryGroupRegistry::new()));

        let queue = self
            .waiting
            .iter()
            .map(|id| {
                let group = registry.get(*id).ok_or(SeatingError::GroupNotFound(*id))?;
                if group.is_seated() {
                    return Err(SeatingError::InvalidConfig(format!(
                        "group {id} is already seated and cannot wait"
                    )));
                }
                Ok(WaitingGroup {
                    id: group.id,
                    size: group.size,
                    arrived_at_ms: group.arrived_at_ms,
                })
            })
            .collect::<Result<WaitingQueue, _>>()?;

        info!(
            tables = inventory.len(),
            waiting = queue.len(),
            capacity = self.config.pipeline.capacity,
            "building seating manager"
        );

        let mut floor = Floor::new(inventory, queue, Arc::clone(&registry));
        if let Some(audit) = self.audit {
            floor = floor.with_audit(audit);
        }
        let pipeline = AdmissionPipeline::new(self.config.pipeline, floor)?;
        Ok(SeatingManager::new(registry, pipeline))
    }
}

/// Build a manager with an in-memory registry and a shared in-memory audit log sized by
/// `audit_capacity`.
///
/// # Errors
///
/// Same as [`SeatingManagerBuilder::build`].
pub fn build_manager(
    cfg: &SeatingConfig,
) -> Result<(SeatingManager, Arc<Mutex<InMemoryAuditSink>>), SeatingError> {
    let audit = Arc::new(Mutex::new(InMemoryAuditSink::new(cfg.audit_capacity)));
    let manager = SeatingManagerBuilder::new(cfg.clone())
        .with_audit_sink(Arc::clone(&audit))
        .build()?;
    Ok((manager, audit))
}
