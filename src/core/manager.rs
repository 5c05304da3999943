//! Seating manager: the arrive / leave / lookup surface.
//!
//! Request threads validate input and update the group registry synchronously, then
//! hand the floor mutation to the admission pipeline and return without waiting for
//! the allocator.
//!
//! ```rust,ignore
//! use restaurant_seating::builders::SeatingManagerBuilder;
//! use restaurant_seating::config::SeatingConfig;
//!
//! let manager = SeatingManagerBuilder::new(SeatingConfig::new(vec![2, 3, 4, 5, 6])).build()?;
//! let id = manager.arrive(4)?;
//! manager.flush()?;
//! assert_eq!(manager.lookup(id)?.map(|s| s.capacity), Some(4));
//! manager.leave(id)?;
//! manager.shutdown();
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::floor::{FloorSnapshot, SeatingTask};
use crate::core::{
    AdmissionPipeline, ClientsGroup, GroupSize, PipelineError, PipelineStats, Seating,
    SeatingError,
};
use crate::infra::registry::GroupRegistry;
use crate::util::serde::GroupId;

/// Entry point used by the request layer.
pub struct SeatingManager {
    registry: Arc<dyn GroupRegistry>,
    pipeline: AdmissionPipeline<SeatingTask>,
}

impl SeatingManager {
    /// Wire a manager from a registry and a running pipeline whose worker owns the floor.
    #[must_use]
    pub fn new(registry: Arc<dyn GroupRegistry>, pipeline: AdmissionPipeline<SeatingTask>) -> Self {
        Self { registry, pipeline }
    }

    /// Register an arriving group and queue it for seating.
    ///
    /// Returns as soon as the group is queued; seating happens on the next pass.
    /// Once the group is queued its id is returned even if the follow-up pass cannot
    /// be scheduled.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::InvalidGroupSize`] if `size` is outside 1..=6 (nothing is changed)
    /// - [`SeatingError::Pipeline`] if the pipeline is shut down (registration is undone)
    pub fn arrive(&self, size: u32) -> Result<GroupId, SeatingError> {
        let group = self.register(size)?;
        self.pipeline
            .schedule(admit_task(&group))
            .map_err(|e| self.rollback(&group, e))?;
        if let Err(e) = self.pipeline.schedule(SeatingTask::Reallocate) {
            pass_not_scheduled(group.id, &e);
        }
        Ok(group.id)
    }

    /// Release a group's table, or remove it from the waiting queue.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::GroupNotFound`] if the id is unknown or has already left
    ///   (nothing is changed)
    /// - [`SeatingError::Pipeline`] if the pipeline is shut down
    pub fn leave(&self, id: GroupId) -> Result<(), SeatingError> {
        let group = self.registry.remove(id)?;
        info!(group_id = %id, seated = group.is_seated(), "group leaving");
        self.pipeline.schedule(SeatingTask::Depart { id })?;
        self.pipeline.schedule(SeatingTask::Reallocate)?;
        Ok(())
    }

    /// Current table of a group, or `None` while it waits or after it has left.
    ///
    /// # Errors
    ///
    /// [`SeatingError::GroupNotFound`] if the id was never issued.
    pub fn lookup(&self, id: GroupId) -> Result<Option<Seating>, SeatingError> {
        match self.registry.get(id) {
            Some(group) => Ok(group.table),
            None if self.registry.is_departed(id) => Ok(None),
            None => Err(SeatingError::GroupNotFound(id)),
        }
    }

    /// Schedule an allocator pass without any other change.
    ///
    /// # Errors
    ///
    /// [`SeatingError::Pipeline`] if the pipeline is shut down.
    pub fn reallocate(&self) -> Result<(), SeatingError> {
        self.pipeline.schedule(SeatingTask::Reallocate)?;
        Ok(())
    }

    /// Block until every task scheduled before this call has run.
    ///
    /// # Errors
    ///
    /// [`SeatingError::Pipeline`] if the pipeline is shut down or the barrier is discarded.
    pub fn flush(&self) -> Result<(), SeatingError> {
        let (reply, rx) = crossbeam_channel::bounded(1);
        self.pipeline.schedule(SeatingTask::Flush { reply })?;
        rx.recv().map_err(|_| barrier_lost())?;
        Ok(())
    }

    /// Current floor state, taken by the worker after every earlier task.
    ///
    /// # Errors
    ///
    /// [`SeatingError::Pipeline`] if the pipeline is shut down or the request is discarded.
    pub fn snapshot(&self) -> Result<FloorSnapshot, SeatingError> {
        let (reply, rx) = crossbeam_channel::bounded(1);
        self.pipeline.schedule(SeatingTask::Snapshot { reply })?;
        Ok(rx.recv().map_err(|_| barrier_lost())?)
    }

    /// Async variant of [`Self::arrive`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::arrive`].
    #[cfg(feature = "tokio-runtime")]
    pub async fn arrive_async(&self, size: u32) -> Result<GroupId, SeatingError> {
        let group = self.register(size)?;
        self.pipeline
            .schedule_async(admit_task(&group))
            .await
            .map_err(|e| self.rollback(&group, e))?;
        if let Err(e) = self.pipeline.schedule_async(SeatingTask::Reallocate).await {
            pass_not_scheduled(group.id, &e);
        }
        Ok(group.id)
    }

    /// Async variant of [`Self::leave`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::leave`].
    #[cfg(feature = "tokio-runtime")]
    pub async fn leave_async(&self, id: GroupId) -> Result<(), SeatingError> {
        let group = self.registry.remove(id)?;
        info!(group_id = %id, seated = group.is_seated(), "group leaving");
        self.pipeline.schedule_async(SeatingTask::Depart { id }).await?;
        self.pipeline.schedule_async(SeatingTask::Reallocate).await?;
        Ok(())
    }

    /// Async variant of [`Self::reallocate`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::reallocate`].
    #[cfg(feature = "tokio-runtime")]
    pub async fn reallocate_async(&self) -> Result<(), SeatingError> {
        self.pipeline.schedule_async(SeatingTask::Reallocate).await?;
        Ok(())
    }

    /// Async variant of [`Self::flush`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::flush`].
    #[cfg(feature = "tokio-runtime")]
    pub async fn flush_async(&self) -> Result<(), SeatingError> {
        let (reply, rx) = crossbeam_channel::bounded(1);
        self.pipeline.schedule_async(SeatingTask::Flush { reply }).await?;
        tokio::task::spawn_blocking(move || rx.recv())
            .await
            .map_err(|e| PipelineError::Internal(format!("flush wait failed: {e}")))?
            .map_err(|_| barrier_lost())?;
        Ok(())
    }

    /// Admission pipeline statistics.
    #[must_use]
    pub fn pipeline_stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// Number of groups currently registered (seated or waiting).
    #[must_use]
    pub fn registered_groups(&self) -> usize {
        self.registry.len()
    }

    /// The registry this manager writes to.
    #[must_use]
    pub fn registry(&self) -> &Arc<dyn GroupRegistry> {
        &self.registry
    }

    /// True once the admission pipeline has stopped accepting work.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.pipeline.is_shutdown()
    }

    /// Stop the admission pipeline according to its shutdown policy and wait for it.
    pub fn shutdown(&self) {
        self.pipeline.shutdown();
    }

    fn register(&self, size: u32) -> Result<ClientsGroup, SeatingError> {
        let size = GroupSize::new(size)?;
        let group = self.registry.create(size);
        debug!(group_id = %group.id, size = size.get(), "group arrived");
        Ok(group)
    }

    fn rollback(&self, group: &ClientsGroup, err: PipelineError) -> SeatingError {
        self.registry.discard(group.id);
        debug!(group_id = %group.id, error = %err, "arrival rejected, registration undone");
        err.into()
    }
}

fn admit_task(group: &ClientsGroup) -> SeatingTask {
    SeatingTask::Admit {
        id: group.id,
        size: group.size,
        arrived_at_ms: group.arrived_at_ms,
    }
}

fn pass_not_scheduled(id: GroupId, err: &PipelineError) {
    warn!(group_id = %id, error = %err, "group queued but no pass scheduled");
}

fn barrier_lost() -> PipelineError {
    PipelineError::Internal("admission worker dropped the reply".into())
}
