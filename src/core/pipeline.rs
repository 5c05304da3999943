//! Admission pipeline: a bounded task channel drained by one dedicated worker thread.
//!
//! Every task runs to completion before the next one is taken, in the order it was
//! scheduled. The worker exclusively owns a [`TaskHandler`], so state held by the
//! handler needs no locking.
//!
//! # Key Features
//!
//! - **Backpressure**: `schedule` blocks while the channel is full; nothing is dropped
//! - **Dual API**: blocking (`schedule`) and async (`schedule_async`)
//! - **Failure isolation**: a task that errors or panics is logged and counted, the
//!   worker keeps going
//! - **Explicit shutdown**: drain or abandon queued tasks, see [`ShutdownPolicy`]
//!
//! # Example
//!
//! ```rust,ignore
//! use restaurant_seating::config::PipelineConfig;
//! use restaurant_seating::core::{AdmissionPipeline, TaskHandler, SeatingError};
//!
//! struct Echo;
//!
//! impl TaskHandler<String> for Echo {
//!     fn handle(&mut self, task: String) -> Result<(), SeatingError> {
//!         println!("{task}");
//!         Ok(())
//!     }
//! }
//!
//! let pipeline = AdmissionPipeline::new(PipelineConfig::new().with_capacity(16), Echo)?;
//! pipeline.schedule("hello".to_string())?;
//! pipeline.shutdown();
//! ```
//!
//! [`ShutdownPolicy`]: crate::config::ShutdownPolicy

mod worker;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::SeatingError;

pub use worker::AdmissionPipeline;

/// Errors that can occur when using an [`AdmissionPipeline`].
#[derive(Debug)]
pub enum PipelineError {
    /// The channel is full (only returned by non-blocking scheduling).
    Full,

    /// The pipeline has been shut down.
    Shutdown,

    /// Configuration validation failed.
    InvalidConfig(String),

    /// Internal error (worker thread could not start, reply channel dropped, etc.).
    Internal(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "admission pipeline is full"),
            Self::Shutdown => write!(f, "admission pipeline has been shut down"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Work executed on the pipeline's worker thread.
///
/// The handler is moved onto the worker and only ever called from there, one task at a
/// time.
pub trait TaskHandler<T>: Send + 'static {
    /// Execute one task to completion.
    ///
    /// # Errors
    ///
    /// An error is logged and counted by the worker; it never reaches the scheduler.
    fn handle(&mut self, task: T) -> Result<(), SeatingError>;
}

/// Statistics about pipeline throughput.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Bounded channel size.
    pub capacity: usize,

    /// Tasks waiting in the channel.
    pub pending_tasks: usize,

    /// Total tasks accepted.
    pub scheduled_tasks: u64,

    /// Tasks that ran successfully.
    pub completed_tasks: u64,

    /// Tasks that returned an error or panicked.
    pub failed_tasks: u64,

    /// Tasks discarded at shutdown.
    pub abandoned_tasks: u64,
}

/// Internal counters for pipeline statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct PipelineCounters {
    pub scheduled_tasks: AtomicU64,
    pub completed_tasks: AtomicU64,
    pub failed_tasks: AtomicU64,
    pub abandoned_tasks: AtomicU64,
}

impl PipelineCounters {
    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, capacity: usize, pending_tasks: usize) -> PipelineStats {
        PipelineStats {
            capacity,
            pending_tasks,
            scheduled_tasks: self.scheduled_tasks.load(Ordering::Relaxed),
            completed_tasks: self.completed_tasks.load(Ordering::Relaxed),
            failed_tasks: self.failed_tasks.load(Ordering::Relaxed),
            abandoned_tasks: self.abandoned_tasks.load(Ordering::Relaxed),
        }
    }
}
