//! Native implementation of `AdmissionPipeline` using one dedicated OS thread.
//!
//! # Design Principles
//!
//! - **No polling**: the worker blocks in `select!` on the task and shutdown channels
//! - **Single consumer**: exactly one thread ever calls the handler
//! - **Clean shutdown**: dropping the shutdown sender wakes the worker, which then
//!   takes every task still arriving from callers already inside `send` until the last
//!   sender clone is gone, so an accepted task is always run or counted as abandoned

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{PipelineConfig, ShutdownPolicy};

use super::{PipelineCounters, PipelineError, PipelineStats, TaskHandler};

/// Bounded, backpressured task queue with a single sequential worker.
pub struct AdmissionPipeline<T>
where
    T: Send + 'static,
{
    /// Pipeline configuration.
    config: PipelineConfig,

    /// Task sender. `None` once shutdown has started.
    task_tx: Mutex<Option<Sender<T>>>,

    /// Dropping this sender is the shutdown signal.
    shutdown_tx: Mutex<Option<Sender<()>>>,

    /// Pipeline statistics counters (lock-free atomics).
    counters: Arc<PipelineCounters>,

    /// Shutdown flag (lock-free atomic).
    shutdown: AtomicBool,

    /// Worker thread handle.
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<T> AdmissionPipeline<T>
where
    T: Send + 'static,
{
    /// Create the pipeline and start its worker thread, which takes ownership of `handler`.
    ///
    /// # Errors
    ///
    /// - `PipelineError::InvalidConfig` if the configuration is invalid
    /// - `PipelineError::Internal` if the worker thread cannot be spawned
    pub fn new<H>(config: PipelineConfig, handler: H) -> Result<Self, PipelineError>
    where
        H: TaskHandler<T>,
    {
        config.validate().map_err(PipelineError::InvalidConfig)?;

        let (task_tx, task_rx) = bounded::<T>(config.capacity);
        // Nothing is ever sent on this channel; disconnection is the signal.
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let counters = Arc::new(PipelineCounters::default());

        let worker = spawn_worker(
            config.thread_name.clone(),
            config.shutdown,
            task_rx,
            shutdown_rx,
            Arc::clone(&counters),
            handler,
        )
        .map_err(|e| PipelineError::Internal(format!("failed to spawn admission worker: {e}")))?;

        info!(
            capacity = config.capacity,
            shutdown_policy = ?config.shutdown,
            thread = %config.thread_name,
            "admission pipeline started"
        );

        Ok(Self {
            config,
            task_tx: Mutex::new(Some(task_tx)),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            counters,
            shutdown: AtomicBool::new(false),
            worker: Mutex::new(Some(worker)),
        })
    }

    fn sender(&self) -> Result<Sender<T>, PipelineError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(PipelineError::Shutdown);
        }
        // Clone under a brief lock; blocking sends must not hold it.
        self.task_tx
            .lock()
            .as_ref()
            .cloned()
            .ok_or(PipelineError::Shutdown)
    }

    /// Schedule a task, blocking while the channel is full.
    ///
    /// # Errors
    ///
    /// `PipelineError::Shutdown` if the pipeline is shut down before the task is accepted.
    pub fn schedule(&self, task: T) -> Result<(), PipelineError> {
        let task_tx = self.sender()?;
        if task_tx.is_full() {
            debug!(
                capacity = self.config.capacity,
                "admission pipeline full, waiting for room"
            );
        }

        self.counters.scheduled_tasks.fetch_add(1, Ordering::Relaxed);
        task_tx.send(task).map_err(|_| {
            self.counters.scheduled_tasks.fetch_sub(1, Ordering::Relaxed);
            PipelineError::Shutdown
        })
    }

    /// Schedule a task without blocking.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Full` if the channel is at capacity
    /// - `PipelineError::Shutdown` if the pipeline has been shut down
    pub fn try_schedule(&self, task: T) -> Result<(), PipelineError> {
        let task_tx = self.sender()?;
        match task_tx.try_send(task) {
            Ok(()) => {
                self.counters.scheduled_tasks.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!(capacity = self.config.capacity, "admission pipeline is full");
                Err(PipelineError::Full)
            }
            Err(TrySendError::Disconnected(_)) => Err(PipelineError::Shutdown),
        }
    }

    /// Schedule a task from an async context.
    ///
    /// Takes the non-blocking path when there is room; otherwise waits for room on
    /// tokio's blocking pool so the async executor is never blocked.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Shutdown` if the pipeline is shut down before the task is accepted
    /// - `PipelineError::Internal` if the blocking wait could not complete
    #[cfg(feature = "tokio-runtime")]
    pub async fn schedule_async(&self, task: T) -> Result<(), PipelineError> {
        let task_tx = self.sender()?;
        self.counters.scheduled_tasks.fetch_add(1, Ordering::Relaxed);

        let result = match task_tx.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(PipelineError::Shutdown),
            Err(TrySendError::Full(task)) => {
                debug!(
                    capacity = self.config.capacity,
                    "admission pipeline full, waiting for room"
                );
                match tokio::task::spawn_blocking(move || task_tx.send(task)).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(_)) => Err(PipelineError::Shutdown),
                    Err(e) => Err(PipelineError::Internal(format!(
                        "blocking schedule did not complete: {e}"
                    ))),
                }
            }
        };

        if result.is_err() {
            self.counters.scheduled_tasks.fetch_sub(1, Ordering::Relaxed);
        }
        result
    }

    /// True once shutdown has started.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Configuration the pipeline was started with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get current pipeline statistics.
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        let pending = self.task_tx.lock().as_ref().map_or(0, Sender::len);
        self.counters.snapshot(self.config.capacity, pending)
    }

    /// Stop accepting tasks, signal the worker and wait for it to exit.
    ///
    /// Tasks already in the channel, and those from callers still blocked in
    /// `schedule`, are run or discarded according to the configured
    /// [`ShutdownPolicy`]. Idempotent. When called from the worker thread itself the
    /// worker is signalled but not joined.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        info!(policy = ?self.config.shutdown, "shutting down admission pipeline");
        self.signal_worker();

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                debug!("shutdown requested from the admission worker, not joining");
                return;
            }
            if handle.join().is_err() {
                warn!("admission worker panicked");
            }
        }

        let stats = self.stats();
        info!(
            completed = stats.completed_tasks,
            failed = stats.failed_tasks,
            abandoned = stats.abandoned_tasks,
            "admission pipeline shut down"
        );
    }

    fn signal_worker(&self) {
        // Stored sender first so the worker cannot pick up new work after the signal.
        self.task_tx.lock().take();
        self.shutdown_tx.lock().take();
    }
}

impl<T> Drop for AdmissionPipeline<T>
where
    T: Send + 'static,
{
    fn drop(&mut self) {
        // Signal shutdown but don't join in Drop; explicit shutdown() is required for
        // a graceful wait.
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            self.signal_worker();
            debug!("AdmissionPipeline dropped without explicit shutdown - worker detached");
        }
    }
}

/// Spawn the worker thread.
fn spawn_worker<T, H>(
    name: String,
    policy: ShutdownPolicy,
    task_rx: Receiver<T>,
    shutdown_rx: Receiver<()>,
    counters: Arc<PipelineCounters>,
    mut handler: H,
) -> std::io::Result<JoinHandle<()>>
where
    T: Send + 'static,
    H: TaskHandler<T>,
{
    thread::Builder::new().name(name).spawn(move || {
        debug!("admission worker started");

        loop {
            select! {
                recv(task_rx) -> msg => match msg {
                    // select! picks among ready arms at random; a set shutdown signal wins.
                    Ok(task) if shutdown_requested(&shutdown_rx) => {
                        finish(policy, &mut handler, Some(task), &task_rx, &counters);
                        break;
                    }
                    Ok(task) => run_task(&mut handler, task, &counters),
                    Err(_) => {
                        debug!("admission channel closed, exiting");
                        break;
                    }
                },
                recv(shutdown_rx) -> _ => {
                    finish(policy, &mut handler, None, &task_rx, &counters);
                    break;
                }
            }
        }

        debug!("admission worker exiting");
    })
}

fn shutdown_requested(shutdown_rx: &Receiver<()>) -> bool {
    matches!(shutdown_rx.try_recv(), Err(TryRecvError::Disconnected))
}

/// Apply the shutdown policy to `first` (a task already received), whatever is queued,
/// and whatever callers already holding a sender still push.
///
/// Returns once every sender clone is dropped; new `schedule` calls are refused by the
/// shutdown flag, so only in-flight sends remain.
fn finish<T, H>(
    policy: ShutdownPolicy,
    handler: &mut H,
    first: Option<T>,
    task_rx: &Receiver<T>,
    counters: &PipelineCounters,
) where
    H: TaskHandler<T>,
{
    let remaining = first.into_iter().chain(task_rx.iter());
    match policy {
        ShutdownPolicy::Drain => {
            let mut drained = 0_u64;
            for task in remaining {
                run_task(handler, task, counters);
                drained += 1;
            }
            debug!(drained, "drained queued tasks before shutdown");
        }
        ShutdownPolicy::Abandon => {
            let abandoned = remaining.map(|_| 1_u64).sum::<u64>();
            counters
                .abandoned_tasks
                .fetch_add(abandoned, Ordering::Relaxed);
            if abandoned > 0 {
                warn!(abandoned, "abandoned queued tasks at shutdown");
            }
        }
    }
}

/// Run one task, isolating errors and panics from the worker loop.
fn run_task<T, H>(handler: &mut H, task: T, counters: &PipelineCounters)
where
    H: TaskHandler<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(task))) {
        Ok(Ok(())) => {
            counters.completed_tasks.fetch_add(1, Ordering::Relaxed);
        }
        Ok(Err(e)) => {
            counters.failed_tasks.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "admission task failed");
        }
        Err(payload) => {
            counters.failed_tasks.fetch_add(1, Ordering::Relaxed);
            error!(panic = %panic_message(payload.as_ref()), "admission task panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".into())
}
