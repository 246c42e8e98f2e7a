//! Fixed-size worker pool for copy jobs.
//!
//! - one bounded upstream `mpsc` queue shared by every worker
//! - N worker tasks on a dedicated tokio runtime; blocking filesystem work
//!   runs through `spawn_blocking`
//! - explicit sender drop on shutdown before awaiting workers, which is the
//!   drain barrier the deletion pass relies on

use crate::types::{FileOutcome, PathEntry, SyncError, SyncReport};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use std::sync::Arc;

/// Queue slots per worker. The producer blocks once the queue holds
/// `workers * QUEUE_DEPTH_PER_WORKER` pending jobs.
pub const QUEUE_DEPTH_PER_WORKER: usize = 64;

/// Work item accepted by the pool: one discovered source file
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub entry: PathEntry,
}

/// Processes one job to completion on a worker
pub trait JobHandler: Send + Sync {
    fn handle(&self, job: CopyJob) -> FileOutcome;
}

/// Counters collected while the pool runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub enqueued: usize,
    pub completed: usize,
    /// Per-outcome tally; only the copy counters of the report are touched
    pub outcomes: SyncReport,
    pub per_worker_completed: Vec<usize>,
}

impl PoolStats {
    fn new(workers: usize) -> Self {
        Self {
            workers,
            enqueued: 0,
            completed: 0,
            outcomes: SyncReport::default(),
            per_worker_completed: vec![0; workers],
        }
    }

    fn record(&mut self, worker_id: usize, outcome: FileOutcome) {
        self.completed += 1;
        if let Some(slot) = self.per_worker_completed.get_mut(worker_id) {
            *slot += 1;
        }
        self.outcomes.record(outcome);
    }
}

/// N workers consuming [`CopyJob`]s from one shared queue
pub struct WorkerPool {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<CopyJob>>,
    worker_handles: Vec<JoinHandle<()>>,
    stats: Arc<Mutex<PoolStats>>,
}

impl WorkerPool {
    /// Start `worker_count` workers (at least one) behind a queue of
    /// `workers * QUEUE_DEPTH_PER_WORKER` slots.
    pub fn new(worker_count: usize, handler: Arc<dyn JobHandler>) -> Result<Self, SyncError> {
        let workers = worker_count.max(1);
        Self::with_capacity(workers, workers * QUEUE_DEPTH_PER_WORKER, handler)
    }

    /// Start a pool with an explicit queue capacity
    pub fn with_capacity(
        worker_count: usize,
        queue_capacity: usize,
        handler: Arc<dyn JobHandler>,
    ) -> Result<Self, SyncError> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("treesync-worker")
            .enable_all()
            .build()
            .map_err(SyncError::Io)?;

        let stats = Arc::new(Mutex::new(PoolStats::new(workers)));
        let (enqueue_tx, enqueue_rx) = mpsc::channel::<CopyJob>(capacity);
        let queue = Arc::new(Mutex::new(enqueue_rx));

        let worker_handles = (0..workers)
            .map(|worker_id| {
                runtime.spawn(worker_loop(
                    worker_id,
                    Arc::clone(&queue),
                    Arc::clone(&handler),
                    Arc::clone(&stats),
                ))
            })
            .collect();

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            worker_handles,
            stats,
        })
    }

    /// Enqueue a job, blocking while the queue is full
    pub fn enqueue(&self, job: CopyJob) -> Result<(), SyncError> {
        let sender = self
            .enqueue_tx
            .as_ref()
            .ok_or_else(|| SyncError::Pool("worker pool queue is already closed".to_string()))?;
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async {
            sender
                .send(job)
                .await
                .map_err(|_| SyncError::Pool("worker pool queue receiver is closed".to_string()))?;

            let mut guard = stats.lock().await;
            guard.enqueued += 1;
            Ok(())
        })
    }

    /// Close queue input and wait until every worker has drained it and exited.
    pub fn close_and_wait(mut self) -> Result<PoolStats, SyncError> {
        self.enqueue_tx.take();

        let workers = std::mem::take(&mut self.worker_handles);
        let stats = Arc::clone(&self.stats);

        self.runtime.block_on(async move {
            for handle in workers {
                handle.await.map_err(map_join_error)?;
            }
            Ok(stats.lock().await.clone())
        })
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::Receiver<CopyJob>>>,
    handler: Arc<dyn JobHandler>,
    stats: Arc<Mutex<PoolStats>>,
) {
    loop {
        let job = {
            let mut receiver = queue.lock().await;
            receiver.recv().await
        };
        let Some(job) = job else {
            break;
        };

        let handler = Arc::clone(&handler);
        let outcome = tokio::task::spawn_blocking(move || handler.handle(job))
            .await
            .unwrap_or(FileOutcome::Failed);

        stats.lock().await.record(worker_id, outcome);
    }
}

fn map_join_error(error: tokio::task::JoinError) -> SyncError {
    SyncError::Pool(format!("worker task failed: {}", error))
}
