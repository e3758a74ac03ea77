//! Fixed-size worker pool for post fetching
//!
//! Workers share one bounded link queue. Each link taken off the queue yields
//! exactly one `PostOutcome` on the outcome channel. Workers exit once the
//! queue is closed and empty, so closing the sender and joining the pool is
//! the completion barrier.

use crate::crawler::record::PostOutcome;
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Sending half of the link queue
pub type LinkSender = mpsc::Sender<String>;

/// Handle to the running workers
pub struct WorkerPool {
    workers: JoinSet<usize>,
    size: usize,
}

impl WorkerPool {
    /// Spawns `worker_count` workers running `handler` for every queued link
    ///
    /// The link queue holds at most `worker_count` pending links, so senders
    /// wait while every worker is busy.
    ///
    /// # Returns
    ///
    /// The queue's sender and the pool handle. Drop the sender to let the
    /// workers finish, then call [`WorkerPool::join`].
    pub fn spawn<F, Fut>(
        worker_count: usize,
        handler: F,
        outcomes: mpsc::UnboundedSender<PostOutcome>,
    ) -> (LinkSender, Self)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PostOutcome> + Send + 'static,
    {
        let size = worker_count.max(1);
        let (link_tx, link_rx) = mpsc::channel::<String>(size);
        let link_rx = Arc::new(Mutex::new(link_rx));
        let handler = Arc::new(handler);

        let mut workers = JoinSet::new();
        for worker_id in 0..size {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&link_rx),
                Arc::clone(&handler),
                outcomes.clone(),
            ));
        }

        tracing::debug!("Spawned {} workers", size);
        (link_tx, Self { workers, size })
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.size
    }

    /// Waits for every worker to exit
    ///
    /// Only returns once the link sender has been dropped and the queue drained.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Total number of links processed by all workers
    /// * `Err(HarvestError::Join)` - A worker panicked
    pub async fn join(mut self) -> Result<usize> {
        let mut processed = 0;
        while let Some(result) = self.workers.join_next().await {
            processed += result?;
        }
        Ok(processed)
    }
}

async fn run_worker<F, Fut>(
    worker_id: usize,
    links: Arc<Mutex<mpsc::Receiver<String>>>,
    handler: Arc<F>,
    outcomes: mpsc::UnboundedSender<PostOutcome>,
) -> usize
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PostOutcome> + Send + 'static,
{
    let mut processed = 0;
    loop {
        // The lock is held only while waiting for the next link
        let next = links.lock().await.recv().await;
        let Some(link) = next else {
            break;
        };

        tracing::debug!("Worker {} picked up {}", worker_id, link);
        let outcome = handler(link).await;
        processed += 1;

        if outcomes.send(outcome).is_err() {
            tracing::warn!("Worker {}: outcome collector is gone, stopping", worker_id);
            break;
        }
    }

    tracing::debug!("Worker {} exiting after {} links", worker_id, processed);
    processed
}
