//! Background ingestion workers.
//!
//! Ingestion runs detached from the submitting caller: jobs go onto a
//! bounded channel and a pool of workers drains it, each driving the
//! pipeline for one document at a time. Pipelines for different
//! documents share no mutable state, so the pool size is purely a
//! throughput knob. The document status row is the only completion
//! channel; submitters poll the document store.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use docforge_core::pipeline::IngestPipeline;

/// One queued ingestion run.
pub struct IngestJob {
    pub document_id: String,
    pub owner_id: String,
    pub bytes: Vec<u8>,
}

/// Cloneable handle for submitting jobs to the worker pool.
#[derive(Clone)]
pub struct IngestQueue {
    tx: mpsc::Sender<IngestJob>,
}

impl IngestQueue {
    /// Enqueue a job. Waits if the queue is at capacity; fails only when
    /// the workers have shut down.
    pub async fn submit(&self, job: IngestJob) -> Result<()> {
        debug!(document_id = %job.document_id, "queueing ingestion job");
        self.tx
            .send(job)
            .await
            .map_err(|_| anyhow!("ingestion workers have shut down"))
    }
}

/// Handle to the running worker tasks.
pub struct IngestWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl IngestWorkers {
    /// Wait for all workers to drain the queue and exit. Only returns
    /// after every [`IngestQueue`] handle has been dropped.
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// Spawn `workers` tasks draining a queue of at most `queue_depth`
/// pending jobs.
pub fn spawn_workers(
    pipeline: Arc<IngestPipeline>,
    workers: usize,
    queue_depth: usize,
) -> (IngestQueue, IngestWorkers) {
    let (tx, rx) = mpsc::channel::<IngestJob>(queue_depth);
    let rx = Arc::new(Mutex::new(rx));

    let handles = (0..workers)
        .map(|worker| {
            let pipeline = pipeline.clone();
            let rx = rx.clone();
            tokio::spawn(async move {
                loop {
                    // Hold the lock only while waiting for a job so the
                    // other workers can pick up the next one.
                    let job = rx.lock().await.recv().await;
                    let Some(job) = job else { break };

                    info!(worker, document_id = %job.document_id, "processing document");
                    pipeline
                        .run(&job.document_id, &job.owner_id, &job.bytes)
                        .await;
                }
                debug!(worker, "ingestion worker exiting");
            })
        })
        .collect();

    (IngestQueue { tx }, IngestWorkers { handles })
}
