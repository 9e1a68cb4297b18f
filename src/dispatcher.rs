use crate::{artifact::Artifact, errors::BoxedError, messages::Message};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, Mutex},
    time::timeout,
};
use tracing::warn;

/// The background maintenance jobs the orchestrator can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    ThreadTitle,
    Reflection,
    Summarizer,
}

impl JobKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ThreadTitle => "thread_title",
            Self::Reflection => "reflection",
            Self::Summarizer => "summarizer",
        }
    }
}

/// Input for a background job: a snapshot of the conversation plus the thread
/// the result is delivered to.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPayload {
    pub thread_id: String,
    pub assistant_id: Option<String>,
    pub messages: Vec<Message>,
    pub artifact: Option<Artifact>,
}

/// Fire-and-forget submission of named background jobs.
///
/// Ordering guarantee is "enqueue": jobs submitted against the same thread run
/// strictly after any currently running job for that thread and never
/// interleave. The delay defers the job's start without blocking the caller.
/// Submission never fails into the caller; job errors are caught and logged.
#[async_trait::async_trait]
pub trait BackgroundDispatcher: Send + Sync {
    async fn submit(&self, job: JobKind, payload: JobPayload, delay: Duration);
}

/// Executes the body of a background job. Kept behind a trait so dispatch and
/// execution can be tested independently.
#[async_trait::async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: JobKind, payload: JobPayload) -> Result<(), BoxedError>;
}

struct QueuedJob {
    job: JobKind,
    payload: JobPayload,
    delay: Duration,
}

type WorkerMap = HashMap<String, mpsc::UnboundedSender<QueuedJob>>;

/// Idle period after which a per-thread worker retires.
const WORKER_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Tokio-backed dispatcher: one worker task per thread id, draining an
/// unbounded queue so same-thread jobs run in submission order. Workers
/// retire after sitting idle; the next submission for that thread spawns a
/// fresh one.
pub struct TokioDispatcher {
    runner: Arc<dyn JobRunner>,
    workers: Arc<Mutex<WorkerMap>>,
}

impl TokioDispatcher {
    #[must_use]
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self {
            runner,
            workers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of live per-thread workers.
    pub async fn worker_count(&self) -> usize {
        self.workers.lock().await.len()
    }

    async fn worker(
        runner: Arc<dyn JobRunner>,
        workers: Arc<Mutex<WorkerMap>>,
        thread_id: String,
        mut queue: mpsc::UnboundedReceiver<QueuedJob>,
    ) {
        loop {
            let queued = match timeout(WORKER_IDLE_TIMEOUT, queue.recv()).await {
                Ok(Some(queued)) => queued,
                Ok(None) => break,
                // Idle. Submissions send while holding the map lock, so a
                // final queue check under that lock cannot race a new job.
                Err(_) => {
                    let mut workers = workers.lock().await;
                    match queue.try_recv() {
                        Ok(queued) => queued,
                        Err(_) => {
                            workers.remove(&thread_id);
                            break;
                        }
                    }
                }
            };
            if !queued.delay.is_zero() {
                tokio::time::sleep(queued.delay).await;
            }
            let name = queued.job.name();
            if let Err(err) = runner.run(queued.job, queued.payload).await {
                warn!(job = name, error = %err, "background job failed");
            }
        }
    }
}

#[async_trait::async_trait]
impl BackgroundDispatcher for TokioDispatcher {
    async fn submit(&self, job: JobKind, payload: JobPayload, delay: Duration) {
        let thread_id = payload.thread_id.clone();
        let mut workers = self.workers.lock().await;
        let sent = workers
            .entry(thread_id.clone())
            .or_insert_with(|| {
                let (sender, receiver) = mpsc::unbounded_channel();
                tokio::spawn(Self::worker(
                    self.runner.clone(),
                    self.workers.clone(),
                    thread_id.clone(),
                    receiver,
                ));
                sender
            })
            .send(QueuedJob {
                job,
                payload,
                delay,
            });
        if sent.is_err() {
            // The worker died without deregistering; clear the stale entry so
            // the next submission recovers.
            warn!(job = job.name(), "background worker gone; dropping job");
            workers.remove(&thread_id);
        }
    }
}
