use canvas_agent::{
    BackgroundDispatcher, BoxedError, JobKind, JobPayload, JobRunner, TokioDispatcher,
};
use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::time::sleep;

struct LoggingRunner {
    log: Arc<Mutex<Vec<String>>>,
    fail_on: Option<JobKind>,
}

impl LoggingRunner {
    fn new(fail_on: Option<JobKind>) -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let runner = Arc::new(Self {
            log: log.clone(),
            fail_on,
        });
        (runner, log)
    }
}

#[async_trait::async_trait]
impl JobRunner for LoggingRunner {
    async fn run(&self, job: JobKind, payload: JobPayload) -> Result<(), BoxedError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", job.name(), payload.thread_id));
        if self.fail_on == Some(job) {
            return Err("job blew up".into());
        }
        Ok(())
    }
}

fn payload(thread_id: &str) -> JobPayload {
    JobPayload {
        thread_id: thread_id.to_string(),
        assistant_id: None,
        messages: Vec::new(),
        artifact: None,
    }
}

#[tokio::test]
async fn same_thread_jobs_run_in_submission_order() {
    let (runner, log) = LoggingRunner::new(None);
    let dispatcher = TokioDispatcher::new(runner);

    // The first job's delay must not let the second overtake it.
    dispatcher
        .submit(JobKind::Reflection, payload("t1"), Duration::from_millis(60))
        .await;
    dispatcher
        .submit(JobKind::Summarizer, payload("t1"), Duration::ZERO)
        .await;

    sleep(Duration::from_millis(300)).await;
    assert_eq!(
        *log.lock().unwrap(),
        vec!["reflection:t1".to_string(), "summarizer:t1".to_string()]
    );
}

#[tokio::test]
async fn submit_returns_before_the_job_runs() {
    let (runner, log) = LoggingRunner::new(None);
    let dispatcher = TokioDispatcher::new(runner);

    let started = Instant::now();
    dispatcher
        .submit(
            JobKind::ThreadTitle,
            payload("t1"),
            Duration::from_millis(200),
        )
        .await;
    assert!(started.elapsed() < Duration::from_millis(100));
    assert!(log.lock().unwrap().is_empty());

    sleep(Duration::from_millis(400)).await;
    assert_eq!(*log.lock().unwrap(), vec!["thread_title:t1".to_string()]);
}

#[tokio::test]
async fn a_failing_job_does_not_poison_the_queue() {
    let (runner, log) = LoggingRunner::new(Some(JobKind::ThreadTitle));
    let dispatcher = TokioDispatcher::new(runner);

    dispatcher
        .submit(JobKind::ThreadTitle, payload("t1"), Duration::ZERO)
        .await;
    dispatcher
        .submit(JobKind::Summarizer, payload("t1"), Duration::ZERO)
        .await;

    sleep(Duration::from_millis(200)).await;
    assert_eq!(
        *log.lock().unwrap(),
        vec!["thread_title:t1".to_string(), "summarizer:t1".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn idle_workers_retire_and_respawn() {
    let (runner, log) = LoggingRunner::new(None);
    let dispatcher = TokioDispatcher::new(runner);

    dispatcher
        .submit(JobKind::ThreadTitle, payload("t1"), Duration::ZERO)
        .await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(dispatcher.worker_count().await, 1);

    // Well past the idle period the worker is gone.
    sleep(Duration::from_secs(120)).await;
    assert_eq!(dispatcher.worker_count().await, 0);

    // The next submission for the thread spawns a fresh worker and runs.
    dispatcher
        .submit(JobKind::Summarizer, payload("t1"), Duration::ZERO)
        .await;
    sleep(Duration::from_millis(10)).await;
    assert_eq!(dispatcher.worker_count().await, 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["thread_title:t1".to_string(), "summarizer:t1".to_string()]
    );
}

#[tokio::test]
async fn different_threads_do_not_block_each_other() {
    let (runner, log) = LoggingRunner::new(None);
    let dispatcher = TokioDispatcher::new(runner);

    dispatcher
        .submit(
            JobKind::Reflection,
            payload("slow"),
            Duration::from_millis(250),
        )
        .await;
    dispatcher
        .submit(JobKind::ThreadTitle, payload("fast"), Duration::ZERO)
        .await;

    sleep(Duration::from_millis(100)).await;
    // The fast thread's job finished while the slow thread is still waiting.
    assert_eq!(*log.lock().unwrap(), vec!["thread_title:fast".to_string()]);

    sleep(Duration::from_millis(400)).await;
    assert_eq!(log.lock().unwrap().len(), 2);
}
