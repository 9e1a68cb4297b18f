#![allow(dead_code)]

use canvas_agent::{
    testing::{MockChatModel, RecordingDispatcher},
    Canvas, CanvasParams, CanvasSession, InMemoryStore, SessionConfig, ThreadState,
};
use std::sync::Arc;

pub struct Harness {
    pub model: Arc<MockChatModel>,
    pub store: Arc<InMemoryStore>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl Harness {
    pub fn new() -> Self {
        // First caller wins; later harnesses reuse the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        Self {
            model: Arc::new(MockChatModel::new()),
            store: Arc::new(InMemoryStore::new()),
            dispatcher: Arc::new(RecordingDispatcher::new()),
        }
    }

    pub fn config() -> SessionConfig {
        SessionConfig {
            assistant_id: Some("assistant-1".to_string()),
            user_id: Some("user-1".to_string()),
            thread_id: Some("thread-1".to_string()),
            system_prompt: None,
        }
    }

    /// Canvas params preloaded with the test collaborators, for tests that
    /// need to add a search or fetch provider before building.
    pub fn params(&self) -> CanvasParams {
        Canvas::builder(
            self.model.clone(),
            self.store.clone(),
            self.dispatcher.clone(),
        )
        .config(Self::config())
    }

    pub fn canvas(&self) -> Canvas {
        self.params().build()
    }

    pub fn session(&self, thread: ThreadState) -> CanvasSession {
        self.canvas().session(thread)
    }
}
