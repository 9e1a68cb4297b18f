//! Test doubles for the external collaborators: a scriptable chat model, a
//! recording dispatcher, and canned search/fetch providers.

use crate::{
    dispatcher::{BackgroundDispatcher, JobKind, JobPayload},
    errors::BoxedError,
    model::{ChatModel, ChatModelError, ChatModelResult, ModelInput, ModelOutput, ToolCall},
    nodes::{SearchResult, WebSearchProvider},
    router::UrlContentFetcher,
};
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::Mutex,
    time::Duration,
};

/// Result for a mocked `invoke` call: either an output or an error to return.
pub enum MockInvokeResult {
    Output(ModelOutput),
    Error(ChatModelError),
}

impl From<ModelOutput> for MockInvokeResult {
    fn from(output: ModelOutput) -> Self {
        Self::Output(output)
    }
}

impl From<ChatModelError> for MockInvokeResult {
    fn from(error: ChatModelError) -> Self {
        Self::Error(error)
    }
}

#[derive(Default)]
struct MockChatModelState {
    mocked_results: VecDeque<MockInvokeResult>,
    tracked_inputs: Vec<ModelInput>,
}

/// A mock chat model that tracks inputs and yields predefined outputs.
#[derive(Default)]
pub struct MockChatModel {
    state: Mutex<MockChatModelState>,
}

impl MockChatModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a single mocked invoke result.
    pub fn enqueue<R>(&self, result: R) -> &Self
    where
        R: Into<MockInvokeResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_results.push_back(result.into());
        drop(state);
        self
    }

    /// Convenience to enqueue a plain text response.
    pub fn enqueue_text(&self, text: impl Into<String>) -> &Self {
        self.enqueue(ModelOutput {
            content: text.into(),
            tool_call: None,
        })
    }

    /// Convenience to enqueue a forced tool call response.
    pub fn enqueue_tool_call(&self, tool_name: impl Into<String>, args: Value) -> &Self {
        self.enqueue(ModelOutput {
            content: String::new(),
            tool_call: Some(ToolCall {
                tool_name: tool_name.into(),
                args,
            }),
        })
    }

    /// Retrieve the tracked inputs accumulated so far.
    pub fn tracked_inputs(&self) -> Vec<ModelInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_inputs.clone()
    }
}

#[async_trait::async_trait]
impl ChatModel for MockChatModel {
    fn provider(&self) -> &'static str {
        "mock"
    }

    fn model_id(&self) -> String {
        "mock-model".to_string()
    }

    async fn invoke(&self, input: ModelInput) -> ChatModelResult<ModelOutput> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_inputs.push(input);

        let result = state.mocked_results.pop_front().ok_or_else(|| {
            ChatModelError::Provider("no mocked invoke results available".to_string())
        })?;

        match result {
            MockInvokeResult::Output(output) => Ok(output),
            MockInvokeResult::Error(error) => Err(error),
        }
    }
}

/// A background job submission captured by [`RecordingDispatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedJob {
    pub job: JobKind,
    pub payload: JobPayload,
    pub delay: Duration,
}

/// A dispatcher that records submissions without executing anything.
#[derive(Default)]
pub struct RecordingDispatcher {
    jobs: Mutex<Vec<RecordedJob>>,
}

impl RecordingDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<RecordedJob> {
        let jobs = self.jobs.lock().expect("dispatcher lock poisoned");
        jobs.clone()
    }
}

#[async_trait::async_trait]
impl BackgroundDispatcher for RecordingDispatcher {
    async fn submit(&self, job: JobKind, payload: JobPayload, delay: Duration) {
        let mut jobs = self.jobs.lock().expect("dispatcher lock poisoned");
        jobs.push(RecordedJob {
            job,
            payload,
            delay,
        });
    }
}

/// A web search provider returning the same canned results for every query.
pub struct StaticWebSearch {
    pub results: Vec<SearchResult>,
}

#[async_trait::async_trait]
impl WebSearchProvider for StaticWebSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, BoxedError> {
        Ok(self.results.clone())
    }
}

/// A URL fetcher returning the same canned page contents for every URL.
pub struct StaticUrlFetcher {
    pub contents: String,
}

#[async_trait::async_trait]
impl UrlContentFetcher for StaticUrlFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, BoxedError> {
        Ok(self.contents.clone())
    }
}
