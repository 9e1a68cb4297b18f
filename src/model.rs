use crate::messages::Message;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatModelError {
    /// The request to the provider failed.
    #[error("Provider error: {0}")]
    Provider(String),
    /// The provider returned something the orchestrator cannot use, e.g. a
    /// missing forced tool call.
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}

pub type ChatModelResult<T> = Result<T, ChatModelError>;

/// Input to a single chat model invocation.
#[derive(Debug, Clone, Default)]
pub struct ModelInput {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub temperature: Option<f64>,
    /// Cap on the number of output tokens.
    pub max_tokens: Option<u32>,
    /// A single forced tool. When set, the model must respond with a call to
    /// this tool.
    pub tool: Option<ToolSpec>,
}

/// A tool the model is forced to call, described by a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub tool_name: String,
    pub args: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOutput {
    pub content: String,
    pub tool_call: Option<ToolCall>,
}

impl ModelOutput {
    /// The forced tool call of this output, or an `InvalidOutput` error if
    /// the model did not produce one.
    pub fn require_tool_call(self, tool_name: &str) -> ChatModelResult<ToolCall> {
        match self.tool_call {
            Some(call) if call.tool_name == tool_name => Ok(call),
            Some(call) => Err(ChatModelError::InvalidOutput(format!(
                "expected a {tool_name} tool call, got {}",
                call.tool_name
            ))),
            None => Err(ChatModelError::InvalidOutput(format!(
                "expected a {tool_name} tool call, got plain content"
            ))),
        }
    }
}

/// The language model collaborator. The orchestration core only depends on
/// this interface; providers live outside the crate.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    fn provider(&self) -> &'static str;
    fn model_id(&self) -> String;
    async fn invoke(&self, input: ModelInput) -> ChatModelResult<ModelOutput>;
}
