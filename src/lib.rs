mod artifact;
mod config;
mod dispatcher;
mod errors;
mod graph;
mod highlight;
mod intent;
mod jobs;
mod messages;
mod model;
mod nodes;
mod prompts;
mod router;
mod state;
mod store;

pub mod testing;

pub use artifact::{remove_code_fence, Artifact, ArtifactContent, ProgrammingLanguage};
pub use config::SessionConfig;
pub use dispatcher::{BackgroundDispatcher, JobKind, JobPayload, JobRunner, TokioDispatcher};
pub use errors::{BoxedError, CanvasError};
pub use graph::{
    Canvas, CanvasParams, CanvasSession, TurnOutcome, CONTEXT_CHAR_BUDGET, REFLECTION_DELAY,
};
pub use highlight::{CodeHighlight, TextHighlight};
pub use intent::{
    ArtifactLength, CodeThemeOptions, LanguageOption, ReadingLevel, TextThemeOptions, TurnIntent,
    TurnRequest,
};
pub use jobs::MaintenanceRunner;
pub use messages::{ContentPart, Message, MessageContent, MessageLedger, MessageRole};
pub use model::{
    ChatModel, ChatModelError, ChatModelResult, ModelInput, ModelOutput, ToolCall, ToolSpec,
};
pub use nodes::{NodeContext, SearchResult, WebSearchProvider};
pub use router::UrlContentFetcher;
pub use state::{GraphState, NodeKind, StateDelta, ThreadState};
pub use store::{
    AssistantStore, CustomAction, InMemoryStore, Reflections, StoreError, StoreResult,
};
