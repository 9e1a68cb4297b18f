use crate::{
    artifact::{Artifact, ArtifactContent},
    errors::CanvasError,
    intent::{TurnIntent, TurnRequest},
    messages::{Message, MessageLedger},
};
use serde::{Deserialize, Serialize};

/// The transformation nodes of the turn state machine. Routing is an
/// exhaustive match over this enum rather than string node names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    GenerateArtifact,
    RewriteArtifact,
    UpdateArtifact,
    UpdateHighlightedText,
    RewriteArtifactTheme,
    RewriteCodeArtifactTheme,
    CustomAction,
    WebSearch,
    ReplyToGeneralInput,
}

impl NodeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateArtifact => "generate_artifact",
            Self::RewriteArtifact => "rewrite_artifact",
            Self::UpdateArtifact => "update_artifact",
            Self::UpdateHighlightedText => "update_highlighted_text",
            Self::RewriteArtifactTheme => "rewrite_artifact_theme",
            Self::RewriteCodeArtifactTheme => "rewrite_code_artifact_theme",
            Self::CustomAction => "custom_action",
            Self::WebSearch => "web_search",
            Self::ReplyToGeneralInput => "reply_to_general_input",
        }
    }

    /// Whether the node produces a new artifact version. A reply never does,
    /// and skips the follow-up/reflection pipeline.
    #[must_use]
    pub fn touches_artifact(self) -> bool {
        !matches!(self, Self::ReplyToGeneralInput)
    }
}

/// Persisted per-thread state, carried across turns by the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadState {
    pub ledger: MessageLedger,
    pub artifact: Option<Artifact>,
}

/// The value threaded through one turn of the state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    pub ledger: MessageLedger,
    pub artifact: Option<Artifact>,
    pub intent: TurnIntent,
    pub next: Option<NodeKind>,
}

impl GraphState {
    /// Build a fresh turn state from persisted thread state plus new input.
    /// This is a pure constructor: intent always starts from the request and
    /// is dropped when the turn completes, so each one-shot flag is consumed
    /// at most once.
    #[must_use]
    pub fn fresh(thread: &ThreadState, request: &TurnRequest) -> Self {
        let mut ledger = thread.ledger.clone();
        for message in &request.messages {
            ledger.push_both(message.clone());
        }
        Self {
            ledger,
            artifact: thread.artifact.clone(),
            intent: request.intent(),
            next: None,
        }
    }

    /// The current artifact content, or the precondition errors every
    /// artifact-touching node shares.
    pub fn current_content(&self) -> Result<&ArtifactContent, CanvasError> {
        self.artifact
            .as_ref()
            .ok_or(CanvasError::MissingArtifact)?
            .current_content()
            .ok_or(CanvasError::MissingArtifact)
    }

    pub fn recent_human(&self) -> Result<&Message, CanvasError> {
        self.ledger
            .recent_human()
            .ok_or(CanvasError::MissingHumanMessage)
    }

    /// Merge a node's partial update: message lists append, the artifact
    /// replaces.
    pub fn apply(&mut self, delta: StateDelta) {
        for message in delta.messages {
            self.ledger.visible.push(message);
        }
        for message in delta.context_messages {
            self.ledger.context.push(message);
        }
        if let Some(artifact) = delta.artifact {
            self.artifact = Some(artifact);
        }
    }
}

/// A partial state update returned by a transformation node: only changed
/// fields are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    /// Messages to append to the visible log.
    pub messages: Vec<Message>,
    /// Messages to append to the model-context log.
    pub context_messages: Vec<Message>,
    /// Replacement artifact, when the node produced a new version.
    pub artifact: Option<Artifact>,
}

impl StateDelta {
    /// A delta that appends one message to both logs.
    #[must_use]
    pub fn reply(message: Message) -> Self {
        Self {
            messages: vec![message.clone()],
            context_messages: vec![message],
            artifact: None,
        }
    }

    /// A delta that replaces the artifact.
    #[must_use]
    pub fn artifact(artifact: Artifact) -> Self {
        Self {
            artifact: Some(artifact),
            ..Self::default()
        }
    }

    /// Append a message to both logs of this delta.
    pub fn push_reply(&mut self, message: Message) {
        self.messages.push(message.clone());
        self.context_messages.push(message);
    }
}
