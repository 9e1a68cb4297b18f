mod custom_action;
mod generate_artifact;
mod generate_followup;
mod reply_to_general_input;
mod rewrite_artifact;
mod rewrite_artifact_theme;
mod rewrite_code_artifact_theme;
mod update_artifact;
mod update_highlighted_text;
mod web_search;

pub(crate) use generate_followup::generate_followup;
pub(crate) use web_search::web_search;
pub use web_search::{SearchResult, WebSearchProvider};

use crate::{
    artifact::{ArtifactContent, ProgrammingLanguage},
    config::SessionConfig,
    errors::CanvasError,
    model::ChatModel,
    router::UrlContentFetcher,
    state::{GraphState, NodeKind, StateDelta},
    store::{self, AssistantStore},
};
use std::sync::Arc;

/// Everything a transformation node needs besides the turn state: the model
/// collaborator, the key-value store, optional search/fetch collaborators,
/// and the session configuration.
pub struct NodeContext {
    pub model: Arc<dyn ChatModel>,
    pub store: Arc<dyn AssistantStore>,
    pub web_search: Option<Arc<dyn WebSearchProvider>>,
    pub url_fetcher: Option<Arc<dyn UrlContentFetcher>>,
    pub config: SessionConfig,
}

impl NodeContext {
    /// Fetch and render the assistant's reflections for prompt inclusion.
    pub(crate) async fn reflections_prompt(&self) -> Result<String, CanvasError> {
        let assistant_id = self.config.assistant_id()?;
        let reflections = store::fetch_reflections(self.store.as_ref(), assistant_id).await?;
        Ok(store::reflections_prompt(reflections.as_ref()))
    }
}

/// Dispatch one transformation node. Every branch is a plain async function
/// with the uniform `(state, ctx) -> StateDelta` contract.
pub(crate) async fn run(
    kind: NodeKind,
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    match kind {
        NodeKind::GenerateArtifact => generate_artifact::generate_artifact(state, ctx).await,
        NodeKind::RewriteArtifact => rewrite_artifact::rewrite_artifact(state, ctx).await,
        NodeKind::UpdateArtifact => update_artifact::update_artifact(state, ctx).await,
        NodeKind::UpdateHighlightedText => {
            update_highlighted_text::update_highlighted_text(state, ctx).await
        }
        NodeKind::RewriteArtifactTheme => {
            rewrite_artifact_theme::rewrite_artifact_theme(state, ctx).await
        }
        NodeKind::RewriteCodeArtifactTheme => {
            rewrite_code_artifact_theme::rewrite_code_artifact_theme(state, ctx).await
        }
        NodeKind::CustomAction => custom_action::custom_action(state, ctx).await,
        NodeKind::ReplyToGeneralInput => {
            reply_to_general_input::reply_to_general_input(state, ctx).await
        }
        NodeKind::WebSearch => Err(CanvasError::Invariant(
            "web_search must run through its sub-graph, not the node dispatcher".to_string(),
        )),
    }
}

/// Variant check shared by the code-only nodes.
pub(crate) fn require_code(
    content: &ArtifactContent,
) -> Result<(&str, ProgrammingLanguage, &str), CanvasError> {
    match content {
        ArtifactContent::Code {
            title,
            language,
            code,
            ..
        } => Ok((title, *language, code)),
        ArtifactContent::Markdown { .. } => Err(CanvasError::WrongArtifactVariant {
            expected: "code",
        }),
    }
}

/// Variant check shared by the markdown-only nodes.
pub(crate) fn require_markdown(content: &ArtifactContent) -> Result<(&str, &str), CanvasError> {
    match content {
        ArtifactContent::Markdown {
            title,
            full_markdown,
            ..
        } => Ok((title, full_markdown)),
        ArtifactContent::Code { .. } => Err(CanvasError::WrongArtifactVariant {
            expected: "markdown",
        }),
    }
}
