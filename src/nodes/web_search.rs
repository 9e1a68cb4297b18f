use super::NodeContext;
use crate::{
    errors::{BoxedError, CanvasError},
    messages::Message,
    prompts::{self, render},
    state::{GraphState, NodeKind, StateDelta},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One result returned by the web search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// The web search collaborator. Any engine can sit behind it.
#[async_trait::async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, BoxedError>;
}

/// Outcome of the web search sub-graph: a state delta plus the node the turn
/// continues with.
pub(crate) struct WebSearchOutcome {
    pub delta: StateDelta,
    pub next: NodeKind,
}

fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| format!("- [{}]({}): {}", result.title, result.url, result.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Search the web for the latest user message, then route to a rewrite or a
/// fresh generation depending on whether an artifact already exists. Provider
/// failures are treated as empty results.
pub(crate) async fn web_search(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<WebSearchOutcome, CanvasError> {
    let query = state.recent_human()?.text();

    let results = match ctx.web_search.as_deref() {
        Some(provider) => match provider.search(&query).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "web search failed; continuing without results");
                Vec::new()
            }
        },
        None => {
            warn!("web search requested but no provider is configured");
            Vec::new()
        }
    };

    let mut delta = StateDelta::default();
    if !results.is_empty() {
        let summary = render(
            prompts::WEB_SEARCH_RESULTS_PROMPT,
            &[("results", &format_results(&results))],
        );
        delta.push_reply(Message::ai(summary));
    }

    let next = if state.artifact.is_some() {
        NodeKind::RewriteArtifact
    } else {
        NodeKind::GenerateArtifact
    };

    Ok(WebSearchOutcome { delta, next })
}
