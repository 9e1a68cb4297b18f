use crate::{
    errors::BoxedError,
    intent::TurnIntent,
    messages::{ContentPart, Message, MessageContent, MessageRole},
    model::{ModelInput, ToolSpec},
    nodes::NodeContext,
    prompts::{self, render},
    state::{GraphState, NodeKind},
};
use serde_json::json;
use tracing::{debug, warn};

/// The URL content retrieval collaborator, used to inline page contents into
/// a user message.
#[async_trait::async_trait]
pub trait UrlContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, BoxedError>;
}

/// Number of trailing context messages shown to the routing classifier.
const ROUTE_RECENT_MESSAGES: usize = 3;

/// Pick the next transformation node for the turn. A pure decision over the
/// turn intent; the conversation fallback normalizes trailing context in
/// place and delegates to a single classification call, falling back to
/// `ReplyToGeneralInput` on any failure of that call.
pub(crate) async fn route(state: &mut GraphState, ctx: &NodeContext) -> NodeKind {
    let next = match &state.intent {
        TurnIntent::EditHighlightedCode(_) => NodeKind::UpdateArtifact,
        TurnIntent::EditHighlightedText(_) => NodeKind::UpdateHighlightedText,
        TurnIntent::TextTheme(_) => NodeKind::RewriteArtifactTheme,
        TurnIntent::CodeTheme(_) => NodeKind::RewriteCodeArtifactTheme,
        TurnIntent::CustomAction(_) => NodeKind::CustomAction,
        TurnIntent::WebSearch => NodeKind::WebSearch,
        TurnIntent::Conversation => {
            normalize_documents(state);
            include_url_contents(state, ctx).await;
            classify(state, ctx).await
        }
    };
    debug!(next = next.as_str(), "routed turn");
    next
}

/// Mirror document attachments on the most recent user message into a hidden
/// context-log message, keeping the visible copy text-only.
fn normalize_documents(state: &mut GraphState) {
    let Some(pos) = state
        .ledger
        .visible
        .iter()
        .rposition(|message| message.role == MessageRole::Human)
    else {
        return;
    };
    let MessageContent::Parts(parts) = &state.ledger.visible[pos].content else {
        return;
    };
    let (documents, text_parts): (Vec<ContentPart>, Vec<ContentPart>) = parts
        .iter()
        .cloned()
        .partition(|part| matches!(part, ContentPart::Document { .. }));
    if documents.is_empty() {
        return;
    }

    state.ledger.visible[pos].content = MessageContent::Parts(text_parts.clone());

    let document_message = Message {
        role: MessageRole::Human,
        content: MessageContent::Parts(documents),
        id: None,
        hidden: true,
        summary: false,
    };
    if let Some(cpos) = state
        .ledger
        .context
        .iter()
        .rposition(|message| message.role == MessageRole::Human && !message.summary)
    {
        state.ledger.context[cpos].content = MessageContent::Parts(text_parts);
        state.ledger.context.insert(cpos, document_message);
    } else {
        state.ledger.context.push(document_message);
    }
}

/// If the latest user message references URLs and the model confirms the user
/// wants their contents, fetch each URL and splice the contents into the
/// context-log copy of the message. Fetch failures are logged and skipped.
async fn include_url_contents(state: &mut GraphState, ctx: &NodeContext) {
    let Some(fetcher) = ctx.url_fetcher.as_deref() else {
        return;
    };
    let Some(cpos) = state
        .ledger
        .context
        .iter()
        .rposition(|message| message.role == MessageRole::Human && !message.summary)
    else {
        return;
    };
    let text = state.ledger.context[cpos].text();
    let urls = extract_urls(&text);
    if urls.is_empty() {
        return;
    }

    if !should_include_urls(ctx, &urls).await {
        return;
    }

    let mut updated = text;
    for url in urls {
        match fetcher.fetch(&url).await {
            Ok(contents) => {
                let inlined = format!("<page-contents url=\"{url}\">\n{contents}\n</page-contents>");
                updated = updated.replacen(&url, &inlined, 1);
            }
            Err(err) => {
                warn!(url, error = %err, "failed to fetch URL contents; leaving URL in place");
            }
        }
    }
    state.ledger.context[cpos].content = MessageContent::Text(updated);
}

/// Single classification call confirming the user wants URL contents inlined.
/// Defaults to "no" on any failure.
async fn should_include_urls(ctx: &NodeContext, urls: &[String]) -> bool {
    let prompt = render(
        prompts::INCLUDE_URL_CONTENTS_PROMPT,
        &[("urls", &urls.join("\n"))],
    );
    let tool = ToolSpec {
        name: "include_url_contents".to_string(),
        description: "Decide whether to inline the page contents of the URLs.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "should_include": {
                    "type": "boolean",
                    "description": "Whether the user wants the page contents inlined."
                }
            },
            "required": ["should_include"]
        }),
    };

    let result = ctx
        .model
        .invoke(ModelInput {
            messages: vec![Message::human(prompt)],
            temperature: Some(0.0),
            tool: Some(tool),
            ..ModelInput::default()
        })
        .await
        .and_then(|output| output.require_tool_call("include_url_contents"));

    match result {
        Ok(call) => call.args["should_include"].as_bool().unwrap_or(false),
        Err(err) => {
            warn!(error = %err, "URL inclusion classification failed; skipping URL contents");
            false
        }
    }
}

pub(crate) fn extract_urls(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| token.starts_with("http://") || token.starts_with("https://"))
        .map(|token| token.trim_end_matches(['.', ',', ';', ')', ']', '!', '?']).to_string())
        .collect()
}

/// Model-backed classification between replying, generating a new artifact,
/// and rewriting the existing one. Any failure falls back to
/// `ReplyToGeneralInput`.
async fn classify(state: &GraphState, ctx: &NodeContext) -> NodeKind {
    let current_content = state.artifact.as_ref().and_then(|a| a.current_content());
    let artifact_route = if current_content.is_some() {
        NodeKind::RewriteArtifact
    } else {
        NodeKind::GenerateArtifact
    };

    let start = state.ledger.context.len().saturating_sub(ROUTE_RECENT_MESSAGES);
    let recent_messages = state.ledger.context[start..]
        .iter()
        .map(|message| {
            let role = match message.role {
                MessageRole::Human => "human",
                MessageRole::Ai => "ai",
                MessageRole::System => "system",
            };
            format!("{role}: {}", message.text())
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let current_artifact = current_content.map_or_else(
        || prompts::NO_ARTIFACT_PROMPT.to_string(),
        |content| {
            render(
                prompts::CURRENT_ARTIFACT_PROMPT,
                &[("title", content.title()), ("content", content.text())],
            )
        },
    );
    let prompt = render(
        prompts::ROUTE_QUERY_PROMPT,
        &[
            (
                "artifact_options",
                if current_content.is_some() {
                    prompts::ROUTE_OPTIONS_HAS_ARTIFACT
                } else {
                    prompts::ROUTE_OPTIONS_NO_ARTIFACT
                },
            ),
            ("recent_messages", &recent_messages),
            ("current_artifact", &current_artifact),
        ],
    );

    let tool = ToolSpec {
        name: "route_query".to_string(),
        description: "Pick the route to take based on the user's query.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "route": {
                    "type": "string",
                    "enum": [
                        NodeKind::ReplyToGeneralInput.as_str(),
                        artifact_route.as_str(),
                    ],
                    "description": "The route to take based on the user's query."
                }
            },
            "required": ["route"]
        }),
    };

    let result = ctx
        .model
        .invoke(ModelInput {
            messages: vec![Message::human(prompt)],
            temperature: Some(0.0),
            tool: Some(tool),
            ..ModelInput::default()
        })
        .await
        .and_then(|output| output.require_tool_call("route_query"));

    let route = match result {
        Ok(call) => call.args["route"].as_str().map(ToOwned::to_owned),
        Err(err) => {
            warn!(error = %err, "routing classification failed; replying to general input");
            return NodeKind::ReplyToGeneralInput;
        }
    };

    match route.as_deref() {
        Some(route) if route == artifact_route.as_str() => artifact_route,
        Some(route) if route == NodeKind::ReplyToGeneralInput.as_str() => {
            NodeKind::ReplyToGeneralInput
        }
        other => {
            warn!(route = ?other, "unknown route from classification; replying to general input");
            NodeKind::ReplyToGeneralInput
        }
    }
}
