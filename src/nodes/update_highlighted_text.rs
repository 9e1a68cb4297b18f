use super::{require_markdown, NodeContext};
use crate::{
    errors::CanvasError,
    highlight::splice_markdown_block,
    intent::TurnIntent,
    model::ModelInput,
    prompts::{self, render},
    state::{GraphState, StateDelta},
};

/// Rewrite the markdown block containing the user's text selection, splicing
/// the rewritten block back into the full document.
pub(crate) async fn update_highlighted_text(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let content = state.current_content()?;
    let (title, full_markdown) = require_markdown(content)?;

    let TurnIntent::EditHighlightedText(highlight) = &state.intent else {
        return Err(CanvasError::MissingHighlight);
    };

    let system_prompt = ctx.config.full_system_prompt(render(
        prompts::UPDATE_HIGHLIGHTED_TEXT_PROMPT,
        &[
            ("selected_text", &highlight.selected_text),
            ("block", &highlight.markdown_block),
        ],
    ));

    let recent_human = state.recent_human()?.clone();
    let output = ctx
        .model
        .invoke(ModelInput {
            messages: vec![recent_human],
            system_prompt: Some(system_prompt),
            temperature: Some(0.0),
            ..ModelInput::default()
        })
        .await?;

    let updated = splice_markdown_block(full_markdown, &highlight.markdown_block, &output.content)?;

    let title = title.to_string();
    let mut artifact = state
        .artifact
        .clone()
        .ok_or(CanvasError::MissingArtifact)?;
    artifact.append_markdown(title, updated);

    Ok(StateDelta::artifact(artifact))
}
