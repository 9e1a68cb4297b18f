use super::{require_code, NodeContext};
use crate::{
    errors::CanvasError,
    highlight::{code_window, splice_code},
    intent::TurnIntent,
    model::ModelInput,
    prompts::{self, render},
    state::{GraphState, StateDelta},
};

/// Characters of surrounding code shown to the model on each side of the
/// highlight.
const HIGHLIGHT_CONTEXT_CHARS: usize = 500;

/// Rewrite only the user-highlighted character range of a code artifact,
/// splicing the model output back into the full content.
pub(crate) async fn update_artifact(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let content = state.current_content()?;
    let (title, language, code) = require_code(content)?;

    let TurnIntent::EditHighlightedCode(highlight) = &state.intent else {
        return Err(CanvasError::MissingHighlight);
    };
    let highlight = *highlight;

    let reflections = ctx.reflections_prompt().await?;
    let window = code_window(code, highlight, HIGHLIGHT_CONTEXT_CHARS)?;
    let system_prompt = ctx.config.full_system_prompt(render(
        prompts::UPDATE_HIGHLIGHTED_CODE_PROMPT,
        &[
            ("before", &window.before),
            ("highlighted", &window.highlighted),
            ("after", &window.after),
            ("reflections", &reflections),
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

    let updated = splice_code(code, highlight, &output.content)?;

    let title = title.to_string();
    let mut artifact = state
        .artifact
        .clone()
        .ok_or(CanvasError::MissingArtifact)?;
    artifact.append_code(title, language, updated);

    Ok(StateDelta::artifact(artifact))
}
