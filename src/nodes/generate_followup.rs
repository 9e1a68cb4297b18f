use super::NodeContext;
use crate::{
    errors::CanvasError,
    messages::Message,
    model::ModelInput,
    prompts::{self, render},
    state::{GraphState, StateDelta},
};

const FOLLOWUP_MAX_TOKENS: u32 = 250;

/// Generate a short follow-up message after an artifact-touching
/// transformation.
pub(crate) async fn generate_followup(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let content = state.current_content()?;
    let prompt = render(
        prompts::FOLLOWUP_ARTIFACT_PROMPT,
        &[("artifact", content.text())],
    );

    let output = ctx
        .model
        .invoke(ModelInput {
            messages: vec![Message::human(prompt)],
            temperature: Some(0.5),
            max_tokens: Some(FOLLOWUP_MAX_TOKENS),
            ..ModelInput::default()
        })
        .await?;

    Ok(StateDelta::reply(Message::ai(output.content)))
}
