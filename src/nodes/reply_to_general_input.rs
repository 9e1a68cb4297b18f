use super::NodeContext;
use crate::{
    errors::CanvasError,
    messages::Message,
    model::ModelInput,
    prompts::{self, render},
    state::{GraphState, StateDelta},
};

/// Reply conversationally without touching the artifact. The artifact, when
/// present, is offered as read-only context.
pub(crate) async fn reply_to_general_input(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let current_artifact = match state.artifact.as_ref().and_then(|a| a.current_content()) {
        Some(content) => render(
            prompts::CURRENT_ARTIFACT_PROMPT,
            &[("title", content.title()), ("content", content.text())],
        ),
        None => prompts::NO_ARTIFACT_PROMPT.to_string(),
    };
    let reflections = ctx.reflections_prompt().await?;
    let system_prompt = ctx.config.full_system_prompt(render(
        prompts::REPLY_TO_GENERAL_INPUT_PROMPT,
        &[
            ("current_artifact", &current_artifact),
            ("reflections", &reflections),
        ],
    ));

    let output = ctx
        .model
        .invoke(ModelInput {
            messages: state.ledger.context.clone(),
            system_prompt: Some(system_prompt),
            temperature: Some(0.5),
            ..ModelInput::default()
        })
        .await?;

    Ok(StateDelta::reply(Message::ai(output.content)))
}
