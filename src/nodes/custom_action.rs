use super::NodeContext;
use crate::{
    artifact::ArtifactContent,
    errors::CanvasError,
    intent::TurnIntent,
    messages::Message,
    model::ModelInput,
    prompts::{self, format_conversation, render},
    state::{GraphState, StateDelta},
    store,
};

/// Number of recent messages included when an action asks for conversation
/// history.
const RECENT_HISTORY_LEN: usize = 5;

/// Apply a user-defined quick action to the current artifact. The action's
/// stored prompt is assembled with the context it opted into.
pub(crate) async fn custom_action(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let TurnIntent::CustomAction(action_id) = &state.intent else {
        return Err(CanvasError::Invariant(
            "no custom action id found".to_string(),
        ));
    };
    let content = state.current_content()?;

    let user_id = ctx.config.user_id()?;
    let assistant_id = ctx.config.assistant_id()?;

    // Independent lookups, awaited together.
    let (actions, reflections) = futures::try_join!(
        store::fetch_custom_actions(ctx.store.as_ref(), user_id),
        store::fetch_reflections(ctx.store.as_ref(), assistant_id),
    )?;

    let action = actions
        .and_then(|mut actions| actions.remove(action_id))
        .ok_or_else(|| CanvasError::UnknownCustomAction(action_id.clone()))?;

    let mut prompt = format!(
        "<custom-instructions>\n{}\n</custom-instructions>",
        action.prompt
    );
    if action.include_reflections {
        let reflections = store::reflections_prompt(reflections.as_ref());
        prompt.push_str("\n\n");
        prompt.push_str(&render(
            prompts::CUSTOM_ACTION_REFLECTIONS_PROMPT,
            &[("reflections", &reflections)],
        ));
    }
    if action.include_prefix {
        prompt = format!("{}\n\n{prompt}", prompts::CUSTOM_ACTION_PREFIX_PROMPT);
    }
    if action.include_recent_history {
        let start = state.ledger.context.len().saturating_sub(RECENT_HISTORY_LEN);
        let conversation = format_conversation(&state.ledger.context[start..]);
        prompt.push_str("\n\n");
        prompt.push_str(&render(
            prompts::CUSTOM_ACTION_CONVERSATION_PROMPT,
            &[("conversation", &conversation)],
        ));
    }
    prompt.push_str("\n\n");
    prompt.push_str(&render(
        prompts::CUSTOM_ACTION_ARTIFACT_PROMPT,
        &[("artifact", content.text())],
    ));

    let output = ctx
        .model
        .invoke(ModelInput {
            messages: vec![Message::human(prompt)],
            temperature: Some(0.5),
            ..ModelInput::default()
        })
        .await?;

    let mut artifact = state
        .artifact
        .clone()
        .ok_or(CanvasError::MissingArtifact)?;
    match content {
        ArtifactContent::Code {
            title, language, ..
        } => {
            let (title, language) = (title.clone(), *language);
            artifact.append_code(title, language, output.content);
        }
        ArtifactContent::Markdown { title, .. } => {
            let title = title.clone();
            artifact.append_markdown(title, output.content);
        }
    }

    Ok(StateDelta::artifact(artifact))
}
