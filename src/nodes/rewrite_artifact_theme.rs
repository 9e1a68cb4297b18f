use super::{require_markdown, NodeContext};
use crate::{
    errors::CanvasError,
    intent::{ReadingLevel, TextThemeOptions, TurnIntent},
    model::ModelInput,
    prompts::{self, render},
    state::{GraphState, StateDelta},
};

fn theme_prompt(options: &TextThemeOptions, artifact: &str, reflections: &str) -> Result<String, CanvasError> {
    let template_and_value = if let Some(language) = options.language {
        (prompts::CHANGE_ARTIFACT_LANGUAGE_PROMPT, ("new_language", language.label()))
    } else if let Some(level) = options.reading_level {
        if level == ReadingLevel::Pirate {
            (prompts::CHANGE_TO_PIRATE_PROMPT, ("new_reading_level", ""))
        } else {
            (prompts::CHANGE_READING_LEVEL_PROMPT, ("new_reading_level", level.label()))
        }
    } else if let Some(length) = options.length {
        (prompts::CHANGE_ARTIFACT_LENGTH_PROMPT, ("new_length", length.label()))
    } else if options.add_emojis {
        (prompts::ADD_EMOJIS_PROMPT, ("new_length", ""))
    } else {
        return Err(CanvasError::Invariant("no theme selected".to_string()));
    };

    let (template, (name, value)) = template_and_value;
    Ok(render(
        template,
        &[(name, value), ("artifact", artifact), ("reflections", reflections)],
    ))
}

/// Apply a named theme rewrite (translate, reading level, length, emojis) to
/// a markdown artifact.
pub(crate) async fn rewrite_artifact_theme(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let content = state.current_content()?;
    let (title, full_markdown) = require_markdown(content)?;

    let TurnIntent::TextTheme(options) = &state.intent else {
        return Err(CanvasError::Invariant("no theme selected".to_string()));
    };

    let reflections = ctx.reflections_prompt().await?;
    let prompt = theme_prompt(options, full_markdown, &reflections)?;

    let output = ctx
        .model
        .invoke(ModelInput {
            messages: vec![crate::messages::Message::human(prompt)],
            temperature: Some(0.5),
            ..ModelInput::default()
        })
        .await?;

    let title = title.to_string();
    let mut artifact = state
        .artifact
        .clone()
        .ok_or(CanvasError::MissingArtifact)?;
    artifact.append_markdown(title, output.content);

    Ok(StateDelta::artifact(artifact))
}
