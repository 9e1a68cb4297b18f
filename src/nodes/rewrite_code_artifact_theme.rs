use super::{require_code, NodeContext};
use crate::{
    artifact::remove_code_fence,
    errors::CanvasError,
    intent::{CodeThemeOptions, TurnIntent},
    messages::Message,
    model::ModelInput,
    prompts::{self, render},
    state::{GraphState, StateDelta},
};

fn theme_prompt(options: &CodeThemeOptions, code: &str) -> Result<String, CanvasError> {
    let prompt = if options.add_comments {
        render(prompts::ADD_COMMENTS_PROMPT, &[("artifact", code)])
    } else if let Some(language) = options.port_language {
        render(
            prompts::PORT_LANGUAGE_PROMPT,
            &[("new_language", language.label()), ("artifact", code)],
        )
    } else if options.add_logs {
        render(prompts::ADD_LOGS_PROMPT, &[("artifact", code)])
    } else if options.fix_bugs {
        render(prompts::FIX_BUGS_PROMPT, &[("artifact", code)])
    } else {
        return Err(CanvasError::Invariant("no theme selected".to_string()));
    };
    Ok(prompt)
}

/// Apply a named code theme rewrite (comments, logs, port, bug fixes) to a
/// code artifact. Porting updates the stored language.
pub(crate) async fn rewrite_code_artifact_theme(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let content = state.current_content()?;
    let (title, language, code) = require_code(content)?;

    let TurnIntent::CodeTheme(options) = &state.intent else {
        return Err(CanvasError::Invariant("no theme selected".to_string()));
    };

    let prompt = theme_prompt(options, code)?;
    let output = ctx
        .model
        .invoke(ModelInput {
            messages: vec![Message::human(prompt)],
            temperature: Some(0.5),
            ..ModelInput::default()
        })
        .await?;

    let title = title.to_string();
    let language = options.port_language.unwrap_or(language);
    let mut artifact = state
        .artifact
        .clone()
        .ok_or(CanvasError::MissingArtifact)?;
    artifact.append_code(title, language, remove_code_fence(&output.content));

    Ok(StateDelta::artifact(artifact))
}
