use super::NodeContext;
use crate::{
    artifact::{remove_code_fence, ArtifactContent, ProgrammingLanguage},
    errors::CanvasError,
    model::{ModelInput, ToolSpec},
    prompts::{self, render},
    state::{GraphState, StateDelta},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// Non-binding meta decision: whether the rewrite should also change the
/// artifact's type or title.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct ArtifactMeta {
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub title: Option<String>,
    pub language: Option<ProgrammingLanguage>,
}

fn meta_tool() -> ToolSpec {
    ToolSpec {
        name: "update_artifact_meta".to_string(),
        description: "Update the artifact meta information, if necessary.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ["code", "text"],
                    "description": "The kind of artifact after the rewrite."
                },
                "title": {
                    "type": "string",
                    "description": "New title, ONLY if the rewrite changes the topic."
                },
                "language": {
                    "type": "string",
                    "description": "The programming language, only if type is 'code'."
                }
            },
            "required": ["type"]
        }),
    }
}

/// Ask the model whether the artifact's title or type should change before
/// the rewrite. The decision is non-binding: any failure falls back to "no
/// change".
async fn optionally_update_meta(
    state: &GraphState,
    ctx: &NodeContext,
    content: &ArtifactContent,
    reflections: &str,
) -> Option<ArtifactMeta> {
    let prompt = render(
        prompts::UPDATE_META_PROMPT,
        &[("artifact", content.text()), ("reflections", reflections)],
    );
    let recent_human = state.recent_human().ok()?;

    let result = ctx
        .model
        .invoke(ModelInput {
            messages: vec![recent_human.clone()],
            system_prompt: Some(prompt),
            temperature: Some(0.0),
            tool: Some(meta_tool()),
            ..ModelInput::default()
        })
        .await;

    let meta = result
        .and_then(|output| output.require_tool_call("update_artifact_meta"))
        .map_err(CanvasError::from)
        .and_then(|call| {
            serde_json::from_value::<ArtifactMeta>(call.args)
                .map_err(|err| CanvasError::Invariant(err.to_string()))
        });

    match meta {
        Ok(meta) => Some(meta),
        Err(err) => {
            warn!(error = %err, "artifact meta decision failed; keeping current meta");
            None
        }
    }
}

/// Rewrite the whole current artifact content according to the user's latest
/// message, appending one new version.
pub(crate) async fn rewrite_artifact(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let content = state.current_content()?;
    let recent_human = state.recent_human()?.clone();
    let reflections = ctx.reflections_prompt().await?;

    let meta = optionally_update_meta(state, ctx, content, &reflections).await;
    let target_type = meta
        .as_ref()
        .map_or_else(
            || if content.is_code() { "code" } else { "text" }.to_string(),
            |meta| meta.artifact_type.clone(),
        );
    let is_new_type = (target_type == "code") != content.is_code();

    let type_change = if is_new_type {
        render(
            prompts::REWRITE_ARTIFACT_TYPE_CHANGE_PROMPT,
            &[("new_type", &target_type)],
        )
    } else {
        String::new()
    };
    let system_prompt = ctx.config.full_system_prompt(render(
        prompts::REWRITE_ARTIFACT_PROMPT,
        &[
            ("artifact", content.text()),
            ("type_change", &type_change),
            ("reflections", &reflections),
        ],
    ));

    let output = ctx
        .model
        .invoke(ModelInput {
            messages: vec![recent_human],
            system_prompt: Some(system_prompt),
            temperature: Some(0.0),
            ..ModelInput::default()
        })
        .await?;

    let title = meta
        .as_ref()
        .and_then(|meta| meta.title.clone())
        .unwrap_or_else(|| content.title().to_string());

    let mut artifact = state
        .artifact
        .clone()
        .ok_or(CanvasError::MissingArtifact)?;
    if target_type == "code" {
        let language = meta
            .as_ref()
            .and_then(|meta| meta.language)
            .or_else(|| content.language())
            .unwrap_or(ProgrammingLanguage::Other);
        artifact.append_code(title, language, remove_code_fence(&output.content));
    } else {
        artifact.append_markdown(title, output.content);
    }

    Ok(StateDelta::artifact(artifact))
}
