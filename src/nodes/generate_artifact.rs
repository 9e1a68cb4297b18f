use super::NodeContext;
use crate::{
    artifact::{remove_code_fence, Artifact, ProgrammingLanguage},
    errors::CanvasError,
    model::{ModelInput, ToolSpec},
    prompts::{self, render},
    state::{GraphState, StateDelta},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ArtifactToolArgs {
    #[serde(rename = "type")]
    artifact_type: String,
    title: String,
    artifact: String,
    language: Option<ProgrammingLanguage>,
}

fn artifact_tool() -> ToolSpec {
    ToolSpec {
        name: "generate_artifact".to_string(),
        description: "Generate a new artifact based on the user's request.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ["code", "text"],
                    "description": "The kind of artifact to generate."
                },
                "language": {
                    "type": "string",
                    "description": "The programming language, only if type is 'code'."
                },
                "title": {
                    "type": "string",
                    "description": "A short title for the artifact."
                },
                "artifact": {
                    "type": "string",
                    "description": "The full artifact content."
                }
            },
            "required": ["type", "title", "artifact"]
        }),
    }
}

/// Generate a brand new artifact from the conversation. The model is forced
/// onto the `generate_artifact` tool so the response is always structured.
pub(crate) async fn generate_artifact(
    state: &GraphState,
    ctx: &NodeContext,
) -> Result<StateDelta, CanvasError> {
    let reflections = ctx.reflections_prompt().await?;
    let system_prompt = ctx.config.full_system_prompt(render(
        prompts::NEW_ARTIFACT_PROMPT,
        &[("reflections", &reflections)],
    ));

    let output = ctx
        .model
        .invoke(ModelInput {
            messages: state.ledger.context.clone(),
            system_prompt: Some(system_prompt),
            temperature: Some(0.5),
            tool: Some(artifact_tool()),
            ..ModelInput::default()
        })
        .await?;

    let call = output.require_tool_call("generate_artifact")?;
    let args: ArtifactToolArgs = serde_json::from_value(call.args)
        .map_err(|err| CanvasError::Invariant(format!("malformed generate_artifact args: {err}")))?;

    let artifact = if args.artifact_type == "code" {
        Artifact::new_code(
            args.title,
            args.language.unwrap_or(ProgrammingLanguage::Other),
            remove_code_fence(&args.artifact),
        )
    } else {
        Artifact::new_markdown(args.title, args.artifact)
    };

    Ok(StateDelta::artifact(artifact))
}
