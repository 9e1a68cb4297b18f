use crate::{
    dispatcher::{JobKind, JobPayload, JobRunner},
    errors::BoxedError,
    messages::Message,
    model::{ChatModel, ModelInput, ToolSpec},
    prompts::{self, format_conversation, render},
    store::{
        self, AssistantStore, Reflections, THREADS_NAMESPACE, THREAD_SUMMARY_KEY, THREAD_TITLE_KEY,
    },
};
use serde_json::json;
use std::sync::Arc;

/// How many recent context messages survive a summarization; the rest are
/// replaced by the summary message.
pub(crate) const SUMMARY_RETAINED_MESSAGES: usize = 10;

/// Executes the three maintenance jobs (title, reflection, summarizer)
/// against the model and store collaborators. Results are delivered through
/// the store; failures propagate to the dispatcher, which logs and drops
/// them.
pub struct MaintenanceRunner {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn AssistantStore>,
}

impl MaintenanceRunner {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>, store: Arc<dyn AssistantStore>) -> Self {
        Self { model, store }
    }

    /// Generate a short thread title from the first exchange and deliver it
    /// under the thread's namespace.
    async fn thread_title(&self, payload: JobPayload) -> Result<(), BoxedError> {
        let prompt = render(
            prompts::THREAD_TITLE_PROMPT,
            &[("conversation", &format_conversation(&payload.messages))],
        );
        let tool = ToolSpec {
            name: "generate_title".to_string(),
            description: "Generate a concise thread title.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "The thread title, 2-5 words."
                    }
                },
                "required": ["title"]
            }),
        };

        let call = self
            .model
            .invoke(ModelInput {
                messages: vec![Message::human(prompt)],
                temperature: Some(0.0),
                tool: Some(tool),
                ..ModelInput::default()
            })
            .await?
            .require_tool_call("generate_title")?;
        let title = call.args["title"]
            .as_str()
            .ok_or("generate_title returned no title")?
            .to_string();

        self.store
            .put(
                &[THREADS_NAMESPACE, &payload.thread_id],
                THREAD_TITLE_KEY,
                json!(title),
            )
            .await?;
        Ok(())
    }

    /// Regenerate the assistant's reflections from the conversation and
    /// artifact snapshot, and write them back wholesale. No merge: two
    /// overlapping reflection jobs are last-write-wins.
    async fn reflection(&self, payload: JobPayload) -> Result<(), BoxedError> {
        let assistant_id = payload
            .assistant_id
            .as_deref()
            .ok_or("reflection job requires an assistant_id")?;
        let current = store::fetch_reflections(self.store.as_ref(), assistant_id).await?;

        let artifact_text = payload
            .artifact
            .as_ref()
            .and_then(|artifact| artifact.current_content())
            .map_or("No artifact found.", |content| content.text());
        let system_prompt = render(
            prompts::REFLECT_SYSTEM_PROMPT,
            &[
                ("artifact", artifact_text),
                ("reflections", &store::reflections_prompt(current.as_ref())),
            ],
        );
        let tool = ToolSpec {
            name: "generate_reflections".to_string(),
            description: "Generate the complete new reflections record.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "style_rules": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "The complete new list of style rules and guidelines."
                    },
                    "content": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "The complete new list of memories/facts about the user."
                    }
                },
                "required": ["style_rules", "content"]
            }),
        };

        let call = self
            .model
            .invoke(ModelInput {
                messages: payload.messages,
                system_prompt: Some(system_prompt),
                temperature: Some(0.0),
                tool: Some(tool),
                ..ModelInput::default()
            })
            .await?
            .require_tool_call("generate_reflections")?;
        let reflections: Reflections = serde_json::from_value(call.args)?;

        store::put_reflections(self.store.as_ref(), assistant_id, &reflections).await?;
        Ok(())
    }

    /// Summarize the context snapshot into one synthetic message and deliver
    /// it under the thread's namespace. The session applies it to the context
    /// log at the start of the next turn.
    async fn summarize(&self, payload: JobPayload) -> Result<(), BoxedError> {
        let prompt = render(
            prompts::SUMMARIZER_PROMPT,
            &[("conversation", &format_conversation(&payload.messages))],
        );

        let output = self
            .model
            .invoke(ModelInput {
                messages: vec![Message::human(prompt)],
                temperature: Some(0.0),
                ..ModelInput::default()
            })
            .await?;
        let summary = Message::conversation_summary(output.content);

        self.store
            .put(
                &[THREADS_NAMESPACE, &payload.thread_id],
                THREAD_SUMMARY_KEY,
                serde_json::to_value(&summary)?,
            )
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl JobRunner for MaintenanceRunner {
    async fn run(&self, job: JobKind, payload: JobPayload) -> Result<(), BoxedError> {
        match job {
            JobKind::ThreadTitle => self.thread_title(payload).await,
            JobKind::Reflection => self.reflection(payload).await,
            JobKind::Summarizer => self.summarize(payload).await,
        }
    }
}
