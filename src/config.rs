use crate::errors::CanvasError;

/// Identity and prompt configuration for a canvas session. Identity fields
/// are optional at construction; operations that need one fail with
/// [`CanvasError::MissingConfig`] when it is absent.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// The assistant identity that reflections are stored under.
    pub assistant_id: Option<String>,
    /// The user identity that custom actions are stored under.
    pub user_id: Option<String>,
    /// The conversation thread background jobs deliver results to.
    pub thread_id: Option<String>,
    /// A custom system prompt prepended to every node's system prompt.
    pub system_prompt: Option<String>,
}

impl SessionConfig {
    pub fn assistant_id(&self) -> Result<&str, CanvasError> {
        self.assistant_id
            .as_deref()
            .ok_or(CanvasError::MissingConfig("assistant_id"))
    }

    pub fn user_id(&self) -> Result<&str, CanvasError> {
        self.user_id
            .as_deref()
            .ok_or(CanvasError::MissingConfig("user_id"))
    }

    /// Prepend the configured custom system prompt, when present.
    #[must_use]
    pub(crate) fn full_system_prompt(&self, prompt: String) -> String {
        match &self.system_prompt {
            Some(custom) => format!("{custom}\n{prompt}"),
            None => prompt,
        }
    }
}
