use serde::{Deserialize, Serialize};

/// The origin of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Ai,
    System,
}

/// A typed part of a structured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { text: String },
    /// An attached document, e.g. the extracted text of an uploaded file.
    Document { name: String, text: String },
}

/// Message content is either plain text or a list of typed parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A message in the conversation. The `hidden` flag marks messages that are
/// sent to the model but never shown to the user; the `summary` flag marks a
/// synthetic message produced by the summarizer job in place of older turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub summary: bool,
}

impl Message {
    pub fn human(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Ai, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    /// A synthetic conversation summary. It is treated as a normal
    /// human-origin message when scanning for the most recent human message,
    /// but is hidden from the user.
    pub fn conversation_summary(text: impl Into<String>) -> Self {
        Self {
            hidden: true,
            summary: true,
            ..Self::new(MessageRole::Human, text)
        }
    }

    fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(text.into()),
            id: None,
            hidden: false,
            summary: false,
        }
    }

    /// The concatenated text of the message, skipping document parts.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Document { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Character length of the text-typed content of the message.
    #[must_use]
    pub fn char_len(&self) -> usize {
        match &self.content {
            MessageContent::Text(text) => text.chars().count(),
            MessageContent::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => text.chars().count(),
                    ContentPart::Document { .. } => 0,
                })
                .sum(),
        }
    }
}

/// Two parallel, append-only message sequences: the transcript shown to the
/// user and the transcript actually sent to the model. The context log is a
/// superset view and may carry hidden document messages or a synthetic
/// summary message in place of older turns; the visible log never does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLedger {
    pub visible: Vec<Message>,
    pub context: Vec<Message>,
}

impl MessageLedger {
    /// Append a message to both logs.
    pub fn push_both(&mut self, message: Message) {
        self.visible.push(message.clone());
        self.context.push(message);
    }

    /// Append a message only to the model-context log.
    pub fn push_context(&mut self, message: Message) {
        self.context.push(message);
    }

    /// The most recent human-origin message in the model-context log.
    /// Summary messages count as human-origin here.
    #[must_use]
    pub fn recent_human(&self) -> Option<&Message> {
        self.context
            .iter()
            .rfind(|message| message.role == MessageRole::Human)
    }

    /// Summed character length of the model-context log.
    #[must_use]
    pub fn context_char_len(&self) -> usize {
        self.context.iter().map(Message::char_len).sum()
    }

    /// Replace a contiguous prefix of the model-context log with one summary
    /// message, keeping the `keep_recent` most recent entries. The visible
    /// log is never condensed.
    pub fn condense(&mut self, summary: Message, keep_recent: usize) {
        if self.context.len() <= keep_recent {
            return;
        }
        let tail = self.context.split_off(self.context.len() - keep_recent);
        self.context = Vec::with_capacity(tail.len() + 1);
        self.context.push(summary);
        self.context.extend(tail);
    }
}
