use crate::{
    artifact::ProgrammingLanguage,
    highlight::{CodeHighlight, TextHighlight},
    messages::Message,
};
use serde::{Deserialize, Serialize};

/// Natural languages an artifact can be translated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageOption {
    English,
    Mandarin,
    Spanish,
    French,
    Hindi,
}

impl LanguageOption {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Mandarin => "Mandarin",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::Hindi => "Hindi",
        }
    }
}

/// Target length for a length rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactLength {
    Shortest,
    Short,
    Long,
    Longest,
}

impl ArtifactLength {
    /// Phrase used in the rewrite prompt.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Shortest => "much shorter than it currently is",
            Self::Short => "slightly shorter than it currently is",
            Self::Long => "slightly longer than it currently is",
            Self::Longest => "much longer than it currently is",
        }
    }
}

/// Target reading level for a reading-level rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingLevel {
    Child,
    Teenager,
    College,
    Phd,
    Pirate,
}

impl ReadingLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Child => "elementary school student",
            Self::Teenager => "high school student",
            Self::College => "college student",
            Self::Phd => "PhD student",
            Self::Pirate => "pirate",
        }
    }
}

/// One-shot options for a text (markdown) theme rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextThemeOptions {
    pub language: Option<LanguageOption>,
    pub reading_level: Option<ReadingLevel>,
    pub length: Option<ArtifactLength>,
    pub add_emojis: bool,
}

impl TextThemeOptions {
    #[must_use]
    pub fn any_set(&self) -> bool {
        self.language.is_some()
            || self.reading_level.is_some()
            || self.length.is_some()
            || self.add_emojis
    }
}

/// One-shot options for a code theme rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeThemeOptions {
    pub add_comments: bool,
    pub add_logs: bool,
    pub port_language: Option<ProgrammingLanguage>,
    pub fix_bugs: bool,
}

impl CodeThemeOptions {
    #[must_use]
    pub fn any_set(&self) -> bool {
        self.add_comments || self.add_logs || self.port_language.is_some() || self.fix_bugs
    }
}

/// The single action family chosen for this turn. Exactly one variant is
/// carried through the state, eliminating the need to probe many optional
/// fields in priority order downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TurnIntent {
    /// No flag set; a model-backed classification picks the route.
    #[default]
    Conversation,
    EditHighlightedCode(CodeHighlight),
    EditHighlightedText(TextHighlight),
    TextTheme(TextThemeOptions),
    CodeTheme(CodeThemeOptions),
    CustomAction(String),
    WebSearch,
}

/// Per-turn input: the new user messages plus the one-shot flags set in the
/// UI. Flags are mutually exclusive by construction of [`TurnIntent`]; when
/// several are set anyway, `intent()` applies the documented priority order.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub messages: Vec<Message>,
    pub highlighted_code: Option<CodeHighlight>,
    pub highlighted_text: Option<TextHighlight>,
    pub language: Option<LanguageOption>,
    pub artifact_length: Option<ArtifactLength>,
    pub regenerate_with_emojis: bool,
    pub reading_level: Option<ReadingLevel>,
    pub add_comments: bool,
    pub add_logs: bool,
    pub port_language: Option<ProgrammingLanguage>,
    pub fix_bugs: bool,
    pub custom_action_id: Option<String>,
    pub web_search_enabled: bool,
}

impl TurnRequest {
    #[must_use]
    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
            ..Self::default()
        }
    }

    /// Collapse the one-shot flags into a single intent. Priority order,
    /// first match wins: code highlight, text highlight, text theme, code
    /// theme, custom action, web search, plain conversation.
    #[must_use]
    pub fn intent(&self) -> TurnIntent {
        if let Some(highlight) = self.highlighted_code {
            return TurnIntent::EditHighlightedCode(highlight);
        }
        if let Some(highlight) = &self.highlighted_text {
            return TurnIntent::EditHighlightedText(highlight.clone());
        }
        let text_theme = TextThemeOptions {
            language: self.language,
            reading_level: self.reading_level,
            length: self.artifact_length,
            add_emojis: self.regenerate_with_emojis,
        };
        if text_theme.any_set() {
            return TurnIntent::TextTheme(text_theme);
        }
        let code_theme = CodeThemeOptions {
            add_comments: self.add_comments,
            add_logs: self.add_logs,
            port_language: self.port_language,
            fix_bugs: self.fix_bugs,
        };
        if code_theme.any_set() {
            return TurnIntent::CodeTheme(code_theme);
        }
        if let Some(id) = &self.custom_action_id {
            return TurnIntent::CustomAction(id.clone());
        }
        if self.web_search_enabled {
            return TurnIntent::WebSearch;
        }
        TurnIntent::Conversation
    }
}
