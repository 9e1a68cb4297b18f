use serde::{Deserialize, Serialize};

/// Programming languages a code artifact may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgrammingLanguage {
    Typescript,
    Javascript,
    Python,
    Java,
    Cpp,
    Php,
    Html,
    Sql,
    Rust,
    Other,
}

impl ProgrammingLanguage {
    /// Human-readable name used in prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Typescript => "TypeScript",
            Self::Javascript => "JavaScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::Php => "PHP",
            Self::Html => "HTML",
            Self::Sql => "SQL",
            Self::Rust => "Rust",
            Self::Other => "the current language",
        }
    }
}

/// One immutable snapshot in an artifact's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactContent {
    Code {
        index: u32,
        title: String,
        language: ProgrammingLanguage,
        code: String,
    },
    #[serde(rename = "text")]
    Markdown {
        index: u32,
        title: String,
        full_markdown: String,
    },
}

impl ArtifactContent {
    #[must_use]
    pub fn index(&self) -> u32 {
        match self {
            Self::Code { index, .. } | Self::Markdown { index, .. } => *index,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Code { title, .. } | Self::Markdown { title, .. } => title,
        }
    }

    /// The body of the snapshot, regardless of variant.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Code { code, .. } => code,
            Self::Markdown { full_markdown, .. } => full_markdown,
        }
    }

    #[must_use]
    pub fn is_code(&self) -> bool {
        matches!(self, Self::Code { .. })
    }

    #[must_use]
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown { .. })
    }

    #[must_use]
    pub fn language(&self) -> Option<ProgrammingLanguage> {
        match self {
            Self::Code { language, .. } => Some(*language),
            Self::Markdown { .. } => None,
        }
    }
}

/// The single versioned document a conversation collaboratively produces.
///
/// `contents` is append-only: every update appends a new snapshot with
/// `index = contents.len() + 1` and advances `current_index` to it. Existing
/// snapshots are never mutated or removed, so the full lineage is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub current_index: u32,
    pub contents: Vec<ArtifactContent>,
}

impl Artifact {
    /// A fresh artifact with a single markdown snapshot at index 1.
    #[must_use]
    pub fn new_markdown(title: impl Into<String>, full_markdown: impl Into<String>) -> Self {
        Self {
            current_index: 1,
            contents: vec![ArtifactContent::Markdown {
                index: 1,
                title: title.into(),
                full_markdown: full_markdown.into(),
            }],
        }
    }

    /// A fresh artifact with a single code snapshot at index 1.
    #[must_use]
    pub fn new_code(
        title: impl Into<String>,
        language: ProgrammingLanguage,
        code: impl Into<String>,
    ) -> Self {
        Self {
            current_index: 1,
            contents: vec![ArtifactContent::Code {
                index: 1,
                title: title.into(),
                language,
                code: code.into(),
            }],
        }
    }

    /// Resolve the current snapshot: the one whose index equals
    /// `current_index`, or the last snapshot if none matches.
    #[must_use]
    pub fn current_content(&self) -> Option<&ArtifactContent> {
        self.contents
            .iter()
            .find(|content| content.index() == self.current_index)
            .or_else(|| self.contents.last())
    }

    /// Append a markdown snapshot and advance `current_index` to it.
    pub fn append_markdown(&mut self, title: impl Into<String>, full_markdown: impl Into<String>) {
        let index = self.next_index();
        self.contents.push(ArtifactContent::Markdown {
            index,
            title: title.into(),
            full_markdown: full_markdown.into(),
        });
        self.current_index = index;
    }

    /// Append a code snapshot and advance `current_index` to it.
    pub fn append_code(
        &mut self,
        title: impl Into<String>,
        language: ProgrammingLanguage,
        code: impl Into<String>,
    ) {
        let index = self.next_index();
        self.contents.push(ArtifactContent::Code {
            index,
            title: title.into(),
            language,
            code: code.into(),
        });
        self.current_index = index;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_index(&self) -> u32 {
        self.contents.len() as u32 + 1
    }
}

/// Strip a surrounding markdown code fence from model output, if present.
/// Models frequently wrap code artifacts in triple backticks even when asked
/// not to.
#[must_use]
pub fn remove_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text.to_string();
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text.to_string();
    };
    // Drop the language tag on the opening fence line. A fence without a
    // newline after it is not treated as a wrapper; stripping it would lose
    // the body.
    match inner.split_once('\n') {
        Some((_, body)) => body.trim_end().to_string(),
        None => text.to_string(),
    }
}
