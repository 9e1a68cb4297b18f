use crate::{model::ChatModelError, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Chat model error: {0}")]
    Model(#[from] ChatModelError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    /// The operation requires an artifact but the state carries none.
    #[error("No artifact found")]
    MissingArtifact,
    /// The current artifact content is the wrong variant for the operation
    /// (e.g. a code theme rewrite against a markdown artifact).
    #[error("Current artifact content is not a {expected} artifact")]
    WrongArtifactVariant { expected: &'static str },
    #[error("Can not partially regenerate an artifact without a highlight")]
    MissingHighlight,
    /// The highlight selector's anchor text could not be located in the
    /// current artifact content.
    #[error("Highlight selection not found in the current artifact content")]
    SelectorNotFound,
    #[error("Highlight range {start}..{end} is out of bounds for the current artifact content")]
    HighlightOutOfBounds { start: usize, end: usize },
    #[error("`{0}` not found in session configuration")]
    MissingConfig(&'static str),
    #[error("No custom action found for id {0}")]
    UnknownCustomAction(String),
    #[error("No recent human message found")]
    MissingHumanMessage,
    #[error("Invariant: {0}")]
    Invariant(String),
}

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;
