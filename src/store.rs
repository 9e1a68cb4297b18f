use crate::errors::BoxedError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(#[source] BoxedError),
    #[error("Malformed store value: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Namespaced key-value store collaborator. Used for reflections, custom
/// actions, and background job result delivery. Semantics are last-write-wins
/// per key.
#[async_trait::async_trait]
pub trait AssistantStore: Send + Sync {
    async fn get(&self, namespace: &[&str], key: &str) -> StoreResult<Option<Value>>;
    async fn put(&self, namespace: &[&str], key: &str, value: Value) -> StoreResult<()>;
}

/// Accumulated style rules and user facts for one assistant identity. Read by
/// every generation/rewrite prompt and rewritten wholesale (never merged) by
/// the reflection background job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflections {
    pub style_rules: Vec<String>,
    pub content: Vec<String>,
}

impl Reflections {
    /// Render reflections for inclusion in a prompt.
    #[must_use]
    pub fn as_prompt(&self) -> String {
        let style_rules = if self.style_rules.is_empty() {
            "No style rules found.".to_string()
        } else {
            self.style_rules.join("\n- ")
        };
        let content = if self.content.is_empty() {
            "No memories/facts found.".to_string()
        } else {
            self.content.join("\n- ")
        };
        format!("<style-rules>\n- {style_rules}\n</style-rules>\n<user-facts>\n- {content}\n</user-facts>")
    }
}

/// A user-defined quick action: a stored prompt applied to the current
/// artifact with optional extra context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAction {
    pub id: String,
    pub title: String,
    pub prompt: String,
    #[serde(default)]
    pub include_reflections: bool,
    #[serde(default)]
    pub include_prefix: bool,
    #[serde(default)]
    pub include_recent_history: bool,
}

pub(crate) const MEMORIES_NAMESPACE: &str = "memories";
pub(crate) const MEMORIES_KEY: &str = "reflection";
pub(crate) const CUSTOM_ACTIONS_NAMESPACE: &str = "custom_actions";
pub(crate) const CUSTOM_ACTIONS_KEY: &str = "actions";
pub(crate) const THREADS_NAMESPACE: &str = "threads";
pub(crate) const THREAD_TITLE_KEY: &str = "title";
pub(crate) const THREAD_SUMMARY_KEY: &str = "summary";

pub(crate) async fn fetch_reflections(
    store: &dyn AssistantStore,
    assistant_id: &str,
) -> StoreResult<Option<Reflections>> {
    let value = store
        .get(&[MEMORIES_NAMESPACE, assistant_id], MEMORIES_KEY)
        .await?;
    value
        .map(|value| serde_json::from_value(value).map_err(StoreError::from))
        .transpose()
}

pub(crate) async fn put_reflections(
    store: &dyn AssistantStore,
    assistant_id: &str,
    reflections: &Reflections,
) -> StoreResult<()> {
    store
        .put(
            &[MEMORIES_NAMESPACE, assistant_id],
            MEMORIES_KEY,
            serde_json::to_value(reflections)?,
        )
        .await
}

pub(crate) async fn fetch_custom_actions(
    store: &dyn AssistantStore,
    user_id: &str,
) -> StoreResult<Option<HashMap<String, CustomAction>>> {
    let value = store
        .get(&[CUSTOM_ACTIONS_NAMESPACE, user_id], CUSTOM_ACTIONS_KEY)
        .await?;
    value
        .map(|value| serde_json::from_value(value).map_err(StoreError::from))
        .transpose()
}

/// Render an optional reflections record, with the documented default when
/// none is stored.
#[must_use]
pub(crate) fn reflections_prompt(reflections: Option<&Reflections>) -> String {
    reflections.map_or_else(|| "No reflections found.".to_string(), Reflections::as_prompt)
}

/// A process-local store, mainly useful for tests and examples.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_key(namespace: &[&str], key: &str) -> String {
        format!("{}/{key}", namespace.join("/"))
    }
}

#[async_trait::async_trait]
impl AssistantStore for InMemoryStore {
    async fn get(&self, namespace: &[&str], key: &str) -> StoreResult<Option<Value>> {
        let entries = self.entries.lock().expect("store lock poisoned");
        Ok(entries.get(&Self::entry_key(namespace, key)).cloned())
    }

    async fn put(&self, namespace: &[&str], key: &str, value: Value) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(Self::entry_key(namespace, key), value);
        Ok(())
    }
}
