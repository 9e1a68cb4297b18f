//! Prompt templates used by the transformation nodes. Placeholders are
//! `{name}` tokens filled in with [`render`].

pub(crate) const ROUTE_QUERY_PROMPT: &str = "You are an assistant routing a user's query in a canvas app where the user collaborates on a single artifact.

Your task is to pick exactly one route for the latest message.

<options>
{artifact_options}
</options>

<recent-messages>
{recent_messages}
</recent-messages>

{current_artifact}";

pub(crate) const ROUTE_OPTIONS_HAS_ARTIFACT: &str = "- 'rewrite_artifact': the user asked to change, or implicitly referenced changing, the artifact.
- 'reply_to_general_input': the user asked a question or made a remark that does not request an artifact change.";

pub(crate) const ROUTE_OPTIONS_NO_ARTIFACT: &str = "- 'generate_artifact': the user asked for content that belongs in an artifact (a document or code file).
- 'reply_to_general_input': the user asked a question or made a remark that does not call for an artifact.";

pub(crate) const CURRENT_ARTIFACT_PROMPT: &str = "The artifact the user is currently working on:
<artifact title=\"{title}\">
{content}
</artifact>";

pub(crate) const NO_ARTIFACT_PROMPT: &str = "The user has no artifact yet.";

pub(crate) const INCLUDE_URL_CONTENTS_PROMPT: &str = "The user's latest message contains one or more URLs:

{urls}

Decide whether the user wants the contents of those pages inlined into their message as context. Only answer yes if the message clearly depends on what the pages contain.";

pub(crate) const NEW_ARTIFACT_PROMPT: &str = "You are an AI assistant tasked with generating a new artifact (a markdown document or a code file) based on the user's request.

Use the full conversation as context. Respond with the 'generate_artifact' tool only.

You have the following reflections on style and user facts to use when generating the artifact:
<reflections>
{reflections}
</reflections>";

pub(crate) const REWRITE_ARTIFACT_PROMPT: &str = "You are an AI assistant tasked with rewriting the user's artifact according to their latest message.

Here is the current artifact:
<artifact>
{artifact}
</artifact>

Rewrite the FULL artifact and respond with the updated artifact only, no prefix or suffix.{type_change}

You have the following reflections to use when rewriting:
<reflections>
{reflections}
</reflections>";

pub(crate) const REWRITE_ARTIFACT_TYPE_CHANGE_PROMPT: &str = "\n\nThe artifact should change type to '{new_type}'. Rewrite it accordingly.";

pub(crate) const UPDATE_META_PROMPT: &str = "You are about to rewrite the following artifact based on the user's latest message:
<artifact>
{artifact}
</artifact>

Decide whether the artifact's type or title should change as part of the rewrite. This is rare; when in doubt, keep both. Respond with the 'update_artifact_meta' tool only.

<reflections>
{reflections}
</reflections>";

pub(crate) const UPDATE_HIGHLIGHTED_CODE_PROMPT: &str = "You are an AI assistant updating a highlighted section of the user's code.

Only rewrite the highlighted text; the surrounding code is shown for context and must be preserved exactly.

<before-highlight>
{before}
</before-highlight>
<highlighted>
{highlighted}
</highlighted>
<after-highlight>
{after}
</after-highlight>

Respond with ONLY the replacement for the highlighted text. No code fences, no prefix or suffix.

<reflections>
{reflections}
</reflections>";

pub(crate) const UPDATE_HIGHLIGHTED_TEXT_PROMPT: &str = "You are an expert AI writing assistant rewriting text the user selected inside a markdown block.

# Selected text
{selected_text}

# Containing block
{block}

Rewrite the block to fulfill the user's request. Do NOT change anything except the selected text, unless strictly necessary to make it read well. Respond with the FULL updated block, keeping all formatting, and nothing else.";

pub(crate) const CHANGE_ARTIFACT_LANGUAGE_PROMPT: &str = "Translate the following artifact to {new_language}. Change nothing but the language. Respond with the translated artifact only.

<artifact>
{artifact}
</artifact>

<reflections>
{reflections}
</reflections>";

pub(crate) const CHANGE_READING_LEVEL_PROMPT: &str = "Rewrite the following artifact to be at the reading level of a {new_reading_level}. Do not change the meaning. Respond with the updated artifact only.

<artifact>
{artifact}
</artifact>

<reflections>
{reflections}
</reflections>";

pub(crate) const CHANGE_TO_PIRATE_PROMPT: &str = "Rewrite the following artifact to sound like a pirate wrote it, without losing the original meaning. Respond with the updated artifact only.

<artifact>
{artifact}
</artifact>

<reflections>
{reflections}
</reflections>";

pub(crate) const CHANGE_ARTIFACT_LENGTH_PROMPT: &str = "Rewrite the following artifact to be {new_length}. Keep the meaning and style. Respond with the updated artifact only.

<artifact>
{artifact}
</artifact>

<reflections>
{reflections}
</reflections>";

pub(crate) const ADD_EMOJIS_PROMPT: &str = "Rewrite the following artifact adding emojis where they fit naturally. Content must stay otherwise unchanged. Respond with the updated artifact only.

<artifact>
{artifact}
</artifact>

<reflections>
{reflections}
</reflections>";

pub(crate) const ADD_COMMENTS_PROMPT: &str = "Add helpful comments to the following code. Do not change the code itself. Respond with the commented code only, no code fences.

<code>
{artifact}
</code>";

pub(crate) const ADD_LOGS_PROMPT: &str = "Add log statements to the following code where they help debugging. Do not otherwise change the code. Respond with the updated code only, no code fences.

<code>
{artifact}
</code>";

pub(crate) const PORT_LANGUAGE_PROMPT: &str = "Port the following code to {new_language}. Preserve behavior exactly. Respond with the ported code only, no code fences.

<code>
{artifact}
</code>";

pub(crate) const FIX_BUGS_PROMPT: &str = "Find and fix any bugs in the following code, changing as little as possible. Respond with the fixed code only, no code fences.

<code>
{artifact}
</code>";

pub(crate) const CUSTOM_ACTION_PREFIX_PROMPT: &str = "You are an AI assistant applying a user-defined action to their artifact. Follow the custom instructions exactly and respond with the full updated artifact only.";

pub(crate) const CUSTOM_ACTION_REFLECTIONS_PROMPT: &str = "You have the following reflections on style and user facts:
<reflections>
{reflections}
</reflections>";

pub(crate) const CUSTOM_ACTION_CONVERSATION_PROMPT: &str = "Recent conversation for context:
<conversation>
{conversation}
</conversation>";

pub(crate) const CUSTOM_ACTION_ARTIFACT_PROMPT: &str = "The current artifact:
<artifact>
{artifact}
</artifact>";

pub(crate) const REPLY_TO_GENERAL_INPUT_PROMPT: &str = "You are an AI assistant in a canvas app. Reply to the user's latest message conversationally. Do NOT generate or modify any artifact.

{current_artifact}

<reflections>
{reflections}
</reflections>";

pub(crate) const FOLLOWUP_ARTIFACT_PROMPT: &str = "You just generated or updated the artifact below for the user. Write a very short (1-2 sentence) followup message inviting feedback. Do not repeat the artifact.

<artifact>
{artifact}
</artifact>";

pub(crate) const WEB_SEARCH_RESULTS_PROMPT: &str = "I searched the web and found the following results:

{results}";

pub(crate) const THREAD_TITLE_PROMPT: &str = "Generate a short title (2-5 words) for a conversation that starts with the following messages. Respond with the 'generate_title' tool only.

<conversation>
{conversation}
</conversation>";

pub(crate) const REFLECT_SYSTEM_PROMPT: &str = "You are analyzing a conversation and artifact to maintain the assistant's long-term memory about this user.

<artifact>
{artifact}
</artifact>

Current reflections:
<reflections>
{reflections}
</reflections>

Generate the COMPLETE new list of style rules and user facts, carrying forward anything still relevant. Respond with the 'generate_reflections' tool only.";

pub(crate) const SUMMARIZER_PROMPT: &str = "Summarize the following conversation thoroughly enough that the assistant can continue it without the original messages. Include decisions made about the artifact. Respond with the summary only.

<conversation>
{conversation}
</conversation>";

/// Fill `{name}` placeholders in a template.
pub(crate) fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in substitutions {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Render messages as `<role>...</role>` blocks for inclusion in a prompt.
pub(crate) fn format_conversation(messages: &[crate::messages::Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let role = match message.role {
                crate::messages::MessageRole::Human => "human",
                crate::messages::MessageRole::Ai => "ai",
                crate::messages::MessageRole::System => "system",
            };
            format!("<{role}>\n{}\n</{role}>", message.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
