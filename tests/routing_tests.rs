mod common;

use canvas_agent::{
    testing::StaticUrlFetcher, Artifact, ChatModelError, CodeHighlight, ContentPart, JobKind,
    Message, MessageContent, MessageRole, NodeKind, ProgrammingLanguage, ThreadState, TurnRequest,
    REFLECTION_DELAY,
};
use common::Harness;
use serde_json::json;
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn conversation_without_artifact_routes_to_generate() {
    let harness = Harness::new();
    harness
        .model
        .enqueue_tool_call("route_query", json!({ "route": "generate_artifact" }));
    harness.model.enqueue_tool_call(
        "generate_artifact",
        json!({
            "type": "code",
            "language": "python",
            "title": "Fibonacci",
            "artifact": "```python\ndef fib(n): ...\n```"
        }),
    );
    harness.model.enqueue_text("I wrote a Fibonacci script.");

    let mut session = harness.session(ThreadState::default());
    let outcome = session
        .run_turn(TurnRequest::message(Message::human(
            "write fibonacci in python",
        )))
        .await
        .unwrap();

    assert_eq!(outcome.node, NodeKind::GenerateArtifact);
    assert_eq!(outcome.new_messages.len(), 1);
    assert_eq!(outcome.new_messages[0].text(), "I wrote a Fibonacci script.");

    let artifact = session.thread().artifact.as_ref().unwrap();
    assert_eq!(artifact.current_index, 1);
    let content = artifact.current_content().unwrap();
    assert_eq!(content.title(), "Fibonacci");
    assert_eq!(content.language(), Some(ProgrammingLanguage::Python));
    // The code fence the model wrapped the artifact in is stripped.
    assert_eq!(content.text(), "def fib(n): ...");

    // Artifact turn: a delayed reflection, then the first-turn title job.
    let recorded = harness.dispatcher.recorded();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].job, JobKind::Reflection);
    assert_eq!(recorded[0].delay, REFLECTION_DELAY);
    assert_eq!(recorded[1].job, JobKind::ThreadTitle);
    assert_eq!(recorded[1].delay, Duration::ZERO);
    assert_eq!(recorded[1].payload.thread_id, "thread-1");
}

#[tokio::test]
async fn classification_failure_falls_back_to_reply() {
    let harness = Harness::new();
    harness
        .model
        .enqueue(ChatModelError::Provider("model offline".to_string()));
    harness.model.enqueue_text("Happy to help anyway.");

    let mut session = harness.session(ThreadState::default());
    let outcome = session
        .run_turn(TurnRequest::message(Message::human("hello there")))
        .await
        .unwrap();

    assert_eq!(outcome.node, NodeKind::ReplyToGeneralInput);
    assert_eq!(outcome.new_messages[0].text(), "Happy to help anyway.");
    assert!(session.thread().artifact.is_none());

    // A plain reply schedules no reflection; only the first-turn title runs.
    let recorded = harness.dispatcher.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].job, JobKind::ThreadTitle);
}

#[tokio::test]
async fn unknown_route_falls_back_to_reply() {
    let harness = Harness::new();
    harness
        .model
        .enqueue_tool_call("route_query", json!({ "route": "launch_rockets" }));
    harness.model.enqueue_text("Not sure what you mean.");

    let mut session = harness.session(ThreadState::default());
    let outcome = session
        .run_turn(TurnRequest::message(Message::human("hm")))
        .await
        .unwrap();

    assert_eq!(outcome.node, NodeKind::ReplyToGeneralInput);
}

#[tokio::test]
async fn highlighted_code_skips_the_classifier() {
    let harness = Harness::new();
    harness.model.enqueue_text("run");
    harness.model.enqueue_text("Renamed the function.");

    let thread = ThreadState {
        artifact: Some(Artifact::new_code(
            "Entry point",
            ProgrammingLanguage::Rust,
            "fn main() {}",
        )),
        ..ThreadState::default()
    };
    let mut session = harness.session(thread);

    let request = TurnRequest {
        messages: vec![Message::human("rename this to run")],
        highlighted_code: Some(CodeHighlight {
            start_char_index: 3,
            end_char_index: 7,
        }),
        ..TurnRequest::default()
    };
    let outcome = session.run_turn(request).await.unwrap();

    assert_eq!(outcome.node, NodeKind::UpdateArtifact);
    // Two calls only: the edit itself and the follow-up. No routing call.
    assert_eq!(harness.model.tracked_inputs().len(), 2);

    let artifact = session.thread().artifact.as_ref().unwrap();
    assert_eq!(artifact.current_index, 2);
    assert_eq!(artifact.contents.len(), 2);
    assert_eq!(artifact.current_content().unwrap().text(), "fn run() {}");
    // The first version is untouched.
    assert_eq!(artifact.contents[0].text(), "fn main() {}");
}

#[tokio::test]
async fn document_attachments_move_to_a_hidden_context_message() {
    let harness = Harness::new();
    harness
        .model
        .enqueue_tool_call("route_query", json!({ "route": "reply_to_general_input" }));
    harness.model.enqueue_text("Summarized.");

    let mut session = harness.session(ThreadState::default());
    let message = Message {
        role: MessageRole::Human,
        content: MessageContent::Parts(vec![
            ContentPart::Text {
                text: "summarize the attached notes".to_string(),
            },
            ContentPart::Document {
                name: "notes.txt".to_string(),
                text: "meeting notes body".to_string(),
            },
        ]),
        id: None,
        hidden: false,
        summary: false,
    };
    session
        .run_turn(TurnRequest::message(message))
        .await
        .unwrap();

    let ledger = &session.thread().ledger;
    // Visible copy keeps only the text part.
    assert_eq!(
        ledger.visible[0].content,
        MessageContent::Parts(vec![ContentPart::Text {
            text: "summarize the attached notes".to_string(),
        }])
    );
    // Context gets a hidden human message carrying the document, placed
    // before the user's message.
    assert_eq!(ledger.context.len(), 3);
    assert!(ledger.context[0].hidden);
    assert_eq!(
        ledger.context[0].content,
        MessageContent::Parts(vec![ContentPart::Document {
            name: "notes.txt".to_string(),
            text: "meeting notes body".to_string(),
        }])
    );
    assert_eq!(ledger.context[1].text(), "summarize the attached notes");
}

#[tokio::test]
async fn url_contents_are_inlined_into_the_context_copy() {
    let harness = Harness::new();
    harness
        .model
        .enqueue_tool_call("include_url_contents", json!({ "should_include": true }));
    harness
        .model
        .enqueue_tool_call("route_query", json!({ "route": "reply_to_general_input" }));
    harness.model.enqueue_text("Here is the gist of that page.");

    let mut session = harness
        .params()
        .url_fetcher(Arc::new(StaticUrlFetcher {
            contents: "PAGE BODY".to_string(),
        }))
        .build()
        .session(ThreadState::default());

    session
        .run_turn(TurnRequest::message(Message::human(
            "what does https://example.com/post say?",
        )))
        .await
        .unwrap();

    let ledger = &session.thread().ledger;
    let context_text = ledger.context[0].text();
    assert!(context_text.contains("<page-contents url=\"https://example.com/post\">"));
    assert!(context_text.contains("PAGE BODY"));
    // The visible copy keeps the raw URL.
    assert_eq!(
        ledger.visible[0].text(),
        "what does https://example.com/post say?"
    );
    assert_eq!(harness.model.tracked_inputs().len(), 3);
}

#[tokio::test]
async fn declined_url_inclusion_leaves_the_message_alone() {
    let harness = Harness::new();
    harness
        .model
        .enqueue_tool_call("include_url_contents", json!({ "should_include": false }));
    harness
        .model
        .enqueue_tool_call("route_query", json!({ "route": "reply_to_general_input" }));
    harness.model.enqueue_text("That's a link to a blog.");

    let mut session = harness
        .params()
        .url_fetcher(Arc::new(StaticUrlFetcher {
            contents: "PAGE BODY".to_string(),
        }))
        .build()
        .session(ThreadState::default());

    session
        .run_turn(TurnRequest::message(Message::human(
            "have you seen https://example.com/post before?",
        )))
        .await
        .unwrap();

    let ledger = &session.thread().ledger;
    assert!(!ledger.context[0].text().contains("page-contents"));
    assert_eq!(ledger.context[0].text(), ledger.visible[0].text());
}
