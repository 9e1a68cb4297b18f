use canvas_agent::{
    remove_code_fence, Artifact, ArtifactContent, CodeHighlight, ContentPart, Message,
    MessageContent, MessageLedger, ProgrammingLanguage, TextThemeOptions, TurnIntent, TurnRequest,
};

#[test]
fn new_artifact_starts_at_index_one() {
    let artifact = Artifact::new_code("Fibonacci", ProgrammingLanguage::Python, "def fib(n): ...");
    assert_eq!(artifact.current_index, 1);
    assert_eq!(artifact.contents.len(), 1);

    let content = artifact.current_content().unwrap();
    assert_eq!(content.index(), 1);
    assert_eq!(content.title(), "Fibonacci");
    assert!(content.is_code());
}

#[test]
fn append_advances_current_index_and_keeps_history() {
    let mut artifact = Artifact::new_markdown("Essay", "first draft");
    let before = artifact.contents.clone();

    artifact.append_markdown("Essay", "second draft");

    assert_eq!(artifact.current_index, 2);
    assert_eq!(artifact.contents.len(), 2);
    // Earlier snapshots are a strict prefix of the new history.
    assert_eq!(&artifact.contents[..1], &before[..]);
    assert_eq!(artifact.current_content().unwrap().text(), "second draft");
}

#[test]
fn append_can_switch_variant() {
    let mut artifact = Artifact::new_markdown("Notes", "a plan");
    artifact.append_code("Notes", ProgrammingLanguage::Rust, "fn main() {}");

    let content = artifact.current_content().unwrap();
    assert!(content.is_code());
    assert_eq!(content.language(), Some(ProgrammingLanguage::Rust));
    assert!(artifact.contents[0].is_markdown());
}

#[test]
fn current_content_falls_back_to_last_snapshot() {
    let mut artifact = Artifact::new_markdown("Essay", "v1");
    artifact.append_markdown("Essay", "v2");
    artifact.current_index = 99;

    assert_eq!(artifact.current_content().unwrap().text(), "v2");
}

#[test]
fn current_content_of_empty_history_is_none() {
    let artifact = Artifact {
        current_index: 1,
        contents: Vec::new(),
    };
    assert!(artifact.current_content().is_none());
}

#[test]
fn code_fence_is_stripped_with_language_tag() {
    assert_eq!(
        remove_code_fence("```python\ndef fib(n): ...\n```"),
        "def fib(n): ..."
    );
    assert_eq!(
        remove_code_fence("  ```\nlet x = 1;\n```  "),
        "let x = 1;"
    );
}

#[test]
fn unfenced_text_passes_through_unchanged() {
    assert_eq!(remove_code_fence("def fib(n): ..."), "def fib(n): ...");
    // An opening fence without a closing one is left alone.
    assert_eq!(remove_code_fence("```python\ndef fib(n):"), "```python\ndef fib(n):");
}

#[test]
fn one_line_fence_is_not_stripped() {
    // No newline after the opening fence; stripping would drop the body.
    assert_eq!(remove_code_fence("```x = 1```"), "```x = 1```");
    assert_eq!(remove_code_fence("``````"), "``````");
}

#[test]
fn highlighted_code_wins_over_every_other_flag() {
    let request = TurnRequest {
        messages: vec![Message::human("fix this")],
        highlighted_code: Some(CodeHighlight {
            start_char_index: 0,
            end_char_index: 4,
        }),
        fix_bugs: true,
        regenerate_with_emojis: true,
        custom_action_id: Some("tighten".to_string()),
        web_search_enabled: true,
        ..TurnRequest::default()
    };
    assert!(matches!(
        request.intent(),
        TurnIntent::EditHighlightedCode(_)
    ));
}

#[test]
fn text_theme_wins_over_code_theme_and_search() {
    let request = TurnRequest {
        regenerate_with_emojis: true,
        add_comments: true,
        web_search_enabled: true,
        ..TurnRequest::default()
    };
    let TurnIntent::TextTheme(options) = request.intent() else {
        panic!("expected a text theme intent");
    };
    assert_eq!(
        options,
        TextThemeOptions {
            add_emojis: true,
            ..TextThemeOptions::default()
        }
    );
}

#[test]
fn no_flags_means_conversation() {
    let request = TurnRequest::message(Message::human("hello"));
    assert_eq!(request.intent(), TurnIntent::Conversation);
}

#[test]
fn char_len_counts_text_parts_only() {
    let message = Message {
        role: canvas_agent::MessageRole::Human,
        content: MessageContent::Parts(vec![
            ContentPart::Text {
                text: "héllo".to_string(),
            },
            ContentPart::Document {
                name: "notes.txt".to_string(),
                text: "a very long attachment".to_string(),
            },
        ]),
        id: None,
        hidden: false,
        summary: false,
    };
    assert_eq!(message.char_len(), 5);
    assert_eq!(message.text(), "héllo");
}

#[test]
fn condense_replaces_prefix_with_summary() {
    let mut ledger = MessageLedger::default();
    for i in 0..12 {
        ledger.push_both(Message::human(format!("message {i}")));
    }

    ledger.condense(Message::conversation_summary("earlier talk"), 10);

    assert_eq!(ledger.context.len(), 11);
    assert!(ledger.context[0].summary);
    assert_eq!(ledger.context[1].text(), "message 2");
    // The visible log is never condensed.
    assert_eq!(ledger.visible.len(), 12);
}

#[test]
fn condense_is_a_noop_on_short_logs() {
    let mut ledger = MessageLedger::default();
    ledger.push_both(Message::human("hi"));
    ledger.condense(Message::conversation_summary("s"), 10);
    assert_eq!(ledger.context.len(), 1);
    assert!(!ledger.context[0].summary);
}

#[test]
fn recent_human_counts_summary_messages() {
    let mut ledger = MessageLedger::default();
    ledger.push_both(Message::human("hi"));
    ledger.push_both(Message::ai("hello"));
    ledger.push_context(Message::conversation_summary("earlier talk"));

    assert_eq!(ledger.recent_human().unwrap().text(), "earlier talk");
}

#[test]
fn artifact_survives_a_serde_round_trip() {
    let mut artifact = Artifact::new_markdown("Essay", "v1");
    artifact.append_code("Essay", ProgrammingLanguage::Typescript, "let x = 1;");

    let value = serde_json::to_value(&artifact).unwrap();
    assert_eq!(value["contents"][0]["type"], "text");
    assert_eq!(value["contents"][1]["type"], "code");
    assert_eq!(value["contents"][1]["language"], "typescript");

    let back: Artifact = serde_json::from_value(value).unwrap();
    assert_eq!(back, artifact);
}

#[test]
fn markdown_content_uses_the_text_tag() {
    let content: ArtifactContent = serde_json::from_value(serde_json::json!({
        "type": "text",
        "index": 1,
        "title": "Essay",
        "full_markdown": "body"
    }))
    .unwrap();
    assert!(content.is_markdown());
}
