//! Behavior tests for the preview-side agent: embeddedness gating,
//! selection exclusivity, content updates, and inline editing.

use sitecanvas_agent::{
    AgentHost, ClickOutcome, DomNode, KeyPress, PreviewAgent, PreviewDocument, EDITABLE_ATTR,
    INTERACTIVE_ATTR, SELECTED_ATTR,
};
use sitecanvas_common::ContentValue;
use sitecanvas_protocol::{EditorMessage, Envelope, PreviewMessage, PreviewMessageKind, Rect};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct RecordingHost {
    sent: Arc<Mutex<Vec<Envelope<PreviewMessage>>>>,
}

impl AgentHost for RecordingHost {
    fn post(&self, message: Envelope<PreviewMessage>) {
        self.sent.lock().unwrap().push(message);
    }
}

impl RecordingHost {
    fn messages(&self) -> Vec<PreviewMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    fn kinds(&self) -> Vec<PreviewMessageKind> {
        self.messages().iter().map(|m| m.kind()).collect()
    }

    fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

fn sample_document(embedded: bool) -> PreviewDocument {
    let root = DomNode::element("body")
        .with_child(
            DomNode::element("h1")
                .with_block_id("home.headline")
                .with_attr("id", "headline")
                .with_rect(Rect::new(10.0, 20.0, 300.0, 40.0))
                .with_child(DomNode::text("Hello")),
        )
        .with_child(
            DomNode::element("p")
                .with_block_id("home.subtitle")
                .with_child(DomNode::text("Sub")),
        )
        .with_child(
            DomNode::element("img")
                .with_block_id("home.hero")
                .with_attr("src", "/img/hero.jpg")
                .with_attr("alt", "Hero"),
        );
    PreviewDocument::new(root, embedded)
}

fn ready_agent(host: &RecordingHost) -> PreviewAgent {
    let mut agent = PreviewAgent::attach(sample_document(true), Box::new(host.clone()));
    agent.handle_message(Envelope::new(EditorMessage::EditorReady {
        site_id: "site-1".into(),
    }));
    host.clear();
    agent
}

#[test]
fn test_embedded_agent_announces_ready() {
    let host = RecordingHost::default();
    let agent = PreviewAgent::attach(sample_document(true), Box::new(host.clone()));
    assert!(agent.is_active());
    assert_eq!(host.kinds(), vec![PreviewMessageKind::IframeReady]);
}

#[test]
fn test_non_embedded_agent_is_inert() {
    let host = RecordingHost::default();
    let mut agent = PreviewAgent::attach(sample_document(false), Box::new(host.clone()));
    assert!(!agent.is_active());

    agent.handle_message(Envelope::new(EditorMessage::EditorReady {
        site_id: "site-1".into(),
    }));
    agent.handle_message(Envelope::new(EditorMessage::UpdateContent {
        element_id: "home.headline".into(),
        content: ContentValue::Text("X".into()),
    }));
    assert_eq!(agent.handle_click(Some("home.headline")), ClickOutcome::Default);

    // No announcements, no reports, no DOM effects.
    assert!(host.messages().is_empty());
    assert_eq!(
        agent
            .document()
            .find_block("home.headline")
            .unwrap()
            .text_content(),
        "Hello"
    );
}

#[test]
fn test_editor_ready_marks_blocks_interactive_once() {
    let host = RecordingHost::default();
    let mut agent = PreviewAgent::attach(sample_document(true), Box::new(host.clone()));

    agent.handle_message(Envelope::new(EditorMessage::EditorReady {
        site_id: "site-1".into(),
    }));
    let marked = agent.document().blocks_with_attr(INTERACTIVE_ATTR);
    assert_eq!(marked.len(), 3);

    // Second EDITOR_READY does not re-run the pass (idempotent anyway).
    agent.handle_message(Envelope::new(EditorMessage::EditorReady {
        site_id: "site-1".into(),
    }));
    assert_eq!(agent.document().blocks_with_attr(INTERACTIVE_ATTR).len(), 3);
}

#[test]
fn test_update_content_text_mutates_only_target_and_reports_once() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::UpdateContent {
        element_id: "home.headline".into(),
        content: ContentValue::Text("Goodbye".into()),
    }));

    let doc = agent.document();
    assert_eq!(
        doc.find_block("home.headline").unwrap().text_content(),
        "Goodbye"
    );
    assert_eq!(doc.find_block("home.subtitle").unwrap().text_content(), "Sub");

    let messages = host.messages();
    assert_eq!(messages.len(), 1);
    match &messages[0] {
        PreviewMessage::ContentChanged {
            element_id,
            content,
            previous,
            ..
        } => {
            assert_eq!(element_id, "home.headline");
            assert_eq!(content, &ContentValue::Text("Goodbye".into()));
            assert_eq!(previous, &Some(ContentValue::Text("Hello".into())));
        }
        other => panic!("expected ContentChanged, got {:?}", other),
    }
}

#[test]
fn test_update_content_image_swaps_src() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::UpdateContent {
        element_id: "home.hero".into(),
        content: ContentValue::Text("/img/new.jpg".into()),
    }));

    let hero = agent.document().find_block("home.hero").unwrap();
    assert_eq!(hero.attr("src"), Some("/img/new.jpg"));
    assert_eq!(hero.attr("alt"), Some("Hero"));
    assert_eq!(host.kinds(), vec![PreviewMessageKind::ContentChanged]);
}

#[test]
fn test_update_content_unknown_block_reports_error() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::UpdateContent {
        element_id: "home.missing".into(),
        content: ContentValue::Text("X".into()),
    }));
    assert_eq!(host.kinds(), vec![PreviewMessageKind::Error]);
}

#[test]
fn test_selection_marker_is_exclusive() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::SelectElement {
        selector: "#headline".into(),
    }));
    assert_eq!(agent.selected(), Some("home.headline"));
    assert_eq!(
        agent.document().blocks_with_attr(SELECTED_ATTR),
        vec!["home.headline".to_string()]
    );

    agent.handle_message(Envelope::new(EditorMessage::SelectElement {
        selector: "img".into(),
    }));
    assert_eq!(agent.selected(), Some("home.hero"));
    // Exactly one marked element, and it is the new one.
    assert_eq!(
        agent.document().blocks_with_attr(SELECTED_ATTR),
        vec!["home.hero".to_string()]
    );

    assert_eq!(
        host.kinds(),
        vec![
            PreviewMessageKind::ElementSelected,
            PreviewMessageKind::ElementSelected
        ]
    );
}

#[test]
fn test_select_element_reports_descriptor() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::SelectElement {
        selector: "#headline".into(),
    }));

    match &host.messages()[0] {
        PreviewMessage::ElementSelected(descriptor) => {
            assert_eq!(descriptor.element_id, "home.headline");
            assert_eq!(descriptor.tag, "h1");
            assert_eq!(descriptor.text, "Hello");
            assert_eq!(descriptor.attributes.id.as_deref(), Some("headline"));
            assert_eq!(descriptor.rect, Rect::new(10.0, 20.0, 300.0, 40.0));
        }
        other => panic!("expected ElementSelected, got {:?}", other),
    }
}

#[test]
fn test_click_selects_and_suppresses_default() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    let outcome = agent.handle_click(Some("home.headline"));
    assert_eq!(outcome, ClickOutcome::Suppress);
    assert_eq!(agent.selected(), Some("home.headline"));
    assert_eq!(host.kinds(), vec![PreviewMessageKind::ElementClicked]);
}

#[test]
fn test_background_click_deselects() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_click(Some("home.headline"));
    host.clear();

    let outcome = agent.handle_click(None);
    assert_eq!(outcome, ClickOutcome::Default);
    assert_eq!(agent.selected(), None);
    assert!(agent.document().blocks_with_attr(SELECTED_ATTR).is_empty());
    assert_eq!(host.kinds(), vec![PreviewMessageKind::ElementDeselected]);
}

#[test]
fn test_click_before_interactive_marking_is_default() {
    let host = RecordingHost::default();
    // No EDITOR_READY yet, so nothing has been marked interactive.
    let mut agent = PreviewAgent::attach(sample_document(true), Box::new(host.clone()));
    host.clear();

    let outcome = agent.handle_click(Some("home.headline"));
    assert_eq!(outcome, ClickOutcome::Default);
    assert_eq!(agent.selected(), None);
}

#[test]
fn test_inline_edit_commit_on_enter() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::EnterEditMode {
        element_id: "home.headline".into(),
    }));
    assert!(agent.is_editing());
    assert!(agent
        .document()
        .find_block("home.headline")
        .unwrap()
        .attr(EDITABLE_ATTR)
        .is_some());

    agent.input_text("Hello there");
    let outcome = agent.handle_key(KeyPress::enter());
    assert_eq!(outcome, ClickOutcome::Suppress);
    assert!(!agent.is_editing());
    assert!(agent
        .document()
        .find_block("home.headline")
        .unwrap()
        .attr(EDITABLE_ATTR)
        .is_none());

    match host.messages().last().unwrap() {
        PreviewMessage::ContentChanged {
            element_id,
            content,
            previous,
            ..
        } => {
            assert_eq!(element_id, "home.headline");
            assert_eq!(content, &ContentValue::Text("Hello there".into()));
            assert_eq!(previous, &Some(ContentValue::Text("Hello".into())));
        }
        other => panic!("expected ContentChanged, got {:?}", other),
    }
}

#[test]
fn test_enter_with_modifier_does_not_commit() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::EnterEditMode {
        element_id: "home.headline".into(),
    }));
    let outcome = agent.handle_key(KeyPress::enter_with_modifier());
    assert_eq!(outcome, ClickOutcome::Default);
    assert!(agent.is_editing());
}

#[test]
fn test_inline_edit_commit_on_blur() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::EnterEditMode {
        element_id: "home.headline".into(),
    }));
    agent.input_text("Edited");
    host.clear();

    agent.handle_blur();
    assert!(!agent.is_editing());
    assert_eq!(host.kinds(), vec![PreviewMessageKind::ContentChanged]);
}

#[test]
fn test_exit_edit_mode_force_commits() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::EnterEditMode {
        element_id: "home.headline".into(),
    }));
    agent.input_text("Forced");
    host.clear();

    agent.handle_message(Envelope::new(EditorMessage::ExitEditMode {
        element_id: "home.headline".into(),
    }));
    assert!(!agent.is_editing());
    match host.messages().last().unwrap() {
        PreviewMessage::ContentChanged { content, .. } => {
            assert_eq!(content, &ContentValue::Text("Forced".into()));
        }
        other => panic!("expected ContentChanged, got {:?}", other),
    }
}

#[test]
fn test_unmatched_selector_reports_error() {
    let host = RecordingHost::default();
    let mut agent = ready_agent(&host);

    agent.handle_message(Envelope::new(EditorMessage::SelectElement {
        selector: "#nope".into(),
    }));
    assert_eq!(host.kinds(), vec![PreviewMessageKind::Error]);
    assert_eq!(agent.selected(), None);
}
