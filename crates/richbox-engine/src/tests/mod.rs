//! Shared test helpers and cross-module checks.
//!
//! `RecordingHost` stands in for the toolbar and dialogs; the exhaustive
//! range tests below run every command over every range of a small
//! formatted region.

use std::collections::{HashMap, VecDeque};

use crate::editing::{Applied, Color, FormatCommand, RangeFormatter, ToggleState, TypingStyle};
use crate::host::{Control, HostUi, Notice};
use crate::tree::{Content, ContentTree, Element, NodeId, TextRange, invariants};
use crate::{Editor, EditorOptions};

/// Host fake that records everything the editor tells it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub notices: Vec<Notice>,
    /// Answers for successive URL prompts; empty means cancelled
    pub urls: VecDeque<String>,
    pub controls: HashMap<Control, bool>,
    pub shown_colors: Vec<String>,
    pub resets: usize,
}

impl HostUi for RecordingHost {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn prompt_url(&mut self) -> Option<String> {
        self.urls.pop_front()
    }

    fn set_control_active(&mut self, control: Control, active: bool) {
        self.controls.insert(control, active);
    }

    fn show_text_color(&mut self, color: &Color) {
        self.shown_colors.push(color.to_string());
    }

    fn reset_controls(&mut self) {
        self.controls.clear();
        self.resets += 1;
    }
}

pub fn editor_with_text(text: &str) -> Editor<RecordingHost> {
    Editor::new(RecordingHost::default(), EditorOptions::default()).with_content(Content::from_text(text))
}

/// Wrap `start..end` of `container` in a span with one declaration.
pub fn style_range(
    content: &mut Content,
    container: NodeId,
    start: usize,
    end: usize,
    property: &str,
    value: &str,
) -> NodeId {
    let extracted = content
        .extract(&TextRange::new(container, start, end))
        .unwrap();
    let span = content.wrap(extracted.fragment, Element::styled_span(property, value));
    content.insert(span, extracted.at).unwrap();
    span
}

/// "a<b>bc<i>d</i></b>ef" in markup terms.
fn nested_sample() -> Content {
    let mut content = Content::from_text("abcdef");
    let root = content.root();
    let bold = style_range(&mut content, root, 1, 4, "font-weight", "bold");
    style_range(&mut content, bold, 2, 3, "font-style", "italic");
    content
}

fn count_elements(content: &Content) -> usize {
    content.elements_post_order().len()
}

// ============ Exhaustive range checks ============

#[test]
fn test_every_range_keeps_text_and_adds_one_wrapper() {
    let commands = [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::TextColor(Color::black()),
        FormatCommand::BackgroundColor("yellow".parse().unwrap()),
    ];
    let sample = nested_sample();
    let root = sample.root();
    let len = sample.text_len(root);

    for command in &commands {
        for start in 0..len {
            for end in start + 1..=len {
                let mut content = sample.clone();
                let range = TextRange::new(root, start, end);
                let toggles = ToggleState::derive(&content, Some(&range), &TypingStyle::default());
                let before = count_elements(&content);

                let applied = RangeFormatter::default()
                    .apply(
                        &mut content,
                        Some(&range),
                        command,
                        toggles,
                        &mut TypingStyle::default(),
                        || None,
                    )
                    .unwrap();

                let Applied::Wrapped { wrapper, selection } = applied else {
                    panic!("{command:?} {start}..{end} gave {applied:?}");
                };
                assert_eq!(content.text_content(root), "abcdef", "{command:?} {start}..{end}");
                assert_eq!(
                    content.text_content(wrapper),
                    sample.range_text(&range),
                    "{command:?} {start}..{end}"
                );
                assert_eq!(content.parent(wrapper), Some(root), "{command:?} {start}..{end}");
                assert_eq!(selection, TextRange::new(wrapper, 0, end - start));
                assert!(
                    count_elements(&content) > before,
                    "{command:?} {start}..{end} added no wrapper"
                );
                invariants::check(&content);
            }
        }
    }
}

#[test]
fn test_every_collapsed_toggle_leaves_tree_unchanged() {
    let sample = nested_sample();
    let root = sample.root();

    for offset in 0..=sample.text_len(root) {
        for command in [FormatCommand::Bold, FormatCommand::Italic] {
            let mut content = sample.clone();
            let caret = TextRange::caret(root, offset);
            let toggles = ToggleState::derive(&content, Some(&caret), &TypingStyle::default());

            RangeFormatter::default()
                .apply(
                    &mut content,
                    Some(&caret),
                    &command,
                    toggles,
                    &mut TypingStyle::default(),
                    || None,
                )
                .unwrap();

            assert_eq!(content, sample, "{command:?} at {offset}");
        }
    }
}

#[test]
fn test_recording_host_pops_urls_in_order() {
    let mut host = RecordingHost::default();
    host.urls.extend(["a.example".to_string(), "b.example".to_string()]);

    assert_eq!(host.prompt_url().as_deref(), Some("a.example"));
    assert_eq!(host.prompt_url().as_deref(), Some("b.example"));
    assert_eq!(host.prompt_url(), None);
}
