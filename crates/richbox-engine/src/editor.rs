use log::{debug, warn};

use crate::editing::{
    Applied, Color, FormatCommand, LengthCheck, LengthGuard, MarkupNormalizer, RangeFormatter,
    SelectionTracker, ToggleState, TypingStyle,
};
use crate::error::FormatError;
use crate::host::{Control, HostUi, Notice};
use crate::resize::{Point, ResizeBounds, ResizeController, Size};
use crate::tree::{Content, ContentTree, StyleMap, Tag, TextRange};

/// Settings an [`Editor`] is built with.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    pub max_chars: usize,
    pub bounds: ResizeBounds,
    pub link_scheme: String,
    pub initial_size: Size,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            max_chars: crate::editing::length_guard::DEFAULT_MAX_CHARS,
            bounds: ResizeBounds::default(),
            link_scheme: "https://".to_string(),
            initial_size: Size::new(400.0, 200.0),
        }
    }
}

/// One editable region with its toolbar state.
///
/// The host forwards its events here (selection changes, pointer and key
/// releases, focus changes, typed text, toolbar commands, resize drags) and
/// reads back markup, styles and control states. Everything runs on the
/// caller's thread; nothing is shared.
pub struct Editor<H: HostUi> {
    content: Content,
    /// Live selection, as the host last reported it
    selection: Option<TextRange>,
    tracker: SelectionTracker,
    typing: TypingStyle,
    toggles: ToggleState,
    selected_color: Color,
    resize: ResizeController,
    size: Size,
    length_guard: LengthGuard,
    formatter: RangeFormatter,
    normalizer: MarkupNormalizer,
    focused: bool,
    host: H,
}

impl<H: HostUi> Editor<H> {
    pub fn new(host: H, options: EditorOptions) -> Self {
        Self {
            content: Content::new(),
            selection: None,
            tracker: SelectionTracker::new(),
            typing: TypingStyle::default(),
            toggles: ToggleState::default(),
            selected_color: Color::black(),
            resize: ResizeController::new(options.bounds),
            size: options.initial_size,
            length_guard: LengthGuard::new(options.max_chars),
            formatter: RangeFormatter::new(options.link_scheme),
            normalizer: MarkupNormalizer,
            focused: false,
            host,
        }
    }

    /// Start from existing content instead of an empty region.
    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self.selection = None;
        self.tracker.clear();
        self
    }

    // ============ Selection ============

    /// Select characters `start..end` of the whole region.
    ///
    /// Offsets are clamped to the text length. Moving the cursor drops any
    /// pending typing style.
    pub fn select(&mut self, start: usize, end: usize) {
        let root = self.content.root();
        let range = TextRange::new(root, start, end).clamped(self.content.text_len(root));
        self.select_range(range);
    }

    pub fn select_range(&mut self, range: TextRange) {
        if self.selection != Some(range) {
            self.typing.clear();
        }
        self.selection = Some(range);
    }

    /// The live selection went away, e.g. a toolbar control took focus.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn on_pointer_up(&mut self) {
        self.capture_selection();
    }

    pub fn on_key_up(&mut self) {
        self.capture_selection();
    }

    fn capture_selection(&mut self) {
        self.tracker.capture(self.selection.as_ref());
        let selection = self.selection;
        self.refresh_toggles(selection.as_ref());
    }

    fn refresh_toggles(&mut self, selection: Option<&TextRange>) {
        let toggles = ToggleState::derive(&self.content, selection, &self.typing);
        if toggles != self.toggles {
            debug!("Toggle state changed to {toggles:?}");
        }
        self.toggles = toggles;
        self.host.set_control_active(Control::Bold, toggles.bold);
        self.host.set_control_active(Control::Italic, toggles.italic);
    }

    // ============ Focus ============

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// The region lost focus: drop wrappers left without visible text.
    /// Returns how many were removed.
    pub fn on_blur(&mut self) -> usize {
        self.focused = false;
        let removed = self.normalizer.normalize(&mut self.content);
        if let Some(range) = self.selection
            && !self.content.is_attached(range.container)
        {
            self.selection = None;
        }
        removed
    }

    /// The whole window lost focus. An unfinished resize drag is abandoned
    /// and the container goes back to its size at drag start.
    pub fn on_window_blur(&mut self) {
        if let Some(size) = self.resize.cancel() {
            debug!("Resize cancelled, restoring {size:?}");
            self.size = size;
        }
    }

    // ============ Content ============

    /// Type `text` at the live selection, replacing selected text.
    ///
    /// Text typed at a cursor with a pending typing style goes into a new
    /// span carrying that style. The style is then used up: later text at
    /// the caret joins that span. The length limit is enforced afterwards.
    pub fn insert_text(&mut self, text: &str) -> Result<LengthCheck, FormatError> {
        self.focused = true;
        let root = self.content.root();
        let end = self.content.text_len(root);
        let range = self
            .selection
            .filter(|range| self.content.is_attached(range.container))
            .unwrap_or_else(|| TextRange::caret(root, end));
        let range = range.clamped(self.content.text_len(range.container));

        if !range.is_collapsed() {
            let extracted = self.content.extract(&range)?;
            self.content.discard(extracted.fragment);
        }
        let wrapper = self.typing.wrapper();
        let wrapped = wrapper.is_some() && !text.is_empty();
        self.content
            .insert_text(range.container, range.start, text, wrapper)?;
        if wrapped {
            self.typing.clear();
        }

        let caret = TextRange::caret(range.container, range.start + text.chars().count());
        self.selection = Some(caret);
        self.tracker.capture(Some(&caret));
        self.on_content_changed()
    }

    /// Run the length limit after any change to the content.
    ///
    /// On truncation the cursor moves to the end and the host is told.
    pub fn on_content_changed(&mut self) -> Result<LengthCheck, FormatError> {
        let check = self.length_guard.check(&mut self.content)?;
        if let LengthCheck::Truncated { .. } = check {
            let root = self.content.root();
            let caret = TextRange::caret(root, self.content.text_len(root));
            self.selection = Some(caret);
            self.tracker.capture(Some(&caret));
            self.host.notify(Notice::LengthLimitReached {
                limit: self.length_guard.max_chars(),
            });
        }
        Ok(check)
    }

    /// Empty the region and put every control back to its initial state.
    pub fn clear(&mut self) {
        debug!("Clearing editor");
        self.content.clear();
        self.selection = None;
        self.tracker.clear();
        self.typing.clear();
        self.toggles = ToggleState::default();
        self.selected_color = Color::black();
        self.host.reset_controls();
    }

    // ============ Commands ============

    /// Apply a toolbar command to the saved selection, which becomes the
    /// live selection again.
    ///
    /// Errors are dealt with before returning: a link without selected text
    /// raises a notice, a stale selection counts as no selection. The
    /// content is unchanged whenever an error is returned.
    pub fn apply(&mut self, command: FormatCommand) -> Result<Applied, FormatError> {
        debug!("Applying {command:?}");
        let selection = self.tracker.restore(&self.content);
        if selection.is_some() {
            self.selection = selection;
        }
        self.focused = true;

        let toggles = ToggleState::derive(&self.content, selection.as_ref(), &self.typing);
        let host = &mut self.host;
        let result = self.formatter.apply(
            &mut self.content,
            selection.as_ref(),
            &command,
            toggles,
            &mut self.typing,
            || host.prompt_url(),
        );

        match result {
            Ok(applied) => {
                let selection = match applied.selection() {
                    Some(updated) => {
                        self.selection = Some(updated);
                        self.tracker.capture(Some(&updated));
                        Some(updated)
                    }
                    None => selection,
                };
                if let FormatCommand::TextColor(color) = &command {
                    self.set_selected_color(color.clone());
                }
                self.refresh_toggles(selection.as_ref());
                Ok(applied)
            }
            Err(err) => {
                match &err {
                    FormatError::NoSelection => self.host.notify(Notice::LinkRequiresSelection),
                    FormatError::CancelledInput => debug!("{command:?} cancelled"),
                    other => warn!("{command:?} failed: {other}"),
                }
                Err(err)
            }
        }
    }

    /// Remember `color` as the current text color and show it on the
    /// color indicators.
    pub fn set_selected_color(&mut self, color: Color) {
        self.host.show_text_color(&color);
        self.selected_color = color;
    }

    // ============ Resize ============

    pub fn on_drag_start(&mut self, pointer: Point) {
        self.resize.on_drag_start(pointer, self.size);
    }

    pub fn on_drag_move(&mut self, pointer: Point) -> Option<Size> {
        let size = self.resize.on_drag_move(pointer)?;
        self.size = size;
        Some(size)
    }

    pub fn on_drag_end(&mut self) {
        self.resize.on_drag_end();
    }

    // ============ Queries ============

    /// Target of the link covering the character at `offset`, if any.
    pub fn link_at(&self, offset: usize) -> Option<String> {
        let root = self.content.root();
        let (leaf, _) = self.content.locate(root, offset.checked_add(1)?)?;
        let mut current = self.content.parent(leaf);
        while let Some(node) = current {
            if let Some(element) = self.content.element(node)
                && element.tag == Tag::Anchor
            {
                return element.attr("href").map(str::to_string);
            }
            current = self.content.parent(node);
        }
        None
    }

    pub fn toggles(&self) -> ToggleState {
        self.toggles
    }

    pub fn selected_color(&self) -> &Color {
        &self.selected_color
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn region_style(&self) -> &StyleMap {
        self.content.region_style()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether the container is raised above its siblings (during a drag).
    pub fn is_elevated(&self) -> bool {
        self.resize.is_active()
    }

    pub fn z_index(&self) -> Option<i32> {
        self.resize.z_index()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn to_markup(&self) -> String {
        self.content.to_markup()
    }

    pub fn plain_text(&self) -> String {
        self.content.text_content(self.content.root())
    }

    pub fn selection(&self) -> Option<&TextRange> {
        self.selection.as_ref()
    }

    pub fn typing_style(&self) -> &TypingStyle {
        &self.typing
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{RecordingHost, editor_with_text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_uses_saved_selection_after_focus_loss() {
        // Given a selection captured on pointer up
        let mut editor = editor_with_text("say hello world");
        editor.select(4, 9);
        editor.on_pointer_up();

        // When a toolbar control steals the live selection
        editor.clear_selection();
        editor.apply(FormatCommand::Italic).unwrap();

        // Then the saved range is formatted
        assert_eq!(
            editor.to_markup(),
            "say <span style=\"font-style: italic\">hello</span> world"
        );
        assert!(editor.is_focused());
    }

    #[test]
    fn test_toggles_follow_selection() {
        let mut editor = editor_with_text("say hello world");
        editor.select(4, 9);
        editor.on_pointer_up();
        editor.apply(FormatCommand::Bold).unwrap();
        assert!(editor.toggles().bold);
        assert_eq!(
            editor.host().controls.get(&Control::Bold).copied(),
            Some(true)
        );

        editor.select(0, 3);
        editor.on_pointer_up();

        assert!(!editor.toggles().bold);
        assert_eq!(
            editor.host().controls.get(&Control::Bold).copied(),
            Some(false)
        );
    }

    #[test]
    fn test_text_color_updates_indicators() {
        let mut editor = editor_with_text("hello");
        editor.select(0, 5);
        editor.on_pointer_up();

        editor
            .apply(FormatCommand::TextColor("#336699".parse().unwrap()))
            .unwrap();

        assert_eq!(editor.selected_color().as_str(), "#336699");
        assert_eq!(editor.host().shown_colors, vec!["#336699".to_string()]);
    }

    #[test]
    fn test_typing_after_collapsed_bold_is_bold() {
        let mut editor = editor_with_text("ab");
        editor.select(1, 1);
        editor.on_key_up();

        editor.apply(FormatCommand::Bold).unwrap();
        editor.insert_text("X").unwrap();

        assert_eq!(
            editor.to_markup(),
            "a<span style=\"font-weight: bold\">X</span>b"
        );
        assert_eq!(editor.plain_text(), "aXb");
    }

    #[test]
    fn test_collapsed_bold_types_at_saved_cursor_after_focus_loss() {
        // Given a cursor captured on key up
        let mut editor = editor_with_text("ab");
        editor.select(1, 1);
        editor.on_key_up();

        // When the toolbar takes the live selection before Bold runs
        editor.clear_selection();
        editor.apply(FormatCommand::Bold).unwrap();
        editor.insert_text("X").unwrap();

        // Then the text lands at the saved cursor
        assert_eq!(editor.plain_text(), "aXb");
        assert_eq!(
            editor.to_markup(),
            "a<span style=\"font-weight: bold\">X</span>b"
        );
    }

    #[test]
    fn test_keystrokes_after_collapsed_bold_share_one_span() {
        let mut editor = editor_with_text("ab");
        editor.select(1, 1);
        editor.on_key_up();
        editor.apply(FormatCommand::Bold).unwrap();

        for key in ["X", "Y", "Z"] {
            editor.insert_text(key).unwrap();
        }
        editor.on_key_up();

        assert_eq!(
            editor.to_markup(),
            "a<span style=\"font-weight: bold\">XYZ</span>b"
        );
        assert!(editor.typing_style().is_empty());
        assert!(editor.toggles().bold);
    }

    #[test]
    fn test_typing_replaces_selected_text() {
        let mut editor = editor_with_text("say hello world");
        editor.select(4, 9);

        editor.insert_text("bye").unwrap();

        assert_eq!(editor.plain_text(), "say bye world");
        assert_eq!(editor.selection(), Some(&TextRange::caret(editor.content().root(), 7)));
    }

    #[test]
    fn test_moving_cursor_drops_typing_style() {
        let mut editor = editor_with_text("abc");
        editor.select(1, 1);
        editor.on_key_up();
        editor.apply(FormatCommand::Bold).unwrap();
        assert!(!editor.typing_style().is_empty());

        editor.select(2, 2);

        assert!(editor.typing_style().is_empty());
    }

    #[test]
    fn test_blur_removes_empty_wrappers() {
        let mut editor = editor_with_text("abc");
        editor.select(1, 2);
        editor.on_pointer_up();
        let Applied::Wrapped { wrapper, .. } = editor.apply(FormatCommand::Bold).unwrap() else {
            panic!("expected a wrapper");
        };
        // Deleting the wrapped character leaves the wrapper empty
        editor.select_range(TextRange::new(wrapper, 0, 1));
        editor.insert_text("").unwrap();
        assert_eq!(editor.to_markup(), "a<span style=\"font-weight: bold\"></span>c");

        let removed = editor.on_blur();

        assert_eq!(removed, 1);
        assert_eq!(editor.to_markup(), "ac");
        assert_eq!(editor.selection(), None);
        assert!(!editor.is_focused());
    }

    #[test]
    fn test_window_blur_cancels_resize() {
        let mut editor = Editor::new(RecordingHost::default(), EditorOptions::default());
        editor.on_drag_start(Point::new(0.0, 0.0));
        editor.on_drag_move(Point::new(100.0, 100.0));
        assert!(editor.is_elevated());
        assert_eq!(editor.size(), Size::new(500.0, 300.0));

        editor.on_window_blur();

        assert!(!editor.is_elevated());
        assert_eq!(editor.size(), Size::new(400.0, 200.0));
    }

    #[test]
    fn test_drag_end_keeps_new_size() {
        let mut editor = Editor::new(RecordingHost::default(), EditorOptions::default());
        editor.on_drag_start(Point::new(0.0, 0.0));
        editor.on_drag_move(Point::new(-50.0, 10.0));
        editor.on_drag_end();

        editor.on_window_blur();

        assert_eq!(editor.size(), Size::new(350.0, 210.0));
        assert_eq!(editor.z_index(), None);
    }

    #[test]
    fn test_link_at_end_of_offsets_is_none() {
        let editor = editor_with_text("hello");

        assert_eq!(editor.link_at(usize::MAX), None);
    }

    #[test]
    fn test_clear_does_not_hand_out_old_ids() {
        let mut editor = editor_with_text("hello");
        editor.select(0, 5);
        editor.on_pointer_up();
        let Applied::Wrapped { wrapper, .. } = editor.apply(FormatCommand::Bold).unwrap() else {
            panic!("expected a wrapper");
        };

        editor.clear();
        editor.apply(FormatCommand::Bold).unwrap();
        editor.insert_text("new").unwrap();

        assert_eq!(
            editor.to_markup(),
            "<span style=\"font-weight: bold\">new</span>"
        );
        assert!(!editor.content().is_attached(wrapper));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut editor = editor_with_text("hello");
        editor.select(0, 5);
        editor.on_pointer_up();
        editor.apply(FormatCommand::Bold).unwrap();
        editor
            .apply(FormatCommand::BorderColor("red".parse().unwrap()))
            .unwrap();

        editor.clear();

        assert_eq!(editor.to_markup(), "");
        assert!(editor.region_style().is_empty());
        assert_eq!(editor.toggles(), ToggleState::default());
        assert_eq!(editor.selected_color(), &Color::black());
        assert_eq!(editor.selection(), None);
        assert_eq!(editor.host().resets, 1);
        assert_eq!(editor.apply(FormatCommand::Bold), Ok(Applied::TypingStyle));
    }

    #[test]
    fn test_link_at_reports_anchor_target() {
        let mut editor = editor_with_text("read the docs");
        editor.host_mut().urls.push_back("example.com".to_string());
        editor.select(9, 13);
        editor.on_pointer_up();
        editor.apply(FormatCommand::Link { url: None }).unwrap();

        assert_eq!(editor.link_at(9), Some("https://example.com".to_string()));
        assert_eq!(editor.link_at(12), Some("https://example.com".to_string()));
        assert_eq!(editor.link_at(8), None);
        assert_eq!(editor.link_at(13), None);
    }

    #[test]
    fn test_cancelled_link_prompt_leaves_content() {
        let mut editor = editor_with_text("hello");
        editor.select(0, 5);
        editor.on_pointer_up();

        let result = editor.apply(FormatCommand::Link { url: None });

        assert_eq!(result, Err(FormatError::CancelledInput));
        assert_eq!(editor.to_markup(), "hello");
        assert!(editor.host().notices.is_empty());
    }
}
