use crate::editing::command::{FormatCommand, Scope};
use crate::editing::link::normalize_url;
use crate::editing::typing::{ToggleState, TypingStyle};
use crate::error::FormatError;
use crate::tree::{ContentTree, Element, Fragment, NodeId, TextRange};

/// What a formatting command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The range now sits in a new wrapper; the selection spans it exactly.
    Wrapped {
        wrapper: NodeId,
        selection: TextRange,
    },
    /// The range was replaced by an anchor; the selection is a cursor right
    /// after it.
    Linked {
        anchor: NodeId,
        href: String,
        selection: TextRange,
    },
    /// Nothing was selected, so the style waits for typed text.
    TypingStyle,
    /// The style went on the region itself.
    Region,
    /// Nothing was selected and the command has no cursor behaviour.
    Skipped,
}

impl Applied {
    /// Selection the editor should show after the command.
    pub fn selection(&self) -> Option<TextRange> {
        match self {
            Applied::Wrapped { selection, .. } | Applied::Linked { selection, .. } => {
                Some(*selection)
            }
            _ => None,
        }
    }
}

/// Applies one [`FormatCommand`] to a selection.
///
/// An extended selection is extracted, wrapped in a span carrying the
/// command's declaration and put back where it was; the text of the region
/// does not change. A collapsed selection only updates the typing style.
/// Alignment and border color style the region and ignore the selection.
#[derive(Debug, Clone)]
pub struct RangeFormatter {
    link_scheme: String,
}

impl Default for RangeFormatter {
    fn default() -> Self {
        Self::new("https://")
    }
}

impl RangeFormatter {
    pub fn new(link_scheme: impl Into<String>) -> Self {
        Self {
            link_scheme: link_scheme.into(),
        }
    }

    /// Apply `command` to `selection`.
    ///
    /// `prompt_url` is only called for a link command without a URL, after
    /// the selection has been checked.
    pub fn apply<T: ContentTree + ?Sized>(
        &self,
        tree: &mut T,
        selection: Option<&TextRange>,
        command: &FormatCommand,
        toggles: ToggleState,
        typing: &mut TypingStyle,
        prompt_url: impl FnOnce() -> Option<String>,
    ) -> Result<Applied, FormatError> {
        let range = selection.filter(|range| !range.is_collapsed());

        match command.scope(toggles.bold, toggles.italic) {
            Scope::Region(declarations) => {
                let style = tree.region_style_mut();
                for (property, value) in declarations {
                    style.set(property, value);
                }
                Ok(Applied::Region)
            }
            Scope::Inline {
                property,
                value,
                typing: keeps_for_typing,
            } => match range {
                Some(range) => wrap_range(tree, range, Element::styled_span(property, &value)),
                None if keeps_for_typing => {
                    typing.set(property, &value);
                    Ok(Applied::TypingStyle)
                }
                None => Ok(Applied::Skipped),
            },
            Scope::Link => {
                let range = range.ok_or(FormatError::NoSelection)?;
                let typed = match command {
                    FormatCommand::Link { url: Some(url) } => Some(url.clone()),
                    _ => prompt_url(),
                };
                let href = typed
                    .as_deref()
                    .and_then(|url| normalize_url(url, &self.link_scheme))
                    .ok_or(FormatError::CancelledInput)?;
                link_range(tree, range, href)
            }
        }
    }
}

fn wrap_range<T: ContentTree + ?Sized>(
    tree: &mut T,
    range: &TextRange,
    element: Element,
) -> Result<Applied, FormatError> {
    let extracted = tree.extract(range)?;
    let wrapper = tree.wrap(extracted.fragment, element);
    tree.insert(wrapper, extracted.at)?;

    let selection = TextRange::new(wrapper, 0, tree.text_len(wrapper));
    Ok(Applied::Wrapped { wrapper, selection })
}

fn link_range<T: ContentTree + ?Sized>(
    tree: &mut T,
    range: &TextRange,
    href: String,
) -> Result<Applied, FormatError> {
    let text = tree.range_text(range);
    let extracted = tree.extract(range)?;
    tree.discard(extracted.fragment);

    let leaf = tree.create_text(&text);
    let anchor = tree.wrap(Fragment::from(leaf), Element::link(&href));
    tree.insert(anchor, extracted.at)?;

    let after = range.start + text.chars().count();
    Ok(Applied::Linked {
        anchor,
        href,
        selection: TextRange::caret(range.container, after),
    })
}
