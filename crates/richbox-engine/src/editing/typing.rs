use crate::tree::{ContentTree, Element, StyleMap, TextRange};

/// Style waiting for the next text typed at a collapsed cursor.
///
/// Toggling bold with nothing selected changes no content; it only decides
/// how the next typed characters look. Moving the cursor drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingStyle {
    style: StyleMap,
}

impl TypingStyle {
    pub fn set(&mut self, property: &str, value: &str) {
        self.style.set(property, value);
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.style.get(property)
    }

    pub fn clear(&mut self) {
        self.style.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_empty()
    }

    /// Span to wrap typed text in, if any style is pending.
    pub fn wrapper(&self) -> Option<Element> {
        (!self.style.is_empty()).then(|| Element::span_with(&self.style))
    }
}

/// Whether bold and italic are active for the current selection.
///
/// Derived from the computed style of the selected text (or the pending
/// typing style at a cursor), not flipped on every click, so the state
/// always matches what the selection looks like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub bold: bool,
    pub italic: bool,
}

impl ToggleState {
    pub fn derive<T: ContentTree + ?Sized>(
        tree: &T,
        selection: Option<&TextRange>,
        typing: &TypingStyle,
    ) -> Self {
        Self {
            bold: is_active(tree, selection, typing, "font-weight", is_bold),
            italic: is_active(tree, selection, typing, "font-style", is_italic),
        }
    }
}

pub fn is_bold(value: &str) -> bool {
    matches!(value, "bold" | "bolder") || value.parse::<u16>().is_ok_and(|weight| weight >= 600)
}

pub fn is_italic(value: &str) -> bool {
    value == "italic" || value.starts_with("oblique")
}

fn is_active<T: ContentTree + ?Sized>(
    tree: &T,
    selection: Option<&TextRange>,
    typing: &TypingStyle,
    property: &str,
    test: fn(&str) -> bool,
) -> bool {
    let Some(range) = selection else {
        return typing.get(property).is_some_and(test);
    };
    if range.is_collapsed()
        && let Some(value) = typing.get(property)
    {
        return test(value);
    }

    let leaves = tree.text_nodes_in(range);
    if leaves.is_empty() {
        return tree
            .computed_style(range.container, property)
            .is_some_and(|value| test(&value));
    }
    leaves.iter().all(|leaf| {
        tree.computed_style(*leaf, property)
            .is_some_and(|value| test(&value))
    })
}
