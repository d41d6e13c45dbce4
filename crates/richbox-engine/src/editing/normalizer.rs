use log::debug;

use crate::tree::{ContentTree, NodeId};

/// Placeholder some hosts insert to keep an empty styled span alive.
pub const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Removes formatting wrappers that no longer hold visible text.
///
/// Every command leaves a wrapper behind, so deleting formatted text leaves
/// empty spans. A wrapper goes when it has no element children and its text
/// is blank after trimming, or when its whole text is a single zero-width
/// space. Its content goes with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupNormalizer;

impl MarkupNormalizer {
    /// Returns how many wrappers were removed.
    ///
    /// Children are visited before their parents, so a wrapper whose only
    /// children were empty wrappers is removed in the same pass and a second
    /// run finds nothing.
    pub fn normalize<T: ContentTree + ?Sized>(&self, tree: &mut T) -> usize {
        let mut removed = 0;
        for node in tree.elements_post_order() {
            if !tree.is_attached(node) || !is_empty_wrapper(tree, node) {
                continue;
            }
            if tree.remove(node).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Removed {removed} empty wrappers");
        }
        removed
    }
}

fn is_empty_wrapper<T: ContentTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    let text = tree.text_content(node);
    if text == ZERO_WIDTH_SPACE {
        return true;
    }
    let has_elements = tree
        .children(node)
        .iter()
        .any(|child| tree.element(*child).is_some());
    !has_elements && text.trim().is_empty()
}
