//! Structural checks used by tests after every mutation.

use super::{ContentTree, NodeId};

/// Panics if parent/child links disagree, a text leaf has children, or an
/// attached text leaf is empty.
pub fn check<T: ContentTree + ?Sized>(tree: &T) {
    check_node(tree, tree.root());
}

fn check_node<T: ContentTree + ?Sized>(tree: &T, node: NodeId) {
    if let Some(text) = tree.text(node) {
        assert!(
            tree.children(node).is_empty(),
            "text leaf {node:?} has children"
        );
        assert!(!text.is_empty(), "attached text leaf {node:?} is empty");
        return;
    }
    for child in tree.children(node) {
        assert_eq!(
            tree.parent(*child),
            Some(node),
            "child {child:?} does not point back at {node:?}"
        );
        check_node(tree, *child);
    }
}
