/*!
 * # Content Tree
 *
 * The editable region is a small tree: one root (the region itself), inline
 * elements (`span`, `a`) and text leaves. Formatting never edits markup
 * strings; it goes through three primitives on [`ContentTree`]:
 *
 * - **`extract(range)`** detaches the nodes covered by a range, splitting
 *   text and partially covered elements at the boundaries, and reports where
 *   the content used to be.
 * - **`wrap(fragment, element)`** builds a detached element around a fragment.
 * - **`insert(node, at)`** attaches a detached node at an insertion point.
 *
 * Everything else (text queries, computed style, offset lookup) is provided
 * on top of a handful of accessors, so the formatting code does not depend
 * on how the tree is stored. [`Content`] is the arena-backed implementation.
 *
 * ## Offsets
 *
 * All offsets are character offsets into the text content of a container
 * node. A [`TextRange`] names its container, so a range captured inside a
 * wrapper stays meaningful after the wrapper's siblings change.
 */

mod content;
mod element;
pub mod invariants;
pub mod markup;

use thiserror::Error;

pub use content::Content;
pub use element::{Element, StyleMap, Tag};

/// Stable identifier of a node. Ids are never reused within one [`Content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Immutable snapshot of a selection: container plus character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub container: NodeId,
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range; the offsets are ordered so `start <= end`.
    pub fn new(container: NodeId, start: usize, end: usize) -> Self {
        Self {
            container,
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A collapsed range (cursor) at `offset`.
    pub fn caret(container: NodeId, offset: usize) -> Self {
        Self::new(container, offset, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Same coordinates with both offsets clamped to `max`.
    pub fn clamped(self, max: usize) -> Self {
        Self::new(self.container, self.start.min(max), self.end.min(max))
    }
}

/// Position between two children of `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPoint {
    pub parent: NodeId,
    pub index: usize,
}

/// Detached sibling nodes, in document order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub(crate) nodes: Vec<NodeId>,
}

impl Fragment {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl From<NodeId> for Fragment {
    fn from(node: NodeId) -> Self {
        Self { nodes: vec![node] }
    }
}

/// Result of [`ContentTree::extract`].
#[derive(Debug)]
pub struct Extracted {
    pub fragment: Fragment,
    /// Where the extracted content used to start
    pub at: InsertPoint,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} is not attached to the content tree")]
    Detached(NodeId),
    #[error("offset {offset} is outside the container text (length {len})")]
    OutOfBounds { offset: usize, len: usize },
    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    #[error("node {0:?} is already attached")]
    AlreadyAttached(NodeId),
}

/// Tree operations the editing components rely on.
pub trait ContentTree {
    // ============ Accessors ============

    fn root(&self) -> NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node`; empty for text leaves and unknown ids.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Element data, or `None` for text, the root and unknown ids.
    fn element(&self, node: NodeId) -> Option<&Element>;

    /// Text of a text leaf, or `None` for anything else.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Block-level style of the region itself.
    fn region_style(&self) -> &StyleMap;

    fn region_style_mut(&mut self) -> &mut StyleMap;

    /// Whether the node still exists and is reachable from the root.
    fn is_attached(&self, node: NodeId) -> bool;

    // ============ Primitives ============

    /// Detach the content covered by `range`.
    fn extract(&mut self, range: &TextRange) -> Result<Extracted, TreeError>;

    /// Build a detached element whose children are the fragment nodes.
    fn wrap(&mut self, fragment: Fragment, element: Element) -> NodeId;

    /// Attach a detached node at `at`.
    fn insert(&mut self, node: NodeId, at: InsertPoint) -> Result<(), TreeError>;

    /// Create a detached text leaf.
    fn create_text(&mut self, text: &str) -> NodeId;

    /// Drop detached nodes for good.
    fn discard(&mut self, fragment: Fragment);

    /// Detach and drop an attached node with its subtree.
    fn remove(&mut self, node: NodeId) -> Result<(), TreeError>;

    /// Replace every child of `node` with a single text leaf (none if empty).
    fn replace_children_with_text(&mut self, node: NodeId, text: &str) -> Result<(), TreeError>;

    /// Insert `text` at `offset` of `container`.
    ///
    /// Without a wrapper the text joins the text leaf at the offset, so it
    /// inherits the surrounding formatting. With a wrapper the text is
    /// placed inside a new copy of that element.
    fn insert_text(
        &mut self,
        container: NodeId,
        offset: usize,
        text: &str,
        wrapper: Option<Element>,
    ) -> Result<(), TreeError>;

    // ============ Provided queries ============

    fn text_content(&self, node: NodeId) -> String {
        match self.text(node) {
            Some(text) => text.to_string(),
            None => self
                .children(node)
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    fn text_len(&self, node: NodeId) -> usize {
        match self.text(node) {
            Some(text) => text.chars().count(),
            None => self
                .children(node)
                .iter()
                .map(|child| self.text_len(*child))
                .sum(),
        }
    }

    /// Text leaves under `node`, in document order.
    fn text_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_text_nodes(self, node, &mut out);
        out
    }

    /// Element nodes under the root, children before their parents.
    fn elements_post_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_elements_post_order(self, self.root(), &mut out);
        out
    }

    /// Value of `property` on the node or its nearest styled ancestor.
    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        let mut current = Some(node);
        while let Some(id) = current {
            let value = if id == self.root() {
                self.region_style().get(property)
            } else {
                self.element(id).and_then(|element| element.style.get(property))
            };
            if let Some(value) = value {
                return Some(value.to_string());
            }
            current = self.parent(id);
        }
        None
    }

    /// Text leaf holding `offset` of `container`, with the offset inside it.
    ///
    /// At a boundary between two leaves the earlier one wins, matching where
    /// typed text would land. Empty leaves are skipped.
    fn locate(&self, container: NodeId, offset: usize) -> Option<(NodeId, usize)> {
        let mut position = 0;
        for leaf in self.text_nodes(container) {
            let len = self.text_len(leaf);
            if len > 0 && offset <= position + len {
                return Some((leaf, offset.saturating_sub(position)));
            }
            position += len;
        }
        None
    }

    /// Text leaves a range touches.
    ///
    /// A collapsed range yields the leaf the cursor sits in; an extended
    /// range yields every leaf overlapping it by at least one character.
    fn text_nodes_in(&self, range: &TextRange) -> Vec<NodeId> {
        if range.is_collapsed() {
            return self
                .locate(range.container, range.start)
                .map(|(leaf, _)| vec![leaf])
                .unwrap_or_default();
        }

        let mut position = 0;
        let mut out = Vec::new();
        for leaf in self.text_nodes(range.container) {
            let len = self.text_len(leaf);
            let (start, end) = (position, position + len);
            if len > 0 && start < range.end && end > range.start {
                out.push(leaf);
            }
            position = end;
        }
        out
    }

    /// Plain text covered by `range`.
    fn range_text(&self, range: &TextRange) -> String {
        self.text_content(range.container)
            .chars()
            .skip(range.start)
            .take(range.len())
            .collect()
    }

    /// Character offset in `container` right after `node`.
    fn offset_after(&self, container: NodeId, node: NodeId) -> Option<usize> {
        let mut position = 0;
        find_offset_after(self, container, node, &mut position).then_some(position)
    }
}

fn collect_text_nodes<T: ContentTree + ?Sized>(tree: &T, node: NodeId, out: &mut Vec<NodeId>) {
    if tree.text(node).is_some() {
        out.push(node);
        return;
    }
    for child in tree.children(node) {
        collect_text_nodes(tree, *child, out);
    }
}

fn collect_elements_post_order<T: ContentTree + ?Sized>(
    tree: &T,
    node: NodeId,
    out: &mut Vec<NodeId>,
) {
    for child in tree.children(node) {
        collect_elements_post_order(tree, *child, out);
    }
    if tree.element(node).is_some() {
        out.push(node);
    }
}

fn find_offset_after<T: ContentTree + ?Sized>(
    tree: &T,
    current: NodeId,
    target: NodeId,
    position: &mut usize,
) -> bool {
    for child in tree.children(current) {
        if *child == target {
            *position += tree.text_len(*child);
            return true;
        }
        if tree.text(*child).is_some() {
            *position += tree.text_len(*child);
        } else if find_offset_after(tree, *child, target, position) {
            return true;
        }
    }
    false
}
