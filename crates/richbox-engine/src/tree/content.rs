use super::{
    ContentTree, Element, Extracted, Fragment, InsertPoint, NodeId, StyleMap, TextRange, TreeError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed content of the editable region.
///
/// Slots of removed nodes are emptied but never reused, so a [`NodeId`]
/// held across a mutation either still points at the same node or is
/// recognisably stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    slots: Vec<Option<Slot>>,
    root: NodeId,
    region: StyleMap,
}

impl Default for Content {
    fn default() -> Self {
        Self::new()
    }
}

impl Content {
    /// An empty region.
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Slot {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            })],
            root: NodeId(0),
            region: StyleMap::new(),
        }
    }

    /// A region holding a single unformatted text leaf.
    pub fn from_text(text: &str) -> Self {
        let mut content = Self::new();
        if !text.is_empty() {
            let leaf = content.create_text(text);
            content.attach(leaf, content.root, 0);
        }
        content
    }

    /// Inner markup of the region, as it would be persisted.
    pub fn to_markup(&self) -> String {
        super::markup::inner_markup(self, self.root)
    }

    /// Structural equality of what a reader sees: same shape, same styles,
    /// same text. Node ids are ignored.
    pub fn same_shape(&self, other: &Content) -> bool {
        self.region_style() == other.region_style() && self.to_markup() == other.to_markup()
    }

    /// Empty the region in place, dropping its style.
    ///
    /// The arena keeps growing, so ids handed out before the clear stay
    /// stale instead of naming new nodes.
    pub fn clear(&mut self) {
        let children = self.children(self.root).to_vec();
        for child in children {
            self.detach(child);
            self.free(child);
        }
        self.region = StyleMap::new();
    }

    fn slot(&self, node: NodeId) -> Option<&Slot> {
        self.slots.get(node.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(node.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Slot {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    fn attach(&mut self, node: NodeId, parent: NodeId, index: usize) {
        if let Some(slot) = self.slot_mut(parent) {
            let index = index.min(slot.children.len());
            slot.children.insert(index, node);
        }
        if let Some(slot) = self.slot_mut(node) {
            slot.parent = Some(parent);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.slot(node).and_then(|slot| slot.parent) else {
            return;
        };
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.retain(|child| *child != node);
        }
        if let Some(slot) = self.slot_mut(node) {
            slot.parent = None;
        }
    }

    fn free(&mut self, node: NodeId) {
        let children = self
            .slot(node)
            .map(|slot| slot.children.clone())
            .unwrap_or_default();
        for child in children {
            self.free(child);
        }
        if let Some(slot) = self.slots.get_mut(node.0) {
            *slot = None;
        }
    }

    fn index_in_parent(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.slot(node)?.parent?;
        let index = self
            .children(parent)
            .iter()
            .position(|child| *child == node)?;
        Some((parent, index))
    }

    fn ensure_container(&self, node: NodeId) -> Result<(), TreeError> {
        if !self.is_attached(node) {
            return Err(TreeError::Detached(node));
        }
        match self.slot(node).map(|slot| &slot.kind) {
            Some(NodeKind::Text(_)) | None => Err(TreeError::NotAContainer(node)),
            Some(_) => Ok(()),
        }
    }

    /// Split descendants of `container` so that `offset` falls between two
    /// of its direct children. Returns the child index of that boundary.
    fn split_to_child_boundary(&mut self, container: NodeId, offset: usize) -> usize {
        let children = self.children(container).to_vec();
        let mut remaining = offset;
        for (index, child) in children.iter().enumerate() {
            if remaining == 0 {
                return index;
            }
            let len = self.text_len(*child);
            if remaining < len {
                self.split_node(*child, remaining);
                return index + 1;
            }
            remaining -= len;
        }
        children.len()
    }

    /// Split `node` at `at` (0 < at < len) into itself and a new next sibling.
    fn split_node(&mut self, node: NodeId, at: usize) {
        let Some((parent, index)) = self.index_in_parent(node) else {
            return;
        };
        let Some(kind) = self.slot(node).map(|slot| slot.kind.clone()) else {
            return;
        };

        let sibling = match kind {
            NodeKind::Text(text) => {
                let split = char_to_byte(&text, at);
                let (head, tail) = text.split_at(split);
                let tail = tail.to_string();
                if let Some(slot) = self.slot_mut(node) {
                    slot.kind = NodeKind::Text(head.to_string());
                }
                self.alloc(NodeKind::Text(tail))
            }
            NodeKind::Element(element) => {
                let boundary = self.split_to_child_boundary(node, at);
                let moved = self
                    .slot_mut(node)
                    .map(|slot| slot.children.split_off(boundary))
                    .unwrap_or_default();
                let sibling = self.alloc(NodeKind::Element(element));
                for child in &moved {
                    if let Some(slot) = self.slot_mut(*child) {
                        slot.parent = Some(sibling);
                    }
                }
                if let Some(slot) = self.slot_mut(sibling) {
                    slot.children = moved;
                }
                sibling
            }
            NodeKind::Root => return,
        };
        self.attach(sibling, parent, index + 1);
    }
}

impl ContentTree for Content {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).and_then(|slot| slot.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.slot(node)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.slot(node)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.slot(node)?.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    fn region_style(&self) -> &StyleMap {
        &self.region
    }

    fn region_style_mut(&mut self) -> &mut StyleMap {
        &mut self.region
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.slot(current).and_then(|slot| slot.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn extract(&mut self, range: &TextRange) -> Result<Extracted, TreeError> {
        self.ensure_container(range.container)?;
        let len = self.text_len(range.container);
        if range.end > len {
            return Err(TreeError::OutOfBounds {
                offset: range.end,
                len,
            });
        }

        // Splitting at the end only adds siblings after the start boundary,
        // so the start index stays valid.
        let start = self.split_to_child_boundary(range.container, range.start);
        let end = self.split_to_child_boundary(range.container, range.end);

        let nodes: Vec<NodeId> = match self.slot_mut(range.container) {
            Some(slot) => slot.children.drain(start..end).collect(),
            None => Vec::new(),
        };
        for node in &nodes {
            if let Some(slot) = self.slot_mut(*node) {
                slot.parent = None;
            }
        }

        Ok(Extracted {
            fragment: Fragment { nodes },
            at: InsertPoint {
                parent: range.container,
                index: start,
            },
        })
    }

    fn wrap(&mut self, fragment: Fragment, element: Element) -> NodeId {
        let wrapper = self.alloc(NodeKind::Element(element));
        for node in &fragment.nodes {
            self.detach(*node);
            if let Some(slot) = self.slot_mut(*node) {
                slot.parent = Some(wrapper);
            }
        }
        if let Some(slot) = self.slot_mut(wrapper) {
            slot.children = fragment.nodes;
        }
        wrapper
    }

    fn insert(&mut self, node: NodeId, at: InsertPoint) -> Result<(), TreeError> {
        self.ensure_container(at.parent)?;
        match self.slot(node) {
            None => return Err(TreeError::Detached(node)),
            Some(slot) if slot.parent.is_some() || node == self.root => {
                return Err(TreeError::AlreadyAttached(node));
            }
            Some(_) => {}
        }
        let len = self.children(at.parent).len();
        if at.index > len {
            return Err(TreeError::OutOfBounds {
                offset: at.index,
                len,
            });
        }
        self.attach(node, at.parent, at.index);
        Ok(())
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    fn discard(&mut self, fragment: Fragment) {
        for node in fragment.nodes {
            self.detach(node);
            self.free(node);
        }
    }

    fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        if node == self.root || !self.is_attached(node) {
            return Err(TreeError::Detached(node));
        }
        self.detach(node);
        self.free(node);
        Ok(())
    }

    fn replace_children_with_text(&mut self, node: NodeId, text: &str) -> Result<(), TreeError> {
        self.ensure_container(node)?;
        let children = self.children(node).to_vec();
        for child in children {
            self.detach(child);
            self.free(child);
        }
        if !text.is_empty() {
            let leaf = self.create_text(text);
            self.attach(leaf, node, 0);
        }
        Ok(())
    }

    fn insert_text(
        &mut self,
        container: NodeId,
        offset: usize,
        text: &str,
        wrapper: Option<Element>,
    ) -> Result<(), TreeError> {
        self.ensure_container(container)?;
        let len = self.text_len(container);
        if offset > len {
            return Err(TreeError::OutOfBounds { offset, len });
        }
        if text.is_empty() {
            return Ok(());
        }

        let located = self.locate(container, offset);
        match (located, wrapper) {
            (Some((leaf, at)), None) => {
                if let Some(Slot {
                    kind: NodeKind::Text(existing),
                    ..
                }) = self.slot_mut(leaf)
                {
                    let split = char_to_byte(existing, at);
                    existing.insert_str(split, text);
                }
            }
            (Some((leaf, at)), Some(element)) => {
                let leaf_len = self.text_len(leaf);
                if at > 0 && at < leaf_len {
                    self.split_node(leaf, at);
                }
                let Some((parent, index)) = self.index_in_parent(leaf) else {
                    return Err(TreeError::Detached(leaf));
                };
                let index = if at == 0 { index } else { index + 1 };
                let inner = self.create_text(text);
                let span = self.wrap(Fragment::from(inner), element);
                self.attach(span, parent, index);
            }
            (None, None) => {
                let leaf = self.create_text(text);
                let end = self.children(container).len();
                self.attach(leaf, container, end);
            }
            (None, Some(element)) => {
                let inner = self.create_text(text);
                let span = self.wrap(Fragment::from(inner), element);
                let end = self.children(container).len();
                self.attach(span, container, end);
            }
        }
        Ok(())
    }
}

fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
