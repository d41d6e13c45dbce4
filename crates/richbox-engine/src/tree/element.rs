use std::fmt;

/// Ordered set of CSS declarations.
///
/// Insertion order is kept so serialized markup is stable; setting an
/// existing property replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self
            .declarations
            .iter()
            .position(|(name, _)| name == property)?;
        Some(self.declarations.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.declarations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Tag of an inline element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Style carrier produced by formatting commands
    Span,
    /// Hyperlink produced by the link command
    Anchor,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Span => "span",
            Tag::Anchor => "a",
        }
    }
}

/// An inline element: tag, inline style and plain attributes.
///
/// Children live in the tree, not here, so cloning an `Element` is a
/// shallow clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub style: StyleMap,
    attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            style: StyleMap::new(),
            attrs: Vec::new(),
        }
    }

    /// A span carrying a single style declaration.
    pub fn styled_span(property: &str, value: &str) -> Self {
        let mut element = Self::new(Tag::Span);
        element.style.set(property, value);
        element
    }

    /// A span carrying every declaration of `style`.
    pub fn span_with(style: &StyleMap) -> Self {
        let mut element = Self::new(Tag::Span);
        element.style = style.clone();
        element
    }

    /// An anchor that opens in a new browsing context with no opener.
    pub fn link(href: &str) -> Self {
        let mut element = Self::new(Tag::Anchor);
        element.set_attr("href", href);
        element.set_attr("target", "_blank");
        element.set_attr("rel", "noopener noreferrer");
        element.style.set("text-decoration", "underline");
        element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(existing) => existing.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
