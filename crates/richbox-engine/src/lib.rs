pub mod editing;
pub mod editor;
pub mod error;
pub mod host;
pub mod resize;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::*;
pub use editor::{Editor, EditorOptions};
pub use error::{FormatError, ParseError};
pub use host::{Control, HostUi, Notice};
pub use resize::{Point, ResizeBounds, ResizeController, Size};
pub use tree::{Content, ContentTree, Element, NodeId, StyleMap, Tag, TextRange, TreeError};
