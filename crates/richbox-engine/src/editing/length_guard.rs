use log::info;

use crate::error::FormatError;
use crate::tree::ContentTree;

pub const DEFAULT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCheck {
    WithinLimit { len: usize },
    /// Content was cut back to the limit; `removed` characters were dropped.
    Truncated { removed: usize },
}

/// Caps the plain-text length of the region.
///
/// Lengths count Unicode scalar values. Truncating keeps the first
/// `max_chars` characters as a single unformatted text leaf, so any
/// formatting in the region is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthGuard {
    max_chars: usize,
}

impl Default for LengthGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl LengthGuard {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn check<T: ContentTree + ?Sized>(&self, tree: &mut T) -> Result<LengthCheck, FormatError> {
        let root = tree.root();
        let len = tree.text_len(root);
        if len <= self.max_chars {
            return Ok(LengthCheck::WithinLimit { len });
        }

        let kept: String = tree.text_content(root).chars().take(self.max_chars).collect();
        tree.replace_children_with_text(root, &kept)?;

        let removed = len - self.max_chars;
        info!("Truncated content to {} characters ({removed} removed)", self.max_chars);
        Ok(LengthCheck::Truncated { removed })
    }
}
