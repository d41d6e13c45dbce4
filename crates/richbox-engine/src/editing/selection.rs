use log::warn;

use crate::error::FormatError;
use crate::tree::{ContentTree, TextRange};

/// Remembers the last selection made inside the editable region.
///
/// Opening a color picker or any other control steals focus and clears the
/// live selection before a command handler runs. Commands therefore work
/// from the range captured on the last pointer or key release, restored
/// right before they touch the content.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    saved: Option<TextRange>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a copy of the live selection. Without one the previous range
    /// stays.
    pub fn capture(&mut self, live: Option<&TextRange>) {
        if let Some(range) = live {
            self.saved = Some(*range);
        }
    }

    pub fn saved(&self) -> Option<&TextRange> {
        self.saved.as_ref()
    }

    pub fn clear(&mut self) {
        self.saved = None;
    }

    /// Rebuild the saved range against the current tree.
    ///
    /// Offsets are clamped to the container's current text length. Fails
    /// with [`FormatError::StaleRange`] when the container was removed.
    pub fn try_restore<T: ContentTree + ?Sized>(
        &self,
        tree: &T,
    ) -> Result<Option<TextRange>, FormatError> {
        let Some(saved) = self.saved else {
            return Ok(None);
        };
        if !tree.is_attached(saved.container) {
            return Err(FormatError::StaleRange(saved.container));
        }
        Ok(Some(saved.clamped(tree.text_len(saved.container))))
    }

    /// Like [`Self::try_restore`], but a stale range degrades to no
    /// selection instead of an error.
    pub fn restore<T: ContentTree + ?Sized>(&self, tree: &T) -> Option<TextRange> {
        self.try_restore(tree).unwrap_or_else(|err| {
            warn!("Dropping saved selection: {err}");
            None
        })
    }
}
