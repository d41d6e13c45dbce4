/*!
 * # Editing
 *
 * The pieces the [`crate::Editor`] drives on each host event.
 *
 * ## Command Flow
 *
 * 1. **Capture**: every pointer or key release inside the region copies the
 *    live selection into the [`SelectionTracker`].
 * 2. **Restore**: a command handler rebuilds the saved range against the
 *    current tree, since opening a control usually clears the live one.
 * 3. **Apply**: the [`RangeFormatter`] turns a [`FormatCommand`] into tree
 *    primitives (extract, wrap, insert) or into a pending [`TypingStyle`].
 * 4. **Refresh**: [`ToggleState`] is derived again from the computed style
 *    of the new selection, so bold and italic controls show what the text
 *    actually looks like.
 *
 * ## Housekeeping
 *
 * - [`LengthGuard`] runs after every content change and truncates to the
 *   character limit.
 * - [`MarkupNormalizer`] runs when the region loses focus and drops
 *   wrappers left without visible text.
 */

pub mod command;
pub mod formatter;
pub mod length_guard;
pub mod link;
pub mod normalizer;
pub mod selection;
pub mod typing;

pub use command::{Color, FontSize, FormatCommand, HorizontalAlign, VerticalAlign};
pub use formatter::{Applied, RangeFormatter};
pub use length_guard::{LengthCheck, LengthGuard};
pub use link::normalize_url;
pub use normalizer::{MarkupNormalizer, ZERO_WIDTH_SPACE};
pub use selection::SelectionTracker;
pub use typing::{ToggleState, TypingStyle};
