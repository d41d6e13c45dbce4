use std::fmt;

use crate::editing::Color;

/// Message the host shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LengthLimitReached { limit: usize },
    LinkRequiresSelection,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::LengthLimitReached { limit } => {
                write!(f, "Character limit of {limit} reached!")
            }
            Notice::LinkRequiresSelection => f.write_str("Please select the text you want to link."),
        }
    }
}

/// Toolbar controls with an on/off state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Bold,
    Italic,
}

/// The surrounding UI, as seen by the editor.
///
/// Injected at construction so the editor never looks controls up by name.
/// Only notices and the URL prompt are required; indicator updates default
/// to doing nothing for hosts without a toolbar.
pub trait HostUi {
    fn notify(&mut self, notice: Notice);

    /// Ask the user for a link target. `None` means cancelled.
    fn prompt_url(&mut self) -> Option<String>;

    fn set_control_active(&mut self, _control: Control, _active: bool) {}

    /// Show `color` on the color icon and its indicator dash.
    fn show_text_color(&mut self, _color: &Color) {}

    /// Put every control back to its initial state.
    fn reset_controls(&mut self) {}
}

impl<H: HostUi + ?Sized> HostUi for &mut H {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }

    fn prompt_url(&mut self) -> Option<String> {
        (**self).prompt_url()
    }

    fn set_control_active(&mut self, control: Control, active: bool) {
        (**self).set_control_active(control, active);
    }

    fn show_text_color(&mut self, color: &Color) {
        (**self).show_text_color(color);
    }

    fn reset_controls(&mut self) {
        (**self).reset_controls();
    }
}
