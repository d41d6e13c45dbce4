use std::io::{BufRead, Write};

use log::{debug, warn};
use richbox_engine::{Color, Control, HostUi, Notice};

use crate::store::Confirm;

/// Line-oriented stand-in for the toolbar and browser dialogs.
///
/// Notices are printed, prompts read one line of input. Control state is
/// kept so `print` can show it.
pub struct TerminalHost<R, W> {
    input: R,
    output: W,
    bold: bool,
    italic: bool,
    color: Option<String>,
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            bold: false,
            italic: false,
            color: None,
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// One-line summary of the toolbar: active toggles and shown color.
    pub fn controls_summary(&self) -> String {
        format!(
            "bold={} italic={} color={}",
            self.bold,
            self.italic,
            self.color.as_deref().unwrap_or("#000000")
        )
    }

    fn say(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{message}") {
            warn!("Failed to write to output: {e}");
        }
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        self.say(question);
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Failed to read answer: {e}");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> HostUi for TerminalHost<R, W> {
    fn notify(&mut self, notice: Notice) {
        self.say(&format!("! {notice}"));
    }

    fn prompt_url(&mut self) -> Option<String> {
        self.ask("Enter the URL to link to:")
            .filter(|answer| !answer.trim().is_empty())
    }

    fn set_control_active(&mut self, control: Control, active: bool) {
        debug!("{control:?} control active: {active}");
        match control {
            Control::Bold => self.bold = active,
            Control::Italic => self.italic = active,
        }
    }

    fn show_text_color(&mut self, color: &Color) {
        self.color = Some(color.to_string());
    }

    fn reset_controls(&mut self) {
        self.bold = false;
        self.italic = false;
        self.color = None;
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalHost<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        self.ask(&format!("{question} [y/N]"))
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
    }
}
