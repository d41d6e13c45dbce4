use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::debug;
use richbox_engine::{
    Color, Editor, FontSize, FormatCommand, HorizontalAlign, HostUi, ParseError, Point,
    VerticalAlign,
};
use thiserror::Error;

use crate::store::{self, Confirm, Store};

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown event {name:?}")]
    UnknownEvent { line: usize, name: String },

    #[error("line {line}: {event} expects {expected}")]
    MissingArgument {
        line: usize,
        event: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: {source}")]
    InvalidValue { line: usize, source: ParseError },

    #[error("line {line}: {value:?} is not a number")]
    NotANumber { line: usize, value: String },
}

/// One host event, as written in a script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Type(String),
    Select(usize, usize),
    Deselect,
    KeyUp,
    Focus,
    Command(FormatCommand),
    Blur,
    DragStart(Point),
    DragMove(Point),
    DragEnd,
    WindowBlur,
    Clear,
    Save,
    Discard,
    LinkAt(usize),
    Print,
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse(script: &str) -> Result<Vec<Event>, ScriptError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, text)| {
            let text = text.trim();
            !text.is_empty() && !text.starts_with('#')
        })
        .map(|(index, text)| parse_line(index + 1, text.trim()))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Event, ScriptError> {
    let (name, rest) = text.split_once(' ').unwrap_or((text, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let event = match name {
        "type" => Event::Type(rest.to_string()),
        "select" => match args.as_slice() {
            [start, end] => Event::Select(number(line, start)?, number(line, end)?),
            [offset] => {
                let offset = number(line, offset)?;
                Event::Select(offset, offset)
            }
            _ => return Err(missing(line, "select", "a start and an optional end offset")),
        },
        "deselect" => Event::Deselect,
        "capture" => Event::KeyUp,
        "focus" => Event::Focus,
        "bold" => Event::Command(FormatCommand::Bold),
        "italic" => Event::Command(FormatCommand::Italic),
        "size" => {
            let size: FontSize = value(line, "size", rest)?;
            Event::Command(FormatCommand::FontSize(size))
        }
        "color" => {
            let color: Color = value(line, "color", rest)?;
            Event::Command(FormatCommand::TextColor(color))
        }
        "background" => {
            let color: Color = value(line, "background", rest)?;
            Event::Command(FormatCommand::BackgroundColor(color))
        }
        "border" => {
            let color: Color = value(line, "border", rest)?;
            Event::Command(FormatCommand::BorderColor(color))
        }
        "align" => {
            let align: HorizontalAlign = value(line, "align", rest)?;
            Event::Command(FormatCommand::HorizontalAlign(align))
        }
        "valign" => {
            let align: VerticalAlign = value(line, "valign", rest)?;
            Event::Command(FormatCommand::VerticalAlign(align))
        }
        "link" => Event::Command(FormatCommand::Link {
            url: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "blur" => Event::Blur,
        "drag-start" => Event::DragStart(point(line, "drag-start", &args)?),
        "drag-move" => Event::DragMove(point(line, "drag-move", &args)?),
        "drag-end" => Event::DragEnd,
        "window-blur" => Event::WindowBlur,
        "clear" => Event::Clear,
        "save" => Event::Save,
        "discard" => Event::Discard,
        "link-at" => match args.as_slice() {
            [offset] => Event::LinkAt(number(line, offset)?),
            _ => return Err(missing(line, "link-at", "a character offset")),
        },
        "print" => Event::Print,
        other => {
            return Err(ScriptError::UnknownEvent {
                line,
                name: other.to_string(),
            });
        }
    };
    Ok(event)
}

fn missing(line: usize, event: &'static str, expected: &'static str) -> ScriptError {
    ScriptError::MissingArgument {
        line,
        event,
        expected,
    }
}

fn number<T: FromStr>(line: usize, text: &str) -> Result<T, ScriptError> {
    text.parse().map_err(|_| ScriptError::NotANumber {
        line,
        value: text.to_string(),
    })
}

fn value<T: FromStr<Err = ParseError>>(
    line: usize,
    event: &'static str,
    text: &str,
) -> Result<T, ScriptError> {
    if text.is_empty() {
        return Err(missing(line, event, "a value"));
    }
    text.parse()
        .map_err(|source| ScriptError::InvalidValue { line, source })
}

fn point(line: usize, event: &'static str, args: &[&str]) -> Result<Point, ScriptError> {
    match args {
        [x, y] => Ok(Point::new(number(line, x)?, number(line, y)?)),
        _ => Err(missing(line, event, "x and y coordinates")),
    }
}

/// Where `save` and `discard` keep the editor record.
pub struct Storage<'a> {
    pub store: &'a mut Store,
    pub key: &'a str,
}

/// Feed events to the editor, writing what `print` and friends report to
/// `out`. Refused commands are reported and the script carries on.
pub fn run<H, W>(
    editor: &mut Editor<H>,
    events: &[Event],
    storage: &mut Storage<'_>,
    out: &mut W,
) -> Result<()>
where
    H: HostUi + Confirm,
    W: Write,
{
    for event in events {
        debug!("Event: {event:?}");
        match event {
            Event::Type(text) => {
                editor.insert_text(text)?;
            }
            Event::Select(start, end) => {
                editor.select(*start, *end);
                editor.on_pointer_up();
            }
            Event::Deselect => editor.clear_selection(),
            Event::KeyUp => editor.on_key_up(),
            Event::Focus => editor.focus(),
            Event::Command(command) => {
                if let Err(e) = editor.apply(command.clone()) {
                    writeln!(out, "refused: {e}")?;
                }
            }
            Event::Blur => {
                let removed = editor.on_blur();
                if removed > 0 {
                    writeln!(out, "removed {removed} empty wrappers")?;
                }
            }
            Event::DragStart(pointer) => editor.on_drag_start(*pointer),
            Event::DragMove(pointer) => {
                editor.on_drag_move(*pointer);
            }
            Event::DragEnd => editor.on_drag_end(),
            Event::WindowBlur => editor.on_window_blur(),
            Event::Clear => editor.clear(),
            Event::Save => {
                store::save_record(storage.store, storage.key, editor)
                    .context("Failed to save editor")?;
                writeln!(out, "Editor content saved to local storage!")?;
            }
            Event::Discard => {
                if store::discard(storage.store, storage.key, editor)
                    .context("Failed to discard editor")?
                {
                    writeln!(out, "Changes discarded and editor cleared.")?;
                }
            }
            Event::LinkAt(offset) => match editor.link_at(*offset) {
                Some(href) => writeln!(out, "link: {href}")?,
                None => writeln!(out, "link: none")?,
            },
            Event::Print => print(editor, out)?,
        }
    }
    Ok(())
}

fn print<H: HostUi, W: Write>(editor: &Editor<H>, out: &mut W) -> Result<()> {
    let size = editor.size();
    let toggles = editor.toggles();
    writeln!(out, "markup: {}", editor.to_markup())?;
    writeln!(out, "region: {}", editor.region_style())?;
    writeln!(
        out,
        "toggles: bold={} italic={} color={}",
        toggles.bold,
        toggles.italic,
        editor.selected_color()
    )?;
    match editor.z_index() {
        Some(z) => writeln!(out, "size: {}x{} (z-index {z})", size.width, size.height)?,
        None => writeln!(out, "size: {}x{}", size.width, size.height)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TerminalHost;
    use pretty_assertions::assert_eq;
    use richbox_engine::EditorOptions;
    use rstest::rstest;
    use std::io::Cursor;
    use tempfile::TempDir;

    type TestHost = TerminalHost<Cursor<Vec<u8>>, Vec<u8>>;

    fn run_script(script: &str, answers: &str) -> (String, String) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open(temp_dir.path().join("store.json")).unwrap();
        let host: TestHost =
            TerminalHost::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());
        let mut editor = Editor::new(host, EditorOptions::default());
        let mut out = Vec::new();

        let events = parse(script).unwrap();
        run(
            &mut editor,
            &events,
            &mut Storage {
                store: &mut store,
                key: "editor_saved_data",
            },
            &mut out,
        )
        .unwrap();

        let host_output = String::from_utf8(editor.host_mut().output().clone()).unwrap();
        (String::from_utf8(out).unwrap(), host_output)
    }

    #[rstest]
    #[case("bold", Event::Command(FormatCommand::Bold))]
    #[case("select 4 9", Event::Select(4, 9))]
    #[case("select 3", Event::Select(3, 3))]
    #[case("type hello world", Event::Type("hello world".to_string()))]
    #[case("size large", Event::Command(FormatCommand::FontSize(FontSize::Large)))]
    #[case("link", Event::Command(FormatCommand::Link { url: None }))]
    #[case(
        "link example.com",
        Event::Command(FormatCommand::Link { url: Some("example.com".to_string()) })
    )]
    #[case("drag-move 10 -5.5", Event::DragMove(Point::new(10.0, -5.5)))]
    #[case("link-at 3", Event::LinkAt(3))]
    fn test_parse_line(#[case] text: &str, #[case] expected: Event) {
        assert_eq!(parse_line(1, text), Ok(expected));
    }

    #[test]
    fn test_parse_skips_comments_and_reports_line_numbers() {
        let err = parse("# setup\ntype abc\n\nwiggle\n").unwrap_err();

        assert_eq!(
            err,
            ScriptError::UnknownEvent {
                line: 4,
                name: "wiggle".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(
            parse_line(2, "align justify"),
            Err(ScriptError::InvalidValue { line: 2, .. })
        ));
        assert!(matches!(
            parse_line(3, "select a b"),
            Err(ScriptError::NotANumber { line: 3, .. })
        ));
        assert!(matches!(
            parse_line(4, "color"),
            Err(ScriptError::MissingArgument { line: 4, .. })
        ));
    }

    #[test]
    fn test_run_formats_and_prints() {
        let (out, _) = run_script(
            "type say hello world\nselect 4 9\nbold\nalign center\nprint\n",
            "",
        );

        assert_eq!(
            out,
            "markup: say <span style=\"font-weight: bold\">hello</span> world\n\
             region: display: flex; flex-direction: column; align-items: center\n\
             toggles: bold=true italic=false color=#000000\n\
             size: 400x200\n"
        );
    }

    #[test]
    fn test_run_prompts_for_link_and_reports_refusals() {
        let (out, host_output) = run_script(
            "type read the docs\nselect 9 13\nlink\nlink-at 10\nselect 2\nlink\n",
            "docs.example.com\n",
        );

        assert_eq!(
            out,
            "link: https://docs.example.com\n\
             refused: this command needs selected text\n"
        );
        assert_eq!(
            host_output,
            "Enter the URL to link to:\n! Please select the text you want to link.\n"
        );
    }

    #[test]
    fn test_run_resize_cancelled_by_window_blur() {
        let (out, _) = run_script(
            "drag-start 0 0\ndrag-move 5000 5000\nprint\nwindow-blur\nprint\n",
            "",
        );

        assert_eq!(
            out,
            "markup: \nregion: \ntoggles: bold=false italic=false color=#000000\nsize: 1200x5200 (z-index 1000)\n\
             markup: \nregion: \ntoggles: bold=false italic=false color=#000000\nsize: 400x200\n"
        );
    }

    #[test]
    fn test_run_save_then_discard() {
        let (out, host_output) = run_script("type hello\nsave\ndiscard\nprint\n", "y\n");

        assert_eq!(
            out,
            "Editor content saved to local storage!\n\
             Changes discarded and editor cleared.\n\
             markup: \n\
             region: \n\
             toggles: bold=false italic=false color=#000000\n\
             size: 400x200\n"
        );
        assert_eq!(
            host_output,
            "Are you sure you want to discard all changes? [y/N]\n"
        );
    }
}
