mod host;
mod script;
mod store;

use anyhow::{Context, Result};
use log::info;
use richbox_config::{Config, EditorSettings};
use richbox_engine::{Editor, EditorOptions, ResizeBounds, Size};
use std::{env, io, path::PathBuf, process};

use crate::host::TerminalHost;
use crate::script::Storage;
use crate::store::Store;

fn editor_options(settings: &EditorSettings) -> EditorOptions {
    EditorOptions {
        max_chars: settings.max_chars,
        bounds: ResizeBounds {
            min_width: settings.min_width,
            max_width: settings.max_width,
            min_height: settings.min_height,
            raised_z_index: settings.raised_z_index,
        },
        link_scheme: settings.default_link_scheme.clone(),
        initial_size: Size::new(settings.initial_width, settings.initial_height),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <event-script>", args[0]);
        eprintln!(
            "Settings are read from {} when present",
            Config::config_path().display()
        );
        process::exit(1);
    }
    let script_path = PathBuf::from(&args[1]);

    let config = Config::load_or_default().context("Failed to load config file")?;
    info!("Using store at {}", config.storage.path.display());

    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let events = script::parse(&script)?;

    let mut store = Store::open(&config.storage.path)?;
    let stdin = io::stdin();
    let host = TerminalHost::new(stdin.lock(), io::stdout());
    let mut editor = Editor::new(host, editor_options(&config.editor));

    let mut out = io::stdout();
    script::run(
        &mut editor,
        &events,
        &mut Storage {
            store: &mut store,
            key: &config.storage.key,
        },
        &mut out,
    )?;

    info!("Replayed {} events", events.len());
    Ok(())
}
