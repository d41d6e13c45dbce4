use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;
use richbox_engine::{Editor, HostUi};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write store at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Store at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Everything needed to put an editor back the way it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRecord {
    /// Inner markup of the region
    pub content: String,
    pub styles: RecordStyles,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStyles {
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub text_align: String,
    pub vertical_align: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: String,
    pub height: String,
}

impl EditorRecord {
    pub fn from_editor<H: HostUi>(editor: &Editor<H>) -> Self {
        let style = editor.region_style();
        let get = |property: &str| style.get(property).unwrap_or_default().to_string();
        let size = editor.size();
        Self {
            content: editor.to_markup(),
            styles: RecordStyles {
                font_size: get("font-size"),
                font_weight: get("font-weight"),
                font_style: get("font-style"),
                text_align: get("align-items"),
                vertical_align: get("justify-content"),
            },
            dimensions: Dimensions {
                width: format!("{}px", size.width),
                height: format!("{}px", size.height),
            },
        }
    }
}

/// String key/value store kept in one JSON file.
///
/// Every change is written straight through; a missing file is an empty
/// store.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let entries = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let removed = self.entries.remove(key).is_some();
        self.flush()?;
        Ok(removed)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(write_error)
    }
}

/// Save the editor under `key`, replacing any earlier record.
pub fn save_record<H: HostUi>(
    store: &mut Store,
    key: &str,
    editor: &Editor<H>,
) -> Result<EditorRecord, StoreError> {
    let record = EditorRecord::from_editor(editor);
    store.set(key, serde_json::to_string(&record)?)?;
    info!("Saved editor record under {key}");
    Ok(record)
}

/// After confirmation, forget the saved record and empty the editor.
/// Returns whether anything was discarded.
pub fn discard<H: HostUi + Confirm>(
    store: &mut Store,
    key: &str,
    editor: &mut Editor<H>,
) -> Result<bool, StoreError> {
    if !editor
        .host_mut()
        .confirm("Are you sure you want to discard all changes?")
    {
        return Ok(false);
    }
    store.remove(key)?;
    editor.clear();
    info!("Discarded editor record under {key}");
    Ok(true)
}
