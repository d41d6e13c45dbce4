use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid editor settings in {config_path}: {reason}")]
    InvalidSettings { config_path: PathBuf, reason: String },
}

/// Limits and defaults of the editable region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Plain-text length the content is truncated to
    pub max_chars: usize,
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    /// Stacking order of the container while it is being resized
    pub raised_z_index: i32,
    /// Prefix for link URLs typed without a scheme
    pub default_link_scheme: String,
    pub initial_width: f64,
    pub initial_height: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_chars: 500,
            min_width: 119.0,
            max_width: 1200.0,
            min_height: 22.0,
            raised_z_index: 1000,
            default_link_scheme: "https://".to_string(),
            initial_width: 400.0,
            initial_height: 200.0,
        }
    }
}

impl EditorSettings {
    fn validate(&self) -> Result<(), String> {
        if self.min_width > self.max_width {
            return Err(format!(
                "min_width ({}) is larger than max_width ({})",
                self.min_width, self.max_width
            ));
        }
        if self.max_chars == 0 {
            return Err("max_chars must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Where saved editor records live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
    /// Key the editor record is stored under
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.local/share/richbox/storage.json"),
            key: "editor_saved_data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub storage: StorageSettings,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config
            .editor
            .validate()
            .map_err(|reason| ConfigError::InvalidSettings {
                config_path: config_path.to_path_buf(),
                reason,
            })?;

        // Expand shell variables and tilde in the storage path
        config.storage.path =
            Self::expand_path(&config.storage.path).unwrap_or(config.storage.path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The config file if there is one, defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let mut config = Self::load()?.unwrap_or_default();
        config.storage.path =
            Self::expand_path(&config.storage.path).unwrap_or(config.storage.path);
        Ok(config)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/richbox");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
