//! Configuration loading and parsing.
//!
//! Parses `lineconsole.toml` (or an override path provided by the binary).
//! Every table and field is optional; missing values take their defaults and
//! unknown fields are ignored. A file that fails to parse is reported at
//! `warn` and replaced by defaults so a typo never prevents startup.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "lineconsole.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
        }
    }
}

impl WindowConfig {
    fn default_title() -> String {
        "Line Console".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_depth")]
    pub depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: Self::default_depth(),
        }
    }
}

impl HistoryConfig {
    const fn default_depth() -> usize {
        10
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// `#rrggbb` or a colour name; validated by the consumer.
    #[serde(default = "OutputConfig::default_foreground")]
    pub foreground: String,
    #[serde(default)]
    pub trace: bool,
    #[serde(default = "OutputConfig::default_trace_source")]
    pub trace_source: String,
    #[serde(default)]
    pub echo_input: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            foreground: Self::default_foreground(),
            trace: false,
            trace_source: Self::default_trace_source(),
            echo_input: false,
        }
    }
}

impl OutputConfig {
    fn default_foreground() -> String {
        "#ffffff".to_string()
    }
    fn default_trace_source() -> String {
        "LineConsole".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<PathBuf>, // path the content came from
    pub file: ConfigFile,        // parsed (or default) data
}

/// Config path: `lineconsole.toml` in the working directory, else the
/// platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("lineconsole").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Recall depth, clamped to at least one entry.
    pub fn history_depth(&self) -> usize {
        let raw = self.file.history.depth;
        if raw == 0 {
            info!(target: "config", raw, clamped = 1, "history_depth_clamped");
            return 1;
        }
        raw
    }

    pub fn title(&self) -> &str {
        &self.file.window.title
    }
}
