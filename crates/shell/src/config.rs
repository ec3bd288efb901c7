//! Shell configuration management
//!
//! Handles loading the console shell configuration:
//! - Optional startup script run before the interactive loop
//! - Input echo behavior
//! - Prompt string

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Shell configuration stored in a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Console script executed before the interactive loop starts
    pub startup_script: Option<PathBuf>,
    /// Echo input lines back into the console log
    #[serde(default = "default_echo_input")]
    pub echo_input: bool,
    /// Prompt shown before each input line
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_echo_input() -> bool {
    true
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            startup_script: None,
            echo_input: true,
            prompt: default_prompt(),
        }
    }
}

impl ShellConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("marble").join("shell.toml"))
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Load config from an explicit path; unlike [`ShellConfig::load`],
    /// failures here are reported rather than papered over.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
