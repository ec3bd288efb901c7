//! Error types for the script bridge.

use thiserror::Error;

/// Result type for scripting operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors that can occur while running bridge scripts.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Lua error
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Script file not found
    #[error("Script not found: {0}")]
    ScriptNotFound(String),
}
