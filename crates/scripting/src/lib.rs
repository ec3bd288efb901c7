//! Embedded Lua runtime for the Marble developer console.
//!
//! This crate provides:
//! - **ScriptEngine**: a Lua VM wrapper implementing the console's
//!   [`ScriptRuntime`](console::ScriptRuntime) seam
//! - The bridge globals (`print`, `console`, `ent_create_ball`,
//!   `ent_destroy`, `ents_clear`), each routing through the same session
//!   side effects as the native console commands
//!
//! # Example
//!
//! ```rust,ignore
//! use console::{Console, ConsoleSession};
//! use scripting::ScriptEngine;
//!
//! let console = Console::new(ConsoleSession::shared());
//! let engine = ScriptEngine::install(&console)?;
//!
//! // Identical effect whether typed or scripted:
//! console.dispatch("ent_create_ball 0 1 0 1 120 marble");
//! engine.exec_string("ent_create_ball(0, 1, 0, 1, 120, 'agate')")?;
//! ```

mod engine;
mod error;

pub use engine::ScriptEngine;
pub use error::{Result, ScriptError};

// Re-export mlua for downstream crates
pub use mlua;
