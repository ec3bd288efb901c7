//! In-application developer console for the Marble toolkit demo.
//!
//! A raw line of text enters [`tokenize`], the argument list enters
//! [`Console::dispatch`], and the dispatcher either mutates the object
//! store directly or round-trips it through the scene snapshot codec.
//! Every user-visible outcome lands in the session's [`ConsoleLog`], which
//! a presentation layer renders however it likes; nothing in this crate
//! draws, and nothing here ever panics the host over user input.

mod dispatch;
mod log;
mod session;
mod tokenizer;

pub use dispatch::{Console, ScriptRuntime, DEFAULT_SCENE_FILE, MAX_EXEC_DEPTH};
pub use log::{ConsoleLog, LogEntry, Severity};
pub use session::{ConsoleSession, SharedSession};
pub use tokenizer::tokenize;
