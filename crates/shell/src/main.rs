//! Marble developer console shell.
//!
//! A stdin-driven stand-in for the in-game console overlay: reads one
//! command line at a time, dispatches it, and prints every new log entry.
//! All rendering concerns stay here; the console crates never print.

mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::{Console, ConsoleSession, Severity, SharedSession};
use scripting::ScriptEngine;
use tracing_subscriber::EnvFilter;

use config::ShellConfig;

/// Command line arguments for the console shell.
#[derive(Parser, Debug)]
#[command(name = "shell", about = "Marble developer console shell")]
struct Args {
    /// Load shell configuration from a TOML file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run a console script before entering the interactive loop
    #[arg(long, value_name = "PATH")]
    exec: Option<PathBuf>,

    /// Do not echo input lines back into the log
    #[arg(long)]
    no_echo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ShellConfig::from_file(path)?,
        None => ShellConfig::load(),
    };
    let echo_input = config.echo_input && !args.no_echo;
    tracing::debug!(?config, "shell config loaded");

    let session = ConsoleSession::shared();
    let console = Console::new(session.clone());
    let _engine = ScriptEngine::install(&console)
        .map_err(|err| anyhow::anyhow!("failed to start script runtime: {err}"))?;

    let mut printed = 0usize;

    if let Some(script) = args.exec.as_ref().or(config.startup_script.as_ref()) {
        console.dispatch(&format!("exec \"{}\"", script.display()));
        printed = print_new_entries(&session, printed)?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "{}", config.prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if trimmed == "quit" || trimmed == "exit" {
            break;
        }

        if echo_input && !trimmed.trim().is_empty() {
            session.borrow_mut().echo_input(trimmed);
        }
        console.dispatch(trimmed);
        printed = print_new_entries(&session, printed)?;
    }

    Ok(())
}

/// Print log entries appended since the last call; returns the new cursor.
///
/// `clear` can shrink the log between calls, so the cursor is clamped.
fn print_new_entries(session: &SharedSession, printed: usize) -> Result<usize> {
    let session = session.borrow();
    let entries = session.log.entries();
    let start = printed.min(entries.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in &entries[start..] {
        match entry.severity {
            Severity::Info => writeln!(out, "  {}", entry.text)?,
            Severity::Error => writeln!(out, "! {}", entry.text)?,
            Severity::Echo => writeln!(out, "{}", entry.text)?,
        }
    }

    Ok(entries.len())
}
