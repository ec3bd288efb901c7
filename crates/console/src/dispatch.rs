//! Command dispatch over a console session.
//!
//! The dispatcher owns the fixed command table and nothing else: all state
//! lives in the shared [`ConsoleSession`]. Failures of every flavor (bad
//! command, bad arguments, missing file, malformed scene bytes) become
//! `Error` log entries; dispatch itself never fails, and a failing line
//! never stops the lines after it.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::session::SharedSession;
use crate::tokenizer::tokenize;

/// Upper bound on `exec` nesting. A script chaining past this depth gets
/// an error entry instead of unbounded recursion.
pub const MAX_EXEC_DEPTH: usize = 32;

/// Scene file used by `save`/`load` when no path argument is given.
pub const DEFAULT_SCENE_FILE: &str = "scene.sav";

const HELP_TEXT: &str = "Commands:\n\
    \x20 - help                    Show this help message.\n\
    \x20 - echo <string>           Echo back string.\n\
    \x20 - clear                   Clear log.\n\
    \x20 - argdump [bool]          Sets or displays argument dumping.\n\
    \x20 - ent_create_ball         Makes a ball entity at position, with size and colour.\n\
    \x20   <x> <y> <z> <size> <hue> [name]\n\
    \x20 - ent_destroy <name...>   Destroy entities by name.\n\
    \x20 - ents_clear              Destroy all entities.\n\
    \x20 - ents_list               List all entities.\n\
    \x20 - type <file>             Print contents of a file.\n\
    \x20 - exec <file>             Execute file as console script.\n\
    \x20 - lua_exec <code>         Execute Lua code.\n\
    \x20 - lua_execf <file>        Execute Lua file.\n\
    \x20 - save [file]             Save scene.\n\
    \x20 - load [file]             Load scene.";

/// Seam to the embedded script runtime.
///
/// Kept as a trait so the dispatcher does not depend on any particular
/// scripting backend; errors come back as display strings because the
/// console only ever renders them into log lines.
pub trait ScriptRuntime {
    /// Execute a chunk of script source.
    fn eval(&self, chunk: &str) -> Result<(), String>;
    /// Execute a script file.
    fn eval_file(&self, path: &Path) -> Result<(), String>;
}

/// The command dispatcher: a fixed command table over a shared session.
pub struct Console {
    session: SharedSession,
    script: RefCell<Option<Rc<dyn ScriptRuntime>>>,
}

impl Console {
    pub fn new(session: SharedSession) -> Rc<Self> {
        Rc::new(Self {
            session,
            script: RefCell::new(None),
        })
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Install the script runtime behind the `lua_exec`/`lua_execf`
    /// commands. Installing again replaces the previous runtime.
    pub fn set_script_runtime(&self, runtime: Rc<dyn ScriptRuntime>) {
        *self.script.borrow_mut() = Some(runtime);
    }

    fn script_runtime(&self) -> Option<Rc<dyn ScriptRuntime>> {
        self.script.borrow().clone()
    }

    /// Tokenize and execute one command line.
    pub fn dispatch(&self, line: &str) {
        self.dispatch_at_depth(line, 0);
    }

    fn dispatch_at_depth(&self, line: &str, depth: usize) {
        let args = tokenize(line);
        let Some(command) = args.first() else {
            return;
        };
        if command.starts_with('#') {
            return;
        }

        // Diagnostic short-circuit: dump arguments instead of executing.
        let dumping = self.session.borrow().arg_dump;
        if dumping && command != "argdump" {
            let mut session = self.session.borrow_mut();
            for (i, arg) in args.iter().enumerate() {
                session.log.info(format!("{i}: {arg}"));
            }
            return;
        }

        match command.as_str() {
            "help" => self.session.borrow_mut().log.info(HELP_TEXT),
            "echo" => {
                if let Some(text) = args.get(1) {
                    self.session.borrow_mut().log.info(text.clone());
                }
            }
            "clear" => self.session.borrow_mut().log.clear(),
            "argdump" => self.cmd_argdump(&args),
            "ent_create_ball" => self.cmd_create_ball(&args),
            "ent_destroy" => self.cmd_destroy(&args),
            "ents_clear" => self.session.borrow_mut().clear_entities(),
            "ents_list" => self.session.borrow_mut().list_entities(),
            "type" => self.cmd_type(&args),
            "exec" => self.cmd_exec(&args, depth),
            "lua_exec" => self.cmd_lua_exec(line),
            "lua_execf" => self.cmd_lua_execf(&args),
            "save" => self.session.borrow_mut().save(&scene_path(&args)),
            "load" => self.session.borrow_mut().load(&scene_path(&args)),
            _ => self.session.borrow_mut().log.error("Unknown command."),
        }
    }

    fn cmd_argdump(&self, args: &[String]) {
        let mut session = self.session.borrow_mut();
        match args.get(1).map(String::as_str) {
            None => {
                let state = if session.arg_dump { "enabled" } else { "disabled" };
                session.log.info(format!("Argument dumping is {state}."));
            }
            Some("true") | Some("1") => {
                session.arg_dump = true;
                session.log.info("Enabled argument dumping.");
            }
            Some("false") | Some("0") => {
                session.arg_dump = false;
                session.log.info("Disabled argument dumping.");
            }
            Some(_) => session.log.error("Please specify true, false, 1, or 0."),
        }
    }

    fn cmd_create_ball(&self, args: &[String]) {
        let mut session = self.session.borrow_mut();
        if args.len() < 6 {
            session
                .log
                .error("Please specify coordinates, size, and hue.");
            return;
        }

        let name = args.get(6).map(String::as_str).unwrap_or("");
        session.create_ball(
            lenient_f32(&args[1]),
            lenient_f32(&args[2]),
            lenient_f32(&args[3]),
            lenient_f32(&args[4]),
            lenient_f32(&args[5]),
            name,
        );
    }

    fn cmd_destroy(&self, args: &[String]) {
        let mut session = self.session.borrow_mut();
        if args.len() < 2 {
            session.log.error("Please specify 1 or more entities.");
            return;
        }
        for name in &args[1..] {
            session.destroy_named(name);
        }
    }

    fn cmd_type(&self, args: &[String]) {
        let Some(path) = file_arg(args) else {
            self.session.borrow_mut().log.error("Please specify a file.");
            return;
        };

        match fs::read_to_string(&path) {
            Ok(contents) => self.session.borrow_mut().log.info(contents),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "type failed");
                self.session.borrow_mut().log.error("Bad file.");
            }
        }
    }

    fn cmd_exec(&self, args: &[String], depth: usize) {
        let Some(path) = file_arg(args) else {
            self.session.borrow_mut().log.error("Please specify a file.");
            return;
        };

        if depth >= MAX_EXEC_DEPTH {
            self.session.borrow_mut().log.error(format!(
                "Script recursion too deep (max {MAX_EXEC_DEPTH})."
            ));
            return;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "exec failed");
                self.session.borrow_mut().log.error("Bad file.");
                return;
            }
        };

        for line in contents.lines() {
            self.dispatch_at_depth(line, depth + 1);
        }
    }

    fn cmd_lua_exec(&self, line: &str) {
        // The chunk is everything after the command word on the raw line,
        // so quoting is left to Lua rather than the tokenizer.
        let code = line
            .trim_start()
            .strip_prefix("lua_exec")
            .unwrap_or("")
            .trim_start();
        self.run_script(|runtime| runtime.eval(code));
    }

    fn cmd_lua_execf(&self, args: &[String]) {
        let Some(path) = file_arg(args) else {
            self.session.borrow_mut().log.error("Please specify a file.");
            return;
        };
        if !path.exists() {
            self.session.borrow_mut().log.error("Bad file.");
            return;
        }
        self.run_script(|runtime| runtime.eval_file(&path));
    }

    fn run_script(&self, run: impl FnOnce(&dyn ScriptRuntime) -> Result<(), String>) {
        let Some(runtime) = self.script_runtime() else {
            self.session
                .borrow_mut()
                .log
                .error("No script runtime installed.");
            return;
        };

        if let Err(err) = run(runtime.as_ref()) {
            tracing::warn!(%err, "script execution failed");
            self.session.borrow_mut().log.error("Execution error.");
        }
    }
}

/// Resolve the file argument for `type`/`exec`-style commands. `None`
/// when the argument is missing or names a directory.
fn file_arg(args: &[String]) -> Option<PathBuf> {
    let path = PathBuf::from(args.get(1)?);
    if path.is_dir() {
        return None;
    }
    Some(path)
}

fn scene_path(args: &[String]) -> PathBuf {
    PathBuf::from(args.get(1).map(String::as_str).unwrap_or(DEFAULT_SCENE_FILE))
}

/// Permissive numeric parsing: anything unparsable becomes `0.0`.
/// Preserved console behavior, not a validation gap to close.
fn lenient_f32(arg: &str) -> f32 {
    arg.trim().parse().unwrap_or(0.0)
}
