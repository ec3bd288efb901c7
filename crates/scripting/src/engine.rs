//! Lua engine wired to the developer console.
//!
//! The engine owns the Lua state; the console owns the engine behind the
//! [`ScriptRuntime`] seam. Bridge closures hold only a `Weak` reference
//! back to the console, so there is no ownership cycle, and every closure
//! borrows the session just long enough for its own mutation, so reentrant
//! `console()` calls from Lua are safe.

use std::io;
use std::path::Path;
use std::rc::{Rc, Weak};

use console::{Console, ScriptRuntime};
use mlua::prelude::*;

use crate::error::{Result, ScriptError};

/// Lua runtime bridged to a [`Console`].
pub struct ScriptEngine {
    lua: Lua,
}

impl ScriptEngine {
    /// Create the engine, register the bridge globals, and install it as
    /// the console's script runtime.
    pub fn install(console: &Rc<Console>) -> Result<Rc<Self>> {
        let lua = Lua::new();
        register_bridge(&lua, Rc::downgrade(console))?;

        let engine = Rc::new(Self { lua });
        console.set_script_runtime(engine.clone());
        Ok(engine)
    }

    /// Get the underlying Lua state.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Execute a Lua chunk.
    pub fn exec_string(&self, code: &str) -> Result<()> {
        self.lua.load(code).exec()?;
        Ok(())
    }

    /// Load and execute a Lua file.
    pub fn exec_file(&self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ScriptError::ScriptNotFound(path.display().to_string()),
            _ => ScriptError::Io(err),
        })?;
        self.lua.load(&content).exec()?;
        Ok(())
    }
}

impl ScriptRuntime for ScriptEngine {
    fn eval(&self, chunk: &str) -> std::result::Result<(), String> {
        self.exec_string(chunk).map_err(|err| err.to_string())
    }

    fn eval_file(&self, path: &Path) -> std::result::Result<(), String> {
        self.exec_file(path).map_err(|err| err.to_string())
    }
}

/// Register the console bridge globals.
///
/// Each global maps 1:1 onto a dispatcher behavior; a script and a typed
/// command leave identical traces in the store and the log.
fn register_bridge(lua: &Lua, console: Weak<Console>) -> LuaResult<()> {
    // print(text): append an Info log line
    let target = console.clone();
    let print_fn = lua.create_function(move |_, text: String| {
        let console = upgrade(&target)?;
        console.session().borrow_mut().log.info(text);
        Ok(())
    })?;
    lua.globals().set("print", print_fn)?;

    // console(line): dispatch a full console command line
    let target = console.clone();
    let console_fn = lua.create_function(move |_, line: String| {
        let console = upgrade(&target)?;
        console.dispatch(&line);
        Ok(())
    })?;
    lua.globals().set("console", console_fn)?;

    // ent_create_ball(x, y, z, size, hue [, name])
    let target = console.clone();
    let create_fn = lua.create_function(
        move |_, (x, y, z, size, hue, name): (f32, f32, f32, f32, f32, Option<String>)| {
            let console = upgrade(&target)?;
            console
                .session()
                .borrow_mut()
                .create_ball(x, y, z, size, hue, name.as_deref().unwrap_or(""));
            Ok(())
        },
    )?;
    lua.globals().set("ent_create_ball", create_fn)?;

    // ent_destroy(name)
    let target = console.clone();
    let destroy_fn = lua.create_function(move |_, name: String| {
        let console = upgrade(&target)?;
        console.session().borrow_mut().destroy_named(&name);
        Ok(())
    })?;
    lua.globals().set("ent_destroy", destroy_fn)?;

    // ents_clear()
    let target = console.clone();
    let clear_fn = lua.create_function(move |_, ()| {
        let console = upgrade(&target)?;
        console.session().borrow_mut().clear_entities();
        Ok(())
    })?;
    lua.globals().set("ents_clear", clear_fn)?;

    Ok(())
}

fn upgrade(weak: &Weak<Console>) -> LuaResult<Rc<Console>> {
    weak.upgrade()
        .ok_or_else(|| LuaError::RuntimeError("console has shut down".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::{ConsoleSession, Severity};

    fn wired() -> (Rc<Console>, Rc<ScriptEngine>) {
        let console = Console::new(ConsoleSession::shared());
        let engine = ScriptEngine::install(&console).unwrap();
        (console, engine)
    }

    fn log_texts(console: &Console, severity: Severity) -> Vec<String> {
        console
            .session()
            .borrow()
            .log
            .entries()
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.text.clone())
            .collect()
    }

    #[test]
    fn print_appends_an_info_line() {
        let (console, engine) = wired();
        engine.exec_string("print('hello from lua')").unwrap();

        assert_eq!(
            log_texts(&console, Severity::Info),
            vec!["hello from lua".to_string()]
        );
    }

    #[test]
    fn bridge_create_matches_native_create() {
        let (console, engine) = wired();
        console.dispatch("ent_create_ball 0 1 0 1 120 typed");
        engine
            .exec_string("ent_create_ball(0, 1, 0, 1, 120, 'scripted')")
            .unwrap();

        let session = console.session().borrow();
        assert_eq!(session.entities.len(), 2);

        let entries = session.log.entries();
        assert_eq!(entries[0].text, "Created ball entity \"typed\" at <0, 1, 0>.");
        assert_eq!(
            entries[1].text,
            "Created ball entity \"scripted\" at <0, 1, 0>."
        );
    }

    #[test]
    fn bridge_create_without_name_is_unnamed() {
        let (console, engine) = wired();
        engine.exec_string("ent_create_ball(1, 2, 3, 1, 0)").unwrap();

        let session = console.session().borrow();
        assert_eq!(session.entities.len(), 1);
        let (id, _) = session.entities.iter().next().unwrap();
        assert!(session.entities.name_of(id).is_none());
    }

    #[test]
    fn bridge_destroy_and_clear_route_through_the_session() {
        let (console, engine) = wired();
        console.dispatch("ent_create_ball 0 0 0 1 0 doomed");
        engine.exec_string("ent_destroy('doomed')").unwrap();
        assert!(console.session().borrow().entities.is_empty());

        console.dispatch("ent_create_ball 0 0 0 1 0 a");
        console.dispatch("ent_create_ball 0 0 0 1 0 b");
        engine.exec_string("ents_clear()").unwrap();

        assert!(console.session().borrow().entities.is_empty());
        let infos = log_texts(&console, Severity::Info);
        assert!(infos.contains(&"Destroyed all 2 entities.".to_string()));
    }

    #[test]
    fn console_global_dispatches_full_lines() {
        let (console, engine) = wired();
        engine
            .exec_string("console('ent_create_ball 0 0 0 1 0 via_console')")
            .unwrap();

        assert!(console
            .session()
            .borrow()
            .entities
            .lookup("via_console")
            .is_some());
    }

    #[test]
    fn lua_faults_surface_as_errors() {
        let (_console, engine) = wired();
        assert!(engine.exec_string("this is not lua ((").is_err());
    }

    #[test]
    fn lua_exec_command_reports_execution_error() {
        let (console, _engine) = wired();
        console.dispatch("lua_exec error('boom')");

        let errors = log_texts(&console, Severity::Error);
        assert_eq!(errors, vec!["Execution error.".to_string()]);
    }

    #[test]
    fn lua_execf_runs_a_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spawn.lua");
        std::fs::write(&path, "ent_create_ball(0, 0, 0, 1, 0, 'from_file')").unwrap();

        let (console, _engine) = wired();
        console.dispatch(&format!("lua_execf {}", path.display()));

        assert!(console
            .session()
            .borrow()
            .entities
            .lookup("from_file")
            .is_some());
    }

    #[test]
    fn missing_script_file_is_script_not_found() {
        let (_console, engine) = wired();
        let err = engine.exec_file(Path::new("/nope/missing.lua")).unwrap_err();
        assert!(matches!(err, ScriptError::ScriptNotFound(_)));
    }
}
