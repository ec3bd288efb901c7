//! Console session state and its store-mutating operations.
//!
//! The session is the explicit context object that replaces ambient
//! globals: it owns the console log, the named entity table, and the
//! argdump flag, and it pairs every store mutation with its user-visible
//! log line. The dispatcher and the script bridge both route through these
//! operations, so behavior is identical whichever way a command arrives.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use scene::glam::Vec3;
use scene::{restore, Entity, EntityId, NamedEntityTable, RestoreIssue, SceneSnapshot};

use crate::log::ConsoleLog;

/// Shared handle to a session.
///
/// Single-threaded by design; borrows are scoped to one operation and
/// never held across reentrant dispatch or script calls.
pub type SharedSession = Rc<RefCell<ConsoleSession>>;

/// All mutable console state: log, object store, and flags.
#[derive(Debug, Default)]
pub struct ConsoleSession {
    pub log: ConsoleLog,
    pub entities: NamedEntityTable,
    /// When set, dispatch logs arguments instead of executing commands.
    pub arg_dump: bool,
}

impl ConsoleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Echo a user-typed line into the log.
    pub fn echo_input(&mut self, line: &str) {
        self.log.echo(format!("> {line}"));
    }

    /// Create a ball entity, logging the outcome. An empty `name` leaves
    /// the entity unnamed.
    pub fn create_ball(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        size: f32,
        hue: f32,
        name: &str,
    ) -> Option<EntityId> {
        match self
            .entities
            .spawn(Entity::ball(Vec3::new(x, y, z), size, hue), name)
        {
            Ok(id) => {
                let shown = if name.is_empty() {
                    id.display_id()
                } else {
                    name.to_string()
                };
                self.log
                    .info(format!("Created ball entity \"{shown}\" at <{x}, {y}, {z}>."));
                Some(id)
            }
            Err(_) => {
                self.log
                    .error(format!("Entity with name \"{name}\" already exists."));
                None
            }
        }
    }

    /// Destroy one entity by name, logging the outcome.
    pub fn destroy_named(&mut self, name: &str) {
        if self.entities.destroy_named(name).is_some() {
            self.log.info(format!("Destroyed entity: \"{name}\"."));
        } else {
            self.log
                .error(format!("Attempted to destroy non-existent entity: \"{name}\"."));
        }
    }

    /// Destroy every entity and log the count.
    pub fn clear_entities(&mut self) {
        let count = self.entities.clear();
        self.log.info(format!("Destroyed all {count} entities."));
    }

    /// Log the entity count and one line per live entity.
    pub fn list_entities(&mut self) {
        let count = self.entities.len();
        if count == 0 {
            self.log.info("0 entities in scene.");
            return;
        }

        self.log.info(format!("{count} entities in scene:"));
        let lines: Vec<String> = self
            .entities
            .iter()
            .map(|(id, _)| match self.entities.name_of(id) {
                Some(name) => format!("  {} {name}", id.display_id()),
                None => format!("  {}", id.display_id()),
            })
            .collect();
        for line in lines {
            self.log.info(line);
        }
    }

    /// Capture the store and write it to `path`, logging the outcome.
    pub fn save(&mut self, path: &Path) {
        let snapshot = SceneSnapshot::capture(&self.entities);
        self.log
            .info(format!("Saving scene to \"{}\"...", path.display()));

        match scene::save_scene(path, &snapshot) {
            Ok(bytes) => self.log.info(format!("Done. Wrote {bytes} byte(s).")),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "scene save failed");
                self.log.error(format!("Save failed: {err}"));
            }
        }
    }

    /// Load `path` and rebuild the store from it, logging the outcome.
    ///
    /// A decode failure leaves the store untouched: the restore only runs
    /// after the whole file has decoded successfully.
    pub fn load(&mut self, path: &Path) {
        if !path.exists() || path.is_dir() {
            self.log
                .error(format!("File \"{}\" does not exist.", path.display()));
            return;
        }

        self.log
            .info(format!("Loading scene from \"{}\".", path.display()));

        match scene::load_scene(path) {
            Ok(snapshot) => {
                let report = restore(&snapshot, &mut self.entities, true);
                tracing::debug!(
                    created = report.created.len(),
                    skipped = report.skipped.len(),
                    "scene restored"
                );
                for issue in &report.skipped {
                    self.log.error(describe_restore_issue(issue));
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "scene load failed");
                self.log.error(format!("ERROR: {err}"));
            }
        }
    }
}

fn describe_restore_issue(issue: &RestoreIssue) -> String {
    fn name_suffix(name: &str) -> String {
        if name.is_empty() {
            ".".to_string()
        } else {
            format!(": \"{name}\".")
        }
    }

    match issue {
        RestoreIssue::NullKind { name } => {
            format!("Attempted to load null-type entity{}", name_suffix(name))
        }
        RestoreIssue::UnknownKind { name, raw } => format!(
            "Attempted to load unknown-type ({raw}) entity{}",
            name_suffix(name)
        ),
        RestoreIssue::NameTaken { name } => {
            format!("Entity with name \"{name}\" already exists.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Severity;

    #[test]
    fn create_ball_logs_display_id_when_unnamed() {
        let mut session = ConsoleSession::new();
        let id = session.create_ball(0.0, 0.0, 0.0, 1.0, 0.0, "").unwrap();

        let entry = &session.log.entries()[0];
        assert_eq!(entry.severity, Severity::Info);
        assert!(entry.text.contains(&id.display_id()));
    }

    #[test]
    fn duplicate_ball_name_is_an_error() {
        let mut session = ConsoleSession::new();
        session.create_ball(0.0, 0.0, 0.0, 1.0, 0.0, "twin").unwrap();
        assert!(session.create_ball(1.0, 1.0, 1.0, 1.0, 0.0, "twin").is_none());

        assert_eq!(session.entities.len(), 1);
        assert_eq!(session.log.entries()[1].severity, Severity::Error);
    }

    #[test]
    fn list_reports_zero_on_empty_store() {
        let mut session = ConsoleSession::new();
        session.list_entities();
        assert_eq!(session.log.entries()[0].text, "0 entities in scene.");
    }

    #[test]
    fn list_shows_names_next_to_display_ids() {
        let mut session = ConsoleSession::new();
        let id = session
            .create_ball(0.0, 0.0, 0.0, 1.0, 0.0, "marble")
            .unwrap();
        session.log.clear();

        session.list_entities();
        let entries = session.log.entries();
        assert_eq!(entries[0].text, "1 entities in scene:");
        assert_eq!(entries[1].text, format!("  {} marble", id.display_id()));
    }
}
