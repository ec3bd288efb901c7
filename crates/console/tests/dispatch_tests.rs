//! End-to-end dispatcher tests: command table, error policy, scripting
//! via `exec`, and scene save/load through the codec.

use std::fs;
use std::io::Write;

use console::{Console, ConsoleSession, Severity};

fn errors(console: &Console) -> Vec<String> {
    console
        .session()
        .borrow()
        .log
        .entries()
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .map(|e| e.text.clone())
        .collect()
}

fn infos(console: &Console) -> Vec<String> {
    console
        .session()
        .borrow()
        .log
        .entries()
        .iter()
        .filter(|e| e.severity == Severity::Info)
        .map(|e| e.text.clone())
        .collect()
}

fn new_console() -> std::rc::Rc<Console> {
    Console::new(ConsoleSession::shared())
}

#[test]
fn empty_and_comment_lines_are_no_ops() {
    let console = new_console();
    console.dispatch("");
    console.dispatch("   ");
    console.dispatch("# a comment line");
    console.dispatch("#ents_clear");

    assert!(console.session().borrow().log.is_empty());
    assert!(console.session().borrow().entities.is_empty());
}

#[test]
fn unknown_command_logs_one_error() {
    let console = new_console();
    console.dispatch("frobnicate now");

    assert_eq!(errors(&console), vec!["Unknown command.".to_string()]);
}

#[test]
fn echo_logs_first_argument_verbatim() {
    let console = new_console();
    console.dispatch("echo \"hello world\"");
    console.dispatch("echo");

    assert_eq!(infos(&console), vec!["hello world".to_string()]);
}

#[test]
fn clear_empties_the_log() {
    let console = new_console();
    console.dispatch("echo one");
    console.dispatch("clear");

    assert!(console.session().borrow().log.is_empty());
}

#[test]
fn argdump_reports_sets_and_rejects() {
    let console = new_console();
    console.dispatch("argdump");
    console.dispatch("argdump true");
    console.dispatch("argdump maybe");

    assert_eq!(
        infos(&console),
        vec![
            "Argument dumping is disabled.".to_string(),
            "Enabled argument dumping.".to_string(),
        ]
    );
    assert_eq!(
        errors(&console),
        vec!["Please specify true, false, 1, or 0.".to_string()]
    );
}

#[test]
fn argdump_intercepts_every_other_command() {
    let console = new_console();
    console.dispatch("argdump 1");
    console.dispatch("ent_create_ball 1 2 3 4 5");

    // The command was dumped, not executed.
    assert!(console.session().borrow().entities.is_empty());
    let dumped = infos(&console);
    assert!(dumped.contains(&"0: ent_create_ball".to_string()));
    assert!(dumped.contains(&"5: 5".to_string()));

    // argdump itself still dispatches while the flag is set.
    console.dispatch("argdump false");
    console.dispatch("ent_create_ball 1 2 3 4 5");
    assert_eq!(console.session().borrow().entities.len(), 1);
}

#[test]
fn create_ball_requires_five_numbers() {
    let console = new_console();
    console.dispatch("ent_create_ball 1 2 3");

    assert!(console.session().borrow().entities.is_empty());
    assert_eq!(
        errors(&console),
        vec!["Please specify coordinates, size, and hue.".to_string()]
    );
}

#[test]
fn create_ball_parses_numbers_permissively() {
    let console = new_console();
    console.dispatch("ent_create_ball bogus 2 3 1 0 lenient");

    let session = console.session().borrow();
    let id = session.entities.lookup("lenient").unwrap();
    let transform = session.entities.get(id).unwrap().transform.unwrap();
    assert_eq!(transform.position.x, 0.0);
    assert_eq!(transform.position.y, 2.0);
}

#[test]
fn create_ball_accepts_quoted_names_with_spaces() {
    let console = new_console();
    console.dispatch("ent_create_ball 0 0 0 1 0 \"big red\"");

    assert!(console.session().borrow().entities.lookup("big red").is_some());
}

#[test]
fn destroy_missing_entity_logs_exactly_one_error() {
    let console = new_console();
    console.dispatch("ent_destroy nonexistent");

    assert_eq!(
        errors(&console),
        vec!["Attempted to destroy non-existent entity: \"nonexistent\".".to_string()]
    );
    assert!(console.session().borrow().entities.is_empty());
}

#[test]
fn destroy_handles_each_name_in_order() {
    let console = new_console();
    console.dispatch("ent_create_ball 0 0 0 1 0 a");
    console.dispatch("ent_create_ball 0 0 0 1 0 b");
    console.dispatch("ent_destroy a missing b");

    assert!(console.session().borrow().entities.is_empty());
    let log: Vec<(Severity, String)> = console
        .session()
        .borrow()
        .log
        .entries()
        .iter()
        .skip(2)
        .map(|e| (e.severity, e.text.clone()))
        .collect();
    assert_eq!(
        log,
        vec![
            (Severity::Info, "Destroyed entity: \"a\".".to_string()),
            (
                Severity::Error,
                "Attempted to destroy non-existent entity: \"missing\".".to_string()
            ),
            (Severity::Info, "Destroyed entity: \"b\".".to_string()),
        ]
    );
}

#[test]
fn ents_clear_reports_count_and_list_reports_zero() {
    let console = new_console();
    for i in 0..3 {
        console.dispatch(&format!("ent_create_ball {i} 0 0 1 0"));
    }
    console.dispatch("ents_clear");
    console.dispatch("ents_list");

    let log = infos(&console);
    assert!(log.contains(&"Destroyed all 3 entities.".to_string()));
    assert_eq!(log.last().unwrap(), "0 entities in scene.");
}

#[test]
fn type_prints_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "line one\nline two\n").unwrap();

    let console = new_console();
    console.dispatch(&format!("type {}", path.display()));
    console.dispatch("type");
    console.dispatch(&format!("type {}", dir.path().display()));

    assert_eq!(infos(&console), vec!["line one\nline two\n".to_string()]);
    assert_eq!(
        errors(&console),
        vec![
            "Please specify a file.".to_string(),
            "Please specify a file.".to_string(),
        ]
    );
}

#[test]
fn exec_runs_lines_in_order_and_survives_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.con");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "echo a").unwrap();
    writeln!(file, "definitely_not_a_command").unwrap();
    writeln!(file, "echo b").unwrap();
    drop(file);

    let console = new_console();
    console.dispatch(&format!("exec {}", path.display()));

    assert_eq!(infos(&console), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(errors(&console), vec!["Unknown command.".to_string()]);
}

#[test]
fn exec_recursion_is_depth_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.con");
    fs::write(&path, format!("exec {}\necho after", path.display())).unwrap();

    let console = new_console();
    console.dispatch(&format!("exec {}", path.display()));

    let errs = errors(&console);
    assert_eq!(errs, vec![format!("Script recursion too deep (max 32).")]);
    // Every level after the bailout still ran its remaining lines.
    assert_eq!(infos(&console).len(), 32);
}

#[test]
fn lua_without_runtime_is_a_logged_error() {
    let console = new_console();
    console.dispatch("lua_exec print(1)");

    assert_eq!(
        errors(&console),
        vec!["No script runtime installed.".to_string()]
    );
}

#[test]
fn save_load_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.sav");

    let console = new_console();
    console.dispatch("ent_create_ball 1 2 3 0.5 120 marble");
    console.dispatch("ent_create_ball 4 5 6 2 210");
    console.dispatch(&format!("save {}", path.display()));

    console.dispatch("ents_clear");
    console.dispatch(&format!("load {}", path.display()));

    let session = console.session().borrow();
    assert_eq!(session.entities.len(), 2);
    let id = session.entities.lookup("marble").unwrap();
    let transform = session.entities.get(id).unwrap().transform.unwrap();
    assert_eq!(transform.position.y, 2.0);
    assert_eq!(transform.scale.x, 0.5);
}

#[test]
fn load_missing_file_logs_an_error() {
    let console = new_console();
    console.dispatch("load /definitely/not/here.sav");

    assert_eq!(
        errors(&console),
        vec!["File \"/definitely/not/here.sav\" does not exist.".to_string()]
    );
}

#[test]
fn load_truncated_scene_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("scene.sav");
    let bad = dir.path().join("truncated.sav");

    let console = new_console();
    console.dispatch("ent_create_ball 1 2 3 1 0 keeper");
    console.dispatch(&format!("save {}", good.display()));

    let bytes = fs::read(&good).unwrap();
    fs::write(&bad, &bytes[..bytes.len() - 4]).unwrap();

    console.dispatch(&format!("load {}", bad.display()));

    let errs = errors(&console);
    assert_eq!(errs.len(), 1);
    assert!(errs[0].contains("decode error"));
    // The store still holds exactly the pre-load entity.
    let session = console.session().borrow();
    assert_eq!(session.entities.len(), 1);
    assert!(session.entities.lookup("keeper").is_some());
}

#[test]
fn help_lists_the_command_table() {
    let console = new_console();
    console.dispatch("help");

    let log = infos(&console);
    assert_eq!(log.len(), 1);
    for command in ["help", "echo", "ent_create_ball", "save", "load"] {
        assert!(log[0].contains(command), "help is missing {command}");
    }
}
