use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

use djanbee_core::CommandResult;
use djanbee_os::{CommandRunner, UnixOsManager};

use super::*;

#[derive(Default)]
struct ScriptedRunner {
    calls: RefCell<Vec<Vec<String>>>,
    responses: RefCell<VecDeque<CommandResult>>,
}

impl ScriptedRunner {
    fn new(responses: Vec<CommandResult>) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            responses: RefCell::new(responses.into()),
        }
    }

    fn pip_subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call[1..].join(" "))
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, args: &[String], _cwd: Option<&Path>, _elevated: bool) -> CommandResult {
        self.calls.borrow_mut().push(args.to_vec());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| CommandResult::ok(""))
    }
}

fn failed(stderr: &str) -> CommandResult {
    CommandResult {
        success: false,
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: 1,
    }
}

fn venv() -> &'static Path {
    Path::new("/srv/shop/.venv")
}

#[test]
fn check_dependencies_reports_missing_in_required_order() {
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![
        CommandResult::ok("Django==4.2\npsycopg2==2.9.9"),
        CommandResult::ok("Django==4.2\npsycopg2==2.9.9"),
    ]));
    let drivers = PostgresManager::new(&os);

    assert_eq!(drivers.check_dependencies(venv()), vec!["psycopg2-binary"]);
    assert_eq!(
        os.runner().pip_subcommands(),
        vec!["list --format=freeze", "list --format=freeze"]
    );
}

#[test]
fn ensure_dependencies_skips_installs_when_complete() {
    let listing = "psycopg2==2.9.9\npsycopg2-binary==2.9.9";
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![
        CommandResult::ok(listing),
        CommandResult::ok(listing),
    ]));

    let result = PostgresManager::new(&os).ensure_dependencies(venv());
    assert!(result.success);
    assert_eq!(result.stdout, "All Postgres deps installed");
    assert_eq!(os.runner().calls.borrow().len(), 2);
}

#[test]
fn ensure_dependencies_stops_at_first_failed_install() {
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![
        CommandResult::ok("Django==4.2"),
        CommandResult::ok("Django==4.2"),
        CommandResult::ok("Successfully installed psycopg2-2.9.9"),
        failed("Error: pg_config executable not found."),
    ]));

    let result = PostgresManager::new(&os).ensure_dependencies(venv());

    assert!(!result.success);
    assert!(result.stderr.contains("psycopg2-binary"));
    assert!(result.stderr.contains("pg_config executable not found"));
    assert_eq!(
        result.stderr,
        "Failed to install psycopg2-binary: Error: pg_config executable not found."
    );
    assert_eq!(
        os.runner().pip_subcommands(),
        vec![
            "list --format=freeze",
            "list --format=freeze",
            "install psycopg2",
            "install psycopg2-binary",
        ]
    );
}

#[test]
fn ensure_dependencies_does_not_continue_after_first_failure() {
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![
        CommandResult::ok(""),
        CommandResult::ok(""),
        failed("network unreachable"),
    ]));

    let result = PostgresManager::new(&os).ensure_dependencies(venv());
    assert_eq!(result.stderr, "Failed to install psycopg2: network unreachable");
    assert_eq!(os.runner().calls.borrow().len(), 3);
}

#[test]
fn ensure_dependencies_reports_aggregate_success() {
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![
        CommandResult::ok("psycopg2==2.9.9"),
        CommandResult::ok("psycopg2==2.9.9"),
    ]));

    let result = PostgresManager::new(&os).ensure_dependencies(venv());
    assert!(result.success);
    assert_eq!(result.stdout, "Installed missing Postgres deps");
    assert_eq!(
        os.runner().pip_subcommands().last().map(String::as_str),
        Some("install psycopg2-binary")
    );
}

#[test]
fn custom_driver_list_replaces_defaults() {
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![CommandResult::ok("")]));
    let drivers = PostgresManager::new(&os).with_packages(vec!["psycopg".to_string()]);

    assert_eq!(drivers.required_packages(), ["psycopg".to_string()]);
    assert_eq!(drivers.check_dependencies(venv()), vec!["psycopg"]);
}

#[test]
fn install_missing_reuses_checked_list_without_relisting() {
    let os = UnixOsManager::with_runner(ScriptedRunner::new(vec![
        CommandResult::ok("psycopg2==2.9.9"),
        CommandResult::ok("psycopg2==2.9.9"),
    ]));
    let drivers = PostgresManager::new(&os);

    let missing = drivers.check_dependencies(venv());
    let result = drivers.install_missing(venv(), &missing);

    assert!(result.success);
    assert_eq!(
        os.runner().pip_subcommands(),
        vec![
            "list --format=freeze",
            "list --format=freeze",
            "install psycopg2-binary",
        ]
    );
}

#[test]
fn install_missing_with_nothing_missing_runs_no_commands() {
    let os = UnixOsManager::with_runner(ScriptedRunner::default());
    let result = PostgresManager::new(&os).install_missing(venv(), &[]);

    assert!(result.success);
    assert_eq!(result.stdout, "All Postgres deps installed");
    assert!(os.runner().calls.borrow().is_empty());
}
