use std::path::{Path, PathBuf};

use anyhow::Result;
use djanbee_core::CommandResult;

use crate::command::{CommandRunner, ProcessRunner};
use crate::fs_utils::set_dir;
use crate::platform::{host_current_directory, to_args, OsManager, Platform, SystemManager};

/// Windows has no `sudo`; elevation requests are dropped and commands run as
/// the current user.
#[derive(Debug, Clone, Default)]
pub struct WindowsOsManager<R = ProcessRunner> {
    runner: R,
}

impl WindowsOsManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> WindowsOsManager<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, parts: &[&str]) -> CommandResult {
        self.runner.run(&to_args(parts), None, false)
    }
}

impl<R: CommandRunner> OsManager for WindowsOsManager<R> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn run_command(&self, args: &[String], cwd: Option<&Path>, _elevated: bool) -> CommandResult {
        self.runner.run(args, cwd, false)
    }

    fn run_python_command(&self, args: &[String]) -> CommandResult {
        let mut command = vec!["python".to_string()];
        command.extend_from_slice(args);
        self.runner.run(&command, None, false)
    }

    fn current_directory(&self) -> Result<PathBuf> {
        host_current_directory()
    }

    fn change_directory(&self, path: &Path) -> Result<()> {
        set_dir(path)
    }

    fn environment_variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

impl<R: CommandRunner> SystemManager for WindowsOsManager<R> {
    fn check_package_installed(&self, name: &str) -> bool {
        self.run(&["where", name]).success
    }

    fn install_package(&self, name: &str) -> CommandResult {
        self.run(&[
            "winget",
            "install",
            "--exact",
            name,
            "--accept-source-agreements",
            "--accept-package-agreements",
        ])
    }

    fn check_service_status(&self, service: &str) -> bool {
        let result = self.run(&["sc", "query", service]);
        result.success && result.stdout.contains("RUNNING")
    }

    fn start_service(&self, service: &str) -> CommandResult {
        self.run(&["sc", "start", service])
    }

    fn stop_service(&self, service: &str) -> CommandResult {
        self.run(&["sc", "stop", service])
    }

    fn restart_service(&self, service: &str) -> CommandResult {
        let stop = self.stop_service(service);
        if !stop.success {
            return stop;
        }
        self.start_service(service)
    }

    fn enable_service(&self, service: &str) -> CommandResult {
        self.run(&["sc", "config", service, "start=auto"])
    }

    fn reload_daemon(&self) -> CommandResult {
        CommandResult::ok("")
    }

    fn username(&self) -> String {
        let result = self.run(&["whoami"]);
        if result.success {
            result.stdout
        } else {
            String::new()
        }
    }

    // `net session` only succeeds from an elevated prompt.
    fn is_admin(&self) -> bool {
        self.run(&["net", "session"]).success
    }

    fn user_exists(&self, username: &str) -> bool {
        self.run(&["net", "user", username]).success
    }
}
