use std::path::{Path, PathBuf};

use anyhow::Result;
use djanbee_core::CommandResult;

use crate::command::{CommandRunner, ProcessRunner};
use crate::fs_utils::set_dir;
use crate::platform::{host_current_directory, to_args, OsManager, Platform, SystemManager};

#[derive(Debug, Clone, Default)]
pub struct UnixOsManager<R = ProcessRunner> {
    runner: R,
}

impl UnixOsManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> UnixOsManager<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, parts: &[&str], elevated: bool) -> CommandResult {
        self.runner.run(&to_args(parts), None, elevated)
    }

    fn python_executable(&self) -> Option<PathBuf> {
        which::which("python3")
            .or_else(|_| which::which("python"))
            .ok()
    }
}

impl<R: CommandRunner> OsManager for UnixOsManager<R> {
    fn platform(&self) -> Platform {
        Platform::Unix
    }

    fn run_command(&self, args: &[String], cwd: Option<&Path>, elevated: bool) -> CommandResult {
        self.runner.run(args, cwd, elevated)
    }

    fn run_python_command(&self, args: &[String]) -> CommandResult {
        let Some(python) = self.python_executable() else {
            return CommandResult::failed("Could not find any python executable");
        };
        let mut command = vec![python.to_string_lossy().into_owned()];
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

impl<R: CommandRunner> SystemManager for UnixOsManager<R> {
    fn check_package_installed(&self, name: &str) -> bool {
        self.run(&["which", name], false).success
    }

    fn install_package(&self, name: &str) -> CommandResult {
        let update = self.run(&["apt-get", "update"], true);
        if !update.success {
            return update;
        }
        self.run(&["apt-get", "install", "-y", name], true)
    }

    fn check_service_status(&self, service: &str) -> bool {
        let result = self.run(&["systemctl", "is-active", service], false);
        result.success && result.stdout.trim() == "active"
    }

    fn start_service(&self, service: &str) -> CommandResult {
        self.run(&["systemctl", "start", service], true)
    }

    fn stop_service(&self, service: &str) -> CommandResult {
        self.run(&["systemctl", "stop", service], true)
    }

    fn restart_service(&self, service: &str) -> CommandResult {
        self.run(&["systemctl", "restart", service], true)
    }

    fn enable_service(&self, service: &str) -> CommandResult {
        self.run(&["systemctl", "enable", service], true)
    }

    fn reload_daemon(&self) -> CommandResult {
        self.run(&["systemctl", "daemon-reload"], true)
    }

    fn username(&self) -> String {
        let result = self.run(&["whoami"], false);
        if result.success {
            result.stdout
        } else {
            String::new()
        }
    }

    fn is_admin(&self) -> bool {
        let result = self.run(&["id", "-u"], false);
        result.success && result.stdout.trim() == "0"
    }

    fn user_exists(&self, username: &str) -> bool {
        self.run(&["id", username], false).success
    }
}
