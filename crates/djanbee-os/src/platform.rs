use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use djanbee_core::CommandResult;

/// Prints `1` when the interpreter runs inside an isolated environment.
pub(crate) const ISOLATION_PROBE: &str =
    "import sys; print(int(hasattr(sys, 'real_prefix') or sys.base_prefix != sys.prefix))";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Directory holding executables inside a virtual environment.
    pub fn scripts_dir(self) -> &'static str {
        match self {
            Self::Unix => "bin",
            Self::Windows => "Scripts",
        }
    }

    pub fn pip_executable(self) -> &'static str {
        match self {
            Self::Unix => "pip",
            Self::Windows => "pip.exe",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unix => "unix",
            Self::Windows => "windows",
        }
    }
}

/// Host capabilities the discovery services depend on.
pub trait OsManager {
    fn platform(&self) -> Platform;

    fn run_command(&self, args: &[String], cwd: Option<&Path>, elevated: bool) -> CommandResult;

    /// Runs the system Python with `args`; fails when no interpreter is found.
    fn run_python_command(&self, args: &[String]) -> CommandResult;

    fn current_directory(&self) -> Result<PathBuf>;

    fn change_directory(&self, path: &Path) -> Result<()>;

    fn environment_variable(&self, name: &str) -> Option<String>;

    /// Whether the interpreter on PATH reports a base prefix distinct from its prefix.
    fn interpreter_is_isolated(&self) -> bool {
        let result = self.run_python_command(&["-c".to_string(), ISOLATION_PROBE.to_string()]);
        result.success && result.stdout.trim() == "1"
    }

    fn pip_path(&self, venv_path: &Path) -> PathBuf {
        let platform = self.platform();
        venv_path
            .join(platform.scripts_dir())
            .join(platform.pip_executable())
    }

    fn is_venv_directory(&self, path: &Path) -> bool {
        self.file_exists(&path.join("pyvenv.cfg"))
            && self.directory_exists(&path.join(self.platform().scripts_dir()))
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// System administration commands: packages, services and accounts.
pub trait SystemManager {
    fn check_package_installed(&self, name: &str) -> bool;
    fn install_package(&self, name: &str) -> CommandResult;
    fn check_service_status(&self, service: &str) -> bool;
    fn start_service(&self, service: &str) -> CommandResult;
    fn stop_service(&self, service: &str) -> CommandResult;
    fn restart_service(&self, service: &str) -> CommandResult;
    fn enable_service(&self, service: &str) -> CommandResult;
    fn reload_daemon(&self) -> CommandResult;
    fn username(&self) -> String;
    fn is_admin(&self) -> bool;
    fn user_exists(&self, username: &str) -> bool;
}

pub(crate) fn host_current_directory() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.canonicalize().unwrap_or(cwd))
}

pub(crate) fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
