use std::path::Path;

use djanbee_core::CommandResult;
use djanbee_os::{OsManager, PipManager};
use tracing::{debug, info};

/// psycopg2 and its binary wheel, in installation order.
pub const DEFAULT_DRIVER_PACKAGES: [&str; 2] = ["psycopg2", "psycopg2-binary"];

/// Keeps the Postgres driver packages present in a virtual environment.
pub struct PostgresManager<'a> {
    pip: PipManager<'a>,
    required: Vec<String>,
}

impl<'a> PostgresManager<'a> {
    pub fn new(os: &'a dyn OsManager) -> Self {
        Self {
            pip: PipManager::new(os),
            required: DEFAULT_DRIVER_PACKAGES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.required = packages;
        self
    }

    pub fn required_packages(&self) -> &[String] {
        &self.required
    }

    /// Required packages absent from `venv_path`, in required order.
    pub fn check_dependencies(&self, venv_path: &Path) -> Vec<String> {
        self.required
            .iter()
            .filter(|package| !self.pip.is_installed(package, venv_path))
            .cloned()
            .collect()
    }

    /// Installs each missing package in turn and stops at the first failure.
    pub fn ensure_dependencies(&self, venv_path: &Path) -> CommandResult {
        let missing = self.check_dependencies(venv_path);
        self.install_missing(venv_path, &missing)
    }

    /// Installs `missing` as already reported by `check_dependencies`,
    /// without querying pip again.
    pub fn install_missing(&self, venv_path: &Path, missing: &[String]) -> CommandResult {
        if missing.is_empty() {
            return CommandResult::ok("All Postgres deps installed");
        }

        debug!(target: "djanbee.drivers", missing = %missing.join(", "), "installing drivers");
        for package in missing {
            let result = self.pip.install(package, venv_path);
            if !result.success {
                return CommandResult {
                    success: false,
                    stdout: String::new(),
                    stderr: format!("Failed to install {package}: {}", result.failure_text()),
                    exit_code: result.exit_code,
                };
            }
            info!(target: "djanbee.drivers", %package, "driver installed");
        }

        CommandResult::ok("Installed missing Postgres deps")
    }
}

#[cfg(test)]
mod tests;
