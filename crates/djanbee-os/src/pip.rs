use std::path::Path;

use djanbee_core::CommandResult;
use tracing::debug;

use crate::platform::OsManager;

/// pip operations against one virtual environment.
pub struct PipManager<'a> {
    os: &'a dyn OsManager,
}

impl<'a> PipManager<'a> {
    pub fn new(os: &'a dyn OsManager) -> Self {
        Self { os }
    }

    pub fn install(&self, package: &str, venv_path: &Path) -> CommandResult {
        self.run(venv_path, &["install", package])
    }

    pub fn uninstall(&self, package: &str, venv_path: &Path) -> CommandResult {
        self.run(venv_path, &["uninstall", "-y", package])
    }

    pub fn list_installed(&self, venv_path: &Path) -> CommandResult {
        self.run(venv_path, &["list", "--format=freeze"])
    }

    pub fn is_installed(&self, package: &str, venv_path: &Path) -> bool {
        let result = self.list_installed(venv_path);
        result.success
            && result
                .stdout
                .lines()
                .any(|line| line.split("==").next() == Some(package))
    }

    pub fn freeze(&self, venv_path: &Path) -> CommandResult {
        self.run(venv_path, &["freeze"])
    }

    pub fn install_requirements(&self, venv_path: &Path, requirements_path: &Path) -> CommandResult {
        let requirements = requirements_path.to_string_lossy();
        self.run(venv_path, &["install", "-r", &requirements])
    }

    fn run(&self, venv_path: &Path, args: &[&str]) -> CommandResult {
        let pip = self.os.pip_path(venv_path);
        let mut command = vec![pip.to_string_lossy().into_owned()];
        command.extend(args.iter().map(|arg| arg.to_string()));
        debug!(target: "djanbee.pip", venv = %venv_path.display(), args = %args.join(" "), "pip");
        self.os.run_command(&command, None, false)
    }
}
