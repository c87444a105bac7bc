use std::path::{Path, PathBuf};

use djanbee_core::{EnvironmentInfo, Session};
use djanbee_os::{search_subfolders, OsManager};
use tracing::{debug, info, warn};

use crate::display::ServiceDisplay;
use crate::project::named_choices;

pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

pub struct VenvService<'a> {
    os: &'a dyn OsManager,
    display: &'a dyn ServiceDisplay,
    session: &'a Session,
    venv_dir: PathBuf,
    search_depth: usize,
}

impl<'a> VenvService<'a> {
    pub fn new(os: &'a dyn OsManager, display: &'a dyn ServiceDisplay, session: &'a Session) -> Self {
        Self {
            os,
            display,
            session,
            venv_dir: PathBuf::from(".venv"),
            search_depth: 1,
        }
    }

    /// Directory name used when a new environment has to be created.
    pub fn with_venv_dir(mut self, venv_dir: impl Into<PathBuf>) -> Self {
        self.venv_dir = venv_dir.into();
        self
    }

    pub fn with_search_depth(mut self, search_depth: usize) -> Self {
        self.search_depth = search_depth.max(1);
        self
    }

    /// An environment counts as active only when `VIRTUAL_ENV` is set and the
    /// interpreter itself reports isolation; a stale variable alone is ignored.
    pub fn get_active_venv(&self) -> Option<EnvironmentInfo> {
        let virtual_env = self.os.environment_variable(VIRTUAL_ENV_VAR)?;
        if !self.os.interpreter_is_isolated() {
            debug!(target: "djanbee.venv", %virtual_env, "VIRTUAL_ENV set but interpreter is not isolated");
            return None;
        }

        let info = EnvironmentInfo::from_path(virtual_env);
        self.session.set_active_venv_path(info.virtual_env.clone());
        Some(info)
    }

    pub fn is_venv(&self, path: &Path) -> bool {
        self.os.is_venv_directory(path)
    }

    pub fn find_envs(&self) -> Vec<PathBuf> {
        let cwd = match self.os.current_directory() {
            Ok(cwd) => cwd,
            Err(err) => {
                warn!(target: "djanbee.venv", "{err:#}");
                return Vec::new();
            }
        };
        match search_subfolders(&cwd, |path| self.is_venv(path), self.search_depth) {
            Ok(found) => found,
            Err(err) => {
                warn!(target: "djanbee.venv", "{err:#}");
                Vec::new()
            }
        }
    }

    /// Creates an environment (pip included) at `path`, relative paths being
    /// taken from the current directory.
    pub fn create_environment(&self, path: &Path) -> Option<EnvironmentInfo> {
        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            match self.os.current_directory() {
                Ok(cwd) => cwd.join(path),
                Err(err) => {
                    self.display
                        .failure(&format!("Failed to create virtual environment: {err:#}"));
                    return None;
                }
            }
        };

        self.display.progress(&format!(
            "Creating virtual environment at {}...",
            target.display()
        ));
        let result = self.os.run_python_command(&[
            "-m".to_string(),
            "venv".to_string(),
            target.to_string_lossy().into_owned(),
        ]);
        if !result.success {
            self.display.failure(&format!(
                "Failed to create virtual environment: {}",
                result.failure_text()
            ));
            return None;
        }

        info!(target: "djanbee.venv", path = %target.display(), "virtual environment created");
        self.display.success(&format!(
            "Virtual environment created at {}",
            target.display()
        ));
        Some(EnvironmentInfo::from_path(target))
    }

    pub fn find_or_create_venv(&self) -> Option<EnvironmentInfo> {
        self.display.progress("Searching for virtual environment...");
        if let Some(active) = self.get_active_venv() {
            self.display.success(&format!(
                "Virtual environment {} is active",
                active.virtual_env_name
            ));
            return Some(active);
        }

        self.display.failure("No active virtual environment");
        let candidates = self.find_envs();
        let info = if candidates.is_empty() {
            self.display
                .failure("No virtual environments found in this directory");
            if !self
                .display
                .confirm("Would you like to create a virtual environment?")
            {
                return None;
            }
            self.create_environment(&self.venv_dir)?
        } else {
            let choices = named_choices(&candidates);
            let index = self
                .display
                .select("Select a virtual environment", &choices)?;
            let (_, path) = choices.into_iter().nth(index)?;
            EnvironmentInfo::from_path(path)
        };

        self.session.set_active_venv_path(info.virtual_env.clone());
        self.display.success(&format!(
            "Using virtual environment {} at {}",
            info.virtual_env_name,
            info.virtual_env.display()
        ));
        Some(info)
    }
}
