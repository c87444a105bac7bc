use std::path::{Path, PathBuf};

use djanbee_core::{FlowError, Session};
use djanbee_os::{search_folder, search_subfolders, write_text_file, OsManager, PipManager};
use tracing::{debug, info, warn};

use crate::display::ServiceDisplay;

pub const REQUIREMENTS_FILE_NAMES: [&str; 3] = [
    "requirements.txt",
    "requirements-dev.txt",
    "requirements-prod.txt",
];

pub fn has_requirements(path: &Path) -> bool {
    REQUIREMENTS_FILE_NAMES
        .iter()
        .any(|name| path.join(name).is_file())
}

pub struct RequirementsService<'a> {
    os: &'a dyn OsManager,
    display: &'a dyn ServiceDisplay,
    session: &'a Session,
    output_name: String,
    search_depth: usize,
}

impl<'a> RequirementsService<'a> {
    pub fn new(os: &'a dyn OsManager, display: &'a dyn ServiceDisplay, session: &'a Session) -> Self {
        Self {
            os,
            display,
            session,
            output_name: REQUIREMENTS_FILE_NAMES[0].to_string(),
            search_depth: 1,
        }
    }

    /// File name written by extraction. A name outside the conventional three
    /// is also searched for, ahead of them.
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    pub fn with_search_depth(mut self, search_depth: usize) -> Self {
        self.search_depth = search_depth.max(1);
        self
    }

    pub fn find_requirements(&self) -> Option<PathBuf> {
        let cwd = match self.os.current_directory() {
            Ok(cwd) => cwd,
            Err(err) => {
                warn!(target: "djanbee.requirements", "{err:#}");
                return None;
            }
        };

        let has_manifest = |path: &Path| self.first_manifest_in(path).is_some();
        let folder = search_folder(&cwd, has_manifest).or_else(|| {
            match search_subfolders(&cwd, has_manifest, self.search_depth) {
                Ok(found) => found.into_iter().next(),
                Err(err) => {
                    warn!(target: "djanbee.requirements", "{err:#}");
                    None
                }
            }
        })?;

        let manifest = self.first_manifest_in(&folder)?;
        debug!(target: "djanbee.requirements", path = %manifest.display(), "manifest found");
        self.session.set_current_requirements_path(manifest.clone());
        Some(manifest)
    }

    fn manifest_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(REQUIREMENTS_FILE_NAMES.len() + 1);
        if !REQUIREMENTS_FILE_NAMES.contains(&self.output_name.as_str()) {
            names.push(self.output_name.as_str());
        }
        names.extend(REQUIREMENTS_FILE_NAMES);
        names
    }

    fn first_manifest_in(&self, folder: &Path) -> Option<PathBuf> {
        self.manifest_names()
            .into_iter()
            .map(|name| folder.join(name))
            .find(|path| self.os.file_exists(path))
    }

    /// Writes `pip freeze` of `venv_path` verbatim into the current directory.
    pub fn extract_requirements(&self, venv_path: &Path) -> Result<PathBuf, FlowError> {
        let output_path = self.os.current_directory()?.join(&self.output_name);

        let freeze = PipManager::new(self.os).freeze(venv_path);
        if !freeze.success {
            return Err(FlowError::Command(freeze.failure_text().to_string()));
        }
        write_text_file(&output_path, &freeze.stdout)?;

        info!(target: "djanbee.requirements", path = %output_path.display(), "requirements extracted");
        self.session.set_current_requirements_path(output_path.clone());
        Ok(output_path)
    }

    pub fn install_requirements(
        &self,
        venv_path: &Path,
        requirements_path: &Path,
    ) -> Result<(), FlowError> {
        if !self.os.file_exists(requirements_path) {
            return Err(FlowError::ManifestMissing(requirements_path.to_path_buf()));
        }

        let result = PipManager::new(self.os).install_requirements(venv_path, requirements_path);
        if result.success {
            info!(target: "djanbee.requirements", venv = %venv_path.display(), "requirements installed");
            Ok(())
        } else {
            Err(FlowError::Command(result.failure_text().to_string()))
        }
    }

    /// Uses `venv_path`, falling back to the session's active environment.
    pub fn find_or_extract_requirements(&self, venv_path: Option<&Path>) -> Result<PathBuf, FlowError> {
        self.display.progress("Searching for requirements file...");
        if let Some(found) = self.find_requirements() {
            self.display
                .success(&format!("Requirements found at {}", found.display()));
            return Ok(found);
        }

        self.display.failure("No requirements file found");
        if !self
            .display
            .confirm("Extract requirements from the active virtual environment?")
        {
            return Err(FlowError::Declined);
        }

        let venv = self.resolve_venv(venv_path)?;
        match self.extract_requirements(&venv) {
            Ok(path) => {
                self.display
                    .success(&format!("Requirements extracted to {}", path.display()));
                Ok(path)
            }
            Err(err) => {
                self.display
                    .failure(&format!("Failed to extract requirements: {err}"));
                Err(err)
            }
        }
    }

    pub fn install_requirements_if_confirmed(
        &self,
        requirements_path: &Path,
        venv_path: Option<&Path>,
    ) -> Result<(), FlowError> {
        if !self.display.confirm("Install requirements now?") {
            return Err(FlowError::Declined);
        }

        self.display.progress("Installing requirements...");
        let venv = self.resolve_venv(venv_path)?;
        self.install_requirements(&venv, requirements_path)?;
        self.display.success(&format!(
            "Requirements from {} installed into {}",
            requirements_path.display(),
            venv.display()
        ));
        Ok(())
    }

    fn resolve_venv(&self, venv_path: Option<&Path>) -> Result<PathBuf, FlowError> {
        venv_path
            .map(Path::to_path_buf)
            .or_else(|| self.session.active_venv_path())
            .ok_or(FlowError::NoActiveEnvironment)
    }
}
