use std::fs;
use std::path::{Path, PathBuf};

use djanbee_core::Session;
use djanbee_os::{search_folder, search_subfolders, OsManager};
use tracing::{debug, info, warn};

use crate::display::ServiceDisplay;
use crate::settings::resolve_settings_file;

/// Where a project was found. An in-place match always wins over subfolders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectDiscovery {
    InPlace(PathBuf),
    Candidates(Vec<PathBuf>),
}

pub struct ProjectService<'a> {
    os: &'a dyn OsManager,
    display: &'a dyn ServiceDisplay,
    session: &'a Session,
    search_depth: usize,
}

impl<'a> ProjectService<'a> {
    pub fn new(os: &'a dyn OsManager, display: &'a dyn ServiceDisplay, session: &'a Session) -> Self {
        Self {
            os,
            display,
            session,
            search_depth: 1,
        }
    }

    pub fn with_search_depth(mut self, search_depth: usize) -> Self {
        self.search_depth = search_depth.max(1);
        self
    }

    /// Finds a project, asks the operator to pick one when the match came from
    /// subfolders, switches into it and records it in the session.
    pub fn select_project(&self) -> Option<PathBuf> {
        self.display.progress("Searching for Django project...");
        let Some(discovery) = self.find_django_project() else {
            self.display.failure("Django project not found");
            return None;
        };

        let project = match discovery {
            ProjectDiscovery::InPlace(path) => path,
            ProjectDiscovery::Candidates(candidates) => self.select_and_enter(&candidates)?,
        };

        self.session.set_current_project_path(project.clone());
        info!(target: "djanbee.project", path = %project.display(), "project selected");
        self.display
            .success(&format!("Django project found at {}", project.display()));
        Some(project)
    }

    fn select_and_enter(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        let choices = named_choices(candidates);
        let index = self
            .display
            .select("Select a Django project", &choices)?;
        let (_, path) = choices.into_iter().nth(index)?;

        if let Err(err) = self.os.change_directory(&path) {
            warn!(target: "djanbee.project", path = %path.display(), "{err:#}");
            self.display.failure(&format!("{err:#}"));
            return None;
        }
        Some(path)
    }

    pub fn find_django_project(&self) -> Option<ProjectDiscovery> {
        if let Some(path) = self.find_django_project_in_current_dir() {
            return Some(ProjectDiscovery::InPlace(path));
        }

        let candidates = self.find_django_projects_in_tree();
        if candidates.is_empty() {
            None
        } else {
            Some(ProjectDiscovery::Candidates(candidates))
        }
    }

    pub fn find_django_project_in_current_dir(&self) -> Option<PathBuf> {
        let cwd = self.current_directory()?;
        search_folder(&cwd, is_django_project)
    }

    pub fn find_django_projects_in_tree(&self) -> Vec<PathBuf> {
        let Some(cwd) = self.current_directory() else {
            return Vec::new();
        };
        match search_subfolders(&cwd, is_django_project, self.search_depth) {
            Ok(found) => {
                debug!(target: "djanbee.project", root = %cwd.display(), count = found.len(), "subfolder search");
                found
            }
            Err(err) => {
                warn!(target: "djanbee.project", "{err:#}");
                Vec::new()
            }
        }
    }

    /// Settings module of the session's current project, if one is selected.
    pub fn find_settings_file(&self) -> Option<PathBuf> {
        let root = self.session.current_project_path()?;
        let found = resolve_settings_file(&root)?;
        debug!(
            target: "djanbee.project",
            path = %found.path.display(),
            source = found.source.as_str(),
            "settings file resolved"
        );
        Some(found.path)
    }

    fn current_directory(&self) -> Option<PathBuf> {
        match self.os.current_directory() {
            Ok(cwd) => Some(cwd),
            Err(err) => {
                warn!(target: "djanbee.project", "{err:#}");
                None
            }
        }
    }
}

/// A directory with a top-level `manage.py` mentioning django in any case.
pub fn is_django_project(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let manage = path.join("manage.py");
    if !manage.exists() {
        return false;
    }
    match fs::read(&manage) {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .to_lowercase()
            .contains("django"),
        Err(_) => false,
    }
}

pub(crate) fn named_choices(paths: &[PathBuf]) -> Vec<(String, PathBuf)> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (name, path.clone())
        })
        .collect()
}
