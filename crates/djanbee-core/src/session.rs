use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub current_project_path: Option<PathBuf>,
    pub active_venv_path: Option<PathBuf>,
    pub current_requirements_path: Option<PathBuf>,
}

/// Paths resolved during one CLI invocation.
///
/// Built once in `main` and lent to every service. Each setter replaces a
/// whole field; a field that is set is taken to exist on disk until a later
/// discovery overwrites it.
#[derive(Debug, Default)]
pub struct Session {
    state: RefCell<SessionSnapshot>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_project_path(&self) -> Option<PathBuf> {
        self.state.borrow().current_project_path.clone()
    }

    pub fn active_venv_path(&self) -> Option<PathBuf> {
        self.state.borrow().active_venv_path.clone()
    }

    pub fn current_requirements_path(&self) -> Option<PathBuf> {
        self.state.borrow().current_requirements_path.clone()
    }

    pub fn set_current_project_path(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().current_project_path = Some(path.into());
    }

    pub fn set_active_venv_path(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().active_venv_path = Some(path.into());
    }

    pub fn set_current_requirements_path(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().current_requirements_path = Some(path.into());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }
}
