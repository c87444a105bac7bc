use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInfo {
    pub virtual_env: PathBuf,
    pub virtual_env_name: String,
}

impl EnvironmentInfo {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let virtual_env = path.into();
        let virtual_env_name = basename(&virtual_env);
        Self {
            virtual_env,
            virtual_env_name,
        }
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
