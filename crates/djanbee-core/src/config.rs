use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV_VAR: &str = "DJANBEE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_venv_dir")]
    pub venv_dir: String,
    #[serde(default = "default_search_depth")]
    pub search_depth: usize,
    #[serde(default = "default_requirements_file")]
    pub requirements_file: String,
    #[serde(default = "default_driver_packages")]
    pub driver_packages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            venv_dir: default_venv_dir(),
            search_depth: default_search_depth(),
            requirements_file: default_requirements_file(),
            driver_packages: default_driver_packages(),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse djanbee config")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given (it must exist), else `DJANBEE_CONFIG`, else
    /// the per-user default. A missing per-user default yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_file(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.venv_dir.trim().is_empty() {
            return Err(anyhow!("venv_dir must not be empty"));
        }
        if self.requirements_file.trim().is_empty() {
            return Err(anyhow!("requirements_file must not be empty"));
        }
        if self.search_depth == 0 {
            return Err(anyhow!("search_depth must be at least 1"));
        }
        if self.driver_packages.is_empty() {
            return Err(anyhow!("driver_packages must list at least one package"));
        }
        if self.driver_packages.iter().any(|name| name.trim().is_empty()) {
            return Err(anyhow!("driver_packages must not contain blank entries"));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var_os("APPDATA")?;
        return Some(PathBuf::from(app_data).join("djanbee").join("config.toml"));
    }

    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("djanbee")
            .join("config.toml"),
    )
}

fn default_venv_dir() -> String {
    ".venv".to_string()
}

fn default_search_depth() -> usize {
    1
}

fn default_requirements_file() -> String {
    "requirements.txt".to_string()
}

fn default_driver_packages() -> Vec<String> {
    vec!["psycopg2".to_string(), "psycopg2-binary".to_string()]
}
