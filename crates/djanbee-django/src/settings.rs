use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

/// Which lookup step produced a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    ManageReference,
    Conventional,
    RecursiveSearch,
}

impl SettingsSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageReference => "manage.py reference",
            Self::Conventional => "conventional location",
            Self::RecursiveSearch => "recursive search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsMatch {
    pub path: PathBuf,
    pub source: SettingsSource,
}

fn settings_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"DJANGO_SETTINGS_MODULE["']?\s*,\s*["']([^"']+)["']"#)
            .expect("settings reference pattern is valid")
    })
}

/// Dotted module named as the second argument next to
/// `DJANGO_SETTINGS_MODULE`. Keyword or reordered arguments do not match.
pub fn settings_module_reference(manage_source: &str) -> Option<String> {
    settings_reference_pattern()
        .captures(manage_source)
        .and_then(|captures| captures.get(1))
        .map(|module| module.as_str().to_string())
}

/// `a.b.settings` under `root` becomes `root/a/b/settings.py`.
pub fn module_to_path(root: &Path, module: &str) -> PathBuf {
    let mut parts = module.split('.').collect::<Vec<_>>();
    let last = parts.pop().unwrap_or(module);
    let mut path = root.to_path_buf();
    for part in parts {
        path.push(part);
    }
    path.join(format!("{last}.py"))
}

pub fn conventional_settings_candidates(root: &Path) -> Vec<PathBuf> {
    let name = root.file_name().map(PathBuf::from).unwrap_or_default();
    vec![
        root.join(&name).join("settings.py"),
        root.join("settings.py"),
        root.join("config").join("settings.py"),
        root.join(&name).join("settings").join("base.py"),
        root.join("settings").join("base.py"),
        root.join("config").join("settings").join("base.py"),
    ]
}

/// Evaluates the lookup steps in order and stops at the first regular file:
/// the module referenced by `manage.py`, the conventional locations, then the
/// first `settings.py` anywhere below `root`.
pub fn resolve_settings_file(root: &Path) -> Option<SettingsMatch> {
    let mut ordered = Vec::new();
    if let Some(module) = read_manage_reference(root) {
        ordered.push((module_to_path(root, &module), SettingsSource::ManageReference));
    }
    ordered.extend(
        conventional_settings_candidates(root)
            .into_iter()
            .map(|path| (path, SettingsSource::Conventional)),
    );

    if let Some((path, source)) = ordered.into_iter().find(|(path, _)| path.is_file()) {
        return Some(SettingsMatch { path, source });
    }

    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == "settings.py")
        .map(|entry| SettingsMatch {
            path: entry.into_path(),
            source: SettingsSource::RecursiveSearch,
        })
}

fn read_manage_reference(root: &Path) -> Option<String> {
    let manage = root.join("manage.py");
    let bytes = fs::read(manage).ok()?;
    settings_module_reference(&String::from_utf8_lossy(&bytes))
}
