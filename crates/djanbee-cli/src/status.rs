use std::path::PathBuf;

use anyhow::Result;
use djanbee_core::{Config, Session};
use djanbee_django::{
    resolve_settings_file, ProjectDiscovery, ProjectService, RequirementsService, VenvService,
};
use djanbee_os::OsManager;
use serde::Serialize;

use crate::display::QuietDisplay;

/// Read-only snapshot of what the discovery services see from the current
/// directory. Collecting it never prompts and never changes directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) platform: String,
    pub(crate) current_directory: PathBuf,
    pub(crate) project: Option<PathBuf>,
    pub(crate) project_candidates: Vec<PathBuf>,
    pub(crate) settings_file: Option<PathBuf>,
    pub(crate) settings_source: Option<String>,
    pub(crate) active_venv: Option<PathBuf>,
    pub(crate) environments: Vec<PathBuf>,
    pub(crate) requirements: Option<PathBuf>,
}

pub(crate) fn collect_status(os: &dyn OsManager, config: &Config) -> Result<StatusReport> {
    let session = Session::new();
    let display = QuietDisplay;
    let mut report = StatusReport {
        platform: os.platform().as_str().to_string(),
        current_directory: os.current_directory()?,
        ..StatusReport::default()
    };

    let projects =
        ProjectService::new(os, &display, &session).with_search_depth(config.search_depth);
    match projects.find_django_project() {
        Some(ProjectDiscovery::InPlace(path)) => {
            if let Some(found) = resolve_settings_file(&path) {
                report.settings_file = Some(found.path);
                report.settings_source = Some(found.source.as_str().to_string());
            }
            report.project = Some(path);
        }
        Some(ProjectDiscovery::Candidates(candidates)) => report.project_candidates = candidates,
        None => {}
    }

    let venvs = VenvService::new(os, &display, &session)
        .with_venv_dir(&config.venv_dir)
        .with_search_depth(config.search_depth);
    report.active_venv = venvs.get_active_venv().map(|info| info.virtual_env);
    report.environments = venvs.find_envs();

    report.requirements = RequirementsService::new(os, &display, &session)
        .with_output_name(config.requirements_file.clone())
        .with_search_depth(config.search_depth)
        .find_requirements();

    Ok(report)
}

pub(crate) fn format_status_lines(report: &StatusReport) -> Vec<String> {
    let mut lines = vec![
        format!("platform: {}", report.platform),
        format!("directory: {}", report.current_directory.display()),
        format!("project: {}", display_optional(report.project.as_ref())),
    ];

    if !report.project_candidates.is_empty() {
        lines.push(format!(
            "project candidates: {}",
            join_paths(&report.project_candidates)
        ));
    }

    match (&report.settings_file, &report.settings_source) {
        (Some(path), Some(source)) => {
            lines.push(format!("settings: {} ({source})", path.display()))
        }
        (Some(path), None) => lines.push(format!("settings: {}", path.display())),
        _ => lines.push("settings: none".to_string()),
    }

    lines.push(format!(
        "active venv: {}",
        display_optional(report.active_venv.as_ref())
    ));
    if report.environments.is_empty() {
        lines.push("environments: none".to_string());
    } else {
        lines.push(format!("environments: {}", join_paths(&report.environments)));
    }
    lines.push(format!(
        "requirements: {}",
        display_optional(report.requirements.as_ref())
    ));
    lines
}

fn display_optional(path: Option<&PathBuf>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
