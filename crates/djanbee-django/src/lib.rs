mod display;
mod project;
mod requirements;
mod settings;
mod venv;

pub use display::ServiceDisplay;
pub use project::{is_django_project, ProjectDiscovery, ProjectService};
pub use requirements::{has_requirements, RequirementsService, REQUIREMENTS_FILE_NAMES};
pub use settings::{
    conventional_settings_candidates, module_to_path, resolve_settings_file,
    settings_module_reference, SettingsMatch, SettingsSource,
};
pub use venv::VenvService;
