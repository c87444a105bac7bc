use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use djanbee_core::{
    default_config_path, CommandResult, Config, FlowError, Session, CONFIG_ENV_VAR,
};
use djanbee_django::{ProjectService, RequirementsService, ServiceDisplay, VenvService};
use djanbee_os::{OsManager, SystemManager};
use djanbee_postgres::PostgresManager;
use tracing::{debug, info};

use crate::completion::write_completions_script;
use crate::display::TerminalDisplay;
use crate::render::TerminalRenderer;
use crate::status::{collect_status, format_status_lines};
use crate::{Cli, Commands, ServiceAction};

/// Everything one invocation's flows share.
pub(crate) struct AppContext<'a> {
    pub(crate) os: &'a dyn OsManager,
    pub(crate) display: &'a dyn ServiceDisplay,
    pub(crate) session: &'a Session,
    pub(crate) config: &'a Config,
    pub(crate) renderer: TerminalRenderer,
}

impl<'a> AppContext<'a> {
    fn projects(&self) -> ProjectService<'a> {
        ProjectService::new(self.os, self.display, self.session)
            .with_search_depth(self.config.search_depth)
    }

    fn venvs(&self) -> VenvService<'a> {
        VenvService::new(self.os, self.display, self.session)
            .with_venv_dir(&self.config.venv_dir)
            .with_search_depth(self.config.search_depth)
    }

    fn requirements(&self) -> RequirementsService<'a> {
        RequirementsService::new(self.os, self.display, self.session)
            .with_output_name(self.config.requirements_file.clone())
            .with_search_depth(self.config.search_depth)
    }

    fn drivers(&self) -> PostgresManager<'a> {
        PostgresManager::new(self.os).with_packages(self.config.driver_packages.clone())
    }
}

pub(crate) fn run_cli<H: OsManager + SystemManager>(cli: Cli, host: &H) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    debug!(target: "djanbee.config", ?config, "configuration loaded");

    let renderer = TerminalRenderer::current();
    let display = TerminalDisplay::new(renderer, cli.yes);
    let session = Session::new();
    let ctx = AppContext {
        os: host,
        display: &display,
        session: &session,
        config: &config,
        renderer,
    };

    match cli.command {
        Commands::Project => run_project(&ctx).map(|_| ()),
        Commands::Venv => run_venv(&ctx).map(|_| ()),
        Commands::Requirements { install } => run_requirements(&ctx, install),
        Commands::Drivers => run_drivers(&ctx),
        Commands::Setup => run_setup(&ctx),
        Commands::Status { json } => run_status(&ctx, json),
        Commands::Doctor => run_doctor(&ctx, host, cli.config.as_deref()),
        Commands::Service { action, name } => run_service(renderer, host, action, name.as_deref()),
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            write_completions_script(shell, &mut stdout)?;
            stdout.flush().context("failed flushing completion script")
        }
    }
}

fn run_project(ctx: &AppContext<'_>) -> Result<PathBuf> {
    ctx.renderer.print_section("project");
    let projects = ctx.projects();
    let project = projects
        .select_project()
        .ok_or_else(|| anyhow!("no Django project selected"))?;

    match projects.find_settings_file() {
        Some(settings) => ctx
            .renderer
            .print_status("ok", &format!("Settings file: {}", settings.display())),
        None => ctx
            .renderer
            .print_status("warn", "No settings file found for this project"),
    }
    Ok(project)
}

fn run_venv(ctx: &AppContext<'_>) -> Result<PathBuf> {
    ctx.renderer.print_section("virtual environment");
    let info = ctx
        .venvs()
        .find_or_create_venv()
        .ok_or_else(|| anyhow!("no virtual environment available"))?;
    ctx.renderer.print_status(
        "ok",
        &format!(
            "Using virtual environment {} at {}",
            info.virtual_env_name,
            info.virtual_env.display()
        ),
    );
    Ok(info.virtual_env)
}

pub(crate) fn run_requirements(ctx: &AppContext<'_>, install: bool) -> Result<()> {
    ctx.renderer.print_section("requirements");
    let venv = ctx.venvs().get_active_venv().map(|info| info.virtual_env);
    let service = ctx.requirements();
    let manifest = service.find_or_extract_requirements(venv.as_deref())?;
    if install {
        service.install_requirements_if_confirmed(&manifest, venv.as_deref())?;
    }
    Ok(())
}

pub(crate) fn run_drivers(ctx: &AppContext<'_>) -> Result<()> {
    let venv = run_venv(ctx)?;
    ctx.renderer.print_section("postgres drivers");
    reconcile_drivers(ctx, &venv)
}

fn reconcile_drivers(ctx: &AppContext<'_>, venv: &Path) -> Result<()> {
    let drivers = ctx.drivers();
    let missing = drivers.check_dependencies(venv);
    if missing.is_empty() {
        ctx.display.success("All Postgres deps installed");
        return Ok(());
    }

    ctx.display
        .progress(&format!("Missing Postgres deps: {}", missing.join(", ")));
    let spinner = ctx.renderer.start_spinner("drivers");
    let result = drivers.install_missing(venv, &missing);
    if result.success {
        spinner.finish();
        ctx.display.success(&result.stdout);
        Ok(())
    } else {
        spinner.abandon();
        bail!("{}", result.failure_text())
    }
}

/// Project, environment, requirements and drivers in order. A declined
/// requirements step is reported and the remaining steps still run.
pub(crate) fn run_setup(ctx: &AppContext<'_>) -> Result<()> {
    let project = run_project(ctx)?;
    info!(target: "djanbee.project", project = %project.display(), "setup project selected");
    let venv = run_venv(ctx)?;

    ctx.renderer.print_section("requirements");
    let service = ctx.requirements();
    match service
        .find_or_extract_requirements(Some(venv.as_path()))
        .and_then(|manifest| {
            service.install_requirements_if_confirmed(&manifest, Some(venv.as_path()))
        })
    {
        Ok(()) => {}
        Err(FlowError::Declined) => ctx
            .renderer
            .print_status("warn", "Skipping requirements installation"),
        Err(err) => return Err(err.into()),
    }

    ctx.renderer.print_section("postgres drivers");
    reconcile_drivers(ctx, &venv)?;

    let snapshot = ctx.session.snapshot();
    ctx.renderer.print_section("summary");
    ctx.renderer.print_lines(&[
        format!("project: {}", display_path(snapshot.current_project_path.as_deref())),
        format!("venv: {}", display_path(snapshot.active_venv_path.as_deref())),
        format!(
            "requirements: {}",
            display_path(snapshot.current_requirements_path.as_deref())
        ),
    ]);
    Ok(())
}

fn run_status(ctx: &AppContext<'_>, json: bool) -> Result<()> {
    let report = collect_status(ctx.os, ctx.config)?;
    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize status report")?;
        println!("{rendered}");
    } else {
        ctx.renderer.print_section("status");
        ctx.renderer.print_lines(&format_status_lines(&report));
    }
    Ok(())
}

fn run_doctor<H: OsManager + SystemManager>(
    ctx: &AppContext<'_>,
    host: &H,
    explicit_config: Option<&Path>,
) -> Result<()> {
    ctx.renderer.print_section("doctor");
    let python = host.run_python_command(&["--version".to_string()]);
    let checks = [
        (
            python.success,
            format!("python: {}", doctor_detail(&python)),
        ),
        (true, format!("user: {}", host.username())),
        (
            true,
            format!("administrator: {}", yes_no(host.is_admin())),
        ),
        (
            host.check_package_installed("psql"),
            "postgres client (psql) on PATH".to_string(),
        ),
        (
            host.check_service_status("postgresql"),
            "postgresql service active".to_string(),
        ),
    ];

    for (passed, message) in &checks {
        ctx.renderer
            .print_status(if *passed { "ok" } else { "warn" }, message);
    }

    let config_source = explicit_config
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .or_else(default_config_path);
    ctx.renderer.print_status(
        "step",
        &format!("config: {}", display_path(config_source.as_deref())),
    );

    if python.success {
        Ok(())
    } else {
        bail!("no usable python interpreter found")
    }
}

pub(crate) fn run_service<H: SystemManager>(
    renderer: TerminalRenderer,
    host: &H,
    action: ServiceAction,
    name: Option<&str>,
) -> Result<()> {
    if action == ServiceAction::Reload {
        return report_service_result(renderer, "daemon reload", host.reload_daemon());
    }

    let Some(name) = name else {
        bail!("service {} requires a service name", action.as_str());
    };

    let result = match action {
        ServiceAction::Status => {
            let active = host.check_service_status(name);
            renderer.print_status(
                if active { "ok" } else { "warn" },
                &format!("{name} is {}", if active { "active" } else { "inactive" }),
            );
            return Ok(());
        }
        ServiceAction::Start => host.start_service(name),
        ServiceAction::Stop => host.stop_service(name),
        ServiceAction::Restart => host.restart_service(name),
        ServiceAction::Enable => host.enable_service(name),
        ServiceAction::Reload => host.reload_daemon(),
    };
    report_service_result(renderer, &format!("{} {name}", action.as_str()), result)
}

fn report_service_result(
    renderer: TerminalRenderer,
    label: &str,
    result: CommandResult,
) -> Result<()> {
    if result.success {
        renderer.print_status("ok", &format!("{label} succeeded"));
        Ok(())
    } else {
        bail!("{label} failed: {}", result.failure_text())
    }
}

fn doctor_detail(result: &CommandResult) -> String {
    if result.success {
        let version = if result.stdout.is_empty() {
            result.stderr.as_str()
        } else {
            result.stdout.as_str()
        };
        version.to_string()
    } else {
        result.failure_text().to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| "none".to_string())
}
