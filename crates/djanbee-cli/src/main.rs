use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use djanbee_os::{Platform, UnixOsManager, WindowsOsManager};

mod completion;
mod dispatch;
mod display;
mod logging;
mod render;
mod status;

use crate::render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "djanbee")]
#[command(about = "Locate, prepare and provision Django projects", long_about = None)]
struct Cli {
    /// Config file; overrides DJANBEE_CONFIG and the per-user default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Answer yes to every confirmation.
    #[arg(short = 'y', long, global = true)]
    yes: bool,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Locate the Django project and its settings file.
    Project,
    /// Find, select or create a virtual environment.
    Venv,
    /// Find or extract the requirements manifest.
    Requirements {
        #[arg(long)]
        install: bool,
    },
    /// Install missing Postgres drivers into the active environment.
    Drivers,
    /// Run project, venv, requirements and drivers in order.
    Setup,
    Status {
        #[arg(long)]
        json: bool,
    },
    Doctor,
    Service {
        action: ServiceAction,
        name: Option<String>,
    },
    Completions {
        shell: Shell,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ServiceAction {
    Status,
    Start,
    Stop,
    Restart,
    Enable,
    Reload,
}

impl ServiceAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Enable => "enable",
            Self::Reload => "reload",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        TerminalRenderer::current().print_status("err", &format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match Platform::host() {
        Platform::Unix => dispatch::run_cli(cli, &UnixOsManager::new()),
        Platform::Windows => dispatch::run_cli(cli, &WindowsOsManager::new()),
    }
}
