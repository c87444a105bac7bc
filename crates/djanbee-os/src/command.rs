use std::path::Path;
use std::process::Command;

use djanbee_core::CommandResult;
use tracing::debug;

/// Runs one external command to completion. `args[0]` is the program.
pub trait CommandRunner {
    fn run(&self, args: &[String], cwd: Option<&Path>, elevated: bool) -> CommandResult;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, args: &[String], cwd: Option<&Path>, elevated: bool) -> CommandResult {
        let Some(mut command) = build_command(args, cwd, elevated) else {
            return CommandResult::failed("no command given");
        };

        debug!(target: "djanbee.os", command = %args.join(" "), elevated, "running command");
        match command.output() {
            Ok(output) => CommandResult {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                exit_code: output.status.code().unwrap_or(-1),
            },
            Err(err) => CommandResult::failed(format!("failed to launch {}: {err}", args[0])),
        }
    }
}

pub(crate) fn build_command(args: &[String], cwd: Option<&Path>, elevated: bool) -> Option<Command> {
    let (program, rest) = args.split_first()?;
    let mut command = if elevated {
        let mut sudo = Command::new("sudo");
        sudo.arg(program);
        sudo
    } else {
        Command::new(program)
    };
    command.args(rest);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    Some(command)
}
