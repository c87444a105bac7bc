use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use djanbee_django::ServiceDisplay;
use tracing::warn;

use crate::render::TerminalRenderer;

/// Prompts through dialoguer; with `--yes` every confirmation is accepted
/// without reading the terminal.
pub(crate) struct TerminalDisplay {
    renderer: TerminalRenderer,
    assume_yes: bool,
    theme: ColorfulTheme,
}

impl TerminalDisplay {
    pub(crate) fn new(renderer: TerminalRenderer, assume_yes: bool) -> Self {
        Self {
            renderer,
            assume_yes,
            theme: ColorfulTheme::default(),
        }
    }
}

impl ServiceDisplay for TerminalDisplay {
    fn progress(&self, message: &str) {
        self.renderer.print_status("step", message);
    }

    fn success(&self, message: &str) {
        self.renderer.print_status("ok", message);
    }

    fn failure(&self, message: &str) {
        self.renderer.print_status("warn", message);
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            self.renderer
                .print_status("step", &format!("{question} yes (--yes)"));
            return true;
        }

        match Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(true)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!(target: "djanbee.prompt", error = %err, "confirmation unavailable, treating as declined");
                false
            }
        }
    }

    fn select(&self, prompt: &str, choices: &[(String, PathBuf)]) -> Option<usize> {
        let labels = choice_labels(choices);
        match Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
        {
            Ok(selection) => selection,
            Err(err) => {
                warn!(target: "djanbee.prompt", error = %err, "selection unavailable, treating as cancelled");
                None
            }
        }
    }
}

/// Read-only reporting: nothing is printed and every prompt is declined.
pub(crate) struct QuietDisplay;

impl ServiceDisplay for QuietDisplay {
    fn progress(&self, _message: &str) {}

    fn success(&self, _message: &str) {}

    fn failure(&self, _message: &str) {}

    fn confirm(&self, _question: &str) -> bool {
        false
    }

    fn select(&self, _prompt: &str, _choices: &[(String, PathBuf)]) -> Option<usize> {
        None
    }
}

pub(crate) fn choice_labels(choices: &[(String, PathBuf)]) -> Vec<String> {
    choices
        .iter()
        .map(|(name, path)| format!("{name} ({})", path.display()))
        .collect()
}
