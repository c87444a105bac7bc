use std::path::PathBuf;

/// Terminal side of the interactive flows.
///
/// Prompts never fail from the services' point of view: an implementation that
/// cannot read an answer reports a declined confirmation or a cancelled
/// selection.
pub trait ServiceDisplay {
    fn progress(&self, message: &str);
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
    fn confirm(&self, question: &str) -> bool;
    /// Index into `choices`, or `None` when the operator cancels.
    fn select(&self, prompt: &str, choices: &[(String, PathBuf)]) -> Option<usize>;
}
