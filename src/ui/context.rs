//! Terminal detection for output and prompts

use std::io::IsTerminal;

/// Environment variables set by the CI systems the harness runs under
const CI_MARKERS: &[&str] = &["CI", "JENKINS_URL", "BUILD_NUMBER", "GITHUB_ACTIONS", "TF_BUILD"];

/// How the CLI should talk to the user
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    /// Confirmations are answered yes without asking
    auto_yes: bool,
}

impl UiContext {
    /// Inspect stdin/stdout and the environment
    pub fn detect() -> Self {
        let tty = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        let ci = CI_MARKERS.iter().any(|var| std::env::var_os(var).is_some());
        Self {
            interactive: tty && !ci,
            auto_yes: false,
        }
    }

    /// Plain output, no prompts
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners, progress bars and cliclack framing
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }
}
