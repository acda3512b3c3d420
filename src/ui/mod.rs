//! Terminal output for the CLI
//!
//! Uses `cliclack` framing and `indicatif` bars on a terminal, and plain
//! prefixed lines (`[OK]`, `[FAIL]`, ...) when run from a harness or CI.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    banner_failure, banner_success, intro, key_value, step_error, step_info, step_ok, step_warn,
    CHECK_PASSED, DELETION_FAILED, VERIFICATION_FAILED,
};
pub use progress::{DestroyProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, CheckerTheme};
