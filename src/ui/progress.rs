//! Spinners and progress bars, plain lines when not on a terminal

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner around one slow store call
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    pub fn stop(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => println!("{} {}", style("[OK]").green(), message),
        }
    }

    pub fn stop_error(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => println!("{} {}", style("[FAIL]").red(), message),
        }
    }

    /// Remove the spinner without a final line
    pub fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.clear();
        }
    }
}

/// Bar over a sequence of destroy calls
pub struct DestroyProgress {
    bar: Option<ProgressBar>,
}

impl DestroyProgress {
    pub fn new(ctx: &UiContext, total: usize) -> Self {
        if !ctx.use_fancy_output() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("  {spinner:.cyan} Destroying {bar:20.cyan/dim} {pos}/{len} {msg:.dim}")
        {
            bar.set_style(bar_style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    /// Announce the cache about to be destroyed
    pub fn begin(&self, name: &str) {
        match self.bar {
            Some(ref bar) => bar.set_message(name.to_string()),
            None => println!("{} destroying {}", style("...").dim(), name),
        }
    }

    pub fn advance(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
