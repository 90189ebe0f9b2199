// SPDX-FileCopyrightText: The usdbdl authors
// SPDX-License-Identifier: MPL-2.0

use std::{fmt, path::Path, time::Duration};

use colored::Colorize as _;
use indicatif::{ProgressBar, ProgressStyle};

use usdbdl::Reporter;

const SPINNER_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Human-readable progress on stdout.
///
/// Long-running steps are indicated by a transient spinner on stderr
/// that disappears when the step ends.
#[derive(Debug)]
pub(crate) struct Console {
    enabled: bool,
    spinner: Option<ProgressBar>,
}

impl Console {
    pub(crate) const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            spinner: None,
        }
    }

    fn start_spinner(&mut self, message: &str) {
        self.clear_spinner();
        if !self.enabled {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        match ProgressStyle::with_template("  {spinner} {msg}") {
            Ok(style) => spinner.set_style(style),
            Err(err) => log::debug!("Using default spinner style: {err}"),
        }
        spinner.set_message(message.to_owned());
        spinner.enable_steady_tick(SPINNER_TICK_INTERVAL);
        self.spinner = Some(spinner);
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn print(&self, line: impl fmt::Display) {
        if self.enabled {
            println!("{line}");
        }
    }

    pub(crate) fn print_header(&self, input_dir: &Path, output_dir: &Path) {
        self.print(format!("\n{}", "🎵 USDB Downloader".bold().cyan()));
        self.print(
            format!(
                "Input directory: {input_dir}",
                input_dir = input_dir.display()
            )
            .dimmed(),
        );
        self.print(
            format!(
                "Output directory: {output_dir}\n",
                output_dir = output_dir.display()
            )
            .dimmed(),
        );
    }

    pub(crate) fn print_normalized(&self, count: usize) {
        self.print(format!("✓ Normalized {count} song file(s)\n").green());
    }

    pub(crate) fn print_interrupt(&mut self) {
        self.clear_spinner();
        self.print(format!("\n{}", "⚠ Interrupted by user".yellow()));
    }

    pub(crate) fn print_failure(&mut self, message: &str) {
        self.clear_spinner();
        self.print(format!("\n{}", format!("✗ {message}").red()));
    }
}

impl Reporter for Console {
    fn report_count(&mut self, count: usize) {
        if count > 0 {
            self.print(format!("✓ Found {count} song(s) to process\n").green());
        } else {
            self.print("⚠ No valid song files found to process".yellow());
        }
    }

    fn report_item_start(&mut self, index: usize, total: usize, name: &str) {
        self.print(format!(
            "{} {}",
            format!("Processing {index}/{total}:").bold(),
            name.cyan()
        ));
    }

    fn report_item_pending(&mut self, message: &str) {
        self.start_spinner(message);
    }

    fn report_item_progress(&mut self, message: &str) {
        self.clear_spinner();
        self.print(format!("  ├─ {}", message.dimmed()));
    }

    fn report_item_success(&mut self) {
        self.clear_spinner();
        self.print(format!("  └─ {}\n", "✓ Completed".green()));
    }

    fn report_item_failure(&mut self, message: &str) {
        self.clear_spinner();
        self.print(format!("  └─ {}\n", format!("✗ {message}").red()));
    }

    fn report_summary(&mut self, processed: usize, failed: usize) {
        self.print("Summary:".bold());
        self.print(format!("  {}", format!("✓ Successful: {processed}").green()));
        if failed > 0 {
            self.print(format!("  {}", format!("✗ Failed: {failed}").red()));
        }
        self.print("");
    }
}

#[cfg(test)]
mod tests {
    use usdbdl::Reporter as _;

    use super::Console;

    #[test]
    fn spinner_lasts_until_item_ends() {
        let mut console = Console::new(true);
        console.report_item_start(1, 2, "Artist - Title");
        assert!(console.spinner.is_none());

        console.report_item_pending("Downloading audio and video (ID: dQw4w9WgXcQ)");
        assert!(console.spinner.is_some());
        console.report_item_progress("Downloading audio and video (ID: dQw4w9WgXcQ)");
        assert!(console.spinner.is_none());

        console.report_item_pending("Downloading audio and video (ID: dQw4w9WgXcQ)");
        console.report_item_failure("Download failed");
        assert!(console.spinner.is_none());

        console.report_item_pending("Downloading audio and video (ID: dQw4w9WgXcQ)");
        console.print_interrupt();
        assert!(console.spinner.is_none());
    }

    #[test]
    fn quiet_console_has_no_spinner() {
        let mut console = Console::new(false);
        console.report_item_pending("Downloading audio and video (ID: dQw4w9WgXcQ)");
        assert!(console.spinner.is_none());
        console.report_item_success();
        assert!(console.spinner.is_none());
    }
}
