// UI module for consistent terminal output with progress bars and styling
//
// All user-facing output goes through here; the rest of the crate is
// denied print macros by clippy.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

fn hide_unless_tty(pb: ProgressBar) -> ProgressBar {
    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb
}

/// Progress bar for a download of known size: bytes, total and percentage
pub fn download_bar(total_size: u64, label: &str) -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new(total_size));
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {percent:>3}% {bytes}/{total_bytes} ({bytes_per_sec})",
            )
            .expect("valid progress template")
            .tick_chars(SPINNER_CHARS)
            .progress_chars("━━╺"),
    );
    pb.set_message(label.to_string());
    pb
}

/// Spinner for a download whose size the server did not announce
pub fn download_bar_indeterminate(label: &str) -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})")
            .expect("valid spinner template"),
    );
    pb.set_message(label.to_string());
    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }
    pb
}

/// Counter bar for archive extraction
pub fn extract_bar(total_entries: u64) -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new(total_entries));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} Extracted {pos}/{len} files [{bar:25.cyan/dim}]")
            .expect("valid progress template")
            .tick_chars(SPINNER_CHARS)
            .progress_chars("━━╺"),
    );
    pb
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print an info/action message with arrow
pub fn action(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a section header, preceded by a blank line
pub fn header(message: &str) {
    println!();
    println!("{}", style(format!("=== {} ===", message)).bold());
}

/// Print the launcher banner
pub fn banner(title: &str) {
    let rule = "=".repeat(60);
    println!("{}", style(&rule).cyan());
    println!("  {}", style(title).bold());
    println!("{}", style(&rule).cyan());
    println!();
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a labelled value (e.g. "Local version: 5")
pub fn status(prefix: &str, message: &str) {
    println!("{} {}", style(prefix).cyan().bold(), message);
}

/// Print a plain line
pub fn line(message: &str) {
    println!("{}", message);
}

/// Print a y/n question without a trailing newline, for line-based answers
pub fn prompt(question: &str) {
    eprint!("{} {} (y/n): ", style("?").yellow(), question);
    let _ = std::io::Write::flush(&mut std::io::stderr());
}

/// Finish a progress bar, leaving a success line behind
pub fn finish_bar_success(pb: &ProgressBar, message: &str) {
    pb.finish_and_clear();
    success(message);
}

/// Clear a progress bar without leaving a message
pub fn clear_bar(pb: &ProgressBar) {
    pb.finish_and_clear();
}
