//! # Output Module
//!
//! This module centralizes all user-facing output for the license-header tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: In quiet mode stdout carries only the paths needing attention

use std::path::{Path, PathBuf};
use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::{ApplyResult, CheckResult};
use crate::report::display_path;

/// Symbols used in output
pub mod symbols {
  /// Success/has header
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Missing header/failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

const fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Print the initial "Checking N files..." or "Processing N files..." message.
///
/// Dry runs are marked with a `[DRY RUN]` prefix.
pub fn print_start_message(file_count: usize, modify_mode: bool, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let verb = if modify_mode { "Processing" } else { "Checking" };
  let prefix = if dry_run { "[DRY RUN] " } else { "" };

  println!("{}{} {} {}...", prefix, verb, file_count, plural(file_count));
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Prints a titled file list, truncated to [`DEFAULT_FILE_LIST_LIMIT`] unless
/// verbose. In quiet mode only the bare paths are printed, and only when
/// `needs_attention` is set.
fn print_file_list(header: String, files: &[PathBuf], repo_root: Option<&Path>, needs_attention: bool) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    if needs_attention {
      for file in files {
        println!("{}", display_path(file, repo_root));
      }
    }
    return;
  }

  println!("{}", header);

  let count = files.len();
  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", display_path(file, repo_root));
  }

  if !show_all && count > limit {
    println!(
      "  {}",
      format!("... and {} more (use -v to see all)", count - limit).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

/// Print the list of files that received the header.
pub fn print_modified_files(files: &[PathBuf], repo_root: Option<&Path>, dry_run: bool) {
  let count = files.len();
  let verb = if dry_run { "Would add" } else { "Added" };
  let header = format!(
    "{} {} header to {} {}:",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    verb,
    count,
    plural(count)
  );
  print_file_list(header, files, repo_root, false);
}

/// Print the list of files missing the header.
pub fn print_non_compliant_files(files: &[PathBuf], repo_root: Option<&Path>) {
  let count = files.len();
  let header = format!(
    "{} {} {} missing license headers:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    count,
    plural(count)
  );
  print_file_list(header, files, repo_root, true);
}

/// Print the list of files that could not be processed.
pub fn print_failed_files(files: &[PathBuf], repo_root: Option<&Path>) {
  let count = files.len();
  let header = format!(
    "{} {} {} could not be processed:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    count,
    plural(count)
  );
  print_file_list(header, files, repo_root, true);
}

/// Print the success message when all files have license headers.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files have license headers.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

fn colored_count(count: usize, bad: bool) -> String {
  if bad && count > 0 {
    count.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    count.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  }
}

fn finish_summary(mut line: String, elapsed: Duration) {
  if is_verbose() {
    line.push_str(&format!(" ({:.2}s)", elapsed.as_secs_f64()));
  }
  println!("{}", line);
}

/// Print the apply summary.
///
/// Format: "Summary: X modified, Y compliant, Z skipped, W failed"
/// In verbose mode, also shows timing.
pub fn print_apply_summary(result: &ApplyResult, elapsed: Duration) {
  if is_quiet() {
    return;
  }

  let line = format!(
    "Summary: {} modified, {} compliant, {} skipped, {} failed",
    colored_count(result.modified.len(), false),
    colored_count(result.already_compliant.len(), false),
    result.skipped.len().if_supports_color(Stream::Stdout, |s| s.dimmed()),
    colored_count(result.failed.len(), true)
  );
  finish_summary(line, elapsed);
}

/// Print the check summary.
///
/// Format: "Summary: X OK, Y missing, Z skipped, W failed"
/// In verbose mode, also shows timing.
pub fn print_check_summary(result: &CheckResult, elapsed: Duration) {
  if is_quiet() {
    return;
  }

  let line = format!(
    "Summary: {} OK, {} missing, {} skipped, {} failed",
    colored_count(result.compliant.len(), false),
    colored_count(result.non_compliant.len(), true),
    result.skipped.len().if_supports_color(Stream::Stdout, |s| s.dimmed()),
    colored_count(result.failed.len(), true)
  );
  finish_summary(line, elapsed);
}

/// Print the paths of written reports.
pub fn print_reports_written(paths: &[PathBuf], repo_root: Option<&Path>) {
  if is_quiet() {
    return;
  }

  for path in paths {
    println!("Report written to {}", display_path(path, repo_root));
  }
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plural() {
    assert_eq!(plural(0), "files");
    assert_eq!(plural(1), "file");
    assert_eq!(plural(2), "files");
  }

  #[test]
  fn test_colored_count_plain_when_colors_disabled() {
    owo_colors::set_override(false);
    assert_eq!(colored_count(3, true), "3");
    assert_eq!(colored_count(0, true), "0");
    owo_colors::unset_override();
  }
}
