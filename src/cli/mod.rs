//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing with one subcommand per operation:
//! `apply` inserts missing headers and `check` reports files without one.

mod apply;
mod check;
mod common;

pub use apply::{ApplyArgs, run_apply};
pub use check::{CheckArgs, run_check};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
pub use common::CommonArgs;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Version with commit hash and date, assembled by the build script.
const LONG_VERSION: &str = env!("LICENSE_HEADER_LONG_VERSION");

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  name = "license-header",
  author,
  version,
  long_version = LONG_VERSION,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Add the header in LICENSE_HEADER to every eligible file
  license-header apply

  # Preview changes and show a diff without touching any file
  license-header apply --dry-run --show-diff

  # Use a custom header and only process Python and Rust files
  license-header apply --header NOTICE.txt --include-extension .py --include-extension .rs

  # Check headers in CI, skipping vendored code, and write reports
  license-header check --exclude-path \"**/vendor\" --output reports
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Add the license header to every eligible file that lacks it
  Apply(ApplyArgs),
  /// Verify that every eligible file carries the license header
  Check(CheckArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use clap::CommandFactory;

  use super::*;
  use crate::logging::ColorMode;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_apply_args() {
    let cli = Cli::try_parse_from([
      "license-header",
      "apply",
      "--header",
      "NOTICE",
      "--include-extension",
      ".py",
      "--include-extension",
      ".rs",
      "--exclude-path",
      "vendor",
      "--dry-run",
      "--show-diff",
      "-vv",
    ])
    .unwrap();

    let Command::Apply(args) = cli.command else {
      panic!("expected apply");
    };
    assert_eq!(args.common.header, Some(PathBuf::from("NOTICE")));
    assert_eq!(args.common.include_extension, vec![".py", ".rs"]);
    assert_eq!(args.common.exclude_path, vec!["vendor"]);
    assert_eq!(args.common.verbose, 2);
    assert!(args.dry_run);
    assert!(args.show_diff);
    assert_eq!(args.common.colors, ColorMode::Auto);
  }

  #[test]
  fn test_parse_check_args() {
    let cli = Cli::try_parse_from(["license-header", "check", "--path", "src", "--output", "reports", "-q"]).unwrap();

    let Command::Check(args) = cli.command else {
      panic!("expected check");
    };
    assert_eq!(args.common.path, Some(PathBuf::from("src")));
    assert_eq!(args.common.output, Some(PathBuf::from("reports")));
    assert!(args.common.quiet);
  }

  #[test]
  fn test_check_rejects_dry_run() {
    assert!(Cli::try_parse_from(["license-header", "check", "--dry-run"]).is_err());
  }

  #[test]
  fn test_quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["license-header", "check", "-q", "-v"]).is_err());
  }

  #[test]
  fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["license-header"]).is_err());
  }
}
