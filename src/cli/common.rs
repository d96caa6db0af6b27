//! # Shared Command Setup
//!
//! Arguments accepted by every subcommand, and the startup sequence they
//! share: logging, workspace discovery and configuration loading.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::config::{Config, ConfigLayer, load_config};
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::verbose_log;
use crate::workspace::resolve_workspace;

/// Arguments shared by `apply` and `check`
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
  /// Header file to apply (default: LICENSE_HEADER in the repository root)
  #[arg(long, value_name = "FILE")]
  pub header: Option<PathBuf>,

  /// Path to config file (default: license-header.config.json in the
  /// repository root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Directory to scan, relative to the repository root
  #[arg(long, value_name = "PATH")]
  pub path: Option<PathBuf>,

  /// Only process files with this extension (repeatable, case-insensitive)
  #[arg(long, value_name = "EXT")]
  pub include_extension: Vec<String>,

  /// Skip paths matching this pattern (repeatable, supports glob patterns)
  #[arg(long, value_name = "PATTERN")]
  pub exclude_path: Vec<String>,

  /// Write JSON and Markdown reports to this directory
  #[arg(long, value_name = "DIR")]
  pub output: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and the paths needing attention
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl CommonArgs {
  /// The configuration layer these flags describe.
  ///
  /// Repeatable flags that were never given stay unset so lower layers apply.
  pub fn to_layer(&self) -> ConfigLayer {
    ConfigLayer {
      header_file: self.header.clone(),
      include_extensions: Some(self.include_extension.clone()),
      exclude_paths: Some(self.exclude_path.clone()),
      output_dir: self.output.clone(),
      path: self.path.clone(),
      dry_run: None,
    }
  }

  /// Installs logging and applies the output and color modes.
  pub fn init_output(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }
}

/// Discovers the repository root and resolves the configuration.
///
/// Configuration errors are printed as `ERROR: ...` and end the process with
/// status 1.
pub fn load_run_config(args: &CommonArgs, layer: ConfigLayer) -> Result<Config> {
  let workspace = resolve_workspace()?;
  debug!(
    "Using repository root: {} (git: {})",
    workspace.root().display(),
    workspace.is_git()
  );

  let config = match load_config(layer, args.config.as_deref(), workspace.root()) {
    Ok(config) => config,
    Err(e) => {
      eprintln!("ERROR: {e}");
      process::exit(1);
    }
  };

  print_config(&config);
  Ok(config)
}

/// Prints the resolved configuration in verbose mode.
fn print_config(config: &Config) {
  verbose_log!("Repository root: {}", config.repo_root.display());
  verbose_log!("Header file: {}", config.header_file.display());
  verbose_log!("Scan path: {}", config.path.display());
  verbose_log!("Include extensions: {}", config.include_extensions.join(", "));
  verbose_log!("Exclude paths: {}", config.exclude_paths.join(", "));
  if let Some(ref output_dir) = config.output_dir {
    verbose_log!("Output directory: {}", output_dir.display());
  }
  if config.dry_run {
    verbose_log!("Dry run: no files will be modified");
  }
}
