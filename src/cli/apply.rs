//! # Apply Command
//!
//! Inserts the configured header into every eligible file that lacks it.
//! With `--dry-run` nothing is written and `--show-diff` / `--save-diff`
//! preview the changes.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use super::common::{CommonArgs, load_run_config};
use crate::diff::DiffManager;
use crate::output::{
  print_all_files_ok, print_apply_summary, print_blank_line, print_failed_files, print_hint, print_modified_files,
  print_reports_written, print_start_message,
};
use crate::processor::{Processor, scan_repository};
use crate::report::generate_reports;

/// Arguments for the apply command
#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Report which files would change without modifying them
  #[arg(long)]
  pub dry_run: bool,

  /// Show a diff of each change in dry run mode
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of all changes to a file in dry run mode
  #[arg(long, value_name = "FILE")]
  pub save_diff: Option<PathBuf>,
}

/// Run the apply command with the given arguments
pub fn run_apply(args: ApplyArgs) -> Result<()> {
  args.common.init_output();

  let mut layer = args.common.to_layer();
  if args.dry_run {
    layer.dry_run = Some(true);
  }
  let config = load_run_config(&args.common, layer)?;

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  if diff_manager.is_enabled() && !config.dry_run {
    warn!("--show-diff and --save-diff only take effect together with --dry-run");
  }
  diff_manager.init()?;

  let scan = scan_repository(
    &config.scan_root(),
    &config.include_extensions,
    &config.exclude_paths,
    &config.repo_root,
  );

  print_start_message(scan.eligible.len(), true, config.dry_run);

  let start_time = Instant::now();
  let processor = Processor::new(&config.header, config.dry_run).with_diff_manager(diff_manager);
  let result = processor.apply_all(&scan);
  let elapsed = start_time.elapsed();

  let repo_root = Some(config.repo_root.as_path());
  print_blank_line();

  if result.modified.is_empty() && result.failed.is_empty() {
    print_all_files_ok();
  } else {
    print_modified_files(&result.modified, repo_root, config.dry_run);
    if !result.failed.is_empty() {
      if !result.modified.is_empty() {
        print_blank_line();
      }
      print_failed_files(&result.failed, repo_root);
    }
  }

  print_blank_line();
  print_apply_summary(&result, elapsed);

  if config.dry_run && !result.modified.is_empty() {
    print_blank_line();
    print_hint("Run without --dry-run to write these changes.");
  }

  if let Some(output_dir) = config.resolved_output_dir() {
    let written = generate_reports((&result).into(), &output_dir, repo_root)
      .with_context(|| format!("Failed to write reports to {}", output_dir.display()))?;
    print_reports_written(&written, repo_root);
  }

  if !result.failed.is_empty() {
    process::exit(1);
  }

  Ok(())
}
