//! # Check Command
//!
//! Verifies that every eligible file carries the configured header. Exits
//! with status 1 when any file is missing it or could not be read.

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use super::common::{CommonArgs, load_run_config};
use crate::output::{
  print_all_files_ok, print_blank_line, print_check_summary, print_failed_files, print_hint, print_non_compliant_files,
  print_reports_written, print_start_message,
};
use crate::processor::{Processor, scan_repository};
use crate::report::generate_reports;

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  #[command(flatten)]
  pub common: CommonArgs,
}

/// Run the check command with the given arguments
pub fn run_check(args: CheckArgs) -> Result<()> {
  args.common.init_output();

  let config = load_run_config(&args.common, args.common.to_layer())?;

  let scan = scan_repository(
    &config.scan_root(),
    &config.include_extensions,
    &config.exclude_paths,
    &config.repo_root,
  );

  print_start_message(scan.eligible.len(), false, false);

  let start_time = Instant::now();
  let result = Processor::new(&config.header, false).check_all(&scan);
  let elapsed = start_time.elapsed();

  let repo_root = Some(config.repo_root.as_path());
  print_blank_line();

  if result.is_compliant() {
    print_all_files_ok();
  } else {
    print_non_compliant_files(&result.non_compliant, repo_root);
    if !result.failed.is_empty() {
      if !result.non_compliant.is_empty() {
        print_blank_line();
      }
      print_failed_files(&result.failed, repo_root);
    }
  }

  print_blank_line();
  print_check_summary(&result, elapsed);

  if !result.non_compliant.is_empty() {
    print_blank_line();
    print_hint("Run `license-header apply` to add missing headers.");
  }

  if let Some(output_dir) = config.resolved_output_dir() {
    let written = generate_reports((&result).into(), &output_dir, repo_root)
      .with_context(|| format!("Failed to write reports to {}", output_dir.display()))?;
    print_reports_written(&written, repo_root);
  }

  if !result.is_compliant() {
    process::exit(1);
  }

  Ok(())
}
