//! # Processor Module
//!
//! This module contains the core functionality for applying license headers
//! to files and checking that they are present.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - Encoding-aware reading and atomic writing
//! - [`content_transformer`] - Header detection and insertion on decoded text
//! - [`file_collector`] - Deterministic repository scanning
//!
//! The [`Processor`] struct drives single files and whole scan results.
//! [`apply_headers`] and [`check_headers`] are the batch entry points: they
//! scan the configured path, process every eligible file in scan order, and
//! never abort on a per-file failure.

pub mod content_transformer;
pub mod file_collector;
pub mod file_io;

use std::fs;
use std::path::{Path, PathBuf};

pub use content_transformer::{NewlineStyle, has_header, insert_header, normalize_header};
pub use file_collector::{FileCollector, ScanResult, scan_repository};
pub use file_io::{FileError, FileIO};
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;
use crate::diff::DiffManager;
use crate::verbose_log;

/// Outcome of an apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyResult {
  /// Files that received the header (or would have, in a dry run)
  pub modified: Vec<PathBuf>,
  /// Files that already carried the header
  pub already_compliant: Vec<PathBuf>,
  /// Files the scanner did not consider eligible
  pub skipped: Vec<PathBuf>,
  /// Eligible files that could not be processed
  pub failed: Vec<PathBuf>,
}

impl ApplyResult {
  /// Total number of files seen, across all four categories.
  pub fn total_processed(&self) -> usize {
    self.modified.len() + self.already_compliant.len() + self.skipped.len() + self.failed.len()
  }

  /// Number of eligible files.
  pub fn total_eligible(&self) -> usize {
    self.modified.len() + self.already_compliant.len() + self.failed.len()
  }
}

/// Outcome of a check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
  /// Files carrying the header
  pub compliant: Vec<PathBuf>,
  /// Eligible files missing the header
  pub non_compliant: Vec<PathBuf>,
  /// Files the scanner did not consider eligible
  pub skipped: Vec<PathBuf>,
  /// Eligible files that could not be read
  pub failed: Vec<PathBuf>,
}

impl CheckResult {
  /// Number of eligible files.
  pub fn total_eligible(&self) -> usize {
    self.compliant.len() + self.non_compliant.len() + self.failed.len()
  }

  /// Total number of files seen, across all four categories.
  pub fn total_scanned(&self) -> usize {
    self.total_eligible() + self.skipped.len()
  }

  /// The check passes when no file is missing the header and none failed.
  pub fn is_compliant(&self) -> bool {
    self.non_compliant.is_empty() && self.failed.is_empty()
  }
}

/// Processor for applying and checking one header.
///
/// The `Processor` is responsible for:
/// - Detecting whether a file already carries the header
/// - Inserting the header while preserving the file's envelope
/// - Writing atomically, in place or mirrored under an output directory
/// - Rendering diffs instead of writing in dry-run mode
pub struct Processor {
  /// Header text, normalized
  header: String,

  /// Whether to report changes without writing them
  dry_run: bool,

  /// Diff rendering for dry runs
  diff_manager: Option<DiffManager>,
}

impl Processor {
  /// Creates a processor for `header`.
  ///
  /// # Parameters
  ///
  /// * `header` - Header text, normalized on construction
  /// * `dry_run` - Whether to leave files untouched
  pub fn new(header: &str, dry_run: bool) -> Self {
    Self {
      header: normalize_header(header),
      dry_run,
      diff_manager: None,
    }
  }

  /// Attaches a diff manager used for files that would change in a dry run.
  pub fn with_diff_manager(mut self, diff_manager: DiffManager) -> Self {
    self.diff_manager = Some(diff_manager);
    self
  }

  /// The normalized header.
  pub fn header(&self) -> &str {
    &self.header
  }

  /// Applies the header to a single file.
  ///
  /// # Parameters
  ///
  /// * `path` - File to process
  /// * `output_dir` - Write the result under this directory instead of in place
  /// * `scan_root` - Root the file's path is mirrored from under `output_dir`
  ///
  /// # Returns
  ///
  /// `true` if the file was modified (or would be, in a dry run), `false` if it
  /// already carried the header.
  pub fn apply_to_file(
    &self,
    path: &Path,
    output_dir: Option<&Path>,
    scan_root: Option<&Path>,
  ) -> Result<bool, FileError> {
    let decoded = FileIO::read_text(path)?;

    if has_header(&decoded.text, &self.header) {
      trace!("Header already present: {}", path.display());
      return Ok(false);
    }

    let updated = insert_header(&decoded.text, &self.header);

    if self.dry_run {
      debug!("Dry run: would add header to {}", path.display());
      if let Some(ref diff_manager) = self.diff_manager
        && let Err(e) = diff_manager.display_diff(path, &decoded.text, &updated)
      {
        warn!("Could not render diff for {}: {:#}", path.display(), e);
      }
      return Ok(true);
    }

    let (dest, permissions_from) = match output_dir {
      Some(output_dir) => {
        let dest = mirrored_destination(path, output_dir, scan_root);
        if let Some(parent) = dest.parent() {
          fs::create_dir_all(parent).map_err(|e| FileError::from_io(parent, e))?;
        }
        (dest, None)
      }
      None => (path.to_path_buf(), Some(path)),
    };

    FileIO::write_atomic(&dest, &decoded.envelope.encode(&updated), permissions_from)?;
    debug!("Added header to {}", dest.display());

    Ok(true)
  }

  /// Checks whether a single file carries the header.
  pub fn check_file(&self, path: &Path) -> Result<bool, FileError> {
    let decoded = FileIO::read_text(path)?;
    Ok(has_header(&decoded.text, &self.header))
  }

  /// Applies the header in place to every eligible file of `scan`.
  pub fn apply_all(&self, scan: &ScanResult) -> ApplyResult {
    let mut result = ApplyResult {
      skipped: scan.skipped(),
      ..ApplyResult::default()
    };

    for path in &scan.eligible {
      match self.apply_to_file(path, None, None) {
        Ok(true) => {
          verbose_log!("Modified: {}", path.display());
          result.modified.push(path.clone());
        }
        Ok(false) => result.already_compliant.push(path.clone()),
        Err(e) => {
          error!("Failed to process {}: {}", path.display(), e);
          result.failed.push(path.clone());
        }
      }
    }

    info!(
      "Apply complete: {} modified, {} already compliant, {} skipped, {} failed",
      result.modified.len(),
      result.already_compliant.len(),
      result.skipped.len(),
      result.failed.len()
    );
    result
  }

  /// Checks every eligible file of `scan`.
  pub fn check_all(&self, scan: &ScanResult) -> CheckResult {
    let mut result = CheckResult {
      skipped: scan.skipped(),
      ..CheckResult::default()
    };

    for path in &scan.eligible {
      match self.check_file(path) {
        Ok(true) => result.compliant.push(path.clone()),
        Ok(false) => {
          verbose_log!("Missing header: {}", path.display());
          result.non_compliant.push(path.clone());
        }
        Err(e) => {
          error!("Failed to check {}: {}", path.display(), e);
          result.failed.push(path.clone());
        }
      }
    }

    info!(
      "Check complete: {} compliant, {} non-compliant, {} skipped, {} failed",
      result.compliant.len(),
      result.non_compliant.len(),
      result.skipped.len(),
      result.failed.len()
    );
    result
  }
}

/// Where `path` lands under `output_dir`: its path relative to `scan_root`, or
/// just its file name when it is not under `scan_root`.
fn mirrored_destination(path: &Path, output_dir: &Path, scan_root: Option<&Path>) -> PathBuf {
  let relative = scan_root.and_then(|root| {
    path
      .strip_prefix(root)
      .ok()
      .map(Path::to_path_buf)
      .or_else(|| {
        let resolved = crate::workspace::resolve_path(path);
        resolved
          .strip_prefix(crate::workspace::resolve_path(root))
          .ok()
          .map(Path::to_path_buf)
      })
  });

  match relative {
    Some(relative) if !relative.as_os_str().is_empty() => output_dir.join(relative),
    _ => output_dir.join(path.file_name().unwrap_or(path.as_os_str())),
  }
}

/// Applies `header` to a single file.
///
/// # Parameters
///
/// * `path` - File to process
/// * `header` - Header text
/// * `dry_run` - Report the change without writing
/// * `output_dir` - Write under this directory instead of in place
/// * `scan_root` - Root mirrored under `output_dir`
///
/// # Returns
///
/// `true` if the file was (or would be) modified.
pub fn apply_header_to_file(
  path: &Path,
  header: &str,
  dry_run: bool,
  output_dir: Option<&Path>,
  scan_root: Option<&Path>,
) -> Result<bool, FileError> {
  Processor::new(header, dry_run).apply_to_file(path, output_dir, scan_root)
}

/// Checks whether a single file carries `header`.
pub fn check_file_header(path: &Path, header: &str) -> Result<bool, FileError> {
  Processor::new(header, false).check_file(path)
}

/// Applies the configured header to every eligible file under the configured
/// path.
///
/// Files are always modified in place; the output directory only receives
/// reports.
pub fn apply_headers(config: &Config) -> ApplyResult {
  apply_headers_with_diff(config, None)
}

/// Like [`apply_headers`], rendering dry-run diffs through `diff_manager`.
pub fn apply_headers_with_diff(config: &Config, diff_manager: Option<DiffManager>) -> ApplyResult {
  let scan_root = config.scan_root();
  info!("Applying headers under {}", scan_root.display());

  let scan = scan_repository(
    &scan_root,
    &config.include_extensions,
    &config.exclude_paths,
    &config.repo_root,
  );

  let mut processor = Processor::new(&config.header, config.dry_run);
  if let Some(diff_manager) = diff_manager {
    processor = processor.with_diff_manager(diff_manager);
  }
  processor.apply_all(&scan)
}

/// Checks every eligible file under the configured path for the header.
pub fn check_headers(config: &Config) -> CheckResult {
  let scan_root = config.scan_root();
  info!("Checking headers under {}", scan_root.display());

  let scan = scan_repository(
    &scan_root,
    &config.include_extensions,
    &config.exclude_paths,
    &config.repo_root,
  );

  Processor::new(&config.header, false).check_all(&scan)
}
