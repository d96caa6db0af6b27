//! # File Collector Module
//!
//! Deterministic repository scanning.
//!
//! The walk is iterative over an explicit work-list and never follows
//! symlinked directories. Every regular file the walk reaches lands in
//! exactly one bucket of the [`ScanResult`], and every bucket is sorted, so
//! the result depends only on the filesystem state and not on directory
//! iteration order.
//!
//! Excluded directories are pruned before descent: nothing below them is
//! visited, so their files appear in no bucket.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::file_filter::{CompositeFilter, FileCandidate, FileFilter, SkipReason, create_default_filter};
use crate::ignore::{DEFAULT_EXCLUDE_DIRS, ExcludeMatcher};
use crate::workspace::resolve_path;

/// Categorized files found by a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
  /// Files eligible for header processing
  pub eligible: Vec<PathBuf>,
  /// Files with a null byte in their first 8 KiB, or unreadable
  pub skipped_binary: Vec<PathBuf>,
  /// Files matching an exclude pattern
  pub skipped_excluded: Vec<PathBuf>,
  /// Symbolic links to files, including broken links
  pub skipped_symlink: Vec<PathBuf>,
  /// Files that could not be inspected
  pub skipped_permission: Vec<PathBuf>,
  /// Files whose extension is not included
  pub skipped_extension: Vec<PathBuf>,
}

impl ScanResult {
  /// Total number of files seen by the scan.
  pub fn total_files(&self) -> usize {
    self.eligible.len()
      + self.skipped_binary.len()
      + self.skipped_excluded.len()
      + self.skipped_symlink.len()
      + self.skipped_permission.len()
      + self.skipped_extension.len()
  }

  /// All skipped files in category order: binary, excluded, symlink,
  /// permission, extension.
  pub fn skipped(&self) -> Vec<PathBuf> {
    [
      &self.skipped_binary,
      &self.skipped_excluded,
      &self.skipped_symlink,
      &self.skipped_permission,
      &self.skipped_extension,
    ]
    .into_iter()
    .flatten()
    .cloned()
    .collect()
  }

  fn push_skipped(&mut self, reason: SkipReason, path: PathBuf) {
    let bucket = match reason {
      SkipReason::Binary => &mut self.skipped_binary,
      SkipReason::Excluded => &mut self.skipped_excluded,
      SkipReason::Symlink => &mut self.skipped_symlink,
      SkipReason::Permission => &mut self.skipped_permission,
      SkipReason::Extension => &mut self.skipped_extension,
    };
    bucket.push(path);
  }

  fn sort(&mut self) {
    for bucket in [
      &mut self.eligible,
      &mut self.skipped_binary,
      &mut self.skipped_excluded,
      &mut self.skipped_symlink,
      &mut self.skipped_permission,
      &mut self.skipped_extension,
    ] {
      bucket.sort();
    }
  }
}

/// A directory waiting to be visited.
struct PendingDir {
  path: PathBuf,
  relative: Vec<String>,
}

/// File collector for repository traversal.
///
/// The `FileCollector` handles:
/// - Walking the tree below a scan root without following symlinks
/// - Pruning excluded directories before descending
/// - Classifying each file through the filter chain
pub struct FileCollector {
  matcher: ExcludeMatcher,
  filter: CompositeFilter,
}

impl FileCollector {
  /// Creates a collector.
  ///
  /// # Parameters
  ///
  /// * `include_extensions` - Extensions eligible for processing
  /// * `exclude_patterns` - User exclude patterns, combined with the defaults
  /// * `repo_root` - Repository root paths are matched against
  pub fn new<S: AsRef<str>>(include_extensions: &[S], exclude_patterns: &[String], repo_root: &Path) -> Self {
    let matcher = ExcludeMatcher::new(repo_root, exclude_patterns);
    let filter = create_default_filter(matcher.clone(), include_extensions);
    Self { matcher, filter }
  }

  /// Scans the tree below `root`.
  ///
  /// Reported paths are `root` joined with the names found on disk. A root
  /// that does not exist, or that lies outside the repository, yields an
  /// empty result.
  pub fn scan(&self, root: &Path) -> ScanResult {
    let mut result = ScanResult::default();
    let start_time = Instant::now();

    let resolved_root = resolve_path(root);
    if !resolved_root.is_dir() {
      error!("Scan root {} is not a readable directory", root.display());
      return result;
    }

    let Some(root_relative) = self.matcher.relative_segments(&resolved_root) else {
      warn!(
        "Scan root {} is outside repository root {}",
        root.display(),
        self.matcher.repo_root().display()
      );
      return result;
    };

    info!("Scanning repository at {}", root.display());
    debug!("Default exclude directories: {:?}", DEFAULT_EXCLUDE_DIRS);

    let mut dirs_to_process = vec![PendingDir {
      path: root.to_path_buf(),
      relative: root_relative,
    }];

    while let Some(dir) = dirs_to_process.pop() {
      if self.matcher.is_excluded_relative(&dir.relative) {
        debug!("Skipping excluded directory: {}", dir.path.display());
        continue;
      }

      let entries = match fs::read_dir(&dir.path) {
        Ok(entries) => entries,
        Err(e) => {
          warn!("Error reading directory {}: {}", dir.path.display(), e);
          continue;
        }
      };

      let mut entries: Vec<fs::DirEntry> = entries
        .filter_map(|entry| match entry {
          Ok(entry) => Some(entry),
          Err(e) => {
            warn!("Error reading entry in {}: {}", dir.path.display(), e);
            None
          }
        })
        .collect();
      entries.sort_by_key(fs::DirEntry::file_name);

      let mut subdirs = Vec::new();
      for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = dir.path.join(entry.file_name());
        let mut relative = dir.relative.clone();
        relative.push(name);

        let listed_type = match entry.file_type() {
          Ok(file_type) => file_type,
          Err(e) => {
            warn!("Error accessing {}: {}", path.display(), e);
            result.skipped_permission.push(path);
            continue;
          }
        };

        if listed_type.is_dir() {
          if self.matcher.is_excluded_relative(&relative) {
            debug!("Skipping excluded directory: {}", path.display());
          } else {
            subdirs.push(PendingDir { path, relative });
          }
          continue;
        }

        // Listing a directory needs only read access; stat needs search access too
        let file_type = match fs::symlink_metadata(&path) {
          Ok(metadata) => metadata.file_type(),
          Err(e) => {
            warn!("Permission denied reading {}: {}", path.display(), e);
            result.skipped_permission.push(path);
            continue;
          }
        };

        if file_type.is_symlink() {
          if path.is_dir() {
            debug!("Skipping symlink directory: {}", path.display());
          } else {
            debug!("Skipping symlink file: {}", path.display());
            result.skipped_symlink.push(path);
          }
          continue;
        }

        if !file_type.is_file() {
          debug!("Skipping non-file: {}", path.display());
          continue;
        }

        let candidate = FileCandidate {
          path: &path,
          relative: &relative,
        };
        let verdict = self.filter.should_process(&candidate);
        match verdict.reason {
          Some(reason) => result.push_skipped(reason, path),
          None => {
            debug!("Eligible file: {}", path.display());
            result.eligible.push(path);
          }
        }
      }

      // Reverse so the stack pops subdirectories in name order
      dirs_to_process.extend(subdirs.into_iter().rev());
    }

    result.sort();

    info!(
      "Scan complete: {} eligible, {} binary, {} excluded, {} symlinks, {} permission errors, {} wrong extension",
      result.eligible.len(),
      result.skipped_binary.len(),
      result.skipped_excluded.len(),
      result.skipped_symlink.len(),
      result.skipped_permission.len(),
      result.skipped_extension.len()
    );
    debug!("Scan took {}ms", start_time.elapsed().as_millis());

    result
  }
}

/// Scans `root` for files eligible for header processing.
///
/// # Parameters
///
/// * `root` - Directory to scan
/// * `include_extensions` - Extensions eligible for processing, e.g. `.py`
/// * `exclude_patterns` - Exclude patterns in addition to the defaults
/// * `repo_root` - Repository root exclude patterns are relative to
pub fn scan_repository<S: AsRef<str>>(
  root: &Path,
  include_extensions: &[S],
  exclude_patterns: &[String],
  repo_root: &Path,
) -> ScanResult {
  FileCollector::new(include_extensions, exclude_patterns, repo_root).scan(root)
}
