//! # File Filter Module
//!
//! Filters deciding whether a scanned regular file is eligible for header
//! processing. Each filter either lets the file through or names the
//! [`SkipReason`] that buckets it in the scan result.
//!
//! The scanner runs [`create_default_filter`], which applies the exclude,
//! extension and binary checks in that order. Symlinks and non-regular files
//! are sorted out by the scanner itself before any filter runs.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::ignore::ExcludeMatcher;
use crate::processor::file_io::FileIO;

/// Why a file was not eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
  /// A null byte in the first 8 KiB, or the file could not be read
  Binary,
  /// Matched an exclude pattern
  Excluded,
  /// The file is a symbolic link
  Symlink,
  /// The file could not be inspected
  Permission,
  /// The extension is not in the include list
  Extension,
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      SkipReason::Binary => "binary content",
      SkipReason::Excluded => "matches exclude pattern",
      SkipReason::Symlink => "symbolic link",
      SkipReason::Permission => "permission denied",
      SkipReason::Extension => "extension not included",
    };
    f.write_str(text)
  }
}

/// A file being evaluated by the filters.
#[derive(Debug, Clone, Copy)]
pub struct FileCandidate<'a> {
  /// Path of the file on disk
  pub path: &'a Path,
  /// Path segments relative to the repository root
  pub relative: &'a [String],
}

/// Result of a file filtering operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
  /// Whether the file should be processed
  pub should_process: bool,
  /// Reason the file should not be processed (if any)
  pub reason: Option<SkipReason>,
}

impl FilterResult {
  /// The file passes this filter.
  pub const fn process() -> Self {
    Self {
      should_process: true,
      reason: None,
    }
  }

  /// The file is skipped for `reason`.
  pub const fn skip(reason: SkipReason) -> Self {
    Self {
      should_process: false,
      reason: Some(reason),
    }
  }
}

/// Trait for components that filter files based on certain criteria.
pub trait FileFilter {
  /// Determines whether a file should be processed.
  ///
  /// # Parameters
  ///
  /// * `candidate` - The file to check
  ///
  /// # Returns
  ///
  /// A `FilterResult` indicating whether the file should be processed and why
  /// not if applicable.
  fn should_process(&self, candidate: &FileCandidate<'_>) -> FilterResult;
}

/// Skips files matching an exclude pattern.
pub struct ExcludeFilter {
  matcher: ExcludeMatcher,
}

impl ExcludeFilter {
  pub const fn new(matcher: ExcludeMatcher) -> Self {
    Self { matcher }
  }
}

impl FileFilter for ExcludeFilter {
  fn should_process(&self, candidate: &FileCandidate<'_>) -> FilterResult {
    if self.matcher.is_excluded_relative(candidate.relative) {
      debug!("Skipping excluded file: {}", candidate.path.display());
      FilterResult::skip(SkipReason::Excluded)
    } else {
      FilterResult::process()
    }
  }
}

/// Keeps only files whose extension is in the include list.
///
/// Comparison is case-insensitive. Entries are expected to carry their
/// leading dot (`.py`); a file without an extension never matches.
pub struct ExtensionFilter {
  include: HashSet<String>,
}

impl ExtensionFilter {
  /// Creates a filter for the given extensions.
  pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
    Self {
      include: extensions.iter().map(|e| e.as_ref().to_lowercase()).collect(),
    }
  }

  /// The lowercased extension of `path` with its dot, if it has one.
  pub fn extension_of(path: &Path) -> Option<String> {
    path
      .extension()
      .map(|ext| ext.to_string_lossy().to_lowercase())
      .filter(|ext| !ext.is_empty())
      .map(|ext| format!(".{ext}"))
  }
}

impl FileFilter for ExtensionFilter {
  fn should_process(&self, candidate: &FileCandidate<'_>) -> FilterResult {
    match Self::extension_of(candidate.path) {
      Some(ext) if self.include.contains(&ext) => FilterResult::process(),
      _ => {
        debug!("Skipping file with non-matching extension: {}", candidate.path.display());
        FilterResult::skip(SkipReason::Extension)
      }
    }
  }
}

/// Skips files that look binary.
pub struct BinaryFilter;

impl FileFilter for BinaryFilter {
  fn should_process(&self, candidate: &FileCandidate<'_>) -> FilterResult {
    if FileIO::is_binary(candidate.path) {
      debug!("Skipping binary file: {}", candidate.path.display());
      FilterResult::skip(SkipReason::Binary)
    } else {
      FilterResult::process()
    }
  }
}

/// Filter that combines multiple filters, stopping at the first skip.
pub struct CompositeFilter {
  filters: Vec<Box<dyn FileFilter>>,
}

impl CompositeFilter {
  /// Creates a new CompositeFilter with the given filters.
  pub fn new(filters: Vec<Box<dyn FileFilter>>) -> Self {
    Self { filters }
  }
}

impl FileFilter for CompositeFilter {
  fn should_process(&self, candidate: &FileCandidate<'_>) -> FilterResult {
    for filter in &self.filters {
      let result = filter.should_process(candidate);
      if !result.should_process {
        return result;
      }
    }
    FilterResult::process()
  }
}

/// Builds the scanner's filter chain: exclude, then extension, then binary.
///
/// # Parameters
///
/// * `matcher` - Exclude matcher for the repository
/// * `include_extensions` - Extensions eligible for processing
pub fn create_default_filter<S: AsRef<str>>(matcher: ExcludeMatcher, include_extensions: &[S]) -> CompositeFilter {
  CompositeFilter::new(vec![
    Box::new(ExcludeFilter::new(matcher)),
    Box::new(ExtensionFilter::new(include_extensions)),
    Box::new(BinaryFilter),
  ])
}
