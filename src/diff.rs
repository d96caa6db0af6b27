//! # Diff Module
//!
//! Line diffs of would-be header insertions, shown during `apply --dry-run`.
//! Diffs are rendered from the decoded text before and after insertion, so
//! they read the same regardless of the file's encoding or BOM.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff rendering for dry runs.
///
/// This struct handles:
/// - Rendering a unified-style line diff for one file
/// - Printing it to stderr with colorization
/// - Appending it to a consolidated diff file
#[derive(Debug, Clone, Default)]
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File that diffs are appended to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  /// Creates a new DiffManager.
  ///
  /// # Parameters
  ///
  /// * `show_diff` - Whether to print diffs to stderr
  /// * `save_diff_path` - File to append diffs to
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether this manager produces any output at all.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run starts from an empty file.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      File::create(diff_path).with_context(|| format!("Failed to create diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Renders the diff between `original` and `new` for `path`.
  ///
  /// Every line is prefixed with `-`, `+` or a space. The rendering starts
  /// with a `Diff for <path>:` line and ends with a blank line.
  pub fn render_diff(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);
    let mut rendered = format!("Diff for {}:\n", path.display());

    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      rendered.push_str(sign);
      rendered.push_str(change.value());
      if change.missing_newline() {
        rendered.push('\n');
      }
    }

    rendered.push('\n');
    rendered
  }

  /// Prints and/or saves the diff for one file.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file being previewed
  /// * `original` - Decoded content before insertion
  /// * `new` - Decoded content after insertion
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_enabled() {
      return Ok(());
    }

    let rendered = Self::render_diff(path, original, new);

    if self.show_diff {
      for line in rendered.lines() {
        if line.starts_with('+') {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |text| text.green()));
        } else if line.starts_with('-') {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |text| text.red()));
        } else {
          eprintln!("{line}");
        }
      }
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(rendered.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
