//! # Report Module
//!
//! This module writes the JSON and Markdown reports of an apply or check run.
//!
//! Both formats carry a UTC timestamp, the run mode, a summary of counts and
//! the per-category file lists. Paths are shown relative to the repository
//! root when possible. Apart from the timestamp, identical results always
//! produce identical reports.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::processor::{ApplyResult, CheckResult};
use crate::workspace::resolve_path;

/// Maximum number of compliant files listed in a Markdown report.
pub const MARKDOWN_COMPLIANT_LIMIT: usize = 100;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// Markdown format for humans and CI summaries
  Markdown,
}

impl ReportFormat {
  /// Every format, in the order reports are written.
  pub const ALL: [ReportFormat; 2] = [ReportFormat::Json, ReportFormat::Markdown];

  /// File extension, without the dot.
  pub const fn extension(self) -> &'static str {
    match self {
      ReportFormat::Json => "json",
      ReportFormat::Markdown => "md",
    }
  }
}

impl fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Markdown => write!(f, "Markdown"),
    }
  }
}

/// The result a report describes.
#[derive(Debug, Clone, Copy)]
pub enum ReportData<'a> {
  Apply(&'a ApplyResult),
  Check(&'a CheckResult),
}

impl ReportData<'_> {
  /// The run mode, as used in file names and titles.
  pub const fn mode(&self) -> &'static str {
    match self {
      ReportData::Apply(_) => "apply",
      ReportData::Check(_) => "check",
    }
  }

  fn title(&self) -> &'static str {
    match self {
      ReportData::Apply(_) => "Apply",
      ReportData::Check(_) => "Check",
    }
  }
}

impl<'a> From<&'a ApplyResult> for ReportData<'a> {
  fn from(result: &'a ApplyResult) -> Self {
    ReportData::Apply(result)
  }
}

impl<'a> From<&'a CheckResult> for ReportData<'a> {
  fn from(result: &'a CheckResult) -> Self {
    ReportData::Check(result)
  }
}

#[derive(Serialize)]
struct JsonReport<S, F> {
  timestamp: String,
  mode: &'static str,
  summary: S,
  files: F,
}

#[derive(Serialize)]
struct ApplySummary {
  scanned: usize,
  eligible: usize,
  modified: usize,
  compliant: usize,
  skipped: usize,
  failed: usize,
}

#[derive(Serialize)]
struct ApplyFiles {
  modified: Vec<String>,
  compliant: Vec<String>,
  skipped: Vec<String>,
  failed: Vec<String>,
}

#[derive(Serialize)]
struct CheckSummary {
  scanned: usize,
  eligible: usize,
  compliant: usize,
  non_compliant: usize,
  skipped: usize,
  failed: usize,
}

#[derive(Serialize)]
struct CheckFiles {
  compliant: Vec<String>,
  non_compliant: Vec<String>,
  skipped: Vec<String>,
  failed: Vec<String>,
}

/// Formats `path` relative to `repo_root`, falling back to the path as given.
pub fn display_path(path: &Path, repo_root: Option<&Path>) -> String {
  let Some(root) = repo_root else {
    return path.to_string_lossy().into_owned();
  };

  if let Ok(relative) = path.strip_prefix(root) {
    return relative.to_string_lossy().into_owned();
  }
  match resolve_path(path).strip_prefix(resolve_path(root)) {
    Ok(relative) => relative.to_string_lossy().into_owned(),
    Err(_) => path.to_string_lossy().into_owned(),
  }
}

fn format_file_list(files: &[PathBuf], repo_root: Option<&Path>) -> Vec<String> {
  files.iter().map(|path| display_path(path, repo_root)).collect()
}

/// Report Generator for writing one report file
pub struct ReportGenerator<'a> {
  /// Format of the report to generate
  format: ReportFormat,
  /// Repository root used to shorten paths
  repo_root: Option<&'a Path>,
}

impl<'a> ReportGenerator<'a> {
  /// Create a new report generator
  ///
  /// # Parameters
  ///
  /// * `format` - The format to use for the report
  /// * `repo_root` - Root that file paths are shown relative to
  pub const fn new(format: ReportFormat, repo_root: Option<&'a Path>) -> Self {
    Self { format, repo_root }
  }

  /// The report file name for `mode`, e.g. `license-header-check-report.md`.
  pub fn file_name(&self, mode: &str) -> String {
    format!("license-header-{}-report.{}", mode, self.format.extension())
  }

  /// Renders the report content.
  pub fn render(&self, data: ReportData<'_>, timestamp: DateTime<Utc>) -> Result<String> {
    match self.format {
      ReportFormat::Json => self.render_json(data, timestamp),
      ReportFormat::Markdown => Ok(self.render_markdown(data, timestamp)),
    }
  }

  /// Writes the report into `output_dir`.
  ///
  /// # Returns
  ///
  /// The path of the written report.
  pub fn generate(&self, data: ReportData<'_>, output_dir: &Path, timestamp: DateTime<Utc>) -> Result<PathBuf> {
    let content = self.render(data, timestamp)?;
    let output_path = output_dir.join(self.file_name(data.mode()));

    fs::write(&output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, output_path.display()))?;
    info!("{} report written to {}", self.format, output_path.display());

    Ok(output_path)
  }

  fn render_json(&self, data: ReportData<'_>, timestamp: DateTime<Utc>) -> Result<String> {
    let timestamp = timestamp.to_rfc3339();
    let json = match data {
      ReportData::Apply(result) => serde_json::to_string_pretty(&JsonReport {
        timestamp,
        mode: data.mode(),
        summary: ApplySummary {
          scanned: result.total_processed(),
          eligible: result.total_eligible(),
          modified: result.modified.len(),
          compliant: result.already_compliant.len(),
          skipped: result.skipped.len(),
          failed: result.failed.len(),
        },
        files: ApplyFiles {
          modified: format_file_list(&result.modified, self.repo_root),
          compliant: format_file_list(&result.already_compliant, self.repo_root),
          skipped: format_file_list(&result.skipped, self.repo_root),
          failed: format_file_list(&result.failed, self.repo_root),
        },
      }),
      ReportData::Check(result) => serde_json::to_string_pretty(&JsonReport {
        timestamp,
        mode: data.mode(),
        summary: CheckSummary {
          scanned: result.total_scanned(),
          eligible: result.total_eligible(),
          compliant: result.compliant.len(),
          non_compliant: result.non_compliant.len(),
          skipped: result.skipped.len(),
          failed: result.failed.len(),
        },
        files: CheckFiles {
          compliant: format_file_list(&result.compliant, self.repo_root),
          non_compliant: format_file_list(&result.non_compliant, self.repo_root),
          skipped: format_file_list(&result.skipped, self.repo_root),
          failed: format_file_list(&result.failed, self.repo_root),
        },
      }),
    };

    json.with_context(|| "Failed to serialize JSON report")
  }

  fn render_markdown(&self, data: ReportData<'_>, timestamp: DateTime<Utc>) -> String {
    let mut lines = vec![
      format!("# License Header {} Report", data.title()),
      String::new(),
      format!("**Generated:** {}", timestamp.to_rfc3339()),
      String::new(),
      "## Summary".to_string(),
      String::new(),
    ];

    match data {
      ReportData::Apply(result) => {
        lines.push(format!("- **Scanned:** {}", result.total_processed()));
        lines.push(format!("- **Eligible:** {}", result.total_eligible()));
        lines.push(format!("- **Modified:** {}", result.modified.len()));
        lines.push(format!("- **Already Compliant:** {}", result.already_compliant.len()));
        lines.push(format!("- **Skipped:** {}", result.skipped.len()));
        lines.push(format!("- **Failed:** {}", result.failed.len()));
        lines.push(String::new());

        self.push_section(&mut lines, "Modified Files", &result.modified, None);
        self.push_section(
          &mut lines,
          "Already Compliant Files",
          &result.already_compliant,
          Some(MARKDOWN_COMPLIANT_LIMIT),
        );
        self.push_section(&mut lines, "Failed Files", &result.failed, None);
      }
      ReportData::Check(result) => {
        lines.push(format!("- **Scanned:** {}", result.total_scanned()));
        lines.push(format!("- **Eligible:** {}", result.total_eligible()));
        lines.push(format!("- **Compliant:** {}", result.compliant.len()));
        lines.push(format!("- **Non-Compliant:** {}", result.non_compliant.len()));
        lines.push(format!("- **Skipped:** {}", result.skipped.len()));
        lines.push(format!("- **Failed:** {}", result.failed.len()));
        lines.push(String::new());

        self.push_section(&mut lines, "Non-Compliant Files", &result.non_compliant, None);
        self.push_section(
          &mut lines,
          "Compliant Files",
          &result.compliant,
          Some(MARKDOWN_COMPLIANT_LIMIT),
        );
        self.push_section(&mut lines, "Failed Files", &result.failed, None);
      }
    }

    lines.join("\n")
  }

  fn push_section(&self, lines: &mut Vec<String>, title: &str, files: &[PathBuf], limit: Option<usize>) {
    if files.is_empty() {
      return;
    }

    lines.push(format!("## {title}"));
    lines.push(String::new());

    let shown = limit.map_or(files.len(), |limit| limit.min(files.len()));
    for file in &files[..shown] {
      lines.push(format!("- `{}`", display_path(file, self.repo_root)));
    }
    if files.len() > shown {
      lines.push(format!("- ... and {} more", files.len() - shown));
    }
    lines.push(String::new());
  }
}

/// Ensures `output_dir` exists and is a writable directory.
fn prepare_output_dir(output_dir: &Path) -> Result<()> {
  if !output_dir.exists() {
    fs::create_dir_all(output_dir)
      .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;
    info!("Created output directory: {}", output_dir.display());
  }

  let metadata = fs::metadata(output_dir)
    .with_context(|| format!("Cannot access output directory {}", output_dir.display()))?;
  if !metadata.is_dir() {
    bail!("Output path is not a directory: {}", output_dir.display());
  }
  if metadata.permissions().readonly() {
    bail!("Output directory is not writable: {}", output_dir.display());
  }
  Ok(())
}

/// Writes the JSON and Markdown reports for a run into `output_dir`.
///
/// # Parameters
///
/// * `data` - The apply or check result
/// * `output_dir` - Directory to write into, created when missing
/// * `repo_root` - Root that file paths are shown relative to
///
/// # Returns
///
/// The paths of the written reports, JSON first.
pub fn generate_reports(data: ReportData<'_>, output_dir: &Path, repo_root: Option<&Path>) -> Result<Vec<PathBuf>> {
  prepare_output_dir(output_dir)?;

  let timestamp = Utc::now();
  let written = ReportFormat::ALL
    .into_iter()
    .map(|format| ReportGenerator::new(format, repo_root).generate(data, output_dir, timestamp))
    .collect::<Result<Vec<_>>>()?;

  info!("Reports generated in {}", output_dir.display());
  Ok(written)
}
