#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use tempfile::{TempDir, tempdir};

/// Header used by most tests.
pub const NOTICE: &str = "# NOTICE\n";

/// Initializes a git repository in `dir` so it becomes the repository root.
pub fn init_repo(dir: &Path) -> Result<()> {
  git2::Repository::init(dir).with_context(|| format!("Failed to init repository in {}", dir.display()))?;
  Ok(())
}

/// Writes `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Creates a temporary repository with `header` in its `LICENSE_HEADER` file.
pub fn setup_repo(header: &str) -> Result<TempDir> {
  let dir = tempdir()?;
  init_repo(dir.path())?;
  write_file(dir.path(), "LICENSE_HEADER", header)?;
  Ok(dir)
}

/// The `license-header` binary, run from `dir` with colors off and no
/// inherited log filter.
pub fn license_header_cmd(dir: &Path) -> Result<Command> {
  let mut cmd = Command::cargo_bin("license-header")?;
  cmd.current_dir(dir).env_remove("RUST_LOG").env("NO_COLOR", "1");
  Ok(cmd)
}
