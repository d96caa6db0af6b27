//! # Configuration Module
//!
//! Resolves the configuration for one run from three layers, highest
//! precedence first:
//! 1. Command-line flags
//! 2. A JSON config file (`--config`, or `license-header.config.json` in the
//!    repository root)
//! 3. Built-in defaults
//!
//! Each layer is a [`ConfigLayer`] of optional fields and [`ConfigLayer::merge`]
//! is a pure function over two layers. [`load_config`] merges the layers, loads
//! the header text once and validates that every configured path stays inside
//! the repository, producing an immutable [`Config`].
//!
//! ## Config file
//!
//! ```json
//! {
//!   "header_file": "LICENSE_HEADER",
//!   "include_extensions": [".py", ".rs"],
//!   "exclude_paths": ["vendor", "**/generated"],
//!   "output_dir": "reports"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::verbose_log;
use crate::workspace::{is_within, resolve_path};

/// The default config file name, looked up in the repository root.
pub const DEFAULT_CONFIG_FILENAME: &str = "license-header.config.json";

/// Header file used when neither the CLI nor the config file names one.
pub const DEFAULT_HEADER_FILENAME: &str = "LICENSE_HEADER";

/// Extensions processed when none are configured.
pub const DEFAULT_INCLUDE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".java", ".cpp", ".c", ".h"];

/// Exclude patterns used when none are configured.
pub const DEFAULT_EXCLUDE_PATHS: &[&str] = &["node_modules", ".git", "__pycache__", "venv", "env", ".venv"];

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file does not exist.
  #[error("Configuration file not found: {}", path.display())]
  NotFound { path: PathBuf },

  /// The config file could not be read.
  #[error("Error reading configuration file {}: {source}", path.display())]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid JSON.
  #[error("Invalid JSON in configuration file {}: {source}", path.display())]
  ParseError { path: PathBuf, source: serde_json::Error },

  /// No header file was given and the default one does not exist.
  #[error(
    "Header file is required. Specify it via:\n  - CLI flag: --header <path>\n  - Config file: 'header_file' key\n  - Default: '{DEFAULT_HEADER_FILENAME}' file in repository root"
  )]
  MissingHeaderFile,

  /// The header file does not exist.
  #[error(
    "Header file not found: {}\nResolved to: {}\nPlease ensure the header file exists and the path is correct.",
    path.display(),
    resolved.display()
  )]
  HeaderNotFound { path: PathBuf, resolved: PathBuf },

  /// The header path exists but is not a regular file.
  #[error("Header path is not a file: {}", path.display())]
  HeaderNotAFile { path: PathBuf },

  /// The header file could not be read as UTF-8 text.
  #[error("Error reading header file {}: {source}", path.display())]
  HeaderReadError { path: PathBuf, source: std::io::Error },

  /// A configured path resolves outside the repository root.
  #[error(
    "{description} '{}' traverses above repository root '{}'. This is not allowed for security reasons.",
    path.display(),
    repo_root.display()
  )]
  OutsideRepository {
    description: &'static str,
    path: PathBuf,
    repo_root: PathBuf,
  },
}

/// One layer of configuration. Unset fields defer to lower layers.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct ConfigLayer {
  /// Header file, relative to the repository root or absolute
  #[serde(default)]
  pub header_file: Option<PathBuf>,

  /// Extensions to process, each with its leading dot
  #[serde(default)]
  pub include_extensions: Option<Vec<String>>,

  /// Exclude patterns, combined with the built-in directory excludes
  #[serde(default)]
  pub exclude_paths: Option<Vec<String>>,

  /// Directory that reports are written to
  #[serde(default)]
  pub output_dir: Option<PathBuf>,

  /// Directory to scan, relative to the repository root or absolute
  #[serde(default)]
  pub path: Option<PathBuf>,

  /// Preview changes without writing
  #[serde(default)]
  pub dry_run: Option<bool>,
}

impl ConfigLayer {
  /// The built-in defaults. The header file is left unset; [`load_config`]
  /// falls back to [`DEFAULT_HEADER_FILENAME`] only if it exists.
  pub fn defaults() -> Self {
    Self {
      header_file: None,
      include_extensions: Some(DEFAULT_INCLUDE_EXTENSIONS.iter().map(|s| s.to_string()).collect()),
      exclude_paths: Some(DEFAULT_EXCLUDE_PATHS.iter().map(|s| s.to_string()).collect()),
      output_dir: None,
      path: Some(PathBuf::from(".")),
      dry_run: Some(false),
    }
  }

  /// Loads a layer from a JSON config file.
  ///
  /// Unknown keys are ignored and `null` values count as unset.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        ConfigError::NotFound {
          path: path.to_path_buf(),
        }
      } else {
        ConfigError::ReadError {
          path: path.to_path_buf(),
          source: e,
        }
      }
    })?;

    let layer: ConfigLayer = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    info!("Loaded configuration from {}", path.display());
    Ok(layer)
  }

  /// Merges two layers. Fields set in `upper` win over `self`.
  ///
  /// An empty extension or exclude list in `upper` counts as unset, matching
  /// how repeated CLI flags behave when none are given.
  pub fn merge(self, upper: ConfigLayer) -> ConfigLayer {
    ConfigLayer {
      header_file: upper.header_file.or(self.header_file),
      include_extensions: non_empty(upper.include_extensions).or(self.include_extensions),
      exclude_paths: non_empty(upper.exclude_paths).or(self.exclude_paths),
      output_dir: upper.output_dir.or(self.output_dir),
      path: upper.path.or(self.path),
      dry_run: upper.dry_run.or(self.dry_run),
    }
  }
}

fn non_empty(list: Option<Vec<String>>) -> Option<Vec<String>> {
  list.filter(|items| !items.is_empty())
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Header text, loaded once
  pub header: String,
  /// Header file the text came from, as configured
  pub header_file: PathBuf,
  /// Extensions to process
  pub include_extensions: Vec<String>,
  /// User exclude patterns
  pub exclude_paths: Vec<String>,
  /// Directory to scan, relative to `repo_root` unless absolute
  pub path: PathBuf,
  /// Directory for reports
  pub output_dir: Option<PathBuf>,
  /// Preview changes without writing
  pub dry_run: bool,
  /// Repository root bounding every configured path
  pub repo_root: PathBuf,
}

impl Config {
  /// A configuration with built-in defaults for `repo_root` and `header`.
  pub fn new(repo_root: impl Into<PathBuf>, header: impl Into<String>) -> Self {
    Self {
      header: header.into(),
      header_file: PathBuf::from(DEFAULT_HEADER_FILENAME),
      include_extensions: DEFAULT_INCLUDE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
      exclude_paths: DEFAULT_EXCLUDE_PATHS.iter().map(|s| s.to_string()).collect(),
      path: PathBuf::from("."),
      output_dir: None,
      dry_run: false,
      repo_root: repo_root.into(),
    }
  }

  /// The absolute directory to scan.
  pub fn scan_root(&self) -> PathBuf {
    // Collecting components drops interior `.` segments
    absolute_in(&self.path, &self.repo_root).components().collect()
  }

  /// The absolute report directory, if one is configured.
  pub fn resolved_output_dir(&self) -> Option<PathBuf> {
    self.output_dir.as_ref().map(|dir| absolute_in(dir, &self.repo_root))
  }
}

fn absolute_in(path: &Path, repo_root: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    repo_root.join(path)
  }
}

/// Fails when `path` resolves outside `repo_root`.
pub fn validate_path_in_repo(path: &Path, repo_root: &Path, description: &'static str) -> Result<(), ConfigError> {
  if is_within(path, repo_root) {
    Ok(())
  } else {
    Err(ConfigError::OutsideRepository {
      description,
      path: path.to_path_buf(),
      repo_root: repo_root.to_path_buf(),
    })
  }
}

/// Loads the header text.
///
/// A relative `header_file` is resolved against `repo_root` and must stay
/// inside it. Absolute paths may point anywhere.
pub fn load_header_content(header_file: &Path, repo_root: &Path) -> Result<String, ConfigError> {
  let header_path = if header_file.is_absolute() {
    header_file.to_path_buf()
  } else {
    let joined = repo_root.join(header_file);
    validate_path_in_repo(&joined, repo_root, "Header file path")?;
    joined
  };

  if !header_path.exists() {
    return Err(ConfigError::HeaderNotFound {
      path: header_file.to_path_buf(),
      resolved: resolve_path(&header_path),
    });
  }
  if !header_path.is_file() {
    return Err(ConfigError::HeaderNotAFile { path: header_path });
  }

  let content = fs::read_to_string(&header_path).map_err(|e| ConfigError::HeaderReadError {
    path: header_path.clone(),
    source: e,
  })?;
  info!("Loaded header content from {}", header_path.display());
  Ok(content)
}

/// Finds the config file to load.
///
/// An explicit path is resolved against `repo_root`, must stay inside it and
/// must exist. Without one, [`DEFAULT_CONFIG_FILENAME`] in `repo_root` is used
/// when present.
pub fn discover_config_path(explicit_path: Option<&Path>, repo_root: &Path) -> Result<Option<PathBuf>, ConfigError> {
  if let Some(path) = explicit_path {
    let path = absolute_in(path, repo_root);
    validate_path_in_repo(&path, repo_root, "Configuration file path")?;
    verbose_log!("Using explicit config path: {}", path.display());
    return Ok(Some(path));
  }

  let default_config = repo_root.join(DEFAULT_CONFIG_FILENAME);
  if default_config.exists() {
    info!("Using default configuration file: {}", default_config.display());
    return Ok(Some(default_config));
  }

  debug!("No config file found in {}", repo_root.display());
  Ok(None)
}

/// Warns about extensions that will never match a file.
pub fn validate_extensions(extensions: &[String]) {
  for ext in extensions {
    if !ext.starts_with('.') {
      warn!("Extension '{}' does not start with '.'. This may not match files as expected.", ext);
    }
  }
}

/// Warns about exclude patterns written as absolute paths.
pub fn validate_exclude_patterns(patterns: &[String]) {
  for pattern in patterns {
    if pattern.starts_with('/') || pattern.starts_with('\\') {
      warn!(
        "Exclude pattern '{}' starts with path separator. Patterns are matched against relative paths.",
        pattern
      );
    }
  }
}

/// Resolves the configuration for a run.
///
/// # Parameters
///
/// * `cli` - Layer built from command-line flags
/// * `config_path` - Explicit config file, if `--config` was given
/// * `repo_root` - Repository root
///
/// # Returns
///
/// The merged configuration with the header text loaded.
pub fn load_config(cli: ConfigLayer, config_path: Option<&Path>, repo_root: &Path) -> Result<Config, ConfigError> {
  let file_layer = match discover_config_path(config_path, repo_root)? {
    Some(path) => ConfigLayer::load(&path)?,
    None => ConfigLayer::default(),
  };

  let merged = ConfigLayer::defaults().merge(file_layer).merge(cli);

  let header_file = match merged.header_file {
    Some(header_file) => header_file,
    None if repo_root.join(DEFAULT_HEADER_FILENAME).is_file() => PathBuf::from(DEFAULT_HEADER_FILENAME),
    None => return Err(ConfigError::MissingHeaderFile),
  };

  let include_extensions = merged.include_extensions.unwrap_or_default();
  let exclude_paths = merged.exclude_paths.unwrap_or_default();
  validate_extensions(&include_extensions);
  validate_exclude_patterns(&exclude_paths);

  let header = load_header_content(&header_file, repo_root)?;

  if let Some(ref output_dir) = merged.output_dir {
    validate_path_in_repo(&absolute_in(output_dir, repo_root), repo_root, "Output directory")?;
  }

  let config = Config {
    header,
    header_file,
    include_extensions,
    exclude_paths,
    path: merged.path.unwrap_or_else(|| PathBuf::from(".")),
    output_dir: merged.output_dir,
    dry_run: merged.dry_run.unwrap_or(false),
    repo_root: repo_root.to_path_buf(),
  };
  debug!("Configuration loaded: {:?}", config);

  Ok(config)
}

#[cfg(test)]
mod tests {
  use tempfile::{TempDir, tempdir};

  use super::*;

  fn repo_with_header(name: &str, content: &str) -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(name), content).unwrap();
    dir
  }

  #[test]
  fn test_parse_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    fs::write(
      &path,
      r#"{"header_file": "HEADER.txt", "include_extensions": [".py", ".js"], "output_dir": null, "unknown": 1}"#,
    )
    .unwrap();

    let layer = ConfigLayer::load(&path).unwrap();

    assert_eq!(layer.header_file, Some(PathBuf::from("HEADER.txt")));
    assert_eq!(layer.include_extensions, Some(vec![".py".to_string(), ".js".to_string()]));
    assert_eq!(layer.output_dir, None);
    assert_eq!(layer.exclude_paths, None);
  }

  #[test]
  fn test_load_nonexistent_config() {
    let dir = tempdir().unwrap();
    let err = ConfigLayer::load(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("not found"));
  }

  #[test]
  fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    let err = ConfigLayer::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert!(err.to_string().contains("Invalid JSON"));
  }

  #[test]
  fn test_merge_precedence() {
    let file = ConfigLayer {
      header_file: Some(PathBuf::from("FILE_HEADER")),
      include_extensions: Some(vec![".py".to_string()]),
      exclude_paths: Some(vec!["dist".to_string()]),
      ..ConfigLayer::default()
    };
    let cli = ConfigLayer {
      header_file: Some(PathBuf::from("CLI_HEADER")),
      include_extensions: Some(Vec::new()),
      dry_run: Some(true),
      ..ConfigLayer::default()
    };

    let merged = ConfigLayer::defaults().merge(file).merge(cli);

    assert_eq!(merged.header_file, Some(PathBuf::from("CLI_HEADER")));
    // Empty CLI lists do not clear the file's value
    assert_eq!(merged.include_extensions, Some(vec![".py".to_string()]));
    assert_eq!(merged.exclude_paths, Some(vec!["dist".to_string()]));
    assert_eq!(merged.dry_run, Some(true));
    assert_eq!(merged.path, Some(PathBuf::from(".")));
  }

  #[test]
  fn test_load_config_defaults_with_license_header_file() {
    let dir = repo_with_header(DEFAULT_HEADER_FILENAME, "# Copyright\n");

    let config = load_config(ConfigLayer::default(), None, dir.path()).unwrap();

    assert_eq!(config.header_file, PathBuf::from(DEFAULT_HEADER_FILENAME));
    assert_eq!(config.header, "# Copyright\n");
    assert!(config.include_extensions.contains(&".py".to_string()));
    assert!(config.exclude_paths.contains(&"node_modules".to_string()));
    assert!(!config.dry_run);
    assert_eq!(config.scan_root(), dir.path().join("."));
  }

  #[test]
  fn test_load_config_missing_header() {
    let dir = tempdir().unwrap();
    let err = load_config(ConfigLayer::default(), None, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingHeaderFile));
    assert!(err.to_string().contains("Header file is required"));
  }

  #[test]
  fn test_load_config_uses_default_config_file() {
    let dir = repo_with_header("HEADER.txt", "# From file\n");
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILENAME),
      r#"{"header_file": "HEADER.txt", "exclude_paths": ["dist"]}"#,
    )
    .unwrap();

    let config = load_config(ConfigLayer::default(), None, dir.path()).unwrap();

    assert_eq!(config.header_file, PathBuf::from("HEADER.txt"));
    assert_eq!(config.header, "# From file\n");
    assert_eq!(config.exclude_paths, vec!["dist".to_string()]);
  }

  #[test]
  fn test_cli_overrides_config_file() {
    let dir = repo_with_header("HEADER.txt", "# One\n");
    fs::write(dir.path().join("HEADER2.txt"), "# Two\n").unwrap();
    fs::write(
      dir.path().join("custom.json"),
      r#"{"header_file": "HEADER.txt", "include_extensions": [".py"]}"#,
    )
    .unwrap();
    let cli = ConfigLayer {
      header_file: Some(PathBuf::from("HEADER2.txt")),
      include_extensions: Some(vec![".js".to_string(), ".ts".to_string()]),
      ..ConfigLayer::default()
    };

    let config = load_config(cli, Some(Path::new("custom.json")), dir.path()).unwrap();

    assert_eq!(config.header_file, PathBuf::from("HEADER2.txt"));
    assert_eq!(config.header, "# Two\n");
    assert_eq!(config.include_extensions, vec![".js".to_string(), ".ts".to_string()]);
  }

  #[test]
  fn test_header_relative_outside_repo_rejected() {
    let parent = tempdir().unwrap();
    let repo = parent.path().join("repo");
    fs::create_dir(&repo).unwrap();
    fs::write(parent.path().join("HEADER"), "# Outside\n").unwrap();

    let err = load_header_content(Path::new("../HEADER"), &repo).unwrap_err();
    assert!(err.to_string().contains("traverses above repository root"));
  }

  #[test]
  fn test_header_absolute_outside_repo_allowed() {
    let repo = tempdir().unwrap();
    let outside = repo_with_header("HEADER", "# Outside\n");

    let content = load_header_content(&outside.path().join("HEADER"), repo.path()).unwrap();
    assert_eq!(content, "# Outside\n");
  }

  #[test]
  fn test_header_not_found_and_not_a_file() {
    let repo = tempdir().unwrap();
    fs::create_dir(repo.path().join("dir")).unwrap();

    let err = load_header_content(Path::new("missing"), repo.path()).unwrap_err();
    assert!(err.to_string().contains("Header file not found"));

    let err = load_header_content(Path::new("dir"), repo.path()).unwrap_err();
    assert!(err.to_string().contains("Header path is not a file"));
  }

  #[test]
  fn test_config_path_outside_repo_rejected() {
    let repo = repo_with_header(DEFAULT_HEADER_FILENAME, "# H\n");
    let err = load_config(ConfigLayer::default(), Some(Path::new("../evil.json")), repo.path()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Configuration file path"));
    assert!(message.contains("traverses above repository root"));
  }

  #[test]
  fn test_output_dir_outside_repo_rejected() {
    let repo = repo_with_header(DEFAULT_HEADER_FILENAME, "# H\n");
    let cli = ConfigLayer {
      output_dir: Some(PathBuf::from("../reports")),
      ..ConfigLayer::default()
    };

    let err = load_config(cli, None, repo.path()).unwrap_err();
    assert!(err.to_string().contains("Output directory"));
  }

  #[test]
  fn test_config_resolved_paths() {
    let mut config = Config::new("/repo", "# H");
    config.path = PathBuf::from("src");
    config.output_dir = Some(PathBuf::from("reports"));

    assert_eq!(config.scan_root(), PathBuf::from("/repo/src"));
    assert_eq!(config.resolved_output_dir(), Some(PathBuf::from("/repo/reports")));

    config.path = PathBuf::from("/elsewhere");
    assert_eq!(config.scan_root(), PathBuf::from("/elsewhere"));
  }
}
