//! # Ignore Module
//!
//! Exclude-pattern matching for the scanner.
//!
//! Paths are matched relative to the repository root, split into `/`
//! segments. Globs are segment-wise and anchored at the right end of the path:
//! `*.pyc` matches `src/cache/a.pyc`, and `*`, `?` and `[...]` never cross a
//! separator. `**` is an ordinary wildcard confined to one segment, so
//! `**/vendor` matches `src/vendor` but not a top-level `vendor`. A pattern
//! beginning with `/` must match from the repository root.
//!
//! A path is excluded when any pattern matches it in one of these ways:
//! - the pattern itself
//! - for patterns not ending in `*`, the pattern with `/**` or `/*` appended,
//!   so a directory pattern also covers what is inside it
//! - for patterns starting with `**/`, the same directory forms without that
//!   prefix
//! - the pattern equals one segment of the path, at any depth
//!
//! [`DEFAULT_EXCLUDE_DIRS`] are always part of the pattern set.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::workspace::resolve_path;

/// Directories excluded from every scan in addition to user patterns.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
  ".git",
  ".venv",
  "venv",
  "env",
  "__pycache__",
  "node_modules",
  "dist",
  "build",
];

const RECURSIVE_PREFIX: &str = "**/";

const SEGMENT_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// A glob split into path segments.
#[derive(Debug, Clone)]
struct SegmentGlob {
  anchored: bool,
  segments: Vec<Pattern>,
}

impl SegmentGlob {
  /// Compiles `source`. Returns `None` when a segment is not a valid glob.
  fn compile(source: &str) -> Option<Self> {
    let anchored = source.starts_with('/');
    let segments = source
      .split('/')
      .filter(|s| !s.is_empty() && *s != ".")
      .map(|s| Pattern::new(&collapse_stars(s)).ok())
      .collect::<Option<Vec<_>>>()?;

    if segments.is_empty() {
      return None;
    }
    Some(Self { anchored, segments })
  }

  fn matches(&self, path: &[&str]) -> bool {
    if self.anchored {
      return match_segments(&self.segments, path);
    }
    path.len() >= self.segments.len() && match_segments(&self.segments, &path[path.len() - self.segments.len()..])
  }
}

fn match_segments(pattern: &[Pattern], path: &[&str]) -> bool {
  pattern.len() == path.len()
    && pattern
      .iter()
      .zip(path)
      .all(|(glob, segment)| glob.matches_with(segment, SEGMENT_OPTIONS))
}

/// Collapses runs of `*` so `**` is a plain wildcard within one segment.
fn collapse_stars(segment: &str) -> String {
  let mut collapsed = String::with_capacity(segment.len());
  for c in segment.chars() {
    if !(c == '*' && collapsed.ends_with('*')) {
      collapsed.push(c);
    }
  }
  collapsed
}

/// A single exclude pattern with its precompiled glob forms.
#[derive(Debug, Clone)]
struct ExcludePattern {
  raw: String,
  direct: Option<SegmentGlob>,
  directory_forms: Vec<SegmentGlob>,
}

impl ExcludePattern {
  fn new(raw: &str) -> Self {
    let direct = SegmentGlob::compile(raw);
    if direct.is_none() {
      debug!("Exclude pattern '{}' is not a valid glob; only exact segment matches apply", raw);
    }

    let mut directory_forms = Vec::new();
    if !raw.ends_with('*') {
      let mut bases = vec![raw];
      if let Some(stripped) = raw.strip_prefix(RECURSIVE_PREFIX) {
        bases.push(stripped);
      }
      for base in bases {
        for suffix in ["/**", "/*"] {
          if let Some(glob) = SegmentGlob::compile(&format!("{base}{suffix}")) {
            directory_forms.push(glob);
          }
        }
      }
    }

    Self {
      raw: raw.to_string(),
      direct,
      directory_forms,
    }
  }

  fn matches(&self, segments: &[&str]) -> bool {
    if self.direct.as_ref().is_some_and(|g| g.matches(segments)) {
      return true;
    }
    if self.directory_forms.iter().any(|g| g.matches(segments)) {
      return true;
    }
    segments.iter().any(|s| *s == self.raw)
  }
}

/// Matcher deciding whether a path is excluded from scanning.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use license_header::ignore::ExcludeMatcher;
///
/// let matcher = ExcludeMatcher::new(Path::new("/repo"), &["**/vendor".to_string()]);
///
/// assert!(matcher.is_excluded_relative(&["src", "vendor", "lib.js"]));
/// assert!(matcher.is_excluded_relative(&["node_modules", "x.js"]));
/// assert!(!matcher.is_excluded_relative(&["src", "lib.js"]));
/// ```
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
  repo_root: PathBuf,
  patterns: Vec<ExcludePattern>,
}

impl ExcludeMatcher {
  /// Creates a matcher for `user_patterns` plus [`DEFAULT_EXCLUDE_DIRS`].
  ///
  /// # Parameters
  ///
  /// * `repo_root` - Root that paths are made relative to
  /// * `user_patterns` - Configured exclude patterns
  pub fn new(repo_root: &Path, user_patterns: &[String]) -> Self {
    let patterns = DEFAULT_EXCLUDE_DIRS
      .iter()
      .copied()
      .chain(user_patterns.iter().map(String::as_str))
      .map(ExcludePattern::new)
      .collect();

    Self {
      repo_root: resolve_path(repo_root),
      patterns,
    }
  }

  /// The canonical repository root paths are matched against.
  pub fn repo_root(&self) -> &Path {
    &self.repo_root
  }

  /// Checks a path given as segments relative to the repository root.
  ///
  /// The repository root itself (no segments) is never excluded.
  pub fn is_excluded_relative<S: AsRef<str>>(&self, segments: &[S]) -> bool {
    if segments.is_empty() {
      return false;
    }
    let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
    self.patterns.iter().any(|p| p.matches(&segments))
  }

  /// Splits `path` into segments relative to the repository root.
  ///
  /// Returns `None` when the path lies outside the root.
  pub fn relative_segments(&self, path: &Path) -> Option<Vec<String>> {
    let absolute = if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.repo_root.join(path)
    };
    let resolved = resolve_path(&absolute);
    let relative = resolved.strip_prefix(&self.repo_root).ok()?;

    let mut segments = Vec::new();
    for component in relative.components() {
      match component {
        Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
        Component::CurDir => {}
        _ => return None,
      }
    }
    Some(segments)
  }
}
