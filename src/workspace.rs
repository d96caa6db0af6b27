//! # Workspace Module
//!
//! Locates the repository root that every configured path is bounded by, and
//! resolves paths the way the rest of the crate compares them.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use git2::Repository;
use tracing::debug;

/// Workspace root selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workspace {
  /// Workspace rooted at a git working tree.
  Git { root: PathBuf },
  /// Workspace rooted at a plain directory.
  Directory { root: PathBuf },
}

impl Workspace {
  pub fn root(&self) -> &Path {
    match self {
      Self::Git { root } | Self::Directory { root } => root.as_path(),
    }
  }

  pub const fn is_git(&self) -> bool {
    matches!(self, Self::Git { .. })
  }
}

/// Resolves the workspace for the current directory.
pub fn resolve_workspace() -> Result<Workspace> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  Ok(find_workspace(&current_dir))
}

/// Finds the repository root containing `start`.
///
/// The lookup order is:
/// 1. The working tree of the git repository discovered from `start`
/// 2. The nearest ancestor holding a `.git` entry, even one git cannot open
/// 3. `start` itself
pub fn find_workspace(start: &Path) -> Workspace {
  let start = resolve_path(start);

  match Repository::discover(&start) {
    Ok(repo) => {
      if let Some(workdir) = repo.workdir() {
        let root = resolve_path(workdir);
        debug!("Using git working tree as repository root: {}", root.display());
        return Workspace::Git { root };
      }
      debug!("Git repository at {} is bare", repo.path().display());
    }
    Err(e) => debug!("No git repository found from {}: {}", start.display(), e.message()),
  }

  if let Some(root) = start.ancestors().find(|dir| dir.join(".git").exists()) {
    debug!("Found .git marker at {}", root.display());
    return Workspace::Git {
      root: root.to_path_buf(),
    };
  }

  Workspace::Directory { root: start }
}

/// Makes `path` absolute and resolves symlinks and `..` segments.
///
/// The longest existing prefix is canonicalized and the remaining components
/// are applied lexically, so paths that do not exist yet still resolve.
/// Relative paths are taken relative to the current directory.
pub fn resolve_path(path: &Path) -> PathBuf {
  let absolute = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir().unwrap_or_default().join(path)
  };

  let components: Vec<Component<'_>> = absolute.components().collect();
  for split in (1..=components.len()).rev() {
    let prefix: PathBuf = components[..split].iter().collect();
    if let Ok(mut resolved) = prefix.canonicalize() {
      push_lexically(&mut resolved, &components[split..]);
      return resolved;
    }
  }

  let mut resolved = PathBuf::new();
  push_lexically(&mut resolved, &components);
  resolved
}

fn push_lexically(base: &mut PathBuf, components: &[Component<'_>]) {
  for component in components {
    match component {
      Component::ParentDir => {
        base.pop();
      }
      Component::CurDir => {}
      other => base.push(other.as_os_str()),
    }
  }
}

/// Checks that `path` resolves to a location inside `root`.
pub fn is_within(path: &Path, root: &Path) -> bool {
  resolve_path(path).starts_with(resolve_path(root))
}
