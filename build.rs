use std::env;
use std::process::Command;

fn main() {
  embed_build_info();
  set_rerun_conditions();
}

/// Runs git with `args` and returns its trimmed stdout, if any.
fn git_output(args: &[&str]) -> Option<String> {
  let output = Command::new("git").args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let text = String::from_utf8(output.stdout).ok()?.trim().to_string();
  (!text.is_empty()).then_some(text)
}

fn embed_build_info() {
  // Short commit hash and commit date (YYYY-MM-DD) for `--version`.
  // Both fall back to "unknown" outside a git checkout.
  let git_hash = git_output(&["rev-parse", "--short", "HEAD"]);
  let git_date = git_output(&["log", "-1", "--format=%cs"]);

  if let Some(ref hash) = git_hash {
    println!("cargo:rustc-env=GIT_HASH={hash}");
  }
  if let Some(ref date) = git_date {
    println!("cargo:rustc-env=GIT_DATE={date}");
  }

  let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
  println!(
    "cargo:rustc-env=LICENSE_HEADER_LONG_VERSION={} ({} {})",
    version,
    git_hash.as_deref().unwrap_or("unknown"),
    git_date.as_deref().unwrap_or("unknown")
  );
}

fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
}
