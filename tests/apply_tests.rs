//! End-to-end tests for applying headers across a repository.

mod common;

use std::fs;

use anyhow::Result;
use common::{NOTICE, init_repo, write_file};
use license_header::config::Config;
use license_header::processor::{apply_headers, scan_repository};
use tempfile::tempdir;

#[test]
fn test_apply_inserts_header_and_preserves_shebang() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let a = write_file(root, "a.py", "print(1)\n")?;
  let b = write_file(root, "b.py", "#!/usr/bin/env python\nprint(2)\n")?;

  let result = apply_headers(&Config::new(root, NOTICE));

  assert_eq!(result.modified, vec![a.clone(), b.clone()]);
  assert!(result.failed.is_empty());
  assert_eq!(fs::read_to_string(&a)?, "# NOTICE\nprint(1)\n");
  assert_eq!(fs::read_to_string(&b)?, "#!/usr/bin/env python\n# NOTICE\nprint(2)\n");

  Ok(())
}

#[test]
fn test_second_apply_is_a_noop() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let a = write_file(root, "a.py", "print(1)\n")?;
  let b = write_file(root, "b.py", "#!/usr/bin/env python\nprint(2)\n")?;
  let config = Config::new(root, NOTICE);

  apply_headers(&config);
  let first_a = fs::read(&a)?;
  let first_b = fs::read(&b)?;

  let result = apply_headers(&config);

  assert!(result.modified.is_empty());
  assert_eq!(result.already_compliant.len(), 2);
  assert_eq!(fs::read(&a)?, first_a);
  assert_eq!(fs::read(&b)?, first_b);

  Ok(())
}

#[test]
fn test_recursive_exclude_pattern_skips_vendor() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let vendored = write_file(root, "vendor/lib.py", "x = 1\n")?;
  let nested = write_file(root, "src/vendor/other.py", "y = 2\n")?;
  let own = write_file(root, "src/main.py", "z = 3\n")?;

  let mut config = Config::new(root, NOTICE);
  config.exclude_paths = vec!["**/vendor".to_string()];

  let scan = scan_repository(&config.scan_root(), &config.include_extensions, &config.exclude_paths, root);
  // The nested directory is pruned, so only the top-level file is listed
  assert_eq!(scan.skipped_excluded, vec![vendored.clone()]);
  assert_eq!(scan.eligible, vec![own.clone()]);

  let result = apply_headers(&config);
  assert_eq!(result.modified, vec![own]);
  assert_eq!(fs::read_to_string(&vendored)?, "x = 1\n");
  assert_eq!(fs::read_to_string(&nested)?, "y = 2\n");

  Ok(())
}

#[test]
fn test_apply_preserves_crlf_line_endings() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let path = write_file(root, "win.js", "let a = 1;\r\nlet b = 2;\r\n")?;

  apply_headers(&Config::new(root, "// Copyright\n// Example\n"));

  assert_eq!(
    fs::read_to_string(&path)?,
    "// Copyright\r\n// Example\r\nlet a = 1;\r\nlet b = 2;\r\n"
  );

  Ok(())
}

#[test]
fn test_apply_never_adds_cr_to_lf_files() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let path = write_file(root, "unix.c", "int x;\n")?;

  apply_headers(&Config::new(root, "/* H */\r\n"));

  let content = fs::read_to_string(&path)?;
  assert_eq!(content, "/* H */\nint x;\n");
  assert!(!content.contains('\r'));

  Ok(())
}

#[test]
fn test_apply_preserves_utf8_bom() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let path = write_file(root, "bom.py", b"\xEF\xBB\xBFprint('hi')\n")?;

  apply_headers(&Config::new(root, NOTICE));

  let bytes = fs::read(&path)?;
  assert_eq!(bytes, b"\xEF\xBB\xBF# NOTICE\nprint('hi')\n");
  // The BOM appears exactly once
  assert_eq!(bytes.windows(3).filter(|w| *w == b"\xEF\xBB\xBF").count(), 1);

  Ok(())
}

#[test]
fn test_partial_header_is_completed() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let header = "# Copyright Example\n# SPDX-License-Identifier: MIT\n";
  let path = write_file(root, "partial.py", "# Copyright Example\nprint(1)\n")?;

  let result = apply_headers(&Config::new(root, header));

  assert_eq!(result.modified, vec![path.clone()]);
  assert!(fs::read_to_string(&path)?.starts_with(header));

  Ok(())
}

#[test]
fn test_dry_run_reports_without_writing() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let path = write_file(root, "a.py", "print(1)\n")?;

  let mut config = Config::new(root, NOTICE);
  config.dry_run = true;
  let result = apply_headers(&config);

  assert_eq!(result.modified, vec![path.clone()]);
  assert_eq!(fs::read_to_string(&path)?, "print(1)\n");

  Ok(())
}

#[test]
fn test_invalid_utf8_file_fails_without_aborting() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let bad = write_file(root, "a_bad.py", b"x = '\xC3\x28'\n")?;
  let good = write_file(root, "b_good.py", "x = 1\n")?;

  let result = apply_headers(&Config::new(root, NOTICE));

  assert_eq!(result.failed, vec![bad.clone()]);
  assert_eq!(result.modified, vec![good]);
  assert_eq!(fs::read(&bad)?, b"x = '\xC3\x28'\n");
  assert_eq!(
    result.modified.len() + result.already_compliant.len() + result.failed.len(),
    2
  );

  Ok(())
}

#[test]
fn test_scan_path_limits_processing() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let inside = write_file(root, "src/a.py", "a = 1\n")?;
  let outside = write_file(root, "scripts/b.py", "b = 1\n")?;

  let mut config = Config::new(root, NOTICE);
  config.path = "src".into();
  let result = apply_headers(&config);

  assert_eq!(result.modified, vec![inside]);
  assert_eq!(fs::read_to_string(&outside)?, "b = 1\n");

  Ok(())
}

#[test]
fn test_skipped_files_are_left_alone() -> Result<()> {
  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let readme = write_file(root, "README.md", "# Readme\n")?;
  let blob = write_file(root, "blob.py", b"\x00\x01binary")?;

  let result = apply_headers(&Config::new(root, NOTICE));

  assert!(result.modified.is_empty());
  assert_eq!(result.skipped, vec![blob.clone(), readme.clone()]);
  assert_eq!(fs::read_to_string(&readme)?, "# Readme\n");
  assert_eq!(fs::read(&blob)?, b"\x00\x01binary");

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_write_failure_is_recorded_and_batch_continues() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let locked = write_file(root, "ro/a.py", "a = 1\n")?;
  let open = write_file(root, "rw/b.py", "b = 1\n")?;
  let ro = root.join("ro");
  fs::set_permissions(&ro, fs::Permissions::from_mode(0o555))?;

  // Privileged users can still create files in the directory
  let marker = ro.join("marker");
  if fs::write(&marker, "").is_ok() {
    fs::remove_file(&marker)?;
    fs::set_permissions(&ro, fs::Permissions::from_mode(0o755))?;
    return Ok(());
  }

  let result = apply_headers(&Config::new(root, NOTICE));
  let leftovers: Vec<String> = fs::read_dir(&ro)?
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.file_name().to_string_lossy().into_owned())
    .filter(|name| name.ends_with(".tmp"))
    .collect();
  fs::set_permissions(&ro, fs::Permissions::from_mode(0o755))?;

  assert_eq!(result.failed, vec![locked.clone()]);
  assert_eq!(result.modified, vec![open.clone()]);
  assert_eq!(fs::read_to_string(&locked)?, "a = 1\n");
  assert_eq!(fs::read_to_string(&open)?, "# NOTICE\nb = 1\n");
  assert!(leftovers.is_empty(), "temporary files left behind: {leftovers:?}");

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_apply_preserves_permissions() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let dir = tempdir()?;
  let root = dir.path();
  init_repo(root)?;
  let script = write_file(root, "run.py", "#!/usr/bin/env python\nprint(1)\n")?;
  fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

  apply_headers(&Config::new(root, NOTICE));

  let mode = fs::metadata(&script)?.permissions().mode() & 0o777;
  assert_eq!(mode, 0o755);

  Ok(())
}

#[test]
fn test_apply_is_deterministic_across_runs() -> Result<()> {
  let build = |names: &[&str]| -> Result<Vec<String>> {
    let dir = tempdir()?;
    let root = dir.path();
    init_repo(root)?;
    for name in names {
      write_file(root, name, "x = 1\n")?;
    }
    let result = apply_headers(&Config::new(root, NOTICE));
    Ok(
      result
        .modified
        .iter()
        .map(|p| p.strip_prefix(root).map(|r| r.to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?,
    )
  };

  let first = build(&["b/z.py", "a.py", "b/a.py", "c.py"])?;
  let second = build(&["c.py", "b/a.py", "a.py", "b/z.py"])?;

  assert_eq!(first, second);
  assert_eq!(first, vec!["a.py", "b/a.py", "b/z.py", "c.py"]);

  Ok(())
}
