//! # Content Transformer Module
//!
//! Pure text operations behind header detection and insertion: header
//! normalization, newline style detection and conversion, shebang extraction,
//! and the `has_header` / `insert_header` pair.
//!
//! None of these functions touch the filesystem. They operate on decoded text
//! and never reorder or rewrite anything but the header region.

use std::fmt;

/// Line terminator style of a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
  /// `\n`
  #[default]
  Lf,
  /// `\r\n`
  Crlf,
}

impl NewlineStyle {
  /// The terminator as a string.
  pub const fn as_str(self) -> &'static str {
    match self {
      NewlineStyle::Lf => "\n",
      NewlineStyle::Crlf => "\r\n",
    }
  }
}

impl fmt::Display for NewlineStyle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NewlineStyle::Lf => write!(f, "LF"),
      NewlineStyle::Crlf => write!(f, "CRLF"),
    }
  }
}

/// Normalizes a header to its canonical form: trailing whitespace removed and
/// exactly one `\n` appended.
///
/// # Parameters
///
/// * `header` - Raw header text, as read from the header file
///
/// # Returns
///
/// The normalized header.
pub fn normalize_header(header: &str) -> String {
  let mut normalized = String::with_capacity(header.len() + 1);
  normalized.push_str(header.trim_end());
  normalized.push('\n');
  normalized
}

/// Detects the dominant line terminator of `content`.
///
/// CRLF wins only when it strictly outnumbers bare LF. Content without any
/// newline is LF.
pub fn detect_newline_style(content: &str) -> NewlineStyle {
  let crlf = content.matches("\r\n").count();
  let lf = content.matches('\n').count() - crlf;

  if crlf > lf { NewlineStyle::Crlf } else { NewlineStyle::Lf }
}

/// Converts every line terminator in `text` to `style`.
///
/// CRLF is first folded to LF so mixed input never produces `\r\r\n`.
pub fn convert_newlines(text: &str, style: NewlineStyle) -> String {
  let normalized = text.replace("\r\n", "\n");
  match style {
    NewlineStyle::Lf => normalized,
    NewlineStyle::Crlf => normalized.replace('\n', "\r\n"),
  }
}

/// Splits a leading shebang line off `content`.
///
/// # Returns
///
/// A tuple containing:
/// - The shebang line including its `\n`, or the whole content when it has no
///   newline; `None` when the content does not start with `#!`
/// - The remaining content
pub fn extract_shebang(content: &str) -> (Option<&str>, &str) {
  if !content.starts_with("#!") {
    return (None, content);
  }

  match content.find('\n') {
    Some(end) => {
      let (shebang, rest) = content.split_at(end + 1);
      (Some(shebang), rest)
    }
    None => (Some(content), ""),
  }
}

/// Checks whether `content` already starts with `header`.
///
/// The shebang line is ignored, CRLF is compared as LF, and blank lines before
/// the header are tolerated. The full normalized header must be present,
/// trailing newline included, so a truncated header or a header line with
/// extra trailing text does not count.
///
/// # Parameters
///
/// * `content` - Decoded file content
/// * `header` - Header text, normalized internally
///
/// # Returns
///
/// `true` if the header is present.
pub fn has_header(content: &str, header: &str) -> bool {
  let header = normalize_header(header);
  let (_, rest) = extract_shebang(content);
  let rest = rest.replace("\r\n", "\n");

  if rest.starts_with(&header) {
    return true;
  }

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if !line.trim().is_empty() {
      return rest[offset..].starts_with(&header);
    }
    offset += line.len();
  }

  false
}

/// Inserts `header` at the top of `content`, after any shebang line.
///
/// The header is normalized and converted to the content's newline style. A
/// shebang without a trailing newline gets one, so the header never lands on
/// the shebang's line.
///
/// # Parameters
///
/// * `content` - Decoded file content
/// * `header` - Header text, normalized internally
///
/// # Returns
///
/// The new file content.
pub fn insert_header(content: &str, header: &str) -> String {
  let style = detect_newline_style(content);
  let header = convert_newlines(&normalize_header(header), style);

  match extract_shebang(content) {
    (Some(shebang), rest) => {
      let mut output = String::with_capacity(content.len() + header.len() + 2);
      output.push_str(shebang);
      if !shebang.ends_with('\n') {
        output.push_str(style.as_str());
      }
      output.push_str(&header);
      output.push_str(rest);
      output
    }
    (None, _) => {
      let mut output = String::with_capacity(content.len() + header.len());
      output.push_str(&header);
      output.push_str(content);
      output
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_header() {
    assert_eq!(normalize_header("# Copyright"), "# Copyright\n");
    assert_eq!(normalize_header("# Copyright\n\n\n"), "# Copyright\n");
    assert_eq!(normalize_header("# Copyright  \t\n"), "# Copyright\n");
    assert_eq!(normalize_header("# A\n# B"), "# A\n# B\n");
  }

  #[test]
  fn test_detect_newline_style() {
    assert_eq!(detect_newline_style(""), NewlineStyle::Lf);
    assert_eq!(detect_newline_style("no newline"), NewlineStyle::Lf);
    assert_eq!(detect_newline_style("a\nb\n"), NewlineStyle::Lf);
    assert_eq!(detect_newline_style("a\r\nb\r\n"), NewlineStyle::Crlf);
    // Ties go to LF
    assert_eq!(detect_newline_style("a\r\nb\n"), NewlineStyle::Lf);
    assert_eq!(detect_newline_style("a\r\nb\r\nc\n"), NewlineStyle::Crlf);
  }

  #[test]
  fn test_convert_newlines() {
    assert_eq!(convert_newlines("a\nb\n", NewlineStyle::Crlf), "a\r\nb\r\n");
    assert_eq!(convert_newlines("a\r\nb\r\n", NewlineStyle::Lf), "a\nb\n");
    assert_eq!(convert_newlines("a\r\nb\n", NewlineStyle::Crlf), "a\r\nb\r\n");
  }

  #[test]
  fn test_extract_shebang() {
    assert_eq!(
      extract_shebang("#!/usr/bin/env python\nprint(1)\n"),
      (Some("#!/usr/bin/env python\n"), "print(1)\n")
    );
    assert_eq!(
      extract_shebang("#!/usr/bin/env python"),
      (Some("#!/usr/bin/env python"), "")
    );
    assert_eq!(extract_shebang("print(1)\n"), (None, "print(1)\n"));
    assert_eq!(extract_shebang(" #!/bin/sh\n"), (None, " #!/bin/sh\n"));
  }

  #[test]
  fn test_has_header_exact() {
    assert!(has_header("# Copyright 2025\nprint(1)\n", "# Copyright 2025"));
    assert!(has_header("# Copyright 2025\n", "# Copyright 2025\n\n"));
    assert!(!has_header("print(1)\n", "# Copyright 2025"));
    assert!(!has_header("", "# Copyright 2025"));
  }

  #[test]
  fn test_has_header_after_shebang() {
    let content = "#!/usr/bin/env python\n# Copyright 2025\nprint(1)\n";
    assert!(has_header(content, "# Copyright 2025"));
  }

  #[test]
  fn test_has_header_after_blank_lines() {
    assert!(has_header("\n\n  \n# Copyright 2025\nx\n", "# Copyright 2025"));
    assert!(!has_header("\n\n\n", "# Copyright 2025"));
  }

  #[test]
  fn test_has_header_crlf() {
    assert!(has_header("# A\r\n# B\r\ncode\r\n", "# A\n# B\n"));
  }

  #[test]
  fn test_has_header_rejects_partial_match() {
    let header = "# Copyright 2025\n# All rights reserved.";
    assert!(!has_header("# Copyright 2025\nprint(1)\n", header));
    assert!(!has_header("# Copyright 2025 Extra\nprint(1)\n", "# Copyright 2025"));
    // Header present only without its trailing newline
    assert!(!has_header("# Copyright 2025", "# Copyright 2025"));
  }

  #[test]
  fn test_has_header_ignores_header_further_down() {
    assert!(!has_header("import os\n# Copyright 2025\n", "# Copyright 2025"));
  }

  #[test]
  fn test_insert_header_empty_content() {
    assert_eq!(insert_header("", "# Copyright 2025"), "# Copyright 2025\n");
  }

  #[test]
  fn test_insert_header_plain() {
    assert_eq!(insert_header("print(1)\n", "# NOTICE"), "# NOTICE\nprint(1)\n");
  }

  #[test]
  fn test_insert_header_after_shebang() {
    assert_eq!(
      insert_header("#!/usr/bin/env python\nprint(2)\n", "# NOTICE\n"),
      "#!/usr/bin/env python\n# NOTICE\nprint(2)\n"
    );
  }

  #[test]
  fn test_insert_header_shebang_without_newline() {
    assert_eq!(
      insert_header("#!/usr/bin/env python", "# Copyright 2025"),
      "#!/usr/bin/env python\n# Copyright 2025\n"
    );
  }

  #[test]
  fn test_insert_header_crlf() {
    assert_eq!(
      insert_header("line1\r\nline2\r\n", "# A\n# B"),
      "# A\r\n# B\r\nline1\r\nline2\r\n"
    );
    assert_eq!(
      insert_header("#!/bin/sh\r\necho\r\n", "# A"),
      "#!/bin/sh\r\n# A\r\necho\r\n"
    );
  }

  #[test]
  fn test_insert_then_has_is_idempotent() {
    let header = "# Copyright 2025\n# Example Corp";
    for content in ["", "x = 1\n", "#!/bin/sh\necho\n", "a\r\nb\r\n", "\n\nbody"] {
      let inserted = insert_header(content, header);
      assert!(has_header(&inserted, header), "header missing after insert into {content:?}");
    }
  }

  #[test]
  fn test_newline_style_display() {
    assert_eq!(NewlineStyle::Lf.to_string(), "LF");
    assert_eq!(NewlineStyle::Crlf.to_string(), "CRLF");
    assert_eq!(NewlineStyle::Crlf.as_str(), "\r\n");
  }
}
