//! # license-header
//!
//! A tool that applies a license header to every eligible source file in a
//! repository and checks that it is present.
//!
//! `license-header` modifies files in place and never adds a header to a file
//! that already carries it. Every run is deterministic: the same repository
//! state always yields the same files, in the same order, with the same bytes.
//!
//! ## Features
//!
//! * Recursive scanning with extension filtering, exclude patterns, and
//!   binary and symlink detection
//! * Shebang-aware header insertion
//! * Preservation of encodings, byte-order marks, line endings and file
//!   permissions
//! * Atomic writes through a temporary file and rename
//! * Dry runs with diff previews
//! * JSON and Markdown reports
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use license_header::config::Config;
//! use license_header::processor::{apply_headers, check_headers};
//!
//! let config = Config::new("/path/to/repo", "# Copyright 2025 Example Corp\n");
//!
//! let result = apply_headers(&config);
//! println!("{} files modified", result.modified.len());
//!
//! let check = check_headers(&config);
//! assert!(check.is_compliant());
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Scanning, header detection and insertion
//! * [`config`] - Layered configuration loading
//! * [`report`] - JSON and Markdown reports
//! * [`logging`] - Output modes and diagnostic logging
//!
//! [`processor`]: crate::processor
//! [`config`]: crate::config
//! [`report`]: crate::report
//! [`logging`]: crate::logging

pub mod cli;
pub mod config;
pub mod diff;
pub mod file_filter;
pub mod ignore;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod workspace;
