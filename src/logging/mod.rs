//! # Logging Module
//!
//! Two channels of output live here:
//! - User-facing messages through [`info_log!`] (stdout) and [`verbose_log!`]
//!   (stderr), governed by the quiet/verbose output mode
//! - Diagnostic events through the `tracing` facade, installed once by the
//!   binary with [`init_tracing`]
//!
//! Library code never owns a logger. It emits `tracing` events and leaves the
//! subscriber choice to whoever embeds it.
//!
//! ## Example
//!
//! ```rust
//! use license_header::logging::{ColorMode, set_verbose};
//! use license_header::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Scanning: {}", "src/");
//! info_log!("Header added to: {}", "src/main.py");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, level_directive, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
///
/// Uses the same format string syntax as [`println!`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an [`info_log!`] message, colored when stdout supports it.
///
/// # Parameters
///
/// * `message` - The message to print
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
