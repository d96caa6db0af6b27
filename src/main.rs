//! # license-header
//!
//! A tool that applies a license header to source files and checks that it
//! is present.

use anyhow::Result;
use license_header::cli::{Cli, Command, run_apply, run_check};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  match cli.command {
    Command::Apply(args) => run_apply(args),
    Command::Check(args) => run_check(args),
  }
}
