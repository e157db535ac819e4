//! perfilar CLI - Tabular Dataset Profiling and Quality Assessment
//!
//! Command-line interface for perfilar operations.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use std::process::ExitCode;

fn main() -> ExitCode {
    perfilar::cli::run()
}
