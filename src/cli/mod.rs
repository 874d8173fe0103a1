//! # CLI Module
//!
//! Command-line front end for the diff engine.
//!
//! ## Commands
//!
//! ### `diff`
//!
//! Compare two documents and print the changes:
//!
//! ```bash
//! specdelta diff openapi.yaml openapi.next.yaml
//! specdelta diff --format json https://example.com/v1.json v2.json
//! ```
//!
//! Options:
//! - `--format <FORMAT>` - `markdown` (default) or `json`, case-insensitive
//!
//! ### `inspect`
//!
//! List the endpoints of one document with their parameters, request bodies and
//! responses, then its component schemas with their properties:
//!
//! ```bash
//! specdelta inspect openapi.yaml
//! ```
//!
//! ## Exit Status
//!
//! `0` on success. `1` when a document cannot be loaded; the reason is printed
//! on stderr as `Error: file not found: <path>` or
//! `Error loading base schema: <reason>` (`head schema` / `schema` for the
//! other arguments).
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use specdelta::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let code = run_cli(Cli::parse())?;
//! ```

mod commands;
mod inspect;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, CliLoadError, Commands, OutputFormat};
