use super::inspect::render_inspect;
use crate::config::RuntimeConfig;
use crate::diff::{compare, to_json, to_markdown};
use crate::spec::{load_document, Document, LoadError};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

/// Command-line interface for specdelta
///
/// Compares OpenAPI documents and summarizes what changed between them.
#[derive(Parser)]
#[command(name = "specdelta")]
#[command(version, about = "Compare OpenAPI 3.x documents", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compare two OpenAPI documents and print the differences
    ///
    /// BASE and HEAD can each be a local file path (JSON or YAML) or an
    /// http(s) URL.
    Diff {
        /// The older document
        #[arg(value_name = "BASE")]
        base: String,

        /// The newer document
        #[arg(value_name = "HEAD")]
        head: String,

        /// Output format
        #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Print the endpoints and schemas of an OpenAPI document
    Inspect {
        /// Local file path (JSON or YAML) or an http(s) URL
        #[arg(value_name = "SCHEMA")]
        schema: String,
    },
}

/// Report format for the `diff` command
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable Markdown
    Markdown,
}

/// Which argument a document was loaded from; selects the error wording.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Role {
    Base,
    Head,
    Schema,
}

/// A document given on the command line could not be loaded.
#[derive(Debug)]
pub struct CliLoadError {
    role: Role,
    error: LoadError,
}

impl fmt::Display for CliLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_not_found() {
            return write!(f, "Error: {}", self.error);
        }
        let label = match self.role {
            Role::Base => "base schema",
            Role::Head => "head schema",
            Role::Schema => "schema",
        };
        write!(f, "Error loading {}: {}", label, self.error)
    }
}

impl std::error::Error for CliLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Execute the CLI command provided by the user
///
/// Load failures are reported on stderr and turn into exit status 1.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or written to stdout.
pub fn run_cli(cli: Cli) -> Result<ExitCode> {
    let config = RuntimeConfig::from_env();
    debug!(?config, "Runtime configuration");

    let output = match &cli.command {
        Commands::Diff { base, head, format } => diff_report(base, head, *format, &config),
        Commands::Inspect { schema } => inspect_report(schema, &config),
    };

    let text = match output {
        Ok(text) => text,
        Err(e) => match e.downcast_ref::<CliLoadError>() {
            Some(load_error) => {
                eprintln!("{}", load_error);
                return Ok(ExitCode::FAILURE);
            }
            None => return Err(e),
        },
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text).context("Failed to write report to stdout")?;
    Ok(ExitCode::SUCCESS)
}

/// Load both documents, compare them and render the report.
///
/// # Errors
///
/// Load failures surface as [`CliLoadError`].
pub(crate) fn diff_report(
    base: &str,
    head: &str,
    format: OutputFormat,
    config: &RuntimeConfig,
) -> Result<String> {
    let base_doc = load(base, Role::Base, config)?;
    let head_doc = load(head, Role::Head, config)?;

    let diff = compare(&base_doc, &head_doc);
    let text = match format {
        OutputFormat::Json => to_json(&diff).context("Failed to serialize diff")?,
        OutputFormat::Markdown => to_markdown(&diff),
    };
    Ok(text)
}

pub(crate) fn inspect_report(schema: &str, config: &RuntimeConfig) -> Result<String> {
    let doc = load(schema, Role::Schema, config)?;
    Ok(render_inspect(&doc))
}

fn load(source: &str, role: Role, config: &RuntimeConfig) -> Result<Document, CliLoadError> {
    load_document(source, config).map_err(|error| CliLoadError { role, error })
}
