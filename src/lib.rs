//! # specdelta
//!
//! **specdelta** compares two [OpenAPI 3.x](https://spec.openapis.org/oas/v3.1.0)
//! documents and reports what changed between them: added, removed and
//! modified operations, parameters, request bodies, responses, component
//! schemas and schema properties.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Loading documents from files or URLs, endpoint listing and `$ref` resolution
//! - **[`diff`]** - The comparator, the change model and the JSON/Markdown renderers
//! - **[`cli`]** - The `specdelta` command-line front end
//! - **[`config`]** - Environment-driven loader settings
//! - **[`logging`]** - `tracing` subscriber setup (stderr only)
//!
//! ### Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as specdelta diff
//!     participant Load as spec::load_document
//!     participant Cmp as diff::compare
//!     participant Out as diff::to_markdown / to_json
//!
//!     CLI->>Load: base source
//!     Load-->>CLI: Document
//!     CLI->>Load: head source
//!     Load-->>CLI: Document
//!     CLI->>Cmp: compare(&base, &head)
//!     Cmp-->>CLI: ApiDiff
//!     CLI->>Out: render
//!     Out-->>CLI: String (stdout)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use specdelta::{compare, load_document, to_markdown, RuntimeConfig};
//!
//! let config = RuntimeConfig::default();
//! let base = load_document("petstore.yaml", &config)?;
//! let head = load_document("petstore_v2.yaml", &config)?;
//! let diff = compare(&base, &head);
//! if !diff.is_empty() {
//!     println!("{}", to_markdown(&diff));
//! }
//! # Ok::<(), specdelta::LoadError>(())
//! ```
//!
//! ## Scope
//!
//! The comparison is structural and purely descriptive. It does not classify
//! changes as breaking, does not follow chains of references, and only walks
//! schema properties one level deep.

pub mod cli;
pub mod config;
pub mod diff;
pub mod logging;
pub mod spec;

pub use config::RuntimeConfig;
pub use diff::{compare, from_json, to_json, to_markdown, ApiDiff, ChangeType};
pub use spec::{load_document, Document, LoadError};
