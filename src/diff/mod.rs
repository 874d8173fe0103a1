//! # Diff Module
//!
//! Structural comparison of two OpenAPI documents and rendering of the result.
//!
//! - [`compare`] walks base and head and produces an [`ApiDiff`]
//! - [`to_json`] / [`from_json`] serialize the diff for machines
//! - [`to_markdown`] renders it for people
//!
//! ## Example
//!
//! ```rust,no_run
//! use specdelta::config::RuntimeConfig;
//! use specdelta::diff::{compare, to_markdown};
//! use specdelta::spec::load_document;
//!
//! let config = RuntimeConfig::from_env();
//! let base = load_document("openapi.yaml", &config)?;
//! let head = load_document("openapi.next.yaml", &config)?;
//! println!("{}", to_markdown(&compare(&base, &head)));
//! # Ok::<(), specdelta::spec::LoadError>(())
//! ```

mod compare;
mod model;
mod report;

pub use compare::compare;
pub use model::{
    ApiDiff, ChangeType, FieldChange, OperationChange, ParameterChange, RequestBodyChange,
    ResponseChange, SchemaChange, SchemaPropertyChange,
};
pub use report::{from_json, to_json, to_markdown};
