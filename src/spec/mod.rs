mod document;
mod load;
mod types;

pub use document::{ComponentKind, Document, ReferenceError, ResolvedComponent};
pub use load::{is_url, load_document, parse_document, LoadError, SourceFormat};
pub use types::{Endpoint, HttpMethod, ParameterLocation};
