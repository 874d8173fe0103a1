use oas3::spec::{ObjectOrReference, Operation, Parameter, ParameterIn as OasParameterLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods an OpenAPI path item can declare an operation for.
///
/// Serialized lowercase (`"get"`), which is also the ordering key used when
/// sorting operations for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Lowercase form, as it appears as a key in a path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }

    /// Uppercase form used in human-readable output.
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OasParameterLocation> for ParameterLocation {
    fn from(loc: OasParameterLocation) -> Self {
        match loc {
            OasParameterLocation::Path => ParameterLocation::Path,
            OasParameterLocation::Query => ParameterLocation::Query,
            OasParameterLocation::Header => ParameterLocation::Header,
            OasParameterLocation::Cookie => ParameterLocation::Cookie,
        }
    }
}

/// One operation at one path, with path-level parameters already merged in.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    /// Inherited path-level parameters first, then the operation's own.
    pub parameters: Vec<&'a ObjectOrReference<Parameter>>,
}

impl Endpoint<'_> {
    pub fn summary(&self) -> Option<&str> {
        self.operation.summary.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.operation.deprecated.unwrap_or(false)
    }
}
