use super::document::Document;
use crate::config::RuntimeConfig;
use oas3::OpenApiV3Spec;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::fmt;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Serialization format of a spec document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick a format from a file path or URL path: `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            SourceFormat::Yaml
        } else {
            SourceFormat::Json
        }
    }
}

/// Failure to turn a source (path or URL) into a [`Document`].
#[derive(Debug)]
pub enum LoadError {
    /// The local file does not exist
    NotFound {
        /// Path as given by the caller
        path: String,
    },
    /// The local file exists but could not be read
    Io {
        /// Path as given by the caller
        path: String,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The URL could not be fetched, or answered with a non-success status
    Fetch {
        /// URL as given by the caller
        url: String,
        /// Transport or status description
        message: String,
    },
    /// The content is not valid JSON/YAML, or not a valid OpenAPI document
    Parse {
        /// Path or URL the content came from
        source: String,
        /// Parser error description
        message: String,
    },
    /// The `openapi` field names a major version other than 3
    UnsupportedVersion {
        /// Path or URL the content came from
        source: String,
        /// Value of the `openapi` field
        version: String,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { path } => write!(f, "file not found: {}", path),
            LoadError::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            LoadError::Fetch { url, message } => write!(f, "failed to fetch {}: {}", url, message),
            LoadError::Parse { source, message } => {
                write!(f, "failed to parse {}: {}", source, message)
            }
            LoadError::UnsupportedVersion { source, version } => write!(
                f,
                "{} declares OpenAPI version '{}'; only 3.0 and 3.1 are supported",
                source, version
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// True when `source` should be fetched over HTTP rather than read from disk.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load a spec document from a local path or an `http(s)://` URL.
pub fn load_document(source: &str, config: &RuntimeConfig) -> Result<Document, LoadError> {
    let (content, format) = if is_url(source) {
        fetch_url(source, config)?
    } else {
        (read_file(source)?, SourceFormat::from_path(source))
    };

    let document = parse_document(&content, format, source)?;
    info!(
        source = source,
        title = document.title(),
        endpoints = document.endpoints().len(),
        schemas = document.schemas().len(),
        "Loaded OpenAPI document"
    );
    Ok(document)
}

/// Parse document text. `origin` only labels errors.
pub fn parse_document(content: &str, format: SourceFormat, origin: &str) -> Result<Document, LoadError> {
    let parse_error = |message: String| LoadError::Parse {
        source: origin.to_string(),
        message,
    };
    let spec: OpenApiV3Spec = match format {
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
    };

    if !spec.openapi.starts_with("3.") {
        return Err(LoadError::UnsupportedVersion {
            source: origin.to_string(),
            version: spec.openapi.clone(),
        });
    }
    Ok(Document::new(spec))
}

fn read_file(path: &str) -> Result<String, LoadError> {
    if !Path::new(path).exists() {
        return Err(LoadError::NotFound {
            path: path.to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })
}

fn fetch_url(source: &str, config: &RuntimeConfig) -> Result<(String, SourceFormat), LoadError> {
    let fetch_error = |message: String| LoadError::Fetch {
        url: source.to_string(),
        message,
    };

    let parsed = url::Url::parse(source).map_err(|e| fetch_error(e.to_string()))?;
    let client = Client::builder()
        .timeout(config.fetch_timeout)
        .redirect(Policy::limited(config.max_redirects))
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    debug!(url = source, timeout_secs = config.fetch_timeout.as_secs(), "Fetching spec");
    let response = client
        .get(parsed.clone())
        .send()
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("server responded with {}", status)));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    let format = if content_type.contains("yaml") {
        SourceFormat::Yaml
    } else {
        SourceFormat::from_path(parsed.path())
    };

    let body = response.text().map_err(|e| fetch_error(e.to_string()))?;
    Ok((body, format))
}
