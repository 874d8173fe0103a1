//! In-memory view over a parsed OpenAPI document.
//!
//! [`Document`] is the only thing the comparator sees of a spec: the endpoint
//! list (with path-level parameters merged into each operation), the named
//! component schemas, and `$ref` resolution into `#/components/...`.

use super::types::{Endpoint, HttpMethod, ParameterLocation};
use oas3::spec::{
    Components, ObjectOrReference, ObjectSchema, Operation, Parameter, PathItem, RequestBody,
    Response,
};
use oas3::OpenApiV3Spec;
use std::collections::BTreeMap;
use std::fmt;

const COMPONENTS_PREFIX: &str = "#/components/";

/// Failure to resolve a `$ref` pointer against a document's components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The pointer is not of the form `#/components/<category>/<name>`
    Malformed {
        /// The offending pointer
        pointer: String,
    },
    /// The document has no `components` section at all
    NoComponents,
    /// The category segment names a component kind that is absent or unsupported
    UnknownCategory {
        /// Category segment of the pointer
        category: String,
    },
    /// The category exists but has no entry under this name
    UnknownName {
        /// Category segment of the pointer
        category: String,
        /// Name segment of the pointer (unescaped)
        name: String,
    },
    /// The pointer resolves, but into a different kind of component than the caller needs
    CategoryMismatch {
        /// The offending pointer
        pointer: String,
        /// Category the caller required
        expected: &'static str,
    },
    /// The target is itself a `$ref`; reference chains are not followed
    Indirect {
        /// The offending pointer
        pointer: String,
    },
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Malformed { pointer } => {
                write!(f, "Unsupported reference format: {}", pointer)
            }
            ReferenceError::NoComponents => {
                write!(f, "No components defined in the OpenAPI spec")
            }
            ReferenceError::UnknownCategory { category } => {
                write!(f, "No such component category: {}", category)
            }
            ReferenceError::UnknownName { category, name } => {
                write!(
                    f,
                    "No such component named '{}' in category '{}'",
                    name, category
                )
            }
            ReferenceError::CategoryMismatch { pointer, expected } => {
                write!(
                    f,
                    "Reference '{}' does not point into components.{}",
                    pointer, expected
                )
            }
            ReferenceError::Indirect { pointer } => {
                write!(f, "Reference '{}' resolves to another reference", pointer)
            }
        }
    }
}

impl std::error::Error for ReferenceError {}

/// A component kind that can be the target of a `$ref`.
pub trait ComponentKind: Sized {
    /// Category segment used in pointers (`#/components/<CATEGORY>/...`)
    const CATEGORY: &'static str;

    fn entries(components: &Components) -> &BTreeMap<String, ObjectOrReference<Self>>;
}

impl ComponentKind for ObjectSchema {
    const CATEGORY: &'static str = "schemas";

    fn entries(components: &Components) -> &BTreeMap<String, ObjectOrReference<Self>> {
        &components.schemas
    }
}

impl ComponentKind for Parameter {
    const CATEGORY: &'static str = "parameters";

    fn entries(components: &Components) -> &BTreeMap<String, ObjectOrReference<Self>> {
        &components.parameters
    }
}

impl ComponentKind for RequestBody {
    const CATEGORY: &'static str = "requestBodies";

    fn entries(components: &Components) -> &BTreeMap<String, ObjectOrReference<Self>> {
        &components.request_bodies
    }
}

impl ComponentKind for Response {
    const CATEGORY: &'static str = "responses";

    fn entries(components: &Components) -> &BTreeMap<String, ObjectOrReference<Self>> {
        &components.responses
    }
}

/// A successfully resolved component, tagged by kind.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedComponent<'a> {
    Schema(&'a ObjectSchema),
    Parameter(&'a Parameter),
    RequestBody(&'a RequestBody),
    Response(&'a Response),
}

/// Split `#/components/<category>/<name>` into its two segments.
fn parse_pointer(pointer: &str) -> Result<(&str, String), ReferenceError> {
    let malformed = || ReferenceError::Malformed {
        pointer: pointer.to_string(),
    };
    let rest = pointer.strip_prefix(COMPONENTS_PREFIX).ok_or_else(malformed)?;
    let (category, name) = rest.split_once('/').ok_or_else(malformed)?;
    if category.is_empty() || name.is_empty() || name.contains('/') {
        return Err(malformed());
    }
    Ok((category, unescape_pointer_segment(name)))
}

/// Decode JSON-pointer escapes (`~1` is `/`, `~0` is `~`).
fn unescape_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// A parsed OpenAPI document plus the lookups the diff engine needs.
#[derive(Debug, Clone)]
pub struct Document {
    spec: OpenApiV3Spec,
}

impl Document {
    pub fn new(spec: OpenApiV3Spec) -> Self {
        Document { spec }
    }

    pub fn spec(&self) -> &OpenApiV3Spec {
        &self.spec
    }

    pub fn title(&self) -> &str {
        &self.spec.info.title
    }

    pub fn version(&self) -> &str {
        &self.spec.info.version
    }

    /// Every `(path, method, operation)` in the document.
    ///
    /// Paths come out in key order and methods in a fixed order per path.
    /// Path-level parameters are prepended to each operation's own list unless
    /// the operation already declares one with the same identity.
    pub fn endpoints(&self) -> Vec<Endpoint<'_>> {
        let mut endpoints = Vec::new();
        let Some(paths) = self.spec.paths.as_ref() else {
            return endpoints;
        };

        for (path, item) in paths {
            for (method, operation) in path_operations(item) {
                endpoints.push(Endpoint {
                    path: path.as_str(),
                    method,
                    operation,
                    parameters: self.merge_parameters(&item.parameters, &operation.parameters),
                });
            }
        }
        endpoints
    }

    /// Named component schemas, in name order.
    pub fn schemas(&self) -> Vec<(&str, &ObjectOrReference<ObjectSchema>)> {
        self.spec
            .components
            .as_ref()
            .map(|c| {
                c.schemas
                    .iter()
                    .map(|(name, schema)| (name.as_str(), schema))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve a `#/components/<category>/<name>` pointer to whatever it names.
    pub fn resolve_reference(&self, pointer: &str) -> Result<ResolvedComponent<'_>, ReferenceError> {
        let (category, _) = parse_pointer(pointer)?;
        match category {
            c if c == ObjectSchema::CATEGORY => self
                .lookup::<ObjectSchema>(pointer)
                .map(ResolvedComponent::Schema),
            c if c == Parameter::CATEGORY => self
                .lookup::<Parameter>(pointer)
                .map(ResolvedComponent::Parameter),
            c if c == RequestBody::CATEGORY => self
                .lookup::<RequestBody>(pointer)
                .map(ResolvedComponent::RequestBody),
            c if c == Response::CATEGORY => self
                .lookup::<Response>(pointer)
                .map(ResolvedComponent::Response),
            other => Err(ReferenceError::UnknownCategory {
                category: other.to_string(),
            }),
        }
    }

    /// Return the concrete value behind an inline-or-`$ref` slot.
    pub fn resolve<'a, T: ComponentKind>(
        &'a self,
        value: &'a ObjectOrReference<T>,
    ) -> Result<&'a T, ReferenceError> {
        match value {
            ObjectOrReference::Object(obj) => Ok(obj),
            ObjectOrReference::Ref { ref_path, .. } => self.lookup::<T>(ref_path),
        }
    }

    fn lookup<T: ComponentKind>(&self, pointer: &str) -> Result<&T, ReferenceError> {
        let (category, name) = parse_pointer(pointer)?;
        if category != T::CATEGORY {
            return Err(ReferenceError::CategoryMismatch {
                pointer: pointer.to_string(),
                expected: T::CATEGORY,
            });
        }
        let components = self
            .spec
            .components
            .as_ref()
            .ok_or(ReferenceError::NoComponents)?;
        let entries = T::entries(components);
        if entries.is_empty() {
            return Err(ReferenceError::UnknownCategory {
                category: category.to_string(),
            });
        }
        match entries.get(&name) {
            Some(ObjectOrReference::Object(obj)) => Ok(obj),
            Some(ObjectOrReference::Ref { .. }) => Err(ReferenceError::Indirect {
                pointer: pointer.to_string(),
            }),
            None => Err(ReferenceError::UnknownName {
                category: category.to_string(),
                name,
            }),
        }
    }

    fn merge_parameters<'a>(
        &'a self,
        path_level: &'a [ObjectOrReference<Parameter>],
        operation_level: &'a [ObjectOrReference<Parameter>],
    ) -> Vec<&'a ObjectOrReference<Parameter>> {
        let declared: Vec<ParameterIdentity> = operation_level
            .iter()
            .map(|p| self.parameter_identity(p))
            .collect();

        path_level
            .iter()
            .filter(|p| !declared.contains(&self.parameter_identity(p)))
            .chain(operation_level.iter())
            .collect()
    }

    fn parameter_identity(&self, param: &ObjectOrReference<Parameter>) -> ParameterIdentity {
        let key = |p: &Parameter| {
            ParameterIdentity::Key(p.name.clone(), ParameterLocation::from(p.location.clone()))
        };
        match param {
            ObjectOrReference::Object(p) => key(p),
            ObjectOrReference::Ref { ref_path, .. } => match self.lookup::<Parameter>(ref_path) {
                Ok(p) => key(p),
                Err(_) => ParameterIdentity::Pointer(ref_path.clone()),
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ParameterIdentity {
    Key(String, ParameterLocation),
    Pointer(String),
}

fn path_operations(item: &PathItem) -> Vec<(HttpMethod, &Operation)> {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Patch, item.patch.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
        (HttpMethod::Head, item.head.as_ref()),
        (HttpMethod::Options, item.options.as_ref()),
        (HttpMethod::Trace, item.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.map(|op| (method, op)))
    .collect()
}
