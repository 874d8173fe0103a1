//! Change records produced by [`compare`](super::compare).
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` and
//! serialize with the field names used in the JSON report. Optional values
//! serialize as `null`.

use crate::spec::{HttpMethod, ParameterLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How an entity differs between base and head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Present only in head
    Added,
    /// Present only in base
    Removed,
    /// Present in both, with at least one nested difference
    Modified,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after value of one named attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
}

impl FieldChange {
    /// An explicit JSON `null` is stored as `None` so the record survives a JSON round trip.
    pub fn new(field: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        FieldChange {
            field: field.into(),
            old_value: old_value.filter(|v| !v.is_null()),
            new_value: new_value.filter(|v| !v.is_null()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub name: String,
    pub location: ParameterLocation,
    pub change_type: ChangeType,
    #[serde(default)]
    pub field_changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBodyChange {
    pub change_type: ChangeType,
    #[serde(default)]
    pub field_changes: Vec<FieldChange>,
}

impl RequestBodyChange {
    /// A request body present on one side only.
    pub fn bare(change_type: ChangeType) -> Self {
        RequestBodyChange {
            change_type,
            field_changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseChange {
    /// Status code key as written in the document (`"200"`, `"4XX"`, `"default"`)
    pub status_code: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub field_changes: Vec<FieldChange>,
}

impl ResponseChange {
    /// A status code declared on one side only.
    pub fn bare(status_code: impl Into<String>, change_type: ChangeType) -> Self {
        ResponseChange {
            status_code: status_code.into(),
            change_type,
            field_changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationChange {
    pub path: String,
    pub method: HttpMethod,
    pub change_type: ChangeType,
    #[serde(default)]
    pub parameter_changes: Vec<ParameterChange>,
    #[serde(default)]
    pub request_body_change: Option<RequestBodyChange>,
    #[serde(default)]
    pub response_changes: Vec<ResponseChange>,
}

impl OperationChange {
    /// An operation present on one side only; carries no nested detail.
    pub fn bare(path: impl Into<String>, method: HttpMethod, change_type: ChangeType) -> Self {
        OperationChange {
            path: path.into(),
            method,
            change_type,
            parameter_changes: Vec::new(),
            request_body_change: None,
            response_changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPropertyChange {
    pub name: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub field_changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaChange {
    pub name: String,
    pub change_type: ChangeType,
    #[serde(default)]
    pub property_changes: Vec<SchemaPropertyChange>,
}

impl SchemaChange {
    /// A schema name defined on one side only.
    pub fn bare(name: impl Into<String>, change_type: ChangeType) -> Self {
        SchemaChange {
            name: name.into(),
            change_type,
            property_changes: Vec::new(),
        }
    }
}

/// Root of a comparison result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDiff {
    #[serde(default)]
    pub operation_changes: Vec<OperationChange>,
    #[serde(default)]
    pub schema_changes: Vec<SchemaChange>,
}

impl ApiDiff {
    /// True when base and head are structurally equivalent.
    pub fn is_empty(&self) -> bool {
        self.operation_changes.is_empty() && self.schema_changes.is_empty()
    }

    /// Number of operation changes of the given kind.
    pub fn count_operations(&self, change_type: ChangeType) -> usize {
        self.operation_changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .count()
    }

    /// Number of schema changes of the given kind.
    pub fn count_schemas(&self, change_type: ChangeType) -> usize {
        self.schema_changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .count()
    }
}
