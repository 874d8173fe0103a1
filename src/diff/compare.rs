//! Structural comparison of two [`Document`]s.
//!
//! Every entity category (operations, parameters, responses, media types,
//! schemas, properties) goes through [`diff_keyed`]: build identity-keyed maps
//! for base and head, report keys present on one side only as added/removed,
//! then compare the pairs found on both sides.
//!
//! A `$ref` that fails to resolve never aborts the comparison. Parameters and
//! request bodies behind such a reference count as absent on that side; a
//! response or schema pair is skipped when either side fails. Each skip emits
//! a `debug` event.

use super::model::{
    ApiDiff, ChangeType, FieldChange, OperationChange, ParameterChange, RequestBodyChange,
    ResponseChange, SchemaChange, SchemaPropertyChange,
};
use crate::spec::{ComponentKind, Document, Endpoint, HttpMethod, ParameterLocation};
use oas3::spec::{MediaType, ObjectOrReference, ObjectSchema, Parameter, RequestBody, Response};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Where a key was found when diffing two keyed collections.
pub(crate) enum Pairing<'a, V> {
    Removed(&'a V),
    Added(&'a V),
    Both(&'a V, &'a V),
}

/// Set difference, then pairwise comparison of the intersection.
///
/// `classify` turns each key into at most one change record. Output order is
/// removed keys, then added keys, then keys on both sides, each in key order.
pub(crate) fn diff_keyed<'a, K, V, C>(
    base: &'a BTreeMap<K, V>,
    head: &'a BTreeMap<K, V>,
    mut classify: impl FnMut(&'a K, Pairing<'a, V>) -> Option<C>,
) -> Vec<C>
where
    K: Ord,
{
    let mut changes = Vec::new();
    for (key, value) in base {
        if !head.contains_key(key) {
            changes.extend(classify(key, Pairing::Removed(value)));
        }
    }
    for (key, value) in head {
        if !base.contains_key(key) {
            changes.extend(classify(key, Pairing::Added(value)));
        }
    }
    for (key, base_value) in base {
        if let Some(head_value) = head.get(key) {
            changes.extend(classify(key, Pairing::Both(base_value, head_value)));
        }
    }
    changes
}

/// Compare two documents. Pure: neither input is modified and identical inputs
/// always yield identical output.
pub fn compare(base: &Document, head: &Document) -> ApiDiff {
    let comparator = Comparator { base, head };
    let diff = ApiDiff {
        operation_changes: comparator.operations(),
        schema_changes: comparator.schemas(),
    };
    debug!(
        operations_added = diff.count_operations(ChangeType::Added),
        operations_removed = diff.count_operations(ChangeType::Removed),
        operations_modified = diff.count_operations(ChangeType::Modified),
        schemas_added = diff.count_schemas(ChangeType::Added),
        schemas_removed = diff.count_schemas(ChangeType::Removed),
        schemas_modified = diff.count_schemas(ChangeType::Modified),
        "Comparison complete"
    );
    diff
}

struct Comparator<'d> {
    base: &'d Document,
    head: &'d Document,
}

impl<'d> Comparator<'d> {
    fn operations(&self) -> Vec<OperationChange> {
        let base_endpoints = self.base.endpoints();
        let head_endpoints = self.head.endpoints();
        let base_ops = endpoint_map(&base_endpoints);
        let head_ops = endpoint_map(&head_endpoints);

        diff_keyed(&base_ops, &head_ops, |&(path, method), pairing| match pairing {
            Pairing::Removed(_) => Some(OperationChange::bare(path, method, ChangeType::Removed)),
            Pairing::Added(_) => Some(OperationChange::bare(path, method, ChangeType::Added)),
            Pairing::Both(base_ep, head_ep) => self.operation(base_ep, head_ep),
        })
    }

    fn operation(&self, base: &Endpoint<'d>, head: &Endpoint<'d>) -> Option<OperationChange> {
        let location = format!("{} {}", base.method.as_upper(), base.path);
        let parameter_changes = self.parameters(&location, &base.parameters, &head.parameters);
        let request_body_change = self.request_body(
            &location,
            base.operation.request_body.as_ref(),
            head.operation.request_body.as_ref(),
        );
        let response_changes = self.responses(&location, base, head);

        if parameter_changes.is_empty() && request_body_change.is_none() && response_changes.is_empty() {
            return None;
        }
        Some(OperationChange {
            path: base.path.to_string(),
            method: base.method,
            change_type: ChangeType::Modified,
            parameter_changes,
            request_body_change,
            response_changes,
        })
    }

    fn parameters(
        &self,
        location: &str,
        base: &[&'d ObjectOrReference<Parameter>],
        head: &[&'d ObjectOrReference<Parameter>],
    ) -> Vec<ParameterChange> {
        let base_params = parameter_map(self.base, location, base);
        let head_params = parameter_map(self.head, location, head);

        diff_keyed(&base_params, &head_params, |(name, loc), pairing| {
            let (change_type, field_changes) = match pairing {
                Pairing::Removed(_) => (ChangeType::Removed, Vec::new()),
                Pairing::Added(_) => (ChangeType::Added, Vec::new()),
                Pairing::Both(b, h) => {
                    let changes = compare_parameter_fields(b, h);
                    if changes.is_empty() {
                        return None;
                    }
                    (ChangeType::Modified, changes)
                }
            };
            Some(ParameterChange {
                name: name.clone(),
                location: *loc,
                change_type,
                field_changes,
            })
        })
    }

    fn request_body(
        &self,
        location: &str,
        base: Option<&'d ObjectOrReference<RequestBody>>,
        head: Option<&'d ObjectOrReference<RequestBody>>,
    ) -> Option<RequestBodyChange> {
        let base = base.and_then(|rb| resolve_or_skip(self.base, rb, location));
        let head = head.and_then(|rb| resolve_or_skip(self.head, rb, location));

        let (base, head) = match (base, head) {
            (None, None) => return None,
            (None, Some(_)) => return Some(RequestBodyChange::bare(ChangeType::Added)),
            (Some(_), None) => return Some(RequestBodyChange::bare(ChangeType::Removed)),
            (Some(b), Some(h)) => (b, h),
        };

        let mut field_changes = Vec::new();
        push_if_changed(
            &mut field_changes,
            "required",
            Some(Value::Bool(base.required.unwrap_or(false))),
            Some(Value::Bool(head.required.unwrap_or(false))),
        );
        push_if_changed(
            &mut field_changes,
            "description",
            string_value(&base.description),
            string_value(&head.description),
        );
        field_changes.extend(media_type_changes(&media_map(&base.content), &media_map(&head.content)));

        if field_changes.is_empty() {
            return None;
        }
        Some(RequestBodyChange {
            change_type: ChangeType::Modified,
            field_changes,
        })
    }

    fn responses(&self, location: &str, base: &Endpoint<'d>, head: &Endpoint<'d>) -> Vec<ResponseChange> {
        let base_responses = response_map(base);
        let head_responses = response_map(head);

        diff_keyed(&base_responses, &head_responses, |&code, pairing| match pairing {
            Pairing::Removed(_) => Some(ResponseChange::bare(code, ChangeType::Removed)),
            Pairing::Added(_) => Some(ResponseChange::bare(code, ChangeType::Added)),
            Pairing::Both(b, h) => {
                let response_location = format!("{} response {}", location, code);
                let b = resolve_or_skip(self.base, *b, &response_location)?;
                let h = resolve_or_skip(self.head, *h, &response_location)?;
                let field_changes = compare_response_fields(b, h);
                if field_changes.is_empty() {
                    return None;
                }
                Some(ResponseChange {
                    status_code: code.to_string(),
                    change_type: ChangeType::Modified,
                    field_changes,
                })
            }
        })
    }

    fn schemas(&self) -> Vec<SchemaChange> {
        let base_schemas: BTreeMap<&str, &ObjectOrReference<ObjectSchema>> =
            self.base.schemas().into_iter().collect();
        let head_schemas: BTreeMap<&str, &ObjectOrReference<ObjectSchema>> =
            self.head.schemas().into_iter().collect();

        diff_keyed(&base_schemas, &head_schemas, |&name, pairing| match pairing {
            Pairing::Removed(_) => Some(SchemaChange::bare(name, ChangeType::Removed)),
            Pairing::Added(_) => Some(SchemaChange::bare(name, ChangeType::Added)),
            Pairing::Both(b, h) => {
                let location = format!("schema {}", name);
                let b = schema_json(resolve_or_skip(self.base, *b, &location)?)?;
                let h = schema_json(resolve_or_skip(self.head, *h, &location)?)?;
                let (SchemaValue::Concrete(b), SchemaValue::Concrete(h)) =
                    (SchemaValue::classify(&b), SchemaValue::classify(&h))
                else {
                    return None;
                };
                let property_changes = compare_schema_properties(b, h);
                if property_changes.is_empty() {
                    return None;
                }
                Some(SchemaChange {
                    name: name.to_string(),
                    change_type: ChangeType::Modified,
                    property_changes,
                })
            }
        })
    }
}

/// A schema position seen through its JSON form: a `$ref` pointer, an inline
/// schema object, or anything else (e.g. a boolean schema).
enum SchemaValue<'a> {
    Reference(&'a str),
    Concrete(&'a Map<String, Value>),
    Other,
}

impl<'a> SchemaValue<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(obj) => match obj.get("$ref").and_then(Value::as_str) {
                Some(pointer) => SchemaValue::Reference(pointer),
                None => SchemaValue::Concrete(obj),
            },
            _ => SchemaValue::Other,
        }
    }
}

fn endpoint_map<'e, 'd>(endpoints: &'e [Endpoint<'d>]) -> BTreeMap<(&'d str, HttpMethod), &'e Endpoint<'d>> {
    endpoints.iter().map(|e| ((e.path, e.method), e)).collect()
}

fn parameter_map<'d>(
    doc: &'d Document,
    location: &str,
    params: &[&'d ObjectOrReference<Parameter>],
) -> BTreeMap<(String, ParameterLocation), &'d Parameter> {
    params
        .iter()
        .copied()
        .filter_map(|p| resolve_or_skip(doc, p, location))
        .map(|p| ((p.name.clone(), ParameterLocation::from(p.location.clone())), p))
        .collect()
}

fn response_map<'d>(endpoint: &Endpoint<'d>) -> BTreeMap<&'d str, &'d ObjectOrReference<Response>> {
    endpoint
        .operation
        .responses
        .iter()
        .flatten()
        .map(|(code, response)| (code.as_str(), response))
        .collect()
}

fn media_map<'c>(
    content: impl IntoIterator<Item = (&'c String, &'c MediaType)>,
) -> BTreeMap<&'c str, &'c MediaType> {
    content
        .into_iter()
        .map(|(mt, media)| (mt.as_str(), media))
        .collect()
}

fn resolve_or_skip<'d, T: ComponentKind>(
    doc: &'d Document,
    value: &'d ObjectOrReference<T>,
    location: &str,
) -> Option<&'d T> {
    match doc.resolve(value) {
        Ok(resolved) => Some(resolved),
        Err(err) => {
            debug!(
                location = location,
                category = T::CATEGORY,
                error = %err,
                "Skipping entity with unresolved reference"
            );
            None
        }
    }
}

fn push_if_changed(changes: &mut Vec<FieldChange>, field: &str, old: Option<Value>, new: Option<Value>) {
    if old != new {
        changes.push(FieldChange::new(field, old, new));
    }
}

fn string_value(s: &Option<String>) -> Option<Value> {
    s.as_ref().map(|s| Value::String(s.clone()))
}

fn compare_parameter_fields(base: &Parameter, head: &Parameter) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    push_if_changed(
        &mut changes,
        "required",
        Some(Value::Bool(base.required.unwrap_or(false))),
        Some(Value::Bool(head.required.unwrap_or(false))),
    );
    push_if_changed(
        &mut changes,
        "description",
        string_value(&base.description),
        string_value(&head.description),
    );
    push_if_changed(
        &mut changes,
        "deprecated",
        Some(Value::Bool(base.deprecated.unwrap_or(false))),
        Some(Value::Bool(head.deprecated.unwrap_or(false))),
    );

    // Inline schemas only; a `$ref` on either side skips the type check.
    if let (Some(ObjectOrReference::Object(b)), Some(ObjectOrReference::Object(h))) =
        (&base.schema, &head.schema)
    {
        let old = schema_json(b).and_then(|v| v.get("type").and_then(type_name));
        let new = schema_json(h).and_then(|v| v.get("type").and_then(type_name));
        push_if_changed(&mut changes, "schema.type", old.map(Value::String), new.map(Value::String));
    }
    changes
}

fn compare_response_fields(base: &Response, head: &Response) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    push_if_changed(
        &mut changes,
        "description",
        string_value(&base.description),
        string_value(&head.description),
    );

    let base_media = media_map(&base.content);
    let head_media = media_map(&head.content);
    changes.extend(media_type_changes(&base_media, &head_media));

    // Only `$ref` targets are compared; inline schemas are not walked here.
    changes.extend(diff_keyed(&base_media, &head_media, |&mt, pairing| match pairing {
        Pairing::Both(b, h) => {
            let old = schema_pointer(b);
            let new = schema_pointer(h);
            (old != new).then(|| {
                FieldChange::new(
                    format!("content.{}.schema", mt),
                    old.map(|p| Value::String(p.to_string())),
                    new.map(|p| Value::String(p.to_string())),
                )
            })
        }
        _ => None,
    }));
    changes
}

/// One `content.<media type>` field change per media type present on one side only.
fn media_type_changes(
    base: &BTreeMap<&str, &MediaType>,
    head: &BTreeMap<&str, &MediaType>,
) -> Vec<FieldChange> {
    diff_keyed(base, head, |&mt, pairing| {
        let field = format!("content.{}", mt);
        let media_type = Some(Value::String(mt.to_string()));
        match pairing {
            Pairing::Removed(_) => Some(FieldChange::new(field, media_type, None)),
            Pairing::Added(_) => Some(FieldChange::new(field, None, media_type)),
            Pairing::Both(..) => None,
        }
    })
}

fn schema_pointer(media: &MediaType) -> Option<&str> {
    match media.schema.as_ref()? {
        ObjectOrReference::Ref { ref_path, .. } => Some(ref_path.as_str()),
        ObjectOrReference::Object(_) => None,
    }
}

/// JSON form of a schema, which is what property-level comparison works on.
fn schema_json(schema: &ObjectSchema) -> Option<Value> {
    serde_json::to_value(schema).ok()
}

/// String form of a `type` keyword: `"string"`, or `"string | null"` for a type list.
fn type_name(ty: &Value) -> Option<String> {
    match ty {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => Some(
            types
                .iter()
                .map(|t| t.as_str().map(str::to_string).unwrap_or_else(|| t.to_string()))
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn compare_schema_properties(
    base: &Map<String, Value>,
    head: &Map<String, Value>,
) -> Vec<SchemaPropertyChange> {
    let base_props = properties(base);
    let head_props = properties(head);
    let base_required = required_names(base);
    let head_required = required_names(head);

    diff_keyed(&base_props, &head_props, |&name, pairing| {
        let (change_type, field_changes) = match pairing {
            Pairing::Removed(_) => (ChangeType::Removed, Vec::new()),
            Pairing::Added(_) => (ChangeType::Added, Vec::new()),
            Pairing::Both(b, h) => {
                let mut changes = Vec::new();
                let was_required = base_required.contains(name);
                let is_required = head_required.contains(name);
                push_if_changed(
                    &mut changes,
                    "required",
                    Some(Value::Bool(was_required)),
                    Some(Value::Bool(is_required)),
                );
                if let (SchemaValue::Concrete(b), SchemaValue::Concrete(h)) =
                    (SchemaValue::classify(b), SchemaValue::classify(h))
                {
                    compare_property_fields(&mut changes, b, h);
                }
                if changes.is_empty() {
                    return None;
                }
                (ChangeType::Modified, changes)
            }
        };
        Some(SchemaPropertyChange {
            name: name.to_string(),
            change_type,
            field_changes,
        })
    })
}

fn compare_property_fields(changes: &mut Vec<FieldChange>, base: &Map<String, Value>, head: &Map<String, Value>) {
    push_if_changed(
        changes,
        "type",
        base.get("type").and_then(type_name).map(Value::String),
        head.get("type").and_then(type_name).map(Value::String),
    );
    push_if_changed(
        changes,
        "description",
        base.get("description").cloned(),
        head.get("description").cloned(),
    );
    push_if_changed(changes, "enum", base.get("enum").cloned(), head.get("enum").cloned());
}

fn properties(schema: &Map<String, Value>) -> BTreeMap<&str, &Value> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.iter().map(|(name, value)| (name.as_str(), value)).collect())
        .unwrap_or_default()
}

fn required_names(schema: &Map<String, Value>) -> BTreeSet<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn keyed(pairs: &[(&'static str, i32)]) -> BTreeMap<&'static str, i32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_diff_keyed_orders_removed_added_both() {
        let base = keyed(&[("a", 1), ("b", 2), ("c", 3)]);
        let head = keyed(&[("b", 2), ("c", 30), ("d", 4)]);
        let out = diff_keyed(&base, &head, |&k, pairing| match pairing {
            Pairing::Removed(_) => Some(format!("-{}", k)),
            Pairing::Added(_) => Some(format!("+{}", k)),
            Pairing::Both(b, h) if b != h => Some(format!("~{}", k)),
            Pairing::Both(..) => None,
        });
        assert_eq!(out, vec!["-a", "+d", "~c"]);
    }

    #[test]
    fn test_type_name_forms() {
        assert_eq!(type_name(&json!("integer")), Some("integer".to_string()));
        assert_eq!(
            type_name(&json!(["string", "null"])),
            Some("string | null".to_string())
        );
        assert_eq!(type_name(&Value::Null), None);
    }

    #[test]
    fn test_schema_value_classify() {
        let reference = json!({"$ref": "#/components/schemas/Pet"});
        let inline = json!({"type": "string"});
        let boolean = json!(true);
        assert!(matches!(
            SchemaValue::classify(&reference),
            SchemaValue::Reference("#/components/schemas/Pet")
        ));
        assert!(matches!(SchemaValue::classify(&inline), SchemaValue::Concrete(_)));
        assert!(matches!(SchemaValue::classify(&boolean), SchemaValue::Other));
    }

    #[test]
    fn test_property_required_flip_and_enum() {
        let base = json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "size": {"type": "string", "enum": ["small", "large"]},
                "owner": {"$ref": "#/components/schemas/Owner"}
            }
        });
        let head = json!({
            "type": "object",
            "required": ["owner"],
            "properties": {
                "name": {"type": "string"},
                "size": {"type": "string", "enum": ["small", "large", "extra_large"]},
                "owner": {"$ref": "#/components/schemas/Person"}
            }
        });
        let changes = compare_schema_properties(
            base.as_object().unwrap(),
            head.as_object().unwrap(),
        );

        let by_name = |n: &str| changes.iter().find(|c| c.name == n).unwrap();
        assert_eq!(changes.len(), 3);
        assert_eq!(
            by_name("name").field_changes,
            vec![FieldChange::new("required", Some(json!(true)), Some(json!(false)))]
        );
        // References are not deep-compared: only the required flip shows.
        assert_eq!(
            by_name("owner").field_changes,
            vec![FieldChange::new("required", Some(json!(false)), Some(json!(true)))]
        );
        assert_eq!(
            by_name("size").field_changes,
            vec![FieldChange::new(
                "enum",
                Some(json!(["small", "large"])),
                Some(json!(["small", "large", "extra_large"]))
            )]
        );
    }

    #[test]
    fn test_enum_reorder_is_a_change() {
        let base = json!({"properties": {"s": {"enum": ["a", "b"]}}});
        let head = json!({"properties": {"s": {"enum": ["b", "a"]}}});
        let changes = compare_schema_properties(base.as_object().unwrap(), head.as_object().unwrap());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field_changes[0].field, "enum");
    }

    #[test]
    fn test_numeric_representation_not_coerced() {
        let base = json!({"properties": {"n": {"enum": [1]}}});
        let head = json!({"properties": {"n": {"enum": [1.0]}}});
        let changes = compare_schema_properties(base.as_object().unwrap(), head.as_object().unwrap());
        assert_eq!(changes.len(), 1);
    }
}
