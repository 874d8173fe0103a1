//! Rendering of an [`ApiDiff`] as JSON or Markdown.
//!
//! The comparator's change lists carry no meaningful order, so the Markdown
//! renderer sorts every collection before writing it out. JSON output keeps
//! the lists as produced.

use super::model::{ApiDiff, ChangeType, FieldChange, OperationChange, SchemaChange};
use serde_json::Value;

const ARROW: &str = "→";

/// Pretty-printed JSON (two-space indent) mirroring the model's field names.
pub fn to_json(diff: &ApiDiff) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diff)
}

/// Inverse of [`to_json`].
pub fn from_json(text: &str) -> serde_json::Result<ApiDiff> {
    serde_json::from_str(text)
}

/// Human-readable report. An empty diff renders as the title line only.
pub fn to_markdown(diff: &ApiDiff) -> String {
    let mut lines: Vec<String> = vec!["# API Diff".to_string(), String::new()];

    if !diff.operation_changes.is_empty() {
        lines.push("## Operations".to_string());
        lines.push(String::new());
        let mut operations: Vec<&OperationChange> = diff.operation_changes.iter().collect();
        operations.sort_by(|a, b| (a.path.as_str(), a.method.as_str()).cmp(&(b.path.as_str(), b.method.as_str())));
        for op in operations {
            render_operation(&mut lines, op);
        }
        lines.push(String::new());
    }

    if !diff.schema_changes.is_empty() {
        lines.push("## Schemas".to_string());
        lines.push(String::new());
        let mut schemas: Vec<&SchemaChange> = diff.schema_changes.iter().collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        for schema in schemas {
            render_schema(&mut lines, schema);
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn icon(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Added => "🔼",
        ChangeType::Removed => "🔽",
        ChangeType::Modified => "🔀",
    }
}

fn render_operation(lines: &mut Vec<String>, op: &OperationChange) {
    lines.push(format!(
        "- {} `{} {}` ({})",
        icon(op.change_type),
        op.method.as_upper(),
        op.path,
        op.change_type
    ));

    let mut parameters: Vec<_> = op.parameter_changes.iter().collect();
    parameters.sort_by(|a, b| (a.name.as_str(), a.location.as_str()).cmp(&(b.name.as_str(), b.location.as_str())));
    for param in parameters {
        lines.push(format!(
            "  - {} Parameter `{}` (in {}) {}",
            icon(param.change_type),
            param.name,
            param.location,
            param.change_type
        ));
        render_fields(lines, &param.field_changes);
    }

    if let Some(body) = &op.request_body_change {
        lines.push(format!("  - {} Request body {}", icon(body.change_type), body.change_type));
        render_fields(lines, &body.field_changes);
    }

    let mut responses: Vec<_> = op.response_changes.iter().collect();
    responses.sort_by(|a, b| a.status_code.cmp(&b.status_code));
    for response in responses {
        lines.push(format!(
            "  - {} Response `{}` {}",
            icon(response.change_type),
            response.status_code,
            response.change_type
        ));
        render_fields(lines, &response.field_changes);
    }
}

fn render_schema(lines: &mut Vec<String>, schema: &SchemaChange) {
    lines.push(format!(
        "- {} `{}` ({})",
        icon(schema.change_type),
        schema.name,
        schema.change_type
    ));

    let mut properties: Vec<_> = schema.property_changes.iter().collect();
    properties.sort_by(|a, b| a.name.cmp(&b.name));
    for prop in properties {
        lines.push(format!(
            "  - {} Property `{}` {}",
            icon(prop.change_type),
            prop.name,
            prop.change_type
        ));
        render_fields(lines, &prop.field_changes);
    }
}

fn render_fields(lines: &mut Vec<String>, fields: &[FieldChange]) {
    for fc in fields {
        lines.push(format!(
            "    - `{}`: `{}` {} `{}`",
            fc.field,
            render_value(fc.old_value.as_ref()),
            ARROW,
            render_value(fc.new_value.as_ref())
        ));
    }
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::diff::model::{ParameterChange, RequestBodyChange, ResponseChange, SchemaPropertyChange};
    use crate::spec::{HttpMethod, ParameterLocation};
    use serde_json::json;

    fn sample() -> ApiDiff {
        ApiDiff {
            operation_changes: vec![
                OperationChange {
                    path: "/pets".to_string(),
                    method: HttpMethod::Get,
                    change_type: ChangeType::Modified,
                    parameter_changes: vec![
                        ParameterChange {
                            name: "limit".to_string(),
                            location: ParameterLocation::Query,
                            change_type: ChangeType::Modified,
                            field_changes: vec![FieldChange::new("required", Some(json!(false)), Some(json!(true)))],
                        },
                        ParameterChange {
                            name: "filter".to_string(),
                            location: ParameterLocation::Query,
                            change_type: ChangeType::Added,
                            field_changes: Vec::new(),
                        },
                    ],
                    request_body_change: None,
                    response_changes: vec![
                        ResponseChange::bare("429", ChangeType::Added),
                        ResponseChange::bare("400", ChangeType::Removed),
                    ],
                },
                OperationChange::bare("/orders", HttpMethod::Get, ChangeType::Removed),
                OperationChange {
                    path: "/pets".to_string(),
                    method: HttpMethod::Post,
                    change_type: ChangeType::Modified,
                    parameter_changes: Vec::new(),
                    request_body_change: Some(RequestBodyChange {
                        change_type: ChangeType::Modified,
                        field_changes: vec![FieldChange::new("required", Some(json!(true)), Some(json!(false)))],
                    }),
                    response_changes: Vec::new(),
                },
            ],
            schema_changes: vec![
                SchemaChange {
                    name: "Pet".to_string(),
                    change_type: ChangeType::Modified,
                    property_changes: vec![SchemaPropertyChange {
                        name: "breed".to_string(),
                        change_type: ChangeType::Added,
                        field_changes: Vec::new(),
                    }],
                },
                SchemaChange::bare("Order", ChangeType::Removed),
            ],
        }
    }

    #[test]
    fn test_empty_markdown() {
        assert_eq!(to_markdown(&ApiDiff::default()), "# API Diff\n");
    }

    #[test]
    fn test_markdown_layout_is_sorted() {
        let expected = "\
# API Diff

## Operations

- 🔽 `GET /orders` (removed)
- 🔀 `GET /pets` (modified)
  - 🔼 Parameter `filter` (in query) added
  - 🔀 Parameter `limit` (in query) modified
    - `required`: `false` → `true`
  - 🔽 Response `400` removed
  - 🔼 Response `429` added
- 🔀 `POST /pets` (modified)
  - 🔀 Request body modified
    - `required`: `true` → `false`

## Schemas

- 🔽 `Order` (removed)
- 🔀 `Pet` (modified)
  - 🔼 Property `breed` added
";
        assert_eq!(to_markdown(&sample()), expected);
    }

    #[test]
    fn test_render_value_forms() {
        assert_eq!(render_value(None), "null");
        assert_eq!(render_value(Some(&json!("A pet"))), "A pet");
        assert_eq!(render_value(Some(&json!(["a", "b"]))), r#"["a","b"]"#);
        assert_eq!(render_value(Some(&json!(1.5))), "1.5");
    }

    #[test]
    fn test_json_round_trip() {
        let diff = sample();
        let text = to_json(&diff).unwrap();
        assert!(text.contains("\n  \"operation_changes\""));
        assert_eq!(from_json(&text).unwrap(), diff);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(from_json("{\"operation_changes\": 3}").is_err());
    }
}
