//! Plain-text outline of a document for `specdelta inspect`.
//!
//! Schemas are read through their JSON form, the same view the comparator
//! uses. References are shown by component name; an entry whose `$ref` does
//! not resolve is listed with its pointer instead of its details.

use crate::spec::{Document, Endpoint, ParameterLocation, ResolvedComponent};
use oas3::spec::{MediaType, ObjectOrReference, Parameter};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

const LOCATIONS: [(ParameterLocation, &str); 4] = [
    (ParameterLocation::Path, "Path"),
    (ParameterLocation::Query, "Query"),
    (ParameterLocation::Header, "Header"),
    (ParameterLocation::Cookie, "Cookie"),
];

/// Title line, then one block per endpoint and one block per component schema.
pub(crate) fn render_inspect(doc: &Document) -> String {
    let mut lines = vec![format!("{} {}", doc.title(), doc.version())];

    let endpoints = doc.endpoints();
    lines.push(String::new());
    lines.push(format!("Endpoints ({}):", endpoints.len()));
    for endpoint in &endpoints {
        lines.push(String::new());
        render_endpoint(&mut lines, doc, endpoint);
    }

    let schemas = doc.schemas();
    lines.push(String::new());
    lines.push(format!("Schemas ({}):", schemas.len()));
    for (name, schema) in schemas {
        lines.push(String::new());
        render_schema(&mut lines, doc, name, &to_json(schema));
    }

    lines.join("\n")
}

fn render_endpoint(lines: &mut Vec<String>, doc: &Document, endpoint: &Endpoint<'_>) {
    let operation = endpoint.operation;
    let mut header = format!("  {} {}", endpoint.method.as_upper(), endpoint.path);
    if let Some(summary) = endpoint.summary() {
        header.push_str(&format!(" - {}", summary));
    }
    if endpoint.is_deprecated() {
        header.push_str(" [deprecated]");
    }
    lines.push(header);

    if let Some(description) = operation.description.as_deref().map(one_line) {
        if !description.is_empty() {
            lines.push(format!("    Description: {}", description));
        }
    }
    if let Some(id) = &operation.operation_id {
        lines.push(format!("    Operation ID: {}", id));
    }
    if !operation.tags.is_empty() {
        lines.push(format!("    Tags: {}", operation.tags.join(", ")));
    }

    render_parameters(lines, doc, &endpoint.parameters);

    if let Some(body) = &operation.request_body {
        match doc.resolve(body) {
            Ok(body) => {
                let required = if body.required.unwrap_or(false) { " (required)" } else { "" };
                lines.push(format!("    Request body{}:", required));
                if let Some(description) = body.description.as_deref().map(one_line) {
                    if !description.is_empty() {
                        lines.push(format!("      {}", description));
                    }
                }
                render_content(lines, "      ", &body.content);
            }
            Err(_) => lines.push(format!("    Request body: unresolved {}", pointer(body))),
        }
    }

    let responses = operation.responses.iter().flatten().collect::<BTreeMap<_, _>>();
    if !responses.is_empty() {
        lines.push("    Responses:".to_string());
    }
    for (code, response) in responses {
        match doc.resolve(response) {
            Ok(response) => {
                let description = response.description.as_deref().map(one_line).unwrap_or_default();
                if description.is_empty() {
                    lines.push(format!("      {}", code));
                } else {
                    lines.push(format!("      {}: {}", code, description));
                }
                render_content(lines, "        ", &response.content);
            }
            Err(_) => lines.push(format!("      {}: unresolved {}", code, pointer(response))),
        }
    }
}

fn render_parameters(lines: &mut Vec<String>, doc: &Document, params: &[&ObjectOrReference<Parameter>]) {
    let mut unresolved = Vec::new();
    let mut resolved = Vec::new();
    for param in params {
        match doc.resolve(*param) {
            Ok(p) => resolved.push(p),
            Err(_) => unresolved.push(pointer(*param)),
        }
    }

    for (location, label) in LOCATIONS {
        let matching: Vec<&Parameter> = resolved
            .iter()
            .copied()
            .filter(|p| ParameterLocation::from(p.location.clone()) == location)
            .collect();
        if matching.is_empty() {
            continue;
        }
        lines.push(format!("    {} parameters:", label));
        for param in matching {
            let required = if param.required.unwrap_or(false) { " (required)" } else { "" };
            let schema = param.schema.as_ref().map(to_json);
            let mut line = format!("      {}{}: {}", param.name, required, schema_summary(schema.as_ref()));
            if let Some(description) = param.description.as_deref().map(one_line) {
                if !description.is_empty() {
                    line.push_str(&format!(" - {}", description));
                }
            }
            lines.push(line);
        }
    }

    if !unresolved.is_empty() {
        lines.push("    Unresolved parameters:".to_string());
        for pointer in unresolved {
            lines.push(format!("      {}", pointer));
        }
    }
}

fn render_content(lines: &mut Vec<String>, indent: &str, content: &BTreeMap<String, MediaType>) {
    for (media_type, media) in content {
        match media.schema.as_ref() {
            Some(schema) => lines.push(format!(
                "{}{}: {}",
                indent,
                media_type,
                schema_summary(Some(&to_json(schema)))
            )),
            None => lines.push(format!("{}{}", indent, media_type)),
        }
    }
}

fn render_schema(lines: &mut Vec<String>, doc: &Document, name: &str, schema: &Value) {
    if let Some(target) = ref_name(schema) {
        lines.push(format!("  {} (reference to {})", name, target));
        return;
    }
    lines.push(format!("  {} ({})", name, schema_kind(schema)));

    if let Some(description) = schema.get("description").and_then(Value::as_str).map(one_line) {
        if !description.is_empty() {
            lines.push(format!("    {}", description));
        }
    }

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if let Some(properties) = schema.get("properties").and_then(Value::as_object).filter(|p| !p.is_empty()) {
        lines.push("    Properties:".to_string());
        let mut properties: Vec<_> = properties.iter().collect();
        properties.sort_by(|a, b| a.0.cmp(b.0));
        for (prop_name, prop) in properties {
            lines.push(render_property(doc, prop_name, prop, required.contains(&prop_name.as_str())));
        }
    }

    for combinator in ["allOf", "oneOf", "anyOf"] {
        let Some(members) = schema.get(combinator).and_then(Value::as_array).filter(|m| !m.is_empty()) else {
            continue;
        };
        lines.push(format!("    {}:", combinator));
        for member in members {
            let label = match ref_name(member) {
                Some(target) => target.to_string(),
                None => first_type(member).unwrap_or_else(|| "any".to_string()),
            };
            lines.push(format!("      - {}", label));
        }
    }

    if let Some(values) = schema.get("enum").and_then(Value::as_array).filter(|v| !v.is_empty()) {
        lines.push(format!("    Enum values: {}", join_plain(values)));
    }
}

fn render_property(doc: &Document, name: &str, prop: &Value, required: bool) -> String {
    // Constraints and description come from the target when the property is a reference.
    let target = ref_pointer(prop).and_then(|p| match doc.resolve_reference(p) {
        Ok(ResolvedComponent::Schema(schema)) => Some(to_json(schema)),
        _ => None,
    });
    let details = target.as_ref().unwrap_or(prop);

    let mut line = format!(
        "      {}{}: {}",
        name,
        if required { " (required)" } else { "" },
        property_type(prop)
    );
    let constraints = constraints(details);
    if !constraints.is_empty() {
        line.push_str(&format!(" [{}]", constraints));
    }
    if let Some(description) = details.get("description").and_then(Value::as_str).map(one_line) {
        if !description.is_empty() {
            line.push_str(&format!(" - {}", description));
        }
    }
    line
}

/// Short form of a schema: component name, `enum(...)`, combinator, `array of X`, or type.
fn schema_summary(schema: Option<&Value>) -> String {
    let Some(schema) = schema else {
        return "any".to_string();
    };
    if let Some(target) = ref_name(schema) {
        return target.to_string();
    }
    if let Some(values) = schema.get("enum").and_then(Value::as_array).filter(|v| !v.is_empty()) {
        return format!("enum({})", join_plain(values));
    }
    if let Some((combinator, members)) = combinator(schema) {
        let parts: Vec<String> = members.iter().map(|m| schema_summary(Some(m))).collect();
        return format!("{}({})", combinator, parts.join(", "));
    }
    match first_type(schema).as_deref() {
        None => "any".to_string(),
        Some("array") => format!("array of {}", schema_summary(schema.get("items"))),
        Some(_) if has_properties(schema) => "object".to_string(),
        Some(ty) => ty.to_string(),
    }
}

/// Property type column: like [`schema_summary`] but keeps `format` and leaves enums to the constraints.
fn property_type(prop: &Value) -> String {
    if let Some(target) = ref_name(prop) {
        return target.to_string();
    }
    if let Some((combinator, members)) = combinator(prop) {
        let parts: Vec<String> = members.iter().map(property_type).collect();
        return format!("{}({})", combinator, parts.join(", "));
    }
    match first_type(prop).as_deref() {
        Some("array") => match prop.get("items") {
            None => "array".to_string(),
            Some(items) => match ref_name(items) {
                Some(target) => format!("array of {}", target),
                None => first_type(items)
                    .map(|ty| format!("array of {}", ty))
                    .unwrap_or_else(|| "array".to_string()),
            },
        },
        None => "unspecified".to_string(),
        Some(ty) => match prop.get("format").and_then(Value::as_str) {
            Some(format) => format!("{} ({})", ty, format),
            None => ty.to_string(),
        },
    }
}

fn constraints(schema: &Value) -> String {
    const NUMERIC: [(&str, &str); 9] = [
        ("minimum", "min"),
        ("maximum", "max"),
        ("exclusiveMinimum", "excl. min"),
        ("exclusiveMaximum", "excl. max"),
        ("multipleOf", "multiple of"),
        ("minLength", "minLen"),
        ("maxLength", "maxLen"),
        ("minItems", "minItems"),
        ("maxItems", "maxItems"),
    ];

    let mut parts = Vec::new();
    for (key, label) in NUMERIC {
        if let Some(value) = schema.get(key).filter(|v| !v.is_null()) {
            parts.push(format!("{}: {}", label, plain(value)));
        }
        if key == "maxLength" {
            if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
                parts.push(format!("pattern: {}", pattern));
            }
        }
    }
    if schema.get("uniqueItems").and_then(Value::as_bool) == Some(true) {
        parts.push("unique".to_string());
    }
    if let Some(values) = schema.get("enum").and_then(Value::as_array).filter(|v| !v.is_empty()) {
        parts.push(format!("enum: {}", join_plain(values)));
    }
    parts.join(", ")
}

fn schema_kind(schema: &Value) -> String {
    match combinator(schema) {
        Some((name, _)) => name.to_string(),
        None => first_type(schema).unwrap_or_else(|| "any".to_string()),
    }
}

fn combinator(schema: &Value) -> Option<(&'static str, &Vec<Value>)> {
    ["allOf", "oneOf", "anyOf"].into_iter().find_map(|name| {
        schema
            .get(name)
            .and_then(Value::as_array)
            .filter(|members| !members.is_empty())
            .map(|members| (name, members))
    })
}

fn has_properties(schema: &Value) -> bool {
    first_type(schema).as_deref() == Some("object")
        || schema
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|p| !p.is_empty())
}

/// First entry of `type`, which may be a single name or a list.
fn first_type(schema: &Value) -> Option<String> {
    match schema.get("type")? {
        Value::String(ty) => Some(ty.clone()),
        Value::Array(types) => types.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn ref_pointer(schema: &Value) -> Option<&str> {
    schema.get("$ref").and_then(Value::as_str)
}

fn ref_name(schema: &Value) -> Option<&str> {
    ref_pointer(schema).and_then(|p| p.rsplit('/').next())
}

fn pointer<T>(value: &ObjectOrReference<T>) -> &str {
    match value {
        ObjectOrReference::Ref { ref_path, .. } => ref_path.as_str(),
        ObjectOrReference::Object(_) => "",
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_plain(values: &[Value]) -> String {
    values.iter().map(plain).collect::<Vec<_>>().join(", ")
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_summary_forms() {
        assert_eq!(schema_summary(None), "any");
        assert_eq!(schema_summary(Some(&json!({"$ref": "#/components/schemas/Pet"}))), "Pet");
        assert_eq!(schema_summary(Some(&json!({"type": "string", "enum": ["a", "b"]}))), "enum(a, b)");
        assert_eq!(
            schema_summary(Some(&json!({"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}))),
            "array of Pet"
        );
        assert_eq!(
            schema_summary(Some(&json!({"oneOf": [{"type": "string"}, {"$ref": "#/components/schemas/Id"}]}))),
            "oneOf(string, Id)"
        );
        assert_eq!(schema_summary(Some(&json!({"type": ["integer", "null"]}))), "integer");
        assert_eq!(schema_summary(Some(&json!({"type": "object"}))), "object");
    }

    #[test]
    fn test_property_type_keeps_format() {
        assert_eq!(property_type(&json!({"type": "integer", "format": "int64"})), "integer (int64)");
        assert_eq!(property_type(&json!({"type": "array"})), "array");
        assert_eq!(property_type(&json!({"type": "array", "items": {"type": "string"}})), "array of string");
        assert_eq!(property_type(&json!({})), "unspecified");
    }

    #[test]
    fn test_constraints_listing() {
        let schema = json!({
            "minimum": 1,
            "maximum": 10.5,
            "maxLength": 8,
            "pattern": "^[a-z]+$",
            "uniqueItems": true,
            "enum": ["x", 2]
        });
        assert_eq!(
            constraints(&schema),
            "min: 1, max: 10.5, maxLen: 8, pattern: ^[a-z]+$, unique, enum: x, 2"
        );
        assert_eq!(constraints(&json!({"type": "string"})), "");
    }

    #[test]
    fn test_one_line_collapses_whitespace() {
        assert_eq!(one_line("  first line\n  second\tline "), "first line second line");
    }
}
