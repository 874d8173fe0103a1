//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::commands::{diff_report, inspect_report, CliLoadError};
use super::inspect::render_inspect;
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::RuntimeConfig;
use crate::spec::{parse_document, SourceFormat};
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const SPEC: &str = r##"
openapi: 3.1.0
info:
  title: Inventory
  version: 2.3.0
paths:
  /items:
    parameters:
      - name: X-Tenant
        in: header
        required: true
        schema:
          type: string
    get:
      summary: List items
      description: Returns every item in stock.
      operationId: listItems
      tags: [items, stock]
      parameters:
        - name: limit
          in: query
          description: Page size
          schema:
            type: integer
            format: int32
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Item"
    delete:
      deprecated: true
      requestBody:
        required: true
        description: Items to drop
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Item"
      responses:
        "204":
          description: gone
components:
  schemas:
    Item:
      type: object
      description: A stocked item
      required: [sku]
      properties:
        sku:
          type: string
          maxLength: 12
          description: Stock keeping unit
        size:
          type: string
          enum: [s, m]
        tags:
          type: array
          uniqueItems: true
          items:
            type: string
    Sku:
      $ref: "#/components/schemas/Item"
"##;

fn spec_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_diff_command_defaults_to_markdown() {
    let cli = Cli::try_parse_from(["specdelta", "diff", "a.yaml", "b.yaml"]).unwrap();
    match cli.command {
        Commands::Diff { base, head, format } => {
            assert_eq!(base, "a.yaml");
            assert_eq!(head, "b.yaml");
            assert_eq!(format, OutputFormat::Markdown);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_diff_format_is_case_insensitive() {
    let cli =
        Cli::try_parse_from(["specdelta", "diff", "a.yaml", "b.yaml", "--format", "JSON"]).unwrap();
    match cli.command {
        Commands::Diff { format, .. } => assert_eq!(format, OutputFormat::Json),
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_rejects_unknown_format_and_missing_args() {
    assert!(Cli::try_parse_from(["specdelta", "diff", "a", "b", "--format", "html"]).is_err());
    assert!(Cli::try_parse_from(["specdelta", "diff", "a"]).is_err());
    assert!(Cli::try_parse_from(["specdelta", "inspect"]).is_err());
}

#[test]
fn test_inspect_command_parses() {
    let cli = Cli::try_parse_from(["specdelta", "inspect", "https://example.com/api.json"]).unwrap();
    match cli.command {
        Commands::Inspect { schema } => assert_eq!(schema, "https://example.com/api.json"),
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_diff_report_identical_files() {
    let file = spec_file(SPEC);
    let path = file.path().to_str().unwrap();
    let text = diff_report(path, path, OutputFormat::Markdown, &RuntimeConfig::default()).unwrap();
    assert_eq!(text, "# API Diff\n");

    let json = diff_report(path, path, OutputFormat::Json, &RuntimeConfig::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"operation_changes": [], "schema_changes": []})
    );
}

#[test]
fn test_missing_base_message() {
    let head = spec_file(SPEC);
    let err = diff_report(
        "missing.yaml",
        head.path().to_str().unwrap(),
        OutputFormat::Markdown,
        &RuntimeConfig::default(),
    )
    .unwrap_err();
    let load_error = err.downcast_ref::<CliLoadError>().unwrap();
    assert_eq!(load_error.to_string(), "Error: file not found: missing.yaml");
}

#[test]
fn test_unparseable_head_message() {
    let base = spec_file(SPEC);
    let head = spec_file("openapi: [unclosed");
    let err = diff_report(
        base.path().to_str().unwrap(),
        head.path().to_str().unwrap(),
        OutputFormat::Markdown,
        &RuntimeConfig::default(),
    )
    .unwrap_err();
    let message = err.downcast_ref::<CliLoadError>().unwrap().to_string();
    assert!(message.starts_with("Error loading head schema: "), "{}", message);
}

#[test]
fn test_inspect_failure_message() {
    let bad = spec_file("openapi: 2.0\ninfo: {title: x, version: y}\npaths: {}\n");
    let err = inspect_report(bad.path().to_str().unwrap(), &RuntimeConfig::default()).unwrap_err();
    let message = err.downcast_ref::<CliLoadError>().unwrap().to_string();
    assert!(message.starts_with("Error loading schema: "), "{}", message);
}

#[test]
fn test_render_inspect() {
    let doc = parse_document(SPEC, SourceFormat::Yaml, "inline").unwrap();
    let expected = "\
Inventory 2.3.0

Endpoints (2):

  GET /items - List items
    Description: Returns every item in stock.
    Operation ID: listItems
    Tags: items, stock
    Query parameters:
      limit: integer - Page size
    Header parameters:
      X-Tenant (required): string
    Responses:
      200: ok
        application/json: array of Item

  DELETE /items [deprecated]
    Header parameters:
      X-Tenant (required): string
    Request body (required):
      Items to drop
      application/json: Item
    Responses:
      204: gone

Schemas (2):

  Item (object)
    A stocked item
    Properties:
      size: string [enum: s, m]
      sku (required): string [maxLen: 12] - Stock keeping unit
      tags: array of string [unique]

  Sku (reference to Item)";
    assert_eq!(render_inspect(&doc), expected);
}

#[test]
fn test_render_inspect_lists_unresolved_slots() {
    let doc = parse_document(
        r##"
openapi: 3.0.3
info:
  title: Broken
  version: "1"
paths:
  /things:
    post:
      parameters:
        - $ref: "#/components/parameters/Missing"
      requestBody:
        $ref: "#/components/requestBodies/Gone"
      responses:
        "200":
          $ref: "#/components/responses/Nowhere"
"##,
        SourceFormat::Yaml,
        "inline",
    )
    .unwrap();
    let text = render_inspect(&doc);
    assert!(text.contains("    Unresolved parameters:\n      #/components/parameters/Missing\n"), "{}", text);
    assert!(text.contains("    Request body: unresolved #/components/requestBodies/Gone\n"), "{}", text);
    assert!(text.contains("      200: unresolved #/components/responses/Nowhere"), "{}", text);
    assert!(text.ends_with("Schemas (0):"), "{}", text);
}
