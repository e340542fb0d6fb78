use std::path::Path;

use httpgen_core::convert::{convert, ConvertOptions, OutputTarget, REQUEST_SEPARATOR};
use httpgen_core::parse;

const PETSTORE: &str = include_str!("fixtures/petstore-v3.yaml");
const INVENTORY: &str = include_str!("fixtures/inventory-v2.yaml");

fn aggregate_target() -> OutputTarget {
    OutputTarget::from_path(Path::new("requests.http"))
}

#[test]
fn aggregate_starts_with_authorization_declaration() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let options = ConvertOptions {
        token: Some("abc".to_string()),
        ..ConvertOptions::default()
    };
    let files = convert(&spec, &aggregate_target(), &options).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].content.starts_with("@authorization = abc\n\n"));
    assert!(files[0]
        .content
        .contains("Authorization: {{authorization}}\n"));
}

#[test]
fn aggregate_ends_with_separator_after_every_request() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    let content = &files[0].content;
    assert!(content.ends_with(REQUEST_SEPARATOR));
    // Three operations, three separators: the last request is terminated too.
    assert_eq!(content.matches("\n###\n\n").count(), 3);
}

#[test]
fn aggregate_qualifies_variables_per_operation() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    let content = &files[0].content;

    assert!(content.contains("@GetListPets_limit=0\n"));
    assert!(content.contains("?limit={{GetListPets_limit}}\n"));
    assert!(content.contains("@GetListPets_status=available\n"));
    assert!(content.contains("&status={{GetListPets_status}}\n"));

    // Path parameter: declared, and referenced from the substituted URL.
    assert!(content.contains("@GetPetsPetId_petId=0\n"));
    assert!(content.contains(
        "GET https://petstore.example.com/v2/pets/{{GetPetsPetId_petId}}\n"
    ));

    // Header parameter with a format synthesizes to the format string.
    assert!(content.contains("@GetPetsPetId_X-Request-Id=uuid\n"));
    assert!(content.contains("X-Request-Id:{{GetPetsPetId_X-Request-Id}}\n"));
}

#[test]
fn aggregate_strips_trailing_slash_from_server_url() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    assert!(files[0]
        .content
        .contains("GET https://petstore.example.com/v2/pets\n"));
}

#[test]
fn base_url_override_wins_over_servers() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let options = ConvertOptions {
        base_url: Some("https://override.test/".to_string()),
        ..ConvertOptions::default()
    };
    let files = convert(&spec, &aggregate_target(), &options).unwrap();
    assert!(files[0].content.contains("GET https://override.test/pets\n"));
}

#[test]
fn request_body_resolves_first_content_type_and_ref() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    let content = &files[0].content;

    assert!(content.contains("POST https://petstore.example.com/v2/pets\n"));
    assert!(content.contains("Content-Type: application/json\n\n"));
    assert!(!content.contains("Content-Type: application/xml"));
    assert!(content.contains("\"name\": \"string\""));
    // Array property synthesizes a single item.
    assert!(content.contains("\"tags\": [\n    \"string\"\n  ]"));
}

#[test]
fn summary_and_description_become_comment_lines() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    let content = &files[0].content;
    assert!(content.contains("# Summary: Create a pet\n"));
    assert!(content.contains("# Description: Adds a new pet to the store.\n# Duplicate names are allowed.\n"));
}

#[test]
fn per_operation_mode_writes_one_file_per_operation() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let target = OutputTarget::from_path(Path::new("out"));
    let options = ConvertOptions {
        token: Some("abc".to_string()),
        ..ConvertOptions::default()
    };
    let files = convert(&spec, &target, &options).unwrap();

    let expected: Vec<String> = ["GetListPets", "PostCreatePet", "GetPetsPetId"]
        .iter()
        .map(|name| {
            Path::new("out")
                .join(format!("{}.http", name))
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    let mut expected_refs: Vec<&str> = expected.iter().map(String::as_str).collect();
    paths.sort_unstable();
    expected_refs.sort_unstable();
    assert_eq!(paths, expected_refs);

    for file in &files {
        assert!(file.content.starts_with("@authorization = abc\n\n"));
        assert!(!file.content.contains("###"));
    }
}

#[test]
fn per_operation_mode_uses_unqualified_variables() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let target = OutputTarget::from_path(Path::new("out"));
    let files = convert(&spec, &target, &ConvertOptions::default()).unwrap();

    let by_id = files
        .iter()
        .find(|f| f.path.ends_with("GetPetsPetId.http"))
        .expect("should allocate GetPetsPetId.http");
    assert!(by_id.content.contains("@petId=0\n"));
    assert!(by_id
        .content
        .contains("GET https://petstore.example.com/v2/pets/{{petId}}\n"));
}

#[test]
fn zero_operations_still_produces_aggregate_file() {
    let spec = parse::from_yaml("openapi: \"3.0.0\"\npaths: {}\n").unwrap();

    let with_token = ConvertOptions {
        token: Some("abc".to_string()),
        ..ConvertOptions::default()
    };
    let files = convert(&spec, &aggregate_target(), &with_token).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, "@authorization = abc\n\n");

    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    assert_eq!(files[0].content, "");
}

#[test]
fn v2_endpoint_concatenates_host_and_base_path() {
    let spec = parse::from_yaml(INVENTORY).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    assert!(files[0]
        .content
        .contains("GET inventory.example.com/api/v1/items\n"));
}

#[test]
fn v2_body_parameter_synthesizes_from_definitions_ref() {
    let spec = parse::from_yaml(INVENTORY).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    let content = &files[0].content;

    assert!(content.contains("POST inventory.example.com/api/v1/items\n"));
    assert!(content.contains("Content-Type: application/json\n\n"));
    assert!(content.contains("\"sku\": \"string\""));
    assert!(content.contains("\"quantity\": 0"));
}

#[test]
fn v2_enum_query_parameter_picks_first_value() {
    let spec = parse::from_yaml(INVENTORY).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    assert!(files[0].content.contains("@GetItems_category=tools\n"));
    assert!(files[0]
        .content
        .contains("?category={{GetItems_category}}\n"));
}

#[test]
fn circular_schema_ref_synthesizes_null_field() {
    let yaml = r##"
openapi: "3.0.0"
paths:
  /nodes:
    post:
      operationId: createNode
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Node"
components:
  schemas:
    Node:
      type: object
      properties:
        name:
          type: string
        next:
          $ref: "#/components/schemas/Node"
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    let files = convert(&spec, &aggregate_target(), &ConvertOptions::default()).unwrap();
    let content = &files[0].content;

    // The cycle is left unresolved and renders as the null sentinel.
    assert!(content.contains("\"name\": \"string\""));
    assert!(content.contains("\"next\": null"));
}

#[test]
fn unresolved_ref_fails_conversion() {
    let yaml = r##"
openapi: "3.0.0"
paths:
  /things:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Missing"
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    let result = convert(&spec, &aggregate_target(), &ConvertOptions::default());
    assert!(result.is_err());
}

#[test]
fn allocator_names_are_unique_per_operation() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let target = OutputTarget::from_path(Path::new("out"));
    let files = convert(&spec, &target, &ConvertOptions::default()).unwrap();
    let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    let total = paths.len();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), total);
}
