use serde_json::Value;

use crate::parse::media_type::MediaType;
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};

/// Body text emitted when a request body declares no example and no schema.
pub const PAYLOAD_PLACEHOLDER: &str = "-- Add your payload here --";

/// Synthesize a representative value for a schema used in place (parameter
/// values, property values, array items).
pub fn synthesize_value(schema: &Schema) -> Value {
    match schema.primary_type() {
        Some(SchemaType::String) => match schema.enum_values.first() {
            Some(first) => first.clone(),
            None => Value::String(
                schema
                    .format
                    .clone()
                    .unwrap_or_else(|| "string".to_string()),
            ),
        },
        Some(SchemaType::Number) | Some(SchemaType::Integer) => Value::from(0),
        Some(SchemaType::Boolean) => Value::Bool(false),
        Some(SchemaType::Array) => match &schema.items {
            Some(items) => Value::Array(vec![synthesize_value_or_ref(items)]),
            None => Value::Array(Vec::new()),
        },
        Some(SchemaType::Object) => synthesize_properties(schema),
        // Untyped schemas that still declare properties count as objects.
        None if !schema.properties.is_empty() => synthesize_properties(schema),
        Some(SchemaType::Null) | None => Value::Null,
    }
}

/// Synthesize a request-body example. An array body schema wraps the
/// synthesized item in a single-element list; everything else synthesizes
/// the declared properties into a mapping (empty when there are none).
pub fn synthesize_object(schema: &Schema) -> Value {
    if schema.primary_type() == Some(SchemaType::Array) {
        if let Some(ref items) = schema.items {
            return Value::Array(vec![synthesize_value_or_ref(items)]);
        }
    }
    synthesize_properties(schema)
}

/// Select the example for a structured request body: literal `example`
/// first, then the first named example (unwrapping a `value` key when the
/// entry is a full example object), then schema synthesis, then the
/// placeholder when there is no schema at all.
pub fn body_example(media: &MediaType) -> Value {
    if let Some(ref example) = media.example {
        return example.clone();
    }
    if let Some((_name, entry)) = media.examples.first() {
        if let Value::Object(obj) = entry {
            if let Some(value) = obj.get("value") {
                return value.clone();
            }
        }
        return entry.clone();
    }
    match &media.schema {
        Some(SchemaOrRef::Schema(schema)) => synthesize_object(schema),
        // A surviving ref means a circular schema; nothing useful to say.
        Some(SchemaOrRef::Ref { .. }) => Value::Null,
        None => Value::String(PAYLOAD_PLACEHOLDER.to_string()),
    }
}

fn synthesize_properties(schema: &Schema) -> Value {
    let mut map = serde_json::Map::new();
    for (name, prop) in &schema.properties {
        map.insert(name.clone(), synthesize_value_or_ref(prop));
    }
    Value::Object(map)
}

/// Refs reaching this point survived resolution (circular), so they
/// synthesize to the null sentinel like any unrecognized schema.
pub fn synthesize_value_or_ref(schema_or_ref: &SchemaOrRef) -> Value {
    match schema_or_ref {
        SchemaOrRef::Schema(schema) => synthesize_value(schema),
        SchemaOrRef::Ref { .. } => Value::Null,
    }
}
