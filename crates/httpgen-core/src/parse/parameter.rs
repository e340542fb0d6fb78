use serde::{Deserialize, Serialize};

use super::schema::{Schema, SchemaOrRef, TypeSet};

/// Parameter location. `Body` only occurs in Swagger 2.0 documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
    Body,
}

/// An API parameter. Carries both the OpenAPI 3 shape (nested `schema`) and
/// the Swagger 2 legacy shape (type fields inline on the parameter itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    // Legacy inline type fields (Swagger 2.0)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

/// Where a parameter's type information lives.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    /// OpenAPI 3: a nested schema object.
    NestedSchema(SchemaOrRef),
    /// Swagger 2: type fields declared inline on the parameter.
    InlineLegacy(Schema),
}

impl Parameter {
    /// Resolve which dialect shape this parameter uses. Exactly one of the
    /// two shapes is consulted; a nested schema always wins.
    pub fn schema_source(&self) -> SchemaSource {
        if let Some(ref schema) = self.schema {
            return SchemaSource::NestedSchema(schema.clone());
        }
        SchemaSource::InlineLegacy(Schema {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            enum_values: self.enum_values.clone(),
            items: self.items.clone(),
            example: self.example.clone(),
            ..Schema::default()
        })
    }

    /// The canonical schema consulted for example synthesis.
    pub fn effective_schema(&self) -> SchemaOrRef {
        match self.schema_source() {
            SchemaSource::NestedSchema(schema) => schema,
            SchemaSource::InlineLegacy(schema) => SchemaOrRef::Schema(Box::new(schema)),
        }
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}
