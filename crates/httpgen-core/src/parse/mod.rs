pub mod components;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod schema;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Deserialize a specification from YAML. No structural validation is
/// performed here; see [`validate`].
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    Ok(spec)
}

/// Deserialize a specification from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    Ok(spec)
}

/// Check that the document declares a version marker this tool recognizes:
/// `swagger: 2.x` or `openapi: 3.x`. Callers may skip this entirely when the
/// user asked for validation to be bypassed.
pub fn validate(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if let Some(ref version) = spec.swagger {
        if version.starts_with("2.") {
            return Ok(());
        }
        return Err(ParseError::UnsupportedVersion(version.clone()));
    }
    if let Some(ref version) = spec.openapi {
        if version.starts_with("3.") {
            return Ok(());
        }
        return Err(ParseError::UnsupportedVersion(version.clone()));
    }
    Err(ParseError::MissingVersion)
}
