use heck::ToPascalCase;

use crate::parse::operation::{HttpMethod, Operation};

/// Allocate the identifier for an operation: the per-operation filename in
/// directory mode, and the variable-qualification token in aggregate mode.
///
/// The candidate is the declared `operationId`, falling back to the raw
/// path. The method token is stripped from the candidate before the method
/// is prefixed back on, so `get` + `getPetById` becomes `GetPetById` rather
/// than `GetGetPetById`, and operations sharing a path stay distinct across
/// methods. PascalCase conversion dissolves path separators and template
/// braces into word boundaries.
pub fn operation_name(method: HttpMethod, path: &str, op: &Operation) -> String {
    let candidate = op
        .operation_id
        .clone()
        .unwrap_or_else(|| path.to_string());
    let stripped = candidate.replacen(method.as_str(), "", 1);
    format!("{}-{}", method.as_str(), stripped).to_pascal_case()
}
