use serde_json::Value;

use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::example::{body_example, synthesize_object, synthesize_value_or_ref, PAYLOAD_PLACEHOLDER};

/// Per-run inputs shared by every composed request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Resolved endpoint, already stripped of any trailing slash.
    pub endpoint: &'a str,
    /// Variable-qualification token; present in aggregate mode so variables
    /// from different operations sharing one file cannot collide.
    pub prefix: Option<&'a str>,
    /// Whether an authorization token was supplied for this run.
    pub has_token: bool,
}

/// Resolve the endpoint for a run: explicit override, then the Swagger 2
/// host + basePath pair, then the first declared server URL, then nothing.
pub fn resolve_endpoint(spec: &OpenApiSpec, base_url: Option<&str>) -> String {
    let resolved = if let Some(url) = base_url {
        url.to_string()
    } else if let Some(ref host) = spec.host {
        format!("{}{}", host, spec.base_path.as_deref().unwrap_or(""))
    } else if let Some(server) = spec.servers.first() {
        server.url.clone()
    } else {
        String::new()
    };
    remove_trailing_slash(&resolved).to_string()
}

/// Strip at most one trailing slash; paths already begin with `/`.
pub fn remove_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Rewrite `{name}` path template segments into editor variable references:
/// `{{name}}`, or `{{prefix_name}}` when a qualification token is given.
pub fn substitute_path_vars(path: &str, prefix: Option<&str>) -> String {
    let mut out = String::with_capacity(path.len() + 8);
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 && !after[..close].contains('{') => {
                let name = &after[..close];
                out.push_str("{{");
                if let Some(p) = prefix {
                    out.push_str(p);
                    out.push('_');
                }
                out.push_str(name);
                out.push_str("}}");
                rest = &after[close + 1..];
            }
            _ => {
                // Malformed template segment; emit the brace verbatim.
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Prefix every line of a text with `# `, newline-terminating each.
pub fn format_comment_lines(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Render a synthesized value for an `@name=value` declaration line. JSON
/// strings render bare; everything else renders as compact JSON.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a `Content-Type` header, a blank line, and the example payload.
/// String examples emit as raw text, everything else as indented JSON.
fn render_body_block(content_type: &str, example: &Value) -> String {
    let mut out = format!("Content-Type: {}\n\n", content_type);
    match example {
        Value::String(s) => {
            out.push_str(s);
        }
        other => {
            let json = serde_json::to_string_pretty(other)
                .unwrap_or_else(|_| other.to_string());
            out.push_str(&json);
        }
    }
    out.push('\n');
    out
}

/// Compose one request: comment block, variable declarations, request line,
/// query/header lines, optional authorization reference, optional body
/// block, in that fixed order.
pub fn compose_request(
    method: HttpMethod,
    path: &str,
    shared_params: &[ParameterOrRef],
    op: &Operation,
    ctx: &RequestContext<'_>,
) -> String {
    let mut comments = String::new();
    let mut variables = String::new();
    let mut params = String::new();
    let mut body = String::new();
    let mut has_query = false;

    if let Some(ref summary) = op.summary {
        comments.push_str(&format_comment_lines(&format!("Summary: {}", summary)));
    }
    if let Some(ref description) = op.description {
        comments.push_str(&format_comment_lines(&format!(
            "Description: {}",
            description
        )));
    }

    let url_line = format!(
        "{} {}{}\n",
        method.as_str().to_uppercase(),
        ctx.endpoint,
        substitute_path_vars(path, ctx.prefix)
    );

    for param_or_ref in shared_params.iter().chain(op.parameters.iter()) {
        let ParameterOrRef::Parameter(param) = param_or_ref else {
            // Unresolvable reference; nothing to emit for it.
            continue;
        };
        let var_name = match ctx.prefix {
            Some(p) => format!("{}_{}", p, param.name),
            None => param.name.clone(),
        };
        match param.location {
            ParameterLocation::Query => {
                variables.push_str(&declare_variable(&var_name, param));
                let joiner = if has_query { '&' } else { '?' };
                has_query = true;
                params.push_str(&format!("{}{}={{{{{}}}}}\n", joiner, param.name, var_name));
            }
            ParameterLocation::Header => {
                variables.push_str(&declare_variable(&var_name, param));
                params.push_str(&format!("{}:{{{{{}}}}}\n", param.name, var_name));
            }
            ParameterLocation::Path => {
                // Referenced from the substituted URL; only the declaration
                // is emitted here.
                variables.push_str(&declare_variable(&var_name, param));
            }
            ParameterLocation::Cookie => {}
            ParameterLocation::Body => {
                body.push_str(&compose_legacy_body(param));
            }
        }
    }

    if ctx.has_token {
        params.push_str("Authorization: {{authorization}}\n");
    }

    if let Some(RequestBodyOrRef::RequestBody(ref request_body)) = op.request_body {
        if let Some((content_type, media)) = request_body.content.first() {
            body.push_str(&render_body_block(content_type, &body_example(media)));
        }
    }

    let mut out = String::new();
    out.push_str(&comments);
    out.push_str(&variables);
    out.push_str(&url_line);
    out.push_str(&params);
    out.push_str(&body);
    out
}

fn declare_variable(var_name: &str, param: &Parameter) -> String {
    let value = synthesize_value_or_ref(&param.effective_schema());
    format!("@{}={}\n", var_name, render_scalar(&value))
}

/// A Swagger 2 `in: body` parameter is always JSON; its example comes from
/// schema synthesis alone.
fn compose_legacy_body(param: &Parameter) -> String {
    let example = match param.schema {
        Some(SchemaOrRef::Schema(ref schema)) => synthesize_object(schema),
        _ => Value::String(PAYLOAD_PLACEHOLDER.to_string()),
    };
    render_body_block("application/json", &example)
}
