pub mod example;
pub mod naming;
pub mod request;

use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::OpenApiSpec;
use crate::GeneratedFile;

use request::RequestContext;

/// Separator appended after every request in aggregate mode, including the
/// last one.
pub const REQUEST_SEPARATOR: &str = "\n###\n\n";

/// Extension that selects aggregate mode and suffixes per-operation files.
pub const HTTP_FILE_EXTENSION: &str = "http";

/// Where the generated requests go, decided by the shape of the output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A single `.http` file holding every request.
    HttpFile(PathBuf),
    /// A directory receiving one file per operation.
    Directory(PathBuf),
}

impl OutputTarget {
    /// A path ending in `.http` (any case) selects aggregate mode; anything
    /// else is treated as a directory.
    pub fn from_path(path: &Path) -> Self {
        let is_http_file = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(HTTP_FILE_EXTENSION));
        if is_http_file {
            OutputTarget::HttpFile(path.to_path_buf())
        } else {
            OutputTarget::Directory(path.to_path_buf())
        }
    }
}

/// Caller-supplied knobs for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Overrides the endpoint derived from the document.
    pub base_url: Option<String>,
    /// Authorization token declared as `@authorization` in each output file.
    pub token: Option<String>,
}

/// Walk the specification and produce the output files. Pure: no filesystem
/// access happens here, and the walk is a function of the document plus the
/// resolved endpoint and token only.
pub fn convert(
    spec: &OpenApiSpec,
    target: &OutputTarget,
    options: &ConvertOptions,
) -> Result<Vec<GeneratedFile>, ConvertError> {
    let mut resolver = RefResolver::new(spec);
    let resolved = resolver.resolve_spec()?;
    let endpoint = request::resolve_endpoint(&resolved, options.base_url.as_deref());
    log::debug!(
        "converting {} paths against endpoint {:?}",
        resolved.paths.len(),
        endpoint
    );

    match target {
        OutputTarget::HttpFile(path) => {
            Ok(vec![aggregate_file(&resolved, path, &endpoint, options)])
        }
        OutputTarget::Directory(dir) => Ok(per_operation_files(&resolved, dir, &endpoint, options)),
    }
}

fn aggregate_file(
    spec: &OpenApiSpec,
    path: &Path,
    endpoint: &str,
    options: &ConvertOptions,
) -> GeneratedFile {
    let mut content = authorization_declaration(options.token.as_deref());

    for (route, item) in &spec.paths {
        for (method, op) in item.operations() {
            let prefix = naming::operation_name(method, route, op);
            log::debug!("composing {} {} as {}", method.as_str(), route, prefix);
            let ctx = RequestContext {
                endpoint,
                prefix: Some(&prefix),
                has_token: options.token.is_some(),
            };
            content.push_str(&request::compose_request(
                method,
                route,
                &item.parameters,
                op,
                &ctx,
            ));
            content.push_str(REQUEST_SEPARATOR);
        }
    }

    GeneratedFile {
        path: path.to_string_lossy().into_owned(),
        content,
    }
}

fn per_operation_files(
    spec: &OpenApiSpec,
    dir: &Path,
    endpoint: &str,
    options: &ConvertOptions,
) -> Vec<GeneratedFile> {
    let mut files = Vec::new();

    for (route, item) in &spec.paths {
        for (method, op) in item.operations() {
            let name = naming::operation_name(method, route, op);
            log::debug!("composing {} {} into {}.http", method.as_str(), route, name);
            let ctx = RequestContext {
                endpoint,
                prefix: None,
                has_token: options.token.is_some(),
            };
            let mut content = authorization_declaration(options.token.as_deref());
            content.push_str(&request::compose_request(
                method,
                route,
                &item.parameters,
                op,
                &ctx,
            ));
            files.push(GeneratedFile {
                path: dir
                    .join(format!("{}.{}", name, HTTP_FILE_EXTENSION))
                    .to_string_lossy()
                    .into_owned(),
                content,
            });
        }
    }

    files
}

fn authorization_declaration(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("@authorization = {}\n\n", token),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_extension_selects_aggregate_mode() {
        assert_eq!(
            OutputTarget::from_path(Path::new("out/requests.http")),
            OutputTarget::HttpFile(PathBuf::from("out/requests.http"))
        );
        assert_eq!(
            OutputTarget::from_path(Path::new("requests.HTTP")),
            OutputTarget::HttpFile(PathBuf::from("requests.HTTP"))
        );
    }

    #[test]
    fn other_paths_select_directory_mode() {
        assert_eq!(
            OutputTarget::from_path(Path::new("out/requests")),
            OutputTarget::Directory(PathBuf::from("out/requests"))
        );
        assert_eq!(
            OutputTarget::from_path(Path::new("out.d")),
            OutputTarget::Directory(PathBuf::from("out.d"))
        );
    }

    #[test]
    fn authorization_declaration_formats() {
        assert_eq!(
            authorization_declaration(Some("abc")),
            "@authorization = abc\n\n"
        );
        assert_eq!(authorization_declaration(None), "");
    }
}
