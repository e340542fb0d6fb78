use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Options consumed by a conversion run, loadable from `.httpgen.yaml`.
/// Keys are camelCase to match the config surface of editor tooling that
/// already uses this format. CLI flags override file values; `input` and
/// `output` stay optional here and are enforced after the merge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpgenConfig {
    /// Specification file path or URL.
    pub input: Option<String>,
    /// Output `.http` file or directory.
    pub output: Option<String>,
    /// Overrides the endpoint derived from the document.
    pub base_url: Option<String>,
    /// Authorization token injected into every request.
    pub token: Option<String>,
    /// Skip the version/structure validation pass.
    pub skip_validation: bool,
}

/// Default config file name, discovered in the working directory.
pub const CONFIG_FILE_NAME: &str = ".httpgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<HttpgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: HttpgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}
