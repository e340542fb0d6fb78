use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use httpgen_core::config::{self, HttpgenConfig, CONFIG_FILE_NAME};
use httpgen_core::convert::{convert, ConvertOptions, OutputTarget};
use httpgen_core::parse;
use httpgen_core::parse::spec::OpenApiSpec;
use httpgen_core::GeneratedFile;

#[derive(Parser)]
#[command(
    name = "httpgen",
    about = "Generate .http files from OpenAPI specifications",
    version
)]
struct Cli {
    /// OpenAPI specification file or URL
    #[arg(short, long)]
    input: Option<String>,

    /// Output directory or .http file
    #[arg(short, long)]
    output: Option<String>,

    /// Base URL for the API, overriding the one in the specification
    #[arg(short, long)]
    base_url: Option<String>,

    /// Authorization token
    #[arg(short, long)]
    token: Option<String>,

    /// Skip validation of the OpenAPI specification
    #[arg(short, long)]
    skip_validation: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let has_args = std::env::args_os().len() > 1;

    let file_config = try_load_config()?;
    if !has_args && file_config.is_none() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }
    if let Some(ref cfg) = file_config {
        eprintln!("Using config: {}", CONFIG_FILE_NAME);
        log::debug!("config file contents: {:?}", cfg);
    }

    let options = merge_options(cli, file_config.unwrap_or_default());
    let input = options
        .input
        .as_deref()
        .context("input specification file or URL is required")?;
    let output = options
        .output
        .as_deref()
        .context("output directory or .http file is required")?;

    let spec = load_spec(input, options.skip_validation)?;

    let target = OutputTarget::from_path(Path::new(output));
    let convert_options = ConvertOptions {
        base_url: options.base_url.clone(),
        token: options.token.clone(),
    };
    let files = convert(&spec, &target, &convert_options)?;

    write_files(&files)?;
    eprintln!("Generated {} file(s)", files.len());
    Ok(())
}

/// Try to load `.httpgen.yaml` from the current directory.
fn try_load_config() -> Result<Option<HttpgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Command-line options take precedence over config-file values.
fn merge_options(cli: Cli, file: HttpgenConfig) -> HttpgenConfig {
    HttpgenConfig {
        input: cli.input.or(file.input),
        output: cli.output.or(file.output),
        base_url: cli.base_url.or(file.base_url),
        token: cli.token.or(file.token),
        skip_validation: cli.skip_validation || file.skip_validation,
    }
}

/// Load a specification from a local path or an `http(s)://` URL, parse it
/// by extension, and run the validation pass unless it was skipped.
fn load_spec(input: &str, skip_validation: bool) -> Result<OpenApiSpec> {
    let content = if input.starts_with("http://") || input.starts_with("https://") {
        reqwest::blocking::get(input)
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("failed to fetch {}", input))?
            .text()
            .with_context(|| format!("failed to read response body from {}", input))?
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input))?
    };

    // YAML is a superset of JSON, so the fallback still handles JSON bodies
    // reached through extensionless URLs.
    let spec = if input.ends_with(".json") {
        parse::from_json(&content)?
    } else {
        parse::from_yaml(&content)?
    };

    if !skip_validation {
        parse::validate(&spec)?;
    }
    Ok(spec)
}

/// Write generated files sequentially, creating parent directories as
/// needed. The first failure aborts the run.
fn write_files(files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = Path::new(&file.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }
        fs::write(path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(input: Option<&str>, token: Option<&str>) -> Cli {
        Cli {
            input: input.map(String::from),
            output: None,
            base_url: None,
            token: token.map(String::from),
            skip_validation: false,
        }
    }

    #[test]
    fn cli_options_override_config() {
        let file = HttpgenConfig {
            input: Some("from-config.yaml".to_string()),
            output: Some("out.http".to_string()),
            token: Some("config-token".to_string()),
            ..HttpgenConfig::default()
        };
        let merged = merge_options(cli(Some("from-cli.yaml"), None), file);
        assert_eq!(merged.input.as_deref(), Some("from-cli.yaml"));
        assert_eq!(merged.output.as_deref(), Some("out.http"));
        assert_eq!(merged.token.as_deref(), Some("config-token"));
    }

    #[test]
    fn skip_validation_survives_from_config() {
        let file = HttpgenConfig {
            skip_validation: true,
            ..HttpgenConfig::default()
        };
        let merged = merge_options(cli(None, None), file);
        assert!(merged.skip_validation);
    }

    #[test]
    fn write_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("requests").join("GetPets.http");
        let files = vec![GeneratedFile {
            path: nested.to_string_lossy().into_owned(),
            content: "GET https://api.test/pets\n".to_string(),
        }];
        write_files(&files).unwrap();
        let written = fs::read_to_string(&nested).unwrap();
        assert_eq!(written, "GET https://api.test/pets\n");
    }
}
