pub mod config;
pub mod convert;
pub mod error;
pub mod parse;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
