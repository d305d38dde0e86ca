//! YAML document loading with source-aware diagnostics

pub mod diagnostics;

pub use diagnostics::{YamlError, YamlSyntaxError};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse a YAML string, reporting syntax and type errors against `filename`
pub fn parse_yaml_str<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename)))
}

/// Read and parse a YAML file
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml_str(&content, &path.display().to_string())
}
