//! YAML error diagnostics pointing at the offending line of a budget or form

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(orca::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Errors from loading a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    #[diagnostic(code(orca::yaml::io))]
    Io(#[from] std::io::Error),
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();

    if line_start >= source.len() {
        return source.len().saturating_sub(1);
    }

    let rest = &source[line_start..];
    let line_len = rest.find('\n').unwrap_or(rest.len());
    let col_offset = rest
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_len)
        .min(line_len);

    line_start + col_offset
}

/// Suggest a fix for the mistakes people make when typing budgets by hand
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("invalid type: string") && msg_lower.contains("f64") {
        return Some(
            "Money and percentage fields must be plain numbers: write 12.5, not \"12,5\" or \"R$ 12\""
                .to_string(),
        );
    }

    if msg_lower.contains("unknown variant") {
        return Some(
            "Check the spelling: status is pending, approved or lost; item_type is gear, freelancer or other"
                .to_string(),
        );
    }

    if msg_lower.contains("missing field") {
        return Some("Run `orca budget new` to see a complete budget template".to_string());
    }

    if msg_lower.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg_lower.contains("duplicate") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}
