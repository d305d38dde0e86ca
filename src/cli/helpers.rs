//! Shared helper functions for CLI commands

use crate::core::number::to_fixed;

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Money with two decimals
pub fn money(value: f64) -> String {
    to_fixed(value, 2)
}

/// Replace tabs and newlines so a value stays in one TSV cell
pub fn tsv_cell(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

/// Parse a `key=value` pair from the command line
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))
}
