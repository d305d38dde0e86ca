//! Output rendering shared by commands
//!
//! Structured formats (YAML, JSON) serialize the command's report type.
//! Tabular formats (TSV, CSV, Markdown) render a header row plus data rows.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::tsv_cell;
use crate::cli::OutputFormat;

/// Serialize `value` as YAML or JSON. Returns `None` for other formats.
pub fn serialize<T: Serialize>(format: OutputFormat, value: &T) -> Result<Option<String>> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            Ok(Some(format!("{}\n", json)))
        }
        OutputFormat::Yaml => Ok(Some(serde_yml::to_string(value).into_diagnostic()?)),
        _ => Ok(None),
    }
}

/// Render rows as TSV, CSV or a Markdown/terminal table
pub fn render_table(format: OutputFormat, header: &[&str], rows: &[Vec<String>]) -> Result<String> {
    match format {
        OutputFormat::Tsv => {
            let mut out = String::new();
            out.push_str(&header.join("\t"));
            out.push('\n');
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| tsv_cell(c)).collect();
                out.push_str(&cells.join("\t"));
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(header).into_diagnostic()?;
            for row in rows {
                writer.write_record(row).into_diagnostic()?;
            }
            let bytes = writer.into_inner().map_err(|e| miette::miette!("{}", e))?;
            String::from_utf8(bytes).into_diagnostic()
        }
        OutputFormat::Md => Ok(format!("{}\n", build_table(header, rows).with(Style::markdown()))),
        _ => Ok(format!("{}\n", build_table(header, rows).with(Style::rounded()))),
    }
}

fn build_table(header: &[&str], rows: &[Vec<String>]) -> tabled::Table {
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    builder.build()
}

/// Write to a file, or stdout when no path is given
pub fn write_output(content: &str, output_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            if !quiet {
                eprintln!(
                    "{} Written to {}",
                    console::style("✓").green(),
                    console::style(path.display()).cyan()
                );
            }
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
