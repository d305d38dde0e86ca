//! `orca form` command - recalculate a saved form snapshot

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::parse_assignment;
use crate::cli::output::{render_table, serialize};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::form::{recalculate, FieldId, FormSnapshot, FormUpdate};

#[derive(clap::Args, Debug)]
pub struct FormArgs {
    /// Snapshot file (.yaml or .json)
    pub file: PathBuf,

    /// Change a field before recalculating (e.g. --set margin_range=25)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Append a gear item value
    #[arg(long, short = 'g', allow_hyphen_values = true)]
    pub gear: Vec<String>,

    /// Save the recalculated snapshot back to the file
    #[arg(long, short = 'w')]
    pub write: bool,
}

pub fn run(args: FormArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.or_default(config.default_format.as_deref());

    let mut snapshot = if args.file.exists() {
        FormSnapshot::load(&args.file)?
    } else if args.write {
        FormSnapshot::new()
    } else {
        return Err(miette::miette!(
            "Form file not found: {} (use --write to create it)",
            args.file.display()
        ));
    };

    for (field, value) in &args.set {
        snapshot.set_named(field, value.as_str())?;
    }
    for value in &args.gear {
        snapshot.push_gear(None, value.as_str());
    }

    let output = recalculate(&mut snapshot);
    tracing::debug!(file = %args.file.display(), final_price = output.final_price, "form recalculated");

    if args.write {
        snapshot.save(&args.file)?;
        if !global.quiet {
            eprintln!(
                "{} Saved {}",
                style("✓").green(),
                style(args.file.display()).cyan()
            );
        }
    }

    if let Some(text) = serialize(format, &snapshot)? {
        print!("{}", text);
        return Ok(());
    }

    if global.quiet {
        if let Some(price) = snapshot.get(FieldId::FinalPriceDisplay) {
            println!("{}", price);
        }
        return Ok(());
    }

    match format {
        OutputFormat::Auto => {
            let rows: Vec<Vec<String>> = snapshot
                .fields
                .iter()
                .map(|(field, text)| {
                    vec![
                        field.to_string(),
                        field.kind().to_string(),
                        text.as_str().to_string(),
                    ]
                })
                .collect();
            print!("{}", render_table(format, &["field", "kind", "value"], &rows)?);
            if !snapshot.gear_items.is_empty() {
                println!("{} {}", style("Gear items:").dim(), snapshot.gear_items.len());
            }
            if output.has_alert() {
                println!("{}", style(&output.alert_message).red().bold());
            }
        }
        _ => {
            let update = snapshot_update(&snapshot);
            print!("{}", render_update(format, &update)?);
        }
    }

    Ok(())
}

/// Output fields as `field`/`value` rows
pub fn render_update(format: OutputFormat, update: &FormUpdate) -> Result<String> {
    let rows: Vec<Vec<String>> = update
        .entries()
        .iter()
        .map(|(field, text)| vec![field.to_string(), text.to_string()])
        .collect();
    render_table(format, &["field", "value"], &rows)
}

fn snapshot_update(snapshot: &FormSnapshot) -> FormUpdate {
    let text = |field: FieldId| snapshot.get(field).unwrap_or_default().to_string();
    FormUpdate {
        display_cost: text(FieldId::DisplayCost),
        margin_display: text(FieldId::MarginDisplay),
        final_price_display: text(FieldId::FinalPriceDisplay),
        alert_msg: text(FieldId::AlertMsg),
        total_cost_input: text(FieldId::TotalCostInput),
        final_price_input: text(FieldId::FinalPriceInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_update_tsv() {
        let mut snapshot = FormSnapshot::new();
        snapshot.set_named("base_daily_rate", "100").unwrap();
        snapshot.set_named("labor_days", "2").unwrap();
        snapshot.set_named("margin_range", "20").unwrap();
        recalculate(&mut snapshot);

        let out = render_update(OutputFormat::Tsv, &snapshot_update(&snapshot)).unwrap();
        assert!(out.starts_with("field\tvalue\n"));
        assert!(out.contains("display_cost\t200.00\n"));
        assert!(out.contains("margin_display\t20\n"));
        assert!(out.contains("final_price_display\t250.00\n"));
        assert!(out.contains("alert_msg\t\n"));
        assert!(out.contains("final_price_input\t250\n"));
    }
}
