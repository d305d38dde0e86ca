//! `orca calc` command - price a job from the command line
//!
//! Values are taken as raw text and read the same way the form reads its
//! fields, so `--days 2d` counts as 2 and `--extra abc` as 0.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::commands::form::render_update;
use crate::cli::helpers::money;
use crate::cli::output::serialize;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::number::js_number;
use crate::core::pricing::{calculate, CostInputs, Percentages, PricingOutput};
use crate::core::Config;
use crate::form::{read_inputs, FieldId, FormSnapshot, FormUpdate};

#[derive(clap::Args, Debug, Default)]
pub struct CalcArgs {
    /// Day rate for labor
    #[arg(long = "daily-rate", allow_hyphen_values = true)]
    pub daily_rate: Option<String>,

    /// Number of labor days
    #[arg(long, allow_hyphen_values = true)]
    pub days: Option<String>,

    /// Extra costs (travel, food, ...)
    #[arg(long, allow_hyphen_values = true)]
    pub extra: Option<String>,

    /// Gear item value (repeatable)
    #[arg(long, short = 'g', allow_hyphen_values = true)]
    pub gear: Vec<String>,

    /// Margin percent (20 = 20%)
    #[arg(long, allow_hyphen_values = true)]
    pub margin: Option<String>,

    /// Tax percent
    #[arg(long, allow_hyphen_values = true)]
    pub tax: Option<String>,

    /// Prompt for each value
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

/// Full calculation result for structured output
#[derive(Debug, Serialize)]
struct CalcReport {
    labor_cost: f64,
    gear_cost: f64,
    extra_cost: f64,
    total_cost: f64,
    margin_percent: f64,
    tax_percent: f64,
    final_price: f64,
    alert_message: String,
    fields: FormUpdate,
}

impl CalcReport {
    fn new(costs: &CostInputs, percentages: &Percentages, output: &PricingOutput) -> Self {
        Self {
            labor_cost: costs.labor_cost(),
            gear_cost: costs.gear_cost(),
            extra_cost: costs.extra_cost,
            total_cost: output.total_cost,
            margin_percent: percentages.margin_percent,
            tax_percent: percentages.tax_percent,
            final_price: output.final_price,
            alert_message: output.alert_message.clone(),
            fields: FormUpdate::new(percentages, output),
        }
    }
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.or_default(config.default_format.as_deref());

    let args = if args.interactive {
        prompt(args)?
    } else {
        args
    };
    let snapshot = snapshot_from_args(&args);

    let (costs, percentages) = read_inputs(&snapshot);
    let output = calculate(&costs, &percentages);
    let report = CalcReport::new(&costs, &percentages, &output);

    if let Some(text) = serialize(format, &report)? {
        print!("{}", text);
        return Ok(());
    }

    if global.quiet {
        println!("{}", report.fields.final_price_display);
        return Ok(());
    }

    match format {
        OutputFormat::Auto => print_report(&report),
        _ => print!("{}", render_update(format, &report.fields)?),
    }

    Ok(())
}

/// Form state equivalent to the given flags
fn snapshot_from_args(args: &CalcArgs) -> FormSnapshot {
    let mut snapshot = FormSnapshot::new();
    let pairs = [
        (FieldId::BaseDailyRate, &args.daily_rate),
        (FieldId::LaborDays, &args.days),
        (FieldId::ExtraCost, &args.extra),
        (FieldId::MarginRange, &args.margin),
        (FieldId::TaxInput, &args.tax),
    ];
    for (field, value) in pairs {
        if let Some(text) = value {
            snapshot.fields.insert(field, text.as_str().into());
        }
    }
    for value in &args.gear {
        snapshot.push_gear(None, value.as_str());
    }
    snapshot
}

fn prompt(mut args: CalcArgs) -> Result<CalcArgs> {
    let theme = ColorfulTheme::default();

    let ask = |label: &str, current: Option<String>| -> Result<Option<String>> {
        let text: String = Input::with_theme(&theme)
            .with_prompt(label)
            .with_initial_text(current.unwrap_or_default())
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        Ok(if text.trim().is_empty() { None } else { Some(text) })
    };

    args.daily_rate = ask("Daily rate", args.daily_rate.take())?;
    args.days = ask("Labor days", args.days.take())?;
    args.extra = ask("Extra costs", args.extra.take())?;

    while let Some(value) = ask("Gear item value (empty to finish)", None)? {
        args.gear.push(value);
    }

    args.margin = ask("Margin %", args.margin.take())?;
    args.tax = ask("Tax %", args.tax.take())?;
    Ok(args)
}

fn print_report(report: &CalcReport) {
    let line = |label: &str, value: String| println!("  {:<12} {:>12}", label, value);

    println!("{}", style("Costs").bold());
    line("Labor", money(report.labor_cost));
    line("Gear", money(report.gear_cost));
    line("Extra", money(report.extra_cost));
    line("Total cost", report.fields.display_cost.clone());
    println!();
    println!("{}", style("Markup").bold());
    line("Margin", format!("{}%", report.fields.margin_display));
    line("Tax", format!("{}%", js_number(report.tax_percent)));
    println!();

    let price = style(&report.fields.final_price_display).green().bold();
    println!("  {:<12} {:>12}", style("Final price").bold(), price);

    if !report.alert_message.is_empty() {
        println!();
        println!("{}", style(&report.alert_message).red().bold());
    }
}
