//! `orca budget` command - budget documents

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{money, truncate_str};
use crate::cli::output::{render_table, serialize, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::number::js_number;
use crate::core::portfolio::{load_budgets, PortfolioSummary, SummaryPeriod};
use crate::core::Config;
use crate::entities::budget::{Budget, BudgetStatus, BUDGET_FILE_SUFFIX, DEFAULT_MARGIN_PERCENT};
use crate::template::{BudgetTemplateContext, TemplateGenerator};

/// Company name on quotes when none is configured
const DEFAULT_COMPANY: &str = "Orca";

#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Create a new budget file
    New(NewArgs),

    /// Price and show a budget
    Show(ShowArgs),

    /// Render the printable quote
    Print(PrintArgs),

    /// Totals per status for every budget under a directory
    Summary(SummaryArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Job title
    #[arg(long, short = 't')]
    pub title: String,

    /// Client name
    #[arg(long, short = 'c')]
    pub client: String,

    /// Day rate for labor (defaults to the configured hourly rate)
    #[arg(long = "daily-rate")]
    pub daily_rate: Option<f64>,

    /// Number of labor days
    #[arg(long, default_value_t = 0.0)]
    pub days: f64,

    /// Margin percent
    #[arg(long, default_value_t = DEFAULT_MARGIN_PERCENT)]
    pub margin: f64,

    /// Tax percent
    #[arg(long, default_value_t = 0.0)]
    pub tax: f64,

    /// Directory to write the budget into
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Budget file
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct PrintArgs {
    /// Budget file
    pub file: PathBuf,

    /// Write the quote to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Monthly goal (defaults to the configured monthly_goal)
    #[arg(long)]
    pub goal: Option<f64>,

    /// Month to total, 1-12 (defaults to the current month)
    #[arg(long, short = 'm', value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Year of the month and of the revenue series (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// List the month's budgets before the totals
    #[arg(long, short = 'l')]
    pub list: bool,
}

/// Run a budget subcommand
pub fn run(cmd: BudgetCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BudgetCommands::New(args) => run_new(args, global),
        BudgetCommands::Show(args) => run_show(args, global),
        BudgetCommands::Print(args) => run_print(args, global),
        BudgetCommands::Summary(args) => run_summary(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    let mut ctx = BudgetTemplateContext::new(&args.title, &args.client, config.author())
        .with_labor_days(args.days)
        .with_margin(args.margin)
        .with_tax(args.tax);
    if let Some(rate) = args.daily_rate {
        ctx = ctx.with_daily_rate(rate);
    }

    let generator = TemplateGenerator::new()?;
    let yaml = generator.generate_budget(&ctx)?;

    std::fs::create_dir_all(&args.output).into_diagnostic()?;
    let path = args.output.join(format!("{}{}", ctx.id, BUDGET_FILE_SUFFIX));
    if path.exists() {
        return Err(miette::miette!("Budget file already exists: {}", path.display()));
    }
    Budget::from_yaml(&yaml, &path.to_string_lossy())?;
    std::fs::write(&path, yaml).into_diagnostic()?;
    tracing::debug!(id = %ctx.id, path = %path.display(), "budget created");

    if global.quiet {
        println!("{}", path.display());
    } else {
        println!(
            "{} Created budget {}",
            style("✓").green(),
            style(ctx.id.short()).cyan()
        );
        println!("   {}", style(path.display()).dim());
    }
    Ok(())
}

/// Priced view of one budget
#[derive(Serialize)]
struct BudgetReport<'a> {
    #[serde(flatten)]
    budget: &'a Budget,
    daily_rate: f64,
    labor_cost: f64,
    items_cost: f64,
    total_cost: f64,
    final_price: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    alert_message: String,
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.or_default(config.default_format.as_deref());
    let budget = Budget::load(&args.file)?;

    let fallback = config.daily_rate();
    let inputs = budget.cost_inputs(fallback);
    let output = budget.price(fallback);
    let report = BudgetReport {
        budget: &budget,
        daily_rate: inputs.base_daily_rate,
        labor_cost: inputs.labor_cost(),
        items_cost: inputs.gear_cost(),
        total_cost: output.total_cost,
        final_price: output.final_price,
        alert_message: output.alert_message.clone(),
    };

    if let Some(text) = serialize(format, &report)? {
        print!("{}", text);
        return Ok(());
    }

    let header = ["name", "type", "days", "value", "cost"];
    let rows: Vec<Vec<String>> = budget
        .items
        .iter()
        .map(|item| {
            vec![
                item.name.clone(),
                item.item_type.to_string(),
                js_number(item.days),
                money(item.value),
                money(item.cost()),
            ]
        })
        .collect();

    if format != OutputFormat::Auto {
        print!("{}", render_table(format, &header, &rows)?);
        return Ok(());
    }

    println!("{} {}", style(budget.id.short()).cyan(), style(&budget.title).bold());
    println!("   Client: {}", budget.client.name);
    println!("   Status: {}", budget.status);
    println!("   Date:   {}", budget.date.format("%Y-%m-%d"));
    if let Some(description) = &budget.description {
        println!("   {}", style(description).dim());
    }
    println!();
    println!(
        "   Labor: {} days x {} = {}",
        js_number(budget.labor_days),
        money(report.daily_rate),
        money(report.labor_cost)
    );
    if !rows.is_empty() {
        print!("{}", render_table(format, &header, &rows)?);
    }
    println!("   Extra: {}", money(budget.extra_cost));
    println!("   Total cost: {}", money(report.total_cost));
    println!(
        "   Margin {}% / Tax {}%",
        js_number(budget.margin_percent),
        js_number(budget.tax_percent)
    );
    println!(
        "   {} {}",
        style("Final price:").bold(),
        style(money(report.final_price)).green().bold()
    );
    if output.has_alert() {
        println!("   {}", style(&output.alert_message).red().bold());
    }
    Ok(())
}

fn run_print(args: PrintArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let budget = Budget::load(&args.file)?;
    let company = config.company_name.as_deref().unwrap_or(DEFAULT_COMPANY);

    let generator = TemplateGenerator::new()?;
    let quote = generator.render_quote(&budget, config.daily_rate(), company)?;

    write_output(&quote, args.output, global.quiet)
}

/// Marks budgets whose margin plus tax priced them at zero
const ALERT_MARK: &str = "⚠ markup";

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Portfolio totals with the goal they were measured against
#[derive(Serialize)]
struct SummaryReport {
    goal: f64,
    #[serde(flatten)]
    summary: PortfolioSummary,
}

fn run_summary(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.or_default(config.default_format.as_deref());

    if !args.dir.is_dir() {
        return Err(miette::miette!("Not a directory: {}", args.dir.display()));
    }

    let goal = args.goal.or(config.monthly_goal).unwrap_or(0.0);
    let current = SummaryPeriod::default();
    let period = SummaryPeriod::new(
        args.year.unwrap_or(current.year),
        args.month.unwrap_or(current.month),
    );
    let (budgets, skipped) = load_budgets(&args.dir, config.daily_rate());
    let mut summary = PortfolioSummary::for_period(&budgets, period, goal);
    summary.skipped = skipped;
    tracing::debug!(year = period.year, month = period.month, budgets = budgets.len(), "summarizing");

    if let Some(text) = serialize(format, &SummaryReport { goal, summary: summary.clone() })? {
        print!("{}", text);
        return Ok(());
    }

    let in_month: Vec<_> = budgets
        .iter()
        .filter(|p| period.contains(&p.budget.date))
        .collect();
    if args.list && !in_month.is_empty() {
        let rows: Vec<Vec<String>> = in_month
            .iter()
            .map(|p| {
                vec![
                    p.budget.id.short(),
                    truncate_str(&p.budget.title, 30),
                    truncate_str(&p.budget.client.name, 20),
                    p.budget.status.to_string(),
                    money(p.final_price),
                    if p.alert { ALERT_MARK.to_string() } else { String::new() },
                ]
            })
            .collect();
        print!(
            "{}",
            render_table(
                format,
                &["id", "title", "client", "status", "final_price", "alert"],
                &rows
            )?
        );
        if format == OutputFormat::Auto {
            println!();
        }
    }

    let rows: Vec<Vec<String>> = BudgetStatus::all()
        .iter()
        .map(|status| {
            let total = summary.total(*status);
            vec![status.to_string(), total.count.to_string(), money(total.final_price)]
        })
        .collect();
    print!("{}", render_table(format, &["status", "count", "total"], &rows)?);

    if format == OutputFormat::Auto {
        println!(
            "{} {:04}-{:02}",
            style("Month:").dim(),
            period.year,
            period.month
        );
        if goal > 0.0 {
            println!(
                "Goal: {}% of {}",
                style(summary.goal_percent).bold(),
                money(goal)
            );
        }
        if summary.monthly_revenue.iter().any(|v| *v != 0.0) {
            println!("\n{} {}", style("Approved revenue").dim(), period.year);
            let values: Vec<Vec<String>> =
                vec![summary.monthly_revenue.iter().map(|v| money(*v)).collect()];
            print!("{}", render_table(format, &MONTH_NAMES, &values)?);
        }
        if skipped > 0 && !global.quiet {
            println!(
                "{} {} file(s) could not be read",
                style("!").yellow(),
                skipped
            );
        }
    }
    Ok(())
}
