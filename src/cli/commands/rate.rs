//! `orca rate` command - size an hourly rate from a monthly goal

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::money;
use crate::cli::output::{render_table, serialize};
use crate::cli::GlobalOpts;
use crate::core::number::js_number;
use crate::core::rates::RatePlan;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct RateArgs {
    /// Revenue wanted per month (defaults to the configured monthly_goal)
    #[arg(long)]
    pub goal: Option<f64>,

    /// Fixed monthly costs
    #[arg(long, default_value_t = 0.0)]
    pub costs: f64,

    /// Working days per month (0 uses 20)
    #[arg(long, default_value_t = 0.0)]
    pub days: f64,

    /// Store the hourly rate and goal in .orca/config.yaml
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: RateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = global.format.or_default(config.default_format.as_deref());

    let goal = args.goal.or(config.monthly_goal).ok_or_else(|| {
        miette::miette!("Monthly goal is required (use --goal or set monthly_goal in config)")
    })?;
    let plan = RatePlan::new(goal, args.costs, args.days);
    let rates = plan.rates();
    tracing::debug!(?plan, hourly = rates.hourly_rate, "rate planned");

    if args.save {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        save_rate(&Config::local_config_path(&cwd), goal, rates.hourly_rate)?;
        if !global.quiet {
            eprintln!(
                "{} Saved hourly_rate {} to {}",
                style("✓").green(),
                style(money(rates.hourly_rate)).yellow(),
                style(crate::core::config::LOCAL_CONFIG_DIR).cyan()
            );
        }
    }

    if let Some(text) = serialize(format, &rates)? {
        print!("{}", text);
        return Ok(());
    }

    if global.quiet {
        println!("{}", money(rates.hourly_rate));
        return Ok(());
    }

    let rows = vec![
        vec!["working_days".to_string(), js_number(rates.working_days)],
        vec!["hourly_rate".to_string(), money(rates.hourly_rate)],
        vec!["daily_rate".to_string(), money(rates.daily_rate)],
    ];
    print!("{}", render_table(format, &["rate", "value"], &rows)?);
    Ok(())
}

/// Update only the rate keys of the workspace config layer.
///
/// Refuses to touch a layer that does not parse.
fn save_rate(path: &std::path::Path, goal: f64, hourly_rate: f64) -> Result<()> {
    let mut layer = Config::read_layer(path)?;
    layer.monthly_goal = Some(goal);
    layer.hourly_rate = Some(hourly_rate);
    layer.save(path).into_diagnostic()
}
