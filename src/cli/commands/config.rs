//! `orca config` command - inspect configuration

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::money;
use crate::cli::output::serialize;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[&str] = &[
    "hourly_rate",
    "monthly_goal",
    "company_name",
    "author",
    "default_format",
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None if VALID_KEYS.contains(&key.as_str()) => {
                Err(miette::miette!("Key '{}' is not set", key))
            }
            None => Err(miette::miette!(
                help = format!("valid keys: {}", VALID_KEYS.join(", ")),
                "Unknown config key '{}'",
                key
            )),
        };
    }

    if let Some(text) = serialize(global.format, &config)? {
        print!("{}", text);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for key in VALID_KEYS {
        print_config_value(key, get_config_value(&config, key));
    }
    println!("  {:<16} {}", style("daily_rate").cyan(), money(config.daily_rate()));

    if !global.quiet {
        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (ORCA_HOURLY_RATE, ORCA_MONTHLY_GOAL, ORCA_AUTHOR)");
        println!("  2. Workspace config (.orca/config.yaml)");
        println!("  3. Global config (~/.config/orca/config.yaml)");
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let local = Config::local_config_path(&cwd);
    print_path("Workspace", &local);
    match Config::global_config_path() {
        Some(global) => print_path("Global", &global),
        None => println!("{:<10} {}", "Global:", style("(no home directory)").dim()),
    }
    Ok(())
}

fn print_path(label: &str, path: &std::path::Path) {
    let marker = if path.exists() {
        style("exists").green()
    } else {
        style("missing").dim()
    };
    println!("{:<10} {} ({})", format!("{}:", label), path.display(), marker);
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "hourly_rate" => config.hourly_rate.map(money),
        "monthly_goal" => config.monthly_goal.map(money),
        "company_name" => config.company_name.clone(),
        "author" => config.author.clone(),
        "default_format" => config.default_format.clone(),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<String>) {
    match value {
        Some(v) => println!("  {:<16} {}", style(key).cyan(), v),
        None => println!("  {:<16} {}", style(key).cyan(), style("(not set)").dim()),
    }
}
