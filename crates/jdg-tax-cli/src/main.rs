mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

use commands::annual::AnnualTaxArgs;
use commands::compare::CompareArgs;
use commands::project::ProjectArgs;
use commands::schedule::ScheduleArgs;
use output::OutputFormat;

/// Sixty-month tax and contribution projections for a Polish sole proprietorship
#[derive(Parser)]
#[command(
    name = "jdg",
    version,
    about = "Sixty-month tax and contribution projections for a Polish sole proprietorship",
    long_about = "Projects revenue, costs, social and health contributions, income tax and \
                  net income month by month over five years under the progressive scale, \
                  linear and lump-sum regimes, with exact decimal arithmetic. The comparison \
                  reports which regime yields the highest net income; it does not assess \
                  eligibility for any regime."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// JSON file with a replacement tax table set (validated before use)
    #[arg(long, global = true)]
    tables: Option<String>,

    /// Log computation milestones to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project all three regimes and select the highest 60-month net income
    Compare(CompareArgs),
    /// Project a single regime over 60 months
    Project(ProjectArgs),
    /// Annual tax for one regime
    AnnualTax(AnnualTaxArgs),
    /// Social-contribution stages and amounts from a business start date
    ContributionSchedule(ScheduleArgs),
    /// Published lump-sum rates and their activity labels
    TaxRates,
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let tables = match input::tables::load(cli.tables.as_deref()) {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::compare::run_compare(args, &tables),
        Commands::Project(args) => commands::project::run_project(args, &tables),
        Commands::AnnualTax(args) => commands::annual::run_annual_tax(args, &tables),
        Commands::ContributionSchedule(args) => {
            commands::schedule::run_contribution_schedule(args, &tables)
        }
        Commands::TaxRates => commands::rates::run_tax_rates(&tables),
        Commands::Version => {
            println!("jdg {} (tax year {})", env!("CARGO_PKG_VERSION"), tables.tax_year);
            return;
        }
    };

    match result {
        Ok(value) => {
            cli.output.render(&value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
