mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::bracket::BracketArgs;
use commands::equivalence::{DuelArgs, ToExemptArgs, ToGrossArgs};
use commands::redemption::RedeemArgs;

/// Tax-equivalence calculations for Brazilian fixed income
#[derive(Parser)]
#[command(
    name = "taxeq",
    version,
    about = "Tax-equivalence calculations for Brazilian fixed income",
    long_about = "A CLI for comparing income-tax-exempt fixed income (LCI, LCA, CRI, CRA, \
                  incentivized debentures) against taxed instruments (CDB, LC, Tesouro) with \
                  decimal precision. Supports the head-to-head duel, break-even equivalence \
                  tables per withholding bracket, regressive IR bracket lookup, and redemption \
                  projections in currency."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare an exempt and a taxed instrument over a holding period
    Duel(DuelArgs),
    /// Gross rate a taxed instrument must pay to match an exempt rate, per bracket
    ToGross(ToGrossArgs),
    /// Exempt rate matching a taxed instrument's net yield, per bracket
    ToExempt(ToExemptArgs),
    /// Project redemption amounts in currency for both instruments
    Redeem(RedeemArgs),
    /// Look up the regressive IR bracket for a holding period
    Bracket(BracketArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Duel(args) => commands::equivalence::run_duel(args),
        Commands::ToGross(args) => commands::equivalence::run_to_gross(args),
        Commands::ToExempt(args) => commands::equivalence::run_to_exempt(args),
        Commands::Redeem(args) => commands::redemption::run_redeem(args),
        Commands::Bracket(args) => commands::bracket::run_bracket(args),
        Commands::Version => {
            println!("taxeq {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
