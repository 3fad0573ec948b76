use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use taxeq_core::equivalence::{self, DuelInput, EquivalenceInput};

use crate::commands::{percent_to_decimal, resolve_days, ConventionArg};
use crate::input;

/// Arguments for the exempt-vs-taxed duel
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DuelArgs {
    /// Quoting convention for both instruments
    #[arg(long, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Exempt instrument rate in percent (90 = 90% of CDI, 6 = IPCA+6%)
    #[arg(long)]
    pub exempt_rate: Option<Decimal>,

    /// Taxed instrument gross rate in percent
    #[arg(long)]
    pub taxed_rate: Option<Decimal>,

    /// Holding period in calendar days
    #[arg(long)]
    pub days: Option<u32>,

    /// Purchase date (YYYY-MM-DD), alternative to --days
    #[arg(long)]
    pub purchase: Option<NaiveDate>,

    /// Maturity date (YYYY-MM-DD), alternative to --days
    #[arg(long)]
    pub maturity: Option<NaiveDate>,

    /// Projected IPCA in percent per year (required for ipca quotes)
    #[arg(long)]
    pub ipca: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the exempt -> required-gross table
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ToGrossArgs {
    /// Quoting convention of the exempt rate
    #[arg(long, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Exempt instrument rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Projected IPCA in percent per year (required for ipca quotes)
    #[arg(long)]
    pub ipca: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the gross -> equivalent-exempt table
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ToExemptArgs {
    /// Quoting convention of the gross rate
    #[arg(long, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Taxed instrument gross rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Projected IPCA in percent per year (required for ipca quotes)
    #[arg(long)]
    pub ipca: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_duel(args: DuelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let duel_input: DuelInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let convention = args
            .convention
            .ok_or("--convention is required (or provide --input)")?;
        DuelInput {
            convention: convention.into(),
            exempt_rate: percent_to_decimal(args.exempt_rate.ok_or("--exempt-rate is required")?),
            taxed_rate: percent_to_decimal(args.taxed_rate.ok_or("--taxed-rate is required")?),
            holding_days: resolve_days(args.days, args.purchase, args.maturity)?,
            inflation_projection: args.ipca.map(percent_to_decimal),
        }
    };
    let result = equivalence::compare_instruments(&duel_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_to_gross(args: ToGrossArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let eq_input = table_input(args.convention, args.rate, args.ipca, args.input.as_deref())?;
    let result = equivalence::gross_equivalent_table(&eq_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_to_exempt(args: ToExemptArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let eq_input = table_input(args.convention, args.rate, args.ipca, args.input.as_deref())?;
    let result = equivalence::net_equivalent_table(&eq_input)?;
    Ok(serde_json::to_value(result)?)
}

fn table_input(
    convention: Option<ConventionArg>,
    rate: Option<Decimal>,
    ipca: Option<Decimal>,
    path: Option<&str>,
) -> Result<EquivalenceInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(input::read_json(path)?);
    }
    if let Some(data) = input::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    let convention = convention.ok_or("--convention is required (or provide --input)")?;
    Ok(EquivalenceInput {
        convention: convention.into(),
        rate: percent_to_decimal(rate.ok_or("--rate is required")?),
        inflation_projection: ipca.map(percent_to_decimal),
    })
}
