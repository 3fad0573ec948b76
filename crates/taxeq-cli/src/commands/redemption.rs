use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use taxeq_core::redemption::{self, RedemptionInput};

use crate::commands::{percent_to_decimal, resolve_days, ConventionArg};
use crate::input;

/// Arguments for the redemption projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RedeemArgs {
    /// Amount invested in each leg, in currency
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Quoting convention for both instruments
    #[arg(long, value_enum)]
    pub convention: Option<ConventionArg>,

    /// Exempt instrument rate in percent
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

    /// Projected annual CDI in percent (required for cdi quotes)
    #[arg(long)]
    pub cdi: Option<Decimal>,

    /// Projected IPCA in percent per year (required for ipca quotes)
    #[arg(long)]
    pub ipca: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_redeem(args: RedeemArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let redeem_input: RedemptionInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let convention = args
            .convention
            .ok_or("--convention is required (or provide --input)")?;
        RedemptionInput {
            principal: args.principal.ok_or("--principal is required")?,
            convention: convention.into(),
            exempt_rate: percent_to_decimal(args.exempt_rate.ok_or("--exempt-rate is required")?),
            taxed_rate: percent_to_decimal(args.taxed_rate.ok_or("--taxed-rate is required")?),
            holding_days: resolve_days(args.days, args.purchase, args.maturity)?,
            cdi_projection: args.cdi.map(percent_to_decimal),
            inflation_projection: args.ipca.map(percent_to_decimal),
        }
    };
    let result = redemption::project_redemption(&redeem_input)?;
    Ok(serde_json::to_value(result)?)
}
