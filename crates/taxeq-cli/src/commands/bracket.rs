use chrono::NaiveDate;
use clap::Args;
use serde_json::{json, Value};

use taxeq_core::tax;

use crate::commands::resolve_days;

/// Arguments for the IR bracket lookup
#[derive(Args)]
pub struct BracketArgs {
    /// Holding period in calendar days
    #[arg(long)]
    pub days: Option<u32>,

    /// Purchase date (YYYY-MM-DD), alternative to --days
    #[arg(long)]
    pub purchase: Option<NaiveDate>,

    /// Maturity date (YYYY-MM-DD), alternative to --days
    #[arg(long)]
    pub maturity: Option<NaiveDate>,
}

pub fn run_bracket(args: BracketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let days = resolve_days(args.days, args.purchase, args.maturity)?;
    let bracket = tax::bracket_for(days)?;
    Ok(json!({
        "holding_days": days,
        "bracket": bracket,
    }))
}
