pub mod bracket;
pub mod equivalence;
pub mod redemption;

use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use taxeq_core::tax;
use taxeq_core::RateConvention;

/// Quoting convention as exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConventionArg {
    /// Percentage of CDI (pós-fixado)
    Cdi,
    /// Fixed % per year (pré-fixado)
    Fixed,
    /// IPCA + spread % per year
    Ipca,
}

impl From<ConventionArg> for RateConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Cdi => RateConvention::CdiPercent,
            ConventionArg::Fixed => RateConvention::FixedAnnual,
            ConventionArg::Ipca => RateConvention::InflationIndexed,
        }
    }
}

/// Convert a user-entered percentage (90 = 90%) to the engine's decimal unit.
pub fn percent_to_decimal(percent: Decimal) -> Decimal {
    percent / dec!(100)
}

/// Resolve the holding period from an explicit day count or a date pair.
pub fn resolve_days(
    days: Option<u32>,
    purchase: Option<NaiveDate>,
    maturity: Option<NaiveDate>,
) -> Result<u32, Box<dyn std::error::Error>> {
    match (days, purchase, maturity) {
        (Some(d), _, _) => {
            if d == 0 {
                return Err("--days must be at least 1".into());
            }
            Ok(d)
        }
        (None, Some(p), Some(m)) => Ok(tax::holding_days(p, m)?),
        _ => Err("--days or both --purchase and --maturity are required".into()),
    }
}
