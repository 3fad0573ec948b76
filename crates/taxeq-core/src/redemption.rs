//! Redemption projection in currency for exempt vs taxed instruments.
//!
//! Both legs are bullet instruments: a single payment at maturity, no
//! coupons. The taxed leg compounds at its gross rate and withholding is
//! charged on the gain at redemption, at the bracket for the holding
//! period.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxEqError;
use crate::tax::{bracket_for, validate_inflation};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, RateConvention, Verdict};
use crate::TaxEqResult;

/// Day count for annualizing holding periods (dias corridos).
const DAYS_PER_YEAR: Decimal = dec!(365);

// ---------------------------------------------------------------------------
// Effective annual rate and compounding
// ---------------------------------------------------------------------------

/// Effective annual rate implied by a quote under its convention.
///
/// - CDI-percent: `cdi_projection * fraction_of_cdi`. The quote scales
///   the projected annual CDI directly.
/// - Fixed annual: the nominal rate itself.
/// - IPCA+: index and spread compound: `(1+inflation)*(1+nominal) - 1`.
pub fn annual_rate(
    convention: RateConvention,
    nominal: Rate,
    cdi_projection: Option<Rate>,
    inflation_projection: Option<Rate>,
) -> TaxEqResult<Rate> {
    match convention {
        RateConvention::CdiPercent => {
            let cdi = cdi_projection.ok_or_else(|| TaxEqError::InvalidInput {
                field: "cdi_projection".into(),
                reason: "CDI-percent quotes need a projected annual CDI rate".into(),
            })?;
            Ok(cdi * nominal)
        }
        RateConvention::FixedAnnual => Ok(nominal),
        RateConvention::InflationIndexed => {
            let inflation = inflation_projection.ok_or_else(|| TaxEqError::InvalidInput {
                field: "inflation_projection".into(),
                reason: "IPCA+ quotes need a projected index rate".into(),
            })?;
            validate_inflation(inflation)?;
            Ok((Decimal::ONE + inflation) * (Decimal::ONE + nominal) - Decimal::ONE)
        }
    }
}

/// Compound a principal at an effective annual rate over (possibly
/// fractional) years: `amount = principal * (1 + rate)^years`.
pub fn compound_to_currency(principal: Money, rate: Rate, years: Decimal) -> TaxEqResult<Money> {
    if rate <= dec!(-1) {
        return Err(TaxEqError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Effective annual rate must be greater than -100%".into(),
        });
    }
    Ok(principal * (Decimal::ONE + rate).powd(years))
}

// ---------------------------------------------------------------------------
// Redemption comparison
// ---------------------------------------------------------------------------

/// Input for the currency-mode comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionInput {
    /// Amount invested in each leg.
    pub principal: Money,
    /// Quoting convention shared by both instruments.
    pub convention: RateConvention,
    /// Exempt instrument rate as a decimal.
    pub exempt_rate: Rate,
    /// Taxed instrument gross rate, same unit.
    pub taxed_rate: Rate,
    /// Holding period in calendar days.
    pub holding_days: u32,
    /// Projected annual CDI; required for CDI-percent quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdi_projection: Option<Rate>,
    /// Projected annual index rate; required for inflation-indexed quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_projection: Option<Rate>,
}

/// Projected redemption amounts for both legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionOutput {
    /// Holding period in calendar days.
    pub holding_days: u32,
    /// Holding period annualized over 365 days.
    pub years: Decimal,
    /// Withholding rate applied to the taxed leg's gain.
    pub tax_rate: Rate,
    /// Bracket label for display.
    pub bracket: String,
    /// Exempt leg redemption amount (no withholding).
    pub exempt_amount: Money,
    /// Taxed leg redemption amount before withholding.
    pub taxed_gross_amount: Money,
    /// Withholding due on the taxed leg's gain.
    pub tax_withheld: Money,
    /// Taxed leg redemption amount after withholding.
    pub taxed_net_amount: Money,
    /// Exempt minus taxed-net; positive when the exempt leg pays more.
    pub difference: Money,
    /// Which leg pays more.
    pub verdict: Verdict,
}

/// Project redemption amounts in currency for an exempt and a taxed
/// instrument held over the same period.
pub fn project_redemption(
    input: &RedemptionInput,
) -> TaxEqResult<ComputationOutput<RedemptionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal <= Decimal::ZERO {
        return Err(TaxEqError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }

    let bracket = bracket_for(input.holding_days)?;
    let years = Decimal::from(input.holding_days) / DAYS_PER_YEAR;

    let exempt_annual = annual_rate(
        input.convention,
        input.exempt_rate,
        input.cdi_projection,
        input.inflation_projection,
    )?;
    let taxed_annual = annual_rate(
        input.convention,
        input.taxed_rate,
        input.cdi_projection,
        input.inflation_projection,
    )?;

    let exempt_amount = compound_to_currency(input.principal, exempt_annual, years)?;
    let taxed_gross_amount = compound_to_currency(input.principal, taxed_annual, years)?;

    let gain = taxed_gross_amount - input.principal;
    let tax_withheld = if gain > Decimal::ZERO {
        gain * bracket.rate
    } else {
        if gain < Decimal::ZERO {
            warnings.push("Taxed leg projects a loss; no withholding applied".into());
        }
        Decimal::ZERO
    };
    let taxed_net_amount = taxed_gross_amount - tax_withheld;

    let difference = exempt_amount - taxed_net_amount;
    let verdict = if difference > Decimal::ZERO {
        Verdict::Exempt
    } else if difference < Decimal::ZERO {
        Verdict::Taxed
    } else {
        Verdict::Tie
    };

    let output = RedemptionOutput {
        holding_days: input.holding_days,
        years,
        tax_rate: bracket.rate,
        bracket: bracket.label.to_string(),
        exempt_amount,
        taxed_gross_amount,
        tax_withheld,
        taxed_net_amount,
        difference,
        verdict,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Redemption projection — bullet compounding with withholding on the taxed gain",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
