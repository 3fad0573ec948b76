//! Regressive income-tax table for Brazilian fixed income (Lei 11.033/2004).
//!
//! Withholding on yield falls with the holding period: 22.5% up to 180
//! days, 20% up to 360, 17.5% up to 720, 15% beyond. The table is fixed
//! at four brackets and never changes within a process.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::TaxEqError;
use crate::types::Rate;
use crate::TaxEqResult;

/// One bracket of the regressive withholding table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket in calendar days; `None` for the open-ended last bracket.
    pub max_days: Option<u32>,
    /// Withholding rate applied to the gain.
    pub rate: Rate,
    /// Holding-period label for display.
    pub label: &'static str,
}

/// The four fixed brackets, in ascending holding-period order.
pub const IR_BRACKETS: [TaxBracket; 4] = [
    TaxBracket {
        max_days: Some(180),
        rate: dec!(0.225),
        label: "up to 6 months",
    },
    TaxBracket {
        max_days: Some(360),
        rate: dec!(0.20),
        label: "6 to 12 months",
    },
    TaxBracket {
        max_days: Some(720),
        rate: dec!(0.175),
        label: "1 to 2 years",
    },
    TaxBracket {
        max_days: None,
        rate: dec!(0.15),
        label: "over 2 years",
    },
];

/// Look up the withholding bracket for a holding period in calendar days.
///
/// Returns the bracket with the smallest `max_days` >= `days`. A zero-day
/// holding period is a caller error: the collaborator layer validates
/// date pairs before the engine is reached.
pub fn bracket_for(days: u32) -> TaxEqResult<&'static TaxBracket> {
    if days == 0 {
        return Err(TaxEqError::InvalidInput {
            field: "holding_days".into(),
            reason: "Holding period must be at least 1 day".into(),
        });
    }

    if let Some(bracket) = IR_BRACKETS
        .iter()
        .find(|b| b.max_days.is_some_and(|max| days <= max))
    {
        return Ok(bracket);
    }

    // Beyond every bounded bracket: the unbounded last one applies.
    Ok(&IR_BRACKETS[IR_BRACKETS.len() - 1])
}

/// Calendar days between purchase and maturity (dias corridos).
pub fn holding_days(purchase: NaiveDate, maturity: NaiveDate) -> TaxEqResult<u32> {
    let days = (maturity - purchase).num_days();
    if days <= 0 {
        return Err(TaxEqError::InvalidInput {
            field: "maturity".into(),
            reason: "Maturity must be after the purchase date".into(),
        });
    }
    Ok(days as u32)
}

/// Validate a withholding rate. The fixed table caps at 22.5%, but JSON
/// inputs can carry arbitrary rates into the conversion functions.
pub(crate) fn validate_tax_rate(tax_rate: Rate) -> TaxEqResult<()> {
    if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
        return Err(TaxEqError::InvalidInput {
            field: "tax_rate".into(),
            reason: "Tax rate must be in [0, 1)".into(),
        });
    }
    Ok(())
}

/// Validate a projected index rate. `-100%` would zero the compounding base.
pub(crate) fn validate_inflation(inflation: Rate) -> TaxEqResult<()> {
    if inflation <= dec!(-1) {
        return Err(TaxEqError::InvalidInput {
            field: "inflation_projection".into(),
            reason: "Projected index rate must be greater than -100%".into(),
        });
    }
    Ok(())
}
