//! Tax-adjusted yield equivalence between exempt and taxed instruments.
//!
//! Supports the head-to-head "duel" comparison over a given holding
//! period and the break-even equivalence tables (one row per withholding
//! bracket) in both directions: exempt rate -> required gross rate, and
//! gross rate -> equivalent exempt rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TaxEqError;
use crate::tax::{bracket_for, validate_inflation, validate_tax_rate, IR_BRACKETS};
use crate::types::{with_metadata, ComputationOutput, Rate, RateConvention, Verdict};
use crate::TaxEqResult;

// ---------------------------------------------------------------------------
// Rate conversions
// ---------------------------------------------------------------------------

/// Net yield of a taxed instrument after withholding.
///
/// For CDI-percent and fixed-annual quotes the tax scales the rate
/// directly: `net = gross * (1 - tax)`. For IPCA+ quotes the tax is
/// charged on the full compounded return (index plus spread), so the
/// result is re-expressed as a net spread over the index:
///
/// `gross_total = (1+inflation)*(1+gross) - 1`
/// `net_total   = gross_total * (1 - tax)`
/// `net         = (net_total + 1)/(1 + inflation) - 1`
///
/// `inflation` is ignored unless the convention is inflation-indexed.
pub fn net_from_gross(
    gross: Rate,
    tax_rate: Rate,
    convention: RateConvention,
    inflation: Rate,
) -> TaxEqResult<Rate> {
    validate_tax_rate(tax_rate)?;

    match convention {
        RateConvention::CdiPercent | RateConvention::FixedAnnual => {
            Ok(gross * (Decimal::ONE - tax_rate))
        }
        RateConvention::InflationIndexed => {
            validate_inflation(inflation)?;
            let gross_total = (Decimal::ONE + inflation) * (Decimal::ONE + gross) - Decimal::ONE;
            let net_total = gross_total * (Decimal::ONE - tax_rate);
            Ok((net_total + Decimal::ONE) / (Decimal::ONE + inflation) - Decimal::ONE)
        }
    }
}

/// Gross rate a taxed instrument must pay for its net to equal `net`.
///
/// Exact algebraic inverse of [`net_from_gross`] for every convention
/// branch; never iterative.
pub fn gross_from_net(
    net: Rate,
    tax_rate: Rate,
    convention: RateConvention,
    inflation: Rate,
) -> TaxEqResult<Rate> {
    validate_tax_rate(tax_rate)?;

    let keep = Decimal::ONE - tax_rate;
    if keep.is_zero() {
        return Err(TaxEqError::DivisionByZero {
            context: "gross_from_net (tax rate = 100%)".into(),
        });
    }

    match convention {
        RateConvention::CdiPercent | RateConvention::FixedAnnual => Ok(net / keep),
        RateConvention::InflationIndexed => {
            validate_inflation(inflation)?;
            let net_total = (Decimal::ONE + inflation) * (Decimal::ONE + net) - Decimal::ONE;
            let gross_total = net_total / keep;
            Ok((gross_total + Decimal::ONE) / (Decimal::ONE + inflation) - Decimal::ONE)
        }
    }
}

/// Resolve the index projection for a convention, warning when one was
/// supplied but the convention does not use it.
fn resolve_inflation(
    convention: RateConvention,
    projection: Option<Rate>,
    warnings: &mut Vec<String>,
) -> TaxEqResult<Rate> {
    match convention {
        RateConvention::InflationIndexed => projection.ok_or_else(|| TaxEqError::InvalidInput {
            field: "inflation_projection".into(),
            reason: "IPCA+ quotes need a projected index rate".into(),
        }),
        _ => {
            if projection.is_some() {
                warnings.push("Index projection ignored: quote is not inflation-indexed".into());
            }
            Ok(Decimal::ZERO)
        }
    }
}

// ---------------------------------------------------------------------------
// Duel: exempt vs taxed over a holding period
// ---------------------------------------------------------------------------

/// Input for the exempt-vs-taxed comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelInput {
    /// Quoting convention shared by both instruments.
    pub convention: RateConvention,
    /// Exempt instrument rate as a decimal (0.90 = 90% of CDI, 0.06 = 6%).
    pub exempt_rate: Rate,
    /// Taxed instrument gross rate, same unit.
    pub taxed_rate: Rate,
    /// Holding period in calendar days.
    pub holding_days: u32,
    /// Projected annual index rate; required for inflation-indexed quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_projection: Option<Rate>,
}

/// Output of the exempt-vs-taxed comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelOutput {
    /// Holding period in calendar days.
    pub holding_days: u32,
    /// Withholding rate applied at this holding period.
    pub tax_rate: Rate,
    /// Bracket label for display.
    pub bracket: String,
    /// Exempt instrument rate (already net by definition).
    pub exempt_rate: Rate,
    /// Taxed instrument gross rate.
    pub taxed_gross_rate: Rate,
    /// Taxed instrument rate after withholding, same unit as the quotes.
    pub taxed_net_rate: Rate,
    /// Gross rate the taxed instrument would need to tie the exempt one.
    pub break_even_gross_rate: Rate,
    /// Exempt minus taxed-net, in rate points (decimal).
    pub advantage: Decimal,
    /// Which leg pays more.
    pub verdict: Verdict,
}

/// Compare an exempt and a taxed instrument over a holding period.
pub fn compare_instruments(input: &DuelInput) -> TaxEqResult<ComputationOutput<DuelOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let bracket = bracket_for(input.holding_days)?;
    let inflation = resolve_inflation(input.convention, input.inflation_projection, &mut warnings)?;

    let taxed_net_rate =
        net_from_gross(input.taxed_rate, bracket.rate, input.convention, inflation)?;
    let break_even_gross_rate =
        gross_from_net(input.exempt_rate, bracket.rate, input.convention, inflation)?;

    let advantage = input.exempt_rate - taxed_net_rate;
    let verdict = verdict_for(advantage);

    let output = DuelOutput {
        holding_days: input.holding_days,
        tax_rate: bracket.rate,
        bracket: bracket.label.to_string(),
        exempt_rate: input.exempt_rate,
        taxed_gross_rate: input.taxed_rate,
        taxed_net_rate,
        break_even_gross_rate,
        advantage,
        verdict,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Exempt vs taxed duel — net yield after regressive withholding by holding period",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn verdict_for(advantage: Decimal) -> Verdict {
    if advantage > Decimal::ZERO {
        Verdict::Exempt
    } else if advantage < Decimal::ZERO {
        Verdict::Taxed
    } else {
        Verdict::Tie
    }
}

// ---------------------------------------------------------------------------
// Equivalence tables (one row per bracket)
// ---------------------------------------------------------------------------

/// Input for the break-even equivalence tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceInput {
    /// Quoting convention of the reference rate.
    pub convention: RateConvention,
    /// Reference rate as a decimal, unit given by the convention.
    pub rate: Rate,
    /// Projected annual index rate; required for inflation-indexed quotes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_projection: Option<Rate>,
}

/// One bracket row of an equivalence table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceRow {
    /// Bracket label.
    pub bracket: String,
    /// Upper bound of the bracket in days, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_days: Option<u32>,
    /// Withholding rate of the bracket.
    pub tax_rate: Rate,
    /// Break-even rate for this bracket, same unit as the reference rate.
    pub equivalent_rate: Rate,
}

/// Equivalence table output: four rows in bracket order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceTableOutput {
    pub convention: RateConvention,
    pub reference_rate: Rate,
    pub rows: Vec<EquivalenceRow>,
}

/// Gross rate a taxed instrument must pay, per bracket, to match an
/// exempt rate. "If my LCI pays X, what must a CDB pay to tie?"
pub fn gross_equivalent_table(
    input: &EquivalenceInput,
) -> TaxEqResult<ComputationOutput<EquivalenceTableOutput>> {
    equivalence_table(input, Direction::ExemptToGross)
}

/// Exempt rate whose yield matches a taxed instrument's net, per
/// bracket. "If my CDB pays Y, what exempt rate is that worth?"
pub fn net_equivalent_table(
    input: &EquivalenceInput,
) -> TaxEqResult<ComputationOutput<EquivalenceTableOutput>> {
    equivalence_table(input, Direction::GrossToExempt)
}

enum Direction {
    ExemptToGross,
    GrossToExempt,
}

fn equivalence_table(
    input: &EquivalenceInput,
    direction: Direction,
) -> TaxEqResult<ComputationOutput<EquivalenceTableOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let inflation = resolve_inflation(input.convention, input.inflation_projection, &mut warnings)?;

    let mut rows = Vec::with_capacity(IR_BRACKETS.len());
    for bracket in &IR_BRACKETS {
        let equivalent_rate = match direction {
            Direction::ExemptToGross => {
                gross_from_net(input.rate, bracket.rate, input.convention, inflation)?
            }
            Direction::GrossToExempt => {
                net_from_gross(input.rate, bracket.rate, input.convention, inflation)?
            }
        };
        rows.push(EquivalenceRow {
            bracket: bracket.label.to_string(),
            max_days: bracket.max_days,
            tax_rate: bracket.rate,
            equivalent_rate,
        });
    }

    let output = EquivalenceTableOutput {
        convention: input.convention,
        reference_rate: input.rate,
        rows,
    };

    let methodology = match direction {
        Direction::ExemptToGross => {
            "Break-even gross rate per withholding bracket for an exempt reference rate"
        }
        Direction::GrossToExempt => {
            "Equivalent exempt rate per withholding bracket for a taxed gross rate"
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TOLERANCE: Decimal = dec!(0.000000001);

    // -----------------------------------------------------------------------
    // 1. Flat conventions: net = gross * (1 - tax), exact
    // -----------------------------------------------------------------------
    #[test]
    fn test_net_from_gross_cdi_exact() {
        // 100% of CDI at the 15% bracket nets 85% of CDI, exactly
        let net = net_from_gross(
            dec!(1.00),
            dec!(0.15),
            RateConvention::CdiPercent,
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(net, dec!(0.85));
    }

    #[test]
    fn test_gross_from_net_cdi_exact() {
        let gross = gross_from_net(
            dec!(0.85),
            dec!(0.15),
            RateConvention::CdiPercent,
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(gross, dec!(1.00));
    }

    // -----------------------------------------------------------------------
    // 2. IPCA+: tax bites the index too
    // -----------------------------------------------------------------------
    #[test]
    fn test_net_from_gross_inflation_indexed() {
        // inflation 4.5%, gross IPCA+6%, tax 17.5%:
        // gross_total = 1.045 * 1.06 - 1 = 0.1077
        // net_total   = 0.1077 * 0.825  = 0.0888525
        // net spread  = 1.0888525/1.045 - 1 ~= 0.0419641...
        let net = net_from_gross(
            dec!(0.06),
            dec!(0.175),
            RateConvention::InflationIndexed,
            dec!(0.045),
        )
        .unwrap();
        assert!(
            (net - dec!(0.0419641148325358851674641148)).abs() < TOLERANCE,
            "IPCA+ net spread should be ~4.1964%, got {}",
            net
        );
    }

    #[test]
    fn test_indexed_net_below_flat_net() {
        // Because withholding hits the compounded index return, the net
        // spread must come out below gross * (1 - tax).
        let net = net_from_gross(
            dec!(0.06),
            dec!(0.175),
            RateConvention::InflationIndexed,
            dec!(0.045),
        )
        .unwrap();
        assert!(net < dec!(0.06) * dec!(0.825));
    }

    // -----------------------------------------------------------------------
    // 3. Round trips within 1e-9 for every convention
    // -----------------------------------------------------------------------
    #[test]
    fn test_round_trip_all_conventions() {
        let cases = [
            (RateConvention::CdiPercent, dec!(1.10), Decimal::ZERO),
            (RateConvention::FixedAnnual, dec!(0.1350), Decimal::ZERO),
            (RateConvention::InflationIndexed, dec!(0.065), dec!(0.045)),
        ];

        for (convention, gross, inflation) in cases {
            for bracket in &IR_BRACKETS {
                let net = net_from_gross(gross, bracket.rate, convention, inflation).unwrap();
                let back = gross_from_net(net, bracket.rate, convention, inflation).unwrap();
                assert!(
                    (back - gross).abs() < TOLERANCE,
                    "Round trip drifted for {:?} at tax {}: {} -> {}",
                    convention,
                    bracket.rate,
                    gross,
                    back
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // 4. Guard rails
    // -----------------------------------------------------------------------
    #[test]
    fn test_tax_rate_out_of_range_rejected() {
        let result = net_from_gross(
            dec!(1.0),
            dec!(1.0),
            RateConvention::CdiPercent,
            Decimal::ZERO,
        );
        assert!(result.is_err());

        let result = gross_from_net(
            dec!(1.0),
            dec!(-0.1),
            RateConvention::CdiPercent,
            Decimal::ZERO,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_inflation_floor_rejected() {
        let result = net_from_gross(
            dec!(0.06),
            dec!(0.15),
            RateConvention::InflationIndexed,
            dec!(-1),
        );
        assert!(result.is_err());
    }

    // -----------------------------------------------------------------------
    // 5. Duel
    // -----------------------------------------------------------------------
    fn standard_duel() -> DuelInput {
        DuelInput {
            convention: RateConvention::CdiPercent,
            exempt_rate: dec!(0.90),
            taxed_rate: dec!(1.10),
            holding_days: 365,
            inflation_projection: None,
        }
    }

    #[test]
    fn test_duel_exempt_wins() {
        // 365 days -> 17.5% bracket; 110% of CDI nets 90.75%, beating
        // nothing: 90% exempt loses by 0.75 points.
        let result = compare_instruments(&standard_duel()).unwrap();
        let out = &result.result;

        assert_eq!(out.tax_rate, dec!(0.175));
        assert_eq!(out.taxed_net_rate, dec!(1.10) * dec!(0.825));
        assert_eq!(out.verdict, Verdict::Taxed);
        assert!(out.advantage < Decimal::ZERO);
    }

    #[test]
    fn test_duel_verdict_flips_with_bracket() {
        // Exempt 90% vs taxed 114% of CDI: at 22.5% withholding the taxed
        // leg nets 88.35% (exempt wins); at 15% it nets 96.9% (taxed wins).
        let mut input = standard_duel();
        input.taxed_rate = dec!(1.14);

        input.holding_days = 90;
        let short = compare_instruments(&input).unwrap();
        assert_eq!(short.result.verdict, Verdict::Exempt);

        input.holding_days = 900;
        let long = compare_instruments(&input).unwrap();
        assert_eq!(long.result.verdict, Verdict::Taxed);
    }

    #[test]
    fn test_duel_tie() {
        // 85% exempt against 100% gross at the 15% bracket is an exact tie.
        let input = DuelInput {
            convention: RateConvention::CdiPercent,
            exempt_rate: dec!(0.85),
            taxed_rate: dec!(1.00),
            holding_days: 721,
            inflation_projection: None,
        };
        let result = compare_instruments(&input).unwrap();
        assert_eq!(result.result.verdict, Verdict::Tie);
        assert_eq!(result.result.advantage, Decimal::ZERO);
    }

    #[test]
    fn test_duel_break_even_consistency() {
        // Paying exactly the break-even gross must net the exempt rate.
        let input = standard_duel();
        let result = compare_instruments(&input).unwrap();
        let out = &result.result;

        let net_at_break_even = net_from_gross(
            out.break_even_gross_rate,
            out.tax_rate,
            input.convention,
            Decimal::ZERO,
        )
        .unwrap();
        assert!((net_at_break_even - input.exempt_rate).abs() < TOLERANCE);
    }

    #[test]
    fn test_duel_indexed_requires_projection() {
        let mut input = standard_duel();
        input.convention = RateConvention::InflationIndexed;
        input.inflation_projection = None;

        let result = compare_instruments(&input);
        assert!(result.is_err());
        match result.unwrap_err() {
            TaxEqError::InvalidInput { field, .. } => {
                assert_eq!(field, "inflation_projection")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_duel_unused_projection_warns() {
        let mut input = standard_duel();
        input.inflation_projection = Some(dec!(0.045));

        let result = compare_instruments(&input).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("ignored"));
    }

    // -----------------------------------------------------------------------
    // 6. Equivalence tables
    // -----------------------------------------------------------------------
    #[test]
    fn test_gross_equivalent_table_rows() {
        let input = EquivalenceInput {
            convention: RateConvention::FixedAnnual,
            rate: dec!(0.10),
            inflation_projection: None,
        };
        let result = gross_equivalent_table(&input).unwrap();
        let rows = &result.result.rows;

        assert_eq!(rows.len(), 4);
        // 10% exempt needs 10/0.775 ~= 12.903% gross in the shortest bracket
        assert!((rows[0].equivalent_rate - dec!(0.10) / dec!(0.775)).abs() < TOLERANCE);
        // Required gross falls as the bracket lengthens
        for pair in rows.windows(2) {
            assert!(pair[0].equivalent_rate > pair[1].equivalent_rate);
        }
        // Longest bracket: 10 / 0.85
        assert!((rows[3].equivalent_rate - dec!(0.10) / dec!(0.85)).abs() < TOLERANCE);
    }

    #[test]
    fn test_net_equivalent_table_rows() {
        let input = EquivalenceInput {
            convention: RateConvention::CdiPercent,
            rate: dec!(1.10),
            inflation_projection: None,
        };
        let result = net_equivalent_table(&input).unwrap();
        let rows = &result.result.rows;

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].equivalent_rate, dec!(1.10) * dec!(0.775));
        assert_eq!(rows[3].equivalent_rate, dec!(1.10) * dec!(0.85));
        // Net equivalent rises as the bracket lengthens
        for pair in rows.windows(2) {
            assert!(pair[0].equivalent_rate < pair[1].equivalent_rate);
        }
    }

    #[test]
    fn test_tables_are_inverses() {
        let exempt = EquivalenceInput {
            convention: RateConvention::InflationIndexed,
            rate: dec!(0.055),
            inflation_projection: Some(dec!(0.045)),
        };
        let to_gross = gross_equivalent_table(&exempt).unwrap();

        for row in &to_gross.result.rows {
            let back = net_from_gross(
                row.equivalent_rate,
                row.tax_rate,
                RateConvention::InflationIndexed,
                dec!(0.045),
            )
            .unwrap();
            assert!(
                (back - exempt.rate).abs() < TOLERANCE,
                "Gross equivalent at tax {} does not net back: {}",
                row.tax_rate,
                back
            );
        }
    }

    // -----------------------------------------------------------------------
    // 7. Envelope
    // -----------------------------------------------------------------------
    #[test]
    fn test_metadata_populated() {
        let result = compare_instruments(&standard_duel()).unwrap();
        assert!(result.methodology.contains("duel"));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
        assert!(!result.metadata.version.is_empty());
    }
}
