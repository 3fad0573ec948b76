//! Tax-equivalence engine for Brazilian fixed income.
//!
//! Compares income-tax-exempt instruments (LCI, LCA, CRI, CRA,
//! incentivized debentures) against instruments under the regressive
//! withholding table (CDB, LC, Tesouro, common debentures), across the
//! three quoting conventions used in the market: percentage of CDI,
//! fixed annual rate, and inflation-indexed spread (IPCA+).

pub mod equivalence;
pub mod error;
pub mod redemption;
pub mod tax;
pub mod types;

pub use error::TaxEqError;
pub use types::*;

/// Standard result type for all taxeq operations
pub type TaxEqResult<T> = Result<T, TaxEqError>;
