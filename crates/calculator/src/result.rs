use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A side-by-side projection of simple and compound growth for one deposit.
///
/// The inputs are echoed back unchanged; every monetary output is rounded
/// to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    // I. Echoed inputs
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub apy: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub term_years: Decimal,
    pub compounding: String,

    // II. Simple interest
    #[serde(with = "rust_decimal::serde::float")]
    pub simple_interest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub simple_total: Decimal,

    // III. Compound interest
    #[serde(with = "rust_decimal::serde::float")]
    pub compound_interest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub compound_total: Decimal,

    /// Extra earnings from compounding over simple interest.
    #[serde(with = "rust_decimal::serde::float")]
    pub difference: Decimal,
}
