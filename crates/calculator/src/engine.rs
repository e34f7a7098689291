use crate::error::CalculatorError;
use crate::result::CalculationResult;
use core_types::Compounding;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A stateless calculator projecting deposit growth under simple and compound interest.
#[derive(Debug, Default, Clone, Copy)]
pub struct InterestCalculator {}

impl InterestCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects the earnings of a deposit over a term.
    ///
    /// # Arguments
    ///
    /// * `principal` - The initial deposit.
    /// * `apy` - Annual percentage yield as a percentage (4.5 for 4.5%).
    /// * `term_years` - Length of the deposit in years; fractions are allowed.
    /// * `compounding` - `daily`, `monthly`, `quarterly` or `annually`. Any other
    ///   label is treated as daily.
    ///
    /// Inputs are not range-checked: zero or negative values are computed as given.
    /// The only failure is a projection that leaves the range of `f64`.
    pub fn calculate(
        &self,
        principal: Decimal,
        apy: Decimal,
        term_years: Decimal,
        compounding: &str,
    ) -> Result<CalculationResult, CalculatorError> {
        let periods = f64::from(Compounding::from_label(compounding).periods_per_year());

        let principal_f = as_f64(principal);
        let rate = as_f64(apy) / 100.0;
        let years = as_f64(term_years);

        let simple_interest = principal_f * rate * years;
        let simple_total = principal_f + simple_interest;

        let compound_total = principal_f * (1.0 + rate / periods).powf(periods * years);
        let compound_interest = compound_total - principal_f;

        tracing::debug!(
            %principal, %apy, %term_years, periods, compound_total,
            "Projected deposit growth."
        );

        Ok(CalculationResult {
            principal,
            apy,
            term_years,
            compounding: compounding.to_string(),
            simple_interest: to_cents("simple_interest", simple_interest)?,
            simple_total: to_cents("simple_total", simple_total)?,
            compound_interest: to_cents("compound_interest", compound_interest)?,
            compound_total: to_cents("compound_total", compound_total)?,
            difference: to_cents("difference", compound_interest - simple_interest)?,
        })
    }
}

// Every `Decimal` fits in an `f64`; the fallback only keeps the conversion total.
fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Rounds to two decimal places with banker's rounding (midpoint to even).
///
/// The exact binary value is kept before rounding, so 1157.6250000000002
/// rounds up to 1157.63 rather than being shortened to a midpoint first.
fn to_cents(field: &'static str, value: f64) -> Result<Decimal, CalculatorError> {
    if !value.is_finite() {
        return Err(CalculatorError::NonFinite(field));
    }
    let amount = Decimal::from_f64_retain(value).ok_or(CalculatorError::OutOfRange(field))?;
    Ok(amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn calc(
        principal: Decimal,
        apy: Decimal,
        years: Decimal,
        compounding: &str,
    ) -> CalculationResult {
        InterestCalculator::new()
            .calculate(principal, apy, years, compounding)
            .unwrap()
    }

    #[test]
    fn annual_compounding_over_one_year_matches_simple_interest() {
        let result = calc(dec!(1000), dec!(5), dec!(1), "annually");
        assert_eq!(result.simple_interest, dec!(50.00));
        assert_eq!(result.compound_interest, dec!(50.00));
        assert_eq!(result.difference, Decimal::ZERO);
    }

    #[test]
    fn annual_compounding_over_three_years() {
        let result = calc(dec!(1000), dec!(5), dec!(3), "annually");
        assert_eq!(result.simple_total, dec!(1150.00));
        assert_eq!(result.compound_total, dec!(1157.63));
        assert_eq!(result.compound_interest, dec!(157.63));
        assert_eq!(result.difference, dec!(7.63));
    }

    #[test]
    fn rounding_uses_the_exact_binary_value() {
        // 1157.625 lies just above the midpoint once computed in f64.
        assert_eq!(to_cents("total", 1157.6250000000002).unwrap(), dec!(1157.63));
        // An exact midpoint goes to the even cent.
        assert_eq!(to_cents("total", 0.125).unwrap(), dec!(0.12));
        assert_eq!(to_cents("total", 0.375).unwrap(), dec!(0.38));
    }

    #[test]
    fn totals_are_principal_plus_interest() {
        for compounding in ["daily", "monthly", "quarterly", "annually"] {
            let result = calc(dec!(1000), dec!(5), dec!(3), compounding);
            assert_eq!(result.compound_total, result.principal + result.compound_interest);
            assert_eq!(result.simple_total, result.principal + result.simple_interest);
        }
    }

    #[test]
    fn amounts_beyond_decimal_range_are_an_error() {
        let err = InterestCalculator::new()
            .calculate(dec!(1000), dec!(100), dec!(100), "annually")
            .unwrap_err();
        assert!(matches!(err, CalculatorError::OutOfRange(_)));
    }

    #[test]
    fn compound_total_never_trails_simple_total_over_whole_years() {
        for compounding in ["daily", "monthly", "quarterly", "annually"] {
            for (principal, apy, years) in [
                (dec!(1000), dec!(5), dec!(1)),
                (dec!(250.50), dec!(4.75), dec!(2)),
                (dec!(10000), dec!(0.5), dec!(10)),
            ] {
                let result = calc(principal, apy, years, compounding);
                assert!(
                    result.compound_total >= result.simple_total,
                    "{compounding}: {} < {}",
                    result.compound_total,
                    result.simple_total
                );
            }
        }

        let daily = calc(dec!(1000), dec!(5), dec!(1), "daily");
        assert!(daily.compound_total > daily.simple_total);
    }

    #[test]
    fn unknown_compounding_is_treated_as_daily() {
        let daily = calc(dec!(5000), dec!(4.2), dec!(2), "daily");
        let weekly = calc(dec!(5000), dec!(4.2), dec!(2), "weekly");
        assert_eq!(daily.compound_total, weekly.compound_total);
        assert_eq!(weekly.compounding, "weekly");
    }

    #[test]
    fn compounding_label_is_case_insensitive_but_echoed_verbatim() {
        let upper = calc(dec!(1000), dec!(5), dec!(3), "Monthly");
        let lower = calc(dec!(1000), dec!(5), dec!(3), "monthly");
        assert_eq!(upper.compound_total, lower.compound_total);
        assert_eq!(upper.compounding, "Monthly");
    }

    #[test]
    fn zero_and_negative_inputs_are_computed_mechanically() {
        let zero = calc(Decimal::ZERO, dec!(5), dec!(3), "monthly");
        assert_eq!(zero.compound_total, Decimal::ZERO);
        assert_eq!(zero.simple_total, Decimal::ZERO);

        let negative = calc(dec!(-1000), dec!(5), dec!(1), "annually");
        assert_eq!(negative.simple_interest, dec!(-50.00));
        assert_eq!(negative.simple_total, dec!(-1050.00));
    }

    #[test]
    fn overflowing_projection_is_an_error() {
        let err = InterestCalculator::new()
            .calculate(dec!(1000), dec!(500), dec!(100000), "daily")
            .unwrap_err();
        assert!(matches!(err, CalculatorError::NonFinite(_)));
    }

    #[test]
    fn result_serializes_amounts_as_json_numbers() {
        let result = calc(dec!(1000), dec!(5), dec!(1), "annually");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["simple_total"], serde_json::json!(1050.0));
        assert_eq!(json["compounding"], "annually");
    }
}
