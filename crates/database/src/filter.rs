use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// The predicates a store adapter has to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

/// One `(field, operator, value)` predicate. Queries AND all of them together.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: &'static str,
    pub op: FilterOp,
    pub value: JsonValue,
}

impl FieldFilter {
    pub fn new(field: &'static str, op: FilterOp, value: impl Into<JsonValue>) -> Self {
        Self {
            field,
            op,
            value: value.into(),
        }
    }

    /// Evaluates the predicate against a JSON document.
    ///
    /// A missing or null field never matches. Numbers compare numerically
    /// regardless of integer/float representation, strings lexically, and a
    /// value of a different kind never matches.
    pub fn matches(&self, document: &JsonValue) -> bool {
        let Some(actual) = document.get(self.field) else {
            return false;
        };
        match compare_values(actual, &self.value) {
            Some(ordering) => match self.op {
                FilterOp::Eq => ordering == Ordering::Equal,
                FilterOp::Gte => ordering != Ordering::Less,
                FilterOp::Lte => ordering != Ordering::Greater,
            },
            None => false,
        }
    }
}

fn compare_values(left: &JsonValue, right: &JsonValue) -> Option<Ordering> {
    match (left, right) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (JsonValue::String(a), JsonValue::String(b)) => Some(a.cmp(b)),
        (JsonValue::Bool(a), JsonValue::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn decimal_value(value: Decimal) -> JsonValue {
    value.to_f64().map_or(JsonValue::Null, JsonValue::from)
}

/// Optional criteria for listing products.
///
/// Empty strings count as "not supplied"; numeric criteria apply whenever
/// they are present, zero included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub bank: Option<String>,
    /// Keeps products with `apy >= min_apy`.
    pub min_apy: Option<Decimal>,
    pub state: Option<String>,
    pub product_type: Option<String>,
    /// Term length in months.
    pub term: Option<i32>,
    /// Keeps products whose own minimum deposit is at most this amount.
    pub min_deposit: Option<Decimal>,
}

impl ProductFilter {
    /// Builds the predicate list in a fixed field order.
    pub fn field_filters(&self) -> Vec<FieldFilter> {
        let mut filters = Vec::new();
        if let Some(bank) = non_empty(&self.bank) {
            filters.push(FieldFilter::new("bank", FilterOp::Eq, bank));
        }
        if let Some(min_apy) = self.min_apy {
            filters.push(FieldFilter::new("apy", FilterOp::Gte, decimal_value(min_apy)));
        }
        if let Some(state) = non_empty(&self.state) {
            filters.push(FieldFilter::new("state", FilterOp::Eq, state));
        }
        if let Some(product_type) = non_empty(&self.product_type) {
            filters.push(FieldFilter::new("product_type", FilterOp::Eq, product_type));
        }
        if let Some(term) = self.term {
            filters.push(FieldFilter::new("term", FilterOp::Eq, term));
        }
        if let Some(min_deposit) = self.min_deposit {
            filters.push(FieldFilter::new(
                "min_deposit",
                FilterOp::Lte,
                decimal_value(min_deposit),
            ));
        }
        filters
    }
}

/// Optional criteria for listing educational articles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationalFilter {
    pub topic: Option<String>,
}

impl EducationalFilter {
    pub fn field_filters(&self) -> Vec<FieldFilter> {
        non_empty(&self.topic)
            .map(|topic| vec![FieldFilter::new("topic", FilterOp::Eq, topic)])
            .unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn empty_filter_has_no_predicates() {
        assert!(ProductFilter::default().field_filters().is_empty());
        assert!(EducationalFilter::default().field_filters().is_empty());
    }

    #[test]
    fn every_product_criterion_becomes_one_predicate() {
        let filter = ProductFilter {
            bank: Some("Chase".to_string()),
            min_apy: Some(dec!(4.5)),
            state: Some("CA".to_string()),
            product_type: Some("HYSA".to_string()),
            term: Some(12),
            min_deposit: Some(dec!(1000)),
        };

        let filters = filter.field_filters();
        assert_eq!(
            filters,
            vec![
                FieldFilter::new("bank", FilterOp::Eq, "Chase"),
                FieldFilter::new("apy", FilterOp::Gte, 4.5),
                FieldFilter::new("state", FilterOp::Eq, "CA"),
                FieldFilter::new("product_type", FilterOp::Eq, "HYSA"),
                FieldFilter::new("term", FilterOp::Eq, 12),
                FieldFilter::new("min_deposit", FilterOp::Lte, 1000.0),
            ]
        );
    }

    #[test]
    fn empty_strings_are_ignored_but_zero_numbers_are_not() {
        let filter = ProductFilter {
            bank: Some(String::new()),
            min_apy: Some(Decimal::ZERO),
            term: Some(0),
            ..ProductFilter::default()
        };
        let fields: Vec<_> = filter.field_filters().iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["apy", "term"]);

        let topic = EducationalFilter { topic: Some(String::new()) };
        assert!(topic.field_filters().is_empty());
    }

    #[test]
    fn min_deposit_keeps_products_requiring_at_most_the_amount() {
        let filter = FieldFilter::new("min_deposit", FilterOp::Lte, 1000.0);
        assert!(filter.matches(&json!({ "min_deposit": 0 })));
        assert!(filter.matches(&json!({ "min_deposit": 1000.0 })));
        assert!(!filter.matches(&json!({ "min_deposit": 2500 })));
    }

    #[test]
    fn missing_null_and_mismatched_fields_never_match() {
        let state = FieldFilter::new("state", FilterOp::Eq, "CA");
        assert!(state.matches(&json!({ "state": "CA" })));
        assert!(!state.matches(&json!({ "state": null })));
        assert!(!state.matches(&json!({})));

        let apy = FieldFilter::new("apy", FilterOp::Gte, 4.5);
        assert!(apy.matches(&json!({ "apy": 5 })));
        assert!(apy.matches(&json!({ "apy": 4.5 })));
        assert!(!apy.matches(&json!({ "apy": "5" })));
    }

    #[test]
    fn integer_and_float_values_compare_equal() {
        let term = FieldFilter::new("term", FilterOp::Eq, 12);
        assert!(term.matches(&json!({ "term": 12.0 })));
        assert!(!term.matches(&json!({ "term": 36 })));
    }
}
