use crate::enums::ProductType;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A savings or CD listing as published by a bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub bank: String,
    pub name: String,
    /// Annual percentage yield, as a percentage (4.5 means 4.5%).
    #[serde(with = "rust_decimal::serde::float")]
    pub apy: Decimal,
    pub product_type: ProductType,
    /// Smallest opening deposit. Absent or null values read as zero.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "decimal_or_zero"
    )]
    pub min_deposit: Decimal,
    /// Term length in months, mostly for CDs.
    #[serde(default)]
    pub term: Option<i32>,
    /// Two-letter state code; `None` means available nationwide.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub details_url: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// An email subscription against a set of listing filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub email: String,
    /// Free-form filter criteria such as `min_apy` or `state`.
    pub criteria: Map<String, JsonValue>,
}

/// A long-form article shown in the learning section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationalContent {
    pub title: String,
    pub content: String,
    pub topic: String,
    #[serde(default)]
    pub summary: Option<String>,
}

fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = rust_decimal::serde::float_option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn product_serializes_amounts_as_numbers() {
        let product = Product {
            bank: "Ally".to_string(),
            name: "Online Savings".to_string(),
            apy: dec!(4.75),
            product_type: ProductType::Hysa,
            min_deposit: Decimal::ZERO,
            term: None,
            state: None,
            details_url: None,
            features: Some(vec!["No monthly fees".to_string()]),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["apy"], json!(4.75));
        assert_eq!(value["min_deposit"], json!(0.0));
        assert_eq!(value["product_type"], json!("HYSA"));
        assert!(value["state"].is_null());
    }

    #[test]
    fn product_defaults_missing_and_null_deposit_to_zero() {
        let missing: Product = serde_json::from_value(json!({
            "bank": "Chase", "name": "Premier Savings", "apy": 4.5, "product_type": "HYSA"
        }))
        .unwrap();
        assert_eq!(missing.min_deposit, Decimal::ZERO);
        assert_eq!(missing.term, None);

        let null: Product = serde_json::from_value(json!({
            "bank": "Chase", "name": "Premier Savings", "apy": 4, "product_type": "HYSA",
            "min_deposit": null, "term": 12
        }))
        .unwrap();
        assert_eq!(null.min_deposit, Decimal::ZERO);
        assert_eq!(null.apy, dec!(4));
        assert_eq!(null.term, Some(12));
    }
}
