use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The kind of deposit product a listing describes.
///
/// `HYSA` and `CD` are the well-known kinds; anything else a bank publishes is
/// kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductType {
    Hysa,
    Cd,
    Other(String),
}

impl ProductType {
    pub fn as_str(&self) -> &str {
        match self {
            ProductType::Hysa => "HYSA",
            ProductType::Cd => "CD",
            ProductType::Other(label) => label,
        }
    }
}

impl From<String> for ProductType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "HYSA" => ProductType::Hysa,
            "CD" => ProductType::Cd,
            _ => ProductType::Other(label),
        }
    }
}

impl From<&str> for ProductType {
    fn from(label: &str) -> Self {
        ProductType::from(label.to_string())
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProductType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ProductType::from)
    }
}

/// How often interest is credited to the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    #[default]
    Daily,
    Monthly,
    Quarterly,
    Annually,
}

impl Compounding {
    /// Parses a caller-supplied label, case-insensitively.
    ///
    /// Unknown labels fall back to daily compounding instead of failing.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "monthly" => Compounding::Monthly,
            "quarterly" => Compounding::Quarterly,
            "annually" => Compounding::Annually,
            _ => Compounding::Daily,
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Daily => 365,
            Compounding::Monthly => 12,
            Compounding::Quarterly => 4,
            Compounding::Annually => 1,
        }
    }
}

/// Direction for in-process sorting of listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `"desc"` (any case) sorts descending, every other label ascending.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_keeps_unknown_labels() {
        assert_eq!(ProductType::from("HYSA"), ProductType::Hysa);
        assert_eq!(ProductType::from("CD"), ProductType::Cd);
        let money_market = ProductType::from("MMA");
        assert_eq!(money_market, ProductType::Other("MMA".to_string()));
        assert_eq!(serde_json::to_string(&money_market).unwrap(), "\"MMA\"");
    }

    #[test]
    fn compounding_labels_are_case_insensitive_and_permissive() {
        assert_eq!(Compounding::from_label("Monthly"), Compounding::Monthly);
        assert_eq!(Compounding::from_label("ANNUALLY"), Compounding::Annually);
        assert_eq!(Compounding::from_label("weekly"), Compounding::Daily);
        assert_eq!(Compounding::from_label(""), Compounding::Daily);
        assert_eq!(Compounding::Quarterly.periods_per_year(), 4);
    }

    #[test]
    fn sort_order_defaults_to_ascending_for_unknown_labels() {
        assert_eq!(SortOrder::from_label("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::from_label("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_label("sideways"), SortOrder::Asc);
    }
}
