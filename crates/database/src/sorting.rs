use core_types::SortOrder;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// An in-process sort request: any field name, either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Flag(bool),
    List(Vec<SortKey>),
}

impl SortKey {
    /// A missing field sorts as the number zero.
    fn extract(record: &JsonValue, field: &str) -> Option<Self> {
        match record.get(field) {
            None => Some(SortKey::Number(0.0)),
            Some(value) => Self::from_value(value),
        }
    }

    /// Null and objects have no key.
    fn from_value(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => n.as_f64().map(SortKey::Number),
            JsonValue::String(s) => Some(SortKey::Text(s.clone())),
            JsonValue::Bool(b) => Some(SortKey::Flag(*b)),
            JsonValue::Array(items) => items
                .iter()
                .map(Self::from_value)
                .collect::<Option<Vec<_>>>()
                .map(SortKey::List),
            JsonValue::Null | JsonValue::Object(_) => None,
        }
    }

    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => Some(a.cmp(b)),
            (SortKey::Flag(a), SortKey::Flag(b)) => Some(a.cmp(b)),
            // Element by element, then the shorter list first.
            (SortKey::List(a), SortKey::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

/// Sorts records by the named field of their JSON form.
///
/// The sort is stable in both directions. Lists compare element by element.
/// When the sort meets two keys it cannot compare (null values, objects, or a
/// mix of numbers and strings) the records are returned in their original order.
pub fn sort_records<T: Serialize>(records: Vec<T>, spec: &SortSpec) -> Vec<T> {
    let keys: Option<Vec<SortKey>> = records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .ok()
                .and_then(|value| SortKey::extract(&value, &spec.field))
        })
        .collect();
    let Some(keys) = keys else {
        tracing::debug!(field = %spec.field, "Sort key is not comparable; returning unsorted.");
        return records;
    };

    let mut order: Vec<usize> = (0..keys.len()).collect();
    let mut comparable = true;
    order.sort_by(|&a, &b| match keys[a].compare(&keys[b]) {
        Some(ordering) => match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        },
        None => {
            comparable = false;
            Ordering::Equal
        }
    });
    if !comparable {
        tracing::debug!(field = %spec.field, "Mixed sort key types; returning unsorted.");
        return records;
    }

    let mut slots: Vec<Option<T>> = records.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
