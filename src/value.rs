//! The generic value tree every output grammar renders from

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::num::FpCategory;

/// A JSON-shaped tagged union.
///
/// Object members live in a `BTreeMap`, so iteration is always in
/// lexicographic key order no matter how the object was built.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// A number, or `Null` when it is not finite
    #[must_use]
    pub const fn number(n: f64) -> Self {
        if n.is_finite() { Self::Number(n) } else { Self::Null }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// An object from `(name, value)` pairs; a repeated name keeps the last value
    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The `[tag, payload]` pair used for union variants
    pub fn variant(tag: impl Into<String>, payload: Self) -> Self {
        Self::Array(vec![Self::String(tag.into()), payload])
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Object member lookup
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|members| members.get(key))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Number(_) => serializer.serialize_unit(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (k, v) in members {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// Shortest decimal text for a finite number; `None` otherwise.
///
/// Magnitudes outside `[1e-6, 1e21)` use exponent notation with an
/// explicit sign, and negative zero prints as `0`.
#[must_use]
pub fn number_text(n: f64) -> Option<String> {
    match n.classify() {
        FpCategory::Nan | FpCategory::Infinite => None,
        FpCategory::Zero => Some("0".to_string()),
        FpCategory::Normal | FpCategory::Subnormal => {
            let magnitude = n.abs();
            if (1e-6..1e21).contains(&magnitude) {
                Some(n.to_string())
            } else {
                let text = format!("{n:e}");
                Some(match text.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
                    _ => text,
                })
            }
        }
    }
}
