//! Loosely-typed mail records as handed over by a MIME parser
//!
//! Nothing in here is validated. Header values keep whatever shape the
//! parser produced, and the union-typed fields (`to` as one object or as
//! several) stay unions until [`crate::assemble`] resolves them.

use crate::value::number_text;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::num::FpCategory;

/// A header value of unknown shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<RawValue>),
    /// Ordered members; lookups return the first match
    Object(Vec<(String, RawValue)>),
}

impl RawValue {
    /// Build an object from `(key, value)` pairs
    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Parser-style truthiness: null, false, 0, NaN and "" are falsy
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => !matches!(n.classify(), FpCategory::Zero | FpCategory::Nan),
            Self::String(s) => !s.is_empty(),
            Self::Date(_) | Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// Member lookup on objects; anything else has no members
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Member lookup that treats falsy members as missing
    #[must_use]
    pub fn get_truthy(&self, key: &str) -> Option<&Self> {
        self.get(key).filter(|v| v.truthy())
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// JSON rendering used when an object has to be stringified.
    ///
    /// A repeated member key keeps its first value, as [`Self::get`] does.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(iso_millis(d)),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(members) => {
                let mut map = serde_json::Map::new();
                for (k, v) in members {
                    if !map.contains_key(k) {
                        map.insert(k.clone(), v.to_json());
                    }
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Stringification as the parser's consumers expect it
impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => match number_text(*n) {
                Some(text) => f.write_str(&text),
                None if n.is_nan() => f.write_str("NaN"),
                None if n.is_sign_negative() => f.write_str("-Infinity"),
                None => f.write_str("Infinity"),
            },
            Self::String(s) => f.write_str(s),
            Self::Date(d) => f.write_str(&iso_millis(d)),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !matches!(item, Self::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(members) => {
                Self::Object(members.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix
#[must_use]
pub fn iso_millis(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Either a single item or a sequence of them
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::One(item) => Some(item),
            Self::Many(items) => items.first(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(item) => std::slice::from_ref(item).iter(),
            Self::Many(items) => items.iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OneOrMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A single mailbox as the parser reports it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAddress {
    pub address: Option<String>,
    pub name: Option<String>,
}

impl RawAddress {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            name: Some(name.into()),
        }
    }
}

/// The addresses of one address header, with its text and HTML renderings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAddressObject {
    pub value: Vec<RawAddress>,
    pub html: String,
    pub text: String,
}

impl RawAddressObject {
    /// Read an address object out of a header value.
    ///
    /// Returns `None` unless the value is an object. Missing members
    /// default to empty.
    #[must_use]
    pub fn from_raw(raw: &RawValue) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }

        let value = match raw.get("value") {
            Some(RawValue::Array(entries)) => entries.iter().map(raw_address).collect(),
            Some(entry @ RawValue::Object(_)) => vec![raw_address(entry)],
            _ => Vec::new(),
        };

        Some(Self {
            value,
            html: raw.get("html").map(ToString::to_string).unwrap_or_default(),
            text: raw.get("text").map(ToString::to_string).unwrap_or_default(),
        })
    }

    /// The header-value shape of this address object
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        let entries = self
            .value
            .iter()
            .map(|a| {
                RawValue::object([
                    ("address", a.address.clone().map_or(RawValue::Null, RawValue::String)),
                    ("name", a.name.clone().map_or(RawValue::Null, RawValue::String)),
                ])
            })
            .collect();

        RawValue::object([
            ("value", RawValue::Array(entries)),
            ("html", RawValue::string(self.html.clone())),
            ("text", RawValue::string(self.text.clone())),
        ])
    }
}

fn raw_address(entry: &RawValue) -> RawAddress {
    let field = |key: &str| entry.get_truthy(key).map(ToString::to_string);
    RawAddress {
        address: field("address"),
        name: field("name"),
    }
}

/// An attachment with its decoded binary payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAttachment {
    pub filename: Option<String>,
    pub content_type: String,
    pub content_disposition: Option<String>,
    pub checksum: String,
    pub size: f64,
    pub content: Option<Vec<u8>>,
    pub cid: Option<String>,
    pub related: Option<bool>,
}

/// The parser's HTML body: markup, or an explicit statement that there is none
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawHtml {
    Markup(String),
    Disabled,
}

/// A fully parsed message before normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMail {
    /// Header entries in the order received
    pub headers: Vec<(String, RawValue)>,
    pub subject: Option<String>,
    pub from: Option<OneOrMany<RawAddressObject>>,
    pub to: Option<OneOrMany<RawAddressObject>>,
    pub cc: Option<OneOrMany<RawAddressObject>>,
    pub bcc: Option<OneOrMany<RawAddressObject>>,
    pub reply_to: Option<OneOrMany<RawAddressObject>>,
    pub date: Option<DateTime<Utc>>,
    pub message_id: Option<String>,
    pub in_reply_to: Option<String>,
    pub references: Option<OneOrMany<String>>,
    pub text: Option<String>,
    pub html: Option<RawHtml>,
    pub text_as_html: Option<String>,
    pub attachments: Vec<RawAttachment>,
}
