//! Header classification
//!
//! Maps a raw `(key, value)` header pair onto one [`HeaderValue`] variant.
//! Rules are tried in a fixed order and the first match wins; anything
//! left over becomes [`HeaderValue::Unknown`] holding the stringified value.

use crate::address::normalize_address_object;
use crate::raw::{RawAddressObject, RawValue};
use crate::types::{HeaderValue, Parameterized, Received, Timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::collections::BTreeMap;

static COMMENT_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\([^()]*\)").unwrap());

const SINGLE_SENDER_PREFIXES: [&str; 2] = ["resent-from", "resent-sender"];
const MULTI_RECIPIENT_PREFIXES: [&str; 3] = ["resent-to", "resent-cc", "resent-bcc"];

/// Classify a header by its (case-insensitive) key and the shape of its value.
///
/// Total and stateless: the same pair always yields the same variant.
#[must_use]
pub fn classify(key: &str, value: &RawValue) -> HeaderValue {
    let key = key.to_lowercase();
    let key = key.as_str();

    if key == "date" || key.starts_with("resent-date") || matches!(value, RawValue::Date(_)) {
        return HeaderValue::Date(coerce_timestamp(value));
    }

    if is_single_sender(key)
        && let Some(object) = RawAddressObject::from_raw(value)
    {
        return HeaderValue::Address(normalize_address_object(&object));
    }

    if is_multi_recipient(key) {
        match value {
            RawValue::Array(items) => {
                return HeaderValue::AddressList(
                    items
                        .iter()
                        .filter_map(RawAddressObject::from_raw)
                        .map(|o| normalize_address_object(&o))
                        .collect(),
                );
            }
            RawValue::Object(_) => {
                if let Some(object) = RawAddressObject::from_raw(value) {
                    return HeaderValue::AddressList(vec![normalize_address_object(&object)]);
                }
            }
            _ => {}
        }
    }

    match key {
        "message-id" => HeaderValue::MessageId(value.to_string()),
        k if k.starts_with("resent-message-id") => HeaderValue::MessageId(value.to_string()),
        "references" | "in-reply-to" => HeaderValue::MessageIdList(message_ids(value)),
        "content-type" => HeaderValue::ContentType(parameterized(value)),
        "mime-version" => HeaderValue::MimeVersion(value.to_string()),
        "content-transfer-encoding" => HeaderValue::ContentEncoding(value.to_string()),
        "content-disposition" => HeaderValue::ContentDisposition(parameterized(value)),
        "keywords" => HeaderValue::Keywords(keywords(value)),
        "subject" | "comments" => HeaderValue::Unstructured(value.to_string()),
        "received" if value.is_object() => HeaderValue::Received(received(value)),
        _ => HeaderValue::Unknown(value.to_string()),
    }
}

fn is_single_sender(key: &str) -> bool {
    key == "from"
        || key == "sender"
        || SINGLE_SENDER_PREFIXES.iter().any(|p| key.starts_with(p))
}

fn is_multi_recipient(key: &str) -> bool {
    matches!(key, "to" | "cc" | "bcc" | "reply-to")
        || MULTI_RECIPIENT_PREFIXES.iter().any(|p| key.starts_with(p))
}

/// Scalar becomes a one-element list, falsy becomes empty
fn message_ids(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::Array(items) => items.iter().map(ToString::to_string).collect(),
        v if v.truthy() => vec![v.to_string()],
        _ => Vec::new(),
    }
}

fn keywords(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::Array(items) => items.iter().map(ToString::to_string).collect(),
        RawValue::String(s) => s.split(',').map(|k| k.trim().to_string()).collect(),
        v => vec![v.to_string()],
    }
}

/// Content-Type and Content-Disposition share the `{value, params}` shape
fn parameterized(value: &RawValue) -> Parameterized {
    match value.get_truthy("value") {
        Some(inner) => Parameterized {
            value: inner.to_string(),
            params: value.get_truthy("params").and_then(params),
        },
        None => Parameterized {
            value: value.to_string(),
            params: None,
        },
    }
}

fn params(value: &RawValue) -> Option<BTreeMap<String, String>> {
    match value {
        RawValue::Object(members) => Some(
            members
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
        ),
        _ => None,
    }
}

fn received(value: &RawValue) -> Received {
    let clause = |key: &str| value.get_truthy(key).map(ToString::to_string);
    Received {
        from: clause("from"),
        by: clause("by"),
        via: clause("via"),
        with: clause("with"),
        id: clause("id"),
        r#for: clause("for"),
        date: value
            .get_truthy("date")
            .and_then(|d| coerce_timestamp(d).valid().copied()),
    }
}

/// Coerce any raw value into a timestamp.
///
/// Dates pass through. Strings are tried as RFC 3339, RFC 2822, a bare
/// `YYYY-MM-DD` and finally as a header date with comments. Numbers are
/// milliseconds since the Unix epoch. Everything else yields
/// [`Timestamp::Invalid`].
#[must_use]
pub fn coerce_timestamp(value: &RawValue) -> Timestamp {
    match value {
        RawValue::Date(date) => Timestamp::Valid(*date),
        RawValue::String(s) => {
            parse_timestamp(s).map_or_else(|| Timestamp::Invalid(s.clone()), Timestamp::Valid)
        }
        RawValue::Number(n) => {
            epoch_millis(*n).map_or_else(|| Timestamp::Invalid(value.to_string()), Timestamp::Valid)
        }
        other => Timestamp::Invalid(other.to_string()),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
        .or_else(|| header_date(s))
}

/// RFC 5322 date with comments or folding whitespace
fn header_date(s: &str) -> Option<DateTime<Utc>> {
    let mut stripped = s.to_string();
    while COMMENT_REGEX.is_match(&stripped) {
        stripped = COMMENT_REGEX.replace_all(&stripped, " ").into_owned();
    }
    let folded = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    DateTime::parse_from_rfc2822(&folded)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[allow(clippy::cast_possible_truncation)]
fn epoch_millis(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(n.trunc() as i64)
}
