//! Canonical model to value tree
//!
//! Each canonical type states its own shape through [`ToValue`]. Records
//! emit every declared field; an absent optional field becomes `null`
//! rather than a missing key.

use crate::raw::iso_millis;
use crate::types::{
    Address, AddressObject, Attachment, HeaderValue, HtmlBody, Mail, Parameterized, Received,
    Timestamp,
};
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Conversion into the generic value tree
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Convert a canonical mail into its value tree
#[must_use]
pub fn convert(mail: &Mail) -> Value {
    mail.to_value()
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::number(*self)
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::String(iso_millis(self))
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(ToValue::to_value).collect())
    }
}

impl ToValue for BTreeMap<String, String> {
    fn to_value(&self) -> Value {
        Value::object(self.iter().map(|(k, v)| (k.as_str(), v.to_value())))
    }
}

impl ToValue for Address {
    fn to_value(&self) -> Value {
        Value::object([
            ("address", self.address.to_value()),
            ("name", self.name.to_value()),
        ])
    }
}

impl ToValue for AddressObject {
    fn to_value(&self) -> Value {
        Value::object([
            ("value", self.value.to_value()),
            ("html", self.html.to_value()),
            ("text", self.text.to_value()),
        ])
    }
}

impl ToValue for Attachment {
    fn to_value(&self) -> Value {
        Value::object([
            ("filename", self.filename.to_value()),
            ("contentType", self.content_type.to_value()),
            ("contentDisposition", self.content_disposition.to_value()),
            ("checksum", self.checksum.to_value()),
            ("size", self.size.to_value()),
            ("content", self.content.to_value()),
            ("cid", self.cid.to_value()),
            ("related", self.related.to_value()),
        ])
    }
}

/// Invalid timestamps have no ISO form and become `null`
impl ToValue for Timestamp {
    fn to_value(&self) -> Value {
        self.valid().map_or(Value::Null, ToValue::to_value)
    }
}

impl ToValue for Parameterized {
    fn to_value(&self) -> Value {
        Value::object([
            ("value", self.value.to_value()),
            ("params", self.params.to_value()),
        ])
    }
}

impl ToValue for Received {
    fn to_value(&self) -> Value {
        Value::object([
            ("from", self.from.to_value()),
            ("by", self.by.to_value()),
            ("via", self.via.to_value()),
            ("with", self.with.to_value()),
            ("id", self.id.to_value()),
            ("for", self.r#for.to_value()),
            ("date", self.date.to_value()),
        ])
    }
}

impl ToValue for HeaderValue {
    fn to_value(&self) -> Value {
        let payload = match self {
            Self::Unstructured(s)
            | Self::MessageId(s)
            | Self::MimeVersion(s)
            | Self::ContentEncoding(s)
            | Self::Unknown(s) => s.to_value(),
            Self::Date(timestamp) => timestamp.to_value(),
            Self::Address(object) => object.to_value(),
            Self::AddressList(objects) => objects.to_value(),
            Self::MessageIdList(ids) | Self::Keywords(ids) => ids.to_value(),
            Self::ContentType(p) | Self::ContentDisposition(p) => p.to_value(),
            Self::Received(received) => received.to_value(),
        };
        Value::variant(self.tag(), payload)
    }
}

/// `Disabled` has no text and converts like an absent body
impl ToValue for HtmlBody {
    fn to_value(&self) -> Value {
        self.markup().map_or(Value::Null, Value::string)
    }
}

impl ToValue for Mail {
    fn to_value(&self) -> Value {
        let headers = Value::object(self.headers.iter().map(|(k, v)| (k.as_str(), v.to_value())));

        Value::object([
            ("headers", headers),
            ("subject", self.subject.to_value()),
            ("from", self.from.to_value()),
            ("to", self.to.to_value()),
            ("cc", self.cc.to_value()),
            ("bcc", self.bcc.to_value()),
            ("replyTo", self.reply_to.to_value()),
            ("date", self.date.to_value()),
            ("messageId", self.message_id.to_value()),
            ("inReplyTo", self.in_reply_to.to_value()),
            ("references", self.references.to_value()),
            ("text", self.text.to_value()),
            ("html", self.html.to_value()),
            ("textAsHtml", self.text_as_html.to_value()),
            ("attachments", self.attachments.to_value()),
        ])
    }
}
