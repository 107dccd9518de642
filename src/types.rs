//! Canonical, strongly-typed mail model

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A normalized message, ready for conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Mail {
    /// Classified headers keyed as received
    pub headers: BTreeMap<String, HeaderValue>,

    pub subject: Option<String>,

    /// The single sender (RFC 5322 allows exactly one From)
    pub from: Option<AddressObject>,

    pub to: Vec<AddressObject>,
    pub cc: Vec<AddressObject>,
    pub bcc: Vec<AddressObject>,
    pub reply_to: Vec<AddressObject>,

    pub date: Option<DateTime<Utc>>,
    pub message_id: Option<String>,
    pub in_reply_to: Option<String>,

    /// Message IDs of the thread, oldest first
    pub references: Vec<String>,

    pub text: Option<String>,
    pub html: Option<HtmlBody>,
    pub text_as_html: Option<String>,
    pub attachments: Vec<Attachment>,
}

/// Email address with display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Mailbox address; absent for groups or unparsable entries
    pub address: Option<String>,

    /// Display name, empty when none was given
    pub name: String,
}

/// All addresses of one header plus its text and HTML renderings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressObject {
    pub value: Vec<Address>,
    pub html: String,
    pub text: String,
}

/// Attachment metadata with base64 content
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: Option<String>,
    pub content_type: String,
    pub content_disposition: Option<String>,
    pub checksum: String,
    pub size: f64,

    /// Standard base64 of the decoded payload
    pub content: Option<String>,

    pub cid: Option<String>,

    /// Part of a `multipart/related` tree (an inline image, usually)
    pub related: bool,
}

/// HTML body state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlBody {
    Markup(String),
    /// The parser reported explicitly that there is no HTML body
    Disabled,
}

impl HtmlBody {
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Markup(html) => Some(html.as_str()),
            Self::Disabled => None,
        }
    }
}

/// A header value classified by its key and shape
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Subject, Comments
    Unstructured(String),
    Date(Timestamp),
    /// From, Sender, Resent-From
    Address(AddressObject),
    /// To, Cc, Bcc, Reply-To and their Resent- forms
    AddressList(Vec<AddressObject>),
    MessageId(String),
    /// References, In-Reply-To
    MessageIdList(Vec<String>),
    ContentType(Parameterized),
    MimeVersion(String),
    ContentEncoding(String),
    ContentDisposition(Parameterized),
    Received(Received),
    Keywords(Vec<String>),
    Unknown(String),
}

impl HeaderValue {
    /// Variant name used as the tag in serialized output
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Unstructured(_) => "unstructured",
            Self::Date(_) => "date",
            Self::Address(_) => "address",
            Self::AddressList(_) => "address_list",
            Self::MessageId(_) => "message_id",
            Self::MessageIdList(_) => "message_id_list",
            Self::ContentType(_) => "content_type",
            Self::MimeVersion(_) => "mime_version",
            Self::ContentEncoding(_) => "content_encoding",
            Self::ContentDisposition(_) => "content_disposition",
            Self::Received(_) => "received",
            Self::Keywords(_) => "keywords",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// A `value; key=param` header such as Content-Type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameterized {
    pub value: String,
    pub params: Option<BTreeMap<String, String>>,
}

/// A Received trace header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Received {
    pub from: Option<String>,
    pub by: Option<String>,
    pub via: Option<String>,
    pub with: Option<String>,
    pub id: Option<String>,
    pub r#for: Option<String>,

    /// Absent when the header carried no usable date
    pub date: Option<DateTime<Utc>>,
}

/// A coerced header date.
///
/// Coercion never fails; text that is not a date is kept as `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Valid(DateTime<Utc>),
    Invalid(String),
}

impl Timestamp {
    #[must_use]
    pub const fn valid(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Valid(date) => Some(date),
            Self::Invalid(_) => None,
        }
    }
}
