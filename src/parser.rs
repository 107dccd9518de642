//! RFC 5322 adapter: message bytes to a [`RawMail`] record

use crate::error::{Error, Result};
use crate::raw::{OneOrMany, RawAddress, RawAddressObject, RawAttachment, RawHtml, RawMail, RawValue};
use chrono::{DateTime, Utc};
use mailparse::{DispositionType, MailAddr, MailHeader, MailHeaderMap, ParsedMail, SingleInfo};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

static COMMENT_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\([^()]*\)").unwrap());

static CLAUSE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)\b(from|by|via|with|id|for)\s+([^\s;]+)").unwrap()
});

const ADDRESS_HEADERS: [&str; 6] = ["from", "sender", "to", "cc", "bcc", "reply-to"];

/// Parse raw message bytes into a loosely-typed mail record
pub fn parse_raw_mail(raw: &[u8]) -> Result<RawMail> {
    if raw.is_empty() {
        return Err(Error::EmptyInput);
    }

    let parsed = mailparse::parse_mail(raw)?;
    let headers = collect_headers(&parsed.headers);

    let mut parts = Parts::default();
    collect_parts(&parsed, false, &mut parts)?;

    debug!(
        "Parsed message: {} header keys, {} attachments",
        headers.len(),
        parts.attachments.len()
    );

    Ok(RawMail {
        subject: parsed.headers.get_first_value("Subject"),
        from: address_field(&parsed.headers, "from"),
        to: address_field(&parsed.headers, "to"),
        cc: address_field(&parsed.headers, "cc"),
        bcc: address_field(&parsed.headers, "bcc"),
        reply_to: address_field(&parsed.headers, "reply-to"),
        date: parsed
            .headers
            .get_first_value("Date")
            .and_then(|d| parse_date(&d)),
        message_id: first_trimmed(&parsed.headers, "Message-ID"),
        in_reply_to: first_trimmed(&parsed.headers, "In-Reply-To"),
        references: parsed
            .headers
            .get_first_value("References")
            .and_then(|refs| {
                let ids: Vec<String> = refs.split_whitespace().map(str::to_string).collect();
                match ids.len() {
                    0 => None,
                    1 => ids.into_iter().next().map(OneOrMany::One),
                    _ => Some(OneOrMany::Many(ids)),
                }
            }),
        text_as_html: parts.text.as_deref().map(text_to_html),
        text: parts.text,
        html: Some(parts.html.map_or(RawHtml::Disabled, RawHtml::Markup)),
        attachments: parts.attachments,
        headers,
    })
}

/// Lowercased keys in first-seen order; a repeated key holds an array
fn collect_headers(headers: &[MailHeader]) -> Vec<(String, RawValue)> {
    let mut grouped: Vec<(String, Vec<RawValue>)> = Vec::new();

    for header in headers {
        let key = header.get_key().to_lowercase();
        let value = header_value(&key, header);
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                RawValue::Array(values)
            };
            (key, value)
        })
        .collect()
}

fn is_address_header(key: &str) -> bool {
    ADDRESS_HEADERS.contains(&key)
        || key
            .strip_prefix("resent-")
            .is_some_and(|rest| ADDRESS_HEADERS.iter().any(|h| rest.starts_with(h)))
}

fn header_value(key: &str, header: &MailHeader) -> RawValue {
    let value = header.get_value();

    if key == "date" || key.starts_with("resent-date") {
        return parse_date(&value).map_or(RawValue::String(value), RawValue::Date);
    }

    if is_address_header(key) {
        return address_object(header).map_or(RawValue::String(value), |o| o.to_raw());
    }

    match key {
        "content-type" => {
            let ctype = mailparse::parse_content_type(&value);
            parameterized(ctype.mimetype, &ctype.params)
        }
        "content-disposition" => {
            let disposition = mailparse::parse_content_disposition(&value);
            parameterized(disposition_name(&disposition.disposition), &disposition.params)
        }
        "references" | "in-reply-to" => {
            let ids: Vec<RawValue> = value.split_whitespace().map(RawValue::from).collect();
            if ids.len() > 1 {
                RawValue::Array(ids)
            } else {
                RawValue::String(value.trim().to_string())
            }
        }
        "received" => received(&value),
        _ => RawValue::String(value),
    }
}

fn parameterized(value: String, params: &BTreeMap<String, String>) -> RawValue {
    let mut members = vec![("value".to_string(), RawValue::String(value))];
    if !params.is_empty() {
        members.push((
            "params".to_string(),
            RawValue::object(params.iter().map(|(k, v)| (k.clone(), RawValue::from(v.as_str())))),
        ));
    }
    RawValue::Object(members)
}

fn disposition_name(disposition: &DispositionType) -> String {
    match disposition {
        DispositionType::Inline => "inline".to_string(),
        DispositionType::Attachment => "attachment".to_string(),
        DispositionType::FormData => "form-data".to_string(),
        DispositionType::Extension(name) => name.to_lowercase(),
    }
}

/// Split a Received header into its clauses and the date after `;`
fn received(value: &str) -> RawValue {
    let (clauses, date) = match value.rsplit_once(';') {
        Some((clauses, date)) => (clauses, parse_date(date.trim())),
        None => (value, None),
    };

    let mut stripped = clauses.to_string();
    while COMMENT_REGEX.is_match(&stripped) {
        stripped = COMMENT_REGEX.replace_all(&stripped, " ").into_owned();
    }

    let mut members: Vec<(String, RawValue)> = Vec::new();
    for caps in CLAUSE_REGEX.captures_iter(&stripped) {
        let name = caps[1].to_lowercase();
        if !members.iter().any(|(k, _)| *k == name) {
            members.push((name, RawValue::from(&caps[2])));
        }
    }

    if let Some(date) = date {
        members.push(("date".to_string(), RawValue::Date(date)));
    }

    RawValue::Object(members)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    mailparse::dateparse(value)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn first_trimmed(headers: &[MailHeader], name: &str) -> Option<String> {
    headers
        .get_first_value(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One address object per header occurrence
fn address_field(headers: &[MailHeader], name: &str) -> Option<OneOrMany<RawAddressObject>> {
    let mut objects: Vec<RawAddressObject> = headers
        .iter()
        .filter(|h| h.get_key().eq_ignore_ascii_case(name))
        .filter_map(address_object)
        .collect();

    match objects.len() {
        0 => None,
        1 => objects.pop().map(OneOrMany::One),
        _ => Some(OneOrMany::Many(objects)),
    }
}

fn address_object(header: &MailHeader) -> Option<RawAddressObject> {
    let list = mailparse::addrparse_header(header).ok()?;

    let value: Vec<RawAddress> = list
        .iter()
        .flat_map(|addr| match addr {
            MailAddr::Single(info) => vec![mailbox(info)],
            MailAddr::Group(group) => group.addrs.iter().map(mailbox).collect(),
        })
        .collect();

    let html = value
        .iter()
        .map(address_html)
        .collect::<Vec<_>>()
        .join(", ");

    Some(RawAddressObject {
        value,
        html,
        text: header.get_value(),
    })
}

fn mailbox(info: &SingleInfo) -> RawAddress {
    RawAddress {
        address: Some(info.addr.clone()),
        name: info.display_name.clone(),
    }
}

fn address_html(address: &RawAddress) -> String {
    let email = address.address.as_deref().map(escape_html).unwrap_or_default();
    let link = format!("<a href=\"mailto:{email}\" class=\"mp_address_email\">{email}</a>");
    match address.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!(
            "<span class=\"mp_address_name\">{}</span> &lt;{link}&gt;",
            escape_html(name)
        ),
        None => link,
    }
}

#[derive(Default)]
struct Parts {
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<RawAttachment>,
}

fn collect_parts(part: &ParsedMail, in_related: bool, parts: &mut Parts) -> Result<()> {
    let mimetype = part.ctype.mimetype.to_lowercase();

    if !part.subparts.is_empty() {
        let related = in_related || mimetype == "multipart/related";
        for sub in &part.subparts {
            collect_parts(sub, related, parts)?;
        }
        return Ok(());
    }

    let is_attachment =
        part.get_content_disposition().disposition == DispositionType::Attachment;

    if !is_attachment && mimetype == "text/plain" && parts.text.is_none() {
        parts.text = Some(decode_body(part)?);
    } else if !is_attachment && mimetype == "text/html" && parts.html.is_none() {
        parts.html = Some(decode_body(part)?);
    } else {
        parts.attachments.push(attachment(part, in_related)?);
    }

    Ok(())
}

fn decode_body(part: &ParsedMail) -> Result<String> {
    part.get_body().map_err(|e| Error::Decode(e.to_string()))
}

fn attachment(part: &ParsedMail, related: bool) -> Result<RawAttachment> {
    let content = part.get_body_raw().map_err(|e| Error::Decode(e.to_string()))?;
    let disposition = part.get_content_disposition();

    let filename = disposition
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .cloned();

    #[allow(clippy::cast_precision_loss)]
    let size = content.len() as f64;

    Ok(RawAttachment {
        filename,
        content_type: part.ctype.mimetype.clone(),
        content_disposition: part
            .headers
            .get_first_value("Content-Disposition")
            .map(|_| disposition_name(&disposition.disposition)),
        checksum: format!("{:x}", md5::compute(&content)),
        size,
        cid: part.headers.get_first_value("Content-ID").map(|id| {
            id.trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        }),
        related: related.then_some(true),
        content: Some(content),
    })
}

/// Plain text as HTML paragraphs, lines joined with `<br/>`
fn text_to_html(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(escape_html).collect();
            format!("<p>{}</p>", lines.join("<br/>"))
        })
        .collect()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
