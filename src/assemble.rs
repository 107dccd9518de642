//! Mail assembly: raw record in, canonical [`Mail`] out

use crate::address::{normalize_addresses, normalize_from};
use crate::attachment::normalize_attachment;
use crate::header::classify;
use crate::raw::{OneOrMany, RawHtml, RawMail};
use crate::types::{HtmlBody, Mail};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Normalize a raw mail record.
///
/// Every header entry is classified under its key as received; a key
/// that occurs twice keeps its last classification.
#[must_use]
pub fn assemble(raw: &RawMail) -> Mail {
    let mut headers = BTreeMap::new();
    for (key, value) in &raw.headers {
        let classified = classify(key, value);
        trace!("Header {key} classified as {}", classified.tag());
        headers.insert(key.clone(), classified);
    }

    let mail = Mail {
        headers,
        subject: raw.subject.clone(),
        from: normalize_from(raw.from.as_ref()),
        to: normalize_addresses(raw.to.as_ref()),
        cc: normalize_addresses(raw.cc.as_ref()),
        bcc: normalize_addresses(raw.bcc.as_ref()),
        reply_to: normalize_addresses(raw.reply_to.as_ref()),
        date: raw.date,
        message_id: raw.message_id.clone(),
        in_reply_to: raw.in_reply_to.clone(),
        references: references(raw.references.as_ref()),
        text: raw.text.clone(),
        html: raw.html.as_ref().map(|html| match html {
            RawHtml::Markup(markup) => HtmlBody::Markup(markup.clone()),
            RawHtml::Disabled => HtmlBody::Disabled,
        }),
        text_as_html: raw.text_as_html.clone(),
        attachments: raw.attachments.iter().map(normalize_attachment).collect(),
    };

    debug!(
        "Assembled mail with {} headers and {} attachments",
        mail.headers.len(),
        mail.attachments.len()
    );

    mail
}

/// A single reference becomes a one-element list; an empty one is dropped
fn references(raw: Option<&OneOrMany<String>>) -> Vec<String> {
    match raw {
        Some(OneOrMany::One(id)) if !id.is_empty() => vec![id.clone()],
        Some(OneOrMany::Many(ids)) => ids.clone(),
        _ => Vec::new(),
    }
}
