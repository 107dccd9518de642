use chrono::{TimeZone, Utc};
use mail_canon::*;

fn sender() -> RawAddressObject {
    RawAddressObject {
        value: vec![RawAddress::new("sender@example.com", "Sender")],
        html: String::new(),
        text: "Sender <sender@example.com>".into(),
    }
}

fn minimal() -> RawMail {
    RawMail {
        headers: vec![
            ("subject".into(), RawValue::from("Hello")),
            ("message-id".into(), RawValue::from("<m1@example.com>")),
        ],
        subject: Some("Hello".into()),
        message_id: Some("<m1@example.com>".into()),
        ..RawMail::default()
    }
}

#[test]
fn test_every_header_is_classified() {
    let mail = assemble(&minimal());
    assert_eq!(mail.headers.len(), 2);
    assert_eq!(
        mail.headers.get("subject"),
        Some(&HeaderValue::Unstructured("Hello".into()))
    );
    assert_eq!(
        mail.headers.get("message-id"),
        Some(&HeaderValue::MessageId("<m1@example.com>".into()))
    );
}

#[test]
fn test_header_keys_keep_case() {
    let raw = RawMail {
        headers: vec![("X-Custom".into(), RawValue::from("1"))],
        ..RawMail::default()
    };
    let mail = assemble(&raw);
    assert!(mail.headers.contains_key("X-Custom"));
    assert!(!mail.headers.contains_key("x-custom"));
}

#[test]
fn test_header_order_does_not_matter() {
    let mut reversed = minimal();
    reversed.headers.reverse();
    assert_eq!(assemble(&minimal()), assemble(&reversed));
}

#[test]
fn test_array_fields_always_materialized() {
    let mail = assemble(&RawMail::default());
    assert!(mail.to.is_empty());
    assert!(mail.cc.is_empty());
    assert!(mail.bcc.is_empty());
    assert!(mail.reply_to.is_empty());
    assert!(mail.references.is_empty());
    assert!(mail.attachments.is_empty());
    assert!(mail.from.is_none());
}

#[test]
fn test_from_is_single_value() {
    let raw = RawMail {
        from: Some(OneOrMany::Many(vec![sender(), sender()])),
        ..RawMail::default()
    };
    let mail = assemble(&raw);
    assert_eq!(
        mail.from.unwrap().value[0].address.as_deref(),
        Some("sender@example.com")
    );
}

#[test]
fn test_to_single_object_becomes_sequence() {
    let raw = RawMail {
        to: Some(OneOrMany::One(sender())),
        ..RawMail::default()
    };
    assert_eq!(assemble(&raw).to.len(), 1);
}

#[test]
fn test_references_scalar_becomes_sequence() {
    let raw = RawMail {
        references: Some(OneOrMany::One("msg1".into())),
        ..RawMail::default()
    };
    assert_eq!(assemble(&raw).references, vec!["msg1".to_string()]);
}

#[test]
fn test_references_absent_is_empty() {
    assert_eq!(assemble(&RawMail::default()).references, Vec::<String>::new());
}

#[test]
fn test_references_sequence_passes_through() {
    let raw = RawMail {
        references: Some(OneOrMany::Many(vec!["a".into(), "b".into()])),
        ..RawMail::default()
    };
    assert_eq!(assemble(&raw).references, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_html_states() {
    let markup = RawMail {
        html: Some(RawHtml::Markup("<p>Hi</p>".into())),
        ..RawMail::default()
    };
    let disabled = RawMail {
        html: Some(RawHtml::Disabled),
        ..RawMail::default()
    };

    assert_eq!(
        assemble(&markup).html,
        Some(HtmlBody::Markup("<p>Hi</p>".into()))
    );
    assert_eq!(assemble(&disabled).html, Some(HtmlBody::Disabled));
    assert_eq!(assemble(&RawMail::default()).html, None);
}

#[test]
fn test_scalar_fields_pass_through() {
    let date = Utc.with_ymd_and_hms(2025, 10, 24, 10, 30, 0).unwrap();
    let raw = RawMail {
        date: Some(date),
        in_reply_to: Some("<parent@example.com>".into()),
        text: Some("Body".into()),
        text_as_html: Some("<p>Body</p>".into()),
        ..minimal()
    };
    let mail = assemble(&raw);

    assert_eq!(mail.date, Some(date));
    assert_eq!(mail.subject.as_deref(), Some("Hello"));
    assert_eq!(mail.message_id.as_deref(), Some("<m1@example.com>"));
    assert_eq!(mail.in_reply_to.as_deref(), Some("<parent@example.com>"));
    assert_eq!(mail.text.as_deref(), Some("Body"));
    assert_eq!(mail.text_as_html.as_deref(), Some("<p>Body</p>"));
}

#[test]
fn test_attachments_normalized() {
    let raw = RawMail {
        attachments: vec![RawAttachment {
            content_type: "application/octet-stream".into(),
            content: Some(b"hello".to_vec()),
            ..RawAttachment::default()
        }],
        ..RawMail::default()
    };
    let mail = assemble(&raw);
    assert_eq!(mail.attachments.len(), 1);
    assert_eq!(mail.attachments[0].content.as_deref(), Some("aGVsbG8="));
    assert!(!mail.attachments[0].related);
}
