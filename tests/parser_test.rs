use chrono::{TimeZone, Utc};
use mail_canon::*;

#[test]
fn test_parse_simple_email() {
    let raw = b"From: John Doe <john@example.com>\r\n\
                To: recipient@proton.me\r\n\
                Subject: Test Email\r\n\
                Date: Wed, 01 Jan 2025 12:00:00 +0000\r\n\
                Message-ID: <test123@example.com>\r\n\
                \r\n\
                Hello, this is a test email.";

    let mail = parse_raw_mail(raw).unwrap();

    assert_eq!(mail.subject.as_deref(), Some("Test Email"));
    assert_eq!(mail.message_id.as_deref(), Some("<test123@example.com>"));
    assert_eq!(
        mail.date,
        Some(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap())
    );
    assert!(mail.text.as_deref().unwrap().contains("test email"));
    assert_eq!(mail.html, Some(RawHtml::Disabled));

    let from = mail.from.as_ref().unwrap().first().unwrap();
    assert_eq!(from.value[0].address.as_deref(), Some("john@example.com"));
    assert_eq!(from.value[0].name.as_deref(), Some("John Doe"));

    let to = mail.to.as_ref().unwrap().first().unwrap();
    assert_eq!(to.value[0].address.as_deref(), Some("recipient@proton.me"));
    assert_eq!(to.value[0].name, None);
}

#[test]
fn test_header_keys_are_lowercased_and_typed() {
    let raw = b"From: sender@example.com\r\n\
                Subject: Hi\r\n\
                Date: Wed, 01 Jan 2025 12:00:00 +0000\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                X-Mailer: Test\r\n\
                \r\n\
                Body";

    let mail = parse_raw_mail(raw).unwrap();
    let keys: Vec<&str> = mail.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["from", "subject", "date", "content-type", "x-mailer"]);

    let header = |key: &str| {
        mail.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };

    assert!(matches!(header("date"), RawValue::Date(_)));
    assert!(header("from").is_object());
    assert_eq!(header("x-mailer"), RawValue::from("Test"));

    let ctype = header("content-type");
    assert_eq!(ctype.get("value"), Some(&RawValue::from("text/plain")));
    assert_eq!(
        ctype.get("params").and_then(|p| p.get("charset")),
        Some(&RawValue::from("utf-8"))
    );
}

#[test]
fn test_repeated_headers_become_array() {
    let raw = b"Received: from a.example.com by b.example.com; Wed, 01 Jan 2025 12:00:00 +0000\r\n\
                Received: from c.example.com by a.example.com; Wed, 01 Jan 2025 11:59:00 +0000\r\n\
                Subject: Hops\r\n\
                \r\n\
                Body";

    let mail = parse_raw_mail(raw).unwrap();
    let (_, received) = mail.headers.iter().find(|(k, _)| k == "received").unwrap();

    match received {
        RawValue::Array(hops) => {
            assert_eq!(hops.len(), 2);
            assert_eq!(hops[0].get("from"), Some(&RawValue::from("a.example.com")));
            assert_eq!(hops[1].get("by"), Some(&RawValue::from("a.example.com")));
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn test_received_clauses() {
    let raw = b"Received: from mx.example.com (mx.example.com [10.0.0.1])\r\n \
                by mail.example.org (Postfix) with ESMTPS id 4ABC123\r\n \
                for <user@example.org>; Wed, 01 Jan 2025 12:00:00 +0000\r\n\
                \r\n\
                Body";

    let mail = parse_raw_mail(raw).unwrap();
    let (_, received) = mail.headers.iter().find(|(k, _)| k == "received").unwrap();

    assert_eq!(received.get("from"), Some(&RawValue::from("mx.example.com")));
    assert_eq!(received.get("by"), Some(&RawValue::from("mail.example.org")));
    assert_eq!(received.get("with"), Some(&RawValue::from("ESMTPS")));
    assert_eq!(received.get("id"), Some(&RawValue::from("4ABC123")));
    assert_eq!(received.get("for"), Some(&RawValue::from("<user@example.org>")));
    assert_eq!(
        received.get("date"),
        Some(&RawValue::Date(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()))
    );

    match classify("received", received) {
        HeaderValue::Received(parsed) => assert!(parsed.date.is_some()),
        other => panic!("expected received, got {other:?}"),
    }
}

#[test]
fn test_references_and_reply() {
    let raw = b"From: sender@example.com\r\n\
                Subject: Re: Original Subject\r\n\
                Message-ID: <reply@example.com>\r\n\
                In-Reply-To: <original@example.com>\r\n\
                References: <root@example.com> <original@example.com>\r\n\
                \r\n\
                Reply content";

    let mail = parse_raw_mail(raw).unwrap();

    assert_eq!(mail.in_reply_to.as_deref(), Some("<original@example.com>"));
    assert_eq!(
        mail.references,
        Some(OneOrMany::Many(vec![
            "<root@example.com>".into(),
            "<original@example.com>".into(),
        ]))
    );
}

#[test]
fn test_multipart_alternative() {
    let raw = b"From: sender@example.com\r\n\
                Subject: Alt\r\n\
                MIME-Version: 1.0\r\n\
                Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
                \r\n\
                --b1\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                Plain <body>\r\n\
                --b1\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <p>HTML body</p>\r\n\
                --b1--\r\n";

    let mail = parse_raw_mail(raw).unwrap();

    assert!(mail.text.as_deref().unwrap().contains("Plain <body>"));
    match mail.html {
        Some(RawHtml::Markup(html)) => assert!(html.contains("<p>HTML body</p>")),
        other => panic!("expected markup, got {other:?}"),
    }
    assert!(mail.text_as_html.as_deref().unwrap().starts_with("<p>Plain &lt;body&gt;"));
    assert!(mail.attachments.is_empty());
}

#[test]
fn test_attachment_part() {
    let raw = b"From: sender@example.com\r\n\
                Subject: Files\r\n\
                Content-Type: multipart/mixed; boundary=\"b1\"\r\n\
                \r\n\
                --b1\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                See attached.\r\n\
                --b1\r\n\
                Content-Type: text/plain; name=\"hello.txt\"\r\n\
                Content-Disposition: attachment; filename=\"hello.txt\"\r\n\
                Content-Transfer-Encoding: base64\r\n\
                \r\n\
                aGVsbG8=\r\n\
                --b1--\r\n";

    let mail = parse_raw_mail(raw).unwrap();

    assert_eq!(mail.attachments.len(), 1);
    let attachment = &mail.attachments[0];
    assert_eq!(attachment.filename.as_deref(), Some("hello.txt"));
    assert_eq!(attachment.content_type, "text/plain");
    assert_eq!(attachment.content_disposition.as_deref(), Some("attachment"));
    assert_eq!(attachment.content.as_deref(), Some(&b"hello"[..]));
    assert_eq!(attachment.checksum, "5d41402abc4b2a76b9719d911017c592");
    assert_eq!(attachment.size, 5.0);
    assert_eq!(attachment.related, None);

    let normalized = normalize_attachment(attachment);
    assert_eq!(normalized.content.as_deref(), Some("aGVsbG8="));
}

#[test]
fn test_related_inline_image() {
    let raw = b"From: sender@example.com\r\n\
                Content-Type: multipart/related; boundary=\"r1\"\r\n\
                \r\n\
                --r1\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <img src=\"cid:logo\">\r\n\
                --r1\r\n\
                Content-Type: image/png\r\n\
                Content-ID: <logo>\r\n\
                Content-Disposition: inline\r\n\
                Content-Transfer-Encoding: base64\r\n\
                \r\n\
                iVBORw0KGgo=\r\n\
                --r1--\r\n";

    let mail = parse_raw_mail(raw).unwrap();

    assert_eq!(mail.attachments.len(), 1);
    let image = &mail.attachments[0];
    assert_eq!(image.cid.as_deref(), Some("logo"));
    assert_eq!(image.related, Some(true));
    assert_eq!(image.content_disposition.as_deref(), Some("inline"));
}

#[test]
fn test_empty_input_is_error() {
    assert!(matches!(parse_raw_mail(b""), Err(Error::EmptyInput)));
}
