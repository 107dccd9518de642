//! Attachment normalization

use crate::raw::RawAttachment;
use crate::types::Attachment;
use base64::{Engine, engine::general_purpose};

/// Normalize an attachment, base64-encoding its payload.
///
/// A missing payload stays absent; an empty one encodes to `""`.
#[must_use]
pub fn normalize_attachment(raw: &RawAttachment) -> Attachment {
    Attachment {
        filename: non_empty(raw.filename.as_ref()),
        content_type: raw.content_type.clone(),
        content_disposition: non_empty(raw.content_disposition.as_ref()),
        checksum: raw.checksum.clone(),
        size: raw.size,
        content: raw
            .content
            .as_ref()
            .map(|bytes| general_purpose::STANDARD.encode(bytes)),
        cid: non_empty(raw.cid.as_ref()),
        related: raw.related.unwrap_or(false),
    }
}

fn non_empty(field: Option<&String>) -> Option<String> {
    field.filter(|s| !s.is_empty()).cloned()
}
