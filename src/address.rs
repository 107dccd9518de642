//! Address normalization
//!
//! Multi-recipient fields always come out as a sequence, the sender
//! always as at most one object.

use crate::raw::{OneOrMany, RawAddress, RawAddressObject};
use crate::types::{Address, AddressObject};
use tracing::debug;

/// Normalize one mailbox entry.
///
/// An empty address stays absent rather than becoming `""`; a missing
/// name becomes `""`.
#[must_use]
pub fn normalize_address(raw: &RawAddress) -> Address {
    Address {
        address: raw.address.clone().filter(|a| !a.is_empty()),
        name: raw.name.clone().unwrap_or_default(),
    }
}

#[must_use]
pub fn normalize_address_object(raw: &RawAddressObject) -> AddressObject {
    AddressObject {
        value: raw.value.iter().map(normalize_address).collect(),
        html: raw.html.clone(),
        text: raw.text.clone(),
    }
}

/// Normalize a To/Cc/Bcc/Reply-To field into a sequence
#[must_use]
pub fn normalize_addresses(raw: Option<&OneOrMany<RawAddressObject>>) -> Vec<AddressObject> {
    raw.map(|field| field.iter().map(normalize_address_object).collect())
        .unwrap_or_default()
}

/// Normalize the From field to a single sender.
///
/// When the parser reports several From objects only the first is kept.
#[must_use]
pub fn normalize_from(raw: Option<&OneOrMany<RawAddressObject>>) -> Option<AddressObject> {
    let field = raw?;
    if let OneOrMany::Many(objects) = field
        && objects.len() > 1
    {
        debug!("Keeping first of {} From address objects", objects.len());
    }
    field.first().map(normalize_address_object)
}
