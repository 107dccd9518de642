// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Canonical Mail Serialization
//!
//! Turns a parsed email into deterministic structured text in three
//! stages: loosely-typed parser output is normalized into a closed
//! canonical model, the model is converted into a generic value tree,
//! and the tree is serialized with sorted keys.
//!
//! # Features
//!
//! - Header classification into a closed set of variants
//! - Array-always recipients and a single sender
//! - Base64 attachment content
//! - Byte-for-byte reproducible output
//! - JSON and block-structured output grammars
//!
//! # Example
//!
//! ```rust
//! use mail_canon::{RenderOptions, render_message};
//!
//! let raw = b"From: sender@example.com\r\nSubject: Hello\r\n\r\nBody";
//! let text = render_message(raw, &RenderOptions::default()).unwrap();
//!
//! assert!(text.contains("\"subject\": \"Hello\""));
//! ```

mod address;
mod assemble;
mod attachment;
mod block;
mod convert;
mod error;
mod header;
mod parser;
mod raw;
mod render;
mod serialize;
mod types;
mod value;

pub use address::{normalize_address, normalize_address_object, normalize_addresses, normalize_from};
pub use assemble::assemble;
pub use attachment::normalize_attachment;
pub use block::Block;
pub use convert::{ToValue, convert};
pub use error::{Error, Result};
pub use header::{classify, coerce_timestamp};
pub use parser::parse_raw_mail;
pub use raw::*;
pub use render::{Format, RenderOptions, render, render_message};
pub use serialize::{Grammar, Json, Layout, escape, serialize};
pub use types::*;
pub use value::{Value, number_text};
