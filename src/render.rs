//! End-to-end pipeline: raw record to text

use crate::assemble::assemble;
use crate::block::Block;
use crate::convert::convert;
use crate::error::Result;
use crate::parser::parse_raw_mail;
use crate::raw::RawMail;
use crate::serialize::{Grammar, Json, Layout};
use tracing::debug;

/// Output grammar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: Format,
    pub layout: Layout,
}

impl RenderOptions {
    #[must_use]
    pub fn new(format: Format, layout: Layout) -> Self {
        Self { format, layout }
    }
}

/// Normalize, convert and serialize a raw mail record.
///
/// Serialization starts only once the whole value tree exists.
#[must_use]
pub fn render(raw: &RawMail, options: &RenderOptions) -> String {
    let mail = assemble(raw);
    let value = convert(&mail);

    let text = match options.format {
        Format::Json => Json.render(&value, &options.layout),
        Format::Block => Block::for_mail().render(&value, &options.layout),
    };

    debug!("Rendered {:?} output of {} bytes", options.format, text.len());
    text
}

/// Parse message bytes and render them
pub fn render_message(raw: &[u8], options: &RenderOptions) -> Result<String> {
    let mail = parse_raw_mail(raw)?;
    Ok(render(&mail, options))
}
