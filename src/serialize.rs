//! Canonical text serialization of the value tree
//!
//! Output bytes depend only on the tree's content: object members are
//! emitted in lexicographic key order, every nested container goes one
//! indent unit deeper, and empty containers collapse to `[]` / `{}`.

use crate::value::{Value, number_text};
use std::fmt::Write;

/// Indentation and line-break settings shared by every grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub indent: String,
    pub newline: String,
}

impl Layout {
    #[must_use]
    pub fn new(indent: impl Into<String>, newline: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            newline: newline.into(),
        }
    }

    pub(crate) fn push_indent(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str(&self.indent);
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("  ", "\n")
    }
}

/// A concrete text syntax for the value tree
pub trait Grammar {
    /// Render `value` at nesting `level` into `out`
    fn write_value(&self, value: &Value, layout: &Layout, level: usize, out: &mut String);

    fn render(&self, value: &Value, layout: &Layout) -> String {
        let mut out = String::new();
        self.write_value(value, layout, 0, &mut out);
        out
    }
}

/// JSON with sorted keys and one member per line
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Grammar for Json {
    fn write_value(&self, value: &Value, layout: &Layout, level: usize, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(number_text(*n).as_deref().unwrap_or("null")),
            Value::String(s) => write_quoted(s, '"', out),
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&layout.newline);
                    layout.push_indent(out, level + 1);
                    self.write_value(item, layout, level + 1, out);
                }
                out.push_str(&layout.newline);
                layout.push_indent(out, level);
                out.push(']');
            }
            Value::Object(members) if members.is_empty() => out.push_str("{}"),
            Value::Object(members) => {
                out.push('{');
                for (i, (key, member)) in members.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&layout.newline);
                    layout.push_indent(out, level + 1);
                    write_quoted(key, '"', out);
                    out.push_str(": ");
                    self.write_value(member, layout, level + 1, out);
                }
                out.push_str(&layout.newline);
                layout.push_indent(out, level);
                out.push('}');
            }
        }
    }
}

/// Serialize a value tree as canonical JSON
#[must_use]
pub fn serialize(value: &Value, indent: &str, newline: &str) -> String {
    Json.render(value, &Layout::new(indent, newline))
}

/// Escape `s` for use between `quote` delimiters.
///
/// Backslash, the quote character and the usual control characters get
/// short escapes; any other C0 or C1 control becomes `\u00xx`.
#[must_use]
pub fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn write_quoted(s: &str, quote: char, out: &mut String) {
    out.push(quote);
    out.push_str(&escape(s, quote));
    out.push(quote);
}
