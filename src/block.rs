//! Block-structured grammar
//!
//! ```text
//! (
//!   'headers': (
//!     'subject': | 'unstructured' "Hello"
//!   )
//!   'references': [
//!     "<a@example.com>"
//!   ]
//!   'text': ~
//! )
//! ```
//!
//! Records are verbose groups `( 'key': value )`, sequences are lists
//! `[ value ]` without separators, quoted text uses `"`, numbers and
//! booleans are unquoted tokens and null is `~`. Union variants render
//! as `| 'tag' payload` where a state path says the members are unions.

use crate::serialize::{Grammar, Layout, write_quoted};
use crate::value::{Value, number_text};

const LIST_ELEMENT: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Object paths whose members are `[tag, payload]` union pairs
    state_paths: Vec<Vec<String>>,
}

impl Block {
    /// A block grammar with no union positions
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state_paths: Vec::new(),
        }
    }

    /// Treat the members of the object at `path` as union variants
    #[must_use]
    pub fn with_state_path<S: Into<String>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.state_paths
            .push(path.into_iter().map(Into::into).collect());
        self
    }

    /// The layout of a converted mail: header values are unions
    #[must_use]
    pub fn for_mail() -> Self {
        Self::new().with_state_path(["headers"])
    }

    fn is_state_object(&self, path: &[String]) -> bool {
        self.state_paths.iter().any(|p| p.as_slice() == path)
    }

    fn write_node(
        &self,
        value: &Value,
        layout: &Layout,
        level: usize,
        path: &mut Vec<String>,
        out: &mut String,
    ) {
        match value {
            Value::Null => out.push('~'),
            Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(number_text(*n).as_deref().unwrap_or("~")),
            Value::String(s) => write_quoted(s, '"', out),
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                out.push('[');
                path.push(LIST_ELEMENT.to_string());
                for item in items {
                    out.push_str(&layout.newline);
                    layout.push_indent(out, level + 1);
                    self.write_node(item, layout, level + 1, path, out);
                }
                path.pop();
                out.push_str(&layout.newline);
                layout.push_indent(out, level);
                out.push(']');
            }
            Value::Object(members) if members.is_empty() => out.push_str("()"),
            Value::Object(members) => {
                let unions = self.is_state_object(path);
                out.push('(');
                for (key, member) in members {
                    out.push_str(&layout.newline);
                    layout.push_indent(out, level + 1);
                    write_quoted(key, '\'', out);
                    out.push_str(": ");
                    path.push(key.clone());
                    match member.as_array() {
                        Some([Value::String(tag), payload]) if unions => {
                            out.push_str("| ");
                            write_quoted(tag, '\'', out);
                            out.push(' ');
                            self.write_node(payload, layout, level + 1, path, out);
                        }
                        _ => self.write_node(member, layout, level + 1, path, out),
                    }
                    path.pop();
                }
                out.push_str(&layout.newline);
                layout.push_indent(out, level);
                out.push(')');
            }
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::for_mail()
    }
}

impl Grammar for Block {
    fn write_value(&self, value: &Value, layout: &Layout, level: usize, out: &mut String) {
        self.write_node(value, layout, level, &mut Vec::new(), out);
    }
}
