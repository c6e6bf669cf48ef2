//! Markup escaping for feed output.
//!
//! [`Escaped`] can only be obtained through [`escape`], and the renderer only
//! interpolates `Escaped` values, so no field can reach the document raw.

use std::fmt;

/// Text that is safe to embed in XML content and attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    /// The escaped text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` with their entity references.
pub fn escape(text: &str) -> Escaped {
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }

    Escaped(out)
}
