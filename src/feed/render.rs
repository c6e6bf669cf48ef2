//! Atom feed rendering.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::feed::escape::{escape, Escaped};
use crate::feed::types::{FeedEntry, FeedMeta};

/// Atom 1.0 namespace.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Render the feed document.
///
/// Entries are written in the order given. The output depends only on the
/// arguments, so identical inputs produce identical documents.
pub fn render(meta: &FeedMeta, entries: &[FeedEntry]) -> String {
    let mut doc = AtomWriter::new();

    doc.open("feed", &[("xmlns", &escape(ATOM_NAMESPACE))]);
    doc.element("title", &[("type", &escape("text"))], &escape(&meta.title));
    doc.link("self", None, &escape(&meta.self_link));
    doc.link("alternate", Some("text/html"), &escape(&meta.alternate_link));
    doc.element("id", &[], &escape(&meta.id));
    doc.element("updated", &[], &timestamp(&meta.generated_at));

    for entry in entries {
        render_entry(&mut doc, entry);
    }

    doc.close("feed");
    doc.finish()
}

fn render_entry(doc: &mut AtomWriter, entry: &FeedEntry) {
    let published = timestamp(&entry.published);
    let title = escape(&entry.title);

    doc.open("entry", &[]);
    doc.open("author", &[]);
    doc.element("name", &[], &escape(&author_name(&entry.repo)));
    doc.close("author");
    doc.element("published", &[], &published);
    doc.element("updated", &[], &published);
    doc.link("alternate", Some("text/html"), &escape(&entry.url));
    doc.element("id", &[], &title);
    doc.element("title", &[("type", &escape("text"))], &title);
    doc.close("entry");
}

/// Entry author: the quoted repository with an empty address.
fn author_name(repo: &str) -> String {
    format!("\"{}\" <>", repo)
}

/// UTC, RFC 3339, millisecond precision.
fn timestamp(dt: &DateTime<Utc>) -> Escaped {
    escape(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Indented XML writer. Element and attribute names are static; every
/// interpolated value must be [`Escaped`].
struct AtomWriter {
    out: String,
    depth: usize,
}

impl AtomWriter {
    fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn start_tag(&mut self, name: &'static str, attrs: &[(&'static str, &Escaped)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            // Writing to a String cannot fail.
            let _ = write!(self.out, " {}=\"{}\"", key, value);
        }
    }

    fn open(&mut self, name: &'static str, attrs: &[(&'static str, &Escaped)]) {
        self.start_tag(name, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, name: &'static str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{}>", name);
    }

    fn element(&mut self, name: &'static str, attrs: &[(&'static str, &Escaped)], text: &Escaped) {
        self.start_tag(name, attrs);
        let _ = writeln!(self.out, ">{}</{}>", text, name);
    }

    fn link(&mut self, rel: &'static str, media_type: Option<&'static str>, href: &Escaped) {
        let rel = escape(rel);
        match media_type.map(escape) {
            Some(media_type) => self.start_tag(
                "link",
                &[("rel", &rel), ("type", &media_type), ("href", href)],
            ),
            None => self.start_tag("link", &[("rel", &rel), ("href", href)]),
        }
        self.out.push_str(" />\n");
    }

    fn finish(self) -> String {
        self.out
    }
}
