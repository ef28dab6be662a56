//! Markup serialization of live nodes.
//!
//! Attribute values and text are escaped, raw markup is emitted verbatim and
//! markers produce nothing. Void elements are written self-closing (`<br/>`)
//! and never emit children.

use super::node::{NodeId, NodeKind};
use super::tree::Dom;
use crate::value::{escape_attribute, escape_text};

/// Tag names that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Whether `tag` is a void element (ASCII case-insensitive).
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

impl Dom {
    /// Serialize a node and its subtree. Unknown ids serialize to `""`.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize only the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Concatenated text of all descendant text and raw nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        self.walk_depth_first(id)
            .into_iter()
            .filter_map(|n| match &self.get(n)?.kind {
                NodeKind::Text(t) | NodeKind::Raw(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };
        match &data.kind {
            NodeKind::Document => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element {
                tag, attributes, ..
            } => {
                write_open_tag(tag, attributes.iter().map(|(n, v)| (n.as_str(), v.as_str())), out);
                if is_void(tag) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                write_close_tag(tag, out);
            }
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Raw(markup) => out.push_str(markup),
            NodeKind::Marker => {}
        }
    }
}

/// Write `<tag a="b">`, or `<tag a="b"/>` for void elements.
pub(crate) fn write_open_tag<'a>(
    tag: &str,
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    out: &mut String,
) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        write_attribute_pair(name, &escape_attribute(value), out);
    }
    finish_open_tag(tag, out);
}

/// Write ` name="value"` with `value` taken verbatim.
pub(crate) fn write_attribute_pair(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(value);
    out.push('"');
}

pub(crate) fn finish_open_tag(tag: &str, out: &mut String) {
    if is_void(tag) {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

pub(crate) fn write_close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
