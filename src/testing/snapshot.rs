//! Snapshot rendering helpers.
//!
//! [`tree_to_string`] writes one line per node, indented two spaces per level.
//! Unlike markup it shows markers, so the position of bound content is visible.

use crate::dom::node::{NodeId, NodeKind};
use crate::dom::tree::Dom;

/// Render the subtree at `start` as an indented outline.
///
/// Elements print as `<tag a="b">`, text as a quoted string, raw markup as
/// `raw "..."`, markers as `#marker` and documents as `#document`. Lines are
/// joined with `'\n'` with no trailing newline.
///
/// # Examples
///
/// ```ignore
/// use polldom::testing::tree_to_string;
///
/// let outline = tree_to_string(ctx.dom(), ctx.body());
/// assert!(outline.starts_with("<body>"));
/// ```
pub fn tree_to_string(dom: &Dom, start: NodeId) -> String {
    let mut lines = Vec::new();
    write_outline(dom, start, 0, &mut lines);
    lines.join("\n")
}

fn write_outline(dom: &Dom, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(data) = dom.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let line = match &data.kind {
        NodeKind::Document => "#document".to_owned(),
        NodeKind::Element {
            tag, attributes, ..
        } => {
            let attrs: String = attributes
                .iter()
                .map(|(n, v)| format!(" {n}=\"{v}\""))
                .collect();
            format!("<{tag}{attrs}>")
        }
        NodeKind::Text(text) => format!("{text:?}"),
        NodeKind::Raw(markup) => format!("raw {markup:?}"),
        NodeKind::Marker => "#marker".to_owned(),
    };
    lines.push(format!("{indent}{line}"));
    for &child in dom.children(id) {
        write_outline(dom, child, depth + 1, lines);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
