//! Reconciliation Loop: poll every binding and patch only what changed.
//!
//! One tick runs the attribute pass, then the node pass, each in ascending
//! slot order. A binding whose host or marker is no longer connected is
//! skipped and counted; removing it is the sweep's job.
//!
//! Node content is compared cheaply where possible: text against text by
//! string, and element against element by full serialized markup. The markup
//! comparison re-serializes both subtrees every tick the producer returns an
//! element, which is simple but not free for large subtrees.

use tracing::{debug, warn};

use super::registrar::apply_attribute;
use super::registry::Registry;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::tags::el::Child;
use crate::tags::Tags;
use crate::value::AttrValue;

/// What one pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Bindings whose producer ran.
    pub evaluated: usize,
    /// Bindings that wrote to the tree.
    pub patched: usize,
    /// Bindings skipped because their host or marker left the tree.
    pub disconnected: usize,
}

/// Evaluate every attribute binding and apply changed values.
pub fn attribute_pass(dom: &mut Dom, registry: &mut Registry) -> PassReport {
    let mut report = PassReport::default();
    for slot in 0..registry.attrs.len() {
        let Some(binding) = registry.attrs.get_mut(slot) else {
            continue;
        };
        if !dom.is_connected(binding.host) {
            report.disconnected += 1;
            continue;
        }
        let value = (binding.producer)();
        report.evaluated += 1;
        if value == binding.last {
            continue;
        }
        apply_attribute(
            dom,
            binding.host,
            &binding.target,
            value.clone(),
            &binding.options,
            AttrValue::coerce_tick,
        );
        binding.last = value;
        report.patched += 1;
    }
    report
}

/// Evaluate every node binding and replace content that changed.
///
/// Bindings registered while this pass runs (by elements a producer returned)
/// are first evaluated on the next tick.
pub fn node_pass(dom: &mut Dom, registry: &mut Registry) -> PassReport {
    let mut report = PassReport::default();
    let count = registry.nodes.len();
    for slot in 0..count {
        let Some(binding) = registry.nodes.get_mut(slot) else {
            continue;
        };
        let marker = binding.marker;
        if !dom.is_connected(marker) {
            report.disconnected += 1;
            continue;
        }
        let value = (binding.producer)();
        let owns_current = binding.owns_current;
        let options = binding.options.clone();
        report.evaluated += 1;

        // Content moved away by the host leaves a neighbouring marker in its
        // place; that belongs to another binding and is never replaced.
        let current = dom
            .previous_sibling(marker)
            .filter(|&c| !dom.get(c).is_some_and(NodeData::is_marker));
        let (next, owns_next) = match value {
            Child::Element(el) => {
                let fresh = Tags::new(dom, registry, options).build_element(el);
                if current.is_some_and(|c| same_element_markup(dom, c, fresh)) {
                    // Drop the duplicate; bindings it registered go with it.
                    dom.remove(fresh);
                    continue;
                }
                (fresh, true)
            }
            Child::Node(node) => {
                if current == Some(node)
                    || current.is_some_and(|c| same_element_markup(dom, c, node))
                {
                    continue;
                }
                if !dom.contains(node) {
                    warn!(slot, ?node, "producer returned a destroyed node; keeping content");
                    continue;
                }
                (node, false)
            }
            primitive => {
                let text = primitive_text(primitive);
                if current.is_some_and(|c| text_equals(dom, c, &text)) {
                    continue;
                }
                (dom.create(NodeData::text(text)), true)
            }
        };

        replace_before_marker(dom, marker, current, next, owns_current);
        if let Some(binding) = registry.nodes.get_mut(slot) {
            binding.current = next;
            binding.owns_current = owns_next;
        }
        report.patched += 1;
        debug!(slot, "replaced bound content");
    }
    report
}

/// Both nodes are elements and serialize identically.
fn same_element_markup(dom: &Dom, current: NodeId, candidate: NodeId) -> bool {
    let is_element = |id| dom.get(id).is_some_and(NodeData::is_element);
    is_element(current) && is_element(candidate) && dom.outer_html(current) == dom.outer_html(candidate)
}

fn text_equals(dom: &Dom, node: NodeId, text: &str) -> bool {
    dom.get(node)
        .and_then(NodeData::text_content)
        .is_some_and(|t| t == text)
}

fn primitive_text(value: Child) -> String {
    match value {
        Child::Text(text) => text,
        _ => String::new(),
    }
}

/// Swap the content node before `marker` for `next`, destroying the old
/// content when the binding built it.
fn replace_before_marker(
    dom: &mut Dom,
    marker: NodeId,
    current: Option<NodeId>,
    next: NodeId,
    owns_current: bool,
) {
    let result = match current {
        Some(old) => dom.replace_child(old, next).map(|()| {
            if owns_current {
                dom.remove(old);
            }
        }),
        None => match dom.parent(marker) {
            Some(parent) => dom.insert_before(parent, next, Some(marker)),
            None => Ok(()),
        },
    };
    if let Err(err) = result {
        warn!(%err, "could not replace bound content");
    }
}
