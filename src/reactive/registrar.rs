//! Binding Registrar: turns producers into tracked bindings.
//!
//! Each registration allocates the next registry slot, evaluates the producer
//! once, applies the result and records the binding. Nothing here removes a
//! binding again; that is left to the sweep.

use tracing::trace;

use super::registry::{AttrTarget, AttributeBinding, NodeBinding};
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::tags::el::{AttrProducer, ChildProducer};
use crate::tags::factory::{write_attribute, write_inner_html};
use crate::tags::{Tags, TagsOptions};
use crate::value::{AttrValue, AttrWrite};

/// The nodes a node binding contributes to its parent: the initial content
/// followed by the marker that locates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub content: NodeId,
    pub marker: NodeId,
    /// Registry slot the binding was recorded in.
    pub slot: usize,
}

impl Fragment {
    /// The fragment's nodes in tree order.
    pub fn nodes(&self) -> [NodeId; 2] {
        [self.content, self.marker]
    }
}

impl Tags<'_> {
    /// Track a child producer. The returned nodes are detached; the caller
    /// splices them into the tree, content first.
    pub fn register_node_binding(&mut self, mut producer: ChildProducer) -> Fragment {
        let slot = self.registry.nodes.reserve();
        let initial = producer();
        let (content, owns_current) = self.materialize(initial);
        let marker = self.dom.create(NodeData::marker());
        self.registry.nodes.fill(
            slot,
            NodeBinding {
                marker,
                producer,
                current: content,
                owns_current,
                options: self.options.clone(),
            },
        );
        trace!(slot, "registered node binding");
        Fragment {
            content,
            marker,
            slot,
        }
    }

    /// Track an attribute producer on `host`, applying its first value with
    /// the static coercion rule. Returns the registry slot.
    pub fn register_attribute_binding(
        &mut self,
        host: NodeId,
        target: AttrTarget,
        mut producer: AttrProducer,
    ) -> usize {
        let slot = self.registry.attrs.reserve();
        let initial = producer();
        apply_attribute(
            self.dom,
            host,
            &target,
            initial.clone(),
            &self.options,
            AttrValue::coerce_static,
        );
        self.registry.attrs.fill(
            slot,
            AttributeBinding {
                host,
                target,
                producer,
                last: initial,
                options: self.options.clone(),
            },
        );
        trace!(slot, "registered attribute binding");
        slot
    }
}

/// Apply a bound attribute value to its target.
pub(crate) fn apply_attribute(
    dom: &mut Dom,
    host: NodeId,
    target: &AttrTarget,
    value: AttrValue,
    options: &TagsOptions,
    coerce: fn(&AttrValue) -> AttrWrite,
) {
    match target {
        AttrTarget::Attribute(name) => write_attribute(dom, host, name, value, options, coerce),
        AttrTarget::InnerHtml => {
            let markup = if value.is_nullish() {
                String::new()
            } else {
                value.to_text()
            };
            write_inner_html(dom, host, markup);
        }
    }
}
