//! Node Factory: builds [`El`] descriptions into live DOM nodes.
//!
//! Construction is best-effort: malformed input is coerced or skipped and tree
//! errors are logged, never returned. Producers found in properties and child
//! slots are handed to the Binding Registrar, which evaluates them once and
//! tracks them for the reconciliation loop.

use std::rc::Rc;

use tracing::{trace, warn};

use super::el::{Child, El, Markup, Prop};
use super::options::TagsOptions;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::event::handler::event_name;
use crate::reactive::registry::{AttrTarget, Registry};
use crate::value::{AttrValue, AttrWrite};

/// Live tag factory bound to a render context.
///
/// Obtained from [`Context::use_tags`](crate::context::Context::use_tags).
pub struct Tags<'a> {
    pub(crate) dom: &'a mut Dom,
    pub(crate) registry: &'a mut Registry,
    pub(crate) options: Rc<TagsOptions>,
}

impl<'a> Tags<'a> {
    pub(crate) fn new(dom: &'a mut Dom, registry: &'a mut Registry, options: Rc<TagsOptions>) -> Self {
        Self {
            dom,
            registry,
            options,
        }
    }

    pub fn options(&self) -> &TagsOptions {
        &self.options
    }

    pub fn dom(&self) -> &Dom {
        self.dom
    }

    /// The live document elements are created for, if there is one.
    pub fn document(&self) -> Option<NodeId> {
        let doc = self.options.document.or_else(|| self.dom.root())?;
        self.dom
            .get(doc)
            .is_some_and(|data| data.is_document())
            .then_some(doc)
    }

    /// Build an element, detached. Returns `None` without a live document.
    pub fn build(&mut self, el: El) -> Option<NodeId> {
        if !self.has_document() {
            return None;
        }
        Some(self.build_element(el))
    }

    /// Build an element from positional arguments.
    pub fn tag(&mut self, tag: &str, args: impl IntoIterator<Item = super::el::Arg>) -> Option<NodeId> {
        self.build(El::from_args(tag, args))
    }

    /// Build an element and append it to `parent`.
    pub fn mount(&mut self, parent: NodeId, el: El) -> Option<NodeId> {
        let id = self.build(el)?;
        if let Err(err) = self.dom.append_child(parent, id) {
            warn!(%err, "could not mount element");
        }
        Some(id)
    }

    /// Append any child value (text, element, node, producer, list) to `parent`.
    pub fn append(&mut self, parent: NodeId, child: impl Into<Child>) {
        if self.has_document() {
            self.append_child_value(parent, child.into());
        }
    }

    fn has_document(&self) -> bool {
        if self.document().is_some() {
            return true;
        }
        warn!(
            document = ?self.options.document,
            "no live document to create elements in; ignoring"
        );
        false
    }

    pub(crate) fn build_element(&mut self, el: El) -> NodeId {
        let El {
            tag,
            props,
            children,
            node_ref,
            inner_html,
        } = el;

        let mut data = NodeData::element(tag);
        if let Some(ns) = &self.options.namespace {
            data = data.with_namespace(ns.clone());
        }
        let id = self.dom.create(data);

        for (name, prop) in props {
            self.apply_prop(id, name, prop);
        }

        match inner_html {
            Some(Markup::Static(markup)) => write_inner_html(self.dom, id, markup),
            Some(Markup::Bind(mut producer)) => {
                self.register_attribute_binding(
                    id,
                    AttrTarget::InnerHtml,
                    Box::new(move || AttrValue::Text(producer())),
                );
            }
            None => {
                for child in children {
                    self.append_child_value(id, child);
                }
            }
        }

        if let Some(r) = node_ref {
            r.set(id);
        }
        id
    }

    fn apply_prop(&mut self, id: NodeId, name: String, prop: Prop) {
        match prop {
            Prop::Listener(callback) => match event_name(&name) {
                Some(event) => {
                    if let Err(err) = self.dom.add_listener(id, event, callback) {
                        warn!(%err, "could not register listener");
                    }
                }
                None => trace!(%name, "dropping listener without an event prefix"),
            },
            Prop::Bind(producer) => {
                self.register_attribute_binding(id, AttrTarget::Attribute(name), producer);
            }
            Prop::Value(value) => {
                write_attribute(self.dom, id, &name, value, &self.options, AttrValue::coerce_static);
            }
            Prop::Ref(r) => r.set(id),
        }
    }

    pub(crate) fn append_child_value(&mut self, parent: NodeId, child: Child) {
        let appended = match child {
            Child::Null => return,
            Child::List(items) => {
                for item in items {
                    self.append_child_value(parent, item);
                }
                return;
            }
            Child::Bind(producer) => {
                let fragment = self.register_node_binding(producer);
                self.dom
                    .append_child(parent, fragment.content)
                    .and_then(|()| self.dom.append_child(parent, fragment.marker))
            }
            Child::Text(text) => {
                let node = self.dom.create(NodeData::text(text));
                self.dom.append_child(parent, node)
            }
            Child::Element(el) => {
                let node = self.build_element(el);
                self.dom.append_child(parent, node)
            }
            Child::Node(node) => self.dom.append_child(parent, node),
        };
        if let Err(err) = appended {
            warn!(%err, "could not append child");
        }
    }

    /// Turn a producer result into exactly one node.
    ///
    /// Returns the node and whether it was created here.
    pub(crate) fn materialize(&mut self, value: Child) -> (NodeId, bool) {
        match value {
            Child::Element(el) => (self.build_element(el), true),
            Child::Node(node) if self.dom.contains(node) => (node, false),
            Child::Text(text) => (self.dom.create(NodeData::text(text)), true),
            Child::Null => (self.dom.create(NodeData::text("")), true),
            other => {
                trace!(value = ?other, "producer result is not a single node; rendering empty text");
                (self.dom.create(NodeData::text("")), true)
            }
        }
    }
}

/// Write an attribute through the hook and the given coercion rule.
pub(crate) fn write_attribute(
    dom: &mut Dom,
    host: NodeId,
    name: &str,
    value: AttrValue,
    options: &TagsOptions,
    coerce: fn(&AttrValue) -> AttrWrite,
) {
    let (name, value) = options.rewrite(name, value);
    let result = match coerce(&value) {
        AttrWrite::Set(s) => dom.set_attribute(host, &name, s),
        AttrWrite::Remove => dom.remove_attribute(host, &name),
    };
    if let Err(err) = result {
        warn!(%err, attribute = %name, "could not write attribute");
    }
}

/// Replace every child of `host` with one raw markup node.
pub(crate) fn write_inner_html(dom: &mut Dom, host: NodeId, markup: String) {
    dom.clear_children(host);
    let raw = dom.create(NodeData::raw(markup));
    if let Err(err) = dom.append_child(host, raw) {
        warn!(%err, "could not write raw markup");
        dom.remove(raw);
    }
}
