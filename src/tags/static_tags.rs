//! Static Serializer: renders [`El`] descriptions straight to markup.
//!
//! Every producer runs exactly once and nothing is tracked. Plain attribute
//! values are escaped; text children, raw markup and anything a producer
//! returns are trusted and written as-is.

use tracing::{trace, warn};

use super::el::{Child, El, Markup, Prop};
use crate::dom::serialize::{finish_open_tag, is_void, write_attribute_pair, write_close_tag};
use crate::value::{escape_attribute, AttrWrite};

/// Renders construction values to strings with no live document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTags;

/// Select the string-generating construction path.
pub fn use_static_tags() -> StaticTags {
    StaticTags
}

impl StaticTags {
    /// Render one element to markup.
    pub fn render(&self, el: El) -> String {
        let mut out = String::new();
        render_element(el, &mut out);
        out
    }

    /// Render any child value (text, element, producer, list) to markup.
    pub fn render_child(&self, child: impl Into<Child>) -> String {
        let mut out = String::new();
        render_child(child.into(), &mut out);
        out
    }
}

fn render_element(el: El, out: &mut String) {
    let El {
        tag,
        props,
        children,
        inner_html,
        ..
    } = el;

    out.push('<');
    out.push_str(&tag);
    for (name, prop) in props {
        match prop {
            Prop::Value(value) => {
                if let AttrWrite::Set(s) = value.coerce_static() {
                    write_attribute_pair(&name, &escape_attribute(&s), out);
                }
            }
            Prop::Bind(mut producer) => {
                if let AttrWrite::Set(s) = producer().coerce_static() {
                    write_attribute_pair(&name, &s, out);
                }
            }
            Prop::Listener(_) => trace!(%name, "listeners have no static form"),
            Prop::Ref(_) => {}
        }
    }
    finish_open_tag(&tag, out);

    if is_void(&tag) {
        return;
    }
    match inner_html {
        Some(Markup::Static(markup)) => out.push_str(&markup),
        Some(Markup::Bind(mut producer)) => out.push_str(&producer()),
        None => {
            for child in children {
                render_child(child, out);
            }
        }
    }
    write_close_tag(&tag, out);
}

fn render_child(child: Child, out: &mut String) {
    match child {
        Child::Null => {}
        Child::Text(text) => out.push_str(&text),
        Child::Element(el) => render_element(el, out),
        Child::Node(node) => {
            warn!(?node, "live nodes cannot be rendered statically; skipping");
        }
        Child::Bind(mut producer) => render_child(producer(), out),
        Child::List(items) => {
            for item in items {
                render_child(item, out);
            }
        }
    }
}
