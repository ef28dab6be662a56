//! Construction values: the description of an element before it is built.
//!
//! An [`El`] carries everything a construction call can say about an element:
//! its property map, children, an optional [`Ref`] slot and optional raw
//! markup. The same value can be built into a live [`Dom`](crate::dom::Dom) by
//! [`Tags`](super::Tags) or rendered to a string by
//! [`StaticTags`](super::StaticTags).
//!
//! [`El::from_args`] accepts positional [`Arg`]s and classifies them: a leading
//! property map is taken as properties and everything after it as children;
//! any other leading argument makes every argument a child.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dom::node::NodeId;
use crate::event::handler::{Event, Listener};
use crate::value::{format_number, AttrValue};

/// Produces an attribute value on every tick.
pub type AttrProducer = Box<dyn FnMut() -> AttrValue>;

/// Produces the content of a child slot on every tick.
pub type ChildProducer = Box<dyn FnMut() -> Child>;

/// Produces raw markup.
pub type MarkupProducer = Box<dyn FnMut() -> String>;

// ---------------------------------------------------------------------------
// Ref
// ---------------------------------------------------------------------------

/// Holder that receives the id of the element it is attached to.
///
/// Cloning shares the slot.
#[derive(Clone, Default, PartialEq)]
pub struct Ref(Rc<Cell<Option<NodeId>>>);

impl Ref {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element this ref was attached to, once built.
    pub fn current(&self) -> Option<NodeId> {
        self.0.get()
    }

    pub(crate) fn set(&self, id: NodeId) {
        self.0.set(Some(id));
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.current()).finish()
    }
}

// ---------------------------------------------------------------------------
// Prop
// ---------------------------------------------------------------------------

/// A value in an element's property map.
pub enum Prop {
    /// A plain attribute value.
    Value(AttrValue),
    /// An attribute kept in sync with a producer.
    Bind(AttrProducer),
    /// An event callback; only honored under an `on*` name.
    Listener(Listener),
    /// A ref slot to populate with the built element.
    Ref(Ref),
}

impl Prop {
    /// Wrap a closure as an attribute producer.
    pub fn bind<F, V>(mut f: F) -> Self
    where
        F: FnMut() -> V + 'static,
        V: Into<AttrValue>,
    {
        Prop::Bind(Box::new(move || f().into()))
    }

    /// Wrap a closure as an event listener.
    pub fn listener(f: impl FnMut(&Event) + 'static) -> Self {
        Prop::Listener(Box::new(f))
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Prop::Bind(_) => f.write_str("Bind(..)"),
            Prop::Listener(_) => f.write_str("Listener(..)"),
            Prop::Ref(r) => f.debug_tuple("Ref").field(r).finish(),
        }
    }
}

macro_rules! prop_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Prop {
                fn from(value: $t) -> Self {
                    Prop::Value(value.into())
                }
            }
        )*
    };
}

prop_from_value!(
    AttrValue, bool, &str, String, &String, char, f32, f64, i8, i16, i32, i64, isize, u8, u16,
    u32, u64, usize
);

impl<T: Into<AttrValue>> From<Option<T>> for Prop {
    fn from(value: Option<T>) -> Self {
        Prop::Value(value.into())
    }
}

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

/// Raw markup content. Replaces normal children entirely.
pub enum Markup {
    Static(String),
    Bind(MarkupProducer),
}

impl fmt::Debug for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Markup::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Markup::Bind(_) => f.write_str("Bind(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Child
// ---------------------------------------------------------------------------

/// A child slot value.
pub enum Child {
    /// Nothing. Skipped when appended.
    Null,
    /// A primitive already coerced to text.
    Text(String),
    /// An element description to build.
    Element(El),
    /// An existing node.
    Node(NodeId),
    /// Content kept in sync with a producer.
    Bind(ChildProducer),
    /// Nested children, flattened on append.
    List(Vec<Child>),
}

impl Child {
    /// Wrap a closure as a child producer.
    pub fn bind<F, C>(mut f: F) -> Self
    where
        F: FnMut() -> C + 'static,
        C: Into<Child>,
    {
        Child::Bind(Box::new(move || f().into()))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Child::Text(s.into())
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Null => f.write_str("Null"),
            Child::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Child::Element(el) => f.debug_tuple("Element").field(el).finish(),
            Child::Node(id) => f.debug_tuple("Node").field(id).finish(),
            Child::Bind(_) => f.write_str("Bind(..)"),
            Child::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_owned())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

impl From<&String> for Child {
    fn from(value: &String) -> Self {
        Child::Text(value.clone())
    }
}

impl From<char> for Child {
    fn from(value: char) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Text(format_number(value))
    }
}

impl From<f32> for Child {
    fn from(value: f32) -> Self {
        Child::Text(format_number(f64::from(value)))
    }
}

macro_rules! child_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Child {
                fn from(value: $t) -> Self {
                    Child::Text(value.to_string())
                }
            }
        )*
    };
}

child_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<AttrValue> for Child {
    fn from(value: AttrValue) -> Self {
        if value.is_nullish() {
            Child::Null
        } else {
            Child::Text(value.to_text())
        }
    }
}

impl From<El> for Child {
    fn from(value: El) -> Self {
        Child::Element(value)
    }
}

impl From<NodeId> for Child {
    fn from(value: NodeId) -> Self {
        Child::Node(value)
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        value.map_or(Child::Null, Into::into)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(value: Vec<T>) -> Self {
        Child::List(value.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Arg
// ---------------------------------------------------------------------------

/// One positional argument of a construction call.
#[derive(Debug)]
pub enum Arg {
    Props(Vec<(String, Prop)>),
    Child(Child),
}

impl Arg {
    /// A property map argument.
    pub fn props<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Prop)>,
        K: Into<String>,
    {
        Arg::Props(entries.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }

    /// A child argument.
    pub fn child(c: impl Into<Child>) -> Self {
        Arg::Child(c.into())
    }
}

impl From<Child> for Arg {
    fn from(value: Child) -> Self {
        Arg::Child(value)
    }
}

// ---------------------------------------------------------------------------
// El
// ---------------------------------------------------------------------------

/// Description of one element: tag, properties, children, ref and raw markup.
pub struct El {
    pub(crate) tag: String,
    pub(crate) props: Vec<(String, Prop)>,
    pub(crate) children: Vec<Child>,
    pub(crate) node_ref: Option<Ref>,
    pub(crate) inner_html: Option<Markup>,
}

/// Start describing an element with the given tag name.
pub fn el(tag: impl Into<String>) -> El {
    El::new(tag)
}

impl El {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            children: Vec::new(),
            node_ref: None,
            inner_html: None,
        }
    }

    /// Classify positional arguments into properties and children.
    pub fn from_args(tag: impl Into<String>, args: impl IntoIterator<Item = Arg>) -> Self {
        let mut el = El::new(tag);
        let mut args = args.into_iter().peekable();
        if let Some(Arg::Props(_)) = args.peek() {
            if let Some(Arg::Props(props)) = args.next() {
                for (name, prop) in props {
                    el = el.prop(name, prop);
                }
            }
        }
        for arg in args {
            match arg {
                Arg::Child(child) => el.children.push(child),
                Arg::Props(props) => {
                    trace!(tag = %el.tag, entries = props.len(), "ignoring non-leading property map");
                }
            }
        }
        el
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Add a property, routing the reserved keys `ref`, `innerHTML` and `is`.
    pub fn prop(mut self, name: impl Into<String>, prop: Prop) -> Self {
        let name = name.into();
        match prop {
            Prop::Ref(r) => self.node_ref = Some(r),
            _ if name == "is" => {}
            Prop::Value(v) if name == "innerHTML" => {
                self.inner_html = Some(Markup::Static(if v.is_nullish() {
                    String::new()
                } else {
                    v.to_text()
                }));
            }
            Prop::Bind(mut p) if name == "innerHTML" => {
                self.inner_html = Some(Markup::Bind(Box::new(move || {
                    let v = p();
                    if v.is_nullish() {
                        String::new()
                    } else {
                        v.to_text()
                    }
                })));
            }
            prop => self.props.push((name, prop)),
        }
        self
    }

    /// Set a plain attribute.
    pub fn attr(self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.prop(name, Prop::Value(value.into()))
    }

    /// Bind an attribute to a producer.
    pub fn bind_attr<F, V>(self, name: impl Into<String>, f: F) -> Self
    where
        F: FnMut() -> V + 'static,
        V: Into<AttrValue>,
    {
        self.prop(name, Prop::bind(f))
    }

    /// Listen for an event (`"click"`, not `"onclick"`).
    pub fn on(self, event: &str, f: impl FnMut(&Event) + 'static) -> Self {
        self.prop(format!("on{event}"), Prop::listener(f))
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Attach a ref slot.
    pub fn node_ref(mut self, r: &Ref) -> Self {
        self.node_ref = Some(r.clone());
        self
    }

    /// Raw markup content. Children are ignored when set.
    pub fn inner_html(mut self, markup: impl Into<String>) -> Self {
        self.inner_html = Some(Markup::Static(markup.into()));
        self
    }

    /// Raw markup kept in sync with a producer.
    pub fn bind_inner_html(mut self, f: impl FnMut() -> String + 'static) -> Self {
        self.inner_html = Some(Markup::Bind(Box::new(f)));
        self
    }

    /// Whether this element carries raw markup.
    pub fn has_inner_html(&self) -> bool {
        self.inner_html.is_some()
    }

    /// Number of direct children (before flattening).
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl fmt::Debug for El {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("El")
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("children", &self.children)
            .field("node_ref", &self.node_ref)
            .field("inner_html", &self.inner_html)
            .finish()
    }
}
