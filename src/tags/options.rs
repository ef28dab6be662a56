//! Options for the live Node Factory.

use std::fmt;
use std::rc::Rc;

use crate::dom::node::NodeId;
use crate::value::AttrValue;

/// Attribute rewrite hook: `(name, value) -> (name, value)`, run before coercion.
pub type AttrHook = Rc<dyn Fn(&str, AttrValue) -> (String, AttrValue)>;

/// Options for [`Context::use_tags`](crate::context::Context::use_tags).
#[derive(Clone, Default)]
pub struct TagsOptions {
    /// Namespace for created elements (e.g. SVG).
    pub namespace: Option<String>,
    /// Alternate document to create elements for. Defaults to the context's
    /// own document.
    pub document: Option<NodeId>,
    /// Attribute rewrite hook.
    pub attr: Option<AttrHook>,
}

impl TagsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element namespace (builder).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Create elements for another document (builder).
    pub fn with_document(mut self, document: NodeId) -> Self {
        self.document = Some(document);
        self
    }

    /// Set the attribute rewrite hook (builder).
    pub fn with_attr_hook(
        mut self,
        hook: impl Fn(&str, AttrValue) -> (String, AttrValue) + 'static,
    ) -> Self {
        self.attr = Some(Rc::new(hook));
        self
    }

    /// Run the attribute hook, or pass the pair through unchanged.
    pub fn rewrite(&self, name: &str, value: AttrValue) -> (String, AttrValue) {
        match &self.attr {
            Some(hook) => hook(name, value),
            None => (name.to_owned(), value),
        }
    }
}

impl fmt::Debug for TagsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagsOptions")
            .field("namespace", &self.namespace)
            .field("document", &self.document)
            .field("attr", &self.attr.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_without_hook_is_identity() {
        let opts = TagsOptions::new();
        assert_eq!(
            opts.rewrite("class", AttrValue::from("a")),
            ("class".to_owned(), AttrValue::from("a"))
        );
    }

    #[test]
    fn rewrite_with_hook() {
        let opts = TagsOptions::new().with_attr_hook(|name, value| {
            if name == "className" {
                ("class".to_owned(), value)
            } else {
                (name.to_owned(), value)
            }
        });
        assert_eq!(opts.rewrite("className", AttrValue::from("x")).0, "class");
        assert_eq!(opts.rewrite("id", AttrValue::from("x")).0, "id");
    }

    #[test]
    fn builders() {
        let opts = TagsOptions::new().with_namespace("http://www.w3.org/2000/svg");
        assert_eq!(opts.namespace.as_deref(), Some("http://www.w3.org/2000/svg"));
        assert!(opts.document.is_none());
        assert!(opts.attr.is_none());
    }
}
