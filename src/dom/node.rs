//! Node types: NodeId, NodeKind, NodeData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    ///
    /// Holding a `NodeId` never keeps the node alive: once the node is destroyed
    /// the key simply stops resolving.
    pub struct NodeId;
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A document root. Nodes whose ancestor chain ends here are connected.
    Document,
    /// A regular element with ordered attributes.
    Element {
        tag: String,
        namespace: Option<String>,
        attributes: Vec<(String, String)>,
    },
    /// A text node. Serialized with text escaping.
    Text(String),
    /// Invisible placeholder that locates the content of a node binding.
    Marker,
    /// Trusted raw markup, emitted verbatim.
    Raw(String),
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
}

impl NodeData {
    /// A document root.
    pub fn document() -> Self {
        Self {
            kind: NodeKind::Document,
        }
    }

    /// An element with no attributes in the default namespace.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.into(),
                namespace: None,
                attributes: Vec::new(),
            },
        }
    }

    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(text.into()),
        }
    }

    /// A binding marker.
    pub fn marker() -> Self {
        Self {
            kind: NodeKind::Marker,
        }
    }

    /// A raw markup node.
    pub fn raw(markup: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Raw(markup.into()),
        }
    }

    /// Set the element namespace (builder). No-op for non-elements.
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        if let NodeKind::Element { namespace, .. } = &mut self.kind {
            *namespace = Some(ns.into());
        }
        self
    }

    /// Set an attribute (builder). No-op for non-elements.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(&name.into(), value.into());
        self
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, NodeKind::Document)
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, NodeKind::Marker)
    }

    /// Tag name for elements.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Namespace for elements created with one.
    pub fn namespace(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { namespace, .. } => namespace.as_deref(),
            _ => None,
        }
    }

    /// Text content of a text node.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// All attributes in insertion order. Empty for non-elements.
    pub fn attributes(&self) -> &[(String, String)] {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Set an attribute, keeping its original position if it already exists.
    ///
    /// Returns `false` when the node is not an element.
    pub fn set_attribute(&mut self, name: &str, value: String) -> bool {
        let NodeKind::Element { attributes, .. } = &mut self.kind else {
            return false;
        };
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => attributes.push((name.to_owned(), value)),
        }
        true
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let NodeKind::Element { attributes, .. } = &mut self.kind else {
            return false;
        };
        let before = attributes.len();
        attributes.retain(|(n, _)| n != name);
        attributes.len() != before
    }

    /// Replace the text of a text node. Returns `false` for other kinds.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::Text(current) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults() {
        let data = NodeData::element("div");
        assert_eq!(data.tag(), Some("div"));
        assert!(data.namespace().is_none());
        assert!(data.attributes().is_empty());
        assert!(data.is_element());
    }

    #[test]
    fn with_namespace_only_for_elements() {
        let svg = NodeData::element("svg").with_namespace("http://www.w3.org/2000/svg");
        assert_eq!(svg.namespace(), Some("http://www.w3.org/2000/svg"));

        let text = NodeData::text("x").with_namespace("ns");
        assert!(text.namespace().is_none());
    }

    #[test]
    fn set_attribute_keeps_position() {
        let mut data = NodeData::element("a")
            .with_attribute("href", "/")
            .with_attribute("class", "link");
        data.set_attribute("href", "/home".into());
        assert_eq!(
            data.attributes(),
            &[
                ("href".to_owned(), "/home".to_owned()),
                ("class".to_owned(), "link".to_owned())
            ]
        );
    }

    #[test]
    fn remove_attribute() {
        let mut data = NodeData::element("input").with_attribute("disabled", "true");
        assert!(data.remove_attribute("disabled"));
        assert!(!data.remove_attribute("disabled"));
        assert!(data.attribute("disabled").is_none());
    }

    #[test]
    fn attribute_ops_on_text_are_noops() {
        let mut data = NodeData::text("hi");
        assert!(!data.set_attribute("id", "x".into()));
        assert!(!data.remove_attribute("id"));
        assert!(data.attribute("id").is_none());
    }

    #[test]
    fn set_text() {
        let mut data = NodeData::text("a");
        assert!(data.set_text("b"));
        assert_eq!(data.text_content(), Some("b"));
        assert!(!NodeData::marker().set_text("c"));
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
