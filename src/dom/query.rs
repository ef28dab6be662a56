//! DOM queries: by id attribute, tag, attribute; generic predicate matching.
//!
//! Queries walk the tree under a start node in document order, so detached
//! subtrees never leak into results.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the first element under `start` whose `id` attribute matches.
    pub fn query_by_id(&self, start: NodeId, id: &str) -> Option<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// Find all elements under `start` with the given tag name.
    pub fn query_by_tag(&self, start: NodeId, tag: &str) -> Vec<NodeId> {
        self.query_all(start, |data| data.tag() == Some(tag))
    }

    /// Find all elements under `start` that carry the given attribute.
    pub fn query_by_attribute(&self, start: NodeId, name: &str) -> Vec<NodeId> {
        self.query_all(start, |data| data.attribute(name).is_some())
    }

    /// Find all nodes under `start` matching an arbitrary predicate.
    pub fn query_all(&self, start: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .filter(|&n| self.get(n).is_some_and(&predicate))
            .collect()
    }
}
