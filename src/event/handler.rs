//! Event listeners: registration from `on*` properties and bubbling dispatch.
//!
//! Listeners are stored per node inside the [`Dom`] and are dropped together
//! with the node. [`Dom::dispatch`] walks the [`bubble_path`] from the target
//! up to the topmost ancestor, calling matching listeners in registration order.

use std::fmt;

use crate::dom::node::NodeId;
use crate::dom::tree::{Dom, DomError};

/// Property-name prefix that marks an event listener.
pub const EVENT_PREFIX: &str = "on";

/// A boxed event callback.
pub type Listener = Box<dyn FnMut(&Event)>;

/// An event travelling through the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name without the `on` prefix (e.g. `"click"`).
    pub name: String,
    /// The node the event was dispatched on.
    pub target: NodeId,
    /// The node whose listener is currently running.
    pub current: NodeId,
}

pub(crate) struct ListenerEntry {
    pub(crate) event: String,
    pub(crate) callback: Listener,
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Split an `on*` property name into its event name.
///
/// Returns `None` when the name has no `on` prefix or nothing follows it.
pub fn event_name(prop: &str) -> Option<&str> {
    prop.strip_prefix(EVENT_PREFIX).filter(|rest| !rest.is_empty())
}

/// Compute the bubble path from `start` up to the topmost ancestor (inclusive).
///
/// Returns `[start, parent, grandparent, ...]`.
/// If `start` does not exist in the DOM, returns an empty vec.
pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
    if !dom.contains(start) {
        return Vec::new();
    }
    let mut path = vec![start];
    path.extend(dom.ancestors(start));
    path
}

impl Dom {
    /// Register a listener for `event` on `node`.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event: impl Into<String>,
        callback: Listener,
    ) -> Result<(), DomError> {
        if !self.contains(node) {
            return Err(DomError::NodeNotFound(node));
        }
        let entry = ListenerEntry {
            event: event.into(),
            callback,
        };
        match self.listeners.get_mut(node) {
            Some(list) => list.push(entry),
            None => {
                self.listeners.insert(node, vec![entry]);
            }
        }
        Ok(())
    }

    /// Number of listeners registered on `node` for `event`.
    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.listeners
            .get(node)
            .map_or(0, |list| list.iter().filter(|l| l.event == event).count())
    }

    /// Dispatch `event` at `target`, bubbling to the root.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&mut self, target: NodeId, event: &str) -> usize {
        let mut invoked = 0;
        for node in bubble_path(self, target) {
            // Take the list out so callbacks run without a borrow on the DOM.
            let Some(mut list) = self.listeners.get_mut(node).map(std::mem::take) else {
                continue;
            };
            let ev = Event {
                name: event.to_owned(),
                target,
                current: node,
            };
            for entry in list.iter_mut().filter(|l| l.event == event) {
                (entry.callback)(&ev);
                invoked += 1;
            }
            if let Some(slot) = self.listeners.get_mut(node) {
                list.append(slot);
                *slot = list;
            }
        }
        invoked
    }
}
