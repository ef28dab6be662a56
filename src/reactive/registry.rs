//! Binding registries: dense slot arrays for attribute and node bindings.
//!
//! Slots are appended in registration order and never move during a tick. A
//! slot may be logically empty (reserved but never filled because its producer
//! panicked during registration). Only the sweep compacts: retained entries are
//! moved into a contiguous prefix in their original order, the suffix is
//! cleared, and the active count shrinks. The backing vector keeps its length
//! so the next registrations reuse the cleared slots without reallocating.

use std::fmt;
use std::rc::Rc;

use crate::dom::node::NodeId;
use crate::tags::el::{AttrProducer, ChildProducer};
use crate::tags::TagsOptions;
use crate::value::AttrValue;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// A dense array of optional entries with an active count.
pub struct Slots<T> {
    slots: Vec<Option<T>>,
    count: usize,
}

impl<T> Slots<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            count: 0,
        }
    }

    /// Allocate the next slot, leaving it empty.
    pub fn reserve(&mut self) -> usize {
        let index = self.count;
        if index < self.slots.len() {
            self.slots[index] = None;
        } else {
            self.slots.push(None);
        }
        self.count += 1;
        index
    }

    /// Fill a reserved slot.
    pub fn fill(&mut self, index: usize, entry: T) {
        debug_assert!(index < self.count, "slot {index} was never reserved");
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(entry);
        }
    }

    /// Allocate and fill the next slot.
    pub fn push(&mut self, entry: T) -> usize {
        let index = self.reserve();
        self.fill(index, entry);
        index
    }

    /// Entry at `index`, if the slot is active and filled.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            return None;
        }
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.count {
            return None;
        }
        self.slots.get_mut(index)?.as_mut()
    }

    /// Active slot count (filled or logically empty).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of active slots that hold an entry.
    pub fn filled(&self) -> usize {
        self.iter().count()
    }

    /// Physical length of the backing array, including cleared slots.
    pub fn physical_len(&self) -> usize {
        self.slots.len()
    }

    /// Filled entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots[..self.count].iter().flatten()
    }

    /// Keep entries matching `keep`, packed into a prefix in original order.
    ///
    /// Empty slots are dropped. Returns how many active slots were reclaimed.
    pub fn compact(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut write = 0;
        for read in 0..self.count {
            let retain = self.slots[read].as_ref().is_some_and(&mut keep);
            if !retain {
                continue;
            }
            if read != write {
                self.slots[write] = self.slots[read].take();
            }
            write += 1;
        }
        for slot in &mut self.slots[write..self.count] {
            *slot = None;
        }
        let reclaimed = self.count - write;
        self.count = write;
        reclaimed
    }
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slots<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.slots[..self.count]).finish()
    }
}

// ---------------------------------------------------------------------------
// Binding records
// ---------------------------------------------------------------------------

/// Where an attribute binding writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrTarget {
    /// A named attribute.
    Attribute(String),
    /// The element's raw markup content.
    InnerHtml,
}

/// A producer bound to an attribute of `host`.
pub struct AttributeBinding {
    pub(crate) host: NodeId,
    pub(crate) target: AttrTarget,
    pub(crate) producer: AttrProducer,
    pub(crate) last: AttrValue,
    pub(crate) options: Rc<TagsOptions>,
}

impl AttributeBinding {
    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn target(&self) -> &AttrTarget {
        &self.target
    }

    /// The value applied on the most recent change.
    pub fn last_applied(&self) -> &AttrValue {
        &self.last
    }
}

impl fmt::Debug for AttributeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeBinding")
            .field("host", &self.host)
            .field("target", &self.target)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

/// A producer bound to the content node just before `marker`.
pub struct NodeBinding {
    pub(crate) marker: NodeId,
    pub(crate) producer: ChildProducer,
    pub(crate) current: NodeId,
    /// Whether `current` was built by this binding (and may be destroyed by it).
    pub(crate) owns_current: bool,
    pub(crate) options: Rc<TagsOptions>,
}

impl NodeBinding {
    pub fn marker(&self) -> NodeId {
        self.marker
    }

    /// The content node applied on the most recent change.
    pub fn current(&self) -> NodeId {
        self.current
    }
}

impl fmt::Debug for NodeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBinding")
            .field("marker", &self.marker)
            .field("current", &self.current)
            .field("owns_current", &self.owns_current)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The two binding registries of one render context.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) attrs: Slots<AttributeBinding>,
    pub(crate) nodes: Slots<NodeBinding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(&self) -> &Slots<AttributeBinding> {
        &self.attrs
    }

    pub fn nodes(&self) -> &Slots<NodeBinding> {
        &self.nodes
    }

    /// Drop every binding.
    pub fn clear(&mut self) {
        self.attrs = Slots::new();
        self.nodes = Slots::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_assigns_ascending_slots() {
        let mut slots = Slots::new();
        assert_eq!(slots.push('a'), 0);
        assert_eq!(slots.push('b'), 1);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(1), Some(&'b'));
        assert_eq!(slots.get(2), None);
    }

    #[test]
    fn reserved_slot_is_logically_empty() {
        let mut slots: Slots<char> = Slots::new();
        let index = slots.reserve();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.filled(), 0);
        assert_eq!(slots.get(index), None);
        slots.fill(index, 'x');
        assert_eq!(slots.get(index), Some(&'x'));
    }

    #[test]
    fn compact_preserves_order_and_clears_suffix() {
        let mut slots = Slots::new();
        for n in 0..6 {
            slots.push(n);
        }
        let reclaimed = slots.compact(|n| n % 2 == 0);
        assert_eq!(reclaimed, 3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots.iter().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(slots.physical_len(), 6);
        assert_eq!(slots.get(3), None);
    }

    #[test]
    fn compact_drops_empty_slots() {
        let mut slots = Slots::new();
        slots.push(1);
        slots.reserve();
        slots.push(3);
        assert_eq!(slots.compact(|_| true), 1);
        assert_eq!(slots.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn slots_are_reused_after_compaction() {
        let mut slots = Slots::new();
        slots.push(1);
        slots.push(2);
        slots.compact(|&n| n == 2);
        assert_eq!(slots.push(9), 1);
        assert_eq!(slots.physical_len(), 2);
        assert_eq!(slots.iter().copied().collect::<Vec<_>>(), vec![2, 9]);
    }

    #[test]
    fn compact_everything_away() {
        let mut slots = Slots::new();
        slots.push(1);
        slots.push(2);
        assert_eq!(slots.compact(|_| false), 2);
        assert!(slots.is_empty());
    }

    #[test]
    fn registry_clear() {
        let mut registry = Registry::new();
        registry.attrs.reserve();
        registry.nodes.reserve();
        registry.clear();
        assert!(registry.attributes().is_empty());
        assert!(registry.nodes().is_empty());
    }
}
