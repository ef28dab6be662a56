//! Sweep/Compactor: reclaim bindings whose host left the tree.
//!
//! The [`SweepSchedule`] counts ticks and observed disconnections since the
//! previous sweep. Once `interval` ticks have passed, a sweep is due on the
//! first tick that has seen a disconnection (or immediately, when configured
//! so). The sweep itself is one stable compaction pass per registry.

use tracing::debug;

use super::registry::Registry;
use crate::dom::tree::Dom;

/// Default minimum number of ticks between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: u32 = 60;

/// How many bindings a sweep reclaimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub attributes_removed: usize,
    pub nodes_removed: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.attributes_removed + self.nodes_removed
    }
}

/// Compact both registries, keeping only bindings still in a live tree.
pub fn sweep(dom: &Dom, registry: &mut Registry) -> SweepReport {
    let attrs_before = registry.attrs.len();
    let nodes_before = registry.nodes.len();
    let report = SweepReport {
        attributes_removed: registry.attrs.compact(|b| dom.is_connected(b.host)),
        nodes_removed: registry.nodes.compact(|b| dom.is_connected(b.marker)),
    };
    debug!(
        attrs_before,
        attrs_after = registry.attrs.len(),
        nodes_before,
        nodes_after = registry.nodes.len(),
        "swept binding registries"
    );
    report
}

/// Decides when a sweep runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSchedule {
    interval: u32,
    requires_disconnect: bool,
    ticks_since: u32,
    disconnects_seen: usize,
}

impl SweepSchedule {
    pub fn new(interval: u32, requires_disconnect: bool) -> Self {
        Self {
            interval,
            requires_disconnect,
            ticks_since: 0,
            disconnects_seen: 0,
        }
    }

    /// Record a finished tick that saw `disconnected` dead bindings.
    ///
    /// Returns `true` when a sweep should run now, and starts counting again
    /// from zero. Past the interval with nothing disconnected, every later
    /// tick is eligible until a disconnection shows up.
    pub fn record_tick(&mut self, disconnected: usize) -> bool {
        self.ticks_since = self.ticks_since.saturating_add(1);
        self.disconnects_seen += disconnected;
        if self.ticks_since < self.interval {
            return false;
        }
        let due = !self.requires_disconnect || self.disconnects_seen > 0;
        if due {
            self.reset();
        }
        due
    }

    /// Start counting from zero, as after a sweep.
    pub fn reset(&mut self) {
        self.ticks_since = 0;
        self.disconnects_seen = 0;
    }

    /// Ticks counted since the previous sweep.
    pub fn ticks_since_sweep(&self) -> u32 {
        self.ticks_since
    }

    /// Disconnections counted since the previous sweep.
    pub fn disconnects_seen(&self) -> usize {
        self.disconnects_seen
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_SWEEP_INTERVAL, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;
    use crate::tags::el::{el, Child};
    use crate::tags::Tags;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    #[test]
    fn schedule_waits_for_interval() {
        let mut schedule = SweepSchedule::new(3, true);
        assert!(!schedule.record_tick(1));
        assert!(!schedule.record_tick(0));
        assert!(schedule.record_tick(0));
        assert_eq!(schedule.ticks_since_sweep(), 0);
        assert_eq!(schedule.disconnects_seen(), 0);
    }

    #[test]
    fn late_disconnect_sweeps_on_next_tick() {
        let mut schedule = SweepSchedule::new(2, true);
        assert!(!schedule.record_tick(0));
        assert!(!schedule.record_tick(0));
        assert!(!schedule.record_tick(0));
        assert_eq!(schedule.ticks_since_sweep(), 3);
        assert!(schedule.record_tick(2));
        assert_eq!(schedule.ticks_since_sweep(), 0);
    }

    #[test]
    fn reset_restarts_the_count() {
        let mut schedule = SweepSchedule::new(2, true);
        schedule.record_tick(1);
        schedule.reset();
        assert!(!schedule.record_tick(0));
        assert!(!schedule.record_tick(0));
    }

    #[test]
    fn schedule_without_disconnect_requirement() {
        let mut schedule = SweepSchedule::new(2, false);
        assert!(!schedule.record_tick(0));
        assert!(schedule.record_tick(0));
    }

    #[test]
    fn default_interval_is_sixty() {
        let mut schedule = SweepSchedule::default();
        for _ in 0..59 {
            assert!(!schedule.record_tick(1));
        }
        assert!(schedule.record_tick(1));
    }

    #[test]
    fn sweep_drops_only_disconnected() {
        let mut dom = Dom::with_document();
        let doc = dom.root().unwrap();
        let body = dom.create(NodeData::element("body"));
        dom.append_child(doc, body).unwrap();
        let mut registry = Registry::new();

        let (kept, gone) = {
            let mut tags = Tags::new(&mut dom, &mut registry, Rc::default());
            let kept = tags
                .mount(body, el("p").bind_attr("title", || "k").child(Child::bind(|| 1)))
                .unwrap();
            let gone = tags
                .mount(body, el("p").bind_attr("title", || "g").child(Child::bind(|| 2)))
                .unwrap();
            (kept, gone)
        };
        let kept_marker = registry.nodes().get(0).unwrap().marker();
        dom.remove(gone);

        let report = sweep(&dom, &mut registry);
        assert_eq!(
            report,
            SweepReport {
                attributes_removed: 1,
                nodes_removed: 1
            }
        );
        assert_eq!(report.total(), 2);
        assert_eq!(registry.attributes().len(), 1);
        assert_eq!(registry.attributes().get(0).unwrap().host(), kept);
        assert_eq!(registry.nodes().get(0).unwrap().marker(), kept_marker);
    }
}
