//! Render context: lifecycle, per-frame tick, diagnostics.
//!
//! [`Context`] owns the document arena, both binding registries and the sweep
//! schedule. Hosts call [`Context::tick`] once per display refresh, directly or
//! through a [`FrameLoop`](crate::frame::FrameLoop).

use std::rc::Rc;

use tracing::trace;
use web_time::Instant;

use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::reactive::reconcile::{attribute_pass, node_pass, PassReport};
use crate::reactive::registry::Registry;
use crate::reactive::sweep::{sweep, SweepReport, SweepSchedule, DEFAULT_SWEEP_INTERVAL};
use crate::tags::options::TagsOptions;
use crate::tags::static_tags::{use_static_tags, StaticTags};
use crate::tags::Tags;

// ---------------------------------------------------------------------------
// ReconcileConfig
// ---------------------------------------------------------------------------

/// Tuning for the reconciliation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Minimum ticks between sweeps.
    pub sweep_interval: u32,
    /// Only sweep when a disconnected binding was seen since the previous sweep.
    pub sweep_requires_disconnect: bool,
    /// Target frames per second for [`FrameLoop`](crate::frame::FrameLoop).
    pub fps: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            sweep_requires_disconnect: true,
            fps: 60,
        }
    }
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep interval in ticks (builder). Zero is treated as one.
    pub fn with_sweep_interval(mut self, ticks: u32) -> Self {
        self.sweep_interval = ticks.max(1);
        self
    }

    /// Sweep every `sweep_interval` ticks, not just after a disconnection (builder).
    pub fn with_sweep_requires_disconnect(mut self, required: bool) -> Self {
        self.sweep_requires_disconnect = required;
        self
    }

    /// Set the target FPS (builder).
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub attributes: PassReport,
    pub nodes: PassReport,
    /// Present when this tick ended with a sweep.
    pub swept: Option<SweepReport>,
}

impl TickReport {
    /// Bindings skipped this tick because they left the tree.
    pub fn disconnected(&self) -> usize {
        self.attributes.disconnected + self.nodes.disconnected
    }

    /// Writes made to the tree this tick.
    pub fn patched(&self) -> usize {
        self.attributes.patched + self.nodes.patched
    }
}

/// Informational counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub attribute_bindings: usize,
    pub node_bindings: usize,
    pub ticks: u64,
    pub ticks_since_sweep: u32,
    pub sweeps: u64,
    pub nodes: usize,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The render context.
///
/// Everything here is single-threaded: producers capture `Rc` state and run
/// on the thread that calls [`tick`](Self::tick).
pub struct Context {
    dom: Dom,
    registry: Registry,
    config: ReconcileConfig,
    schedule: SweepSchedule,
    body: NodeId,
    last_tick_ms: f64,
    ticks: u64,
    sweeps: u64,
}

impl Context {
    /// A context with a fresh document and a `<body>` to mount into.
    pub fn new() -> Self {
        Self::with_config(ReconcileConfig::default())
    }

    pub fn with_config(config: ReconcileConfig) -> Self {
        let mut dom = Dom::new();
        let document = dom.create_document();
        let body = dom.create(NodeData::element("body"));
        // A fresh element under a fresh document cannot fail to insert.
        let _ = dom.append_child(document, body);
        let schedule =
            SweepSchedule::new(config.sweep_interval.max(1), config.sweep_requires_disconnect);
        Self {
            dom,
            registry: Registry::new(),
            config,
            schedule,
            body,
            last_tick_ms: 0.0,
            ticks: 0,
            sweeps: 0,
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// The default mount point.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The live Node Factory.
    pub fn use_tags(&mut self, options: TagsOptions) -> Tags<'_> {
        Tags::new(&mut self.dom, &mut self.registry, Rc::new(options))
    }

    /// The string-generating factory. Holds no reference to this context.
    pub fn use_static_tags(&self) -> StaticTags {
        use_static_tags()
    }

    /// Run one frame: attribute pass, node pass, then the sweep check.
    ///
    /// A panicking producer unwinds out of this call. The duration of a tick
    /// that panicked is not recorded.
    pub fn tick(&mut self) -> TickReport {
        let start = Instant::now();

        let attributes = attribute_pass(&mut self.dom, &mut self.registry);
        let nodes = node_pass(&mut self.dom, &mut self.registry);
        let mut report = TickReport {
            attributes,
            nodes,
            swept: None,
        };
        if self.schedule.record_tick(report.disconnected()) {
            report.swept = Some(self.run_sweep());
        }

        self.ticks += 1;
        self.last_tick_ms = start.elapsed().as_secs_f64() * 1000.0;
        trace!(
            tick = self.ticks,
            patched = report.patched(),
            disconnected = report.disconnected(),
            swept = report.swept.is_some(),
            ms = self.last_tick_ms,
            "tick"
        );
        report
    }

    /// Wall-clock duration of the most recent tick in milliseconds.
    pub fn last_tick_duration(&self) -> f64 {
        self.last_tick_ms
    }

    /// Compact the registries now, regardless of schedule.
    pub fn force_sweep(&mut self) -> SweepReport {
        self.run_sweep()
    }

    fn run_sweep(&mut self) -> SweepReport {
        self.sweeps += 1;
        self.schedule.reset();
        sweep(&self.dom, &mut self.registry)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            attribute_bindings: self.registry.attributes().len(),
            node_bindings: self.registry.nodes().len(),
            ticks: self.ticks,
            ticks_since_sweep: self.schedule.ticks_since_sweep(),
            sweeps: self.sweeps,
            nodes: self.dom.len(),
        }
    }

    /// Dispatch an event at `target`; see [`Dom::dispatch`].
    pub fn dispatch(&mut self, target: NodeId, event: &str) -> usize {
        self.dom.dispatch(target, event)
    }

    /// Serialized markup of the body's content.
    pub fn body_html(&self) -> String {
        self.dom.inner_html(self.body)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::el::{el, Child};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    // ── ReconcileConfig ──────────────────────────────────────────────

    #[test]
    fn config_defaults() {
        let config = ReconcileConfig::new();
        assert_eq!(config.sweep_interval, 60);
        assert!(config.sweep_requires_disconnect);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn config_builder() {
        let config = ReconcileConfig::new()
            .with_sweep_interval(0)
            .with_sweep_requires_disconnect(false)
            .with_fps(30);
        assert_eq!(config.sweep_interval, 1);
        assert!(!config.sweep_requires_disconnect);
        assert_eq!(config.fps, 30);
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_context_has_connected_body() {
        let ctx = Context::new();
        assert!(ctx.dom().is_connected(ctx.body()));
        assert_eq!(ctx.body_html(), "");
        assert_eq!(ctx.stats().attribute_bindings, 0);
    }

    #[test]
    fn use_tags_mounts_into_body() {
        let mut ctx = Context::new();
        let body = ctx.body();
        ctx.use_tags(TagsOptions::default())
            .mount(body, el("p").child("hi"));
        assert_eq!(ctx.body_html(), "<p>hi</p>");
    }

    // ── tick ─────────────────────────────────────────────────────────

    #[test]
    fn tick_patches_changed_bindings() {
        let mut ctx = Context::new();
        let body = ctx.body();
        let n = Rc::new(Cell::new(0));
        let read = n.clone();
        ctx.use_tags(TagsOptions::default())
            .mount(body, el("span").child(Child::bind(move || read.get())));

        let report = ctx.tick();
        assert_eq!(report.patched(), 0);
        assert_eq!(report.nodes.evaluated, 1);

        n.set(7);
        let report = ctx.tick();
        assert_eq!(report.nodes.patched, 1);
        assert_eq!(ctx.body_html(), "<span>7</span>");
        assert_eq!(ctx.stats().ticks, 2);
    }

    #[test]
    fn last_tick_duration_is_recorded() {
        let mut ctx = Context::new();
        assert_eq!(ctx.last_tick_duration(), 0.0);
        ctx.tick();
        assert!(ctx.last_tick_duration() >= 0.0);
        assert!(ctx.last_tick_duration().is_finite());
    }

    #[test]
    fn sweep_follows_schedule() {
        let mut ctx = Context::with_config(ReconcileConfig::new().with_sweep_interval(3));
        let body = ctx.body();
        let gone = ctx
            .use_tags(TagsOptions::default())
            .mount(body, el("i").bind_attr("title", || "x"))
            .unwrap();
        ctx.dom_mut().remove(gone);

        assert_eq!(ctx.tick().swept, None);
        assert_eq!(ctx.tick().swept, None);
        let report = ctx.tick();
        assert_eq!(
            report.swept,
            Some(SweepReport {
                attributes_removed: 1,
                nodes_removed: 0
            })
        );
        let stats = ctx.stats();
        assert_eq!(stats.sweeps, 1);
        assert_eq!(stats.attribute_bindings, 0);
        assert_eq!(stats.ticks_since_sweep, 0);
    }

    #[test]
    fn stable_window_does_not_sweep() {
        let mut ctx = Context::with_config(ReconcileConfig::new().with_sweep_interval(2));
        ctx.tick();
        assert_eq!(ctx.tick().swept, None);
        assert_eq!(ctx.stats().sweeps, 0);
    }

    #[test]
    fn force_sweep_ignores_schedule() {
        let mut ctx = Context::new();
        let body = ctx.body();
        let gone = ctx
            .use_tags(TagsOptions::default())
            .mount(body, el("div").child(Child::bind(|| "x")))
            .unwrap();
        ctx.dom_mut().remove(gone);
        assert_eq!(ctx.force_sweep().nodes_removed, 1);
        assert_eq!(ctx.stats().node_bindings, 0);
    }

    #[test]
    fn dispatch_reaches_listener() {
        let mut ctx = Context::new();
        let body = ctx.body();
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let button = ctx
            .use_tags(TagsOptions::default())
            .mount(body, el("button").on("click", move |_| c.set(c.get() + 1)))
            .unwrap();
        assert_eq!(ctx.dispatch(button, "click"), 1);
        assert_eq!(clicks.get(), 1);
    }
}
