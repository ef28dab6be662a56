//! Pilot: programmatic interaction with a headless render context.
//!
//! The `Pilot` owns a [`Context`], mounts elements into its body and exposes
//! the handful of calls a test needs: tick, dispatch, inspect markup.

use crate::context::{Context, ReconcileConfig, TickReport};
use crate::dom::node::NodeId;
use crate::tags::el::El;
use crate::tags::options::TagsOptions;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless context driver for testing.
///
/// # Examples
///
/// ```ignore
/// use polldom::testing::Pilot;
/// use polldom::{el, Child};
///
/// let mut pilot = Pilot::new();
/// pilot.mount(el("p").child(Child::bind(|| "hi")));
/// pilot.tick();
/// assert_eq!(pilot.html(), "<p>hi</p>");
/// ```
pub struct Pilot {
    ctx: Context,
}

impl Pilot {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(),
        }
    }

    pub fn with_config(config: ReconcileConfig) -> Self {
        Self {
            ctx: Context::with_config(config),
        }
    }

    // ── Construction ─────────────────────────────────────────────────

    /// Build `el` into the body.
    pub fn mount(&mut self, el: El) -> Option<NodeId> {
        self.mount_with(TagsOptions::default(), el)
    }

    /// Build `el` into the body with the given factory options.
    pub fn mount_with(&mut self, options: TagsOptions, el: El) -> Option<NodeId> {
        let body = self.ctx.body();
        self.ctx.use_tags(options).mount(body, el)
    }

    // ── Processing ───────────────────────────────────────────────────

    pub fn tick(&mut self) -> TickReport {
        self.ctx.tick()
    }

    /// Run `n` ticks and return the last report.
    pub fn ticks(&mut self, n: usize) -> Option<TickReport> {
        (0..n).map(|_| self.ctx.tick()).last()
    }

    /// Dispatch a click at `target`.
    pub fn click(&mut self, target: NodeId) -> usize {
        self.ctx.dispatch(target, "click")
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Markup of the body's content.
    pub fn html(&self) -> String {
        self.ctx.body_html()
    }

    /// Outline of the body subtree, markers included.
    pub fn outline(&self) -> String {
        super::snapshot::tree_to_string(self.ctx.dom(), self.ctx.body())
    }
}

impl Default for Pilot {
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
    use std::rc::Rc;

    #[test]
    fn mount_and_tick() {
        let mut pilot = Pilot::new();
        let n = Rc::new(Cell::new(1));
        let read = n.clone();
        pilot.mount(el("p").child(Child::bind(move || read.get())));
        assert_eq!(pilot.html(), "<p>1</p>");

        n.set(2);
        pilot.tick();
        assert_eq!(pilot.html(), "<p>2</p>");
    }

    #[test]
    fn ticks_returns_last_report() {
        let mut pilot = Pilot::new();
        assert_eq!(pilot.ticks(0), None);
        assert!(pilot.ticks(3).is_some());
        assert_eq!(pilot.ctx().stats().ticks, 3);
    }

    #[test]
    fn click_updates_bound_attribute() {
        let mut pilot = Pilot::new();
        let on = Rc::new(Cell::new(false));
        let (read, write) = (on.clone(), on.clone());
        let button = pilot
            .mount(
                el("button")
                    .bind_attr("aria-pressed", move || read.get())
                    .on("click", move |_| write.set(!write.get())),
            )
            .unwrap();
        assert_eq!(pilot.html(), "<button></button>");

        assert_eq!(pilot.click(button), 1);
        pilot.tick();
        assert_eq!(pilot.html(), r#"<button aria-pressed="true"></button>"#);

        pilot.click(button);
        pilot.tick();
        assert_eq!(pilot.html(), r#"<button aria-pressed="false"></button>"#);
    }

    #[test]
    fn outline_shows_marker() {
        let mut pilot = Pilot::new();
        pilot.mount(el("p").child(Child::bind(|| "x")));
        insta::assert_snapshot!(pilot.outline(), @r#"
        <body>
          <p>
            "x"
            #marker
        "#);
    }
}
