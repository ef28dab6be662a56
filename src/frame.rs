//! Frame loop: drives [`Context::tick`] at a fixed rate.
//!
//! The loop runs on the caller's task and never spawns, since producers hold
//! `Rc` state. Use a current-thread runtime or a `LocalSet`.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::context::{Context, TickReport};

/// Ticks a [`Context`] once per frame period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoop {
    period: Duration,
}

impl FrameLoop {
    /// A loop targeting `fps` frames per second (at least one).
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
        }
    }

    /// A loop using the context's configured frame rate.
    pub fn for_context(ctx: &Context) -> Self {
        Self::new(ctx.config().fps)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Tick forever. Late frames are skipped rather than bunched up.
    ///
    /// Only returns by unwinding, when a producer panics.
    pub async fn run(&self, ctx: &mut Context) {
        debug!(period = ?self.period, "frame loop started");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            ctx.tick();
        }
    }

    /// Tick exactly `frames` times and return the last report.
    pub async fn run_frames(&self, ctx: &mut Context, frames: usize) -> Option<TickReport> {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = None;
        for _ in 0..frames {
            ticker.tick().await;
            last = Some(ctx.tick());
        }
        last
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}
