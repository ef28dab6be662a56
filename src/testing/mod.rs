//! Headless testing helpers: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to mount elements into a fresh [`Context`](crate::context::Context)
//! and drive ticks and events. Use [`tree_to_string`] to capture a subtree as an
//! indented outline for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::tree_to_string;
