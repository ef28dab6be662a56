//! Reactive bindings: registries, registration, per-frame reconciliation, sweep.
//!
//! - [`Registry`] — dense slot arrays for attribute and node bindings.
//! - [`registrar`] — evaluates a producer once and records the binding.
//! - [`attribute_pass`] / [`node_pass`] — poll producers and patch changes.
//! - [`sweep`] — compact registries once bindings leave the tree.
//!
//! Bindings are polled, not notified: every live producer runs once per tick.

pub mod reconcile;
pub mod registrar;
pub mod registry;
pub mod sweep;

pub use reconcile::{attribute_pass, node_pass, PassReport};
pub use registrar::Fragment;
pub use registry::{AttrTarget, AttributeBinding, NodeBinding, Registry, Slots};
pub use sweep::{sweep, SweepReport, SweepSchedule, DEFAULT_SWEEP_INTERVAL};
