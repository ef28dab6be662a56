//! # polldom
//!
//! A tag-building UI layer with polled reactive bindings.
//!
//! Elements are described with [`el`] and built into a slotmap-backed document
//! by a [`Tags`] factory. Any property or child can be a producer closure; the
//! factory evaluates it once and registers it. Each frame, [`Context::tick`]
//! calls every live producer and patches only what changed. Bindings whose
//! nodes left the tree are swept in batches.
//!
//! ## Core Systems
//!
//! - **[`dom`]** — Slotmap-backed document arena, tree operations, serialization, queries
//! - **[`value`]** — Attribute values and their coercion to strings
//! - **[`tags`]** — Element descriptions, the live Node Factory, the static renderer
//! - **[`reactive`]** — Binding registries, registration, reconciliation, sweep
//! - **[`event`]** — Listeners and bubbling dispatch
//! - **[`context`]** — Render context, tick, configuration, diagnostics
//! - **[`frame`]** — Tokio-driven frame loop
//! - **[`testing`]** — Headless pilot and outline snapshots

// Foundation
pub mod dom;
pub mod value;

// Construction
pub mod event;
pub mod tags;

// Reactivity
pub mod reactive;

// Runtime
pub mod context;
pub mod frame;

pub mod testing;

pub use context::{Context, ReconcileConfig, Stats, TickReport};
pub use dom::{Dom, DomError, NodeId};
pub use frame::FrameLoop;
pub use tags::{el, use_static_tags, Arg, Child, El, Prop, Ref, StaticTags, Tags, TagsOptions};
pub use value::AttrValue;
