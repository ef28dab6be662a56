//! Event system: listeners and bubbling dispatch.

pub mod handler;

pub use handler::{bubble_path, event_name, Event, Listener, EVENT_PREFIX};
