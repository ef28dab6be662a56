//! DOM arena: slotmap-backed document tree with serialization and queries.

pub mod node;
pub mod query;
pub mod serialize;
pub mod tree;

pub use node::{NodeData, NodeId, NodeKind};
pub use serialize::is_void;
pub use tree::{Dom, DomError};
