//! Relationship graph over definitions, instances and references
//!
//! Built on petgraph. The graph is rebuilt from the store on every command
//! and never persisted.

pub mod inference;
pub mod layout;
pub mod resource_graph;
pub mod search;
pub mod style;

pub use inference::infer;
pub use resource_graph::{GraphNode, LinkDirection, NodeType, ResourceGraph};
pub use search::{SearchMode, search};
