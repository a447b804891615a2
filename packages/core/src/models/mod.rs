//! Data Models
//!
//! This module contains the core data structures used throughout docmap:
//!
//! - `Node` - one typed block of the document and one box of the diagram
//! - `Payload` / `NodeType` - closed set of block kinds and their content
//! - `Tree` - id-keyed arena holding a whole document

mod node;
mod tree;

pub use node::{
    derive_node_id, Alignment, LayoutPoint, Node, NodeId, NodeType, Payload, Size, StatItem,
};
pub use tree::{Tree, TreeError};
