//! Error types for document commands
//!
//! Every variant is reported before the tree is touched: a command that fails
//! validation leaves the document exactly as it was.

use crate::models::{NodeId, NodeType};
use thiserror::Error;

/// Errors that can occur while executing, undoing or redoing a command
///
/// # Examples
///
/// ```rust
/// use docmap_core::operations::CommandError;
///
/// let err = CommandError::invalid_target("node-123");
/// assert_eq!(err.to_string(), "Node 'node-123' does not exist");
///
/// let err = CommandError::cycle_rejected("a", "b");
/// assert!(matches!(err, CommandError::CycleRejected { .. }));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// A referenced node or parent id is not in the tree
    #[error("Node '{node_id}' does not exist")]
    InvalidTarget { node_id: NodeId },

    /// A move would place a node under itself or one of its descendants
    #[error("Cannot move node '{node_id}' under '{new_parent_id}': target is inside its own subtree")]
    CycleRejected {
        node_id: NodeId,
        new_parent_id: NodeId,
    },

    /// The root can be edited but never moved or removed
    #[error("Root node '{node_id}' cannot be moved or removed")]
    RootImmutable { node_id: NodeId },

    /// Insertion index past the end of the target's children
    #[error("Index {index} is out of range for '{parent_id}' ({len} children)")]
    IndexOutOfRange {
        parent_id: NodeId,
        index: usize,
        len: usize,
    },

    /// The parent type cannot hold the child here
    ///
    /// Covers leaf parents, sections under list items, non-section nodes
    /// placed after a section sibling and sections nested deeper than six.
    #[error("Cannot place a '{child_type}' under '{parent_id}': {reason}")]
    InvalidPlacement {
        parent_id: NodeId,
        child_type: NodeType,
        reason: String,
    },

    /// A payload change would change the node's type
    #[error("Node '{node_id}' is a '{expected}' and cannot take a '{actual}' payload")]
    PayloadMismatch {
        node_id: NodeId,
        expected: NodeType,
        actual: NodeType,
    },

    /// A text edit on a payload without a single text field (table, stats)
    #[error("Node '{node_id}' of type '{node_type}' has no single text field")]
    NoTextField { node_id: NodeId, node_type: NodeType },

    /// An added node reuses an id already in the tree
    #[error("Node id '{node_id}' is already in use")]
    DuplicateId { node_id: NodeId },

    /// The payload has no markdown form that reads back as the same payload
    #[error("Node '{node_id}' has content markdown cannot hold: {reason}")]
    InvalidPayload { node_id: NodeId, reason: String },
}

impl CommandError {
    /// Create an InvalidTarget error
    pub fn invalid_target(node_id: impl Into<NodeId>) -> Self {
        Self::InvalidTarget {
            node_id: node_id.into(),
        }
    }

    /// Create a CycleRejected error
    pub fn cycle_rejected(node_id: impl Into<NodeId>, new_parent_id: impl Into<NodeId>) -> Self {
        Self::CycleRejected {
            node_id: node_id.into(),
            new_parent_id: new_parent_id.into(),
        }
    }

    /// Create a RootImmutable error
    pub fn root_immutable(node_id: impl Into<NodeId>) -> Self {
        Self::RootImmutable {
            node_id: node_id.into(),
        }
    }

    /// Create an IndexOutOfRange error
    pub fn index_out_of_range(parent_id: impl Into<NodeId>, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            parent_id: parent_id.into(),
            index,
            len,
        }
    }

    /// Create an InvalidPlacement error
    pub fn invalid_placement(
        parent_id: impl Into<NodeId>,
        child_type: NodeType,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPlacement {
            parent_id: parent_id.into(),
            child_type,
            reason: reason.into(),
        }
    }

    /// Create a PayloadMismatch error
    pub fn payload_mismatch(node_id: impl Into<NodeId>, expected: NodeType, actual: NodeType) -> Self {
        Self::PayloadMismatch {
            node_id: node_id.into(),
            expected,
            actual,
        }
    }

    /// Create a NoTextField error
    pub fn no_text_field(node_id: impl Into<NodeId>, node_type: NodeType) -> Self {
        Self::NoTextField {
            node_id: node_id.into(),
            node_type,
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(node_id: impl Into<NodeId>) -> Self {
        Self::DuplicateId {
            node_id: node_id.into(),
        }
    }

    /// Create an InvalidPayload error
    pub fn invalid_payload(node_id: impl Into<NodeId>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }
}
