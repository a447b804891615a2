//! Document Tree Arena
//!
//! A `Tree` owns every node of one document in a map keyed by id. Children
//! lists store ids, so moves and removals are pure list edits.
//!
//! Read access is public. Structural mutation is crate-private and reached
//! only through [`crate::operations::Command`], which keeps the undo history
//! in step with the tree.

use crate::models::{Node, NodeId, NodeType, Payload};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Tree invariant violations reported by [`Tree::validate`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Root node '{0}' is missing from the node map")]
    MissingRoot(NodeId),

    #[error("Root node '{0}' is not of type root")]
    RootTypeMismatch(NodeId),

    #[error("Node '{parent_id}' lists unknown child '{child_id}'")]
    DanglingChild { parent_id: NodeId, child_id: NodeId },

    #[error("Node '{0}' is reachable more than once")]
    SharedNode(NodeId),

    #[error("Node '{0}' is not reachable from the root")]
    Unreachable(NodeId),

    #[error("Node '{node_id}' has parent_id {recorded:?} but is listed under '{actual}'")]
    ParentMismatch {
        node_id: NodeId,
        recorded: Option<NodeId>,
        actual: NodeId,
    },

    #[error("Node '{parent_id}' of type '{parent_type}' cannot hold a '{child_type}' child")]
    IllegalChild {
        parent_id: NodeId,
        parent_type: NodeType,
        child_type: NodeType,
    },

    #[error("Node '{parent_id}' lists a non-section child after a section child")]
    SectionOrder { parent_id: NodeId },

    #[error("Node stored under key '{key}' carries id '{node_id}'")]
    KeyMismatch { key: NodeId, node_id: NodeId },

    #[error("Node '{node_id}' has content markdown cannot hold: {reason}")]
    InvalidPayload { node_id: NodeId, reason: String },
}

/// Rooted document tree stored as an id → node arena.
///
/// Deserialization runs [`Tree::validate`], so a `Tree` always has its root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TreeParts")]
pub struct Tree {
    root_id: NodeId,
    nodes: HashMap<NodeId, Node>,
}

/// Unchecked wire form of a [`Tree`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeParts {
    root_id: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl TryFrom<TreeParts> for Tree {
    type Error = TreeError;

    fn try_from(parts: TreeParts) -> Result<Self, Self::Error> {
        let tree = Tree::from_parts(parts.root_id, parts.nodes);
        tree.validate()?;
        Ok(tree)
    }
}

impl Tree {
    /// Create a tree holding only a root node
    pub fn new(root: Node) -> Self {
        let root_id = root.id.clone();
        let mut nodes = HashMap::new();
        nodes.insert(root_id.clone(), root);
        Self { root_id, nodes }
    }

    /// Create an empty document (root with no body)
    pub fn empty() -> Self {
        Self::new(Node::new(Payload::Root {
            body: String::new(),
        }))
    }

    pub(crate) fn from_parts(root_id: NodeId, nodes: HashMap<NodeId, Node>) -> Self {
        Self { root_id, nodes }
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn root(&self) -> &Node {
        // The root is inserted at construction and can never be removed
        &self.nodes[&self.root_id]
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Child ids of `id`, empty when the node does not exist
    pub fn children_of(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent id and child index of `id`; `None` for the root and unknown ids
    pub fn placement_of(&self, id: &str) -> Option<(NodeId, usize)> {
        let parent_id = self.nodes.get(id)?.parent_id.clone()?;
        let index = self
            .children_of(&parent_id)
            .iter()
            .position(|child| child == id)?;
        Some((parent_id, index))
    }

    /// Whether `id` equals `ancestor` or lies anywhere below it
    pub fn is_in_subtree(&self, ancestor: &str, id: &str) -> bool {
        let mut current = Some(id.to_string());
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(|n| n.parent_id.clone());
        }
        false
    }

    /// Number of section ancestors above `id`
    pub fn section_depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent_id.clone());
        while let Some(parent_id) = current {
            let Some(parent) = self.nodes.get(&parent_id) else {
                break;
            };
            if parent.node_type() == NodeType::Section {
                depth += 1;
            }
            current = parent.parent_id.clone();
        }
        depth
    }

    /// Ids in document (pre-)order starting at `start`
    pub fn preorder_from(&self, start: &str) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![start.to_string()];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().cloned());
                order.push(id);
            }
        }
        order
    }

    /// Ids of the whole document in pre-order
    pub fn preorder(&self) -> Vec<NodeId> {
        self.preorder_from(&self.root_id)
    }

    /// Iterate over every node in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Check every structural invariant of the tree
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self
            .nodes
            .get(&self.root_id)
            .ok_or_else(|| TreeError::MissingRoot(self.root_id.clone()))?;
        if root.node_type() != NodeType::Root {
            return Err(TreeError::RootTypeMismatch(self.root_id.clone()));
        }

        for (key, node) in &self.nodes {
            if *key != node.id {
                return Err(TreeError::KeyMismatch {
                    key: key.clone(),
                    node_id: node.id.clone(),
                });
            }
            if let Err(reason) = node.payload.validate() {
                return Err(TreeError::InvalidPayload {
                    node_id: node.id.clone(),
                    reason,
                });
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(&self.root_id);
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let mut section_seen = false;
            for child_id in &node.children {
                let child = self
                    .nodes
                    .get(child_id)
                    .ok_or_else(|| TreeError::DanglingChild {
                        parent_id: node.id.clone(),
                        child_id: child_id.clone(),
                    })?;
                if !seen.insert(child_id) {
                    return Err(TreeError::SharedNode(child_id.clone()));
                }
                if child.parent_id.as_deref() != Some(node.id.as_str()) {
                    return Err(TreeError::ParentMismatch {
                        node_id: child_id.clone(),
                        recorded: child.parent_id.clone(),
                        actual: node.id.clone(),
                    });
                }
                if !node.node_type().accepts_child(child.node_type()) {
                    return Err(TreeError::IllegalChild {
                        parent_id: node.id.clone(),
                        parent_type: node.node_type(),
                        child_type: child.node_type(),
                    });
                }
                match child.node_type() {
                    NodeType::Section => section_seen = true,
                    _ if section_seen => {
                        return Err(TreeError::SectionOrder {
                            parent_id: node.id.clone(),
                        })
                    }
                    _ => {}
                }
                stack.push(child);
            }
        }

        if let Some(orphan) = self.nodes.keys().find(|id| !seen.contains(id.as_str())) {
            return Err(TreeError::Unreachable(orphan.clone()));
        }
        Ok(())
    }

    /// Compare shape, node types and payloads, ignoring ids and layout fields
    pub fn structurally_eq(&self, other: &Tree) -> bool {
        let mut stack = vec![(self.root(), other.root())];
        while let Some((left, right)) = stack.pop() {
            if left.payload != right.payload || left.children.len() != right.children.len() {
                return false;
            }
            for (l, r) in left.children.iter().zip(right.children.iter()) {
                match (self.nodes.get(l), other.nodes.get(r)) {
                    (Some(l), Some(r)) => stack.push((l, r)),
                    _ => return false,
                }
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Crate-private mutation used by commands and layout
    // ------------------------------------------------------------------

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Swap in a new payload, returning the old one
    pub(crate) fn replace_payload(&mut self, id: &str, payload: Payload) -> Option<Payload> {
        let node = self.nodes.get_mut(id)?;
        Some(std::mem::replace(&mut node.payload, payload))
    }

    /// Insert a detached node as child `index` of `parent_id`.
    ///
    /// Callers validate the placement first; an index past the end appends.
    pub(crate) fn insert_node(&mut self, parent_id: &str, index: usize, mut node: Node) {
        node.parent_id = Some(parent_id.to_string());
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, id);
        }
    }

    /// Unlink `id` from its parent, returning the old placement
    pub(crate) fn detach(&mut self, id: &str) -> Option<(NodeId, usize)> {
        let (parent_id, index) = self.placement_of(id)?;
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.remove(index);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent_id = None;
        }
        Some((parent_id, index))
    }

    /// Link an already stored node under `parent_id` at `index`
    pub(crate) fn attach(&mut self, id: &str, parent_id: &str, index: usize) {
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, id.to_string());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent_id = Some(parent_id.to_string());
        }
    }

    /// Detach `id` and take its whole subtree out of the arena (pre-order)
    pub(crate) fn take_subtree(&mut self, id: &str) -> Vec<Node> {
        self.detach(id);
        self.preorder_from(id)
            .into_iter()
            .filter_map(|node_id| self.nodes.remove(&node_id))
            .collect()
    }

    /// Put a subtree produced by [`Tree::take_subtree`] back at `index`
    pub(crate) fn restore_subtree(&mut self, parent_id: &str, index: usize, nodes: Vec<Node>) {
        let Some(top_id) = nodes.first().map(|n| n.id.clone()) else {
            return;
        };
        for node in nodes {
            self.nodes.insert(node.id.clone(), node);
        }
        self.attach(&top_id, parent_id, index);
    }

    /// Clear layout-owned fields on every node
    pub(crate) fn clear_geometry(&mut self) {
        for node in self.nodes.values_mut() {
            node.position = None;
            node.size = None;
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
