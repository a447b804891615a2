//! Undoable document commands
//!
//! A `Command` is created with one of the constructors, applied once by
//! [`History::execute`](super::History::execute) and from then on flips
//! between applied and reverted as the user undoes and redoes:
//!
//! ```text
//! Created -> Applied -> (Undone <-> Applied)*
//! ```
//!
//! Each variant records whatever it needs to put the tree back exactly the
//! way it found it (ids, order, payloads and subtree shape). All validation
//! runs before the first mutation.

use super::CommandError;
use crate::models::{Node, NodeId, NodeType, Payload, Tree};

/// Deepest section nesting the markdown form can express (`######`)
const MAX_SECTION_DEPTH: usize = 6;

/// A single reversible edit of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace a node's payload with another payload of the same type
    ChangeText {
        node_id: NodeId,
        new_payload: Payload,
        /// Filled in when applied
        old_payload: Option<Payload>,
    },

    /// Re-parent and/or reorder a node together with its subtree.
    ///
    /// `new_index` is the position in the new parent's children after the
    /// node has been taken out of its current place.
    Move {
        node_id: NodeId,
        new_parent_id: NodeId,
        new_index: usize,
        /// Parent id and index before the move; filled in when applied
        old_placement: Option<(NodeId, usize)>,
    },

    /// Insert a new leaf node
    Add {
        parent_id: NodeId,
        index: usize,
        node: Node,
    },

    /// Remove a node with its whole subtree
    Remove {
        node_id: NodeId,
        /// Parent id and index before removal; filled in when applied
        placement: Option<(NodeId, usize)>,
        /// Removed subtree in pre-order; filled in when applied
        removed: Vec<Node>,
    },
}

impl Command {
    /// Replace the payload of `node_id`
    pub fn change_payload(node_id: impl Into<NodeId>, new_payload: Payload) -> Self {
        Command::ChangeText {
            node_id: node_id.into(),
            new_payload,
            old_payload: None,
        }
    }

    /// Replace the primary text of `node_id`, keeping the rest of its payload.
    ///
    /// Tables and stats have no single text field and are rejected; use
    /// [`Command::change_payload`] for those.
    pub fn change_text(tree: &Tree, node_id: &str, text: impl Into<String>) -> Result<Self, CommandError> {
        let node = tree
            .get(node_id)
            .ok_or_else(|| CommandError::invalid_target(node_id))?;
        let new_payload = node
            .payload
            .with_text(text)
            .ok_or_else(|| CommandError::no_text_field(node_id, node.node_type()))?;
        Ok(Self::change_payload(node_id, new_payload))
    }

    /// Move `node_id` to child position `new_index` of `new_parent_id`
    pub fn move_node(
        node_id: impl Into<NodeId>,
        new_parent_id: impl Into<NodeId>,
        new_index: usize,
    ) -> Self {
        Command::Move {
            node_id: node_id.into(),
            new_parent_id: new_parent_id.into(),
            new_index,
            old_placement: None,
        }
    }

    /// Add a new node with a fresh id built from `payload`
    pub fn add(parent_id: impl Into<NodeId>, index: usize, payload: Payload) -> Self {
        Self::add_node(parent_id, index, Node::new(payload))
    }

    /// Add a caller-built node; it must be a leaf with an unused id
    pub fn add_node(parent_id: impl Into<NodeId>, index: usize, node: Node) -> Self {
        Command::Add {
            parent_id: parent_id.into(),
            index,
            node,
        }
    }

    /// Remove `node_id` and everything below it
    pub fn remove(node_id: impl Into<NodeId>) -> Self {
        Command::Remove {
            node_id: node_id.into(),
            placement: None,
            removed: Vec::new(),
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Command::ChangeText { .. } => "change-text",
            Command::Move { .. } => "move",
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
        }
    }

    /// The node this command edits; for `Add`, the new node
    pub fn node_id(&self) -> &str {
        match self {
            Command::ChangeText { node_id, .. }
            | Command::Move { node_id, .. }
            | Command::Remove { node_id, .. } => node_id,
            Command::Add { node, .. } => &node.id,
        }
    }

    /// Validate against `tree` and apply. On error the tree is untouched.
    pub(crate) fn apply(&mut self, tree: &mut Tree) -> Result<(), CommandError> {
        match self {
            Command::ChangeText {
                node_id,
                new_payload,
                old_payload,
            } => {
                let current = tree
                    .get(node_id)
                    .map(|node| node.node_type())
                    .ok_or_else(|| CommandError::invalid_target(node_id.clone()))?;
                if current != new_payload.node_type() {
                    return Err(CommandError::payload_mismatch(
                        node_id.clone(),
                        current,
                        new_payload.node_type(),
                    ));
                }
                new_payload
                    .validate()
                    .map_err(|reason| CommandError::invalid_payload(node_id.clone(), reason))?;
                *old_payload = tree.replace_payload(node_id, new_payload.clone());
            }

            Command::Move {
                node_id,
                new_parent_id,
                new_index,
                old_placement,
            } => {
                let node = tree
                    .get(node_id)
                    .ok_or_else(|| CommandError::invalid_target(node_id.clone()))?;
                if node_id == tree.root_id() {
                    return Err(CommandError::root_immutable(node_id.clone()));
                }
                if !tree.contains(new_parent_id) {
                    return Err(CommandError::invalid_target(new_parent_id.clone()));
                }
                if tree.is_in_subtree(node_id, new_parent_id) {
                    return Err(CommandError::cycle_rejected(
                        node_id.clone(),
                        new_parent_id.clone(),
                    ));
                }
                check_placement(
                    tree,
                    new_parent_id,
                    node.node_type(),
                    section_height(tree, node_id),
                    *new_index,
                    Some(node_id.as_str()),
                )?;

                *old_placement = tree.detach(node_id);
                tree.attach(node_id, new_parent_id, *new_index);
            }

            Command::Add {
                parent_id,
                index,
                node,
            } => {
                if tree.contains(&node.id) {
                    return Err(CommandError::duplicate_id(node.id.clone()));
                }
                if !node.children.is_empty() {
                    return Err(CommandError::invalid_placement(
                        parent_id.clone(),
                        node.node_type(),
                        "added nodes must not list children",
                    ));
                }
                node.payload
                    .validate()
                    .map_err(|reason| CommandError::invalid_payload(node.id.clone(), reason))?;
                let height = usize::from(node.node_type() == NodeType::Section);
                check_placement(tree, parent_id, node.node_type(), height, *index, None)?;

                tree.insert_node(parent_id, *index, node.clone());
            }

            Command::Remove {
                node_id,
                placement,
                removed,
            } => {
                if !tree.contains(node_id) {
                    return Err(CommandError::invalid_target(node_id.clone()));
                }
                if node_id == tree.root_id() {
                    return Err(CommandError::root_immutable(node_id.clone()));
                }
                *placement = tree.placement_of(node_id);
                *removed = tree.take_subtree(node_id);
            }
        }
        Ok(())
    }

    /// Undo a previous [`Command::apply`]
    pub(crate) fn revert(&mut self, tree: &mut Tree) -> Result<(), CommandError> {
        match self {
            Command::ChangeText {
                node_id,
                old_payload,
                ..
            } => {
                if !tree.contains(node_id) {
                    return Err(CommandError::invalid_target(node_id.clone()));
                }
                if let Some(old) = old_payload.take() {
                    tree.replace_payload(node_id, old);
                }
            }

            Command::Move {
                node_id,
                old_placement,
                ..
            } => {
                if !tree.contains(node_id) {
                    return Err(CommandError::invalid_target(node_id.clone()));
                }
                if let Some((parent_id, index)) = old_placement.take() {
                    tree.detach(node_id);
                    tree.attach(node_id, &parent_id, index);
                }
            }

            Command::Add { node, .. } => {
                if !tree.contains(&node.id) {
                    return Err(CommandError::invalid_target(node.id.clone()));
                }
                // Later commands that added children are already undone
                tree.take_subtree(&node.id);
            }

            Command::Remove {
                placement, removed, ..
            } => {
                if let Some((parent_id, _)) = placement.as_ref() {
                    if !tree.contains(parent_id) {
                        return Err(CommandError::invalid_target(parent_id.clone()));
                    }
                }
                if let Some((parent_id, index)) = placement.take() {
                    tree.restore_subtree(&parent_id, index, std::mem::take(removed));
                }
            }
        }
        Ok(())
    }
}

/// Check that a `child_type` node may sit at `index` under `parent_id`.
///
/// `moving` is excluded from the sibling list so a move within the same
/// parent is measured against the list without the node itself.
fn check_placement(
    tree: &Tree,
    parent_id: &str,
    child_type: NodeType,
    section_height: usize,
    index: usize,
    moving: Option<&str>,
) -> Result<(), CommandError> {
    let parent = tree
        .get(parent_id)
        .ok_or_else(|| CommandError::invalid_target(parent_id))?;
    let parent_type = parent.node_type();
    if !parent_type.accepts_child(child_type) {
        return Err(CommandError::invalid_placement(
            parent_id,
            child_type,
            format!("a '{}' node cannot hold it", parent_type),
        ));
    }

    let siblings: Vec<&NodeId> = parent
        .children
        .iter()
        .filter(|id| Some(id.as_str()) != moving)
        .collect();
    if index > siblings.len() {
        return Err(CommandError::index_out_of_range(parent_id, index, siblings.len()));
    }

    let is_section = |id: &&NodeId| {
        tree.get(id)
            .is_some_and(|node| node.node_type() == NodeType::Section)
    };
    if child_type == NodeType::Section {
        if !siblings[index..].iter().all(is_section) {
            return Err(CommandError::invalid_placement(
                parent_id,
                child_type,
                "sections must come after all other children",
            ));
        }
        let depth = tree.section_depth(parent_id)
            + usize::from(parent_type == NodeType::Section)
            + section_height;
        if depth > MAX_SECTION_DEPTH {
            return Err(CommandError::invalid_placement(
                parent_id,
                child_type,
                format!("sections nest at most {} deep (would be {})", MAX_SECTION_DEPTH, depth),
            ));
        }
    } else if siblings[..index].iter().any(is_section) {
        return Err(CommandError::invalid_placement(
            parent_id,
            child_type,
            "only sections may follow a section",
        ));
    }
    Ok(())
}

/// Longest chain of nested sections starting at `id` (0 for non-sections)
fn section_height(tree: &Tree, id: &str) -> usize {
    match tree.get(id) {
        Some(node) if node.node_type() == NodeType::Section => {
            1 + node
                .children
                .iter()
                .map(|child| section_height(tree, child))
                .max()
                .unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;
