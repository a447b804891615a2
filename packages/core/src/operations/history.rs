//! Undo/redo history
//!
//! `History` owns the document tree. Commands are the only way to change its
//! structure, so the undo stack can never drift out of step with the tree.

use super::{Command, CommandError};
use crate::config::ConfigError;
use crate::models::Tree;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Largest explicit undo depth accepted; use 0 for an unbounded history
const MAX_UNDO_DEPTH_LIMIT: usize = 1_000_000;

/// History settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryConfig {
    /// Commands kept for undo; the oldest are dropped first. 0 = unbounded.
    pub max_undo_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: 500,
        }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_undo_depth > MAX_UNDO_DEPTH_LIMIT {
            return Err(ConfigError::invalid(
                "history.maxUndoDepth",
                format!(
                    "must be at most {} (use 0 for unbounded, got {})",
                    MAX_UNDO_DEPTH_LIMIT, self.max_undo_depth
                ),
            ));
        }
        Ok(())
    }
}

/// A document tree with its undo and redo stacks
#[derive(Debug, Clone)]
pub struct History {
    tree: Tree,
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    config: HistoryConfig,
}

impl History {
    pub fn new(tree: Tree) -> Self {
        Self::with_config(tree, HistoryConfig::default())
    }

    pub fn with_config(tree: Tree, config: HistoryConfig) -> Self {
        Self {
            tree,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            config,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Layout writes geometry through this; structure changes go through commands
    pub(crate) fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Validate and apply `command`, record it for undo and clear the redo stack.
    ///
    /// On error nothing changes: neither the tree nor either stack.
    pub fn execute(&mut self, mut command: Command) -> Result<(), CommandError> {
        if let Err(err) = command.apply(&mut self.tree) {
            tracing::debug!(command = command.kind(), error = %err, "Command rejected");
            return Err(err);
        }
        tracing::debug!(
            command = command.kind(),
            node_id = command.node_id(),
            undo_depth = self.undo_stack.len() + 1,
            "Executed command"
        );

        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        if self.config.max_undo_depth > 0 && self.undo_stack.len() > self.config.max_undo_depth {
            self.undo_stack.pop_front();
        }
        Ok(())
    }

    /// Revert the most recent command. Returns `Ok(false)` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = command.revert(&mut self.tree) {
            self.undo_stack.push_back(command);
            return Err(err);
        }
        tracing::debug!(command = command.kind(), node_id = command.node_id(), "Undid command");
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Re-apply the most recently undone command. Returns `Ok(false)` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = command.apply(&mut self.tree) {
            self.redo_stack.push(command);
            return Err(err);
        }
        tracing::debug!(command = command.kind(), node_id = command.node_id(), "Redid command");
        self.undo_stack.push_back(command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget both stacks, keeping the tree as it is
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;
