//! DocMap Core
//!
//! Bidirectional markdown ⇄ mind-map engine: markup is parsed into a typed
//! document tree, the tree is laid out as a diagram, edited through undoable
//! commands and serialized back to markup without losing content.
//!
//! # Architecture
//!
//! - **One tree, two views**: the same [`Tree`] backs the text and the diagram
//! - **Commands only**: structural edits go through [`operations::History`]
//! - **Full relayout**: positions are recomputed after every change, never patched
//! - **Never fail on input**: bad blocks become error-marker nodes
//!
//! # Modules
//!
//! - [`models`] - Nodes, payloads and the tree arena
//! - [`markdown`] - Parser and serializer
//! - [`layout`] - Flex-tree layout
//! - [`styles`] - Per-type style registry
//! - [`operations`] - Commands and undo/redo history
//! - [`session`] - Parse → edit → layout → serialize in one place
//! - [`config`] - Engine configuration

pub mod config;
pub mod layout;
pub mod markdown;
pub mod models;
pub mod operations;
pub mod session;
pub mod styles;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, ParserConfig};
pub use layout::{layout, LayoutOptions, LayoutResult, NodeMeasurer};
pub use markdown::{parse, parse_document, serialize, ParsedDocument};
pub use models::{Node, NodeId, NodeType, Payload, Tree, TreeError};
pub use operations::{Command, CommandError, History, HistoryConfig};
pub use session::DocumentSession;

use thiserror::Error;

/// Top-level error for callers that mix configuration, tree and command work
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid tree: {0}")]
    Tree(#[from] TreeError),

    #[error("Command failed: {0}")]
    Command(#[from] CommandError),
}

pub type Result<T> = std::result::Result<T, Error>;
