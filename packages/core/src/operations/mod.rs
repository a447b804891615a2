//! Document Operations
//!
//! Reversible edits of the document tree and the history that records them.
//!
//! - [`Command`] - change text, move, add, remove
//! - [`History`] - owns the tree; `execute`, `undo`, `redo`
//! - [`CommandError`] - why a command was rejected
//!
//! # Example
//!
//! ```rust
//! use docmap_core::markdown::parse;
//! use docmap_core::operations::{Command, History};
//!
//! let tree = parse("# Intro\n\n- A\n- B\n");
//! let section = tree.children_of(tree.root_id())[0].clone();
//! let b = tree.children_of(&section)[1].clone();
//!
//! let mut history = History::new(tree);
//! history.execute(Command::move_node(b.clone(), section.clone(), 0))?;
//! assert_eq!(history.tree().children_of(&section)[0], b);
//!
//! assert!(history.undo()?);
//! assert_eq!(history.tree().children_of(&section)[1], b);
//! # Ok::<(), docmap_core::operations::CommandError>(())
//! ```

mod command;
mod error;
mod history;

pub use command::Command;
pub use error::CommandError;
pub use history::{History, HistoryConfig};
