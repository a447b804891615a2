//! Document Session
//!
//! Ties the pieces together for an editing surface: markup is parsed into a
//! tree, the tree is edited only through commands, and after every change the
//! layout is recomputed from scratch and written back into the nodes.
//!
//! ```text
//! markup --parse--> Tree --layout--> positions
//!                    ^  |
//!          commands -+  +--serialize--> markup
//! ```

use crate::config::{ConfigError, EngineConfig};
use crate::layout::{layout, DefaultSizes, LayoutOptions, LayoutResult, NodeMeasurer};
use crate::markdown::{self, ParseDiagnostic};
use crate::models::Tree;
use crate::operations::{Command, CommandError, History};
use crate::Error;

/// An open document: tree, undo history, measurer and current layout
pub struct DocumentSession<M: NodeMeasurer = DefaultSizes> {
    history: History,
    measurer: M,
    options: LayoutOptions,
    layout: LayoutResult,
    diagnostics: Vec<ParseDiagnostic>,
}

impl DocumentSession<DefaultSizes> {
    /// Open markup with default settings and registry sizes
    pub fn open(markup: &str) -> Self {
        let config = EngineConfig::default();
        let parsed = markdown::parse_document(markup, &config.parser);
        Self::assemble(parsed.tree, parsed.diagnostics, DefaultSizes, &config)
    }
}

impl<M: NodeMeasurer> DocumentSession<M> {
    /// Open markup with an explicit measurer and configuration
    pub fn open_with(markup: &str, measurer: M, config: &EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        let parsed = markdown::parse_document(markup, &config.parser);
        tracing::info!(
            nodes = parsed.tree.len(),
            diagnostics = parsed.diagnostics.len(),
            "Opened document"
        );
        Ok(Self::assemble(parsed.tree, parsed.diagnostics, measurer, config))
    }

    /// Wrap an existing tree; it must satisfy every tree invariant
    pub fn from_tree(tree: Tree, measurer: M, config: &EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        tree.validate()?;
        Ok(Self::assemble(tree, Vec::new(), measurer, config))
    }

    fn assemble(tree: Tree, diagnostics: Vec<ParseDiagnostic>, measurer: M, config: &EngineConfig) -> Self {
        let history = History::with_config(tree, config.history.clone());
        let layout = layout(history.tree(), &measurer, &config.layout);
        let mut session = Self {
            history,
            measurer,
            options: config.layout.clone(),
            layout,
            diagnostics,
        };
        session.write_geometry();
        session
    }

    pub fn tree(&self) -> &Tree {
        self.history.tree()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Layout of the current tree
    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Findings from the parse that opened this session
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    /// Current document as markup
    pub fn markdown(&self) -> String {
        markdown::serialize(self.history.tree())
    }

    pub fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        self.history.execute(command)?;
        self.relayout();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, CommandError> {
        let changed = self.history.undo()?;
        if changed {
            self.relayout();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> Result<bool, CommandError> {
        let changed = self.history.redo()?;
        if changed {
            self.relayout();
        }
        Ok(changed)
    }

    /// Switch layout options and lay the document out again.
    ///
    /// Invalid options are rejected and the current layout is kept.
    pub fn set_options(&mut self, options: LayoutOptions) -> Result<(), ConfigError> {
        options.validate()?;
        self.options = options;
        self.relayout();
        Ok(())
    }

    /// Recompute the layout from scratch
    pub fn relayout(&mut self) {
        self.layout = layout(self.history.tree(), &self.measurer, &self.options);
        self.write_geometry();
    }

    fn write_geometry(&mut self) {
        let tree = self.history.tree_mut();
        tree.clear_geometry();
        for (id, rect) in &self.layout.positions {
            if let Some(node) = tree.node_mut(id) {
                node.position = Some(rect.origin());
                node.size = Some(rect.size());
            }
        }
    }
}
