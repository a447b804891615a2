//! Docmap Inspection CLI
//!
//! Runs the engine over a markdown file and prints what it sees. Meant for
//! debugging the parser and layout against real documents.
//!
//! # Usage
//!
//! ```bash
//! # Document tree and diagnostics as JSON
//! cargo run --bin docmap -- parse notes.md
//!
//! # Layout boxes and edges as JSON
//! cargo run --bin docmap -- layout notes.md --orientation left-right
//!
//! # Normalized markdown
//! cargo run --bin docmap -- normalize notes.md
//!
//! # Engine settings from a JSON file
//! cargo run --bin docmap -- --config docmap.json layout notes.md
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use docmap_core::layout::{DefaultSizes, Orientation};
use docmap_core::{markdown, DocumentSession, EngineConfig};
use serde_json::json;

#[derive(Parser)]
#[clap(author, version, about = "Inspect how docmap reads a markdown document")]
struct Args {
    /// Engine configuration (JSON, camelCase keys)
    #[clap(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the document tree and parse diagnostics
    Parse {
        #[clap(value_name = "MARKDOWN_FILE")]
        file: PathBuf,
    },
    /// Print node boxes and edge routes
    Layout {
        #[clap(value_name = "MARKDOWN_FILE")]
        file: PathBuf,

        /// Overrides the configured orientation
        #[clap(short, long, value_enum)]
        orientation: Option<Direction>,
    },
    /// Print the document re-serialized in normal form
    Normalize {
        #[clap(value_name = "MARKDOWN_FILE")]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    TopDown,
    LeftRight,
}

impl From<Direction> for Orientation {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::TopDown => Orientation::TopDown,
            Direction::LeftRight => Orientation::LeftRight,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match args.command {
        Action::Parse { file } => {
            let markup = read_markdown(&file)?;
            let parsed = markdown::parse_document(&markup, &config.parser);
            for diagnostic in &parsed.diagnostics {
                tracing::warn!(
                    line = diagnostic.line,
                    kind = ?diagnostic.kind,
                    "{}",
                    diagnostic.message
                );
            }
            let output = json!({
                "tree": parsed.tree,
                "diagnostics": parsed.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Action::Layout { file, orientation } => {
            if let Some(direction) = orientation {
                config.layout.orientation = direction.into();
            }
            let markup = read_markdown(&file)?;
            let session = DocumentSession::open_with(&markup, DefaultSizes, &config)?;
            tracing::info!(
                nodes = session.tree().len(),
                width = session.layout().bounds.width,
                height = session.layout().bounds.height,
                "Laid out document"
            );
            println!("{}", serde_json::to_string_pretty(session.layout())?);
        }
        Action::Normalize { file } => {
            let markup = read_markdown(&file)?;
            let parsed = markdown::parse_document(&markup, &config.parser);
            if parsed.has_errors() {
                tracing::warn!(
                    count = parsed.diagnostics.len(),
                    "Document contains malformed blocks; they are kept as error markers"
                );
            }
            print!("{}", markdown::serialize(&parsed.tree));
        }
    }

    Ok(())
}

fn read_markdown(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
