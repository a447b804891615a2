//! Engine configuration
//!
//! `EngineConfig` groups the parser, layout and history settings. It is plain
//! serde data (camelCase JSON), has sensible defaults for every field and is
//! checked with [`EngineConfig::validate`] before use.

use crate::layout::LayoutOptions;
use crate::operations::HistoryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest tab stop the parser accepts
const MAX_TAB_WIDTH: usize = 16;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create an InvalidValue error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Markdown parser settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Columns a tab counts for when measuring indentation
    pub tab_width: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { tab_width: 4 }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_width == 0 || self.tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::invalid(
                "parser.tabWidth",
                format!("must be between 1 and {} (got {})", MAX_TAB_WIDTH, self.tab_width),
            ));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub parser: ParserConfig,
    pub layout: LayoutOptions,
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Parse and validate a JSON configuration string; missing fields default
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parser.validate()?;
        self.layout.validate()?;
        self.history.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Orientation;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.parser.tab_width, 4);
        assert_eq!(config.layout.sibling_gap, 20.0);
        assert_eq!(config.layout.level_gap, 40.0);
        assert_eq!(config.history.max_undo_depth, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        // Invalid: zero tab width
        config.parser.tab_width = 0;
        assert!(config.validate().is_err());

        // Invalid: negative gap
        config.parser.tab_width = 2;
        config.layout.sibling_gap = -1.0;
        assert!(config.validate().is_err());

        // Invalid: NaN extent
        config.layout.sibling_gap = 0.0;
        config.layout.min_node_extent = f64::NAN;
        assert!(config.validate().is_err());

        // Invalid: zero extent
        config.layout.min_node_extent = 0.0;
        assert!(config.validate().is_err());

        config.layout.min_node_extent = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "layout": { "orientation": "left-right", "levelGap": 60 } }"#,
        )
        .unwrap();

        assert_eq!(config.layout.orientation, Orientation::LeftRight);
        assert_eq!(config.layout.level_gap, 60.0);
        assert_eq!(config.layout.sibling_gap, 20.0);
        assert_eq!(config.parser.tab_width, 4);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "parser": {{ "tabWidth": 2 }}, "history": {{ "maxUndoDepth": 10 }} }}"#)
            .unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.parser.tab_width, 2);
        assert_eq!(config.history.max_undo_depth, 10);
    }

    #[test]
    fn test_invalid_file_content_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "parser": {{ "tabWidth": 99 }} }}"#).unwrap();

        let err = EngineConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
