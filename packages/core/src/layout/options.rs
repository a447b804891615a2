/// Layout options for the flex-tree placement
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Direction the tree grows in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Root at the top, depth grows downwards
    #[default]
    TopDown,
    /// Root at the left, depth grows to the right
    LeftRight,
}

/// Shape of the parent → child edge routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStyle {
    #[default]
    Straight,
    Orthogonal,
}

/// Options consumed by [`crate::layout::layout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub orientation: Orientation,

    /// Minimum space between sibling subtrees along the breadth axis
    pub sibling_gap: f64,

    /// Space between a parent's far edge and its children along the depth axis
    pub level_gap: f64,

    pub edge_style: EdgeStyle,

    /// Extent substituted for non-positive or non-finite node sizes
    pub min_node_extent: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::TopDown,
            sibling_gap: 20.0,
            level_gap: 40.0,
            edge_style: EdgeStyle::Straight,
            min_node_extent: 1.0,
        }
    }
}

impl LayoutOptions {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_gaps(mut self, sibling_gap: f64, level_gap: f64) -> Self {
        self.sibling_gap = sibling_gap;
        self.level_gap = level_gap;
        self
    }

    pub fn with_edge_style(mut self, edge_style: EdgeStyle) -> Self {
        self.edge_style = edge_style;
        self
    }

    /// Copy with every unusable number replaced by its default.
    ///
    /// Gaps must be finite and non-negative; the minimum extent must be
    /// finite and positive.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let usable = |value: f64, fallback: f64, allow_zero: bool| {
            if value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0)) {
                value
            } else {
                tracing::warn!(value, fallback, "Unusable layout option replaced");
                fallback
            }
        };
        Self {
            sibling_gap: usable(self.sibling_gap, defaults.sibling_gap, true),
            level_gap: usable(self.level_gap, defaults.level_gap, true),
            min_node_extent: usable(self.min_node_extent, defaults.min_node_extent, false),
            ..self.clone()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gaps = [
            ("layout.siblingGap", self.sibling_gap),
            ("layout.levelGap", self.level_gap),
        ];
        for (field, value) in gaps {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a finite, non-negative number (got {})", value),
                ));
            }
        }
        if !self.min_node_extent.is_finite() || self.min_node_extent <= 0.0 {
            return Err(ConfigError::invalid(
                "layout.minNodeExtent",
                format!("must be a finite, positive number (got {})", self.min_node_extent),
            ));
        }
        Ok(())
    }
}
