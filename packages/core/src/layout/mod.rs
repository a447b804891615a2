//! Layout Engine
//!
//! Turns a document tree plus per-node sizes into absolute boxes and edge
//! routes for the diagram view.
//!
//! - [`layout`] - flex-tree placement (variable-size tidy tree)
//! - [`NodeMeasurer`] - pluggable size source supplied by the host
//! - [`LayoutOptions`] - orientation, gaps and edge style
//!
//! Layout is always recomputed from scratch; it never patches a previous
//! result.

mod contour;
mod flex_tree;
mod measure;
mod options;

pub use flex_tree::layout;
pub use measure::{DefaultSizes, NodeMeasurer};
pub use options::{EdgeStyle, LayoutOptions, Orientation};

use crate::models::{LayoutPoint, NodeId, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An axis-aligned rectangle in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_center(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x + self.width / 2.0,
            y: self.y,
        }
    }

    pub fn bottom_center(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x + self.width / 2.0,
            y: self.bottom(),
        }
    }

    pub fn left_middle(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn right_middle(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.right(),
            y: self.y + self.height / 2.0,
        }
    }

    /// Whether the interiors of the two rectangles intersect
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Bounding union of two rectangles
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Polyline from a parent's anchor to one child's anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRoute {
    pub from: NodeId,
    pub to: NodeId,
    pub points: Vec<LayoutPoint>,
}

/// Output of one layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub orientation: Orientation,
    pub positions: BTreeMap<NodeId, LayoutRect>,
    pub edges: Vec<EdgeRoute>,
    pub bounds: LayoutRect,
}

impl LayoutResult {
    pub fn rect(&self, id: &str) -> Option<&LayoutRect> {
        self.positions.get(id)
    }
}
