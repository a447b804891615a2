//! Node measurement seam.
//!
//! Pixel measurement belongs to the host (it knows fonts and rendering). The
//! engine asks through [`NodeMeasurer`] and falls back to the style registry
//! when the host has no answer. Nothing is cached here; a measurer that wants
//! caching keeps its own.

use crate::models::{Node, Size};
use crate::styles::style_of;

/// Supplies the rendered size of a node
pub trait NodeMeasurer {
    /// Rendered width/height of `node`, or `None` to use the registry default
    fn measure(&self, node: &Node) -> Option<Size>;
}

impl<F> NodeMeasurer for F
where
    F: Fn(&Node) -> Option<Size>,
{
    fn measure(&self, node: &Node) -> Option<Size> {
        self(node)
    }
}

/// Measurer that always answers with the registry's default size
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSizes;

impl NodeMeasurer for DefaultSizes {
    fn measure(&self, node: &Node) -> Option<Size> {
        Some(style_of(node.node_type()).default_size)
    }
}

/// Resolve the size of `node`, clamping degenerate values to `min_extent`
pub(crate) fn resolve_size<M: NodeMeasurer + ?Sized>(
    measurer: &M,
    node: &Node,
    min_extent: f64,
) -> Size {
    let measured = measurer
        .measure(node)
        .unwrap_or_else(|| style_of(node.node_type()).default_size);

    let clamp = |value: f64, axis: &str| {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            tracing::warn!(
                node_id = %node.id,
                node_type = %node.node_type(),
                "Degenerate {} {} clamped to {}",
                axis,
                value,
                min_extent
            );
            min_extent
        }
    };

    Size::new(clamp(measured.width, "width"), clamp(measured.height, "height"))
}
