//! Flex-tree placement.
//!
//! Tidy tree layout generalized to nodes of different sizes. The algorithm
//! works on two abstract axes, *breadth* (siblings spread along it) and
//! *depth* (generations stack along it), and only maps them to x/y at the end:
//!
//! 1. Bottom-up: every subtree gets a footprint (left and right contour)
//!    relative to its own root.
//! 2. Siblings are pushed apart until their contours keep `sibling_gap`.
//! 3. The parent is centred over the span of its children, which start at
//!    `parent depth + parent depth extent + level_gap`.
//! 4. Top-down: relative offsets are accumulated into absolute positions and
//!    the drawing is translated to start at the origin.
//! 5. Orientation maps (breadth, depth) to (x, y) or (y, x).
//!
//! Nothing depends on visitation order or timing: identical structure and
//! sizes give bit-identical output.

use super::contour::{Contour, Side};
use super::measure::{resolve_size, NodeMeasurer};
use super::options::{EdgeStyle, LayoutOptions, Orientation};
use super::{EdgeRoute, LayoutRect, LayoutResult};
use crate::models::{LayoutPoint, NodeId, Size, Tree};
use std::collections::{BTreeMap, HashMap};

/// Node extent on the abstract axes
#[derive(Debug, Clone, Copy)]
struct Extent {
    breadth: f64,
    depth: f64,
}

/// Left/right profile of a subtree relative to its root (centre, top)
struct Footprint {
    left: Contour,
    right: Contour,
}

/// Offset of a child's centre/top from its parent's centre/top
#[derive(Debug, Clone, Copy, Default)]
struct Offset {
    breadth: f64,
    depth: f64,
}

/// Lay out `tree` and return absolute boxes plus edge routes.
///
/// `measurer` is consulted once per node; `None` answers fall back to the
/// style registry, degenerate answers are clamped to
/// `options.min_node_extent`.
pub fn layout<M: NodeMeasurer + ?Sized>(
    tree: &Tree,
    measurer: &M,
    options: &LayoutOptions,
) -> LayoutResult {
    let options = &options.sanitized();
    let order = tree.preorder();

    let sizes: HashMap<&NodeId, Size> = order
        .iter()
        .filter_map(|id| tree.get(id).map(|node| (id, node)))
        .map(|(id, node)| (id, resolve_size(measurer, node, options.min_node_extent)))
        .collect();

    let extent_of = |id: &NodeId| -> Extent {
        let size = sizes.get(id).copied().unwrap_or_default();
        match options.orientation {
            Orientation::TopDown => Extent {
                breadth: size.width,
                depth: size.height,
            },
            Orientation::LeftRight => Extent {
                breadth: size.height,
                depth: size.width,
            },
        }
    };

    // Bottom-up pass: reversed pre-order visits every child before its parent
    let mut footprints: HashMap<&NodeId, Footprint> = HashMap::new();
    let mut offsets: HashMap<&NodeId, Offset> = HashMap::new();

    for id in order.iter().rev() {
        let extent = extent_of(id);
        let half = extent.breadth / 2.0;
        let mut left = Contour::single(Side::Left, 0.0, extent.depth, -half);
        let mut right = Contour::single(Side::Right, 0.0, extent.depth, half);

        let children = tree.children_of(id);
        if !children.is_empty() {
            let child_depth = extent.depth + options.level_gap;

            // Place children left to right, each as close as the contours allow
            let mut centres: Vec<f64> = Vec::with_capacity(children.len());
            let mut forest: Option<Footprint> = None;
            for child_id in children {
                let child = footprints.remove(child_id).unwrap_or_else(|| {
                    let e = extent_of(child_id);
                    Footprint {
                        left: Contour::single(Side::Left, 0.0, e.depth, -e.breadth / 2.0),
                        right: Contour::single(Side::Right, 0.0, e.depth, e.breadth / 2.0),
                    }
                });
                let child_left = child.left.shifted(0.0, child_depth);
                let child_right = child.right.shifted(0.0, child_depth);

                let centre = match forest.as_mut() {
                    None => {
                        forest = Some(Footprint {
                            left: child_left,
                            right: child_right,
                        });
                        0.0
                    }
                    Some(placed) => {
                        let previous = centres.last().copied().unwrap_or(0.0);
                        let shift =
                            Contour::separation(&placed.right, &child_left, options.sibling_gap)
                                .unwrap_or(previous);
                        placed.left.merge(&child_left.shifted(shift, 0.0));
                        placed.right.merge(&child_right.shifted(shift, 0.0));
                        shift
                    }
                };
                centres.push(centre);
            }

            // Centre the parent over the outer edges of its first and last child
            let first = extent_of(&children[0]);
            let last = extent_of(&children[children.len() - 1]);
            let span_lo = centres[0] - first.breadth / 2.0;
            let span_hi = centres[centres.len() - 1] + last.breadth / 2.0;
            let mid = (span_lo + span_hi) / 2.0;

            for (child_id, centre) in children.iter().zip(centres.iter()) {
                offsets.insert(
                    child_id,
                    Offset {
                        breadth: centre - mid,
                        depth: child_depth,
                    },
                );
            }

            if let Some(placed) = forest {
                left.merge(&placed.left.shifted(-mid, 0.0));
                right.merge(&placed.right.shifted(-mid, 0.0));
            }
        }

        footprints.insert(id, Footprint { left, right });
    }

    // Top-down pass: accumulate offsets into absolute centre/top coordinates
    let mut absolute: HashMap<&NodeId, Offset> = HashMap::with_capacity(order.len());
    for id in &order {
        let here = match tree.get(id).and_then(|n| n.parent_id.as_ref()) {
            Some(parent_id) => {
                let parent = absolute.get(parent_id).copied().unwrap_or_default();
                let offset = offsets.get(id).copied().unwrap_or_default();
                Offset {
                    breadth: parent.breadth + offset.breadth,
                    depth: parent.depth + offset.depth,
                }
            }
            None => Offset::default(),
        };
        absolute.insert(id, here);
    }

    // Translate so the drawing starts at the origin
    let min_breadth = order
        .iter()
        .map(|id| absolute[id].breadth - extent_of(id).breadth / 2.0)
        .fold(f64::INFINITY, f64::min);
    let min_depth = order
        .iter()
        .map(|id| absolute[id].depth)
        .fold(f64::INFINITY, f64::min);
    let (min_breadth, min_depth) = if order.is_empty() {
        (0.0, 0.0)
    } else {
        (min_breadth, min_depth)
    };

    let mut positions = BTreeMap::new();
    for id in &order {
        let extent = extent_of(id);
        let at = absolute[id];
        let breadth = at.breadth - extent.breadth / 2.0 - min_breadth;
        let depth = at.depth - min_depth;
        let rect = match options.orientation {
            Orientation::TopDown => LayoutRect::new(breadth, depth, extent.breadth, extent.depth),
            Orientation::LeftRight => LayoutRect::new(depth, breadth, extent.depth, extent.breadth),
        };
        positions.insert(id.clone(), rect);
    }

    let edges = route_edges(tree, &order, &positions, options);
    let bounds = positions
        .values()
        .copied()
        .reduce(|acc, rect| acc.union(&rect))
        .unwrap_or_default();

    tracing::debug!(
        nodes = positions.len(),
        width = bounds.width,
        height = bounds.height,
        "Layout computed"
    );

    LayoutResult {
        orientation: options.orientation,
        positions,
        edges,
        bounds,
    }
}

/// Build one route per parent → child link, in document order
fn route_edges(
    tree: &Tree,
    order: &[NodeId],
    positions: &BTreeMap<NodeId, LayoutRect>,
    options: &LayoutOptions,
) -> Vec<EdgeRoute> {
    let mut edges = Vec::new();
    for parent_id in order {
        let Some(parent) = positions.get(parent_id) else {
            continue;
        };
        for child_id in tree.children_of(parent_id) {
            let Some(child) = positions.get(child_id) else {
                continue;
            };
            let (from, to) = match options.orientation {
                Orientation::TopDown => (parent.bottom_center(), child.top_center()),
                Orientation::LeftRight => (parent.right_middle(), child.left_middle()),
            };
            let points = match (options.edge_style, options.orientation) {
                (EdgeStyle::Straight, _) => vec![from, to],
                (EdgeStyle::Orthogonal, Orientation::TopDown) => {
                    let mid = from.y + (to.y - from.y) / 2.0;
                    vec![
                        from,
                        LayoutPoint { x: from.x, y: mid },
                        LayoutPoint { x: to.x, y: mid },
                        to,
                    ]
                }
                (EdgeStyle::Orthogonal, Orientation::LeftRight) => {
                    let mid = from.x + (to.x - from.x) / 2.0;
                    vec![
                        from,
                        LayoutPoint { x: mid, y: from.y },
                        LayoutPoint { x: mid, y: to.y },
                        to,
                    ]
                }
            };
            edges.push(EdgeRoute {
                from: parent_id.clone(),
                to: child_id.clone(),
                points,
            });
        }
    }
    edges
}

#[cfg(test)]
#[path = "flex_tree_test.rs"]
mod flex_tree_test;
