//! Tests for flex-tree layout

#[cfg(test)]
mod tests {
    use crate::layout::{layout, DefaultSizes, EdgeStyle, LayoutOptions, LayoutRect, Orientation};
    use crate::markdown::parse;
    use crate::models::{LayoutPoint, Node, NodeId, Payload, Size, Tree};

    /// root 100x40 -> A 80x30 -> B 60x20
    fn chain() -> (Tree, impl Fn(&Node) -> Option<Size>) {
        let tree = parse("# A\n\n## B\n");
        let measurer = |node: &Node| match &node.payload {
            Payload::Root { .. } => Some(Size::new(100.0, 40.0)),
            Payload::Section { title, .. } if title == "A" => Some(Size::new(80.0, 30.0)),
            Payload::Section { .. } => Some(Size::new(60.0, 20.0)),
            _ => None,
        };
        (tree, measurer)
    }

    fn ids(tree: &Tree) -> (NodeId, NodeId, NodeId) {
        let root = tree.root_id().clone();
        let a = tree.children_of(&root)[0].clone();
        let b = tree.children_of(&a)[0].clone();
        (root, a, b)
    }

    /// Measurer with sizes that differ per node so contours get uneven
    fn uneven(node: &Node) -> Option<Size> {
        let text = node.payload.text();
        Some(Size::new(
            20.0 + 7.0 * text.len() as f64,
            20.0 + 10.0 * node.children.len() as f64,
        ))
    }

    const UNEVEN_DOCUMENT: &str = "# Alpha\n\n- one\n  - a much longer nested item\n  - x\n- two\n\n## Beta\n\n- b\n  - c\n    - deeply nested and rather wide\n\n## Gamma\n\n```\ncode\n```\n\n> q\n";

    #[test]
    fn test_three_node_chain() {
        let (tree, measurer) = chain();
        let (root, a, b) = ids(&tree);
        let result = layout(&tree, &measurer, &LayoutOptions::default().with_gaps(20.0, 40.0));

        assert_eq!(result.rect(&root), Some(&LayoutRect::new(0.0, 0.0, 100.0, 40.0)));
        assert_eq!(result.rect(&a), Some(&LayoutRect::new(10.0, 80.0, 80.0, 30.0)));
        assert_eq!(result.rect(&b), Some(&LayoutRect::new(20.0, 150.0, 60.0, 20.0)));
        assert_eq!(result.bounds, LayoutRect::new(0.0, 0.0, 100.0, 170.0));
    }

    #[test]
    fn test_left_right_swaps_axes() {
        let (tree, measurer) = chain();
        let (root, a, b) = ids(&tree);
        let options = LayoutOptions::default().with_orientation(Orientation::LeftRight);
        let result = layout(&tree, &measurer, &options);

        assert_eq!(result.orientation, Orientation::LeftRight);
        assert_eq!(result.rect(&root), Some(&LayoutRect::new(0.0, 0.0, 100.0, 40.0)));
        assert_eq!(result.rect(&a), Some(&LayoutRect::new(140.0, 5.0, 80.0, 30.0)));
        assert_eq!(result.rect(&b), Some(&LayoutRect::new(260.0, 10.0, 60.0, 20.0)));
    }

    #[test]
    fn test_siblings_keep_gap_and_parent_is_centred() {
        let tree = parse("- a\n- b\n");
        let measurer = |node: &Node| match &node.payload {
            Payload::Root { .. } => Some(Size::new(100.0, 40.0)),
            _ => Some(Size::new(50.0, 20.0)),
        };
        let result = layout(&tree, &measurer, &LayoutOptions::default());

        let root = result.rect(tree.root_id()).unwrap();
        let children = tree.children_of(tree.root_id());
        let first = result.rect(&children[0]).unwrap();
        let second = result.rect(&children[1]).unwrap();

        assert_eq!(*first, LayoutRect::new(0.0, 80.0, 50.0, 20.0));
        assert_eq!(*second, LayoutRect::new(70.0, 80.0, 50.0, 20.0));
        assert_eq!(second.x - first.right(), 20.0);
        assert_eq!(*root, LayoutRect::new(10.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let tree = parse(UNEVEN_DOCUMENT);
        let options = LayoutOptions::default();

        let first = layout(&tree, &uneven, &options);
        let second = layout(&tree, &uneven, &options);
        let reparsed = layout(&parse(UNEVEN_DOCUMENT), &uneven, &options);

        assert_eq!(first, second);
        assert_eq!(first, reparsed);
    }

    #[test]
    fn test_no_overlap_between_unrelated_nodes() {
        let tree = parse(UNEVEN_DOCUMENT);
        for orientation in [Orientation::TopDown, Orientation::LeftRight] {
            let options = LayoutOptions::default()
                .with_orientation(orientation)
                .with_gaps(15.0, 30.0);
            let result = layout(&tree, &uneven, &options);
            assert_eq!(result.positions.len(), tree.len());

            let order = tree.preorder();
            for (i, a) in order.iter().enumerate() {
                for b in &order[i + 1..] {
                    if tree.is_in_subtree(a, b) || tree.is_in_subtree(b, a) {
                        continue;
                    }
                    let (ra, rb) = (result.positions[a], result.positions[b]);
                    // Compare along the sibling axis when the depth ranges meet
                    let (breadth_a, breadth_b, depth_a, depth_b) = match orientation {
                        Orientation::TopDown => (
                            (ra.x, ra.right()),
                            (rb.x, rb.right()),
                            (ra.y, ra.bottom()),
                            (rb.y, rb.bottom()),
                        ),
                        Orientation::LeftRight => (
                            (ra.y, ra.bottom()),
                            (rb.y, rb.bottom()),
                            (ra.x, ra.right()),
                            (rb.x, rb.right()),
                        ),
                    };
                    if depth_a.0 <= depth_b.1 && depth_b.0 <= depth_a.1 {
                        let gap = (breadth_b.0 - breadth_a.1).max(breadth_a.0 - breadth_b.1);
                        assert!(gap >= 15.0 - 1e-9, "nodes {} and {} are only {} apart", a, b, gap);
                    }
                    assert!(!ra.intersects(&rb));
                }
            }
        }
    }

    #[test]
    fn test_degenerate_sizes_are_clamped() {
        let tree = parse("- a\n");
        let measurer = |node: &Node| match &node.payload {
            Payload::ListItem { .. } => Some(Size::new(0.0, f64::NAN)),
            _ => None,
        };
        let mut options = LayoutOptions::default();
        options.min_node_extent = 4.0;
        let result = layout(&tree, &measurer, &options);

        let item = &tree.children_of(tree.root_id())[0];
        let rect = result.rect(item).unwrap();
        assert_eq!((rect.width, rect.height), (4.0, 4.0));
    }

    #[test]
    fn test_unusable_options_never_produce_nan() {
        let tree = parse(UNEVEN_DOCUMENT);
        let mut options = LayoutOptions::default();
        options.sibling_gap = f64::NAN;
        options.level_gap = f64::INFINITY;
        options.min_node_extent = -5.0;
        let measurer = |_: &Node| Some(Size::new(-1.0, 0.0));

        let result = layout(&tree, &measurer, &options);
        let fallback = layout(&tree, &measurer, &options.sanitized());

        assert_eq!(result, fallback);
        for rect in result.positions.values() {
            assert!(rect.x.is_finite() && rect.y.is_finite());
            assert_eq!((rect.width, rect.height), (1.0, 1.0));
        }
        assert!(result.bounds.width.is_finite() && result.bounds.height.is_finite());
    }

    #[test]
    fn test_missing_sizes_fall_back_to_registry() {
        let tree = parse("```\ncode\n```\n");
        let result = layout(&tree, &|_: &Node| -> Option<Size> { None }, &LayoutOptions::default());
        let defaults = layout(&tree, &DefaultSizes, &LayoutOptions::default());

        let code = &tree.children_of(tree.root_id())[0];
        assert_eq!(result.rect(code).unwrap().size(), Size::new(240.0, 96.0));
        assert_eq!(result, defaults);
    }

    #[test]
    fn test_edge_routes() {
        let (tree, measurer) = chain();
        let (root, a, _) = ids(&tree);

        let straight = layout(&tree, &measurer, &LayoutOptions::default());
        assert_eq!(straight.edges.len(), 2);
        assert_eq!(straight.edges[0].from, root);
        assert_eq!(straight.edges[0].to, a);
        assert_eq!(
            straight.edges[0].points,
            vec![LayoutPoint { x: 50.0, y: 40.0 }, LayoutPoint { x: 50.0, y: 80.0 }]
        );

        let options = LayoutOptions::default().with_edge_style(EdgeStyle::Orthogonal);
        let orthogonal = layout(&tree, &measurer, &options);
        assert_eq!(orthogonal.edges[0].points.len(), 4);
        assert_eq!(orthogonal.edges[0].points[1], LayoutPoint { x: 50.0, y: 60.0 });
    }

    #[test]
    fn test_root_only_document() {
        let tree = Tree::empty();
        let result = layout(&tree, &DefaultSizes, &LayoutOptions::default());

        assert_eq!(result.positions.len(), 1);
        assert!(result.edges.is_empty());
        assert_eq!(result.bounds, LayoutRect::new(0.0, 0.0, 200.0, 60.0));
    }
}
