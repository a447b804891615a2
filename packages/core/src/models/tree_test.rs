//! Tests for the Tree arena

#[cfg(test)]
mod tests {
    use crate::markdown::parse;
    use crate::models::{Node, NodeType, Payload, Tree, TreeError};

    fn item(text: &str) -> Node {
        Node::new(Payload::ListItem {
            text: text.to_string(),
            ordered: false,
            checked: None,
        })
    }

    fn section(title: &str) -> Node {
        Node::new(Payload::Section {
            title: title.to_string(),
            body: String::new(),
        })
    }

    #[test]
    fn test_empty_tree_has_only_root() {
        let tree = Tree::empty();

        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.root().node_type(), NodeType::Root);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_and_placement() {
        let mut tree = Tree::empty();
        let root_id = tree.root_id().clone();
        let a = item("A");
        let b = item("B");
        let (a_id, b_id) = (a.id.clone(), b.id.clone());

        tree.insert_node(&root_id, 0, a);
        tree.insert_node(&root_id, 0, b);

        assert_eq!(tree.children_of(&root_id), &[b_id.clone(), a_id.clone()]);
        assert_eq!(tree.placement_of(&a_id), Some((root_id.clone(), 1)));
        assert_eq!(tree.get(&a_id).unwrap().parent_id.as_deref(), Some(root_id.as_str()));
        assert_eq!(tree.placement_of(&root_id), None);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_subtree_queries() {
        let tree = parse("# A\n\n- x\n  - y\n\n## B\n");
        let root_id = tree.root_id().clone();
        let a = tree.children_of(&root_id)[0].clone();
        let x = tree.children_of(&a)[0].clone();
        let y = tree.children_of(&x)[0].clone();
        let b = tree.children_of(&a)[1].clone();

        assert!(tree.is_in_subtree(&a, &y));
        assert!(tree.is_in_subtree(&x, &x));
        assert!(!tree.is_in_subtree(&x, &b));
        assert_eq!(tree.section_depth(&a), 0);
        assert_eq!(tree.section_depth(&b), 1);
        assert_eq!(tree.section_depth(&y), 1);
        assert_eq!(tree.preorder(), vec![root_id, a, x, y, b]);
    }

    #[test]
    fn test_take_and_restore_subtree_is_exact() {
        let mut tree = parse("- a\n  - b\n  - c\n- d\n");
        let original = tree.clone();
        let root_id = tree.root_id().clone();
        let a = tree.children_of(&root_id)[0].clone();

        let removed = tree.take_subtree(&a);
        assert_eq!(removed.len(), 3);
        assert_eq!(removed[0].id, a);
        assert!(removed[0].parent_id.is_none());
        assert_eq!(tree.len(), 2);
        assert!(tree.validate().is_ok());

        tree.restore_subtree(&root_id, 0, removed);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_detach_attach_round_trip() {
        let mut tree = parse("- a\n- b\n- c\n");
        let original = tree.clone();
        let root_id = tree.root_id().clone();
        let b = tree.children_of(&root_id)[1].clone();

        let placement = tree.detach(&b).unwrap();
        assert_eq!(placement, (root_id.clone(), 1));
        assert_eq!(tree.children_of(&root_id).len(), 2);

        tree.attach(&b, &placement.0, placement.1);
        assert_eq!(tree, original);
    }

    #[test]
    fn test_validate_rejects_illegal_child() {
        let mut tree = Tree::empty();
        let root_id = tree.root_id().clone();
        let list = item("A");
        let list_id = list.id.clone();
        tree.insert_node(&root_id, 0, list);
        tree.insert_node(&list_id, 0, section("Nope"));

        assert!(matches!(
            tree.validate(),
            Err(TreeError::IllegalChild {
                parent_type: NodeType::List,
                child_type: NodeType::Section,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_content_after_section() {
        let mut tree = Tree::empty();
        let root_id = tree.root_id().clone();
        tree.insert_node(&root_id, 0, section("S"));
        tree.insert_node(&root_id, 1, item("late"));

        assert!(matches!(tree.validate(), Err(TreeError::SectionOrder { .. })));
    }

    #[test]
    fn test_validate_rejects_parent_mismatch() {
        let mut tree = parse("- a\n- b\n");
        let root_id = tree.root_id().clone();
        let a = tree.children_of(&root_id)[0].clone();
        tree.node_mut(&a).unwrap().parent_id = Some("elsewhere".to_string());

        assert!(matches!(tree.validate(), Err(TreeError::ParentMismatch { .. })));
    }

    #[test]
    fn test_structural_equality_ignores_ids_and_geometry() {
        let mut left = parse("# A\n\n- x\n");
        let right = parse("# A\n- x\n");
        let root_id = left.root_id().clone();
        left.node_mut(&root_id).unwrap().position = Some(Default::default());

        assert!(left.structurally_eq(&right));
        assert!(!left.structurally_eq(&parse("# A\n\n- y\n")));
        assert!(!left.structurally_eq(&parse("# A\n")));
    }

    #[test]
    fn test_clear_geometry() {
        let mut tree = parse("- a\n");
        let root_id = tree.root_id().clone();
        tree.node_mut(&root_id).unwrap().size = Some(crate::models::Size::new(1.0, 1.0));

        tree.clear_geometry();
        assert!(tree.nodes().all(|n| n.size.is_none() && n.position.is_none()));
    }

    #[test]
    fn test_validate_rejects_unreadable_payload() {
        let mut tree = parse("# A\n");
        let root_id = tree.root_id().clone();
        let a = tree.children_of(&root_id)[0].clone();
        tree.replace_payload(
            &a,
            Payload::Section {
                title: "a\nb".to_string(),
                body: String::new(),
            },
        );

        assert!(matches!(tree.validate(), Err(TreeError::InvalidPayload { node_id, .. }) if node_id == a));
    }

    #[test]
    fn test_deserialize_validates() {
        let tree = parse("# A\n\n- x\n");
        let json = serde_json::to_value(&tree).unwrap();
        let back: Tree = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, tree);

        assert!(serde_json::from_str::<Tree>(r#"{"rootId":"r","nodes":{}}"#).is_err());

        let mut rootless = json.clone();
        let root_id = tree.root_id().clone();
        rootless["nodes"].as_object_mut().unwrap().remove(&root_id);
        assert!(serde_json::from_value::<Tree>(rootless).is_err());

        let mut misfiled = json;
        let nodes = misfiled["nodes"].as_object_mut().unwrap();
        let entry = nodes.remove(&root_id).unwrap();
        nodes.insert("other".to_string(), entry);
        misfiled["rootId"] = serde_json::Value::from("other");
        assert!(serde_json::from_value::<Tree>(misfiled).is_err());
    }
}
