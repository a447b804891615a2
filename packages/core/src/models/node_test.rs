//! Tests for Node, Payload and id derivation

#[cfg(test)]
mod tests {
    use crate::models::{derive_node_id, Alignment, Node, NodeType, Payload, StatItem};

    fn section(title: &str) -> Payload {
        Payload::Section {
            title: title.to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_payload_determines_node_type() {
        assert_eq!(section("Intro").node_type(), NodeType::Section);
        assert_eq!(
            Payload::ListItem {
                text: "A".to_string(),
                ordered: false,
                checked: None,
            }
            .node_type(),
            NodeType::List
        );
        assert_eq!(
            Payload::Malformed {
                reason: "unterminated code fence".to_string(),
                raw: "```".to_string(),
            }
            .node_type(),
            NodeType::Component
        );
    }

    #[test]
    fn test_new_node_gets_random_id() {
        let a = Node::new(section("A"));
        let b = Node::new(section("A"));

        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
        assert!(a.is_leaf());
        assert!(a.parent_id.is_none());
        assert!(a.position.is_none());
    }

    #[test]
    fn test_derived_id_is_deterministic() {
        let payload = section("Intro");
        let first = derive_node_id(NodeType::Section, &[0], &payload);
        let second = derive_node_id(NodeType::Section, &[0], &payload);

        assert_eq!(first, second);
        assert_ne!(first, derive_node_id(NodeType::Section, &[1], &payload));
        assert_ne!(first, derive_node_id(NodeType::Section, &[0], &section("Other")));
    }

    #[test]
    fn test_with_text_keeps_other_fields() {
        let item = Payload::ListItem {
            text: "old".to_string(),
            ordered: true,
            checked: Some(false),
        };

        assert_eq!(
            item.with_text("new"),
            Some(Payload::ListItem {
                text: "new".to_string(),
                ordered: true,
                checked: Some(false),
            })
        );
    }

    #[test]
    fn test_structured_payloads_have_no_text_field() {
        let stats = Payload::Stats {
            items: vec![StatItem {
                label: "Users".to_string(),
                value: "42".to_string(),
            }],
        };

        assert_eq!(stats.text(), "Users: 42");
        assert!(stats.with_text("x").is_none());
    }

    #[test]
    fn test_accepts_child_rules() {
        assert!(NodeType::Root.accepts_child(NodeType::Section));
        assert!(NodeType::Section.accepts_child(NodeType::Table));
        assert!(NodeType::List.accepts_child(NodeType::List));
        assert!(!NodeType::List.accepts_child(NodeType::Section));
        assert!(!NodeType::Code.accepts_child(NodeType::List));
        assert!(!NodeType::Section.accepts_child(NodeType::Root));
    }

    #[test]
    fn test_node_serializes_with_tagged_payload() {
        let node = Node::new_with_id("n1", section("Intro"));
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["id"], "n1");
        assert_eq!(json["payload"]["kind"], "section");
        assert_eq!(json["payload"]["title"], "Intro");
        assert!(json.get("position").is_none());

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    fn component(name: &str, attrs: &str) -> Payload {
        Payload::Component {
            name: name.to_string(),
            attrs: attrs.to_string(),
            body: String::new(),
        }
    }

    fn stats(label: &str, value: &str) -> Payload {
        Payload::Stats {
            items: vec![StatItem {
                label: label.to_string(),
                value: value.to_string(),
            }],
        }
    }

    #[test]
    fn test_validate_accepts_representable_payloads() {
        let valid = [
            section("a b"),
            Payload::Root {
                body: "One\ntwo\n\nThree".to_string(),
            },
            Payload::ListItem {
                text: "first\n\nsecond".to_string(),
                ordered: true,
                checked: Some(false),
            },
            component("widget", "size=2"),
            component("stats", "wide"),
            component("Math", "inline"),
            stats("uptime", "12:30"),
            stats("", ""),
            Payload::Code {
                language: None,
                code: "  indented\n\n\n".to_string(),
            },
            Payload::Table {
                header: vec!["a|b".to_string(), String::new()],
                alignments: vec![Alignment::Left, Alignment::None],
                rows: vec![vec![String::new(), "x".to_string()]],
            },
            Payload::Math {
                tex: "$$\n".to_string(),
            },
            Payload::Malformed {
                reason: "unterminated code fence".to_string(),
                raw: "```\n  x".to_string(),
            },
        ];
        for payload in valid {
            assert_eq!(payload.validate(), Ok(()), "{:?}", payload);
        }
    }

    #[test]
    fn test_validate_rejects_unreadable_fields() {
        let invalid = [
            component("chart", ""),
            component("CHART", "type=bar"),
            component("", ""),
            component("my widget", ""),
            component("9lives", ""),
            component("error", ""),
            component("math", ""),
            component("stats", ""),
            component("widget", "a\nb"),
            Payload::Code {
                language: Some("rust\nfn".to_string()),
                code: String::new(),
            },
            Payload::Code {
                language: Some(String::new()),
                code: String::new(),
            },
            Payload::Code {
                language: Some(" rust".to_string()),
                code: String::new(),
            },
            stats("a:b", "1"),
            stats("a", "1\n2"),
            Payload::Table {
                header: Vec::new(),
                alignments: Vec::new(),
                rows: Vec::new(),
            },
            Payload::Table {
                header: vec!["a".to_string()],
                alignments: Vec::new(),
                rows: Vec::new(),
            },
            Payload::Table {
                header: vec!["a".to_string()],
                alignments: vec![Alignment::None],
                rows: vec![vec!["1".to_string(), "2".to_string()]],
            },
            Payload::Table {
                header: vec!["a\nb".to_string()],
                alignments: vec![Alignment::None],
                rows: Vec::new(),
            },
            section("a\nb"),
            section(" padded"),
            Payload::Section {
                title: "t".to_string(),
                body: "a\n\n\nb".to_string(),
            },
            Payload::ListItem {
                text: "  indented".to_string(),
                ordered: false,
                checked: None,
            },
            Payload::Blockquote {
                text: "a\r\nb".to_string(),
            },
            Payload::Malformed {
                reason: "two\nlines".to_string(),
                raw: String::new(),
            },
        ];
        for payload in invalid {
            assert!(payload.validate().is_err(), "{:?}", payload);
        }
    }
}
