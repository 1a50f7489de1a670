//! Tests for the schema tree compiler

use super::*;
use crate::schema::Selector;
use crate::validation::{Validation, ValidationError};
use serde_json::{json, Value};

fn run(node: &SchemaNode, object: &Value) -> (Option<Value>, Vec<ValidationError>) {
    let items = vec![object.clone()];
    let target = json!({});
    let input = ActionInput {
        object,
        items: &items,
        object_to_compute: &target,
    };
    let mut errors = Vec::new();
    let value = (node.prepared_action().expect("action node"))(&input, &mut errors).unwrap();
    (value, errors)
}

fn paths(tree: &SchemaTree) -> Vec<&str> {
    tree.traverse_bfs().map(SchemaNode::target_property_path).collect()
}

#[test]
fn test_root_is_synthetic() {
    let tree = SchemaTree::new();
    assert_eq!(tree.root().property_name(), ROOT_NAME);
    assert_eq!(tree.root().target_property_path(), "");
    assert_eq!(tree.root().kind(), NodeKind::Root);
    assert!(tree.is_empty());
    assert_eq!(tree.traverse_bfs().count(), 0);
}

#[test]
fn test_parse_visits_level_by_level() {
    let schema = Schema::new()
        .entry("a", Schema::new().entry("b", Schema::new().entry("c", "x")).entry("d", "y"))
        .entry("e", "z");
    let tree = SchemaTree::parse(&schema).unwrap();

    assert_eq!(paths(&tree), vec!["a", "e", "a.b", "a.d", "a.b.c"]);
    let kinds: Vec<_> = tree.traverse_bfs().map(SchemaNode::kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Property,
            NodeKind::ActionString,
            NodeKind::Property,
            NodeKind::ActionString,
            NodeKind::ActionString,
        ]
    );

    let leaf = tree.node(tree.find("a.b.c").unwrap()).unwrap();
    assert_eq!(leaf.property_name(), "c");
    let parent = tree.node(leaf.parent().unwrap()).unwrap();
    assert_eq!(parent.target_property_path(), "a.b");
    assert_eq!(parent.children().len(), 1);
    assert!(parent.prepared_action().is_none());
    assert!(parent.action().is_none());
}

#[test]
fn test_parse_nested_lists_use_indices() {
    let schema = Schema::new().entry(
        "items",
        vec![
            Action::from(Schema::new().entry("id", "first.id")),
            Action::from(Schema::new().entry("id", "second.id")),
        ],
    );
    let tree = SchemaTree::parse(&schema).unwrap();
    assert_eq!(paths(&tree), vec!["items", "items.0", "items.1", "items.0.id", "items.1.id"]);
}

#[test]
fn test_parse_rejects_invalid_leaves() {
    let schema = Schema::new().entry("a", Schema::new().entry("b", Schema::new()));
    let err = SchemaTree::parse(&schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "A value of a schema property can't be an empty object. Value {} found for property b"
    );

    let schema = Schema::new().entry("a", Action::Literal(json!(42)));
    let err = SchemaTree::parse(&schema).unwrap_err();
    assert_eq!(err.to_string(), "The action specified for a is not supported.");
}

#[test]
fn test_duplicate_target_path() {
    let schema = Schema::new()
        .entry("a.b", "x")
        .entry("a", Schema::new().entry("b", "y"));
    let err = SchemaTree::parse(&schema).unwrap_err();
    assert!(matches!(err, Error::DuplicatePath { ref path } if path == "a.b"));
}

#[test]
fn test_add_under_parent_path() {
    let mut tree = SchemaTree::new();
    tree.add(NodeData::property("user"), None).unwrap();
    let id = tree.add(NodeData::action("name", "source.name"), Some("user")).unwrap();

    let node = tree.node(id).unwrap();
    assert_eq!(node.target_property_path(), "user.name");
    assert_eq!(node.kind(), NodeKind::ActionString);

    let err = tree.add(NodeData::action("x", "y"), Some("missing")).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_add_rejects_nested_schema() {
    let mut tree = SchemaTree::new();
    let err = tree
        .add(NodeData::action("a", Schema::new().entry("b", "c")), None)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAction { ref property } if property == "a"));
    assert_eq!(tree.len(), 1);

    let mixed = Action::List(vec![Action::from("x"), Action::from(Schema::new().entry("y", "z"))]);
    let err = tree.add(NodeData::action("m", mixed), None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedAction { .. }));
    assert!(tree.find("m").is_none());
}

#[test]
fn test_prepared_string_and_aggregator() {
    let schema = Schema::new()
        .entry("city", "address.city")
        .entry("user", vec!["firstName", "address.city", "missing"]);
    let tree = SchemaTree::parse(&schema).unwrap();
    let source = json!({ "firstName": "John", "address": { "city": "NY" } });

    let nodes: Vec<_> = tree.traverse_bfs().collect();
    assert_eq!(run(nodes[0], &source).0, Some(json!("NY")));
    assert_eq!(
        run(nodes[1], &source).0,
        Some(json!({ "firstName": "John", "address": { "city": "NY" } }))
    );
}

#[test]
fn test_prepared_function_receives_item_and_collection() {
    let schema = Schema::new().entry(
        "summary",
        Action::function(|item, items, _| {
            Ok(Some(json!(format!("{}/{}", item["id"], items.len()))))
        }),
    );
    let tree = SchemaTree::parse(&schema).unwrap();
    let node = tree.traverse_bfs().next().unwrap();
    assert_eq!(run(node, &json!({ "id": 7 })).0, Some(json!("7/1")));
}

#[test]
fn test_prepared_selector_without_path_reads_whole_item() {
    let schema = Schema::new().entry(
        "keys",
        Selector::new().map(|value, _, _, _| {
            Ok(value.and_then(|v| v.as_object().map(|o| json!(o.len()))))
        }),
    );
    let tree = SchemaTree::parse(&schema).unwrap();
    let node = tree.traverse_bfs().next().unwrap();
    assert_eq!(run(node, &json!({ "a": 1, "b": 2 })).0, Some(json!(2)));
}

#[test]
fn test_selector_error_names_target_property() {
    let schema = Schema::new().entry(
        "city",
        Selector::at("address.city")
            .map_named("explode", |_, _, _, _| Err(anyhow::anyhow!("boom"))),
    );
    let tree = SchemaTree::parse(&schema).unwrap();
    let node = tree.traverse_bfs().next().unwrap();

    let source = json!({});
    let items = vec![source.clone()];
    let input = ActionInput {
        object: &source,
        items: &items,
        object_to_compute: &source,
    };
    let err = (node.prepared_action().unwrap())(&input, &mut Vec::new()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("[city]"));
    assert!(message.contains("[explode]"));
    assert!(message.contains("[address.city]"));
    assert!(message.contains("boom"));
}

#[test]
fn test_selector_validation_feeds_sink() {
    let schema = Schema::new()
        .entry("age", Selector::at("age").validate_with(Validation::number()))
        .entry("name", Selector::at("name").validate_with(Validation::string().max(3)));
    let tree = SchemaTree::parse(&schema).unwrap();
    let source = json!({ "age": "42", "name": "Johnny" });
    let nodes: Vec<_> = tree.traverse_bfs().collect();

    let (value, errors) = run(nodes[0], &source);
    assert_eq!(value, Some(json!(42)));
    assert!(errors.is_empty());

    let (value, errors) = run(nodes[1], &source);
    assert_eq!(value, Some(json!("Johnny")));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].target_property, "name");
}

#[test]
fn test_duplicate_validator_rule_fails_compilation() {
    let schema = Schema::new().entry(
        "a",
        Selector::at("a").validate_with(Validation::string().min(1).min(2)),
    );
    let err = SchemaTree::parse(&schema).unwrap_err();
    assert!(err.to_string().contains("Rule min has already been used"));
}
