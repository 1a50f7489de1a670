//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random sources,
//! property paths and schemas for property testing.

#![cfg(test)]

use crate::schema::{Action, Schema};
use proptest::collection::{hash_map, vec};
use proptest::prelude::*;
use serde_json::Value;

/// Strategy for generating JSON values with controlled depth
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Value::Array),
            hash_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for generating source objects
pub fn source_strategy() -> impl Strategy<Value = Value> {
    hash_map("[a-z]{1,6}", json_value_strategy(), 0..6)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

/// Strategy for generating a single path segment, named or index
pub fn segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z][a-z0-9_]{0,6}",
        1 => (0usize..4).prop_map(|index| index.to_string()),
    ]
}

/// Strategy for generating dotted property paths
pub fn path_strategy() -> impl Strategy<Value = String> {
    vec(segment_strategy(), 1..4).prop_map(|segments| segments.join("."))
}

/// Strategy for generating actions that compute a value on their own
pub fn leaf_action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        path_strategy().prop_map(Action::Path),
        vec(path_strategy(), 0..3).prop_map(Action::aggregate),
    ]
}

/// Strategy for generating schemas with at most one level of nesting
pub fn schema_strategy() -> impl Strategy<Value = Schema> {
    let action = prop_oneof![
        3 => leaf_action_strategy(),
        1 => hash_map("[a-z]{1,6}", leaf_action_strategy(), 1..3)
            .prop_map(|entries| Action::Object(entries.into_iter().collect())),
    ];
    hash_map("[a-z]{1,6}", action, 0..5).prop_map(|entries| entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SchemaTree;

    proptest! {
        #[test]
        fn test_path_strategy_generates_non_empty_segments(path in path_strategy()) {
            assert!(path.split('.').all(|segment| !segment.is_empty()));
        }

        #[test]
        fn test_schema_strategy_generates_valid_schemas(schema in schema_strategy()) {
            assert!(SchemaTree::parse(&schema).is_ok());
        }

        #[test]
        fn test_source_strategy_generates_objects(source in source_strategy()) {
            assert!(source.is_object());
        }
    }
}
