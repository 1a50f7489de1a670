//! Evaluation engine
//!
//! Evaluates a compiled schema tree against one source item in two phases.
//! Every prepared action runs first, in breadth-first order, so each action
//! sees the target as it was before the evaluation started. The computed
//! values are then merged into the target in the same order.
//!
//! A missing value (`None`) never overwrites anything on its own. The merge
//! resolves it with, in order of precedence:
//! 1. the `undefined_values.default` callback, when one is configured and it
//!    returns a value
//! 2. `undefined_values.strip`, which removes the property from the target
//! 3. the value already on the target, if any
//!
//! An explicit `null` is a value and is always written.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::path;
use crate::schema::SchemaOptions;
use crate::tree::{ActionInput, SchemaTree};
use crate::validation::{format_errors, ValidationError};
use crate::{Error, Result};
use log::trace;
use serde_json::Value;

/// Target produced for one source item, with the validation errors
/// collected while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub target: Value,
    pub errors: Vec<ValidationError>,
}

impl Evaluated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluate `tree` for the source item `object` taken from `items`,
/// writing into `target`
pub fn evaluate(
    tree: &SchemaTree,
    options: &SchemaOptions,
    object: &Value,
    items: &[Value],
    mut target: Value,
) -> Result<Evaluated> {
    let mut errors = Vec::new();

    let input = ActionInput {
        object,
        items,
        object_to_compute: &target,
    };
    let mut computed = Vec::with_capacity(tree.len());
    for node in tree.traverse_bfs() {
        if let Some(action) = node.prepared_action() {
            let value = action(&input, &mut errors)?;
            trace!("Computed {} ({}): {:?}", node.target_property_path(), node.kind(), value);
            computed.push((node.target_property_path(), value));
        }
    }

    for (target_property, value) in computed {
        merge(&mut target, options, target_property, value);

        if options.validation.throw && !errors.is_empty() {
            return Err(Error::Validation {
                message: format_errors(&errors),
                errors,
            });
        }
    }

    Ok(Evaluated { target, errors })
}

fn merge(target: &mut Value, options: &SchemaOptions, target_property: &str, value: Option<Value>) {
    if let Some(value) = value {
        path::set(target, target_property, value);
        return;
    }

    let policy = &options.undefined_values;
    if let Some(default) = &policy.default {
        if let Some(value) = default(&*target, target_property) {
            path::set(target, target_property, value);
            return;
        }
    }

    if policy.strip {
        path::remove(target, target_property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Action, Schema, Selector};
    use crate::validation::Validation;
    use serde_json::json;

    fn eval(schema: &Schema, source: &Value, target: Value) -> Result<Evaluated> {
        let tree = SchemaTree::parse(schema).unwrap();
        let items = vec![source.clone()];
        evaluate(&tree, &schema.effective_options(), source, &items, target)
    }

    #[test]
    fn test_missing_value_keeps_existing() {
        let schema = Schema::new().entry("field", "missing");
        let result = eval(&schema, &json!({}), json!({ "field": "X" })).unwrap();
        assert_eq!(result.target, json!({ "field": "X" }));

        let result = eval(&schema, &json!({}), json!({})).unwrap();
        assert_eq!(result.target, json!({}));
    }

    #[test]
    fn test_null_overwrites_existing() {
        let schema = Schema::new().entry("field", "value");
        let result = eval(&schema, &json!({ "value": null }), json!({ "field": "X" })).unwrap();
        assert_eq!(result.target, json!({ "field": null }));
    }

    #[test]
    fn test_strip_removes_existing() {
        let schema = Schema::new()
            .entry("field", "missing")
            .entry("kept", "value")
            .with_options(SchemaOptions::new().strip_undefined(true));
        let result = eval(&schema, &json!({ "value": 1 }), json!({ "field": "X" })).unwrap();
        assert_eq!(result.target, json!({ "kept": 1 }));
    }

    #[test]
    fn test_default_callback_wins_over_strip() {
        let schema = Schema::new()
            .entry("a", "missing")
            .entry("b", "missing")
            .with_options(
                SchemaOptions::new()
                    .strip_undefined(true)
                    .default_value(|_, path| (path == "a").then(|| json!("fallback"))),
            );
        let result = eval(&schema, &json!({}), json!({ "b": "X" })).unwrap();
        assert_eq!(result.target, json!({ "a": "fallback" }));
    }

    #[test]
    fn test_default_callback_sees_target_so_far() {
        let schema = Schema::new()
            .entry("first", "first")
            .entry("second", "missing")
            .with_options(
                SchemaOptions::new().default_value(|target, _| target.get("first").cloned()),
            );
        let result = eval(&schema, &json!({ "first": 1 }), json!({})).unwrap();
        assert_eq!(result.target, json!({ "first": 1, "second": 1 }));
    }

    #[test]
    fn test_actions_see_initial_target() {
        let schema = Schema::new()
            .entry("a", "value")
            .entry("b", Action::function(|_, _, target| Ok(target.get("a").cloned())));
        let result = eval(&schema, &json!({ "value": 2 }), json!({ "a": 1 })).unwrap();
        assert_eq!(result.target, json!({ "a": 2, "b": 1 }));
    }

    #[test]
    fn test_errors_are_accumulated() {
        let schema = Schema::new()
            .entry("age", Selector::at("age").validate_with(Validation::number()))
            .entry("name", Selector::at("name").validate_with(Validation::string()))
            .entry("ok", "ok");
        let source = json!({ "age": "x", "name": 1, "ok": true });
        let result = eval(&schema, &source, json!({})).unwrap();

        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.target["ok"], json!(true));
        assert_eq!(result.target["age"], json!("x"));
    }

    #[test]
    fn test_throw_on_validation() {
        let schema = Schema::new()
            .entry("age", Selector::at("age").validate_with(Validation::number()))
            .with_options(SchemaOptions::new().throw_on_validation(true));
        let err = eval(&schema, &json!({ "age": "x" }), json!({})).unwrap_err();
        match err {
            Error::Validation { message, errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    message,
                    "Invalid value x supplied at property age. Expecting: Expected value to be a <number> but received <x>"
                );
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
    }
}
