//! Action classification
//!
//! Decides once, at compile time, what kind of node a schema leaf becomes.
//! Checks run in a fixed priority order: string path, function, aggregator,
//! selector, then nested property.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use super::node::NodeKind;
use crate::schema::Action;
use crate::{Error, Result};

/// Classify the action of `property`
///
/// Empty nested schemas and values that are not actions are configuration
/// errors.
pub fn classify(property: &str, action: &Action) -> Result<NodeKind> {
    match action {
        Action::Path(_) => Ok(NodeKind::ActionString),
        Action::Function(_) => Ok(NodeKind::ActionFunction),
        Action::List(items) if items.iter().all(|item| matches!(item, Action::Path(_))) => {
            Ok(NodeKind::ActionAggregator)
        }
        Action::Selector(selector) if selector.path.is_some() || selector.function.is_some() => {
            Ok(NodeKind::ActionSelector)
        }
        Action::Object(schema) if schema.is_empty() => Err(Error::EmptySchemaObject {
            property: property.to_string(),
        }),
        Action::Object(_) | Action::List(_) => Ok(NodeKind::Property),
        Action::Selector(_) | Action::Literal(_) => Err(Error::UnsupportedAction {
            property: property.to_string(),
        }),
    }
}

/// Whether `action` computes a value on its own
pub fn is_valid_action(action: &Action) -> bool {
    matches!(classify("", action), Ok(kind) if kind.is_action())
}
