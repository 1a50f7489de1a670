//! Prepared actions
//!
//! Turns a classified schema leaf into a closure that computes the leaf's
//! value for one source item. User callback failures are rethrown with the
//! target property they were computing.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use super::node::{ActionInput, NodeKind, PreparedAction};
use crate::path;
use crate::schema::{Action, Selector, SelectorPath};
use crate::validation::ValidationError;
use crate::{Error, Result};
use log::warn;
use serde_json::Value;
use std::sync::Arc;

/// Build the prepared action of a node, `None` for property nodes
pub(crate) fn prepare(
    kind: NodeKind,
    target_property: &str,
    action: &Action,
) -> Result<Option<PreparedAction>> {
    let target_property = target_property.to_string();
    let prepared: PreparedAction = match (kind, action) {
        (NodeKind::ActionString, Action::Path(source)) => {
            let source = source.clone();
            prepared(move |input, _| {
                Ok(path::get_owned(input.object, &source))
            })
        }
        (NodeKind::ActionFunction, Action::Function(function)) => {
            let function = function.clone();
            prepared(move |input, _| {
                (function.f)(input.object, input.items, input.object_to_compute).map_err(|source| {
                    Error::Action {
                        target_property: target_property.clone(),
                        path: target_property.clone(),
                        function: function.name.clone(),
                        source,
                    }
                })
            })
        }
        (NodeKind::ActionAggregator, action) => {
            let paths: Vec<String> = action
                .as_paths()
                .unwrap_or_default()
                .into_iter()
                .map(str::to_string)
                .collect();
            prepared(move |input, _| {
                Ok(Some(path::aggregate(&paths, input.object)))
            })
        }
        (NodeKind::ActionSelector, Action::Selector(selector)) => {
            if let Some(validation) = &selector.validation {
                validation.check()?;
            }
            prepare_selector(target_property, selector.clone())
        }
        _ => return Ok(None),
    };
    Ok(Some(prepared))
}

fn prepared<F>(f: F) -> PreparedAction
where
    F: Fn(&ActionInput<'_>, &mut Vec<ValidationError>) -> Result<Option<Value>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn prepare_selector(target_property: String, selector: Selector) -> PreparedAction {
    prepared(move |input, errors| {
        let extracted = match &selector.path {
            Some(SelectorPath::Single(source)) => path::get_owned(input.object, source),
            Some(SelectorPath::Aggregate(sources)) => Some(path::aggregate(sources, input.object)),
            None => Some(input.object.clone()),
        };

        let value = match &selector.function {
            Some(function) => {
                (function.f)(extracted, input.object, input.items, input.object_to_compute)
                    .map_err(|source| Error::Action {
                        target_property: target_property.clone(),
                        path: selector.path.as_ref().map(ToString::to_string).unwrap_or_default(),
                        function: function.name.clone(),
                        source,
                    })?
            }
            None => extracted,
        };

        match &selector.validation {
            Some(validation) => {
                let outcome = validation.validate(value);
                if let Some(error) = outcome.error {
                    warn!("Validation failed for property {}: {}", target_property, error);
                    errors.push(ValidationError::new(target_property.clone(), error));
                }
                Ok(outcome.value)
            }
            None => Ok(value),
        }
    })
}
