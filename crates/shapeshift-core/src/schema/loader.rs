//! Loading schemas from JSON documents
//!
//! Functions can't be written in JSON, so selector documents name them and
//! the names are resolved against a [`FunctionTable`] supplied by the caller.
//! Validators are named too and resolve to the built-in ones.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use super::options::SchemaOptions;
use super::types::{Action, Schema, Selector, SelectorFunction, SelectorPath};
use crate::validation::Validation;
use crate::{Error, Result};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// Key holding the schema options in a document
pub const OPTIONS_KEY: &str = "$options";

const SELECTOR_KEYS: [&str; 3] = ["path", "fn", "validation"];

/// Named selector functions available to schema documents
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, SelectorFunction>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a selector function under `name`
    pub fn register<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<Value>, &Value, &[Value], &Value) -> anyhow::Result<Option<Value>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        self.functions.insert(name.clone(), SelectorFunction::new(name, f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&SelectorFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionTable").field("functions", &names).finish()
    }
}

impl Schema {
    /// Build a schema from a JSON document
    pub fn from_value(document: &Value, functions: &FunctionTable) -> Result<Schema> {
        let map = document.as_object().ok_or_else(|| {
            Error::configuration(format!(
                "A schema document must be a JSON object, found {}",
                kind_of(document)
            ))
        })?;

        let mut schema = schema_from_map(map, functions)?;
        if let Some(raw) = map.get(OPTIONS_KEY) {
            let options: SchemaOptions =
                serde_json::from_value(raw.clone()).map_err(|e| Error::Configuration {
                    message: format!("Invalid {} in schema document", OPTIONS_KEY),
                    source: Some(e.into()),
                })?;
            schema = schema.with_options(options);
        }
        Ok(schema)
    }

    /// Build a schema from JSON text
    pub fn from_json_str(text: &str, functions: &FunctionTable) -> Result<Schema> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(&document, functions)
    }
}

/// Read and parse a schema document from disk
pub fn load_schema(path: impl AsRef<Path>, functions: &FunctionTable) -> Result<Schema> {
    let path = path.as_ref();
    debug!("Loading schema from {}", path.display());

    let text = std::fs::read_to_string(path).map_err(|e| Error::Io {
        message: format!("Failed to read schema file {}", path.display()),
        source: e,
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|e| Error::Json {
        message: format!("Failed to parse schema file {}", path.display()),
        source: e,
    })?;
    Schema::from_value(&document, functions)
}

fn schema_from_map(map: &Map<String, Value>, functions: &FunctionTable) -> Result<Schema> {
    let mut schema = Schema::new();
    for (key, value) in map {
        if key == OPTIONS_KEY {
            continue;
        }
        schema.insert(key.clone(), action_from_value(key, value, functions)?);
    }
    Ok(schema)
}

fn action_from_value(property: &str, value: &Value, functions: &FunctionTable) -> Result<Action> {
    match value {
        Value::String(path) => Ok(Action::Path(path.clone())),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                action_from_value(&format!("{}.{}", property, index), item, functions)
            })
            .collect::<Result<Vec<_>>>()
            .map(Action::List),
        Value::Object(map) if map.contains_key("path") || map.contains_key("fn") => {
            selector_from_map(property, map, functions).map(Action::Selector)
        }
        Value::Object(map) => schema_from_map(map, functions).map(Action::Object),
        other => Ok(Action::Literal(other.clone())),
    }
}

fn selector_from_map(
    property: &str,
    map: &Map<String, Value>,
    functions: &FunctionTable,
) -> Result<Selector> {
    let mut selector = Selector::new();

    if let Some(path) = map.get("path") {
        selector = selector.path(selector_path(property, path)?);
    }

    if let Some(name) = map.get("fn") {
        let name = name.as_str().ok_or_else(|| {
            Error::configuration(format!("The fn of property {} must be a function name", property))
        })?;
        let function = functions.get(name).ok_or_else(|| {
            Error::configuration(format!("Unknown function {} for property {}", name, property))
        })?;
        selector = selector.function(function.clone());
    }

    if let Some(name) = map.get("validation") {
        let name = name.as_str().ok_or_else(|| {
            Error::configuration(format!(
                "The validation of property {} must be a validator name",
                property
            ))
        })?;
        let validator = Validation::by_name(name).ok_or_else(|| {
            Error::configuration(format!("Unknown validator {} for property {}", name, property))
        })?;
        selector = selector.validation(validator);
    }

    for key in map.keys().filter(|key| !SELECTOR_KEYS.contains(&key.as_str())) {
        warn!("Ignoring unknown selector key {} on property {}", key, property);
    }

    Ok(selector)
}

fn selector_path(property: &str, value: &Value) -> Result<SelectorPath> {
    match value {
        Value::String(path) => Ok(SelectorPath::Single(path.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::configuration(format!(
                        "Selector paths of property {} must be strings",
                        property
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(SelectorPath::Aggregate),
        other => Err(Error::configuration(format!(
            "The path of property {} must be a string or an array of strings, found {}",
            property,
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
