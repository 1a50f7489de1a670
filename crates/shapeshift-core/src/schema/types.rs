//! Core schema types
//!
//! A [`Schema`] maps target property paths to [`Action`]s. Actions are the raw
//! schema leaves; the tree compiler classifies them and prepares them for
//! evaluation.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use super::options::SchemaOptions;
use crate::validation::{Validate, ValidationFn};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature of a free computing action:
/// `(current source item, full source collection, target being built)`
pub type ActionFn = dyn Fn(&Value, &[Value], &Value) -> anyhow::Result<Option<Value>> + Send + Sync;

/// Signature of a selector function:
/// `(extracted value, current source item, full source collection, target being built)`
pub type SelectorFn =
    dyn Fn(Option<Value>, &Value, &[Value], &Value) -> anyhow::Result<Option<Value>> + Send + Sync;

const ANONYMOUS: &str = "anonymous";

/// A named free computing callback
#[derive(Clone)]
pub struct ActionFunction {
    pub(crate) name: String,
    pub(crate) f: Arc<ActionFn>,
}

impl ActionFunction {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ActionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

/// A named selector callback
#[derive(Clone)]
pub struct SelectorFunction {
    pub(crate) name: String,
    pub(crate) f: Arc<SelectorFn>,
}

impl SelectorFunction {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<Value>, &Value, &[Value], &Value) -> anyhow::Result<Option<Value>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for SelectorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

/// Source location read by a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPath {
    /// A single source path
    Single(String),
    /// Several source paths aggregated into one object
    Aggregate(Vec<String>),
}

impl fmt::Display for SelectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorPath::Single(path) => write!(f, "{}", path),
            SelectorPath::Aggregate(paths) => write!(f, "{}", paths.join(",")),
        }
    }
}

impl From<&str> for SelectorPath {
    fn from(path: &str) -> Self {
        SelectorPath::Single(path.to_string())
    }
}

impl From<String> for SelectorPath {
    fn from(path: String) -> Self {
        SelectorPath::Single(path)
    }
}

impl From<Vec<&str>> for SelectorPath {
    fn from(paths: Vec<&str>) -> Self {
        SelectorPath::Aggregate(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for SelectorPath {
    fn from(paths: Vec<String>) -> Self {
        SelectorPath::Aggregate(paths)
    }
}

/// A path extraction combined with an optional function and validation
///
/// Without a path the whole source item is extracted. Without a function the
/// extracted value passes through unchanged. Validation runs last.
#[derive(Clone, Default)]
pub struct Selector {
    pub(crate) path: Option<SelectorPath>,
    pub(crate) function: Option<SelectorFunction>,
    pub(crate) validation: Option<ValidationFn>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector reading `path` from the source item
    pub fn at(path: impl Into<SelectorPath>) -> Self {
        Self::new().path(path)
    }

    pub fn path(mut self, path: impl Into<SelectorPath>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Apply `f` to the extracted value
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Option<Value>, &Value, &[Value], &Value) -> anyhow::Result<Option<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.map_named(ANONYMOUS, f)
    }

    /// Apply `f` to the extracted value; `name` shows up in error messages
    pub fn map_named<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<Value>, &Value, &[Value], &Value) -> anyhow::Result<Option<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.function = Some(SelectorFunction::new(name, f));
        self
    }

    pub fn function(mut self, function: SelectorFunction) -> Self {
        self.function = Some(function);
        self
    }

    /// Validate the computed value
    pub fn validate_with(mut self, validator: impl Validate + 'static) -> Self {
        self.validation = Some(Arc::new(validator));
        self
    }

    pub fn validation(mut self, validator: ValidationFn) -> Self {
        self.validation = Some(validator);
        self
    }

    pub fn selector_path(&self) -> Option<&SelectorPath> {
        self.path.as_ref()
    }

    pub fn selector_function(&self) -> Option<&SelectorFunction> {
        self.function.as_ref()
    }

    pub fn has_validation(&self) -> bool {
        self.validation.is_some()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("path", &self.path)
            .field("function", &self.function)
            .field("validation", &self.validation.is_some())
            .finish()
    }
}

/// A raw schema leaf
#[derive(Clone)]
pub enum Action {
    /// Copy the value found at a source path
    Path(String),
    /// Compute the value from the source item, the collection and the target
    Function(ActionFunction),
    /// Either an aggregation of source paths, when every element is a
    /// `Path`, or a list of nested schemas indexed by position
    List(Vec<Action>),
    /// Path extraction plus optional function and validation
    Selector(Selector),
    /// A nested schema describing a sub-object of the target
    Object(Schema),
    /// Any other JSON value, never a valid action
    Literal(Value),
}

impl Action {
    /// Free computing action
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value], &Value) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        Self::named_function(ANONYMOUS, f)
    }

    /// Free computing action with a name used in error messages
    pub fn named_function<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value], &Value) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        Action::Function(ActionFunction {
            name: name.into(),
            f: Arc::new(f),
        })
    }

    /// Aggregation of several source paths
    pub fn aggregate<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Action::List(paths.into_iter().map(|p| Action::Path(p.into())).collect())
    }

    /// Source paths of a list made only of paths
    pub fn as_paths(&self) -> Option<Vec<&str>> {
        match self {
            Action::List(items) => items
                .iter()
                .map(|item| match item {
                    Action::Path(path) => Some(path.as_str()),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Action::Function(function) => f.debug_tuple("Function").field(function).finish(),
            Action::List(items) => f.debug_tuple("List").field(items).finish(),
            Action::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
            Action::Object(schema) => f.debug_tuple("Object").field(schema).finish(),
            Action::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
        }
    }
}

impl From<&str> for Action {
    fn from(path: &str) -> Self {
        Action::Path(path.to_string())
    }
}

impl From<String> for Action {
    fn from(path: String) -> Self {
        Action::Path(path)
    }
}

impl From<Vec<&str>> for Action {
    fn from(paths: Vec<&str>) -> Self {
        Action::aggregate(paths)
    }
}

impl From<Vec<Action>> for Action {
    fn from(items: Vec<Action>) -> Self {
        Action::List(items)
    }
}

impl From<Selector> for Action {
    fn from(selector: Selector) -> Self {
        Action::Selector(selector)
    }
}

impl From<Schema> for Action {
    fn from(schema: Schema) -> Self {
        Action::Object(schema)
    }
}

impl From<Value> for Action {
    fn from(value: Value) -> Self {
        Action::Literal(value)
    }
}

/// Ordered mapping from target property paths to actions
///
/// Options are kept next to the entries and never appear as an entry.
#[derive(Clone, Default)]
pub struct Schema {
    entries: Vec<(String, Action)>,
    options: Option<SchemaOptions>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn entry(mut self, target_property: impl Into<String>, action: impl Into<Action>) -> Self {
        self.insert(target_property, action);
        self
    }

    /// Add an entry; an existing key keeps its position and gets the new action
    pub fn insert(&mut self, target_property: impl Into<String>, action: impl Into<Action>) {
        let key = target_property.into();
        let action = action.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = action,
            None => self.entries.push((key, action)),
        }
    }

    pub fn get(&self, target_property: &str) -> Option<&Action> {
        self.entries
            .iter()
            .find(|(key, _)| key == target_property)
            .map(|(_, action)| action)
    }

    pub fn contains_key(&self, target_property: &str) -> bool {
        self.get(target_property).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn entries(&self) -> &[(String, Action)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach options to this schema
    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn options(&self) -> Option<&SchemaOptions> {
        self.options.as_ref()
    }

    /// Options in effect, defaults when none were attached
    pub fn effective_options(&self) -> SchemaOptions {
        self.options.clone().unwrap_or_default()
    }

    /// Overlay `self` on top of `base`
    ///
    /// Keys of `base` come first; entries of `self` win on collision. The
    /// options of `self` are kept.
    pub fn overlay_on(self, base: Schema) -> Schema {
        let options = self.options.clone();
        let mut merged = base;
        for (key, action) in self.entries {
            merged.insert(key, action);
        }
        merged.options = options;
        merged
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, action) in &self.entries {
            map.entry(key, action);
        }
        map.finish()
    }
}

impl<K, A> FromIterator<(K, A)> for Schema
where
    K: Into<String>,
    A: Into<Action>,
{
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (key, action) in iter {
            schema.insert(key, action);
        }
        schema
    }
}

/// Attach options to a schema without altering its entries
pub fn create_schema(schema: Schema, options: SchemaOptions) -> Schema {
    schema.with_options(options)
}
