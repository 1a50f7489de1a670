//! Mapper factory
//!
//! A mapper is a compiled schema ready to be applied to any number of
//! sources. The shape of the input decides the shape of the output: `null`
//! yields nothing, an array yields one target per element in input order,
//! anything else yields a single target.
//!
//! ```
//! use serde_json::json;
//! use shapeshift_core::{compile, Schema};
//!
//! let schema = Schema::new()
//!     .entry("name", "user.firstName")
//!     .entry("city", "user.address.city");
//! let mapper = compile(&schema).unwrap();
//!
//! let source = json!({ "user": { "firstName": "Ada", "address": { "city": "London" } } });
//! let target = mapper.map(&source).unwrap().into_value();
//! assert_eq!(target, json!({ "name": "Ada", "city": "London" }));
//! ```
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

pub mod target;

pub use target::{Target, TypedTarget};

use crate::engine::{self, Evaluated};
use crate::schema::{Action, Schema, SchemaOptions};
use crate::tree::SchemaTree;
use crate::validation::ValidationError;
use crate::Result;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Result of a mapping call, shaped after its input
#[derive(Debug, Clone, PartialEq)]
pub enum Output<T> {
    /// The input was `null`
    Nothing,
    /// The input was a single item
    One(T),
    /// The input was an array
    Many(Vec<T>),
}

impl<T> Output<T> {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Output::Nothing)
    }

    pub fn into_one(self) -> Option<T> {
        match self {
            Output::One(target) => Some(target),
            _ => None,
        }
    }

    pub fn into_many(self) -> Option<Vec<T>> {
        match self {
            Output::Many(targets) => Some(targets),
            _ => None,
        }
    }
}

impl Output<Value> {
    /// Fold back into `null`, an object or an array
    pub fn into_value(self) -> Value {
        match self {
            Output::Nothing => Value::Null,
            Output::One(target) => target,
            Output::Many(targets) => Value::Array(targets),
        }
    }
}

/// A target together with the validation errors raised while computing it
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<T> {
    pub target: T,
    pub errors: Vec<ValidationError>,
}

impl<T> Mapped<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A compiled, reusable mapping to targets of type `T`
pub struct Mapper<T = Value> {
    tree: Arc<SchemaTree>,
    options: Arc<SchemaOptions>,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for Mapper<T> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            options: Arc::clone(&self.options),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Mapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("target", &std::any::type_name::<T>())
            .field("nodes", &self.tree.len())
            .field("options", &self.options)
            .finish()
    }
}

impl<T: Target> Mapper<T> {
    /// Map `source`, deciding from its shape whether it is a collection
    pub fn map(&self, source: &Value) -> Result<Output<T>> {
        Ok(match self.map_with_errors(source)? {
            Output::Nothing => Output::Nothing,
            Output::One(mapped) => Output::One(mapped.target),
            Output::Many(mapped) => Output::Many(mapped.into_iter().map(|m| m.target).collect()),
        })
    }

    /// Like [`Mapper::map`], keeping the validation errors of each target
    pub fn map_with_errors(&self, source: &Value) -> Result<Output<Mapped<T>>> {
        match source {
            Value::Null => Ok(Output::Nothing),
            Value::Array(items) => self.evaluate_many(items).map(Output::Many),
            single => self
                .evaluate(single, std::slice::from_ref(single))
                .map(Output::One),
        }
    }

    /// Map `source` as a single item, whatever its shape
    pub fn map_one(&self, source: &Value) -> Result<T> {
        self.evaluate(source, std::slice::from_ref(source))
            .map(|mapped| mapped.target)
    }

    /// Map every item of `sources`, in order
    pub fn map_many(&self, sources: &[Value]) -> Result<Vec<T>> {
        self.evaluate_many(sources)
            .map(|mapped| mapped.into_iter().map(|m| m.target).collect())
    }

    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    fn evaluate_many(&self, items: &[Value]) -> Result<Vec<Mapped<T>>> {
        let span =
            tracing::debug_span!("map_many", target_type = T::type_name(), count = items.len());
        let _enter = span.enter();
        items.iter().map(|item| self.evaluate(item, items)).collect()
    }

    fn evaluate(&self, object: &Value, items: &[Value]) -> Result<Mapped<T>> {
        let Evaluated { target, errors } =
            engine::evaluate(&self.tree, &self.options, object, items, T::blank()?)?;
        Ok(Mapped {
            target: T::from_target(target)?,
            errors,
        })
    }
}

/// Compile `schema` into a mapper producing plain JSON objects
pub fn compile(schema: &Schema) -> Result<Mapper<Value>> {
    compile_for::<Value>(schema)
}

/// Compile `schema` into a mapper producing `T`
///
/// With automapping enabled every declared field of `T` is mapped from the
/// source property of the same name, unless the schema says otherwise.
pub fn compile_for<T: Target>(schema: &Schema) -> Result<Mapper<T>> {
    let options = schema.effective_options();
    let tree = if options.class.automapping {
        SchemaTree::parse(&automapped::<T>(schema))?
    } else {
        SchemaTree::parse(schema)?
    };
    debug!("Compiled mapper for {} with {} nodes", T::type_name(), tree.len());

    Ok(Mapper {
        tree: Arc::new(tree),
        options: Arc::new(options),
        _target: PhantomData,
    })
}

fn automapped<T: Target>(schema: &Schema) -> Schema {
    let defaults: Schema = T::field_names()
        .into_iter()
        .map(|field| (field.clone(), Action::Path(field)))
        .collect();
    schema.clone().overlay_on(defaults)
}

/// Map `source` with `schema` in one call
pub fn transform(schema: &Schema, source: &Value) -> Result<Value> {
    Ok(compile(schema)?.map(source)?.into_value())
}

/// Map `source` into `T` with `schema` in one call
pub fn transform_into<T: Target>(schema: &Schema, source: &Value) -> Result<Output<T>> {
    compile_for::<T>(schema)?.map(source)
}
