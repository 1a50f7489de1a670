//! Shapeshift Core - Declarative object-to-object transformation
//!
//! This crate maps source JSON data to plain JSON objects or typed targets
//! following a schema that describes how each target property is computed.
//! A schema is compiled once into a tree of prepared actions, then applied to
//! any number of sources.
//!
//! # Main Components
//!
//! - **Schema**: target property paths paired with actions (source paths,
//!   functions, aggregations, selectors, nested schemas) and options
//! - **Tree Compiler**: classifies every action and prepares it for evaluation
//! - **Engine**: computes a target from one source item, applying the
//!   undefined-value policy and collecting validation errors
//! - **Mapper**: reusable compiled schema for single items and collections,
//!   with automapping of typed targets
//! - **Validation**: built-in validators and error reporting
//! - **Registry**: one mapper per target type
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shapeshift_core::{transform, Action, Result, Schema, Selector};
//!
//! fn example() -> Result<()> {
//!     let schema = Schema::new()
//!         .entry("user", vec!["firstName", "address.city"])
//!         .entry("city", Selector::at("address.city").map(|city, _, _, _| {
//!             Ok(city.and_then(|c| c.as_str().map(|s| json!(s.to_lowercase()))))
//!         }))
//!         .entry("count", Action::function(|_, items, _| Ok(Some(json!(items.len())))));
//!
//!     let source = json!({ "firstName": "John", "address": { "city": "NY" } });
//!     let target = transform(&schema, &source)?;
//!     assert_eq!(
//!         target,
//!         json!({
//!             "user": { "firstName": "John", "address": { "city": "NY" } },
//!             "city": "ny",
//!             "count": 1
//!         })
//!     );
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

pub mod decorator;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod path;
pub mod registry;
pub mod schema;
pub mod tree;
pub mod validation;

#[cfg(test)]
pub(crate) mod proptest_strategies;

// Re-export main types for convenience
pub use decorator::{decorate, decorate_async, MappedFuture};
pub use engine::{evaluate, Evaluated};
pub use error::{Error, Result};
pub use mapper::{
    compile, compile_for, transform, transform_into, Mapped, Mapper, Output, Target, TypedTarget,
};
pub use registry::Registry;
pub use schema::{
    create_schema, load_schema, Action, ActionFunction, FunctionTable, Schema, SchemaOptions,
    Selector, SelectorFunction, SelectorPath,
};
pub use tree::{NodeKind, SchemaNode, SchemaTree};
pub use validation::{
    Reporter, Validate, Validation, ValidationError, ValidationOutcome, ValidatorError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
