//! Schema definition
//!
//! A schema is an ordered list of target property paths, each paired with the
//! action computing it, plus the options that govern evaluation. Schemas are
//! usually built in code with the builder methods, or loaded from JSON
//! documents through [`loader`].
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

pub mod loader;
pub mod options;
pub mod types;


pub use loader::{load_schema, FunctionTable, OPTIONS_KEY};
pub use options::{
    ClassOptions, DefaultValueFn, SchemaOptions, UndefinedValuesOptions, ValidationOptions,
};
pub use types::{
    create_schema, Action, ActionFn, ActionFunction, Schema, Selector, SelectorFn, SelectorFunction,
    SelectorPath,
};
