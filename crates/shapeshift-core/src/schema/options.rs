//! Schema-level options
//!
//! Options travel with a schema but are never part of its entries. Every
//! field has a default so a partial document deserializes cleanly.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callback producing a value for a property whose computed value is missing,
/// called with `(target so far, target property path)`
pub type DefaultValueFn = Arc<dyn Fn(&Value, &str) -> Option<Value> + Send + Sync>;

/// Options controlling how a schema is compiled and evaluated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Typed target behavior
    pub class: ClassOptions,

    /// Policy for properties whose computed value is missing
    #[serde(rename = "undefinedValues", alias = "undefined_values")]
    pub undefined_values: UndefinedValuesOptions,

    /// Validation error escalation
    pub validation: ValidationOptions,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn automapping(mut self, enabled: bool) -> Self {
        self.class.automapping = enabled;
        self
    }

    /// Remove properties whose computed value is missing
    pub fn strip_undefined(mut self, strip: bool) -> Self {
        self.undefined_values.strip = strip;
        self
    }

    /// Fill properties whose computed value is missing
    pub fn default_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<Value> + Send + Sync + 'static,
    {
        self.undefined_values.default = Some(Arc::new(f));
        self
    }

    /// Fail the mapping as soon as a validation error is recorded
    pub fn throw_on_validation(mut self, throw: bool) -> Self {
        self.validation.throw = throw;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassOptions {
    /// Derive a one-to-one schema from the target's own fields
    pub automapping: bool,
}

impl Default for ClassOptions {
    fn default() -> Self {
        Self { automapping: true }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UndefinedValuesOptions {
    pub strip: bool,

    #[serde(skip)]
    pub default: Option<DefaultValueFn>,
}

impl fmt::Debug for UndefinedValuesOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndefinedValuesOptions")
            .field("strip", &self.strip)
            .field("default", &self.default.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub throw: bool,
}
