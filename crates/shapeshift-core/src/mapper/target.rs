//! Mapping targets
//!
//! A target is either a plain JSON object or a typed value. Typed values are
//! built from the serialized form of their `Default`, populated path by path,
//! then deserialized back.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Something a mapper can produce
pub trait Target: Sized {
    /// Fresh target before any property is computed
    fn blank() -> Result<Value>;

    /// Fields mapped one-to-one when automapping is enabled
    fn field_names() -> Vec<String>;

    /// Convert a computed target into `Self`
    fn from_target(target: Value) -> Result<Self>;

    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A typed target built from its `Default` value
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use shapeshift_core::TypedTarget;
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct User {
///     name: String,
///     city: Option<String>,
/// }
///
/// impl TypedTarget for User {}
///
/// assert_eq!(User::default_fields(), vec!["name", "city"]);
/// ```
pub trait TypedTarget: Default + Serialize + DeserializeOwned {
    /// Top-level keys of the serialized default value
    fn default_fields() -> Vec<String> {
        match serde_json::to_value(Self::default()) {
            Ok(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

impl<T: TypedTarget> Target for T {
    fn blank() -> Result<Value> {
        serde_json::to_value(T::default()).map_err(|e| Error::Json {
            message: format!("Failed to serialize the default {}", std::any::type_name::<T>()),
            source: e,
        })
    }

    fn field_names() -> Vec<String> {
        <T as TypedTarget>::default_fields()
    }

    fn from_target(target: Value) -> Result<Self> {
        serde_json::from_value(target).map_err(|e| Error::Json {
            message: format!(
                "Failed to build {} from the mapped target",
                std::any::type_name::<T>()
            ),
            source: e,
        })
    }
}

/// Plain JSON objects: start empty, no declared fields
impl Target for Value {
    fn blank() -> Result<Value> {
        Ok(Value::Object(Map::new()))
    }

    fn field_names() -> Vec<String> {
        Vec::new()
    }

    fn from_target(target: Value) -> Result<Self> {
        Ok(target)
    }
}
