//! Error types for the Shapeshift core library
//!
//! This module defines the error handling system for Shapeshift, using
//! thiserror for ergonomic error definitions and anyhow for the errors raised
//! by user-supplied callbacks.
//!
//! Errors fall into three groups:
//! - configuration errors, raised while a schema is compiled or a mapper is
//!   registered, before any data is touched
//! - action errors, raised by user callbacks while a target is computed and
//!   rethrown with the target property they were computing
//! - validation errors, which are only raised when a schema asks for it
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::validation::ValidationError;
use thiserror::Error;

/// Main error type for Shapeshift operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid schema or mapper configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A schema leaf that cannot be classified as an action
    #[error("The action specified for {property} is not supported.")]
    UnsupportedAction { property: String },

    /// A schema leaf that is an empty object
    #[error("A value of a schema property can't be an empty object. Value {{}} found for property {property}")]
    EmptySchemaObject { property: String },

    /// Two schema nodes resolving to the same target path
    #[error("Duplicate target property path: {path}")]
    DuplicatePath { path: String },

    /// Registering a target type twice
    #[error("A mapper for {type_name} has already been registered")]
    AlreadyRegistered { type_name: String },

    /// Updating a target type that was never registered
    #[error("The type {type_name} is not registered. Register it before setting its schema")]
    NotRegistered { type_name: String },

    /// A user callback failed while computing a target property
    #[error("Unable to set target property [{target_property}]. An error occured when applying [{function}] on property [{path}]. Internal error: {source}")]
    Action {
        target_property: String,
        path: String,
        function: String,
        #[source]
        source: anyhow::Error,
    },

    /// Validation failures escalated by the `validation.throw` schema option
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<ValidationError>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error was raised before any data was processed
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::UnsupportedAction { .. }
                | Error::EmptySchemaObject { .. }
                | Error::DuplicatePath { .. }
                | Error::AlreadyRegistered { .. }
                | Error::NotRegistered { .. }
        )
    }

    /// Target property a runtime error is attached to, if any
    pub fn target_property(&self) -> Option<&str> {
        match self {
            Error::Action { target_property, .. } => Some(target_property),
            Error::UnsupportedAction { property } | Error::EmptySchemaObject { property } => {
                Some(property)
            }
            _ => None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedAction {
            property: "prop".to_string(),
        };
        assert_eq!(err.to_string(), "The action specified for prop is not supported.");

        let err = Error::EmptySchemaObject {
            property: "prop".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "A value of a schema property can't be an empty object. Value {} found for property prop"
        );
    }

    #[test]
    fn test_action_error_keeps_source() {
        let err = Error::Action {
            target_property: "city".to_string(),
            path: "address.city".to_string(),
            function: "lowercase".to_string(),
            source: anyhow::anyhow!("boom"),
        };
        let message = err.to_string();
        assert!(message.contains("[city]"));
        assert!(message.contains("[lowercase]"));
        assert!(message.contains("boom"));
        assert_eq!(err.target_property(), Some("city"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_configuration_classification() {
        assert!(Error::configuration("bad").is_configuration());
        assert!(Error::AlreadyRegistered { type_name: "User".into() }.is_configuration());
        let err = Error::Validation {
            message: "x".into(),
            errors: vec![],
        };
        assert!(!err.is_configuration());
    }
}
