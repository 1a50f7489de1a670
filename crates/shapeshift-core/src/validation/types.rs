//! Core validation types
//!
//! This module contains the contract every validator implements and the
//! records accumulated for a target when a validator rejects a value.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error returned by a validator for a single value
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{expect}")]
pub struct ValidatorError {
    /// The value that was rejected, `None` when there was no value
    pub value: Option<Value>,
    /// Human readable description of what was expected
    pub expect: String,
}

impl ValidatorError {
    pub fn new(value: Option<Value>, expect: impl Into<String>) -> Self {
        Self {
            value,
            expect: expect.into(),
        }
    }
}

/// Validation failure recorded against one property of a target
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub target_property: String,
    pub value: Option<Value>,
    pub expect: String,
}

impl ValidationError {
    /// Attach a validator error to the target property it was raised for
    pub fn new(target_property: impl Into<String>, inner: ValidatorError) -> Self {
        Self {
            target_property: target_property.into(),
            value: inner.value,
            expect: inner.expect,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::reporter::default_formatter(self))
    }
}

/// Result of running a validator on a value
///
/// `value` is the possibly coerced value to store on the target. When
/// `error` is set the value is the original, unconverted input.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub value: Option<Value>,
    pub error: Option<ValidatorError>,
}

impl ValidationOutcome {
    pub fn valid(value: Option<Value>) -> Self {
        Self { value, error: None }
    }

    pub fn invalid(value: Option<Value>, error: ValidatorError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Contract between the evaluation engine and a validator
///
/// A validator receives the computed value of a property and returns the
/// value to store along with an optional error. Errors never abort the
/// mapping; they are accumulated for the target.
pub trait Validate: Send + Sync {
    fn validate(&self, value: Option<Value>) -> ValidationOutcome;

    /// Configuration check run when the owning schema is compiled
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Shared handle on a validator, as stored in a selector
pub type ValidationFn = Arc<dyn Validate>;

/// Validator backed by a closure
pub struct FnValidator<F> {
    f: F,
}

impl<F> Validate for FnValidator<F>
where
    F: Fn(Option<Value>) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, value: Option<Value>) -> ValidationOutcome {
        (self.f)(value)
    }
}

/// Wrap a closure as a validator
pub fn from_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(Option<Value>) -> ValidationOutcome + Send + Sync,
{
    FnValidator { f }
}
