//! Reporting and formatting utilities for validation errors
//!
//! This module turns the validation errors accumulated for a target into
//! human-readable messages through a pluggable formatter.

use super::types::ValidationError;
use serde_json::Value;
use std::sync::Arc;

/// Formatting function called by the reporter for each error
pub type Formatter = Arc<dyn Fn(&ValidationError) -> String + Send + Sync>;

/// Render a property value the way messages show it
///
/// A missing value prints as `undefined` and strings print without quotes.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Default message for a validation error
pub fn default_formatter(error: &ValidationError) -> String {
    format!(
        "Invalid value {} supplied at property {}. Expecting: {}",
        display_value(error.value.as_ref()),
        error.target_property,
        error.expect
    )
}

/// Join every error's default message, one per line
pub fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(default_formatter)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns validation errors into messages
#[derive(Clone)]
pub struct Reporter {
    formatter: Formatter,
}

impl Reporter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(&ValidationError) -> String + Send + Sync + 'static,
    {
        Self {
            formatter: Arc::new(formatter),
        }
    }

    /// One message per error, or `None` when there are no errors
    pub fn report(&self, errors: &[ValidationError]) -> Option<Vec<String>> {
        if errors.is_empty() {
            return None;
        }
        Some(errors.iter().map(|error| (self.formatter)(error)).collect())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(default_formatter)
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
