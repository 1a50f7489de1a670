//! Validation of computed property values
//!
//! Validators run last in a selector action. A rejected value never aborts
//! the mapping: the error is accumulated for the target and returned next to
//! it, unless the schema's `validation.throw` option escalates it.
//!
//! The module is organized into:
//! - `types`: the validator contract and error records
//! - `validators`: built-in string, number and boolean rule chains
//! - `reporter`: formatting of accumulated errors
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

pub mod reporter;
pub mod types;
pub mod validators;


pub use reporter::{default_formatter, display_value, format_errors, Formatter, Reporter};
pub use types::{
    from_fn, FnValidator, Validate, ValidationError, ValidationFn, ValidationOutcome,
    ValidatorError,
};
pub use validators::{
    BooleanValidator, NumberValidator, Rule, RuleChain, StringValidator, Validation,
};
