//! Built-in validator rule chains
//!
//! Each validator starts with a type rule and can be extended with more
//! rules. Rules run in insertion order, each one receiving the value returned
//! by the previous rule, and the chain stops at the first failure. A rule
//! name may only be used once per chain.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use super::reporter::display_value;
use super::types::{Validate, ValidationOutcome, ValidatorError};
use crate::{Error, Result};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::{Arc, OnceLock};

type RuleTest =
    dyn Fn(Option<Value>) -> std::result::Result<Option<Value>, ValidatorError> + Send + Sync;

/// A single named validation rule
#[derive(Clone)]
pub struct Rule {
    pub name: String,
    test: Arc<RuleTest>,
}

impl Rule {
    /// Create a rule from a test returning the (possibly coerced) value
    pub fn new<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(Option<Value>) -> std::result::Result<Option<Value>, ValidatorError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Ordered list of rules applied to a value
#[derive(Debug, Clone)]
pub struct RuleChain {
    rules: Vec<Rule>,
    duplicate: Option<String>,
}

impl RuleChain {
    pub fn new(rule: Rule) -> Self {
        Self {
            rules: vec![rule],
            duplicate: None,
        }
    }

    /// Append a rule; reusing a rule name is reported by [`Validate::check`]
    pub fn add_rule(mut self, rule: Rule) -> Self {
        if self.rules.iter().any(|existing| existing.name == rule.name) {
            if self.duplicate.is_none() {
                self.duplicate = Some(rule.name);
            }
            return self;
        }
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }
}

impl Validate for RuleChain {
    fn validate(&self, value: Option<Value>) -> ValidationOutcome {
        let mut current = value.clone();
        for rule in &self.rules {
            match (rule.test)(current) {
                Ok(next) => current = next,
                Err(error) => return ValidationOutcome::invalid(value, error),
            }
        }
        ValidationOutcome::valid(current)
    }

    fn check(&self) -> Result<()> {
        match &self.duplicate {
            Some(name) => Err(Error::configuration(format!("Rule {} has already been used", name))),
            None => Ok(()),
        }
    }
}

fn type_error(kind: &str, value: Option<Value>) -> ValidatorError {
    let expect = format!(
        "Expected value to be a <{}> but received <{}>",
        kind,
        display_value(value.as_ref())
    );
    ValidatorError::new(value, expect)
}

macro_rules! delegate_validate {
    ($validator:ty) => {
        impl $validator {
            /// Names of the rules in this chain, in execution order
            pub fn rule_names(&self) -> Vec<&str> {
                self.chain.rule_names()
            }
        }

        impl Validate for $validator {
            fn validate(&self, value: Option<Value>) -> ValidationOutcome {
                self.chain.validate(value)
            }

            fn check(&self) -> Result<()> {
                self.chain.check()
            }
        }
    };
}

/// Validates strings, with optional length bounds
#[derive(Debug, Clone)]
pub struct StringValidator {
    chain: RuleChain,
}

impl StringValidator {
    pub fn new() -> Self {
        let rule = Rule::new("string", |value| match value {
            Some(Value::String(s)) => Ok(Some(Value::String(s))),
            other => Err(type_error("string", other)),
        });
        Self {
            chain: RuleChain::new(rule),
        }
    }

    /// Require at least `min` characters
    pub fn min(mut self, min: usize) -> Self {
        let rule = Rule::new("min", move |value| {
            let length = value.as_ref().and_then(Value::as_str).map(|s| s.chars().count());
            match length {
                Some(length) if length >= min => Ok(value),
                _ => Err(ValidatorError::new(
                    value.clone(),
                    format!(
                        "Expected value to be greater or equal than {} but received <{}>",
                        min,
                        display_value(value.as_ref())
                    ),
                )),
            }
        });
        self.chain = self.chain.add_rule(rule);
        self
    }

    /// Allow at most `max` characters
    pub fn max(mut self, max: usize) -> Self {
        let rule = Rule::new("max", move |value| {
            let length = value.as_ref().and_then(Value::as_str).map(|s| s.chars().count());
            match length {
                Some(length) if length <= max => Ok(value),
                _ => Err(ValidatorError::new(
                    value.clone(),
                    format!(
                        "Expected value to be less or equal than {} but received <{}>",
                        max,
                        display_value(value.as_ref())
                    ),
                )),
            }
        });
        self.chain = self.chain.add_rule(rule);
        self
    }

    /// Append a custom rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.chain = self.chain.add_rule(rule);
        self
    }
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

delegate_validate!(StringValidator);

/// Validates numbers, coercing numeric strings
#[derive(Debug, Clone)]
pub struct NumberValidator {
    chain: RuleChain,
}

impl NumberValidator {
    pub fn new() -> Self {
        let rule = Rule::new("number", |value| match value {
            Some(Value::Number(n)) => Ok(Some(Value::Number(n))),
            Some(Value::String(s)) => match parse_number(&s) {
                Some(number) => Ok(Some(number)),
                None => Err(type_error("number", Some(Value::String(s)))),
            },
            other => Err(type_error("number", other)),
        });
        Self {
            chain: RuleChain::new(rule),
        }
    }

    /// Append a custom rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.chain = self.chain.add_rule(rule);
        self
    }
}

impl Default for NumberValidator {
    fn default() -> Self {
        Self::new()
    }
}

delegate_validate!(NumberValidator);

fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float = trimmed.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

/// Validates booleans, coercing `"true"` and `"false"` strings
#[derive(Debug, Clone)]
pub struct BooleanValidator {
    chain: RuleChain,
}

fn truthy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)true").expect("valid regex literal"))
}

fn falsy_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)false").expect("valid regex literal"))
}

impl BooleanValidator {
    pub fn new() -> Self {
        let rule = Rule::new("boolean", |value| match value {
            Some(Value::Bool(b)) => Ok(Some(Value::Bool(b))),
            Some(Value::String(s)) if truthy_pattern().is_match(&s) => Ok(Some(Value::Bool(true))),
            Some(Value::String(s)) if falsy_pattern().is_match(&s) => Ok(Some(Value::Bool(false))),
            other => Err(type_error("boolean", other)),
        });
        Self {
            chain: RuleChain::new(rule),
        }
    }

    /// Append a custom rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.chain = self.chain.add_rule(rule);
        self
    }
}

impl Default for BooleanValidator {
    fn default() -> Self {
        Self::new()
    }
}

delegate_validate!(BooleanValidator);

/// Entry point for the built-in validators
pub struct Validation;

impl Validation {
    pub fn string() -> StringValidator {
        StringValidator::new()
    }

    pub fn number() -> NumberValidator {
        NumberValidator::new()
    }

    pub fn boolean() -> BooleanValidator {
        BooleanValidator::new()
    }

    /// Look up a built-in validator by name, as used by schema documents
    pub fn by_name(name: &str) -> Option<Arc<dyn Validate>> {
        match name {
            "string" => Some(Arc::new(Self::string())),
            "number" => Some(Arc::new(Self::number())),
            "boolean" => Some(Arc::new(Self::boolean())),
            _ => None,
        }
    }
}
