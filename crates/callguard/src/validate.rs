//! Per-call membership checks.
//!
//! The checks are pure functions over a locked [`Contract`] and the
//! supplied values: they mutate nothing and report the first violation
//! as a typed error. The wrapper in [`crate::guard`] decides when they
//! run; this module only decides whether a given call conforms.

use crate::contract::Contract;
use callguard_types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A call-time contract violation.
///
/// Every variant names the callable and carries enough context to
/// diagnose the mismatch without re-running the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid argument type in call of `{callable}`: argument `{parameter}` must be of type <{expected}>, found argument of type <{actual}> from value {value}")]
    Argument {
        callable: String,
        parameter: String,
        expected: String,
        actual: String,
        value: String,
    },

    #[error("invalid keyword argument type in call of `{callable}`: kwarg `{parameter}` must be of type <{expected}>, found kwarg of type <{actual}> from value {value}")]
    Keyword {
        callable: String,
        parameter: String,
        expected: String,
        actual: String,
        value: String,
    },

    #[error("unknown keyword `{parameter}` in call of `{callable}`: the contract declares no parameter with that name")]
    UnknownKeyword { callable: String, parameter: String },

    #[error("incorrect return type from `{callable}`: expected type <{expected}>, found return of type <{actual}> from value {value}")]
    Return {
        callable: String,
        expected: String,
        actual: String,
        value: String,
    },
}

/// Arguments for one invocation: positional values in order, plus
/// keyword values by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    positional: Vec<Value>,
    keywords: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a list of positional arguments.
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keywords: BTreeMap::new(),
        }
    }

    /// Append one positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add one keyword argument.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    pub fn positional_args(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword_args(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }
}

/// Check supplied positional arguments, in order, against the
/// positionally fillable specs.
///
/// Only as many pairs as arguments were supplied are checked: declared
/// parameters left unfilled (defaults, keyword-supplied) are not this
/// step's business. Surplus arguments beyond the declared positionals
/// belong to the catch-all bucket, which accepts anything.
pub fn check_positional(contract: &Contract, args: &[Value]) -> Result<(), ValidationError> {
    for (spec, arg) in contract.positional().iter().zip(args) {
        if !spec.types.matches(arg) {
            return Err(ValidationError::Argument {
                callable: contract.callable().to_string(),
                parameter: spec.name.clone(),
                expected: spec.types.to_string(),
                actual: arg.value_type().to_string(),
                value: arg.to_string(),
            });
        }
    }
    Ok(())
}

/// Check supplied keyword arguments against the contract's by-name
/// rules.
///
/// A name the contract does not declare is a configuration mismatch
/// between caller and contract: it fails with a distinct error unless
/// the signature declared a catch-all keywords bucket.
pub fn check_keywords(
    contract: &Contract,
    kwargs: &BTreeMap<String, Value>,
) -> Result<(), ValidationError> {
    for (name, value) in kwargs {
        let Some(spec) = contract.by_name(name) else {
            if contract.accepts_extra_keywords() {
                continue;
            }
            return Err(ValidationError::UnknownKeyword {
                callable: contract.callable().to_string(),
                parameter: name.clone(),
            });
        };
        if !spec.types.matches(value) {
            return Err(ValidationError::Keyword {
                callable: contract.callable().to_string(),
                parameter: name.clone(),
                expected: spec.types.to_string(),
                actual: value.value_type().to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

/// Check the produced value against the return rule, if one is locked.
pub fn check_return(contract: &Contract, value: &Value) -> Result<(), ValidationError> {
    let Some(expected) = contract.return_types() else {
        return Ok(());
    };
    if expected.matches(value) {
        return Ok(());
    }
    Err(ValidationError::Return {
        callable: contract.callable().to_string(),
        expected: expected.to_string(),
        actual: value.value_type().to_string(),
        value: value.to_string(),
    })
}
