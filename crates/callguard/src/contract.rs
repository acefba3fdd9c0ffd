//! Locked call contracts.
//!
//! A declared signature becomes a [`Contract`] exactly once, at
//! decoration time. Every declared expression is flattened eagerly, so
//! a malformed declaration fails here - not on the first call that
//! happens to hit it. Once built, a contract never changes; the wrapper
//! that owns it may be invoked from any number of call sites without
//! coordination.

use crate::enforcement;
use crate::signature::{ConfigurationError, FnSignature, Param, ParamKind};
use callguard_types::{normalize, TypeDeterminationError, TypeSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that prevent a contract from being built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecorationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    TypeDetermination(#[from] TypeDeterminationError),
}

/// One parameter's locked checking rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    /// Position in declaration order; strictly increasing.
    pub position: usize,
    pub kind: ParamKind,
    pub types: TypeSet,
}

/// The locked contract for one callable.
///
/// Positional parameters always precede any buckets and keyword-only
/// parameters, so the first [`positional_count`](Self::positional_count)
/// entries of [`params`](Self::params) are exactly the positionally
/// fillable ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    callable: String,
    params: Vec<ParameterSpec>,
    by_name: HashMap<String, usize>,
    positional_count: usize,
    ret: Option<TypeSet>,
    accepts_extra_positional: bool,
    accepts_extra_keywords: bool,
}

impl Contract {
    /// Lock a declared signature into a contract.
    ///
    /// Validates the signature shape, flattens every declared expression
    /// (eagerly, including the return declaration), and freezes the
    /// result.
    pub fn build(signature: &FnSignature) -> Result<Self, DecorationError> {
        let callable = signature.name.clone();

        let mut params = Vec::with_capacity(signature.params.len());
        let mut by_name = HashMap::new();
        let mut positional_count = 0usize;
        let mut seen_rest = false;
        let mut seen_keyword_only = false;
        let mut seen_keywords = false;

        for (position, param) in signature.params.iter().enumerate() {
            check_placement(&callable, param, seen_rest, seen_keyword_only, seen_keywords)?;

            let types = match &param.declared {
                Some(expr) => normalize(expr)?,
                None => {
                    report_unchecked_param(&callable, param);
                    TypeSet::Universal
                }
            };

            match param.kind {
                ParamKind::Positional => {
                    positional_count += 1;
                    insert_name(&callable, &mut by_name, &param.name, position)?;
                }
                ParamKind::KeywordOnly => {
                    seen_keyword_only = true;
                    insert_name(&callable, &mut by_name, &param.name, position)?;
                }
                ParamKind::Rest => seen_rest = true,
                ParamKind::Keywords => seen_keywords = true,
            }

            params.push(ParameterSpec {
                name: param.name.clone(),
                position,
                kind: param.kind,
                types,
            });
        }

        let ret = match &signature.ret {
            Some(expr) => Some(normalize(expr)?),
            None => None,
        };

        debug!(
            callable = %callable,
            parameters = params.len(),
            checks_return = ret.is_some(),
            "call contract locked"
        );

        Ok(Self {
            callable,
            params,
            by_name,
            positional_count,
            ret,
            accepts_extra_positional: seen_rest,
            accepts_extra_keywords: seen_keywords,
        })
    }

    /// Name of the wrapped callable, used in diagnostics.
    pub fn callable(&self) -> &str {
        &self.callable
    }

    /// All parameter specs in declaration order.
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// The positionally fillable prefix of [`params`](Self::params).
    pub fn positional(&self) -> &[ParameterSpec] {
        &self.params[..self.positional_count]
    }

    /// Look up a parameter's checking rule by name. Buckets are not
    /// addressable by name.
    pub fn by_name(&self, name: &str) -> Option<&ParameterSpec> {
        self.by_name.get(name).map(|&idx| &self.params[idx])
    }

    /// The locked return rule, if a return type was declared.
    pub fn return_types(&self) -> Option<&TypeSet> {
        self.ret.as_ref()
    }

    /// Whether surplus positional arguments fall into a catch-all bucket.
    pub fn accepts_extra_positional(&self) -> bool {
        self.accepts_extra_positional
    }

    /// Whether unknown keyword arguments fall into a catch-all bucket.
    pub fn accepts_extra_keywords(&self) -> bool {
        self.accepts_extra_keywords
    }
}

fn check_placement(
    callable: &str,
    param: &Param,
    seen_rest: bool,
    seen_keyword_only: bool,
    seen_keywords: bool,
) -> Result<(), ConfigurationError> {
    if seen_keywords {
        return Err(ConfigurationError::ParameterAfterKeywords {
            callable: callable.to_string(),
            name: param.name.clone(),
        });
    }
    match param.kind {
        ParamKind::Positional if seen_rest => Err(ConfigurationError::PositionalAfterRest {
            callable: callable.to_string(),
            name: param.name.clone(),
        }),
        // The positionally fillable parameters must form a prefix.
        ParamKind::Positional if seen_keyword_only => {
            Err(ConfigurationError::PositionalAfterKeywordOnly {
                callable: callable.to_string(),
                name: param.name.clone(),
            })
        }
        ParamKind::Rest if seen_rest => Err(ConfigurationError::DuplicateBucket {
            callable: callable.to_string(),
            name: param.name.clone(),
        }),
        _ => Ok(()),
    }
}

fn insert_name(
    callable: &str,
    by_name: &mut HashMap<String, usize>,
    name: &str,
    position: usize,
) -> Result<(), ConfigurationError> {
    if by_name.insert(name.to_string(), position).is_some() {
        return Err(ConfigurationError::DuplicateParameter {
            callable: callable.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn report_unchecked_param(callable: &str, param: &Param) {
    // Buckets are unchecked by definition; only named slots are worth
    // flagging.
    let named = matches!(param.kind, ParamKind::Positional | ParamKind::KeywordOnly);
    if named && enforcement::report_unchecked() {
        warn!(
            callable = %callable,
            parameter = %param.name,
            "parameter has no declared type and will not be checked"
        );
    }
}
