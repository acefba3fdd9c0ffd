//! Declared call signatures.
//!
//! Rust has no runtime introspection of parameter names or annotations,
//! so the declaration is an explicit descriptor written alongside the
//! callable. A [`FnSignature`] is plain data: nothing is normalized or
//! validated until a contract is built from it.

use callguard_types::TypeExpr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in the shape of a declared signature, caught at decoration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("duplicate parameter `{name}` in signature of `{callable}`")]
    DuplicateParameter { callable: String, name: String },

    #[error("signature of `{callable}` declares more than one `{name}`-style catch-all bucket")]
    DuplicateBucket { callable: String, name: String },

    #[error("positional parameter `{name}` of `{callable}` follows the extra-positional bucket; declare it keyword-only")]
    PositionalAfterRest { callable: String, name: String },

    #[error("positional parameter `{name}` of `{callable}` follows a keyword-only parameter")]
    PositionalAfterKeywordOnly { callable: String, name: String },

    #[error("parameter `{name}` of `{callable}` follows the extra-keywords bucket, which must close the signature")]
    ParameterAfterKeywords { callable: String, name: String },
}

/// How a parameter may be supplied at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Ordinary parameter: supplied positionally or by name.
    Positional,
    /// Supplied by name only.
    KeywordOnly,
    /// Catch-all bucket for surplus positional arguments.
    Rest,
    /// Catch-all bucket for unknown keyword arguments.
    Keywords,
}

/// One declared parameter.
///
/// Catch-all buckets cannot carry a declared type: per-element
/// declarations on a variadic bucket are not supported, so both bucket
/// kinds accept anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub declared: Option<TypeExpr>,
    pub kind: ParamKind,
}

impl Param {
    /// An ordinary parameter with a declared type.
    pub fn typed(name: impl Into<String>, declared: impl Into<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared.into()),
            kind: ParamKind::Positional,
        }
    }

    /// An ordinary parameter with no declared type. Never checked.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            kind: ParamKind::Positional,
        }
    }

    /// A keyword-only parameter with a declared type.
    pub fn keyword_only(name: impl Into<String>, declared: impl Into<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared.into()),
            kind: ParamKind::KeywordOnly,
        }
    }

    /// A keyword-only parameter with no declared type.
    pub fn untyped_keyword_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            kind: ParamKind::KeywordOnly,
        }
    }

    /// The surplus-positional bucket.
    pub fn rest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            kind: ParamKind::Rest,
        }
    }

    /// The unknown-keyword bucket.
    pub fn keywords(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            kind: ParamKind::Keywords,
        }
    }
}

/// The declared shape of one callable: ordered parameters plus an
/// optional return declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<TypeExpr>,
}

impl FnSignature {
    /// Start a signature for the named callable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
        }
    }

    /// Append one parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Append several parameters.
    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    /// Declare the return type. Absent means the return is unchecked.
    pub fn returns(mut self, declared: impl Into<TypeExpr>) -> Self {
        self.ret = Some(declared.into());
        self
    }
}
