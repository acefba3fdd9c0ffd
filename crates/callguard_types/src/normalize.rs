//! Flattening declared expressions into checkable type sets.
//!
//! Normalization happens exactly once per declared expression, when a
//! contract is built. The per-call checks only ever see the flattened
//! [`TypeSet`], never the original [`TypeExpr`].

use crate::expr::TypeExpr;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors from flattening a declared expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeDeterminationError {
    /// The expression names a container origin outside list/dict/tuple.
    #[error("unsupported generic type `{expr}`; use a union of the base types or the bare container type (e.g. `dict` instead of `dict[k, v]`)")]
    UnsupportedGeneric { expr: String },

    /// An alternation with no members matches nothing.
    #[error("union type with no members can never match")]
    EmptyUnion,
}

/// The flattened, checkable form of a declared expression.
///
/// `AnyOf` is never empty. Built once at contract time, immutable
/// thereafter, and safe to consult from any number of call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSet {
    /// Matches every value. Produced by unannotated slots.
    Universal,
    /// Matches values whose concrete type is a member.
    AnyOf(BTreeSet<ValueType>),
}

impl TypeSet {
    /// Set containing exactly one concrete type.
    pub fn singleton(ty: ValueType) -> Self {
        TypeSet::AnyOf(BTreeSet::from([ty]))
    }

    /// The single membership predicate used by every check.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeSet::Universal => true,
            TypeSet::AnyOf(types) => types.contains(&value.value_type()),
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, TypeSet::Universal)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSet::Universal => write!(f, "any"),
            TypeSet::AnyOf(types) => {
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                Ok(())
            }
        }
    }
}

/// Flatten a declared expression into a [`TypeSet`].
///
/// Recursive; depth is bounded by the nesting of the expression. Total
/// for supported shapes - an unsupported container origin is an error,
/// not a default.
pub fn normalize(expr: &TypeExpr) -> Result<TypeSet, TypeDeterminationError> {
    match expr {
        TypeExpr::Any => Ok(TypeSet::Universal),
        TypeExpr::Concrete(ty) => Ok(TypeSet::singleton(ty.clone())),
        TypeExpr::Union(members) => {
            if members.is_empty() {
                return Err(TypeDeterminationError::EmptyUnion);
            }
            let mut types = BTreeSet::new();
            for member in members {
                match normalize(member)? {
                    // One unconstrained member makes the whole set unconstrained.
                    TypeSet::Universal => return Ok(TypeSet::Universal),
                    TypeSet::AnyOf(sub) => types.extend(sub),
                }
            }
            Ok(TypeSet::AnyOf(types))
        }
        TypeExpr::Generic { origin, .. } => {
            // Inner parameters are discarded: a declared `list[int]` only
            // requires the value to be a list, not that every element is
            // an int. Deep checks would walk every element on every call.
            match origin.to_ascii_lowercase().as_str() {
                "list" => Ok(TypeSet::singleton(ValueType::List)),
                "dict" | "map" => Ok(TypeSet::singleton(ValueType::Map)),
                "tuple" => Ok(TypeSet::singleton(ValueType::Tuple)),
                _ => Err(TypeDeterminationError::UnsupportedGeneric {
                    expr: expr.to_string(),
                }),
            }
        }
        TypeExpr::Example(value) => Ok(TypeSet::singleton(value.value_type())),
    }
}
