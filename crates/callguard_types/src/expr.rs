//! Declared type expressions.
//!
//! A [`TypeExpr`] is what a host writes next to a parameter or return
//! slot. It is declarative data - nothing is checked until the
//! expression is flattened by [`crate::normalize`].

use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared constraint on a value's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// No constraint - matches any value.
    Any,
    /// A single concrete type.
    Concrete(ValueType),
    /// Alternation: the value must match any one member.
    Union(Vec<TypeExpr>),
    /// A parameterized container, e.g. `list[int]` or `dict[str, int]`.
    ///
    /// Only the origin is checked; the inner parameters are discarded
    /// during normalization. Checking them would mean walking every
    /// contained element on every call, which this design does not do.
    Generic {
        origin: String,
        params: Vec<TypeExpr>,
    },
    /// A literal value standing in for its own runtime type.
    ///
    /// Fallback shape for malformed declarations: the constraint is the
    /// value's concrete type, not the value itself.
    Example(Value),
}

impl TypeExpr {
    /// Alternation over the given members.
    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        TypeExpr::Union(members.into_iter().collect())
    }

    /// The declared type or null - `optional(T)` is `Union[T, null]`.
    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Union(vec![inner, TypeExpr::Concrete(ValueType::Null)])
    }

    /// A parameterized container with the given origin name.
    pub fn generic(origin: impl Into<String>, params: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic {
            origin: origin.into(),
            params,
        }
    }

    /// A nominal record class, matched by name.
    pub fn class(name: impl Into<String>) -> Self {
        TypeExpr::Concrete(ValueType::Record(name.into()))
    }
}

impl From<ValueType> for TypeExpr {
    fn from(ty: ValueType) -> Self {
        TypeExpr::Concrete(ty)
    }
}

/// A plain list of expressions is an implicit alternation.
impl From<Vec<TypeExpr>> for TypeExpr {
    fn from(members: Vec<TypeExpr>) -> Self {
        TypeExpr::Union(members)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Any => write!(f, "any"),
            TypeExpr::Concrete(ty) => write!(f, "{}", ty),
            TypeExpr::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            TypeExpr::Generic { origin, params } => {
                write!(f, "{}[", origin)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, "]")
            }
            TypeExpr::Example(value) => write!(f, "{}", value),
        }
    }
}
