//! Call-site type contracts for dynamic host callables.
//!
//! # Philosophy: Declaration = Intent, then Contract
//!
//! The lifecycle of a guarded callable:
//!
//! 1. **Declaration**: the host writes a [`FnSignature`] next to the
//!    callable - parameter names in order, each with an optional
//!    [`TypeExpr`], plus an optional return declaration
//! 2. **Locking**: [`decorate`] flattens every declared expression and
//!    freezes the result into an immutable [`Contract`]. Malformed
//!    declarations fail here, never on a later call
//! 3. **Enforcement**: every invocation checks supplied arguments
//!    before the body runs and the result after it returns. Violations
//!    are failures, not warnings
//!
//! There is no coercion and no recovery: a value either belongs to a
//! parameter's locked type set or the call is rejected. Checking is
//! shallow - a declared `list[int]` requires a list, not a list of
//! ints - and unannotated parameters accept anything.
//!
//! The process-wide [`set_enforcement`] switch turns checking off
//! entirely, making a guarded callable behave like the bare one; the
//! callable itself always runs.
//!
//! # Modules
//!
//! - [`signature`]: Declared signatures ([`FnSignature`], [`Param`])
//! - [`contract`]: Locking declarations into a [`Contract`]
//! - [`validate`]: Pure per-call membership checks and [`CallArgs`]
//! - [`guard`]: The [`Guarded`] wrapper and [`decorate`]
//! - [`enforcement`]: Process-wide switches

pub mod contract;
pub mod enforcement;
pub mod guard;
pub mod signature;
pub mod validate;

// Re-export the canonical value/descriptor vocabulary
pub use callguard_types::{
    normalize, TypeDeterminationError, TypeExpr, TypeSet, Value, ValueType,
};

pub use contract::{Contract, DecorationError, ParameterSpec};
pub use enforcement::{enforcement_enabled, set_enforcement, set_report_unchecked};
pub use guard::{decorate, CallError, Guarded};
pub use signature::{ConfigurationError, FnSignature, Param, ParamKind};
pub use validate::{CallArgs, ValidationError};
