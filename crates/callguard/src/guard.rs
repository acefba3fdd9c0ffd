//! The call-validating wrapper.
//!
//! [`decorate`] locks a declared signature into a [`Contract`] and
//! binds it to the callable. The returned [`Guarded`] owns both; every
//! invocation goes through the contract's checks before and after
//! delegating, and the callable itself always runs with the original
//! arguments, unmodified.

use crate::contract::{Contract, DecorationError};
use crate::enforcement;
use crate::signature::FnSignature;
use crate::validate::{self, CallArgs, ValidationError};
use callguard_types::Value;
use thiserror::Error;

/// Why a guarded call did not produce a value.
///
/// `Host` wraps whatever the callable's own body failed with; it is
/// never reinterpreted as a contract violation.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error("{0}")]
    Host(anyhow::Error),
}

/// A callable bound to its locked contract.
pub struct Guarded<F> {
    contract: Contract,
    func: F,
}

impl<F> Guarded<F>
where
    F: Fn(&CallArgs) -> anyhow::Result<Value>,
{
    /// The locked contract this wrapper enforces.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Invoke the wrapped callable under the contract.
    ///
    /// The enforcement switch is read once per call: a call that starts
    /// unchecked stays unchecked through its return, even if the switch
    /// flips mid-flight.
    pub fn call(&self, args: CallArgs) -> Result<Value, CallError> {
        let enforce = enforcement::enforcement_enabled();

        if enforce {
            validate::check_positional(&self.contract, args.positional_args())?;
            validate::check_keywords(&self.contract, args.keyword_args())?;
        }

        let value = (self.func)(&args).map_err(CallError::Host)?;

        if enforce {
            validate::check_return(&self.contract, &value)?;
        }

        Ok(value)
    }
}

/// Wrap a callable in its declared contract.
///
/// Fails, eagerly, if the signature's shape is invalid or any declared
/// type expression cannot be flattened - a malformed contract never
/// produces a wrapper.
pub fn decorate<F>(signature: &FnSignature, func: F) -> Result<Guarded<F>, DecorationError>
where
    F: Fn(&CallArgs) -> anyhow::Result<Value>,
{
    let contract = Contract::build(signature)?;
    Ok(Guarded { contract, func })
}
