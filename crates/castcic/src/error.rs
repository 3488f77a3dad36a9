//! Fatal reduction errors.
//!
//! The machine never recovers from one of these on its own — they are
//! distinct from `Err`/`?`, which are in-language values the calculus
//! itself knows how to propagate. Reaching one of these variants means the
//! *driver*, not the calculus, has nothing left to do.

use std::fmt;

use crate::{ident::Ident, term::Term};

/// Why a call to [`crate::reduce`] or [`crate::reduce_in`] stopped without
/// producing a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReduceError {
    /// The machine reached a control/continuation pair that no redex,
    /// congruence, or descent rule applies to, and the control is not a
    /// value. Carries the source-level reification of the stuck control so
    /// callers can report where reduction got wedged.
    Stuck(Term),
    /// A `Var` was encountered with no binding in scope, in either the
    /// environment or the continuation stack. A free identifier is always a
    /// fatal condition here — it is never treated as a neutral term to
    /// reduce under.
    FreeIdentifier(Ident),
    /// The driver's step budget was exhausted before reaching a value.
    /// Termination under a finite fuel bound is not a promise the calculus
    /// itself makes; it is only a non-looping-forever guarantee for the
    /// driver in this crate.
    FuelExhausted,
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stuck(control) => write!(f, "reduction stuck at `{control}`"),
            Self::FreeIdentifier(id) => write!(f, "free identifier `{id}` has no binding"),
            Self::FuelExhausted => write!(f, "fuel exhausted before reaching a value"),
        }
    }
}

impl std::error::Error for ReduceError {}

/// The result type every fallible entry point in this crate returns.
pub type ReduceResult<T> = Result<T, ReduceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn displays_are_human_readable() {
        assert_eq!(ReduceError::FuelExhausted.to_string(), "fuel exhausted before reaching a value");
        let err = ReduceError::FreeIdentifier(Ident::named("x"));
        assert!(err.to_string().contains('x'));
    }
}
