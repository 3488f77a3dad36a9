//! The tagged-value AST the CEK machine actually operates on.
//!
//! `VTerm` is a superset of [`crate::term::Term`]: the "raw" constructors
//! (`Var`, `App`, `Unknown`, `Err`, `Cast`, `Lambda`, `Prod`) still exist
//! here because the machine walks through them on the way to a value, and
//! three of them (`Unknown`, `Err`, `Cast`) grow an explicitly tagged
//! sibling (`VUnknown`, `VErr`, `VCast`) once their contents settle into a
//! value. `VLambda` and `VProd` have no untagged-vs-tagged split on the
//! value side — they only ever become values by growing a captured
//! environment, which the plain `Lambda`/`Prod` variants don't carry.

use crate::{
    env::Env,
    ident::Ident,
    term::{CastInfo, FunInfo},
};

#[derive(Clone, Debug, PartialEq)]
pub enum VTerm {
    Var(Ident),
    Universe(u32),
    App(Box<VTerm>, Box<VTerm>),
    Lambda(FunInfo<VTerm>),
    Prod(FunInfo<VTerm>),
    Unknown(Box<VTerm>),
    Err(Box<VTerm>),
    Cast(CastInfo<VTerm>),
    Const(Ident),

    /// A function value: `fun id : dom. body` closed over `env`. `body` is
    /// deliberately left unsubstituted — substitution happens lazily, at
    /// application time, by extending `env`.
    VLambda(FunInfo<VTerm>, Env),
    /// A product (type) value, same closure shape as `VLambda`.
    VProd(FunInfo<VTerm>, Env),
    /// The canonical unknown inhabitant of a value type. Not itself a value
    /// when the wrapped type is a `VProd` — see [`is_value`].
    VUnknown(Box<VTerm>),
    /// The canonical error inhabitant of a value type, same caveat as
    /// `VUnknown`.
    VErr(Box<VTerm>),
    /// A cast value that has settled as a canonical injection into `?`
    /// rather than reducing any further.
    VCast(CastInfo<VTerm>),
}

impl VTerm {
    #[must_use]
    pub fn var(id: Ident) -> Self {
        Self::Var(id)
    }

    #[must_use]
    pub fn app(f: VTerm, arg: VTerm) -> Self {
        Self::App(Box::new(f), Box::new(arg))
    }

    #[must_use]
    pub fn unknown(ty: VTerm) -> Self {
        Self::Unknown(Box::new(ty))
    }

    #[must_use]
    pub fn err(ty: VTerm) -> Self {
        Self::Err(Box::new(ty))
    }

    #[must_use]
    pub fn cast(source: VTerm, target: VTerm, term: VTerm) -> Self {
        Self::Cast(CastInfo::new(source, target, term))
    }
}

/// `is_type(v)`: `v` is a value that classifies other values.
#[must_use]
pub fn is_type(v: &VTerm) -> bool {
    matches!(v, VTerm::VProd(_, _) | VTerm::Universe(_))
}

/// `is_value(v)`.
///
/// `VUnknown(VProd _)` and `VErr(VProd _)` are carved out: they still have
/// to eta-expand into a lambda via the Prod-Unk / Prod-Err redex rules
/// before they're in normal form, so the machine must not mistake them for
/// terminal states. A `Var` never reaches this function as a terminal
/// state: an unresolved variable is a fatal `FreeIdentifier`, not a value —
/// only `Const`-headed applications are legitimate stuck values, since a
/// `Const` is an opaque reference nothing in this core ever rewrites.
#[must_use]
pub fn is_value(v: &VTerm) -> bool {
    match v {
        VTerm::Universe(_) | VTerm::VLambda(_, _) | VTerm::VProd(_, _) | VTerm::VCast(_) | VTerm::Const(_) => true,
        VTerm::VUnknown(inner) | VTerm::VErr(inner) => !matches!(**inner, VTerm::VProd(_, _)),
        VTerm::App(_, _) => is_neutral(v),
        _ => false,
    }
}

/// `is_neutral(t)`, lifted to tagged values: an application stuck on
/// an opaque `Const` head. Never matches a `Var` head — a free variable is
/// never a legitimate terminal state in this core, see [`is_value`].
#[must_use]
pub fn is_neutral(t: &VTerm) -> bool {
    match t {
        VTerm::Const(_) => true,
        VTerm::App(f, _) => is_neutral(f),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prod_value() -> VTerm {
        VTerm::VProd(FunInfo::new(Ident::named("x"), VTerm::Universe(0), VTerm::Universe(0)), Env::empty())
    }

    #[test]
    fn universe_and_closures_are_values() {
        assert!(is_value(&VTerm::Universe(0)));
        assert!(is_value(&prod_value()));
    }

    #[test]
    fn unknown_of_prod_is_not_a_value() {
        assert!(!is_value(&VTerm::VUnknown(Box::new(prod_value()))));
        assert!(!is_value(&VTerm::VErr(Box::new(prod_value()))));
    }

    #[test]
    fn unknown_of_universe_is_a_value() {
        assert!(is_value(&VTerm::VUnknown(Box::new(VTerm::Universe(0)))));
    }

    #[test]
    fn bare_var_and_app_are_not_values() {
        assert!(!is_value(&VTerm::Var(Ident::named("x"))));
        assert!(!is_value(&VTerm::app(VTerm::Var(Ident::named("f")), VTerm::Universe(0))));
    }
}
