//! Source terms of CastCIC.

use std::fmt;

use crate::ident::Ident;

/// The `{id, dom, body}` shape shared by `Lambda` and `Prod`, generic over
/// the term representation so it can be reused for both [`Term`] and the
/// tagged-value AST in [`crate::value`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunInfo<T> {
    pub id: Ident,
    pub dom: Box<T>,
    pub body: Box<T>,
}

impl<T> FunInfo<T> {
    pub fn new(id: Ident, dom: T, body: T) -> Self {
        Self { id, dom: Box::new(dom), body: Box::new(body) }
    }
}

/// The `{source, target, term}` shape of a cast, generic for the same reason
/// as [`FunInfo`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastInfo<T> {
    pub source: Box<T>,
    pub target: Box<T>,
    pub term: Box<T>,
}

impl<T> CastInfo<T> {
    pub fn new(source: T, target: T, term: T) -> Self {
        Self { source: Box::new(source), target: Box::new(target), term: Box::new(term) }
    }
}

/// A CastCIC source term.
///
/// `Unknown` and `Err` always carry the type they inhabit, never a bare
/// level — there is no constructor that lets you build one without it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Var(Ident),
    Universe(u32),
    App(Box<Term>, Box<Term>),
    Lambda(FunInfo<Term>),
    Prod(FunInfo<Term>),
    Unknown(Box<Term>),
    Err(Box<Term>),
    Cast(CastInfo<Term>),
    Const(Ident),
}

impl Term {
    #[must_use]
    pub fn var(id: Ident) -> Self {
        Self::Var(id)
    }

    #[must_use]
    pub fn app(f: Term, arg: Term) -> Self {
        Self::App(Box::new(f), Box::new(arg))
    }

    #[must_use]
    pub fn lambda(id: Ident, dom: Term, body: Term) -> Self {
        Self::Lambda(FunInfo::new(id, dom, body))
    }

    #[must_use]
    pub fn prod(id: Ident, dom: Term, body: Term) -> Self {
        Self::Prod(FunInfo::new(id, dom, body))
    }

    #[must_use]
    pub fn unknown(ty: Term) -> Self {
        Self::Unknown(Box::new(ty))
    }

    #[must_use]
    pub fn err(ty: Term) -> Self {
        Self::Err(Box::new(ty))
    }

    #[must_use]
    pub fn cast(source: Term, target: Term, term: Term) -> Self {
        Self::Cast(CastInfo::new(source, target, term))
    }

    /// `is_canonical(t)`: the value predicates, applied to source
    /// form. `Var`, `App`, and `Const` are never canonical — they always
    /// need the machine to make progress.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        matches!(self, Term::Universe(_) | Term::Lambda(_) | Term::Prod(_) | Term::Unknown(_) | Term::Err(_) | Term::Cast(_))
    }

    /// `is_neutral(t)`: an application whose head, after peeling every
    /// argument off the spine, is an unresolved variable.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        match self {
            Term::Var(_) => true,
            Term::App(f, _) => f.is_neutral(),
            _ => false,
        }
    }
}

/// Renders the pretty-printable surface syntax: `▢i`, `fun id : dom. body`,
/// `Π id : dom. body`, `?_T`, `err_T`, `⟨t ⇐ s⟩ u`, `(f x)`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(id) => write!(f, "{id}"),
            Term::Const(id) => write!(f, "{id}"),
            Term::Universe(i) => write!(f, "▢{i}"),
            Term::App(func, arg) => write!(f, "({func} {arg})"),
            Term::Lambda(fi) => write!(f, "fun {} : {}. {}", fi.id, fi.dom, fi.body),
            Term::Prod(fi) => write!(f, "Π {} : {}. {}", fi.id, fi.dom, fi.body),
            Term::Unknown(ty) => write!(f, "?_{ty}"),
            Term::Err(ty) => write!(f, "err_{ty}"),
            Term::Cast(c) => write!(f, "⟨{} ⇐ {}⟩ {}", c.target, c.source, c.term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn displays_universe() {
        assert_eq!(Term::Universe(3).to_string(), "▢3");
    }

    #[test]
    fn displays_cast() {
        let x = Ident::named("x");
        let t = Term::cast(Term::Universe(0), Term::Universe(1), Term::var(x));
        assert_eq!(t.to_string(), "⟨▢1 ⇐ ▢0⟩ x");
    }

    #[test]
    fn is_neutral_peels_application_spine() {
        let f = Ident::named("f");
        let a = Ident::named("a");
        let app = Term::app(Term::var(f), Term::var(a));
        assert!(app.is_neutral());
        assert!(!Term::Universe(0).is_neutral());
    }

    #[test]
    fn is_canonical_excludes_var_app_const() {
        assert!(Term::Universe(0).is_canonical());
        assert!(!Term::var(Ident::named("x")).is_canonical());
        assert!(!Term::Const(Ident::named("c")).is_canonical());
    }
}
