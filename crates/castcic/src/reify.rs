//! Conversions between the tagged-value AST the machine runs on and the
//! plain source terms callers hand in and read back out.

use crate::{
    kont::Kont,
    subst::subst_closure,
    term::{CastInfo, FunInfo, Term},
    value::VTerm,
};

/// Lifts a source term into the tagged-value AST the machine steps over.
/// This is a structural embedding with no environment attached anywhere —
/// every binder starts life with an empty closure, since a freshly parsed
/// term has no captured bindings yet.
#[must_use]
pub fn to_vterm(t: &Term) -> VTerm {
    match t {
        Term::Var(id) => VTerm::Var(id.clone()),
        Term::Const(id) => VTerm::Const(id.clone()),
        Term::Universe(i) => VTerm::Universe(*i),
        Term::App(f, a) => VTerm::app(to_vterm(f), to_vterm(a)),
        Term::Lambda(fi) => VTerm::Lambda(to_vterm_fun_info(fi)),
        Term::Prod(fi) => VTerm::Prod(to_vterm_fun_info(fi)),
        Term::Unknown(ty) => VTerm::unknown(to_vterm(ty)),
        Term::Err(ty) => VTerm::err(to_vterm(ty)),
        Term::Cast(c) => VTerm::Cast(to_vterm_cast_info(c)),
    }
}

fn to_vterm_fun_info(fi: &FunInfo<Term>) -> FunInfo<VTerm> {
    FunInfo::new(fi.id.clone(), to_vterm(&fi.dom), to_vterm(&fi.body))
}

fn to_vterm_cast_info(c: &CastInfo<Term>) -> CastInfo<VTerm> {
    CastInfo::new(to_vterm(&c.source), to_vterm(&c.target), to_vterm(&c.term))
}

/// Reifies a tagged value back into displayable source syntax.
///
/// `VLambda`/`VProd` closures have nowhere to put their captured
/// environment in source syntax, so it is folded into the binder's
/// `dom`/`body` via [`subst_closure`] before reification rather than
/// silently dropped — dropping it would leave free variables in the
/// printed term that the original closure's environment had already
/// resolved.
#[must_use]
pub fn of_vterm(v: &VTerm) -> Term {
    match v {
        VTerm::Var(id) => Term::Var(id.clone()),
        VTerm::Const(id) => Term::Const(id.clone()),
        VTerm::Universe(i) => Term::Universe(*i),
        VTerm::App(f, a) => Term::app(of_vterm(f), of_vterm(a)),
        VTerm::Lambda(fi) => Term::Lambda(of_fun_info(fi)),
        VTerm::Prod(fi) => Term::Prod(of_fun_info(fi)),
        VTerm::Unknown(ty) => Term::unknown(of_vterm(ty)),
        VTerm::Err(ty) => Term::err(of_vterm(ty)),
        VTerm::Cast(c) => Term::Cast(of_cast_info(c)),
        VTerm::VLambda(fi, env) => Term::Lambda(of_closure(fi, env)),
        VTerm::VProd(fi, env) => Term::Prod(of_closure(fi, env)),
        VTerm::VUnknown(ty) => Term::unknown(of_vterm(ty)),
        VTerm::VErr(ty) => Term::err(of_vterm(ty)),
        VTerm::VCast(c) => Term::Cast(of_cast_info(c)),
    }
}

fn of_fun_info(fi: &FunInfo<VTerm>) -> FunInfo<Term> {
    FunInfo::new(fi.id.clone(), of_vterm(&fi.dom), of_vterm(&fi.body))
}

fn of_closure(fi: &FunInfo<VTerm>, env: &crate::env::Env) -> FunInfo<Term> {
    of_fun_info(&subst_closure(env, fi))
}

fn of_cast_info(c: &CastInfo<VTerm>) -> CastInfo<Term> {
    CastInfo::new(of_vterm(&c.source), of_vterm(&c.target), of_vterm(&c.term))
}

/// Rebuilds the full term a stuck `(control, kont)` configuration
/// represents, by reifying `control` and then wrapping it in each
/// continuation frame from the inside out. Used only to produce a
/// human-readable [`crate::error::ReduceError::Stuck`] payload — the
/// machine itself never needs to undo a continuation this way.
#[must_use]
pub fn fill_hole(control: Term, kont: &Kont) -> Term {
    match kont {
        Kont::Hole => control,
        Kont::AppL { arg, env, next } => fill_hole(Term::app(control, of_vterm(&crate::subst::subst(env, arg))), next),
        Kont::AppR { func, next } => fill_hole(Term::app(of_vterm(func), control), next),
        Kont::Lambda { fi, env, next } => {
            let body = of_vterm(&crate::subst::subst(env, &fi.body));
            fill_hole(Term::lambda(fi.id.clone(), control, body), next)
        }
        Kont::Prod { fi, env, next } => {
            let body = of_vterm(&crate::subst::subst(env, &fi.body));
            fill_hole(Term::prod(fi.id.clone(), control, body), next)
        }
        Kont::Unknown { next } => fill_hole(Term::unknown(control), next),
        Kont::Err { next } => fill_hole(Term::err(control), next),
        Kont::CastTarget { source, term, env, next } => {
            let source = of_vterm(&crate::subst::subst(env, source));
            let term = of_vterm(&crate::subst::subst(env, term));
            fill_hole(Term::cast(source, control, term), next)
        }
        Kont::CastSource { target, term, env, next } => {
            let term = of_vterm(&crate::subst::subst(env, term));
            fill_hole(Term::cast(control, of_vterm(target), term), next)
        }
        Kont::CastTerm { source, target, next } => fill_hole(Term::cast(of_vterm(source), of_vterm(target), control), next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::Env, ident::Ident};
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_a_plain_term() {
        let x = Ident::named("x");
        let t = Term::lambda(x.clone(), Term::Universe(0), Term::var(x));
        assert_eq!(of_vterm(&to_vterm(&t)), t);
    }

    #[test]
    fn closure_env_is_folded_in_not_dropped() {
        let x = Ident::named("x");
        let y = Ident::named("y");
        let env = Env::empty().add(x.clone(), VTerm::Var(y.clone()));
        let fi = FunInfo::new(Ident::named("z"), VTerm::Universe(0), VTerm::Var(x));
        let closure = VTerm::VLambda(fi, env);
        let reified = of_vterm(&closure);
        match reified {
            Term::Lambda(fi) => assert_eq!(*fi.body, Term::var(y)),
            other => panic!("expected a lambda, got {other:?}"),
        }
    }

    #[test]
    fn fill_hole_rebuilds_an_application_context() {
        let f = Ident::named("f");
        let kont = Kont::AppR { func: VTerm::Var(f.clone()), next: Box::new(Kont::Hole) };
        let rebuilt = fill_hole(Term::Universe(0), &kont);
        assert_eq!(rebuilt, Term::app(Term::var(f), Term::Universe(0)));
    }
}
