//! Capture-avoiding substitution.
//!
//! There is no free-variable check against the substituted term's domain:
//! every binder encountered is renamed to a brand-new [`Ident::fresh`]
//! identifier unconditionally, and the old binder is rebound to the fresh
//! one for the recursive walk over the body. A binder can never capture a
//! substituted-in variable because its own name no longer collides with
//! anything — this is strictly more work than a free-variable-set check
//! would require, but it avoids the bookkeeping of computing free-variable
//! sets at every step.

use crate::{
    env::Env,
    term::{CastInfo, FunInfo},
    value::VTerm,
};

/// `subst(env, t)`: applies every binding in `env` to `t` simultaneously,
/// renaming bound variables as needed to avoid capturing any of `env`'s
/// bindings (or being captured by them).
#[must_use]
pub fn subst(env: &Env, t: &VTerm) -> VTerm {
    match t {
        VTerm::Var(id) => env.lookup(id).cloned().unwrap_or_else(|| VTerm::Var(id.clone())),
        VTerm::Universe(i) => VTerm::Universe(*i),
        VTerm::Const(id) => VTerm::Const(id.clone()),
        VTerm::App(f, a) => VTerm::app(subst(env, f), subst(env, a)),
        VTerm::Lambda(fi) => VTerm::Lambda(subst_fun_info(env, fi)),
        VTerm::Prod(fi) => VTerm::Prod(subst_fun_info(env, fi)),
        VTerm::Unknown(ty) => VTerm::unknown(subst(env, ty)),
        VTerm::Err(ty) => VTerm::err(subst(env, ty)),
        VTerm::Cast(c) => VTerm::Cast(subst_cast_info(env, c)),
        VTerm::VLambda(fi, closure_env) => VTerm::Lambda(subst_fun_info(env, &subst_closure(closure_env, fi))),
        VTerm::VProd(fi, closure_env) => VTerm::Prod(subst_fun_info(env, &subst_closure(closure_env, fi))),
        VTerm::VUnknown(ty) => VTerm::unknown(subst(env, ty)),
        VTerm::VErr(ty) => VTerm::err(subst(env, ty)),
        VTerm::VCast(c) => VTerm::Cast(subst_cast_info(env, c)),
    }
}

/// Substitutes through a `{id, dom, body}` binder, always renaming `id` to
/// a fresh identifier first so that no binding already present in `env` can
/// be captured, and no identifier in `env`'s range can shadow `id`.
#[must_use]
pub(crate) fn subst_fun_info(env: &Env, fi: &FunInfo<VTerm>) -> FunInfo<VTerm> {
    let fresh_id = fi.id.fresh();
    let dom = subst(env, &fi.dom);
    let shadowed_env = env.add(fi.id.clone(), VTerm::Var(fresh_id.clone()));
    let body = subst(&shadowed_env, &fi.body);
    FunInfo::new(fresh_id, dom, body)
}

/// Flattens a closure's captured environment into its `dom`/`body` by
/// substituting it in directly, leaving a binder shape with no separate
/// environment left to carry. Used both by `subst` (a closure nested inside
/// a term being substituted must first shed its own captured bindings
/// before the outer substitution can walk into it) and by
/// [`crate::reify::of_vterm`] (turning a closure value back into displayable
/// source syntax has nowhere to put its environment, so it must be folded
/// in instead of silently discarded).
#[must_use]
pub(crate) fn subst_closure(closure_env: &Env, fi: &FunInfo<VTerm>) -> FunInfo<VTerm> {
    if closure_env.is_empty() {
        fi.clone()
    } else {
        subst_fun_info(closure_env, fi)
    }
}

/// Substitutes through a `{source, target, term}` cast.
#[must_use]
pub(crate) fn subst_cast_info(env: &Env, c: &CastInfo<VTerm>) -> CastInfo<VTerm> {
    CastInfo::new(subst(env, &c.source), subst(env, &c.target), subst(env, &c.term))
}
