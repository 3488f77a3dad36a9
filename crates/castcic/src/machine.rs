//! The CEK reduction machine.
//!
//! The machine walks a `(control, env, kont)` triple. `control` is the term
//! currently being reduced; `env` resolves its free variables; `kont` is
//! the stack of pending work still left once `control` settles into a
//! value. Every step either descends into a subterm (pushing a new
//! continuation frame) or pops a settled value back into the frame that was
//! waiting on it, applying whichever redex rule that frame/value pairing
//! triggers.

use crate::{
    env::Env,
    error::{ReduceError, ReduceResult},
    kont::Kont,
    reify::{fill_hole, of_vterm, to_vterm},
    subst::subst,
    term::{CastInfo, FunInfo, Term},
    universe::{cast_universe_level, germ, head_of, is_germ, is_germ_for_gte_level, GcicVariant, HeadCtor},
    value::{is_neutral, is_value, VTerm},
};

/// Parameters threaded explicitly through every call instead of read from a
/// global: which GCIC variant governs universe arithmetic, and how many
/// steps the driver takes before giving up.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub variant: GcicVariant,
    pub fuel: u32,
}

/// A generous default step budget; large enough that any terminating
/// reduction in the test suite finishes well under it, small enough that a
/// genuinely divergent or combinatorially exploding cast chain fails fast
/// instead of hanging the caller.
pub const DEFAULT_FUEL: u32 = 1_000_000;

impl Default for Config {
    fn default() -> Self {
        Self { variant: GcicVariant::G, fuel: DEFAULT_FUEL }
    }
}

/// Reduces a source term to canonical form in the empty environment, under
/// [`GcicVariant::G`] and [`DEFAULT_FUEL`].
pub fn reduce(t: &Term) -> ReduceResult<Term> {
    reduce_in(&Env::empty(), t, &Config::default())
}

/// Performs exactly one machine transition on `t` in `env` and reifies the
/// resulting `(control, kont)` configuration back into a single source term
/// via [`fill_hole`] — the debugging/inspection counterpart to
/// [`reduce_in`], which drives all the way to a fixed point instead of
/// stopping after one rule application.
///
/// A term already in normal form (a value with nothing left pending) is a
/// terminal state: one step from it returns it unchanged.
///
/// # Errors
///
/// Returns [`ReduceError::FreeIdentifier`] if `t`'s head redex is an
/// unbound variable not covered by `env`, or [`ReduceError::Stuck`] if the
/// single transition lands on a configuration no redex, congruence, or
/// descent rule covers.
pub fn step(env: &Env, t: &Term, cfg: &Config) -> ReduceResult<Term> {
    let control = to_vterm(t);
    let env = env.clone();
    let kont = Kont::Hole;
    if kont.is_hole() && is_value(&control) {
        return Ok(of_vterm(&control));
    }
    let (next_control, next_env, next_kont) = transition(control, env, kont, cfg)?;
    let plugged_hole = of_vterm(&subst(&next_env, &next_control));
    Ok(fill_hole(plugged_hole, &next_kont))
}

/// Reduces a source term to canonical form starting from the bindings in
/// `env`, under an explicit [`Config`].
///
/// # Errors
///
/// Returns [`ReduceError::FreeIdentifier`] if `t` mentions a variable with
/// no binding in `env` and no enclosing binder, [`ReduceError::Stuck`] if
/// the machine reaches a configuration no rule applies to, and
/// [`ReduceError::FuelExhausted`] if `cfg.fuel` steps pass without reaching
/// a value.
pub fn reduce_in(env: &Env, t: &Term, cfg: &Config) -> ReduceResult<Term> {
    let mut control = to_vterm(t);
    let mut env = env.clone();
    let mut kont = Kont::Hole;
    let mut fuel = cfg.fuel;

    loop {
        if kont.is_hole() && is_value(&control) {
            return Ok(of_vterm(&control));
        }
        if fuel == 0 {
            return Err(ReduceError::FuelExhausted);
        }
        fuel -= 1;
        let (next_control, next_env, next_kont) = transition(control, env, kont, cfg)?;
        control = next_control;
        env = next_env;
        kont = next_kont;
    }
}

/// A single machine transition: either descends into `control` (if it is
/// not yet a value) or pops `control`'s value into `kont`'s top frame.
fn transition(control: VTerm, env: Env, kont: Kont, cfg: &Config) -> ReduceResult<(VTerm, Env, Kont)> {
    if is_value(&control) {
        pop(control, kont, cfg)
    } else {
        descend(control, env, kont)
    }
}

/// Pushes a new continuation frame for whichever subterm of `control` must
/// be reduced next. The machine always evaluates left-to-right, target before
/// source before term for casts, and the function before the argument for
/// applications.
fn descend(control: VTerm, env: Env, kont: Kont) -> ReduceResult<(VTerm, Env, Kont)> {
    match control {
        VTerm::Var(id) => match env.lookup(&id) {
            Some(value) => Ok((value.clone(), env.clone(), kont)),
            None => Err(ReduceError::FreeIdentifier(id)),
        },
        VTerm::App(f, a) => Ok((*f, env.clone(), Kont::AppL { arg: *a, env, next: Box::new(kont) })),
        VTerm::Lambda(fi) => Ok((*fi.dom, env.clone(), Kont::Lambda { fi, env, next: Box::new(kont) })),
        VTerm::Prod(fi) => Ok((*fi.dom, env.clone(), Kont::Prod { fi, env, next: Box::new(kont) })),
        VTerm::Unknown(ty) => Ok((*ty, env, Kont::Unknown { next: Box::new(kont) })),
        VTerm::Err(ty) => Ok((*ty, env, Kont::Err { next: Box::new(kont) })),
        VTerm::Cast(c) => {
            Ok((*c.target, env.clone(), Kont::CastTarget { source: *c.source, term: *c.term, env, next: Box::new(kont) }))
        }
        // Prod-Unk / Prod-Err: `is_value` carves these two shapes out
        // specifically because they are not yet in normal form — the
        // unknown/error inhabitant of a product type eta-expands into a
        // lambda that returns unknown/error at the instantiated codomain.
        // `pop` routes any `VUnknown(VProd _)`/`VErr(VProd _)` it produces
        // back here (rather than plugging it straight into the waiting
        // frame) so this one arm covers every context it can arise in — a
        // bare cast target, a cast payload, a function position, top-level.
        VTerm::VUnknown(inner) => match *inner {
            VTerm::VProd(fi, closure_env) => {
                let body = VTerm::unknown(*fi.body);
                let expanded = VTerm::VLambda(FunInfo::new(fi.id, *fi.dom, body), closure_env);
                Ok((expanded, env, kont))
            }
            other => Ok((VTerm::VUnknown(Box::new(other)), env, kont)),
        },
        VTerm::VErr(inner) => match *inner {
            VTerm::VProd(fi, closure_env) => {
                let body = VTerm::err(*fi.body);
                let expanded = VTerm::VLambda(FunInfo::new(fi.id, *fi.dom, body), closure_env);
                Ok((expanded, env, kont))
            }
            other => Ok((VTerm::VErr(Box::new(other)), env, kont)),
        },
        // Universe, Const, and the already-tagged value variants are
        // handled by `is_value` before `descend` is ever called.
        already_a_value => Ok((already_a_value, env, kont)),
    }
}

/// Consumes the top of `kont` now that `value` has settled, applying
/// whichever redex the frame/value pairing triggers. Loops internally so a
/// chain of purely administrative pops (closing a binder, tagging an
/// `Unknown`/`Err`) happens within one call to [`transition`].
fn pop(mut value: VTerm, mut kont: Kont, cfg: &Config) -> ReduceResult<(VTerm, Env, Kont)> {
    loop {
        // `value` can stop being a value mid-chain: popping a `Kont::Unknown`
        // or `Kont::Err` frame over a `VProd` yields `VUnknown(VProd)` /
        // `VErr(VProd)`, which `is_value` explicitly excludes because
        // it still owes the machine a Prod-Unk/Prod-Err eta-expansion.
        // Hand it back to the driver rather than plugging it into whatever
        // frame happens to be on top — `descend` is where that expansion
        // lives.
        if !is_value(&value) {
            return Ok((value, Env::empty(), kont));
        }
        match kont {
            Kont::Hole => return Ok((value, Env::empty(), Kont::Hole)),
            Kont::AppL { arg, env, next } => return Ok((arg, env, Kont::AppR { func: value, next })),
            Kont::AppR { func, next } => match apply(func, value, cfg)? {
                Applied::Value(v) => {
                    value = v;
                    kont = *next;
                }
                Applied::Redex { control, env } => return Ok((control, env, *next)),
            },
            Kont::Lambda { fi, env, next } => {
                value = VTerm::VLambda(FunInfo::new(fi.id, value, *fi.body), env);
                kont = *next;
            }
            Kont::Prod { fi, env, next } => {
                value = VTerm::VProd(FunInfo::new(fi.id, value, *fi.body), env);
                kont = *next;
            }
            Kont::Unknown { next } => {
                value = VTerm::VUnknown(Box::new(value));
                kont = *next;
            }
            Kont::Err { next } => {
                value = VTerm::VErr(Box::new(value));
                kont = *next;
            }
            Kont::CastTarget { source, term, env, next } => {
                return Ok((source, env.clone(), Kont::CastSource { target: value, term, env, next }));
            }
            Kont::CastSource { target, term, env, next } => {
                return Ok((term, env, Kont::CastTerm { source: value, target, next }));
            }
            Kont::CastTerm { source, target, next } => {
                value = cast_redex(source, target, value, cfg)?;
                kont = *next;
            }
        }
    }
}

/// What applying a function value to an already-reduced argument produces:
/// either an immediate value, or a new control/env pair the machine should
/// continue stepping (a beta redex, or the freshly built wrapping term from
/// a Prod-Prod function cast).
enum Applied {
    Value(VTerm),
    Redex { control: VTerm, env: Env },
}

/// The redex rules triggered by `App(func, arg)` once both sides are
/// values. Prod-Unk/Prod-Err never reach this function directly —
/// `pop` hands a not-yet-expanded `VUnknown(VProd)`/`VErr(VProd)` back to
/// `descend` first (see its comment), so by the time a function value lands
/// here it has already eta-expanded into a `VLambda`.
fn apply(func: VTerm, arg: VTerm, _cfg: &Config) -> ReduceResult<Applied> {
    match func {
        VTerm::VLambda(fi, env) => Ok(Applied::Redex { control: *fi.body, env: env.add(fi.id, arg) }),
        VTerm::VCast(c) => match (*c.source, *c.target) {
            (VTerm::VProd(source_fi, source_env), VTerm::VProd(target_fi, target_env)) => {
                let tree = prod_prod_cast(source_fi, source_env, target_fi, target_env, *c.term, arg);
                Ok(Applied::Redex { control: tree, env: Env::empty() })
            }
            (source, target) => Err(ReduceError::Stuck(of_vterm(&VTerm::cast(source, target, *c.term)))),
        },
        func if is_neutral(&func) => Ok(Applied::Value(VTerm::app(func, arg))),
        other => Err(ReduceError::Stuck(of_vterm(&VTerm::app(other, arg)))),
    }
}

/// The Prod-Prod cast expansion: applying a function wrapped in a
/// cast between two product types to an argument `arg` of the *target*
/// domain type.
///
/// 1. Cast `arg` contravariantly down to the source domain.
/// 2. Apply the original function to that cast argument.
/// 3. Cast the result covariantly up from the source codomain (instantiated
///    at the cast argument) to the target codomain (instantiated at `arg`).
///
/// The outer environment of the resulting expression is deliberately empty
/// — every free variable it could mention has already been closed over by
/// `source_env`/`target_env` or is the literal `arg` passed in, so neither
/// endpoint's captured environment needs to be threaded any further than
/// this.
fn prod_prod_cast(
    source_fi: FunInfo<VTerm>,
    source_env: Env,
    target_fi: FunInfo<VTerm>,
    target_env: Env,
    inner_term: VTerm,
    arg: VTerm,
) -> VTerm {
    let arg_down = VTerm::cast((*target_fi.dom).clone(), (*source_fi.dom).clone(), arg.clone());
    let applied = VTerm::app(inner_term, arg_down.clone());
    let source_codomain = subst(&source_env.add(source_fi.id, arg_down), &source_fi.body);
    let target_codomain = subst(&target_env.add(target_fi.id, arg), &target_fi.body);
    VTerm::cast(source_codomain, target_codomain, applied)
}

/// `t` is the canonical injection `?_i` for some level `i` — either the
/// tagged `VUnknown` form once forced, or the plain `Unknown` form still
/// sitting unforced inside a closure's body (e.g. a product's codomain that
/// was never applied). Returns the level.
fn unknown_universe_level(t: &VTerm) -> Option<u32> {
    match t {
        VTerm::VUnknown(inner) | VTerm::Unknown(inner) => match **inner {
            VTerm::Universe(i) => Some(i),
            _ => None,
        },
        _ => None,
    }
}

/// `t` is the canonical error inhabitant of some universe type (`err_{▢_}`),
/// the shape the Dom-Err/Codom-Err rule keys on.
fn is_err_universe(t: &VTerm) -> bool {
    matches!(t, VTerm::VErr(inner) if matches!(**inner, VTerm::Universe(_)))
}

/// The redex rules triggered once a `Cast`'s `source`, `target`, and `term`
/// have all settled. Order matters: the first matching rule below is the one the
/// spec's priority list fires, and several of these cases are mutually
/// exclusive by the shape of `source`/`target` so the exact relative order
/// of independent branches doesn't change the outcome.
fn cast_redex(source: VTerm, target: VTerm, term: VTerm, cfg: &Config) -> ReduceResult<VTerm> {
    // Id / Univ-Univ (rules 1, 8): casting a value to the type it already
    // has is a no-op; for two universes this is exactly `i == j`.
    if source == target {
        return Ok(term);
    }
    // Down-Unk / Down-Err (rules 5, 6): the canonical inhabitants of `?`
    // and `err` propagate through any cast unchanged except for their type
    // tag. The literal rules key on a `VUnknown`/`VErr` nested specifically
    // at a universe germ; this generalizes to any `VUnknown`/`VErr` payload,
    // since `?`/`err` recast at a different type is still just `?`/`err` at
    // that type — a value-typed `VUnknown(VProd _)` never reaches here
    // (`pop` eta-expands it into a `VLambda` before a cast's term settles).
    if matches!(term, VTerm::VUnknown(_)) {
        return Ok(VTerm::VUnknown(Box::new(target)));
    }
    if matches!(term, VTerm::VErr(_)) {
        return Ok(VTerm::VErr(Box::new(target)));
    }
    // Head-Err (rule 9): casting between incompatibly-headed types is a
    // runtime type error, represented as the canonical error of the target
    // type.
    if let (Some(source_head), Some(target_head)) = (head_of(&source), head_of(&target)) {
        if source_head != target_head {
            return Ok(VTerm::VErr(Box::new(target)));
        }
    }
    // Dom-Err / Codom-Err (rule 10): either endpoint already being the
    // error inhabitant of a universe propagates straight to the target.
    if is_err_universe(&source) || is_err_universe(&target) {
        return Ok(VTerm::VErr(Box::new(target)));
    }
    // Prod-Germ / Size-Err (Prod) (rules 11, 14): casting a product type
    // into `?_i` interposes the germ at that level — unless `source` is
    // already a germ at a level `>= i` (nothing to interpose), or the
    // product's own domain/codomain already outrank what a germ at `i` can
    // hold, which is a size error instead.
    if let (VTerm::VProd(fi, _), Some(i)) = (&source, unknown_universe_level(&target)) {
        if !is_germ_for_gte_level(cfg.variant, &source, i) {
            let cu = cast_universe_level(cfg.variant, i);
            let outranks = unknown_universe_level(&fi.dom).is_some_and(|d| d > cu)
                || unknown_universe_level(&fi.body).is_some_and(|b| b > cu);
            if outranks {
                return Ok(VTerm::VErr(Box::new(target)));
            }
            let middle = germ(cfg.variant, i, HeadCtor::Prod);
            let inner = VTerm::cast(source.clone(), middle.clone(), term);
            return Ok(VTerm::cast(middle, target, inner));
        }
    }
    // Up-Down (rule 12): `term` is itself a cast that just injected a germ
    // at level `i` into `?_i` (its `target` is the literal dynamic-universe
    // value, not merely some germ shape), and the current cast's own
    // `source` is that same `?_i`. Casting `?_i` onward to `target` is then
    // a round trip through the universe injection — cancel it and cast
    // directly from the germ that was injected to the new `target`.
    if let (VTerm::VCast(inner), Some(j)) = (&term, unknown_universe_level(&source)) {
        if unknown_universe_level(&inner.target) == Some(j) && is_germ(cfg.variant, &inner.source) {
            return Ok(VTerm::cast((*inner.source).clone(), target, (*inner.term).clone()));
        }
    }
    // Size-Err (Universe) (rule 13): a universe at or above the level you
    // are injecting into `?` doesn't fit inside that germ.
    if let (Some(HeadCtor::Universe(j)), Some(i)) = (head_of(&source), unknown_universe_level(&target)) {
        if j >= i {
            return Ok(VTerm::VErr(Box::new(target)));
        }
    }
    // No redex applies: the cast itself is canonical (a settled
    // Prod-Prod/Universe-Universe cast, or the canonical injection into `?`
    // once `source` is already the right germ) and settles as a `VCast`
    // value — the tagged variant, not the raw `Cast` node, since `is_value`
    // only recognizes the former; tagging it is what lets `pop` hand it
    // straight back as a terminal answer instead of endlessly re-descending
    // into the same settled cast. It is left for `apply` to unwrap lazily
    // the next time it's used as a function.
    Ok(VTerm::VCast(CastInfo::new(source, target, term)))
}

/// Builds the germ-to-germ cast a value of unknown type undergoes before
/// it can be compared against a concrete head — exposed for callers that
/// want to construct well-formed injection sites without hand-assembling
/// [`crate::universe::germ`] calls themselves.
#[must_use]
pub fn inject_into_germ(variant: GcicVariant, level: u32, head: HeadCtor, value: VTerm) -> VTerm {
    let target = germ(variant, level, head);
    VTerm::cast(target.clone(), target, value)
}
