//! Universe-level arithmetic and germs.
//!
//! The three GCIC variants agree on every rule of the calculus except how
//! many universe levels a product or a cast costs. Centralizing that one
//! difference here, behind [`GcicVariant`], is what lets [`crate::machine`]
//! stay variant-agnostic.

use crate::value::VTerm;

/// Which flavor of Gradual CIC governs universe arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GcicVariant {
    /// Pure GCIC: casts and products never cost an extra level.
    G,
    /// The "No-18" restriction: same level arithmetic as `G`, but the
    /// Prod-Prod cast expansion forbids casts that would otherwise need a
    /// universe above both endpoints (enforced in [`crate::machine`], not
    /// here).
    N,
    /// Sized (subtyping-through-levels) GCIC: both products and casts climb
    /// one level higher than their operands' max, to leave room for an
    /// injection at the top.
    S,
}

/// `product_universe_level(i, j)`: the universe level of
/// `Π x : A₍ᵢ₎. B₍ⱼ₎`.
#[must_use]
pub fn product_universe_level(variant: GcicVariant, i: u32, j: u32) -> u32 {
    match variant {
        GcicVariant::G | GcicVariant::N => i.max(j),
        GcicVariant::S => i.max(j) + 1,
    }
}

/// `cast_universe_level(i)`: the universe level a cast between two
/// level-`i` types itself lives at.
#[must_use]
pub fn cast_universe_level(variant: GcicVariant, i: u32) -> u32 {
    match variant {
        GcicVariant::G | GcicVariant::N => i,
        GcicVariant::S => i + 1,
    }
}

/// The head constructor of a type, used to classify which germ a value was
/// cast out of or into. Universes are indexed by their own level because
/// `▢i` and `▢j` (i ≠ j) are never convertible, so they count as distinct
/// heads for the purposes of the Head-Err redex rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadCtor {
    Prod,
    Universe(u32),
}

/// `head_of(t)`: the head constructor of a type value, or `None` if
/// `t` is not a recognizable type head (e.g. `?`, `err`, a neutral, a
/// closure result that hasn't settled).
#[must_use]
pub fn head_of(t: &VTerm) -> Option<HeadCtor> {
    match t {
        VTerm::VProd(_, _) | VTerm::Prod(_) => Some(HeadCtor::Prod),
        VTerm::Universe(i) => Some(HeadCtor::Universe(*i)),
        _ => None,
    }
}

/// `same_head(t, u)`: `t` and `u` are typed by the same head
/// constructor. Two unrecognized heads are never considered the same.
#[must_use]
pub fn same_head(t: &VTerm, u: &VTerm) -> bool {
    matches!((head_of(t), head_of(u)), (Some(a), Some(b)) if a == b)
}

/// `germ(i, head)`: the least-precise *value* at level `i` with the
/// given head — the canonical inhabitant of the dynamic type at that head,
/// used as the landing pad when a value's type is cast to `?`. For a
/// universe head this is `?_(▢i)` itself: the dynamic type is a value of
/// type `▢i`, not `▢i` itself. For a product head both the domain and
/// codomain are `?_(▢(cast_universe_level(i)))`, per the literal definition
/// in `spec.md` §3.7 — the same sublevel on both sides, not `i` itself
/// (the two coincide under `G`/`N`, where `cast_universe_level` is the
/// identity, but diverge under `S`).
#[must_use]
pub fn germ(variant: GcicVariant, level: u32, head: HeadCtor) -> VTerm {
    match head {
        HeadCtor::Universe(_) => VTerm::VUnknown(Box::new(VTerm::Universe(level))),
        HeadCtor::Prod => {
            use crate::{env::Env, ident::Ident, term::FunInfo};
            let sub_level = cast_universe_level(variant, level);
            let id = Ident::named("_");
            let dom = VTerm::VUnknown(Box::new(VTerm::Universe(sub_level)));
            let body = VTerm::VUnknown(Box::new(VTerm::Universe(sub_level)));
            VTerm::VProd(FunInfo::new(id, dom, body), Env::empty())
        }
    }
}

/// An `Unknown`-at-a-universe shape, accepting either the tagged `VUnknown`
/// form (once forced to WHNF) or the plain `Unknown` source form (as found
/// under a binder that was never forced, e.g. a product's codomain). Both
/// mean the same thing for germ classification purposes.
fn is_unknown_universe(t: &VTerm) -> bool {
    matches!(t, VTerm::VUnknown(inner) | VTerm::Unknown(inner) if matches!(**inner, VTerm::Universe(_)))
}

/// `is_germ(t)`: `t` is exactly the germ value at its own head and
/// level. Matched structurally rather than through [`head_of`], because the
/// universe-headed germ (`?_(▢i)`) is itself a *value*, not a type, so it
/// has no head of its own to dispatch on.
#[must_use]
pub fn is_germ(_variant: GcicVariant, t: &VTerm) -> bool {
    match t {
        VTerm::VUnknown(inner) => matches!(**inner, VTerm::Universe(_)),
        VTerm::VProd(fi, _) => is_unknown_universe(&fi.dom) && is_unknown_universe(&fi.body),
        _ => false,
    }
}

/// `is_germ_for_gte_level(t, i)`: `t` is a product
/// germ whose own level is at least `i`. Only meaningful for `VProd`-shaped
/// candidates; any other shape (in particular a bare universe, for which
/// "some level ≥ i" is trivially true) answers `false` here because the
/// only rule that calls this predicate already guards its source to be a
/// `VProd`.
#[must_use]
pub fn is_germ_for_gte_level(variant: GcicVariant, t: &VTerm, min_level: u32) -> bool {
    match t {
        VTerm::VProd(fi, _) => {
            let dom_level = match &*fi.dom {
                VTerm::VUnknown(inner) | VTerm::Unknown(inner) => match &**inner {
                    VTerm::Universe(i) => Some(*i),
                    _ => None,
                },
                _ => None,
            };
            match dom_level {
                Some(i) if is_unknown_universe(&fi.body) => i >= min_level || is_germ(variant, t),
                _ => false,
            }
        }
        _ => false,
    }
}
