//! End-to-end reduction scenarios: closed terms taken all the way to a
//! canonical value or a reported error, exercising the machine as a whole
//! rather than any single rule in isolation.

use castcic::{reduce, reduce_in, step, Config, Env, GcicVariant, Ident, ReduceError, Term, VTerm};
use pretty_assertions::assert_eq;

#[test]
fn identity_applied_to_a_universe_reduces_to_that_universe() {
    let x = Ident::named("x");
    let identity = Term::lambda(x.clone(), Term::Universe(0), Term::var(x));
    let applied = Term::app(identity, Term::Universe(3));
    assert_eq!(reduce(&applied).unwrap(), Term::Universe(3));
}

#[test]
fn nested_beta_redexes_all_fire() {
    let x = Ident::named("x");
    let y = Ident::named("y");
    let const_fn = Term::lambda(x.clone(), Term::Universe(0), Term::lambda(y, Term::Universe(0), Term::var(x)));
    let applied = Term::app(Term::app(const_fn, Term::Universe(1)), Term::Universe(2));
    assert_eq!(reduce(&applied).unwrap(), Term::Universe(1));
}

#[test]
fn casting_a_value_to_its_own_type_is_erased() {
    let t = Term::cast(Term::Universe(5), Term::Universe(5), Term::Universe(5));
    assert_eq!(reduce(&t).unwrap(), Term::Universe(5));
}

#[test]
fn casting_between_mismatched_universe_levels_yields_an_error_value() {
    let t = Term::cast(Term::Universe(0), Term::Universe(1), Term::Universe(0));
    assert_eq!(reduce(&t).unwrap(), Term::err(Term::Universe(1)));
}

#[test]
fn applying_an_unknown_function_yields_unknown_at_the_instantiated_codomain() {
    let x = Ident::named("x");
    let fn_ty = Term::prod(x, Term::Universe(0), Term::Universe(0));
    let unk_fn = Term::unknown(fn_ty);
    let applied = Term::app(unk_fn, Term::Universe(7));
    assert_eq!(reduce(&applied).unwrap(), Term::unknown(Term::Universe(0)));
}

#[test]
fn applying_an_error_function_yields_error_at_the_instantiated_codomain() {
    let x = Ident::named("x");
    let fn_ty = Term::prod(x, Term::Universe(0), Term::Universe(0));
    let err_fn = Term::err(fn_ty);
    let applied = Term::app(err_fn, Term::Universe(7));
    assert_eq!(reduce(&applied).unwrap(), Term::err(Term::Universe(0)));
}

#[test]
fn free_variable_anywhere_in_the_term_is_a_fatal_error() {
    let free = Ident::named("undefined");
    let x = Ident::named("x");
    let t = Term::app(Term::lambda(x.clone(), Term::Universe(0), Term::var(x)), Term::var(free.clone()));
    assert_eq!(reduce(&t).unwrap_err(), ReduceError::FreeIdentifier(free));
}

#[test]
fn opaque_constant_applications_stay_neutral_without_erroring() {
    let c = Ident::named("axiom");
    let applied = Term::app(Term::Const(c.clone()), Term::Universe(0));
    assert_eq!(reduce(&applied).unwrap(), Term::app(Term::Const(c), Term::Universe(0)));
}

#[test]
fn all_three_gcic_variants_agree_on_a_cast_free_reduction() {
    let x = Ident::named("x");
    let identity = Term::lambda(x.clone(), Term::Universe(0), Term::var(x));
    let applied = Term::app(identity, Term::Universe(2));

    for variant in [GcicVariant::G, GcicVariant::N, GcicVariant::S] {
        let cfg = Config { variant, fuel: castcic::DEFAULT_FUEL };
        assert_eq!(reduce_in(&Env::empty(), &applied, &cfg).unwrap(), Term::Universe(2));
    }
}

#[test]
fn casting_the_error_inhabitant_of_a_universe_propagates_to_the_target() {
    let t = Term::cast(Term::err(Term::Universe(0)), Term::Universe(1), Term::err(Term::Universe(0)));
    assert_eq!(reduce(&t).unwrap(), Term::err(Term::Universe(1)));
}

#[test]
fn casting_a_universe_at_or_above_the_injected_level_is_a_size_error() {
    // spec.md scenario 6: `Cast{source=▢1, target=?_(▢0), term=▢0}` errors,
    // since the dynamic type at level 0 can't host anything at level 1.
    let t = Term::cast(Term::Universe(1), Term::unknown(Term::Universe(0)), Term::Universe(0));
    assert_eq!(reduce(&t).unwrap(), Term::err(Term::unknown(Term::Universe(0))));
}

#[test]
fn casting_a_product_type_into_unknown_settles_without_looping() {
    let x = Ident::named("x");
    let y = Ident::named("y");
    let fn_ty = Term::prod(x, Term::Universe(0), Term::Universe(0));
    let identity = Term::lambda(y.clone(), Term::Universe(0), Term::var(y));
    let into_dynamic = Term::cast(fn_ty, Term::unknown(Term::Universe(1)), identity);
    let result = reduce(&into_dynamic).unwrap();
    assert!(matches!(result, Term::Cast(_)), "expected a settled cast value, got {result}");
}

#[test]
fn a_function_wrapped_in_a_cast_between_matching_product_types_still_computes() {
    let x = Ident::named("x");
    let y = Ident::named("y");
    let fn_ty = Term::prod(x.clone(), Term::Universe(0), Term::Universe(0));
    let identity = Term::lambda(y.clone(), Term::Universe(0), Term::var(y));
    let cast_identity = Term::cast(fn_ty.clone(), fn_ty, identity);
    let applied = Term::app(cast_identity, Term::Universe(9));
    assert_eq!(reduce(&applied).unwrap(), Term::Universe(9));
}

#[test]
fn an_unapplied_unknown_function_eta_expands_into_a_lambda() {
    let x = Ident::named("x");
    let prod = Term::prod(x, Term::Universe(0), Term::Universe(1));
    let result = reduce(&Term::unknown(prod)).unwrap();
    match result {
        Term::Lambda(fi) => {
            assert_eq!(*fi.dom, Term::Universe(0));
            assert_eq!(*fi.body, Term::unknown(Term::Universe(1)));
        }
        other => panic!("expected an eta-expanded lambda, got {other}"),
    }
}

#[test]
fn step_advances_one_transition_without_finishing_the_reduction() {
    let x = Ident::named("x");
    let identity = Term::lambda(x.clone(), Term::Universe(0), Term::var(x));
    let applied = Term::app(identity, Term::Universe(4));
    let cfg = Config::default();
    let once = step(&Env::empty(), &applied, &cfg).unwrap();
    assert_ne!(once, Term::Universe(4), "descending into the function position alone isn't the answer yet");
    assert_eq!(reduce_in(&Env::empty(), &once, &cfg).unwrap(), Term::Universe(4), "but it stays on the path to it");
}

#[test]
fn step_on_a_value_already_at_normal_form_is_a_no_op() {
    let cfg = Config::default();
    assert_eq!(step(&Env::empty(), &Term::Universe(7), &cfg).unwrap(), Term::Universe(7));
}

#[test]
fn inner_binder_shadows_the_outer_one_with_the_same_display_name() {
    // `App(Lambda{x,▢0, Lambda{x,▢0, Var x}}, t)` reduces to
    // `Lambda{x,▢0, Var x}` — the inner `x` shadows the outer one, so
    // substituting the outer binder never touches the inner occurrence.
    let x_outer = Ident::named("x");
    let x_inner = Ident::named("x");
    let inner_lambda = Term::lambda(x_inner.clone(), Term::Universe(0), Term::var(x_inner.clone()));
    let outer_lambda = Term::lambda(x_outer, Term::Universe(0), inner_lambda);
    let applied = Term::app(outer_lambda, Term::Universe(9));
    let result = reduce(&applied).unwrap();
    match result {
        Term::Lambda(fi) => {
            assert_eq!(*fi.dom, Term::Universe(0));
            assert!(matches!(&*fi.body, Term::Var(id) if *id == fi.id), "body should refer back to its own binder");
        }
        other => panic!("expected a lambda (the shadowed inner identity), got {other}"),
    }
}

#[test]
fn zero_fuel_succeeds_on_a_value_already_at_normal_form() {
    let cfg = Config { variant: GcicVariant::G, fuel: 0 };
    assert_eq!(reduce_in(&Env::empty(), &Term::Universe(2), &cfg).unwrap(), Term::Universe(2));
}

#[test]
fn zero_fuel_fails_on_a_term_that_still_needs_a_step() {
    let x = Ident::named("x");
    let identity = Term::lambda(x.clone(), Term::Universe(0), Term::var(x));
    let applied = Term::app(identity, Term::Universe(0));
    let cfg = Config { variant: GcicVariant::G, fuel: 0 };
    assert_eq!(reduce_in(&Env::empty(), &applied, &cfg).unwrap_err(), ReduceError::FuelExhausted);
}

#[test]
fn reduce_in_resolves_a_term_against_a_caller_supplied_environment() {
    // A term that mentions a free variable is only reducible at all because
    // `reduce_in` (unlike `reduce`) takes an initial environment an upstream
    // elaborator can populate with global bindings before handing the term
    // to the core.
    let x = Ident::named("x");
    let env = Env::empty().add(x.clone(), VTerm::Universe(9));
    let cfg = Config::default();
    assert_eq!(reduce_in(&env, &Term::var(x), &cfg).unwrap(), Term::Universe(9));
}

#[test]
fn casting_a_germ_function_into_the_matching_dynamic_universe_stays_a_canonical_cast() {
    // The source of the cast is already the germ at the target's level, so
    // Prod-Germ never interposes anything and the cast settles as a
    // canonical injection into `?` rather than reducing any further.
    let hole = Ident::named("_");
    let germ_dom = Term::unknown(Term::Universe(1));
    let germ_body = Term::unknown(Term::Universe(1));
    let germ_ty = Term::prod(hole, germ_dom, germ_body);
    let x = Ident::named("x");
    let identity = Term::lambda(x.clone(), Term::unknown(Term::Universe(1)), Term::var(x));
    let t = Term::cast(germ_ty, Term::unknown(Term::Universe(1)), identity);
    let result = reduce(&t).unwrap();
    assert!(matches!(result, Term::Cast(_)), "expected the cast to stay a canonical injection, got {result}");
}
