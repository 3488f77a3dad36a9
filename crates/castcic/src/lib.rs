//! A small-step CEK machine for CastCIC, the cast-annotated Calculus of
//! Inductive Constructions used to give an operational semantics to
//! gradual dependent type theories (GCIC).
//!
//! The crate is organized the way the calculus itself is: [`ident`] and
//! [`env`] give identifiers and environments a representation that supports
//! capture-avoiding substitution cheaply; [`term`] and [`value`] split the
//! AST into the source syntax callers hand in and the tagged-value syntax
//! the machine actually steps over; [`universe`] isolates the one place the
//! three GCIC variants disagree; [`machine`] is the reducer itself.
//!
//! ```
//! use castcic::{reduce, Ident, Term};
//!
//! let x = Ident::named("x");
//! let identity = Term::lambda(x.clone(), Term::Universe(0), Term::var(x));
//! let applied = Term::app(identity, Term::Universe(0));
//! assert_eq!(reduce(&applied).unwrap(), Term::Universe(0));
//! ```

mod env;
mod error;
mod ident;
mod kont;
mod machine;
mod reify;
mod subst;
mod term;
mod universe;
mod value;

pub use env::Env;
pub use error::{ReduceError, ReduceResult};
pub use ident::Ident;
pub use machine::{inject_into_germ, reduce, reduce_in, step, Config, DEFAULT_FUEL};
pub use reify::{of_vterm, to_vterm};
pub use term::{CastInfo, FunInfo, Term};
pub use universe::{
    cast_universe_level, germ, head_of, is_germ, is_germ_for_gte_level, product_universe_level, same_head, GcicVariant, HeadCtor,
};
pub use value::{is_neutral, is_type, is_value, VTerm};
