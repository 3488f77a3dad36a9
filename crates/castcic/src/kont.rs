//! The machine's continuation stack.
//!
//! Each variant records exactly what's needed to resume the surrounding
//! context once its hole is filled, plus the `next: Box<Kont>` it sits on
//! top of. `Kont::Hole` terminates the stack — reaching it with a value in
//! hand means the machine has produced a final answer.

use crate::{env::Env, term::FunInfo, value::VTerm};

#[derive(Clone, Debug)]
pub enum Kont {
    /// The empty continuation: plugging a value into this hole ends the run.
    Hole,
    /// `[] arg` under `env`, waiting for the function position to settle.
    AppL { arg: VTerm, env: Env, next: Box<Kont> },
    /// `f []`, waiting for the argument once the function side is a value.
    AppR { func: VTerm, next: Box<Kont> },
    /// Descending into a `Lambda`'s domain, body still unevaluated under `env`.
    Lambda { fi: FunInfo<VTerm>, env: Env, next: Box<Kont> },
    /// Descending into a `Prod`'s domain, body still unevaluated under `env`.
    Prod { fi: FunInfo<VTerm>, env: Env, next: Box<Kont> },
    /// Descending into an `Unknown`'s type annotation.
    Unknown { next: Box<Kont> },
    /// Descending into an `Err`'s type annotation.
    Err { next: Box<Kont> },
    /// Evaluating a cast's `target`, with `source`/`term` still pending under `env`.
    CastTarget { source: VTerm, term: VTerm, env: Env, next: Box<Kont> },
    /// `target` settled; evaluating `source`, with `term` still pending under `env`.
    CastSource { target: VTerm, term: VTerm, env: Env, next: Box<Kont> },
    /// `source`/`target` settled; evaluating the cast's `term`.
    CastTerm { source: VTerm, target: VTerm, next: Box<Kont> },
}

impl Kont {
    #[must_use]
    pub fn hole() -> Self {
        Self::Hole
    }

    #[must_use]
    pub fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }
}
