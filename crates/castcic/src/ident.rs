//! Opaque identifiers with a process-wide fresh-name generator.
//!
//! Two identifiers compare equal only if they were produced by the same
//! [`Ident::named`] or [`Ident::fresh`] call. The display name carried
//! alongside the generation counter is cosmetic — used for error messages
//! and pretty-printing — and never participates in equality, ordering, or
//! hashing. Comparing identifiers by their display string instead of this
//! generation counter would make every `x` shadow every other `x`, breaking
//! capture-avoiding substitution.

use std::{
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU32, Ordering},
};

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

fn next_id() -> u32 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A variable or declaration name, unique for the lifetime of the process.
#[derive(Clone)]
pub struct Ident {
    id: u32,
    display: Rc<str>,
}

impl Ident {
    /// Creates a fresh identifier carrying the given display name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self { id: next_id(), display: Rc::from(name) }
    }

    /// Allocates a fresh identifier that reuses this identifier's display
    /// name, used to rename a bound variable during substitution or cast
    /// expansion without losing the name a reader would recognize it by.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self { id: next_id(), display: Rc::clone(&self.display) }
    }

    /// The cosmetic display name. Never used for equality or ordering.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.display
    }

    #[must_use]
    pub(crate) fn generation(&self) -> u32 {
        self.id
    }
}

impl Default for Ident {
    /// The sentinel identifier, distinct from every identifier `named` or
    /// `fresh` can ever produce (those start at generation 1).
    fn default() -> Self {
        Self { id: 0, display: Rc::from("_") }
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Ident {}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.display, self.id)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}
