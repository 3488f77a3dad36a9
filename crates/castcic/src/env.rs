//! The finite mapping from identifiers to tagged values.
//!
//! Represented as a persistent, `Rc`-shared cons-list so that capturing an
//! environment into a closure (`VLambda`, `VProd`) is an `O(1)` pointer bump
//! rather than a deep copy — the CEK machine forms a new closure at every
//! `Lambda`/`Prod` congruence step, so this matters more here than it would
//! in a one-shot interpreter. Shadowing is by extension: `add` never
//! mutates or removes an older binding, it just conses a new one in front
//! of it, so `lookup` always finds the most recently added binding for a
//! given identifier first.

use std::rc::Rc;

use crate::{ident::Ident, value::VTerm};

#[derive(Debug)]
struct Node {
    id: Ident,
    value: VTerm,
    parent: Env,
}

/// A persistent environment. Cloning an `Env` is a reference-count bump.
#[derive(Clone, Default, Debug)]
pub struct Env(Option<Rc<Node>>);

/// Structural equality, walking both chains in lockstep; a physical-equality
/// fast path short-circuits the common case of comparing an environment
/// against itself or a clone sharing the same `Rc` spine.
impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b) || (a.id == b.id && a.value == b.value && a.parent == b.parent),
            _ => false,
        }
    }
}

impl Env {
    #[must_use]
    pub fn empty() -> Self {
        Self(None)
    }

    /// Extends the environment with a new binding, shadowing any existing
    /// binding for `id` without disturbing it.
    #[must_use]
    pub fn add(&self, id: Ident, value: VTerm) -> Self {
        Self(Some(Rc::new(Node { id, value, parent: self.clone() })))
    }

    /// Looks up the nearest binding for `id`, comparing by `Ident`'s
    /// generation counter rather than by display name or pointer identity.
    #[must_use]
    pub fn lookup(&self, id: &Ident) -> Option<&VTerm> {
        let mut cursor = self;
        loop {
            let node = cursor.0.as_deref()?;
            if &node.id == id {
                return Some(&node.value);
            }
            cursor = &node.parent;
        }
    }

    /// Removes the nearest binding for `id`, leaving any binding further
    /// down the list (and hence already shadowed) untouched.
    #[must_use]
    pub fn remove(&self, id: &Ident) -> Self {
        match &self.0 {
            None => Self::empty(),
            Some(node) if &node.id == id => node.parent.clone(),
            Some(node) => node.parent.remove(id).add(node.id.clone(), node.value.clone()),
        }
    }

    /// Converts to an association list, most recently added binding first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(Ident, VTerm)> {
        let mut out = Vec::new();
        let mut cursor = self;
        while let Some(node) = cursor.0.as_deref() {
            out.push((node.id.clone(), node.value.clone()));
            cursor = &node.parent;
        }
        out
    }

    /// Builds an environment from an association list, in the order given
    /// (earlier entries end up shadowed by later ones, matching repeated
    /// calls to `add`).
    #[must_use]
    pub fn from_vec(bindings: Vec<(Ident, VTerm)>) -> Self {
        bindings.into_iter().fold(Self::empty(), |env, (id, value)| env.add(id, value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}
