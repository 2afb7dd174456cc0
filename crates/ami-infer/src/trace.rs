//! Tracing types for type-engine observability.
//!
//! These types capture step-by-step traces of unification so drivers and
//! tooling can show how a generic parameter was instantiated. Tracing is
//! opt-in via `Unifier::enable_tracing()`; nothing is recorded otherwise.

use serde::Serialize;

/// A single step in a unification trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifyStep {
    pub step: usize,
    pub action: UnifyAction,
    pub want: String,
    pub got: String,
    pub detail: String,
}

/// What happened during a unification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnifyAction {
    /// Leaf types with the same base and no arguments.
    Identity,
    /// `any` on either side; nothing is bound.
    Wildcard,
    /// Unbound type variable bound to the actual type (e.g. `T := int`).
    Bind,
    /// Already-bound variable met the same type again.
    BoundMatch,
    /// Same base and arity: recurse into the arguments (or struct fields).
    Decompose,
    /// Unification failed at this step.
    Error,
}
