//! Single-pass unification of declared (`want`) against actual (`got`) types.
//!
//! Generics in AMI are invariant and each type variable has one binding site
//! per call, so unification never backtracks: the first binding of a
//! variable wins and every later occurrence must render identically.

use std::collections::BTreeMap;

use ami_types::{Limits, Type, TypeError, TypeRef};

use crate::trace::{UnifyAction, UnifyStep};

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Maps type-variable names to the concrete types recovered for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: BTreeMap<String, Type>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, var: impl Into<String>, ty: Type) {
        self.map.insert(var.into(), ty);
    }

    pub fn lookup(&self, var: &str) -> Option<&Type> {
        self.map.get(var)
    }

    pub fn bindings(&self) -> &BTreeMap<String, Type> {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Replace bound type variables in `ty`.
    ///
    /// Bindings are applied once and not re-substituted: a bound value comes
    /// from the caller's scope, where the same letter may name a different
    /// variable.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Named(name) if ty.is_type_var() => match self.lookup(name) {
                Some(bound) => bound.clone(),
                None => ty.clone(),
            },
            Type::Primitive(_) | Type::Named(_) => ty.clone(),
            Type::Generic { name, args } => Type::Generic {
                name: name.clone(),
                args: args.iter().map(|arg| self.apply(arg)).collect(),
            },
            Type::Optional(inner) => Type::Optional(Box::new(self.apply(inner))),
            Type::Struct(fields) => Type::Struct(
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.apply(field)))
                    .collect(),
            ),
            Type::Union(alts) => Type::Union(alts.iter().map(|alt| self.apply(alt)).collect()),
        }
    }

    pub fn apply_ref(&self, ty: &TypeRef) -> TypeRef {
        TypeRef {
            pointer: ty.pointer,
            slice: ty.slice,
            ty: self.apply(&ty.ty),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why unification failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnifyError {
    #[error("type variable `{var}` is bound to `{bound}` but also used as `{got}`")]
    Conflict {
        var: String,
        bound: String,
        got: String,
    },
    #[error("expected `{want}`, found `{got}`")]
    BaseMismatch { want: String, got: String },
    #[error("`{base}` expects {want} type argument(s), found {got}")]
    ArityMismatch {
        base: String,
        want: usize,
        got: usize,
    },
    #[error("struct fields differ: expected `{want}`, found `{got}`")]
    FieldMismatch { want: String, got: String },
    #[error("pointer/slice modifiers differ: expected `{want}`, found `{got}`")]
    ModifierMismatch { want: String, got: String },
    #[error("expected {want} argument(s), found {got}")]
    ArgumentCount { want: usize, got: usize },
    #[error(transparent)]
    Type(#[from] TypeError),
}

// ---------------------------------------------------------------------------
// Unifier
// ---------------------------------------------------------------------------

/// Unifies declared types against actual types, accumulating a substitution.
#[derive(Debug, Clone, Default)]
pub struct Unifier {
    pub substitution: Substitution,
    limits: Limits,
    /// When true, unification steps are recorded.
    tracing: bool,
    trace: Vec<UnifyStep>,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Unify `want` against `got`, extending the substitution.
    ///
    /// On failure the substitution is left exactly as it was before the call.
    pub fn unify(&mut self, want: &Type, got: &Type) -> Result<(), UnifyError> {
        let snapshot = self.substitution.clone();
        let result = self.unify_at(want, got, 1);
        if result.is_err() {
            self.substitution = snapshot;
        }
        result
    }

    /// Unify two type references; pointer and slice modifiers must match
    /// before the underlying types are compared.
    pub fn unify_refs(&mut self, want: &TypeRef, got: &TypeRef) -> Result<(), UnifyError> {
        if !want.same_modifiers(got) {
            self.push_step(UnifyAction::Error, &want.ty, &got.ty, || {
                format!("modifier mismatch: `{want}` vs `{got}`")
            });
            return Err(UnifyError::ModifierMismatch {
                want: want.to_string(),
                got: got.to_string(),
            });
        }
        self.unify(&want.ty, &got.ty)
    }

    /// Substitute everything recovered so far into `ty`.
    pub fn instantiate(&self, ty: &TypeRef) -> TypeRef {
        self.substitution.apply_ref(ty)
    }

    pub fn into_substitution(self) -> Substitution {
        self.substitution
    }

    fn unify_at(&mut self, want: &Type, got: &Type, depth: usize) -> Result<(), UnifyError> {
        if let Err(err) = self.limits.check(depth) {
            self.push_step(UnifyAction::Error, want, got, || err.to_string());
            return Err(err.into());
        }

        if let Type::Named(var) = want
            && want.is_type_var()
        {
            return self.bind_var(var, got);
        }

        if want.is_wildcard() || got.is_wildcard() {
            self.push_step(UnifyAction::Wildcard, want, got, || {
                "`any` unifies without binding".into()
            });
            return Ok(());
        }

        match (want, got) {
            (Type::Struct(want_fields), Type::Struct(got_fields)) => {
                if !want_fields.keys().eq(got_fields.keys()) {
                    self.push_step(UnifyAction::Error, want, got, || {
                        "struct field sets differ".into()
                    });
                    return Err(UnifyError::FieldMismatch {
                        want: want.to_string(),
                        got: got.to_string(),
                    });
                }
                self.push_step(UnifyAction::Decompose, want, got, || {
                    format!("unify {} struct field(s)", want_fields.len())
                });
                for (want_field, got_field) in want_fields.values().zip(got_fields.values()) {
                    self.unify_at(want_field, got_field, depth + 1)?;
                }
                Ok(())
            }
            (Type::Struct(_), _) | (_, Type::Struct(_)) => self.base_mismatch(want, got),
            _ => {
                if !want.base_name().eq_ignore_ascii_case(got.base_name()) {
                    return self.base_mismatch(want, got);
                }
                let (want_args, got_args) = (type_args(want), type_args(got));
                if want_args.len() != got_args.len() {
                    self.push_step(UnifyAction::Error, want, got, || "arity differs".into());
                    return Err(UnifyError::ArityMismatch {
                        base: want.base_name().to_string(),
                        want: want_args.len(),
                        got: got_args.len(),
                    });
                }
                if want_args.is_empty() {
                    self.push_step(UnifyAction::Identity, want, got, || "same base".into());
                    return Ok(());
                }
                self.push_step(UnifyAction::Decompose, want, got, || {
                    format!(
                        "{}<..> ~ {}<..>: unify {} argument(s)",
                        want.base_name(),
                        got.base_name(),
                        want_args.len()
                    )
                });
                for (want_arg, got_arg) in want_args.iter().zip(got_args) {
                    self.unify_at(want_arg, got_arg, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    fn bind_var(&mut self, var: &str, got: &Type) -> Result<(), UnifyError> {
        let rendered = got.to_string();
        match self.substitution.lookup(var) {
            Some(bound) => {
                let bound = bound.to_string();
                if bound == rendered {
                    self.push_step(UnifyAction::BoundMatch, &Type::named(var), got, || {
                        format!("{var} already bound to {bound}")
                    });
                    Ok(())
                } else {
                    self.push_step(UnifyAction::Error, &Type::named(var), got, || {
                        format!("{var} bound to {bound}, cannot rebind to {rendered}")
                    });
                    Err(UnifyError::Conflict {
                        var: var.to_string(),
                        bound,
                        got: rendered,
                    })
                }
            }
            None => {
                self.push_step(UnifyAction::Bind, &Type::named(var), got, || {
                    format!("{var} := {rendered}")
                });
                self.substitution.bind(var, got.clone());
                Ok(())
            }
        }
    }

    fn base_mismatch(&mut self, want: &Type, got: &Type) -> Result<(), UnifyError> {
        self.push_step(UnifyAction::Error, want, got, || "base names differ".into());
        Err(UnifyError::BaseMismatch {
            want: want.to_string(),
            got: got.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Tracing API
    // -----------------------------------------------------------------------

    /// Enable step-by-step tracing.
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
    }

    pub fn is_tracing(&self) -> bool {
        self.tracing
    }

    /// The recorded steps (empty unless tracing was enabled).
    pub fn unify_trace(&self) -> &[UnifyStep] {
        &self.trace
    }

    fn push_step(
        &mut self,
        action: UnifyAction,
        want: &Type,
        got: &Type,
        detail: impl FnOnce() -> String,
    ) {
        if self.tracing {
            let step = self.trace.len() + 1;
            self.trace.push(UnifyStep {
                step,
                action,
                want: want.to_string(),
                got: got.to_string(),
                detail: detail(),
            });
        }
    }
}

/// Positional type arguments used when decomposing non-struct types.
fn type_args(ty: &Type) -> &[Type] {
    match ty {
        Type::Generic { args, .. } => args,
        Type::Optional(inner) => std::slice::from_ref(inner.as_ref()),
        Type::Union(alts) => alts,
        Type::Primitive(_) | Type::Named(_) | Type::Struct(_) => &[],
    }
}

/// Unify `want` against `got` into `subst`.
///
/// Returns `false` on any failure, in which case `subst` is unchanged.
pub fn unify(want: &Type, got: &Type, subst: &mut Substitution) -> bool {
    let mut unifier = Unifier {
        substitution: std::mem::take(subst),
        ..Unifier::default()
    };
    let ok = unifier.unify(want, got).is_ok();
    *subst = unifier.into_substitution();
    ok
}
