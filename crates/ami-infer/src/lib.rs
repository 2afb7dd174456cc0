//! Type compatibility, unification and mismatch location for AMI.
//!
//! This crate implements:
//! - A textual Compatibility Checker for the common call/return/assign path
//! - Single-pass unification of declared against actual types, producing a
//!   substitution used to instantiate generic signatures
//! - A Variance Resolver (Optional covariance, Union membership, Struct width
//!   subtyping) used for cross-edge event flow
//! - A Deep Mismatch Locator that reports where nested generic arities diverge
//! - Boundary checks that turn these decisions into diagnostics
//!
//! Every operation is a pure function of its inputs. Recursion is bounded by
//! [`Limits`]; inputs nested past the limit fail instead of overflowing.

pub mod boundary;
pub mod compat;
pub mod locate;
pub mod trace;
pub mod unify;
pub mod variance;


// Re-export for convenience.
pub use ami_diag::{Category, Diagnostic, DiagnosticError, Position, Severity};
pub use ami_types::{Limits, Type, TypeError, TypeRef};

pub use boundary::{Checker, TypeSite};
pub use compat::{compatible, compatible_with};
pub use locate::{ArityMismatch, locate, locate_text, locate_typed, locate_with, try_locate};
pub use trace::{UnifyAction, UnifyStep};
pub use unify::{Substitution, Unifier, UnifyError, unify};
pub use variance::{payload_within, payload_within_text, try_payload_within};
