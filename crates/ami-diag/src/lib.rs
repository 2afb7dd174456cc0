//! Error reporting and diagnostics for the AMI semantic front-end.
//!
//! Diagnostics are created by the analyzers in other crates (for example,
//! the boundary checks in `ami-infer`) and carry their structured payload in
//! `data`. Rendering for humans is left to the driver; this crate only
//! guarantees the record shape and stable codes.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Diagnostic severity and categories
// ---------------------------------------------------------------------------

/// How severe a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Broad category for diagnostics produced by type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A shared generic base carries a different number of type arguments.
    GenericArityMismatch,
    /// Call site passes the wrong number of arguments.
    CallArityMismatch,
    /// A call argument's type is not compatible with the parameter.
    CallArgTypeMismatch,
    /// Several arguments of one call mismatch.
    CallArgsMismatchSummary,
    /// Returned values do not match the declared results.
    ReturnTypeMismatch,
    /// Assigned value does not match the target's type.
    AssignTypeMismatch,
    /// A local's type could not be inferred from its declaration.
    TypeUninferred,
    /// Upstream payload cannot flow into the downstream input.
    EventTypeFlow,
    /// Merge field path does not exist on the payload.
    MergeFieldUnknown,
    /// Merge field exists but cannot be ordered.
    MergeFieldUnorderable,
    /// Field reference on a primitive payload.
    MergeFieldOnPrimitive,
    /// A type string could not be read.
    TypeSyntax,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::GenericArityMismatch,
        Category::CallArityMismatch,
        Category::CallArgTypeMismatch,
        Category::CallArgsMismatchSummary,
        Category::ReturnTypeMismatch,
        Category::AssignTypeMismatch,
        Category::TypeUninferred,
        Category::EventTypeFlow,
        Category::MergeFieldUnknown,
        Category::MergeFieldUnorderable,
        Category::MergeFieldOnPrimitive,
        Category::TypeSyntax,
    ];

    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    /// Stable code embedded in diagnostic records.
    pub fn code(self) -> &'static str {
        match self {
            Category::GenericArityMismatch => "E_GENERIC_ARITY_MISMATCH",
            Category::CallArityMismatch => "E_CALL_ARITY_MISMATCH",
            Category::CallArgTypeMismatch => "E_CALL_ARG_TYPE_MISMATCH",
            Category::CallArgsMismatchSummary => "E_CALL_ARGS_MISMATCH_SUMMARY",
            Category::ReturnTypeMismatch => "E_RETURN_TYPE_MISMATCH",
            Category::AssignTypeMismatch => "E_ASSIGN_TYPE_MISMATCH",
            Category::TypeUninferred => "E_TYPE_UNINFERRED",
            Category::EventTypeFlow => "E_EVENT_TYPE_FLOW",
            Category::MergeFieldUnknown => "E_MERGE_SORT_FIELD_UNKNOWN",
            Category::MergeFieldUnorderable => "E_MERGE_SORT_FIELD_UNORDERABLE",
            Category::MergeFieldOnPrimitive => "E_MERGE_FIELD_ON_PRIMITIVE",
            Category::TypeSyntax => "E_TYPE_SYNTAX",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::GenericArityMismatch => "generic type argument count mismatch",
            Category::CallArityMismatch => "call arity mismatch",
            Category::CallArgTypeMismatch => "call argument type mismatch",
            Category::CallArgsMismatchSummary => "multiple call arguments mismatch",
            Category::ReturnTypeMismatch => "return type mismatch",
            Category::AssignTypeMismatch => "assignment type mismatch",
            Category::TypeUninferred => "unable to infer a concrete type",
            Category::EventTypeFlow => {
                "event payload type mismatch between upstream output and downstream input"
            }
            Category::MergeFieldUnknown => "merge field not found in payload",
            Category::MergeFieldUnorderable => "merge field is not orderable",
            Category::MergeFieldOnPrimitive => "cannot reference field on a primitive payload",
            Category::TypeSyntax => "malformed type expression",
        }
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Source positions
// ---------------------------------------------------------------------------

/// A 1-based line/column position plus byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A structured diagnostic record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    #[serde(rename = "level")]
    pub severity: Severity,
    #[serde(rename = "code")]
    pub category: Category,
    pub message: String,
    #[serde(rename = "pos", skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Opaque structured payload (`expected`, `actual`, `path`, ...).
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Diagnostic {
    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            position: None,
            data: Map::new(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.category.code()
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Merge every key of a serialized object into `data`. Non-object values
    /// are ignored.
    pub fn with_payload(mut self, payload: Value) -> Self {
        if let Value::Object(map) = payload {
            self.data.extend(map);
        }
        self
    }

    pub fn data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
        };
        write!(f, "{prefix}[{}]: {}", self.code(), self.message)?;
        if let Some(pos) = &self.position {
            write!(f, " at {}:{}", pos.line, pos.column)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error type for crates that produce diagnostics
// ---------------------------------------------------------------------------

/// Error type wrapping one or more diagnostics.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .0.first().map(|d| d.to_string()).unwrap_or_default())]
pub struct DiagnosticError(pub Vec<Diagnostic>);

impl DiagnosticError {
    pub fn single(diag: Diagnostic) -> Self {
        Self(vec![diag])
    }

    pub fn multiple(diags: Vec<Diagnostic>) -> Self {
        Self(diags)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.0
    }
}
