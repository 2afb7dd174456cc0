//! Type representations for AMI.
//!
//! This crate defines the semantic types consumed by the type engine in
//! `ami-infer`, together with the reader that turns canonical type strings
//! (as carried on AST nodes) into those types. Type values are immutable
//! once built; every transformation produces a new value.
//!
//! Two reading modes share one grammar core:
//! - [`scan`] looks at a single nesting level and hands back borrowed text
//!   segments (`base` + top-level arguments, or struct field segments).
//! - [`parse`] is the scanner applied recursively and materializes a [`Type`].

mod parse;
mod resolve;
mod scan;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use parse::{parse, parse_ref, parse_ref_with, parse_with};
pub use resolve::{is_orderable, resolve_field};
pub use scan::{Shape, generic_parts, scan, split_top_level, struct_fields};

/// The wildcard type name. Compatible with everything, binds nothing.
pub const WILDCARD: &str = "any";

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Resource limits applied to every traversal of a type expression.
///
/// Type strings come straight from user source, so nesting depth is capped
/// instead of trusting the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting depth of a type expression (the outermost type is
    /// depth 1).
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Fail with [`TypeError::TooDeep`] once `depth` passes the limit.
    pub fn check(&self, depth: usize) -> Result<(), TypeError> {
        if depth > self.max_depth {
            Err(TypeError::TooDeep {
                limit: self.max_depth,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a type string could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("empty type")]
    Empty,
    #[error("unbalanced brackets in `{0}`")]
    Unbalanced(String),
    #[error("unterminated quote in `{0}`")]
    UnterminatedQuote(String),
    #[error("missing generic base name in `{0}`")]
    EmptyBase(String),
    #[error("empty type argument in `{0}`")]
    EmptyArgument(String),
    #[error("`Optional` takes exactly one type argument, found {found}")]
    OptionalArity { found: usize },
    #[error("malformed struct field `{0}`")]
    InvalidField(String),
    #[error("duplicate struct field `{0}`")]
    DuplicateField(String),
    #[error("invalid type name `{0}`")]
    InvalidName(String),
    #[error("type nesting exceeds the depth limit of {limit}")]
    TooDeep { limit: usize },
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Float32,
    Float64,
    String,
    Byte,
    Rune,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 18] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Int128,
        PrimitiveKind::Uint,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Uint128,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::String,
        PrimitiveKind::Byte,
        PrimitiveKind::Rune,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Int128 => "int128",
            PrimitiveKind::Uint => "uint",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Uint128 => "uint128",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Rune => "rune",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A semantic type expression.
///
/// `Named` doubles as the home of two conventions rather than separate
/// variants: a single uppercase ASCII letter is an unbound type variable,
/// and the literal `any` is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    Named(String),
    /// Parametric type such as `Owned<T>` or `map<K,V>`. Zero arguments is a
    /// valid, degenerate form (`Foo<>`).
    Generic {
        name: String,
        args: Vec<Type>,
    },
    Optional(Box<Type>),
    /// Structural record. Keys are kept in lexical order so every traversal
    /// over fields is reproducible.
    Struct(BTreeMap<String, Type>),
    Union(Vec<Type>),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn generic(name: impl Into<String>, args: Vec<Type>) -> Self {
        Type::Generic {
            name: name.into(),
            args,
        }
    }

    pub fn optional(inner: Type) -> Self {
        Type::Optional(Box::new(inner))
    }

    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Type)>) -> Self {
        Type::Struct(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    pub fn union(alts: Vec<Type>) -> Self {
        Type::Union(alts)
    }

    pub fn is_type_var(&self) -> bool {
        matches!(self, Type::Named(name) if is_type_var_name(name))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Named(name) if name == WILDCARD)
    }

    /// Type variables and the wildcard accept anything.
    pub fn is_unconstrained(&self) -> bool {
        self.is_type_var() || self.is_wildcard()
    }

    /// The head name used when comparing type constructors.
    pub fn base_name(&self) -> &str {
        match self {
            Type::Primitive(kind) => kind.as_str(),
            Type::Named(name) => name,
            Type::Generic { name, .. } => name,
            Type::Optional(_) => "Optional",
            Type::Struct(_) => "Struct",
            Type::Union(_) => "Union",
        }
    }

    /// Number of type arguments carried at the top level.
    pub fn arity(&self) -> usize {
        match self {
            Type::Generic { args, .. } => args.len(),
            Type::Optional(_) => 1,
            Type::Union(alts) => alts.len(),
            Type::Primitive(_) | Type::Named(_) | Type::Struct(_) => 0,
        }
    }
}

/// True for a single uppercase ASCII letter (`T`, `U`, ...).
pub fn is_type_var_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 1 && bytes[0].is_ascii_uppercase()
}

/// Empty text and `any` both absorb any other type on the textual path.
pub fn is_wildcard_text(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == WILDCARD
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Type]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Canonical rendering. Reading the output back yields an equal `Type`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => write!(f, "{kind}"),
            Type::Named(name) => f.write_str(name),
            Type::Generic { name, args } => {
                write!(f, "{name}<")?;
                write_list(f, args)?;
                f.write_str(">")
            }
            Type::Optional(inner) => write!(f, "Optional<{inner}>"),
            Type::Struct(fields) => {
                f.write_str("Struct{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}:{ty}")?;
                }
                f.write_str("}")
            }
            Type::Union(alts) => {
                f.write_str("Union<")?;
                write_list(f, alts)?;
                f.write_str(">")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Type references with modifiers
// ---------------------------------------------------------------------------

/// A type together with the pointer (`*T`) and bracket-slice (`[]T`)
/// modifiers a declaration may carry. Written pointer first: `*[]T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub pointer: bool,
    pub slice: bool,
    pub ty: Type,
}

impl TypeRef {
    pub fn plain(ty: Type) -> Self {
        Self {
            pointer: false,
            slice: false,
            ty,
        }
    }

    pub fn same_modifiers(&self, other: &TypeRef) -> bool {
        self.pointer == other.pointer && self.slice == other.slice
    }
}

impl From<Type> for TypeRef {
    fn from(ty: Type) -> Self {
        TypeRef::plain(ty)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer {
            f.write_str("*")?;
        }
        if self.slice {
            f.write_str("[]")?;
        }
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Type {
        Type::Primitive(PrimitiveKind::Int)
    }

    #[test]
    fn type_var_convention() {
        assert!(Type::named("T").is_type_var());
        assert!(Type::named("Z").is_type_var());
        assert!(!Type::named("t").is_type_var());
        assert!(!Type::named("TT").is_type_var());
        assert!(!Type::named("any").is_type_var());
        assert!(Type::named("any").is_wildcard());
        assert!(Type::named("any").is_unconstrained());
        assert!(!int().is_unconstrained());
    }

    #[test]
    fn display_is_canonical() {
        let ty = Type::structure([
            ("b", Type::generic("slice", vec![Type::named("T")])),
            ("a", Type::optional(int())),
        ]);
        assert_eq!(ty.to_string(), "Struct{a:Optional<int>,b:slice<T>}");
        assert_eq!(Type::generic("Foo", vec![]).to_string(), "Foo<>");
        assert_eq!(
            Type::union(vec![int(), Type::Primitive(PrimitiveKind::String)]).to_string(),
            "Union<int,string>"
        );
    }

    #[test]
    fn primitive_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("Int"), None);
    }

    #[test]
    fn arity_and_base_name() {
        let owned = Type::generic("Owned", vec![int(), int()]);
        assert_eq!(owned.base_name(), "Owned");
        assert_eq!(owned.arity(), 2);
        assert_eq!(Type::optional(int()).base_name(), "Optional");
        assert_eq!(Type::generic("Foo", vec![]).arity(), 0);
    }

    #[test]
    fn type_ref_display() {
        let r = TypeRef {
            pointer: true,
            slice: true,
            ty: int(),
        };
        assert_eq!(r.to_string(), "*[]int");
        assert!(!r.same_modifiers(&TypeRef::plain(int())));
    }

    #[test]
    fn limits_check() {
        let limits = Limits::with_max_depth(2);
        assert!(limits.check(2).is_ok());
        assert_eq!(limits.check(3), Err(TypeError::TooDeep { limit: 2 }));
        assert_eq!(Limits::default().max_depth, Limits::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn wildcard_text() {
        assert!(is_wildcard_text(""));
        assert!(is_wildcard_text(" any "));
        assert!(!is_wildcard_text("T"));
    }
}
