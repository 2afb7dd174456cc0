//! Structural reader: materializes a [`Type`] from a type string.

use std::collections::BTreeMap;

use crate::scan::{Shape, scan};
use crate::{Limits, PrimitiveKind, Type, TypeError, TypeRef};

/// Parse a type string with the default [`Limits`].
pub fn parse(text: &str) -> Result<Type, TypeError> {
    parse_with(text, &Limits::default())
}

pub fn parse_with(text: &str, limits: &Limits) -> Result<Type, TypeError> {
    parse_at(text, limits, 1)
}

/// Parse a type string that may carry `*` and `[]` prefixes.
pub fn parse_ref(text: &str) -> Result<TypeRef, TypeError> {
    parse_ref_with(text, &Limits::default())
}

pub fn parse_ref_with(text: &str, limits: &Limits) -> Result<TypeRef, TypeError> {
    let mut rest = text.trim();
    let pointer = match rest.strip_prefix('*') {
        Some(stripped) => {
            rest = stripped.trim_start();
            true
        }
        None => false,
    };
    let slice = match rest.strip_prefix("[]") {
        Some(stripped) => {
            rest = stripped.trim_start();
            true
        }
        None => false,
    };
    Ok(TypeRef {
        pointer,
        slice,
        ty: parse_with(rest, limits)?,
    })
}

fn parse_at(text: &str, limits: &Limits, depth: usize) -> Result<Type, TypeError> {
    limits.check(depth)?;
    match scan(text)? {
        Shape::Atom(name) => Ok(match PrimitiveKind::from_name(name) {
            Some(kind) => Type::Primitive(kind),
            None => Type::Named(name.to_string()),
        }),
        Shape::Generic { base, args } => {
            let args = args
                .into_iter()
                .map(|arg| parse_at(arg, limits, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            match base {
                "Optional" => {
                    let found = args.len();
                    let mut args = args.into_iter();
                    match (args.next(), args.next()) {
                        (Some(inner), None) => Ok(Type::Optional(Box::new(inner))),
                        _ => Err(TypeError::OptionalArity { found }),
                    }
                }
                "Union" if args.is_empty() => {
                    Err(TypeError::EmptyArgument(text.trim().to_string()))
                }
                "Union" => Ok(Type::Union(args)),
                _ => Ok(Type::Generic {
                    name: base.to_string(),
                    args,
                }),
            }
        }
        Shape::Struct { fields } => {
            let mut out = BTreeMap::new();
            for (name, ty) in fields {
                out.insert(name.to_string(), parse_at(ty, limits, depth + 1)?);
            }
            Ok(Type::Struct(out))
        }
    }
}
