//! Field-path navigation and orderability over payload types.

use crate::Type;

/// Resolve a dotted field path (`"a.b.c"`) against `root`.
///
/// Resolution starts at the payload when `root` is `Event<T>`. `Optional` is
/// unwrapped to navigate and the result is re-wrapped in `Optional`. A
/// `Union` resolves the segment on every alternative and fails unless all
/// of them resolve. Only `Struct` can be navigated by name.
pub fn resolve_field(root: &Type, path: &str) -> Option<Type> {
    let mut current = match root {
        Type::Generic { name, args } if name == "Event" && args.len() == 1 => args[0].clone(),
        other => other.clone(),
    };
    let mut optional = false;
    let segments = path.split('.').map(str::trim).filter(|seg| !seg.is_empty());
    for segment in segments {
        if let Type::Optional(inner) = current {
            optional = true;
            current = *inner;
        }
        current = match current {
            Type::Union(alts) => {
                let leaves = alts
                    .iter()
                    .map(|alt| resolve_field(alt, segment))
                    .collect::<Option<Vec<_>>>()?;
                Type::Union(leaves)
            }
            Type::Struct(mut fields) => fields.remove(segment)?,
            _ => return None,
        };
    }
    if optional {
        Some(Type::optional(current))
    } else {
        Some(current)
    }
}

/// Whether values of `ty` can be compared for ordering (e.g. a merge sort key).
///
/// Primitives are orderable; `Optional<T>` when `T` is; a `Union` when it is
/// non-empty and every alternative is. Containers and structs are not.
pub fn is_orderable(ty: &Type) -> bool {
    match ty {
        Type::Primitive(_) => true,
        Type::Optional(inner) => is_orderable(inner),
        Type::Union(alts) => !alts.is_empty() && alts.iter().all(is_orderable),
        Type::Named(_) | Type::Generic { .. } | Type::Struct(_) => false,
    }
}
