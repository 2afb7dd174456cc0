//! Deep Mismatch Locator: find the first generic whose argument count differs.
//!
//! Two traversals produce the same record. [`locate_typed`] walks parsed
//! [`Type`]s; [`locate_text`] walks type strings one scanner level at a time
//! and is the fallback when a side does not parse. Both visit struct fields
//! in lexical order and pair `Union` alternatives by kind, so the reported
//! path is stable across runs and across the two variants.

use serde::Serialize;

use ami_types::{Limits, Shape, Type, TypeError, parse_with, scan};

/// Where two types diverge in generic arity.
///
/// `path` lists generic base names outermost first and ends with `base`;
/// `path_idx` holds the argument index taken at each level and is one shorter
/// than `path`. `field_path` lists the struct fields crossed on the way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArityMismatch {
    pub path: Vec<String>,
    pub path_idx: Vec<usize>,
    pub field_path: Vec<String>,
    pub base: String,
    pub want_arity: usize,
    pub got_arity: usize,
}

impl ArityMismatch {
    /// The mismatch itself, found at `base`.
    pub fn at(base: impl Into<String>, want_arity: usize, got_arity: usize) -> Self {
        let base = base.into();
        Self {
            path: vec![base.clone()],
            path_idx: Vec::new(),
            field_path: Vec::new(),
            base,
            want_arity,
            got_arity,
        }
    }

    /// Prefix the path with the generic `base` whose argument `index` led here.
    pub fn within_arg(mut self, base: &str, index: usize) -> Self {
        self.path.insert(0, base.to_string());
        self.path_idx.insert(0, index);
        self
    }

    /// Prefix the field path with the struct field `name`.
    pub fn within_field(mut self, name: &str) -> Self {
        self.field_path.insert(0, name.to_string());
        self
    }
}

/// Locate a generic arity mismatch between two type strings.
///
/// `None` means no *arity* mismatch was found, not that the types are
/// compatible.
pub fn locate(expected: &str, actual: &str) -> Option<ArityMismatch> {
    locate_with(expected, actual, &Limits::default())
}

pub fn locate_with(expected: &str, actual: &str, limits: &Limits) -> Option<ArityMismatch> {
    try_locate(expected, actual, limits).ok().flatten()
}

/// Run the typed traversal when both sides parse, otherwise the text one.
/// Errors only when nesting goes past `limits`.
pub fn try_locate(
    expected: &str,
    actual: &str,
    limits: &Limits,
) -> Result<Option<ArityMismatch>, TypeError> {
    match (parse_with(expected, limits), parse_with(actual, limits)) {
        (Ok(expected), Ok(actual)) => locate_typed(&expected, &actual, limits),
        _ => locate_text(expected, actual, limits),
    }
}

// ---------------------------------------------------------------------------
// Typed traversal
// ---------------------------------------------------------------------------

pub fn locate_typed(
    expected: &Type,
    actual: &Type,
    limits: &Limits,
) -> Result<Option<ArityMismatch>, TypeError> {
    typed_at(expected, actual, limits, 1)
}

fn typed_at(
    expected: &Type,
    actual: &Type,
    limits: &Limits,
    depth: usize,
) -> Result<Option<ArityMismatch>, TypeError> {
    limits.check(depth)?;
    let next = depth + 1;
    match (expected, actual) {
        (
            Type::Generic {
                name: want_name,
                args: want_args,
            },
            Type::Generic {
                name: got_name,
                args: got_args,
            },
        ) => {
            if want_name != got_name {
                return Ok(None);
            }
            if want_args.len() != got_args.len() {
                return Ok(Some(ArityMismatch::at(
                    want_name.as_str(),
                    want_args.len(),
                    got_args.len(),
                )));
            }
            for (i, (want, got)) in want_args.iter().zip(got_args).enumerate() {
                if let Some(found) = typed_at(want, got, limits, next)? {
                    return Ok(Some(found.within_arg(want_name, i)));
                }
            }
            Ok(None)
        }
        (Type::Optional(want), Type::Optional(got)) => typed_at(want, got, limits, next),
        (Type::Struct(want_fields), Type::Struct(got_fields)) => {
            // BTreeMap iteration is already lexical.
            for (name, want) in want_fields {
                let Some(got) = got_fields.get(name) else {
                    continue;
                };
                if let Some(found) = typed_at(want, got, limits, next)? {
                    return Ok(Some(found.within_field(name)));
                }
            }
            Ok(None)
        }
        (Type::Union(want_alts), Type::Union(got_alts)) => {
            for want in want_alts {
                for got in got_alts {
                    if !same_kind(want, got) {
                        continue;
                    }
                    if let Some(found) = typed_at(want, got, limits, next)? {
                        return Ok(Some(found));
                    }
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Union alternatives are compared only against alternatives of the same
/// top-level constructor. Other expected alternatives pair with anything.
fn same_kind(want: &Type, got: &Type) -> bool {
    match (want, got) {
        (Type::Struct(_), other) => matches!(other, Type::Struct(_)),
        (Type::Optional(_), other) => matches!(other, Type::Optional(_)),
        (Type::Generic { name, .. }, other) => {
            matches!(other, Type::Generic { name: got_name, .. } if got_name == name)
        }
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Text traversal
// ---------------------------------------------------------------------------

/// Locate over raw type strings. A level that does not scan is treated as an
/// opaque name and never reports a mismatch.
pub fn locate_text(
    expected: &str,
    actual: &str,
    limits: &Limits,
) -> Result<Option<ArityMismatch>, TypeError> {
    text_at(expected, actual, limits, 1)
}

fn text_at(
    expected: &str,
    actual: &str,
    limits: &Limits,
    depth: usize,
) -> Result<Option<ArityMismatch>, TypeError> {
    limits.check(depth)?;
    let next = depth + 1;
    let (Ok(want_shape), Ok(got_shape)) = (scan(expected), scan(actual)) else {
        return Ok(None);
    };

    match (want_shape, got_shape) {
        (
            Shape::Struct {
                fields: mut want_fields,
            },
            Shape::Struct { fields: got_fields },
        ) => {
            want_fields.sort_unstable_by_key(|(name, _)| *name);
            for (name, want) in want_fields {
                let Some((_, got)) = got_fields.iter().find(|(got_name, _)| *got_name == name)
                else {
                    continue;
                };
                if let Some(found) = text_at(want, got, limits, next)? {
                    return Ok(Some(found.within_field(name)));
                }
            }
            Ok(None)
        }
        (
            Shape::Generic {
                base: "Optional",
                args: want_args,
            },
            Shape::Generic {
                base: "Optional",
                args: got_args,
            },
        ) if want_args.len() == 1 && got_args.len() == 1 => {
            text_at(want_args[0], got_args[0], limits, next)
        }
        (
            Shape::Generic {
                base: "Union",
                args: want_alts,
            },
            Shape::Generic {
                base: "Union",
                args: got_alts,
            },
        ) => {
            for want in &want_alts {
                for got in &got_alts {
                    if !same_kind_text(want, got) {
                        continue;
                    }
                    if let Some(found) = text_at(want, got, limits, next)? {
                        return Ok(Some(found));
                    }
                }
            }
            Ok(None)
        }
        (
            Shape::Generic {
                base: want_base,
                args: want_args,
            },
            Shape::Generic {
                base: got_base,
                args: got_args,
            },
        ) => {
            if want_base != got_base {
                return Ok(None);
            }
            if want_args.len() != got_args.len() {
                return Ok(Some(ArityMismatch::at(
                    want_base,
                    want_args.len(),
                    got_args.len(),
                )));
            }
            for (i, (want, got)) in want_args.iter().zip(&got_args).enumerate() {
                if let Some(found) = text_at(want, got, limits, next)? {
                    return Ok(Some(found.within_arg(want_base, i)));
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Text counterpart of [`same_kind`], keyed on the scanned outer shape.
fn same_kind_text(want: &str, got: &str) -> bool {
    match (scan(want), scan(got)) {
        (Ok(Shape::Struct { .. }), got) => matches!(got, Ok(Shape::Struct { .. })),
        (Ok(Shape::Generic { base, .. }), got) if base != "Union" => {
            matches!(got, Ok(Shape::Generic { base: got_base, .. }) if got_base == base)
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both(expected: &str, actual: &str) -> Option<ArityMismatch> {
        let limits = Limits::default();
        let text = locate_text(expected, actual, &limits).unwrap();
        let typed = locate(expected, actual);
        assert_eq!(typed, text, "typed and text traversals disagree");
        typed
    }

    #[test]
    fn top_level_arity() {
        let found = both("Owned<T>", "Owned<int,string>").unwrap();
        assert_eq!(found, ArityMismatch::at("Owned", 1, 2));
        assert!(found.path_idx.is_empty());
        assert!(found.field_path.is_empty());
    }

    #[test]
    fn nested_through_containers() {
        let found = both("slice<Owned<T>>", "slice<Owned<int,string>>").unwrap();
        assert_eq!(found.path, ["slice", "Owned"]);
        assert_eq!(found.path_idx, [0]);
        assert_eq!((found.want_arity, found.got_arity), (1, 2));

        let found = both("map<string,Event<Owned<T>>>", "map<string,Event<Owned<T,U>>>").unwrap();
        assert_eq!(found.path, ["map", "Event", "Owned"]);
        assert_eq!(found.path_idx, [1, 0]);
    }

    #[test]
    fn struct_field_path() {
        let found = both(
            "Struct{a:slice<Owned<T>>}",
            "Struct{a:slice<Owned<int,string>>}",
        )
        .unwrap();
        assert_eq!(found.field_path, ["a"]);
        assert_eq!(found.path.last().map(String::as_str), Some("Owned"));

        let found = both(
            "Event<Struct{a:Struct{b:Owned<T>}}>",
            "Event<Struct{a:Struct{b:Owned<int,string>}}>",
        )
        .unwrap();
        assert_eq!(found.field_path, ["a", "b"]);
        assert_eq!(found.path, ["Event", "Owned"]);
        assert_eq!(found.path_idx, [0]);
    }

    #[test]
    fn struct_fields_visited_in_lexical_order() {
        let found = both(
            "Struct{z:Owned<T>,b:map<K,V>}",
            "Struct{b:map<int>,z:Owned<int,int>}",
        )
        .unwrap();
        assert_eq!(found.field_path, ["b"]);
        assert_eq!(found.base, "map");
        assert_eq!(both("Struct{x:Owned<T>}", "Struct{y:Owned<T,U>}"), None);
    }

    #[test]
    fn optional_descends_without_segment() {
        let found = both("Optional<Owned<T>>", "Optional<Owned<int,string>>").unwrap();
        assert_eq!(found.path, ["Owned"]);
        assert_eq!(both("Optional<Owned<T>>", "Owned<int,string>"), None);
    }

    #[test]
    fn union_pairs_alternatives_by_kind() {
        let found = both(
            "Union<int,Struct{k:Owned<T>}>",
            "Union<Owned<int,int>,Struct{k:Owned<int,int>}>",
        )
        .unwrap();
        assert_eq!(found.field_path, ["k"]);
        assert_eq!(found.path, ["Owned"]);

        let found = both("Union<slice<T>,Event<T>>", "Union<Event<T,U>,slice<int>>").unwrap();
        assert_eq!(found.base, "Event");
    }

    #[test]
    fn no_arity_mismatch() {
        assert_eq!(both("Owned<int>", "Event<int,string>"), None);
        assert_eq!(both("slice<int>", "slice<string>"), None);
        assert_eq!(both("int", "string"), None);
    }

    #[test]
    fn falls_back_to_text_when_unparsable() {
        // `Optional` with two arguments does not parse as a type.
        let found = locate("Event<Optional<int,int>>", "Event<Optional<int>>").unwrap();
        assert_eq!(found.path, ["Event", "Optional"]);
        assert_eq!((found.want_arity, found.got_arity), (2, 1));
        assert_eq!(locate("Owned<T", "Owned<int,string>"), None);
    }

    #[test]
    fn zero_arity_generic() {
        let found = both("Foo< >", "Foo<int>").unwrap();
        assert_eq!((found.want_arity, found.got_arity), (0, 1));
    }

    #[test]
    fn depth_is_bounded() {
        let want = format!("{}Owned<T>{}", "slice<".repeat(10), ">".repeat(10));
        let got = format!("{}Owned<T,U>{}", "slice<".repeat(10), ">".repeat(10));
        let limits = Limits::with_max_depth(5);
        assert_eq!(
            try_locate(&want, &got, &limits),
            Err(TypeError::TooDeep { limit: 5 })
        );
        assert_eq!(locate_with(&want, &got, &limits), None);
        assert_eq!(locate(&want, &got).unwrap().path_idx.len(), 10);
    }

    #[test]
    fn serializes_camel_case() {
        let found = locate("slice<Owned<T>>", "slice<Owned<int,string>>").unwrap();
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value["pathIdx"], serde_json::json!([0]));
        assert_eq!(value["wantArity"], 1);
        assert_eq!(value["fieldPath"], serde_json::json!([]));
    }
}
