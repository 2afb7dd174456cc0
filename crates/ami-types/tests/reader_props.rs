//! Property tests for the type-string reader.
//!
//! 1. Printing then reading yields an equal type.
//! 2. The scanner's one-level view agrees with the structural parser.
//! 3. Malformed bracket nesting never panics and is always an error.

use std::collections::BTreeMap;

use ami_types::{PrimitiveKind, Shape, Type, generic_parts, parse, scan, struct_fields};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const NAME_POOL: &[&str] = &["T", "U", "K", "any", "Order", "Customer", "pkg.Id"];
const BASE_POOL: &[&str] = &["Owned", "Event", "Error", "slice", "set", "map", "Foo"];
const FIELD_POOL: &[&str] = &["a", "b", "c", "id", "name", "value"];

fn arb_leaf() -> impl Strategy<Value = Type> {
    prop_oneof![
        prop::sample::select(PrimitiveKind::ALL.to_vec()).prop_map(Type::Primitive),
        prop::sample::select(NAME_POOL).prop_map(Type::named),
    ]
}

fn arb_type() -> impl Strategy<Value = Type> {
    arb_leaf().prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (
                prop::sample::select(BASE_POOL),
                prop::collection::vec(inner.clone(), 0..3)
            )
                .prop_map(|(name, args)| Type::generic(name, args)),
            inner.clone().prop_map(Type::optional),
            prop::collection::vec(inner.clone(), 1..3).prop_map(Type::union),
            prop::collection::btree_map(prop::sample::select(FIELD_POOL), inner, 0..3).prop_map(
                |fields: BTreeMap<&str, Type>| Type::structure(fields)
            ),
        ]
    })
}

proptest! {
    #[test]
    fn print_then_parse_is_identity(ty in arb_type()) {
        let printed = ty.to_string();
        let reparsed = parse(&printed).expect("canonical output must parse");
        prop_assert_eq!(&reparsed, &ty);
        prop_assert_eq!(reparsed.to_string(), printed);
    }

    #[test]
    fn scanner_agrees_with_parser(ty in arb_type()) {
        let printed = ty.to_string();
        match (&ty, scan(&printed).expect("canonical output must scan")) {
            (Type::Generic { name, args }, Shape::Generic { base, args: texts }) => {
                prop_assert_eq!(name.as_str(), base);
                prop_assert_eq!(args.len(), texts.len());
                for (arg, text) in args.iter().zip(texts) {
                    prop_assert_eq!(arg.to_string(), text);
                }
            }
            (Type::Optional(_), Shape::Generic { base, args }) => {
                prop_assert_eq!(base, "Optional");
                prop_assert_eq!(args.len(), 1);
            }
            (Type::Union(alts), Shape::Generic { base, args }) => {
                prop_assert_eq!(base, "Union");
                prop_assert_eq!(alts.len(), args.len());
            }
            (Type::Struct(fields), Shape::Struct { fields: texts }) => {
                let names: Vec<&str> = texts.iter().map(|(name, _)| *name).collect();
                let expected: Vec<&str> = fields.keys().map(String::as_str).collect();
                prop_assert_eq!(names, expected);
            }
            (Type::Primitive(_) | Type::Named(_), Shape::Atom(text)) => {
                prop_assert_eq!(text, printed.as_str());
            }
            (ty, shape) => prop_assert!(false, "shape mismatch: {ty:?} vs {shape:?}"),
        }
    }

    #[test]
    fn truncated_input_is_rejected(ty in arb_type(), cut in 1usize..6) {
        let printed = ty.to_string();
        prop_assume!(printed.ends_with('>') || printed.ends_with('}'));
        let end = printed.len().saturating_sub(cut.min(printed.len() - 1));
        let truncated = &printed[..end];
        prop_assume!(truncated.matches(['<', '{']).count() > truncated.matches(['>', '}']).count());
        prop_assert!(parse(truncated).is_err());
        prop_assert!(generic_parts(truncated).is_none());
        prop_assert!(struct_fields(truncated).is_none());
    }
}
