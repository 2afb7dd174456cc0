//! Textual compatibility between an expected and an actual type string.
//!
//! The checker works one nesting level at a time through the scanner and
//! never materializes a [`Type`](ami_types::Type). It is shallow on purpose:
//! `Optional`, `Union` and `Struct` variance belong to [`crate::variance`].

use ami_types::{Limits, Shape, TypeError, is_type_var_name, is_wildcard_text, scan};

/// Single-argument families whose argument is compared covariantly.
const FAMILIES: [&str; 3] = ["Event", "Error", "Owned"];
/// One-element containers.
const CONTAINERS: [&str; 2] = ["slice", "set"];

/// Whether a value of type `actual` may be used where `expected` is declared.
///
/// Unreadable input is never compatible unless the two strings are equal or
/// one of them is the wildcard.
pub fn compatible(expected: &str, actual: &str) -> bool {
    compatible_with(expected, actual, &Limits::default())
}

pub fn compatible_with(expected: &str, actual: &str, limits: &Limits) -> bool {
    try_compatible(expected, actual, limits).unwrap_or(false)
}

/// Like [`compatible_with`], but reports why a side could not be scanned or
/// that nesting went past `limits`.
pub fn try_compatible(expected: &str, actual: &str, limits: &Limits) -> Result<bool, TypeError> {
    compat_at(expected, actual, limits, 1)
}

fn compat_at(
    expected: &str,
    actual: &str,
    limits: &Limits,
    depth: usize,
) -> Result<bool, TypeError> {
    limits.check(depth)?;
    let (expected, actual) = (expected.trim(), actual.trim());

    if is_wildcard_text(expected) || is_wildcard_text(actual) {
        return Ok(true);
    }
    if expected == actual {
        return Ok(true);
    }

    let (
        Shape::Generic {
            base: want_base,
            args: want_args,
        },
        Shape::Generic {
            base: got_base,
            args: got_args,
        },
    ) = (scan(expected)?, scan(actual)?)
    else {
        return Ok(false);
    };
    if want_base != got_base || want_args.len() != got_args.len() {
        return Ok(false);
    }

    match (want_base, want_args.as_slice(), got_args.as_slice()) {
        (base, [want], [got]) if FAMILIES.contains(&base) || CONTAINERS.contains(&base) => {
            if absorbs(want) || absorbs(got) {
                return Ok(true);
            }
            compat_at(want, got, limits, depth + 1)
        }
        ("map", [want_key, want_value], [got_key, got_value]) => {
            Ok(compat_at(want_key, got_key, limits, depth + 1)?
                && compat_at(want_value, got_value, limits, depth + 1)?)
        }
        _ => Ok(false),
    }
}

/// A type variable or wildcard argument short-circuits the comparison.
fn absorbs(arg: &str) -> bool {
    is_type_var_name(arg.trim()) || is_wildcard_text(arg)
}
