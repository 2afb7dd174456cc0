//! Variance rules for payloads crossing a pipeline edge.
//!
//! An upstream producer's payload type may flow into a downstream consumer's
//! declared input when it is *within* that type:
//! - `Optional<X>` accepts `Optional<Y>` or a bare `Y` whenever `Y` is within `X`.
//! - A `Union` accepts any one of its alternatives; an actual `Union` is
//!   accepted only if every alternative is.
//! - A `Struct` accepts a wider struct as long as every shared field fits
//!   (width subtyping).
//! - Generics are covariant in each argument, with equal name and arity.

use ami_types::{Limits, Type, TypeError, parse_with};

/// Whether `actual` may flow where `expected` is declared.
///
/// Inputs nested past the default [`Limits`] are rejected.
pub fn payload_within(expected: &Type, actual: &Type) -> bool {
    try_payload_within(expected, actual, &Limits::default()).unwrap_or(false)
}

/// Like [`payload_within`], but surfaces a [`TypeError::TooDeep`] instead of
/// folding it into `false`.
pub fn try_payload_within(
    expected: &Type,
    actual: &Type,
    limits: &Limits,
) -> Result<bool, TypeError> {
    within_at(expected, actual, limits, 1)
}

/// [`payload_within`] over type strings. Either side failing to parse makes
/// the payloads incompatible.
pub fn payload_within_text(expected: &str, actual: &str, limits: &Limits) -> bool {
    match (parse_with(expected, limits), parse_with(actual, limits)) {
        (Ok(expected), Ok(actual)) => {
            try_payload_within(&expected, &actual, limits).unwrap_or(false)
        }
        _ => false,
    }
}

fn within_at(
    expected: &Type,
    actual: &Type,
    limits: &Limits,
    depth: usize,
) -> Result<bool, TypeError> {
    limits.check(depth)?;
    let next = depth + 1;

    if expected == actual || expected.is_unconstrained() || actual.is_unconstrained() {
        return Ok(true);
    }

    if let Type::Optional(want) = expected {
        let got = match actual {
            Type::Optional(got) => got.as_ref(),
            other => other,
        };
        return within_at(want, got, limits, next);
    }

    if let Type::Union(got_alts) = actual {
        if got_alts.is_empty() {
            return Ok(false);
        }
        for alt in got_alts {
            if !within_at(expected, alt, limits, next)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    match (expected, actual) {
        (Type::Union(want_alts), _) => {
            for alt in want_alts {
                if within_at(alt, actual, limits, next)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        (Type::Struct(want_fields), Type::Struct(got_fields)) => {
            for (name, want) in want_fields {
                let Some(got) = got_fields.get(name) else {
                    continue;
                };
                let got = match got {
                    Type::Optional(inner) => inner.as_ref(),
                    other => other,
                };
                if !within_at(want, got, limits, next)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
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
            if want_name != got_name || want_args.len() != got_args.len() {
                return Ok(false);
            }
            for (want, got) in want_args.iter().zip(got_args) {
                if !within_at(want, got, limits, next)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}
