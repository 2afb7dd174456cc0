//! One-level scanning of type strings.
//!
//! The scanner never recurses into arguments: it finds the outermost
//! constructor and returns the raw text of each top-level argument or struct
//! field. [`crate::parse`] builds on it, so both readers agree on bracket
//! matching, quoting, and empty argument lists by construction.

use crate::TypeError;

/// The outermost shape of a type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<'a> {
    /// No brackets: a primitive, a nominal name, a type variable or `any`.
    Atom(&'a str),
    /// `base<arg, ...>`; `args` is empty for `base<>`.
    Generic { base: &'a str, args: Vec<&'a str> },
    /// `Struct{name: type, ...}` as `(name, type-text)` pairs in source order.
    Struct { fields: Vec<(&'a str, &'a str)> },
}

/// Classify the outermost level of `text`.
pub fn scan(text: &str) -> Result<Shape<'_>, TypeError> {
    let s = text.trim();
    if s.is_empty() {
        return Err(TypeError::Empty);
    }
    if s.starts_with(['"', '\'']) {
        return scan_atom(s);
    }

    if let Some(body) = struct_body(s)? {
        return scan_struct(s, body);
    }

    let Some(open) = s.find(['<', '{', '(', '[']) else {
        return scan_atom(s);
    };
    if s.as_bytes()[open] != b'<' {
        return Err(TypeError::InvalidName(s.to_string()));
    }
    let base = s[..open].trim();
    if base.is_empty() {
        return Err(TypeError::EmptyBase(s.to_string()));
    }
    if !is_ident(base) {
        return Err(TypeError::InvalidName(base.to_string()));
    }
    let close = matching_close(s, open)?;
    if close != s.len() - 1 {
        return Err(TypeError::Unbalanced(s.to_string()));
    }
    let inner = &s[open + 1..close];
    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(inner)?
    };
    if args.iter().any(|arg| arg.is_empty()) {
        return Err(TypeError::EmptyArgument(s.to_string()));
    }
    Ok(Shape::Generic { base, args })
}

/// Split `text` on commas that sit outside every `<>`, `{}`, `()`, `[]` pair
/// and outside quoted substrings. Segments are trimmed; an all-whitespace
/// input yields a single empty segment.
pub fn split_top_level(text: &str) -> Result<Vec<&str>, TypeError> {
    let mut out = Vec::new();
    let mut stack: Vec<u8> = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i = skip_quoted(text, i, quote)?;
                continue;
            }
            b'<' => stack.push(b'>'),
            b'{' => stack.push(b'}'),
            b'(' => stack.push(b')'),
            b'[' => stack.push(b']'),
            closer @ (b'>' | b'}' | b')' | b']') => {
                if stack.pop() != Some(closer) {
                    return Err(TypeError::Unbalanced(text.to_string()));
                }
            }
            b',' if stack.is_empty() => {
                out.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if !stack.is_empty() {
        return Err(TypeError::Unbalanced(text.to_string()));
    }
    out.push(text[start..].trim());
    Ok(out)
}

/// `(base, top-level argument texts)` when `text` is a well-formed generic.
///
/// Malformed or non-generic text yields `None`; callers treat it as an
/// opaque nominal type.
pub fn generic_parts(text: &str) -> Option<(&str, Vec<&str>)> {
    match scan(text) {
        Ok(Shape::Generic { base, args }) => Some((base, args)),
        _ => None,
    }
}

/// Field segments when `text` is a well-formed `Struct{...}`.
pub fn struct_fields(text: &str) -> Option<Vec<(&str, &str)>> {
    match scan(text) {
        Ok(Shape::Struct { fields }) => Some(fields),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns the text between the braces of `Struct{...}`, if `s` is one.
fn struct_body(s: &str) -> Result<Option<&str>, TypeError> {
    let Some(rest) = s.strip_prefix("Struct") else {
        return Ok(None);
    };
    let trimmed = rest.trim_start();
    if !trimmed.starts_with('{') {
        return Ok(None);
    }
    let open = s.len() - trimmed.len();
    let close = matching_close(s, open)?;
    if close != s.len() - 1 {
        return Err(TypeError::Unbalanced(s.to_string()));
    }
    Ok(Some(&s[open + 1..close]))
}

fn scan_struct<'a>(s: &str, body: &'a str) -> Result<Shape<'a>, TypeError> {
    if body.trim().is_empty() {
        return Ok(Shape::Struct { fields: Vec::new() });
    }
    let mut fields: Vec<(&str, &str)> = Vec::new();
    for segment in split_top_level(body)? {
        let Some((name, ty)) = segment.split_once(':') else {
            return Err(TypeError::InvalidField(segment.to_string()));
        };
        let (name, ty) = (name.trim(), ty.trim());
        if !is_ident(name) {
            return Err(TypeError::InvalidField(segment.to_string()));
        }
        if ty.is_empty() {
            return Err(TypeError::EmptyArgument(s.to_string()));
        }
        if fields.iter().any(|(seen, _)| *seen == name) {
            return Err(TypeError::DuplicateField(name.to_string()));
        }
        fields.push((name, ty));
    }
    Ok(Shape::Struct { fields })
}

fn scan_atom(s: &str) -> Result<Shape<'_>, TypeError> {
    let first = s.as_bytes()[0];
    if first == b'"' || first == b'\'' {
        let end = skip_quoted(s, 0, first)?;
        if end != s.len() {
            return Err(TypeError::InvalidName(s.to_string()));
        }
        return Ok(Shape::Atom(s));
    }
    if s.contains(['>', '}', ')', ']']) {
        return Err(TypeError::Unbalanced(s.to_string()));
    }
    if !is_ident(s) {
        return Err(TypeError::InvalidName(s.to_string()));
    }
    Ok(Shape::Atom(s))
}

/// Index of the bracket closing the one at `open`.
fn matching_close(s: &str, open: usize) -> Result<usize, TypeError> {
    let bytes = s.as_bytes();
    let mut stack: Vec<u8> = Vec::new();
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i = skip_quoted(s, i, quote)?;
                continue;
            }
            b'<' => stack.push(b'>'),
            b'{' => stack.push(b'}'),
            b'(' => stack.push(b')'),
            b'[' => stack.push(b']'),
            closer @ (b'>' | b'}' | b')' | b']') => {
                if stack.pop() != Some(closer) {
                    return Err(TypeError::Unbalanced(s.to_string()));
                }
                if stack.is_empty() {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(TypeError::Unbalanced(s.to_string()))
}

/// Skip a quoted substring starting at `start`; returns the index just past
/// the closing quote. Backslash escapes the next byte.
fn skip_quoted(s: &str, start: usize, quote: u8) -> Result<usize, TypeError> {
    let bytes = s.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(TypeError::UnterminatedQuote(s.to_string()))
}

/// Identifiers, optionally package-qualified (`pkg.Name`).
fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}
