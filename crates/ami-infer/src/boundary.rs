//! Boundary checks: call arguments, returns, assignments, local initializers,
//! pipeline edges and merge fields.
//!
//! Each check takes the declared and actual type strings at one boundary,
//! asks the engine, and reports problems as [`Diagnostic`]s whose `data`
//! carries the structured payload (`expected`, `actual`, `path`, ...).

use serde_json::{Value, json};

use ami_diag::{Category, Diagnostic, Position};
use ami_types::{
    Limits, Type, is_orderable, is_wildcard_text, parse_ref_with, parse_with, resolve_field,
};

use crate::compat::compatible_with;
use crate::locate::{ArityMismatch, locate_with};
use crate::unify::{Unifier, UnifyError};
use crate::variance::try_payload_within;

/// A type string as it appears at one source location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSite {
    pub ty: String,
    /// Parameter, variable or step name, when there is one.
    pub name: Option<String>,
    pub position: Option<Position>,
}

impl TypeSite {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    fn is_wildcard(&self) -> bool {
        is_wildcard_text(&self.ty)
    }
}

fn placed(diag: Diagnostic, position: Option<Position>) -> Diagnostic {
    match position {
        Some(pos) => diag.at(pos),
        None => diag,
    }
}

/// Payload keys shared by every generic-arity report.
fn arity_payload(found: &ArityMismatch) -> Value {
    json!({
        "base": found.base,
        "path": found.path,
        "pathIdx": found.path_idx,
        "fieldPath": found.field_path,
        "expectedArity": found.want_arity,
        "actualArity": found.got_arity,
        "wantArity": found.want_arity,
        "gotArity": found.got_arity,
    })
}

fn generic_arity_diag(expected: &str, actual: &str, found: &ArityMismatch) -> Diagnostic {
    Diagnostic::error(
        Category::GenericArityMismatch,
        Category::GenericArityMismatch.description(),
    )
    .with_payload(arity_payload(found))
    .with_data("expected", expected)
    .with_data("actual", actual)
}

fn site_types(sites: &[TypeSite]) -> Vec<&str> {
    sites.iter().map(|site| site.ty.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// Runs boundary checks under one set of [`Limits`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checker {
    pub limits: Limits,
}

impl Checker {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Whether `actual` is accepted where `expected` is declared: textual
    /// compatibility first, then structural unification for the shapes the
    /// textual rules do not cover.
    fn accepts(&self, expected: &str, actual: &str) -> bool {
        if compatible_with(expected, actual, &self.limits) {
            return true;
        }
        self.unify_text(expected, actual).is_ok()
    }

    fn unify_text(&self, expected: &str, actual: &str) -> Result<Unifier, UnifyError> {
        let want = parse_ref_with(expected, &self.limits)?;
        let got = parse_ref_with(actual, &self.limits)?;
        let mut unifier = Unifier::with_limits(self.limits);
        unifier.unify_refs(&want, &got)?;
        Ok(unifier)
    }

    /// Check a call of `callee` against its declared parameters.
    ///
    /// Arity is checked first and stops the check. Each argument is then
    /// located for a generic arity mismatch, falling back to a plain type
    /// mismatch; several bad arguments also produce a summary record.
    /// Arguments are accepted by the textual rules alone, with no fallback
    /// to unification: `[]T` does not accept `[]int` here, unlike in
    /// [`Checker::check_assignment`].
    pub fn check_call(
        &self,
        callee: &str,
        params: &[TypeSite],
        args: &[TypeSite],
        call_position: Option<Position>,
    ) -> Vec<Diagnostic> {
        if params.len() != args.len() {
            let diag = Diagnostic::error(Category::CallArityMismatch, "call arity mismatch")
                .with_data("callee", callee)
                .with_data("expectedArity", params.len())
                .with_data("actualArity", args.len());
            return vec![placed(diag, call_position)];
        }

        let mut out = Vec::new();
        let mut mismatched: Vec<(usize, Option<ArityMismatch>)> = Vec::new();
        for (i, (param, arg)) in params.iter().zip(args).enumerate() {
            if param.is_wildcard() || arg.ty.trim() == ami_types::WILDCARD {
                continue;
            }
            let (expected, actual) = (param.ty.as_str(), arg.ty.as_str());
            let diag = if let Some(found) = locate_with(expected, actual, &self.limits) {
                let diag = generic_arity_diag(expected, actual, &found);
                mismatched.push((i, Some(found)));
                diag
            } else if !compatible_with(expected, actual, &self.limits) {
                mismatched.push((i, None));
                Diagnostic::error(
                    Category::CallArgTypeMismatch,
                    format!(
                        "call argument type mismatch: arg {i} expected {expected}, got {actual}"
                    ),
                )
                .with_data("expected", expected)
                .with_data("actual", actual)
            } else {
                continue;
            };
            let mut diag = diag.with_data("argIndex", i).with_data("callee", callee);
            if let Some(pos) = param.position {
                diag = diag.with_data("expectedPos", json!(pos));
            }
            out.push(placed(diag, arg.position));
        }

        if mismatched.len() > 1 {
            let indices: Vec<usize> = mismatched.iter().map(|(i, _)| *i).collect();
            let paths: Vec<Value> = mismatched
                .iter()
                .filter_map(|(i, found)| {
                    let found = found.as_ref()?;
                    let mut entry = json!({
                        "argIndex": i,
                        "base": found.base,
                        "path": found.path,
                        "pathIdx": found.path_idx,
                        "fieldPath": found.field_path,
                    });
                    let param = &params[*i];
                    if let Some(pos) = param.position {
                        entry["expectedPos"] = json!(pos);
                    }
                    if let Some(name) = param.name.as_deref().filter(|name| !name.is_empty()) {
                        entry["paramName"] = json!(name);
                    }
                    Some(entry)
                })
                .collect();
            let mut summary = Diagnostic::error(
                Category::CallArgsMismatchSummary,
                Category::CallArgsMismatchSummary.description(),
            )
            .with_data("count", indices.len())
            .with_data("indices", indices)
            .with_data("callee", callee);
            if !paths.is_empty() {
                summary = summary.with_data("paths", paths);
            }
            out.push(placed(summary, call_position));
        }
        out
    }

    /// Check returned values against the declared result types.
    ///
    /// Every result is unified against its declared type, and a variable
    /// bound only to another type variable is reported as uninferred. When
    /// unification fails the textual rules get the final say.
    pub fn check_return(
        &self,
        declared: &[TypeSite],
        returned: &[TypeSite],
        return_position: Option<Position>,
    ) -> Vec<Diagnostic> {
        if declared.len() != returned.len() {
            let diag = Diagnostic::error(Category::ReturnTypeMismatch, "return arity mismatch")
                .with_data("expected", site_types(declared))
                .with_data("actual", site_types(returned));
            return vec![placed(diag, return_position)];
        }

        let mut out = Vec::new();
        for (i, (want, got)) in declared.iter().zip(returned).enumerate() {
            if want.is_wildcard() || got.ty.trim() == ami_types::WILDCARD {
                continue;
            }
            let (expected, actual) = (want.ty.as_str(), got.ty.as_str());
            let position = got.position.or(return_position);
            if let Some(found) = locate_with(expected, actual, &self.limits) {
                let diag = generic_arity_diag(expected, actual, &found).with_data("resultIndex", i);
                out.push(placed(diag, position));
                continue;
            }
            match self.unify_text(expected, actual) {
                Ok(unifier) => {
                    let uninferred: Vec<&str> = unifier
                        .substitution
                        .bindings()
                        .iter()
                        .filter(|(_, bound)| bound.is_type_var())
                        .map(|(var, _)| var.as_str())
                        .collect();
                    if !uninferred.is_empty() {
                        let diag = Diagnostic::error(
                            Category::TypeUninferred,
                            "return type contains uninferred type variables",
                        )
                        .with_data("resultIndex", i)
                        .with_data("variables", uninferred);
                        out.push(placed(diag, position));
                    }
                }
                Err(_) if compatible_with(expected, actual, &self.limits) => {}
                Err(_) => {
                    let diag = Diagnostic::error(
                        Category::ReturnTypeMismatch,
                        format!("return type mismatch: got {actual}, want {expected}"),
                    )
                    .with_data("resultIndex", i)
                    .with_data("expected", expected)
                    .with_data("actual", actual);
                    out.push(placed(diag, position));
                }
            }
        }
        out
    }

    /// Check a value assigned to `target`.
    pub fn check_assignment(&self, target: &TypeSite, value: &TypeSite) -> Option<Diagnostic> {
        self.check_assign_like(target, value, "assignment type mismatch")
    }

    fn check_assign_like(
        &self,
        target: &TypeSite,
        value: &TypeSite,
        what: &str,
    ) -> Option<Diagnostic> {
        if target.is_wildcard() || value.is_wildcard() {
            return None;
        }
        let (expected, actual) = (target.ty.as_str(), value.ty.as_str());
        let diag = if let Some(found) = locate_with(expected, actual, &self.limits) {
            generic_arity_diag(expected, actual, &found)
        } else if self.accepts(expected, actual) {
            return None;
        } else {
            Diagnostic::error(
                Category::AssignTypeMismatch,
                format!("{what}: {expected} != {actual}"),
            )
            .with_data("expected", expected)
            .with_data("actual", actual)
        };
        let diag = match &target.name {
            Some(name) => diag.with_data("name", name.as_str()),
            None => diag,
        };
        Some(placed(diag, value.position.or(target.position)))
    }

    /// Determine the type of a local from its annotation and initializer.
    ///
    /// `declared.ty` is empty when the local has no annotation. An annotated
    /// local keeps its annotation; the initializer must fit it.
    pub fn infer_local(
        &self,
        declared: &TypeSite,
        init: Option<&TypeSite>,
    ) -> Result<String, Diagnostic> {
        let annotated = !declared.ty.trim().is_empty();
        let uninferred = |message: &str| {
            let diag = Diagnostic::error(Category::TypeUninferred, message);
            let diag = match &declared.name {
                Some(name) => diag.with_data("name", name.as_str()),
                None => diag,
            };
            placed(diag, declared.position)
        };
        match (annotated, init) {
            (true, Some(init)) => {
                match self.check_assign_like(declared, init, "var init type mismatch") {
                    Some(diag) => Err(diag),
                    None => Ok(declared.ty.trim().to_string()),
                }
            }
            (true, None) => Ok(declared.ty.trim().to_string()),
            (false, Some(init)) if !init.is_wildcard() => Ok(init.ty.trim().to_string()),
            (false, Some(_)) => Err(uninferred("cannot infer variable type from initializer")),
            (false, None) => Err(uninferred(
                "variable declaration missing type and initializer",
            )),
        }
    }

    /// Check that the payload produced upstream may flow into the input
    /// declared downstream.
    ///
    /// Unreadable payload types only pass when they are equal or one side is
    /// the wildcard.
    pub fn check_event_flow(
        &self,
        upstream: &TypeSite,
        downstream: &TypeSite,
    ) -> Option<Diagnostic> {
        let (actual, expected) = (upstream.ty.trim(), downstream.ty.trim());
        if actual == expected || upstream.is_wildcard() || downstream.is_wildcard() {
            return None;
        }
        let within = match (
            parse_with(expected, &self.limits),
            parse_with(actual, &self.limits),
        ) {
            (Ok(want), Ok(got)) => try_payload_within(&want, &got, &self.limits).unwrap_or(false),
            _ => false,
        };
        if within {
            return None;
        }
        let mut diag =
            Diagnostic::error(Category::EventTypeFlow, Category::EventTypeFlow.description())
                .with_data("expected", expected)
                .with_data("actual", actual);
        if let Some(from) = &upstream.name {
            diag = diag.with_data("from", from.as_str());
        }
        if let Some(to) = &downstream.name {
            diag = diag.with_data("to", to.as_str());
        }
        Some(placed(diag, downstream.position.or(upstream.position)))
    }

    /// Resolve a merge field path (`"a.b"`) against an upstream payload type.
    pub fn resolve_merge_field(&self, payload: &TypeSite, field: &str) -> Result<Type, Diagnostic> {
        let root = parse_with(&payload.ty, &self.limits).map_err(|err| {
            placed(
                Diagnostic::error(Category::TypeSyntax, err.to_string())
                    .with_data("type", payload.ty.as_str()),
                payload.position,
            )
        })?;
        let inner = match &root {
            Type::Generic { name, args } if name == "Event" && args.len() == 1 => &args[0],
            other => other,
        };
        if matches!(inner, Type::Primitive(_)) {
            let diag = Diagnostic::error(
                Category::MergeFieldOnPrimitive,
                "cannot reference field on Event<primitive> payload",
            )
            .with_data("field", field)
            .with_data("type", root.to_string());
            return Err(placed(diag, payload.position));
        }
        resolve_field(&root, field).ok_or_else(|| {
            let diag = Diagnostic::error(
                Category::MergeFieldUnknown,
                Category::MergeFieldUnknown.description(),
            )
            .with_data("field", field)
            .with_data("type", root.to_string());
            placed(diag, payload.position)
        })
    }

    /// Resolve a merge sort field and require it to be orderable.
    pub fn check_merge_sort_field(
        &self,
        payload: &TypeSite,
        field: &str,
    ) -> Result<Type, Diagnostic> {
        let ty = self.resolve_merge_field(payload, field)?;
        if is_orderable(&ty) {
            return Ok(ty);
        }
        let diag = Diagnostic::error(
            Category::MergeFieldUnorderable,
            Category::MergeFieldUnorderable.description(),
        )
        .with_data("field", field)
        .with_data("fieldType", ty.to_string());
        Err(placed(diag, payload.position))
    }

    /// Unify a generic signature's parameters against call arguments and
    /// return its result types with every recovered variable substituted.
    pub fn instantiate_call(
        &self,
        params: &[&str],
        args: &[&str],
        results: &[&str],
    ) -> Result<Vec<String>, UnifyError> {
        if params.len() != args.len() {
            return Err(UnifyError::ArgumentCount {
                want: params.len(),
                got: args.len(),
            });
        }
        let mut unifier = Unifier::with_limits(self.limits);
        for (param, arg) in params.iter().zip(args) {
            let want = parse_ref_with(param, &self.limits)?;
            let got = parse_ref_with(arg, &self.limits)?;
            unifier.unify_refs(&want, &got)?;
        }
        results
            .iter()
            .map(|result| -> Result<String, UnifyError> {
                let ty = parse_ref_with(result, &self.limits)?;
                Ok(unifier.instantiate(&ty).to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site(ty: &str) -> TypeSite {
        TypeSite::new(ty)
    }

    fn pos(line: u32, column: u32) -> Position {
        Position {
            line,
            column,
            offset: 0,
        }
    }

    #[test]
    fn call_arity_stops_checking() {
        let diags = Checker::default().check_call(
            "send",
            &[site("int"), site("string")],
            &[site("int")],
            Some(pos(4, 2)),
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code(), "E_CALL_ARITY_MISMATCH");
        assert_eq!(diags[0].position, Some(pos(4, 2)));
        assert_eq!(diags[0].data("expectedArity"), Some(&json!(2)));
    }

    #[test]
    fn call_argument_mismatches() {
        let params = [
            site("Owned<T>").named("owner").at(pos(1, 10)),
            site("int"),
            site("any"),
        ];
        let args = [
            site("Owned<int,string>").at(pos(5, 8)),
            site("string"),
            site("Struct{a:int}"),
        ];
        let diags = Checker::default().check_call("f", &params, &args, Some(pos(5, 3)));
        let codes: Vec<&str> = diags.iter().map(Diagnostic::code).collect();
        assert_eq!(
            codes,
            [
                "E_GENERIC_ARITY_MISMATCH",
                "E_CALL_ARG_TYPE_MISMATCH",
                "E_CALL_ARGS_MISMATCH_SUMMARY"
            ]
        );

        let arity = &diags[0];
        assert_eq!(arity.position, Some(pos(5, 8)));
        assert_eq!(arity.data("argIndex"), Some(&json!(0)));
        assert_eq!(arity.data("path"), Some(&json!(["Owned"])));
        assert_eq!(arity.data("expectedArity"), Some(&json!(1)));
        assert_eq!(arity.data("gotArity"), Some(&json!(2)));
        assert_eq!(
            arity.data("expectedPos"),
            Some(&json!({"line": 1, "column": 10, "offset": 0}))
        );

        assert_eq!(
            diags[1].message,
            "call argument type mismatch: arg 1 expected int, got string"
        );

        let summary = &diags[2];
        assert_eq!(summary.data("count"), Some(&json!(2)));
        assert_eq!(summary.data("indices"), Some(&json!([0, 1])));
        let paths = summary.data("paths").unwrap().as_array().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0]["paramName"], "owner");
    }

    #[test]
    fn compatible_call_is_clean() {
        let diags = Checker::default().check_call(
            "merge",
            &[site("Event<T>"), site("map<string,any>"), site("set<U>")],
            &[
                site("Event<Struct{a:int}>"),
                site("map<string,int>"),
                site("set<float64>"),
            ],
            None,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn return_checks() {
        let checker = Checker::default();
        let diags = checker.check_return(&[site("int"), site("error")], &[site("int")], None);
        assert_eq!(diags[0].message, "return arity mismatch");

        let diags = checker.check_return(
            &[site("Optional<T>"), site("slice<Owned<T>>"), site("string")],
            &[
                site("Optional<int>"),
                site("slice<Owned<int,int>>"),
                site("int"),
            ],
            Some(pos(9, 5)),
        );
        let codes: Vec<&str> = diags.iter().map(Diagnostic::code).collect();
        assert_eq!(codes, ["E_GENERIC_ARITY_MISMATCH", "E_RETURN_TYPE_MISMATCH"]);
        assert_eq!(diags[0].data("path"), Some(&json!(["slice", "Owned"])));
        assert_eq!(diags[1].data("resultIndex"), Some(&json!(2)));
        assert_eq!(diags[1].position, Some(pos(9, 5)));
    }

    #[test]
    fn return_left_as_type_variable_is_uninferred() {
        let diags =
            Checker::default().check_return(&[site("Optional<T>")], &[site("Optional<U>")], None);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code(), "E_TYPE_UNINFERRED");
        assert_eq!(diags[0].data("variables"), Some(&json!(["T"])));
    }

    #[test]
    fn uninferred_return_is_shape_independent() {
        let checker = Checker::default();
        for (declared, returned) in [
            ("Optional<T>", "Optional<U>"),
            ("slice<T>", "slice<U>"),
            ("Event<T>", "Event<U>"),
            ("T", "U"),
        ] {
            let diags = checker.check_return(&[site(declared)], &[site(returned)], None);
            let codes: Vec<&str> = diags.iter().map(Diagnostic::code).collect();
            assert_eq!(codes, ["E_TYPE_UNINFERRED"], "{declared} <- {returned}");
            assert_eq!(diags[0].data("variables"), Some(&json!(["T"])));
        }
        assert!(checker
            .check_return(&[site("Event<T>")], &[site("Event<int>")], None)
            .is_empty());
    }

    #[test]
    fn call_arguments_use_textual_rules_only() {
        let checker = Checker::default();
        let diags = checker.check_call("f", &[site("[]T")], &[site("[]int")], None);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code(), "E_CALL_ARG_TYPE_MISMATCH");
        assert!(checker.check_assignment(&site("[]T"), &site("[]int")).is_none());
    }

    #[test]
    fn assignment() {
        let checker = Checker::default();
        assert!(checker
            .check_assignment(&site("Optional<T>"), &site("Optional<int>"))
            .is_none());
        assert!(checker.check_assignment(&site("*int"), &site("*int")).is_none());

        let diag = checker
            .check_assignment(&site("*int").named("p"), &site("int"))
            .unwrap();
        assert_eq!(diag.code(), "E_ASSIGN_TYPE_MISMATCH");
        assert_eq!(diag.message, "assignment type mismatch: *int != int");
        assert_eq!(diag.data("name"), Some(&json!("p")));

        let diag = checker
            .check_assignment(&site("Struct{a:Owned<T>}"), &site("Struct{a:Owned<int,int>}"))
            .unwrap();
        assert_eq!(diag.code(), "E_GENERIC_ARITY_MISMATCH");
        assert_eq!(diag.data("fieldPath"), Some(&json!(["a"])));
    }

    #[test]
    fn local_inference() {
        let checker = Checker::default();
        let local = TypeSite::new("").named("x").at(pos(2, 5));
        assert_eq!(checker.infer_local(&local, Some(&site("slice<int>"))).unwrap(), "slice<int>");
        assert_eq!(
            checker.infer_local(&site("int64"), None).unwrap(),
            "int64"
        );

        let err = checker.infer_local(&local, Some(&site("any"))).unwrap_err();
        assert_eq!(err.code(), "E_TYPE_UNINFERRED");
        assert_eq!(err.message, "cannot infer variable type from initializer");
        assert_eq!(err.position, Some(pos(2, 5)));

        let err = checker.infer_local(&local, None).unwrap_err();
        assert_eq!(err.message, "variable declaration missing type and initializer");
        assert_eq!(err.data("name"), Some(&json!("x")));

        let err = checker
            .infer_local(&site("int"), Some(&site("string")))
            .unwrap_err();
        assert_eq!(err.message, "var init type mismatch: int != string");
    }

    #[test]
    fn event_flow() {
        let checker = Checker::default();
        let wide = site("Struct{id:int,name:string}").named("enrich");
        let narrow = site("Struct{id:int}").named("store");
        assert!(checker.check_event_flow(&wide, &narrow).is_none());
        assert!(checker
            .check_event_flow(&site("int"), &site("Optional<int>"))
            .is_none());
        assert!(checker.check_event_flow(&site("T"), &site("string")).is_none());

        let diag = checker.check_event_flow(&narrow, &site("Struct{id:string}")).unwrap();
        assert_eq!(diag.code(), "E_EVENT_TYPE_FLOW");
        assert_eq!(diag.data("from"), Some(&json!("store")));

        assert!(checker.check_event_flow(&site("Foo<"), &site("Foo<")).is_none());
        assert!(checker.check_event_flow(&site("Foo<"), &site("int")).is_some());
    }

    #[test]
    fn merge_fields() {
        let checker = Checker::default();
        let payload =
            site("Event<Struct{id:int,meta:Struct{tags:slice<string>},ts:Optional<int64>}>");
        assert_eq!(
            checker.check_merge_sort_field(&payload, "ts").unwrap().to_string(),
            "Optional<int64>"
        );
        assert_eq!(
            checker.resolve_merge_field(&payload, "meta.tags").unwrap().to_string(),
            "slice<string>"
        );

        let err = checker.check_merge_sort_field(&payload, "meta.tags").unwrap_err();
        assert_eq!(err.code(), "E_MERGE_SORT_FIELD_UNORDERABLE");
        let err = checker.resolve_merge_field(&payload, "missing").unwrap_err();
        assert_eq!(err.code(), "E_MERGE_SORT_FIELD_UNKNOWN");
        let err = checker.resolve_merge_field(&site("Event<int>"), "id").unwrap_err();
        assert_eq!(err.code(), "E_MERGE_FIELD_ON_PRIMITIVE");
        let err = checker.resolve_merge_field(&site("Event<Struct{"), "id").unwrap_err();
        assert_eq!(err.code(), "E_TYPE_SYNTAX");
    }

    #[test]
    fn instantiate_generic_call() {
        let checker = Checker::default();
        let results = checker
            .instantiate_call(
                &["Event<T>", "map<K,V>"],
                &["Event<Struct{a:int}>", "map<string,slice<int>>"],
                &["Owned<T>", "[]V", "K"],
            )
            .unwrap();
        assert_eq!(results, ["Owned<Struct{a:int}>", "[]slice<int>", "string"]);

        assert_eq!(
            checker.instantiate_call(&["T"], &[], &["T"]),
            Err(UnifyError::ArgumentCount { want: 1, got: 0 })
        );
        assert!(matches!(
            checker.instantiate_call(&["map<T,T>"], &["map<int,string>"], &["T"]),
            Err(UnifyError::Conflict { .. })
        ));
        assert!(matches!(
            checker.instantiate_call(&["Owned<T"], &["Owned<int>"], &["T"]),
            Err(UnifyError::Type(_))
        ));
    }
}
