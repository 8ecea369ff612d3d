//! Structural validation of runtime values against type descriptors.
//!
//! The engine walks the descriptor and the value together. Failures are
//! collected rather than returned early so one pass reports every problem,
//! each tagged with the access path where it was found.
//!
//! Recursive registry types are followed without cycle detection: every
//! step descends into the value, and values are finite.
use crate::error::{ErrorKind, NotFound, TypeValidateError};
use crate::registry::TypeRegistry;
use crate::types::{Type, TypeObject, TypeReference, TypeTuple};
use crate::value::{normalize_bigint, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Generic parameters in scope, paired positionally with their bound types.
#[derive(Debug, Clone, Copy, Default)]
struct Bindings<'a> {
    names: &'a [String],
    arguments: &'a [Type],
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Binding<'a> {
    Bound(&'a Type),
    /// Declared, but the reference supplied fewer arguments.
    Missing,
    Unknown,
}

/// Per-call state: the registry, where we are inside the value, and what
/// has gone wrong so far.
#[derive(Debug)]
pub struct ValidationContext<'r> {
    registry: &'r TypeRegistry,
    access_stack: Vec<String>,
    errors: Vec<TypeValidateError>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'a> Bindings<'a> {
    fn lookup(&self, name: &str) -> Binding<'a> {
        match self.names.iter().position(|n| n == name) {
            None => Binding::Unknown,
            Some(index) => match self.arguments.get(index) {
                Some(bound) => Binding::Bound(bound),
                None => Binding::Missing,
            },
        }
    }
}

impl<'r> ValidationContext<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            access_stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn into_errors(self) -> Vec<TypeValidateError> {
        self.errors
    }

    /// Check `value` against `ty` with no generic parameters in scope,
    /// appending any failures to this context.
    pub fn validate_object(&mut self, ty: &Type, value: &Value) {
        self.check(ty, value, Bindings::default());
    }

    fn check(&mut self, ty: &Type, value: &Value, scope: Bindings<'_>) {
        match ty {
            Type::Any | Type::Unknown => {}
            Type::Undefined | Type::Void => {
                if !matches!(value, Value::Undefined) {
                    self.kind_mismatch(ty.tag(), value);
                }
            }
            Type::Null => {
                if !matches!(value, Value::Null) {
                    self.kind_mismatch("null", value);
                }
            }
            Type::Boolean { value: literal } => match value {
                Value::Bool(actual) => {
                    if let Some(expected) = literal.filter(|expected| expected != actual) {
                        self.literal_mismatch("boolean", expected.to_string(), value);
                    }
                }
                _ => self.kind_mismatch("boolean", value),
            },
            Type::Number { value: literal } => match value {
                Value::Number(actual) => {
                    if let Some(expected) = literal.filter(|expected| expected.0 != *actual) {
                        self.literal_mismatch("number", expected.0.to_string(), value);
                    }
                }
                _ => self.kind_mismatch("number", value),
            },
            Type::String { value: literal } => match value {
                Value::String(actual) => {
                    if let Some(expected) = literal.as_ref().filter(|expected| *expected != actual) {
                        self.literal_mismatch("string", format!("{expected:?}"), value);
                    }
                }
                _ => self.kind_mismatch("string", value),
            },
            Type::BigInt { value: literal } => match value {
                Value::BigInt(actual) => {
                    if let Some(expected) = literal.as_deref().map(normalize_bigint) {
                        if expected != normalize_bigint(actual) {
                            self.literal_mismatch("bigint", format!("{expected}n"), value);
                        }
                    }
                }
                _ => self.kind_mismatch("bigint", value),
            },
            Type::Method => {
                if !matches!(value, Value::Function(_)) {
                    self.kind_mismatch("method", value);
                }
            }
            Type::Object(object) => self.check_object(object, value, scope),
            Type::TypeReference(reference) => self.check_reference(reference, value, scope),
            Type::TypeParameterReference { target } => match scope.lookup(target) {
                // resolving a parameter keeps the scope it was found in
                Binding::Bound(bound) => self.check(bound, value, scope),
                Binding::Missing => {}
                Binding::Unknown => self.unknown_parameter(target),
            },
            Type::Union { types } => self.check_union(types, value, scope),
            Type::Intersection { types } => {
                for member in types {
                    self.check(member, value, scope);
                }
            }
            Type::Array { element_type } => match value {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        self.at(format!("[{index}]"), |ctx| ctx.check(element_type, item, scope));
                    }
                }
                _ => self.kind_mismatch("array", value),
            },
            Type::Tuple(tuple) => self.check_tuple(tuple, value, scope),
            Type::Invalid { reason } => self.report(ErrorKind::InvalidDescriptor, reason.clone()),
        }
    }

    fn check_object(&mut self, object: &TypeObject, value: &Value, scope: Bindings<'_>) {
        let Value::Object(members) = value else {
            return self.kind_mismatch("object", value);
        };
        // generic scope is object-local: names come from this object only
        let scope = Bindings {
            names: &object.type_argument_names,
            arguments: scope.arguments,
        };
        for (name, member_type) in &object.members {
            match members.get(name) {
                Some(member) => self.at(name.clone(), |ctx| ctx.check(member_type, member, scope)),
                None => self.report(
                    ErrorKind::MissingMember,
                    format!("missing object member \"{name}\""),
                ),
            }
        }
        for (name, member_type) in &object.optional_members {
            if object.members.contains_key(name) {
                continue;
            }
            if let Some(member) = members.get(name) {
                self.at(name.clone(), |ctx| ctx.check(member_type, member, scope));
            }
        }
        // TODO: merge base members with own members instead of checking each base on its own
        for base in &object.extends {
            self.check(base, value, scope);
        }
    }

    fn check_reference(&mut self, reference: &TypeReference, value: &Value, scope: Bindings<'_>) {
        let registry = self.registry;
        let resolved = match registry.lookup_reference(reference) {
            Ok(resolved) => resolved,
            Err(NotFound { target }) => {
                return self.report(
                    ErrorKind::UnresolvedReference,
                    format!("invalid type reference to {target}"),
                );
            }
        };
        // unbound parameters are reported here and then left unconstrained
        let mut unbound = Vec::new();
        let arguments = substitute_all(&reference.type_arguments, scope, &mut unbound);
        for parameter in &unbound {
            self.unknown_parameter(parameter);
        }
        tracing::trace!(
            reference = %reference.target,
            arguments = arguments.len(),
            depth = self.access_stack.len(),
            "following type reference"
        );
        let child = Bindings {
            names: &[],
            arguments: &arguments,
        };
        self.check(resolved, value, child);
    }

    fn check_union(&mut self, types: &[Type], value: &Value, scope: Bindings<'_>) {
        for (index, variant) in types.iter().enumerate() {
            // each attempt gets its own error list; the outer one is untouched
            let outer = std::mem::take(&mut self.errors);
            self.check(variant, value, scope);
            let attempt = std::mem::replace(&mut self.errors, outer);
            if attempt.is_empty() {
                tracing::trace!(variant = index, "union variant matched");
                return;
            }
        }
        let attempted: Vec<String> = types.iter().map(|t| t.describe().to_string()).collect();
        let message = format!("expected a {} but nothing matches", join_alternatives(&attempted));
        self.report(ErrorKind::UnionExhausted { attempted }, message);
    }

    fn check_tuple(&mut self, tuple: &TypeTuple, value: &Value, scope: Bindings<'_>) {
        let Value::Array(items) = value else {
            return self.kind_mismatch("tuple", value);
        };
        let (min, max) = (tuple.min_len(), tuple.max_len());
        if items.len() < min || max.is_some_and(|max| items.len() > max) {
            let expected = match max {
                Some(max) if max == min => format!("exactly {min}"),
                Some(max) => format!("{min} to {max}"),
                None => format!("at least {min}"),
            };
            let message = format!("expected {expected} tuple elements but received {}", items.len());
            return self.report(ErrorKind::TupleArity { min, max }, message);
        }
        for (index, item) in items.iter().enumerate() {
            let element = tuple
                .elements
                .get(index)
                .or_else(|| tuple.optional_elements.get(index - tuple.elements.len()))
                .or(tuple.dotdotdot_element.as_deref());
            if let Some(element) = element {
                self.at(format!("[{index}]"), |ctx| ctx.check(element, item, scope));
            }
        }
    }

    // ————————————————————————————————————————————————————————————————————————
    // REPORTING
    // ————————————————————————————————————————————————————————————————————————

    fn at(&mut self, segment: String, visit: impl FnOnce(&mut Self)) {
        self.access_stack.push(segment);
        visit(self);
        self.access_stack.pop();
    }

    fn report(&mut self, kind: ErrorKind, message: String) {
        self.errors.push(TypeValidateError::new(&self.access_stack, kind, message));
    }

    fn kind_mismatch(&mut self, expected: &str, value: &Value) {
        let message = format!("expected {expected} but received {}", value.kind());
        self.report(ErrorKind::KindMismatch, message);
    }

    fn literal_mismatch(&mut self, kind: &str, expected: String, value: &Value) {
        let message = format!("expected {kind} value {expected} but received {}", value.display());
        self.report(ErrorKind::LiteralMismatch, message);
    }

    fn unknown_parameter(&mut self, name: &str) {
        self.report(
            ErrorKind::UnknownTypeParameter,
            format!("unknown template parameter {name}"),
        );
    }
}

/// Replace parameter references in reference arguments with what they are
/// bound to in the caller's scope. Object descriptors open their own scope
/// and are left alone. Names not in scope become `unknown` and are pushed
/// onto `unbound`.
fn substitute(ty: &Type, scope: Bindings<'_>, unbound: &mut Vec<String>) -> Type {
    match ty {
        Type::TypeParameterReference { target } => match scope.lookup(target) {
            Binding::Bound(bound) => bound.clone(),
            Binding::Missing => Type::Unknown,
            Binding::Unknown => {
                unbound.push(target.clone());
                Type::Unknown
            }
        },
        Type::TypeReference(reference) => Type::TypeReference(TypeReference {
            target: reference.target.clone(),
            type_arguments: substitute_all(&reference.type_arguments, scope, unbound),
        }),
        Type::Union { types } => Type::Union {
            types: substitute_all(types, scope, unbound),
        },
        Type::Intersection { types } => Type::Intersection {
            types: substitute_all(types, scope, unbound),
        },
        Type::Array { element_type } => Type::Array {
            element_type: Box::new(substitute(element_type, scope, unbound)),
        },
        Type::Tuple(tuple) => Type::Tuple(TypeTuple {
            elements: substitute_all(&tuple.elements, scope, unbound),
            optional_elements: substitute_all(&tuple.optional_elements, scope, unbound),
            dotdotdot_element: tuple
                .dotdotdot_element
                .as_deref()
                .map(|rest| Box::new(substitute(rest, scope, unbound))),
        }),
        other => other.clone(),
    }
}

fn substitute_all(types: &[Type], scope: Bindings<'_>, unbound: &mut Vec<String>) -> Vec<Type> {
    types.iter().map(|ty| substitute(ty, scope, unbound)).collect()
}

/// `a, b, or c`
fn join_alternatives(items: &[String]) -> String {
    match items.split_last() {
        None => "never".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{}, or {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ty(descriptor: serde_json::Value) -> Type {
        Type::from_json_value(descriptor).unwrap()
    }

    fn run(registry: &TypeRegistry, descriptor: serde_json::Value, value: impl Into<Value>) -> Vec<(String, String)> {
        let mut ctx = ValidationContext::new(registry);
        ctx.validate_object(&ty(descriptor), &value.into());
        ctx.into_errors()
            .into_iter()
            .map(|e| (e.path(), e.message))
            .collect()
    }

    fn errors(descriptor: serde_json::Value, value: serde_json::Value) -> Vec<(String, String)> {
        run(&TypeRegistry::new(), descriptor, value)
    }

    fn entry(path: &str, message: &str) -> (String, String) {
        (path.to_string(), message.to_string())
    }

    fn pair_registry() -> TypeRegistry {
        TypeRegistry::from_definitions([(
            "T1_Pair",
            ty(json!({
                "type": "object",
                "typeArgumentNames": ["K", "V"],
                "members": {
                    "k": { "type": "type-parameter-reference", "target": "K" },
                    "v": { "type": "type-parameter-reference", "target": "V" }
                }
            })),
        )])
    }

    #[test]
    fn primitives_report_kinds() {
        assert!(errors(json!({ "type": "any" }), json!({})).is_empty());
        assert!(errors(json!({ "type": "null" }), json!(null)).is_empty());
        assert_eq!(
            errors(json!({ "type": "null" }), json!(123)),
            vec![entry("", "expected null but received number")]
        );
        assert_eq!(
            run(&TypeRegistry::new(), json!({ "type": "undefined" }), Value::Null),
            vec![entry("", "expected undefined but received null")]
        );
        assert!(run(&TypeRegistry::new(), json!({ "type": "void" }), Value::Undefined).is_empty());
        assert_eq!(
            errors(json!({ "type": "string" }), json!(null)),
            vec![entry("", "expected string but received null")]
        );
    }

    #[test]
    fn literals_require_exact_values() {
        assert!(errors(json!({ "type": "number", "value": 123 }), json!(123)).is_empty());
        assert_eq!(
            errors(json!({ "type": "number", "value": 123 }), json!(234)),
            vec![entry("", "expected number value 123 but received 234")]
        );
        assert_eq!(
            errors(json!({ "type": "string", "value": "123" }), json!("234")),
            vec![entry("", "expected string value \"123\" but received \"234\"")]
        );
        assert_eq!(
            errors(json!({ "type": "boolean", "value": true }), json!(false)),
            vec![entry("", "expected boolean value true but received false")]
        );
    }

    #[test]
    fn bigint_literals_compare_normalized() {
        let registry = TypeRegistry::new();
        let literal = json!({ "type": "bigint", "value": "123n" });
        assert!(run(&registry, literal.clone(), Value::bigint("123")).is_empty());
        assert_eq!(
            run(&registry, literal.clone(), Value::bigint("124")),
            vec![entry("", "expected bigint value 123n but received 124n")]
        );
        assert_eq!(
            run(&registry, literal, Value::Number(123.0)),
            vec![entry("", "expected bigint but received number")]
        );
    }

    #[test]
    fn methods_need_callables() {
        let registry = TypeRegistry::new();
        assert!(run(&registry, json!({ "type": "method" }), Value::function("f")).is_empty());
        assert_eq!(
            run(&registry, json!({ "type": "method" }), Value::from("f")),
            vec![entry("", "expected method but received string")]
        );
    }

    #[test]
    fn object_members_and_paths() {
        let descriptor = json!({
            "type": "object",
            "members": { "key": { "type": "string" }, "value": { "type": "number" } }
        });
        assert_eq!(
            errors(descriptor.clone(), json!({ "key": 123 })),
            vec![
                entry("key", "expected string but received number"),
                entry("", "missing object member \"value\""),
            ]
        );
        assert_eq!(
            errors(descriptor.clone(), json!([])),
            vec![entry("", "expected object but received array")]
        );
        assert_eq!(
            errors(descriptor, json!(null)),
            vec![entry("", "expected object but received null")]
        );
    }

    #[test]
    fn present_optional_members_are_checked() {
        let descriptor = json!({
            "type": "object",
            "members": { "key": { "type": "string" } },
            "optionalMembers": { "value": { "type": "number" } }
        });
        assert!(errors(descriptor.clone(), json!({ "key": "a" })).is_empty());
        assert_eq!(
            errors(descriptor.clone(), json!({ "key": "a", "value": "x" })),
            vec![entry("value", "expected number but received string")]
        );
        let explicit_undefined: Value = [("key", Value::from("a")), ("value", Value::Undefined)]
            .into_iter()
            .collect();
        assert_eq!(
            run(&TypeRegistry::new(), descriptor, explicit_undefined),
            vec![entry("value", "expected number but received undefined")]
        );
    }

    #[test]
    fn nested_arrays_extend_the_path() {
        let descriptor = json!({
            "type": "object",
            "members": {
                "rows": { "type": "array", "elementType": {
                    "type": "object", "members": { "id": { "type": "number" } }
                } }
            }
        });
        assert_eq!(
            errors(descriptor, json!({ "rows": [{ "id": 1 }, { "id": "2" }, {}] })),
            vec![
                entry("rows[1].id", "expected number but received string"),
                entry("rows[2]", "missing object member \"id\""),
            ]
        );
    }

    #[test]
    fn generic_arguments_bind_positionally() {
        let registry = pair_registry();
        let reference = json!({
            "type": "type-reference",
            "target": "T1_Pair",
            "typeArguments": [{ "type": "string" }, { "type": "number" }]
        });
        assert!(run(&registry, reference.clone(), json!({ "k": "a", "v": 1 })).is_empty());
        assert_eq!(
            run(&registry, reference, json!({ "k": 1, "v": "a" })),
            vec![
                entry("k", "expected string but received number"),
                entry("v", "expected number but received string"),
            ]
        );
    }

    #[test]
    fn missing_arguments_leave_parameters_unconstrained() {
        let registry = pair_registry();
        let reference = json!({
            "type": "type-reference",
            "target": "T1_Pair",
            "typeArguments": [{ "type": "string" }, { "type": "number" }, { "type": "null" }]
        });
        assert!(run(&registry, reference, json!({ "k": "a", "v": 2 })).is_empty());
        let short = json!({ "type": "type-reference", "target": "T1_Pair", "typeArguments": [{ "type": "string" }] });
        assert!(run(&registry, short, json!({ "k": "a", "v": [] })).is_empty());
    }

    #[test]
    fn nested_instantiations_bind_in_the_callers_scope() {
        // type Outer<K> = { pair: Pair<string, Pair<number, K>> }
        let mut registry = pair_registry();
        registry.definitions.insert(
            "T2_Outer".into(),
            ty(json!({
                "type": "object",
                "typeArgumentNames": ["K"],
                "members": { "pair": {
                    "type": "type-reference",
                    "target": "T1_Pair",
                    "typeArguments": [
                        { "type": "string" },
                        { "type": "type-reference", "target": "T1_Pair", "typeArguments": [
                            { "type": "number" },
                            { "type": "type-parameter-reference", "target": "K" }
                        ] }
                    ]
                } }
            })),
        );
        let outer = json!({
            "type": "type-reference",
            "target": "T2_Outer",
            "typeArguments": [{ "type": "boolean" }]
        });
        let good = json!({ "pair": { "k": "a", "v": { "k": 1, "v": true } } });
        assert!(run(&registry, outer.clone(), good).is_empty());

        let bad = json!({ "pair": { "k": "a", "v": { "k": 1, "v": "not a bool" } } });
        assert_eq!(
            run(&registry, outer, bad),
            vec![entry("pair.v.v", "expected boolean but received string")]
        );
    }

    #[test]
    fn parameters_outside_their_object_are_unknown() {
        assert_eq!(
            errors(json!({ "type": "type-parameter-reference", "target": "T" }), json!(1)),
            vec![entry("", "unknown template parameter T")]
        );
        // nested object literals start with an empty generic scope
        let registry = TypeRegistry::from_definitions([(
            "T1_Box",
            ty(json!({
                "type": "object",
                "typeArgumentNames": ["T"],
                "members": { "inner": { "type": "object", "members": {
                    "t": { "type": "type-parameter-reference", "target": "T" }
                } } }
            })),
        )]);
        let reference = json!({ "type": "type-reference", "target": "T1_Box", "typeArguments": [{ "type": "number" }] });
        assert_eq!(
            run(&registry, reference, json!({ "inner": { "t": 1 } })),
            vec![entry("inner.t", "unknown template parameter T")]
        );
    }

    #[test]
    fn unbound_reference_arguments_do_not_hide_other_failures() {
        // type Outer<K> = { p: Pair<Q, number> }
        let mut registry = pair_registry();
        registry.definitions.insert(
            "T2_Outer".into(),
            ty(json!({
                "type": "object",
                "typeArgumentNames": ["K"],
                "members": { "p": {
                    "type": "type-reference",
                    "target": "T1_Pair",
                    "typeArguments": [
                        { "type": "type-parameter-reference", "target": "Q" },
                        { "type": "number" }
                    ]
                } }
            })),
        );
        let outer = json!({
            "type": "type-reference",
            "target": "T2_Outer",
            "typeArguments": [{ "type": "string" }]
        });
        assert_eq!(
            run(&registry, outer.clone(), json!({ "p": { "v": "not a number" } })),
            vec![
                entry("p", "unknown template parameter Q"),
                entry("p", "missing object member \"k\""),
                entry("p.v", "expected number but received string"),
            ]
        );
        // the unbound slot itself accepts anything
        assert_eq!(
            run(&registry, outer, json!({ "p": { "k": [null], "v": 1 } })),
            vec![entry("p", "unknown template parameter Q")]
        );
    }

    #[test]
    fn arguments_substitute_through_arrays_unions_tuples_and_intersections() {
        // type Holder<K> = {
        //     xs: Box<K[]>, maybe: Box<K | null>,
        //     row: Box<[K, K?, ...K[]]>, both: Box<K & number>
        // }
        let param = json!({ "type": "type-parameter-reference", "target": "K" });
        let boxed = |argument: serde_json::Value| {
            json!({ "type": "type-reference", "target": "T1_Box", "typeArguments": [argument] })
        };
        let registry = TypeRegistry::from_definitions([
            (
                "T1_Box",
                ty(json!({
                    "type": "object",
                    "typeArgumentNames": ["T"],
                    "members": { "value": { "type": "type-parameter-reference", "target": "T" } }
                })),
            ),
            (
                "T3_Holder",
                ty(json!({
                    "type": "object",
                    "typeArgumentNames": ["K"],
                    "members": {
                        "xs": boxed(json!({ "type": "array", "elementType": param })),
                        "maybe": boxed(json!({ "type": "union", "types": [param, { "type": "null" }] })),
                        "row": boxed(json!({
                            "type": "tuple",
                            "elements": [param],
                            "optionalElements": [param],
                            "dotdotdotElement": param
                        })),
                        "both": boxed(json!({ "type": "intersection", "types": [param, { "type": "number" }] }))
                    }
                })),
            ),
        ]);
        let holder = json!({
            "type": "type-reference",
            "target": "T3_Holder",
            "typeArguments": [{ "type": "number" }]
        });

        let good = json!({
            "xs": { "value": [1, 2] },
            "maybe": { "value": null },
            "row": { "value": [1, 2, 3] },
            "both": { "value": 5 }
        });
        assert!(run(&registry, holder.clone(), good).is_empty());

        let bad = json!({
            "xs": { "value": [1, "2"] },
            "maybe": { "value": "x" },
            "row": { "value": ["1", 2, "3"] },
            "both": { "value": "5" }
        });
        assert_eq!(
            run(&registry, holder, bad),
            vec![
                entry("xs.value[1]", "expected number but received string"),
                entry("maybe.value", "expected a number, or null but nothing matches"),
                entry("row.value[0]", "expected number but received string"),
                entry("row.value[2]", "expected number but received string"),
                entry("both.value", "expected number but received string"),
                entry("both.value", "expected number but received string"),
            ]
        );
    }

    #[test]
    fn unresolved_references_are_errors() {
        assert_eq!(
            errors(json!({ "type": "type-reference", "target": "I9_Gone" }), json!({})),
            vec![entry("", "invalid type reference to I9_Gone")]
        );
    }

    #[test]
    fn recursive_types_follow_the_value() {
        let registry = TypeRegistry::from_definitions([(
            "T1_List",
            ty(json!({
                "type": "object",
                "members": { "value": { "type": "number" } },
                "optionalMembers": { "next": { "type": "type-reference", "target": "T1_List" } }
            })),
        )]);
        let value = json!({ "value": 1, "next": { "value": 2, "next": { "value": "3" } } });
        assert_eq!(
            run(&registry, json!({ "type": "type-reference", "target": "T1_List" }), value),
            vec![entry("next.next.value", "expected number but received string")]
        );
    }

    #[test]
    fn unions_report_once_and_keep_trial_errors_private() {
        let descriptor = json!({ "type": "union", "types": [{ "type": "number" }, { "type": "string" }] });
        assert!(errors(descriptor.clone(), json!("x")).is_empty());
        let registry = TypeRegistry::new();
        let mut ctx = ValidationContext::new(&registry);
        ctx.validate_object(&ty(descriptor), &Value::Bool(true));
        let errors = ctx.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected a number, or string but nothing matches");
        assert_eq!(
            errors[0].kind,
            ErrorKind::UnionExhausted { attempted: vec!["number".into(), "string".into()] }
        );
    }

    #[test]
    fn union_descriptions_use_reference_targets() {
        let registry = pair_registry();
        let descriptor = json!({ "type": "union", "types": [
            { "type": "type-reference", "target": "T1_Pair" },
            { "type": "null" },
            { "type": "array", "elementType": { "type": "any" } }
        ] });
        assert_eq!(
            run(&registry, descriptor, json!(5)),
            vec![entry("", "expected a T1_Pair, null, or array but nothing matches")]
        );
    }

    #[test]
    fn intersections_accumulate_every_member() {
        let descriptor = json!({ "type": "intersection", "types": [
            { "type": "object", "members": { "a": { "type": "number" } } },
            { "type": "object", "members": { "b": { "type": "string" } } }
        ] });
        assert!(errors(descriptor.clone(), json!({ "a": 1, "b": "x" })).is_empty());
        assert_eq!(
            errors(descriptor, json!({ "a": "1", "b": 2 })),
            vec![
                entry("a", "expected number but received string"),
                entry("b", "expected string but received number"),
            ]
        );
    }

    #[test]
    fn extends_are_checked_in_the_objects_scope() {
        // interface A<K, V> extends B<K> { key: K, value: V }
        let registry = TypeRegistry::from_definitions([
            (
                "I1_B",
                ty(json!({
                    "type": "object",
                    "typeArgumentNames": ["K"],
                    "members": { "mainKey": { "type": "type-parameter-reference", "target": "K" } }
                })),
            ),
            (
                "I2_A",
                ty(json!({
                    "type": "object",
                    "typeArgumentNames": ["K", "V"],
                    "members": {
                        "key": { "type": "type-parameter-reference", "target": "K" },
                        "value": { "type": "type-parameter-reference", "target": "V" }
                    },
                    "extends": [{ "type": "type-reference", "target": "I1_B", "typeArguments": [
                        { "type": "type-parameter-reference", "target": "K" }
                    ] }]
                })),
            ),
        ]);
        let reference = json!({ "type": "type-reference", "target": "I2_A", "typeArguments": [
            { "type": "string" }, { "type": "number" }
        ] });
        assert!(run(&registry, reference.clone(), json!({ "key": "a", "value": 1, "mainKey": "b" })).is_empty());
        assert_eq!(
            run(&registry, reference, json!({ "key": "a", "value": 1, "mainKey": 2 })),
            vec![entry("mainKey", "expected string but received number")]
        );
    }

    #[test]
    fn tuple_arity_and_positions() {
        let descriptor = json!({
            "type": "tuple",
            "elements": [{ "type": "number" }],
            "optionalElements": [{ "type": "number" }]
        });
        assert!(errors(descriptor.clone(), json!([1])).is_empty());
        assert!(errors(descriptor.clone(), json!([1, 2])).is_empty());
        assert_eq!(
            errors(descriptor.clone(), json!([])),
            vec![entry("", "expected 1 to 2 tuple elements but received 0")]
        );
        assert_eq!(
            errors(descriptor.clone(), json!([1, 2, 3])),
            vec![entry("", "expected 1 to 2 tuple elements but received 3")]
        );
        assert_eq!(
            errors(descriptor, json!([1, "2"])),
            vec![entry("[1]", "expected number but received string")]
        );

        let exact = json!({ "type": "tuple", "elements": [{ "type": "string" }, { "type": "number" }] });
        assert_eq!(
            errors(exact, json!(["a"])),
            vec![entry("", "expected exactly 2 tuple elements but received 1")]
        );
    }

    #[test]
    fn tuple_rest_elements() {
        let descriptor = json!({
            "type": "tuple",
            "elements": [{ "type": "number" }],
            "optionalElements": [{ "type": "number", "value": 123 }],
            "dotdotdotElement": { "type": "string" }
        });
        assert!(errors(descriptor.clone(), json!([1, 123, "a", "b"])).is_empty());
        assert_eq!(
            errors(descriptor.clone(), json!([1, 123, "a", 4])),
            vec![entry("[3]", "expected string but received number")]
        );
        assert_eq!(
            errors(descriptor.clone(), json!([])),
            vec![entry("", "expected at least 1 tuple elements but received 0")]
        );
        assert_eq!(
            errors(descriptor, json!({})),
            vec![entry("", "expected tuple but received object")]
        );
    }

    #[test]
    fn invalid_descriptors_report_their_reason() {
        let registry = TypeRegistry::new();
        let mut ctx = ValidationContext::new(&registry);
        ctx.validate_object(
            &Type::Invalid { reason: "enums are not yet supported".into() },
            &Value::from(1),
        );
        let errors = ctx.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvalidDescriptor);
        assert_eq!(errors[0].message, "enums are not yet supported");
        assert!(errors[0].access_stack.is_empty());
    }

    #[test]
    fn alternatives_join() {
        assert_eq!(join_alternatives(&[]), "never");
        assert_eq!(join_alternatives(&["a".into()]), "a");
        assert_eq!(join_alternatives(&["a".into(), "b".into(), "c".into()]), "a, b, or c");
    }
}
