//! # Transform Engine
//!
//! A single recursive walk of a value against a descriptor, parameterized
//! by [`Direction`]:
//!
//! - **Decode** reads the external key of every field and writes the
//!   internal one; temporal strings become [`Timestamp`]s.
//! - **Encode** reads the internal key and writes the external one;
//!   timestamps become wire strings.
//!
//! The structure of the walk is otherwise identical in both directions.
//!
//! ## Failure Semantics
//!
//! The first mismatch aborts the walk and is returned with its context:
//! the field key being transformed, the schema enclosing it, and a JSON
//! Pointer to the offending value. No partial results are produced and no
//! input is repaired.
//!
//! Unions are the only back-tracking point. Members are tried in declared
//! order and the first success is kept; member failures are discarded and,
//! if every member fails, the error lists what each member expected. A
//! dangling ref inside a member is a configuration error and is never
//! swallowed by the back-tracking.
//!
//! ## Missing Keys
//!
//! A key missing from an input object is *absent* (`None` below), not
//! `null`. It is transformed like any other value; only the `any` and `null`
//! primitives accept it, and both leave it absent in the output.

use std::collections::BTreeMap;

use serde_json::Value;
use shapecast_core::{Timestamp, TypedValue};

use crate::descriptor::{AdditionalFields, Descriptor, FieldSpec, ObjectDescriptor, PrimitiveKind};
use crate::error::{Expected, MismatchKind, TransformError, ValidationError};
use crate::registry::Registry;

/// Which way a transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// External JSON → typed value.
    Decode,
    /// Typed value → external JSON.
    Encode,
}

impl Direction {
    /// The key read from the input object for `field`.
    fn source_key(self, field: &FieldSpec) -> &str {
        match self {
            Self::Decode => &field.external,
            Self::Encode => &field.internal,
        }
    }

    /// The key written to the output object for `field`.
    fn target_key(self, field: &FieldSpec) -> &str {
        match self {
            Self::Decode => &field.internal,
            Self::Encode => &field.external,
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Where in the document, and under which names, a node is being walked.
#[derive(Debug, Clone, Copy, Default)]
struct Scope<'s> {
    /// The object key that led here.
    key: Option<&'s str>,
    /// The schema that declared that key.
    parent: Option<&'s str>,
    /// The ref name this node was reached through, if any.
    schema: Option<&'s str>,
}

/// Walks values against descriptors resolved from one [`Registry`].
///
/// Cheap to construct; holds only a reference.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'r> {
    registry: &'r Registry,
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Decode `value` against the schema named `root`.
    ///
    /// # Errors
    ///
    /// [`TransformError::Invalid`] if `value` does not conform,
    /// [`TransformError::UnknownSchema`] if `root` or any ref reached
    /// during the walk is not registered.
    pub fn decode(&self, value: &Value, root: &str) -> Result<TypedValue, TransformError> {
        tracing::debug!(root, "decoding document");
        let input = TypedValue::from(value);
        let result = self.transform(&input, &Descriptor::reference(root), Direction::Decode);
        if let Err(e) = &result {
            tracing::debug!(root, error = %e, "decode failed");
        }
        result
    }

    /// Encode `value` against the schema named `root`.
    ///
    /// # Errors
    ///
    /// As for [`Engine::decode`].
    pub fn encode(&self, value: &TypedValue, root: &str) -> Result<Value, TransformError> {
        tracing::debug!(root, "encoding document");
        let result = self
            .transform(value, &Descriptor::reference(root), Direction::Encode)
            .map(TypedValue::into_json);
        if let Err(e) = &result {
            tracing::debug!(root, error = %e, "encode failed");
        }
        result
    }

    /// Walk `value` against `descriptor` in the given direction.
    pub fn transform(
        &self,
        value: &TypedValue,
        descriptor: &Descriptor,
        direction: Direction,
    ) -> Result<TypedValue, TransformError> {
        let mut walk = Walk {
            registry: self.registry,
            direction,
            path: Vec::new(),
        };
        walk.present(value, descriptor, Scope::default())
    }
}

/// State of one transform call.
struct Walk<'r> {
    registry: &'r Registry,
    direction: Direction,
    path: Vec<Segment>,
}

impl Walk<'_> {
    /// Walk a value that is known to be present.
    fn present(
        &mut self,
        value: &TypedValue,
        descriptor: &Descriptor,
        scope: Scope<'_>,
    ) -> Result<TypedValue, TransformError> {
        // Only absent input yields absent output.
        Ok(self
            .visit(Some(value), descriptor, scope)?
            .unwrap_or(TypedValue::Null))
    }

    fn visit(
        &mut self,
        value: Option<&TypedValue>,
        descriptor: &Descriptor,
        scope: Scope<'_>,
    ) -> Result<Option<TypedValue>, TransformError> {
        match descriptor {
            Descriptor::Primitive(kind) => self.primitive(*kind, value, scope),
            Descriptor::Enum(values) => match value {
                Some(TypedValue::String(s)) if values.contains(s) => Ok(value.cloned()),
                _ => Err(self.fail(
                    MismatchKind::EnumMismatch,
                    Expected::Literals(values.clone()),
                    value,
                    scope,
                )),
            },
            Descriptor::Array(element) => match value {
                Some(TypedValue::Array(items)) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        self.path.push(Segment::Index(index));
                        let result = self.present(item, element, Scope { schema: None, ..scope });
                        self.path.pop();
                        out.push(result?);
                    }
                    Ok(Some(TypedValue::Array(out)))
                }
                _ => Err(self.fail(MismatchKind::TypeMismatch, Expected::Array, value, scope)),
            },
            Descriptor::Union(members) => self.union(members, value, scope),
            Descriptor::Object(object) => self.object(object, value, scope),
            Descriptor::Temporal => self.temporal(value, scope).map(Some),
            Descriptor::Ref(name) => {
                let registry = self.registry;
                let resolved = registry.resolve(name).map_err(|_| {
                    tracing::debug!(schema = %name, "ref to unregistered schema");
                    TransformError::UnknownSchema {
                        name: name.clone(),
                        path: self.pointer(),
                    }
                })?;
                self.visit(
                    value,
                    resolved,
                    Scope {
                        schema: Some(name.as_str()),
                        ..scope
                    },
                )
            }
        }
    }

    fn primitive(
        &self,
        kind: PrimitiveKind,
        value: Option<&TypedValue>,
        scope: Scope<'_>,
    ) -> Result<Option<TypedValue>, TransformError> {
        let accepted = match (kind, value) {
            (PrimitiveKind::Any, _) => true,
            (PrimitiveKind::Null, None | Some(TypedValue::Null)) => true,
            (PrimitiveKind::String, Some(TypedValue::String(_))) => true,
            (PrimitiveKind::Number, Some(TypedValue::Number(_))) => true,
            (PrimitiveKind::Boolean, Some(TypedValue::Bool(_))) => true,
            _ => false,
        };
        if accepted {
            Ok(value.cloned())
        } else {
            Err(self.fail(
                MismatchKind::TypeMismatch,
                Expected::Primitive(kind),
                value,
                scope,
            ))
        }
    }

    fn union(
        &mut self,
        members: &[Descriptor],
        value: Option<&TypedValue>,
        scope: Scope<'_>,
    ) -> Result<Option<TypedValue>, TransformError> {
        for member in members {
            match self.visit(value, member, scope) {
                Ok(out) => return Ok(out),
                Err(TransformError::Invalid(_)) => continue,
                Err(e @ TransformError::UnknownSchema { .. }) => return Err(e),
            }
        }
        tracing::trace!(path = %self.pointer(), members = members.len(), "no union member matched");
        Err(self.fail(
            MismatchKind::UnionExhausted,
            Expected::AnyOf(members.iter().map(Expected::of).collect()),
            value,
            scope,
        ))
    }

    fn object(
        &mut self,
        object: &ObjectDescriptor,
        value: Option<&TypedValue>,
        scope: Scope<'_>,
    ) -> Result<Option<TypedValue>, TransformError> {
        let map = match value {
            Some(TypedValue::Object(map)) => map,
            _ => {
                let expected = match scope.schema {
                    Some(name) => Expected::Schema(name.to_string()),
                    None => Expected::Object,
                };
                return Err(self.fail(MismatchKind::TypeMismatch, expected, value, scope));
            }
        };

        let direction = self.direction;
        let mut out = BTreeMap::new();

        for field in &object.fields {
            let source = direction.source_key(field);
            let field_scope = Scope {
                key: Some(source),
                parent: scope.schema,
                schema: None,
            };
            self.path.push(Segment::Key(source.to_string()));
            let result = self.visit(map.get(source), &field.descriptor, field_scope);
            self.path.pop();
            if let Some(converted) = result? {
                out.insert(direction.target_key(field).to_string(), converted);
            }
        }

        for (key, item) in map {
            let declared = object
                .fields
                .iter()
                .any(|field| direction.source_key(field) == key);
            if declared {
                continue;
            }
            let field_scope = Scope {
                key: Some(key.as_str()),
                parent: scope.schema,
                schema: None,
            };
            // An extra key may not overwrite a declared field's output.
            let shadows_field = object
                .fields
                .iter()
                .any(|field| direction.target_key(field) == key);
            self.path.push(Segment::Key(key.clone()));
            let result = match &object.additional {
                _ if shadows_field => Err(self.fail(
                    MismatchKind::UnknownField,
                    Expected::NoAdditionalField,
                    Some(item),
                    field_scope,
                )),
                AdditionalFields::Rejected => Err(self.fail(
                    MismatchKind::UnknownField,
                    Expected::NoAdditionalField,
                    Some(item),
                    field_scope,
                )),
                AdditionalFields::Allow(additional) => self.present(item, additional, field_scope),
            };
            self.path.pop();
            out.insert(key.clone(), result?);
        }

        Ok(Some(TypedValue::Object(out)))
    }

    fn temporal(
        &self,
        value: Option<&TypedValue>,
        scope: Scope<'_>,
    ) -> Result<TypedValue, TransformError> {
        let ts = match value {
            Some(TypedValue::Timestamp(ts)) => *ts,
            Some(TypedValue::String(s)) => Timestamp::parse(s).map_err(|_| {
                self.fail(MismatchKind::InvalidTemporal, Expected::Date, value, scope)
            })?,
            _ => {
                return Err(self.fail(MismatchKind::TypeMismatch, Expected::Date, value, scope));
            }
        };
        Ok(match self.direction {
            Direction::Decode => TypedValue::Timestamp(ts),
            Direction::Encode => TypedValue::String(ts.to_wire_string()),
        })
    }

    fn fail(
        &self,
        kind: MismatchKind,
        expected: Expected,
        actual: Option<&TypedValue>,
        scope: Scope<'_>,
    ) -> TransformError {
        TransformError::Invalid(ValidationError {
            kind,
            expected,
            actual: actual.map(TypedValue::to_json),
            key: scope.key.map(str::to_string),
            parent: scope.parent.map(str::to_string),
            path: self.pointer(),
        })
    }

    /// The current path as a JSON Pointer (RFC 6901).
    fn pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            out.push('/');
            match segment {
                Segment::Key(key) => out.push_str(&key.replace('~', "~0").replace('/', "~1")),
                Segment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn registry_with(name: &str, descriptor: Descriptor) -> Registry {
        let mut registry = Registry::new();
        registry.register(name, descriptor).unwrap();
        registry
    }

    fn decode(descriptor: Descriptor, value: Value) -> Result<TypedValue, TransformError> {
        registry_with("Root", descriptor).decode(&value, "Root")
    }

    fn validation(err: TransformError) -> ValidationError {
        match err {
            TransformError::Invalid(e) => e,
            other => panic!("expected a validation error, got {other}"),
        }
    }

    #[test]
    fn test_primitives_match_exactly() {
        assert!(decode(Descriptor::number(), json!(42)).is_ok());
        assert!(decode(Descriptor::string(), json!("x")).is_ok());
        assert!(decode(Descriptor::boolean(), json!(false)).is_ok());
        assert!(decode(Descriptor::null(), json!(null)).is_ok());

        let err = validation(decode(Descriptor::number(), json!("42")).unwrap_err());
        assert_eq!(err.kind, MismatchKind::TypeMismatch);
        assert_eq!(err.expected, Expected::Primitive(PrimitiveKind::Number));
        assert_eq!(err.actual, Some(json!("42")));

        assert!(decode(Descriptor::string(), json!(null)).is_err());
        assert!(decode(Descriptor::boolean(), json!(0)).is_err());
    }

    #[test]
    fn test_any_passes_through() {
        let doc = json!({"deep": [1, {"x": null}]});
        let out = decode(Descriptor::any(), doc.clone()).unwrap();
        assert_eq!(out.into_json(), doc);
    }

    #[test]
    fn test_enum_lists_every_member() {
        let err = decode(Descriptor::literals(["a", "b"]), json!("c")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnumMismatch);
        let message = err.to_string();
        assert!(message.contains(r#""a""#), "{message}");
        assert!(message.contains(r#""b""#), "{message}");
    }

    #[test]
    fn test_enum_rejects_non_strings() {
        assert!(decode(Descriptor::literals(["1"]), json!(1)).is_err());
    }

    #[test]
    fn test_array_short_circuits_at_first_failure() {
        let err = decode(Descriptor::array(Descriptor::number()), json!([1, 2, "x", 4])).unwrap_err();
        let err = validation(err);
        assert_eq!(err.path, "/2");
        assert_eq!(err.actual, Some(json!("x")));
    }

    #[test]
    fn test_array_requires_sequence() {
        let err = decode(Descriptor::array(Descriptor::any()), json!({"0": 1})).unwrap_err();
        assert_eq!(validation(err).expected, Expected::Array);
    }

    #[test]
    fn test_union_first_match_wins() {
        let registry = registry_with("U", Descriptor::union([Descriptor::any(), Descriptor::number()]));
        for value in [json!(1), json!("s"), json!(null), json!([true])] {
            assert_eq!(registry.decode(&value, "U").unwrap().into_json(), value);
        }
    }

    #[test]
    fn test_union_exhausted_names_all_members() {
        let err = decode(
            Descriptor::union([Descriptor::number(), Descriptor::null(), Descriptor::temporal()]),
            json!(true),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnionExhausted);
        assert!(err.to_string().contains("one of [number, null, Date]"), "{err}");
    }

    #[test]
    fn test_union_does_not_swallow_dangling_refs() {
        let err = decode(
            Descriptor::union([Descriptor::reference("Ghost"), Descriptor::any()]),
            json!(1),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSchema);
    }

    #[test]
    fn test_union_restores_path_between_members() {
        let object = Descriptor::object([FieldSpec::same("a", Descriptor::array(Descriptor::number()))]);
        let desc = Descriptor::object([FieldSpec::same(
            "u",
            Descriptor::union([object, Descriptor::string()]),
        )]);
        let err = validation(decode(desc, json!({"u": {"a": ["x"]}})).unwrap_err());
        assert_eq!(err.path, "/u");
        assert_eq!(err.kind, MismatchKind::UnionExhausted);
    }

    #[test]
    fn test_object_renames_keys_both_ways() {
        let registry = registry_with(
            "Page",
            Descriptor::object([
                FieldSpec::new("totalDocs", "total_docs", Descriptor::number()),
                FieldSpec::same("page", Descriptor::number()),
            ]),
        );
        let doc = json!({"totalDocs": 187, "page": 1});
        let typed = registry.decode(&doc, "Page").unwrap();
        assert_eq!(typed.to_json(), json!({"total_docs": 187, "page": 1}));
        assert_eq!(registry.encode(&typed, "Page").unwrap(), doc);
    }

    #[test]
    fn test_encode_reads_internal_keys() {
        let registry = registry_with(
            "Page",
            Descriptor::object([FieldSpec::new("totalDocs", "total_docs", Descriptor::number())]),
        );
        let external_shaped = TypedValue::from(json!({"totalDocs": 1}));
        let err = registry.encode(&external_shaped, "Page").unwrap_err();
        let err = validation(err);
        assert_eq!(err.key.as_deref(), Some("total_docs"));
        assert_eq!(err.actual, None);
    }

    #[test]
    fn test_object_rejects_undeclared_key() {
        let err = decode(
            Descriptor::object([FieldSpec::same("a", Descriptor::number())]),
            json!({"a": 1, "b": 2}),
        )
        .unwrap_err();
        let err = validation(err);
        assert_eq!(err.kind, MismatchKind::UnknownField);
        assert_eq!(err.key.as_deref(), Some("b"));
        assert_eq!(err.path, "/b");
        assert_eq!(err.parent.as_deref(), Some("Root"));
    }

    #[test]
    fn test_object_additional_policy_validates_extras() {
        let desc = Descriptor::open_object([FieldSpec::same("a", Descriptor::number())], Descriptor::string());
        let out = decode(desc.clone(), json!({"a": 1, "b": "x"})).unwrap();
        assert_eq!(out.to_json(), json!({"a": 1, "b": "x"}));
        assert!(decode(desc, json!({"a": 1, "b": 2})).is_err());
    }

    #[test]
    fn test_extra_key_cannot_shadow_renamed_field() {
        let desc = Descriptor::open_object([FieldSpec::new("a", "b", Descriptor::number())], Descriptor::any());
        let registry = registry_with("Root", desc);

        let err = validation(registry.decode(&json!({"a": 1, "b": "x"}), "Root").unwrap_err());
        assert_eq!(err.kind, MismatchKind::UnknownField);
        assert_eq!(err.key.as_deref(), Some("b"));
        assert_eq!(err.path, "/b");

        let err = registry
            .encode(&TypedValue::from(json!({"b": 1, "a": "x"})), "Root")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField);
        assert_eq!(err.path(), "/a");

        let typed = registry.decode(&json!({"a": 1, "c": "x"}), "Root").unwrap();
        assert_eq!(typed.to_json(), json!({"b": 1, "c": "x"}));
        assert_eq!(registry.encode(&typed, "Root").unwrap(), json!({"a": 1, "c": "x"}));
    }

    #[test]
    fn test_object_shape_errors_name_the_schema() {
        let err = validation(decode(Descriptor::object(Vec::new()), json!([1])).unwrap_err());
        assert_eq!(err.expected, Expected::Schema("Root".to_string()));

        let inline = Descriptor::array(Descriptor::object(Vec::new()));
        let err = validation(decode(inline, json!([null])).unwrap_err());
        assert_eq!(err.expected, Expected::Object);
    }

    #[test]
    fn test_missing_key_is_absent() {
        let desc = Descriptor::object([
            FieldSpec::same("maybe", Descriptor::nullable(Descriptor::string())),
            FieldSpec::same("anything", Descriptor::any()),
        ]);
        let out = decode(desc, json!({})).unwrap();
        assert_eq!(out.to_json(), json!({}));
    }

    #[test]
    fn test_missing_required_key_reports_undefined() {
        let err = decode(
            Descriptor::object([FieldSpec::same("name", Descriptor::string())]),
            json!({}),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid value for key "name" on Root at /name. Expected string but got undefined."#
        );
    }

    #[test]
    fn test_bare_temporal_rejects_null() {
        let err = decode(Descriptor::temporal(), json!(null)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let ok = decode(Descriptor::nullable(Descriptor::temporal()), json!(null)).unwrap();
        assert!(ok.is_null());
    }

    #[test]
    fn test_temporal_never_parses_numbers() {
        let err = decode(Descriptor::temporal(), json!(1143239400)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let either = Descriptor::union([Descriptor::temporal(), Descriptor::number()]);
        let out = decode(either, json!(1143239400)).unwrap();
        assert_eq!(out, TypedValue::from(json!(1143239400)));
    }

    #[test]
    fn test_temporal_invalid_string() {
        let err = decode(Descriptor::temporal(), json!("next tuesday")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTemporal);
    }

    #[test]
    fn test_temporal_directions() {
        let registry = registry_with("When", Descriptor::temporal());
        let typed = registry
            .decode(&json!("2006-03-25T10:30:00+12:00"), "When")
            .unwrap();
        assert!(typed.as_timestamp().is_some());
        assert_eq!(
            registry.encode(&typed, "When").unwrap(),
            json!("2006-03-25T10:30:00.000+12:00")
        );
        // Encoding a string parses and re-renders it.
        assert_eq!(
            registry
                .encode(&TypedValue::from(json!("2020-01-07")), "When")
                .unwrap(),
            json!("2020-01-07T00:00:00.000Z")
        );
    }

    #[test]
    fn test_unknown_root_schema() {
        let err = Registry::new().decode(&json!(1), "Nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSchema);
        assert_eq!(err.path(), "");
    }

    #[test]
    fn test_nested_context_uses_innermost_ref() {
        let mut registry = Registry::new();
        registry
            .register(
                "Outer",
                Descriptor::object([FieldSpec::same("inner", Descriptor::reference("Inner"))]),
            )
            .unwrap();
        registry
            .register(
                "Inner",
                Descriptor::object([FieldSpec::same("n", Descriptor::number())]),
            )
            .unwrap();
        let err = registry
            .decode(&json!({"inner": {"n": "one"}}), "Outer")
            .unwrap_err();
        let err = validation(err);
        assert_eq!(err.key.as_deref(), Some("n"));
        assert_eq!(err.parent.as_deref(), Some("Inner"));
        assert_eq!(err.path, "/inner/n");
    }

    #[test]
    fn test_pointer_escapes_keys() {
        let desc = Descriptor::map(Descriptor::number());
        let err = validation(decode(desc, json!({"a/b~c": "x"})).unwrap_err());
        assert_eq!(err.path, "/a~1b~0c");
    }

    #[test]
    fn test_transform_with_inline_descriptor() {
        let registry = Registry::new();
        let engine = Engine::new(&registry);
        let out = engine
            .transform(
                &TypedValue::from(json!(["a"])),
                &Descriptor::array(Descriptor::string()),
                Direction::Encode,
            )
            .unwrap();
        assert_eq!(out.into_json(), json!(["a"]));
    }
}
