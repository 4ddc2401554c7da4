//! # Descriptor Model
//!
//! A closed set of node kinds describing any JSON-shaped schema. Descriptors
//! form a graph: [`Descriptor::Ref`] names another descriptor in a
//! [`Registry`](crate::Registry) and is resolved at traversal time, which is
//! what lets schemas refer to themselves or to each other.
//!
//! Descriptors are plain immutable data. They are (de)serializable in an
//! externally tagged, snake_case form so registries can be shipped as JSON
//! or YAML files:
//!
//! ```yaml
//! Node:
//!   object:
//!     fields:
//!       - { external: label, internal: label, type: { primitive: string } }
//!       - { external: children, internal: children, type: { array: { ref: Node } } }
//!     additional: rejected
//! ```
//!
//! There is no optional-field flag. A field that may be missing or null is
//! described as a union with a `null` member.

use serde::{Deserialize, Serialize};

/// The JSON primitive a [`Descriptor::Primitive`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Null,
    /// Accepts and returns anything unchanged.
    Any,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Any => "any",
        }
    }
}

/// A node of the schema graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Descriptor {
    Primitive(PrimitiveKind),
    /// The value must be a string equal to one of the listed literals.
    Enum(Vec<String>),
    Array(Box<Descriptor>),
    /// Members are tried in declared order; the first that accepts wins.
    Union(Vec<Descriptor>),
    Object(ObjectDescriptor),
    /// ISO-8601-like date/time.
    Temporal,
    /// Named indirection into the registry.
    Ref(String),
}

/// Fixed named fields plus a policy for keys that are not declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub additional: AdditionalFields,
}

/// What happens to an input key that no [`FieldSpec`] declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditionalFields {
    /// Any undeclared key fails the whole object.
    #[default]
    Rejected,
    /// Undeclared keys are transformed against this descriptor and copied
    /// through under the same name.
    Allow(Box<Descriptor>),
}

/// One declared object field.
///
/// `external` is the key on the JSON side, `internal` the key on the typed
/// side. They may differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub external: String,
    pub internal: String,
    #[serde(rename = "type")]
    pub descriptor: Descriptor,
}

impl FieldSpec {
    pub fn new(
        external: impl Into<String>,
        internal: impl Into<String>,
        descriptor: Descriptor,
    ) -> Self {
        Self {
            external: external.into(),
            internal: internal.into(),
            descriptor,
        }
    }

    /// A field whose external and internal keys are the same.
    pub fn same(key: impl Into<String>, descriptor: Descriptor) -> Self {
        let key = key.into();
        Self::new(key.clone(), key, descriptor)
    }
}

impl Descriptor {
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    pub fn null() -> Self {
        Self::Primitive(PrimitiveKind::Null)
    }

    pub fn any() -> Self {
        Self::Primitive(PrimitiveKind::Any)
    }

    pub fn temporal() -> Self {
        Self::Temporal
    }

    pub fn literals<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn array(element: Descriptor) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn union(members: impl IntoIterator<Item = Descriptor>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    /// `Union(inner, Null)`: the field may be `null` or missing.
    pub fn nullable(inner: Descriptor) -> Self {
        Self::Union(vec![inner, Self::null()])
    }

    /// An object that rejects undeclared keys.
    pub fn object(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self::Object(ObjectDescriptor {
            fields: fields.into_iter().collect(),
            additional: AdditionalFields::Rejected,
        })
    }

    /// An object that routes undeclared keys through `additional`.
    pub fn open_object(
        fields: impl IntoIterator<Item = FieldSpec>,
        additional: Descriptor,
    ) -> Self {
        Self::Object(ObjectDescriptor {
            fields: fields.into_iter().collect(),
            additional: AdditionalFields::Allow(Box::new(additional)),
        })
    }

    /// A map: no declared fields, every key validated against `values`.
    pub fn map(values: Descriptor) -> Self {
        Self::open_object(Vec::new(), values)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// Visit this node and every node nested in it, pre-order.
    ///
    /// Refs are reported but not followed.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Descriptor)) {
        visit(self);
        match self {
            Self::Array(element) => element.walk(visit),
            Self::Union(members) => {
                for member in members {
                    member.walk(visit);
                }
            }
            Self::Object(object) => {
                for field in &object.fields {
                    field.descriptor.walk(visit);
                }
                if let AdditionalFields::Allow(additional) = &object.additional {
                    additional.walk(visit);
                }
            }
            Self::Primitive(_) | Self::Enum(_) | Self::Temporal | Self::Ref(_) => {}
        }
    }
}
