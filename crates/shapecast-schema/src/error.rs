//! # Error Types
//!
//! Two error families:
//!
//! - [`TransformError`] — raised while walking a value against a descriptor.
//!   [`TransformError::Invalid`] is a data error (the document does not
//!   conform); [`TransformError::UnknownSchema`] is a configuration error
//!   (a ref points at nothing).
//! - [`RegistryError`] — raised while building or loading a registry.
//!
//! A data error renders as
//! `Invalid value for key "X" on Y at /path. Expected <T> but got <JSON>.`

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::descriptor::{Descriptor, PrimitiveKind};

/// What a failing node expected to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Primitive(PrimitiveKind),
    /// One of these string literals.
    Literals(Vec<String>),
    Array,
    Object,
    /// The value reached through a ref of this name.
    Schema(String),
    Date,
    NoAdditionalField,
    /// Any of these alternatives, in declared order.
    AnyOf(Vec<Expected>),
}

impl Expected {
    /// Describe what `descriptor` accepts, without resolving refs.
    pub fn of(descriptor: &Descriptor) -> Self {
        match descriptor {
            Descriptor::Primitive(kind) => Self::Primitive(*kind),
            Descriptor::Enum(values) => Self::Literals(values.clone()),
            Descriptor::Array(_) => Self::Array,
            Descriptor::Union(members) => Self::AnyOf(members.iter().map(Self::of).collect()),
            Descriptor::Object(_) => Self::Object,
            Descriptor::Temporal => Self::Date,
            Descriptor::Ref(name) => Self::Schema(name.clone()),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.as_str()),
            Self::Literals(values) => {
                f.write_str("one of [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Value::String(value.clone()))?;
                }
                f.write_str("]")
            }
            Self::Array => f.write_str("array"),
            Self::Object => f.write_str("object"),
            Self::Schema(name) => f.write_str(name),
            Self::Date => f.write_str("Date"),
            Self::NoAdditionalField => f.write_str("no additional field"),
            Self::AnyOf(members) => {
                f.write_str("one of [")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Which structural check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    /// Primitive or shape disagreement.
    TypeMismatch,
    /// String not among the enum literals.
    EnumMismatch,
    /// No union member accepted the value.
    UnionExhausted,
    /// Undeclared key under a rejecting object.
    UnknownField,
    /// String that does not parse as a date/time.
    InvalidTemporal,
}

/// A value that does not conform to its descriptor.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "Invalid value{}{}{}. Expected {expected} but got {}.",
    key_text(.key),
    parent_text(.parent),
    path_text(.path),
    actual_text(.actual)
)]
pub struct ValidationError {
    pub kind: MismatchKind,
    pub expected: Expected,
    /// The offending value; `None` when the key was missing altogether.
    pub actual: Option<Value>,
    /// The object key being transformed, if any.
    pub key: Option<String>,
    /// The schema enclosing that key, if it was reached through a ref.
    pub parent: Option<String>,
    /// JSON Pointer to the offending value, relative to the root.
    pub path: String,
}

fn quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn key_text(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" for key {}", quoted(key)),
        None => String::new(),
    }
}

fn parent_text(parent: &Option<String>) -> String {
    match parent {
        Some(parent) => format!(" on {parent}"),
        None => String::new(),
    }
}

fn path_text(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {path}")
    }
}

fn actual_text(actual: &Option<Value>) -> String {
    match actual {
        Some(value) => value.to_string(),
        None => "undefined".to_string(),
    }
}

/// Flat classification of every [`TransformError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    EnumMismatch,
    UnionExhausted,
    UnknownField,
    UnknownSchema,
    InvalidTemporal,
}

/// Failure of a transform. Terminal for the whole call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The value does not conform to the descriptor.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A ref named a schema the registry does not hold.
    #[error("Unknown schema {}{}.", quoted(.name), path_text(.path))]
    UnknownSchema {
        name: String,
        /// JSON Pointer to the value being transformed when the ref was hit.
        path: String,
    },
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(e) => match e.kind {
                MismatchKind::TypeMismatch => ErrorKind::TypeMismatch,
                MismatchKind::EnumMismatch => ErrorKind::EnumMismatch,
                MismatchKind::UnionExhausted => ErrorKind::UnionExhausted,
                MismatchKind::UnknownField => ErrorKind::UnknownField,
                MismatchKind::InvalidTemporal => ErrorKind::InvalidTemporal,
            },
            Self::UnknownSchema { .. } => ErrorKind::UnknownSchema,
        }
    }

    /// The data error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::UnknownSchema { .. } => None,
        }
    }

    /// JSON Pointer to where the failure happened.
    pub fn path(&self) -> &str {
        match self {
            Self::Invalid(e) => &e.path,
            Self::UnknownSchema { path, .. } => path,
        }
    }
}

/// Error building or loading a [`Registry`](crate::Registry).
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A schema of this name is already registered.
    #[error("duplicate schema '{0}'")]
    DuplicateSchema(String),

    /// No schema of this name is registered.
    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    /// The schema contains an enum with no literals.
    #[error("schema '{schema}' contains an empty enum")]
    EmptyEnum { schema: String },

    /// The schema contains a union with no members.
    #[error("schema '{schema}' contains an empty union")]
    EmptyUnion { schema: String },

    /// An object in the schema declares the same key twice.
    #[error("schema '{schema}' declares key '{key}' more than once")]
    DuplicateField { schema: String, key: String },

    /// A registry file could not be parsed.
    #[error("registry load error for '{origin}': {reason}")]
    Load { origin: String, reason: String },

    /// IO error reading a registry file or directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
