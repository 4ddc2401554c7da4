//! # shapecast-schema — Descriptors, Registry & Transform Engine
//!
//! Interprets a declarative descriptor graph to validate JSON into typed
//! values and to encode typed values back to JSON.
//!
//! ## Descriptor Model (`descriptor`)
//!
//! [`Descriptor`] is a closed set of node kinds: primitive, literal enum,
//! array, union, object (with an additional-field policy), temporal, and a
//! named [`Descriptor::Ref`] into a [`Registry`]. Refs are resolved lazily,
//! so schemas can be mutually recursive.
//!
//! ## Transform Engine (`engine`)
//!
//! [`Engine::transform`] walks a value against a descriptor in either
//! [`Direction`]. [`Registry::decode`] and [`Registry::encode`] are the usual
//! entry points:
//!
//! ```
//! use serde_json::json;
//! use shapecast_schema::{Descriptor, FieldSpec, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(
//!         "Page",
//!         Descriptor::object([FieldSpec::new("totalDocs", "total_docs", Descriptor::number())]),
//!     )
//!     .unwrap();
//!
//! let typed = registry.decode(&json!({"totalDocs": 3}), "Page").unwrap();
//! assert_eq!(typed.to_json(), json!({"total_docs": 3}));
//! assert_eq!(registry.encode(&typed, "Page").unwrap(), json!({"totalDocs": 3}));
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `shapecast-core` internally.
//! - Descriptors and registries are never mutated by a transform.
//! - Invalid documents are rejected with structured errors: expected type,
//!   actual value, key, enclosing schema and JSON Pointer path.

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod load;
pub mod registry;

pub use descriptor::{AdditionalFields, Descriptor, FieldSpec, ObjectDescriptor, PrimitiveKind};
pub use engine::{Direction, Engine};
pub use error::{ErrorKind, Expected, MismatchKind, RegistryError, TransformError, ValidationError};
pub use registry::{DanglingRef, Registry};
pub use shapecast_core::{Timestamp, TypedValue};
