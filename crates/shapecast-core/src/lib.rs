//! # shapecast-core — Foundational Types for shapecast
//!
//! Defines the value types that sit on the typed side of a schema-driven
//! transform. Every other crate in the workspace depends on `shapecast-core`;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One typed value model.** [`TypedValue`] is the only representation
//!    produced by decoding and consumed by encoding. It is a superset of
//!    JSON: everything JSON can express, plus structured timestamps.
//!
//! 2. **Offset-preserving timestamps.** [`Timestamp`] keeps the UTC offset it
//!    was parsed with, so a decoded date renders back to the same wire form.
//!    Numbers are never interpreted as dates.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shapecast-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use temporal::Timestamp;
pub use value::TypedValue;
