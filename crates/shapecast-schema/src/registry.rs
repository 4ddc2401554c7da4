//! # Schema Registry
//!
//! The shared lookup table that [`Descriptor::Ref`] nodes resolve against.
//! A registry is built once (in code, or loaded from files via
//! [`crate::load`]) and then only read. Refs are looked up by name at
//! traversal time, never bound at registration, so schemas may reference
//! each other in any order and may be cyclic.
//!
//! ## Thread Safety
//!
//! `Registry` holds plain owned data and is `Send + Sync`. Share one behind
//! an `Arc` and transform from as many threads as needed.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use shapecast_core::TypedValue;

use crate::descriptor::Descriptor;
use crate::engine::Engine;
use crate::error::{RegistryError, TransformError};

/// A ref that names a schema the registry does not hold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DanglingRef {
    /// Schema whose descriptor contains the ref.
    pub schema: String,
    /// The missing target name.
    pub target: String,
}

/// Name → descriptor table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: HashMap<String, Descriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` under `name`.
    ///
    /// Refs inside `descriptor` are not checked here; see
    /// [`Registry::check_refs`].
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateSchema`] if `name` is taken.
    /// - [`RegistryError::EmptyEnum`] / [`RegistryError::EmptyUnion`] if any
    ///   enum or union in the descriptor has no members.
    /// - [`RegistryError::DuplicateField`] if an object declares the same
    ///   external or internal key twice.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: Descriptor,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateSchema(name));
        }
        check_well_formed(&name, &descriptor)?;
        tracing::trace!(schema = %name, "registered schema");
        self.schemas.insert(name, descriptor);
        Ok(())
    }

    /// Look up a schema by name.
    pub fn resolve(&self, name: &str) -> Result<&Descriptor, RegistryError> {
        self.schemas
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Names of all registered schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every ref, in every registered schema, whose target is missing.
    ///
    /// Sorted by schema then target; each pair reported once.
    pub fn check_refs(&self) -> Vec<DanglingRef> {
        let mut dangling = Vec::new();
        for (schema, descriptor) in &self.schemas {
            let mut seen = HashSet::new();
            descriptor.walk(&mut |node| {
                if let Descriptor::Ref(target) = node {
                    if !self.schemas.contains_key(target) && seen.insert(target.as_str()) {
                        dangling.push(DanglingRef {
                            schema: schema.clone(),
                            target: target.clone(),
                        });
                    }
                }
            });
        }
        dangling.sort();
        dangling
    }

    /// Decode a JSON value against the schema named `root`.
    pub fn decode(&self, value: &Value, root: &str) -> Result<TypedValue, TransformError> {
        Engine::new(self).decode(value, root)
    }

    /// Encode a typed value against the schema named `root`.
    pub fn encode(&self, value: &TypedValue, root: &str) -> Result<Value, TransformError> {
        Engine::new(self).encode(value, root)
    }
}

fn check_well_formed(schema: &str, descriptor: &Descriptor) -> Result<(), RegistryError> {
    let mut problem = None;
    descriptor.walk(&mut |node| {
        if problem.is_some() {
            return;
        }
        problem = match node {
            Descriptor::Enum(values) if values.is_empty() => Some(RegistryError::EmptyEnum {
                schema: schema.to_string(),
            }),
            Descriptor::Union(members) if members.is_empty() => Some(RegistryError::EmptyUnion {
                schema: schema.to_string(),
            }),
            Descriptor::Object(object) => duplicate_key(object.fields.iter().map(|f| f.external.as_str()))
                .or_else(|| duplicate_key(object.fields.iter().map(|f| f.internal.as_str())))
                .map(|key| RegistryError::DuplicateField {
                    schema: schema.to_string(),
                    key: key.to_string(),
                }),
            _ => None,
        };
    });
    match problem {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn duplicate_key<'a>(mut keys: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    keys.find(|key| !seen.insert(*key))
}
