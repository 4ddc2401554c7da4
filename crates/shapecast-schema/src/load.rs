//! # Registry Loading
//!
//! Builds a [`Registry`] from descriptor documents. A document is a mapping
//! of schema name to descriptor, in JSON or YAML:
//!
//! ```yaml
//! Tree:
//!   object:
//!     fields:
//!       - { external: children, internal: children, type: { array: { ref: Tree } } }
//! Label: { primitive: string }
//! ```
//!
//! YAML documents are converted to JSON values before descriptors are read,
//! so both formats accept the same single-key map form. A YAML tag is read
//! as that map's key (`!primitive string` is `{ primitive: string }`).
//!
//! A directory load reads every `*.json`, `*.yaml` and `*.yml` file in it,
//! in filename order, into one registry. A name defined twice, in one file
//! or across files, is a [`RegistryError::DuplicateSchema`], never a silent
//! override.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

use crate::descriptor::Descriptor;
use crate::error::RegistryError;
use crate::registry::Registry;

/// Extensions recognised as registry documents.
const JSON_EXTENSIONS: &[&str] = &["json"];
const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Top-level entries of a document in document order. Repeated names are
/// kept so that registration can reject them.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of schema names to descriptors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

impl Registry {
    /// Build a registry from an already-parsed JSON document.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Load`] if the document is not a mapping of names to
    /// descriptors, or any error [`Registry::register`] raises.
    pub fn from_json_value(value: &Value) -> Result<Self, RegistryError> {
        let entries = match value {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            _ => {
                return Err(RegistryError::Load {
                    origin: "<value>".to_string(),
                    reason: "expected a mapping of schema names to descriptors".to_string(),
                })
            }
        };
        let mut registry = Self::new();
        registry.extend_from("<value>", entries)?;
        Ok(registry)
    }

    /// Build a registry from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.extend_from("<string>", parse_json("<string>", text)?)?;
        Ok(registry)
    }

    /// Build a registry from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.extend_from("<string>", parse_yaml("<string>", text)?)?;
        Ok(registry)
    }

    /// Load a single registry file. The format follows the extension;
    /// anything other than `.yaml`/`.yml` is read as JSON.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.merge_file(path.as_ref())?;
        Ok(registry)
    }

    /// Load every registry file in `dir`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Load`] if the directory cannot be listed or a file
    /// cannot be parsed, [`RegistryError::Io`] if a file cannot be read, and
    /// [`RegistryError::DuplicateSchema`] if a name is defined twice.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| RegistryError::Load {
            origin: dir.display().to_string(),
            reason: format!("cannot read registry directory: {e}"),
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_registry_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut registry = Self::new();
        for path in &files {
            registry.merge_file(path)?;
        }
        tracing::info!(
            dir = %dir.display(),
            files = files.len(),
            schemas = registry.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    /// Load `path` (file or directory).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load_file(path)
        }
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), RegistryError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path)?;
        let entries = if has_extension(path, YAML_EXTENSIONS) {
            parse_yaml(&origin, &text)?
        } else {
            parse_json(&origin, &text)?
        };
        tracing::debug!(file = %origin, schemas = entries.len(), "reading registry file");
        self.extend_from(&origin, entries)
    }

    fn extend_from(
        &mut self,
        origin: &str,
        entries: Vec<(String, Value)>,
    ) -> Result<(), RegistryError> {
        for (name, value) in entries {
            let descriptor: Descriptor =
                serde_json::from_value(value).map_err(|e| RegistryError::Load {
                    origin: origin.to_string(),
                    reason: format!("schema '{name}': {e}"),
                })?;
            self.register(name, descriptor)?;
        }
        Ok(())
    }
}

fn parse_json(origin: &str, text: &str) -> Result<Vec<(String, Value)>, RegistryError> {
    let Entries(entries) = serde_json::from_str::<Entries<Value>>(text).map_err(|e| RegistryError::Load {
        origin: origin.to_string(),
        reason: format!("invalid JSON registry: {e}"),
    })?;
    Ok(entries)
}

fn parse_yaml(origin: &str, text: &str) -> Result<Vec<(String, Value)>, RegistryError> {
    let Entries(entries) =
        serde_yaml::from_str::<Entries<serde_yaml::Value>>(text).map_err(|e| {
            RegistryError::Load {
                origin: origin.to_string(),
                reason: format!("invalid YAML registry: {e}"),
            }
        })?;
    entries
        .into_iter()
        .map(|(name, yaml)| -> Result<(String, Value), RegistryError> {
            let json = yaml_to_json(&yaml).map_err(|reason| RegistryError::Load {
                origin: origin.to_string(),
                reason: format!("schema '{name}': {reason}"),
            })?;
            Ok((name, json))
        })
        .collect()
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// A tagged value `!name inner` becomes the single-key map `{name: inner}`,
/// which is how externally tagged descriptors read from JSON.
pub(crate) fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let mut json_map = serde_json::Map::new();
            json_map.insert(
                tag.trim_start_matches('!').to_string(),
                yaml_to_json(&tagged.value)?,
            );
            Ok(Value::Object(json_map))
        }
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

fn is_registry_file(path: &Path) -> bool {
    has_extension(path, JSON_EXTENSIONS) || has_extension(path, YAML_EXTENSIONS)
}
