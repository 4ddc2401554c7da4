//! # shapecast-cli — CLI Tool for shapecast
//!
//! Provides the `shapecast` command-line interface.
//!
//! ## Subcommands
//!
//! - `shapecast decode` — External JSON → typed JSON (internal keys,
//!   normalized timestamps).
//! - `shapecast encode` — Typed JSON → external JSON.
//! - `shapecast check` — List a registry's schemas and report dangling refs.
//!
//! Without `--registry` every subcommand uses the bundled launch list
//! registry with `LaunchPage` as root:
//!
//! ```bash
//! shapecast decode page.json
//! shapecast --registry schemas/ --root Invoice encode - < invoice.json
//! shapecast --registry schemas/ check
//! ```

pub mod check;
pub mod transform;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use shapecast_schema::Registry;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Registry file or directory; `None` selects the bundled registry.
    pub registry: Option<PathBuf>,
    /// Root schema name.
    pub root: Option<String>,
    /// Print single-line JSON instead of pretty-printed.
    pub compact: bool,
}

impl Options {
    /// Load the registry these options select.
    pub fn load_registry(&self) -> Result<Registry> {
        match &self.registry {
            Some(path) => Registry::load(path)
                .with_context(|| format!("failed to load registry from {}", path.display())),
            None => {
                shapecast_launches::registry().context("failed to build the bundled registry")
            }
        }
    }

    /// The root schema name to transform against.
    pub fn root(&self) -> Result<&str> {
        match (&self.root, &self.registry) {
            (Some(root), _) => Ok(root),
            (None, None) => Ok(shapecast_launches::ROOT),
            (None, Some(_)) => bail!("--root is required together with --registry"),
        }
    }

    /// Serialize `value` for output.
    pub fn render(&self, value: &serde_json::Value) -> Result<String> {
        let text = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        };
        text.context("failed to serialize output")
    }
}

/// Read an input document from `path`, or from stdin if `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
