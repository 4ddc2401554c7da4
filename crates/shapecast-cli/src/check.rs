//! # Check CLI
//!
//! `shapecast check`: load a registry, list its schemas and report every
//! ref that names a schema the registry does not hold.

use std::fmt::Write as _;

use anyhow::Result;
use shapecast_schema::{DanglingRef, Registry};

use crate::Options;

/// Result of checking one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub schemas: Vec<String>,
    pub dangling: Vec<DanglingRef>,
    /// The requested root, if it is not registered.
    pub missing_root: Option<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.missing_root.is_none()
    }

    /// Human-readable summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for name in &self.schemas {
            let _ = writeln!(out, "  {name}");
        }
        let _ = writeln!(out, "Total: {} schemas", self.schemas.len());
        for dangling in &self.dangling {
            let _ = writeln!(
                out,
                "dangling ref: {} -> {}",
                dangling.schema, dangling.target
            );
        }
        if let Some(root) = &self.missing_root {
            let _ = writeln!(out, "root schema {root} is not registered");
        }
        out
    }
}

/// Check `registry`, and `root` against it when given.
pub fn check_registry(registry: &Registry, root: Option<&str>) -> CheckReport {
    CheckReport {
        schemas: registry
            .schema_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        dangling: registry.check_refs(),
        missing_root: root
            .filter(|root| !registry.contains(root))
            .map(str::to_string),
    }
}

/// Execute `shapecast check`.
pub fn run_check(opts: &Options) -> Result<u8> {
    let registry = opts.load_registry()?;
    let root = match (&opts.root, &opts.registry) {
        (Some(root), _) => Some(root.as_str()),
        (None, None) => Some(shapecast_launches::ROOT),
        (None, Some(_)) => None,
    };
    let report = check_registry(&registry, root);
    print!("{}", report.render());

    if report.is_clean() {
        Ok(0)
    } else {
        tracing::warn!(
            dangling = report.dangling.len(),
            missing_root = report.missing_root.is_some(),
            "registry check failed"
        );
        Ok(1)
    }
}
