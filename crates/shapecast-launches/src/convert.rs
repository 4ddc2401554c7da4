//! # Convert — JSON text to and from [`LaunchPage`]
//!
//! Parsing is followed by a full schema check before any struct is built,
//! so a document that parses but does not match the launch list shape is
//! rejected with the engine's contextual error rather than a serde one.

use shapecast_core::TypedValue;
use shapecast_schema::{Registry, RegistryError, TransformError};
use thiserror::Error;

use crate::model::LaunchPage;
use crate::schema::{self, ROOT};

/// Error converting launch list documents.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The text is not JSON, or the output could not be rendered.
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The document does not match the launch list schema.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A schema-valid value does not fit the typed model (e.g. a
    /// fractional number where an integer is expected).
    #[error("launch page does not fit the typed model: {0}")]
    Shape(#[source] serde_json::Error),

    /// The built-in registry failed to build.
    #[error("launch schema registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Reusable converter holding the launch list registry.
#[derive(Debug, Clone)]
pub struct Convert {
    registry: Registry,
}

impl Convert {
    pub fn new() -> Result<Self, LaunchError> {
        Ok(Self {
            registry: schema::registry()?,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse and validate a launch list page.
    pub fn to_launch_page(&self, json: &str) -> Result<LaunchPage, LaunchError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(LaunchError::Json)?;
        let typed = self.registry.decode(&value, ROOT)?;
        let page: LaunchPage =
            serde_json::from_value(typed.into_json()).map_err(LaunchError::Shape)?;
        tracing::debug!(docs = page.docs.len(), page = page.page, "decoded launch page");
        Ok(page)
    }

    /// Validate and render a launch list page as pretty-printed JSON with
    /// the upstream key names.
    pub fn launch_page_to_json(&self, page: &LaunchPage) -> Result<String, LaunchError> {
        let typed = TypedValue::from(serde_json::to_value(page).map_err(LaunchError::Shape)?);
        let encoded = self.registry.encode(&typed, ROOT)?;
        serde_json::to_string_pretty(&encoded).map_err(LaunchError::Json)
    }
}

/// One-shot form of [`Convert::to_launch_page`].
pub fn to_launch_page(json: &str) -> Result<LaunchPage, LaunchError> {
    Convert::new()?.to_launch_page(json)
}

/// One-shot form of [`Convert::launch_page_to_json`].
pub fn launch_page_to_json(page: &LaunchPage) -> Result<String, LaunchError> {
    Convert::new()?.launch_page_to_json(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_json() {
        let err = to_launch_page("{ nope").unwrap_err();
        assert!(matches!(err, LaunchError::Json(_)), "{err}");
    }

    #[test]
    fn test_schema_error_surfaces_engine_context() {
        let err = to_launch_page(r#"{"docs": 3}"#).unwrap_err();
        match err {
            LaunchError::Transform(e) => {
                assert_eq!(e.path(), "/docs");
                assert!(e.to_string().contains(r#"for key "docs" on LaunchPage"#), "{e}");
            }
            other => panic!("expected Transform, got {other}"),
        }
    }

    #[test]
    fn test_fractional_count_is_shape_error() {
        let json = r#"{
            "docs": [], "totalDocs": 1.5, "offset": 0, "limit": 10, "totalPages": 1,
            "page": 1, "pagingCounter": 1, "hasPrevPage": false, "hasNextPage": false,
            "prevPage": null, "nextPage": null
        }"#;
        assert!(matches!(to_launch_page(json), Err(LaunchError::Shape(_))));
    }

    #[test]
    fn test_empty_page_round_trip() {
        let json = r#"{
            "docs": [], "totalDocs": 0, "offset": 0, "limit": 10, "totalPages": 1,
            "page": 1, "pagingCounter": 1, "hasPrevPage": false, "hasNextPage": false,
            "prevPage": null, "nextPage": null
        }"#;
        let page = to_launch_page(json).unwrap();
        assert!(page.docs.is_empty());
        assert_eq!(page.next_page, None);

        let text = launch_page_to_json(&page).unwrap();
        assert!(text.contains("\n  \"hasNextPage\": false"), "{text}");
        assert_eq!(to_launch_page(&text).unwrap(), page);
    }
}
