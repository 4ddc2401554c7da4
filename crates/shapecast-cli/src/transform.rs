//! # Decode / Encode CLI
//!
//! `shapecast decode <INPUT>` and `shapecast encode <INPUT>`: run one
//! document through the transform engine and print the result on stdout.
//!
//! A document that does not conform is reported on stderr with the engine's
//! message and exit code 1. Unreadable input, unparsable JSON and registry
//! problems are errors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use shapecast_core::TypedValue;
use shapecast_schema::{Direction, Registry, TransformError};

use crate::{read_input, Options};

/// Arguments for `decode` and `encode`.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Input JSON document, or `-` for stdin.
    pub input: PathBuf,
}

/// Execute `shapecast decode`.
pub fn run_decode(args: &TransformArgs, opts: &Options) -> Result<u8> {
    run(Direction::Decode, args, opts)
}

/// Execute `shapecast encode`.
pub fn run_encode(args: &TransformArgs, opts: &Options) -> Result<u8> {
    run(Direction::Encode, args, opts)
}

fn run(direction: Direction, args: &TransformArgs, opts: &Options) -> Result<u8> {
    let registry = opts.load_registry()?;
    let root = opts.root()?;
    let text = read_input(&args.input)?;

    match transform_text(&registry, root, direction, &text)? {
        Ok(value) => {
            println!("{}", opts.render(&value)?);
            Ok(0)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(1)
        }
    }
}

/// Parse `text` and transform it against `root`.
///
/// The outer `Result` carries input and parse errors; the inner one the
/// transform outcome. Decoded timestamps are rendered as wire strings.
pub fn transform_text(
    registry: &Registry,
    root: &str,
    direction: Direction,
    text: &str,
) -> Result<Result<Value, TransformError>> {
    let value: Value = serde_json::from_str(text).context("input is not valid JSON")?;
    tracing::info!(root, ?direction, "transforming document");
    Ok(match direction {
        Direction::Decode => registry.decode(&value, root).map(TypedValue::into_json),
        Direction::Encode => registry.encode(&TypedValue::from(value), root),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shapecast_schema::{Descriptor, ErrorKind, FieldSpec};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(
                "Event",
                Descriptor::object([
                    FieldSpec::new("startsAt", "starts_at", Descriptor::temporal()),
                    FieldSpec::same("title", Descriptor::string()),
                ]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_decode_renames_and_normalizes() {
        let out = transform_text(
            &registry(),
            "Event",
            Direction::Decode,
            r#"{"startsAt": "2024-05-01T09:00:00+02:00", "title": "launch"}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            out,
            json!({"starts_at": "2024-05-01T09:00:00.000+02:00", "title": "launch"})
        );
    }

    #[test]
    fn test_encode_restores_external_keys() {
        let out = transform_text(
            &registry(),
            "Event",
            Direction::Encode,
            r#"{"starts_at": "2024-05-01T07:00:00Z", "title": "launch"}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(out, json!({"startsAt": "2024-05-01T07:00:00.000Z", "title": "launch"}));
    }

    #[test]
    fn test_nonconforming_document_is_inner_error() {
        let err = transform_text(&registry(), "Event", Direction::Decode, r#"{"title": 3}"#)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path(), "/startsAt");
    }

    #[test]
    fn test_unknown_root_is_inner_error() {
        let err = transform_text(&registry(), "Ghost", Direction::Decode, "{}")
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSchema);
    }

    #[test]
    fn test_bad_json_is_outer_error() {
        assert!(transform_text(&registry(), "Event", Direction::Decode, "{").is_err());
    }

    #[test]
    fn test_run_decode_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let schemas = dir.path().join("schemas.json");
        std::fs::write(
            &schemas,
            r#"{"Tag": {"enum": ["alpha", "beta"]}}"#,
        )
        .unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#""alpha""#).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#""gamma""#).unwrap();

        let opts = Options {
            registry: Some(schemas),
            root: Some("Tag".to_string()),
            compact: true,
        };
        assert_eq!(run_decode(&TransformArgs { input: good }, &opts).unwrap(), 0);
        assert_eq!(run_decode(&TransformArgs { input: bad }, &opts).unwrap(), 1);
    }
}
