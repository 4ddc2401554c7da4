//! # Launch List Schema
//!
//! Descriptors for one page of the launch list API. Page-level keys are
//! camelCase on the wire and snake_case on the typed side; everything
//! below the page already uses snake_case and keeps its name. Every object
//! rejects keys it does not declare.
//!
//! Fields the upstream sample only ever showed as `null` are declared as
//! `string | null` (page pointers as `number | null`).

use shapecast_schema::{Descriptor, FieldSpec, Registry, RegistryError};

/// Name of the root schema.
pub const ROOT: &str = "LaunchPage";

/// Build the launch list registry.
///
/// # Errors
///
/// Only if a descriptor below is malformed; the table is static.
pub fn registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    for (name, descriptor) in schemas() {
        registry.register(name, descriptor)?;
    }
    Ok(registry)
}

fn schemas() -> Vec<(&'static str, Descriptor)> {
    use Descriptor as D;

    let nullable_string = || D::nullable(D::string());

    vec![
        (
            ROOT,
            D::object([
                FieldSpec::same("docs", D::array(D::reference("Launch"))),
                FieldSpec::new("totalDocs", "total_docs", D::number()),
                FieldSpec::same("offset", D::number()),
                FieldSpec::same("limit", D::number()),
                FieldSpec::new("totalPages", "total_pages", D::number()),
                FieldSpec::same("page", D::number()),
                FieldSpec::new("pagingCounter", "paging_counter", D::number()),
                FieldSpec::new("hasPrevPage", "has_prev_page", D::boolean()),
                FieldSpec::new("hasNextPage", "has_next_page", D::boolean()),
                FieldSpec::new("prevPage", "prev_page", D::nullable(D::number())),
                FieldSpec::new("nextPage", "next_page", D::nullable(D::number())),
            ]),
        ),
        (
            "Launch",
            D::object([
                FieldSpec::same("fairings", D::nullable(D::reference("Fairings"))),
                FieldSpec::same("links", D::reference("Links")),
                FieldSpec::same("static_fire_date_utc", D::nullable(D::temporal())),
                FieldSpec::same("static_fire_date_unix", D::nullable(D::number())),
                FieldSpec::same("net", D::boolean()),
                FieldSpec::same("window", D::number()),
                FieldSpec::same("rocket", D::reference("Rocket")),
                FieldSpec::same("success", D::boolean()),
                FieldSpec::same("failures", D::array(D::reference("Failure"))),
                FieldSpec::same("details", nullable_string()),
                FieldSpec::same("crew", D::array(D::any())),
                FieldSpec::same("ships", D::array(D::string())),
                FieldSpec::same("capsules", D::array(D::string())),
                FieldSpec::same("payloads", D::array(D::string())),
                FieldSpec::same("launchpad", D::reference("Launchpad")),
                FieldSpec::same("flight_number", D::number()),
                FieldSpec::same("name", D::string()),
                FieldSpec::same("date_utc", D::temporal()),
                FieldSpec::same("date_unix", D::number()),
                FieldSpec::same("date_local", D::temporal()),
                FieldSpec::same("date_precision", D::reference("DatePrecision")),
                FieldSpec::same("upcoming", D::boolean()),
                FieldSpec::same("cores", D::array(D::reference("Core"))),
                FieldSpec::same("auto_update", D::boolean()),
                FieldSpec::same("tbd", D::boolean()),
                FieldSpec::same("launch_library_id", nullable_string()),
                FieldSpec::same("id", D::string()),
            ]),
        ),
        (
            "Core",
            D::object([
                FieldSpec::same("core", D::string()),
                FieldSpec::same("flight", D::number()),
                FieldSpec::same("gridfins", D::boolean()),
                FieldSpec::same("legs", D::boolean()),
                FieldSpec::same("reused", D::boolean()),
                FieldSpec::same("landing_attempt", D::boolean()),
                FieldSpec::same("landing_success", D::nullable(D::boolean())),
                FieldSpec::same("landing_type", nullable_string()),
                FieldSpec::same("landpad", nullable_string()),
            ]),
        ),
        (
            "Failure",
            D::object([
                FieldSpec::same("time", D::number()),
                FieldSpec::same("altitude", D::nullable(D::number())),
                FieldSpec::same("reason", D::string()),
            ]),
        ),
        (
            "Fairings",
            D::object([
                FieldSpec::same("reused", D::nullable(D::boolean())),
                FieldSpec::same("recovery_attempt", D::nullable(D::boolean())),
                FieldSpec::same("recovered", D::nullable(D::boolean())),
                FieldSpec::same("ships", D::array(D::any())),
            ]),
        ),
        (
            "Links",
            D::object([
                FieldSpec::same("patch", D::reference("Patch")),
                FieldSpec::same("reddit", D::reference("Reddit")),
                FieldSpec::same("flickr", D::reference("Flickr")),
                FieldSpec::same("presskit", nullable_string()),
                FieldSpec::same("webcast", D::string()),
                FieldSpec::same("youtube_id", D::string()),
                FieldSpec::same("article", D::string()),
                FieldSpec::same("wikipedia", D::string()),
            ]),
        ),
        (
            "Flickr",
            D::object([
                FieldSpec::same("small", D::array(D::any())),
                FieldSpec::same("original", D::array(D::any())),
            ]),
        ),
        (
            "Patch",
            D::object([
                FieldSpec::same("small", D::string()),
                FieldSpec::same("large", D::string()),
            ]),
        ),
        (
            "Reddit",
            D::object([
                FieldSpec::same("campaign", nullable_string()),
                FieldSpec::same("launch", nullable_string()),
                FieldSpec::same("media", nullable_string()),
                FieldSpec::same("recovery", nullable_string()),
            ]),
        ),
        ("DatePrecision", D::literals(["hour"])),
        (
            "Launchpad",
            D::literals([
                "5e9e4501f509094ba4566f84",
                "5e9e4502f509092b78566f87",
                "5e9e4502f5090995de566f86",
            ]),
        ),
        (
            "Rocket",
            D::literals(["5e9d0d95eda69955f709d1eb", "5e9d0d95eda69973a809d1ec"]),
        ),
    ]
}
