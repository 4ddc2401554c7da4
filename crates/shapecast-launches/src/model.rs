//! Typed model of a launch list page.
//!
//! Field names match the internal keys of [`crate::schema`]; serde maps
//! between these structs and decoded [`shapecast_core::TypedValue`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shapecast_core::Timestamp;

/// One page of the launch list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPage {
    pub docs: Vec<Launch>,
    pub total_docs: i64,
    pub offset: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub page: i64,
    pub paging_counter: i64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub fairings: Option<Fairings>,
    pub links: Links,
    pub static_fire_date_utc: Option<Timestamp>,
    pub static_fire_date_unix: Option<i64>,
    pub net: bool,
    pub window: i64,
    pub rocket: Rocket,
    pub success: bool,
    pub failures: Vec<Failure>,
    pub details: Option<String>,
    pub crew: Vec<Value>,
    pub ships: Vec<String>,
    pub capsules: Vec<String>,
    pub payloads: Vec<String>,
    pub launchpad: Launchpad,
    pub flight_number: i64,
    pub name: String,
    pub date_utc: Timestamp,
    pub date_unix: i64,
    /// Launch time in the launch site's local offset.
    pub date_local: Timestamp,
    pub date_precision: DatePrecision,
    pub upcoming: bool,
    pub cores: Vec<Core>,
    pub auto_update: bool,
    pub tbd: bool,
    pub launch_library_id: Option<String>,
    pub id: String,
}

/// A first-stage core flown on a launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core {
    pub core: String,
    pub flight: i64,
    pub gridfins: bool,
    pub legs: bool,
    pub reused: bool,
    pub landing_attempt: bool,
    pub landing_success: Option<bool>,
    pub landing_type: Option<String>,
    pub landpad: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Seconds after liftoff.
    pub time: i64,
    /// Kilometres.
    pub altitude: Option<i64>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fairings {
    pub reused: Option<bool>,
    pub recovery_attempt: Option<bool>,
    pub recovered: Option<bool>,
    pub ships: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    pub patch: Patch,
    pub reddit: Reddit,
    pub flickr: Flickr,
    pub presskit: Option<String>,
    pub webcast: String,
    pub youtube_id: String,
    pub article: String,
    pub wikipedia: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flickr {
    pub small: Vec<Value>,
    pub original: Vec<Value>,
}

/// Mission patch image URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub small: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reddit {
    pub campaign: Option<String>,
    pub launch: Option<String>,
    pub media: Option<String>,
    pub recovery: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    Hour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Launchpad {
    #[serde(rename = "5e9e4501f509094ba4566f84")]
    CcsfsSlc40,
    #[serde(rename = "5e9e4502f509092b78566f87")]
    VafbSlc4e,
    #[serde(rename = "5e9e4502f5090995de566f86")]
    KwajaleinAtoll,
}

impl Launchpad {
    /// The upstream identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::CcsfsSlc40 => "5e9e4501f509094ba4566f84",
            Self::VafbSlc4e => "5e9e4502f509092b78566f87",
            Self::KwajaleinAtoll => "5e9e4502f5090995de566f86",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rocket {
    #[serde(rename = "5e9d0d95eda69955f709d1eb")]
    Falcon1,
    #[serde(rename = "5e9d0d95eda69973a809d1ec")]
    Falcon9,
}

impl Rocket {
    /// The upstream identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Falcon1 => "5e9d0d95eda69955f709d1eb",
            Self::Falcon9 => "5e9d0d95eda69973a809d1ec",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_ids_match_serde_names() {
        for pad in [Launchpad::CcsfsSlc40, Launchpad::VafbSlc4e, Launchpad::KwajaleinAtoll] {
            assert_eq!(serde_json::to_value(pad).unwrap(), Value::from(pad.id()));
        }
        for rocket in [Rocket::Falcon1, Rocket::Falcon9] {
            assert_eq!(serde_json::to_value(rocket).unwrap(), Value::from(rocket.id()));
        }
        assert_eq!(serde_json::to_value(DatePrecision::Hour).unwrap(), Value::from("hour"));
    }
}
