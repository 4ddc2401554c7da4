//! # shapecast-launches — Launch List Schema & Typed Model
//!
//! The descriptor registry for one page of a spaceflight launch list API,
//! the matching typed structs, and text-level convert helpers:
//!
//! - [`to_launch_page`] — JSON text → validated [`LaunchPage`].
//! - [`launch_page_to_json`] — [`LaunchPage`] → validated, pretty JSON text
//!   with the upstream key names.
//!
//! The schema itself is data ([`schema::registry`]); all checking is done
//! by `shapecast-schema`.
//!
//! Fetching pages is out of scope.

pub mod convert;
pub mod model;
pub mod schema;

pub use convert::{launch_page_to_json, to_launch_page, Convert, LaunchError};
pub use model::{
    Core, DatePrecision, Failure, Fairings, Flickr, Launch, LaunchPage, Launchpad, Links, Patch,
    Reddit, Rocket,
};
pub use schema::{registry, ROOT};
