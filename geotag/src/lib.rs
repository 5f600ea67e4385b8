//! # Geotagged Photo Selection
//!
//! `geotag` picks drone photos whose EXIF GPS position falls inside a
//! bounding box and collects them, renamed per flight, for
//! photogrammetry.

pub mod bbox;
mod error;
pub mod gps;
pub mod manifest;
pub mod progress;

pub use crate::{
    bbox::{BBox, BboxSource},
    error::GeotagError,
    manifest::{Manifest, ManifestRow},
};
pub use geo;
