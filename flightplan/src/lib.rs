//! # Survey Flight Planning
//!
//! `flightplan` turns an area of interest into square survey tasks
//! and writes a waypoint mission per task:
//!
//! 1. [`grid`] splits the area into cells, flattens multi-part cells
//!    and drops slivers.
//! 2. [`params`] derives wayline spacing and photo timing from camera
//!    and flight settings.
//! 3. [`waypoints`] sweeps each task with alternating waylines.
//! 4. [`mission`] writes DJI WPML documents and zips them together.

pub mod aoi;
mod error;
pub mod grid;
mod math;
pub mod mission;
pub mod params;
pub mod waypoints;

pub use crate::{
    error::FlightPlanError,
    grid::SquareGrid,
    mission::{Capture, FinishAction, Mission, MissionConfig},
    params::{Camera, FlightParams},
    waypoints::Waypoint,
};
pub use geo;
