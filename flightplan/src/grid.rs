//! Square task grid over an area of interest.

use crate::error::FlightPlanError;
use geo::{
    coord,
    geometry::{Geometry, MultiPolygon, Polygon, Rect},
    Area, BooleanOps, BoundingRect,
};
use log::{debug, info, warn};

/// Approximate degrees per meter.
///
/// Only valid near the equator; used for coarse cell sizing and area
/// thresholds, never for precise measurement.
pub const METERS_TO_DEGREES: f64 = 0.000_011_4;

/// Tasks smaller than this fraction of a nominal cell are discarded.
pub const MIN_AREA_FRACTION: f64 = 0.1;

/// Tasks smaller than this fraction of a nominal cell are merge
/// candidates.
pub const MERGE_AREA_FRACTION: f64 = 0.3;

/// How a candidate task compares to a nominal grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSize {
    /// Below [`MIN_AREA_FRACTION`].
    Discard,

    /// Between [`MIN_AREA_FRACTION`] and [`MERGE_AREA_FRACTION`].
    ///
    /// These would be merged into a neighbor, but merging is not
    /// implemented: they are kept as standalone tasks.
    Undersized,

    Full,
}

#[derive(Debug, Clone, Copy)]
pub struct SquareGrid {
    side_m: f64,
}

impl SquareGrid {
    pub fn new(side_m: f64) -> Result<Self, FlightPlanError> {
        if side_m.is_finite() && side_m > 0.0 {
            Ok(Self { side_m })
        } else {
            Err(FlightPlanError::Param {
                name: "grid_side",
                value: side_m,
            })
        }
    }

    /// Cell side in degrees.
    pub fn side_deg(&self) -> f64 {
        self.side_m * METERS_TO_DEGREES
    }

    /// Nominal cell area in square degrees.
    pub fn nominal_area(&self) -> f64 {
        self.side_deg().powi(2)
    }

    /// Smallest area, in square degrees, a task may have.
    pub fn min_area(&self) -> f64 {
        self.nominal_area() * MIN_AREA_FRACTION
    }

    pub fn classify(&self, area: f64) -> CellSize {
        let nominal = self.nominal_area();
        if area < nominal * MIN_AREA_FRACTION {
            CellSize::Discard
        } else if area < nominal * MERGE_AREA_FRACTION {
            CellSize::Undersized
        } else {
            CellSize::Full
        }
    }

    /// Returns every grid cell clipped to `aoi`, skipping cells that
    /// do not intersect it.
    ///
    /// The grid starts at the south-west corner of the AOI's bounding
    /// box. A clipped cell may have several parts.
    pub fn split(&self, aoi: &MultiPolygon<f64>) -> Result<Vec<Geometry<f64>>, FlightPlanError> {
        let extent = aoi.bounding_rect().ok_or(FlightPlanError::EmptyAoi)?;
        let step = self.side_deg();
        let cols = cell_count(extent.width(), step);
        let rows = cell_count(extent.height(), step);
        debug!("splitting AOI into {cols}x{rows} cells of {step}°");

        let min = extent.min();
        let mut cells = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let sw = coord! {
                    x: min.x + col as f64 * step,
                    y: min.y + row as f64 * step,
                };
                let ne = coord! { x: sw.x + step, y: sw.y + step };
                let cell = MultiPolygon::new(vec![Rect::new(sw, ne).to_polygon()]);
                let mut clipped = aoi.intersection(&cell);
                match clipped.0.len() {
                    0 => {}
                    1 => cells.push(Geometry::Polygon(clipped.0.remove(0))),
                    _ => cells.push(Geometry::MultiPolygon(clipped)),
                }
            }
        }
        Ok(cells)
    }

    /// Drops tasks below the minimum area; see [`CellSize`].
    pub fn filter_small(&self, polygons: Vec<Polygon<f64>>) -> Vec<Polygon<f64>> {
        let mut undersized = 0;
        let before = polygons.len();
        let kept: Vec<Polygon<f64>> = polygons
            .into_iter()
            .filter(|polygon| match self.classify(polygon.unsigned_area()) {
                CellSize::Discard => false,
                CellSize::Undersized => {
                    undersized += 1;
                    true
                }
                CellSize::Full => true,
            })
            .collect();
        info!(
            "kept {} of {before} task polygons, {undersized} undersized left unmerged",
            kept.len()
        );
        kept
    }

    /// Splits, decomposes and filters `aoi` into task polygons.
    pub fn tasks(&self, aoi: &MultiPolygon<f64>) -> Result<Vec<Polygon<f64>>, FlightPlanError> {
        let cells = self.split(aoi)?;
        Ok(self.filter_small(decompose(cells)))
    }
}

/// Flattens geometries into single polygons.
///
/// Each part of a multi-polygon becomes its own polygon; non-areal
/// geometries are dropped.
pub fn decompose(geometries: Vec<Geometry<f64>>) -> Vec<Polygon<f64>> {
    let mut polygons = Vec::with_capacity(geometries.len());
    for geometry in geometries {
        match geometry {
            Geometry::Polygon(polygon) => polygons.push(polygon),
            Geometry::MultiPolygon(multi) => polygons.extend(multi),
            Geometry::Rect(rect) => polygons.push(rect.to_polygon()),
            Geometry::Triangle(triangle) => polygons.push(triangle.to_polygon()),
            Geometry::GeometryCollection(collection) => {
                polygons.extend(decompose(collection.0));
            }
            Geometry::Point(_)
            | Geometry::Line(_)
            | Geometry::LineString(_)
            | Geometry::MultiPoint(_)
            | Geometry::MultiLineString(_) => {
                warn!("ignoring non-areal geometry in task grid");
            }
        }
    }
    polygons
}

/// Number of `step` sized cells needed to cover `extent`.
fn cell_count(extent: f64, step: f64) -> usize {
    // Tolerate rounding so an extent of exactly n cells is n, not n+1.
    let n = (extent / step - 1e-9).ceil();
    if n < 1.0 {
        1
    } else {
        n as usize
    }
}
