//! Lawnmower coverage of a task polygon.

use crate::{
    error::FlightPlanError,
    math::{linspace, LocalFrame},
};
use geo::{
    geometry::{Coord, LineString, Polygon},
    BoundingRect,
};

/// Heading, in degrees, of an eastbound wayline.
pub const HEADING_EAST: f64 = 90.0;

/// Heading, in degrees, of a westbound wayline.
pub const HEADING_WEST: f64 = -90.0;

/// A point on the flight path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Longitude (x) and latitude (y) in degrees.
    pub coord: Coord<f64>,

    /// Direction of travel, in degrees clockwise from north, within
    /// (-180, 180].
    pub heading: f64,
}

/// Returns waypoints covering `polygon` with east-west waylines
/// `spacing_m` apart, in flight order.
///
/// Waylines alternate direction. Each crossing of a wayline through
/// the polygon contributes its two boundary endpoints; when
/// `sample_m` is given, points are also placed along the crossing
/// no more than `sample_m` apart.
pub fn generate(
    polygon: &Polygon<f64>,
    spacing_m: f64,
    sample_m: Option<f64>,
) -> Result<Vec<Waypoint>, FlightPlanError> {
    check_distance("wayline_spacing", spacing_m)?;
    if let Some(sample_m) = sample_m {
        check_distance("sample_spacing", sample_m)?;
    }

    let Some(extent) = polygon.bounding_rect() else {
        return Ok(Vec::new());
    };
    let frame = LocalFrame::new(extent.min(), extent.center().y);
    let local = project(polygon, &frame);
    let height_m = frame.to_local(extent.max()).y;

    let mut waypoints = Vec::new();
    for (line_idx, y) in wayline_offsets(height_m, spacing_m).enumerate() {
        let eastbound = line_idx % 2 == 0;
        let heading = if eastbound { HEADING_EAST } else { HEADING_WEST };
        let mut crossings = crossings(&local, y);
        if !eastbound {
            crossings.reverse();
        }
        for (x0, x1) in crossings {
            let (start, end) = if eastbound { (x0, x1) } else { (x1, x0) };
            let n = match sample_m {
                Some(sample_m) => ((x1 - x0) / sample_m).ceil().max(1.0) as usize + 1,
                None => 2,
            };
            waypoints.extend(linspace(start, end, n).map(|x| Waypoint {
                coord: frame.to_geo(Coord { x, y }),
                heading,
            }));
        }
    }
    Ok(waypoints)
}

fn check_distance(name: &'static str, value: f64) -> Result<(), FlightPlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlightPlanError::Param { name, value })
    }
}

/// Northings of each wayline, centered within `height_m`.
fn wayline_offsets(height_m: f64, spacing_m: f64) -> impl Iterator<Item = f64> {
    let n = ((height_m / spacing_m).ceil() as usize).max(1);
    #[allow(clippy::cast_precision_loss)]
    let first = (height_m - (n - 1) as f64 * spacing_m) / 2.0;
    (0..n).map(move |i| first + i as f64 * spacing_m)
}

/// Polygon rings in local meters.
fn project(polygon: &Polygon<f64>, frame: &LocalFrame) -> Vec<LineString<f64>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| frame.to_local(*c)).collect())
        .collect()
}

/// West-to-east `(x0, x1)` intervals where the line at northing `y`
/// is inside the polygon, ordered west to east.
///
/// Edges are treated as half-open in y, so a vertex on the line is
/// counted once. Zero-length intervals (the line grazing a vertex)
/// are dropped.
fn crossings(rings: &[LineString<f64>], y: f64) -> Vec<(f64, f64)> {
    let mut xs: Vec<f64> = rings
        .iter()
        .flat_map(|ring| ring.lines())
        .filter(|line| (line.start.y <= y) != (line.end.y <= y))
        .map(|line| {
            let t = (y - line.start.y) / (line.end.y - line.start.y);
            line.start.x + t * (line.end.x - line.start.x)
        })
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(x0, x1)| x1 - x0 > f64::EPSILON)
        .collect()
}
