//! Bounding boxes, given explicitly or derived from GeoJSON.

use crate::error::GeotagError;
use geo::{
    geometry::{Coord, MultiPoint, Point, Rect},
    BoundingRect,
};
use geojson::{GeoJson, Geometry, Value};
use std::{
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

/// Latitude/longitude bounds in decimal degrees.
///
/// Field order follows the command line and manifest convention:
/// `(min_lat, min_lon, max_lat, max_lon)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns `true` if `point` (x: longitude, y: latitude) is inside
    /// or on the edge of this box.
    pub fn contains(&self, point: Point<f64>) -> bool {
        let (lon, lat) = point.x_y();
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Returns the envelope of every polygon outer ring in `json`.
    ///
    /// Holes are ignored. Returns `None` if `json` has no polygons.
    pub fn from_geojson(json: &GeoJson) -> Option<Self> {
        let mut coords = Vec::new();
        match json {
            GeoJson::FeatureCollection(collection) => {
                for feature in &collection.features {
                    if let Some(geometry) = &feature.geometry {
                        outer_rings(geometry, &mut coords);
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    outer_rings(geometry, &mut coords);
                }
            }
            GeoJson::Geometry(geometry) => outer_rings(geometry, &mut coords),
        }
        MultiPoint::from(coords).bounding_rect().map(Self::from)
    }

    /// Reads a GeoJSON document and returns its envelope; see
    /// [`BBox::from_geojson`].
    pub fn from_reader(rdr: impl Read) -> Result<Option<Self>, GeotagError> {
        let json = GeoJson::from_reader(rdr)?;
        Ok(Self::from_geojson(&json))
    }
}

impl From<Rect<f64>> for BBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min_lat={} min_lon={} max_lat={} max_lon={}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Collects outer ring coordinates of polygonal geometries.
fn outer_rings(geometry: &Geometry, coords: &mut Vec<Coord<f64>>) {
    let mut push_ring = |ring: Option<&Vec<Vec<f64>>>| {
        coords.extend(ring.into_iter().flatten().filter_map(|pos| match pos[..] {
            [lon, lat, ..] => Some(Coord { x: lon, y: lat }),
            _ => None,
        }));
    };
    match &geometry.value {
        Value::Polygon(rings) => push_ring(rings.first()),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                push_ring(rings.first());
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                outer_rings(geometry, coords);
            }
        }
        Value::Point(_)
        | Value::MultiPoint(_)
        | Value::LineString(_)
        | Value::MultiLineString(_) => {}
    }
}

/// Where the active bounding box comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BboxSource {
    Explicit(BBox),
    GeoJson(PathBuf),
}

impl BboxSource {
    /// Returns the single source given; it is a usage error to give
    /// both or neither.
    pub fn from_args(bbox: Option<BBox>, geojson: Option<PathBuf>) -> Result<Self, GeotagError> {
        match (bbox, geojson) {
            (Some(bbox), None) => Ok(Self::Explicit(bbox)),
            (None, Some(path)) => Ok(Self::GeoJson(path)),
            (Some(_), Some(_)) => Err(GeotagError::Usage(
                "both --bbox and --geojson cannot be provided simultaneously",
            )),
            (None, None) => Err(GeotagError::Usage(
                "either --bbox or --geojson must be provided",
            )),
        }
    }

    pub fn resolve(&self) -> Result<BBox, GeotagError> {
        match self {
            Self::Explicit(bbox) => Ok(*bbox),
            Self::GeoJson(path) => open(path)?.ok_or_else(|| GeotagError::NoPolygon(path.clone())),
        }
    }
}

fn open(path: &Path) -> Result<Option<BBox>, GeotagError> {
    BBox::from_reader(BufReader::new(File::open(path)?))
}
