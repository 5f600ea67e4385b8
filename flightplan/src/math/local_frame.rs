//! Locally flat metric frame around a reference coordinate.
//!
//! Good enough for laying out waylines across a single survey task
//! (a few kilometers across); distortion grows with distance from the
//! reference latitude.

use geo::geometry::Coord;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    origin: Coord<f64>,
    m_per_deg_x: f64,
    m_per_deg_y: f64,
}

impl LocalFrame {
    /// Returns a frame with `origin` at (0, 0), scaled for the
    /// latitude `ref_lat`.
    pub fn new(origin: Coord<f64>, ref_lat: f64) -> Self {
        Self {
            origin,
            m_per_deg_x: METERS_PER_DEGREE * ref_lat.to_radians().cos(),
            m_per_deg_y: METERS_PER_DEGREE,
        }
    }

    /// Geographic (lon, lat) degrees to local (east, north) meters.
    pub fn to_local(&self, Coord { x, y }: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (x - self.origin.x) * self.m_per_deg_x,
            y: (y - self.origin.y) * self.m_per_deg_y,
        }
    }

    /// Local (east, north) meters to geographic (lon, lat) degrees.
    pub fn to_geo(&self, Coord { x, y }: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.origin.x + x / self.m_per_deg_x,
            y: self.origin.y + y / self.m_per_deg_y,
        }
    }
}
