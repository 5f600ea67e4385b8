//! Survey geometry derived from camera and flight settings.

use crate::error::FlightPlanError;

/// Camera sensor and image characteristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Physical sensor width in millimeters.
    pub sensor_width_mm: f64,

    /// Lens focal length in millimeters.
    pub focal_length_mm: f64,

    /// Image width (cross-track) in pixels.
    pub image_width_px: u32,

    /// Image height (along-track) in pixels.
    pub image_height_px: u32,
}

impl Camera {
    /// DJI Mini 4 Pro: 1/1.3" CMOS, 24mm equivalent, 8064×6048.
    pub const DJI_MINI_4_PRO: Camera = Camera {
        sensor_width_mm: 9.6,
        focal_length_mm: 24.0,
        image_width_px: 8064,
        image_height_px: 6048,
    };
}

impl Default for Camera {
    fn default() -> Self {
        Self::DJI_MINI_4_PRO
    }
}

/// Returns the ground sample distance in meters per pixel.
///
/// Sensor width and focal length share a unit, so millimeters cancel
/// and the result carries the unit of `altitude_m`.
pub fn gsd(
    sensor_width_mm: f64,
    altitude_m: f64,
    focal_length_mm: f64,
    image_width_px: u32,
) -> f64 {
    (sensor_width_mm * altitude_m) / (focal_length_mm * f64::from(image_width_px))
}

/// Returns the cross-track distance, in meters, between adjacent
/// waylines so neighboring swaths share `side_overlap` (a fraction in
/// `[0, 1)`) of their width.
pub fn wayline_spacing(gsd_m: f64, side_overlap: f64, image_width_px: u32) -> f64 {
    gsd_m * f64::from(image_width_px) * (1.0 - side_overlap)
}

/// Returns the along-track distance, in meters, between consecutive
/// photos so they share `front_overlap` of their footprint.
pub fn photo_spacing(gsd_m: f64, front_overlap: f64, image_height_px: u32) -> f64 {
    gsd_m * f64::from(image_height_px) * (1.0 - front_overlap)
}

/// Returns the time, in seconds, between shutter triggers at
/// `speed_ms`.
pub fn image_interval(gsd_m: f64, speed_ms: f64, front_overlap: f64, image_height_px: u32) -> f64 {
    photo_spacing(gsd_m, front_overlap, image_height_px) / speed_ms
}

/// Derived survey geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParams {
    pub altitude_m: f64,
    pub speed_ms: f64,
    pub gsd_m: f64,
    pub wayline_spacing_m: f64,
    pub photo_spacing_m: f64,
    pub image_interval_s: f64,
}

impl FlightParams {
    pub fn builder() -> FlightParamsBuilder {
        FlightParamsBuilder {
            camera: Camera::default(),
            altitude_m: None,
            speed_ms: None,
            side_overlap_pct: 0.0,
            front_overlap_pct: 0.0,
        }
    }
}

pub struct FlightParamsBuilder {
    /// Camera (defaults to DJI Mini 4 Pro).
    camera: Camera,

    /// Flight altitude above the takeoff point (meters, required).
    altitude_m: Option<f64>,

    /// Cruise speed along waylines (m/s, required).
    speed_ms: Option<f64>,

    /// Cross-track image overlap (percent, defaults to 0).
    side_overlap_pct: f64,

    /// Along-track image overlap (percent, defaults to 0).
    front_overlap_pct: f64,
}

impl FlightParamsBuilder {
    #[must_use]
    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Flight altitude above the takeoff point (meters, required).
    #[must_use]
    pub fn altitude(mut self, meters: f64) -> Self {
        self.altitude_m = Some(meters);
        self
    }

    /// Cruise speed along waylines (m/s, required).
    #[must_use]
    pub fn speed(mut self, meters_per_sec: f64) -> Self {
        self.speed_ms = Some(meters_per_sec);
        self
    }

    /// Cross-track image overlap (percent, defaults to 0).
    #[must_use]
    pub fn side_overlap(mut self, percent: f64) -> Self {
        self.side_overlap_pct = percent;
        self
    }

    /// Along-track image overlap (percent, defaults to 0).
    #[must_use]
    pub fn front_overlap(mut self, percent: f64) -> Self {
        self.front_overlap_pct = percent;
        self
    }

    pub fn build(&self) -> Result<FlightParams, FlightPlanError> {
        let altitude_m = self.altitude_m.ok_or(FlightPlanError::Builder("altitude"))?;
        let speed_ms = self.speed_ms.ok_or(FlightPlanError::Builder("speed"))?;
        positive("altitude", altitude_m)?;
        positive("speed", speed_ms)?;
        positive("sensor_width", self.camera.sensor_width_mm)?;
        positive("focal_length", self.camera.focal_length_mm)?;
        positive("image_width", f64::from(self.camera.image_width_px))?;
        positive("image_height", f64::from(self.camera.image_height_px))?;
        let side_overlap = overlap_fraction("side_overlap", self.side_overlap_pct)?;
        let front_overlap = overlap_fraction("front_overlap", self.front_overlap_pct)?;

        let Camera {
            sensor_width_mm,
            focal_length_mm,
            image_width_px,
            image_height_px,
        } = self.camera;

        let gsd_m = gsd(sensor_width_mm, altitude_m, focal_length_mm, image_width_px);
        Ok(FlightParams {
            altitude_m,
            speed_ms,
            gsd_m,
            wayline_spacing_m: wayline_spacing(gsd_m, side_overlap, image_width_px),
            photo_spacing_m: photo_spacing(gsd_m, front_overlap, image_height_px),
            image_interval_s: image_interval(gsd_m, speed_ms, front_overlap, image_height_px),
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, FlightPlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FlightPlanError::Param { name, value })
    }
}

/// Percent in `[0, 100)` to a fraction.
fn overlap_fraction(name: &'static str, percent: f64) -> Result<f64, FlightPlanError> {
    if (0.0..100.0).contains(&percent) {
        Ok(percent / 100.0)
    } else {
        Err(FlightPlanError::Param {
            name,
            value: percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{gsd, image_interval, wayline_spacing, Camera, FlightParams};
    use crate::error::FlightPlanError;
    use approx::assert_relative_eq;

    #[test]
    fn test_gsd_mini_4_pro() {
        let cam = Camera::DJI_MINI_4_PRO;
        let gsd_m = gsd(cam.sensor_width_mm, 80.0, cam.focal_length_mm, cam.image_width_px);
        // 9.6 * 80 / (24 * 8064)
        assert_relative_eq!(gsd_m, 0.003_968_253_968_253_968, epsilon = 1e-15);
    }

    #[test]
    fn test_gsd_linear_in_altitude() {
        let cam = Camera::DJI_MINI_4_PRO;
        for altitude in [10.0, 35.5, 80.0, 120.0] {
            let single = gsd(
                cam.sensor_width_mm,
                altitude,
                cam.focal_length_mm,
                cam.image_width_px,
            );
            let double = gsd(
                cam.sensor_width_mm,
                2.0 * altitude,
                cam.focal_length_mm,
                cam.image_width_px,
            );
            assert_relative_eq!(double, 2.0 * single, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_spacing_and_interval() {
        // Footprint of 32m across, 24m along.
        let gsd_m = 0.004;
        assert_relative_eq!(wayline_spacing(gsd_m, 0.2, 8000), 25.6, epsilon = 1e-9);
        assert_relative_eq!(wayline_spacing(gsd_m, 0.0, 8000), 32.0, epsilon = 1e-9);
        assert_relative_eq!(image_interval(gsd_m, 10.0, 0.5, 6000), 1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_builder() {
        let params = FlightParams::builder()
            .altitude(80.0)
            .speed(10.0)
            .side_overlap(20.0)
            .front_overlap(20.0)
            .build()
            .unwrap();
        assert_relative_eq!(params.wayline_spacing_m, 25.6, epsilon = 1e-9);
        assert_relative_eq!(params.photo_spacing_m, 19.2, epsilon = 1e-9);
        assert_relative_eq!(params.image_interval_s, 1.92, epsilon = 1e-9);
    }

    #[test]
    fn test_builder_is_deterministic() {
        let builder = FlightParams::builder()
            .altitude(61.0)
            .speed(7.5)
            .side_overlap(70.0)
            .front_overlap(80.0);
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        assert!(matches!(
            FlightParams::builder().speed(10.0).build(),
            Err(FlightPlanError::Builder("altitude"))
        ));
        assert!(matches!(
            FlightParams::builder().altitude(80.0).speed(0.0).build(),
            Err(FlightPlanError::Param { name: "speed", .. })
        ));
        assert!(matches!(
            FlightParams::builder()
                .altitude(80.0)
                .speed(10.0)
                .side_overlap(100.0)
                .build(),
            Err(FlightPlanError::Param {
                name: "side_overlap",
                ..
            })
        ));
    }
}
