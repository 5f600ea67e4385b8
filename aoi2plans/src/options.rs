use clap::{Parser, ValueEnum};
use flightplan::FinishAction;
use std::path::PathBuf;

/// Split an area of interest into square tasks and write a waypoint
/// mission for each.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Grid cell side, in meters.
    #[arg(short, long, default_value_t = 2000.0)]
    pub grid_side: f64,

    /// Flight altitude above the takeoff point, in meters.
    #[arg(short, long, default_value_t = 80.0)]
    pub altitude: f64,

    /// Cross-track image overlap, in percent.
    #[arg(long, default_value_t = 20.0)]
    pub side_overlap: f64,

    /// Along-track image overlap, in percent.
    #[arg(long, default_value_t = 20.0)]
    pub front_overlap: f64,

    /// Sensor width, in millimeters.
    #[arg(long, default_value_t = 9.6)]
    pub sensor_width: f64,

    /// Lens focal length, in millimeters.
    #[arg(long, default_value_t = 24.0)]
    pub focal_length: f64,

    /// Image width, in pixels.
    #[arg(long, default_value_t = 8064)]
    pub image_width: u32,

    /// Image height, in pixels.
    #[arg(long, default_value_t = 6048)]
    pub image_height: u32,

    /// Flight speed, in m/s.
    #[arg(short, long, default_value_t = 10.0)]
    pub speed: f64,

    /// Gimbal pitch, in degrees; -90 points straight down.
    #[arg(long, default_value_t = -90, allow_negative_numbers = true)]
    pub gimbal_angle: i32,

    #[arg(long, value_enum, default_value_t = Finish::GoHome)]
    pub finish_action: Finish,

    /// Take a photo at a waypoint every photo spacing instead of
    /// timed capture between wayline ends.
    #[arg(long, default_value_t = false)]
    pub each_point: bool,

    /// Area of interest GeoJSON.
    pub aoi: PathBuf,
}

/// What the aircraft does after the last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Finish {
    GoHome,
    AutoLand,
    NoAction,
    GoToFirstWaypoint,
}

impl From<Finish> for FinishAction {
    fn from(finish: Finish) -> Self {
        match finish {
            Finish::GoHome => Self::GoHome,
            Finish::AutoLand => Self::AutoLand,
            Finish::NoAction => Self::NoAction,
            Finish::GoToFirstWaypoint => Self::GoToFirstWaypoint,
        }
    }
}
