//! DJI WPML waypoint mission documents.
//!
//! # References
//!
//! 1. [DJI WPML](https://developer.dji.com/doc/cloud-api-tutorial/en/api-reference/dji-wpml/overview.html)

use crate::{error::FlightPlanError, waypoints::Waypoint};
use geo::geometry::Coord;
use log::debug;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use zip::{write::SimpleFileOptions, ZipWriter};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";
const WPML_NS: &str = "http://www.dji.com/wpmz/1.0.2";

/// Mission file extension.
pub const EXTENSION: &str = "wpml";

/// What the aircraft does after the last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishAction {
    #[default]
    GoHome,
    AutoLand,
    NoAction,
    GoToFirstWaypoint,
}

impl FinishAction {
    pub fn as_wpml(self) -> &'static str {
        match self {
            Self::GoHome => "goHome",
            Self::AutoLand => "autoLand",
            Self::NoAction => "noAction",
            Self::GoToFirstWaypoint => "gotoFirstWaypoint",
        }
    }
}

/// When photos are taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capture {
    /// One photo on arrival at every waypoint.
    EachPoint,

    /// Timed photos, every given number of seconds, for the whole
    /// mission.
    Interval(f64),
}

/// A single waypoint as flown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placemark {
    /// Longitude (x) and latitude (y) in degrees.
    pub coord: Coord<f64>,

    /// Height above the takeoff point in meters.
    pub altitude_m: f64,

    pub speed_ms: f64,

    /// Aircraft heading in whole degrees.
    pub heading: i32,

    /// Gimbal pitch in whole degrees; -90 points straight down.
    pub gimbal_pitch: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub placemarks: Vec<Placemark>,
    pub finish_action: FinishAction,
    pub capture: Capture,
}

/// Per-mission flight settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionConfig {
    pub altitude_m: f64,
    pub speed_ms: f64,
    pub gimbal_pitch: i32,
    pub finish_action: FinishAction,
    pub capture: Capture,
}

impl Mission {
    pub fn new(waypoints: &[Waypoint], config: &MissionConfig) -> Self {
        let placemarks = waypoints
            .iter()
            .map(|wp| Placemark {
                coord: wp.coord,
                altitude_m: config.altitude_m,
                speed_ms: config.speed_ms,
                heading: wp.heading.round() as i32,
                gimbal_pitch: config.gimbal_pitch,
            })
            .collect();
        Self {
            placemarks,
            finish_action: config.finish_action,
            capture: config.capture,
        }
    }

    /// Serializes this mission as a WPML document.
    pub fn write<W: Write>(&self, out: W) -> Result<(), FlightPlanError> {
        let mut xml = Writer::new_with_indent(out, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::Start(
            BytesStart::new("kml").with_attributes([("xmlns", KML_NS), ("xmlns:wpml", WPML_NS)]),
        ))?;
        start(&mut xml, "Document")?;

        let transit_speed = self.placemarks.first().map_or(0.0, |p| p.speed_ms);
        start(&mut xml, "wpml:missionConfig")?;
        text(&mut xml, "wpml:flyToWaylineMode", "safely")?;
        text(&mut xml, "wpml:finishAction", self.finish_action.as_wpml())?;
        text(&mut xml, "wpml:exitOnRCLost", "executeLostAction")?;
        text(&mut xml, "wpml:executeRCLostAction", "goBack")?;
        text(&mut xml, "wpml:globalTransitionalSpeed", transit_speed)?;
        end(&mut xml, "wpml:missionConfig")?;

        start(&mut xml, "Folder")?;
        text(&mut xml, "wpml:templateId", 0)?;
        text(&mut xml, "wpml:executeHeightMode", "relativeToStartPoint")?;
        text(&mut xml, "wpml:waylineId", 0)?;
        text(&mut xml, "wpml:autoFlightSpeed", transit_speed)?;
        for (index, placemark) in self.placemarks.iter().enumerate() {
            self.write_placemark(&mut xml, index, placemark)?;
        }
        end(&mut xml, "Folder")?;

        end(&mut xml, "Document")?;
        end(&mut xml, "kml")?;
        xml.into_inner().flush()?;
        Ok(())
    }

    fn write_placemark<W: Write>(
        &self,
        xml: &mut Writer<W>,
        index: usize,
        placemark: &Placemark,
    ) -> Result<(), FlightPlanError> {
        let Placemark {
            coord,
            altitude_m,
            speed_ms,
            heading,
            gimbal_pitch,
        } = *placemark;

        start(xml, "Placemark")?;
        start(xml, "Point")?;
        text(xml, "coordinates", format!("{},{}", coord.x, coord.y))?;
        end(xml, "Point")?;
        text(xml, "wpml:index", index)?;
        text(xml, "wpml:executeHeight", altitude_m)?;
        text(xml, "wpml:waypointSpeed", speed_ms)?;

        start(xml, "wpml:waypointHeadingParam")?;
        text(xml, "wpml:waypointHeadingMode", "fixed")?;
        text(xml, "wpml:waypointHeadingAngle", heading)?;
        end(xml, "wpml:waypointHeadingParam")?;

        start(xml, "wpml:waypointTurnParam")?;
        text(
            xml,
            "wpml:waypointTurnMode",
            "toPointAndStopWithDiscontinuityCurvature",
        )?;
        text(xml, "wpml:waypointTurnDampingDist", 0)?;
        end(xml, "wpml:waypointTurnParam")?;

        // Group 0: point the gimbal (and shoot, if per point) on arrival.
        start(xml, "wpml:actionGroup")?;
        text(xml, "wpml:actionGroupId", 0)?;
        text(xml, "wpml:actionGroupStartIndex", index)?;
        text(xml, "wpml:actionGroupEndIndex", index)?;
        text(xml, "wpml:actionGroupMode", "sequence")?;
        start(xml, "wpml:actionTrigger")?;
        text(xml, "wpml:actionTriggerType", "reachPoint")?;
        end(xml, "wpml:actionTrigger")?;
        gimbal_action(xml, 0, gimbal_pitch)?;
        if self.capture == Capture::EachPoint {
            photo_action(xml, 1)?;
        }
        end(xml, "wpml:actionGroup")?;

        // Group 1: timed capture over the whole wayline.
        if let (Capture::Interval(secs), 0) = (self.capture, index) {
            start(xml, "wpml:actionGroup")?;
            text(xml, "wpml:actionGroupId", 1)?;
            text(xml, "wpml:actionGroupStartIndex", 0)?;
            text(
                xml,
                "wpml:actionGroupEndIndex",
                self.placemarks.len().saturating_sub(1),
            )?;
            text(xml, "wpml:actionGroupMode", "sequence")?;
            start(xml, "wpml:actionTrigger")?;
            text(xml, "wpml:actionTriggerType", "multipleTiming")?;
            text(xml, "wpml:actionTriggerParam", format!("{secs:.2}"))?;
            end(xml, "wpml:actionTrigger")?;
            photo_action(xml, 0)?;
            end(xml, "wpml:actionGroup")?;
        }

        end(xml, "Placemark")?;
        Ok(())
    }
}

fn gimbal_action<W: Write>(
    xml: &mut Writer<W>,
    action_id: usize,
    pitch: i32,
) -> Result<(), FlightPlanError> {
    start(xml, "wpml:action")?;
    text(xml, "wpml:actionId", action_id)?;
    text(xml, "wpml:actionActuatorFunc", "gimbalRotate")?;
    start(xml, "wpml:actionActuatorFuncParam")?;
    text(xml, "wpml:gimbalRotateMode", "absoluteAngle")?;
    text(xml, "wpml:gimbalPitchRotateEnable", 1)?;
    text(xml, "wpml:gimbalPitchRotateAngle", pitch)?;
    text(xml, "wpml:payloadPositionIndex", 0)?;
    end(xml, "wpml:actionActuatorFuncParam")?;
    end(xml, "wpml:action")?;
    Ok(())
}

fn photo_action<W: Write>(xml: &mut Writer<W>, action_id: usize) -> Result<(), FlightPlanError> {
    start(xml, "wpml:action")?;
    text(xml, "wpml:actionId", action_id)?;
    text(xml, "wpml:actionActuatorFunc", "takePhoto")?;
    start(xml, "wpml:actionActuatorFuncParam")?;
    text(xml, "wpml:payloadPositionIndex", 0)?;
    end(xml, "wpml:actionActuatorFuncParam")?;
    end(xml, "wpml:action")?;
    Ok(())
}

fn start<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<(), FlightPlanError> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<(), FlightPlanError> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Writes `<name>value</name>`.
fn text<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    value: impl ToString,
) -> Result<(), FlightPlanError> {
    start(xml, name)?;
    xml.write_event(Event::Text(BytesText::new(&value.to_string())))?;
    end(xml, name)
}

/// Returns the base name, without extension, of the mission for the
/// task at zero-based `index`.
pub fn task_name(index: usize) -> String {
    format!("task-{}", index + 1)
}

/// Writes `mission` to `<dir>/task-<index + 1>.wpml` and returns the
/// file's path.
pub fn write_file(dir: &Path, index: usize, mission: &Mission) -> Result<PathBuf, FlightPlanError> {
    let path = dir.join(format!("{}.{EXTENSION}", task_name(index)));
    let file = File::create(&path)?;
    mission.write(BufWriter::new(file))?;
    debug!("wrote {} waypoints to {}", mission.placemarks.len(), path.display());
    Ok(path)
}

/// Bundles `paths` into a zip archive at `archive`.
///
/// Entries are named by file name only; directories are stripped.
pub fn bundle<P: AsRef<Path>>(paths: &[P], archive: &Path) -> Result<(), FlightPlanError> {
    let mut zip = ZipWriter::new(File::create(archive)?);
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a file name: {}", path.display()),
                )
            })?;
        zip.start_file(name.to_string(), SimpleFileOptions::default())?;
        io::copy(&mut File::open(path)?, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}
