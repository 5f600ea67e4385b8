mod options;

use anyhow::{Context, Result};
use clap::Parser;
use flightplan::{
    aoi, mission, waypoints, Camera, Capture, FlightParams, Mission, MissionConfig, SquareGrid,
};
use log::info;
use options::Cli;
use rayon::prelude::*;
use std::{fs, path::PathBuf};

const GRID_FILE: &str = "output.geojson";
const BUNDLE_FILE: &str = "flightplans.zip";

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let aoi = aoi::open(&cli.aoi).with_context(|| format!("reading {}", cli.aoi.display()))?;
    fs::create_dir_all(&cli.out_dir)?;

    let grid = SquareGrid::new(cli.grid_side)?;
    let tasks = grid.tasks(&aoi)?;
    let grid_path = cli.out_dir.join(GRID_FILE);
    aoi::save_tasks(&grid_path, &tasks)
        .with_context(|| format!("writing {}", grid_path.display()))?;
    info!("{} tasks written to {}", tasks.len(), grid_path.display());

    let params = FlightParams::builder()
        .camera(Camera {
            sensor_width_mm: cli.sensor_width,
            focal_length_mm: cli.focal_length,
            image_width_px: cli.image_width,
            image_height_px: cli.image_height,
        })
        .altitude(cli.altitude)
        .speed(cli.speed)
        .side_overlap(cli.side_overlap)
        .front_overlap(cli.front_overlap)
        .build()?;
    info!("GSD: {} m/px", params.gsd_m);
    info!("wayline spacing: {} m", params.wayline_spacing_m);
    info!("image interval: {} s", params.image_interval_s);

    let (capture, sample_m) = if cli.each_point {
        (Capture::EachPoint, Some(params.photo_spacing_m))
    } else {
        (Capture::Interval(params.image_interval_s), None)
    };
    let config = MissionConfig {
        altitude_m: params.altitude_m,
        speed_ms: params.speed_ms,
        gimbal_pitch: cli.gimbal_angle,
        finish_action: cli.finish_action.into(),
        capture,
    };

    let mission_paths = tasks
        .par_iter()
        .enumerate()
        .map(|(index, task)| -> Result<PathBuf> {
            info!("processing task {} flight plan", index + 1);
            let wps = waypoints::generate(task, params.wayline_spacing_m, sample_m)?;
            let path = mission::write_file(&cli.out_dir, index, &Mission::new(&wps, &config))?;
            Ok(path)
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    let bundle_path = cli.out_dir.join(BUNDLE_FILE);
    mission::bundle(&mission_paths, &bundle_path)
        .with_context(|| format!("writing {}", bundle_path.display()))?;
    info!("all task flight plans zipped into {}", bundle_path.display());

    Ok(())
}
