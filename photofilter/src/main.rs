mod options;

use anyhow::{Context, Result};
use clap::Parser;
use geotag::{manifest, BboxSource};
use indicatif::{MultiProgress, ProgressDrawTarget};
use log::info;
use options::Cli;
use std::fs;

fn main() -> Result<()> {
    env_logger::init();
    let Cli {
        source_path,
        output_path,
        bounds,
    } = Cli::parse();

    let bbox = BboxSource::try_from(bounds)?.resolve()?;
    info!("bounding box: {bbox}");

    fs::create_dir_all(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let source_path = fs::canonicalize(&source_path)
        .with_context(|| format!("reading {}", source_path.display()))?;
    let output_path = fs::canonicalize(&output_path)?;

    let flights = manifest::flight_dirs(&source_path)?;
    info!("{} flight directories in {}", flights.len(), source_path.display());

    let csv_path = output_path.join(manifest::file_name(&chrono::Local::now()));
    let progress_group = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(4));
    let recorded = manifest::build(&flights, &csv_path, &bbox, &output_path, &progress_group)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    info!("{recorded} photos recorded in {}", csv_path.display());

    let copied = manifest::copy_files(&csv_path)?;
    info!("{copied} of {recorded} photos copied to {}", output_path.display());

    Ok(())
}
