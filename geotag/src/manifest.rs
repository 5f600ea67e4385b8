//! Two-phase photo collection.
//!
//! [`build`] scans flight directories and records every photo inside
//! the bounding box to a CSV manifest. [`copy_files`] reads a manifest
//! back and copies the photos, so copying can be repeated without
//! rescanning EXIF data.
//!
//! Manifest layout:
//!
//! ```text
//! source_path,dest_path,latitude,longitude
//! Bounding box,min_lat=40,min_lon=10,max_lat=45,max_lon=20
//! /in/flight-a/DJI_0001.JPG,/out/flight_1_DJI_0001.JPG,42.1,15.3
//! ```

use crate::{bbox::BBox, error::GeotagError, gps, progress};
use chrono::{DateTime, TimeZone};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use geo::Point;
use indicatif::{MultiProgress, ProgressBar};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

pub const HEADER: [&str; 4] = ["source_path", "dest_path", "latitude", "longitude"];

const BBOX_LABEL: &str = "Bounding box";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub latitude: f64,
    pub longitude: f64,
}

/// Returns the manifest file name for a run started at `now`.
pub fn file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("metadata_%Y%m%d_%H%M%S.csv").to_string()
}

/// Returns the immediate subdirectories of `source`, sorted by name.
/// Symlinks to directories count.
///
/// Each is one flight; flights are numbered from 1 in this order.
pub fn flight_dirs(source: &Path) -> Result<Vec<PathBuf>, GeotagError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Returns the files directly in `dir` that have an extension, sorted
/// by name.
pub fn image_files(dir: &Path) -> Result<Vec<PathBuf>, GeotagError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let is_hidden = entry.file_name().to_string_lossy().starts_with('.');
        if entry.file_type().is_file() && !is_hidden && entry.path().extension().is_some() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Returns `flight_<flight>_<stem>.<ext>` for `image`.
pub fn dest_name(flight: usize, image: &Path) -> Option<String> {
    let stem = image.file_stem()?.to_string_lossy();
    Some(match image.extension() {
        Some(ext) => format!("flight_{flight}_{stem}.{}", ext.to_string_lossy()),
        None => format!("flight_{flight}_{stem}"),
    })
}

/// Builds the manifest row for `image`, or `None` when a path cannot be
/// written to the manifest.
fn manifest_row(
    flight: usize,
    image: &Path,
    target_dir: &Path,
    point: Point,
) -> Option<ManifestRow> {
    let dest_path = target_dir.join(dest_name(flight, image)?);
    if image.to_str().is_none() || dest_path.to_str().is_none() {
        warn!("skipping {}: path is not valid UTF-8", image.display());
        return None;
    }
    Some(ManifestRow {
        source_path: image.to_path_buf(),
        dest_path,
        latitude: point.y(),
        longitude: point.x(),
    })
}

/// Returns a row for every image in `dir` whose GPS position lies in
/// `bbox`, in file name order.
///
/// Images whose paths are not valid UTF-8 are logged and skipped.
pub fn scan_flight(
    flight: usize,
    dir: &Path,
    bbox: &BBox,
    target_dir: &Path,
    progress_bar: &ProgressBar,
) -> Result<Vec<ManifestRow>, GeotagError> {
    let images = image_files(dir)?;
    progress_bar.set_length(images.len() as u64);
    let rows = images
        .par_iter()
        .map(|image| {
            let row = gps::read(image)
                .filter(|point| bbox.contains(*point))
                .and_then(|point| manifest_row(flight, image, target_dir, point));
            progress_bar.inc(1);
            row
        })
        .collect::<Vec<Option<ManifestRow>>>()
        .into_iter()
        .flatten()
        .collect();
    Ok(rows)
}

/// Scans `flight_dirs` (flight numbers start at 1) and writes a
/// manifest of in-bounds photos to `output_csv`.
///
/// Returns the number of photos recorded.
pub fn build(
    flight_dirs: &[PathBuf],
    output_csv: &Path,
    bbox: &BBox,
    target_dir: &Path,
    progress_group: &MultiProgress,
) -> Result<usize, GeotagError> {
    let mut wtr = writer(File::create(output_csv)?, bbox)?;
    let mut total = 0;
    for (flight, dir) in (1..).zip(flight_dirs) {
        let pb = progress_group.add(progress::flight_bar(flight, dir));
        let rows = scan_flight(flight, dir, bbox, target_dir, &pb)?;
        pb.finish();
        info!("flight {flight}: {} photos in bounds", rows.len());
        for row in &rows {
            wtr.serialize(row)?;
        }
        total += rows.len();
    }
    wtr.flush()?;
    Ok(total)
}

/// Returns a CSV writer that has written the header and bounding box
/// rows.
pub fn writer<W: Write>(out: W, bbox: &BBox) -> Result<csv::Writer<W>, GeotagError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(out);
    wtr.write_record(HEADER)?;
    wtr.write_record([
        BBOX_LABEL.to_string(),
        format!("min_lat={}", bbox.min_lat),
        format!("min_lon={}", bbox.min_lon),
        format!("max_lat={}", bbox.max_lat),
        format!("max_lon={}", bbox.max_lon),
    ])?;
    Ok(wtr)
}

/// A manifest read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Bounding box the manifest was built with, if its provenance
    /// row parses.
    pub bbox: Option<BBox>,
    pub rows: Vec<ManifestRow>,
}

impl Manifest {
    pub fn from_reader(rdr: impl Read) -> Result<Self, GeotagError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);
        let mut records = rdr.records();
        let header = records
            .next()
            .ok_or(GeotagError::Manifest("missing header row"))??;
        if header.iter().ne(HEADER) {
            return Err(GeotagError::Manifest("unexpected header row"));
        }
        let bbox_record = records
            .next()
            .ok_or(GeotagError::Manifest("missing bounding box row"))??;
        let bbox = parse_bbox(&bbox_record);
        let rows = records
            .map(|record| Ok(record?.deserialize::<ManifestRow>(None)?))
            .collect::<Result<Vec<_>, GeotagError>>()?;
        Ok(Self { bbox, rows })
    }

    pub fn open(path: &Path) -> Result<Self, GeotagError> {
        Self::from_reader(File::open(path)?)
    }
}

fn parse_bbox(record: &StringRecord) -> Option<BBox> {
    if record.get(0) != Some(BBOX_LABEL) {
        return None;
    }
    let value = |idx: usize, key: &str| -> Option<f64> {
        record
            .get(idx)?
            .strip_prefix(key)?
            .strip_prefix('=')?
            .parse()
            .ok()
    };
    Some(BBox::new(
        value(1, "min_lat")?,
        value(2, "min_lon")?,
        value(3, "max_lat")?,
        value(4, "max_lon")?,
    ))
}

/// Copies every photo listed in the manifest at `csv_path` to its
/// destination.
///
/// A failed copy is logged and skipped. Returns the number of photos
/// copied.
pub fn copy_files(csv_path: &Path) -> Result<usize, GeotagError> {
    let manifest = Manifest::open(csv_path)?;
    if let Some(bbox) = manifest.bbox {
        info!("copying photos within {bbox}");
    }
    let mut copied = 0;
    for row in &manifest.rows {
        match fs::copy(&row.source_path, &row.dest_path) {
            Ok(_) => copied += 1,
            Err(e) => warn!(
                "failed to copy {} to {}: {e}",
                row.source_path.display(),
                row.dest_path.display()
            ),
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::{dest_name, file_name, writer, Manifest, ManifestRow};
    use crate::bbox::BBox;
    use chrono::{TimeZone, Utc};
    use std::path::{Path, PathBuf};

    #[test]
    fn test_dest_name() {
        assert_eq!(
            dest_name(2, Path::new("/data/f/DJI_0042.JPG")).unwrap(),
            "flight_2_DJI_0042.JPG"
        );
        assert_eq!(
            dest_name(1, Path::new("a/photo.tar.gz")).unwrap(),
            "flight_1_photo.tar.gz"
        );
        assert_eq!(dest_name(1, Path::new("/")), None);
    }

    #[test]
    fn test_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(file_name(&now), "metadata_20240309_070501.csv");
    }

    #[test]
    fn test_manifest_round_trip() {
        let bbox = BBox::new(40.0, -10.5, 45.25, 20.0);
        let row = ManifestRow {
            source_path: PathBuf::from("/in/a/DJI_0001.JPG"),
            dest_path: PathBuf::from("/out/flight_1_DJI_0001.JPG"),
            latitude: 42.5,
            longitude: -3.75,
        };
        let mut buf = Vec::new();
        {
            let mut wtr = writer(&mut buf, &bbox).unwrap();
            wtr.serialize(&row).unwrap();
            wtr.flush().unwrap();
        }
        let text = String::from_utf8(buf.clone()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("source_path,dest_path,latitude,longitude"));
        assert_eq!(
            lines.next(),
            Some("Bounding box,min_lat=40,min_lon=-10.5,max_lat=45.25,max_lon=20")
        );
        assert_eq!(
            lines.next(),
            Some("/in/a/DJI_0001.JPG,/out/flight_1_DJI_0001.JPG,42.5,-3.75")
        );

        let manifest = Manifest::from_reader(buf.as_slice()).unwrap();
        assert_eq!(manifest.bbox, Some(bbox));
        assert_eq!(manifest.rows, vec![row]);
    }

    #[test]
    fn test_manifest_rejects_foreign_csv() {
        assert!(Manifest::from_reader("a,b\n1,2\n".as_bytes()).is_err());
        assert!(Manifest::from_reader("".as_bytes()).is_err());
    }
}
