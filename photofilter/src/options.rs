use clap::{Args, Parser};
use geotag::{BBox, BboxSource, GeotagError};
use std::path::PathBuf;

/// Select drone photos by EXIF GPS position and copy them, renamed
/// per flight, to an output directory.
///
/// Every subdirectory of SOURCE_PATH is one flight.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing one directory of images per flight.
    pub source_path: PathBuf,

    /// Output directory for the manifest and filtered images.
    pub output_path: PathBuf,

    #[command(flatten)]
    pub bounds: Bounds,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Bounds {
    /// Bounding box coordinates.
    #[arg(
        long,
        num_args = 4,
        value_names = ["MIN_LAT", "MIN_LON", "MAX_LAT", "MAX_LON"],
        allow_negative_numbers = true
    )]
    pub bbox: Option<Vec<f64>>,

    /// GeoJSON file containing the bounding geometry.
    #[arg(long)]
    pub geojson: Option<PathBuf>,
}

impl TryFrom<Bounds> for BboxSource {
    type Error = GeotagError;

    fn try_from(Bounds { bbox, geojson }: Bounds) -> Result<Self, GeotagError> {
        let bbox = match bbox.as_deref() {
            None => None,
            Some(&[min_lat, min_lon, max_lat, max_lon]) => {
                Some(BBox::new(min_lat, min_lon, max_lat, max_lon))
            }
            Some(_) => return Err(GeotagError::Usage("--bbox takes exactly four values")),
        };
        BboxSource::from_args(bbox, geojson)
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{error::ErrorKind, Parser};
    use geotag::{BBox, BboxSource};
    use std::path::PathBuf;

    #[test]
    fn test_bbox_args() {
        let cli = Cli::try_parse_from([
            "photofilter",
            "in",
            "out",
            "--bbox",
            "-1.5",
            "36.7",
            "-1.2",
            "37",
        ])
        .unwrap();
        assert_eq!(
            BboxSource::try_from(cli.bounds).unwrap(),
            BboxSource::Explicit(BBox::new(-1.5, 36.7, -1.2, 37.0))
        );
    }

    #[test]
    fn test_geojson_args() {
        let cli =
            Cli::try_parse_from(["photofilter", "in", "out", "--geojson", "a.geojson"]).unwrap();
        assert_eq!(cli.source_path, PathBuf::from("in"));
        assert_eq!(
            BboxSource::try_from(cli.bounds).unwrap(),
            BboxSource::GeoJson(PathBuf::from("a.geojson"))
        );
    }

    #[test]
    fn test_usage_errors() {
        let both = Cli::try_parse_from([
            "photofilter",
            "in",
            "out",
            "--bbox",
            "1",
            "2",
            "3",
            "4",
            "--geojson",
            "a.geojson",
        ]);
        assert_eq!(both.unwrap_err().kind(), ErrorKind::ArgumentConflict);

        let neither = Cli::try_parse_from(["photofilter", "in", "out"]);
        assert_eq!(
            neither.unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );

        let short = Cli::try_parse_from(["photofilter", "in", "out", "--bbox", "1", "2", "3"]);
        assert!(short.is_err());
    }
}
