use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeotagError {
    #[error("{0}")]
    Usage(&'static str),

    #[error("no polygon geometry in {0}")]
    NoPolygon(PathBuf),

    #[error("malformed manifest: {0}")]
    Manifest(&'static str),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),
}
