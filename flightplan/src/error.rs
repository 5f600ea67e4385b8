use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightPlanError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("parameter '{name}' out of range: {value}")]
    Param { name: &'static str, value: f64 },

    #[error("no polygon geometry in area of interest")]
    NoAoi,

    #[error("area of interest has an empty extent")]
    EmptyAoi,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),
}
