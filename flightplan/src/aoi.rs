//! Area of interest input and task grid output as GeoJSON.

use crate::error::FlightPlanError;
use geo::geometry::{Geometry, MultiPolygon, Polygon};
use geojson::{quick_collection, Feature, FeatureCollection, GeoJson, JsonObject};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

/// Reads the area of interest from a GeoJSON file.
///
/// See [`from_reader`].
pub fn open(path: &Path) -> Result<MultiPolygon<f64>, FlightPlanError> {
    from_reader(BufReader::new(File::open(path)?))
}

/// Parses the area of interest: the first geometry of a feature
/// collection, or a lone feature or geometry. It must be a polygon or
/// multi-polygon.
pub fn from_reader(rdr: impl Read) -> Result<MultiPolygon<f64>, FlightPlanError> {
    let json = GeoJson::from_reader(rdr)?;
    let collection = quick_collection::<f64>(&json)?;
    match collection.into_iter().next() {
        Some(Geometry::Polygon(polygon)) => Ok(MultiPolygon::new(vec![polygon])),
        Some(Geometry::MultiPolygon(multi)) => Ok(multi),
        _ => Err(FlightPlanError::NoAoi),
    }
}

/// Returns task polygons as features with a 1-indexed `task`
/// property.
pub fn task_collection(tasks: &[Polygon<f64>]) -> FeatureCollection {
    let features = tasks
        .iter()
        .enumerate()
        .map(|(idx, polygon)| {
            let mut properties = JsonObject::new();
            properties.insert("task".to_string(), (idx + 1).into());
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(polygon))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Writes task polygons to `path` as a GeoJSON feature collection.
pub fn save_tasks(path: &Path, tasks: &[Polygon<f64>]) -> Result<(), FlightPlanError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &task_collection(tasks))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{from_reader, task_collection};
    use crate::error::FlightPlanError;
    use geo::{polygon, Area};

    #[test]
    fn test_feature_collection_first_feature() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[5, 5], [6, 5], [6, 6], [5, 6], [5, 5]]]
                    }
                }
            ]
        }"#;
        let aoi = from_reader(json.as_bytes()).unwrap();
        assert_eq!(aoi.0.len(), 1);
        assert_eq!(aoi.unsigned_area(), 4.0);
    }

    #[test]
    fn test_bare_multipolygon() {
        let json = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]],
                [[[3, 0], [4, 0], [4, 1], [3, 1], [3, 0]]]
            ]
        }"#;
        let aoi = from_reader(json.as_bytes()).unwrap();
        assert_eq!(aoi.0.len(), 2);
    }

    #[test]
    fn test_point_is_not_an_aoi() {
        let json = r#"{"type": "Point", "coordinates": [1, 2]}"#;
        assert!(matches!(
            from_reader(json.as_bytes()),
            Err(FlightPlanError::NoAoi)
        ));
    }

    #[test]
    fn test_task_collection() {
        let tasks = vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
            polygon![(x: 2.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 1.0)],
        ];
        let collection = task_collection(&tasks);
        assert_eq!(collection.features.len(), 2);
        assert_eq!(
            collection.features[1].property("task"),
            Some(&serde_json::json!(2))
        );
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["features"][0]["geometry"]["type"], "Polygon");
    }
}
