//! GPS position from image EXIF metadata.

use exif::{Exif, In, Reader, Tag, Value};
use geo::geometry::Point;
use log::{debug, info, warn};
use std::{fs::File, io::BufReader, path::Path};

/// Converts degrees, minutes, seconds to decimal degrees.
///
/// Southern and western hemisphere references (`"S"`, `"W"`) yield a
/// negative result.
pub fn decimal_degrees([degrees, minutes, seconds]: [f64; 3], reference: &str) -> f64 {
    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match reference.trim() {
        "S" | "W" => -value,
        _ => value,
    }
}

/// Returns the position, as (x: longitude, y: latitude), recorded in
/// the image at `path`.
///
/// Unreadable files, images without EXIF, and EXIF without usable GPS
/// tags all yield `None`; the reason is logged.
pub fn read(path: &Path) -> Option<Point<f64>> {
    debug!("processing image {}", path.display());
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("skipping unreadable file {}: {e}", path.display());
            return None;
        }
    };
    let exif = match Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            info!("image has no EXIF info: {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("skipping invalid image file {}: {e}", path.display());
            return None;
        }
    };
    let position = position(&exif);
    if position.is_none() {
        info!("image has no GPS info: {}", path.display());
    }
    position
}

/// Returns the GPS position in `exif`, if complete and finite.
pub fn position(exif: &Exif) -> Option<Point<f64>> {
    let lat = decimal_degrees(
        dms(exif, Tag::GPSLatitude)?,
        reference(exif, Tag::GPSLatitudeRef)?,
    );
    let lon = decimal_degrees(
        dms(exif, Tag::GPSLongitude)?,
        reference(exif, Tag::GPSLongitudeRef)?,
    );
    (lat.is_finite() && lon.is_finite()).then(|| Point::new(lon, lat))
}

fn dms(exif: &Exif, tag: Tag) -> Option<[f64; 3]> {
    match exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(ref v) if v.len() >= 3 => {
            Some([v[0].to_f64(), v[1].to_f64(), v[2].to_f64()])
        }
        _ => None,
    }
}

fn reference(exif: &Exif, tag: Tag) -> Option<&str> {
    match exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(ref v) => v.first().and_then(|s| std::str::from_utf8(s).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{decimal_degrees, position, read};
    use approx::assert_relative_eq;
    use exif::{experimental::Writer, Field, In, Rational, Reader, Tag, Value};
    use std::io::Cursor;

    fn rational(dms: [u32; 3]) -> Value {
        Value::Rational(dms.iter().map(|&n| Rational::from((n, 1))).collect())
    }

    fn ascii(s: &str) -> Value {
        Value::Ascii(vec![s.as_bytes().to_vec()])
    }

    fn tiff(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        buf.into_inner()
    }

    fn field(tag: Tag, value: Value) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        }
    }

    #[test]
    fn test_decimal_degrees() {
        assert_relative_eq!(decimal_degrees([40.0, 30.0, 0.0], "S"), -40.5);
        assert_relative_eq!(decimal_degrees([40.0, 30.0, 0.0], "N"), 40.5);
        assert_relative_eq!(
            decimal_degrees([71.0, 18.0, 11.7], "W"),
            -(71.0 + 18.0 / 60.0 + 11.7 / 3600.0)
        );
        assert_relative_eq!(decimal_degrees([12.0, 0.0, 36.0], "E"), 12.01);
    }

    #[test]
    fn test_position_from_exif() {
        let raw = tiff(&[
            field(Tag::GPSLatitude, rational([1, 18, 0])),
            field(Tag::GPSLatitudeRef, ascii("S")),
            field(Tag::GPSLongitude, rational([36, 48, 0])),
            field(Tag::GPSLongitudeRef, ascii("E")),
        ]);
        let exif = Reader::new().read_raw(raw).unwrap();
        let point = position(&exif).unwrap();
        assert_relative_eq!(point.y(), -1.3, epsilon = 1e-12);
        assert_relative_eq!(point.x(), 36.8, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_gps() {
        let raw = tiff(&[field(Tag::ImageDescription, ascii("no gps"))]);
        let exif = Reader::new().read_raw(raw).unwrap();
        assert_eq!(position(&exif), None);

        // Latitude without its hemisphere reference is not decodable.
        let raw = tiff(&[
            field(Tag::GPSLatitude, rational([1, 18, 0])),
            field(Tag::GPSLongitude, rational([36, 48, 0])),
            field(Tag::GPSLongitudeRef, ascii("E")),
        ]);
        let exif = Reader::new().read_raw(raw).unwrap();
        assert_eq!(position(&exif), None);
    }

    #[test]
    fn test_read_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "not an image").unwrap();
        assert_eq!(read(&text), None);
        assert_eq!(read(&dir.path().join("missing.jpg")), None);

        let good = dir.path().join("DJI_0001.tif");
        std::fs::write(
            &good,
            tiff(&[
                field(Tag::GPSLatitude, rational([40, 30, 0])),
                field(Tag::GPSLatitudeRef, ascii("N")),
                field(Tag::GPSLongitude, rational([3, 45, 0])),
                field(Tag::GPSLongitudeRef, ascii("W")),
            ]),
        )
        .unwrap();
        let point = read(&good).unwrap();
        assert_relative_eq!(point.y(), 40.5);
        assert_relative_eq!(point.x(), -3.75);
    }
}
