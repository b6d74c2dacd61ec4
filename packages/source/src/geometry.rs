//! Pipeline geometry loader.
//!
//! The national pipeline shapefiles are converted offline from multi-line
//! geometries into one row per straight segment. This module only reads that
//! cached output; it never touches the shapefiles.
//!
//! Expected header:
//!
//! ```text
//! operator_name,pipe_name,category,start_lat,start_lon,end_lat,end_lon
//! ```

use std::io::Read;
use std::path::Path;

use gas_incidents_incident_models::Segment;
use serde::Deserialize;

use crate::SourceError;

/// One serialized segment row.
#[derive(Debug, Deserialize)]
struct SegmentRow {
    operator_name: String,
    #[serde(default)]
    pipe_name: Option<String>,
    category: String,
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,
}

impl From<SegmentRow> for Segment {
    fn from(row: SegmentRow) -> Self {
        Self {
            lats: [row.start_lat, row.end_lat],
            lons: [row.start_lon, row.end_lon],
            operator_name: row.operator_name,
            pipe_name: row.pipe_name.filter(|name| !name.is_empty()),
            category: row.category,
        }
    }
}

/// Loads a segment table from disk.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if the file is missing and
/// [`SourceError::Malformed`] if the header is wrong or any row lacks a
/// required field.
pub fn load_segments(path: &Path) -> Result<Vec<Segment>, SourceError> {
    let file = crate::open(path)?;
    let segments = read_segments(file, path)?;
    log::info!("Loaded {} pipeline segments from {}", segments.len(), path.display());
    Ok(segments)
}

/// Reads a segment table from any reader. `path` is only used for error
/// messages.
///
/// # Errors
///
/// See [`load_segments`].
pub fn read_segments<R: Read>(reader: R, path: &Path) -> Result<Vec<Segment>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize::<SegmentRow>()
        .map(|row| {
            row.map(Segment::from)
                .map_err(|e| SourceError::from_csv(path, &e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::path::PathBuf;

    use super::*;

    const HEADER: &str = "operator_name,pipe_name,category,start_lat,start_lon,end_lat,end_lon";

    #[test]
    fn reads_segments_with_optional_pipe_name() {
        let csv = format!(
            "{HEADER}\n\
             Kinder Morgan,Tennessee Gas,Interstate,29.1,-95.2,29.3,-95.0\n\
             Atmos Energy,,Intrastate,32.7,-97.3,32.8,-97.2\n"
        );
        let segments = read_segments(csv.as_bytes(), &PathBuf::from("geo.csv")).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].pipe_name.as_deref(), Some("Tennessee Gas"));
        assert_eq!(segments[0].lats, [29.1, 29.3]);
        assert_eq!(segments[0].lons, [-95.2, -95.0]);
        assert!(segments[1].pipe_name.is_none());
        assert_eq!(segments[1].category, "Intrastate");
    }

    #[test]
    fn missing_coordinate_is_malformed() {
        let csv = format!("{HEADER}\nAtmos Energy,,Intrastate,32.7,,32.8,-97.2\n");
        let err = read_segments(csv.as_bytes(), &PathBuf::from("geo.csv")).unwrap_err();
        assert!(
            matches!(err, SourceError::Malformed { line: Some(2), .. }),
            "{err:?}"
        );
    }

    #[test]
    fn wrong_header_is_malformed() {
        let csv = "lat,lon\n1,2\n";
        let err = read_segments(csv.as_bytes(), &PathBuf::from("geo.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }), "{err:?}");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Enbridge,Texas Eastern,Offshore,28.0,-91.0,28.2,-90.8").unwrap();

        let segments = load_segments(file.path()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].operator_name, "Enbridge");
    }

    #[test]
    fn missing_geometry_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_segments(&dir.path().join("geo_df.csv")).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }), "{err:?}");
    }
}
