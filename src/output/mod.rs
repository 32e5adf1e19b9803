pub mod api_format;

pub use api_format::{FormatError, curl_command, format_points_for_api, parse_api_format};

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::SamplePoint;

/// One entry of the points JSON file
#[derive(Debug, Serialize)]
pub struct PointRecord {
    pub id: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// "lat, lon" with 6 fixed decimals
    pub coordinates: String,
}

impl PointRecord {
    pub fn from_points(points: &[SamplePoint]) -> Vec<PointRecord> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| PointRecord {
                id: i + 1,
                latitude: p.latitude,
                longitude: p.longitude,
                coordinates: p.lat_lon_label(),
            })
            .collect()
    }
}

/// Output file locations for one run
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub points_json: PathBuf,
    pub api_format: PathBuf,
    pub api_response: PathBuf,
}

impl OutputPaths {
    /// `<slug>_points.json`, `<slug>_points_api_format.txt` and `api_response.json` under `dir`
    pub fn for_region(dir: &Path, region: &str) -> Self {
        let slug: String = region
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        Self {
            points_json: dir.join(format!("{}_points.json", slug)),
            api_format: dir.join(format!("{}_points_api_format.txt", slug)),
            api_response: dir.join("api_response.json"),
        }
    }
}

/// Points sent to the routing API: the first `max_points`, or all of them when
/// the cap is absent or zero
pub fn api_points(points: &[SamplePoint], max_points: Option<usize>) -> &[SamplePoint] {
    match max_points {
        Some(max) if max > 0 => &points[..max.min(points.len())],
        _ => points,
    }
}

/// Write points as a pretty-printed JSON array of `PointRecord`
pub fn save_points_json(path: &Path, points: &[SamplePoint]) -> Result<()> {
    write_pretty_json(path, &PointRecord::from_points(points))
}

/// Write the single-line `lon,lat;...` string
pub fn save_api_format(path: &Path, points: &[SamplePoint]) -> Result<()> {
    std::fs::write(path, format_points_for_api(points))
        .with_context(|| format!("Failed to write API format file: {}", path.display()))
}

/// Write the routing API outcome (response or error descriptor)
pub fn save_response<T: Serialize>(path: &Path, response: &T) -> Result<()> {
    write_pretty_json(path, response)
}

fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize JSON to {}", path.display()))?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TableOutcome;
    use std::fs;
    use tempfile::tempdir;

    fn points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(35.912345, 14.456789),
            SamplePoint::new(35.85, 14.5),
        ]
    }

    #[test]
    fn test_output_paths_for_region() {
        let paths = OutputPaths::for_region(Path::new("out"), "Malta");
        assert_eq!(paths.points_json, Path::new("out/malta_points.json"));
        assert_eq!(paths.api_format, Path::new("out/malta_points_api_format.txt"));
        assert_eq!(paths.api_response, Path::new("out/api_response.json"));

        let paths = OutputPaths::for_region(Path::new("."), "San Marino");
        assert_eq!(paths.points_json, Path::new("./san_marino_points.json"));
    }

    #[test]
    fn test_region_slug_stays_in_output_dir() {
        let paths = OutputPaths::for_region(Path::new("out"), "../etc/Gozo Island");
        assert_eq!(paths.points_json, Path::new("out/___etc_gozo_island_points.json"));
        assert_eq!(paths.points_json.parent(), Some(Path::new("out")));
        assert_eq!(paths.api_format.parent(), Some(Path::new("out")));
    }

    #[test]
    fn test_api_points_cap() {
        let pts = points();
        assert_eq!(api_points(&pts, None).len(), 2);
        // Zero means no limit
        assert_eq!(api_points(&pts, Some(0)).len(), 2);
        assert_eq!(api_points(&pts, Some(1)), &pts[..1]);
        assert_eq!(api_points(&pts, Some(10)).len(), 2);
        assert!(api_points(&[], Some(3)).is_empty());
    }

    #[test]
    fn test_save_points_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.json");

        save_points_json(&path, &points()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  {\n    \"id\": 1,"));

        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["id"], 1);
        assert_eq!(entries[0]["latitude"], 35.912345);
        assert_eq!(entries[0]["longitude"], 14.456789);
        assert_eq!(entries[1]["id"], 2);
        assert_eq!(entries[1]["coordinates"], "35.850000, 14.500000");
    }

    #[test]
    fn test_save_api_format_single_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.txt");

        save_api_format(&path, &points()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "14.456789,35.912345;14.500000,35.850000");
        assert_eq!(parse_api_format(&contents).unwrap(), points());
    }

    #[test]
    fn test_save_response_error_descriptor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api_response.json");
        let outcome = TableOutcome::Unreachable {
            error: "Request failed: connection refused".to_string(),
            suggestion: "Make sure the API server is running on http://127.0.0.1:5002".to_string(),
        };

        save_response(&path, &outcome).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["error"], "Request failed: connection refused");
        assert!(json.get("request_duration_seconds").is_none());
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("points.json");
        assert!(save_points_json(&path, &points()).is_err());
    }
}
