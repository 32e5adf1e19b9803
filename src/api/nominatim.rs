use geo::{LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::NominatimConfig;
use crate::domain::Boundary;

/// Why the remote boundary lookup did not produce a usable polygon
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Nominatim request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Nominatim returned error status: {0}")]
    Status(u16),

    #[error("Failed to parse Nominatim GeoJSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No features found for region: {0}")]
    NoFeatures(String),

    #[error("First feature has no geometry")]
    MissingGeometry,

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Where the boundary used for sampling came from
#[derive(Debug, Clone, PartialEq)]
pub enum BoundarySource {
    Remote,
    Fallback { reason: String },
}

impl BoundarySource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, BoundarySource::Fallback { .. })
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<GeoJsonGeometry>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonGeometry {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

type Ring = Vec<Vec<f64>>;

/// Look up the land boundary of `region` on Nominatim.
///
/// Sends a single GeoJSON search request (`polygon_geojson=1`, `limit=1`) and
/// reads the first feature. Coordinates are taken as WGS84 lon/lat. No retries.
pub fn fetch_boundary(region: &str, config: &NominatimConfig) -> Result<Boundary, BoundaryError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    tracing::debug!(url = %config.url, region, "querying boundary");

    let response = client
        .get(&config.url)
        .query(&[
            ("q", region),
            ("format", "geojson"),
            ("polygon_geojson", "1"),
            ("limit", "1"),
        ])
        .send()?;

    if !response.status().is_success() {
        return Err(BoundaryError::Status(response.status().as_u16()));
    }

    let body = response.text()?;
    parse_boundary_response(&body, region)
}

/// Parse a GeoJSON FeatureCollection into a boundary using its first feature
pub fn parse_boundary_response(body: &str, region: &str) -> Result<Boundary, BoundaryError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| BoundaryError::NoFeatures(region.to_string()))?;

    let geometry = feature.geometry.ok_or(BoundaryError::MissingGeometry)?;

    let polygons = match geometry.type_.as_str() {
        "Polygon" => {
            let rings: Vec<Ring> = serde_json::from_value(geometry.coordinates)?;
            vec![polygon_from_rings(rings)?]
        }
        "MultiPolygon" => {
            let parts: Vec<Vec<Ring>> = serde_json::from_value(geometry.coordinates)?;
            parts
                .into_iter()
                .map(polygon_from_rings)
                .collect::<Result<Vec<_>, _>>()?
        }
        other => return Err(BoundaryError::UnsupportedGeometry(other.to_string())),
    };

    if polygons.is_empty() {
        return Err(BoundaryError::InvalidGeometry(
            "MultiPolygon has no parts".to_string(),
        ));
    }

    Ok(Boundary::new(MultiPolygon::new(polygons)))
}

/// Pick the boundary to sample from, substituting `fallback` when the lookup failed
pub fn resolve_boundary(
    lookup: Result<Boundary, BoundaryError>,
    fallback: Boundary,
) -> (Boundary, BoundarySource) {
    match lookup {
        Ok(boundary) => (boundary, BoundarySource::Remote),
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch boundary, using fallback approximate boundary");
            (
                fallback,
                BoundarySource::Fallback {
                    reason: e.to_string(),
                },
            )
        }
    }
}

fn polygon_from_rings(rings: Vec<Ring>) -> Result<Polygon<f64>, BoundaryError> {
    let mut rings = rings.into_iter();
    let exterior = rings
        .next()
        .ok_or_else(|| BoundaryError::InvalidGeometry("polygon without rings".to_string()))?;

    let exterior = ring_to_linestring(exterior)?;
    let interiors = rings
        .map(ring_to_linestring)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn ring_to_linestring(ring: Ring) -> Result<LineString<f64>, BoundaryError> {
    if ring.len() < 3 {
        return Err(BoundaryError::InvalidGeometry(format!(
            "ring has {} positions, need at least 3",
            ring.len()
        )));
    }

    ring.into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(BoundaryError::InvalidGeometry(
                "position with fewer than 2 values".to_string(),
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::from)
}
