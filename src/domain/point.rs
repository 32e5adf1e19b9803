use serde::Serialize;

/// Number of decimal digits kept on every generated coordinate
pub const COORD_PRECISION: i32 = 6;

/// Round a coordinate to `COORD_PRECISION` decimal places
pub fn round_to_precision(value: f64) -> f64 {
    let factor = 10f64.powi(COORD_PRECISION);
    (value * factor).round() / factor
}

/// A generated coordinate in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl SamplePoint {
    /// Build a point from raw coordinates, rounding both to 6 decimals
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_to_precision(latitude),
            longitude: round_to_precision(longitude),
        }
    }

    /// "lat, lon" with fixed 6-decimal formatting
    pub fn lat_lon_label(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
