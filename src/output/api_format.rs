use thiserror::Error;

use crate::api::table::FORM_CONTENT_TYPE;
use crate::domain::SamplePoint;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("Malformed coordinate pair at index {index}: {pair:?}")]
    MalformedPair { index: usize, pair: String },

    #[error("Invalid number at index {index}: {value:?}")]
    InvalidNumber { index: usize, value: String },
}

/// Render points as `lon,lat;lon,lat;...` with 6 fixed decimals, in order
pub fn format_points_for_api(points: &[SamplePoint]) -> String {
    points
        .iter()
        .map(|p| format!("{:.6},{:.6}", p.longitude, p.latitude))
        .collect::<Vec<_>>()
        .join(";")
}

/// Parse a `lon,lat;lon,lat` string back into points.
///
/// An empty string yields no points.
pub fn parse_api_format(data: &str) -> Result<Vec<SamplePoint>, FormatError> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(Vec::new());
    }

    data.split(';')
        .enumerate()
        .map(|(index, pair)| {
            let (lon, lat) = pair
                .split_once(',')
                .ok_or_else(|| FormatError::MalformedPair {
                    index,
                    pair: pair.to_string(),
                })?;
            let parse = |value: &str| {
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| FormatError::InvalidNumber {
                        index,
                        value: value.to_string(),
                    })
            };
            Ok(SamplePoint::new(parse(lat)?, parse(lon)?))
        })
        .collect()
}

/// Shell command that replays the API request with curl
pub fn curl_command(points: &[SamplePoint], url: &str) -> String {
    format!(
        "curl -X POST \"{}\" \\\n-H \"Content-Type: {}\" \\\n-d \"{}\"",
        url,
        FORM_CONTENT_TYPE,
        format_points_for_api(points)
    )
}

/// First `max_chars` characters of the request body, with an ellipsis if cut
pub fn preview(data: &str, max_chars: usize) -> String {
    if data.chars().count() > max_chars {
        format!("{}...", data.chars().take(max_chars).collect::<String>())
    } else {
        data.to_string()
    }
}
