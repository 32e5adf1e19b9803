use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

use crate::config::TableConfig;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Outcome of a routing table request, serialized as-is into the response file.
///
/// Failures are values here: a dead server or a non-2xx status still produces
/// a JSON object describing what happened.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TableOutcome {
    /// JSON object body, with `request_duration_seconds` added
    Success(Map<String, Value>),
    /// 2xx body that is valid JSON but not an object
    NonObject {
        response: Value,
        request_duration_seconds: f64,
    },
    /// 2xx body that is not JSON
    RawText {
        raw_response: String,
        request_duration_seconds: f64,
    },
    /// Server answered with a non-2xx status
    Failed {
        error: String,
        response_text: String,
        request_duration_seconds: f64,
    },
    /// No response at all
    Unreachable { error: String, suggestion: String },
}

impl TableOutcome {
    /// Wall-clock duration of the request, when the server answered
    pub fn request_duration_seconds(&self) -> Option<f64> {
        match self {
            TableOutcome::Success(map) => map
                .get("request_duration_seconds")
                .and_then(Value::as_f64),
            TableOutcome::NonObject {
                request_duration_seconds,
                ..
            }
            | TableOutcome::RawText {
                request_duration_seconds,
                ..
            }
            | TableOutcome::Failed {
                request_duration_seconds,
                ..
            } => Some(*request_duration_seconds),
            TableOutcome::Unreachable { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            TableOutcome::Failed { .. } | TableOutcome::Unreachable { .. }
        )
    }
}

/// POST the formatted coordinate string to the routing table endpoint.
///
/// The body is sent verbatim with a form content type. Duration covers the
/// request and reading the full response body.
pub fn submit_points(body: &str, config: &TableConfig) -> TableOutcome {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
    {
        Ok(c) => c,
        Err(e) => return unreachable_outcome(&e, &config.url),
    };

    tracing::info!(url = %config.url, bytes = body.len(), "submitting points");

    let start = Instant::now();
    let response = match client
        .post(&config.url)
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(body.to_string())
        .send()
    {
        Ok(r) => r,
        Err(e) => return unreachable_outcome(&e, &config.url),
    };

    let status = response.status();
    let text = match response.text() {
        Ok(t) => t,
        Err(e) => return unreachable_outcome(&e, &config.url),
    };
    let duration = start.elapsed().as_secs_f64();

    tracing::info!(status = status.as_u16(), duration, "routing API responded");

    if !status.is_success() {
        return TableOutcome::Failed {
            error: format!("API request failed with status {}", status.as_u16()),
            response_text: text,
            request_duration_seconds: duration,
        };
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(mut map)) => {
            map.insert("request_duration_seconds".to_string(), Value::from(duration));
            TableOutcome::Success(map)
        }
        Ok(other) => TableOutcome::NonObject {
            response: other,
            request_duration_seconds: duration,
        },
        Err(_) => TableOutcome::RawText {
            raw_response: text,
            request_duration_seconds: duration,
        },
    }
}

fn unreachable_outcome(error: &reqwest::Error, url: &str) -> TableOutcome {
    tracing::warn!(%error, "routing API request failed");
    TableOutcome::Unreachable {
        error: format!("Request failed: {}", error),
        suggestion: format!("Make sure the API server is running on {}", server_origin(url)),
    }
}

/// Scheme, host and port of `url`, or the url itself if it does not parse
fn server_origin(url: &str) -> String {
    reqwest::Url::parse(url)
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|_| url.to_string())
}
