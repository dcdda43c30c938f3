//! Concrete use-case implementations.
//!
//! Forecasts and forward geocoding come from Open-Meteo, reverse geocoding
//! from a Nominatim-compatible service; the location source and the
//! map-style store are local. Base URLs live in [`crate::config::ApiConfig`]
//! so tests can point at a stub server.

pub mod geocoding;
pub mod location;
pub mod open_meteo;
pub mod preferences;

use crate::error::WeatherError;

/// Reject non-2xx responses with a readable error carrying a body snippet.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, WeatherError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WeatherError::other(format!(
        "request failed with status {status}: {}",
        truncate_body(&body)
    )))
}

fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let mut out: String = body.chars().take(MAX_CHARS).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long: String = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), 201);
        assert!(truncated.ends_with('…'));
    }
}
