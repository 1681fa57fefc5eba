//! Nominatim lookup client.
use crate::error::{CrateError, Result};
use crate::geocode::GeoCoordinate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use urlencoding::encode;

const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const NOMINATIM_UI_URL: &str = "https://nominatim.openstreetmap.org/ui/search.html";

// Nominatim's usage policy requires an identifying User-Agent; this carries
// forward the identity the original mapping exercise registered with the
// service.
pub const USER_AGENT: &str = "instmap/0.1 (swiss_ord_prize_map_v1)";

// Nominatim returns coordinates as JSON strings.
#[derive(Deserialize, Debug)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Per-name lookup outcome, aggregated by the caller. A failed or empty
/// lookup never aborts the run; the name simply stays out of the cache and is
/// retried on the next run.
#[derive(Debug)]
pub enum GeocodeOutcome {
    Resolved {
        coordinate: GeoCoordinate,
        display_name: String,
    },
    NotFound,
    Failed(CrateError),
}

/// Enforces a minimum delay between successive requests. This is a
/// politeness throttle for the lookup service, not concurrency control;
/// requests stay strictly sequential.
pub struct RateLimiter {
    min_delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: None,
        }
    }

    /// Waits until at least `min_delay` has passed since the previous call.
    /// The first call returns immediately.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            sleep_until(last + self.min_delay).await;
        }
        self.last_request = Some(Instant::now());
    }
}

/// Builds the free-text search string for one canonical name: the operator
/// override when present, otherwise the name itself, always with the region
/// qualifier appended to bias results toward the right place.
pub fn build_query(
    canonical: &str,
    overrides: &HashMap<String, String>,
    region: &str,
) -> String {
    let base = overrides.get(canonical).map(String::as_str).unwrap_or(canonical);
    format!("{}, {}", base, region)
}

/// Link to the Nominatim web UI for the same query, for manual review of
/// names the service could not resolve.
pub fn search_url(query: &str) -> String {
    format!("{}?q={}", NOMINATIM_UI_URL, encode(query))
}

// One bounded GET against the search endpoint. Empty result array means the
// service found nothing for the query.
async fn geocode(
    query: &str,
    client: &reqwest::Client,
) -> Result<Option<(GeoCoordinate, String)>> {
    let response = client
        .get(NOMINATIM_SEARCH_URL)
        .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(CrateError::ApiRequestError)?;

    if !response.status().is_success() {
        return Err(CrateError::ApiStatusError {
            status: response.status(),
            query: query.to_string(),
        });
    }

    let results: Vec<SearchResult> = response
        .json()
        .await
        .map_err(CrateError::ApiJsonDecodeError)?;

    let Some(result) = results.into_iter().next() else {
        return Ok(None);
    };

    let coordinate = (
        parse_coordinate(&result.lat, query)?,
        parse_coordinate(&result.lon, query)?,
    );
    Ok(Some((coordinate, result.display_name)))
}

fn parse_coordinate(value: &str, query: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| CrateError::InvalidCoordinate {
            value: value.to_string(),
            query: query.to_string(),
        })
}

/// Resolves one query, folding every failure mode into a [`GeocodeOutcome`].
pub async fn resolve(query: &str, client: &reqwest::Client) -> GeocodeOutcome {
    match geocode(query, client).await {
        Ok(Some((coordinate, display_name))) => GeocodeOutcome::Resolved {
            coordinate,
            display_name,
        },
        Ok(None) => GeocodeOutcome::NotFound,
        Err(err) => GeocodeOutcome::Failed(err),
    }
}
