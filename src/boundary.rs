//! One-shot fetch of the region boundary polygon set.
//!
//! The GeoJSON is only background material for map rendering downstream, but
//! it is validated here so a failed or truncated download never lands on
//! disk looking like a usable boundary file.
use crate::error::{CrateError, Result};
use crate::geocode::nominatim::USER_AGENT;
use log::info;
use serde_json::Value;

// High-resolution Swiss country boundary, same source as the original map.
pub const SWISS_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/ZHB/switzerland-geojson/master/country/switzerland.geojson";

/// Downloads the boundary GeoJSON and returns its raw text after validation.
pub async fn fetch_boundary(url: &str, client: &reqwest::Client) -> Result<String> {
    info!("Downloading boundary data from {}", url);
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(CrateError::ApiRequestError)?;

    if !response.status().is_success() {
        return Err(CrateError::ApiStatusError {
            status: response.status(),
            query: url.to_string(),
        });
    }

    let text = response.text().await.map_err(CrateError::ApiRequestError)?;
    validate_geojson(&text)?;
    Ok(text)
}

// A feature collection with at least one feature is all downstream plotting
// needs; anything else means the download went wrong.
fn validate_geojson(text: &str) -> Result<()> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| CrateError::BoundaryFormatError(format!("not valid JSON: {}", err)))?;

    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CrateError::BoundaryFormatError("missing 'features' array".to_string())
        })?;

    if features.is_empty() {
        return Err(CrateError::BoundaryFormatError(
            "'features' array is empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "Switzerland"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[6.0, 46.0], [7.0, 46.0], [7.0, 47.0], [6.0, 46.0]]]
            }
        }]
    }"#;

    #[test]
    fn test_valid_feature_collection() {
        assert!(validate_geojson(SAMPLE_GEOJSON).is_ok());
    }

    #[test]
    fn test_rejects_non_json() {
        let err = validate_geojson("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, CrateError::BoundaryFormatError(_)));
    }

    #[test]
    fn test_rejects_missing_features() {
        let err = validate_geojson(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(
            matches!(err, CrateError::BoundaryFormatError(msg) if msg.contains("features"))
        );
    }

    #[test]
    fn test_rejects_empty_features() {
        let err =
            validate_geojson(r#"{"type": "FeatureCollection", "features": []}"#).unwrap_err();
        assert!(matches!(err, CrateError::BoundaryFormatError(msg) if msg.contains("empty")));
    }
}
