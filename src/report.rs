//! Per-institution resolution report (TSV).
use crate::error::Result;
use crate::geocode::GeoCoordinate;
use crate::geocode::cache::GeocodeCache;
use crate::geocode::nominatim::{GeocodeOutcome, search_url};
use chrono::NaiveDate;
use csv::WriterBuilder;
use log::{error, info, warn};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// Coordinate came from the persisted cache; no lookup was issued.
    Cached,
    /// Coordinate was freshly resolved by the lookup service this run.
    Geocoded,
    /// The lookup service returned an empty result.
    NotFound,
    /// The lookup failed (network or service error).
    Failed,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Cached => "cached",
            ResolutionStatus::Geocoded => "geocoded",
            ResolutionStatus::NotFound => "not_found",
            ResolutionStatus::Failed => "error",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionStatus::Cached | ResolutionStatus::Geocoded)
    }
}

/// One canonical institution's outcome for this run.
#[derive(Debug)]
pub struct ResolutionRecord {
    pub canonical_name: String,
    pub status: ResolutionStatus,
    pub coordinate: Option<GeoCoordinate>,
    pub label_offset: Option<(f64, f64)>,
    pub query: String,
    pub failure_detail: Option<String>,
}

impl ResolutionRecord {
    /// Folds one lookup outcome into the cache and a report row. Only a
    /// resolved outcome touches the cache; a failed or empty lookup leaves
    /// the name uncached so the next run retries it.
    pub fn from_outcome(
        name: &str,
        query: String,
        label_offset: Option<(f64, f64)>,
        outcome: GeocodeOutcome,
        cache: &mut GeocodeCache,
    ) -> Self {
        match outcome {
            GeocodeOutcome::Resolved {
                coordinate,
                display_name,
            } => {
                cache.insert(name, coordinate);
                info!("Found: {} -> {}", name, display_name);
                Self {
                    canonical_name: name.to_string(),
                    status: ResolutionStatus::Geocoded,
                    coordinate: Some(coordinate),
                    label_offset,
                    query,
                    failure_detail: None,
                }
            }
            GeocodeOutcome::NotFound => {
                warn!("Not found: {}", name);
                Self {
                    canonical_name: name.to_string(),
                    status: ResolutionStatus::NotFound,
                    coordinate: None,
                    label_offset,
                    query,
                    failure_detail: None,
                }
            }
            GeocodeOutcome::Failed(e) => {
                error!("Error geocoding {}: {}", name, e);
                Self {
                    canonical_name: name.to_string(),
                    status: ResolutionStatus::Failed,
                    coordinate: None,
                    label_offset,
                    query,
                    failure_detail: Some(e.to_string()),
                }
            }
        }
    }
}

pub fn write_report(
    records: &[ResolutionRecord],
    path: &Path,
    run_date: NaiveDate,
) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record([
        "institution",
        "status",
        "latitude",
        "longitude",
        "label_dx",
        "label_dy",
        "query",
        "review_url",
        "detail",
        "run_date",
    ])?;

    let date = run_date.to_string();
    for record in records {
        let (lat, lon) = match record.coordinate {
            Some((lat, lon)) => (lat.to_string(), lon.to_string()),
            None => (String::new(), String::new()),
        };
        let (dx, dy) = match record.label_offset {
            Some((dx, dy)) => (dx.to_string(), dy.to_string()),
            None => (String::new(), String::new()),
        };
        // Unresolved rows get a ready-made link for checking the query by hand.
        let review_url = if record.status.is_resolved() {
            String::new()
        } else {
            search_url(&record.query)
        };
        writer.write_record([
            record.canonical_name.as_str(),
            record.status.as_str(),
            lat.as_str(),
            lon.as_str(),
            dx.as_str(),
            dy.as_str(),
            record.query.as_str(),
            review_url.as_str(),
            record.failure_detail.as_deref().unwrap_or(""),
            date.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
