pub mod cache;
pub mod nominatim;

/// (latitude, longitude), as returned by the lookup service.
pub type GeoCoordinate = (f64, f64);
