use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Width of a storage bucket. One prediction batch is kept per bucket,
/// keyed by the source timestamp floored to this boundary.
pub const BUCKET_MINUTES: i64 = 5;

const BUCKET_SECONDS: i64 = BUCKET_MINUTES * 60;

/// An observed (not predicted) position sample from the ground-truth feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundFix {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Orbital parameters derived from the two-line element source.
///
/// `degraded` is set when the live source could not be used and the fixed
/// defaults were substituted instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParameters {
    pub inclination_deg: f64,
    pub period_min: f64,
    pub degraded: bool,
}

impl OrbitalParameters {
    pub const DEFAULT_INCLINATION_DEG: f64 = 51.6;
    pub const DEFAULT_PERIOD_MIN: f64 = 92.9;

    pub fn fallback() -> Self {
        Self {
            inclination_deg: Self::DEFAULT_INCLINATION_DEG,
            period_min: Self::DEFAULT_PERIOD_MIN,
            degraded: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    OrbitalMechanics,
}

/// A single forward-projected position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionPoint {
    pub minutes_ahead: u32,
    pub timestamp: DateTime<Utc>,
    pub timestamp_unix: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub method: PredictionMethod,
}

/// The set of forward-projected points produced from one ground-fix pair,
/// stored as a single document keyed by `source_timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBatch {
    pub source_timestamp: DateTime<Utc>,
    pub source_timestamp_unix: i64,
    pub source_document_id: String,
    pub source_latitude: f64,
    pub source_longitude: f64,
    pub source_location: String,
    pub source_country_code: String,
    pub predictions: Vec<PredictionPoint>,
    pub prediction_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Floor a timestamp to the bucket boundary at or before it.
pub fn floor_to_bucket(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    let floored = secs - secs.rem_euclid(BUCKET_SECONDS);
    DateTime::from_timestamp(floored, 0).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn floor_truncates_to_five_minute_boundary() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 15, 3, 47).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap();
        assert_eq!(floor_to_bucket(ts), expected);
    }

    #[test]
    fn floor_is_identity_on_boundary() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 15, 25, 0).unwrap();
        assert_eq!(floor_to_bucket(ts), ts);
    }

    #[test]
    fn floor_never_rounds_up() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 15, 9, 59).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 15, 5, 0).unwrap();
        assert_eq!(floor_to_bucket(ts), expected);
    }
}
