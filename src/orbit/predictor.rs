//! Forward projection of positions from a pair of ground fixes.
//!
//! All 19 points of a batch are projected from the single anchor fix; there
//! is no re-anchoring between steps, so error compounds toward the end of
//! the 95-minute horizon.

use std::f64::consts::TAU;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::orbit::elements::ElementsProvider;
use crate::orbit::error::{GenerateError, PredictError};
use crate::orbit::phase::{ascending_node_longitude, compute_phase, normalize_longitude};
use crate::orbit::types::{
    floor_to_bucket, GroundFix, OrbitalParameters, PredictionBatch, PredictionMethod,
    PredictionPoint,
};
use crate::store::{FixHistory, PredictionStore};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const FORECAST_STEP_MIN: i64 = 5;
const FORECAST_STEPS: i64 = 19;

/// Intervals longer than this are treated as a sensor gap and replaced by
/// the nominal cadence instead of feeding an implausible velocity into the
/// phase estimate.
const MAX_FIX_INTERVAL_MIN: f64 = 30.0;
const NOMINAL_FIX_INTERVAL_MIN: f64 = 5.0;

/// The anchor fix of a batch together with its upstream metadata.
#[derive(Debug, Clone)]
pub struct SourceFix {
    pub fix: GroundFix,
    pub document_id: String,
    pub location: String,
    pub country_code: String,
}

/// Outcome of a stored batch, echoed back to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchSummary {
    pub document_id: String,
    pub prediction_count: usize,
}

/// Project a single position `minutes_ahead` minutes past the current fix.
///
/// `interval_min` is the time between the previous and current fix, used
/// only to derive the latitude velocity. Returns (latitude, longitude).
pub fn predict_position(
    current: &GroundFix,
    previous: &GroundFix,
    interval_min: f64,
    minutes_ahead: f64,
    params: &OrbitalParameters,
) -> (f64, f64) {
    let inclination = params.inclination_deg;
    let inc_rad = inclination.to_radians();

    let lat_velocity = (current.latitude - previous.latitude) / interval_min;
    let phase = compute_phase(current.latitude, lat_velocity, inclination);
    let node_lon = ascending_node_longitude(current.longitude, phase, inclination);

    let omega_orbital = TAU / params.period_min;
    let omega_earth = TAU / MINUTES_PER_DAY;

    let future_phase = (phase + omega_orbital * minutes_ahead).rem_euclid(TAU);
    let predicted_lat = inclination * future_phase.sin();

    let future_offset = (future_phase.sin() * inc_rad.cos()).atan2(future_phase.cos());
    // The ascending node regresses westward with Earth's rotation.
    let node_drift = -(omega_earth * minutes_ahead).to_degrees();
    let predicted_lon = normalize_longitude(node_lon + node_drift + future_offset.to_degrees());

    (predicted_lat, predicted_lon)
}

/// Build the 19-point batch for one fix pair. Pure: identical inputs yield
/// an identical batch.
pub fn build_batch(
    source: &SourceFix,
    previous: &GroundFix,
    params: &OrbitalParameters,
    generated_at: DateTime<Utc>,
) -> Result<PredictionBatch, PredictError> {
    let bucket = floor_to_bucket(source.fix.timestamp);

    let mut interval_min = (bucket - previous.timestamp).num_seconds() as f64 / 60.0;
    if interval_min <= 0.0 {
        return Err(PredictError::InvalidInterval(interval_min));
    }
    if interval_min > MAX_FIX_INTERVAL_MIN {
        log::warn!(
            "fix interval of {interval_min:.2} min exceeds {MAX_FIX_INTERVAL_MIN} min, \
             assuming the nominal {NOMINAL_FIX_INTERVAL_MIN} min cadence"
        );
        interval_min = NOMINAL_FIX_INTERVAL_MIN;
    }

    let predictions: Vec<PredictionPoint> = (1..=FORECAST_STEPS)
        .map(|step| {
            let minutes_ahead = step * FORECAST_STEP_MIN;
            let timestamp = bucket + Duration::minutes(minutes_ahead);
            let (latitude, longitude) = predict_position(
                &source.fix,
                previous,
                interval_min,
                minutes_ahead as f64,
                params,
            );
            PredictionPoint {
                minutes_ahead: minutes_ahead as u32,
                timestamp,
                timestamp_unix: timestamp.timestamp(),
                latitude,
                longitude,
                method: PredictionMethod::OrbitalMechanics,
            }
        })
        .collect();

    Ok(PredictionBatch {
        source_timestamp: bucket,
        source_timestamp_unix: bucket.timestamp(),
        source_document_id: source.document_id.clone(),
        source_latitude: source.fix.latitude,
        source_longitude: source.fix.longitude,
        source_location: source.location.clone(),
        source_country_code: source.country_code.clone(),
        prediction_count: predictions.len(),
        predictions,
        generated_at,
    })
}

/// The write path: one ground fix in, one stored batch out.
///
/// Collaborators are constructed once at startup and injected. Element
/// parameters are fetched once per invocation and shared by all points of
/// the batch.
pub struct Generator {
    elements: ElementsProvider,
    history: FixHistory,
    predictions: PredictionStore,
}

impl Generator {
    pub fn new(
        elements: ElementsProvider,
        history: FixHistory,
        predictions: PredictionStore,
    ) -> Self {
        Self {
            elements,
            history,
            predictions,
        }
    }

    pub async fn generate(&self, source: SourceFix) -> Result<BatchSummary, GenerateError> {
        let previous = self
            .history
            .latest_before(source.fix.timestamp)
            .await?
            .ok_or(PredictError::MissingPrecedent(source.fix.timestamp))?;

        let params = self.elements.fetch().await;
        if params.degraded {
            log::warn!("generating batch with fallback orbital parameters");
        }

        let batch = build_batch(&source, &previous, &params, Utc::now())?;
        self.predictions.write(&batch).await?;

        log::info!(
            "stored {} predictions for bucket {}",
            batch.prediction_count,
            batch.source_timestamp
        );
        Ok(BatchSummary {
            document_id: PredictionStore::bucket_key(batch.source_timestamp),
            prediction_count: batch.prediction_count,
        })
    }
}
