//! Read paths over the prediction store.
//!
//! Every retrieval degrades to a well-formed empty shape instead of
//! erroring: a missing batch, a failed lookup, or a timed-out half of the
//! response each blank out only their own slice.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::time::timeout;
use utoipa::ToSchema;

use crate::orbit::types::{floor_to_bucket, PredictionMethod, PredictionPoint, BUCKET_MINUTES};
use crate::store::PredictionStore;

/// Horizon labels served by the historical view, in minutes.
const HORIZONS_MIN: [i64; 3] = [90, 60, 30];

/// Historical points are clipped to this much history before `now`.
const HISTORY_WINDOW_MIN: i64 = 90;

/// A future point from the latest batch, tagged with its anchor.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentPoint {
    #[serde(flatten)]
    pub point: PredictionPoint,
    pub source_timestamp: DateTime<Utc>,
}

/// A past point as it was predicted at the time, projected down to the
/// fields the comparison view needs.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub source_timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentPredictions {
    pub orbital_mechanics: Vec<CurrentPoint>,
    pub prediction_count: usize,
}

impl CurrentPredictions {
    fn empty() -> Self {
        Self {
            orbital_mechanics: Vec::new(),
            prediction_count: 0,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoricalPredictions {
    pub predictions_90min_ago: Vec<HistoricalPoint>,
    pub predictions_60min_ago: Vec<HistoricalPoint>,
    pub predictions_30min_ago: Vec<HistoricalPoint>,
}

impl HistoricalPredictions {
    fn empty() -> Self {
        Self {
            predictions_90min_ago: Vec::new(),
            predictions_60min_ago: Vec::new(),
            predictions_30min_ago: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStatus {
    Success,
    Error,
}

/// The full retrieval response. Always fully structured; never partial.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionData {
    pub status: RetrievalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub predictions: CurrentPredictions,
    pub historical_predictions: HistoricalPredictions,
}

pub struct Retriever {
    store: PredictionStore,
    current_timeout: StdDuration,
    historical_timeout: StdDuration,
}

impl Retriever {
    pub fn new(
        store: PredictionStore,
        current_timeout: StdDuration,
        historical_timeout: StdDuration,
    ) -> Self {
        Self {
            store,
            current_timeout,
            historical_timeout,
        }
    }

    /// Future points of the latest batch, sorted ascending.
    pub async fn current(&self, now: DateTime<Utc>) -> CurrentPredictions {
        let batch = match self.store.read_latest().await {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                log::warn!("no prediction batches stored yet");
                return CurrentPredictions::empty();
            }
            Err(e) => {
                log::warn!("latest-batch lookup failed: {e}");
                return CurrentPredictions::empty();
            }
        };

        let source_timestamp = batch.source_timestamp;
        let mut points: Vec<CurrentPoint> = batch
            .predictions
            .into_iter()
            .filter(|p| p.method == PredictionMethod::OrbitalMechanics && p.timestamp > now)
            .map(|point| CurrentPoint {
                point,
                source_timestamp,
            })
            .collect();
        points.sort_by_key(|p| p.point.timestamp);

        CurrentPredictions {
            prediction_count: points.len(),
            orbital_mechanics: points,
        }
    }

    /// What was predicted for the body 90, 60 and 30 minutes ago. The three
    /// bucket lookups are independent and run concurrently; a failed or
    /// empty horizon contributes an empty list without affecting the rest.
    pub async fn historical(&self, now: DateTime<Utc>) -> HistoricalPredictions {
        let (h90, h60, h30) = tokio::join!(
            self.horizon(now, HORIZONS_MIN[0]),
            self.horizon(now, HORIZONS_MIN[1]),
            self.horizon(now, HORIZONS_MIN[2]),
        );
        HistoricalPredictions {
            predictions_90min_ago: h90,
            predictions_60min_ago: h60,
            predictions_30min_ago: h30,
        }
    }

    /// Current and historical views fetched concurrently, each under its
    /// own timeout. `status` is `error` only when both halves degrade.
    pub async fn all(&self, now: DateTime<Utc>) -> PredictionData {
        let (current, historical) = tokio::join!(
            timeout(self.current_timeout, self.current(now)),
            timeout(self.historical_timeout, self.historical(now)),
        );

        let (predictions, current_ok) = match current {
            Ok(current) => (current, true),
            Err(_) => {
                log::warn!("current-prediction retrieval timed out");
                (CurrentPredictions::empty(), false)
            }
        };
        let (historical_predictions, historical_ok) = match historical {
            Ok(historical) => (historical, true),
            Err(_) => {
                log::warn!("historical-prediction retrieval timed out");
                (HistoricalPredictions::empty(), false)
            }
        };

        if current_ok || historical_ok {
            PredictionData {
                status: RetrievalStatus::Success,
                error: None,
                predictions,
                historical_predictions,
            }
        } else {
            PredictionData {
                status: RetrievalStatus::Error,
                error: Some("prediction retrieval timed out".into()),
                predictions,
                historical_predictions,
            }
        }
    }

    /// Points predicted for `horizon_min` minutes ago onward.
    ///
    /// A batch starts predicting one cadence step after its own bucket, so
    /// the batch that predicted the position at `horizon_min` ago is
    /// anchored `horizon_min + 5` minutes back. This assumes the generation
    /// cadence holds; if it drifts, the lookup targets a stale bucket.
    async fn horizon(&self, now: DateTime<Utc>, horizon_min: i64) -> Vec<HistoricalPoint> {
        let bucket = floor_to_bucket(now - Duration::minutes(horizon_min + BUCKET_MINUTES));
        let batch = match self.store.read(bucket).await {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                log::warn!("no batch stored for bucket {bucket} ({horizon_min} min horizon)");
                return Vec::new();
            }
            Err(e) => {
                log::warn!("bucket lookup for {horizon_min} min horizon failed: {e}");
                return Vec::new();
            }
        };

        let window_start = now - Duration::minutes(HISTORY_WINDOW_MIN);
        let source_timestamp = batch.source_timestamp;
        let mut points: Vec<HistoricalPoint> = batch
            .predictions
            .into_iter()
            .filter(|p| {
                p.method == PredictionMethod::OrbitalMechanics
                    && p.timestamp >= window_start
                    && p.timestamp <= now
            })
            .map(|p| HistoricalPoint {
                timestamp: p.timestamp,
                latitude: p.latitude,
                longitude: p.longitude,
                source_timestamp,
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}
