use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::document::{timestamp_key, Direction, DocumentStore, StoreError};
use crate::orbit::types::{floor_to_bucket, PredictionBatch};

pub const PREDICTIONS_COLLECTION: &str = "loc_predictions";

/// Persistence for prediction batches, one document per 5-minute bucket.
#[derive(Clone)]
pub struct PredictionStore {
    store: Arc<dyn DocumentStore>,
}

impl PredictionStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Document key for the bucket containing `ts`.
    pub fn bucket_key(ts: DateTime<Utc>) -> String {
        timestamp_key(floor_to_bucket(ts))
    }

    /// Upsert the batch under its bucket key. A later write for the same
    /// bucket replaces the earlier one wholesale.
    pub async fn write(&self, batch: &PredictionBatch) -> Result<(), StoreError> {
        let key = Self::bucket_key(batch.source_timestamp);
        let doc = serde_json::to_value(batch)?;
        self.store.set(PREDICTIONS_COLLECTION, &key, doc).await
    }

    /// The most recently anchored batch, if any.
    pub async fn read_latest(&self) -> Result<Option<PredictionBatch>, StoreError> {
        let docs = self
            .store
            .query_ordered(
                PREDICTIONS_COLLECTION,
                "source_timestamp",
                Direction::Descending,
                1,
            )
            .await?;
        docs.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    /// Direct bucket lookup; an absent bucket is `None`, not an error.
    pub async fn read(&self, bucket: DateTime<Utc>) -> Result<Option<PredictionBatch>, StoreError> {
        let key = Self::bucket_key(bucket);
        let doc = self.store.get(PREDICTIONS_COLLECTION, &key).await?;
        doc.map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }
}
