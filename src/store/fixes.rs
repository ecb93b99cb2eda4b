use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::document::{timestamp_key, Direction, DocumentStore, RangeOp, StoreError};
use crate::orbit::types::GroundFix;

pub const FIX_HISTORY_COLLECTION: &str = "loc_history";

/// Read-only view of the ground-truth fix history written by the upstream
/// ingestion pipeline.
#[derive(Clone)]
pub struct FixHistory {
    store: Arc<dyn DocumentStore>,
}

impl FixHistory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The most recent fix strictly before `cutoff`, if any.
    pub async fn latest_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<GroundFix>, StoreError> {
        let cutoff_value = Value::String(timestamp_key(cutoff));
        let docs = self
            .store
            .query_range(
                FIX_HISTORY_COLLECTION,
                "timestamp",
                RangeOp::LessThan,
                &cutoff_value,
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
}
