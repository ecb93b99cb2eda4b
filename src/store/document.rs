//! Keyed-document store abstraction.
//!
//! Documents are JSON values grouped into named collections, addressed by a
//! string key. Ordered and range queries sort on a single document field;
//! the backend supports only one inequality filter per query, so callers
//! must not combine range filters across fields.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    LessThan,
    /// Kept for API symmetry with the backing store's query surface.
    #[allow(dead_code)]
    GreaterThan,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Full overwrite; the last write for a key wins wholesale.
    async fn set(&self, collection: &str, key: &str, doc: Value) -> Result<(), StoreError>;

    /// All documents carrying `field`, sorted by it, truncated to `limit`.
    async fn query_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;

    /// Documents whose `field` satisfies `op` against `value`, sorted by the
    /// same field, truncated to `limit`.
    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        op: RangeOp,
        value: &Value,
        direction: Direction,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;
}

/// Canonical string form of a timestamp, matching how `chrono` serializes
/// `DateTime<Utc>` into documents. RFC 3339 in UTC orders lexicographically.
pub fn timestamp_key(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Order two field values. Same-type values compare naturally; mismatched
/// types compare equal, which leaves their relative order unspecified.
fn compare_fields(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

pub(crate) fn sort_by_field(docs: &mut [Value], field: &str, direction: Direction) {
    docs.sort_by(|a, b| {
        let ordering = match (a.get(field), b.get(field)) {
            (Some(a), Some(b)) => compare_fields(a, b),
            _ => Ordering::Equal,
        };
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

pub(crate) fn matches_range(doc: &Value, field: &str, op: RangeOp, value: &Value) -> bool {
    let Some(field_value) = doc.get(field) else {
        return false;
    };
    let ordering = compare_fields(field_value, value);
    match op {
        RangeOp::LessThan => ordering == Ordering::Less,
        RangeOp::GreaterThan => ordering == Ordering::Greater,
    }
}
