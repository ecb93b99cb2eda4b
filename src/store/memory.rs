//! In-memory document store used as the test double.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::document::{
    matches_range, sort_by_field, Direction, DocumentStore, RangeOp, StoreError,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn collect(&self, collection: &str, field: &str) -> Vec<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field).is_some())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn set(&self, collection: &str, key: &str, doc: Value) -> Result<(), StoreError> {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc);
        Ok(())
    }

    async fn query_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let mut docs = self.collect(collection, field);
        sort_by_field(&mut docs, field, direction);
        docs.truncate(limit);
        Ok(docs)
    }

    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        op: RangeOp,
        value: &Value,
        direction: Direction,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let mut docs = self.collect(collection, field);
        docs.retain(|doc| matches_range(doc, field, op, value));
        sort_by_field(&mut docs, field, direction);
        docs.truncate(limit);
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = MemoryStore::new();
        store
            .set("c", "k", json!({"timestamp": "2024-01-15T15:00:00Z"}))
            .await
            .unwrap();
        let doc = store.get("c", "k").await.unwrap().unwrap();
        assert_eq!(doc["timestamp"], "2024-01-15T15:00:00Z");
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("c", "absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_set_replaces_first() {
        let store = MemoryStore::new();
        store.set("c", "k", json!({"v": 1})).await.unwrap();
        store.set("c", "k", json!({"v": 2})).await.unwrap();
        assert_eq!(store.document_count("c"), 1);
        assert_eq!(store.get("c", "k").await.unwrap().unwrap()["v"], 2);
    }

    #[tokio::test]
    async fn ordered_query_respects_direction_and_limit() {
        let store = MemoryStore::new();
        for (key, ts) in [("a", "2024-01-15T15:00:00Z"), ("b", "2024-01-15T15:10:00Z"), ("c", "2024-01-15T15:05:00Z")] {
            store.set("c", key, json!({"timestamp": ts})).await.unwrap();
        }

        let latest = store
            .query_ordered("c", "timestamp", Direction::Descending, 1)
            .await
            .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0]["timestamp"], "2024-01-15T15:10:00Z");

        let all = store
            .query_ordered("c", "timestamp", Direction::Ascending, 10)
            .await
            .unwrap();
        assert_eq!(all[0]["timestamp"], "2024-01-15T15:00:00Z");
        assert_eq!(all[2]["timestamp"], "2024-01-15T15:10:00Z");
    }

    #[tokio::test]
    async fn range_query_is_strict() {
        let store = MemoryStore::new();
        for (key, ts) in [("a", "2024-01-15T15:00:00Z"), ("b", "2024-01-15T15:05:00Z")] {
            store.set("c", key, json!({"timestamp": ts})).await.unwrap();
        }

        let cutoff = json!("2024-01-15T15:05:00Z");
        let before = store
            .query_range("c", "timestamp", RangeOp::LessThan, &cutoff, Direction::Descending, 5)
            .await
            .unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0]["timestamp"], "2024-01-15T15:00:00Z");
    }

    #[tokio::test]
    async fn documents_without_the_field_are_excluded() {
        let store = MemoryStore::new();
        store.set("c", "a", json!({"other": 1})).await.unwrap();
        store
            .set("c", "b", json!({"timestamp": "2024-01-15T15:00:00Z"}))
            .await
            .unwrap();

        let docs = store
            .query_ordered("c", "timestamp", Direction::Ascending, 10)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }
}
