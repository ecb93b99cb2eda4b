//! File-backed document store: one folder per collection, one JSON file per
//! key. Queries load the collection and sort in memory, which is adequate
//! for the write cadence of one document every five minutes.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::error;
use serde_json::Value;

use super::document::{
    matches_range, sort_by_field, Direction, DocumentStore, RangeOp, StoreError,
};

pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        FileStore { base }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.base.join(collection)
    }

    fn document_path(&self, collection: &str, key: &str) -> PathBuf {
        // Keys are RFC 3339 timestamps; ':' is not portable in file names.
        self.collection_path(collection)
            .join(format!("{}.json", key.replace(':', "_")))
    }

    fn load_collection(&self, collection: &str, field: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for entry in path.read_dir()? {
            let entry_path = entry?.path();
            if !entry_path.is_file() {
                continue;
            }
            match read_document(&entry_path) {
                Ok(doc) => {
                    if doc.get(field).is_some() {
                        docs.push(doc);
                    }
                }
                Err(e) => {
                    error!("skipping document {}: {}", entry_path.display(), e);
                }
            }
        }
        Ok(docs)
    }
}

fn read_document(path: &Path) -> Result<Value, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.document_path(collection, key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(read_document(&path)?))
    }

    async fn set(&self, collection: &str, key: &str, doc: Value) -> Result<(), StoreError> {
        fs::create_dir_all(self.collection_path(collection))?;
        let content = serde_json::to_string_pretty(&doc)?;
        fs::write(self.document_path(collection, key), content)?;
        Ok(())
    }

    async fn query_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let mut docs = self.load_collection(collection, field)?;
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
        let mut docs = self.load_collection(collection, field)?;
        docs.retain(|doc| matches_range(doc, field, op, value));
        sort_by_field(&mut docs, field, direction);
        docs.truncate(limit);
        Ok(docs)
    }
}
