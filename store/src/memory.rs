use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::remote::{Record, RemoteError, RemoteStore};

/// In-memory RemoteStore for testing and as the bundled development backend.
///
/// Supports failure injection: [`fail_next`](MemoryStore::fail_next) makes the
/// next `n` calls return [`RemoteError::Unavailable`], which is how rollback
/// and reconciliation paths are exercised in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Record>>>>,
    next_id: Arc<AtomicU64>,
    fail_ops: Arc<AtomicU32>,
    calls: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` remote calls fail.
    pub fn fail_next(&self, n: u32) {
        self.fail_ops.store(n, Ordering::SeqCst);
    }

    /// Total number of remote calls issued so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of records currently in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn begin_call(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_ops.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_ops.store(remaining - 1, Ordering::SeqCst);
            return Err(RemoteError::Unavailable);
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    async fn query_owned(
        &self,
        collection: &str,
        owner_id: &str,
    ) -> Result<Vec<Record>, RemoteError> {
        self.begin_call()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        r.fields.get("userId").and_then(Value::as_str) == Some(owner_id)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<String, RemoteError> {
        self.begin_call()?;
        let id = format!("r{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Record {
                id: id.clone(),
                fields,
            });
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), RemoteError> {
        self.begin_call()?;
        let mut collections = self.collections.lock().unwrap();
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        for (key, value) in fields {
            record.fields.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        self.begin_call()?;
        let mut collections = self.collections.lock().unwrap();
        if let Some(records) = collections.get_mut(collection) {
            records.retain(|r| r.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_fields(owner: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("userId".into(), Value::from(owner));
        fields
    }

    #[tokio::test]
    async fn test_queries_are_scoped_by_owner() {
        let store = MemoryStore::new();
        store.create("tasks", owned_fields("u1")).await.unwrap();
        store.create("tasks", owned_fields("u2")).await.unwrap();
        store.create("tasks", owned_fields("u1")).await.unwrap();

        let mine = store.query_owned("tasks", "u1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(store.query_owned("notes", "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_record_errors() {
        let store = MemoryStore::new();
        let err = store
            .update("tasks", "nope", Map::new())
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::NotFound("nope".into()));

        // Deleting a missing record is fine.
        store.delete("tasks", "nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_fail_next_injects_failures() {
        let store = MemoryStore::new();
        store.fail_next(2);
        assert!(store.create("tasks", Map::new()).await.is_err());
        assert!(store.query_owned("tasks", "u1").await.is_err());
        assert!(store.query_owned("tasks", "u1").await.is_ok());
        assert_eq!(store.call_count(), 3);
    }
}
