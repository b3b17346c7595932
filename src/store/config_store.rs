//! In-memory keyed collection of configuration records.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::observability::metrics;
use crate::store::error::StoreError;
use crate::store::matcher::{MetadataMatcher, SearchQuery};
use crate::store::record::ConfigRecord;

/// Thread-safe store of configuration records keyed by name.
///
/// Every operation holds a single store-wide lock for its whole duration,
/// reads included, so callers never observe a half-applied write. Records
/// are created and replaced with insert-or-overwrite semantics; there is no
/// "already exists" conflict.
#[derive(Debug, Default)]
pub struct ConfigStore {
    records: Mutex<HashMap<String, ConfigRecord>>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ConfigRecord>> {
        // No operation leaves the map half-written, so poisoning is ignored.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every record, in no particular order.
    pub fn list(&self) -> Vec<ConfigRecord> {
        let records = self.lock();
        metrics::record_operation("list", "ok");
        records.values().cloned().collect()
    }

    /// Fetch the record stored under `name`.
    pub fn get(&self, name: &str) -> Result<ConfigRecord, StoreError> {
        let records = self.lock();
        let result = records
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()));
        drop(records);
        record_outcome("get", &result);
        result
    }

    /// Insert or overwrite the record under its own name.
    pub fn put(&self, record: ConfigRecord) -> Result<(), StoreError> {
        if record.name.is_empty() {
            let err = StoreError::invalid("config name must not be empty");
            metrics::record_operation("put", err.kind());
            return Err(err);
        }

        let mut records = self.lock();
        let replaced = records.insert(record.name.clone(), record).is_some();
        let size = records.len();
        drop(records);

        tracing::debug!(replaced, records = size, "Config stored");
        metrics::record_operation("put", "ok");
        metrics::record_store_size(size);
        Ok(())
    }

    /// Replace the record stored under an existing key.
    ///
    /// The record stays under `name` whatever name the replacement carries;
    /// its `name` field is rewritten to the key.
    pub fn update(&self, name: &str, mut record: ConfigRecord) -> Result<ConfigRecord, StoreError> {
        let mut records = self.lock();
        let result = match records.get_mut(name) {
            Some(existing) => {
                if !record.name.is_empty() && record.name != name {
                    tracing::debug!(key = %name, body_name = %record.name, "Ignoring name in update body");
                }
                record.name = name.to_string();
                *existing = record;
                Ok(existing.clone())
            }
            None => Err(StoreError::NotFound(name.to_string())),
        };
        drop(records);
        record_outcome("update", &result);
        result
    }

    /// Remove and return the record stored under `name`.
    pub fn delete(&self, name: &str) -> Result<ConfigRecord, StoreError> {
        let mut records = self.lock();
        let result = records
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()));
        let size = records.len();
        drop(records);

        record_outcome("delete", &result);
        if result.is_ok() {
            metrics::record_store_size(size);
        }
        result
    }

    /// Records whose metadata holds `value` at the dotted `path`.
    pub fn search(&self, path: &str, value: &str) -> Result<Vec<ConfigRecord>, StoreError> {
        let query = match SearchQuery::new(path, value) {
            Ok(query) => query,
            Err(err) => {
                metrics::record_operation("search", err.kind());
                return Err(err);
            }
        };
        Ok(self.search_query(&query))
    }

    /// Run an already parsed query.
    pub fn search_query(&self, query: &SearchQuery) -> Vec<ConfigRecord> {
        let matcher = MetadataMatcher::new(query);
        let records = self.lock();
        let matched: Vec<ConfigRecord> = records
            .values()
            .filter(|record| matcher.matches(record))
            .cloned()
            .collect();
        drop(records);

        tracing::debug!(path = %query.path(), value = %query.value(), matched = matched.len(), "Search complete");
        metrics::record_operation("search", "ok");
        matched
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn record_outcome<T>(operation: &'static str, result: &Result<T, StoreError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    metrics::record_operation(operation, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn record(json: &str) -> ConfigRecord {
        serde_json::from_str(json).unwrap()
    }

    fn names(records: &[ConfigRecord]) -> HashSet<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_empty_store() {
        let store = ConfigStore::new();
        assert!(store.list().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.get("test"), Err(StoreError::NotFound("test".into())));
        assert_eq!(store.delete("test"), Err(StoreError::NotFound("test".into())));
        assert!(store.search("metadata.limits.cpu", "1").unwrap().is_empty());
    }

    #[test]
    fn test_put_then_get_returns_latest() {
        let store = ConfigStore::new();
        store.put(record(r#"{"name":"a","metadata":{"v":"1"}}"#)).unwrap();
        store.put(record(r#"{"name":"b","metadata":{"v":"1"}}"#)).unwrap();
        store.put(record(r#"{"name":"a","metadata":{"v":"2"}}"#)).unwrap();

        assert_eq!(store.get("a").unwrap(), record(r#"{"name":"a","metadata":{"v":"2"}}"#));
        assert_eq!(store.len(), 2);
        assert_eq!(names(&store.list()), HashSet::from(["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_put_is_idempotent() {
        let store = ConfigStore::new();
        let r = record(r#"{"name":"a","metadata":{"limits":{"cpu":"1"}}}"#);
        store.put(r.clone()).unwrap();
        let once = store.list();
        store.put(r).unwrap();
        assert_eq!(store.list(), once);
    }

    #[test]
    fn test_put_rejects_empty_name() {
        let store = ConfigStore::new();
        let err = store.put(record(r#"{"metadata":{"x":"1"}}"#)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let store = ConfigStore::new();
        store.put(record(r#"{"name":"a"}"#)).unwrap();
        store.put(record(r#"{"name":"b"}"#)).unwrap();

        assert_eq!(store.delete("a").unwrap().name, "a");
        assert_eq!(store.get("a"), Err(StoreError::NotFound("a".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_keeps_key() {
        let store = ConfigStore::new();
        store.put(record(r#"{"name":"a","metadata":{}}"#)).unwrap();

        let updated = store
            .update("a", record(r#"{"name":"b","metadata":{"x":1}}"#))
            .unwrap();
        assert_eq!(updated.name, "a");

        let stored = store.get("a").unwrap();
        assert_eq!(stored.metadata, record(r#"{"metadata":{"x":1}}"#).metadata);
        assert_eq!(store.get("b"), Err(StoreError::NotFound("b".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_missing_key() {
        let store = ConfigStore::new();
        let err = store
            .update("datacenter-1", record(r#"{"name":"datacenter-1","metadata":{"limits":{"cpu":"1"}}}"#))
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("datacenter-1".into()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_search_scenarios() {
        let store = ConfigStore::new();
        store.put(record(r#"{"name":"test","metadata":{"burger":{"calories":"230"}}}"#)).unwrap();
        store.put(record(r#"{"name":"datacenter-1","metadata":{"limits":{"cpu":"1","mem":"500m"}}}"#)).unwrap();

        let found = store.search("metadata.burger.calories", "230").unwrap();
        assert_eq!(names(&found), HashSet::from(["test".to_string()]));
        assert!(store.search("metadata.burger.calories", "240").unwrap().is_empty());

        let found = store.search("metadata.limits.cpu", "1").unwrap();
        assert_eq!(names(&found), HashSet::from(["datacenter-1".to_string()]));
        assert!(store.search("metadata.limits.mem", "1").unwrap().is_empty());
    }

    #[test]
    fn test_search_reports_each_record_once() {
        let store = ConfigStore::new();
        store
            .put(record(
                r#"{"name":"multi","metadata":{"limits":{"cpu":"1"},"pool":{"limits":{"cpu":"1"}}}}"#,
            ))
            .unwrap();

        let found = store.search("metadata.limits.cpu", "1").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_search_rejects_foreign_root() {
        let store = ConfigStore::new();
        store.put(record(r#"{"name":"a","metadata":{"limits":{"cpu":"1"}}}"#)).unwrap();
        let err = store.search("limits.cpu", "1").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn test_concurrent_puts_are_all_visible() {
        let store = Arc::new(ConfigStore::new());
        std::thread::scope(|scope| {
            for worker in 0..8 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for i in 0..50 {
                        let name = format!("w{}-{}", worker, i);
                        store.put(ConfigRecord::new(name, Default::default())).unwrap();
                    }
                });
            }
        });
        assert_eq!(store.len(), 400);
        assert_eq!(store.list().len(), 400);
    }
}
