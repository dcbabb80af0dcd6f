//! Shared test utilities for record construction and promotion

use crate::{
    error::{CivicError, Result},
    fetch::RemoteFetcher,
    record::Payload,
    schema::RecordKind,
    search::SearchQuery,
};
use serde_json::{json, Value};
use std::{cell::RefCell, collections::BTreeMap};

pub use fixtures::{full_payload, id_stub};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// In-memory [`RemoteFetcher`] that records every call it receives.
#[derive(Debug, Default)]
pub struct MockFetcher {
    records: BTreeMap<(String, i64), Payload>,
    search_results: BTreeMap<String, Vec<Value>>,
    failure: Option<CivicError>,
    pub fetches: RefCell<Vec<(String, i64)>>,
    pub searches: RefCell<Vec<(String, SearchQuery)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        init_logging();
        MockFetcher::default()
    }

    pub fn with_record(mut self, record_type: &str, id: i64, payload: Value) -> Self {
        let Value::Object(payload) = payload else {
            panic!("fixture payload must be an object");
        };
        self.records.insert((record_type.to_string(), id), payload);
        self
    }

    pub fn with_search_results(mut self, record_type: &str, results: Vec<Value>) -> Self {
        self.search_results.insert(record_type.to_string(), results);
        self
    }

    /// Every call fails with `error`.
    pub fn failing(mut self, error: CivicError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.borrow().len()
    }
}

impl RemoteFetcher for MockFetcher {
    fn fetch(&self, record_type: &str, id: i64) -> Result<Payload> {
        self.fetches.borrow_mut().push((record_type.to_string(), id));
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.records
            .get(&(record_type.to_string(), id))
            .cloned()
            .ok_or_else(|| CivicError::Transport {
                status: Some(404),
                message: format!("no fixture for {record_type} {id}"),
            })
    }

    fn search(&self, record_type: &str, query: &SearchQuery) -> Result<Vec<Value>> {
        self.searches
            .borrow_mut()
            .push((record_type.to_string(), query.clone()));
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self
            .search_results
            .get(record_type)
            .cloned()
            .unwrap_or_default())
    }
}

/// Merge `overrides` into `base`, both JSON objects.
pub fn with_fields(mut base: Value, overrides: Value) -> Value {
    if let (Value::Object(base_map), Value::Object(over)) = (&mut base, overrides) {
        base_map.extend(over);
    }
    base
}

/// The partial gene stub used throughout the promotion tests.
pub fn braf_stub() -> Value {
    json!({
        "id": 5,
        "type": "gene",
        "name": "BRAF",
        "entrez_id": 673,
        "description": "BRAF mutations are found in many cancers.",
    })
}

/// The complete BRAF gene as served by `GET /genes/5`.
pub fn braf_full() -> Value {
    json!({
        "id": 5,
        "type": "gene",
        "name": "BRAF",
        "entrez_id": 673,
        "description": "BRAF mutations are found in many cancers.",
        "aliases": ["BRAF1", "B-RAF1", "NS7"],
        "errors": {},
        "lifecycle_actions": {"last_modified": {"timestamp": "2017-05-12T20:03:07.340Z"}},
        "provisional_values": {},
        "sources": [],
        "variants": [
            {"id": 12, "name": "V600E", "entrez_name": "BRAF"},
            {"id": 17, "name": "V600K"},
        ],
    })
}
