//! In-process item backend
//!
//! Serves fixture collections without a network, evaluates the same
//! `_eq` / `_in` filters and `limit` the real API applies, and keeps a log
//! of every request. Field selections are not projected: records are
//! returned whole, but a selection can be configured to fail so fallback
//! plans can be exercised.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::{ItemTransport, Result};
use crate::error::FetchError;
use crate::query::ItemRequest;

const IN_MEMORY_BASE: &str = "memory://";

#[derive(Debug, Clone)]
struct FailureRule {
    path: String,
    /// `None` fails every request on the path
    fields: Option<Option<String>>,
    status: u16,
}

impl FailureRule {
    fn matches(&self, request: &ItemRequest) -> bool {
        if self.path != request.path() {
            return false;
        }
        match &self.fields {
            None => true,
            Some(selection) => selection.as_deref() == request.field_selection(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    collections: HashMap<String, Vec<Value>>,
    failures: Vec<FailureRule>,
    offline: bool,
    requests: Mutex<Vec<ItemRequest>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` at `items/<collection>`
    pub fn with_collection(self, collection: &str, records: Vec<Value>) -> Self {
        self.with_path(&format!("items/{}", collection), records)
    }

    /// Serve `records` at an arbitrary path
    pub fn with_path(mut self, path: &str, records: Vec<Value>) -> Self {
        self.collections
            .insert(path.trim_matches('/').to_string(), records);
        self
    }

    /// Answer every request on `path` with `status`
    pub fn failing(mut self, path: &str, status: u16) -> Self {
        self.failures.push(FailureRule {
            path: path.trim_matches('/').to_string(),
            fields: None,
            status,
        });
        self
    }

    /// Answer requests on `path` with exactly this field selection (`None`
    /// means no `fields` parameter) with `status`
    pub fn failing_fields(mut self, path: &str, fields: Option<&str>, status: u16) -> Self {
        self.failures.push(FailureRule {
            path: path.trim_matches('/').to_string(),
            fields: Some(fields.map(str::to_string)),
            status,
        });
        self
    }

    /// Every request fails at the transport level
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Build from a JSON object mapping paths to record arrays, e.g.
    /// `{ "items/person": [...], "items/source": [...] }`
    pub fn from_fixture(fixture: Value) -> Result<Self> {
        let Value::Object(map) = fixture else {
            return Err(FetchError::Decode {
                url: IN_MEMORY_BASE.to_string(),
                reason: "fixture must be a JSON object of path -> records".to_string(),
            });
        };

        let mut backend = Self::new();
        for (path, records) in map {
            match records {
                Value::Array(items) => backend = backend.with_path(&path, items),
                _ => {
                    return Err(FetchError::Decode {
                        url: format!("{}{}", IN_MEMORY_BASE, path),
                        reason: "fixture entry must be an array".to_string(),
                    })
                }
            }
        }
        Ok(backend)
    }

    /// Every request served so far, in order
    pub fn requests(&self) -> Vec<ItemRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests served for `path`
    pub fn request_count(&self, path: &str) -> usize {
        let path = path.trim_matches('/');
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.path() == path)
            .count()
    }

    fn record(&self, request: &ItemRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
    }
}

#[async_trait]
impl ItemTransport for InMemoryBackend {
    async fn fetch(&self, request: &ItemRequest) -> Result<Vec<Value>> {
        self.record(request);
        let url = format!("{}{}", IN_MEMORY_BASE, request);

        if self.offline {
            return Err(FetchError::Transport {
                url,
                reason: "backend offline".to_string(),
            });
        }

        if let Some(rule) = self.failures.iter().find(|rule| rule.matches(request)) {
            let body = r#"{"errors":[{"message":"You don't have permission to access this."}]}"#;
            return Err(FetchError::status(rule.status, url, body));
        }

        let Some(records) = self.collections.get(request.path()) else {
            let body = r#"{"errors":[{"message":"Route doesn't exist."}]}"#;
            return Err(FetchError::status(404, url, body));
        };

        let limit = request.row_limit().unwrap_or(usize::MAX);
        Ok(records
            .iter()
            .filter(|record| request.filters().iter().all(|f| f.matches(record)))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new().with_collection(
            "source",
            vec![
                json!({ "id": 1, "naziv": "Gazette" }),
                json!({ "id": 2, "naziv": "Registry" }),
                json!({ "id": 3, "naziv": "Archive" }),
            ],
        )
    }

    #[tokio::test]
    async fn test_in_filter_and_request_log() {
        let backend = backend();
        let request = ItemRequest::items("source").filter_in("id", ["1", "3"]);
        let records = backend.fetch(&request).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(backend.request_count("items/source"), 1);
        assert_eq!(backend.requests()[0], request);
    }

    #[tokio::test]
    async fn test_limit_applies_after_filters() {
        let records = backend()
            .fetch(&ItemRequest::items("source").limit(2))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let err = backend()
            .fetch(&ItemRequest::items("person"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_failing_fields_only_hits_that_selection() {
        let backend = backend().failing_fields("items/source", Some("*,x.*"), 403);

        let err = backend
            .fetch(&ItemRequest::items("source").fields("*,x.*"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(403));

        let ok = backend.fetch(&ItemRequest::items("source")).await.unwrap();
        assert_eq!(ok.len(), 3);
    }

    #[tokio::test]
    async fn test_offline_is_transport_error() {
        let err = backend()
            .offline()
            .fetch(&ItemRequest::items("source"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[test]
    fn test_from_fixture_rejects_non_arrays() {
        assert!(InMemoryBackend::from_fixture(json!({ "items/person": {} })).is_err());
        assert!(InMemoryBackend::from_fixture(json!([])).is_err());

        let backend =
            InMemoryBackend::from_fixture(json!({ "items/person": [{ "id": 1 }] })).unwrap();
        assert!(backend.collections.contains_key("items/person"));
    }
}
