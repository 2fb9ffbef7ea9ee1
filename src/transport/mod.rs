//! ItemTransport trait - the only seam between the data layer and the backend.
//!
//! [`http::HttpTransport`] talks to a live content API; [`memory::InMemoryBackend`]
//! serves fixture collections in-process and records what it was asked.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::query::ItemRequest;

pub type Result<T> = std::result::Result<T, FetchError>;

#[async_trait]
pub trait ItemTransport: Send + Sync {
    /// Execute one read and return the `data` array of the response.
    ///
    /// A missing or non-array `data` field is an empty collection, not an error.
    async fn fetch(&self, request: &ItemRequest) -> Result<Vec<Value>>;
}

#[async_trait]
impl<T: ItemTransport + ?Sized> ItemTransport for std::sync::Arc<T> {
    async fn fetch(&self, request: &ItemRequest) -> Result<Vec<Value>> {
        (**self).fetch(request).await
    }
}

/// Pull the `data` array out of an item API response envelope
pub fn data_array(envelope: Value) -> Vec<Value> {
    match envelope {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_array_extracts_items() {
        let items = data_array(json!({ "data": [{ "id": 1 }, { "id": 2 }] }));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_data_array_tolerates_malformed_envelopes() {
        assert!(data_array(json!({})).is_empty());
        assert!(data_array(json!({ "data": null })).is_empty());
        assert!(data_array(json!({ "data": { "id": 1 } })).is_empty());
        assert!(data_array(json!([1, 2, 3])).is_empty());
    }
}
