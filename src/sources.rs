//! Source reference resolution
//!
//! Records cite sources through junction rows that only carry a
//! `source_id`. One batched lookup per fetch turns those ids into full
//! [`Source`] records; links whose target cannot be found are dropped.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::model::{CanonicalId, Source, Status};
use crate::normalize::{normalize_images, scalar_id, text_field};
use crate::query::ItemRequest;
use crate::transport::ItemTransport;

pub const SOURCE_COLLECTION: &str = "source";

/// Resolved sources keyed by string-cast id
pub type SourceMap = HashMap<String, Source>;

/// Id a junction row points at. The target may be a bare id or an
/// expanded record; bare scalars in a link array are junction row ids,
/// not source ids, and are ignored.
fn link_key(link: &Value) -> Option<CanonicalId> {
    match link.get("source_id")? {
        Value::Object(map) => map.get("id").and_then(scalar_id),
        other => scalar_id(other),
    }
}

/// The junction array to read for a record: the first of `fields` holding
/// a non-empty array
pub fn links_of<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .find(|v| v.as_array().is_some_and(|a| !a.is_empty()))
}

/// Every source key referenced under any of `fields`, across `records`
pub fn collect_link_keys(records: &[Value], fields: &[&str]) -> Vec<CanonicalId> {
    records
        .iter()
        .flat_map(|record| fields.iter().filter_map(|field| record.get(*field)))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(link_key)
        .collect()
}

/// Read one source record. Records explicitly marked with a status other
/// than published are treated as missing.
pub fn source_from_record(record: &Value) -> Option<Source> {
    let id = record.get("id").and_then(scalar_id)?;

    if let Some(status) = record.get("status").and_then(Value::as_str) {
        if !Status::parse(status).is_published() {
            return None;
        }
    }

    Some(Source {
        id,
        name: text_field(record, "name").or_else(|| text_field(record, "naziv")),
        url: text_field(record, "url"),
        slug: text_field(record, "slug"),
        source_type: text_field(record, "source_type"),
        publisher: text_field(record, "publisher"),
        file_snapshot: normalize_images(record.get("file_snapshot"), 1).into_iter().next(),
        notes: text_field(record, "notes"),
    })
}

/// Resolve `keys` with exactly one batched lookup.
///
/// Duplicates are collapsed by string form. Empty input makes no request.
/// Any failure is logged and yields an empty map.
pub async fn resolve_sources(transport: &dyn ItemTransport, keys: Vec<CanonicalId>) -> SourceMap {
    let mut seen = HashSet::new();
    let unique: Vec<String> = keys
        .into_iter()
        .map(|k| k.as_str().to_string())
        .filter(|k| seen.insert(k.clone()))
        .collect();

    if unique.is_empty() {
        return SourceMap::new();
    }

    let request = ItemRequest::items(SOURCE_COLLECTION)
        .limit(unique.len())
        .filter_in("id", unique.iter().cloned());

    let records = match transport.fetch(&request).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, requested = unique.len(), "Failed to resolve sources");
            return SourceMap::new();
        }
    };

    let map: SourceMap = records
        .iter()
        .filter_map(source_from_record)
        .map(|s| (s.id.as_str().to_string(), s))
        .collect();

    tracing::debug!(
        requested = unique.len(),
        resolved = map.len(),
        "Resolved source references"
    );
    map
}

/// Replace a junction array with its resolved sources, keeping link order
pub fn hydrate_links(links: Option<&Value>, sources: &SourceMap) -> Vec<Source> {
    links
        .and_then(Value::as_array)
        .map(|links| {
            links
                .iter()
                .filter_map(link_key)
                .filter_map(|key| sources.get(key.as_str()).cloned())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::InMemoryBackend;
    use serde_json::json;

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new().with_collection(
            SOURCE_COLLECTION,
            vec![
                json!({ "id": 1, "naziv": "Official Gazette", "url": "https://gazette.example" }),
                json!({ "id": 2, "name": "Court Registry" }),
                json!({ "id": 3, "name": "Withdrawn", "status": "archived" }),
            ],
        )
    }

    #[test]
    fn test_source_record_carries_archive_fields() {
        let source = source_from_record(&json!({
            "id": 5,
            "naziv": "Gazette",
            "slug": "gazette",
            "file_snapshot": { "id": "f-9", "filename_download": "gazette.pdf" },
            "notes": "Issue 12/2019",
            "status": "published"
        }))
        .unwrap();
        assert_eq!(source.slug.as_deref(), Some("gazette"));
        assert_eq!(source.file_snapshot.as_deref(), Some("f-9"));
        assert_eq!(source.notes.as_deref(), Some("Issue 12/2019"));

        let bare = source_from_record(&json!({ "id": 6, "file_snapshot": "f-10" })).unwrap();
        assert_eq!(bare.file_snapshot.as_deref(), Some("f-10"));
        assert!(bare.slug.is_none());
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let backend = backend();
        let map = resolve_sources(&backend, Vec::new()).await;
        assert!(map.is_empty());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_collapse_into_one_request() {
        let backend = backend();
        let keys = vec!["1".into(), CanonicalId::from(1), "2".into(), "2".into()];
        let map = resolve_sources(&backend, keys).await;

        assert_eq!(map.len(), 2);
        assert_eq!(backend.request_count("items/source"), 1);
        assert_eq!(map["1"].name.as_deref(), Some("Official Gazette"));
    }

    #[tokio::test]
    async fn test_failure_yields_empty_map() {
        let backend = backend().failing("items/source", 500);
        let map = resolve_sources(&backend, vec!["1".into()]).await;
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_drops_unresolved_and_keeps_order() {
        let backend = backend();
        let links = json!([
            { "id": 10, "source_id": 2 },
            { "id": 11, "source_id": 99 },
            { "id": 12, "source_id": "1" },
            { "id": 13, "source_id": 3 },
            14
        ]);
        let records = vec![json!({ "source": links.clone() })];
        let keys = collect_link_keys(&records, &["source"]);
        assert_eq!(keys.len(), 4);

        let map = resolve_sources(&backend, keys).await;
        let hydrated = hydrate_links(Some(&links), &map);
        let ids: Vec<&str> = hydrated.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_links_of_prefers_first_non_empty() {
        let record = json!({ "source": [], "sources": [{ "source_id": 5 }] });
        let links = links_of(&record, &["source", "sources"]).unwrap();
        assert_eq!(links.as_array().map(Vec::len), Some(1));

        assert!(links_of(&json!({ "source": null }), &["source"]).is_none());
    }

    #[test]
    fn test_link_key_accepts_expanded_target() {
        assert_eq!(
            link_key(&json!({ "source_id": { "id": 8, "name": "x" } })),
            Some("8".into())
        );
        assert_eq!(link_key(&json!(8)), None);
        assert_eq!(link_key(&json!({ "source_id": null })), None);
    }
}
