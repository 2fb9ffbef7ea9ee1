//! Topic fetcher (`tema` collection)

use std::cmp::Ordering;

use serde_json::Value;

use super::{published, Directory, MAX_LISTING_IMAGES};
use crate::model::{Status, Topic};
use crate::normalize::{date_field, normalize_images, scalar_id, sort_field, text_field};
use crate::query::{FallbackPlan, ItemRequest, DEFAULT_LIMIT};
use crate::sources::{hydrate_links, links_of, SourceMap};
use crate::timeline::timeline_order;

const COLLECTION: &str = "tema";
const SOURCE_LINKS: &[&str] = &["sources", "source"];

fn plan() -> FallbackPlan {
    FallbackPlan::new(COLLECTION)
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("*,images.directus_files_id,sources.*"),
        )
        .then(ItemRequest::items(COLLECTION).limit(DEFAULT_LIMIT))
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("id,name,description,date_from,date_to,status,sort"),
        )
}

fn topic_from_record(record: &Value, sources: &SourceMap) -> Option<Topic> {
    Some(Topic {
        id: record.get("id").and_then(scalar_id)?,
        name: text_field(record, "name")?,
        description: text_field(record, "description"),
        date_from: date_field(record, "date_from"),
        date_to: date_field(record, "date_to"),
        images: normalize_images(record.get("images"), MAX_LISTING_IMAGES),
        sources: hydrate_links(links_of(record, SOURCE_LINKS), sources),
        status: Status::Published,
        sort_order: sort_field(record),
    })
}

/// Editorial sort order first (missing = 0), then the timeline rule
fn topic_order(a: &Topic, b: &Topic) -> Ordering {
    a.sort_order
        .unwrap_or(0)
        .cmp(&b.sort_order.unwrap_or(0))
        .then_with(|| timeline_order(a, b))
}

impl Directory {
    /// All published topics
    pub async fn topics(&self) -> Vec<Topic> {
        let records = published(COLLECTION, plan().run(self.transport()).await);
        let mut topics = self
            .hydrate(COLLECTION, records, SOURCE_LINKS, topic_from_record)
            .await;
        topics.sort_by(topic_order);
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn topic(record: Value) -> Topic {
        topic_from_record(&record, &SourceMap::new()).unwrap()
    }

    #[test]
    fn test_topic_order_sort_then_dates() {
        let mut topics = vec![
            topic(json!({ "id": 1, "name": "late", "sort": 1, "date_from": "2020-01-01" })),
            topic(json!({ "id": 2, "name": "first", "sort": 0, "date_from": "2022-01-01" })),
            topic(json!({ "id": 3, "name": "early", "sort": 1, "date_from": "2019-01-01" })),
            topic(json!({ "id": 4, "name": "undated", "date_from": null })),
        ];
        topics.sort_by(topic_order);
        let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["undated", "first", "early", "late"]);
    }

    #[test]
    fn test_topic_requires_name() {
        assert!(topic_from_record(&json!({ "id": 1 }), &SourceMap::new()).is_none());
    }
}
