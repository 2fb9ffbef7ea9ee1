//! Activity fetcher
//!
//! Activities belong to a set of profiles rather than one owner. The
//! `persons` relation may be a junction array or a single relation.

use serde_json::Value;

use super::{published, Directory, MAX_LISTING_IMAGES};
use crate::model::{Activity, CanonicalId, Status};
use crate::normalize::{
    date_field, normalize_images, owner_ids, parse_place, scalar_id, sort_field, text_field,
};
use crate::query::{FallbackPlan, ItemRequest, DEFAULT_LIMIT};
use crate::sources::{hydrate_links, links_of, SourceMap};
use crate::timeline::sort_timeline;

const COLLECTION: &str = "activity";
const SOURCE_LINKS: &[&str] = &["sources", "source"];

fn plan() -> FallbackPlan {
    FallbackPlan::new(COLLECTION)
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("*,place.naziv,persons.*,images.directus_files_id,sources.*"),
        )
        .then(ItemRequest::items(COLLECTION).limit(DEFAULT_LIMIT))
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("id,title,type,description,start_date,end_date,place,persons,status,sort"),
        )
}

fn persons_of(record: &Value) -> Vec<CanonicalId> {
    record.get("persons").map(owner_ids).unwrap_or_default()
}

fn activity_from_record(record: &Value, sources: &SourceMap) -> Option<Activity> {
    Some(Activity {
        id: record.get("id").and_then(scalar_id)?,
        title: text_field(record, "title")?,
        activity_type: text_field(record, "type"),
        description: text_field(record, "description"),
        start_date: date_field(record, "start_date"),
        end_date: date_field(record, "end_date"),
        place: parse_place(record.get("place")),
        persons: persons_of(record),
        images: normalize_images(record.get("images"), MAX_LISTING_IMAGES),
        video: text_field(record, "video"),
        sources: hydrate_links(links_of(record, SOURCE_LINKS), sources),
        status: Status::Published,
        sort_order: sort_field(record),
    })
}

impl Directory {
    /// Published activities one profile took part in, oldest first
    pub async fn activities_for(&self, profile_id: &CanonicalId) -> Vec<Activity> {
        let records = published(COLLECTION, plan().run(self.transport()).await);
        let involved: Vec<Value> = records
            .into_iter()
            .filter(|r| persons_of(r).contains(profile_id))
            .collect();

        tracing::debug!(profile = %profile_id, activities = involved.len(), "Filtered activities by person");

        let mut activities = self
            .hydrate(COLLECTION, involved, SOURCE_LINKS, activity_from_record)
            .await;
        sort_timeline(&mut activities);
        activities
    }
}
