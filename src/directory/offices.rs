//! Public office fetcher

use serde_json::Value;

use super::{published, Directory};
use crate::model::{CanonicalId, OfficeLevel, PublicOffice, Status};
use crate::normalize::{
    date_field, normalize_images, owner_id_of, parse_place, scalar_id, text_field,
};
use crate::query::{FallbackPlan, ItemRequest, DEFAULT_LIMIT};
use crate::sources::{hydrate_links, links_of, SourceMap};
use crate::timeline::sort_timeline;

const COLLECTION: &str = "public_office";

/// Owner reference field names, in lookup order
const OWNER_FIELDS: &[&str] = &["person", "person_id", "personId"];

/// Older schemas link sources under `source`, newer ones under `sources`
const SOURCE_LINKS: &[&str] = &["source", "sources"];

fn plan() -> FallbackPlan {
    FallbackPlan::new(COLLECTION)
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("*,place.naziv,images.directus_files_id,source.*,sources.*"),
        )
        .then(ItemRequest::items(COLLECTION).limit(DEFAULT_LIMIT))
        .then(ItemRequest::items(COLLECTION).limit(DEFAULT_LIMIT).fields(
            "id,title,body,start_date,end_date,level,place,province,institucija,\
             appointed_or_elected,description,status,person,person_id",
        ))
}

fn office_from_record(record: &Value, sources: &SourceMap) -> Option<PublicOffice> {
    Some(PublicOffice {
        id: record.get("id").and_then(scalar_id)?,
        profile_id: owner_id_of(record, OWNER_FIELDS)?,
        title: text_field(record, "title")?,
        body: text_field(record, "body"),
        description: text_field(record, "description"),
        institution: text_field(record, "institucija")
            .or_else(|| text_field(record, "institution")),
        level: text_field(record, "level").map(OfficeLevel::from),
        place: parse_place(record.get("place")),
        province: text_field(record, "province"),
        appointed_or_elected: text_field(record, "appointed_or_elected"),
        start_date: date_field(record, "start_date"),
        end_date: date_field(record, "end_date"),
        images: normalize_images(record.get("images"), usize::MAX),
        video: text_field(record, "video"),
        sources: hydrate_links(links_of(record, SOURCE_LINKS), sources),
        status: Status::Published,
    })
}

impl Directory {
    /// Published offices held by one profile, oldest first
    pub async fn public_offices_for(&self, profile_id: &CanonicalId) -> Vec<PublicOffice> {
        let records = published(COLLECTION, plan().run(self.transport()).await);
        let owned: Vec<Value> = records
            .into_iter()
            .filter(|r| owner_id_of(r, OWNER_FIELDS).as_ref() == Some(profile_id))
            .collect();

        tracing::debug!(profile = %profile_id, offices = owned.len(), "Filtered offices by owner");

        let mut offices = self
            .hydrate(COLLECTION, owned, SOURCE_LINKS, office_from_record)
            .await;
        sort_timeline(&mut offices);
        offices
    }
}
