//! Profile fetcher and listing entry points

use std::collections::HashMap;

use rand::Rng;
use serde_json::Value;

use super::areas::area_from_record;
use super::{published, Directory};
use crate::listing::{shuffle_and_paginate, Page, ProfileQuery};
use crate::model::{Area, Profile, Status};
use crate::normalize::{scalar_id, sort_field, text_field};
use crate::query::{FallbackPlan, ItemRequest, DEFAULT_LIMIT};
use crate::sources::{hydrate_links, SourceMap};

const COLLECTION: &str = "person";
const SOURCE_LINKS: &[&str] = &["source"];

fn plan() -> FallbackPlan {
    FallbackPlan::new(COLLECTION)
        .then(ItemRequest::items(COLLECTION).limit(DEFAULT_LIMIT).fields(
            "id,full_name,slug,person_image,biography,status,sort,source.*,area.area_id.*",
        ))
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("*,source.*,area.area_id.*"),
        )
        .then(
            ItemRequest::items(COLLECTION)
                .limit(DEFAULT_LIMIT)
                .fields("id,full_name,slug,person_image,biography,status,sort"),
        )
}

/// Published areas keyed by string-cast id, for junction rows that carry
/// a bare `area_id`
type AreaIndex = HashMap<String, Area>;

/// Area memberships: expanded areas, or junction rows wrapping an expanded
/// area or a bare `area_id` looked up in `index`. Bare array elements and
/// unpublished areas are dropped.
fn memberships(raw: Option<&Value>, index: &AreaIndex) -> Vec<Area> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item.get("area_id") {
            Some(nested @ Value::Object(_)) => area_from_record(nested),
            Some(bare) => scalar_id(bare).and_then(|id| index.get(id.as_str()).cloned()),
            None => area_from_record(item),
        })
        .filter(|area| area.status.is_published())
        .collect()
}

fn has_bare_area_ids(records: &[Value]) -> bool {
    records
        .iter()
        .filter_map(|r| r.get("area").and_then(Value::as_array))
        .flatten()
        .any(|item| item.get("area_id").is_some_and(|a| scalar_id(a).is_some()))
}

fn image_ref(record: &Value) -> Option<String> {
    match record.get("person_image")? {
        Value::Object(map) => map.get("id").and_then(scalar_id).map(|id| id.to_string()),
        other => scalar_id(other).map(|id| id.to_string()),
    }
}

fn profile_from_record(record: &Value, sources: &SourceMap, areas: &AreaIndex) -> Option<Profile> {
    Some(Profile {
        id: record.get("id").and_then(scalar_id)?,
        full_name: text_field(record, "full_name")?,
        slug: text_field(record, "slug")?,
        image_ref: image_ref(record),
        biography: text_field(record, "biography"),
        areas: memberships(record.get("area"), areas),
        sources: hydrate_links(record.get("source"), sources),
        status: Status::Published,
        sort_order: sort_field(record),
    })
}

impl Directory {
    /// Every published profile with sources and areas resolved
    pub async fn published_profiles(&self) -> Vec<Profile> {
        let records = published(COLLECTION, plan().run(self.transport()).await);
        self.build_profiles(records).await
    }

    async fn build_profiles(&self, records: Vec<Value>) -> Vec<Profile> {
        let areas = self.area_index(&records).await;
        self.hydrate(COLLECTION, records, SOURCE_LINKS, |record, sources| {
            profile_from_record(record, sources, &areas)
        })
        .await
    }

    /// Only fetched when some membership arrived as a bare `area_id`
    async fn area_index(&self, records: &[Value]) -> AreaIndex {
        if !has_bare_area_ids(records) {
            return AreaIndex::new();
        }
        let index: AreaIndex = self
            .areas()
            .await
            .into_iter()
            .map(|a| (a.id.as_str().to_string(), a))
            .collect();
        tracing::debug!(areas = index.len(), "Resolving bare area memberships");
        index
    }

    async fn filtered_profiles(&self, query: &ProfileQuery) -> Vec<Profile> {
        let profiles = self.published_profiles().await;
        let before = profiles.len();
        let kept: Vec<Profile> = profiles.into_iter().filter(|p| query.matches(p)).collect();

        tracing::debug!(
            published = before,
            matching = kept.len(),
            area = ?query.area_slug,
            name = ?query.name_query,
            "Filtered profiles"
        );
        kept
    }

    /// A page of profiles in random order.
    ///
    /// The order is reshuffled on every call, so separate page requests
    /// may overlap. `total` is the size of the whole filtered set.
    pub async fn list_profiles(&self, query: &ProfileQuery) -> Page<Profile> {
        let profiles = self.filtered_profiles(query).await;
        let page = shuffle_and_paginate(profiles, query.offset, query.limit, &mut rand::thread_rng());
        log_page(query, &page);
        page
    }

    /// Like [`list_profiles`](Self::list_profiles) with a caller-supplied
    /// randomness source, for reproducible orderings
    pub async fn list_profiles_with_rng<R>(&self, query: &ProfileQuery, rng: &mut R) -> Page<Profile>
    where
        R: Rng + Send + ?Sized,
    {
        let profiles = self.filtered_profiles(query).await;
        let page = shuffle_and_paginate(profiles, query.offset, query.limit, rng);
        log_page(query, &page);
        page
    }

    /// Published profile by slug; sources are resolved for that profile only
    pub async fn profile_by_slug(&self, slug: &str) -> Option<Profile> {
        let records = published(COLLECTION, plan().run(self.transport()).await);
        let record = records
            .into_iter()
            .find(|r| r.get("slug").and_then(Value::as_str) == Some(slug));

        let Some(record) = record else {
            tracing::info!(slug, "No published profile with slug");
            return None;
        };

        self.build_profiles(vec![record]).await.into_iter().next()
    }
}

fn log_page(query: &ProfileQuery, page: &Page<Profile>) {
    tracing::debug!(
        offset = query.offset,
        limit = query.limit,
        returned = page.data.len(),
        total = page.total,
        "Paginated profiles"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memberships_from_junction_and_direct_shapes() {
        let raw = json!([
            { "id": 50, "person_id": 1, "area_id": { "id": 3, "name": "Justice", "slug": "justice", "status": "published" } },
            { "id": 4, "name": "Economy", "slug": "economy", "status": "published", "sort": 2 },
            { "id": 51, "person_id": 1, "area_id": { "id": 5, "name": "Hidden", "slug": "hidden", "status": "draft" } },
            { "id": 52, "person_id": 1, "area_id": 6 },
            7
        ]);
        let areas = memberships(Some(&raw), &AreaIndex::new());
        let slugs: Vec<&str> = areas.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["justice", "economy"]);
        assert_eq!(areas[1].sort_order, Some(2));
    }

    #[test]
    fn test_bare_area_ids_resolve_through_index() {
        let justice =
            area_from_record(&json!({ "id": 3, "name": "Justice", "slug": "justice", "status": "published" }))
                .unwrap();
        let index: AreaIndex = [("3".to_string(), justice)].into_iter().collect();

        let raw = json!([
            { "id": 50, "person_id": 1, "area_id": 3 },
            { "id": 51, "person_id": 1, "area_id": 99 },
            { "id": 52, "person_id": 1, "area_id": null }
        ]);
        let areas = memberships(Some(&raw), &index);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].slug, "justice");

        assert!(has_bare_area_ids(&[json!({ "area": raw })]));
        assert!(!has_bare_area_ids(&[json!({ "area": [{ "area_id": { "id": 3 } }] })]));
    }

    #[test]
    fn test_profile_requires_name_and_slug() {
        let sources = SourceMap::new();
        let areas = AreaIndex::new();
        assert!(profile_from_record(&json!({ "id": 1, "slug": "a" }), &sources, &areas).is_none());
        assert!(
            profile_from_record(&json!({ "id": 1, "full_name": "A" }), &sources, &areas).is_none()
        );

        let profile = profile_from_record(
            &json!({ "id": 1, "full_name": "Ana", "slug": "ana", "person_image": { "id": "img-1" } }),
            &sources,
            &areas,
        )
        .unwrap();
        assert_eq!(profile.image_ref.as_deref(), Some("img-1"));
        assert!(profile.sources.is_empty());
    }
}
