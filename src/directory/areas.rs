//! Area fetcher
//!
//! Area collection paths differ between backend deployments, so both the
//! `items/area` and the bare `area` spelling are tried.

use serde_json::Value;

use super::{published, Directory};
use crate::model::{Area, Status};
use crate::normalize::{scalar_id, sort_field, text_field};
use crate::query::{FallbackPlan, ItemRequest, DEFAULT_LIMIT};

const COLLECTION: &str = "area";

fn list_plan() -> FallbackPlan {
    FallbackPlan::new(COLLECTION)
        .then(ItemRequest::items(COLLECTION).limit(DEFAULT_LIMIT))
        .then(ItemRequest::raw(COLLECTION).limit(DEFAULT_LIMIT))
}

fn slug_plan(slug: &str) -> FallbackPlan {
    list_plan().then(
        ItemRequest::items(COLLECTION)
            .filter_eq("slug", slug)
            .filter_eq("status", "published"),
    )
}

/// Read an area record; id, name and slug are required
pub fn area_from_record(record: &Value) -> Option<Area> {
    let status = record
        .get("status")
        .and_then(Value::as_str)
        .map(Status::parse)
        .unwrap_or_else(|| Status::Other(String::new()));

    Some(Area {
        id: record.get("id").and_then(scalar_id)?,
        name: text_field(record, "name")?,
        slug: text_field(record, "slug")?,
        status,
        sort_order: sort_field(record),
    })
}

/// Ascending by sort order, missing treated as 0; stable
fn sort_areas(areas: &mut [Area]) {
    areas.sort_by_key(|a| a.sort_order.unwrap_or(0));
}

impl Directory {
    /// All published areas, ordered by sort order
    pub async fn areas(&self) -> Vec<Area> {
        let records = published(COLLECTION, list_plan().run(self.transport()).await);
        let mut areas: Vec<Area> = records.iter().filter_map(area_from_record).collect();
        sort_areas(&mut areas);
        areas
    }

    /// Published area by slug
    pub async fn area_by_slug(&self, slug: &str) -> Option<Area> {
        let records = published(COLLECTION, slug_plan(slug).run(self.transport()).await);
        let area = records
            .iter()
            .filter_map(area_from_record)
            .find(|a| a.slug == slug);

        if area.is_none() {
            tracing::info!(slug, "No published area with slug");
        }
        area
    }
}
