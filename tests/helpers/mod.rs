//! Fixture builders for directory integration tests
//!
//! Records are shaped the way the content API returns them: snake_case
//! wire names, junction rows for many-to-many relations, numeric ids.

#![allow(dead_code)]

use serde_json::{json, Value};

pub fn published_profile(id: i64, full_name: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "full_name": full_name,
        "slug": slug,
        "person_image": format!("img-{}", id),
        "biography": format!("<p>{}</p>", full_name),
        "status": "published",
        "sort": id,
        "source": [],
        "area": []
    })
}

pub fn draft_profile(id: i64, full_name: &str, slug: &str) -> Value {
    let mut record = published_profile(id, full_name, slug);
    record["status"] = json!("draft");
    record
}

pub fn area(id: i64, name: &str, slug: &str) -> Value {
    json!({ "id": id, "name": name, "slug": slug, "status": "published", "sort": id })
}

/// Attach areas as `person_area` junction rows with the area expanded
pub fn with_areas(mut profile: Value, areas: &[Value]) -> Value {
    let person_id = profile["id"].clone();
    profile["area"] = Value::Array(
        areas
            .iter()
            .enumerate()
            .map(|(i, a)| json!({ "id": 1000 + i as i64, "person_id": person_id, "area_id": a }))
            .collect(),
    );
    profile
}

/// Attach source links (junction rows carrying only `source_id`)
pub fn with_source_links(mut record: Value, field: &str, source_ids: &[Value]) -> Value {
    record[field] = Value::Array(
        source_ids
            .iter()
            .enumerate()
            .map(|(i, id)| json!({ "id": 5000 + i as i64, "source_id": id }))
            .collect(),
    );
    record
}

pub fn source(id: i64, name: &str) -> Value {
    json!({ "id": id, "naziv": name, "url": format!("https://sources.example/{}", id) })
}

pub fn office(id: i64, owner_field: &str, owner: Value, title: &str, start: Option<&str>, end: Option<&str>) -> Value {
    let mut record = json!({
        "id": id,
        "title": title,
        "institucija": "National Assembly",
        "level": "state",
        "place": { "naziv": "Beograd" },
        "start_date": start,
        "end_date": end,
        "status": "published"
    });
    record[owner_field] = owner;
    record
}

pub fn activity(id: i64, person_ids: &[i64], title: &str, start: Option<&str>, end: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "type": "public_statement",
        "description": "<p>Statement</p>",
        "start_date": start,
        "end_date": end,
        "place": "Novi Sad",
        "persons": person_ids
            .iter()
            .enumerate()
            .map(|(i, p)| json!({ "id": 7000 + i as i64, "activity_id": id, "person_id": p }))
            .collect::<Vec<_>>(),
        "images": [],
        "sources": [],
        "status": "published",
        "sort": null
    })
}

pub fn topic(id: i64, name: &str, sort: i64, images: Value) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "<p>Topic</p>",
        "date_from": "2020-01-01",
        "date_to": null,
        "images": images,
        "sources": [],
        "status": "published",
        "sort": sort
    })
}
