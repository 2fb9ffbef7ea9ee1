//! Normalization of heterogeneous backend shapes
//!
//! Relations can arrive as a bare id, as an expanded object, as a junction
//! row wrapping either of those, or under a differently-named field. Every
//! function here reduces one of those shapes to a single canonical form and
//! drops anything it cannot read.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

use crate::model::{CanonicalId, Place};

/// Junction rows carry the owner under this key next to their own `id`
const OWNER_JUNCTION_KEY: &str = "person_id";

/// Keys that carry a file id inside an image junction row
const IMAGE_ID_KEYS: &[&str] = &["directus_files_id", "id"];

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("valid YouTube id pattern")
});

/// String-cast a scalar id. Empty strings, floats with a fraction, and
/// non-scalars yield `None`.
pub fn scalar_id(raw: &Value) -> Option<CanonicalId> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| CanonicalId::new(s))
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(CanonicalId::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(CanonicalId::new(u.to_string()))
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| CanonicalId::new(format!("{}", f as i64)))
            }
        }
        _ => None,
    }
}

/// Reduce any owner reference shape to one canonical id.
///
/// Accepts a bare id, an expanded record (`{ "id": .. }`), or a junction
/// row (`{ "person_id": .. }`) whose value may itself be either of those.
/// A junction row never falls back to its own `id`, even when `person_id`
/// is null.
pub fn to_owner_id(raw: &Value) -> Option<CanonicalId> {
    match raw {
        Value::Object(map) => match map.get(OWNER_JUNCTION_KEY) {
            Some(owner) => to_owner_id(owner),
            None => map.get("id").and_then(scalar_id),
        },
        other => scalar_id(other),
    }
}

/// Owner id of `record`, read from the first of `fields` that resolves
pub fn owner_id_of(record: &Value, fields: &[&str]) -> Option<CanonicalId> {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .find_map(to_owner_id)
}

/// Owner ids of a to-many relation; a single relation yields one id
pub fn owner_ids(raw: &Value) -> Vec<CanonicalId> {
    match raw {
        Value::Array(items) => items.iter().filter_map(to_owner_id).collect(),
        Value::Null => Vec::new(),
        other => to_owner_id(other).into_iter().collect(),
    }
}

fn image_id(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Object(map) => IMAGE_ID_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(image_id),
        _ => None,
    }
}

/// Flatten an image field to ordered file ids, keeping at most `cap`
pub fn normalize_images(raw: Option<&Value>, cap: usize) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items.iter().filter_map(image_id).take(cap).collect(),
        Some(single) => image_id(single).into_iter().take(cap).collect(),
        None => Vec::new(),
    }
}

/// Read a place given as text, as a bare relation id, or as an expanded record
pub fn parse_place(raw: Option<&Value>) -> Option<Place> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(Place::Text(s.trim().to_string())),
        Value::Number(_) => Some(Place::Record {
            id: raw.and_then(scalar_id),
            name: None,
        }),
        Value::Object(map) => {
            let name = ["naziv", "name"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|v| v.as_str())
                .map(str::to_string);
            let id = map.get("id").and_then(scalar_id);
            (id.is_some() || name.is_some()).then_some(Place::Record { id, name })
        }
        _ => None,
    }
}

/// Parse a backend date in any of the shapes it emits.
///
/// Full dates, RFC 3339 timestamps, naive timestamps, `YYYY-MM` (first of
/// month) and `YYYY` (first of year). Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date);
    }
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(&format!("{}-01-01", raw), "%Y-%m-%d").ok();
    }
    None
}

/// Date field of a raw record
pub fn date_field(record: &Value, field: &str) -> Option<NaiveDate> {
    record.get(field)?.as_str().and_then(parse_date)
}

/// Non-empty string field of a raw record
pub fn text_field(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Integer sort field of a raw record
pub fn sort_field(record: &Value) -> Option<i64> {
    match record.get("sort")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Browser-facing URL for an image reference: absolute URLs pass through,
/// file ids are served from `<base>/assets/<id>`
pub fn asset_url(base_url: &str, image_ref: &str) -> String {
    if image_ref.starts_with("http") {
        image_ref.to_string()
    } else {
        format!(
            "{}/assets/{}",
            base_url.trim_end_matches('/'),
            image_ref.trim_start_matches('/')
        )
    }
}

/// Extract the 11-character video id from a YouTube watch, embed, `/v/`
/// or short link
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
