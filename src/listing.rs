//! Profile listing: filter, shuffle, paginate
//!
//! The listing order is a fresh random permutation on every call, so pages
//! requested in separate calls may repeat or skip profiles. `total` is
//! stable for a fixed filter; the arrangement is not.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Profile;

/// Filters and window for a profile listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileQuery {
    pub limit: usize,
    pub offset: usize,
    /// Keep profiles tagged with this area slug
    pub area_slug: Option<String>,
    /// Case-insensitive substring of the full name
    pub name_query: Option<String>,
}

impl ProfileQuery {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }

    /// Window for a 1-based page number
    pub fn for_page(page: usize, limit: usize) -> Self {
        Self::new(limit, offset_for_page(page, limit))
    }

    pub fn with_area(mut self, area_slug: impl Into<String>) -> Self {
        self.area_slug = Some(area_slug.into());
        self
    }

    pub fn with_name(mut self, name_query: impl Into<String>) -> Self {
        self.name_query = Some(name_query.into());
        self
    }

    /// Whether a profile passes the area and name filters. Blank filter
    /// values are ignored.
    pub fn matches(&self, profile: &Profile) -> bool {
        let area_ok = match self.area_slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => profile.in_area(slug),
            _ => true,
        };

        let name_ok = match self.name_query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => profile
                .full_name
                .to_lowercase()
                .contains(&q.to_lowercase()),
            _ => true,
        };

        area_ok && name_ok
    }
}

/// One window of a listing plus the size of the whole filtered set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    /// Number of pages of `limit` items needed for `total`
    pub fn page_count(&self, limit: usize) -> usize {
        if limit == 0 {
            return 0;
        }
        self.total.div_ceil(limit)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Offset of a 1-based page; page 0 is treated as page 1
pub fn offset_for_page(page: usize, limit: usize) -> usize {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Shuffle `items` and cut the `[offset, offset + limit)` window
pub fn shuffle_and_paginate<T, R>(mut items: Vec<T>, offset: usize, limit: usize, rng: &mut R) -> Page<T>
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
    paginate(items, offset, limit)
}

/// Cut the `[offset, offset + limit)` window without reordering
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let data = items.into_iter().skip(offset).take(limit).collect();
    Page { data, total }
}
