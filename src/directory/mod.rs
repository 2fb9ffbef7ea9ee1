//! Directory facade - one async method per query shape the site renders.
//!
//! Every fetch follows the same steps: run the entity's fallback plan,
//! keep published records, apply the owner filter if any, resolve junction
//! source links with one batched lookup, normalize, sort. Methods never
//! return errors; failures are logged and surface as empty values.
//!
//! Calls are independent: nothing is cached between them and each one
//! issues its requests sequentially.

mod activities;
mod areas;
mod offices;
mod profiles;
mod topics;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Profile, TimelineEntry};
use crate::sources::{collect_link_keys, resolve_sources, SourceMap};
use crate::timeline::merge_timeline;
use crate::transport::ItemTransport;

pub use areas::area_from_record;

/// Maximum images kept for activities and topics
pub const MAX_LISTING_IMAGES: usize = 3;

/// Profile page payload: the profile plus its merged career timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetail {
    pub profile: Profile,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Clone)]
pub struct Directory {
    transport: Arc<dyn ItemTransport>,
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory").finish_non_exhaustive()
    }
}

impl Directory {
    pub fn new<T: ItemTransport + 'static>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Share a transport with other owners (e.g. tests inspecting requests)
    pub fn with_shared(transport: Arc<dyn ItemTransport>) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> &dyn ItemTransport {
        self.transport.as_ref()
    }

    /// Profile by slug together with its offices and activities merged
    /// into one chronological timeline
    pub async fn profile_detail(&self, slug: &str) -> Option<ProfileDetail> {
        let profile = self.profile_by_slug(slug).await?;
        let offices = self.public_offices_for(&profile.id).await;
        let activities = self.activities_for(&profile.id).await;

        tracing::debug!(
            slug,
            offices = offices.len(),
            activities = activities.len(),
            "Building profile timeline"
        );

        Some(ProfileDetail {
            timeline: merge_timeline(offices, activities),
            profile,
        })
    }

    /// Resolve every source link under `link_fields` with one lookup, then
    /// build entities. Records `build` cannot read are dropped.
    async fn hydrate<T, F>(&self, label: &str, records: Vec<Value>, link_fields: &[&str], build: F) -> Vec<T>
    where
        F: Fn(&Value, &SourceMap) -> Option<T>,
    {
        let keys = collect_link_keys(&records, link_fields);
        let sources = resolve_sources(self.transport(), keys).await;

        let total = records.len();
        let built: Vec<T> = records
            .iter()
            .filter_map(|record| build(record, &sources))
            .collect();

        if built.len() < total {
            tracing::debug!(
                collection = label,
                dropped = total - built.len(),
                "Dropped records missing required fields"
            );
        }
        built
    }
}

/// `status == "published"` on a raw record
pub(crate) fn is_published(record: &Value) -> bool {
    record.get("status").and_then(Value::as_str) == Some("published")
}

/// Keep published records, logging the counts
pub(crate) fn published(label: &str, records: Vec<Value>) -> Vec<Value> {
    let fetched = records.len();
    let kept: Vec<Value> = records.into_iter().filter(is_published).collect();
    tracing::debug!(collection = label, fetched, published = kept.len(), "Filtered by status");
    kept
}
