//! Profile Directory - read-only data layer over a headless CMS item API
//!
//! Sits between the content backend (`<base>/items/<collection>`) and the
//! presentation layer. Every public query returns published records only,
//! with junction-table source links hydrated, image references flattened,
//! and results ordered the way the site displays them.
//!
//! ## Call chain
//!
//! ```text
//! UI layer ──▶ Directory (one method per query shape)
//!                 │
//!                 ├─▶ FallbackPlan ──▶ ItemTransport (HTTP / in-memory)
//!                 ├─▶ normalize    (owner ids, images, places, dates)
//!                 ├─▶ sources      (one batched lookup per fetch)
//!                 └─▶ timeline / listing (ordering, shuffle, pagination)
//! ```
//!
//! Failures never reach the caller: transport and status errors are logged
//! and the query degrades to `[]`, `None`, or an empty [`Page`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use profile_directory::{Directory, DirectoryConfig, ExecutionContext, HttpTransport, ProfileQuery};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DirectoryConfig::from_env();
//! let transport = HttpTransport::new(config.base_url(ExecutionContext::Server))?;
//! let directory = Directory::new(transport);
//!
//! let page = directory.list_profiles(&ProfileQuery::new(10, 0)).await;
//! println!("{} of {}", page.data.len(), page.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod listing;
pub mod model;
pub mod normalize;
pub mod query;
pub mod sources;
pub mod timeline;
pub mod transport;

pub use config::{DirectoryConfig, ExecutionContext, FeaturedVideo, FALLBACK_BASE_URL};
pub use directory::{Directory, ProfileDetail};
pub use error::FetchError;
pub use listing::{offset_for_page, Page, ProfileQuery};
pub use model::{
    Activity, Area, CanonicalId, OfficeLevel, Place, Profile, PublicOffice, Source, Status,
    TimelineEntry, Topic,
};
pub use query::{FallbackPlan, ItemRequest};
pub use transport::{http::HttpTransport, memory::InMemoryBackend, ItemTransport};
