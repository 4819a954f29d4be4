//! NASA Data Explorer library entry points.
//!
//! This crate talks to the public NASA APIs (APOD, Mars rover photos, NeoWs,
//! the Image and Video Library, and EPIC) through a single cached
//! [`NasaService`]. HTTP-facing crates depend only on what is exported here
//! and never build upstream requests themselves.
//!
//! ```text
//! NasaService ──► ResponseCache (fingerprint → body, fixed TTL)
//!      │
//!      └──miss──► Upstream (HttpUpstream: api_key injection, 10s deadline)
//! ```

pub mod apod;
pub mod cache;
pub mod config;
pub mod epic;
pub mod error;
pub mod image_library;
pub mod neo;
pub mod rover;
pub mod service;
pub mod upstream;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use apod::ApodQuery;
pub use cache::{CacheStats, Clock, ResponseCache, SystemClock};
pub use config::NasaConfig;
pub use epic::{EpicDayMetadata, EpicVariant};
pub use error::{Error, Result};
pub use image_library::MediaType;
pub use neo::{NeoBrowsePage, NeoStatistics};
pub use rover::{PhotoSelector, Rover, RoverInfo, RoverManifest};
pub use service::NasaService;
pub use upstream::{HttpUpstream, Upstream, UpstreamRequest};
