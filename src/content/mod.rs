//! Content fetch layer.
//!
//! - [`types`] - record shapes returned by the content API
//! - [`client`] - HTTP client with retry, timeout and size limits
//! - [`snapshot`] - the same records read from a JSON file
//! - [`batch`] - records at one granularity, ready for the view-model builder
//! - [`loader`] - picks the API or a snapshot as the record source

mod batch;
mod client;
mod loader;
mod snapshot;
mod types;

pub use batch::{ContentBatch, Granularity};
pub use client::{ContentClient, ContentError, Endpoint};
pub use loader::ContentLoader;
pub use snapshot::{Snapshot, SnapshotError};
pub use types::{
    CollectionInfo, CollectionRecord, ContentItem, ContentKind, ItemMedia, SectionInfo,
    SectionRecord, SubSectionInfo, SubSectionRecord, SubSectionRef,
};
