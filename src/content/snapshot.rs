//! Offline content source: a JSON file holding the same records the content
//! API would return, keyed by endpoint.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::batch::{ContentBatch, Granularity};
use super::types::{CollectionRecord, ContentItem, SectionRecord, SubSectionRecord};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Snapshot file too large: {0} bytes (max {1} bytes)")]
    TooLarge(u64, u64),
}

/// Saved content records. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub articles: Vec<ContentItem>,
    pub videos: Vec<ContentItem>,
    pub collections: Vec<CollectionRecord>,
    pub sub_sections: Vec<SubSectionRecord>,
    pub sections: Vec<SectionRecord>,
}

impl Snapshot {
    const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(SnapshotError::TooLarge(meta.len(), Self::MAX_FILE_SIZE));
        }
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            articles = snapshot.articles.len(),
            videos = snapshot.videos.len(),
            collections = snapshot.collections.len(),
            sub_sections = snapshot.sub_sections.len(),
            sections = snapshot.sections.len(),
            "Loaded content snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Take the records for one granularity, dropping the rest.
    pub fn into_batch(self, granularity: Granularity) -> ContentBatch {
        match granularity {
            Granularity::Items => {
                let mut items = self.articles;
                items.extend(self.videos.into_iter().map(ContentItem::into_video));
                ContentBatch::Items(items)
            }
            Granularity::Collections => ContentBatch::Collections(self.collections),
            Granularity::SubSections => ContentBatch::SubSections(self.sub_sections),
            Granularity::Sections => ContentBatch::Sections(self.sections),
        }
    }
}
