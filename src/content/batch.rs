use serde::{Deserialize, Serialize};

use super::types::{CollectionRecord, ContentItem, SectionRecord, SubSectionRecord};
use crate::preview::{build, BuildOutput, ContentSource};

/// Starting granularity of a content fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// Flat articles and videos, each embedding its collection.
    #[default]
    Items,
    Collections,
    SubSections,
    Sections,
}

impl Granularity {
    pub fn name(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Collections => "collections",
            Self::SubSections => "sub-sections",
            Self::Sections => "sections",
        }
    }
}

/// Records fetched at one granularity, ready to be folded into a view model.
#[derive(Debug, Clone)]
pub enum ContentBatch {
    Items(Vec<ContentItem>),
    Collections(Vec<CollectionRecord>),
    SubSections(Vec<SubSectionRecord>),
    Sections(Vec<SectionRecord>),
}

impl ContentBatch {
    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Items(_) => Granularity::Items,
            Self::Collections(_) => Granularity::Collections,
            Self::SubSections(_) => Granularity::SubSections,
            Self::Sections(_) => Granularity::Sections,
        }
    }

    /// Number of top-level records in the batch.
    pub fn len(&self) -> usize {
        match self {
            Self::Items(v) => v.len(),
            Self::Collections(v) => v.len(),
            Self::SubSections(v) => v.len(),
            Self::Sections(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source(&self) -> ContentSource<'_> {
        match self {
            Self::Items(v) => ContentSource::Items(v),
            Self::Collections(v) => ContentSource::Collections(v),
            Self::SubSections(v) => ContentSource::SubSections(v),
            Self::Sections(v) => ContentSource::Sections(v),
        }
    }

    /// Fold the batch into a fresh view model.
    pub fn build(&self) -> BuildOutput {
        build(self.source())
    }
}
