//! Folds flat content records into the nested [`ViewModel`].
//!
//! Nodes live in per-context vectors addressed through id -> index maps, so
//! locate-or-create is a hash lookup instead of a scan. The first pass fills
//! the slots; [`ViewModelBuilder::finish`] materializes them in first-seen
//! order. Nodes are only created when an item lands in them, so the output
//! never contains an empty branch.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::model::{
    CollectionNode, ItemKey, PreviewItem, SectionNode, SubSectionNode, ViewModel,
};
use super::ownership::{normalize, BuildWarning, Ownership, OwnershipKey};
use crate::content::{
    CollectionInfo, CollectionRecord, ContentItem, ContentKind, SectionInfo, SectionRecord,
    SubSectionInfo, SubSectionRecord,
};

/// Starting granularity of the records handed to [`build`].
#[derive(Debug, Clone, Copy)]
pub enum ContentSource<'a> {
    Items(&'a [ContentItem]),
    Collections(&'a [CollectionRecord]),
    SubSections(&'a [SubSectionRecord]),
    Sections(&'a [SectionRecord]),
}

/// Result of a build: the tree plus everything that was irregular about the input.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub view_model: ViewModel,
    pub warnings: Vec<BuildWarning>,
    /// Items skipped because they reference no collection.
    pub skipped_orphans: usize,
}

pub fn build(source: ContentSource<'_>) -> BuildOutput {
    let mut builder = ViewModelBuilder::new();
    match source {
        ContentSource::Items(items) => items.iter().for_each(|i| builder.add_item(i)),
        ContentSource::Collections(records) => {
            records.iter().for_each(|r| builder.add_collection(r))
        }
        ContentSource::SubSections(records) => {
            records.iter().for_each(|r| builder.add_sub_section(r))
        }
        ContentSource::Sections(records) => records.iter().for_each(|r| builder.add_section(r)),
    }
    builder.finish()
}

pub fn build_from_content_items(items: &[ContentItem]) -> BuildOutput {
    build(ContentSource::Items(items))
}

pub fn build_from_collections(records: &[CollectionRecord]) -> BuildOutput {
    build(ContentSource::Collections(records))
}

pub fn build_from_sub_sections(records: &[SubSectionRecord]) -> BuildOutput {
    build(ContentSource::SubSections(records))
}

pub fn build_from_sections(records: &[SectionRecord]) -> BuildOutput {
    build(ContentSource::Sections(records))
}

/// Return the node stored under `key`, creating it with `make` on first use.
pub(crate) fn locate_or_create<'a, K, T>(
    nodes: &'a mut Vec<T>,
    index: &mut HashMap<K, usize>,
    key: K,
    make: impl FnOnce() -> T,
) -> &'a mut T
where
    K: Eq + Hash,
{
    let idx = *index.entry(key).or_insert_with(|| {
        nodes.push(make());
        nodes.len() - 1
    });
    &mut nodes[idx]
}

// ============================================================================
// Slots
// ============================================================================

struct CollectionSlot {
    info: CollectionInfo,
    items: Vec<PreviewItem>,
    item_index: HashMap<ItemKey, usize>,
}

impl CollectionSlot {
    fn new(info: &CollectionInfo) -> Self {
        Self {
            info: info.clone(),
            items: Vec::new(),
            item_index: HashMap::new(),
        }
    }

    /// Insert or replace by item identity. Returns true when the item was
    /// already present. A replaced item keeps its original place.
    fn upsert(&mut self, item: PreviewItem) -> bool {
        match self.item_index.entry(item.key()) {
            Entry::Occupied(slot) => {
                self.items[*slot.get()] = item;
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(self.items.len());
                self.items.push(item);
                false
            }
        }
    }

    fn into_node(self) -> CollectionNode {
        CollectionNode {
            info: self.info,
            items: self.items,
        }
    }
}

#[derive(Default)]
struct CollectionSlots {
    slots: Vec<CollectionSlot>,
    index: HashMap<i64, usize>,
}

impl CollectionSlots {
    fn locate_or_create(&mut self, info: &CollectionInfo) -> &mut CollectionSlot {
        locate_or_create(&mut self.slots, &mut self.index, info.id, || {
            CollectionSlot::new(info)
        })
    }

    fn into_nodes(self) -> Vec<CollectionNode> {
        self.slots.into_iter().map(CollectionSlot::into_node).collect()
    }
}

struct SubSectionSlot {
    info: SubSectionInfo,
    collections: CollectionSlots,
}

struct SectionSlot {
    info: SectionInfo,
    collections: CollectionSlots,
    sub_sections: Vec<SubSectionSlot>,
    sub_section_index: HashMap<i64, usize>,
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental builder behind the `build_from_*` entry points.
#[derive(Default)]
pub struct ViewModelBuilder {
    sections: Vec<SectionSlot>,
    section_index: HashMap<i64, usize>,
    collections: CollectionSlots,
    first_ownership: HashMap<i64, OwnershipKey>,
    warnings: Vec<BuildWarning>,
    seen_warnings: HashSet<BuildWarning>,
    skipped_orphans: usize,
}

impl ViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one article or video through its embedded collection reference.
    /// Items without a collection are skipped.
    pub fn add_item(&mut self, item: &ContentItem) {
        let Some(record) = item.collection.as_deref() else {
            tracing::debug!(item_id = item.id, "Skipping item without a collection");
            self.skipped_orphans += 1;
            return;
        };

        let (ownership, warning) = normalize(record);
        self.warn(warning);
        self.place(&ownership, &record.info, PreviewItem::from(item));
    }

    /// Add a collection record with its member articles and videos.
    pub fn add_collection(&mut self, record: &CollectionRecord) {
        if is_empty_collection(record) {
            tracing::debug!(collection_id = record.info.id, "Skipping empty collection");
            return;
        }
        let (ownership, warning) = normalize(record);
        self.warn(warning);
        self.place_members(&ownership, record);
    }

    /// Add a sub-section record. The containing record decides where its
    /// collections go; their own embedded parent references are ignored.
    pub fn add_sub_section(&mut self, record: &SubSectionRecord) {
        self.add_sub_section_under(record.section.as_ref(), &record.info, &record.collections);
    }

    /// Add a section record with its direct collections and sub-sections.
    pub fn add_section(&mut self, record: &SectionRecord) {
        let ownership = Ownership::UnderSection(record.info.clone());
        for collection in &record.collections {
            if !is_empty_collection(collection) {
                self.place_members(&ownership, collection);
            }
        }
        for sub in &record.sub_sections {
            self.add_sub_section_under(Some(&record.info), &sub.info, &sub.collections);
        }
    }

    pub fn finish(self) -> BuildOutput {
        let sections = self
            .sections
            .into_iter()
            .map(|slot| SectionNode {
                info: slot.info,
                collections: slot.collections.into_nodes(),
                sub_sections: slot
                    .sub_sections
                    .into_iter()
                    .map(|sub| SubSectionNode {
                        info: sub.info,
                        collections: sub.collections.into_nodes(),
                    })
                    .collect(),
            })
            .collect();

        let view_model = ViewModel {
            sections,
            collections: self.collections.into_nodes(),
        };

        for warning in &self.warnings {
            tracing::warn!(%warning, "Irregular content shape");
        }
        tracing::debug!(
            sections = view_model.sections.len(),
            collections = view_model.collections.len(),
            items = view_model.item_count(),
            skipped_orphans = self.skipped_orphans,
            "Built view model"
        );

        BuildOutput {
            view_model,
            warnings: self.warnings,
            skipped_orphans: self.skipped_orphans,
        }
    }

    fn add_sub_section_under(
        &mut self,
        section: Option<&SectionInfo>,
        sub_section: &SubSectionInfo,
        collections: &[CollectionRecord],
    ) {
        let members: Vec<_> = collections
            .iter()
            .filter(|c| !is_empty_collection(c))
            .collect();
        if members.is_empty() {
            return;
        }

        let (ownership, warning) = Ownership::for_sub_section(section, sub_section);
        self.warn(warning);
        for collection in members {
            self.place_members(&ownership, collection);
        }
    }

    fn place_members(&mut self, ownership: &Ownership, record: &CollectionRecord) {
        for article in &record.articles {
            self.place(ownership, &record.info, PreviewItem::from(article));
        }
        for video in &record.videos {
            let mut item = PreviewItem::from(video);
            item.kind = ContentKind::Video;
            self.place(ownership, &record.info, item);
        }
    }

    fn place(&mut self, ownership: &Ownership, collection: &CollectionInfo, item: PreviewItem) {
        self.note_ownership(collection.id, ownership.key());

        let item_id = item.id;
        let slot = match ownership {
            Ownership::Standalone => self.collections.locate_or_create(collection),
            Ownership::UnderSection(section) => {
                let section_slot = self.locate_or_create_section(section);
                section_slot.collections.locate_or_create(collection)
            }
            Ownership::UnderSubSection {
                section,
                sub_section,
            } => {
                let section_slot = self.locate_or_create_section(section);
                let sub_slot = locate_or_create(
                    &mut section_slot.sub_sections,
                    &mut section_slot.sub_section_index,
                    sub_section.id,
                    || SubSectionSlot {
                        info: sub_section.clone(),
                        collections: CollectionSlots::default(),
                    },
                );
                sub_slot.collections.locate_or_create(collection)
            }
        };

        if slot.upsert(item) {
            self.warn(Some(BuildWarning::DuplicateItem {
                collection_id: collection.id,
                item_id,
            }));
        }
    }

    fn locate_or_create_section(&mut self, section: &SectionInfo) -> &mut SectionSlot {
        locate_or_create(&mut self.sections, &mut self.section_index, section.id, || {
            SectionSlot {
                info: section.clone(),
                collections: CollectionSlots::default(),
                sub_sections: Vec::new(),
                sub_section_index: HashMap::new(),
            }
        })
    }

    fn note_ownership(&mut self, collection_id: i64, key: OwnershipKey) {
        match self.first_ownership.entry(collection_id) {
            Entry::Vacant(slot) => {
                slot.insert(key);
            }
            Entry::Occupied(slot) => {
                if *slot.get() != key {
                    self.warn(Some(BuildWarning::OwnershipChanged { collection_id }));
                }
            }
        }
    }

    fn warn(&mut self, warning: Option<BuildWarning>) {
        if let Some(warning) = warning {
            if self.seen_warnings.insert(warning.clone()) {
                self.warnings.push(warning);
            }
        }
    }
}

fn is_empty_collection(record: &CollectionRecord) -> bool {
    record.articles.is_empty() && record.videos.is_empty()
}
