//! Nested view model consumed by the preview renderer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::order::{sort_by_position, Positioned, FEATURED_POSITION};
use crate::content::{
    CollectionInfo, ContentItem, ContentKind, ItemMedia, SectionInfo, SubSectionInfo,
};

/// Identity of an item inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub media: ItemMedia,
    pub id: i64,
}

/// An article or video as shown in the preview, detached from its
/// embedded collection reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewItem {
    pub id: i64,
    pub title: String,
    pub kind: ContentKind,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PreviewItem {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            media: self.kind.media(),
            id: self.id,
        }
    }
}

impl From<&ContentItem> for PreviewItem {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            kind: item.kind,
            created_at: item.created_at,
            body: item.body.clone(),
            url: item.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionNode {
    #[serde(flatten)]
    pub info: CollectionInfo,
    pub items: Vec<PreviewItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubSectionNode {
    #[serde(flatten)]
    pub info: SubSectionInfo,
    pub collections: Vec<CollectionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionNode {
    #[serde(flatten)]
    pub info: SectionInfo,
    pub collections: Vec<CollectionNode>,
    pub sub_sections: Vec<SubSectionNode>,
}

impl Positioned for CollectionNode {
    fn position(&self) -> Option<i64> {
        self.info.position
    }
}

impl Positioned for SubSectionNode {
    fn position(&self) -> Option<i64> {
        self.info.position
    }
}

impl Positioned for SectionNode {
    fn position(&self) -> Option<i64> {
        self.info.position
    }
}

/// Aggregated content tree: sections with their nested data, plus the
/// standalone collections that belong to no section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    pub sections: Vec<SectionNode>,
    pub collections: Vec<CollectionNode>,
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.collections.is_empty()
    }

    /// Total number of items across every collection node.
    pub fn item_count(&self) -> usize {
        self.all_collections().map(|c| c.items.len()).sum()
    }

    /// Every collection node, depth first: top-level collections, then each
    /// section's collections followed by its sub-sections' collections.
    pub fn all_collections(&self) -> impl Iterator<Item = &CollectionNode> {
        self.collections.iter().chain(self.sections.iter().flat_map(|s| {
            s.collections
                .iter()
                .chain(s.sub_sections.iter().flat_map(|sub| sub.collections.iter()))
        }))
    }

    /// Sort every level by position, ascending, missing positions last.
    pub fn sorted(mut self) -> Self {
        sort_by_position(&mut self.sections);
        sort_by_position(&mut self.collections);
        for section in &mut self.sections {
            sort_by_position(&mut section.collections);
            sort_by_position(&mut section.sub_sections);
            for sub in &mut section.sub_sections {
                sort_by_position(&mut sub.collections);
            }
        }
        self
    }

    /// Sort and split off the featured (position 0) entries of the top level.
    pub fn into_home(self) -> HomeScreen {
        let sorted = self.sorted();
        let mut featured = Vec::new();

        let (featured_sections, sections): (Vec<_>, Vec<_>) = sorted
            .sections
            .into_iter()
            .partition(|s| s.info.position == Some(FEATURED_POSITION));
        let (featured_collections, collections): (Vec<_>, Vec<_>) = sorted
            .collections
            .into_iter()
            .partition(|c| c.info.position == Some(FEATURED_POSITION));

        featured.extend(featured_sections.into_iter().map(FeaturedEntry::Section));
        featured.extend(featured_collections.into_iter().map(FeaturedEntry::Collection));

        HomeScreen {
            featured,
            sections,
            collections,
        }
    }
}

/// A position-0 node surfaced ahead of the regular top-level listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeaturedEntry {
    Section(SectionNode),
    Collection(CollectionNode),
}

/// Where a collection sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct CollectionLocation<'a> {
    pub collection: &'a CollectionNode,
    pub section: Option<&'a SectionInfo>,
    pub sub_section: Option<&'a SubSectionInfo>,
}

/// Top-level preview screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeScreen {
    pub featured: Vec<FeaturedEntry>,
    pub sections: Vec<SectionNode>,
    pub collections: Vec<CollectionNode>,
}

impl HomeScreen {
    pub fn is_empty(&self) -> bool {
        self.featured.is_empty() && self.sections.is_empty() && self.collections.is_empty()
    }

    /// Find the first collection with `id`, searching featured entries first.
    pub fn find_collection(&self, id: i64) -> Option<CollectionLocation<'_>> {
        let featured_sections = self.featured.iter().filter_map(|f| match f {
            FeaturedEntry::Section(s) => Some(s),
            FeaturedEntry::Collection(_) => None,
        });

        for entry in &self.featured {
            if let FeaturedEntry::Collection(c) = entry {
                if c.info.id == id {
                    return Some(CollectionLocation {
                        collection: c,
                        section: None,
                        sub_section: None,
                    });
                }
            }
        }

        for section in featured_sections.chain(self.sections.iter()) {
            if let Some(c) = section.collections.iter().find(|c| c.info.id == id) {
                return Some(CollectionLocation {
                    collection: c,
                    section: Some(&section.info),
                    sub_section: None,
                });
            }
            for sub in &section.sub_sections {
                if let Some(c) = sub.collections.iter().find(|c| c.info.id == id) {
                    return Some(CollectionLocation {
                        collection: c,
                        section: Some(&section.info),
                        sub_section: Some(&sub.info),
                    });
                }
            }
        }

        self.collections
            .iter()
            .find(|c| c.info.id == id)
            .map(|c| CollectionLocation {
                collection: c,
                section: None,
                sub_section: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection(id: i64, position: Option<i64>) -> CollectionNode {
        CollectionNode {
            info: CollectionInfo {
                id,
                collection_name: format!("C{id}"),
                position,
                bg_color: None,
                view_type: None,
            },
            items: Vec::new(),
        }
    }

    fn section(id: i64, position: Option<i64>, collections: Vec<CollectionNode>) -> SectionNode {
        SectionNode {
            info: SectionInfo {
                id,
                section_name: format!("S{id}"),
                section_icon: None,
                position,
                section_type: None,
            },
            collections,
            sub_sections: Vec::new(),
        }
    }

    #[test]
    fn test_sorted_orders_every_level() {
        let vm = ViewModel {
            sections: vec![
                section(1, None, vec![collection(10, Some(2)), collection(11, Some(1))]),
                section(2, Some(5), Vec::new()),
            ],
            collections: vec![collection(20, None), collection(21, Some(3))],
        }
        .sorted();

        let section_ids: Vec<_> = vm.sections.iter().map(|s| s.info.id).collect();
        assert_eq!(section_ids, vec![2, 1]);
        let nested: Vec<_> = vm.sections[1].collections.iter().map(|c| c.info.id).collect();
        assert_eq!(nested, vec![11, 10]);
        let top: Vec<_> = vm.collections.iter().map(|c| c.info.id).collect();
        assert_eq!(top, vec![21, 20]);
    }

    #[test]
    fn test_into_home_splits_featured() {
        let home = ViewModel {
            sections: vec![section(1, Some(2), Vec::new()), section(2, Some(0), Vec::new())],
            collections: vec![collection(20, Some(0)), collection(21, None)],
        }
        .into_home();

        assert_eq!(home.featured.len(), 2);
        assert!(matches!(&home.featured[0], FeaturedEntry::Section(s) if s.info.id == 2));
        assert!(matches!(&home.featured[1], FeaturedEntry::Collection(c) if c.info.id == 20));
        assert_eq!(home.sections.len(), 1);
        assert_eq!(home.collections.len(), 1);
    }

    #[test]
    fn test_find_collection_reports_location() {
        let home = ViewModel {
            sections: vec![section(1, Some(0), vec![collection(10, None)])],
            collections: vec![collection(20, None)],
        }
        .into_home();

        let nested = home.find_collection(10).map(|l| l.section.map(|s| s.id));
        assert_eq!(nested, Some(Some(1)));
        let top = home.find_collection(20).map(|l| l.section.is_none());
        assert_eq!(top, Some(true));
        assert!(home.find_collection(99).is_none());
    }

    #[test]
    fn test_item_key_separates_media() {
        let article = PreviewItem {
            id: 1,
            title: "a".to_string(),
            kind: ContentKind::Webpage,
            created_at: None,
            body: None,
            url: None,
        };
        let video = PreviewItem {
            kind: ContentKind::Video,
            ..article.clone()
        };
        assert_ne!(article.key(), video.key());
    }
}
