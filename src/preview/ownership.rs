//! Normalization of a collection's parent references into one explicit
//! ownership value, decided once per record.

use thiserror::Error;

use crate::content::{CollectionRecord, SectionInfo, SubSectionInfo};

/// Where a collection belongs in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Listed directly on the top-level screen.
    Standalone,
    UnderSection(SectionInfo),
    UnderSubSection {
        section: SectionInfo,
        sub_section: SubSectionInfo,
    },
}

/// Identity-only form of [`Ownership`], used to detect a collection seen
/// under two different parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnershipKey {
    Standalone,
    Section(i64),
    SubSection { section: i64, sub_section: i64 },
}

impl Ownership {
    pub fn key(&self) -> OwnershipKey {
        match self {
            Self::Standalone => OwnershipKey::Standalone,
            Self::UnderSection(section) => OwnershipKey::Section(section.id),
            Self::UnderSubSection {
                section,
                sub_section,
            } => OwnershipKey::SubSection {
                section: section.id,
                sub_section: sub_section.id,
            },
        }
    }

    /// Ownership of a collection listed inside a sub-section record. A
    /// sub-section without a parent section cannot be placed, so its
    /// collections fall back to the top level.
    pub fn for_sub_section(
        section: Option<&SectionInfo>,
        sub_section: &SubSectionInfo,
    ) -> (Self, Option<BuildWarning>) {
        match section {
            Some(section) => (
                Self::UnderSubSection {
                    section: section.clone(),
                    sub_section: sub_section.clone(),
                },
                None,
            ),
            None => (
                Self::Standalone,
                Some(BuildWarning::DetachedSubSection {
                    sub_section_id: sub_section.id,
                }),
            ),
        }
    }
}

/// Irregular input shapes the builder resolved on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum BuildWarning {
    #[error("Collection {collection_id} references both section {section_id} and sub-section {sub_section_id}; using the section")]
    ConflictingParents {
        collection_id: i64,
        section_id: i64,
        sub_section_id: i64,
    },

    #[error("Sub-section {sub_section_id} has no parent section; its collections are listed at the top level")]
    DetachedSubSection { sub_section_id: i64 },

    #[error("Collection {collection_id} appears under more than one parent")]
    OwnershipChanged { collection_id: i64 },

    #[error("Item {item_id} appears more than once in collection {collection_id}")]
    DuplicateItem { collection_id: i64, item_id: i64 },
}

/// Decide the ownership of a collection from its embedded references.
///
/// Section takes precedence when both a section and a sub-section are set;
/// that case is reported rather than resolved silently.
pub fn normalize(record: &CollectionRecord) -> (Ownership, Option<BuildWarning>) {
    match (&record.section, &record.sub_section) {
        (Some(section), Some(sub)) => (
            Ownership::UnderSection(section.clone()),
            Some(BuildWarning::ConflictingParents {
                collection_id: record.info.id,
                section_id: section.id,
                sub_section_id: sub.info.id,
            }),
        ),
        (Some(section), None) => (Ownership::UnderSection(section.clone()), None),
        (None, Some(sub)) => Ownership::for_sub_section(sub.section.as_ref(), &sub.info),
        (None, None) => (Ownership::Standalone, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CollectionInfo, SubSectionRef};

    fn section(id: i64) -> SectionInfo {
        SectionInfo {
            id,
            section_name: format!("Section {id}"),
            section_icon: None,
            position: None,
            section_type: None,
        }
    }

    fn sub_section(id: i64, parent: Option<SectionInfo>) -> SubSectionRef {
        SubSectionRef {
            info: SubSectionInfo {
                id,
                subsection_name: format!("Sub {id}"),
                subsection_description: None,
                bg_color: None,
                position: None,
            },
            section: parent,
        }
    }

    fn record(section: Option<SectionInfo>, sub: Option<SubSectionRef>) -> CollectionRecord {
        CollectionRecord {
            info: CollectionInfo {
                id: 1,
                collection_name: "C".to_string(),
                position: None,
                bg_color: None,
                view_type: None,
            },
            section,
            sub_section: sub,
            articles: Vec::new(),
            videos: Vec::new(),
        }
    }

    #[test]
    fn test_standalone() {
        let (ownership, warning) = normalize(&record(None, None));
        assert_eq!(ownership, Ownership::Standalone);
        assert!(warning.is_none());
    }

    #[test]
    fn test_under_section() {
        let (ownership, warning) = normalize(&record(Some(section(10)), None));
        assert_eq!(ownership.key(), OwnershipKey::Section(10));
        assert!(warning.is_none());
    }

    #[test]
    fn test_under_sub_section() {
        let (ownership, warning) =
            normalize(&record(None, Some(sub_section(4, Some(section(10))))));
        assert_eq!(
            ownership.key(),
            OwnershipKey::SubSection {
                section: 10,
                sub_section: 4
            }
        );
        assert!(warning.is_none());
    }

    #[test]
    fn test_both_parents_prefers_section_and_warns() {
        let (ownership, warning) = normalize(&record(
            Some(section(10)),
            Some(sub_section(4, Some(section(11)))),
        ));
        assert_eq!(ownership.key(), OwnershipKey::Section(10));
        assert_eq!(
            warning,
            Some(BuildWarning::ConflictingParents {
                collection_id: 1,
                section_id: 10,
                sub_section_id: 4
            })
        );
    }

    #[test]
    fn test_detached_sub_section_falls_back_to_top_level() {
        let (ownership, warning) = normalize(&record(None, Some(sub_section(4, None))));
        assert_eq!(ownership, Ownership::Standalone);
        assert_eq!(
            warning,
            Some(BuildWarning::DetachedSubSection { sub_section_id: 4 })
        );
    }

    #[test]
    fn test_warning_messages_name_ids() {
        let msg = BuildWarning::DuplicateItem {
            collection_id: 3,
            item_id: 9,
        }
        .to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('9'));
    }
}
