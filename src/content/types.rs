//! Record shapes returned by the content API.
//!
//! Records are denormalized: an article embeds its collection, the collection
//! embeds its section or sub-section, and a sub-section embeds its section.
//! Scalar headers (`*Info`) are split from the records so the view model can
//! carry the header of a node without dragging its nested children along.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Content Kind
// ============================================================================

/// Content-type tag carried by every article or video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Rich-text article rendered in the app.
    #[default]
    Page,
    /// Article that links out to an external page.
    Webpage,
    Video,
}

/// Identifier space of an item. Articles and videos are stored in separate
/// backend tables, so their numeric ids may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemMedia {
    Article,
    Video,
}

impl ContentKind {
    pub fn media(self) -> ItemMedia {
        match self {
            Self::Page | Self::Webpage => ItemMedia::Article,
            Self::Video => ItemMedia::Video,
        }
    }

    /// Short label for list rows.
    pub fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Webpage => "web",
            Self::Video => "video",
        }
    }
}

// ============================================================================
// Scalar Headers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub id: i64,
    #[serde(default)]
    pub section_name: String,
    pub section_icon: Option<String>,
    pub position: Option<i64>,
    pub section_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSectionInfo {
    pub id: i64,
    #[serde(default)]
    pub subsection_name: String,
    pub subsection_description: Option<String>,
    pub bg_color: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: i64,
    #[serde(default)]
    pub collection_name: String,
    pub position: Option<i64>,
    pub bg_color: Option<String>,
    pub view_type: Option<String>,
}

// ============================================================================
// Records
// ============================================================================

/// Sub-section as embedded in a collection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSectionRef {
    #[serde(flatten)]
    pub info: SubSectionInfo,
    pub section: Option<SectionInfo>,
}

/// Collection record with its parent reference and member items.
///
/// At most one of `section` / `sub_section` is expected to be set; see
/// [`crate::preview::Ownership`] for how both-set records are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    #[serde(flatten)]
    pub info: CollectionInfo,
    pub section: Option<SectionInfo>,
    pub sub_section: Option<SubSectionRef>,
    #[serde(default)]
    pub articles: Vec<ContentItem>,
    #[serde(default)]
    pub videos: Vec<ContentItem>,
}

/// An article or a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "content_type")]
    pub kind: ContentKind,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Markdown body for `page` articles.
    pub body: Option<String>,
    /// Target for `webpage` articles and videos.
    pub url: Option<String>,
    pub collection: Option<Box<CollectionRecord>>,
}

impl ContentItem {
    /// Records from the videos endpoint do not always carry a content type.
    pub fn into_video(mut self) -> Self {
        self.kind = ContentKind::Video;
        self
    }
}

/// Sub-section record as returned by the sub-sections endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSectionRecord {
    #[serde(flatten)]
    pub info: SubSectionInfo,
    pub section: Option<SectionInfo>,
    #[serde(default)]
    pub collections: Vec<CollectionRecord>,
}

/// Section record as returned by the sections endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    #[serde(flatten)]
    pub info: SectionInfo,
    #[serde(default)]
    pub collections: Vec<CollectionRecord>,
    #[serde(default)]
    pub sub_sections: Vec<SubSectionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_with_embedded_chain() {
        let json = r##"{
            "id": 7,
            "title": "Sleep hygiene",
            "content_type": "page",
            "createdAt": "2024-03-01T10:00:00Z",
            "collection": {
                "id": 1,
                "collection_name": "Rest",
                "position": 2,
                "sub_section": {
                    "id": 4,
                    "subsection_name": "Evenings",
                    "bg_color": "#223344",
                    "section": { "id": 10, "section_name": "Wellbeing" }
                }
            }
        }"##;

        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.kind, ContentKind::Page);
        assert!(item.created_at.is_some());

        let collection = item.collection.unwrap();
        assert_eq!(collection.info.collection_name, "Rest");
        assert_eq!(collection.info.position, Some(2));
        assert!(collection.section.is_none());
        assert!(collection.articles.is_empty());

        let sub = collection.sub_section.unwrap();
        assert_eq!(sub.info.subsection_name, "Evenings");
        assert_eq!(sub.info.bg_color.as_deref(), Some("#223344"));
        assert_eq!(sub.section.unwrap().id, 10);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let item: ContentItem = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(item.title, "");
        assert_eq!(item.kind, ContentKind::Page);
        assert!(item.collection.is_none());
        assert!(item.created_at.is_none());
    }

    #[test]
    fn test_null_collection_is_none() {
        let item: ContentItem =
            serde_json::from_str(r#"{"id": 3, "collection": null}"#).unwrap();
        assert!(item.collection.is_none());
    }

    #[test]
    fn test_unknown_content_type_rejected() {
        let result = serde_json::from_str::<ContentItem>(r#"{"id": 3, "content_type": "quiz"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_section_record_with_children() {
        let json = r#"{
            "id": 10,
            "section_name": "Move",
            "section_icon": "run",
            "collections": [{ "id": 1, "collection_name": "Stretch" }],
            "sub_sections": [{
                "id": 4,
                "subsection_name": "Cardio",
                "collections": [{ "id": 2, "collection_name": "Running" }]
            }]
        }"#;

        let record: SectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.info.section_icon.as_deref(), Some("run"));
        assert_eq!(record.collections.len(), 1);
        assert_eq!(record.sub_sections[0].collections[0].info.id, 2);
    }

    #[test]
    fn test_into_video_overrides_kind() {
        let item: ContentItem = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(item.into_video().kind, ContentKind::Video);
    }

    #[test]
    fn test_media_groups_articles() {
        assert_eq!(ContentKind::Page.media(), ItemMedia::Article);
        assert_eq!(ContentKind::Webpage.media(), ItemMedia::Article);
        assert_eq!(ContentKind::Video.media(), ItemMedia::Video);
    }
}
