//! Drill-down navigation through the preview.
//!
//! The stack is a plain value owned by the caller. `push` and `pop` consume
//! it and return the next state; an empty stack means the home screen is
//! showing. Frames carry everything needed to draw their screen (node
//! payload, background colour, breadcrumb) so nothing is looked up again
//! after a drill-down.

use serde::Serialize;

use crate::content::SectionInfo;
use crate::preview::{CollectionNode, PreviewItem, SubSectionNode};

/// Section shown in the back breadcrumb of a drilled-down screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub section_name: String,
    pub section_icon: Option<String>,
}

impl Breadcrumb {
    pub fn from_section(section: &SectionInfo) -> Self {
        Self {
            section_name: section.section_name.clone(),
            section_icon: section.section_icon.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum FrameKind {
    Collection(CollectionNode),
    SubSection(SubSectionNode),
    Article(PreviewItem),
}

/// One screen on the navigation stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationFrame {
    #[serde(flatten)]
    pub kind: FrameKind,
    pub background_color: Option<String>,
    pub breadcrumb: Option<Breadcrumb>,
}

impl NavigationFrame {
    /// Collection screen. Its own colour wins over the one inherited from
    /// the screen it was opened from.
    pub fn collection(
        node: CollectionNode,
        breadcrumb: Option<Breadcrumb>,
        inherited_bg: Option<&str>,
    ) -> Self {
        let background_color = non_blank(node.info.bg_color.as_deref())
            .or(non_blank(inherited_bg))
            .map(str::to_string);
        Self {
            kind: FrameKind::Collection(node),
            background_color,
            breadcrumb,
        }
    }

    pub fn sub_section(
        node: SubSectionNode,
        section: Option<&SectionInfo>,
        inherited_bg: Option<&str>,
    ) -> Self {
        let background_color = non_blank(node.info.bg_color.as_deref())
            .or(non_blank(inherited_bg))
            .map(str::to_string);
        Self {
            kind: FrameKind::SubSection(node),
            background_color,
            breadcrumb: section.map(Breadcrumb::from_section),
        }
    }

    /// Article or video screen. It has no colour of its own and inherits
    /// both colour and breadcrumb from the frame it was opened from.
    pub fn article(item: PreviewItem, parent: Option<&NavigationFrame>) -> Self {
        Self {
            kind: FrameKind::Article(item),
            background_color: parent.and_then(|p| p.background_color.clone()),
            breadcrumb: parent.and_then(|p| p.breadcrumb.clone()),
        }
    }

    pub fn title(&self) -> &str {
        match &self.kind {
            FrameKind::Collection(node) => &node.info.collection_name,
            FrameKind::SubSection(node) => &node.info.subsection_name,
            FrameKind::Article(item) => &item.title,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ordered drill-down path. The last frame is the visible screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationStack {
    frames: Vec<NavigationFrame>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack for a deep link that opens directly on `frame`.
    pub fn seeded(frame: NavigationFrame) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    #[must_use]
    pub fn push(mut self, frame: NavigationFrame) -> Self {
        tracing::debug!(depth = self.frames.len() + 1, title = frame.title(), "Navigate forward");
        self.frames.push(frame);
        self
    }

    /// Drop the visible frame. Popping the home screen leaves it unchanged.
    #[must_use]
    pub fn pop(mut self) -> Self {
        if self.frames.pop().is_some() {
            tracing::debug!(depth = self.frames.len(), "Navigate back");
        }
        self
    }

    pub fn current(&self) -> Option<&NavigationFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_home(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[NavigationFrame] {
        &self.frames
    }

    /// Horizontal offset of the screen strip: one screen width per level.
    pub fn slide_offset(&self, width: u16) -> i32 {
        let depth = i32::try_from(self.frames.len()).unwrap_or(i32::MAX);
        depth.saturating_mul(i32::from(width)).saturating_neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CollectionInfo, ContentKind, SubSectionInfo};
    use pretty_assertions::assert_eq;

    fn section() -> SectionInfo {
        SectionInfo {
            id: 1,
            section_name: "News".to_string(),
            section_icon: Some("newspaper".to_string()),
            position: None,
            section_type: None,
        }
    }

    fn collection(bg: Option<&str>) -> CollectionNode {
        CollectionNode {
            info: CollectionInfo {
                id: 7,
                collection_name: "Highlights".to_string(),
                position: None,
                bg_color: bg.map(str::to_string),
                view_type: None,
            },
            items: Vec::new(),
        }
    }

    fn sub_section(bg: Option<&str>) -> SubSectionNode {
        SubSectionNode {
            info: SubSectionInfo {
                id: 3,
                subsection_name: "Local".to_string(),
                subsection_description: None,
                bg_color: bg.map(str::to_string),
                position: None,
            },
            collections: Vec::new(),
        }
    }

    fn item() -> PreviewItem {
        PreviewItem {
            id: 9,
            title: "Story".to_string(),
            kind: ContentKind::Page,
            created_at: None,
            body: None,
            url: None,
        }
    }

    #[test]
    fn test_empty_stack_is_home() {
        let stack = NavigationStack::new();
        assert!(stack.is_home());
        assert!(stack.current().is_none());
        assert_eq!(stack.slide_offset(80), 0);
    }

    #[test]
    fn test_push_then_pop_returns_previous_state() {
        let before =
            NavigationStack::new().push(NavigationFrame::collection(collection(None), None, None));
        let after = before
            .clone()
            .push(NavigationFrame::article(item(), None))
            .pop();
        assert_eq!(after, before);
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let stack = NavigationStack::new().pop().pop();
        assert!(stack.is_home());
    }

    #[test]
    fn test_current_is_last_frame() {
        let stack = NavigationStack::new()
            .push(NavigationFrame::collection(collection(None), None, None))
            .push(NavigationFrame::article(item(), None));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().map(NavigationFrame::title), Some("Story"));
    }

    #[test]
    fn test_seeded_stack_starts_on_frame() {
        let stack =
            NavigationStack::seeded(NavigationFrame::collection(collection(None), None, None));
        assert_eq!(stack.depth(), 1);
        assert!(!stack.is_home());
        assert!(stack.pop().is_home());
    }

    #[test]
    fn test_slide_offset_scales_with_depth() {
        let stack = NavigationStack::new()
            .push(NavigationFrame::collection(collection(None), None, None))
            .push(NavigationFrame::article(item(), None));
        assert_eq!(stack.slide_offset(100), -200);
    }

    #[test]
    fn test_collection_colour_wins_over_inherited() {
        let frame = NavigationFrame::collection(collection(Some("#112233")), None, Some("#ffffff"));
        assert_eq!(frame.background_color.as_deref(), Some("#112233"));

        let frame = NavigationFrame::collection(collection(Some(" ")), None, Some("#ffffff"));
        assert_eq!(frame.background_color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_sub_section_frame_carries_breadcrumb() {
        let frame =
            NavigationFrame::sub_section(sub_section(Some("#abcdef")), Some(&section()), None);
        assert_eq!(frame.background_color.as_deref(), Some("#abcdef"));
        assert_eq!(
            frame.breadcrumb,
            Some(Breadcrumb {
                section_name: "News".to_string(),
                section_icon: Some("newspaper".to_string()),
            })
        );
    }

    #[test]
    fn test_article_inherits_from_parent() {
        let parent = NavigationFrame::collection(
            collection(Some("#010203")),
            Some(Breadcrumb::from_section(&section())),
            None,
        );
        let frame = NavigationFrame::article(item(), Some(&parent));
        assert_eq!(frame.background_color.as_deref(), Some("#010203"));
        assert_eq!(frame.breadcrumb, parent.breadcrumb);

        let orphan = NavigationFrame::article(item(), None);
        assert!(orphan.background_color.is_none());
        assert!(orphan.breadcrumb.is_none());
    }

    #[test]
    fn test_frame_serializes_with_kind_tag() {
        let frame = NavigationFrame::article(item(), None);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["kind"], "article");
        assert_eq!(json["payload"]["id"], 9);
    }
}
