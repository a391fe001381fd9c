//! Flattening of the home screen and of navigation frames into list rows.
//!
//! Rows borrow from the model they were built from. Selectable rows carry a
//! [`Target`], which turns into the frame pushed when the row is opened.

use std::borrow::Cow;

use crate::content::SectionInfo;
use crate::navigation::{Breadcrumb, FrameKind, NavigationFrame};
use crate::preview::{
    CollectionNode, FeaturedEntry, HomeScreen, PreviewItem, SectionNode, SubSectionNode,
};
use crate::util::single_line;

/// What opening a row navigates to.
#[derive(Debug, Clone)]
pub enum Target<'a> {
    Collection {
        node: &'a CollectionNode,
        breadcrumb: Option<Breadcrumb>,
        inherited_bg: Option<&'a str>,
    },
    SubSection {
        node: &'a SubSectionNode,
        section: Option<&'a SectionInfo>,
        inherited_bg: Option<&'a str>,
    },
    Article(&'a PreviewItem),
}

impl Target<'_> {
    /// Frame pushed when this target is opened from `parent` (`None` on the
    /// home screen).
    pub fn into_frame(self, parent: Option<&NavigationFrame>) -> NavigationFrame {
        match self {
            Target::Collection {
                node,
                breadcrumb,
                inherited_bg,
            } => NavigationFrame::collection(node.clone(), breadcrumb, inherited_bg),
            Target::SubSection {
                node,
                section,
                inherited_bg,
            } => NavigationFrame::sub_section(node.clone(), section, inherited_bg),
            Target::Article(item) => NavigationFrame::article(item.clone(), parent),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Row<'a> {
    pub label: Cow<'a, str>,
    /// Secondary text drawn after the label.
    pub detail: Option<String>,
    pub indent: u16,
    /// Theme role for the label.
    pub role: &'static str,
    pub target: Option<Target<'a>>,
}

impl<'a> Row<'a> {
    fn heading(label: impl Into<Cow<'a, str>>, role: &'static str, indent: u16) -> Self {
        Self {
            label: label.into(),
            detail: None,
            indent,
            role,
            target: None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.target.is_some()
    }
}

// ============================================================================
// Home screen
// ============================================================================

pub fn home_rows(home: &HomeScreen) -> Vec<Row<'_>> {
    let mut rows = Vec::new();

    if !home.featured.is_empty() {
        rows.push(Row::heading("★ Featured", "featured", 0));
        for entry in &home.featured {
            match entry {
                FeaturedEntry::Section(section) => push_section(&mut rows, section, 1),
                FeaturedEntry::Collection(node) => rows.push(collection_row(node, None, None, 1)),
            }
        }
    }

    for section in &home.sections {
        push_section(&mut rows, section, 0);
    }

    if !home.collections.is_empty() {
        rows.push(Row::heading("Collections", "section_name", 0));
        for node in &home.collections {
            rows.push(collection_row(node, None, None, 1));
        }
    }

    rows
}

fn push_section<'a>(rows: &mut Vec<Row<'a>>, section: &'a SectionNode, indent: u16) {
    rows.push(Row::heading(section_label(&section.info), "section_name", indent));

    for node in &section.collections {
        rows.push(collection_row(
            node,
            Some(Breadcrumb::from_section(&section.info)),
            None,
            indent + 1,
        ));
    }
    for sub in &section.sub_sections {
        let count = sub.collections.len();
        rows.push(Row {
            label: Cow::Owned(single_line(&sub.info.subsection_name)),
            detail: Some(plural(count, "collection")),
            indent: indent + 1,
            role: "sub_section_name",
            target: Some(Target::SubSection {
                node: sub,
                section: Some(&section.info),
                inherited_bg: None,
            }),
        });
    }
}

fn section_label(section: &SectionInfo) -> String {
    let name = single_line(&section.section_name);
    match section.section_icon.as_deref().filter(|i| !i.trim().is_empty()) {
        Some(icon) => format!("[{}] {}", single_line(icon), name),
        None => name,
    }
}

fn collection_row<'a>(
    node: &'a CollectionNode,
    breadcrumb: Option<Breadcrumb>,
    inherited_bg: Option<&'a str>,
    indent: u16,
) -> Row<'a> {
    Row {
        label: Cow::Owned(single_line(&node.info.collection_name)),
        detail: Some(plural(node.items.len(), "item")),
        indent,
        role: "collection_name",
        target: Some(Target::Collection {
            node,
            breadcrumb,
            inherited_bg,
        }),
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Frames
// ============================================================================

/// Rows of a drilled-down screen. Article frames have no rows; the reader
/// draws them.
pub fn frame_rows(frame: &NavigationFrame) -> Vec<Row<'_>> {
    match &frame.kind {
        FrameKind::Collection(node) => node.items.iter().map(item_row).collect(),
        FrameKind::SubSection(node) => {
            let mut rows = Vec::new();
            if let Some(description) = node
                .info
                .subsection_description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
            {
                rows.push(Row::heading(single_line(description), "empty_hint", 0));
            }
            rows.extend(node.collections.iter().map(|c| {
                collection_row(
                    c,
                    frame.breadcrumb.clone(),
                    frame.background_color.as_deref(),
                    0,
                )
            }));
            rows
        }
        FrameKind::Article(_) => Vec::new(),
    }
}

fn item_row(item: &PreviewItem) -> Row<'_> {
    let mut detail = item.kind.label().to_string();
    if let Some(created) = item.created_at {
        detail.push_str(&created.format("  %Y-%m-%d").to_string());
    }
    Row {
        label: Cow::Owned(single_line(&item.title)),
        detail: Some(detail),
        indent: 0,
        role: "item_title",
        target: Some(Target::Article(item)),
    }
}

/// Index into `rows` of the `n`th selectable row.
pub fn selectable_index(rows: &[Row<'_>], n: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| r.is_selectable())
        .nth(n)
        .map(|(i, _)| i)
}

pub fn selectable_count(rows: &[Row<'_>]) -> usize {
    rows.iter().filter(|r| r.is_selectable()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CollectionInfo, ContentKind, SubSectionInfo};
    use crate::preview::ViewModel;
    use pretty_assertions::assert_eq;

    fn item(id: i64) -> PreviewItem {
        PreviewItem {
            id,
            title: format!("Item {id}"),
            kind: ContentKind::Video,
            created_at: None,
            body: None,
            url: None,
        }
    }

    fn collection(id: i64, position: Option<i64>, bg: Option<&str>) -> CollectionNode {
        CollectionNode {
            info: CollectionInfo {
                id,
                collection_name: format!("C{id}"),
                position,
                bg_color: bg.map(str::to_string),
                view_type: None,
            },
            items: vec![item(id * 10)],
        }
    }

    fn home() -> HomeScreen {
        ViewModel {
            sections: vec![SectionNode {
                info: SectionInfo {
                    id: 1,
                    section_name: "News".to_string(),
                    section_icon: Some("paper".to_string()),
                    position: Some(1),
                    section_type: None,
                },
                collections: vec![collection(2, None, None)],
                sub_sections: vec![SubSectionNode {
                    info: SubSectionInfo {
                        id: 5,
                        subsection_name: "Local".to_string(),
                        subsection_description: Some("Nearby".to_string()),
                        bg_color: Some("#112233".to_string()),
                        position: None,
                    },
                    collections: vec![collection(3, None, None)],
                }],
            }],
            collections: vec![collection(4, Some(0), None), collection(6, None, None)],
        }
        .into_home()
    }

    #[test]
    fn test_home_rows_layout() {
        let home = home();
        let rows = home_rows(&home);
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_ref()).collect();
        assert_eq!(
            labels,
            vec!["★ Featured", "C4", "[paper] News", "C2", "Local", "Collections", "C6"]
        );
        assert_eq!(selectable_count(&rows), 4);
        assert_eq!(selectable_index(&rows, 0), Some(1));
        assert_eq!(selectable_index(&rows, 3), Some(6));
        assert_eq!(selectable_index(&rows, 4), None);
    }

    #[test]
    fn test_section_collection_carries_breadcrumb() {
        let home = home();
        let rows = home_rows(&home);
        let target = rows[3].target.clone().unwrap();
        let frame = target.into_frame(None);
        assert_eq!(frame.title(), "C2");
        assert_eq!(
            frame.breadcrumb.map(|b| b.section_name),
            Some("News".to_string())
        );
    }

    #[test]
    fn test_sub_section_frame_rows_inherit_colour() {
        let home = home();
        let rows = home_rows(&home);
        let sub_frame = rows[4].target.clone().unwrap().into_frame(None);
        assert_eq!(sub_frame.background_color.as_deref(), Some("#112233"));

        let sub_rows = frame_rows(&sub_frame);
        assert_eq!(sub_rows[0].label, "Nearby");
        assert!(!sub_rows[0].is_selectable());

        let collection_frame = sub_rows[1]
            .target
            .clone()
            .unwrap()
            .into_frame(Some(&sub_frame));
        assert_eq!(collection_frame.background_color.as_deref(), Some("#112233"));
        assert_eq!(collection_frame.breadcrumb, sub_frame.breadcrumb);
    }

    #[test]
    fn test_collection_frame_lists_items() {
        let frame = NavigationFrame::collection(collection(2, None, None), None, None);
        let rows = frame_rows(&frame);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Item 20");
        assert_eq!(rows[0].detail.as_deref(), Some("video"));

        let article = rows[0].target.clone().unwrap().into_frame(Some(&frame));
        assert!(frame_rows(&article).is_empty());
    }

    #[test]
    fn test_labels_are_sanitized() {
        let mut node = collection(1, None, None);
        node.info.collection_name = "Bad\x1b[31m\nName".to_string();
        let row = collection_row(&node, None, None, 0);
        assert_eq!(row.label, "Bad Name");
    }
}
