use crate::content::{ContentBatch, ContentLoader, Granularity};
use crate::navigation::{Breadcrumb, FrameKind, NavigationFrame, NavigationStack};
use crate::preview::{BuildOutput, BuildWarning, HomeScreen};
use crate::theme::{parse_hex_color, StyleMap, ThemeVariant};
use crate::ui::screen::{frame_rows, home_rows, selectable_count, selectable_index, Row, Target};
use ratatui::style::{Color, Style};
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Events and load state
// ============================================================================

/// State of the most recent content load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Failed(String),
}

/// Events from background tasks
pub enum AppEvent {
    /// Records fetched for a reload.
    ///
    /// `generation` is the value of `App::load_generation` when the load was
    /// spawned; results from older loads are dropped.
    ContentLoaded {
        generation: u64,
        result: anyhow::Result<ContentBatch>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub loader: ContentLoader,
    pub granularity: Granularity,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    /// Screen background when no frame sets one.
    pub default_bg: Option<String>,

    // Data
    pub home: HomeScreen,
    pub warnings: Vec<BuildWarning>,
    pub skipped_orphans: usize,

    // Navigation
    pub navigation: NavigationStack,
    /// Selected selectable row per screen; index 0 is the home screen.
    pub selections: Vec<usize>,
    pub reader_scroll: usize,
    /// Collection to open once content has loaded (`--collection`).
    pub pending_deep_link: Option<i64>,

    // Loading
    pub load_state: LoadState,
    pub load_generation: u64,
    pub load_handle: Option<tokio::task::JoinHandle<()>>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_warnings: bool,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        loader: ContentLoader,
        granularity: Granularity,
        theme_variant: ThemeVariant,
    ) -> Self {
        Self {
            loader,
            granularity,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            default_bg: None,
            home: HomeScreen::default(),
            warnings: Vec::new(),
            skipped_orphans: 0,
            navigation: NavigationStack::new(),
            selections: vec![0],
            reader_scroll: 0,
            pending_deep_link: None,
            load_state: LoadState::Idle,
            load_generation: 0,
            load_handle: None,
            status_message: None,
            show_warnings: false,
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant and return its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Start a new load generation, aborting the previous load task.
    pub fn begin_load(&mut self) -> u64 {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous content load task");
        }
        self.load_generation = self.load_generation.wrapping_add(1);
        self.load_state = LoadState::Loading;
        self.load_generation
    }

    /// Replace the content with a fresh build.
    ///
    /// The previous navigation path referred to the old tree, so the stack
    /// returns to the home screen, unless a deep link is still pending.
    pub fn apply_build(&mut self, output: BuildOutput) {
        self.home = output.view_model.into_home();
        self.warnings = output.warnings;
        self.skipped_orphans = output.skipped_orphans;
        self.load_state = LoadState::Idle;
        self.navigation = NavigationStack::new();
        self.selections = vec![0];
        self.reader_scroll = 0;

        if let Some(id) = self.pending_deep_link.take() {
            if !self.open_deep_link(id) {
                self.set_status(format!("Collection {} not found", id));
            }
        }
        self.needs_redraw = true;
    }

    /// Seed the navigation stack with the collection `id`.
    pub fn open_deep_link(&mut self, id: i64) -> bool {
        let Some(frame) = deep_link_frame(&self.home, id) else {
            tracing::warn!(collection_id = id, "Deep link target not found");
            return false;
        };
        self.navigation = NavigationStack::seeded(frame);
        self.selections = vec![0, 0];
        self.reader_scroll = 0;
        true
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Rows of the visible screen.
    pub fn current_rows(&self) -> Vec<Row<'_>> {
        match self.navigation.current() {
            Some(frame) => frame_rows(frame),
            None => home_rows(&self.home),
        }
    }

    pub fn selected(&self) -> usize {
        self.selections.last().copied().unwrap_or(0)
    }

    fn set_selected(&mut self, value: usize) {
        match self.selections.last_mut() {
            Some(slot) => *slot = value,
            None => self.selections.push(value),
        }
    }

    pub fn is_reading(&self) -> bool {
        matches!(
            self.navigation.current().map(|f| &f.kind),
            Some(FrameKind::Article(_))
        )
    }

    pub fn nav_up(&mut self) {
        let value = self.selected().saturating_sub(1);
        self.set_selected(value);
    }

    pub fn nav_down(&mut self) {
        let count = selectable_count(&self.current_rows());
        if count > 0 {
            let value = self.selected().saturating_add(1).min(count - 1);
            self.set_selected(value);
        }
    }

    /// Push the frame behind the selected row. Returns false when nothing
    /// is selectable.
    pub fn open_selected(&mut self) -> bool {
        let frame = {
            let rows = self.current_rows();
            let target = selectable_index(&rows, self.selected())
                .and_then(|idx| rows[idx].target.clone());
            match target {
                Some(target) => target.into_frame(self.navigation.current()),
                None => return false,
            }
        };

        self.navigation = std::mem::take(&mut self.navigation).push(frame);
        self.selections.push(0);
        self.reader_scroll = 0;
        true
    }

    /// Pop the visible frame. Returns false on the home screen.
    pub fn go_back(&mut self) -> bool {
        if self.navigation.is_home() {
            return false;
        }
        self.navigation = std::mem::take(&mut self.navigation).pop();
        if self.selections.len() > 1 {
            self.selections.pop();
        }
        self.reader_scroll = 0;
        true
    }

    /// URL of the article being read, or of the selected item row.
    pub fn selected_url(&self) -> Option<String> {
        if let Some(NavigationFrame {
            kind: FrameKind::Article(item),
            ..
        }) = self.navigation.current()
        {
            return item.url.clone();
        }
        let rows = self.current_rows();
        match selectable_index(&rows, self.selected()).and_then(|idx| rows[idx].target.as_ref()) {
            Some(Target::Article(item)) => item.url.clone(),
            _ => None,
        }
    }

    /// Background of the visible screen, falling back to the configured default.
    pub fn background(&self) -> Option<Color> {
        self.navigation
            .current()
            .and_then(|f| f.background_color.as_deref())
            .or(self.default_bg.as_deref())
            .and_then(parse_hex_color)
    }

    pub fn breadcrumb(&self) -> Option<&Breadcrumb> {
        self.navigation.current().and_then(|f| f.breadcrumb.as_ref())
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.reader_scroll = self.reader_scroll.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.reader_scroll = self.reader_scroll.saturating_add(amount).min(MAX_SCROLL);
    }
}

/// Frame for a deep link to collection `id`, with the breadcrumb and colour
/// it would have when reached by drilling down.
pub fn deep_link_frame(home: &HomeScreen, id: i64) -> Option<NavigationFrame> {
    let location = home.find_collection(id)?;
    Some(NavigationFrame::collection(
        location.collection.clone(),
        location.section.map(Breadcrumb::from_section),
        location.sub_section.and_then(|s| s.bg_color.as_deref()),
    ))
}

// ============================================================================
// Resource Cleanup
// ============================================================================

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted content load task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{
        CollectionInfo, CollectionRecord, ContentItem, ContentKind, SectionInfo, SubSectionInfo,
        SubSectionRef,
    };
    use crate::preview::build_from_content_items;
    use std::path::PathBuf;
    use tokio::time::{self, Duration};

    fn test_app() -> App {
        App::new(
            ContentLoader::Snapshot(PathBuf::from("/nonexistent/snapshot.json")),
            Granularity::Items,
            ThemeVariant::Dark,
        )
    }

    fn section() -> SectionInfo {
        SectionInfo {
            id: 1,
            section_name: "News".to_string(),
            section_icon: None,
            position: Some(1),
            section_type: None,
        }
    }

    fn item(id: i64, collection: CollectionRecord) -> ContentItem {
        ContentItem {
            id,
            title: format!("Item {id}"),
            kind: ContentKind::Webpage,
            created_at: None,
            body: Some("# Heading".to_string()),
            url: Some(format!("https://example.com/{id}")),
            collection: Some(Box::new(collection)),
        }
    }

    fn collection(id: i64, sub_section: Option<SubSectionRef>) -> CollectionRecord {
        CollectionRecord {
            info: CollectionInfo {
                id,
                collection_name: format!("C{id}"),
                position: None,
                bg_color: None,
                view_type: None,
            },
            section: sub_section.is_none().then(section),
            sub_section,
            articles: Vec::new(),
            videos: Vec::new(),
        }
    }

    fn loaded_app() -> App {
        let sub = SubSectionRef {
            info: SubSectionInfo {
                id: 4,
                subsection_name: "Local".to_string(),
                subsection_description: None,
                bg_color: Some("#102030".to_string()),
                position: None,
            },
            section: Some(section()),
        };
        let output = build_from_content_items(&[
            item(10, collection(2, None)),
            item(11, collection(3, Some(sub))),
        ]);
        let mut app = test_app();
        app.apply_build(output);
        app
    }

    #[test]
    fn test_drill_down_and_back() {
        let mut app = loaded_app();
        assert!(app.navigation.is_home());

        // Home rows: section heading, C2, Local
        assert!(app.open_selected());
        assert_eq!(app.navigation.current().map(|f| f.title()), Some("C2"));
        assert_eq!(app.breadcrumb().map(|b| b.section_name.as_str()), Some("News"));

        assert!(app.open_selected());
        assert!(app.is_reading());
        assert_eq!(app.selected_url().as_deref(), Some("https://example.com/10"));

        assert!(app.go_back());
        assert!(app.go_back());
        assert!(app.navigation.is_home());
        assert!(!app.go_back());
        assert_eq!(app.selections, vec![0]);
    }

    #[test]
    fn test_nav_clamps_to_selectable_rows() {
        let mut app = loaded_app();
        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.selected(), 1);
        app.nav_up();
        app.nav_up();
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_sub_section_colour_reaches_article() {
        let mut app = loaded_app();
        app.nav_down();
        assert!(app.open_selected());
        assert!(app.open_selected());
        assert!(app.open_selected());
        assert!(app.is_reading());
        assert_eq!(app.background(), Some(Color::Rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn test_default_background_used_on_home() {
        let mut app = loaded_app();
        assert_eq!(app.background(), None);
        app.default_bg = Some("#ffffff".to_string());
        assert_eq!(app.background(), Some(Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_deep_link_seeds_stack() {
        let mut app = loaded_app();
        assert!(app.open_deep_link(3));
        assert_eq!(app.navigation.depth(), 1);
        assert_eq!(app.navigation.current().map(|f| f.title()), Some("C3"));
        assert_eq!(app.background(), Some(Color::Rgb(0x10, 0x20, 0x30)));
        assert!(app.go_back());
        assert!(app.navigation.is_home());
        assert!(!app.open_deep_link(99));
    }

    #[test]
    fn test_missing_deep_link_sets_status() {
        let mut app = test_app();
        app.pending_deep_link = Some(99);
        app.apply_build(BuildOutput::default());
        assert!(app.navigation.is_home());
        assert!(app.status_message.is_some());
        assert!(app.pending_deep_link.is_none());
    }

    #[tokio::test]
    async fn test_begin_load_bumps_generation() {
        let mut app = test_app();
        let first = app.begin_load();
        let second = app.begin_load();
        assert_eq!(second, first + 1);
        assert_eq!(app.load_state, LoadState::Loading);
    }

    #[test]
    fn test_reader_scroll_saturates() {
        let mut app = test_app();
        app.scroll_up(5);
        assert_eq!(app.reader_scroll, 0);
        app.scroll_down(MAX_SCROLL + 10);
        assert_eq!(app.reader_scroll, MAX_SCROLL);
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = test_app();
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
