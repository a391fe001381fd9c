//! Theme system for the preview TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! selects between Dark and Light palettes, and `StyleMap` resolves role
//! names to concrete styles. Background colours authored in the CMS are
//! parsed with [`parse_hex_color`].

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role of the preview mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Screen listing --
    pub featured: Style,
    pub section_name: Style,
    pub sub_section_name: Style,
    pub collection_name: Style,
    pub item_title: Style,
    pub item_kind: Style,
    pub item_date: Style,
    pub row_selected: Style,
    pub empty_hint: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_code_block: Style,
    pub reader_inline_code: Style,
    pub reader_emphasis: Style,
    pub reader_strong: Style,
    pub reader_link: Style,

    // -- Chrome --
    pub breadcrumb: Style,
    pub status_bar: Style,
    pub status_warning: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            featured: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            section_name: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            sub_section_name: Style::default().fg(Color::Cyan),
            collection_name: Style::default().add_modifier(Modifier::BOLD),
            item_title: Style::default(),
            item_kind: Style::default().fg(Color::Magenta),
            item_date: Style::default().fg(Color::DarkGray),
            row_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            empty_hint: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::Yellow).bg(Color::Black),
            reader_inline_code: Style::default().fg(Color::Yellow),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            breadcrumb: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_warning: Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            featured: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            section_name: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            sub_section_name: Style::default().fg(Color::Blue),
            collection_name: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_title: Style::default().fg(Color::Black),
            item_kind: Style::default().fg(Color::Magenta),
            item_date: Style::default().fg(Color::DarkGray),
            row_selected: Style::default().bg(Color::Blue).fg(Color::White),
            empty_hint: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::DarkGray).bg(Color::White),
            reader_inline_code: Style::default().fg(Color::DarkGray),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            breadcrumb: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_warning: Style::default().bg(Color::White).fg(Color::Red),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 22] = [
    "featured",
    "section_name",
    "sub_section_name",
    "collection_name",
    "item_title",
    "item_kind",
    "item_date",
    "row_selected",
    "empty_hint",
    "reader_heading",
    "reader_body",
    "reader_metadata",
    "reader_code_block",
    "reader_inline_code",
    "reader_emphasis",
    "reader_strong",
    "reader_link",
    "breadcrumb",
    "status_bar",
    "status_warning",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 22] = [
            p.featured,
            p.section_name,
            p.sub_section_name,
            p.collection_name,
            p.item_title,
            p.item_kind,
            p.item_date,
            p.row_selected,
            p.empty_hint,
            p.reader_heading,
            p.reader_body,
            p.reader_metadata,
            p.reader_code_block,
            p.reader_inline_code,
            p.reader_emphasis,
            p.reader_strong,
            p.reader_link,
            p.breadcrumb,
            p.status_bar,
            p.status_warning,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// CMS colours
// ============================================================================

/// Parse a CMS colour value (`#RRGGBB` or `#RGB`, leading `#` optional).
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some(Color::Rgb(
                expand(&hex[0..1])?,
                expand(&hex[1..2])?,
                expand(&hex[2..3])?,
            ))
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_selection() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.row_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.row_selected, light.row_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("Light"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(
            ThemeVariant::from_str_name("DARK"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn style_map_resolves_every_role() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        assert_eq!(sm.resolve("breadcrumb"), palette.breadcrumb);
        assert_eq!(sm.resolve("reader_heading"), palette.reader_heading);
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#FF8800"), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_hex_color("ff8800"), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color(" #000000 "), Some(Color::Rgb(0, 0, 0)));
    }

    #[test]
    fn invalid_hex_colors_rejected() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
        assert_eq!(parse_hex_color("red"), None);
    }
}
