//! Render functions for the TUI.
//!
//! Each frame is drawn as a header (breadcrumb), the visible screen, and a
//! status bar, with the warnings overlay on top when toggled.

use crate::app::App;
use crate::navigation::FrameKind;
use crate::util::{display_width, single_line, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{list, reader, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);

    let background = app
        .background()
        .map(|color| Style::default().bg(color))
        .unwrap_or_default();
    match app.navigation.current().map(|frame| &frame.kind) {
        Some(FrameKind::Article(item)) => reader::render(f, app, item, chunks[1], background),
        _ => list::render(f, app, chunks[1], background),
    }

    status::render(f, app, chunks[2]);

    if app.show_warnings {
        render_warnings_overlay(f, app);
    }
}

/// Breadcrumb line: back target, then the path of frame titles.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let mut spans = Vec::new();

    if app.navigation.is_home() {
        spans.push(Span::styled(
            format!("cms-preview · {}", app.loader.describe()),
            app.style("breadcrumb"),
        ));
    } else {
        let back = match app.breadcrumb() {
            Some(crumb) => match crumb.section_icon.as_deref() {
                Some(icon) => format!(
                    "‹ [{}] {}",
                    single_line(icon),
                    single_line(&crumb.section_name)
                ),
                None => format!("‹ {}", single_line(&crumb.section_name)),
            },
            None => "‹ Home".to_string(),
        };
        spans.push(Span::styled(back, app.style("breadcrumb")));

        let path = app
            .navigation
            .frames()
            .iter()
            .map(|frame| single_line(frame.title()))
            .collect::<Vec<_>>()
            .join(" / ");
        spans.push(Span::raw("  "));
        spans.push(Span::styled(path, app.style("reader_metadata")));
    }

    let line: String = spans.iter().map(|s| s.content.as_ref()).collect();
    if display_width(&line) > width {
        // Keep the back target readable on narrow terminals
        let text = truncate_to_width(&line, width).into_owned();
        f.render_widget(Paragraph::new(text).style(app.style("breadcrumb")), area);
    } else {
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Build warnings overlay, centered on screen.
fn render_warnings_overlay(f: &mut Frame, app: &App) {
    let area = f.area();

    let mut text: Vec<Line> = if app.warnings.is_empty() {
        vec![Line::from("No warnings")]
    } else {
        app.warnings
            .iter()
            .map(|w| Line::from(format!("• {}", w)))
            .collect()
    };
    if app.skipped_orphans > 0 {
        text.push(Line::from(format!(
            "• {} item(s) without a collection were skipped",
            app.skipped_orphans
        )));
    }
    text.push(Line::from(""));
    text.push(Line::from("(w/Esc) Close"));

    let width = 70u16.min(area.width.saturating_sub(4));
    let height = (text.len().min(64) as u16 + 2).min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 20 || overlay.height < 4 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Build warnings "),
        )
        .wrap(Wrap { trim: true })
        .style(app.style("reader_body"));

    f.render_widget(paragraph, overlay);
}
