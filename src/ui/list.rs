use crate::app::App;
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::screen::{selectable_index, Row};

/// Render the rows of the home screen or of a drilled-down frame.
pub fn render(f: &mut Frame, app: &App, area: Rect, background: Style) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let rows = app.current_rows();
    let title = match app.navigation.current() {
        Some(frame) => {
            let width = area.width.saturating_sub(4) as usize;
            format!(" {} ", truncate_to_width(frame.title(), width))
        }
        None => " Home ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(title);

    if rows.is_empty() {
        let hint = if app.navigation.is_home() {
            "No content yet. Press [r] to reload."
        } else {
            "Nothing here."
        };
        let list = List::new(vec![ListItem::new(Span::styled(hint, app.style("empty_hint")))])
            .block(block)
            .style(background);
        f.render_widget(list, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = rows.iter().map(|row| row_item(app, row, inner_width)).collect();

    let mut state = ListState::default().with_selected(selectable_index(&rows, app.selected()));
    let list = List::new(items)
        .block(block)
        .style(background)
        .highlight_style(app.style("row_selected"));

    f.render_stateful_widget(list, area, &mut state);
}

fn row_item<'a>(app: &App, row: &'a Row<'a>, width: usize) -> ListItem<'a> {
    let indent = "  ".repeat(row.indent as usize);
    let marker = if row.is_selectable() { "› " } else { "" };
    let prefix_width = display_width(&indent) + display_width(marker);

    let detail_width = row.detail.as_deref().map(|d| display_width(d) + 2).unwrap_or(0);
    let label_width = width.saturating_sub(prefix_width + detail_width).max(1);

    let mut spans = vec![
        Span::raw(indent),
        Span::raw(marker),
        Span::styled(truncate_to_width(&row.label, label_width), app.style(row.role)),
    ];
    if let Some(detail) = row.detail.as_deref() {
        let role = if row.role == "item_title" { "item_kind" } else { "item_date" };
        spans.push(Span::styled(format!("  {}", detail), app.style(role)));
    }
    ListItem::new(Line::from(spans))
}
