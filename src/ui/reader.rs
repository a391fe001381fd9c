use crate::app::{App, MAX_SCROLL};
use crate::preview::PreviewItem;
use crate::theme::StyleMap;
use crate::util::{single_line, strip_control_chars};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render an article or video screen.
pub fn render(f: &mut Frame, app: &App, item: &PreviewItem, area: Rect, background: Style) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let mut meta = item.kind.label().to_string();
    if let Some(created) = item.created_at {
        meta.push_str(&created.format(" • %Y-%m-%d %H:%M").to_string());
    }

    let mut lines = vec![
        Line::from(Span::styled(single_line(&item.title), app.style("reader_heading"))),
        Line::from(Span::styled(meta, app.style("reader_metadata"))),
        Line::from(""),
    ];

    match item.body.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(body) => lines.extend(render_markdown(&strip_control_chars(body), &app.theme)),
        None => lines.push(Line::from(Span::styled("No body", app.style("empty_hint")))),
    }

    if let Some(url) = item.url.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Link: ", app.style("reader_metadata")),
            Span::styled(single_line(url), app.style("reader_link")),
            Span::styled("  [o]pen", app.style("reader_metadata")),
        ]));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .style(background)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title("Article"),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.reader_scroll.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

/// Convert markdown to styled ratatui Lines.
pub fn render_markdown(md: &str, theme: &StyleMap) -> Vec<Line<'static>> {
    let parser = Parser::new(md);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;
    let mut link_dest: Option<String> = None;
    let mut list_depth: usize = 0;

    let flush = |lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut current_spans);
                lines.push(Line::from(""));
                in_heading = false;
            }
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut current_spans);
                if list_depth == 0 {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut lines, &mut current_spans);
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut current_spans);
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                current_spans.push(Span::raw(format!("{}• ", indent)));
            }
            Event::End(TagEnd::Item) => flush(&mut lines, &mut current_spans),
            Event::Start(Tag::Emphasis) => in_emphasis = true,
            Event::End(TagEnd::Emphasis) => in_emphasis = false,
            Event::Start(Tag::Strong) => in_strong = true,
            Event::End(TagEnd::Strong) => in_strong = false,
            Event::Start(Tag::Link { dest_url, .. }) => link_dest = Some(dest_url.into_string()),
            Event::End(TagEnd::Link) => {
                if let Some(dest) = link_dest.take() {
                    current_spans.push(Span::styled(
                        format!(" <{}>", dest),
                        theme.resolve("reader_link"),
                    ));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    theme.resolve("reader_link"),
                ));
            }
            Event::Text(text) => {
                let role = if in_code_block {
                    "reader_code_block"
                } else if in_heading {
                    "reader_heading"
                } else if in_strong {
                    "reader_strong"
                } else if in_emphasis {
                    "reader_emphasis"
                } else {
                    "reader_body"
                };
                let style = theme.resolve(role);
                if in_code_block {
                    for (i, line) in text.split('\n').enumerate() {
                        if i > 0 {
                            flush(&mut lines, &mut current_spans);
                        }
                        if !line.is_empty() {
                            current_spans.push(Span::styled(line.to_string(), style));
                        }
                    }
                } else {
                    current_spans.push(Span::styled(text.into_string(), style));
                }
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    theme.resolve("reader_inline_code"),
                ));
            }
            Event::SoftBreak => current_spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut lines, &mut current_spans),
            _ => {}
        }
    }

    flush(&mut lines, &mut current_spans);
    // Trailing blank line from the last block
    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}
