use crate::app::{App, LoadState};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let mut role = "status_bar";
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match &app.load_state {
            LoadState::Loading => Cow::Owned(format!("Loading {}...", app.granularity.name())),
            LoadState::Failed(error) => {
                role = "status_warning";
                Cow::Owned(format!("Load failed: {}  [r]etry", error))
            }
            LoadState::Idle if !app.warnings.is_empty() => {
                role = "status_warning";
                Cow::Owned(format!(
                    "{} warning(s) [w]  [j/k]move [Enter]open [b]ack [r]eload [t]heme [q]uit",
                    app.warnings.len()
                ))
            }
            LoadState::Idle if app.is_reading() => {
                Cow::Borrowed("[b]ack [j/k]scroll [o]pen link [t]heme [q]uit")
            }
            LoadState::Idle => {
                Cow::Borrowed("[j/k]move [Enter]open [b]ack [o]pen link [r]eload [t]heme [q]uit")
            }
        }
    };

    let paragraph = Paragraph::new(text).style(app.style(role));
    f.render_widget(paragraph, area);
}
