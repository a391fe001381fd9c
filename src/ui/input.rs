//! Input handling for the TUI.
//!
//! Keys are fixed: the preview has a single screen model, so every key maps
//! to one action regardless of depth, except scrolling in the reader.

use crate::app::{App, AppEvent};
use crate::util::validate_url_for_open;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_content_load;
use super::Action;

/// Lines moved by a page scroll in the reader.
const PAGE_SIZE: usize = 20;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    if app.show_warnings {
        if matches!(code, KeyCode::Esc | KeyCode::Char('w') | KeyCode::Char('q')) {
            app.show_warnings = false;
        }
        return Ok(Action::Continue);
    }

    let reading = app.is_reading();
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down if reading => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up if reading => app.scroll_up(1),
        KeyCode::PageDown if reading => app.scroll_down(PAGE_SIZE),
        KeyCode::PageUp if reading => app.scroll_up(PAGE_SIZE),
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if !reading && !app.open_selected() {
                app.set_status("Nothing to open");
            }
        }
        KeyCode::Esc
        | KeyCode::Backspace
        | KeyCode::Char('b')
        | KeyCode::Char('h')
        | KeyCode::Left => {
            app.go_back();
        }
        KeyCode::Char('r') => {
            app.set_status("Reloading...");
            spawn_content_load(app, event_tx);
        }
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KeyCode::Char('w') => app.show_warnings = true,
        KeyCode::Char('o') => open_selected_url(app)?,
        _ => {}
    }
    Ok(Action::Continue)
}

/// Open the link of the article being read, or of the selected item.
fn open_selected_url(app: &mut App) -> Result<()> {
    let Some(url) = app.selected_url() else {
        app.set_status("No link to open");
        return Ok(());
    };
    // Validate before open::that() so only web URLs reach the system opener
    match validate_url_for_open(&url) {
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            }
        }
        Err(e) => app.set_status(format!("Refusing to open link: {}", e)),
    }
    Ok(())
}
