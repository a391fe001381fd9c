//! Application event handling.
//!
//! Processes results sent back by background tasks.

use crate::app::{App, AppEvent, LoadState};
use crate::content::ContentBatch;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ContentLoaded { generation, result } => {
            handle_content_loaded(app, generation, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.load_state = LoadState::Failed(format!("internal error in {} task", task));
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

/// Apply a finished load unless a newer one has started since.
pub(super) fn handle_content_loaded(
    app: &mut App,
    generation: u64,
    result: anyhow::Result<ContentBatch>,
) {
    if generation != app.load_generation {
        tracing::debug!(
            expected = app.load_generation,
            got = generation,
            "Ignoring stale content load (generation mismatch)"
        );
        return;
    }
    app.load_handle = None;

    match result {
        Ok(batch) => {
            let output = batch.build();
            let warnings = output.warnings.len();
            let items = output.view_model.item_count();
            app.apply_build(output);
            if app.status_message.is_none() {
                app.set_status(if warnings == 0 {
                    format!("Loaded {} items", items)
                } else {
                    format!("Loaded {} items with {} warning(s), press [w]", items, warnings)
                });
            }
        }
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Content load failed");
            app.load_state = LoadState::Failed(format!("{:#}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentLoader, Granularity};
    use crate::theme::ThemeVariant;
    use std::path::PathBuf;

    fn test_app() -> App {
        App::new(
            ContentLoader::Snapshot(PathBuf::from("/nonexistent")),
            Granularity::Items,
            ThemeVariant::Dark,
        )
    }

    #[tokio::test]
    async fn test_stale_generation_ignored() {
        let mut app = test_app();
        let stale = app.begin_load();
        app.begin_load();
        handle_content_loaded(&mut app, stale, Err(anyhow::anyhow!("late failure")));
        assert_eq!(app.load_state, LoadState::Loading);
    }

    #[tokio::test]
    async fn test_failure_recorded() {
        let mut app = test_app();
        let generation = app.begin_load();
        handle_content_loaded(&mut app, generation, Err(anyhow::anyhow!("offline")));
        assert_eq!(app.load_state, LoadState::Failed("offline".to_string()));
    }

    #[tokio::test]
    async fn test_success_applies_build() {
        let mut app = test_app();
        let generation = app.begin_load();
        handle_content_loaded(&mut app, generation, Ok(ContentBatch::Items(Vec::new())));
        assert_eq!(app.load_state, LoadState::Idle);
        assert!(app.home.is_empty());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_panic_event_fails_load() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "content load",
                error: "boom".to_string(),
            },
        );
        assert!(matches!(app.load_state, LoadState::Failed(_)));
    }
}
