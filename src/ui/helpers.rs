use crate::app::{App, AppEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run a future, turning a panic inside it into an error message.
///
/// Background tasks report a panic as `AppEvent::TaskPanicked` instead of
/// dying silently and leaving the UI waiting forever.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Start a reload in the background.
///
/// Any load still in flight is aborted, and its result would be ignored
/// anyway because the generation moves on.
pub(super) fn spawn_content_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_load();
    let loader = app.loader.clone();
    let granularity = app.granularity;
    let tx = event_tx.clone();

    tracing::debug!(generation, granularity = granularity.name(), "Starting content load");

    app.load_handle = Some(tokio::spawn(async move {
        let event = match catch_task_panic(loader.load(granularity)).await {
            Ok(result) => AppEvent::ContentLoaded { generation, result },
            Err(error) => AppEvent::TaskPanicked {
                task: "content load",
                error,
            },
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send content load result (receiver dropped)");
        }
    }));
}
