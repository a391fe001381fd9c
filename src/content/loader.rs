use std::path::PathBuf;

use anyhow::{Context, Result};

use super::batch::{ContentBatch, Granularity};
use super::client::ContentClient;
use super::snapshot::Snapshot;

/// Where content records come from.
#[derive(Debug, Clone)]
pub enum ContentLoader {
    Api(ContentClient),
    Snapshot(PathBuf),
}

impl ContentLoader {
    pub async fn load(&self, granularity: Granularity) -> Result<ContentBatch> {
        match self {
            Self::Api(client) => client.fetch(granularity).await.with_context(|| {
                format!(
                    "Failed to fetch {} from {}",
                    granularity.name(),
                    client.base_url()
                )
            }),
            Self::Snapshot(path) => {
                let path = path.clone();
                let snapshot = tokio::task::spawn_blocking(move || {
                    Snapshot::load(&path)
                        .with_context(|| format!("Failed to read snapshot {}", path.display()))
                })
                .await
                .context("Snapshot reader task failed")??;
                let batch = snapshot.into_batch(granularity);
                tracing::info!(
                    granularity = granularity.name(),
                    records = batch.len(),
                    "Loaded snapshot"
                );
                Ok(batch)
            }
        }
    }

    /// Short description for the status bar.
    pub fn describe(&self) -> String {
        match self {
            Self::Api(client) => client.base_url().to_string(),
            Self::Snapshot(path) => path.display().to_string(),
        }
    }
}
