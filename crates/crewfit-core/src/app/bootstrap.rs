//! Bootstrap - 空の store に seed データを投入する

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::StoreError;
use crate::ports::{EntityStore, Snapshot};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file {path} is not a valid snapshot: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a `{ "people": [...], "projects": [...] }` JSON file.
pub async fn load_seed(path: impl AsRef<Path>) -> Result<Snapshot, SeedError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `seed` into `store` if it holds nothing yet. Returns whether the seed
/// was written.
pub async fn bootstrap_if_empty(
    store: &dyn EntityStore,
    seed: Snapshot,
) -> Result<bool, StoreError> {
    if !store.load_all().await?.is_empty() {
        return Ok(false);
    }
    info!(
        people = seed.people.len(),
        projects = seed.projects.len(),
        "seeding empty entity store"
    );
    store.replace_all(seed).await?;
    Ok(true)
}
