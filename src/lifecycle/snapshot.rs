//! # Snapshots
//!
//! The whole store as one JSON document: every table's rows, id sequence and owned
//! link rows, keyed by entity name. Loaded at startup and written on graceful
//! shutdown when a data file is configured.

use super::MarketplaceSystem;
use anyhow::Context;
use resource_framework::{FrameworkError, ResourceClient, ResourceEntity, TableDump};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tables: BTreeMap<String, TableDump>,
}

impl Snapshot {
    pub(crate) async fn insert<T: ResourceEntity>(
        &mut self,
        table: &ResourceClient<T>,
    ) -> Result<(), FrameworkError> {
        let dump = table.dump().await?;
        self.tables.insert(T::ENTITY_NAME.to_string(), dump);
        Ok(())
    }

    /// Restores the table of `T` if the snapshot has one.
    pub(crate) async fn restore<T: ResourceEntity>(
        &mut self,
        table: &ResourceClient<T>,
    ) -> Result<usize, FrameworkError> {
        match self.tables.remove(T::ENTITY_NAME) {
            Some(dump) => table.restore(dump).await,
            None => Ok(0),
        }
    }
}

/// Loads `path` into the tables. A missing file leaves the store empty.
pub async fn load(system: &MarketplaceSystem, path: &Path) -> anyhow::Result<usize> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No snapshot, starting empty");
            return Ok(0);
        }
        Err(e) => return Err(e).with_context(|| format!("reading snapshot {}", path.display())),
    };

    let snapshot: Snapshot =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing snapshot {}", path.display()))?;
    for name in snapshot.tables.keys() {
        if !KNOWN_TABLES.contains(&name.as_str()) {
            warn!(table = %name, "Ignoring unknown table in snapshot");
        }
    }

    let loaded = system.restore(snapshot).await.context("restoring tables")?;
    info!(path = %path.display(), loaded, "Snapshot loaded");
    Ok(loaded)
}

/// Writes every table to `path`, replacing the previous snapshot only once the new
/// one is fully written.
pub async fn save(system: &MarketplaceSystem, path: &Path) -> anyhow::Result<()> {
    let snapshot = system.dump().await.context("dumping tables")?;
    let bytes = serde_json::to_vec_pretty(&snapshot).context("encoding snapshot")?;

    let staging = path.with_extension("tmp");
    tokio::fs::write(&staging, &bytes)
        .await
        .with_context(|| format!("writing {}", staging.display()))?;
    tokio::fs::rename(&staging, path)
        .await
        .with_context(|| format!("replacing snapshot {}", path.display()))?;

    info!(path = %path.display(), size = bytes.len(), "Snapshot saved");
    Ok(())
}

const KNOWN_TABLES: [&str; 12] = [
    "art",
    "artist",
    "brand",
    "brandCategory",
    "collection",
    "collector",
    "data",
    "feature",
    "invoice",
    "notification",
    "output",
    "transaction",
];
