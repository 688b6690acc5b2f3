use discotheque_storage::db::{
    health::{count_discs, count_orphaned_tracks, count_tracks, read_stale_discs},
    schemas::disc::Disc,
};
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::errors::CatalogError;

/// A summary of what is in the catalog, and what is inconsistent about it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogHealth {
    pub discs: u64,
    pub tracks: u64,
    /// Tracks whose disc no longer exists.
    pub orphaned_tracks: u64,
    /// Discs whose cached total duration is out of date.
    pub stale_discs: Vec<Disc>,
}

impl CatalogHealth {
    /// Whether nothing needs repairing.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.orphaned_tracks == 0 && self.stale_discs.is_empty()
    }
}

/// Get the health of the catalog.
///
/// # Errors
///
/// Fails if the database cannot be read.
#[instrument(skip(db))]
pub async fn health<C: Connection>(db: &Surreal<C>) -> Result<CatalogHealth, CatalogError> {
    Ok(CatalogHealth {
        discs: count_discs(db).await?,
        tracks: count_tracks(db).await?,
        orphaned_tracks: count_orphaned_tracks(db).await?,
        stale_discs: read_stale_discs(db).await?,
    })
}
