//! The duration aggregator.
//!
//! Keeps the cached total duration of a disc equal to the sum of the durations of its tracks.
//! Every service operation that creates, updates, or deletes a track calls
//! [`recompute_disc_duration`] as its last step, for every disc it touched.
use discotheque_storage::db::schemas::disc::{Disc, DiscId, TABLE_NAME};
use log::debug;
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::errors::CatalogError;

/// Recompute the total duration of a disc from scratch, and store it.
///
/// A disc without tracks ends up with a total of zero.
///
/// # Errors
///
/// Fails with [`CatalogError::NotFound`] if the disc does not exist, or if the database cannot be
/// read or written. The mutation that triggered the recompute is not undone in that case.
#[instrument(skip(db))]
pub async fn recompute_disc_duration<C: Connection>(
    db: &Surreal<C>,
    disc: DiscId,
) -> Result<Disc, CatalogError> {
    let repaired = Disc::repair(db, disc.clone())
        .await?
        .ok_or_else(|| CatalogError::not_found(TABLE_NAME, disc))?;

    debug!(
        "Total duration of disc {} is now {:?}",
        repaired.id, repaired.total_duration
    );
    Ok(repaired)
}

/// Recompute the discs a track was on before and after an update.
///
/// Returns the disc the track is on now.
///
/// # Errors
///
/// see [`recompute_disc_duration`]
#[instrument(skip(db))]
pub async fn recompute_moved<C: Connection>(
    db: &Surreal<C>,
    from: DiscId,
    to: DiscId,
) -> Result<Disc, CatalogError> {
    if from != to {
        recompute_disc_duration(db, from).await?;
    }
    recompute_disc_duration(db, to).await
}
