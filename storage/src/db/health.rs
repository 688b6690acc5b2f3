//! this module hold the implementations of functions needed for the health check of the catalog

use std::{sync::Arc, time::Duration};

use log::warn;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::{
        crud::disc::sum_durations,
        queries::{disc::read_all_with_track_durations, generic::Count},
        schemas::{
            disc::{self, Disc, DiscId},
            track,
        },
    },
    errors::Error,
};

/// Count the number of discs in the database
///
/// # Errors
///
/// see [`Count::count`]
#[instrument]
pub async fn count_discs<C: Connection>(db: &Surreal<C>) -> Result<u64, Error> {
    Count::count(db, disc::TABLE_NAME).await
}

/// Count the number of tracks (of any kind) in the database
///
/// # Errors
///
/// see [`Count::count`]
#[instrument]
pub async fn count_tracks<C: Connection>(db: &Surreal<C>) -> Result<u64, Error> {
    Count::count(db, track::TABLE_NAME).await
}

/// Count the number of orphaned tracks in the database
/// This is the number of tracks whose disc does not exist
///
/// # Errors
///
/// see [`Count::count_dangling`]
#[instrument]
pub async fn count_orphaned_tracks<C: Connection>(db: &Surreal<C>) -> Result<u64, Error> {
    Count::count_dangling(db, track::TABLE_NAME, "disc").await
}

/// A disc, along with the durations of the tracks on it.
#[derive(Debug, Deserialize)]
struct DiscWithTrackDurations {
    id: DiscId,
    name: Arc<str>,
    track_number: u32,
    #[serde(deserialize_with = "super::schemas::deserialize_duration_from_sql_duration")]
    total_duration: Duration,
    #[serde(default)]
    track_durations: Vec<surrealdb::sql::Duration>,
}

impl DiscWithTrackDurations {
    /// The disc, if its stored total is not the sum of the durations of its tracks.
    ///
    /// A disc whose tracks add up to more than a [`Duration`] can hold is always stale.
    fn into_stale_disc(self) -> Option<Disc> {
        let actual = sum_durations(&self.id, self.track_durations.into_iter().map(Into::into))
            .inspect_err(|e| warn!("{e}"))
            .ok();
        if actual == Some(self.total_duration) {
            return None;
        }

        Some(Disc {
            id: self.id,
            name: self.name,
            track_number: self.track_number,
            total_duration: self.total_duration,
        })
    }
}

/// Read the discs whose stored total duration is not the sum of the durations of their tracks
///
/// # Errors
///
/// Returns an error if the query fails or if the result cannot be deserialized.
#[instrument]
pub async fn read_stale_discs<C: Connection>(db: &Surreal<C>) -> Result<Vec<Disc>, Error> {
    let discs: Vec<DiscWithTrackDurations> =
        db.query(read_all_with_track_durations()).await?.take(0)?;

    Ok(discs
        .into_iter()
        .filter_map(DiscWithTrackDurations::into_stale_disc)
        .collect())
}
