//! The disc service, and the queries scoped to a single disc.
use std::{sync::Arc, time::Duration};

use discotheque_storage::{
    db::schemas::{
        composition::AnyComposition,
        disc::{Disc, DiscChangeSet, DiscId, NewDisc, TABLE_NAME},
        track::Track,
    },
    errors::Error,
};
use log::{info, warn};
use surrealdb::{Connection, Surreal};
use tap::TapFallible;
use tracing::instrument;

use super::{CrudService, find_disc};
use crate::errors::CatalogError;

pub struct DiscService<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> DiscService<C> {
    pub(crate) const fn new(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    /// Every track on a disc.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if the disc does not exist.
    #[instrument(skip(self))]
    pub async fn tracks_of(&self, id: DiscId) -> Result<Vec<Track>, CatalogError> {
        info!("Listing the tracks of disc {id}");
        async {
            find_disc(&self.db, id.clone()).await?;
            Ok::<_, CatalogError>(Disc::read_tracks(&self.db, id).await?)
        }
        .await
        .tap_err(|e| warn!("Error in tracks_of: {e}"))
    }

    /// The compositions on a disc, ordered by their style (rock), genre (pop), or epoch (classical).
    ///
    /// Compositions with the same style-like field are ordered by title, then by id.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if the disc does not exist.
    #[instrument(skip(self))]
    pub async fn sorted_by_style(&self, id: DiscId) -> Result<Vec<AnyComposition>, CatalogError> {
        info!("Sorting the tracks of disc {id} by style");
        async {
            find_disc(&self.db, id.clone()).await?;

            let mut compositions = Disc::read_compositions(&self.db, id).await?;
            compositions.sort_by_cached_key(|composition| {
                (
                    composition.style_key().to_owned(),
                    composition.track.title.clone(),
                    composition.track.id.to_string(),
                )
            });
            Ok::<_, CatalogError>(compositions)
        }
        .await
        .tap_err(|e| warn!("Error in sorted_by_style: {e}"))
    }

    /// The tracks on a disc that last at least `min` and at most `max`.
    ///
    /// Nothing qualifies when `min` is greater than `max`.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if the disc does not exist.
    #[instrument(skip(self))]
    pub async fn length_range(
        &self,
        id: DiscId,
        min: Duration,
        max: Duration,
    ) -> Result<Vec<Track>, CatalogError> {
        info!("Finding the tracks of disc {id} between {min:?} and {max:?} long");
        async {
            find_disc(&self.db, id.clone()).await?;
            if min > max {
                return Ok(Vec::new());
            }
            Ok::<_, CatalogError>(Disc::read_tracks_in_length_range(&self.db, id, min, max).await?)
        }
        .await
        .tap_err(|e| warn!("Error in length_range: {e}"))
    }

    /// The total duration of a disc, as last computed by the aggregator.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if the disc does not exist.
    #[instrument(skip(self))]
    pub async fn total_duration(&self, id: DiscId) -> Result<Duration, CatalogError> {
        info!("Reading the total duration of disc {id}");
        Ok(find_disc(&self.db, id)
            .await
            .tap_err(|e| warn!("Error in total_duration: {e}"))?
            .total_duration)
    }
}

impl<C: Connection> CrudService for DiscService<C> {
    type Id = DiscId;
    type Record = Disc;
    type Create = NewDisc;
    type Update = NewDisc;
    type Mutated = Disc;

    /// Create an empty disc, its total duration starts at zero.
    #[instrument(skip(self))]
    async fn create(&self, input: NewDisc) -> Result<Disc, CatalogError> {
        info!("Creating disc {}", input.name);
        Ok(Disc::create(&self.db, input.into_disc())
            .await
            .map_err(CatalogError::from)
            .and_then(|created| created.ok_or_else(|| Error::NotCreated.into()))
            .tap_err(|e| warn!("Error in create_disc: {e}"))?)
    }

    #[instrument(skip(self))]
    async fn read(&self, id: DiscId) -> Result<Disc, CatalogError> {
        info!("Reading disc {id}");
        find_disc(&self.db, id)
            .await
            .tap_err(|e| warn!("Error in read_disc: {e}"))
    }

    /// Replace the name and declared track count of a disc.
    ///
    /// The total duration is derived, so it is left alone.
    #[instrument(skip(self))]
    async fn update(&self, id: DiscId, input: NewDisc) -> Result<Disc, CatalogError> {
        info!("Updating disc {id}");
        let changes = DiscChangeSet {
            name: Some(input.name),
            track_number: Some(input.track_number),
            total_duration: None,
        };

        Disc::update(&self.db, id.clone(), changes)
            .await
            .map_err(CatalogError::from)
            .and_then(|updated| updated.ok_or_else(|| CatalogError::not_found(TABLE_NAME, id)))
            .tap_err(|e| warn!("Error in update_disc: {e}"))
    }

    /// Delete a disc and every track on it.
    #[instrument(skip(self))]
    async fn delete(&self, id: DiscId) -> Result<Disc, CatalogError> {
        info!("Deleting disc {id}");
        Disc::delete(&self.db, id.clone())
            .await
            .map_err(CatalogError::from)
            .and_then(|deleted| deleted.ok_or_else(|| CatalogError::not_found(TABLE_NAME, id)))
            .tap_err(|e| warn!("Error in delete_disc: {e}"))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Disc>, CatalogError> {
        info!("Listing discs");
        Ok(Disc::read_all(&self.db)
            .await
            .tap_err(|e| warn!("Error in list_discs: {e}"))?)
    }
}
