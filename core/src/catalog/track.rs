//! The track service.
//!
//! Tracks are read through their base fields only, whatever kind of composition they are.
use std::sync::Arc;

use discotheque_storage::{
    db::schemas::{
        composition::{AnyComposition, CompositionDetails, NewComposition},
        track::{NewTrack, TABLE_NAME, Track, TrackChangeSet, TrackId},
    },
    errors::Error,
};
use log::{info, warn};
use surrealdb::{Connection, Surreal};
use tap::TapFallible;
use tracing::instrument;

use super::{
    CrudService, Resolved,
    aggregator::{recompute_disc_duration, recompute_moved},
    owning_disc,
};
use crate::errors::CatalogError;

pub struct TrackService<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> TrackService<C> {
    pub(crate) const fn new(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    async fn find(&self, id: TrackId) -> Result<Track, CatalogError> {
        Track::read(&self.db, id.clone())
            .await?
            .ok_or_else(|| CatalogError::not_found(TABLE_NAME, id))
    }

    async fn create_inner(
        &self,
        input: NewComposition<CompositionDetails>,
    ) -> Result<Resolved<Track>, CatalogError> {
        owning_disc(&self.db, input.track.disc.clone()).await?;

        let created = AnyComposition::create(&self.db, input.into_composition())
            .await?
            .ok_or(Error::NotCreated)?;

        let disc = recompute_disc_duration(&self.db, created.track.disc.clone()).await?;
        Ok(Resolved {
            record: created.track,
            disc,
        })
    }

    async fn update_inner(
        &self,
        id: TrackId,
        input: NewTrack,
    ) -> Result<Resolved<Track>, CatalogError> {
        let before = self.find(id.clone()).await?;
        owning_disc(&self.db, input.disc.clone()).await?;

        let changes = TrackChangeSet {
            title: Some(input.title),
            author: Some(input.author),
            duration: Some(input.duration),
            disc: Some(input.disc),
        };
        let updated = Track::update(&self.db, id.clone(), changes)
            .await?
            .ok_or_else(|| CatalogError::not_found(TABLE_NAME, id))?;

        let disc = recompute_moved(&self.db, before.disc, updated.disc.clone()).await?;
        Ok(Resolved {
            record: updated,
            disc,
        })
    }

    async fn delete_inner(&self, id: TrackId) -> Result<Resolved<Track>, CatalogError> {
        // the disc has to be known before the track is gone
        let track = self.find(id.clone()).await?;

        Track::delete(&self.db, id.clone())
            .await?
            .ok_or_else(|| CatalogError::not_found(TABLE_NAME, id))?;

        let disc = recompute_disc_duration(&self.db, track.disc.clone()).await?;
        Ok(Resolved {
            record: track,
            disc,
        })
    }
}

impl<C: Connection> CrudService for TrackService<C> {
    type Id = TrackId;
    type Record = Track;
    /// Every track is exactly one kind of composition, so that has to be given up front.
    type Create = NewComposition<CompositionDetails>;
    /// Only the base fields can be replaced, the kind of a track never changes.
    type Update = NewTrack;
    type Mutated = Resolved<Track>;

    #[instrument(skip(self))]
    async fn create(
        &self,
        input: NewComposition<CompositionDetails>,
    ) -> Result<Resolved<Track>, CatalogError> {
        info!("Adding {} composition {}", input.variant.kind(), input.track.title);
        self.create_inner(input)
            .await
            .tap_err(|e| warn!("Error in create_track: {e}"))
    }

    #[instrument(skip(self))]
    async fn read(&self, id: TrackId) -> Result<Track, CatalogError> {
        info!("Reading track {id}");
        self.find(id)
            .await
            .tap_err(|e| warn!("Error in read_track: {e}"))
    }

    /// Replace the base fields of a track, possibly moving it to another disc.
    ///
    /// Both the disc it was on and the disc it is on now get their total duration recomputed.
    #[instrument(skip(self))]
    async fn update(&self, id: TrackId, input: NewTrack) -> Result<Resolved<Track>, CatalogError> {
        info!("Updating track {id}");
        self.update_inner(id, input)
            .await
            .tap_err(|e| warn!("Error in update_track: {e}"))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TrackId) -> Result<Resolved<Track>, CatalogError> {
        info!("Deleting track {id}");
        self.delete_inner(id)
            .await
            .tap_err(|e| warn!("Error in delete_track: {e}"))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Track>, CatalogError> {
        info!("Listing tracks");
        Ok(Track::read_all(&self.db)
            .await
            .tap_err(|e| warn!("Error in list_tracks: {e}"))?)
    }
}
