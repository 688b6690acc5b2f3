//! The composition services.
//!
//! There is one service per kind of composition, all of them are the same generic
//! [`CompositionService`]. A service only ever sees compositions of its own kind: reading,
//! updating, or deleting a track of another kind through it fails with `NotFound`.
use std::{marker::PhantomData, sync::Arc};

use discotheque_storage::{
    db::schemas::{
        composition::{Classical, Composition, NewComposition, Pop, Rock, Variant},
        track::{TABLE_NAME, Track, TrackId},
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

pub struct CompositionService<C: Connection, V: Variant> {
    db: Arc<Surreal<C>>,
    variant: PhantomData<V>,
}

pub type RockCompositionService<C> = CompositionService<C, Rock>;
pub type PopCompositionService<C> = CompositionService<C, Pop>;
pub type ClassicalCompositionService<C> = CompositionService<C, Classical>;

impl<C: Connection, V: Variant> CompositionService<C, V> {
    pub(crate) const fn new(db: Arc<Surreal<C>>) -> Self {
        Self {
            db,
            variant: PhantomData,
        }
    }

    async fn find(&self, id: TrackId) -> Result<Composition<V>, CatalogError> {
        Composition::<V>::read(&self.db, id.clone())
            .await?
            .ok_or_else(|| CatalogError::not_found(TABLE_NAME, id))
    }

    async fn create_inner(
        &self,
        input: NewComposition<V>,
    ) -> Result<Resolved<Composition<V>>, CatalogError> {
        owning_disc(&self.db, input.track.disc.clone()).await?;

        let created = Composition::<V>::create(&self.db, input.into_composition())
            .await?
            .ok_or(Error::NotCreated)?;

        let disc = recompute_disc_duration(&self.db, created.track.disc.clone()).await?;
        Ok(Resolved {
            record: created,
            disc,
        })
    }

    async fn update_inner(
        &self,
        id: TrackId,
        input: NewComposition<V>,
    ) -> Result<Resolved<Composition<V>>, CatalogError> {
        let before = self.find(id.clone()).await?;
        owning_disc(&self.db, input.track.disc.clone()).await?;

        let replacement = Composition {
            track: Track {
                id: id.clone(),
                title: input.track.title,
                author: input.track.author,
                duration: input.track.duration,
                disc: input.track.disc,
            },
            variant: input.variant,
        };
        let updated = Composition::<V>::update(&self.db, replacement)
            .await?
            .ok_or_else(|| CatalogError::not_found(TABLE_NAME, id))?;

        let disc = recompute_moved(&self.db, before.track.disc, updated.track.disc.clone()).await?;
        Ok(Resolved {
            record: updated,
            disc,
        })
    }

    async fn delete_inner(&self, id: TrackId) -> Result<Resolved<Composition<V>>, CatalogError> {
        let deleted = Composition::<V>::delete(&self.db, id.clone())
            .await?
            .ok_or_else(|| CatalogError::not_found(TABLE_NAME, id))?;

        let disc = recompute_disc_duration(&self.db, deleted.track.disc.clone()).await?;
        Ok(Resolved {
            record: deleted,
            disc,
        })
    }
}

impl<C: Connection, V: Variant> CrudService for CompositionService<C, V> {
    type Id = TrackId;
    type Record = Composition<V>;
    type Create = NewComposition<V>;
    type Update = NewComposition<V>;
    type Mutated = Resolved<Composition<V>>;

    #[instrument(skip(self))]
    async fn create(
        &self,
        input: NewComposition<V>,
    ) -> Result<Resolved<Composition<V>>, CatalogError> {
        info!("Adding {} composition {}", V::KIND, input.track.title);
        self.create_inner(input)
            .await
            .tap_err(|e| warn!("Error in create_{}_composition: {e}", V::KIND))
    }

    #[instrument(skip(self))]
    async fn read(&self, id: TrackId) -> Result<Composition<V>, CatalogError> {
        info!("Reading {} composition {id}", V::KIND);
        self.find(id)
            .await
            .tap_err(|e| warn!("Error in read_{}_composition: {e}", V::KIND))
    }

    /// Replace every field of a composition, possibly moving it to another disc.
    #[instrument(skip(self))]
    async fn update(
        &self,
        id: TrackId,
        input: NewComposition<V>,
    ) -> Result<Resolved<Composition<V>>, CatalogError> {
        info!("Updating {} composition {id}", V::KIND);
        self.update_inner(id, input)
            .await
            .tap_err(|e| warn!("Error in update_{}_composition: {e}", V::KIND))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TrackId) -> Result<Resolved<Composition<V>>, CatalogError> {
        info!("Deleting {} composition {id}", V::KIND);
        self.delete_inner(id)
            .await
            .tap_err(|e| warn!("Error in delete_{}_composition: {e}", V::KIND))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Composition<V>>, CatalogError> {
        info!("Listing {} compositions", V::KIND);
        Ok(Composition::<V>::read_all(&self.db)
            .await
            .tap_err(|e| warn!("Error in list_{}_compositions: {e}", V::KIND))?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        catalog::Catalog,
        test_utils::{init_test_catalog, new_classical, new_pop, new_rock, new_track},
    };
    use discotheque_storage::db::schemas::disc::{Disc, NewDisc};
    use surrealdb::engine::local::Db;

    use anyhow::Result;
    use pretty_assertions::assert_eq;

    async fn disc(catalog: &Catalog<Db>, name: &str) -> Result<Disc> {
        Ok(catalog
            .discs()
            .create(NewDisc {
                name: name.into(),
                track_number: 2,
            })
            .await?)
    }

    #[tokio::test]
    async fn test_abbey_road() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;
        assert_eq!(abbey_road.total_duration, Duration::ZERO);

        catalog
            .rock()
            .create(new_rock(&abbey_road.id, "Come Together", 259))
            .await?;
        let something = catalog
            .rock()
            .create(new_rock(&abbey_road.id, "Something", 183))
            .await?;
        assert_eq!(
            catalog.discs().total_duration(abbey_road.id.clone()).await?,
            Duration::from_secs(442)
        );

        catalog.rock().delete(something.record.track.id).await?;
        assert_eq!(
            catalog.discs().total_duration(abbey_road.id).await?,
            Duration::from_secs(259)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_then_read_round_trips() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;

        let input = new_classical(&abbey_road.id, "Moonlight Sonata", 900);
        let created = catalog.classical().create(input.clone()).await?;
        assert_eq!(created.disc.id, abbey_road.id);
        assert_eq!(created.disc.total_duration, Duration::from_secs(900));

        let read = catalog.classical().read(created.record.track.id.clone()).await?;
        assert_eq!(read, created.record);
        assert_eq!(read.variant, input.variant);
        assert_eq!(read.track.title, input.track.title);
        assert_eq!(read.track.author, input.track.author);
        assert_eq!(read.track.duration, input.track.duration);
        assert_eq!(read.track.disc, input.track.disc);

        // the track service sees the same record, minus the epoch
        assert_eq!(catalog.tracks().read(read.track.id.clone()).await?, read.track);
        Ok(())
    }

    #[tokio::test]
    async fn test_overflowing_total_is_reported() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let endless = disc(&catalog, "Endless").await?;

        let forever = catalog
            .rock()
            .create(new_rock(&endless.id, "Forever", u64::MAX))
            .await?;
        assert_eq!(forever.disc.total_duration, Duration::from_secs(u64::MAX));

        let result = catalog
            .rock()
            .create(new_rock(&endless.id, "And a bit", 1))
            .await;
        assert!(result.is_err_and(|e| e.is_duration_overflow()));

        // the track was stored, the total was not
        assert_eq!(catalog.rock().list().await?.len(), 2);
        assert_eq!(
            catalog.discs().total_duration(endless.id.clone()).await?,
            Duration::from_secs(u64::MAX)
        );
        let health = catalog.health().await?;
        assert_eq!(health.stale_discs.len(), 1);

        // removing the long track lets the total be computed again
        let removed = catalog.rock().delete(forever.record.track.id).await?;
        assert_eq!(removed.disc.total_duration, Duration::from_secs(1));
        assert!(catalog.health().await?.stale_discs.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_on_missing_disc() -> Result<()> {
        let catalog = init_test_catalog().await?;

        let result = catalog
            .pop()
            .create(new_pop(&Disc::generate_id(), "Nowhere", 1))
            .await;
        assert!(result.is_err_and(|e| e.is_invalid_reference()));
        assert!(catalog.pop().list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let result = catalog.rock().read(Track::generate_id()).await;
        assert!(result.is_err_and(|e| e.is_not_found()));
        Ok(())
    }

    #[tokio::test]
    async fn test_other_kinds_are_not_found() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;
        let pop = catalog
            .pop()
            .create(new_pop(&abbey_road.id, "Something", 183))
            .await?
            .record;
        let id = pop.track.id.clone();

        assert!(
            catalog
                .rock()
                .read(id.clone())
                .await
                .is_err_and(|e| e.is_not_found())
        );
        assert!(
            catalog
                .classical()
                .update(id.clone(), new_classical(&abbey_road.id, "Something", 1))
                .await
                .is_err_and(|e| e.is_not_found())
        );
        assert!(
            catalog
                .rock()
                .delete(id.clone())
                .await
                .is_err_and(|e| e.is_not_found())
        );

        // still there, untouched
        assert_eq!(catalog.pop().read(id).await?, pop);
        assert_eq!(
            catalog.discs().total_duration(abbey_road.id).await?,
            Duration::from_secs(183)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_every_field() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let from = disc(&catalog, "From").await?;
        let to = disc(&catalog, "To").await?;
        let created = catalog
            .pop()
            .create(new_pop(&from.id, "Yesterday", 125))
            .await?;
        let id = created.record.track.id.clone();

        let input = NewComposition {
            track: new_track(&to.id, "Yesterday (Take 2)", 130),
            variant: Pop {
                genre: "Baroque Pop".into(),
                popularity: 97,
            },
        };
        let updated = catalog.pop().update(id.clone(), input.clone()).await?;

        assert_eq!(updated.record.track.id, id);
        assert_eq!(updated.record.track.title, input.track.title);
        assert_eq!(updated.record.track.disc, to.id);
        assert_eq!(updated.record.variant, input.variant);
        assert_eq!(updated.disc.id, to.id);
        assert_eq!(updated.disc.total_duration, Duration::from_secs(130));
        assert_eq!(
            catalog.discs().total_duration(from.id).await?,
            Duration::ZERO
        );
        assert_eq!(catalog.pop().read(id).await?, updated.record);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;

        let result = catalog
            .rock()
            .update(
                Track::generate_id(),
                new_rock(&abbey_road.id, "Ghost", 1),
            )
            .await;
        assert!(result.is_err_and(|e| e.is_not_found()));
        assert!(catalog.rock().list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_onto_missing_disc() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;
        let created = catalog
            .rock()
            .create(new_rock(&abbey_road.id, "Come Together", 259))
            .await?;

        let result = catalog
            .rock()
            .update(
                created.record.track.id.clone(),
                new_rock(&Disc::generate_id(), "Come Together", 259),
            )
            .await;
        assert!(result.is_err_and(|e| e.is_invalid_reference()));
        assert_eq!(
            catalog.rock().read(created.record.track.id.clone()).await?,
            created.record
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;
        let created = catalog
            .classical()
            .create(new_classical(&abbey_road.id, "Requiem", 3000))
            .await?;

        let deleted = catalog
            .classical()
            .delete(created.record.track.id.clone())
            .await?;
        assert_eq!(deleted.record, created.record);
        assert_eq!(deleted.disc.total_duration, Duration::ZERO);

        let again = catalog.classical().delete(created.record.track.id).await;
        assert!(again.is_err_and(|e| e.is_not_found()));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_only_lists_own_kind() -> Result<()> {
        let catalog = init_test_catalog().await?;
        let abbey_road = disc(&catalog, "Abbey Road").await?;

        let rock = catalog
            .rock()
            .create(new_rock(&abbey_road.id, "Come Together", 259))
            .await?;
        let pop = catalog
            .pop()
            .create(new_pop(&abbey_road.id, "Something", 183))
            .await?;

        assert_eq!(catalog.rock().list().await?, vec![rock.record]);
        assert_eq!(catalog.pop().list().await?, vec![pop.record]);
        assert!(catalog.classical().list().await?.is_empty());
        assert_eq!(catalog.tracks().list().await?.len(), 2);
        Ok(())
    }
}
