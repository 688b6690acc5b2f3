//! The catalog service layer.
//!
//! A [`Catalog`] is built once, around a connection to the database, and hands out one service
//! per entity: [`DiscService`], [`TrackService`], and a [`CompositionService`] per kind of
//! composition. Every mutation of a track ends by recomputing the total duration of the disc(s)
//! it touched, see [`aggregator`].
use std::sync::Arc;

use discotheque_storage::db::schemas::{
    composition::{Classical, Pop, Rock, Variant},
    disc::{Disc, DiscId, TABLE_NAME as DISC_TABLE},
};
use log::{info, warn};
use surrealdb::{Connection, Surreal};
use tap::TapFallible;
use tracing::instrument;

use crate::errors::CatalogError;

pub mod aggregator;
pub mod composition;
pub mod disc;
pub mod health;
pub mod track;

pub use composition::{
    ClassicalCompositionService, CompositionService, PopCompositionService, RockCompositionService,
};
pub use disc::DiscService;
pub use health::CatalogHealth;
pub use track::TrackService;

/// The uniform create/read/update/delete/list contract every service of the catalog follows.
#[allow(async_fn_in_trait)]
pub trait CrudService {
    /// What a record is looked up by.
    type Id;
    /// What `read` and `list` return.
    type Record;
    /// What the operator provides to create a record.
    type Create;
    /// What the operator provides to replace the mutable fields of a record.
    type Update;
    /// What mutations return.
    type Mutated;

    /// Create a new record.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::InvalidReference`] if the record would belong to a disc that does not exist.
    async fn create(&self, input: Self::Create) -> Result<Self::Mutated, CatalogError>;

    /// Read a record.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if there is no such record.
    async fn read(&self, id: Self::Id) -> Result<Self::Record, CatalogError>;

    /// Replace every mutable field of an existing record.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if there is no such record,
    /// or [`CatalogError::InvalidReference`] if it would be moved to a disc that does not exist.
    async fn update(&self, id: Self::Id, input: Self::Update)
    -> Result<Self::Mutated, CatalogError>;

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Fails with [`CatalogError::NotFound`] if there is no such record.
    async fn delete(&self, id: Self::Id) -> Result<Self::Mutated, CatalogError>;

    /// Every record of this type, in storage order.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be read.
    async fn list(&self) -> Result<Vec<Self::Record>, CatalogError>;
}

/// A record together with the disc it belongs to, as that disc is after the mutation
/// (and the recompute of its total duration) completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved<T> {
    pub record: T,
    pub disc: Disc,
}

/// The explicit context object every front end drives the catalog through.
pub struct Catalog<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for Catalog<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> Catalog<C> {
    #[must_use]
    pub const fn new(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    /// The underlying database connection.
    #[must_use]
    pub fn db(&self) -> &Surreal<C> {
        &self.db
    }

    #[must_use]
    pub fn discs(&self) -> DiscService<C> {
        DiscService::new(self.db.clone())
    }

    #[must_use]
    pub fn tracks(&self) -> TrackService<C> {
        TrackService::new(self.db.clone())
    }

    /// The service for compositions of kind `V`.
    #[must_use]
    pub fn compositions<V: Variant>(&self) -> CompositionService<C, V> {
        CompositionService::new(self.db.clone())
    }

    #[must_use]
    pub fn rock(&self) -> RockCompositionService<C> {
        self.compositions::<Rock>()
    }

    #[must_use]
    pub fn pop(&self) -> PopCompositionService<C> {
        self.compositions::<Pop>()
    }

    #[must_use]
    pub fn classical(&self) -> ClassicalCompositionService<C> {
        self.compositions::<Classical>()
    }

    /// Counts of what is in the catalog, and whatever is inconsistent about it.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be read.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<CatalogHealth, CatalogError> {
        info!("Creating catalog health");
        health::health(self.db())
            .await
            .tap_err(|e| warn!("Error in health: {e}"))
    }

    /// Recompute the total duration of every disc.
    ///
    /// Restores the cached totals after a recompute that failed part way through a mutation.
    ///
    /// # Errors
    ///
    /// Fails on the first disc that cannot be recomputed.
    #[instrument(skip(self))]
    pub async fn recompute_all(&self) -> Result<Vec<Disc>, CatalogError> {
        info!("Recomputing the total duration of every disc");
        let discs = Disc::read_all(self.db()).await?;

        let mut repaired = Vec::with_capacity(discs.len());
        for disc in discs {
            repaired.push(
                aggregator::recompute_disc_duration(self.db(), disc.id)
                    .await
                    .tap_err(|e| warn!("Error in recompute_all: {e}"))?,
            );
        }
        Ok(repaired)
    }
}

/// Read a disc, or fail with `NotFound`.
pub(crate) async fn find_disc<C: Connection>(
    db: &Surreal<C>,
    id: DiscId,
) -> Result<Disc, CatalogError> {
    Disc::read(db, id.clone())
        .await?
        .ok_or_else(|| CatalogError::not_found(DISC_TABLE, id))
}

/// Read the disc a track is being added (or moved) to, or fail with `InvalidReference`.
pub(crate) async fn owning_disc<C: Connection>(
    db: &Surreal<C>,
    id: DiscId,
) -> Result<Disc, CatalogError> {
    Disc::read(db, id.clone())
        .await?
        .ok_or(CatalogError::InvalidReference(id))
}
