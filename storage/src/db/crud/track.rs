//! CRUD operations for the track table
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::{
        queries::track::read_by_kind,
        schemas::{
            composition::CompositionKind,
            track::{TABLE_NAME, Track, TrackChangeSet, TrackId, TrackRecord},
        },
    },
    errors::Error,
};

impl Track {
    #[instrument()]
    pub async fn read_all<C: Connection>(db: &Surreal<C>) -> Result<Vec<Self>, Error> {
        Ok(db.select(TABLE_NAME).await?)
    }

    #[instrument()]
    pub async fn read<C: Connection>(db: &Surreal<C>, id: TrackId) -> Result<Option<Self>, Error> {
        Ok(db.select(id).await?)
    }

    /// Update the base fields of a track.
    ///
    /// Does nothing (and returns `None`) if the track does not exist.
    /// The total duration of the affected discs is not recomputed, see [`crate::db::schemas::disc::Disc::repair`].
    #[instrument()]
    pub async fn update<C: Connection>(
        db: &Surreal<C>,
        id: TrackId,
        changes: TrackChangeSet,
    ) -> Result<Option<Self>, Error> {
        Ok(db.update(id).merge(changes).await?)
    }

    #[instrument()]
    pub async fn delete<C: Connection>(
        db: &Surreal<C>,
        id: TrackId,
    ) -> Result<Option<Self>, Error> {
        Ok(db.delete(id).await?)
    }
}

impl TrackRecord {
    #[instrument()]
    pub async fn create<C: Connection>(db: &Surreal<C>, record: Self) -> Result<Option<Self>, Error> {
        Ok(db.create(record.id.clone()).content(record).await?)
    }

    #[instrument()]
    pub async fn read<C: Connection>(db: &Surreal<C>, id: TrackId) -> Result<Option<Self>, Error> {
        Ok(db.select(id).await?)
    }

    /// Overwrite an existing row with `record`.
    ///
    /// Fields `record` does not set are removed from the row. Callers must have checked that
    /// the row is of the same kind as `record`, see [`crate::db::schemas::composition::Composition::update`].
    /// Does nothing (and returns `None`) if there is no row with the same id.
    #[instrument()]
    pub(crate) async fn replace<C: Connection>(
        db: &Surreal<C>,
        record: Self,
    ) -> Result<Option<Self>, Error> {
        Ok(db.update(record.id.clone()).content(record).await?)
    }

    #[instrument()]
    pub async fn read_all_of_kind<C: Connection>(
        db: &Surreal<C>,
        kind: CompositionKind,
    ) -> Result<Vec<Self>, Error> {
        Ok(db.query(read_by_kind()).bind(("kind", kind)).await?.take(0)?)
    }
}
