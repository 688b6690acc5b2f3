//! CRUD operations for compositions.
//!
//! Compositions of every kind are rows of the track table, these functions only ever
//! see (and touch) the rows of the kind they are called for.
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::schemas::{
        composition::{AnyComposition, Composition, Variant},
        track::{Track, TrackId, TrackRecord},
    },
    errors::Error,
};

/// `None` if the row is of another kind than `V`.
fn narrow_record<V: Variant>(record: TrackRecord) -> Result<Option<Composition<V>>, Error> {
    if record.kind != V::KIND {
        return Ok(None);
    }
    Ok(AnyComposition::try_from(record)?.narrow().ok())
}

impl<V: Variant> Composition<V> {
    #[instrument()]
    pub async fn create<C: Connection>(db: &Surreal<C>, composition: Self) -> Result<Option<Self>, Error> {
        let record = TrackRecord::from(AnyComposition::from(composition));
        match TrackRecord::create(db, record).await? {
            Some(record) => narrow_record(record),
            None => Ok(None),
        }
    }

    /// Read a composition of kind `V`, `None` if there is no such track or it is of another kind.
    #[instrument()]
    pub async fn read<C: Connection>(db: &Surreal<C>, id: TrackId) -> Result<Option<Self>, Error> {
        match TrackRecord::read(db, id).await? {
            Some(record) => narrow_record(record),
            None => Ok(None),
        }
    }

    #[instrument()]
    pub async fn read_all<C: Connection>(db: &Surreal<C>) -> Result<Vec<Self>, Error> {
        let records = TrackRecord::read_all_of_kind(db, V::KIND).await?;

        let mut compositions = Vec::with_capacity(records.len());
        for record in records {
            if let Some(composition) = narrow_record(record)? {
                compositions.push(composition);
            }
        }
        Ok(compositions)
    }

    /// Replace every field of an existing composition of kind `V` with those of `composition`.
    ///
    /// Returns `None`, without changing anything, if there is no composition of kind `V`
    /// with the id of `composition`.
    #[instrument()]
    pub async fn update<C: Connection>(db: &Surreal<C>, composition: Self) -> Result<Option<Self>, Error> {
        if Self::read(db, composition.track.id.clone()).await?.is_none() {
            return Ok(None);
        }

        let record = TrackRecord::from(AnyComposition::from(composition));
        match TrackRecord::replace(db, record).await? {
            Some(record) => narrow_record(record),
            None => Ok(None),
        }
    }

    /// Delete a composition of kind `V`.
    ///
    /// Tracks of other kinds are left alone, `None` is returned for them.
    #[instrument()]
    pub async fn delete<C: Connection>(db: &Surreal<C>, id: TrackId) -> Result<Option<Self>, Error> {
        let Some(composition) = Self::read(db, id.clone()).await? else {
            return Ok(None);
        };

        Track::delete(db, id).await?;
        Ok(Some(composition))
    }
}

impl AnyComposition {
    #[instrument()]
    pub async fn create<C: Connection>(db: &Surreal<C>, composition: Self) -> Result<Option<Self>, Error> {
        TrackRecord::create(db, composition.into())
            .await?
            .map(Self::try_from)
            .transpose()
    }
}
