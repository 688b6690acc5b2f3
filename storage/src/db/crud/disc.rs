//! CRUD operations for the disc table
use std::time::Duration;

use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::{
        queries::disc::{delete_cascading, read_tracks, read_tracks_in_length_range},
        schemas::{
            composition::AnyComposition,
            disc::{Disc, DiscChangeSet, DiscId, TABLE_NAME},
            track::{Track, TrackRecord},
        },
    },
    errors::Error,
};

impl Disc {
    #[instrument()]
    pub async fn create<C: Connection>(db: &Surreal<C>, disc: Self) -> Result<Option<Self>, Error> {
        Ok(db.create(disc.id.clone()).content(disc).await?)
    }

    #[instrument()]
    pub async fn read_all<C: Connection>(db: &Surreal<C>) -> Result<Vec<Self>, Error> {
        Ok(db.select(TABLE_NAME).await?)
    }

    #[instrument()]
    pub async fn read<C: Connection>(db: &Surreal<C>, id: DiscId) -> Result<Option<Self>, Error> {
        Ok(db.select(id).await?)
    }

    #[instrument()]
    pub async fn update<C: Connection>(
        db: &Surreal<C>,
        id: DiscId,
        changes: DiscChangeSet,
    ) -> Result<Option<Self>, Error> {
        Ok(db.update(id).merge(changes).await?)
    }

    /// Delete a disc, and every track on it.
    ///
    /// Returns the deleted disc, or `None` if there was no such disc (in which case nothing is deleted).
    #[instrument()]
    pub async fn delete<C: Connection>(
        db: &Surreal<C>,
        id: DiscId,
    ) -> Result<Option<Self>, Error> {
        let Some(disc) = Self::read(db, id.clone()).await? else {
            return Ok(None);
        };

        db.query(delete_cascading())
            .bind(("disc", id))
            .await?
            .check()?;

        Ok(Some(disc))
    }

    /// Read the tracks on a disc (base fields only).
    #[instrument()]
    pub async fn read_tracks<C: Connection>(
        db: &Surreal<C>,
        id: DiscId,
    ) -> Result<Vec<Track>, Error> {
        Ok(db.query(read_tracks()).bind(("disc", id)).await?.take(0)?)
    }

    /// Read the tracks on a disc, together with their composition specific fields.
    #[instrument()]
    pub async fn read_compositions<C: Connection>(
        db: &Surreal<C>,
        id: DiscId,
    ) -> Result<Vec<AnyComposition>, Error> {
        let records: Vec<TrackRecord> = db.query(read_tracks()).bind(("disc", id)).await?.take(0)?;
        records.into_iter().map(AnyComposition::try_from).collect()
    }

    /// Read the tracks on a disc whose duration is at least `min` and at most `max`.
    #[instrument()]
    pub async fn read_tracks_in_length_range<C: Connection>(
        db: &Surreal<C>,
        id: DiscId,
        min: Duration,
        max: Duration,
    ) -> Result<Vec<Track>, Error> {
        Ok(db
            .query(read_tracks_in_length_range())
            .bind(("disc", id))
            .bind(("min", surrealdb::sql::Duration::from(min)))
            .bind(("max", surrealdb::sql::Duration::from(max)))
            .await?
            .take(0)?)
    }

    /// Recompute the total duration of a disc from the tracks currently on it.
    ///
    /// The sum is always taken from scratch, a disc without tracks has a total duration of zero.
    ///
    /// # Returns
    ///
    /// The repaired disc, or `None` if the disc does not exist.
    #[instrument()]
    pub async fn repair<C: Connection>(db: &Surreal<C>, id: DiscId) -> Result<Option<Self>, Error> {
        let tracks = Self::read_tracks(db, id.clone()).await?;
        let total_duration = sum_durations(&id, tracks.iter().map(|t| t.duration))?;

        Self::update(
            db,
            id,
            DiscChangeSet {
                total_duration: Some(total_duration),
                ..Default::default()
            },
        )
        .await
    }
}

/// Sum the durations of the tracks on `disc`.
///
/// # Errors
///
/// Returns [`Error::DurationOverflow`] if the sum does not fit in a [`Duration`].
pub(crate) fn sum_durations(
    disc: &DiscId,
    durations: impl IntoIterator<Item = Duration>,
) -> Result<Duration, Error> {
    durations
        .into_iter()
        .try_fold(Duration::ZERO, Duration::checked_add)
        .ok_or_else(|| Error::DurationOverflow(disc.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::schemas::{
            composition::{Classical, Pop, Rock},
            disc::NewDisc,
            track::TrackChangeSet,
        },
        test_utils::{
            arb_durations, create_arb_composition, create_composition, create_disc,
            init_test_database,
        },
    };

    use anyhow::{Result, anyhow};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn new_disc() -> Disc {
        NewDisc {
            name: "Abbey Road".into(),
            track_number: 2,
        }
        .into_disc()
    }

    #[tokio::test]
    async fn test_create() -> Result<()> {
        let db = init_test_database().await?;
        let disc = new_disc();

        let created = Disc::create(&db, disc.clone()).await?;
        assert_eq!(Some(disc), created);
        Ok(())
    }

    #[tokio::test]
    async fn test_read() -> Result<()> {
        let db = init_test_database().await?;
        let disc = new_disc();

        let created = Disc::create(&db, disc.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to create disc"))?;

        let read = Disc::read(&db, disc.id.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to read disc"))?;
        assert_eq!(disc, read);
        assert_eq!(read, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing() -> Result<()> {
        let db = init_test_database().await?;
        assert_eq!(Disc::read(&db, Disc::generate_id()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_all() -> Result<()> {
        let db = init_test_database().await?;
        let mut expected = vec![
            create_disc(&db, "First", 1).await?,
            create_disc(&db, "Second", 2).await?,
            create_disc(&db, "Third", 3).await?,
        ];
        expected.sort_by_key(|disc| disc.name.clone());

        let mut all = Disc::read_all(&db).await?;
        all.sort_by_key(|disc| disc.name.clone());
        assert_eq!(all, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_update() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Abbey Road", 2).await?;

        let changes = DiscChangeSet {
            name: Some("Let It Be".into()),
            track_number: Some(12),
            ..Default::default()
        };

        let updated = Disc::update(&db, disc.id.clone(), changes).await?;
        let read = Disc::read(&db, disc.id.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to read disc"))?;

        assert_eq!(read.name, "Let It Be".into());
        assert_eq!(read.track_number, 12);
        assert_eq!(read.total_duration, disc.total_duration);
        assert_eq!(Some(read), updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_cascades_to_tracks() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Doomed", 2).await?;
        let survivor = create_disc(&db, "Survivor", 1).await?;

        let doomed_track =
            create_arb_composition(&db, &disc.id, "Doomed Track", Duration::from_secs(10)).await?;
        create_arb_composition(&db, &disc.id, "Doomed Track 2", Duration::from_secs(20)).await?;
        let kept =
            create_arb_composition(&db, &survivor.id, "Kept Track", Duration::from_secs(30)).await?;

        let deleted = Disc::delete(&db, disc.id.clone()).await?;
        assert_eq!(deleted, Some(disc.clone()));

        assert_eq!(Disc::read(&db, disc.id.clone()).await?, None);
        assert!(Disc::read_tracks(&db, disc.id.clone()).await?.is_empty());
        assert_eq!(Track::read(&db, doomed_track.track.id).await?, None);
        assert_eq!(Track::read_all(&db).await?, vec![kept.track]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Survivor", 1).await?;

        assert_eq!(Disc::delete(&db, Disc::generate_id()).await?, None);
        assert_eq!(Disc::read_all(&db).await?, vec![disc]);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_tracks_only_reads_own_tracks() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Mine", 2).await?;
        let other = create_disc(&db, "Other", 1).await?;

        let rock = create_composition(
            &db,
            &disc.id,
            "Come Together",
            Duration::from_secs(259),
            Rock {
                style: "Rock".into(),
            },
        )
        .await?;
        let pop = create_composition(
            &db,
            &disc.id,
            "Something",
            Duration::from_secs(183),
            Pop {
                genre: "Pop".into(),
                popularity: 80,
            },
        )
        .await?;
        create_composition(
            &db,
            &other.id,
            "Elsewhere",
            Duration::from_secs(100),
            Classical {
                epoch: "Baroque".into(),
            },
        )
        .await?;

        let mut tracks = Disc::read_tracks(&db, disc.id.clone()).await?;
        tracks.sort_by_key(|track| track.title.clone());
        assert_eq!(tracks, vec![rock.track.clone(), pop.track.clone()]);

        let mut compositions = Disc::read_compositions(&db, disc.id.clone()).await?;
        compositions.sort_by_key(|composition| composition.track.title.clone());
        assert_eq!(compositions, vec![rock.into(), pop.into()]);
        Ok(())
    }

    #[rstest]
    #[case::everything(0, 1000, vec![10, 60, 120, 300])]
    #[case::inclusive_bounds(60, 120, vec![60, 120])]
    #[case::single_point(120, 120, vec![120])]
    #[case::nothing(500, 1000, vec![])]
    #[case::inverted(300, 10, vec![])]
    #[tokio::test]
    async fn test_read_tracks_in_length_range(
        #[case] min: u64,
        #[case] max: u64,
        #[case] expected: Vec<u64>,
    ) -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Ranged", 4).await?;
        let other = create_disc(&db, "Other", 1).await?;
        for secs in [10, 60, 120, 300] {
            create_arb_composition(
                &db,
                &disc.id,
                &format!("Track {secs}"),
                Duration::from_secs(secs),
            )
            .await?;
        }
        create_arb_composition(&db, &other.id, "Not mine", Duration::from_secs(60)).await?;

        let found = Disc::read_tracks_in_length_range(
            &db,
            disc.id.clone(),
            Duration::from_secs(min),
            Duration::from_secs(max),
        )
        .await?;

        let mut found = found
            .into_iter()
            .inspect(|track| assert_eq!(track.disc, disc.id))
            .map(|track| track.duration.as_secs())
            .collect::<Vec<_>>();
        found.sort_unstable();
        assert_eq!(found, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_repair_sums_track_durations() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Sum", 5).await?;

        let durations = arb_durations(5, 1..=600);
        for (i, duration) in durations.iter().enumerate() {
            create_arb_composition(&db, &disc.id, &format!("Track {i}"), *duration).await?;
        }

        // creating the tracks directly in the store does not touch the cached total
        let stale = Disc::read(&db, disc.id.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to read disc"))?;
        assert_eq!(stale.total_duration, Duration::ZERO);

        let repaired = Disc::repair(&db, disc.id.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to repair disc"))?;
        assert_eq!(repaired.total_duration, durations.iter().sum::<Duration>());
        assert_eq!(repaired.name, disc.name);
        Ok(())
    }

    #[tokio::test]
    async fn test_repair_reports_overflowing_total() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Endless", 2).await?;
        create_arb_composition(&db, &disc.id, "Forever", Duration::from_secs(u64::MAX)).await?;

        let repaired = Disc::repair(&db, disc.id.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to repair disc"))?;
        assert_eq!(repaired.total_duration, Duration::from_secs(u64::MAX));

        let one_more =
            create_arb_composition(&db, &disc.id, "And a bit", Duration::from_secs(1)).await?;
        let result = Disc::repair(&db, disc.id.clone()).await;
        assert!(matches!(result, Err(Error::DurationOverflow(ref id)) if *id == disc.id));

        // the stored total is left alone, and removing the track makes the disc repairable again
        let read = Disc::read(&db, disc.id.clone())
            .await?
            .ok_or_else(|| anyhow!("Failed to read disc"))?;
        assert_eq!(read.total_duration, Duration::from_secs(u64::MAX));

        Track::delete(&db, one_more.track.id).await?;
        let repaired = Disc::repair(&db, disc.id.clone()).await?;
        assert_eq!(
            repaired.map(|d| d.total_duration),
            Some(Duration::from_secs(u64::MAX))
        );
        Ok(())
    }

    #[rstest]
    #[case::empty(vec![], Some(0))]
    #[case::some(vec![259, 183], Some(442))]
    #[case::at_the_limit(vec![u64::MAX - 1, 1], Some(u64::MAX))]
    #[case::past_the_limit(vec![u64::MAX, 1], None)]
    fn test_sum_durations(#[case] seconds: Vec<u64>, #[case] expected: Option<u64>) {
        let disc = Disc::generate_id();
        let sum = sum_durations(&disc, seconds.into_iter().map(Duration::from_secs));

        match expected {
            Some(expected) => assert_eq!(sum.ok(), Some(Duration::from_secs(expected))),
            None => assert!(matches!(sum, Err(Error::DurationOverflow(id)) if id == disc)),
        }
    }

    #[tokio::test]
    async fn test_repair_follows_track_changes() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Changing", 2).await?;
        let first =
            create_arb_composition(&db, &disc.id, "First", Duration::from_secs(259)).await?;
        create_arb_composition(&db, &disc.id, "Second", Duration::from_secs(183)).await?;

        let repaired = Disc::repair(&db, disc.id.clone()).await?;
        assert_eq!(
            repaired.map(|d| d.total_duration),
            Some(Duration::from_secs(442))
        );

        Track::update(
            &db,
            first.track.id.clone(),
            TrackChangeSet {
                duration: Some(Duration::from_secs(59)),
                ..Default::default()
            },
        )
        .await?;
        let repaired = Disc::repair(&db, disc.id.clone()).await?;
        assert_eq!(
            repaired.map(|d| d.total_duration),
            Some(Duration::from_secs(242))
        );

        Track::delete(&db, first.track.id).await?;
        let repaired = Disc::repair(&db, disc.id.clone()).await?;
        assert_eq!(
            repaired.map(|d| d.total_duration),
            Some(Duration::from_secs(183))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_repair_empty_disc_is_zero() -> Result<()> {
        let db = init_test_database().await?;
        let disc = create_disc(&db, "Empty", 0).await?;
        Disc::update(
            &db,
            disc.id.clone(),
            DiscChangeSet {
                total_duration: Some(Duration::from_secs(999)),
                ..Default::default()
            },
        )
        .await?;

        let repaired = Disc::repair(&db, disc.id.clone()).await?;
        assert_eq!(repaired.map(|d| d.total_duration), Some(Duration::ZERO));
        Ok(())
    }

    #[tokio::test]
    async fn test_repair_missing_disc() -> Result<()> {
        let db = init_test_database().await?;
        assert_eq!(Disc::repair(&db, Disc::generate_id()).await?, None);
        Ok(())
    }
}
