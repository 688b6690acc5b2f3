use surrealdb::opt::IntoQuery;

use crate::db::{queries::parse_query, schemas};

/// Query to read the tracks (full rows) of a disc.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT * FROM track WHERE disc = $disc
/// ```
#[must_use]
pub fn read_tracks() -> impl IntoQuery {
    parse_query(format!(
        "SELECT * FROM {} WHERE disc = $disc",
        schemas::track::TABLE_NAME
    ))
}

/// Query to read the tracks of a disc whose duration lies in `[$min, $max]`.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT * FROM track WHERE disc = $disc AND duration >= $min AND duration <= $max
/// ```
#[must_use]
pub fn read_tracks_in_length_range() -> impl IntoQuery {
    parse_query(format!(
        "SELECT * FROM {} WHERE disc = $disc AND duration >= $min AND duration <= $max",
        schemas::track::TABLE_NAME
    ))
}

/// Query to delete a disc together with all of its tracks.
///
/// Compiles to:
/// ```sql, ignore
/// BEGIN TRANSACTION;
/// DELETE track WHERE disc = $disc;
/// DELETE $disc;
/// COMMIT TRANSACTION;
/// ```
#[must_use]
pub fn delete_cascading() -> impl IntoQuery {
    parse_query(format!(
        "BEGIN TRANSACTION; DELETE {} WHERE disc = $disc; DELETE $disc; COMMIT TRANSACTION;",
        schemas::track::TABLE_NAME
    ))
}

/// Query to read every disc, along with the durations of the tracks on it.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT id, name, track_number, total_duration,
///     (SELECT VALUE duration FROM track WHERE disc = $parent.id) AS track_durations
/// FROM disc
/// ```
#[must_use]
pub fn read_all_with_track_durations() -> impl IntoQuery {
    parse_query(format!(
        "SELECT id, name, track_number, total_duration, \
        (SELECT VALUE duration FROM {track} WHERE disc = $parent.id) AS track_durations \
        FROM {disc}",
        track = schemas::track::TABLE_NAME,
        disc = schemas::disc::TABLE_NAME,
    ))
}
