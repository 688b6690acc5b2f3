#![allow(clippy::module_name_repetitions)]
use surrealdb::{Connection, RecordId, Surreal};
use surrealqlx::register_tables;
use tracing::instrument;

use crate::errors::{Error, IdParseError};

pub mod composition;
pub mod disc;
pub mod track;

/// Define the (schemafull) tables of the catalog, from the [`surrealqlx::Table`] derives
/// on [`disc::Disc`] and [`track::TrackRecord`].
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
#[instrument(skip(db))]
pub async fn define_tables<C: Connection>(db: &Surreal<C>) -> Result<(), Error> {
    register_tables!(db, disc::Disc, track::TrackRecord)?;
    Ok(())
}

/// Generate a fresh id for a record in `table`.
///
/// Ids are ULIDs, so records of a table sort in creation order.
#[must_use]
#[inline]
pub fn generate_id(table: &str) -> RecordId {
    RecordId::from_table_key(table, ulid::Ulid::new().to_string())
}

/// Parse a record id supplied by the operator.
///
/// Accepts a bare ULID, or the ULID prefixed with the table name (`disc:<ULID>`), optionally
/// wrapped in the `⟨⟩` brackets surrealdb uses when displaying ids.
/// Anything else, including ids of other tables, is rejected.
///
/// # Errors
///
/// Returns an [`IdParseError`] if `input` is not an id of `table`.
pub fn parse_record_id(table: &'static str, input: &str) -> Result<RecordId, IdParseError> {
    let trimmed = input.trim();

    let key = match trimmed.split_once(':') {
        Some((found_table, _)) if found_table != table => {
            return Err(IdParseError::WrongTable {
                found: trimmed.to_owned(),
                found_table: found_table.to_owned(),
                expected: table,
            });
        }
        Some((_, key)) => key,
        None => trimmed,
    };
    let key = key.trim_start_matches('⟨').trim_end_matches('⟩');

    ulid::Ulid::from_string(key)
        .map(|ulid| RecordId::from_table_key(table, ulid.to_string()))
        .map_err(|_| IdParseError::Malformed(trimmed.to_owned()))
}

/// Serialize a `std::time::Duration` as a `surrealdb::sql::Duration`.
///
/// # Errors
///
/// This function will return an error if the `std::time::Duration` cannot be serialized as a `surrealdb::sql::Duration`.
#[inline]
pub fn serialize_duration_as_sql_duration<S>(
    x: &std::time::Duration,
    s: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::Serialize;

    Into::<surrealdb::sql::Duration>::into(*x).serialize(s)
}

/// Serialize an `Option<std::time::Duration>` as an `Option<surrealdb::sql::Duration>`.
///
/// # Errors
///
/// This function will return an error if the `Option<std::time::Duration>` cannot be serialized as an `Option<surrealdb::sql::Duration>`.
#[inline]
pub fn serialize_duration_option_as_sql_duration<S>(
    x: &Option<std::time::Duration>,
    s: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::Serialize;

    x.map(Into::<surrealdb::sql::Duration>::into).serialize(s)
}

/// Deserialize a `std::time::Duration` from a `surrealdb::sql::Duration`.
///
/// # Errors
///
/// This function will return an error if the `std::time::Duration` cannot be deserialized from a `surrealdb::sql::Duration`.
#[inline]
pub fn deserialize_duration_from_sql_duration<'de, D>(d: D) -> Result<std::time::Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let duration = surrealdb::sql::Duration::deserialize(d)?;
    Ok(duration.into())
}

#[cfg(test)]
mod tables {
    use super::*;
    use crate::test_utils::init_test_database;

    use anyhow::Result;

    #[tokio::test]
    async fn test_define_tables_twice() -> Result<()> {
        let db = init_test_database().await?;
        define_tables(&db).await?;
        define_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_tables_are_schemafull() -> Result<()> {
        let db = init_test_database().await?;

        let wrong_type = db
            .query("CREATE disc SET name = 'Abbey Road', track_number = 'seventeen', total_duration = 0s")
            .await?
            .check();
        assert!(wrong_type.is_err());

        let dangling = db
            .query("CREATE track SET title = 'Stray', author = 'Nobody', duration = 1s, disc = 'not a record', kind = 'rock', style = 'Rock'")
            .await?
            .check();
        assert!(dangling.is_err());
        Ok(())
    }
}

#[cfg(test)]
mod record_id {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const ULID: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";

    #[rstest]
    #[case::bare(ULID)]
    #[case::padded("  01ARZ3NDEKTSV4RRFFQ69G5FAV \n")]
    #[case::lowercase("01arz3ndektsv4rrffq69g5fav")]
    #[case::with_table("disc:01ARZ3NDEKTSV4RRFFQ69G5FAV")]
    #[case::with_brackets("disc:⟨01ARZ3NDEKTSV4RRFFQ69G5FAV⟩")]
    fn test_parse_valid(#[case] input: &str) {
        let id = parse_record_id("disc", input).unwrap();
        assert_eq!(id, RecordId::from_table_key("disc", ULID));
    }

    #[rstest]
    #[case::too_short("01ARZ3NDEK")]
    #[case::too_long("01ARZ3NDEKTSV4RRFFQ69G5FAVX")]
    #[case::not_an_id("hello world!")]
    #[case::empty("")]
    #[case::empty_key("disc:")]
    fn test_parse_malformed(#[case] input: &str) {
        assert!(matches!(
            parse_record_id("disc", input),
            Err(IdParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_wrong_table() {
        assert_eq!(
            parse_record_id("disc", &format!("track:{ULID}")),
            Err(IdParseError::WrongTable {
                found: format!("track:{ULID}"),
                found_table: "track".to_owned(),
                expected: "disc",
            })
        );
    }

    #[test]
    fn test_generated_ids_round_trip() {
        let id = generate_id("track");
        assert_eq!(id.table(), "track");
        assert_eq!(parse_record_id("track", &id.to_string()).unwrap(), id);
    }
}
