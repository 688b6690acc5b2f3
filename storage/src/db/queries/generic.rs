use surrealdb::opt::IntoQuery;

use crate::{db::queries::parse_query, errors::Error};

/// Struct to assist deserializing the results of the count queries
#[derive(Debug, serde::Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Count {
    count: u64,
}

impl Count {
    #[cfg(test)]
    pub const fn new(count: u64) -> Self {
        Self { count }
    }

    /// Count the number of items in a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if the result cannot be deserialized.
    pub async fn count<C: surrealdb::Connection>(
        db: &surrealdb::Surreal<C>,
        table: &str,
    ) -> Result<u64, Error> {
        let result: Option<Self> = db.query(count(table)).await?.take(0)?;
        Ok(result.map_or_else(
            || {
                // `GROUP ALL` over an empty table yields no rows at all
                log::debug!("When counting entries in table {table}, no count was returned");
                0
            },
            |c| c.count,
        ))
    }

    /// Count the number of items in a table whose `link` points at a record that does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if the result cannot be deserialized.
    pub async fn count_dangling<C: surrealdb::Connection>(
        db: &surrealdb::Surreal<C>,
        table: &str,
        link: &str,
    ) -> Result<u64, Error> {
        let result: Option<Self> = db.query(count_dangling(table, link)).await?.take(0)?;
        Ok(result.map_or_else(
            || {
                log::debug!(
                    "When counting entries of {table} with a dangling {link}, no count was returned"
                );
                0
            },
            |c| c.count,
        ))
    }
}

/// Query to count the number of items in a table.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT count() FROM table GROUP ALL
/// ```
#[must_use]
pub fn count(table: &str) -> impl IntoQuery {
    parse_query(format!("SELECT count() FROM {table} GROUP ALL"))
}

/// Query to count the number of items in a table whose `link` field points at a record that
/// does not exist.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT count() FROM table WHERE link.id IS NONE GROUP ALL
/// ```
#[must_use]
pub fn count_dangling(table: &str, link: &str) -> impl IntoQuery {
    parse_query(format!(
        "SELECT count() FROM {table} WHERE {link}.id IS NONE GROUP ALL"
    ))
}

#[cfg(test)]
mod query_validation_tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::db::queries::validate_query;

    #[rstest]
    #[case::disc(count("disc"), "SELECT count() FROM disc GROUP ALL")]
    #[case::track(count("track"), "SELECT count() FROM track GROUP ALL")]
    #[case::dangling(
        count_dangling("track", "disc"),
        "SELECT count() FROM track WHERE disc.id IS NONE GROUP ALL"
    )]
    fn test_queries(#[case] query: impl IntoQuery, #[case] expected: &str) {
        validate_query(query, expected);
    }

    #[test]
    fn test_deserialize_count() {
        let count: Count = serde_json::from_str(r#"{"count": 3}"#).unwrap();
        assert_eq!(count, Count::new(3));
    }
}
