use surrealdb::opt::IntoQuery;

use crate::db::{queries::parse_query, schemas};

/// Query to read every track of a given composition kind.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT * FROM track WHERE kind = $kind
/// ```
#[must_use]
pub fn read_by_kind() -> impl IntoQuery {
    parse_query(format!(
        "SELECT * FROM {} WHERE kind = $kind",
        schemas::track::TABLE_NAME
    ))
}

#[cfg(test)]
mod query_validation_tests {
    use super::*;
    use crate::db::queries::validate_query;

    #[test]
    fn test_read_by_kind() {
        validate_query(read_by_kind(), "SELECT * FROM track WHERE kind = $kind");
    }
}
