//! SurrealQL statements used by the crud operations.
//!
//! Every statement is parsed up front so that syntax errors surface in the tests of this module
//! rather than at runtime.
#[cfg(test)]
use surrealdb::opt::IntoQuery;

pub mod disc;
pub mod generic;
pub mod track;

/// Parse a query (string) into a `surrealdb::sql::Query`
///
/// This is primarily used to validate the syntax of queries before they are executed
///
/// # Panics
///
/// Panics if the query is not valid SurrealQL, which only happens if one of the statements in
/// this module is wrong.
#[must_use]
pub fn parse_query(query: impl AsRef<str>) -> surrealdb::sql::Query {
    surrealdb::syn::parse(query.as_ref()).unwrap()
}

#[cfg(test)]
pub fn validate_query(query: impl IntoQuery, expected: &str) {
    use pretty_assertions::assert_eq;
    // first check if we can use IntoQuery to parse the query
    let compiled_query: surrealdb::sql::Query = query
        .as_str()
        .map(surrealdb::syn::parse)
        .map_or_else(|| query.into_query().unwrap().into(), Result::unwrap);

    let compiled_expected = surrealdb::syn::parse(expected).unwrap();
    assert!(
        !compiled_expected.0.is_empty(),
        "Expected query compiled to an empty list of statements: \"{expected}\""
    );
    assert_eq!(compiled_query, compiled_expected);
}
