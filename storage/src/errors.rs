use std::path::PathBuf;

use surrealdb::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SurrealDB error: {0}")]
    DbError(#[from] surrealdb::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Item could not be created.")]
    NotCreated,
    #[error("Record {0} is malformed, its kind does not match its fields.")]
    MalformedRecord(RecordId),
    #[error("The total duration of the tracks on disc {0} is too long to be represented.")]
    DurationOverflow(RecordId),
    #[error("The database path has already been set, refusing to change it to {0}.")]
    DbPathSet(PathBuf),
}

/// Errors that can occur when parsing a record id supplied by the operator.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdParseError {
    #[error("\"{0}\" is not a valid id, expected a 26 character ULID")]
    Malformed(String),
    #[error("\"{found}\" refers to the {found_table} table, expected an id from the {expected} table")]
    WrongTable {
        found: String,
        found_table: String,
        expected: &'static str,
    },
}
