use discotheque_storage::{
    db::schemas::disc::DiscId,
    errors::{Error, IdParseError},
};
use surrealdb::RecordId;
use thiserror::Error;

/// Errors that can occur with finding the config or data directories.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for discotheque.")]
    Config,
    #[error("Unable to find the data directory for discotheque.")]
    Data,
}

/// Errors the catalog services surface to their callers.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A read, update, or delete named a record that does not exist.
    #[error("No {table} with id {id} exists.")]
    NotFound { table: &'static str, id: RecordId },
    /// A track was created (or moved) onto a disc that does not exist.
    #[error("Disc {0} does not exist, tracks can only be added to existing discs.")]
    InvalidReference(DiscId),
    #[error("Database error: {0}")]
    Database(#[from] Error),
}

impl CatalogError {
    #[must_use]
    pub const fn not_found(table: &'static str, id: RecordId) -> Self {
        Self::NotFound { table, id }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference(_))
    }

    /// The tracks on a disc add up to more than a duration can hold.
    ///
    /// The mutation that caused it has been applied, but the total of the disc is left stale
    /// until the offending track is changed or removed.
    #[must_use]
    pub const fn is_duration_overflow(&self) -> bool {
        matches!(self, Self::Database(Error::DurationOverflow(_)))
    }
}

impl From<surrealdb::Error> for CatalogError {
    fn from(e: surrealdb::Error) -> Self {
        Self::Database(Error::from(e))
    }
}

/// Errors turning operator input into the values the catalog services take.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error(transparent)]
    Id(#[from] IdParseError),
    #[error("{0} is not a whole, non-negative number of seconds.")]
    Seconds(String),
    #[error("{0} is not a whole number.")]
    Number(String),
}
