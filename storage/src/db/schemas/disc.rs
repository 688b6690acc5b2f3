#![allow(clippy::module_name_repetitions)]
use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealqlx::Table;

pub type DiscId = RecordId;

pub const TABLE_NAME: &str = "disc";

/// This struct holds all the metadata about a particular [`Disc`].
/// A [`Disc`] owns the [`super::track::Track`]s recorded on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Table)]
#[Table("disc")]
pub struct Disc {
    /// The unique identifier for this [`Disc`].
    #[field(dt = "record")]
    pub id: DiscId,
    /// Name of the [`Disc`].
    #[field(dt = "string")]
    pub name: Arc<str>,
    /// How many tracks the [`Disc`] is expected to hold.
    /// This is what the operator declared, it is not checked against the actual track count.
    #[field(dt = "int")]
    pub track_number: u32,
    /// Total runtime of the tracks on this [`Disc`].
    ///
    /// Derived, see [`Disc::repair`].
    #[field(dt = "duration")]
    #[serde(
        serialize_with = "super::serialize_duration_as_sql_duration",
        deserialize_with = "super::deserialize_duration_from_sql_duration"
    )]
    pub total_duration: Duration,
}

impl Disc {
    #[must_use]
    #[inline]
    pub fn generate_id() -> DiscId {
        super::generate_id(TABLE_NAME)
    }
}

/// What the operator provides to create a [`Disc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDisc {
    pub name: Arc<str>,
    pub track_number: u32,
}

impl NewDisc {
    /// Build the (still empty) [`Disc`] this describes, with a freshly generated id.
    #[must_use]
    pub fn into_disc(self) -> Disc {
        Disc {
            id: Disc::generate_id(),
            name: self.name,
            track_number: self.track_number,
            total_duration: Duration::ZERO,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct DiscChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_number: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_duration_option_as_sql_duration"
    )]
    pub total_duration: Option<Duration>,
}
