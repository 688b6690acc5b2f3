#![allow(clippy::module_name_repetitions)]
use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealqlx::Table;

use super::{
    composition::{
        AnyComposition, Classical, Composition, CompositionDetails, CompositionKind, Pop, Rock,
    },
    disc::DiscId,
};
use crate::errors::Error;

pub type TrackId = RecordId;

pub const TABLE_NAME: &str = "track";

/// The base fields every track has, whatever kind of composition it is.
///
/// Reading a [`Track`] never exposes the composition specific fields,
/// see [`super::composition::Composition`] for that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// The unique identifier for this [`Track`].
    pub id: TrackId,
    /// Title of the [`Track`].
    pub title: Arc<str>,
    /// Who wrote or performs the [`Track`].
    pub author: Arc<str>,
    /// Runtime of this [`Track`].
    #[serde(
        serialize_with = "super::serialize_duration_as_sql_duration",
        deserialize_with = "super::deserialize_duration_from_sql_duration"
    )]
    pub duration: Duration,
    /// The [`super::disc::Disc`] this [`Track`] is on.
    pub disc: DiscId,
}

impl Track {
    #[must_use]
    #[inline]
    pub fn generate_id() -> TrackId {
        super::generate_id(TABLE_NAME)
    }
}

/// What the operator provides to create the base part of a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTrack {
    pub title: Arc<str>,
    pub author: Arc<str>,
    pub duration: Duration,
    pub disc: DiscId,
}

impl NewTrack {
    /// Build the [`Track`] this describes, with a freshly generated id.
    #[must_use]
    pub fn into_track(self) -> Track {
        Track {
            id: Track::generate_id(),
            title: self.title,
            author: self.author,
            duration: self.duration,
            disc: self.disc,
        }
    }
}

/// Changes to the base fields of a track, the composition specific fields are left untouched.
#[derive(Debug, Default, Serialize)]
pub struct TrackChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Arc<str>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::serialize_duration_option_as_sql_duration"
    )]
    pub duration: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disc: Option<DiscId>,
}

impl From<Track> for TrackChangeSet {
    /// A change set that replaces every mutable field with the ones of `track`.
    fn from(track: Track) -> Self {
        Self {
            title: Some(track.title),
            author: Some(track.author),
            duration: Some(track.duration),
            disc: Some(track.disc),
        }
    }
}

/// A row of the track table, exactly as it is stored.
///
/// Every row is one kind of composition, the `kind` tag says which one and
/// only the fields of that kind are set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Table)]
#[Table("track")]
pub struct TrackRecord {
    #[field(dt = "record")]
    pub id: TrackId,
    #[field(dt = "string")]
    pub title: Arc<str>,
    #[field(dt = "string")]
    pub author: Arc<str>,
    #[field(dt = "duration")]
    #[serde(
        serialize_with = "super::serialize_duration_as_sql_duration",
        deserialize_with = "super::deserialize_duration_from_sql_duration"
    )]
    pub duration: Duration,
    #[field(dt = "record<disc>")]
    #[index()]
    pub disc: DiscId,
    #[field(dt = "string")]
    pub kind: CompositionKind,
    #[field(dt = "option<string>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Arc<str>>,
    #[field(dt = "option<string>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Arc<str>>,
    #[field(dt = "option<int>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<i64>,
    #[field(dt = "option<string>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<Arc<str>>,
}

impl TrackRecord {
    /// The base fields of this row.
    #[must_use]
    pub fn track(&self) -> Track {
        Track {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            duration: self.duration,
            disc: self.disc.clone(),
        }
    }
}

impl From<AnyComposition> for TrackRecord {
    fn from(Composition { track, variant }: AnyComposition) -> Self {
        let mut record = Self {
            id: track.id,
            title: track.title,
            author: track.author,
            duration: track.duration,
            disc: track.disc,
            kind: variant.kind(),
            style: None,
            genre: None,
            popularity: None,
            epoch: None,
        };

        match variant {
            CompositionDetails::Rock(Rock { style }) => record.style = Some(style),
            CompositionDetails::Pop(Pop { genre, popularity }) => {
                record.genre = Some(genre);
                record.popularity = Some(popularity);
            }
            CompositionDetails::Classical(Classical { epoch }) => record.epoch = Some(epoch),
        }

        record
    }
}

impl TryFrom<TrackRecord> for AnyComposition {
    type Error = Error;

    /// Fails with [`Error::MalformedRecord`] if the fields the `kind` tag demands are missing.
    fn try_from(record: TrackRecord) -> Result<Self, Self::Error> {
        let track = record.track();

        let variant = match (
            record.kind,
            record.style,
            record.genre,
            record.popularity,
            record.epoch,
        ) {
            (CompositionKind::Rock, Some(style), _, _, _) => {
                CompositionDetails::Rock(Rock { style })
            }
            (CompositionKind::Pop, _, Some(genre), Some(popularity), _) => {
                CompositionDetails::Pop(Pop { genre, popularity })
            }
            (CompositionKind::Classical, _, _, _, Some(epoch)) => {
                CompositionDetails::Classical(Classical { epoch })
            }
            _ => return Err(Error::MalformedRecord(record.id)),
        };

        Ok(Self { track, variant })
    }
}
