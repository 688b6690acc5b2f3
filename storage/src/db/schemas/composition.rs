//! The kinds of composition a track can be.
//!
//! Every track is exactly one of [`Rock`], [`Pop`], or [`Classical`]. All of them share the
//! base [`Track`] fields and live in the same table, tagged with their [`CompositionKind`].
#![allow(clippy::module_name_repetitions)]
use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use super::track::{NewTrack, Track};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionKind {
    Rock,
    Pop,
    Classical,
}

impl CompositionKind {
    pub const ALL: [Self; 3] = [Self::Rock, Self::Pop, Self::Classical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Pop => "pop",
            Self::Classical => "classical",
        }
    }
}

impl fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown composition kind: {s}"))
    }
}

/// The fields only rock compositions have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rock {
    pub style: Arc<str>,
}

/// The fields only pop compositions have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pop {
    pub genre: Arc<str>,
    pub popularity: i64,
}

/// The fields only classical compositions have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classical {
    pub epoch: Arc<str>,
}

/// The composition specific fields of a track, whichever kind it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompositionDetails {
    Rock(Rock),
    Pop(Pop),
    Classical(Classical),
}

impl CompositionDetails {
    #[must_use]
    pub const fn kind(&self) -> CompositionKind {
        match self {
            Self::Rock(_) => CompositionKind::Rock,
            Self::Pop(_) => CompositionKind::Pop,
            Self::Classical(_) => CompositionKind::Classical,
        }
    }

    /// The "style-like" field of the composition: the style of rock, the genre of pop,
    /// and the epoch of classical compositions.
    #[must_use]
    pub fn style_key(&self) -> &str {
        match self {
            Self::Rock(Rock { style }) => style,
            Self::Pop(Pop { genre, .. }) => genre,
            Self::Classical(Classical { epoch }) => epoch,
        }
    }
}

/// A single kind of composition.
///
/// Implemented by [`Rock`], [`Pop`], and [`Classical`] so that code can be written once for
/// all of them while still only ever seeing compositions of one kind.
pub trait Variant: Clone + fmt::Debug + PartialEq + Send + Sync + Sized + 'static {
    const KIND: CompositionKind;

    /// `None` if `details` are of another kind.
    fn from_details(details: CompositionDetails) -> Option<Self>;

    fn into_details(self) -> CompositionDetails;
}

impl Variant for Rock {
    const KIND: CompositionKind = CompositionKind::Rock;

    fn from_details(details: CompositionDetails) -> Option<Self> {
        match details {
            CompositionDetails::Rock(rock) => Some(rock),
            _ => None,
        }
    }

    fn into_details(self) -> CompositionDetails {
        CompositionDetails::Rock(self)
    }
}

impl Variant for Pop {
    const KIND: CompositionKind = CompositionKind::Pop;

    fn from_details(details: CompositionDetails) -> Option<Self> {
        match details {
            CompositionDetails::Pop(pop) => Some(pop),
            _ => None,
        }
    }

    fn into_details(self) -> CompositionDetails {
        CompositionDetails::Pop(self)
    }
}

impl Variant for Classical {
    const KIND: CompositionKind = CompositionKind::Classical;

    fn from_details(details: CompositionDetails) -> Option<Self> {
        match details {
            CompositionDetails::Classical(classical) => Some(classical),
            _ => None,
        }
    }

    fn into_details(self) -> CompositionDetails {
        CompositionDetails::Classical(self)
    }
}

/// A track seen through its composition: the base [`Track`] plus the fields of its kind.
///
/// `V` is either one [`Variant`], or [`CompositionDetails`] when the kind is not known up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composition<V> {
    pub track: Track,
    pub variant: V,
}

pub type RockComposition = Composition<Rock>;
pub type PopComposition = Composition<Pop>;
pub type ClassicalComposition = Composition<Classical>;
pub type AnyComposition = Composition<CompositionDetails>;

impl AnyComposition {
    #[must_use]
    pub const fn kind(&self) -> CompositionKind {
        self.variant.kind()
    }

    #[must_use]
    pub fn style_key(&self) -> &str {
        self.variant.style_key()
    }

    /// Narrow this down to a composition of kind `V`.
    ///
    /// # Errors
    ///
    /// Gives `self` back if it is of another kind.
    pub fn narrow<V: Variant>(self) -> Result<Composition<V>, Self> {
        let Self { track, variant } = self;
        match V::from_details(variant.clone()) {
            Some(variant) => Ok(Composition { track, variant }),
            None => Err(Self { track, variant }),
        }
    }
}

impl<V: Variant> From<Composition<V>> for AnyComposition {
    fn from(Composition { track, variant }: Composition<V>) -> Self {
        Self {
            track,
            variant: variant.into_details(),
        }
    }
}

/// What the operator provides to create a composition of kind `V`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewComposition<V> {
    pub track: NewTrack,
    pub variant: V,
}

impl<V> NewComposition<V> {
    /// Build the [`Composition`] this describes, with a freshly generated id.
    #[must_use]
    pub fn into_composition(self) -> Composition<V> {
        Composition {
            track: self.track.into_track(),
            variant: self.variant,
        }
    }
}
