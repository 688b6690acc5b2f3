pub mod implementations;
pub mod menu;
pub mod printing;
pub mod utils;


use clap::{Args, Subcommand, ValueEnum};
use discotheque_core::catalog::Catalog;
use discotheque_storage::db::schemas::{
    composition::{Classical, CompositionDetails, Pop, Rock},
    disc::DiscId,
    track::{NewTrack, TrackId},
};
use surrealdb::Connection;

use utils::StdIn;

pub trait CommandHandler {
    type Output;

    async fn handle<C: Connection, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        catalog: &Catalog<C>,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &impl StdIn,
    ) -> Self::Output;
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Disc commands
    Disc {
        #[clap(subcommand)]
        command: DiscCommand,
    },
    /// Track commands, for tracks of any kind of composition
    Track {
        #[clap(subcommand)]
        command: TrackCommand,
    },
    /// Composition commands, for tracks of one kind of composition
    Composition {
        #[clap(subcommand)]
        command: CompositionCommand,
    },
    /// Counts of what is in the catalog, and what is inconsistent about it
    Health,
    /// Recompute the total duration of every disc
    Repair,
    /// Run the interactive, numbered menu
    Menu,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DiscCommand {
    /// Create a new, empty, disc
    Create {
        /// The name of the disc
        name: String,
        /// How many tracks the disc is expected to hold
        #[clap(default_value = "0")]
        track_number: u32,
    },
    /// Get a disc by its id
    Get {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
    },
    /// List every disc
    List,
    /// Replace the name and track number of a disc
    Update {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
        /// The new name of the disc
        name: String,
        /// How many tracks the disc is expected to hold
        track_number: u32,
    },
    /// Remove a disc, and every track on it
    #[clap(alias = "rm")]
    Remove {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
    },
    /// List the tracks of a disc
    Tracks {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
    },
    /// Get the total duration of a disc
    Duration {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
    },
    /// List the compositions of a disc, ordered by their style, genre, or epoch
    SortByStyle {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
    },
    /// List the tracks of a disc that last between `min` and `max` seconds (inclusive)
    LengthRange {
        /// The id of the disc
        #[clap(value_parser = utils::parse_disc_id)]
        id: DiscId,
        /// The shortest duration to include, in seconds
        min: u64,
        /// The longest duration to include, in seconds
        max: u64,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum TrackCommand {
    /// List every track, of every kind
    List,
    /// Get a track by its id
    Get {
        /// The id of the track
        #[clap(value_parser = utils::parse_track_id)]
        id: TrackId,
    },
    /// Replace the base fields of a track, the fields of its composition are left alone
    Update {
        /// The id of the track
        #[clap(value_parser = utils::parse_track_id)]
        id: TrackId,
        #[clap(flatten)]
        track: TrackArgs,
    },
    /// Remove a track
    #[clap(alias = "rm")]
    Remove {
        /// The id of the track
        #[clap(value_parser = utils::parse_track_id)]
        id: TrackId,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum CompositionCommand {
    /// Add a composition to a disc
    Add {
        #[clap(flatten)]
        track: TrackArgs,
        /// The kind of composition, and its fields
        #[clap(subcommand)]
        variant: VariantArgs,
    },
    /// Get a composition of the given kind by its id
    Get {
        /// The kind of composition
        kind: KindTarget,
        /// The id of the composition
        #[clap(value_parser = utils::parse_track_id)]
        id: TrackId,
    },
    /// List every composition of the given kind
    List {
        /// The kind of composition
        kind: KindTarget,
    },
    /// Replace every field of a composition, its kind is given by the fields
    Update {
        /// The id of the composition
        #[clap(value_parser = utils::parse_track_id)]
        id: TrackId,
        #[clap(flatten)]
        track: TrackArgs,
        /// The kind of composition, and its fields
        #[clap(subcommand)]
        variant: VariantArgs,
    },
    /// Remove a composition of the given kind
    #[clap(alias = "rm")]
    Remove {
        /// The kind of composition
        kind: KindTarget,
        /// The id of the composition
        #[clap(value_parser = utils::parse_track_id)]
        id: TrackId,
    },
}

/// The fields every track has.
#[derive(Debug, Args, PartialEq)]
pub struct TrackArgs {
    /// The title of the track
    #[clap(long)]
    pub title: String,
    /// Who wrote or performed the track
    #[clap(long)]
    pub author: String,
    /// How long the track is, in seconds
    #[clap(long, value_name = "SECONDS")]
    pub duration: u64,
    /// The id of the disc the track is on
    #[clap(long, value_parser = utils::parse_disc_id)]
    pub disc: DiscId,
}

impl From<&TrackArgs> for NewTrack {
    fn from(args: &TrackArgs) -> Self {
        Self {
            title: args.title.as_str().into(),
            author: args.author.as_str().into(),
            duration: std::time::Duration::from_secs(args.duration),
            disc: args.disc.clone(),
        }
    }
}

/// The fields of each kind of composition.
#[derive(Debug, Subcommand, PartialEq)]
pub enum VariantArgs {
    /// A rock composition
    Rock {
        /// The style of rock
        #[clap(long)]
        style: String,
    },
    /// A pop composition
    Pop {
        /// The genre of pop
        #[clap(long)]
        genre: String,
        /// How popular the composition is
        #[clap(long, allow_negative_numbers = true)]
        popularity: i64,
    },
    /// A classical composition
    Classical {
        /// The epoch the composition is from
        #[clap(long)]
        epoch: String,
    },
}

impl From<&VariantArgs> for CompositionDetails {
    fn from(args: &VariantArgs) -> Self {
        match args {
            VariantArgs::Rock { style } => Self::Rock(Rock {
                style: style.as_str().into(),
            }),
            VariantArgs::Pop { genre, popularity } => Self::Pop(Pop {
                genre: genre.as_str().into(),
                popularity: *popularity,
            }),
            VariantArgs::Classical { epoch } => Self::Classical(Classical {
                epoch: epoch.as_str().into(),
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum KindTarget {
    Rock,
    Pop,
    Classical,
}
