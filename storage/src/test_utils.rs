//! Utilities for setting up database state in tests.
use std::{ops::RangeInclusive, time::Duration};

use anyhow::{Result, anyhow};
use rand::{Rng, seq::SliceRandom};
use surrealdb::{
    Surreal,
    engine::local::{Db, Mem},
};

use crate::db::schemas::{
    self,
    composition::{
        AnyComposition, Classical, Composition, CompositionDetails, NewComposition, Pop, Rock,
        Variant,
    },
    disc::{Disc, DiscId, NewDisc},
    track::NewTrack,
};

pub const STYLES: [&str; 4] = ["Blues Rock", "Hard Rock", "Progressive", "Punk"];
pub const GENRES: [&str; 4] = ["Dance", "Disco", "K-Pop", "Synthpop"];
pub const EPOCHS: [&str; 4] = ["Baroque", "Classical", "Renaissance", "Romantic"];

/// Create a fresh in-memory database with the catalog tables defined.
///
/// # Errors
///
/// Returns an error if the database cannot be created.
pub async fn init_test_database() -> Result<Surreal<Db>> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns("test").use_db("test").await?;

    schemas::define_tables(&db).await?;

    Ok(db)
}

/// Create an (empty) disc in the database.
///
/// # Errors
///
/// Returns an error if the disc could not be created.
pub async fn create_disc(db: &Surreal<Db>, name: &str, track_number: u32) -> Result<Disc> {
    Disc::create(
        db,
        NewDisc {
            name: name.into(),
            track_number,
        }
        .into_disc(),
    )
    .await?
    .ok_or_else(|| anyhow!("Failed to create disc {name}"))
}

/// Create a composition of kind `V` on `disc`, without touching the disc's total duration.
///
/// # Errors
///
/// Returns an error if the composition could not be created.
pub async fn create_composition<V: Variant>(
    db: &Surreal<Db>,
    disc: &DiscId,
    title: &str,
    duration: Duration,
    variant: V,
) -> Result<Composition<V>> {
    Composition::<V>::create(
        db,
        NewComposition {
            track: NewTrack {
                title: title.into(),
                author: format!("Author of {title}").into(),
                duration,
                disc: disc.clone(),
            },
            variant,
        }
        .into_composition(),
    )
    .await?
    .ok_or_else(|| anyhow!("Failed to create composition {title}"))
}

/// Create a composition of a random kind (with random fields) on `disc`.
///
/// # Errors
///
/// Returns an error if the composition could not be created.
pub async fn create_arb_composition(
    db: &Surreal<Db>,
    disc: &DiscId,
    title: &str,
    duration: Duration,
) -> Result<AnyComposition> {
    let composition = NewComposition {
        track: NewTrack {
            title: title.into(),
            author: format!("Author of {title}").into(),
            duration,
            disc: disc.clone(),
        },
        variant: arb_details(),
    }
    .into_composition();

    AnyComposition::create(db, composition)
        .await?
        .ok_or_else(|| anyhow!("Failed to create composition {title}"))
}

/// Random composition specific fields, of a random kind.
#[must_use]
pub fn arb_details() -> CompositionDetails {
    let rng = &mut rand::thread_rng();
    let pick = |options: &[&'static str], rng: &mut rand::rngs::ThreadRng| {
        options.choose(rng).copied().unwrap_or_default()
    };

    match rng.gen_range(0..3u8) {
        0 => CompositionDetails::Rock(Rock {
            style: pick(&STYLES, rng).into(),
        }),
        1 => CompositionDetails::Pop(Pop {
            genre: pick(&GENRES, rng).into(),
            popularity: rng.gen_range(0..=100),
        }),
        _ => CompositionDetails::Classical(Classical {
            epoch: pick(&EPOCHS, rng).into(),
        }),
    }
}

/// A random duration (in whole seconds) within `range`.
#[must_use]
pub fn arb_duration(range: RangeInclusive<u64>) -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(range))
}

/// `count` random durations within `range`.
#[must_use]
pub fn arb_durations(count: usize, range: RangeInclusive<u64>) -> Vec<Duration> {
    std::iter::repeat_with(|| arb_duration(range.clone()))
        .take(count)
        .collect()
}
