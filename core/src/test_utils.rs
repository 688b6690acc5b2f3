//! Utilities for testing code built on the catalog.
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use discotheque_storage::{
    db::schemas::{
        composition::{Classical, NewComposition, Pop, Rock},
        disc::DiscId,
        track::NewTrack,
    },
    test_utils::init_test_database,
};
use surrealdb::engine::local::Db;

use crate::catalog::Catalog;

/// A catalog over a fresh in-memory database.
///
/// # Errors
///
/// Returns an error if the database cannot be created.
pub async fn init_test_catalog() -> Result<Catalog<Db>> {
    Ok(Catalog::new(Arc::new(init_test_database().await?)))
}

/// What the operator would provide to add a rock composition to `disc`.
#[must_use]
pub fn new_rock(disc: &DiscId, title: &str, seconds: u64) -> NewComposition<Rock> {
    NewComposition {
        track: new_track(disc, title, seconds),
        variant: Rock {
            style: "Rock".into(),
        },
    }
}

/// What the operator would provide to add a pop composition to `disc`.
#[must_use]
pub fn new_pop(disc: &DiscId, title: &str, seconds: u64) -> NewComposition<Pop> {
    NewComposition {
        track: new_track(disc, title, seconds),
        variant: Pop {
            genre: "Pop".into(),
            popularity: 50,
        },
    }
}

/// What the operator would provide to add a classical composition to `disc`.
#[must_use]
pub fn new_classical(disc: &DiscId, title: &str, seconds: u64) -> NewComposition<Classical> {
    NewComposition {
        track: new_track(disc, title, seconds),
        variant: Classical {
            epoch: "Romantic".into(),
        },
    }
}

/// The base fields of a track by the Beatles.
#[must_use]
pub fn new_track(disc: &DiscId, title: &str, seconds: u64) -> NewTrack {
    NewTrack {
        title: title.into(),
        author: "The Beatles".into(),
        duration: Duration::from_secs(seconds),
        disc: disc.clone(),
    }
}
