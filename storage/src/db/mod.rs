pub mod crud;
pub mod health;
pub mod queries;
pub mod schemas;

use std::path::PathBuf;

use log::{info, warn};
use once_cell::sync::OnceCell;
use surrealdb::{
    Surreal,
    engine::local::{Db, Mem, SurrealKv},
};

use crate::errors::Error;

static DB_DIR: OnceCell<PathBuf> = OnceCell::new();

/// The namespace every catalog lives in.
pub const NAMESPACE: &str = "discotheque";
/// The database (within [`NAMESPACE`]) holding the disc and track tables.
pub const DATABASE: &str = "catalog";

/// Set the directory the on-disk database is stored in.
///
/// Can only be called once, before [`init_database`].
///
/// # Errors
///
/// Returns [`Error::DbPathSet`] if the path was already set.
pub fn set_database_path(path: PathBuf) -> Result<(), Error> {
    DB_DIR.set(path).map_err(Error::DbPathSet)?;
    info!(
        "Primed database path to {}",
        DB_DIR.get().map_or_else(String::new, |p| p.display().to_string())
    );
    Ok(())
}

/// Connect to the catalog database and make sure its tables are defined.
///
/// Uses the directory given to [`set_database_path`], or an in-memory store if none was set.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the table definitions fail.
pub async fn init_database() -> Result<Surreal<Db>, Error> {
    let db = if let Some(path) = DB_DIR.get() {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        Surreal::new::<SurrealKv>(path.clone()).await?
    } else {
        warn!("No database path set, the catalog will only live in memory");
        Surreal::new::<Mem>(()).await?
    };

    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    schemas::define_tables(&db).await?;

    info!("Connected to catalog database");
    Ok(db)
}
