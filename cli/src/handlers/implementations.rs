use std::{fmt, time::Duration};

use crate::handlers::{menu, printing};

use super::{
    Command, CommandHandler, CompositionCommand, DiscCommand, KindTarget, TrackCommand,
    VariantArgs, utils::StdIn,
};

use discotheque_core::{
    catalog::{Catalog, CompositionService, CrudService, Resolved},
    errors::CatalogError,
    format_duration,
};
use discotheque_storage::db::schemas::{
    composition::{AnyComposition, Composition, CompositionDetails, NewComposition, Variant},
    disc::NewDisc,
    track::{NewTrack, TrackId},
};
use surrealdb::Connection;

/// Whether the operator can fix the error, by naming another record or changing a track.
pub fn is_recoverable(error: &CatalogError) -> bool {
    error.is_not_found() || error.is_invalid_reference() || error.is_duration_overflow()
}

/// Render the result of a catalog operation to `stdout`, or recoverable errors to `stderr`.
///
/// # Errors
///
/// Any other error is propagated.
fn render<T, W1: fmt::Write, W2: fmt::Write>(
    result: Result<T, CatalogError>,
    stdout: &mut W1,
    stderr: &mut W2,
    render: impl FnOnce(&T) -> Result<String, fmt::Error>,
) -> anyhow::Result<()> {
    match result {
        Ok(value) => writeln!(stdout, "{}", render(&value)?)?,
        Err(e) if is_recoverable(&e) => writeln!(stderr, "{e}")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// See a mutated composition of one kind as a composition of any kind.
pub fn widen<V: Variant>(
    Resolved { record, disc }: Resolved<Composition<V>>,
) -> Resolved<AnyComposition> {
    Resolved {
        record: record.into(),
        disc,
    }
}

pub async fn create_as<C: Connection, V: Variant>(
    service: CompositionService<C, V>,
    input: NewComposition<V>,
) -> Result<Resolved<AnyComposition>, CatalogError> {
    service.create(input).await.map(widen)
}

async fn update_as<C: Connection, V: Variant>(
    service: CompositionService<C, V>,
    id: TrackId,
    input: NewComposition<V>,
) -> Result<Resolved<AnyComposition>, CatalogError> {
    service.update(id, input).await.map(widen)
}

async fn read_as<C: Connection, V: Variant>(
    service: CompositionService<C, V>,
    id: TrackId,
) -> Result<AnyComposition, CatalogError> {
    service.read(id).await.map(AnyComposition::from)
}

async fn list_as<C: Connection, V: Variant>(
    service: CompositionService<C, V>,
) -> Result<Vec<AnyComposition>, CatalogError> {
    service
        .list()
        .await
        .map(|compositions| compositions.into_iter().map(AnyComposition::from).collect())
}

async fn delete_as<C: Connection, V: Variant>(
    service: CompositionService<C, V>,
    id: TrackId,
) -> Result<Resolved<AnyComposition>, CatalogError> {
    service.delete(id).await.map(widen)
}

/// Create or update a composition with the service for the kind `variant` describes.
async fn save<C: Connection>(
    catalog: &Catalog<C>,
    id: Option<TrackId>,
    track: NewTrack,
    variant: &VariantArgs,
) -> Result<Resolved<AnyComposition>, CatalogError> {
    match (CompositionDetails::from(variant), id) {
        (CompositionDetails::Rock(variant), None) => {
            create_as(catalog.rock(), NewComposition { track, variant }).await
        }
        (CompositionDetails::Rock(variant), Some(id)) => {
            update_as(catalog.rock(), id, NewComposition { track, variant }).await
        }
        (CompositionDetails::Pop(variant), None) => {
            create_as(catalog.pop(), NewComposition { track, variant }).await
        }
        (CompositionDetails::Pop(variant), Some(id)) => {
            update_as(catalog.pop(), id, NewComposition { track, variant }).await
        }
        (CompositionDetails::Classical(variant), None) => {
            create_as(catalog.classical(), NewComposition { track, variant }).await
        }
        (CompositionDetails::Classical(variant), Some(id)) => {
            update_as(catalog.classical(), id, NewComposition { track, variant }).await
        }
    }
}

impl CommandHandler for Command {
    type Output = anyhow::Result<()>;

    async fn handle<C: Connection, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        catalog: &Catalog<C>,
        stdout: &mut W1,
        stderr: &mut W2,
        stdin: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::Disc { command } => command.handle(catalog, stdout, stderr, stdin).await,
            Self::Track { command } => command.handle(catalog, stdout, stderr, stdin).await,
            Self::Composition { command } => command.handle(catalog, stdout, stderr, stdin).await,
            Self::Health => {
                let health = catalog.health().await?;
                writeln!(stdout, "{}", printing::health(&health)?)?;
                Ok(())
            }
            Self::Repair => {
                let repaired = catalog.recompute_all().await?;
                writeln!(
                    stdout,
                    "{}",
                    printing::disc_list("Repaired Discs", &repaired)?
                )?;
                Ok(())
            }
            Self::Menu => menu::run(catalog, stdout, stdin).await,
        }
    }
}

impl CommandHandler for DiscCommand {
    type Output = anyhow::Result<()>;

    async fn handle<C: Connection, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        catalog: &Catalog<C>,
        stdout: &mut W1,
        stderr: &mut W2,
        _stdin: &impl StdIn,
    ) -> Self::Output {
        let discs = catalog.discs();
        match self {
            Self::Create { name, track_number } => render(
                discs
                    .create(NewDisc {
                        name: name.as_str().into(),
                        track_number: *track_number,
                    })
                    .await,
                stdout,
                stderr,
                printing::disc,
            ),
            Self::Get { id } => render(discs.read(id.clone()).await, stdout, stderr, printing::disc),
            Self::List => render(discs.list().await, stdout, stderr, |discs| {
                printing::disc_list("Discs", discs)
            }),
            Self::Update {
                id,
                name,
                track_number,
            } => render(
                discs
                    .update(
                        id.clone(),
                        NewDisc {
                            name: name.as_str().into(),
                            track_number: *track_number,
                        },
                    )
                    .await,
                stdout,
                stderr,
                printing::disc,
            ),
            Self::Remove { id } => render(
                discs.delete(id.clone()).await,
                stdout,
                stderr,
                printing::disc,
            ),
            Self::Tracks { id } => render(
                discs.tracks_of(id.clone()).await,
                stdout,
                stderr,
                |tracks| printing::track_list("Tracks", tracks),
            ),
            Self::Duration { id } => render(
                discs.total_duration(id.clone()).await,
                stdout,
                stderr,
                |duration| Ok(format!("Total Duration: {}", format_duration(duration))),
            ),
            Self::SortByStyle { id } => render(
                discs.sorted_by_style(id.clone()).await,
                stdout,
                stderr,
                |compositions| printing::composition_list("Tracks by Style", compositions),
            ),
            Self::LengthRange { id, min, max } => render(
                discs
                    .length_range(
                        id.clone(),
                        Duration::from_secs(*min),
                        Duration::from_secs(*max),
                    )
                    .await,
                stdout,
                stderr,
                |tracks| printing::track_list("Tracks", tracks),
            ),
        }
    }
}

impl CommandHandler for TrackCommand {
    type Output = anyhow::Result<()>;

    async fn handle<C: Connection, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        catalog: &Catalog<C>,
        stdout: &mut W1,
        stderr: &mut W2,
        _stdin: &impl StdIn,
    ) -> Self::Output {
        let tracks = catalog.tracks();
        match self {
            Self::List => render(tracks.list().await, stdout, stderr, |tracks| {
                printing::track_list("Tracks", tracks)
            }),
            Self::Get { id } => render(
                tracks.read(id.clone()).await,
                stdout,
                stderr,
                printing::track,
            ),
            Self::Update { id, track } => render(
                tracks.update(id.clone(), NewTrack::from(track)).await,
                stdout,
                stderr,
                |resolved| printing::resolved(resolved, printing::track),
            ),
            Self::Remove { id } => render(
                tracks.delete(id.clone()).await,
                stdout,
                stderr,
                |resolved| printing::resolved(resolved, printing::track),
            ),
        }
    }
}

impl CommandHandler for CompositionCommand {
    type Output = anyhow::Result<()>;

    async fn handle<C: Connection, W1: std::fmt::Write + Send, W2: std::fmt::Write + Send>(
        &self,
        catalog: &Catalog<C>,
        stdout: &mut W1,
        stderr: &mut W2,
        _stdin: &impl StdIn,
    ) -> Self::Output {
        match self {
            Self::Add { track, variant } => render(
                save(catalog, None, NewTrack::from(track), variant).await,
                stdout,
                stderr,
                |resolved| printing::resolved(resolved, printing::composition),
            ),
            Self::Update { id, track, variant } => render(
                save(catalog, Some(id.clone()), NewTrack::from(track), variant).await,
                stdout,
                stderr,
                |resolved| printing::resolved(resolved, printing::composition),
            ),
            Self::Get { kind, id } => {
                let result = match kind {
                    KindTarget::Rock => read_as(catalog.rock(), id.clone()).await,
                    KindTarget::Pop => read_as(catalog.pop(), id.clone()).await,
                    KindTarget::Classical => read_as(catalog.classical(), id.clone()).await,
                };
                render(result, stdout, stderr, printing::composition)
            }
            Self::List { kind } => {
                let result = match kind {
                    KindTarget::Rock => list_as(catalog.rock()).await,
                    KindTarget::Pop => list_as(catalog.pop()).await,
                    KindTarget::Classical => list_as(catalog.classical()).await,
                };
                let prefix = format!("{kind:?} Compositions");
                render(result, stdout, stderr, |compositions| {
                    printing::composition_list(&prefix, compositions)
                })
            }
            Self::Remove { kind, id } => {
                let result = match kind {
                    KindTarget::Rock => delete_as(catalog.rock(), id.clone()).await,
                    KindTarget::Pop => delete_as(catalog.pop(), id.clone()).await,
                    KindTarget::Classical => delete_as(catalog.classical(), id.clone()).await,
                };
                render(result, stdout, stderr, |resolved| {
                    printing::resolved(resolved, printing::composition)
                })
            }
        }
    }
}
