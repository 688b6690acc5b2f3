//! The interactive, numbered menu.
//!
//! Reads one answer per line, so it can be driven by a terminal or by a script piped into it.
//! The menu ends when option 11 is chosen or the input runs out.

use std::{fmt, io};

use discotheque_core::{
    catalog::{Catalog, CrudService},
    errors::{CatalogError, InputError},
    format_duration,
};
use discotheque_storage::db::schemas::{
    composition::{Classical, NewComposition, Pop, Rock},
    disc::{DiscId, NewDisc},
    track::NewTrack,
};
use surrealdb::Connection;

use super::{
    implementations::{create_as, is_recoverable},
    printing,
    utils::{StdIn, parse_disc_id, parse_number, parse_seconds, parse_track_id},
};

pub const MAIN_MENU: &str = "\
=== Discotheque ===
1. Create a new disc
2. Add a track to a disc
3. List all discs
4. List tracks of a disc
5. Calculate the duration of a disc
6. Sort tracks by style
7. Find tracks by length range
8. List all tracks
9. Remove a track
10. Remove a disc
11. Exit
";

const TRACK_TYPES: &str = "\
Enter track type
1. Rock
2. Pop
3. Classical";

/// Run the menu until the operator exits or `stdin` runs out.
///
/// # Errors
///
/// Fails if `stdin` or `stdout` fail, or if the catalog fails in a way the operator cannot fix.
/// Missing records and malformed input are reported to `stdout` and the menu carries on.
pub async fn run<C: Connection, W: fmt::Write>(
    catalog: &Catalog<C>,
    stdout: &mut W,
    stdin: &impl StdIn,
) -> anyhow::Result<()> {
    Menu {
        catalog,
        stdout,
        echo: !stdin.is_terminal(),
        lines: stdin.lines(),
        closed: false,
    }
    .run()
    .await
}

struct Menu<'a, C: Connection, W, L> {
    catalog: &'a Catalog<C>,
    stdout: &'a mut W,
    lines: L,
    /// Write every answer back out, so piped sessions read like interactive ones.
    echo: bool,
    /// Set once `lines` runs out.
    closed: bool,
}

impl<C, W, L> Menu<'_, C, W, L>
where
    C: Connection,
    W: fmt::Write,
    L: Iterator<Item = io::Result<String>>,
{
    async fn run(&mut self) -> anyhow::Result<()> {
        while !self.closed {
            write!(self.stdout, "{MAIN_MENU}")?;
            let Some(choice) = self.read_line()? else {
                break;
            };

            match choice.as_str() {
                "1" => self.create_disc().await?,
                "2" => self.add_track().await?,
                "3" => self.list_discs().await?,
                "4" => self.list_tracks_of_disc().await?,
                "5" => self.disc_duration().await?,
                "6" => self.sort_by_style().await?,
                "7" => self.length_range().await?,
                "8" => self.list_tracks().await?,
                "9" => self.remove_track().await?,
                "10" => self.remove_disc().await?,
                "11" => break,
                _ => writeln!(self.stdout, "Invalid input")?,
            }
        }
        Ok(())
    }

    /// The next answer, trimmed. `None` once the input has run out.
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let Some(line) = self.lines.next() else {
            self.closed = true;
            return Ok(None);
        };
        let line = line?;
        if self.echo {
            writeln!(self.stdout, "{line}")?;
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Print `prompt` and parse the answer.
    ///
    /// `None` if the input ran out or the answer could not be parsed (which is reported).
    fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl FnOnce(&str) -> Result<T, InputError>,
    ) -> anyhow::Result<Option<T>> {
        writeln!(self.stdout, "{prompt}")?;
        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };
        match parse(&answer) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                writeln!(self.stdout, "{e}")?;
                Ok(None)
            }
        }
    }

    fn ask_text(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.ask(prompt, |answer| Ok(answer.to_owned()))
    }

    fn ask_disc(&mut self) -> anyhow::Result<Option<DiscId>> {
        self.ask("Enter disc id:", parse_disc_id)
    }

    /// Print what an operation returned, or why it failed.
    fn show<T>(
        &mut self,
        result: Result<T, CatalogError>,
        render: impl FnOnce(&T) -> Result<String, fmt::Error>,
    ) -> anyhow::Result<()> {
        match result {
            Ok(value) => write!(self.stdout, "{}", render(&value)?)?,
            Err(e) => self.failed(e)?,
        }
        Ok(())
    }

    fn failed(&mut self, error: CatalogError) -> anyhow::Result<()> {
        if is_recoverable(&error) {
            writeln!(self.stdout, "Operation failed: {error}")?;
            Ok(())
        } else {
            Err(error.into())
        }
    }

    async fn create_disc(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Create a New Disc ===")?;
        let Some(name) = self.ask_text("Enter disc name:")? else {
            return Ok(());
        };
        let Some(track_number) = self.ask(
            "Enter the number of tracks for the disc (you can add tracks later):",
            parse_number::<u32>,
        )?
        else {
            return Ok(());
        };

        let disc = match self
            .catalog
            .discs()
            .create(NewDisc {
                name: name.into(),
                track_number,
            })
            .await
        {
            Ok(disc) => disc,
            Err(e) => return self.failed(e),
        };
        writeln!(self.stdout, "Operation successful")?;
        write!(self.stdout, "{}", printing::disc(&disc)?)?;

        for _ in 0..track_number {
            if self.closed {
                break;
            }
            self.add_track_to(disc.id.clone()).await?;
        }
        Ok(())
    }

    async fn add_track(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Add a Track to a Disc ===")?;
        let Some(disc) = self.ask_disc()? else {
            return Ok(());
        };
        // the disc is checked before asking for every field of the track
        if let Err(e) = self.catalog.discs().read(disc.clone()).await {
            return self.failed(e);
        }
        self.add_track_to(disc).await
    }

    async fn add_track_to(&mut self, disc: DiscId) -> anyhow::Result<()> {
        let Some(kind) = self.ask_text(TRACK_TYPES)? else {
            return Ok(());
        };
        if !matches!(kind.as_str(), "1" | "2" | "3") {
            writeln!(self.stdout, "Invalid input")?;
            return Ok(());
        }
        let Some(track) = self.ask_track(disc)? else {
            return Ok(());
        };

        let result = match kind.as_str() {
            "1" => {
                let Some(style) = self.ask_text("Enter rock composition style")? else {
                    return Ok(());
                };
                let variant = Rock {
                    style: style.into(),
                };
                create_as(self.catalog.rock(), NewComposition { track, variant }).await
            }
            "2" => {
                let Some(genre) = self.ask_text("Enter pop composition genre")? else {
                    return Ok(());
                };
                let Some(popularity) =
                    self.ask("Enter pop composition popularity", parse_number::<i64>)?
                else {
                    return Ok(());
                };
                let variant = Pop {
                    genre: genre.into(),
                    popularity,
                };
                create_as(self.catalog.pop(), NewComposition { track, variant }).await
            }
            _ => {
                let Some(epoch) = self.ask_text("Enter classical composition epoch")? else {
                    return Ok(());
                };
                let variant = Classical {
                    epoch: epoch.into(),
                };
                create_as(self.catalog.classical(), NewComposition { track, variant }).await
            }
        };

        self.show(result, |resolved| {
            Ok(format!(
                "Operation successful\n{}",
                printing::resolved(resolved, printing::composition)?
            ))
        })
    }

    /// Ask for the fields every track has.
    fn ask_track(&mut self, disc: DiscId) -> anyhow::Result<Option<NewTrack>> {
        let Some(title) = self.ask_text("Enter track title")? else {
            return Ok(None);
        };
        let Some(duration) = self.ask("Enter track duration (in seconds)", parse_seconds)? else {
            return Ok(None);
        };
        let Some(author) = self.ask_text("Enter track author")? else {
            return Ok(None);
        };

        Ok(Some(NewTrack {
            title: title.into(),
            author: author.into(),
            duration,
            disc,
        }))
    }

    async fn list_discs(&mut self) -> anyhow::Result<()> {
        let result = self.catalog.discs().list().await;
        self.show(result, |discs| printing::disc_list("Discs", discs))
    }

    async fn list_tracks_of_disc(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== List Tracks of a Disc ===")?;
        let Some(disc) = self.ask_disc()? else {
            return Ok(());
        };
        let result = self.catalog.discs().tracks_of(disc).await;
        self.show(result, |tracks| printing::track_list("Tracks", tracks))
    }

    async fn disc_duration(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Calculate Duration of a Disc ===")?;
        let Some(disc) = self.ask_disc()? else {
            return Ok(());
        };
        let result = self.catalog.discs().total_duration(disc).await;
        self.show(result, |duration| {
            Ok(format!(
                "Disc total duration: {}\n",
                format_duration(duration)
            ))
        })
    }

    async fn sort_by_style(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Sort Tracks by Style ===")?;
        let Some(disc) = self.ask_disc()? else {
            return Ok(());
        };
        let result = self.catalog.discs().sorted_by_style(disc).await;
        self.show(result, |compositions| {
            printing::composition_list("Tracks by Style", compositions)
        })
    }

    async fn length_range(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Find Tracks by Length Range ===")?;
        let Some(disc) = self.ask_disc()? else {
            return Ok(());
        };
        let Some(min) = self.ask("Enter min duration (in seconds)", parse_seconds)? else {
            return Ok(());
        };
        let Some(max) = self.ask("Enter max duration (in seconds)", parse_seconds)? else {
            return Ok(());
        };
        let result = self.catalog.discs().length_range(disc, min, max).await;
        self.show(result, |tracks| printing::track_list("Tracks", tracks))
    }

    async fn list_tracks(&mut self) -> anyhow::Result<()> {
        let result = self.catalog.tracks().list().await;
        self.show(result, |tracks| printing::track_list("Tracks", tracks))
    }

    async fn remove_track(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Remove a Track ===")?;
        let Some(track) = self.ask("Enter track id:", parse_track_id)? else {
            return Ok(());
        };
        let result = self.catalog.tracks().delete(track).await;
        self.show(result, |resolved| {
            Ok(format!(
                "Operation successful\n{}",
                printing::resolved(resolved, printing::track)?
            ))
        })
    }

    async fn remove_disc(&mut self) -> anyhow::Result<()> {
        writeln!(self.stdout, "=== Remove a Disc ===")?;
        let Some(disc) = self.ask_disc()? else {
            return Ok(());
        };
        let result = self.catalog.discs().delete(disc).await;
        self.show(result, |disc| {
            Ok(format!("Operation successful\n{}", printing::disc(disc)?))
        })
    }
}
