use core::fmt;
use std::{
    io::{self, BufRead, IsTerminal},
    str::FromStr,
    time::Duration,
};

use discotheque_core::errors::InputError;
use discotheque_storage::db::schemas::{
    disc::{self, DiscId},
    parse_record_id,
    track::{self, TrackId},
};

/// Parse the id of a disc, as given on the command line or typed into the menu.
///
/// # Errors
///
/// Returns an error if the input is not the id of a disc.
pub fn parse_disc_id(input: &str) -> Result<DiscId, InputError> {
    Ok(parse_record_id(disc::TABLE_NAME, input)?)
}

/// Parse the id of a track.
///
/// # Errors
///
/// Returns an error if the input is not the id of a track.
pub fn parse_track_id(input: &str) -> Result<TrackId, InputError> {
    Ok(parse_record_id(track::TABLE_NAME, input)?)
}

/// Parse a whole number of seconds.
///
/// # Errors
///
/// Returns an error if the input is not a non-negative whole number.
pub fn parse_seconds(input: &str) -> Result<Duration, InputError> {
    input
        .trim()
        .parse()
        .map(Duration::from_secs)
        .map_err(|_| InputError::Seconds(input.trim().to_owned()))
}

/// Parse a whole number.
///
/// # Errors
///
/// Returns an error if the input is not a number of type `N`.
pub fn parse_number<N: FromStr>(input: &str) -> Result<N, InputError> {
    input
        .trim()
        .parse()
        .map_err(|_| InputError::Number(input.trim().to_owned()))
}

pub struct WriteAdapter<W>(pub W);

impl<W> fmt::Write for WriteAdapter<W>
where
    W: io::Write,
{
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.0.write_fmt(args).map_err(|_| fmt::Error)
    }
}

pub trait StdIn: Send + Sync {
    fn is_terminal(&self) -> bool;
    fn lines(&self) -> impl Iterator<Item = io::Result<String>>;
}

impl StdIn for io::Stdin {
    fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }
    fn lines(&self) -> impl Iterator<Item = io::Result<String>> {
        io::BufReader::new(self.lock()).lines()
    }
}
