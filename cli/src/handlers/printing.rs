//! Handles displaying the output of various commands in a human readable format.

use std::fmt::Write;

use discotheque_core::{
    catalog::{CatalogHealth, Resolved},
    format_duration,
};
use discotheque_storage::db::schemas::{
    composition::{AnyComposition, Classical, CompositionDetails, Pop, Rock},
    disc::Disc,
    track::Track,
};

pub fn disc(disc: &Disc) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Disc:")?;
    writeln!(output, "\tId: {}", disc.id)?;
    writeln!(output, "\tName: \"{}\"", disc.name)?;
    writeln!(output, "\tTrack Number: {}", disc.track_number)?;
    writeln!(
        output,
        "\tTotal Duration: {}",
        format_duration(&disc.total_duration)
    )?;

    Ok(output)
}

pub fn disc_list(prefix: &str, discs: &[Disc]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;

    for disc in discs {
        writeln!(
            output,
            "\t{}: \"{}\" ({} tracks, {}),",
            disc.id,
            disc.name,
            disc.track_number,
            format_duration(&disc.total_duration)
        )?;
    }

    Ok(output)
}

pub fn track(track: &Track) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Track:")?;
    writeln!(output, "\tId: {}", track.id)?;
    writeln!(output, "\tTitle: \"{}\"", track.title)?;
    writeln!(output, "\tAuthor: \"{}\"", track.author)?;
    writeln!(output, "\tDuration: {}", format_duration(&track.duration))?;
    writeln!(output, "\tDisc: {}", track.disc)?;

    Ok(output)
}

pub fn track_list(prefix: &str, tracks: &[Track]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;

    for track in tracks {
        writeln!(
            output,
            "\t{}: \"{}\" (by: \"{}\", {}),",
            track.id,
            track.title,
            track.author,
            format_duration(&track.duration)
        )?;
    }

    Ok(output)
}

pub fn composition(composition: &AnyComposition) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    write!(output, "{}", track(&composition.track)?)?;
    writeln!(output, "\tKind: {}", composition.kind())?;
    match &composition.variant {
        CompositionDetails::Rock(Rock { style }) => writeln!(output, "\tStyle: \"{style}\"")?,
        CompositionDetails::Pop(Pop { genre, popularity }) => {
            writeln!(output, "\tGenre: \"{genre}\"")?;
            writeln!(output, "\tPopularity: {popularity}")?;
        }
        CompositionDetails::Classical(Classical { epoch }) => {
            writeln!(output, "\tEpoch: \"{epoch}\"")?;
        }
    }

    Ok(output)
}

pub fn composition_list(
    prefix: &str,
    compositions: &[AnyComposition],
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;

    for composition in compositions {
        writeln!(
            output,
            "\t{}: \"{}\" (by: \"{}\", {}, {}: \"{}\"),",
            composition.track.id,
            composition.track.title,
            composition.track.author,
            format_duration(&composition.track.duration),
            composition.kind(),
            composition.style_key()
        )?;
    }

    Ok(output)
}

/// A mutated record, followed by the disc it belongs to.
pub fn resolved<T>(
    resolved: &Resolved<T>,
    record: impl Fn(&T) -> Result<String, std::fmt::Error>,
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    write!(output, "{}", record(&resolved.record)?)?;
    write!(output, "{}", disc(&resolved.disc)?)?;

    Ok(output)
}

pub fn health(health: &CatalogHealth) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Catalog Health:")?;
    writeln!(output, "\tDiscs: {}", health.discs)?;
    writeln!(output, "\tTracks: {}", health.tracks)?;
    writeln!(output, "\tOrphaned Tracks: {}", health.orphaned_tracks)?;
    if health.stale_discs.is_empty() {
        writeln!(output, "\tStale Discs: none")?;
    } else {
        write!(output, "{}", disc_list("\tStale Discs", &health.stale_discs)?)?;
        writeln!(output, "Run `discotheque repair` to fix the stale discs")?;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    use pretty_assertions::assert_str_eq;

    fn abbey_road() -> Disc {
        Disc {
            id: Disc::generate_id(),
            name: "Abbey Road".into(),
            track_number: 17,
            total_duration: Duration::from_secs(442),
        }
    }

    fn something(disc: &Disc) -> Track {
        Track {
            id: Track::generate_id(),
            title: "Something".into(),
            author: "George Harrison".into(),
            duration: Duration::from_secs(183),
            disc: disc.id.clone(),
        }
    }

    #[test]
    fn test_disc() {
        let disc = abbey_road();
        assert_str_eq!(
            super::disc(&disc).unwrap(),
            format!(
                "Disc:\n\tId: {}\n\tName: \"Abbey Road\"\n\tTrack Number: 17\n\tTotal Duration: 7:22\n",
                disc.id
            )
        );
    }

    #[test]
    fn test_disc_list() {
        let disc = abbey_road();
        assert_str_eq!(
            disc_list("Discs", &[disc.clone()]).unwrap(),
            format!("Discs:\n\t{}: \"Abbey Road\" (17 tracks, 7:22),\n", disc.id)
        );
        assert_str_eq!(disc_list("Discs", &[]).unwrap(), "Discs:\n");
    }

    #[test]
    fn test_track_list() {
        let track = something(&abbey_road());
        assert_str_eq!(
            track_list("Tracks", &[track.clone()]).unwrap(),
            format!(
                "Tracks:\n\t{}: \"Something\" (by: \"George Harrison\", 3:03),\n",
                track.id
            )
        );
    }

    #[test]
    fn test_composition() {
        let disc = abbey_road();
        let track = something(&disc);
        let composition = AnyComposition {
            track: track.clone(),
            variant: CompositionDetails::Pop(Pop {
                genre: "Ballad".into(),
                popularity: 88,
            }),
        };

        assert_str_eq!(
            super::composition(&composition).unwrap(),
            format!(
                "Track:\n\tId: {}\n\tTitle: \"Something\"\n\tAuthor: \"George Harrison\"\n\tDuration: 3:03\n\tDisc: {}\n\tKind: pop\n\tGenre: \"Ballad\"\n\tPopularity: 88\n",
                track.id, disc.id
            )
        );
        assert_str_eq!(
            composition_list("Sorted", &[composition]).unwrap(),
            format!(
                "Sorted:\n\t{}: \"Something\" (by: \"George Harrison\", 3:03, pop: \"Ballad\"),\n",
                track.id
            )
        );
    }

    #[test]
    fn test_health() {
        assert_str_eq!(
            health(&CatalogHealth::default()).unwrap(),
            "Catalog Health:\n\tDiscs: 0\n\tTracks: 0\n\tOrphaned Tracks: 0\n\tStale Discs: none\n"
        );

        let disc = abbey_road();
        let stale = CatalogHealth {
            discs: 1,
            tracks: 0,
            orphaned_tracks: 0,
            stale_discs: vec![disc.clone()],
        };
        assert_str_eq!(
            health(&stale).unwrap(),
            format!(
                "Catalog Health:\n\tDiscs: 1\n\tTracks: 0\n\tOrphaned Tracks: 0\n\tStale Discs:\n\t{}: \"Abbey Road\" (17 tracks, 7:22),\nRun `discotheque repair` to fix the stale discs\n",
                disc.id
            )
        );
    }
}
