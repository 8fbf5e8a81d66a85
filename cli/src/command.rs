use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use minegrid_core::{Coord, Coord2, MineSource, Session};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Chord(Coord2),
    Occupy(Coord2),
    Tick,
    Dump,
    Quit,
}

impl Command {
    /// Runs the command, returning a line to print for commands that produce one.
    pub fn apply<S: MineSource>(self, session: &mut Session<S>) -> Result<Option<String>> {
        Ok(match self {
            Self::Reveal(coords) => {
                let outcome = session.reveal(coords)?;
                log::debug!("reveal {:?}: {:?}", coords, outcome);
                None
            }
            Self::Flag(coords) => {
                let flags = session.toggle_flag(coords)?;
                Some(format!("{flags} flags placed"))
            }
            Self::Chord(coords) => {
                let outcome = session.chord_reveal(coords)?;
                log::debug!("chord {:?}: {:?}", coords, outcome);
                None
            }
            Self::Occupy(coords) => {
                let state = session.occupy(coords)?;
                log::debug!("occupy {:?}: {:?}", coords, state);
                None
            }
            Self::Tick => {
                session.tick()?;
                None
            }
            Self::Dump => Some(serde_json::to_string_pretty(session.grid())?),
            Self::Quit => None,
        })
    }
}

fn parse_coords<'a>(mut words: impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let mut next = |name: &str| -> Result<Coord> {
        let word = words.next().ok_or_else(|| anyhow!("missing {name}"))?;
        word.parse()
            .with_context(|| format!("invalid {name} {word:?}"))
    };
    let row = next("row")?;
    let col = next("column")?;
    if words.next().is_some() {
        bail!("too many arguments");
    }
    Ok((row, col))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;

        Ok(match verb {
            "r" | "reveal" => Self::Reveal(parse_coords(words)?),
            "f" | "flag" => Self::Flag(parse_coords(words)?),
            "c" | "chord" => Self::Chord(parse_coords(words)?),
            "n" | "occupy" => Self::Occupy(parse_coords(words)?),
            "t" | "tick" => Self::Tick,
            "dump" => Self::Dump,
            "q" | "quit" => Self::Quit,
            other => bail!("unknown command {other:?}, expected r/f/c/n ROW COL, t, dump or q"),
        })
    }
}
