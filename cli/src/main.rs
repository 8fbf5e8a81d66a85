use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use minegrid_core::{CellCount, Coord, Session, SessionConfig};

use crate::command::Command;

mod command;
mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Click to reveal, flood fill through empty cells
    Classic,
    /// Snake: fog clears around the head
    Crawler,
    /// Platformer: wide tiles, reach the top-right corner
    Platformer,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Load the session configuration from a TOML file instead of a preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset to play when no configuration file is given
    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    variant: Variant,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                toml::from_str(&text).with_context(|| {
                    format!("Invalid session configuration in {}", path.display())
                })?
            }
            None => self.preset(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if config.seed.is_none() {
            config.seed = Some(rand::random());
        }
        Ok(config)
    }

    fn preset(&self) -> SessionConfig {
        match self.variant {
            Variant::Classic => {
                let height = self.height.unwrap_or(9);
                let width = self.width.unwrap_or(9);
                SessionConfig::classic(height, width, self.mines.unwrap_or(10))
            }
            Variant::Crawler => {
                let height = self.height.unwrap_or(16);
                let width = self.width.unwrap_or(16);
                let spawn = (height / 2, width / 2);
                SessionConfig::crawler(height, width, self.mines.unwrap_or(40), spawn)
            }
            Variant::Platformer => {
                let height = self.height.unwrap_or(10);
                let width = self.width.unwrap_or(40);
                let spawn = (height.saturating_sub(1), 0);
                let goal = (0, width.saturating_sub(1));
                SessionConfig::platformer(height, width, self.mines.unwrap_or(60), spawn, goal)
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config = args.session_config()?;
    log::debug!("seed: {:?}", config.seed);
    let mut session = Session::from_seed(config).context("Could not start session")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", render::board(&session))?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("error: {err:#}");
                continue;
            }
        };

        match command.apply(&mut session) {
            Ok(Some(reply)) => writeln!(out, "{reply}")?,
            Ok(None) => {}
            Err(err) => {
                eprintln!("error: {err:#}");
                continue;
            }
        }
        if command == Command::Quit {
            break;
        }

        writeln!(out, "{}", render::board(&session))?;
        if session.is_finished() {
            writeln!(out, "{}", render::verdict(&session))?;
            break;
        }
    }

    Ok(())
}
