//! Command-line options and the run setup derived from them.

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use sim_core::{Cell, ExecutionMode, FieldBuffer, Preset, SimConfig, SimError, Solver};

/// Half-width of each extra square placed by `--scatter`.
const SCATTER_SIDE: usize = 2;

#[derive(Parser, Debug)]
#[command(
    name = "reaction-diffusion",
    about = "Gray-Scott reaction-diffusion on a fixed 2D grid"
)]
pub struct Cli {
    /// JSON file with a full or partial run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Named parameter preset: symmetric, mitosis or coral.
    #[arg(long)]
    pub preset: Option<Preset>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// Half-width of the centered seed square.
    #[arg(long)]
    pub side: Option<usize>,

    #[arg(long)]
    pub steps_per_frame: Option<usize>,

    /// Split each step across all cores.
    #[arg(long)]
    pub parallel: bool,

    /// Extra seed squares at random positions.
    #[arg(long, default_value_t = 0)]
    pub scatter: usize,

    /// RNG seed for `--scatter`.
    #[arg(long, default_value_t = 0xC0FFEE)]
    pub seed: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run without a window and write the final frame as a PNG.
    Headless {
        #[arg(long, default_value_t = 1000)]
        steps: usize,

        #[arg(long, default_value = "frame.png")]
        out: PathBuf,
    },
}

impl Cli {
    /// Resolves the config file and the command-line overrides into a
    /// validated [`RunSetup`].
    pub fn setup(&self) -> anyhow::Result<RunSetup> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig::default(),
        };

        if let Some(preset) = self.preset {
            config.preset = Some(preset);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(side) = self.side {
            config.seed_half_width = side;
        }
        if let Some(steps) = self.steps_per_frame {
            config.steps_per_frame = steps;
        }
        if self.parallel {
            config.mode = ExecutionMode::Parallel;
        }
        config.validate()?;

        Ok(RunSetup {
            config,
            scatter: self.scatter,
            seed: self.seed,
        })
    }
}

/// Validated configuration plus the optional random seeding.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSetup {
    pub config: SimConfig,
    pub scatter: usize,
    pub seed: u64,
}

impl RunSetup {
    /// Builds a freshly seeded buffer pair and its solver.
    pub fn build(&self, rng: &mut StdRng) -> Result<(FieldBuffer, Solver), SimError> {
        let (mut buffer, solver) = self.config.build()?;
        if self.scatter > 0 {
            buffer.seed_random(self.scatter, SCATTER_SIDE, Cell::SEED, rng);
        }
        Ok((buffer, solver))
    }
}
