use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::SimError, field_buffer::FieldBuffer, solver::Solver, types::Cell,
};

/// Gray-Scott rate constants and the integration time step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Diffusion rate of species A.
    pub d_a: f64,
    /// Diffusion rate of species B.
    pub d_b: f64,
    /// Feed rate replenishing A.
    pub feed: f64,
    /// Kill rate removing B.
    pub k: f64,
    pub dt: f64,
}

impl Params {
    /// Rejects values that cannot drive a meaningful run.
    ///
    /// Diffusion rates and `dt` must be finite and strictly positive;
    /// `feed` and `k` must be finite and non-negative.
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [("d_a", self.d_a), ("d_b", self.d_b), ("dt", self.dt)];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidParameter { name, value });
            }
        }
        let non_negative = [("feed", self.feed), ("k", self.k)];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Preset::Symmetric.params()
    }
}

/// Named parameter sets producing qualitatively different patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Symmetric spots growing out of the seed.
    #[default]
    Symmetric,
    /// Spots that repeatedly split in two.
    Mitosis,
    /// Branching coral-like growth.
    Coral,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Symmetric, Preset::Mitosis, Preset::Coral];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Symmetric => "symmetric",
            Preset::Mitosis => "mitosis",
            Preset::Coral => "coral",
        }
    }

    /// `(feed, k)` for this preset.
    pub fn feed_kill(&self) -> (f64, f64) {
        match self {
            Preset::Symmetric => (0.03, 0.058),
            Preset::Mitosis => (0.0367, 0.0649),
            Preset::Coral => (0.0545, 0.062),
        }
    }

    /// Full parameter set; diffusion rates and `dt` are shared by all presets.
    pub fn params(&self) -> Params {
        let (feed, k) = self.feed_kill();
        Params {
            d_a: 1.0,
            d_b: 0.5,
            feed,
            k,
            dt: 1.0,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimError::UnknownPreset(s.to_string()))
    }
}

/// How [`Solver::step`] walks the interior rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One row after another on the calling thread.
    #[default]
    Serial,
    /// Rows split across the rayon thread pool.
    Parallel,
}

/// Everything needed to start a run.
///
/// When `preset` is set it overrides `params`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    /// Half-width of the centered seed square.
    pub seed_half_width: usize,
    pub preset: Option<Preset>,
    pub params: Params,
    pub mode: ExecutionMode,
    /// Steps a host loop runs per displayed frame.
    pub steps_per_frame: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            seed_half_width: 20,
            preset: None,
            params: Params::default(),
            mode: ExecutionMode::Serial,
            steps_per_frame: 1,
        }
    }
}

impl SimConfig {
    /// Parameters in effect, taking the preset into account.
    pub fn effective_params(&self) -> Params {
        self.preset.map(|p| p.params()).unwrap_or(self.params)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width < 3 || self.height < 3 {
            return Err(SimError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.steps_per_frame == 0 {
            return Err(SimError::InvalidParameter {
                name: "steps_per_frame",
                value: 0.0,
            });
        }
        self.effective_params().validate()
    }

    /// Allocates and seeds the buffer pair and builds the matching solver.
    ///
    /// Both grids are filled with [`Cell::BASE`] and the centered square
    /// of half-width `seed_half_width` is set to [`Cell::SEED`].
    pub fn build(&self) -> Result<(FieldBuffer, Solver), SimError> {
        self.validate()?;
        let mut buffer = FieldBuffer::new(self.width, self.height, Cell::BASE)?;
        buffer.seed_centered(self.seed_half_width, Cell::SEED);
        let solver = Solver::new(self.effective_params())?.with_mode(self.mode);
        Ok((buffer, solver))
    }
}
