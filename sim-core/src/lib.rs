//! Core Gray-Scott reaction-diffusion simulation library.
//!
//! Main components:
//! - [`types`] — the per-cell concentration pair.
//! - [`grid`] — fixed-size 2-D cell storage and seed regions.
//! - [`field_buffer`] — the ping-pong pair of grids.
//! - [`kernel`] — the 3×3 Laplacian stencil.
//! - [`solver`] — one explicit Euler step of the reaction-diffusion equations.
//! - [`config`] — parameters, named presets and run configuration.
//! - [`render`] — mapping of concentrations to grayscale intensities.
//! - [`error`] — construction and validation errors.

pub mod config;
pub mod error;
pub mod field_buffer;
pub mod grid;
pub mod kernel;
pub mod render;
pub mod solver;
pub mod types;

pub use config::{ExecutionMode, Params, Preset, SimConfig};
pub use error::SimError;
pub use field_buffer::FieldBuffer;
pub use grid::{Grid, SeedRegion};
pub use kernel::Kernel;
pub use solver::Solver;
pub use types::Cell;
