//! One explicit Euler step of the Gray-Scott equations.
//!
//! For every interior cell the solver reads the frozen current grid,
//! computes both Laplacians with the [`Kernel`], applies
//!
//! ```text
//! a' = a + (D_a·∇²a − a·b² + feed·(1 − a))·dt
//! b' = b + (D_b·∇²b + a·b² − (k + feed)·b)·dt
//! ```
//!
//! clamps both results to `[0, 1]` and writes them to the next grid.
//! The outermost ring of the next grid is never written.

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    config::{ExecutionMode, Params},
    error::SimError,
    field_buffer::FieldBuffer,
    grid::Grid,
    kernel::Kernel,
    types::Cell,
};

/// Clamps `v` to `[0, 1]`, mapping NaN to `0`.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Advances a [`FieldBuffer`] one generation at a time.
#[derive(Clone, Debug)]
pub struct Solver {
    params: Params,
    kernel: Kernel,
    mode: ExecutionMode,
}

impl Solver {
    /// Creates a serial solver with the standard Laplacian kernel.
    ///
    /// ### Errors
    /// [`SimError::InvalidParameter`] if `params` fails [`Params::validate`].
    pub fn new(params: Params) -> Result<Self, SimError> {
        params.validate()?;
        debug!(
            "solver: D_a={} D_b={} feed={} k={} dt={}",
            params.d_a, params.d_b, params.feed, params.k, params.dt
        );
        Ok(Self {
            params,
            kernel: Kernel::LAPLACIAN,
            mode: ExecutionMode::Serial,
        })
    }

    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Next-generation value of the interior cell `(x, y)` of `current`.
    #[inline]
    pub fn update_cell(&self, current: &Grid, x: usize, y: usize) -> Cell {
        let Params {
            d_a,
            d_b,
            feed,
            k,
            dt,
        } = self.params;
        let Cell { a, b } = current.get(x, y);
        let (lap_a, lap_b) = self.kernel.apply(current, x, y);

        let reaction = a * b * b;
        let next_a = a + (d_a * lap_a - reaction + feed * (1.0 - a)) * dt;
        let next_b = b + (d_b * lap_b + reaction - (k + feed) * b) * dt;

        Cell::new(clamp_unit(next_a), clamp_unit(next_b))
    }

    /// Writes the interior of row `y` of the next generation.
    #[inline]
    fn update_row(&self, current: &Grid, y: usize, out: &mut [Cell]) {
        let last = out.len() - 1;
        for (x, cell) in out.iter_mut().enumerate().take(last).skip(1) {
            *cell = self.update_cell(current, x, y);
        }
    }

    /// Computes the next generation into `buffer.next_mut()`.
    ///
    /// Reads only the current grid, so the result does not depend on cell
    /// visiting order and serial and parallel modes agree bit for bit.
    /// The caller must [`FieldBuffer::swap`] before reading the result or
    /// stepping again.
    ///
    /// ### Panics
    /// Panics if the grids differ in shape or are smaller than 3×3.
    pub fn step(&self, buffer: &mut FieldBuffer) {
        let (current, next) = buffer.split();
        assert_eq!(current.dims(), next.dims(), "field buffer grids differ in size");
        let (width, height) = current.dims();
        assert!(width >= 3 && height >= 3, "grid {width}x{height} has no interior");

        let interior = |(y, row): (usize, &mut [Cell])| {
            if y > 0 && y + 1 < height {
                self.update_row(current, y, row);
            }
        };
        match self.mode {
            ExecutionMode::Serial => next.rows_mut().enumerate().for_each(interior),
            ExecutionMode::Parallel => next.par_rows_mut().enumerate().for_each(interior),
        }
        trace!("stepped generation {}", buffer.generation());
    }

    /// Runs `steps` rounds of [`Solver::step`] followed by a swap.
    pub fn advance(&self, buffer: &mut FieldBuffer, steps: usize) {
        for _ in 0..steps {
            self.step(buffer);
            buffer.swap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> Solver {
        Solver::new(Params::default()).unwrap()
    }

    #[test]
    fn clamp_unit_handles_non_finite() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
        assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(-0.25), 0.0);
        assert_eq!(clamp_unit(0.4), 0.4);
    }

    #[test]
    fn new_rejects_invalid_params() {
        let mut params = Params::default();
        params.d_a = -1.0;
        assert!(Solver::new(params).is_err());
    }

    #[test]
    fn uniform_base_is_a_fixed_point() {
        let mut buf = FieldBuffer::new(6, 5, Cell::BASE).unwrap();
        solver().advance(&mut buf, 3);
        assert!(buf.current().cells().iter().all(|&c| c == Cell::BASE));
    }

    #[test]
    fn uniform_field_sees_only_reaction() {
        let value = Cell::new(0.5, 0.25);
        let mut buf = FieldBuffer::new(5, 5, value).unwrap();
        let s = solver();
        s.step(&mut buf);

        let p = s.params();
        let reaction = 0.5 * 0.25 * 0.25;
        let a = 0.5 + (p.d_a * 0.0 - reaction + p.feed * (1.0 - 0.5)) * p.dt;
        let b = 0.25 + (p.d_b * 0.0 + reaction - (p.k + p.feed) * 0.25) * p.dt;
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(buf.next().get(x, y), Cell::new(a, b));
            }
        }
    }

    #[test]
    fn step_does_not_touch_current_or_next_border() {
        let mut buf = FieldBuffer::new(6, 6, Cell::BASE).unwrap();
        buf.seed_centered(1, Cell::SEED);
        buf.next_mut().set(0, 2, Cell::new(0.3, 0.3));
        let before = buf.current().clone();

        solver().step(&mut buf);

        assert_eq!(buf.current(), &before);
        assert_eq!(buf.next().get(0, 2), Cell::new(0.3, 0.3));
    }

    #[test]
    fn clamp_applies_when_update_overshoots() {
        let params = Params {
            d_a: 1.0,
            d_b: 1.0,
            feed: 0.9,
            k: 0.0,
            dt: 5.0,
        };
        let mut buf = FieldBuffer::new(7, 7, Cell::new(0.2, 0.9)).unwrap();
        buf.seed_centered(0, Cell::new(1.0, 0.0));
        Solver::new(params).unwrap().step(&mut buf);

        for y in 1..6 {
            for x in 1..6 {
                let c = buf.next().get(x, y);
                assert!((0.0..=1.0).contains(&c.a), "a out of range at ({x},{y}): {}", c.a);
                assert!((0.0..=1.0).contains(&c.b), "b out of range at ({x},{y}): {}", c.b);
            }
        }
        assert_eq!(buf.next().get(1, 1), Cell::new(1.0, 0.0));
    }

    #[test]
    fn custom_kernel_replaces_laplacian() {
        let mut buf = FieldBuffer::new(7, 7, Cell::BASE).unwrap();
        buf.seed_centered(0, Cell::SEED);
        let still = Kernel::new([[0.0; 3]; 3]).unwrap();
        let s = solver().with_kernel(still);
        s.step(&mut buf);

        // Without diffusion the single seed cell cannot spread.
        assert_eq!(buf.next().get(2, 3), Cell::BASE);
        assert_eq!(buf.next().get(3, 3), s.update_cell(buf.current(), 3, 3));
        assert_ne!(buf.next().get(3, 3), Cell::SEED);
    }

    #[test]
    fn parallel_matches_serial() {
        let mut serial = FieldBuffer::new(24, 17, Cell::BASE).unwrap();
        serial.seed_centered(3, Cell::SEED);
        let mut parallel = serial.clone();

        solver().advance(&mut serial, 25);
        solver()
            .with_mode(ExecutionMode::Parallel)
            .advance(&mut parallel, 25);

        assert_eq!(serial.current(), parallel.current());
        assert_eq!(serial.generation(), parallel.generation());
    }
}
