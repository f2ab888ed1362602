use log::{debug, warn};
use rand::Rng;

use crate::{
    error::SimError,
    grid::{Grid, SeedRegion},
    types::Cell,
};

/// Ping-pong pair of equally sized [`Grid`]s.
///
/// One grid is "current" and is only ever read; the other is "next" and
/// receives the solver's output. [`FieldBuffer::swap`] flips which index
/// is current without moving any cell data.
///
/// Border cells are never written by the solver, so both grids keep the
/// border they were given at initialization or seeding for the whole run.
#[derive(Clone, Debug)]
pub struct FieldBuffer {
    grids: [Grid; 2],
    /// Index into `grids` of the readable generation.
    current: usize,
    /// Number of completed swaps.
    generation: u64,
}

impl FieldBuffer {
    /// Allocates both grids and fills every cell with `base`.
    ///
    /// ### Errors
    /// [`SimError::GridTooSmall`] if either dimension is below 3, since
    /// such a grid has no interior cell to simulate.
    pub fn new(width: usize, height: usize, base: Cell) -> Result<Self, SimError> {
        if width < 3 || height < 3 {
            return Err(SimError::GridTooSmall { width, height });
        }
        debug!("allocating {width}x{height} field buffer");
        Ok(Self {
            grids: [Grid::new(width, height, base), Grid::new(width, height, base)],
            current: 0,
            generation: 0,
        })
    }

    /// Wraps two existing grids, `current` becoming the readable one.
    ///
    /// ### Errors
    /// - [`SimError::DimensionMismatch`] if the grids differ in shape.
    /// - [`SimError::GridTooSmall`] if they are smaller than 3×3.
    pub fn from_grids(current: Grid, next: Grid) -> Result<Self, SimError> {
        if current.dims() != next.dims() {
            return Err(SimError::DimensionMismatch {
                expected: current.dims(),
                found: next.dims(),
            });
        }
        let (width, height) = current.dims();
        if width < 3 || height < 3 {
            return Err(SimError::GridTooSmall { width, height });
        }
        Ok(Self {
            grids: [current, next],
            current: 0,
            generation: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grids[0].width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grids[0].height()
    }

    /// Number of swaps since construction or the last [`FieldBuffer::reset`].
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Overwrites `region` of both grids with `value`.
    ///
    /// Regions reaching past the grid are clamped to it and a warning is
    /// logged; a region entirely outside the grid writes nothing.
    ///
    /// ### Returns
    /// The region actually written, if any.
    pub fn seed(&mut self, region: SeedRegion, value: Cell) -> Option<SeedRegion> {
        let (width, height) = (self.width(), self.height());
        let Some((clamped, was_clamped)) = region.clamp_to(width, height) else {
            warn!("seed region {region:?} lies outside the {width}x{height} grid, skipped");
            return None;
        };
        if was_clamped {
            warn!("seed region {region:?} clamped to {clamped:?}");
        }
        for grid in &mut self.grids {
            grid.fill_rect(clamped, value);
        }
        debug!("seeded {} cells with {value:?}", clamped.area());
        Some(clamped)
    }

    /// Seeds the square of half-width `side` centered on the grid.
    pub fn seed_centered(&mut self, side: usize, value: Cell) -> Option<SeedRegion> {
        self.seed(SeedRegion::centered(self.width(), self.height(), side), value)
    }

    /// Seeds `count` squares of half-width `side` at random centers.
    ///
    /// Centers are drawn so that each square stays off the border. When
    /// the grid is too small for that, the square is placed at the middle
    /// and clamped like any other seed. All randomness comes from `rng`,
    /// so a seeded generator reproduces the same layout.
    pub fn seed_random(&mut self, count: usize, side: usize, value: Cell, rng: &mut impl Rng) {
        let (width, height) = (self.width(), self.height());
        for _ in 0..count {
            let cx = random_center(rng, width, side);
            let cy = random_center(rng, height, side);
            self.seed(SeedRegion::around(cx, cy, side), value);
        }
    }

    /// Refills both grids with `base` and restarts the generation count.
    pub fn reset(&mut self, base: Cell) {
        for grid in &mut self.grids {
            grid.fill(base);
        }
        self.current = 0;
        self.generation = 0;
    }

    /// Makes the freshly written "next" grid the readable one.
    ///
    /// O(1): only the index flips. Call exactly once after every step.
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
        self.generation += 1;
    }

    #[inline]
    pub fn current(&self) -> &Grid {
        &self.grids[self.current]
    }

    #[inline]
    pub fn next(&self) -> &Grid {
        &self.grids[self.current ^ 1]
    }

    #[inline]
    pub fn next_mut(&mut self) -> &mut Grid {
        &mut self.grids[self.current ^ 1]
    }

    /// Borrows the current grid for reading and the next one for writing.
    pub fn split(&mut self) -> (&Grid, &mut Grid) {
        let [g0, g1] = &mut self.grids;
        if self.current == 0 {
            (&*g0, g1)
        } else {
            (&*g1, g0)
        }
    }

    /// Concentrations at column `x`, row `y` of the current grid.
    #[inline]
    pub fn read_cell(&self, x: usize, y: usize) -> Cell {
        self.current().get(x, y)
    }
}

/// Center in `1 + side ..= len - 2 - side`, or `len / 2` if that is empty.
fn random_center(rng: &mut impl Rng, len: usize, side: usize) -> usize {
    let lo = side.saturating_add(1);
    let hi = len.saturating_sub(1).saturating_sub(side);
    if lo < hi { rng.random_range(lo..hi) } else { len / 2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn new_fills_both_grids() {
        let buf = FieldBuffer::new(6, 4, Cell::BASE).unwrap();
        assert_eq!(buf.width(), 6);
        assert_eq!(buf.height(), 4);
        assert_eq!(buf.generation(), 0);
        assert!(buf.current().cells().iter().all(|&c| c == Cell::BASE));
        assert!(buf.next().cells().iter().all(|&c| c == Cell::BASE));
    }

    #[test]
    fn new_rejects_grids_without_interior() {
        assert_eq!(
            FieldBuffer::new(2, 10, Cell::BASE).unwrap_err(),
            SimError::GridTooSmall { width: 2, height: 10 }
        );
        assert!(FieldBuffer::new(3, 3, Cell::BASE).is_ok());
    }

    #[test]
    fn from_grids_rejects_mismatched_dimensions() {
        let err = FieldBuffer::from_grids(
            Grid::new(5, 5, Cell::BASE),
            Grid::new(5, 6, Cell::BASE),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimError::DimensionMismatch { expected: (5, 5), found: (5, 6) }
        );
    }

    #[test]
    fn swap_flips_roles_without_copying() {
        let mut buf = FieldBuffer::new(4, 4, Cell::BASE).unwrap();
        buf.next_mut().set(1, 1, Cell::SEED);
        assert_eq!(buf.read_cell(1, 1), Cell::BASE);

        buf.swap();
        assert_eq!(buf.generation(), 1);
        assert_eq!(buf.read_cell(1, 1), Cell::SEED);
        assert_eq!(buf.next().get(1, 1), Cell::BASE);

        buf.swap();
        assert_eq!(buf.read_cell(1, 1), Cell::BASE);
        assert_eq!(buf.generation(), 2);
    }

    #[test]
    fn split_matches_current_and_next() {
        let mut buf = FieldBuffer::new(4, 4, Cell::BASE).unwrap();
        buf.swap();
        let (cur, next) = buf.split();
        next.set(2, 2, Cell::SEED);
        assert_eq!(cur.get(2, 2), Cell::BASE);
        assert_eq!(buf.next().get(2, 2), Cell::SEED);
    }

    #[test]
    fn seed_writes_both_grids() {
        let mut buf = FieldBuffer::new(11, 11, Cell::BASE).unwrap();
        let region = buf.seed_centered(1, Cell::SEED).unwrap();
        assert_eq!(region, SeedRegion { x0: 4, y0: 4, x1: 6, y1: 6 });

        for grid in [buf.current(), buf.next()] {
            for y in 0..11 {
                for x in 0..11 {
                    let expected = if region.contains(x, y) { Cell::SEED } else { Cell::BASE };
                    assert_eq!(grid.get(x, y), expected);
                }
            }
        }
    }

    #[test]
    fn oversized_seed_is_clamped() {
        let mut buf = FieldBuffer::new(8, 6, Cell::BASE).unwrap();
        let region = buf.seed_centered(10, Cell::SEED).unwrap();
        assert_eq!(region, SeedRegion { x0: 0, y0: 0, x1: 7, y1: 5 });
        assert!(buf.current().cells().iter().all(|&c| c == Cell::SEED));
    }

    #[test]
    fn seed_with_huge_side_covers_whole_grid() {
        let mut buf = FieldBuffer::new(8, 6, Cell::BASE).unwrap();
        let region = buf.seed_centered(usize::MAX, Cell::SEED).unwrap();
        assert_eq!(region, SeedRegion { x0: 0, y0: 0, x1: 7, y1: 5 });
        assert!(buf.current().cells().iter().all(|&c| c == Cell::SEED));
        assert!(buf.next().cells().iter().all(|&c| c == Cell::SEED));
    }

    #[test]
    fn seed_random_keeps_border_intact() {
        let mut buf = FieldBuffer::new(16, 12, Cell::BASE).unwrap();
        buf.seed_random(200, 2, Cell::SEED, &mut StdRng::seed_from_u64(3));

        assert!(buf.current().cells().iter().any(|&c| c == Cell::SEED));
        assert!(buf.current().border().all(|(_, _, c)| c == Cell::BASE));
    }

    #[test]
    fn seed_random_on_tiny_grid_stays_interior() {
        let mut buf = FieldBuffer::new(3, 3, Cell::BASE).unwrap();
        buf.seed_random(4, 0, Cell::SEED, &mut StdRng::seed_from_u64(9));
        assert_eq!(buf.read_cell(1, 1), Cell::SEED);
        assert!(buf.current().border().all(|(_, _, c)| c == Cell::BASE));
    }

    #[test]
    fn seed_outside_grid_is_skipped() {
        let mut buf = FieldBuffer::new(5, 5, Cell::BASE).unwrap();
        let region = SeedRegion { x0: 7, y0: 7, x1: 9, y1: 9 };
        assert_eq!(buf.seed(region, Cell::SEED), None);
        assert!(buf.current().cells().iter().all(|&c| c == Cell::BASE));
    }

    #[test]
    fn seed_random_is_reproducible() {
        let mut a = FieldBuffer::new(32, 32, Cell::BASE).unwrap();
        let mut b = FieldBuffer::new(32, 32, Cell::BASE).unwrap();
        a.seed_random(5, 1, Cell::SEED, &mut StdRng::seed_from_u64(7));
        b.seed_random(5, 1, Cell::SEED, &mut StdRng::seed_from_u64(7));

        assert_eq!(a.current(), b.current());
        assert_eq!(a.current(), a.next());
        assert!(a.current().cells().iter().any(|&c| c == Cell::SEED));
    }

    #[test]
    fn reset_restores_base_and_generation() {
        let mut buf = FieldBuffer::new(5, 5, Cell::BASE).unwrap();
        buf.seed_centered(1, Cell::SEED);
        buf.swap();

        buf.reset(Cell::BASE);

        assert_eq!(buf.generation(), 0);
        assert!(buf.current().cells().iter().all(|&c| c == Cell::BASE));
        assert!(buf.next().cells().iter().all(|&c| c == Cell::BASE));
    }
}
