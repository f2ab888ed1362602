use rayon::{prelude::*, slice::ChunksExactMut as ParChunksExactMut};

use crate::types::Cell;

/// Inclusive rectangle of cell coordinates, `x0..=x1` by `y0..=y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedRegion {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl SeedRegion {
    /// Square of side `2 * side + 1` centered on the grid.
    ///
    /// Both corners saturate; the upper one may still exceed the grid,
    /// see [`SeedRegion::clamp_to`].
    ///
    /// ### Parameters
    /// - `width`, `height` - Grid dimensions.
    /// - `side` - Half-width of the square, excluding the center cell.
    pub fn centered(width: usize, height: usize, side: usize) -> Self {
        let cx = width / 2;
        let cy = height / 2;
        Self {
            x0: cx.saturating_sub(side),
            y0: cy.saturating_sub(side),
            x1: cx.saturating_add(side),
            y1: cy.saturating_add(side),
        }
    }

    /// Square of side `2 * side + 1` centered on `(cx, cy)`.
    pub fn around(cx: usize, cy: usize, side: usize) -> Self {
        Self {
            x0: cx.saturating_sub(side),
            y0: cy.saturating_sub(side),
            x1: cx.saturating_add(side),
            y1: cy.saturating_add(side),
        }
    }

    /// Intersects the region with a `width × height` grid.
    ///
    /// ### Returns
    /// The clamped region and whether anything was cut off, or `None` if
    /// the region lies entirely outside the grid.
    pub fn clamp_to(self, width: usize, height: usize) -> Option<(SeedRegion, bool)> {
        if width == 0 || height == 0 || self.x0 >= width || self.y0 >= height {
            return None;
        }
        let clamped = SeedRegion {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1.min(width - 1),
            y1: self.y1.min(height - 1),
        };
        Some((clamped, clamped != self))
    }

    #[cfg(test)]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x0..=self.x1).contains(&x) && (self.y0..=self.y1).contains(&y)
    }

    /// Number of cells covered, assuming the region is in bounds.
    pub fn area(&self) -> usize {
        (self.x1 + 1 - self.x0) * (self.y1 + 1 - self.y0)
    }
}

/// Fixed-size 2-D array of [`Cell`]s stored row-major.
///
/// `x` selects the column in `0..width`, `y` the row in `0..height`.
/// Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// ### Panics
    /// Panics if `(x, y)` is outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.idx(x, y)]
    }

    /// ### Panics
    /// Panics if `(x, y)` is outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    /// `true` unless the cell sits on the outermost ring.
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x + 1 < self.width && y + 1 < self.height
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Overwrites every cell of `region` with `cell`.
    ///
    /// ### Panics
    /// Panics if the region is not inside the grid; callers clamp first.
    pub fn fill_rect(&mut self, region: SeedRegion, cell: Cell) {
        assert!(
            region.x1 < self.width && region.y1 < self.height,
            "region {region:?} outside {}x{} grid",
            self.width,
            self.height
        );
        for y in region.y0..=region.y1 {
            self.row_mut(y)[region.x0..=region.x1].fill(cell);
        }
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        &mut self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Mutable rows in order, each `width` cells long.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Cell> {
        self.cells.chunks_exact_mut(self.width)
    }

    /// Mutable rows for the rayon thread pool.
    pub fn par_rows_mut(&mut self) -> ParChunksExactMut<'_, Cell> {
        self.cells.par_chunks_exact_mut(self.width)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Sums of species A and B over every cell, accumulated row-major.
    pub fn totals(&self) -> (f64, f64) {
        let mut sum_a = 0.0;
        let mut sum_b = 0.0;
        for c in &self.cells {
            sum_a += c.a;
            sum_b += c.b;
        }
        (sum_a, sum_b)
    }

    /// Iterates the outermost ring as `(x, y, cell)`.
    pub fn border(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(move |&(x, y)| !self.is_interior(x, y))
            .map(move |(x, y)| (x, y, self.get(x, y)))
    }
}
