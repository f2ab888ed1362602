use crate::{error::SimError, grid::Grid};

/// 3×3 stencil approximating the Laplacian, applied to both species.
///
/// `weights[dy][dx]` multiplies the neighbour at `(x + dx - 1, y + dy - 1)`.
/// The weights must sum to zero so that the center coefficient is implied
/// by the ring, which lets [`Kernel::apply`] work on differences from the
/// center value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel {
    weights: [[f64; 3]; 3],
}

impl Kernel {
    /// Standard 9-point stencil: 0.2 on edges, 0.05 on diagonals, -1 center.
    pub const LAPLACIAN: Kernel = Kernel {
        weights: [[0.05, 0.2, 0.05], [0.2, -1.0, 0.2], [0.05, 0.2, 0.05]],
    };

    const SUM_TOLERANCE: f64 = 1e-9;

    /// Builds a kernel after checking that its weights sum to zero.
    pub fn new(weights: [[f64; 3]; 3]) -> Result<Self, SimError> {
        let sum: f64 = weights.iter().flatten().sum();
        if !sum.is_finite() || sum.abs() > Self::SUM_TOLERANCE {
            return Err(SimError::UnbalancedKernel { sum });
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &[[f64; 3]; 3] {
        &self.weights
    }

    /// Laplacians of species A and B at the interior cell `(x, y)`.
    ///
    /// Evaluated as `Σ w · (v_n - v_center)` over the eight ring
    /// neighbours. For a zero-sum kernel this equals the plain 3×3
    /// weighted sum, and a uniform neighbourhood yields exactly `0.0`.
    ///
    /// ### Panics
    /// Panics if `(x, y)` is on the border of `grid`.
    #[inline]
    pub fn apply(&self, grid: &Grid, x: usize, y: usize) -> (f64, f64) {
        debug_assert!(grid.is_interior(x, y), "({x}, {y}) is a border cell");
        let center = grid.get(x, y);
        let mut lap_a = 0.0;
        let mut lap_b = 0.0;
        for (dy, row) in self.weights.iter().enumerate() {
            let ny = y + dy - 1;
            for (dx, &w) in row.iter().enumerate() {
                if dy == 1 && dx == 1 {
                    continue;
                }
                // Summed against the center so a uniform field gives exactly 0.
                let n = grid.get(x + dx - 1, ny);
                lap_a += w * (n.a - center.a);
                lap_b += w * (n.b - center.b);
            }
        }
        (lap_a, lap_b)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::LAPLACIAN
    }
}
