/// Concentrations of species A and B at one grid position.
///
/// Both values are densities that the solver keeps inside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub a: f64,
    pub b: f64,
}

impl Cell {
    /// Value every cell starts with: all A, no B.
    pub const BASE: Cell = Cell { a: 1.0, b: 0.0 };

    /// Value written into seed regions to break symmetry.
    pub const SEED: Cell = Cell { a: 0.0, b: 1.0 };

    #[inline]
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BASE
    }
}
