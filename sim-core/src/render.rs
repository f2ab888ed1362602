//! Grayscale mapping of the current generation.
//!
//! Interior cells map to `clamp(floor((a - b) * 255), 0, 255)`. Border
//! cells are never drawn and come out black.

use crate::{field_buffer::FieldBuffer, types::Cell};

/// Grayscale intensity of a single cell.
#[inline]
pub fn intensity(cell: Cell) -> u8 {
    let v = ((cell.a - cell.b) * 255.0).floor();
    if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
}

/// Row-major grayscale image of the current grid, one byte per cell.
pub fn render_gray(buffer: &FieldBuffer) -> Vec<u8> {
    let grid = buffer.current();
    let mut out = vec![0u8; grid.width() * grid.height()];
    for (y, row) in out.chunks_exact_mut(grid.width()).enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            if grid.is_interior(x, y) {
                *px = intensity(grid.get(x, y));
            }
        }
    }
    out
}

/// Row-major RGBA image of the current grid, gray replicated over RGB with
/// full opacity.
pub fn render_rgba(buffer: &FieldBuffer) -> Vec<u8> {
    render_gray(buffer)
        .into_iter()
        .flat_map(|c| [c, c, c, u8::MAX])
        .collect()
}
