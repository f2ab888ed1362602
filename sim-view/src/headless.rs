//! Windowless batch driver: run a fixed number of steps, save one frame.

use std::{path::Path, time::Instant};

use anyhow::Context;
use image::GrayImage;
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use sim_core::render::render_gray;

use crate::cli::RunSetup;

pub fn run(setup: &RunSetup, steps: usize, out: &Path) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(setup.seed);
    let (mut buffer, solver) = setup.build(&mut rng)?;

    let started = Instant::now();
    solver.advance(&mut buffer, steps);
    info!(
        "{steps} steps on {}x{} in {:.3} s",
        buffer.width(),
        buffer.height(),
        started.elapsed().as_secs_f64()
    );

    let frame = GrayImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        render_gray(&buffer),
    )
    .context("frame size does not match the grid")?;
    frame
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!("wrote {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::SimConfig;

    #[test]
    fn writes_grid_sized_png() {
        let setup = RunSetup {
            config: SimConfig {
                width: 24,
                height: 16,
                seed_half_width: 2,
                ..SimConfig::default()
            },
            scatter: 0,
            seed: 1,
        };
        let out = std::env::temp_dir().join(format!("rd-headless-{}.png", std::process::id()));

        run(&setup, 3, &out).unwrap();

        let img = image::open(&out).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (24, 16));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(2, 2).0, [255]);
        std::fs::remove_file(&out).ok();
    }
}
