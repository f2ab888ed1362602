//! Application entry point for the Gray-Scott reaction-diffusion viewer.
//!
//! Without a subcommand this binary opens an eframe/egui window and
//! delegates all interactive logic and rendering to [`Viewer`]. The
//! `headless` subcommand runs a fixed number of steps and writes a PNG.

mod cli;
mod headless;
mod viewer;

use clap::Parser;
use cli::{Cli, Command};
use viewer::Viewer;

/// Parses arguments, then starts either the window or the batch run.
///
/// ### Returns
/// - `Ok(())` if the run completes.
/// - `Err` on invalid configuration, IO failures, or if eframe fails to
///   create the native window or event loop.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let setup = cli.setup()?;

    if let Some(Command::Headless { steps, out }) = &cli.command {
        return headless::run(&setup, *steps, out);
    }

    let viewer = Viewer::new(setup)?;
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Reaction Diffusion",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|err| anyhow::anyhow!("eframe: {err}"))
}
