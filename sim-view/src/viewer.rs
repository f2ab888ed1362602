//! Interactive Gray-Scott viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (buffer pair, solver, run setup) and implements [`eframe::App`] to
//! display the current generation as a grayscale texture.

use eframe::App;
use glam::Vec2;
use log::{debug, error, info};
use rand::{SeedableRng, rngs::StdRng};
use sim_core::{
    Cell, FieldBuffer, Preset, SimError, Solver,
    render::render_rgba,
};

use crate::cli::RunSetup;

/// Half-width of the squares dropped by the "Scatter" button.
const SCATTER_SIDE: usize = 2;
const SCATTER_COUNT: usize = 5;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`FieldBuffer`] and [`Solver`].
/// - UI state (pan/zoom, run timing, texture cache).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Upload the current generation to the texture if it changed, and draw it.
///
/// ### Fields
/// - `setup` - Run configuration; its preset changes when the user picks one.
/// - `buffer` - Ping-pong grids, `buffer.current()` is what is shown.
/// - `solver` - Step function built from the active parameters.
/// - `rng` - Generator for scattered seeds.
///
/// - `texture` - GPU copy of the last rendered generation.
/// - `texture_dirty` - Whether `buffer` changed since the last upload.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `zoom` - Screen pixels per grid cell.
/// - `pan` - Screen-space pan offset in pixels.
/// - `hovered` - Grid cell under the pointer, if any.
///
/// - `step_interval` - Target time between automatic frames (seconds).
/// - `last_step_time` - Time stamp of the last frame step (egui time).
/// - `last_step_dt` - Actual time between the last two frame steps.
pub struct Viewer {
    setup: RunSetup,
    buffer: FieldBuffer,
    solver: Solver,
    rng: StdRng,

    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,
    hovered: Option<(usize, usize)>,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer with a freshly seeded buffer.
    ///
    /// ### Errors
    /// Whatever [`RunSetup::build`] rejects.
    pub fn new(setup: RunSetup) -> Result<Self, SimError> {
        let mut rng = StdRng::seed_from_u64(setup.seed);
        let (buffer, solver) = setup.build(&mut rng)?;
        info!(
            "viewer: {}x{} grid, preset {}",
            buffer.width(),
            buffer.height(),
            setup.config.preset.unwrap_or_default()
        );

        Ok(Self {
            setup,
            buffer,
            solver,
            rng,
            texture: None,
            texture_dirty: true,
            running: false,
            zoom: 2.0,
            pan: egui::vec2(0.0, 0.0),
            hovered: None,
            step_interval: 0.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Rebuilds buffer and solver from `setup` and stops auto-running.
    ///
    /// Camera settings are kept.
    fn reset(&mut self) {
        match self.setup.build(&mut self.rng) {
            Ok((buffer, solver)) => {
                self.buffer = buffer;
                self.solver = solver;
            }
            // The setup was validated at startup and presets are always valid.
            Err(err) => error!("reset failed: {err}"),
        }
        self.texture_dirty = true;
        self.running = false;
    }

    /// Switches to `preset` and restarts the run with it.
    fn select_preset(&mut self, preset: Preset) {
        debug!("preset -> {preset}");
        self.setup.config.preset = Some(preset);
        self.reset();
    }

    fn active_preset(&self) -> Option<Preset> {
        self.setup.config.preset
    }

    /// Drops a few extra seed squares into the running field.
    fn scatter(&mut self) {
        self.buffer
            .seed_random(SCATTER_COUNT, SCATTER_SIDE, Cell::SEED, &mut self.rng);
        self.texture_dirty = true;
    }

    /// Advances the simulation by one displayed frame.
    ///
    /// A frame is `steps_per_frame` rounds of step followed by swap.
    fn step_once(&mut self) {
        self.solver
            .advance(&mut self.buffer, self.setup.config.steps_per_frame);
        self.texture_dirty = true;
    }

    fn grid_size(&self) -> Vec2 {
        Vec2::new(self.buffer.width() as f32, self.buffer.height() as f32)
    }

    /// Converts a grid-space position to screen-space.
    ///
    /// The grid is centered in `rect`, scaled by `zoom` and offset by
    /// `pan`. Grid rows grow downwards, like screen rows.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let local = (p - self.grid_size() * 0.5) * self.zoom;
        egui::pos2(
            center.x + local.x + self.pan.x,
            center.y + local.y + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let local = Vec2::new(p.x - center.x - self.pan.x, p.y - center.y - self.pan.y);
        local / self.zoom + self.grid_size() * 0.5
    }

    /// Grid cell containing the screen position, if it is on the grid.
    fn cell_at(&self, p: egui::Pos2, rect: egui::Rect) -> Option<(usize, usize)> {
        let w = self.screen_to_world(p, rect).floor();
        let size = self.grid_size();
        if w.x < 0.0 || w.y < 0.0 || w.x >= size.x || w.y >= size.y {
            return None;
        }
        Some((w.x as usize, w.y as usize))
    }

    /// Uploads the current generation if it changed since the last upload.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty && self.texture.is_some() {
            return;
        }
        let size = [self.buffer.width(), self.buffer.height()];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, &render_rgba(&self.buffer));
        match &mut self.texture {
            Some(handle) => handle.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("field", image, egui::TextureOptions::NEAREST));
            }
        }
        self.texture_dirty = false;
    }

    /// Builds the top panel UI (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("frame interval = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );
                ui.add(
                    egui::DragValue::new(&mut self.setup.config.steps_per_frame)
                        .prefix("steps/frame = ")
                        .range(1..=100)
                        .speed(1.0),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Scatter").clicked() {
                    self.scatter();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.25..=16.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (generation, totals, timing, hovered cell).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                let (sum_a, sum_b) = self.buffer.current().totals();
                ui.label(format!("Σa = {sum_a:.2}  Σb = {sum_b:.2}"));
                ui.label(format!("generation = {}", self.buffer.generation()));
                if let Some((x, y)) = self.hovered {
                    let c = self.buffer.read_cell(x, y);
                    ui.separator();
                    ui.label(format!("({x}, {y}): a = {:.4}  b = {:.4}", c.a, c.b));
                }
            });
        });
    }

    /// Builds the right-hand panel with the preset picker.
    ///
    /// Parameters are shown read-only; changing them means picking a preset.
    fn ui_preset_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("preset_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Preset");

                ui.separator();
                let mut picked = None;
                for preset in Preset::ALL {
                    if ui
                        .selectable_label(self.active_preset() == Some(preset), preset.name())
                        .clicked()
                    {
                        picked = Some(preset);
                    }
                }
                if let Some(preset) = picked {
                    self.select_preset(preset);
                }

                ui.separator();
                ui.label("Parameters");
                let p = self.solver.params();
                ui.label(format!("D_a = {}", p.d_a));
                ui.label(format!("D_b = {}", p.d_b));
                ui.label(format!("feed = {}", p.feed));
                ui.label(format!("k = {}", p.k));
                ui.label(format!("dt = {}", p.dt));

                ui.separator();
                ui.label(format!(
                    "grid = {}x{}",
                    self.buffer.width(),
                    self.buffer.height()
                ));
                ui.label(format!("mode = {:?}", self.solver.mode()));
            });
    }

    /// Builds the central panel where the field is drawn and navigated.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        self.refresh_texture(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            self.hovered = response.hover_pos().and_then(|p| self.cell_at(p, rect));

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.25, 16.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            if let Some(texture) = &self.texture {
                let image_rect = egui::Rect::from_min_max(
                    self.world_to_screen(Vec2::ZERO, rect),
                    self.world_to_screen(self.grid_size(), rect),
                );
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), image_rect, uv, egui::Color32::WHITE);
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_preset_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
