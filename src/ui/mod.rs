//! User interface for CodeCanvas.
//!
//! The window is split into a chat panel on the left and the whiteboard on the right.
//! Each frame applies finished model calls, hands the newest assistant turn to the
//! visualization scheduler and advances any projection that has come due.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main CodeCanvasApp
//! - `chat` - Transcript, suggestions, language picker and model dispatch
//! - `highlighters` - Syntax highlighting for code blocks in answers
//! - `canvas` - The whiteboard surface, its camera, panning and zooming
//! - `rendering` - Drawing the grid and text shapes

mod canvas;
mod chat;
mod highlighters;
mod rendering;
mod state;

pub use canvas::Whiteboard;
pub use state::CodeCanvasApp;

use crate::constants::{CANONICAL_CAMERA_POSITION, CANONICAL_CAMERA_ZOOM};
use crate::projector::DrawingSurface;
use crate::steps::extract_steps;
use crate::types::InteractionMode;
use eframe::egui;
use std::time::Instant;

impl eframe::App for CodeCanvasApp {
    /// Persist UI settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                log::error!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_frame(ctx, Instant::now());
    }
}

impl CodeCanvasApp {
    /// Lays out and updates the whole window for one frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `now` - Time used for visualization deadlines
    pub fn run_frame(&mut self, ctx: &egui::Context, now: Instant) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_model_results();
        self.sync_visualization(now);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.input(|i| i.content_rect().width());
        let max_width = (viewport_width * 0.7).max(280.0);
        if !self.fullscreen {
            egui::SidePanel::left("chat_panel")
                .resizable(true)
                .default_width(self.chat_panel_width.clamp(280.0, max_width))
                .show(ctx, |ui| {
                    self.chat_panel_width = ui.available_width().clamp(280.0, max_width);
                    self.draw_chat_panel(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.advance_visualization(ctx, now);
    }

    /// Schedules a projection when a new assistant turn has arrived.
    ///
    /// Only answers to structured prompts carry a pseudocode section. Any other new turn
    /// still cancels queued projections of older turns, but leaves the board as it is.
    fn sync_visualization(&mut self, now: Instant) {
        let Some((index, turn, mode)) = self.session.latest_answer() else {
            return;
        };
        if self.chat.visualized_turn == Some(index) {
            return;
        }
        self.chat.visualized_turn = Some(index);

        if mode != InteractionMode::Structured {
            self.scheduler.cancel();
            return;
        }
        let steps = extract_steps(&turn.content);
        let generation = self.scheduler.schedule(steps, now);
        log::debug!("Scheduled visualization {} for turn {index}", generation.0);
    }

    /// Runs due visualization work and keeps frames coming until the queue drains.
    fn advance_visualization(&mut self, ctx: &egui::Context, now: Instant) {
        let outcome = self.scheduler.poll(now, &mut self.whiteboard);
        if outcome.shapes_created > 0 {
            log::info!("Projected {} shapes onto the whiteboard", outcome.shapes_created);
        }
        if let Some(deadline) = self.scheduler.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.strong("CodeCanvas");
            ui.separator();

            for mode in [InteractionMode::Structured, InteractionMode::Conversational] {
                ui.selectable_value(&mut self.session.mode, mode, mode.label());
            }

            ui.separator();
            if ui.button("New chat").clicked() {
                self.new_chat();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme = if self.dark_mode { "Light mode" } else { "Dark mode" };
                if ui.button(theme).clicked() {
                    self.dark_mode = !self.dark_mode;
                }
                ui.checkbox(&mut self.show_grid, "Grid");
            });
        });
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Canvas");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.fullscreen { "Exit fullscreen" } else { "Fullscreen" };
                if ui.button(label).clicked() {
                    self.fullscreen = !self.fullscreen;
                }
                if ui.button("Clear").clicked() {
                    self.whiteboard.clear();
                }
                if ui.button("Reset view").clicked() {
                    self.whiteboard
                        .set_camera(CANONICAL_CAMERA_POSITION, CANONICAL_CAMERA_ZOOM);
                }
                if ui.button("Fit").clicked() {
                    self.whiteboard.zoom_to_fit();
                }
            });
        });
        ui.separator();

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        self.whiteboard.mount(response.rect);

        self.whiteboard.handle_panning(ui, &response);
        self.whiteboard.handle_zoom(ui, &response);

        let canvas_rect = response.rect;
        let painter = painter.with_clip_rect(canvas_rect);
        self.whiteboard
            .render(&painter, canvas_rect, self.show_grid, self.dark_mode);
    }

    /// Ends the current conversation: clears the log, the whiteboard and any pending
    /// visualization.
    pub fn new_chat(&mut self) {
        self.session.reset();
        self.scheduler.cancel();
        self.whiteboard.clear();
        self.chat.visualized_turn = None;
        self.chat.input.clear();
        log::info!("Started a new chat");
    }
}
