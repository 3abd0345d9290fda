//! Whiteboard rendering: background grid and text shapes.

use super::canvas::{font_size, Whiteboard};
use crate::constants::GRID_SIZE;
use crate::types::{CanvasShape, ShapeColor};
use eframe::egui;

/// Accent used for heading labels.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(67, 135, 244);

impl Whiteboard {
    /// Renders the grid (if enabled) and every shape.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle of the canvas area
    /// * `show_grid` - Whether to draw the background grid
    /// * `dark_mode` - Selects the foreground color for step text
    pub fn render(
        &self,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
        show_grid: bool,
        dark_mode: bool,
    ) {
        if show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        for shape in self.shapes() {
            self.draw_shape(painter, shape, dark_mode);
        }

        if self.shapes().is_empty() {
            let hint_color = if dark_mode {
                egui::Color32::from_gray(120)
            } else {
                egui::Color32::from_gray(140)
            };
            painter.text(
                canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Ask a question to see its algorithm steps here",
                egui::FontId::proportional(14.0),
                hint_color,
            );
        }
    }

    /// Draws the background grid lines that fall inside `canvas_rect`.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let screen_grid_size = GRID_SIZE * self.zoom;
        // Grid too small to see clearly
        if screen_grid_size < 2.0 {
            return;
        }

        let grid_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32);
        let stroke = egui::Stroke::new(1.0, grid_color);

        let top_left = self.screen_to_world(canvas_rect.min);
        let bottom_right = self.screen_to_world(canvas_rect.max);

        let mut x = (top_left.x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= bottom_right.x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            if screen_x >= canvas_rect.min.x && screen_x <= canvas_rect.max.x {
                painter.line_segment(
                    [
                        egui::pos2(screen_x, canvas_rect.min.y),
                        egui::pos2(screen_x, canvas_rect.max.y),
                    ],
                    stroke,
                );
            }
            x += GRID_SIZE;
        }

        let mut y = (top_left.y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= bottom_right.y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            if screen_y >= canvas_rect.min.y && screen_y <= canvas_rect.max.y {
                painter.line_segment(
                    [
                        egui::pos2(canvas_rect.min.x, screen_y),
                        egui::pos2(canvas_rect.max.x, screen_y),
                    ],
                    stroke,
                );
            }
            y += GRID_SIZE;
        }
    }

    /// Draws one text shape. Font size scales with zoom.
    pub fn draw_shape(&self, painter: &egui::Painter, shape: &CanvasShape, dark_mode: bool) {
        let color = match shape.style.color {
            ShapeColor::Blue => ACCENT,
            ShapeColor::Black if dark_mode => egui::Color32::from_gray(230),
            ShapeColor::Black => egui::Color32::BLACK,
        };
        let size = (font_size(shape.style.size) * self.zoom).clamp(4.0, 96.0);
        let anchor = self.world_to_screen(egui::pos2(shape.position.0, shape.position.1));

        painter.text(
            anchor,
            egui::Align2::LEFT_TOP,
            &shape.text,
            egui::FontId::proportional(size),
            color,
        );
    }
}
