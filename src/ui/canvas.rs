//! The whiteboard: the drawing surface the projector writes to.
//!
//! This module holds the shapes and the camera, converts between screen and world space,
//! and handles canvas panning and zooming.

use crate::constants::{FIT_PADDING, LABEL_FONT_SIZE, MAX_ZOOM, MIN_ZOOM, STEP_FONT_SIZE};
use crate::projector::{DrawingSurface, SurfaceError};
use crate::types::{CanvasShape, ShapeId, TextSize};
use eframe::egui;

/// Average glyph width relative to font size, used to estimate text extents.
const GLYPH_WIDTH_RATIO: f32 = 0.55;
/// Line height relative to font size.
const LINE_HEIGHT_RATIO: f32 = 1.4;

/// Font size in world units for a text size.
pub fn font_size(size: TextSize) -> f32 {
    match size {
        TextSize::Small => STEP_FONT_SIZE,
        TextSize::Medium => LABEL_FONT_SIZE,
    }
}

/// Estimated world-space bounds of a text shape.
pub fn shape_bounds(shape: &CanvasShape) -> egui::Rect {
    let size = font_size(shape.style.size);
    let width = shape.text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO;
    egui::Rect::from_min_size(
        egui::pos2(shape.position.0, shape.position.1),
        egui::vec2(width, size * LINE_HEIGHT_RATIO),
    )
}

/// Shapes plus camera, implementing [`DrawingSurface`].
///
/// The surface becomes ready the first time it is laid out on screen
/// (see [`Whiteboard::mount`]).
#[derive(Debug)]
pub struct Whiteboard {
    shapes: Vec<CanvasShape>,
    /// Camera pan in screen pixels, relative to the viewport's top-left corner
    pub pan: egui::Vec2,
    /// Current zoom level (1.0 = normal)
    pub zoom: f32,
    viewport: Option<egui::Rect>,
    is_panning: bool,
    last_pan_pos: Option<egui::Pos2>,
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            viewport: None,
            is_panning: false,
            last_pan_pos: None,
        }
    }
}

impl Whiteboard {
    /// Records the screen rectangle the whiteboard occupies. The first call marks the
    /// surface ready.
    pub fn mount(&mut self, viewport: egui::Rect) {
        if self.viewport.is_none() {
            log::debug!("Whiteboard mounted at {viewport:?}");
        }
        self.viewport = Some(viewport);
    }

    /// Screen rectangle recorded by the last [`mount`](Self::mount).
    pub fn viewport(&self) -> Option<egui::Rect> {
        self.viewport
    }

    /// Current shapes in creation order.
    pub fn shapes(&self) -> &[CanvasShape] {
        &self.shapes
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        let ids = self.select_all_shapes();
        self.delete_shapes(&ids);
    }

    fn origin(&self) -> egui::Pos2 {
        self.viewport.map(|rect| rect.min).unwrap_or(egui::Pos2::ZERO)
    }

    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        let local = screen_pos - self.origin() - self.pan;
        egui::pos2(local.x / self.zoom, local.y / self.zoom)
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        self.origin() + self.pan + world_pos.to_vec2() * self.zoom
    }

    /// Handles middle-click or Cmd/Ctrl+left-click panning.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `response` - The response from the canvas widget
    pub fn handle_panning(&mut self, ui: &egui::Ui, response: &egui::Response) {
        // modifiers.command is Cmd on macOS and Ctrl elsewhere
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.is_panning {
                    self.is_panning = true;
                    self.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.last_pan_pos {
                    self.pan += current_pos - last_pos;
                    self.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.is_panning = false;
            self.last_pan_pos = None;
        }
    }

    /// Handles scroll-wheel zoom, keeping the world point under the cursor fixed.
    ///
    /// Only zooms while the cursor is over the canvas.
    pub fn handle_zoom(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }

        let mouse_pos = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos());
        let Some(mouse_pos) = mouse_pos else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let world_before = self.screen_to_world(mouse_pos);
        let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.zoom;
        self.zoom = (self.zoom + zoom_delta).clamp(MIN_ZOOM, MAX_ZOOM);

        if (self.zoom - old_zoom).abs() > f32::EPSILON {
            let world_after = self.world_to_screen(world_before);
            self.pan += mouse_pos - world_after;
        }
    }

    /// Union of the estimated bounds of every shape.
    pub fn content_bounds(&self) -> Option<egui::Rect> {
        self.shapes
            .iter()
            .map(shape_bounds)
            .reduce(|acc, rect| acc.union(rect))
    }
}

impl DrawingSurface for Whiteboard {
    fn is_ready(&self) -> bool {
        self.viewport.is_some()
    }

    fn select_all_shapes(&mut self) -> Vec<ShapeId> {
        self.shapes.iter().map(|shape| shape.id).collect()
    }

    fn delete_shapes(&mut self, ids: &[ShapeId]) {
        self.shapes.retain(|shape| !ids.contains(&shape.id));
    }

    fn create_shape(&mut self, shape: CanvasShape) -> Result<(), SurfaceError> {
        if !self.is_ready() {
            return Err(SurfaceError::NotReady);
        }
        if self.shapes.iter().any(|existing| existing.id == shape.id) {
            return Err(SurfaceError::DuplicateShape(shape.id));
        }
        if shape.text.trim().is_empty() {
            return Err(SurfaceError::Rejected("text shape without text".into()));
        }
        self.shapes.push(shape);
        Ok(())
    }

    fn zoom_to_fit(&mut self) {
        let (Some(viewport), Some(bounds)) = (self.viewport, self.content_bounds()) else {
            return;
        };

        let available = (viewport.size() - egui::vec2(FIT_PADDING, FIT_PADDING) * 2.0)
            .max(egui::vec2(1.0, 1.0));
        let size = bounds.size().max(egui::vec2(1.0, 1.0));
        self.zoom = (available.x / size.x)
            .min(available.y / size.y)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = viewport.size() * 0.5 - bounds.center().to_vec2() * self.zoom;
    }

    fn set_camera(&mut self, position: (f32, f32), zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = -egui::vec2(position.0, position.1) * self.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShapeKind, ShapeStyle};

    fn mounted() -> Whiteboard {
        let mut board = Whiteboard::default();
        board.mount(egui::Rect::from_min_size(
            egui::pos2(100.0, 50.0),
            egui::vec2(800.0, 600.0),
        ));
        board
    }

    fn text_shape(text: &str, position: (f32, f32)) -> CanvasShape {
        CanvasShape::new(ShapeKind::StepText, position, text.into(), ShapeStyle::STEP)
    }

    #[test]
    fn unmounted_board_rejects_shapes() {
        let mut board = Whiteboard::default();
        assert!(!board.is_ready());
        assert_eq!(
            board.create_shape(text_shape("a", (0.0, 0.0))),
            Err(SurfaceError::NotReady)
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut board = mounted();
        let shape = text_shape("a", (0.0, 0.0));
        board.create_shape(shape.clone()).unwrap();
        assert_eq!(
            board.create_shape(shape.clone()),
            Err(SurfaceError::DuplicateShape(shape.id))
        );
    }

    #[test]
    fn select_all_then_delete_empties_board() {
        let mut board = mounted();
        board.create_shape(text_shape("a", (0.0, 0.0))).unwrap();
        board.create_shape(text_shape("b", (0.0, 40.0))).unwrap();

        let ids = board.select_all_shapes();
        assert_eq!(ids.len(), 2);

        board.delete_shapes(&ids);
        assert!(board.shapes().is_empty());
    }

    #[test]
    fn canonical_camera_puts_world_origin_at_viewport_corner() {
        let mut board = mounted();
        board.zoom = 3.0;
        board.pan = egui::vec2(-250.0, 75.0);

        board.set_camera((0.0, 0.0), 1.0);
        assert_eq!(board.world_to_screen(egui::pos2(0.0, 0.0)), egui::pos2(100.0, 50.0));
        assert_eq!(board.world_to_screen(egui::pos2(10.0, 50.0)), egui::pos2(110.0, 100.0));
    }

    #[test]
    fn screen_world_round_trip() {
        let mut board = mounted();
        board.set_camera((30.0, -20.0), 2.0);
        let world = egui::pos2(12.0, 34.0);
        let back = board.screen_to_world(board.world_to_screen(world));
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn zoom_to_fit_keeps_content_inside_viewport() {
        let mut board = mounted();
        board.create_shape(text_shape("1. a rather long step description", (20.0, 90.0))).unwrap();
        board.create_shape(text_shape("2. b", (20.0, 2000.0))).unwrap();

        board.zoom_to_fit();
        let bounds = board.content_bounds().unwrap();
        let viewport = board.viewport().unwrap();
        let min = board.world_to_screen(bounds.min);
        let max = board.world_to_screen(bounds.max);
        assert!(viewport.contains(min));
        assert!(viewport.contains(max));
        assert!(board.zoom < 1.0);
    }

    #[test]
    fn zoom_to_fit_without_shapes_leaves_camera() {
        let mut board = mounted();
        board.set_camera((5.0, 5.0), 2.0);
        board.zoom_to_fit();
        assert_eq!(board.zoom, 2.0);
        assert_eq!(board.pan, egui::vec2(-10.0, -10.0));
    }
}
