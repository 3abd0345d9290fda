//! Projection of extracted steps onto a drawing surface.
//!
//! Every projection is a full replace: existing shapes are deleted, then one heading and
//! one text shape per step are created at a fixed grid layout, and the camera is refit.
//! [`VisualizationScheduler`] adds the deferred timing and discards work belonging to
//! older responses using a generation counter.

use crate::constants::{
    CAMERA_SETTLE_DELAY, CANONICAL_CAMERA_POSITION, CANONICAL_CAMERA_ZOOM, HEADING_POSITION,
    HEADING_TEXT, PROJECTION_DELAY, STEP_BASE_Y, STEP_OFFSET_X, STEP_ROW_HEIGHT,
};
use crate::steps::StepList;
use crate::types::{CanvasShape, ShapeId, ShapeKind, ShapeStyle};
use std::time::Instant;

/// Errors raised by a drawing surface while mutating shapes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The surface has not been mounted yet
    #[error("drawing surface is not ready")]
    NotReady,
    /// A shape with this id already exists
    #[error("shape {0} already exists")]
    DuplicateShape(ShapeId),
    /// The surface refused the shape for another reason
    #[error("shape rejected: {0}")]
    Rejected(String),
}

/// Command sink for the whiteboard the steps are drawn on.
///
/// The projector never reads shape contents back; it only asks for the ids of every
/// current shape in order to clear them.
pub trait DrawingSurface {
    /// Whether the surface has been mounted and accepts commands.
    fn is_ready(&self) -> bool;

    /// Selects every shape and returns their ids.
    fn select_all_shapes(&mut self) -> Vec<ShapeId>;

    /// Deletes the given shapes; unknown ids are ignored.
    fn delete_shapes(&mut self, ids: &[ShapeId]);

    /// Adds a shape.
    fn create_shape(&mut self, shape: CanvasShape) -> Result<(), SurfaceError>;

    /// Moves and zooms the camera so every shape is visible.
    fn zoom_to_fit(&mut self);

    /// Places the camera at `position` (world units) with the given zoom.
    fn set_camera(&mut self, position: (f32, f32), zoom: f32);
}

/// Computes the shapes for a step list: a heading followed by one numbered row per step.
///
/// Returns nothing for an empty list. Each call generates fresh shape ids.
pub fn layout_shapes(steps: &StepList) -> Vec<CanvasShape> {
    if steps.is_empty() {
        return Vec::new();
    }

    let mut shapes = Vec::with_capacity(steps.len() + 1);
    shapes.push(CanvasShape::new(
        ShapeKind::Label,
        HEADING_POSITION,
        HEADING_TEXT.to_string(),
        ShapeStyle::HEADING,
    ));

    for (index, step) in steps.iter().enumerate() {
        shapes.push(CanvasShape::new(
            ShapeKind::StepText,
            step_position(index),
            format!("{}. {}", index + 1, step),
            ShapeStyle::STEP,
        ));
    }

    shapes
}

/// World position of the step row at `index` (0-based).
pub fn step_position(index: usize) -> (f32, f32) {
    (STEP_OFFSET_X, STEP_BASE_Y + index as f32 * STEP_ROW_HEIGHT)
}

/// Clears the surface and draws `steps` on it.
///
/// # Returns
///
/// The number of shapes created, or the first surface error encountered.
pub fn replace_shapes(
    steps: &StepList,
    surface: &mut dyn DrawingSurface,
) -> Result<usize, SurfaceError> {
    if !surface.is_ready() {
        return Err(SurfaceError::NotReady);
    }

    let existing = surface.select_all_shapes();
    surface.delete_shapes(&existing);

    let shapes = layout_shapes(steps);
    let count = shapes.len();
    for shape in shapes {
        surface.create_shape(shape)?;
    }
    Ok(count)
}

/// Fits the view to the drawn shapes, then restores the canonical camera.
pub fn refit_camera(surface: &mut dyn DrawingSurface) {
    surface.zoom_to_fit();
    surface.set_camera(CANONICAL_CAMERA_POSITION, CANONICAL_CAMERA_ZOOM);
}

/// Projects `steps` onto `surface` immediately.
///
/// Failures are logged and swallowed so a broken canvas never disturbs the chat.
pub fn project(steps: &StepList, surface: &mut dyn DrawingSurface) {
    match replace_shapes(steps, surface) {
        Ok(0) => {}
        Ok(_) => refit_camera(surface),
        Err(err) => log::error!("Error creating text: {err}"),
    }
}

/// Monotonically increasing id of a visualization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

#[derive(Debug, Clone)]
enum Task {
    Project(StepList),
    Refit,
}

#[derive(Debug, Clone)]
struct PendingTask {
    generation: Generation,
    due_at: Instant,
    task: Task,
}

/// What a call to [`VisualizationScheduler::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollOutcome {
    /// Shapes created by a projection that ran
    pub shapes_created: usize,
    /// Whether a camera refit ran
    pub refit: bool,
    /// Tasks dropped because a newer generation superseded them
    pub discarded: usize,
}

/// Defers projections and drops those superseded by a newer response.
///
/// Each [`schedule`](Self::schedule) call bumps the generation. Queued work captures the
/// generation it was scheduled under and is discarded when it comes due if that is no
/// longer the current one, so the surface never shows an older turn after a newer one.
#[derive(Debug, Default)]
pub struct VisualizationScheduler {
    generation: Generation,
    queue: Vec<PendingTask>,
}

impl VisualizationScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// The generation of the most recent request.
    pub fn current_generation(&self) -> Generation {
        self.generation
    }

    /// Queues a projection of `steps`, due after [`PROJECTION_DELAY`].
    ///
    /// # Arguments
    ///
    /// * `steps` - Steps of the newest response
    /// * `now` - Current time
    ///
    /// # Returns
    ///
    /// The generation assigned to this request.
    pub fn schedule(&mut self, steps: StepList, now: Instant) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.queue.push(PendingTask {
            generation: self.generation,
            due_at: now + PROJECTION_DELAY,
            task: Task::Project(steps),
        });
        self.generation
    }

    /// Makes every queued task stale.
    pub fn cancel(&mut self) {
        self.generation = Generation(self.generation.0 + 1);
    }

    /// Whether any task (stale or current) is still queued.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Earliest time at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.iter().map(|task| task.due_at).min()
    }

    /// Runs every task that is due at `now`.
    ///
    /// Stale tasks are discarded. A due projection waits in the queue while the surface
    /// is not ready. After a projection that created shapes, a camera refit is queued
    /// [`CAMERA_SETTLE_DELAY`] later under the same generation.
    pub fn poll(&mut self, now: Instant, surface: &mut dyn DrawingSurface) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|task| task.due_at <= now);
        self.queue = waiting;

        for pending in due {
            if pending.generation != self.generation {
                log::debug!(
                    "Discarding visualization for generation {} (current {})",
                    pending.generation.0,
                    self.generation.0
                );
                outcome.discarded += 1;
                continue;
            }

            match pending.task {
                Task::Project(steps) => {
                    if !surface.is_ready() {
                        self.queue.push(PendingTask {
                            generation: pending.generation,
                            due_at: pending.due_at,
                            task: Task::Project(steps),
                        });
                        continue;
                    }
                    match replace_shapes(&steps, surface) {
                        Ok(0) => {}
                        Ok(created) => {
                            outcome.shapes_created = created;
                            self.queue.push(PendingTask {
                                generation: pending.generation,
                                due_at: now + CAMERA_SETTLE_DELAY,
                                task: Task::Refit,
                            });
                        }
                        Err(err) => log::error!("Error creating text: {err}"),
                    }
                }
                Task::Refit => {
                    refit_camera(surface);
                    outcome.refit = true;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::extract_steps;
    use std::time::Duration;

    /// In-memory surface recording every command it receives.
    #[derive(Default)]
    struct RecordingSurface {
        ready: bool,
        shapes: Vec<CanvasShape>,
        fail_after: Option<usize>,
        fits: usize,
        cameras: Vec<((f32, f32), f32)>,
    }

    impl RecordingSurface {
        fn ready() -> Self {
            Self {
                ready: true,
                ..Default::default()
            }
        }

        fn texts(&self) -> Vec<&str> {
            self.shapes.iter().map(|s| s.text.as_str()).collect()
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn select_all_shapes(&mut self) -> Vec<ShapeId> {
            self.shapes.iter().map(|s| s.id).collect()
        }

        fn delete_shapes(&mut self, ids: &[ShapeId]) {
            self.shapes.retain(|s| !ids.contains(&s.id));
        }

        fn create_shape(&mut self, shape: CanvasShape) -> Result<(), SurfaceError> {
            if self.fail_after == Some(self.shapes.len()) {
                return Err(SurfaceError::Rejected("boom".into()));
            }
            self.shapes.push(shape);
            Ok(())
        }

        fn zoom_to_fit(&mut self) {
            self.fits += 1;
        }

        fn set_camera(&mut self, position: (f32, f32), zoom: f32) {
            self.cameras.push((position, zoom));
        }
    }

    fn steps(lines: &[&str]) -> StepList {
        let mut text = String::from("Pseudocode:\n");
        for (i, line) in lines.iter().enumerate() {
            text.push_str(&format!("{}) {}\n", i + 1, line));
        }
        extract_steps(&text)
    }

    #[test]
    fn layout_places_heading_then_rows() {
        let shapes = layout_shapes(&steps(&["x", "y"]));
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0].kind, ShapeKind::Label);
        assert_eq!(shapes[0].position, HEADING_POSITION);
        assert_eq!(shapes[0].style, ShapeStyle::HEADING);
        assert_eq!(shapes[1].text, "1. x");
        assert_eq!(shapes[1].position, (20.0, 90.0));
        assert_eq!(shapes[2].text, "2. y");
        assert_eq!(shapes[2].position, (20.0, 130.0));
        assert_eq!(shapes[2].style, ShapeStyle::STEP);
    }

    #[test]
    fn project_empty_clears_and_creates_nothing() {
        let mut surface = RecordingSurface::ready();
        project(&steps(&["old"]), &mut surface);
        assert_eq!(surface.shapes.len(), 2);

        project(&StepList::default(), &mut surface);
        assert!(surface.shapes.is_empty());
    }

    #[test]
    fn project_twice_does_not_duplicate() {
        let mut surface = RecordingSurface::ready();
        let list = steps(&["x", "y"]);
        project(&list, &mut surface);
        project(&list, &mut surface);

        assert_eq!(surface.texts(), vec![HEADING_TEXT, "1. x", "2. y"]);
        let headings = surface
            .shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::Label)
            .count();
        assert_eq!(headings, 1);
    }

    #[test]
    fn project_refits_then_resets_camera() {
        let mut surface = RecordingSurface::ready();
        project(&steps(&["x"]), &mut surface);
        assert_eq!(surface.fits, 1);
        assert_eq!(surface.cameras, vec![((0.0, 0.0), 1.0)]);
    }

    #[test]
    fn project_on_unready_surface_is_swallowed() {
        let mut surface = RecordingSurface::default();
        project(&steps(&["x"]), &mut surface);
        assert!(surface.shapes.is_empty());
        assert_eq!(surface.fits, 0);
    }

    #[test]
    fn creation_failure_is_reported_by_replace_and_swallowed_by_project() {
        let mut surface = RecordingSurface {
            fail_after: Some(1),
            ..RecordingSurface::ready()
        };
        let list = steps(&["x", "y"]);
        assert!(matches!(
            replace_shapes(&list, &mut surface),
            Err(SurfaceError::Rejected(_))
        ));

        project(&list, &mut surface);
        assert_eq!(surface.cameras.len(), 0);
    }

    #[test]
    fn two_sum_projection_orders_rows_downwards() {
        let text = "Pseudocode:\n1) Scan array\n2) Track seen values\n3) Check complement\n4) Return pair\n5) Return empty if none";
        let mut surface = RecordingSurface::ready();
        project(&extract_steps(text), &mut surface);

        assert_eq!(surface.shapes.len(), 6);
        assert_eq!(surface.shapes[0].kind, ShapeKind::Label);
        let rows = &surface.shapes[1..];
        assert!(rows.iter().all(|s| s.kind == ShapeKind::StepText));
        assert!(rows.windows(2).all(|w| w[0].position.1 < w[1].position.1));
        assert_eq!(rows[0].text, "1. Scan array");
        assert_eq!(rows[4].text, "5. Return empty if none");
    }

    #[test]
    fn scheduled_projection_waits_for_delay() {
        let start = Instant::now();
        let mut scheduler = VisualizationScheduler::new();
        let mut surface = RecordingSurface::ready();
        scheduler.schedule(steps(&["x"]), start);

        let early = scheduler.poll(start + Duration::from_millis(299), &mut surface);
        assert_eq!(early, PollOutcome::default());
        assert!(surface.shapes.is_empty());
        assert_eq!(scheduler.next_deadline(), Some(start + PROJECTION_DELAY));

        let on_time = scheduler.poll(start + PROJECTION_DELAY, &mut surface);
        assert_eq!(on_time.shapes_created, 2);
        assert!(!on_time.refit);
        assert_eq!(surface.fits, 0);

        let refit_at = start + PROJECTION_DELAY + CAMERA_SETTLE_DELAY;
        assert_eq!(scheduler.next_deadline(), Some(refit_at));
        let settled = scheduler.poll(refit_at, &mut surface);
        assert!(settled.refit);
        assert_eq!(surface.cameras, vec![((0.0, 0.0), 1.0)]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn newer_response_supersedes_pending_one() {
        let start = Instant::now();
        let mut scheduler = VisualizationScheduler::new();
        let mut surface = RecordingSurface::ready();

        let first = scheduler.schedule(steps(&["old a", "old b"]), start);
        let second = scheduler.schedule(steps(&["new"]), start + Duration::from_millis(50));
        assert!(second > first);

        let outcome = scheduler.poll(start + Duration::from_secs(1), &mut surface);
        assert_eq!(outcome.discarded, 1);
        assert_eq!(surface.texts(), vec![HEADING_TEXT, "1. new"]);

        scheduler.poll(start + Duration::from_secs(2), &mut surface);
        assert_eq!(surface.texts(), vec![HEADING_TEXT, "1. new"]);
    }

    #[test]
    fn stale_refit_is_dropped_after_new_schedule() {
        let start = Instant::now();
        let mut scheduler = VisualizationScheduler::new();
        let mut surface = RecordingSurface::ready();

        scheduler.schedule(steps(&["x"]), start);
        scheduler.poll(start + PROJECTION_DELAY, &mut surface);
        scheduler.schedule(StepList::default(), start + PROJECTION_DELAY);

        let outcome = scheduler.poll(start + Duration::from_secs(5), &mut surface);
        assert_eq!(outcome.discarded, 1);
        assert!(!outcome.refit);
        assert!(surface.shapes.is_empty());
        assert_eq!(surface.fits, 0);
    }

    #[test]
    fn projection_waits_until_surface_is_ready() {
        let start = Instant::now();
        let mut scheduler = VisualizationScheduler::new();
        let mut surface = RecordingSurface::default();

        scheduler.schedule(steps(&["x"]), start);
        let outcome = scheduler.poll(start + Duration::from_secs(1), &mut surface);
        assert_eq!(outcome.shapes_created, 0);
        assert!(scheduler.has_pending());

        surface.ready = true;
        let outcome = scheduler.poll(start + Duration::from_secs(2), &mut surface);
        assert_eq!(outcome.shapes_created, 2);
    }

    #[test]
    fn cancel_makes_queued_work_stale() {
        let start = Instant::now();
        let mut scheduler = VisualizationScheduler::new();
        let mut surface = RecordingSurface::ready();

        scheduler.schedule(steps(&["x"]), start);
        scheduler.cancel();
        let outcome = scheduler.poll(start + Duration::from_secs(1), &mut surface);
        assert_eq!(outcome.discarded, 1);
        assert!(surface.shapes.is_empty());
        assert!(!scheduler.has_pending());
    }
}
