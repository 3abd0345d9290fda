//! Shared application-wide constants.
//! Centralizes tweakable values used by step extraction, projection, the model call and the UI.

use std::time::Duration;

// Step extraction
/// Maximum number of pseudocode steps kept from a single response.
pub const MAX_STEPS: usize = 5;
/// Lower-cased markers that open the pseudocode section of a response.
pub const SECTION_TRIGGERS: [&str; 2] = ["pseudocode", "algorithm steps"];

// Projection layout (world units)
/// Text of the heading label drawn above the steps.
pub const HEADING_TEXT: &str = "Algorithm Steps";
/// Anchor of the heading label.
pub const HEADING_POSITION: (f32, f32) = (10.0, 50.0);
/// Horizontal offset shared by every step row.
pub const STEP_OFFSET_X: f32 = 20.0;
/// Vertical offset of the first step row.
pub const STEP_BASE_Y: f32 = 90.0;
/// Vertical distance between consecutive step rows.
pub const STEP_ROW_HEIGHT: f32 = 40.0;

// Projection timing
/// Delay between a response arriving and its steps being drawn.
pub const PROJECTION_DELAY: Duration = Duration::from_millis(300);
/// Delay between shape creation and the camera refit.
pub const CAMERA_SETTLE_DELAY: Duration = Duration::from_millis(100);
/// Camera position restored after every refit.
pub const CANONICAL_CAMERA_POSITION: (f32, f32) = (0.0, 0.0);
/// Zoom level restored after every refit.
pub const CANONICAL_CAMERA_ZOOM: f32 = 1.0;

// Whiteboard
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;
/// Smallest zoom factor reachable by scrolling or fitting.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest zoom factor reachable by scrolling or fitting.
pub const MAX_ZOOM: f32 = 5.0;
/// Margin (in screen pixels) kept around shapes when zooming to fit.
pub const FIT_PADDING: f32 = 32.0;
/// Font size (world units) of heading labels.
pub const LABEL_FONT_SIZE: f32 = 20.0;
/// Font size (world units) of step text.
pub const STEP_FONT_SIZE: f32 = 14.0;

// Model call
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Base URL of the hosted model API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Output token cap sent with every request.
pub const MAX_OUTPUT_TOKENS: u32 = 2048;
/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;
/// Assistant text shown when the model call fails or returns nothing.
pub const FALLBACK_RESPONSE: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

// Conversation
/// Number of prior turns replayed to the model in conversational mode.
pub const CONVERSATION_HISTORY_TURNS: usize = 6;
