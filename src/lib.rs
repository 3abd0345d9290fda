//! # CodeCanvas
//!
//! An algorithm tutor: the user asks about an algorithm in a chat panel, a language model
//! answers with an explanation, pseudocode and an implementation in the chosen language,
//! and the numbered pseudocode steps are projected onto a whiteboard next to the chat.
//!
//! ## Pipeline
//! - **Prompt composer** ([`prompt`]): turns a question and a language into model input
//! - **Step extractor** ([`steps`]): pulls at most five numbered steps out of the answer
//! - **Canvas projector** ([`projector`]): replaces the whiteboard content with a heading
//!   and one row per step, deferred and superseded by newer answers
//!
//! ## Features
//! - Structured or conversational prompting
//! - Syntax highlighted code blocks with copy buttons
//! - Whiteboard panning, zooming and fit-to-content
//! - Dark and light themes, remembered between runs

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod model;
pub mod projector;
pub mod prompt;
pub mod session;
pub mod steps;
pub mod types;
mod ui;

// Re-export public types and functions
pub use config::ModelConfig;
pub use model::{GeminiClient, ModelClient, ModelError};
pub use projector::{project, DrawingSurface, SurfaceError, VisualizationScheduler};
pub use prompt::{compose, PromptRequest};
pub use session::{ChatSession, ConversationLog};
pub use steps::{extract_steps, StepList};
pub use types::*;
pub use ui::{CodeCanvasApp, Whiteboard};

/// Runs the CodeCanvas application.
///
/// This function initializes the egui application window, restores the remembered UI
/// settings and starts the main event loop. Model calls are spawned on the ambient tokio
/// runtime, so callers should enter one first.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let runtime = tokio::runtime::Runtime::new()?;
///     let _guard = runtime.enter();
///     code_canvas::run_app()?;
///     Ok(())
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CodeCanvas",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| match CodeCanvasApp::from_json(&json) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        log::warn!("Ignoring unreadable saved state: {err}");
                        None
                    }
                })
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}
