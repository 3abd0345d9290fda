//! Application state management structures.
//!
//! This module contains the main application struct and the state it tracks between
//! frames: the chat session, the whiteboard, pending visualizations and in-flight
//! model calls.

use super::canvas::Whiteboard;
use crate::config::ModelConfig;
use crate::model::{GeminiClient, ModelClient, ModelError};
use crate::projector::VisualizationScheduler;
use crate::session::{ChatSession, RequestId};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Message sent from an async model call back to the UI thread.
#[derive(Debug)]
pub struct ModelOperationResult {
    /// Submission the result belongs to
    pub request_id: RequestId,
    /// Model text or the failure
    pub result: Result<String, ModelError>,
}

/// State of the chat panel.
pub struct ChatState {
    /// Text currently typed in the input field
    pub input: String,
    /// Channel for sending model results from async tasks
    pub results_sender: Sender<ModelOperationResult>,
    /// Channel for receiving model results on the UI thread
    pub results_receiver: Receiver<ModelOperationResult>,
    /// Log index of the assistant turn most recently handed to the scheduler
    pub visualized_turn: Option<usize>,
    /// Flag to scroll the transcript to its end on the next frame
    pub scroll_to_bottom: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        let (results_sender, results_receiver) = channel();
        Self {
            input: String::new(),
            results_sender,
            results_receiver,
            visualized_turn: None,
            scroll_to_bottom: false,
        }
    }
}

fn default_model_client() -> Arc<dyn ModelClient> {
    Arc::new(GeminiClient::new(ModelConfig::from_env()))
}

/// The main application structure.
///
/// Only UI settings are persisted; the conversation itself lives in memory for the
/// lifetime of the window.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CodeCanvasApp {
    /// Chat session; only its language and interaction mode are persisted
    pub session: ChatSession,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Whether the whiteboard grid is drawn
    pub show_grid: bool,
    /// Remembered width of the chat panel across sessions
    pub chat_panel_width: f32,
    /// Chat panel state
    #[serde(skip)]
    pub chat: ChatState,
    /// The drawing surface
    #[serde(skip)]
    pub whiteboard: Whiteboard,
    /// Deferred projections of the latest response
    #[serde(skip)]
    pub scheduler: VisualizationScheduler,
    /// Whether the window is fullscreen
    #[serde(skip)]
    pub fullscreen: bool,
    #[serde(skip, default = "default_model_client")]
    model: Arc<dyn ModelClient>,
}

impl Default for CodeCanvasApp {
    fn default() -> Self {
        Self::with_client(default_model_client())
    }
}

impl CodeCanvasApp {
    /// Creates an app that sends prompts through `model`.
    pub fn with_client(model: Arc<dyn ModelClient>) -> Self {
        Self {
            session: ChatSession::default(),
            dark_mode: true,
            show_grid: true,
            chat_panel_width: 480.0,
            chat: ChatState::default(),
            whiteboard: Whiteboard::default(),
            scheduler: VisualizationScheduler::new(),
            fullscreen: false,
            model,
        }
    }

    /// The client model calls are sent through.
    pub fn model(&self) -> Arc<dyn ModelClient> {
        Arc::clone(&self.model)
    }

    /// Serializes the persisted settings to JSON.
    ///
    /// # Returns
    ///
    /// A JSON string representation of the settings, or an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores persisted settings from JSON.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON string produced by [`to_json`](Self::to_json)
    ///
    /// # Returns
    ///
    /// A `CodeCanvasApp` instance, or an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
