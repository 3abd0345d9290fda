//! Core data types shared by the prompt, extraction and projection pipeline.
//!
//! This module defines the conversation model, the target languages offered to the user,
//! and the shapes that get drawn on the whiteboard.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for shapes on the drawing surface.
pub type ShapeId = Uuid;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    /// The person asking questions
    User,
    /// The language model answering them
    Assistant,
}

/// A single message in the chat transcript.
///
/// Turns are created when the user submits input or a response arrives and are
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    /// Who wrote the message
    pub role: Role,
    /// Raw message text (markdown for assistant turns)
    pub content: String,
}

impl ConversationTurn {
    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Programming languages the implementation section can be requested in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    /// Python
    #[default]
    Python,
    /// C
    C,
    /// C++
    Cpp,
    /// Java
    Java,
    /// JavaScript
    JavaScript,
}

impl Language {
    /// Every selectable language, in the order shown by the language picker.
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::JavaScript,
    ];

    /// Human readable name, as interpolated into prompts.
    pub fn label(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
        }
    }

    /// Resolves a markdown code-fence tag (`py`, `cpp`, `js`, ...) to a language.
    ///
    /// # Arguments
    ///
    /// * `tag` - The info string following the opening fence
    ///
    /// # Returns
    ///
    /// The matching language, or `None` for unknown or empty tags.
    pub fn from_fence_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "python" | "py" | "python3" => Some(Language::Python),
            "c" | "h" => Some(Language::C),
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            "javascript" | "js" | "jsx" | "mjs" => Some(Language::JavaScript),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the prompt is phrased for the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Rigid five-section explanation with exactly five pseudocode steps
    #[default]
    Structured,
    /// Free-form answer that replays recent conversation history
    Conversational,
}

impl InteractionMode {
    /// Short label for toggles and status text.
    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::Structured => "Structured",
            InteractionMode::Conversational => "Conversational",
        }
    }
}

/// Role a shape plays in a visualization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShapeKind {
    /// Heading drawn above the steps
    Label,
    /// One numbered pseudocode step
    StepText,
}

/// Colors understood by the drawing surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShapeColor {
    /// Accent color used for headings
    Blue,
    /// Foreground color (follows the theme)
    Black,
}

/// Text sizes understood by the drawing surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TextSize {
    /// Body text
    Small,
    /// Heading text
    Medium,
}

/// Visual styling attached to a created shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShapeStyle {
    /// Text color
    pub color: ShapeColor,
    /// Text size
    pub size: TextSize,
}

impl ShapeStyle {
    /// Styling of the heading label.
    pub const HEADING: ShapeStyle = ShapeStyle {
        color: ShapeColor::Blue,
        size: TextSize::Medium,
    };

    /// Styling of step text.
    pub const STEP: ShapeStyle = ShapeStyle {
        color: ShapeColor::Black,
        size: TextSize::Small,
    };
}

/// A text shape placed on the drawing surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasShape {
    /// Unique identifier for this shape
    pub id: ShapeId,
    /// Whether this is the heading or a step
    pub kind: ShapeKind,
    /// Top-left anchor in world coordinates
    pub position: (f32, f32),
    /// Displayed text
    pub text: String,
    /// Color and size
    pub style: ShapeStyle,
}

impl CanvasShape {
    /// Creates a shape with a fresh identifier.
    ///
    /// # Arguments
    ///
    /// * `kind` - Heading or step
    /// * `position` - The (x, y) anchor in world coordinates
    /// * `text` - The text to display
    /// * `style` - Color and size
    pub fn new(kind: ShapeKind, position: (f32, f32), text: String, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            text,
            style,
        }
    }
}
