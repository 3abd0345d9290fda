//! The chat panel: transcript, language picker, suggestions and question input.
//!
//! Questions are sent to the model on the tokio runtime; results come back over the
//! channel in [`ChatState`](super::state::ChatState) and are applied on the UI thread.

use super::highlighters::highlight_code;
use super::state::{CodeCanvasApp, ModelOperationResult};
use crate::model::ModelError;
use crate::types::{ConversationTurn, Language, Role};
use eframe::egui;

/// Example questions offered while the conversation is empty.
pub const SUGGESTIONS: [&str; 3] = [
    "Explain the Two Sum problem",
    "How to solve Valid Parentheses?",
    "Implement Binary Search on a Sorted Array",
];

/// A piece of an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBlock {
    /// Prose between code fences
    Text(String),
    /// A fenced code block
    Code {
        /// Language named after the opening fence, if recognized
        language: Option<Language>,
        /// Code without the fences
        code: String,
    },
}

/// Splits a message into prose and fenced code blocks.
///
/// An unterminated fence runs to the end of the message. Blank prose between blocks is
/// dropped.
pub fn split_message(content: &str) -> Vec<MessageBlock> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut code: Option<(Option<Language>, String)> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        match code.take() {
            Some((language, body)) if trimmed.starts_with("```") => {
                blocks.push(MessageBlock::Code { language, code: body });
            }
            Some((language, mut body)) => {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(line);
                code = Some((language, body));
            }
            None if trimmed.starts_with("```") => {
                push_text(&mut blocks, &mut text);
                let tag = trimmed.trim_start_matches('`').trim();
                code = Some((Language::from_fence_tag(tag), String::new()));
            }
            None => {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(line);
            }
        }
    }

    if let Some((language, body)) = code {
        blocks.push(MessageBlock::Code { language, code: body });
    }
    push_text(&mut blocks, &mut text);
    blocks
}

fn push_text(blocks: &mut Vec<MessageBlock>, text: &mut String) {
    let prose = std::mem::take(text);
    if !prose.trim().is_empty() {
        blocks.push(MessageBlock::Text(prose.trim().to_string()));
    }
}

impl CodeCanvasApp {
    /// Draws the chat panel.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI of the side panel
    pub fn draw_chat_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Code");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::ComboBox::from_id_salt("language_combo")
                    .selected_text(self.session.language.label())
                    .show_ui(ui, |ui| {
                        for language in Language::ALL {
                            ui.selectable_value(
                                &mut self.session.language,
                                language,
                                language.label(),
                            );
                        }
                    });
            });
        });
        ui.separator();

        let input_height = 64.0;
        let transcript_height = (ui.available_height() - input_height).max(80.0);
        let mut picked_suggestion = None;

        egui::ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(transcript_height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.session.log().is_empty() {
                    picked_suggestion = draw_suggestions(ui);
                }
                for turn in self.session.log().turns() {
                    draw_turn(ui, turn, self.dark_mode);
                    ui.add_space(8.0);
                }
                if self.session.is_busy() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Thinking...");
                    });
                }
                if self.chat.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    self.chat.scroll_to_bottom = false;
                }
            });

        ui.separator();
        let busy = self.session.is_busy();
        let mut send = false;
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.chat.input)
                    .hint_text("Ask about an algorithm...")
                    .desired_width(ui.available_width() - 64.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send = true;
            }
            let can_send = !busy && !self.chat.input.trim().is_empty();
            if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
                send = true;
            }
        });

        if let Some(suggestion) = picked_suggestion {
            self.submit_question(ui.ctx(), suggestion);
        } else if send {
            let question = std::mem::take(&mut self.chat.input);
            if !self.submit_question(ui.ctx(), &question) {
                self.chat.input = question;
            }
        }
    }

    /// Records a question and sends its prompt to the model.
    ///
    /// The call runs on the current tokio runtime; without one the question is answered
    /// with the fallback message.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context repainted when the result arrives
    /// * `question` - Raw user input
    ///
    /// # Returns
    ///
    /// `false` if the session refused the question (blank input or a call in flight).
    pub fn submit_question(&mut self, ctx: &egui::Context, question: &str) -> bool {
        let Some(outgoing) = self.session.submit(question) else {
            return false;
        };
        self.chat.scroll_to_bottom = true;
        log::info!(
            "Sending question in {} ({})",
            outgoing.prompt.language,
            outgoing.mode.label()
        );

        let request_id = outgoing.request_id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let model = self.model();
                let sender = self.chat.results_sender.clone();
                let ctx = ctx.clone();
                let prompt = outgoing.prompt.rendered;
                handle.spawn(async move {
                    let result = model.send_prompt(&prompt).await;
                    let _ = sender.send(ModelOperationResult { request_id, result });
                    ctx.request_repaint();
                });
            }
            Err(err) => {
                self.session
                    .complete(request_id, Err(ModelError::Dispatch(err.to_string())));
            }
        }
        true
    }

    /// Applies every model result that has arrived since the last frame.
    pub fn handle_model_results(&mut self) {
        while let Ok(message) = self.chat.results_receiver.try_recv() {
            if self
                .session
                .complete(message.request_id, message.result)
                .is_some()
            {
                self.chat.scroll_to_bottom = true;
            }
        }
    }
}

fn draw_suggestions(ui: &mut egui::Ui) -> Option<&'static str> {
    let mut picked = None;
    ui.add_space(12.0);
    ui.weak("Try asking:");
    for suggestion in SUGGESTIONS {
        if ui.button(suggestion).clicked() {
            picked = Some(suggestion);
        }
    }
    picked
}

fn draw_turn(ui: &mut egui::Ui, turn: &ConversationTurn, dark_mode: bool) {
    match turn.role {
        Role::User => {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().selection.bg_fill.gamma_multiply(0.4))
                    .show(ui, |ui| {
                        ui.label(&turn.content);
                    });
            });
        }
        Role::Assistant => {
            for block in split_message(&turn.content) {
                match block {
                    MessageBlock::Text(text) => {
                        ui.label(text);
                    }
                    MessageBlock::Code { language, code } => {
                        draw_code_block(ui, language, &code, dark_mode);
                    }
                }
            }
        }
    }
}

fn draw_code_block(ui: &mut egui::Ui, language: Option<Language>, code: &str, dark_mode: bool) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.weak(language.map(|l| l.label()).unwrap_or("code"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Copy").clicked() {
                        ui.ctx().copy_text(code.to_string());
                    }
                });
            });
            let job = highlight_code(code, language, egui::FontId::monospace(12.0), dark_mode);
            ui.label(job);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_is_one_text_block() {
        assert_eq!(
            split_message("Hello\nthere"),
            vec![MessageBlock::Text("Hello\nthere".into())]
        );
    }

    #[test]
    fn fenced_code_is_split_out_with_its_language() {
        let message = "Implementation:\n```python\ndef f():\n    return 1\n```\nDone.";
        assert_eq!(
            split_message(message),
            vec![
                MessageBlock::Text("Implementation:".into()),
                MessageBlock::Code {
                    language: Some(Language::Python),
                    code: "def f():\n    return 1".into(),
                },
                MessageBlock::Text("Done.".into()),
            ]
        );
    }

    #[test]
    fn unknown_or_missing_fence_tag_has_no_language() {
        let blocks = split_message("```\nx\n```\n```rust\ny\n```");
        assert_eq!(
            blocks,
            vec![
                MessageBlock::Code { language: None, code: "x".into() },
                MessageBlock::Code { language: None, code: "y".into() },
            ]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let blocks = split_message("Code:\n```cpp\nint main() {}");
        assert_eq!(
            blocks[1],
            MessageBlock::Code {
                language: Some(Language::Cpp),
                code: "int main() {}".into(),
            }
        );
    }
}
