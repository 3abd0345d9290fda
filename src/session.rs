//! Chat session state: the conversation log and the single in-flight model request.

use crate::constants::FALLBACK_RESPONSE;
use crate::model::ModelError;
use crate::prompt::PromptRequest;
use crate::types::{ConversationTurn, InteractionMode, Language, Role};
use serde::{Deserialize, Serialize};

/// Ordered, append-only record of a session's turns.
///
/// Created when a session starts and cleared when it ends; the prompt composer reads it
/// by reference in conversational mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The last `count` turns, oldest first.
    pub fn recent(&self, count: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(count);
        &self.turns[start..]
    }

    /// Most recent assistant turn together with its index in the log.
    pub fn latest_assistant(&self) -> Option<(usize, &ConversationTurn)> {
        self.turns
            .iter()
            .enumerate()
            .rev()
            .find(|(_, turn)| turn.role == Role::Assistant)
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the log has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drops every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Identifier tying a model result back to the submission that caused it.
pub type RequestId = u64;

/// A prompt ready to be sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingPrompt {
    /// Pass back to [`ChatSession::complete`] with the result
    pub request_id: RequestId,
    /// Mode the prompt was composed in
    pub mode: InteractionMode,
    /// The composed prompt
    pub prompt: PromptRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request_id: RequestId,
    mode: InteractionMode,
}

/// A chat conversation with at most one model call in flight.
///
/// Only the language and interaction mode survive serialization; a restored session
/// starts with an empty log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSession {
    #[serde(skip)]
    log: ConversationLog,
    /// Language requested for implementations
    pub language: Language,
    /// Prompt phrasing
    pub mode: InteractionMode,
    #[serde(skip)]
    in_flight: Option<InFlight>,
    #[serde(skip)]
    next_request_id: RequestId,
    #[serde(skip)]
    latest_answer_mode: Option<InteractionMode>,
}

impl ChatSession {
    /// Starts an empty session.
    pub fn new(language: Language, mode: InteractionMode) -> Self {
        Self {
            language,
            mode,
            ..Self::default()
        }
    }

    /// The conversation so far.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Whether a model call is awaiting its result.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Records the user's question and composes the prompt for it.
    ///
    /// The prompt is composed against the history *before* the new question is appended.
    ///
    /// # Arguments
    ///
    /// * `question` - Raw input from the user
    ///
    /// # Returns
    ///
    /// The prompt to send, or `None` if the input is blank or a call is already in flight.
    pub fn submit(&mut self, question: &str) -> Option<OutgoingPrompt> {
        let question = question.trim();
        if question.is_empty() || self.is_busy() {
            return None;
        }

        let prompt = PromptRequest::new(question, self.language, self.mode, &self.log);
        self.log.push(ConversationTurn::user(question));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(InFlight {
            request_id,
            mode: self.mode,
        });

        Some(OutgoingPrompt {
            request_id,
            mode: self.mode,
            prompt,
        })
    }

    /// Applies the result of a model call.
    ///
    /// Failures and blank replies become the fixed fallback message so the conversation
    /// stays usable. Results for a request that is no longer in flight are ignored.
    ///
    /// # Returns
    ///
    /// The appended assistant turn, or `None` if the result was stale.
    pub fn complete(
        &mut self,
        request_id: RequestId,
        result: Result<String, ModelError>,
    ) -> Option<&ConversationTurn> {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.request_id == request_id => in_flight,
            _ => {
                log::debug!("Ignoring result for stale request {request_id}");
                return None;
            }
        };
        self.in_flight = None;
        self.latest_answer_mode = Some(in_flight.mode);

        let content = match result {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::error!("Error generating response: {}", ModelError::EmptyResponse);
                FALLBACK_RESPONSE.to_string()
            }
            Err(err) => {
                log::error!("Error generating response: {err}");
                FALLBACK_RESPONSE.to_string()
            }
        };

        self.log.push(ConversationTurn::assistant(content));
        self.log.turns().last()
    }

    /// Most recent assistant turn, its index in the log, and the mode its question was
    /// submitted in.
    ///
    /// The mode is the one captured at [`submit`](Self::submit), not the current
    /// [`mode`](Self::mode), which the user may have changed while the call was in flight.
    pub fn latest_answer(&self) -> Option<(usize, &ConversationTurn, InteractionMode)> {
        let mode = self.latest_answer_mode?;
        let (index, turn) = self.log.latest_assistant()?;
        Some((index, turn, mode))
    }

    /// Ends the session: clears the log and forgets any in-flight request.
    pub fn reset(&mut self) {
        self.log.clear();
        self.in_flight = None;
        self.latest_answer_mode = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_appends_user_turn_and_marks_busy() {
        let mut session = ChatSession::new(Language::Python, InteractionMode::Structured);
        let outgoing = session.submit("  Explain Two Sum  ").expect("prompt");

        assert!(session.is_busy());
        assert_eq!(session.log().turns(), &[ConversationTurn::user("Explain Two Sum")]);
        assert_eq!(outgoing.prompt.question, "Explain Two Sum");
        assert!(outgoing.prompt.rendered.contains("Explain Two Sum"));
        assert!(outgoing.prompt.rendered.contains("Python"));
    }

    #[test]
    fn blank_or_concurrent_submissions_are_rejected() {
        let mut session = ChatSession::default();
        assert!(session.submit("   ").is_none());
        assert!(session.log().is_empty());

        assert!(session.submit("first").is_some());
        assert!(session.submit("second").is_none());
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn successful_result_becomes_assistant_turn() {
        let mut session = ChatSession::default();
        let outgoing = session.submit("q").unwrap();
        let turn = session
            .complete(outgoing.request_id, Ok("Pseudocode:\n1) a".into()))
            .cloned()
            .unwrap();

        assert_eq!(turn, ConversationTurn::assistant("Pseudocode:\n1) a"));
        assert!(!session.is_busy());
    }

    #[test]
    fn failures_become_fallback_message() {
        let mut session = ChatSession::default();
        let outgoing = session.submit("q").unwrap();
        session.complete(
            outgoing.request_id,
            Err(ModelError::MissingApiKey("unset".into())),
        );
        let (_, latest) = session.log().latest_assistant().unwrap();
        assert_eq!(latest.content, FALLBACK_RESPONSE);

        let outgoing = session.submit("again").unwrap();
        session.complete(outgoing.request_id, Ok("   ".into()));
        let (index, latest) = session.log().latest_assistant().unwrap();
        assert_eq!(latest.content, FALLBACK_RESPONSE);
        assert_eq!(index, 3);
    }

    #[test]
    fn stale_results_are_ignored() {
        let mut session = ChatSession::default();
        let first = session.submit("q").unwrap();
        session.reset();
        let second = session.submit("q2").unwrap();

        assert!(session.complete(first.request_id, Ok("old".into())).is_none());
        assert!(session.is_busy());
        assert!(session.complete(second.request_id, Ok("new".into())).is_some());
        assert_eq!(session.log().len(), 2);
    }

    #[test]
    fn conversational_prompt_sees_prior_turns_only() {
        let mut session = ChatSession::new(Language::Java, InteractionMode::Conversational);
        let first = session.submit("What is a heap?").unwrap();
        assert!(!first.prompt.rendered.contains("Conversation so far"));
        session.complete(first.request_id, Ok("A tree-based structure.".into()));

        let second = session.submit("Show me one").unwrap();
        assert!(second.prompt.rendered.contains("Student: What is a heap?"));
        assert!(second.prompt.rendered.contains("Tutor: A tree-based structure."));
    }

    #[test]
    fn answer_keeps_mode_of_its_submission() {
        let mut session = ChatSession::new(Language::Python, InteractionMode::Structured);
        let outgoing = session.submit("Explain Two Sum").unwrap();
        assert_eq!(outgoing.mode, InteractionMode::Structured);

        session.mode = InteractionMode::Conversational;
        session.complete(outgoing.request_id, Ok("Pseudocode:\n1) a".into()));

        let (index, turn, mode) = session.latest_answer().unwrap();
        assert_eq!(index, 1);
        assert_eq!(turn.content, "Pseudocode:\n1) a");
        assert_eq!(mode, InteractionMode::Structured);

        session.reset();
        assert!(session.latest_answer().is_none());
    }

    #[test]
    fn recent_is_bounded_by_log_length() {
        let mut log = ConversationLog::new();
        log.push(ConversationTurn::user("only"));
        assert_eq!(log.recent(6).len(), 1);
        assert!(log.latest_assistant().is_none());
    }
}
