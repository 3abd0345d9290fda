//! Prompt composition for the model call.
//!
//! The step extractor depends on the structured template asking for pseudocode numbered
//! `1)` to `5)` under a `Pseudocode:` heading.

use crate::constants::CONVERSATION_HISTORY_TURNS;
use crate::session::ConversationLog;
use crate::types::{InteractionMode, Language, Role};

/// A rendered prompt together with the inputs it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    /// The user's question as submitted
    pub question: String,
    /// Language requested for the implementation section
    pub language: Language,
    /// Full text sent to the model
    pub rendered: String,
}

impl PromptRequest {
    /// Builds a prompt for `question` in the given mode.
    ///
    /// # Arguments
    ///
    /// * `question` - The user's question
    /// * `language` - Target implementation language
    /// * `mode` - Structured or conversational phrasing
    /// * `history` - Prior turns of the session (only read in conversational mode)
    pub fn new(
        question: &str,
        language: Language,
        mode: InteractionMode,
        history: &ConversationLog,
    ) -> Self {
        Self {
            question: question.to_string(),
            language,
            rendered: compose_with(question, language, mode, history),
        }
    }
}

/// Renders the structured five-section teaching prompt.
///
/// Pure template interpolation; the question is not validated.
pub fn compose(question: &str, language: Language) -> String {
    format!(
        r#"
As an expert algorithm teacher, explain the solution to this coding problem. Follow this EXACT format:

1. BRIEF Problem Overview (2-3 sentences max)

2. Pseudocode (EXACTLY 5 steps, no more, no less):
   1) [First step - one clear, concise line]
   2) [Second step - one clear, concise line]
   3) [Third step - one clear, concise line]
   4) [Fourth step - one clear, concise line]
   5) [Fifth step - one clear, concise line]

3. Implementation (in {language}):
   - Clean, optimized code
   - Important comments only
   - Follow best practices

4. Complexity:
   - Time: O(?) with brief explanation
   - Space: O(?) with brief explanation

5. Example:
   Input: [example input]
   Output: [example output]
   Brief walkthrough of how the solution works with this example

Question: {question}

IMPORTANT:
- Each pseudocode step MUST be numbered exactly as shown: 1) 2) 3) 4) 5)
- Each step MUST be a single, clear line
- NO additional or fewer steps allowed
- NO substeps or nested steps
- Keep steps high-level and algorithmic
- Use clear, concise language
"#,
        language = language.label(),
        question = question,
    )
}

/// Renders the prompt for the given interaction mode.
///
/// Structured mode ignores `history` and returns [`compose`]. Conversational mode replays
/// the last [`CONVERSATION_HISTORY_TURNS`] turns as a transcript ahead of the question.
pub fn compose_with(
    question: &str,
    language: Language,
    mode: InteractionMode,
    history: &ConversationLog,
) -> String {
    match mode {
        InteractionMode::Structured => compose(question, language),
        InteractionMode::Conversational => compose_conversational(question, language, history),
    }
}

fn compose_conversational(question: &str, language: Language, history: &ConversationLog) -> String {
    let mut prompt = String::from(
        "You are a friendly programming tutor chatting with a student. \
         Answer concisely and keep the conversation going.\n",
    );
    prompt.push_str(&format!(
        "When you show code, write it in {} inside fenced code blocks.\n",
        language.label()
    ));

    let recent = history.recent(CONVERSATION_HISTORY_TURNS);
    if !recent.is_empty() {
        prompt.push_str("\nConversation so far:\n");
        for turn in recent {
            let speaker = match turn.role {
                Role::User => "Student",
                Role::Assistant => "Tutor",
            };
            prompt.push_str(&format!("{speaker}: {}\n", turn.content.trim()));
        }
    }

    prompt.push_str(&format!("\nStudent: {question}\nTutor:"));
    prompt
}
