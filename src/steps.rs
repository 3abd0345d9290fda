//! Extraction of numbered pseudocode steps from a model response.
//!
//! Responses are semi-structured text. The extractor looks for the line that opens the
//! pseudocode section and collects the numbered lines that follow it, keeping at most
//! [`MAX_STEPS`] of them.

use crate::constants::{MAX_STEPS, SECTION_TRIGGERS};

/// Ordered, cleaned pseudocode steps taken from one response.
///
/// Holds at most [`MAX_STEPS`] entries, none of them empty after trimming, in the order
/// they appear in the source text. Only [`extract_steps`] builds one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepList(Vec<String>);

impl StepList {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was found to visualize.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Steps as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterates over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a StepList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Extracts up to five pseudocode steps from a model response.
///
/// Lines are scanned in order. A line mentioning "pseudocode" or "algorithm steps"
/// (case-insensitive) opens the section and is never itself a step; once open the
/// section stays open. Inside it, a line starting with digits followed by `.`, `)` or
/// whitespace is a step: the number and its delimiter run are stripped and the rest
/// trimmed. Other lines are ignored.
///
/// # Arguments
///
/// * `response_text` - Raw text returned by the model
///
/// # Returns
///
/// The first five non-empty steps, possibly none.
pub fn extract_steps(response_text: &str) -> StepList {
    let mut steps = Vec::new();
    let mut in_section = false;

    for line in response_text.lines() {
        let trimmed = line.trim();
        let lowered = trimmed.to_lowercase();

        if SECTION_TRIGGERS.iter().any(|trigger| lowered.contains(trigger)) {
            in_section = true;
            continue;
        }

        if !in_section {
            continue;
        }

        if let Some(step) = strip_step_number(trimmed) {
            if !step.is_empty() {
                steps.push(step.to_string());
            }
        }
    }

    if steps.len() > MAX_STEPS {
        log::debug!(
            "Found {} numbered steps, keeping the first {}",
            steps.len(),
            MAX_STEPS
        );
        steps.truncate(MAX_STEPS);
    }

    if steps.is_empty() {
        log::warn!("No valid steps found in the message");
    }

    StepList(steps)
}

fn is_step_delimiter(c: char) -> bool {
    c == '.' || c == ')' || c.is_whitespace()
}

/// Returns the text after a leading step number, or `None` if the line is not numbered.
///
/// A number is one or more ASCII digits immediately followed by a delimiter; the whole
/// delimiter run after it is removed.
fn strip_step_number(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    match rest.chars().next() {
        Some(c) if is_step_delimiter(c) => Some(rest.trim_start_matches(is_step_delimiter).trim()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps_of(text: &str) -> Vec<String> {
        extract_steps(text).as_slice().to_vec()
    }

    #[test]
    fn returns_nothing_without_a_trigger() {
        let text = "1) Scan array\n2) Track seen values\n3. Check complement";
        assert!(extract_steps(text).is_empty());
        assert!(extract_steps("").is_empty());
    }

    #[test]
    fn extracts_five_steps_after_trigger() {
        let text = "Pseudocode:\n1) a\n2) b\n3) c\n4) d\n5) e";
        assert_eq!(steps_of(text), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn trigger_is_case_insensitive_and_matches_algorithm_steps() {
        assert_eq!(steps_of("## ALGORITHM STEPS\n1. first"), vec!["first"]);
        assert_eq!(steps_of("**PseudoCode**\n1 first"), vec!["first"]);
    }

    #[test]
    fn numbered_lines_before_the_trigger_are_ignored() {
        let text = "1. BRIEF Problem Overview\nSome text\n2. Pseudocode (EXACTLY 5 steps):\n   1) Scan\n   2) Track";
        assert_eq!(steps_of(text), vec!["Scan", "Track"]);
    }

    #[test]
    fn trigger_line_is_never_a_step() {
        let text = "1) pseudocode follows\n2) real step";
        assert_eq!(steps_of(text), vec!["real step"]);
    }

    #[test]
    fn repeated_trigger_keeps_section_open() {
        let text = "Pseudocode\n1) a\nMore pseudocode notes\n2) b";
        assert_eq!(steps_of(text), vec!["a", "b"]);
    }

    #[test]
    fn non_matching_lines_do_not_close_the_section() {
        let text = "Pseudocode:\n1) a\n\nsome prose\n```\n2) b";
        assert_eq!(steps_of(text), vec!["a", "b"]);
    }

    #[test]
    fn keeps_only_the_first_five_steps() {
        let text = "Pseudocode\n1) a\n2) b\n3) c\n4) d\n5) e\n6) f\n7) g";
        assert_eq!(steps_of(text), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn digits_need_a_delimiter() {
        let text = "Pseudocode\n1x not a step\n42\n2) yes";
        assert_eq!(steps_of(text), vec!["yes"]);
    }

    #[test]
    fn empty_remainders_are_dropped() {
        let text = "Pseudocode\n1) a\n3)   \n4)\n5) e";
        assert_eq!(steps_of(text), vec!["a", "e"]);
    }

    #[test]
    fn delimiter_runs_are_stripped_and_casing_kept() {
        let text = "Pseudocode\n1.) Initialize HashMap\n2 .  Loop Over Items\r\n10)\tReturn Result";
        assert_eq!(
            steps_of(text),
            vec!["Initialize HashMap", "Loop Over Items", "Return Result"]
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "Algorithm steps\n1) a\n2) b";
        assert_eq!(extract_steps(text), extract_steps(text));
    }

    #[test]
    fn two_sum_response_yields_expected_steps() {
        let text = "Overview: find two numbers.\n\nPseudocode:\n1) Scan array\n2) Track seen values\n3) Check complement\n4) Return pair\n5) Return empty if none\n\nImplementation (in Python):\n```python\ndef two_sum(nums, target):\n    pass\n```";
        assert_eq!(
            steps_of(text),
            vec![
                "Scan array",
                "Track seen values",
                "Check complement",
                "Return pair",
                "Return empty if none"
            ]
        );
    }
}
