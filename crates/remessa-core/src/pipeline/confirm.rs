//! Interactive confirmation for resending already-delivered documents.

use std::io;

use tracing::info;

use super::report::RunOutcomes;
use crate::models::delivery::Delivery;

/// A valid operator answer to a resend prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// `S`: resend this document.
    Yes,
    /// `N`: keep this document out of delivery.
    No,
    /// `NT`: decline this one and every remaining candidate.
    NoToAll,
}

impl Answer {
    /// Parse an operator input line; case-insensitive, anything but
    /// `S`/`N`/`NT` is invalid.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "s" => Some(Self::Yes),
            "n" => Some(Self::No),
            "nt" => Some(Self::NoToAll),
            _ => None,
        }
    }
}

/// Console seam for the gate, so tests can script the operator.
pub trait ConfirmPrompt {
    /// Ask about one candidate and return the raw input line.
    fn ask(&mut self, file_name: &str) -> io::Result<String>;

    /// Invalid input notice; the same candidate is asked again.
    fn invalid(&mut self, _input: &str) {}
}

/// Decision for a single resend candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Confirmed,
    Declined,
}

/// Asks the operator about each resend candidate, in discovery order.
///
/// `NT` sets a sticky flag that declines every remaining candidate without
/// further prompting. The gate runs to completion before any delivery
/// begins.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    suppress_remaining: bool,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the gate; confirmed candidates come back for the pending queue,
    /// declined ones land in the `already_sent` bucket.
    pub fn run(
        &mut self,
        candidates: Vec<Delivery>,
        prompt: &mut dyn ConfirmPrompt,
        outcomes: &mut RunOutcomes,
    ) -> io::Result<Vec<Delivery>> {
        let mut confirmed = Vec::new();

        for candidate in candidates {
            match self.decide(&candidate.file_name, prompt)? {
                Decision::Confirmed => {
                    info!("operator confirmed resend of {}", candidate.file_name);
                    confirmed.push(candidate);
                }
                Decision::Declined => {
                    info!("resend of {} declined", candidate.file_name);
                    outcomes.already_sent.push(candidate);
                }
            }
        }

        Ok(confirmed)
    }

    fn decide(&mut self, file_name: &str, prompt: &mut dyn ConfirmPrompt) -> io::Result<Decision> {
        if self.suppress_remaining {
            return Ok(Decision::Declined);
        }

        loop {
            let line = prompt.ask(file_name)?;
            match Answer::parse(&line) {
                Some(Answer::Yes) => return Ok(Decision::Confirmed),
                Some(Answer::No) => return Ok(Decision::Declined),
                Some(Answer::NoToAll) => {
                    self.suppress_remaining = true;
                    return Ok(Decision::Declined);
                }
                None => prompt.invalid(&line),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct ScriptedPrompt {
        answers: Vec<&'static str>,
        asked: Vec<String>,
        rejected: usize,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().rev().copied().collect(),
                asked: Vec::new(),
                rejected: 0,
            }
        }
    }

    impl ConfirmPrompt for ScriptedPrompt {
        fn ask(&mut self, file_name: &str) -> io::Result<String> {
            self.asked.push(file_name.to_string());
            Ok(self.answers.pop().unwrap_or("n").to_string())
        }

        fn invalid(&mut self, _input: &str) {
            self.rejected += 1;
        }
    }

    fn candidates(names: &[&str]) -> Vec<Delivery> {
        names
            .iter()
            .map(|n| Delivery::new(*n, format!("hash-{n}")))
            .collect()
    }

    #[test]
    fn answers_parse_case_insensitively() {
        assert_eq!(Answer::parse("s"), Some(Answer::Yes));
        assert_eq!(Answer::parse(" S "), Some(Answer::Yes));
        assert_eq!(Answer::parse("N"), Some(Answer::No));
        assert_eq!(Answer::parse("nt"), Some(Answer::NoToAll));
        assert_eq!(Answer::parse("yes"), None);
        assert_eq!(Answer::parse(""), None);
    }

    #[test]
    fn confirmed_candidates_return_in_order() {
        let mut gate = ConfirmationGate::new();
        let mut prompt = ScriptedPrompt::new(&["s", "n", "s"]);
        let mut outcomes = RunOutcomes::new();

        let confirmed = gate
            .run(candidates(&["a.pdf", "b.pdf", "c.pdf"]), &mut prompt, &mut outcomes)
            .unwrap();

        let names: Vec<&str> = confirmed.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf"]);
        assert_eq!(outcomes.already_sent.len(), 1);
        assert_eq!(outcomes.already_sent[0].file_name, "b.pdf");
    }

    #[test]
    fn invalid_input_reprompts_same_candidate() {
        let mut gate = ConfirmationGate::new();
        let mut prompt = ScriptedPrompt::new(&["maybe", "x", "s"]);
        let mut outcomes = RunOutcomes::new();

        let confirmed = gate
            .run(candidates(&["a.pdf"]), &mut prompt, &mut outcomes)
            .unwrap();

        assert_eq!(confirmed.len(), 1);
        assert_eq!(prompt.rejected, 2);
        assert_eq!(prompt.asked, vec!["a.pdf", "a.pdf", "a.pdf"]);
    }

    #[test]
    fn no_to_all_declines_remaining_without_prompting() {
        let mut gate = ConfirmationGate::new();
        let mut prompt = ScriptedPrompt::new(&["nt"]);
        let mut outcomes = RunOutcomes::new();

        let confirmed = gate
            .run(
                candidates(&["a.pdf", "b.pdf", "c.pdf"]),
                &mut prompt,
                &mut outcomes,
            )
            .unwrap();

        assert!(confirmed.is_empty());
        assert_eq!(outcomes.already_sent.len(), 3);
        // Only the first candidate reached the operator.
        assert_eq!(prompt.asked, vec!["a.pdf"]);
    }

    #[test]
    fn empty_candidate_set_never_prompts() {
        let mut gate = ConfirmationGate::new();
        let mut prompt = ScriptedPrompt::new(&[]);
        let mut outcomes = RunOutcomes::new();

        let confirmed = gate.run(Vec::new(), &mut prompt, &mut outcomes).unwrap();

        assert!(confirmed.is_empty());
        assert!(prompt.asked.is_empty());
        assert!(outcomes.already_sent.is_empty());
    }
}
