//! Interactive question capability.
//!
//! The lifecycle engine never talks to a terminal directly. It asks
//! [`Question`]s through a [`Prompter`]; the CLI supplies a terminal
//! implementation, and tests supply a [`ScriptedPrompter`].
//!
//! # Examples
//!
//! ```
//! use bitcart_core::prompt::{Prompter, Question, ScriptedPrompter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let prompter = ScriptedPrompter::new(["demo"]);
//! let name = prompter.ask(&Question::new("Plugin name").required())?;
//! assert_eq!(name, "demo");
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

type Validator<'a> = Box<dyn Fn(&str) -> std::result::Result<(), String> + 'a>;

/// A question with an answer contract.
pub struct Question<'a> {
    message: String,
    required: bool,
    validators: Vec<Validator<'a>>,
}

impl<'a> Question<'a> {
    /// Creates an optional free-text question.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            required: false,
            validators: Vec::new(),
        }
    }

    /// Rejects empty answers.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a validator; validators run in insertion order after the required check.
    #[must_use]
    pub fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<(), String> + 'a,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// Prompt text shown to the user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether an empty answer is rejected.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Checks an answer against the contract, returning the first rejection reason.
    ///
    /// # Errors
    ///
    /// Returns the rejection message of the first failing check.
    pub fn check(&self, answer: &str) -> std::result::Result<(), String> {
        if self.required && answer.trim().is_empty() {
            return Err("Value is required".to_string());
        }
        if answer.is_empty() {
            return Ok(());
        }
        self.validators.iter().try_for_each(|validate| validate(answer))
    }
}

impl fmt::Debug for Question<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("message", &self.message)
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Capability to ask the operator for input.
pub trait Prompter {
    /// Asks a free-text question and returns an answer that passed [`Question::check`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prompt`] if no valid answer can be obtained.
    fn ask(&self, question: &Question<'_>) -> Result<String>;

    /// Asks the operator to pick any number of `choices`; returns the selected indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prompt`] if the selection cannot be obtained.
    fn select_many(&self, message: &str, choices: &[&str]) -> Result<Vec<usize>>;
}

/// Prompter that replays prepared answers.
///
/// Answers that fail validation are a hard error instead of a re-prompt, so
/// tests fail loudly on unexpected input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    selections: RefCell<VecDeque<Vec<usize>>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    /// Creates a prompter replaying `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Queues a multi-select answer.
    #[must_use]
    pub fn with_selection(self, indices: impl Into<Vec<usize>>) -> Self {
        self.selections.borrow_mut().push_back(indices.into());
        self
    }

    /// Messages of every question asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    /// Number of free-text answers not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &Question<'_>) -> Result<String> {
        self.asked.borrow_mut().push(question.message().to_string());

        let answer = self
            .answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::prompt(format!("no answer for '{}'", question.message())))?;

        question.check(&answer).map_err(|reason| {
            Error::prompt(format!(
                "answer '{answer}' rejected for '{}': {reason}",
                question.message()
            ))
        })?;

        Ok(answer)
    }

    fn select_many(&self, message: &str, choices: &[&str]) -> Result<Vec<usize>> {
        self.asked.borrow_mut().push(message.to_string());

        let selection = self
            .selections
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::prompt(format!("no selection for '{message}'")))?;

        if let Some(bad) = selection.iter().find(|&&i| i >= choices.len()) {
            return Err(Error::prompt(format!(
                "selection index {bad} out of range for '{message}'"
            )));
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let question = Question::new("Name").required();
        assert!(question.check("   ").is_err());
        assert!(question.check("x").is_ok());
    }

    #[test]
    fn test_optional_accepts_empty_without_running_validators() {
        let question = Question::new("Description").validate_with(|_| Err("never".to_string()));
        assert!(question.check("").is_ok());
        assert_eq!(question.check("text"), Err("never".to_string()));
    }

    #[test]
    fn test_validators_run_in_order() {
        let question = Question::new("Path")
            .required()
            .validate_with(|a| if a.starts_with('/') { Ok(()) } else { Err("first".into()) })
            .validate_with(|_| Err("second".into()));

        assert_eq!(question.check("relative"), Err("first".to_string()));
        assert_eq!(question.check("/abs"), Err("second".to_string()));
    }

    #[test]
    fn test_scripted_answers_in_order() {
        let prompter = ScriptedPrompter::new(["one", "two"]);
        assert_eq!(prompter.ask(&Question::new("a")).unwrap(), "one");
        assert_eq!(prompter.ask(&Question::new("b")).unwrap(), "two");
        assert_eq!(prompter.asked(), vec!["a", "b"]);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_scripted_exhausted() {
        let prompter = ScriptedPrompter::default();
        let err = prompter.ask(&Question::new("Author")).unwrap_err();
        assert!(matches!(err, Error::Prompt { .. }));
        assert!(err.to_string().contains("Author"));
    }

    #[test]
    fn test_scripted_rejected_answer_is_error() {
        let prompter = ScriptedPrompter::new([""]);
        let err = prompter.ask(&Question::new("Name").required()).unwrap_err();
        assert!(err.to_string().contains("Value is required"));
    }

    #[test]
    fn test_scripted_selection() {
        let prompter = ScriptedPrompter::default().with_selection([0, 2]);
        let picked = prompter.select_many("Pick", &["a", "b", "c"]).unwrap();
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn test_scripted_selection_out_of_range() {
        let prompter = ScriptedPrompter::default().with_selection([5]);
        assert!(prompter.select_many("Pick", &["a"]).is_err());
    }
}
