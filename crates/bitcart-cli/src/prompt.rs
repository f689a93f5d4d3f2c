//! Terminal implementation of the prompt capability.

use bitcart_core::{Error, Prompter, Question};
use dialoguer::{Input, MultiSelect};

/// Asks questions on the controlling terminal.
///
/// Rejected answers are reported on stderr and the question is asked again.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

fn prompt_error(e: &dialoguer::Error) -> Error {
    Error::Prompt {
        message: e.to_string(),
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &Question<'_>) -> bitcart_core::Result<String> {
        loop {
            let answer: String = Input::new()
                .with_prompt(question.message())
                .allow_empty(true)
                .interact_text()
                .map_err(|e| prompt_error(&e))?;

            match question.check(&answer) {
                Ok(()) => return Ok(answer),
                Err(reason) => eprintln!("{reason}"),
            }
        }
    }

    fn select_many(&self, message: &str, choices: &[&str]) -> bitcart_core::Result<Vec<usize>> {
        MultiSelect::new()
            .with_prompt(message)
            .items(choices)
            .interact()
            .map_err(|e| prompt_error(&e))
    }
}
