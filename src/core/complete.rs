// src/core/complete.rs

//! Accumulator for shell completion candidates.
//!
//! A [`Complete`] is seeded with the word the user is currently typing. While the
//! resolver walks the input it feeds every name that could appear at that
//! position; the derived [`Complete::words`] view keeps only the viable ones.

use thiserror::Error;

use crate::models::Status;

/// Words starting with this character are flags and stay hidden until the user
/// starts typing something.
pub const FLAG_MARKER: char = '-';

/// Violations of the accumulator's invariants. These are programming defects.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompletionError {
    #[error("An empty word was supplied to the completion, supplied list was {words:?}")]
    EmptyWord { words: Vec<String> },
    #[error("Completion final method executed more than once.")]
    AlreadyInvoked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Nothing,
    Commands,
}

/// Collects the candidate words for the last argument of a completion request.
#[derive(Debug)]
pub struct Complete {
    last_arg: String,
    collected: Vec<String>,
    state: State,
}

impl Complete {
    /// Creates an open accumulator for the partially typed `last_arg`.
    pub fn new(last_arg: impl Into<String>) -> Self {
        Self {
            last_arg: last_arg.into(),
            collected: Vec::new(),
            state: State::Open,
        }
    }

    /// Whether a terminal method has already been called.
    pub fn is_closed(&self) -> bool {
        self.state != State::Open
    }

    /// Adds candidate words, keeping their first-seen order.
    ///
    /// The whole batch is rejected if any word is empty. Words offered after the
    /// accumulator was closed are ignored.
    pub fn add_words<I, S>(&mut self, new_words: I) -> Result<(), CompletionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let batch: Vec<String> = new_words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect();
        if batch.iter().any(String::is_empty) {
            return Err(CompletionError::EmptyWord { words: batch });
        }
        if self.is_closed() {
            log::trace!("Completion already closed, ignoring {:?}", batch);
            return Ok(());
        }
        for word in batch {
            if !self.collected.contains(&word) {
                self.collected.push(word);
            }
        }
        Ok(())
    }

    /// The collected words that are valid continuations of the prefix.
    pub fn words(&self) -> Vec<&str> {
        if self.state == State::Nothing {
            return Vec::new();
        }
        let prefix = self.last_arg.as_str();
        self.collected
            .iter()
            .map(String::as_str)
            .filter(|word| word.starts_with(prefix))
            .filter(|word| !prefix.is_empty() || !word.starts_with(FLAG_MARKER))
            .collect()
    }

    /// Terminal method: there is nothing to offer at this position.
    pub fn nothing(&mut self) -> Result<Status, CompletionError> {
        self.close(State::Nothing)?;
        Ok(Status::Success)
    }

    /// Terminal method: offer the given word lists, in order.
    pub fn commands<L, W>(&mut self, word_lists: L) -> Result<Status, CompletionError>
    where
        L: IntoIterator<Item = W>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        if self.is_closed() {
            return Err(CompletionError::AlreadyInvoked);
        }
        for words in word_lists {
            self.add_words(words)?;
        }
        self.close(State::Commands)?;
        Ok(Status::Success)
    }

    /// The line printed for the shell: candidates separated by single spaces.
    pub fn render(&self) -> String {
        self.words().join(" ")
    }

    fn close(&mut self, state: State) -> Result<(), CompletionError> {
        if self.is_closed() {
            return Err(CompletionError::AlreadyInvoked);
        }
        self.state = state;
        Ok(())
    }
}
