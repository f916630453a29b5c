//! Decision makers.
//!
//! The orchestrator only sees the [`Agent`] trait: a prompt goes in, free
//! text comes back. Language-model clients live outside this crate; the
//! variants here cover scripted play and tests.

use std::collections::VecDeque;

use thiserror::Error;

use super::decision::SELECTED_MARKER;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent has no responses left")]
    Exhausted,

    #[error("agent failed: {0}")]
    Failed(String),
}

/// Something that picks a card given a rendered prompt.
pub trait Agent {
    /// Answer a turn prompt. The response should end with a
    /// `SELECTED CARD: <n>` line.
    fn decide(&mut self, prompt: &str) -> Result<String, AgentError>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn decide(&mut self, prompt: &str) -> Result<String, AgentError> {
        (**self).decide(prompt)
    }
}

/// Plays canned responses in order and remembers every prompt it saw.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAgent {
    responses: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedAgent {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Responses built from bare card numbers.
    pub fn choosing(choices: impl IntoIterator<Item = usize>) -> Self {
        Self::new(choices.into_iter().map(choice_response))
    }

    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Agent for ScriptedAgent {
    fn decide(&mut self, prompt: &str) -> Result<String, AgentError> {
        self.prompts.push(prompt.to_owned());
        self.responses.pop_front().ok_or(AgentError::Exhausted)
    }
}

/// Always selects the same card number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedChoiceAgent {
    pub choice: usize,
}

impl FixedChoiceAgent {
    #[must_use]
    pub fn new(choice: usize) -> Self {
        Self { choice }
    }
}

impl Agent for FixedChoiceAgent {
    fn decide(&mut self, _prompt: &str) -> Result<String, AgentError> {
        Ok(choice_response(self.choice))
    }
}

/// Adapts a closure.
pub struct FnAgent<F> {
    decide: F,
}

impl<F> FnAgent<F>
where
    F: FnMut(&str) -> Result<String, AgentError>,
{
    pub fn new(decide: F) -> Self {
        Self { decide }
    }
}

impl<F> Agent for FnAgent<F>
where
    F: FnMut(&str) -> Result<String, AgentError>,
{
    fn decide(&mut self, prompt: &str) -> Result<String, AgentError> {
        (self.decide)(prompt)
    }
}

impl<F> std::fmt::Debug for FnAgent<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAgent").finish_non_exhaustive()
    }
}

fn choice_response(choice: usize) -> String {
    format!("SCRATCH PAD:\nPlaying card {choice}.\n\n{SELECTED_MARKER} {choice}")
}
