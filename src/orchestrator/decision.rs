//! Reading an agent's free-text answer.

use thiserror::Error;

use super::agent::AgentError;

/// Marker preceding the chosen card number.
pub const SELECTED_MARKER: &str = "SELECTED CARD:";

/// Optional label in front of the rationale.
pub const SCRATCH_PAD_LABEL: &str = "SCRATCH PAD:";

/// Why a response could not be turned into a move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("response has no `SELECTED CARD:` marker")]
    MissingMarker,

    #[error("`{0}` after `SELECTED CARD:` is not a card number")]
    NotANumber(String),

    #[error("card {selected} is not between 1 and {count}")]
    OutOfRange { selected: i64, count: usize },

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// A validated move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub rationale: String,
    /// 1-based, within the candidate list.
    pub selection: usize,
}

impl Decision {
    /// 0-based candidate index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.selection - 1
    }
}

/// Parse `text` against a list of `candidate_count` cards.
///
/// The number is the first token after the last marker, with surrounding
/// brackets and punctuation ignored, so `SELECTED CARD: [2].` reads as 2.
/// Letters around the number are not ignored: `v3` is not a selection.
pub fn parse_decision(text: &str, candidate_count: usize) -> Result<Decision, MoveError> {
    let at = text.rfind(SELECTED_MARKER).ok_or(MoveError::MissingMarker)?;
    let tail = &text[at + SELECTED_MARKER.len()..];

    let token = tail.split_whitespace().next().unwrap_or("");
    let digits =
        token.trim_matches(|c: char| matches!(c, '[' | ']' | '(' | ')' | '.' | ',' | ':' | '#'));
    let selected: i64 = digits
        .parse()
        .map_err(|_| MoveError::NotANumber(token.to_owned()))?;

    if selected < 1 || selected as u64 > candidate_count as u64 {
        return Err(MoveError::OutOfRange {
            selected,
            count: candidate_count,
        });
    }

    Ok(Decision {
        rationale: rationale(&text[..at]),
        selection: selected as usize,
    })
}

fn rationale(head: &str) -> String {
    let body = match head.find(SCRATCH_PAD_LABEL) {
        Some(at) => &head[at + SCRATCH_PAD_LABEL.len()..],
        None => head,
    };
    body.trim().to_owned()
}
