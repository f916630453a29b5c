//! Game summaries for player-profile collaborators.
//!
//! A finished game is reduced to a [`GameExport`] and handed to a
//! [`ProfileSink`]. Two encodings are provided: JSON for humans and
//! bincode for compact archives.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::FailureReason;
use crate::cards::Category;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary encoding failed: {0}")]
    Binary(#[from] bincode::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// One turn as profiles see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTurn {
    pub actor: String,
    pub category: Option<Category>,
    pub success: bool,
    pub failure_reason: Option<FailureReason>,
}

/// Outcome and per-turn outline of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameExport {
    /// Winner's name; `None` on a draw.
    pub winner: Option<String>,
    pub total_turns: u32,
    /// The winner's condition, or a fixed draw marker.
    pub victory_condition: String,
    pub finished_at: Option<DateTime<Utc>>,
    pub history: Vec<ExportTurn>,
}

impl GameExport {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_bincode(&self) -> Result<Vec<u8>, ExportError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bincode(bytes: &[u8]) -> Result<Self, ExportError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Successful turns per category, in category order.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|cat| {
                let n = self
                    .history
                    .iter()
                    .filter(|t| t.success && t.category == Some(cat))
                    .count();
                (cat, n)
            })
            .filter(|&(_, n)| n > 0)
            .collect()
    }
}

/// Receives finished games.
pub trait ProfileSink {
    fn record_game(&mut self, export: &GameExport) -> Result<(), ExportError>;
}

/// Keeps exports in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub games: Vec<GameExport>,
}

impl ProfileSink for MemorySink {
    fn record_game(&mut self, export: &GameExport) -> Result<(), ExportError> {
        self.games.push(export.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ProfileSink for JsonLinesSink<W> {
    fn record_game(&mut self, export: &GameExport) -> Result<(), ExportError> {
        serde_json::to_writer(&mut self.writer, export)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
