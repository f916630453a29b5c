//! The append-only turn ledger and game metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::export::{ExportTurn, GameExport};
use super::record::TurnRecord;
use crate::core::{ActorId, ActorMap, GameStatus};

/// Recorded for draws in place of a winning condition.
pub const DRAW_CONDITION: &str = "Game ended in draw";

/// Who played, what each wanted, and how it ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMeta {
    pub participants: ActorMap<String>,
    pub victory_conditions: ActorMap<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: GameStatus,
}

/// Ordered turn history of one game.
///
/// Turn numbers start at 1 and increase by exactly one per record. The
/// ledger never reorders, edits, or drops a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLedger {
    records: Vec<TurnRecord>,
    meta: GameMeta,
}

impl TurnLedger {
    #[must_use]
    pub fn new(participants: ActorMap<String>, victory_conditions: ActorMap<String>) -> Self {
        Self {
            records: Vec::new(),
            meta: GameMeta {
                participants,
                victory_conditions,
                started_at: Utc::now(),
                ended_at: None,
                status: GameStatus::Ongoing,
            },
        }
    }

    /// The number the next record must carry.
    #[must_use]
    pub fn next_turn_number(&self) -> u32 {
        self.records.len() as u32 + 1
    }

    /// Append a record.
    ///
    /// Panics if `record.turn_number` is not `next_turn_number()`, or if the
    /// game was already finished.
    pub fn append(&mut self, record: TurnRecord) {
        let expected = self.next_turn_number();
        assert!(
            record.turn_number == expected,
            "turn sequence violation: expected turn {expected}, got {}",
            record.turn_number
        );
        assert!(
            !self.meta.status.is_terminal(),
            "turn sequence violation: game already finished"
        );

        debug!(
            turn = record.turn_number,
            actor = %record.actor,
            success = record.success,
            "recorded turn"
        );
        self.records.push(record);
    }

    /// Close the game with its final status.
    pub fn finish(&mut self, status: GameStatus) {
        self.meta.status = status;
        self.meta.ended_at = Some(Utc::now());
    }

    #[must_use]
    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    /// The last `window` records, oldest first.
    #[must_use]
    pub fn recent(&self, window: usize) -> &[TurnRecord] {
        let start = self.records.len().saturating_sub(window);
        &self.records[start..]
    }

    #[must_use]
    pub fn last(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn meta(&self) -> &GameMeta {
        &self.meta
    }

    /// Records made by one party.
    pub fn by_actor(&self, actor: ActorId) -> impl Iterator<Item = &TurnRecord> {
        self.records.iter().filter(move |r| r.actor == actor)
    }

    /// Summary handed to profile sinks.
    #[must_use]
    pub fn export(&self) -> GameExport {
        let winner = self.meta.status.winner();
        GameExport {
            winner: winner.map(|w| self.meta.participants[w].clone()),
            total_turns: self.records.len() as u32,
            victory_condition: winner.map_or_else(
                || DRAW_CONDITION.to_string(),
                |w| self.meta.victory_conditions[w].clone(),
            ),
            finished_at: self.meta.ended_at,
            history: self
                .records
                .iter()
                .map(|r| ExportTurn {
                    actor: self.meta.participants[r.actor].clone(),
                    category: r.category(),
                    success: r.success,
                    failure_reason: r.failure_reason,
                })
                .collect(),
        }
    }
}
