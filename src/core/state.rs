//! Game progression state: who moves next, how many turns have been played,
//! and whether the game is over.

use serde::{Deserialize, Serialize};

use super::actor::ActorId;

/// Whether the game continues, and how it ended if not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    /// A party's victory condition held after a turn.
    Won(ActorId),
    /// The turn limit was reached with no winner.
    Draw,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    #[must_use]
    pub fn winner(self) -> Option<ActorId> {
        match self {
            GameStatus::Won(actor) => Some(actor),
            _ => None,
        }
    }

    /// Check if a party won.
    #[must_use]
    pub fn is_winner(self, actor: ActorId) -> bool {
        self.winner() == Some(actor)
    }
}

/// Mutable game-level state, owned by the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Party whose turn it is.
    pub current_actor: ActorId,

    /// Turns played so far, failed ones included.
    pub turn_count: u32,

    pub status: GameStatus,
}

impl GameState {
    /// A fresh game: the first party to move, no turns played.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_actor: ActorId::FIRST,
            turn_count: 0,
            status: GameStatus::Ongoing,
        }
    }

    /// Hand the move to the other party.
    pub fn pass_turn(&mut self) {
        self.current_actor = self.current_actor.other();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.current_actor, ActorId::FIRST);
        assert_eq!(state.turn_count, 0);
        assert!(!state.status.is_terminal());
    }

    #[test]
    fn test_pass_turn() {
        let mut state = GameState::new();
        state.pass_turn();
        assert_eq!(state.current_actor, ActorId::SECOND);
        state.pass_turn();
        assert_eq!(state.current_actor, ActorId::FIRST);
    }

    #[test]
    fn test_status_winner() {
        let won = GameStatus::Won(ActorId::SECOND);
        assert!(won.is_terminal());
        assert!(won.is_winner(ActorId::SECOND));
        assert!(!won.is_winner(ActorId::FIRST));

        assert!(GameStatus::Draw.is_terminal());
        assert_eq!(GameStatus::Draw.winner(), None);
    }
}
