//! Immutable per-turn records.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Category};
use crate::contract::{ContractEngine, Variables};
use crate::core::ActorId;

/// Why a turn did not change the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The decision could not be read or pointed outside the candidates.
    MalformedMove,
    /// The engine refused the selected card.
    ExecutionRejected,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FailureReason::MalformedMove => "MalformedMove",
            FailureReason::ExecutionRejected => "ExecutionRejected",
        })
    }
}

/// The card a turn played, as it appeared in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub id: CardId,
    pub name: String,
    pub category: Category,
    pub code_fragment: String,
}

impl From<&Card> for CardRef {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            name: card.name.clone(),
            category: card.category,
            code_fragment: card.code_fragment.clone(),
        }
    }
}

/// One ledger entry. Written once per turn, failed turns included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based, strictly sequential.
    pub turn_number: u32,

    pub actor: ActorId,

    /// Rationale the agent gave, or the raw response if it could not be read.
    pub narrative: String,

    pub selected_card: Option<CardRef>,

    /// Contract source lines after the turn.
    pub lines: Vec<String>,

    /// Variables after the turn.
    pub variables: Variables,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<String>,
}

impl TurnRecord {
    /// A successful turn, capturing the engine's state after the move.
    #[must_use]
    pub fn success(
        turn_number: u32,
        actor: ActorId,
        narrative: impl Into<String>,
        card: &Card,
        engine: &ContractEngine,
    ) -> Self {
        Self {
            turn_number,
            actor,
            narrative: narrative.into(),
            selected_card: Some(card.into()),
            lines: engine.line_sources().map(str::to_owned).collect(),
            variables: engine.variables(),
            success: true,
            failure_reason: None,
            failure_detail: None,
        }
    }

    /// A failed turn. The engine is unchanged, so its state is the
    /// pre-turn state.
    #[must_use]
    pub fn failure(
        turn_number: u32,
        actor: ActorId,
        narrative: impl Into<String>,
        card: Option<&Card>,
        engine: &ContractEngine,
        reason: FailureReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            turn_number,
            actor,
            narrative: narrative.into(),
            selected_card: card.map(CardRef::from),
            lines: engine.line_sources().map(str::to_owned).collect(),
            variables: engine.variables(),
            success: false,
            failure_reason: Some(reason),
            failure_detail: Some(detail.into()),
        }
    }

    /// Category of the played card, if one was selected.
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.selected_card.as_ref().map(|c| c.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_captures_engine() {
        let mut engine = ContractEngine::new();
        assert!(engine.append_line("x += 1"));
        let card = Card::new("op_increment_x", "Increment", "x += 1", Category::AggressiveX);

        let record = TurnRecord::success(1, ActorId::FIRST, "push x", &card, &engine);

        assert!(record.success);
        assert_eq!(record.lines, vec!["x += 1".to_string()]);
        assert_eq!(record.variables.x, 2);
        assert_eq!(record.category(), Some(Category::AggressiveX));
    }

    #[test]
    fn test_failure_serializes_reason() {
        let engine = ContractEngine::new();
        let record = TurnRecord::failure(
            3,
            ActorId::SECOND,
            "no idea",
            None,
            &engine,
            FailureReason::MalformedMove,
            "missing SELECTED CARD marker",
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["failure_reason"], "MalformedMove");
        assert_eq!(json["success"], false);
        assert!(json["selected_card"].is_null());
        assert_eq!(record.variables, Variables::INITIAL);
    }
}
