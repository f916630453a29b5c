//! Turn prompts.
//!
//! [`TurnPrompt`] lays out the contract, the variables, the recent turns,
//! the acting party's goal and the numbered candidates, then asks for a
//! `SELECTED CARD:` line. Swap in another [`PromptRenderer`] to change the
//! wording; the decision parser only depends on the marker.

use std::fmt;

use super::decision::{SCRATCH_PAD_LABEL, SELECTED_MARKER};
use crate::cards::Card;
use crate::contract::ContractEngine;
use crate::core::ActorMap;
use crate::ledger::TurnRecord;

/// Everything a renderer may show for one turn.
#[derive(Clone, Copy, Debug)]
pub struct PromptContext<'a> {
    pub turn_number: u32,
    pub actor_name: &'a str,
    pub participants: &'a ActorMap<String>,
    pub engine: &'a ContractEngine,
    pub recent: &'a [TurnRecord],
    pub victory_condition: &'a str,
    pub candidates: &'a [Card],
    pub notes: &'a [String],
}

pub trait PromptRenderer {
    fn render(&self, ctx: &PromptContext<'_>) -> String;
}

/// Default prompt layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnPrompt;

impl PromptRenderer for TurnPrompt {
    fn render(&self, ctx: &PromptContext<'_>) -> String {
        Layout(ctx).to_string()
    }
}

struct Layout<'c, 'a>(&'c PromptContext<'a>);

impl fmt::Display for Layout<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.0;

        writeln!(f, "=== Contract Duel - Turn {} ===", ctx.turn_number)?;
        writeln!(f, "You are {}.", ctx.actor_name)?;

        writeln!(f, "\nCurrent Contract Contents:")?;
        if ctx.engine.is_empty() {
            writeln!(f, "(empty)")?;
        }
        for (i, line) in ctx.engine.line_sources().enumerate() {
            writeln!(f, "{i}: {line}")?;
        }
        let order: Vec<String> = ctx.engine.execution_order().iter().map(usize::to_string).collect();
        writeln!(f, "Execution order: [{}]", order.join(", "))?;

        writeln!(f, "\nVariable States:")?;
        for (var, value) in ctx.engine.variables().iter() {
            writeln!(f, "{var}: {value}")?;
        }

        writeln!(f, "\nGame History (Last {} Turns):", ctx.recent.len())?;
        for record in ctx.recent {
            write!(f, "Turn {}: {} ", record.turn_number, ctx.participants[record.actor])?;
            match (&record.selected_card, record.success) {
                (Some(card), true) => write!(f, "played {}", card.name)?,
                (Some(card), false) => write!(f, "tried {} (rejected)", card.name)?,
                (None, _) => write!(f, "made no valid selection")?,
            }
            writeln!(f, " - Variables: {}", record.variables)?;
        }

        writeln!(f, "\nYour Victory Condition: {}", ctx.victory_condition)?;

        writeln!(f, "\nAvailable Cards:")?;
        for (i, card) in ctx.candidates.iter().enumerate() {
            writeln!(f, "{}. {}: {} [{}]", i + 1, card.name, card.description, card.code_fragment)?;
        }

        writeln!(f, "\nYour Strategy Notes:")?;
        for note in ctx.notes {
            writeln!(f, "- {}", note.lines().next().unwrap_or(""))?;
        }

        writeln!(f, "\nThink through your move, considering:")?;
        writeln!(f, "1. Current contract state")?;
        writeln!(f, "2. Execution order of code")?;
        writeln!(f, "3. Previous moves and their effects")?;
        writeln!(f, "4. Path to victory condition")?;
        writeln!(f, "\nFormat your response as:")?;
        writeln!(f, "{SCRATCH_PAD_LABEL}\n[your strategic thinking]\n")?;
        write!(f, "{SELECTED_MARKER} [number]")
    }
}
