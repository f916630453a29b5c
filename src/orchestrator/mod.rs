//! Turn orchestration: agents, decision parsing, prompts, and the game loop.
//!
//! ## Key Types
//!
//! - `Orchestrator`: owns the contract, ledger and seats; runs turns
//! - `Agent`: the decision capability (scripted, fixed-choice, closure)
//! - `PromptRenderer`: turns game state into the text an agent reads
//! - `Decision`: rationale plus a 1-based card selection

pub mod agent;
pub mod decision;
pub mod game;
pub mod prompt;

pub use agent::{Agent, AgentError, FixedChoiceAgent, FnAgent, ScriptedAgent};
pub use decision::{parse_decision, Decision, MoveError, SCRATCH_PAD_LABEL, SELECTED_MARKER};
pub use game::{Orchestrator, Participant, TurnOutcome, TurnPhase};
pub use prompt::{PromptContext, PromptRenderer, TurnPrompt};
