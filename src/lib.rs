//! # contract-duel
//!
//! A two-party card game played over a shared, replayable contract.
//!
//! Each turn a party is offered a few cards, picks one, and the card's code
//! fragment is appended to the contract (or a structural directive reshapes
//! it). The contract is replayed from `x = y = z = 1` after every change. The
//! first party whose victory condition holds wins.
//!
//! ## Design Principles
//!
//! 1. **Closed language**: Card fragments are parsed into a small AST over
//!    `x`, `y`, `z`. Nothing outside that language can run.
//!
//! 2. **Transactional mutations**: Every contract change is all-or-nothing.
//!    A failed replay restores the pre-change snapshot.
//!
//! 3. **Deterministic**: Candidate draws come from a seeded `GameRng`, so the
//!    same seed and the same agents replay the same game.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) contract snapshots via `im-rs`.
//!
//! - **Agents as trait objects**: The orchestrator never knows whether a
//!   decision came from a script, a closure, or a language model.
//!
//! ## Modules
//!
//! - `core`: Party ids, game state, RNG, configuration
//! - `contract`: Instruction set, evaluator, predicates, contract engine
//! - `cards`: Card definitions and the catalog
//! - `ledger`: Turn records and game exports
//! - `orchestrator`: Agents, prompts, and the turn loop

pub mod cards;
pub mod contract;
pub mod core;
pub mod ledger;
pub mod orchestrator;

// Re-export commonly used types
pub use crate::core::{
    ActorId, ActorMap,
    GameRng, GameRngState,
    CategoryRules, ConfigError, GameConfig,
    GameState, GameStatus,
};

pub use crate::contract::{
    ContractEngine, ContractError, Directive, Predicate,
    Variable, Variables, evaluate_predicate,
};

pub use crate::cards::{Card, CardCatalog, CardId, CatalogError, Category};

pub use crate::ledger::{
    FailureReason, GameExport, ProfileSink, TurnLedger, TurnRecord,
};

pub use crate::orchestrator::{
    Agent, AgentError, FixedChoiceAgent, FnAgent, ScriptedAgent,
    Orchestrator, Participant, TurnOutcome, TurnPhase,
};
