//! Core building blocks: party ids, game state, RNG, configuration.

pub mod actor;
pub mod config;
pub mod rng;
pub mod state;

pub use actor::{ActorId, ActorMap, PARTY_COUNT};
pub use config::{CategoryRules, ConfigError, GameConfig};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, GameStatus};
