//! Turn ledger: the append-only record of every turn, and the summary
//! exported when a game ends.

pub mod export;
pub mod history;
pub mod record;

pub use export::{ExportError, ExportTurn, GameExport, JsonLinesSink, MemorySink, ProfileSink};
pub use history::{GameMeta, TurnLedger, DRAW_CONDITION};
pub use record::{CardRef, FailureReason, TurnRecord};
