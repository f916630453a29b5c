//! The turn state machine and game loop.
//!
//! Each turn walks the phases in order:
//!
//! ```text
//! AwaitingCandidates -> AwaitingDecision -> Validating -> Applying
//!     -> Recorded -> TerminalCheck -> (AwaitingCandidates | Terminal)
//! ```
//!
//! A move that cannot be read or that the engine rejects is still recorded
//! and still ends the actor's turn. The game ends only on a win or a draw.

use tracing::{debug, info, instrument, trace, warn};

use super::agent::Agent;
use super::decision::parse_decision;
use super::prompt::{PromptContext, PromptRenderer, TurnPrompt};
use crate::cards::{Card, CardCatalog};
use crate::contract::{ContractEngine, Predicate, Variable};
use crate::core::{ActorId, ActorMap, ConfigError, GameConfig, GameRng, GameState, GameStatus};
use crate::ledger::{ExportError, FailureReason, GameExport, ProfileSink, TurnLedger, TurnRecord};

/// Where the orchestrator is within a turn.
///
/// Only [`TurnPhase::AwaitingCandidates`] and [`TurnPhase::Terminal`] are
/// visible between calls to [`Orchestrator::play_turn`]. The others are held
/// while a turn runs and show up in the `trace` log as each one is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    AwaitingCandidates,
    AwaitingDecision,
    Validating,
    Applying,
    Recorded,
    TerminalCheck,
    Terminal,
}

/// A party's identity and goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    /// Predicate such as `x >= 10`.
    pub victory_condition: String,
    /// Variable whose permissions apply to this party's candidates.
    pub target: Variable,
}

impl Participant {
    /// The target is taken from the condition's variable; unreadable
    /// conditions fall back to `z`, which only gets shared categories.
    pub fn new(name: impl Into<String>, victory_condition: impl Into<String>) -> Self {
        let victory_condition = victory_condition.into();
        let target = victory_condition
            .parse::<Predicate>()
            .map_or(Variable::Z, |p| p.variable);
        Self {
            name: name.into(),
            victory_condition,
            target,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: Variable) -> Self {
        self.target = target;
        self
    }
}

/// What one call to [`Orchestrator::play_turn`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub turn_number: u32,
    pub actor: ActorId,
    pub success: bool,
    pub failure_reason: Option<FailureReason>,
    pub status: GameStatus,
}

struct Seat {
    participant: Participant,
    agent: Box<dyn Agent>,
    notes: Vec<String>,
}

/// Runs one game between two agents over a shared contract.
///
/// ## Example
///
/// ```
/// use contract_duel::cards::{Card, CardCatalog, Category};
/// use contract_duel::core::{CategoryRules, GameConfig, GameStatus, ActorId};
/// use contract_duel::orchestrator::{FixedChoiceAgent, Orchestrator, Participant};
///
/// let catalog = CardCatalog::from_cards([
///     Card::new("inc", "Increment", "x += 1", Category::AggressiveX),
/// ]).unwrap();
/// let config = GameConfig::default()
///     .with_max_turns(10)
///     .with_cards_per_turn(1)
///     .with_permissions(CategoryRules::unrestricted());
///
/// let mut game = Orchestrator::new(
///     config,
///     catalog,
///     (Participant::new("alice", "x >= 3"), Box::new(FixedChoiceAgent::new(1))),
///     (Participant::new("bob", "y >= 3"), Box::new(FixedChoiceAgent::new(1))),
/// ).unwrap();
///
/// assert_eq!(game.run(), GameStatus::Won(ActorId::FIRST));
/// assert_eq!(game.ledger().len(), 2);
/// ```
pub struct Orchestrator {
    config: GameConfig,
    catalog: CardCatalog,
    engine: ContractEngine,
    ledger: TurnLedger,
    state: GameState,
    seats: ActorMap<Seat>,
    rng: GameRng,
    renderer: Box<dyn PromptRenderer>,
    candidates: Vec<Card>,
    phase: TurnPhase,
}

impl Orchestrator {
    /// Set up a game. The first pair moves first.
    pub fn new(
        config: GameConfig,
        catalog: CardCatalog,
        first: (Participant, Box<dyn Agent>),
        second: (Participant, Box<dyn Agent>),
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let seat = |(participant, agent): (Participant, Box<dyn Agent>)| Seat {
            participant,
            agent,
            notes: Vec::new(),
        };
        let seats = ActorMap::new(seat(first), seat(second));
        let ledger = TurnLedger::new(
            ActorMap::from_fn(|a| seats[a].participant.name.clone()),
            ActorMap::from_fn(|a| seats[a].participant.victory_condition.clone()),
        );

        debug!(seed = config.seed, catalog = catalog.len(), "new game");
        Ok(Self {
            rng: GameRng::new(config.seed).for_context("candidates"),
            config,
            catalog,
            engine: ContractEngine::new(),
            ledger,
            state: GameState::new(),
            seats,
            renderer: Box::new(TurnPrompt),
            candidates: Vec::new(),
            phase: TurnPhase::AwaitingCandidates,
        })
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: impl PromptRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Start from an existing contract instead of an empty one.
    #[must_use]
    pub fn with_engine(mut self, engine: ContractEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Play one turn. Returns `None` once the game is over.
    #[instrument(skip(self), fields(turn = self.ledger.next_turn_number(), actor = %self.state.current_actor))]
    pub fn play_turn(&mut self) -> Option<TurnOutcome> {
        if self.state.status.is_terminal() {
            return None;
        }
        let actor = self.state.current_actor;
        let turn_number = self.ledger.next_turn_number();

        self.enter(TurnPhase::AwaitingCandidates);
        let permitted = self.config.permissions.permitted(self.seats[actor].participant.target);
        self.candidates = self
            .catalog
            .sample(permitted, self.config.cards_per_turn, &mut self.rng);

        self.enter(TurnPhase::AwaitingDecision);
        let prompt = self.render_prompt(actor, turn_number);
        let response = self.seats[actor].agent.decide(&prompt);

        self.enter(TurnPhase::Validating);
        let (narrative, decision) = match response {
            Ok(text) => {
                let decision = parse_decision(&text, self.candidates.len());
                (text, decision)
            }
            Err(err) => (String::new(), Err(err.into())),
        };

        let record = match decision {
            Err(err) => {
                warn!(error = %err, "malformed move");
                TurnRecord::failure(
                    turn_number,
                    actor,
                    narrative,
                    None,
                    &self.engine,
                    FailureReason::MalformedMove,
                    err.to_string(),
                )
            }
            Ok(decision) => {
                self.enter(TurnPhase::Applying);
                if !decision.rationale.is_empty() {
                    self.seats[actor].notes.push(decision.rationale.clone());
                }

                let card = &self.candidates[decision.index()];
                match self.engine.try_apply(&card.code_fragment) {
                    Ok(()) => {
                        debug!(card = %card.id, variables = %self.engine.variables(), "card applied");
                        TurnRecord::success(turn_number, actor, decision.rationale, card, &self.engine)
                    }
                    Err(err) => {
                        warn!(card = %card.id, error = %err, "card rejected");
                        TurnRecord::failure(
                            turn_number,
                            actor,
                            decision.rationale,
                            Some(card),
                            &self.engine,
                            FailureReason::ExecutionRejected,
                            err.to_string(),
                        )
                    }
                }
            }
        };

        let success = record.success;
        let failure_reason = record.failure_reason;
        self.ledger.append(record);
        self.state.turn_count += 1;
        self.enter(TurnPhase::Recorded);
        self.enter(TurnPhase::TerminalCheck);
        let status = self.check_terminal(actor);
        self.state.status = status;
        if status.is_terminal() {
            self.ledger.finish(status);
            self.enter(TurnPhase::Terminal);
            match status.winner() {
                Some(winner) => info!(
                    winner = %self.seats[winner].participant.name,
                    turns = self.state.turn_count,
                    "game won"
                ),
                None => info!(turns = self.state.turn_count, "game drawn"),
            }
        } else {
            self.state.pass_turn();
            self.enter(TurnPhase::AwaitingCandidates);
        }

        Some(TurnOutcome {
            turn_number,
            actor,
            success,
            failure_reason,
            status,
        })
    }

    /// Play until someone wins or the turn limit is hit.
    pub fn run(&mut self) -> GameStatus {
        while self.play_turn().is_some() {}
        self.state.status
    }

    /// Hand the finished game to a profile sink.
    pub fn report_to(&self, sink: &mut dyn ProfileSink) -> Result<(), ExportError> {
        sink.record_game(&self.export())
    }

    fn enter(&mut self, phase: TurnPhase) {
        trace!(?phase, "turn phase");
        self.phase = phase;
    }

    fn check_terminal(&self, mover: ActorId) -> GameStatus {
        for actor in [mover, mover.other()] {
            if self
                .engine
                .evaluate_predicate(&self.seats[actor].participant.victory_condition)
            {
                return GameStatus::Won(actor);
            }
        }
        if self.state.turn_count >= self.config.max_turns {
            GameStatus::Draw
        } else {
            GameStatus::Ongoing
        }
    }

    fn render_prompt(&self, actor: ActorId, turn_number: u32) -> String {
        let seat = &self.seats[actor];
        let window = self.config.memory_window;
        let notes = &seat.notes[seat.notes.len().saturating_sub(window)..];

        self.renderer.render(&PromptContext {
            turn_number,
            actor_name: &seat.participant.name,
            participants: &self.ledger.meta().participants,
            engine: &self.engine,
            recent: self.ledger.recent(window),
            victory_condition: &seat.participant.victory_condition,
            candidates: &self.candidates,
            notes,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &ContractEngine {
        &self.engine
    }

    #[must_use]
    pub fn ledger(&self) -> &TurnLedger {
        &self.ledger
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Candidates offered on the most recent turn.
    #[must_use]
    pub fn candidates(&self) -> &[Card] {
        &self.candidates
    }

    #[must_use]
    pub fn participant(&self, actor: ActorId) -> &Participant {
        &self.seats[actor].participant
    }

    /// Rationales a party has given so far.
    #[must_use]
    pub fn notes(&self, actor: ActorId) -> &[String] {
        &self.seats[actor].notes
    }

    #[must_use]
    pub fn export(&self) -> GameExport {
        self.ledger.export()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("variables", &self.engine.variables())
            .finish_non_exhaustive()
    }
}
