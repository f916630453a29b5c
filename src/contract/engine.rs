//! The contract engine: append-only lines, a free execution order over
//! them, and the variables a replay of that order produces.
//!
//! ## Transactions
//!
//! Every mutating operation takes a [`Snapshot`] first, mutates in place,
//! replays if needed, and restores the snapshot on any failure. Lines and
//! order live in `im::Vector`, so a snapshot is a structural-sharing clone
//! and restoring it cannot alias the state it replaces.
//!
//! ## Replay
//!
//! Variables are never updated incrementally. Each replay starts from
//! [`Variables::INITIAL`] and runs the order front to back against a
//! scratch copy; only a fully successful run is committed.

use std::sync::Arc;

use im::Vector;
use tracing::{debug, trace};

use super::ast::Program;
use super::directive::{is_directive, Directive, RemoveTarget};
use super::error::ContractError;
use super::parser::parse_program;
use super::predicate::evaluate_predicate;
use super::variables::Variables;

/// One accepted fragment: its source text and compiled program.
#[derive(Clone, Debug)]
pub struct Line {
    source: Arc<str>,
    program: Arc<Program>,
}

impl Line {
    /// Compile a fragment into a line.
    pub fn compile(source: &str) -> Result<Self, ContractError> {
        let program = parse_program(source)?;
        Ok(Self {
            source: Arc::from(source),
            program: Arc::new(program),
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Line {}

/// Saved `(lines, order, variables)` for rolling back a failed mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    lines: Vector<Line>,
    order: Vector<usize>,
    variables: Variables,
}

/// Whether a mutation changed what runs and needs a replay.
enum Replay {
    Required,
    Skip,
}

/// Run `order` over `lines` from the initial constants.
fn run(lines: &Vector<Line>, order: &Vector<usize>) -> Result<Variables, ContractError> {
    let mut env = Variables::INITIAL;
    for &index in order {
        let line = lines.get(index).ok_or(ContractError::DanglingIndex {
            index,
            len: lines.len(),
        })?;
        line.program
            .execute(&mut env)
            .map_err(|source| ContractError::Eval { line: index, source })?;
    }
    Ok(env)
}

/// The shared contract both parties edit.
///
/// ## Example
///
/// ```
/// use contract_duel::contract::{ContractEngine, Variables};
///
/// let mut contract = ContractEngine::new();
/// assert!(contract.append_line("x = x + 1"));
/// assert!(contract.append_line("y = x"));
/// assert!(contract.append_line("x = x * 2"));
/// assert_eq!(contract.variables(), Variables::new(4, 2, 1));
///
/// assert!(contract.invert_order());
/// assert_eq!(contract.variables(), Variables::new(3, 2, 1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ContractEngine {
    lines: Vector<Line>,
    order: Vector<usize>,
    variables: Variables,
}

impl ContractEngine {
    /// An empty contract at the initial constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Read-only views ===

    /// All lines in physical (append) order, active or not.
    #[must_use]
    pub fn lines(&self) -> &Vector<Line> {
        &self.lines
    }

    /// Source text of every line in physical order.
    pub fn line_sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(Line::source)
    }

    #[must_use]
    pub fn execution_order(&self) -> &Vector<usize> {
        &self.order
    }

    #[must_use]
    pub fn variables(&self) -> Variables {
        self.variables
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines the execution order references.
    #[must_use]
    pub fn active_line_count(&self) -> usize {
        let mut seen = vec![false; self.lines.len()];
        for &i in &self.order {
            seen[i] = true;
        }
        seen.into_iter().filter(|&s| s).count()
    }

    // === Snapshots ===

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            order: self.order.clone(),
            variables: self.variables,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.lines = snapshot.lines;
        self.order = snapshot.order;
        self.variables = snapshot.variables;
    }

    fn transact<F>(&mut self, label: &'static str, mutate: F) -> Result<(), ContractError>
    where
        F: FnOnce(&mut Self) -> Result<Replay, ContractError>,
    {
        let snapshot = self.snapshot();
        let result = match mutate(self) {
            Ok(Replay::Required) => self.try_replay(),
            Ok(Replay::Skip) => Ok(()),
            Err(err) => Err(err),
        };

        match &result {
            Ok(()) => trace!(op = label, vars = %self.variables, "contract mutation committed"),
            Err(err) => {
                self.restore(snapshot);
                debug!(op = label, error = %err, "contract mutation rolled back");
            }
        }
        result
    }

    // === Replay ===

    /// Recompute variables from scratch. On failure the previously
    /// committed variables stay visible.
    pub fn try_replay(&mut self) -> Result<(), ContractError> {
        self.variables = run(&self.lines, &self.order)?;
        Ok(())
    }

    /// Recompute variables from scratch; true iff every step succeeded.
    pub fn replay(&mut self) -> bool {
        self.try_replay().is_ok()
    }

    // === Mutations ===

    /// Compile `code`, append it, schedule it last, and replay.
    pub fn try_append_line(&mut self, code: &str) -> Result<(), ContractError> {
        self.transact("append", |c| {
            let line = Line::compile(code)?;
            c.lines.push_back(line);
            c.order.push_back(c.lines.len() - 1);
            Ok(Replay::Required)
        })
    }

    pub fn append_line(&mut self, code: &str) -> bool {
        self.try_append_line(code).is_ok()
    }

    /// Drop the newest line and every order entry that pointed at it.
    pub fn try_remove_last_line(&mut self) -> Result<(), ContractError> {
        self.transact("pop", |c| {
            if c.lines.pop_back().is_none() {
                return Err(ContractError::EmptyContract);
            }
            let len = c.lines.len();
            c.order = c.order.iter().copied().filter(|&i| i < len).collect();
            Ok(Replay::Required)
        })
    }

    pub fn remove_last_line(&mut self) -> bool {
        self.try_remove_last_line().is_ok()
    }

    /// Physically remove the line at `position`, shifting later indices down.
    ///
    /// Signed so a variable holding a negative value is rejected rather than
    /// wrapped.
    pub fn try_remove_at(&mut self, position: i64) -> Result<(), ContractError> {
        self.transact("remove", |c| {
            let len = c.lines.len();
            let index = usize::try_from(position)
                .ok()
                .filter(|&i| i < len)
                .ok_or(ContractError::PositionOutOfRange { position, len })?;

            c.lines.remove(index);
            c.order = c
                .order
                .iter()
                .filter(|&&i| i != index)
                .map(|&i| if i > index { i - 1 } else { i })
                .collect();
            Ok(Replay::Required)
        })
    }

    pub fn remove_at(&mut self, position: i64) -> bool {
        self.try_remove_at(position).is_ok()
    }

    /// Empty the contract and reset variables to the initial constants.
    pub fn clear_all(&mut self) -> bool {
        self.transact("clear", |c| {
            c.lines.clear();
            c.order.clear();
            c.variables = Variables::INITIAL;
            Ok(Replay::Skip)
        })
        .is_ok()
    }

    /// Drop lines the order never references and compact indices.
    ///
    /// Surviving lines keep their relative physical order, and the order is
    /// remapped entry by entry, so what runs, and in which sequence, is
    /// unchanged. A later `invert_order` gives the same result it would have
    /// given before the clean.
    pub fn restrict_to_active(&mut self) -> bool {
        self.transact("clean", |c| {
            let mut active = vec![false; c.lines.len()];
            for &i in &c.order {
                active[i] = true;
            }

            let mut kept = Vector::new();
            let mut new_index = vec![0usize; c.lines.len()];
            for (old, line) in c.lines.iter().enumerate() {
                if active[old] {
                    new_index[old] = kept.len();
                    kept.push_back(line.clone());
                }
            }

            c.order = c.order.iter().map(|&i| new_index[i]).collect();
            c.lines = kept;
            Ok(Replay::Skip)
        })
        .is_ok()
    }

    /// Execute lines in physical order: `[0, 1, …, n-1]`.
    pub fn try_reset_order_sequential(&mut self) -> Result<(), ContractError> {
        self.transact("optimize", |c| {
            c.order = (0..c.lines.len()).collect();
            Ok(Replay::Required)
        })
    }

    pub fn reset_order_sequential(&mut self) -> bool {
        self.try_reset_order_sequential().is_ok()
    }

    /// Reverse the execution order.
    pub fn try_invert_order(&mut self) -> Result<(), ContractError> {
        self.transact("invert", |c| {
            c.order = c.order.iter().rev().copied().collect();
            Ok(Replay::Required)
        })
    }

    pub fn invert_order(&mut self) -> bool {
        self.try_invert_order().is_ok()
    }

    /// Replace the execution order wholesale. Every entry must name an
    /// existing line.
    pub fn try_set_execution_order(
        &mut self,
        order: impl IntoIterator<Item = usize>,
    ) -> Result<(), ContractError> {
        self.transact("reorder", |c| {
            let len = c.lines.len();
            let order: Vector<usize> = order.into_iter().collect();
            if let Some(&index) = order.iter().find(|&&i| i >= len) {
                return Err(ContractError::DanglingIndex { index, len });
            }
            c.order = order;
            Ok(Replay::Required)
        })
    }

    // === Card application ===

    /// Run a structural directive.
    pub fn try_apply_directive(&mut self, directive: Directive) -> Result<(), ContractError> {
        match directive {
            Directive::Pop => self.try_remove_last_line(),
            Directive::Remove(RemoveTarget::Variable(var)) => self.try_remove_at(self.variables[var]),
            Directive::Remove(RemoveTarget::Index(i)) => {
                self.try_remove_at(i64::try_from(i).unwrap_or(i64::MAX))
            }
            Directive::Clear => {
                self.clear_all();
                Ok(())
            }
            Directive::Clean => {
                self.restrict_to_active();
                Ok(())
            }
            Directive::Optimize => self.try_reset_order_sequential(),
            Directive::Invert => self.try_invert_order(),
        }
    }

    /// Apply a card fragment: directives reshape, everything else appends.
    pub fn try_apply(&mut self, fragment: &str) -> Result<(), ContractError> {
        if is_directive(fragment) {
            let directive: Directive = fragment.parse()?;
            self.try_apply_directive(directive)
        } else {
            self.try_append_line(fragment)
        }
    }

    pub fn apply(&mut self, fragment: &str) -> bool {
        self.try_apply(fragment).is_ok()
    }

    // === Predicates ===

    /// Check a victory condition against the current variables. Malformed
    /// conditions are never satisfied.
    #[must_use]
    pub fn evaluate_predicate(&self, condition: &str) -> bool {
        evaluate_predicate(condition, &self.variables)
    }
}
