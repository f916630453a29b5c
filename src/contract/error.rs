//! Contract error types.

use thiserror::Error;

/// A fragment is not part of the closed instruction set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty fragment")]
    Empty,

    #[error("unexpected character {ch:?} at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("integer literal {literal} does not fit in 64 bits")]
    IntegerOutOfRange { literal: String },

    #[error("operator {op} is not supported")]
    UnsupportedOperator { op: String },

    #[error("unknown name {name:?}")]
    UnknownName { name: String },

    #[error("unexpected {found} at offset {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of fragment")]
    UnexpectedEnd,

    #[error("left side of assignment must be x, y or z")]
    NotAssignable,

    #[error("unknown contract directive {0:?}")]
    UnknownDirective(String),

    #[error("fragment nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// A statement failed while executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    #[error("negative exponent")]
    NegativeExponent,
}

/// Why the engine rejected a mutation. The contract is unchanged whenever
/// one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("line {line} failed: {source}")]
    Eval {
        line: usize,
        #[source]
        source: EvalError,
    },

    #[error("contract has no lines")]
    EmptyContract,

    #[error("position {position} out of range for {len} lines")]
    PositionOutOfRange { position: i64, len: usize },

    #[error("execution order references line {index} but only {len} exist")]
    DanglingIndex { index: usize, len: usize },
}

/// A victory condition string could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("no comparison operator in {0:?}")]
    MissingOperator(String),

    #[error("unknown variable {0:?}")]
    UnknownVariable(String),

    #[error("invalid integer target {0:?}")]
    InvalidTarget(String),
}
