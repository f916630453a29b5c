//! The shared contract: a tiny closed language over `x`, `y`, `z` and the
//! transactional engine that replays it.
//!
//! ## Key Types
//!
//! - `ContractEngine`: lines, execution order, variables, structural operators
//! - `Program`: a compiled fragment (see [`parse_program`])
//! - `Directive`: the reserved `__contract__.*()` fragments
//! - `Predicate`: a victory condition such as `x >= 10`
//!
//! ## Instruction Set
//!
//! Assignment and compound assignment (`+= -= *= //= %= **=`), integer
//! arithmetic, comparisons, `and`/`or`/`not`, `a if c else b`, `abs(...)`
//! and `True`/`False`. Statements separate with `;` or newlines. Any other
//! name is a parse error, so there is nothing to sandbox.

pub mod ast;
pub mod directive;
pub mod engine;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod predicate;
pub mod variables;

pub use ast::{BinOp, CmpOp, Expr, Program, Stmt, UnaryOp};
pub use directive::{is_directive, Directive, RemoveTarget, DIRECTIVE_PREFIX};
pub use engine::{ContractEngine, Line, Snapshot};
pub use error::{ContractError, EvalError, ParseError, PredicateError};
pub use parser::{parse_program, MAX_DEPTH};
pub use predicate::{evaluate_predicate, Predicate};
pub use variables::{Variable, Variables, INITIAL_VALUE};
