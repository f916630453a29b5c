//! Victory conditions: `<variable> <op> <integer>`.

use std::str::FromStr;

use super::ast::CmpOp;
use super::error::PredicateError;
use super::variables::{Variable, Variables};

/// Two-character operators first so `>=` is never read as `>`.
const OPERATORS: [(&str, CmpOp); 6] = [
    (">=", CmpOp::Ge),
    ("<=", CmpOp::Le),
    ("==", CmpOp::Eq),
    ("!=", CmpOp::Ne),
    (">", CmpOp::Gt),
    ("<", CmpOp::Lt),
];

/// A parsed victory condition such as `x >= 10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub variable: Variable,
    pub op: CmpOp,
    pub target: i64,
}

impl Predicate {
    #[must_use]
    pub fn is_satisfied(&self, vars: &Variables) -> bool {
        self.op.holds(vars[self.variable], self.target)
    }
}

impl FromStr for Predicate {
    type Err = PredicateError;

    fn from_str(condition: &str) -> Result<Self, Self::Err> {
        let (lhs, op, rhs) = OPERATORS
            .iter()
            .find_map(|(symbol, op)| {
                condition
                    .split_once(symbol)
                    .map(|(lhs, rhs)| (lhs, *op, rhs))
            })
            .ok_or_else(|| PredicateError::MissingOperator(condition.to_string()))?;

        let name = lhs.trim();
        let variable = Variable::from_name(name)
            .ok_or_else(|| PredicateError::UnknownVariable(name.to_string()))?;
        let target = rhs
            .trim()
            .parse()
            .map_err(|_| PredicateError::InvalidTarget(rhs.trim().to_string()))?;

        Ok(Self { variable, op, target })
    }
}

/// Evaluate a condition string against `vars`; anything unparsable is false.
#[must_use]
pub fn evaluate_predicate(condition: &str, vars: &Variables) -> bool {
    condition
        .parse::<Predicate>()
        .map(|p| p.is_satisfied(vars))
        .unwrap_or(false)
}
