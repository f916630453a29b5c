//! Direct execution of compiled programs.
//!
//! Arithmetic is `i64`. Division floors and the remainder takes the sign
//! of the divisor. Overflow is an error, never a wrap.

use super::ast::{BinOp, Expr, Program, Stmt, UnaryOp};
use super::error::EvalError;
use super::variables::Variables;

impl Program {
    /// Run every statement against `env` in order.
    ///
    /// On error `env` may hold partial writes; callers execute against a
    /// scratch copy and discard it.
    pub fn execute(&self, env: &mut Variables) -> Result<(), EvalError> {
        for stmt in &self.stmts {
            match stmt {
                Stmt::Assign { target, op, value } => {
                    let rhs = value.eval(env)?;
                    let result = match op {
                        Some(op) => apply(*op, env[*target], rhs)?,
                        None => rhs,
                    };
                    env[*target] = result;
                }
                Stmt::Expr(expr) => {
                    expr.eval(env)?;
                }
            }
        }
        Ok(())
    }
}

impl Expr {
    pub fn eval(&self, env: &Variables) -> Result<i64, EvalError> {
        Ok(match self {
            Expr::Int(n) => *n,
            Expr::Var(var) => env[*var],
            Expr::Unary(op, operand) => {
                let value = operand.eval(env)?;
                match op {
                    UnaryOp::Neg => value.checked_neg().ok_or(EvalError::Overflow { op: "-" })?,
                    UnaryOp::Pos => value,
                    UnaryOp::Not => i64::from(value == 0),
                }
            }
            Expr::Binary(op, lhs, rhs) => apply(*op, lhs.eval(env)?, rhs.eval(env)?)?,
            Expr::Compare(first, links) => {
                let mut lhs = first.eval(env)?;
                for (op, next) in links {
                    let rhs = next.eval(env)?;
                    if !op.holds(lhs, rhs) {
                        return Ok(0);
                    }
                    lhs = rhs;
                }
                1
            }
            Expr::And(lhs, rhs) => {
                let left = lhs.eval(env)?;
                if left == 0 {
                    left
                } else {
                    rhs.eval(env)?
                }
            }
            Expr::Or(lhs, rhs) => {
                let left = lhs.eval(env)?;
                if left != 0 {
                    left
                } else {
                    rhs.eval(env)?
                }
            }
            Expr::Conditional { test, then, otherwise } => {
                if test.eval(env)? != 0 {
                    then.eval(env)?
                } else {
                    otherwise.eval(env)?
                }
            }
            Expr::Abs(inner) => inner
                .eval(env)?
                .checked_abs()
                .ok_or(EvalError::Overflow { op: "abs" })?,
        })
    }
}

fn apply(op: BinOp, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
    let overflow = EvalError::Overflow { op: op.symbol() };
    match op {
        BinOp::Add => lhs.checked_add(rhs).ok_or(overflow),
        BinOp::Sub => lhs.checked_sub(rhs).ok_or(overflow),
        BinOp::Mul => lhs.checked_mul(rhs).ok_or(overflow),
        BinOp::FloorDiv => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let quotient = lhs.checked_div(rhs).ok_or(overflow)?;
            if lhs % rhs != 0 && ((lhs < 0) != (rhs < 0)) {
                Ok(quotient - 1)
            } else {
                Ok(quotient)
            }
        }
        BinOp::Mod => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let remainder = lhs.wrapping_rem(rhs);
            if remainder != 0 && ((remainder < 0) != (rhs < 0)) {
                Ok(remainder + rhs)
            } else {
                Ok(remainder)
            }
        }
        BinOp::Pow => {
            if rhs < 0 {
                return Err(EvalError::NegativeExponent);
            }
            match lhs {
                0 => Ok(i64::from(rhs == 0)),
                1 => Ok(1),
                -1 => Ok(if rhs % 2 == 0 { 1 } else { -1 }),
                _ => {
                    let exponent = u32::try_from(rhs).map_err(|_| overflow)?;
                    lhs.checked_pow(exponent).ok_or(overflow)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::parser::parse_program;

    fn run(source: &str, start: Variables) -> Result<Variables, EvalError> {
        let mut env = start;
        parse_program(source).unwrap().execute(&mut env)?;
        Ok(env)
    }

    #[test]
    fn test_basic_assignment() {
        let env = run("x += 1", Variables::INITIAL).unwrap();
        assert_eq!(env, Variables::new(2, 1, 1));
    }

    #[test]
    fn test_swap_through_z() {
        let env = run("z = x; x = y; y = z", Variables::new(5, 9, 0)).unwrap();
        assert_eq!(env, Variables::new(9, 5, 5));
    }

    #[test]
    fn test_floor_semantics() {
        assert_eq!(apply(BinOp::FloorDiv, 7, 2), Ok(3));
        assert_eq!(apply(BinOp::FloorDiv, -7, 2), Ok(-4));
        assert_eq!(apply(BinOp::FloorDiv, 7, -2), Ok(-4));
        assert_eq!(apply(BinOp::Mod, -7, 2), Ok(1));
        assert_eq!(apply(BinOp::Mod, 7, -2), Ok(-1));
        assert_eq!(apply(BinOp::Mod, i64::MIN, -1), Ok(0));
        assert_eq!(apply(BinOp::FloorDiv, 1, 2), Ok(0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(run("x //= 0", Variables::INITIAL), Err(EvalError::DivisionByZero));
        assert_eq!(run("x = y % (z - 1)", Variables::INITIAL), Err(EvalError::DivisionByZero));
        assert_eq!(run("x = 2 ** -1", Variables::INITIAL), Err(EvalError::NegativeExponent));
        assert!(matches!(
            run("x = 9223372036854775807 + y", Variables::INITIAL),
            Err(EvalError::Overflow { op: "+" })
        ));
        assert!(matches!(
            run("x = 2 ** 64", Variables::INITIAL),
            Err(EvalError::Overflow { .. })
        ));
    }

    #[test]
    fn test_conditional_and_logic() {
        let env = run("x *= 2 if y < 0 else x", Variables::new(3, -1, 0)).unwrap();
        assert_eq!(env.x, 6);
        let env = run("x *= 2 if y < 0 else x", Variables::new(3, 1, 0)).unwrap();
        assert_eq!(env.x, 9);

        let env = run("z = x < y <= 5", Variables::new(1, 5, 0)).unwrap();
        assert_eq!(env.z, 1);
        let env = run("z = x and y", Variables::new(0, 7, 3)).unwrap();
        assert_eq!(env.z, 0);
        let env = run("z = x or y", Variables::new(0, 7, 3)).unwrap();
        assert_eq!(env.z, 7);
    }

    #[test]
    fn test_short_circuit_skips_errors() {
        let env = run("x = 0 and y // 0", Variables::INITIAL).unwrap();
        assert_eq!(env.x, 0);
        let env = run("x = 1 if True else 1 // 0", Variables::INITIAL).unwrap();
        assert_eq!(env.x, 1);
    }

    #[test]
    fn test_abs_and_power() {
        let env = run("y = -abs(y)", Variables::new(0, 4, 0)).unwrap();
        assert_eq!(env.y, -4);
        let env = run("x = -2 ** 2", Variables::INITIAL).unwrap();
        assert_eq!(env.x, -4);
        let env = run("x = 2 ** 3 ** 2", Variables::INITIAL).unwrap();
        assert_eq!(env.x, 512);
    }

    #[test]
    fn test_power_with_huge_exponent() {
        let env = run("x = 1 ** 5000000000", Variables::INITIAL).unwrap();
        assert_eq!(env.x, 1);
        let env = run("y = (-1) ** 5000000001; z = (-1) ** 5000000000", Variables::INITIAL).unwrap();
        assert_eq!((env.y, env.z), (-1, 1));
        let env = run("x = 0 ** 5000000000; y = 0 ** 0", Variables::INITIAL).unwrap();
        assert_eq!((env.x, env.y), (0, 1));

        assert_eq!(
            run("x = 2 ** 5000000000", Variables::INITIAL),
            Err(EvalError::Overflow { op: "**" })
        );
        assert_eq!(run("x = 1 ** -5", Variables::INITIAL), Err(EvalError::NegativeExponent));
    }
}
