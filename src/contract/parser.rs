//! Recursive-descent parser from fragment text to [`Program`].
//!
//! Precedence, loosest first: conditional, `or`, `and`, `not`,
//! comparison, `+ -`, `* // %`, unary `+ -`, `**`.
//!
//! Every nested sub-expression and every operator link counts against
//! [`MAX_DEPTH`], which bounds both parsing and evaluation recursion.

use smallvec::SmallVec;

use super::ast::{BinOp, CmpOp, Expr, Program, Stmt, UnaryOp};
use super::error::ParseError;
use super::lexer::{tokenize, Spanned, Token};
use super::variables::Variable;

/// Deepest expression tree a fragment may build.
pub const MAX_DEPTH: usize = 64;

/// Compile a fragment. Statements are separated by `;` or newlines.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let mut stmts = SmallVec::new();

    loop {
        parser.skip_separators();
        if parser.at_end() {
            break;
        }
        stmts.push(parser.statement()?);
        match parser.peek() {
            None | Some(Token::Separator) => {}
            Some(Token::Assign | Token::AugAssign(_)) => return Err(ParseError::NotAssignable),
            Some(_) => return Err(parser.unexpected()),
        }
    }

    if stmts.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(Program { stmts })
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|s| &s.token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(name)) if name == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(spanned) => ParseError::UnexpectedToken {
                found: spanned.token.to_string(),
                pos: spanned.pos,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.descend()?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn skip_separators(&mut self) {
        while self.eat(&Token::Separator) {}
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        let op = match self.peek_at(1) {
            Some(Token::Assign) => None,
            Some(Token::AugAssign(symbol)) => {
                let op = BinOp::from_symbol(symbol).ok_or_else(|| ParseError::UnsupportedOperator {
                    op: format!("{symbol}="),
                })?;
                Some(op)
            }
            _ => return Ok(Stmt::Expr(self.expr()?)),
        };

        let target = match self.peek() {
            Some(Token::Ident(name)) => {
                Variable::from_name(name).ok_or_else(|| ParseError::UnknownName { name: name.clone() })?
            }
            _ => return Err(ParseError::NotAssignable),
        };
        self.pos += 2;
        let value = self.expr()?;
        Ok(Stmt::Assign { target, op, value })
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::conditional)
    }

    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let then = self.or_expr()?;
        if !self.eat_keyword("if") {
            return Ok(then);
        }
        let test = self.or_expr()?;
        if !self.eat_keyword("else") {
            return Err(self.unexpected());
        }
        let otherwise = self.expr()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and_expr()?;
        let mut links = 0;
        while self.eat_keyword("or") {
            self.descend()?;
            links += 1;
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        self.depth -= links;
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.not_expr()?;
        let mut links = 0;
        while self.eat_keyword("and") {
            self.descend()?;
            links += 1;
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        self.depth -= links;
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ParseError> {
        if self.eat_keyword("not") {
            let operand = self.nested(Self::not_expr)?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(operand)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let first = self.arith()?;
        let mut links = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => CmpOp::Lt,
                Some(Token::Le) => CmpOp::Le,
                Some(Token::Gt) => CmpOp::Gt,
                Some(Token::Ge) => CmpOp::Ge,
                Some(Token::EqEq) => CmpOp::Eq,
                Some(Token::NotEq) => CmpOp::Ne,
                _ => break,
            };
            self.pos += 1;
            links.push((op, self.arith()?));
        }
        if links.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare(Box::new(first), links))
        }
    }

    fn arith(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        let mut links = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => {
                    self.depth -= links;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            links += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        let mut links = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::DoubleSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => {
                    self.depth -= links;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            links += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Pos,
            _ => return self.power(),
        };
        self.pos += 1;
        let operand = self.nested(Self::unary)?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if self.eat(&Token::DoubleStar) {
            // Right-associative, and `2 ** -1` binds the sign to the exponent.
            let exponent = self.nested(Self::unary)?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.bump() {
            Some(Token::Int(n)) => Ok(Expr::Int(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "True" => Ok(Expr::Int(1)),
                "False" => Ok(Expr::Int(0)),
                "abs" => {
                    self.expect(&Token::LParen)?;
                    let inner = self.expr()?;
                    self.expect(&Token::RParen)?;
                    Ok(Expr::Abs(Box::new(inner)))
                }
                _ => Variable::from_name(&name)
                    .map(Expr::Var)
                    .ok_or(ParseError::UnknownName { name }),
            },
            Some(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}
