//! Tokenizer for contract fragments.

use super::error::ParseError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Int(i64),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    DoubleSlash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    Assign,
    /// `+=`, `-=`, `*=`, `//=`, `%=`, `**=`: the operator before `=`.
    AugAssign(&'static str),
    LParen,
    RParen,
    /// `;` or a newline.
    Separator,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{n}"),
            Token::Ident(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::DoubleStar => f.write_str("**"),
            Token::DoubleSlash => f.write_str("//"),
            Token::Percent => f.write_str("%"),
            Token::Lt => f.write_str("<"),
            Token::Le => f.write_str("<="),
            Token::Gt => f.write_str(">"),
            Token::Ge => f.write_str(">="),
            Token::EqEq => f.write_str("=="),
            Token::NotEq => f.write_str("!="),
            Token::Assign => f.write_str("="),
            Token::AugAssign(op) => write!(f, "{op}="),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Separator => f.write_str(";"),
        }
    }
}

/// A token and the byte offset it starts at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c == b'\n' || c == b';' {
            tokens.push(Spanned { token: Token::Separator, pos: start });
            i += 1;
            continue;
        }
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let literal = &source[start..i];
            let value = literal.parse::<i64>().map_err(|_| ParseError::IntegerOutOfRange {
                literal: literal.to_string(),
            })?;
            tokens.push(Spanned { token: Token::Int(value), pos: start });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Spanned {
                token: Token::Ident(source[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        let rest = &source[start..];
        let (token, len) = if rest.starts_with("**=") {
            (Token::AugAssign("**"), 3)
        } else if rest.starts_with("//=") {
            (Token::AugAssign("//"), 3)
        } else if rest.starts_with("**") {
            (Token::DoubleStar, 2)
        } else if rest.starts_with("//") {
            (Token::DoubleSlash, 2)
        } else if rest.starts_with("+=") {
            (Token::AugAssign("+"), 2)
        } else if rest.starts_with("-=") {
            (Token::AugAssign("-"), 2)
        } else if rest.starts_with("*=") {
            (Token::AugAssign("*"), 2)
        } else if rest.starts_with("%=") {
            (Token::AugAssign("%"), 2)
        } else if rest.starts_with("<=") {
            (Token::Le, 2)
        } else if rest.starts_with(">=") {
            (Token::Ge, 2)
        } else if rest.starts_with("==") {
            (Token::EqEq, 2)
        } else if rest.starts_with("!=") {
            (Token::NotEq, 2)
        } else {
            match c {
                b'+' => (Token::Plus, 1),
                b'-' => (Token::Minus, 1),
                b'*' => (Token::Star, 1),
                b'%' => (Token::Percent, 1),
                b'<' => (Token::Lt, 1),
                b'>' => (Token::Gt, 1),
                b'=' => (Token::Assign, 1),
                b'(' => (Token::LParen, 1),
                b')' => (Token::RParen, 1),
                b'/' => return Err(ParseError::UnsupportedOperator { op: "/".into() }),
                _ => {
                    let ch = rest.chars().next().unwrap_or('?');
                    return Err(ParseError::UnexpectedChar { ch, pos: start });
                }
            }
        };
        tokens.push(Spanned { token, pos: start });
        i += len;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(
            kinds("x //= 2"),
            vec![Token::Ident("x".into()), Token::AugAssign("//"), Token::Int(2)]
        );
        assert_eq!(
            kinds("y**=3"),
            vec![Token::Ident("y".into()), Token::AugAssign("**"), Token::Int(3)]
        );
    }

    #[test]
    fn test_separators() {
        let tokens = kinds("z = x; x = y\ny = z");
        let seps = tokens.iter().filter(|t| **t == Token::Separator).count();
        assert_eq!(seps, 2);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            kinds("x <= y != z"),
            vec![
                Token::Ident("x".into()),
                Token::Le,
                Token::Ident("y".into()),
                Token::NotEq,
                Token::Ident("z".into()),
            ]
        );
    }

    #[test]
    fn test_rejects_foreign_syntax() {
        assert!(matches!(
            tokenize("globals()['x']"),
            Err(ParseError::UnexpectedChar { ch: '[', .. })
        ));
        assert!(matches!(
            tokenize("os.system"),
            Err(ParseError::UnexpectedChar { ch: '.', .. })
        ));
        assert!(matches!(
            tokenize("x = x / 2"),
            Err(ParseError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_integer_out_of_range() {
        assert!(matches!(
            tokenize("x = 99999999999999999999"),
            Err(ParseError::IntegerOutOfRange { .. })
        ));
    }
}
