//! Structural directives: reserved fragments that reshape the contract
//! instead of adding a line.

use std::str::FromStr;

use super::error::ParseError;
use super::variables::Variable;

/// Prefix every directive fragment starts with.
pub const DIRECTIVE_PREFIX: &str = "__contract__";

/// Whether a card fragment is a directive rather than code.
#[must_use]
pub fn is_directive(fragment: &str) -> bool {
    fragment.trim_start().starts_with(DIRECTIVE_PREFIX)
}

/// Which line `remove(...)` targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveTarget {
    /// The index held in a variable at the time the directive runs.
    Variable(Variable),
    Index(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `__contract__.pop()`
    Pop,
    /// `__contract__.remove(x)` or `__contract__.remove(3)`
    Remove(RemoveTarget),
    /// `__contract__.clear()`
    Clear,
    /// `__contract__.clean()`
    Clean,
    /// `__contract__.optimize()`
    Optimize,
    /// `__contract__.invert()`
    Invert,
}

impl FromStr for Directive {
    type Err = ParseError;

    fn from_str(fragment: &str) -> Result<Self, Self::Err> {
        let unknown = || ParseError::UnknownDirective(fragment.trim().to_string());

        let call = fragment
            .trim()
            .strip_prefix(DIRECTIVE_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .ok_or_else(unknown)?;
        let (name, args) = call
            .strip_suffix(')')
            .and_then(|c| c.split_once('('))
            .ok_or_else(unknown)?;
        let args = args.trim();

        let directive = match (name.trim(), args) {
            ("pop", "") => Directive::Pop,
            ("clear", "") => Directive::Clear,
            ("clean", "") => Directive::Clean,
            ("optimize", "") => Directive::Optimize,
            ("invert", "") => Directive::Invert,
            ("remove", arg) => {
                let target = match Variable::from_name(arg) {
                    Some(var) => RemoveTarget::Variable(var),
                    None => RemoveTarget::Index(arg.parse().map_err(|_| unknown())?),
                };
                Directive::Remove(target)
            }
            _ => return Err(unknown()),
        };
        Ok(directive)
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let call = match self {
            Directive::Pop => "pop()".to_string(),
            Directive::Remove(RemoveTarget::Variable(var)) => format!("remove({var})"),
            Directive::Remove(RemoveTarget::Index(i)) => format!("remove({i})"),
            Directive::Clear => "clear()".to_string(),
            Directive::Clean => "clean()".to_string(),
            Directive::Optimize => "optimize()".to_string(),
            Directive::Invert => "invert()".to_string(),
        };
        write!(f, "{DIRECTIVE_PREFIX}.{call}")
    }
}
