//! The three contract variables and their environment.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Value every variable holds before the first line runs.
pub const INITIAL_VALUE: i64 = 1;

/// One of the three names a contract may read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    X,
    Y,
    Z,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::X, Variable::Y, Variable::Z];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Variable::X => "x",
            Variable::Y => "y",
            Variable::Z => "z",
        }
    }

    /// Look up a variable by its source name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Variable::X),
            "y" => Some(Variable::Y),
            "z" => Some(Variable::Z),
            _ => None,
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of `x`, `y` and `z`.
///
/// Owned by the contract engine and only ever produced by a full replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variables {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Variables {
    /// The fixed starting triple every replay begins from.
    pub const INITIAL: Variables = Variables::new(INITIAL_VALUE, INITIAL_VALUE, INITIAL_VALUE);

    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn get(&self, var: Variable) -> i64 {
        self[var]
    }

    pub fn set(&mut self, var: Variable, value: i64) {
        self[var] = value;
    }

    /// Iterate in `x`, `y`, `z` order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, i64)> + '_ {
        Variable::ALL.into_iter().map(move |v| (v, self[v]))
    }
}

impl Default for Variables {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Index<Variable> for Variables {
    type Output = i64;

    fn index(&self, var: Variable) -> &i64 {
        match var {
            Variable::X => &self.x,
            Variable::Y => &self.y,
            Variable::Z => &self.z,
        }
    }
}

impl IndexMut<Variable> for Variables {
    fn index_mut(&mut self, var: Variable) -> &mut i64 {
        match var {
            Variable::X => &mut self.x,
            Variable::Y => &mut self.y,
            Variable::Z => &mut self.z,
        }
    }
}

impl std::fmt::Display for Variables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}
