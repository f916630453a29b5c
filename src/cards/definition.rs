//! Card definitions - static catalog entries.
//!
//! A card offers one code fragment or structural directive. Its category
//! decides which parties may be offered it; its weight decides how often.

use serde::{Deserialize, Serialize};

use crate::contract::{is_directive, Variable};

/// Unique identifier of a catalog entry, e.g. `"op_increment_x"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Card category. Split variants aim at one variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Aggressive,
    AggressiveX,
    AggressiveY,
    Defensive,
    DefensiveX,
    DefensiveY,
    Strategic,
    Utility,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Aggressive,
        Category::AggressiveX,
        Category::AggressiveY,
        Category::Defensive,
        Category::DefensiveX,
        Category::DefensiveY,
        Category::Strategic,
        Category::Utility,
    ];

    /// The variable a split category aims at.
    #[must_use]
    pub fn target(self) -> Option<Variable> {
        match self {
            Category::AggressiveX | Category::DefensiveX => Some(Variable::X),
            Category::AggressiveY | Category::DefensiveY => Some(Variable::Y),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Aggressive => "AGGRESSIVE",
            Category::AggressiveX => "AGGRESSIVE_X",
            Category::AggressiveY => "AGGRESSIVE_Y",
            Category::Defensive => "DEFENSIVE",
            Category::DefensiveX => "DEFENSIVE_X",
            Category::DefensiveY => "DEFENSIVE_Y",
            Category::Strategic => "STRATEGIC",
            Category::Utility => "UTILITY",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_complexity() -> u8 {
    1
}

/// Immutable catalog entry.
///
/// ## Example
///
/// ```
/// use contract_duel::cards::{Card, Category};
///
/// let double = Card::new("op_double_x", "Double X", "x *= 2", Category::AggressiveX)
///     .with_description("Double the value of x")
///     .with_complexity(2);
///
/// assert_eq!(double.frequency_weight, 1.0);
/// assert!(!double.is_directive());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub code_fragment: String,
    pub category: Category,
    /// 1 (trivial) to 5 (intricate).
    #[serde(default = "default_complexity")]
    pub complexity: u8,
    /// Relative draw weight; 0 means "only once nothing else is left".
    #[serde(default = "default_weight")]
    pub frequency_weight: f64,
}

impl Card {
    pub fn new(
        id: impl Into<CardId>,
        name: impl Into<String>,
        code_fragment: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            code_fragment: code_fragment.into(),
            category,
            complexity: default_complexity(),
            frequency_weight: default_weight(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_complexity(mut self, complexity: u8) -> Self {
        self.complexity = complexity;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.frequency_weight = weight;
        self
    }

    /// Whether the fragment is a structural directive.
    #[must_use]
    pub fn is_directive(&self) -> bool {
        is_directive(&self.code_fragment)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
