//! Game configuration.
//!
//! A `GameConfig` fixes the turn limit, how many cards are offered per turn,
//! how much history the prompt shows, the sampling seed, and which card
//! categories each party may draw from. It can be built in code or loaded
//! from TOML:
//!
//! ```toml
//! max_turns = 20
//! cards_per_turn = 4
//! seed = 7
//!
//! [permissions]
//! x = ["AGGRESSIVE_X", "DEFENSIVE_Y", "UTILITY"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Category;
use crate::contract::Variable;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which categories a party may draw from, keyed by the variable it targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub x: Vec<Category>,
    pub y: Vec<Category>,
    pub z: Vec<Category>,
}

impl CategoryRules {
    /// Categories permitted to a party that is trying to move `target`.
    #[must_use]
    pub fn permitted(&self, target: Variable) -> &[Category] {
        match target {
            Variable::X => &self.x,
            Variable::Y => &self.y,
            Variable::Z => &self.z,
        }
    }

    /// Allow every category regardless of target.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            x: Category::ALL.to_vec(),
            y: Category::ALL.to_vec(),
            z: Category::ALL.to_vec(),
        }
    }
}

impl Default for CategoryRules {
    /// A party pushing `x` gets cards that raise `x` or lower `y`, and the
    /// mirror for `y`. Shared categories are open to everyone.
    fn default() -> Self {
        use Category::*;
        let shared = [Aggressive, Defensive, Strategic, Utility];
        let with = |extra: &[Category]| extra.iter().chain(shared.iter()).copied().collect();
        Self {
            x: with(&[AggressiveX, DefensiveY]),
            y: with(&[AggressiveY, DefensiveX]),
            z: shared.to_vec(),
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Turn limit; reaching it without a winner is a draw.
    pub max_turns: u32,

    /// Maximum number of candidate cards offered per turn.
    pub cards_per_turn: usize,

    /// Number of recent turns and strategy notes shown in the prompt.
    pub memory_window: usize,

    /// Seed for candidate sampling. Same seed, same offers.
    pub seed: u64,

    /// Category permissions per target variable.
    pub permissions: CategoryRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turns: 50,
            cards_per_turn: 3,
            memory_window: 5,
            seed: 42,
            permissions: CategoryRules::default(),
        }
    }
}

impl GameConfig {
    /// Set the turn limit.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the number of cards offered per turn.
    #[must_use]
    pub fn with_cards_per_turn(mut self, count: usize) -> Self {
        self.cards_per_turn = count;
        self
    }

    /// Set the prompt history window.
    #[must_use]
    pub fn with_memory_window(mut self, window: usize) -> Self {
        self.memory_window = window;
        self
    }

    /// Set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the category permissions.
    #[must_use]
    pub fn with_permissions(mut self, permissions: CategoryRules) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be > 0".into()));
        }
        if self.cards_per_turn == 0 {
            return Err(ConfigError::Invalid("cards_per_turn must be > 0".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    ///
    /// If the file is missing, returns `GameConfig::default()`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.max_turns, 50);
        assert_eq!(config.cards_per_turn, 3);
        assert_eq!(config.memory_window, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default()
            .with_max_turns(10)
            .with_cards_per_turn(5)
            .with_seed(123);

        assert_eq!(config.max_turns, 10);
        assert_eq!(config.cards_per_turn, 5);
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn test_default_permissions_mirror() {
        let rules = CategoryRules::default();
        assert!(rules.permitted(Variable::X).contains(&Category::AggressiveX));
        assert!(rules.permitted(Variable::X).contains(&Category::DefensiveY));
        assert!(!rules.permitted(Variable::X).contains(&Category::AggressiveY));
        assert!(rules.permitted(Variable::Y).contains(&Category::AggressiveY));
        assert!(rules.permitted(Variable::Y).contains(&Category::DefensiveX));
        assert!(rules.permitted(Variable::Z).contains(&Category::Utility));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = GameConfig::from_toml_str(
            r#"
            max_turns = 12
            seed = 9

            [permissions]
            x = ["AGGRESSIVE_X", "UTILITY"]
            "#,
        )
        .unwrap();

        assert_eq!(config.max_turns, 12);
        assert_eq!(config.seed, 9);
        assert_eq!(config.cards_per_turn, 3);
        assert_eq!(
            config.permissions.permitted(Variable::X),
            &[Category::AggressiveX, Category::Utility]
        );
        assert_eq!(
            config.permissions.permitted(Variable::Y),
            CategoryRules::default().permitted(Variable::Y)
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GameConfig::from_toml_str("max_turns = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameConfig::from_toml_str("cards_per_turn = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        std::fs::write(&path, "cards_per_turn = 4\n").unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.cards_per_turn, 4);
    }
}
