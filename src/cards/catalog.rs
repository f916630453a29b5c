//! Card catalog: definition lookup, validation, loading, and candidate
//! sampling.
//!
//! The catalog keeps insertion order so that seeded sampling is
//! reproducible across runs.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use super::definition::{Card, CardId, Category};
use crate::contract::{parse_program, Directive, ParseError};
use crate::core::GameRng;

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("card id {0} registered twice")]
    DuplicateId(CardId),

    #[error("card {id}: complexity {complexity} outside 1..=5")]
    InvalidComplexity { id: CardId, complexity: u8 },

    #[error("card {id}: frequency weight {weight} must be finite and >= 0")]
    InvalidWeight { id: CardId, weight: f64 },

    #[error("card {id}: {source}")]
    InvalidFragment {
        id: CardId,
        #[source]
        source: ParseError,
    },
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use contract_duel::cards::{Card, CardCatalog, Category};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(Card::new("inc", "Increment", "x += 1", Category::AggressiveX));
///
/// assert_eq!(catalog.get(&"inc".into()).unwrap().name, "Increment");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<Card>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a card.
    pub fn try_register(&mut self, card: Card) -> Result<(), CatalogError> {
        if self.index.contains_key(&card.id) {
            return Err(CatalogError::DuplicateId(card.id));
        }
        validate(&card)?;
        self.index.insert(card.id.clone(), self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    /// Register a card.
    ///
    /// Panics if the id is taken or the card is malformed. Use
    /// `try_register` for data that did not come from code.
    pub fn register(&mut self, card: Card) {
        if let Err(err) = self.try_register(card) {
            panic!("invalid catalog entry: {err}");
        }
    }

    /// Build a catalog from cards, stopping at the first invalid one.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for card in cards {
            catalog.try_register(card)?;
        }
        Ok(catalog)
    }

    /// Parse a JSON array of cards.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Self::from_cards(cards)
    }

    /// Load a JSON catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        debug!(path = %path.display(), cards = catalog.len(), "loaded card catalog");
        Ok(catalog)
    }

    /// Serialize back to the JSON array format `from_json_str` reads.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.cards)?)
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.index.get(id).map(|&i| &self.cards[i])
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.category == category)
    }

    /// Cards whose category is in `permitted`, in registration order.
    #[must_use]
    pub fn permitted(&self, permitted: &[Category]) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| permitted.contains(&c.category))
            .collect()
    }

    /// Draw up to `count` distinct candidates from the permitted categories.
    ///
    /// Draws are weighted by `frequency_weight` without replacement. A
    /// zero-weight card is only drawn once no positive-weight card is left
    /// in the pool, and then uniformly.
    pub fn sample(&self, permitted: &[Category], count: usize, rng: &mut GameRng) -> Vec<Card> {
        let mut pool = self.permitted(permitted);
        let mut drawn = Vec::with_capacity(count.min(pool.len()));

        while drawn.len() < count && !pool.is_empty() {
            let weights: Vec<f64> = pool.iter().map(|c| c.frequency_weight).collect();
            let pick = match rng.choose_weighted(&weights) {
                Some(i) => i,
                None => rng.gen_range_usize(0..pool.len()),
            };
            drawn.push(pool.remove(pick).clone());
        }
        drawn
    }

    /// The stock card set the game ships with.
    #[must_use]
    pub fn standard() -> Self {
        use Category::*;

        #[rustfmt::skip]
        let entries: [(&str, &str, &str, &str, Category, u8, f64); 26] = [
            ("op_increment_x", "Direct Increment", "Increment x by 1", "x += 1", AggressiveX, 1, 1.0),
            ("op_double_x", "Double Strike", "Double the value of x", "x *= 2", AggressiveX, 2, 1.0),
            ("op_add_y_to_x", "Power Play", "Add y's value to x", "x += y", AggressiveX, 3, 0.8),
            ("op_square_x", "Exponential Surge", "Square x", "x **= 2", AggressiveX, 4, 0.4),
            ("op_increment_y", "Climb Y", "Increment y by 1", "y += 1", AggressiveY, 1, 1.0),
            ("op_double_y", "Double Y", "Double the value of y", "y *= 2", AggressiveY, 2, 1.0),
            ("op_add_x_to_y", "Siphon", "Add x's value to y", "y += x", AggressiveY, 3, 0.8),
            ("op_decrement_x", "Decrease X", "Decrease x by 1", "x -= 1", DefensiveX, 1, 1.0),
            ("op_halve_x", "Halve X", "Integer-divide x by 2", "x //= 2", DefensiveX, 2, 1.0),
            ("op_negate_x", "Negate X", "Make x negative", "x = -abs(x)", DefensiveX, 3, 0.6),
            ("op_decrement_y", "Decrease Y", "Decrease y by 1", "y -= 1", DefensiveY, 1, 1.0),
            ("op_halve_y", "Halve Y", "Integer-divide y by 2", "y //= 2", DefensiveY, 2, 1.0),
            ("op_negate_y", "Negate Y", "Make y negative", "y = -abs(y)", DefensiveY, 3, 0.6),
            ("transfer_x_to_y", "Copy X to Y", "Set y to x", "y = x", Strategic, 1, 1.0),
            ("transfer_y_to_x", "Copy Y to X", "Set x to y", "x = y", Strategic, 1, 1.0),
            ("transfer_x_to_z", "Value Storage", "Store x's value in z", "z = x", Strategic, 1, 1.0),
            ("transfer_z_to_x", "Recall to X", "Set x to z", "x = z", Strategic, 1, 1.0),
            ("transfer_z_to_y", "Recall to Y", "Set y to z", "y = z", Strategic, 1, 1.0),
            ("str_swap", "Variable Swap", "Swap x and y using z", "z = x; x = y; y = z", Strategic, 3, 0.7),
            ("str_conditional_boost", "Conditional Boost", "Double x if y is negative", "x *= 2 if y < 0 else x", Strategic, 4, 0.5),
            ("util_reset_z", "Reset Z", "Reset z to 0", "z = 0", Utility, 1, 1.0),
            ("util_abs_x", "Absolute Value", "Make x positive", "x = abs(x)", Utility, 2, 0.8),
            ("util_pop", "Remove Last Line", "Remove the most recently added line", "__contract__.pop()", Utility, 1, 0.6),
            ("util_clean", "Clear Inactive Lines", "Remove lines that never execute", "__contract__.clean()", Utility, 2, 0.4),
            ("util_optimize", "Optimize Order", "Execute lines in the order they were written", "__contract__.optimize()", Utility, 3, 0.4),
            ("util_invert", "Invert Order", "Reverse the execution order", "__contract__.invert()", Utility, 3, 0.4),
        ];

        let mut catalog = Self::new();
        for (id, name, description, code, category, complexity, weight) in entries {
            catalog.register(
                Card::new(id, name, code, category)
                    .with_description(description)
                    .with_complexity(complexity)
                    .with_weight(weight),
            );
        }
        catalog.register(
            Card::new("util_clear", "Clear Contract", "__contract__.clear()", Utility)
                .with_description("Remove every line from the contract")
                .with_complexity(2)
                .with_weight(0.2),
        );
        catalog.register(
            Card::new("util_remove_x", "Targeted Removal", "__contract__.remove(x)", Utility)
                .with_description("Remove the line whose index equals x")
                .with_complexity(4)
                .with_weight(0.3),
        );
        catalog
    }
}

fn validate(card: &Card) -> Result<(), CatalogError> {
    if !(1..=5).contains(&card.complexity) {
        return Err(CatalogError::InvalidComplexity {
            id: card.id.clone(),
            complexity: card.complexity,
        });
    }
    if !card.frequency_weight.is_finite() || card.frequency_weight < 0.0 {
        return Err(CatalogError::InvalidWeight {
            id: card.id.clone(),
            weight: card.frequency_weight,
        });
    }

    let checked = if card.is_directive() {
        card.code_fragment.parse::<Directive>().map(|_| ())
    } else {
        parse_program(&card.code_fragment).map(|_| ())
    };
    checked.map_err(|source| CatalogError::InvalidFragment {
        id: card.id.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, category: Category, weight: f64) -> Card {
        Card::new(id, id, "x += 1", category).with_weight(weight)
    }

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();
        catalog.register(card("a", Category::Utility, 1.0));

        assert!(catalog.contains(&"a".into()));
        assert_eq!(catalog.get(&"a".into()).unwrap().id.as_str(), "a");
        assert!(catalog.get(&"missing".into()).is_none());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_id_panics() {
        let mut catalog = CardCatalog::new();
        catalog.register(card("a", Category::Utility, 1.0));
        catalog.register(card("a", Category::Strategic, 1.0));
    }

    #[test]
    fn test_validation() {
        let mut catalog = CardCatalog::new();

        let err = catalog
            .try_register(card("c", Category::Utility, 1.0).with_complexity(6))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidComplexity { complexity: 6, .. }));

        let err = catalog.try_register(card("w", Category::Utility, -0.5)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidWeight { .. }));

        let err = catalog
            .try_register(Card::new("bad", "Bad", "import os", Category::Utility))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFragment { .. }));

        let err = catalog
            .try_register(Card::new("dir", "Dir", "__contract__.explode()", Category::Utility))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFragment { .. }));

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = CardCatalog::standard();
        assert_eq!(catalog.len(), 28);
        assert_eq!(catalog.by_category(Category::AggressiveX).count(), 4);
        assert!(catalog.get(&"util_pop".into()).unwrap().is_directive());
        assert_eq!(catalog.get(&"op_increment_x".into()).unwrap().code_fragment, "x += 1");
    }

    #[test]
    fn test_json_roundtrip() {
        let catalog = CardCatalog::standard();
        let json = catalog.to_json().unwrap();
        let loaded = CardCatalog::from_json_str(&json).unwrap();

        assert_eq!(loaded.len(), catalog.len());
        assert!(loaded.iter().eq(catalog.iter()));
    }

    #[test]
    fn test_json_rejects_duplicates() {
        let json = r#"[
            {"id":"a","name":"A","code_fragment":"x += 1","category":"UTILITY"},
            {"id":"a","name":"B","code_fragment":"y += 1","category":"UTILITY"}
        ]"#;
        assert!(matches!(
            CardCatalog::from_json_str(json),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_sample_respects_categories_and_count() {
        let catalog = CardCatalog::standard();
        let mut rng = GameRng::new(3);
        let permitted = [Category::AggressiveX, Category::Utility];

        for _ in 0..20 {
            let drawn = catalog.sample(&permitted, 3, &mut rng);
            assert_eq!(drawn.len(), 3);
            assert!(drawn.iter().all(|c| permitted.contains(&c.category)));

            let mut ids: Vec<_> = drawn.iter().map(|c| c.id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 3, "drawn without replacement");
        }
    }

    #[test]
    fn test_sample_small_pool() {
        let catalog = CardCatalog::from_cards([card("a", Category::Strategic, 1.0)]).unwrap();
        let mut rng = GameRng::new(3);

        assert_eq!(catalog.sample(&[Category::Strategic], 5, &mut rng).len(), 1);
        assert!(catalog.sample(&[Category::Utility], 5, &mut rng).is_empty());
    }

    #[test]
    fn test_zero_weight_drawn_last() {
        let catalog = CardCatalog::from_cards([
            card("zero_a", Category::Utility, 0.0),
            card("live_a", Category::Utility, 0.1),
            card("zero_b", Category::Utility, 0.0),
            card("live_b", Category::Utility, 5.0),
        ])
        .unwrap();

        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let drawn = catalog.sample(&[Category::Utility], 2, &mut rng);
            assert!(drawn.iter().all(|c| c.frequency_weight > 0.0), "seed {seed}");

            let drawn = catalog.sample(&[Category::Utility], 4, &mut rng);
            assert!(drawn[..2].iter().all(|c| c.frequency_weight > 0.0), "seed {seed}");
            assert!(drawn[2..].iter().all(|c| c.frequency_weight == 0.0), "seed {seed}");
        }
    }

    #[test]
    fn test_sample_is_seeded() {
        let catalog = CardCatalog::standard();
        let permitted = Category::ALL;

        let a = catalog.sample(&permitted, 3, &mut GameRng::new(11));
        let b = catalog.sample(&permitted, 3, &mut GameRng::new(11));
        assert_eq!(a, b);
    }
}
