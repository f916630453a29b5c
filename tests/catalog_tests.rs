//! Catalog and configuration loading tests.

use std::io::Write;

use contract_duel::cards::{Card, CardCatalog, CatalogError, Category};
use contract_duel::contract::{ContractEngine, ParseError, MAX_DEPTH};
use contract_duel::core::{ConfigError, GameConfig};

#[test]
fn test_load_catalog_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": "op_double_x", "name": "Double Strike", "description": "Double x",
              "code_fragment": "x *= 2", "category": "AGGRESSIVE_X", "complexity": 2}},
            {{"id": "util_invert", "name": "Invert", "description": "Reverse order",
              "code_fragment": "__contract__.invert()", "category": "UTILITY",
              "complexity": 3, "frequency_weight": 0.25}}
        ]"#
    )
    .unwrap();

    let catalog = CardCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 2);

    let invert = catalog.get(&"util_invert".into()).unwrap();
    assert!(invert.is_directive());
    assert_eq!(invert.frequency_weight, 0.25);
    assert_eq!(catalog.by_category(Category::AggressiveX).count(), 1);
}

#[test]
fn test_load_catalog_errors() {
    let missing = CardCatalog::load(std::path::Path::new("/definitely/not/here.json"));
    assert!(matches!(missing, Err(CatalogError::Read { .. })));

    assert!(matches!(
        CardCatalog::from_json_str("{not json"),
        Err(CatalogError::Json(_))
    ));
    assert!(matches!(
        CardCatalog::from_json_str(
            r#"[{"id":"a","name":"A","code_fragment":"x += 1","category":"SIDEWAYS"}]"#
        ),
        Err(CatalogError::Json(_))
    ));
    assert!(matches!(
        CardCatalog::from_json_str(
            r#"[{"id":"a","name":"A","code_fragment":"x += 1","category":"UTILITY","complexity":0}]"#
        ),
        Err(CatalogError::InvalidComplexity { .. })
    ));
}

#[test]
fn test_deeply_nested_fragment_is_rejected() {
    let nested = format!("x = {}1{}", "(".repeat(1000), ")".repeat(1000));
    let negated = format!("x = {}1", "-".repeat(200_000));

    for fragment in [&nested, &negated] {
        let err = CardCatalog::from_cards([Card::new("deep", "Deep", fragment, Category::Utility)])
            .unwrap_err();
        assert!(
            matches!(
                err,
                CatalogError::InvalidFragment { source: ParseError::TooDeep { limit }, .. }
                    if limit == MAX_DEPTH
            ),
            "unexpected error {err}"
        );

        let mut engine = ContractEngine::new();
        assert!(engine.append_line("x = 3"));
        assert!(!engine.append_line(fragment));
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.variables().x, 3);
    }
}

#[test]
fn test_every_standard_card_is_playable() {
    let catalog = CardCatalog::standard();

    for card in catalog.iter() {
        let mut engine = ContractEngine::new();
        assert!(engine.append_line("x = 3"));
        assert!(engine.append_line("y = -2"));
        assert!(engine.append_line("z = 5"));
        assert!(engine.append_line("z -= 1"));

        assert!(
            engine.apply(&card.code_fragment),
            "{} rejected on a small contract",
            card.id
        );
    }
}

#[test]
fn test_standard_catalog_covers_every_split_category() {
    let catalog = CardCatalog::standard();
    for category in [
        Category::AggressiveX,
        Category::AggressiveY,
        Category::DefensiveX,
        Category::DefensiveY,
        Category::Strategic,
        Category::Utility,
    ] {
        assert!(catalog.by_category(category).count() > 0, "no {category} cards");
    }
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "max_turns = 12\nseed = 7\n").unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.max_turns, 12);
    assert_eq!(config.seed, 7);
    assert_eq!(config.cards_per_turn, 3);
    assert_eq!(config.memory_window, 5);

    let defaults = GameConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(defaults.max_turns, 50);

    std::fs::write(&path, "cards_per_turn = 0\n").unwrap();
    assert!(matches!(GameConfig::load(&path), Err(ConfigError::Invalid(_))));
}
