//! Contract engine integration tests.
//!
//! These exercise the engine through its public API only: appends,
//! structural directives, replay and predicates.

use contract_duel::contract::{ContractEngine, ContractError, Variables};

fn engine(lines: &[&str]) -> ContractEngine {
    let mut c = ContractEngine::new();
    for line in lines {
        assert!(c.append_line(line), "failed to append {line}");
    }
    c
}

fn order(c: &ContractEngine) -> Vec<usize> {
    c.execution_order().iter().copied().collect()
}

// =============================================================================
// Appending and replay
// =============================================================================

#[test]
fn test_single_increment() {
    let mut c = ContractEngine::new();
    assert_eq!(c.variables(), Variables::new(1, 1, 1));

    assert!(c.append_line("x += 1"));
    assert_eq!(c.variables(), Variables::new(2, 1, 1));
    assert_eq!(order(&c), vec![0]);
}

#[test]
fn test_order_dependent_program() {
    let mut c = engine(&["x = x + 1", "y = x", "x = x * 2"]);
    assert_eq!(c.variables(), Variables::new(4, 2, 1));

    assert!(c.invert_order());
    assert_eq!(order(&c), vec![2, 1, 0]);
    assert_eq!(c.variables(), Variables::new(3, 2, 1));
}

#[test]
fn test_replay_is_idempotent() {
    let mut c = engine(&["x *= 3", "y = x - 7", "z = -abs(y) if y < 0 else y ** 2"]);
    let before = c.variables();

    for _ in 0..3 {
        assert!(c.replay());
        assert_eq!(c.variables(), before);
    }
}

#[test]
fn test_multi_statement_fragment() {
    let mut c = engine(&["x = 5", "y = 9"]);
    assert!(c.append_line("z = x; x = y; y = z"));
    assert_eq!(c.variables(), Variables::new(9, 5, 5));
}

#[test]
fn test_rejected_fragments_leave_no_trace() {
    let mut c = engine(&["x = 2", "y = 0"]);
    let before = c.snapshot();

    for bad in [
        "import os",
        "x / 2",
        "x = ",
        "",
        "w = 1",
        "x //= y",
        "x %= y",
        "x = 9223372036854775807 + x",
        "x **= -1",
        "x = print(1)",
    ] {
        assert!(!c.append_line(bad), "accepted {bad:?}");
        assert_eq!(c.snapshot(), before, "state changed after {bad:?}");
    }
}

#[test]
fn test_floor_division_semantics() {
    let c = engine(&["x = -7 // 2", "y = -7 % 3", "z = 2 ** 10"]);
    assert_eq!(c.variables(), Variables::new(-4, 2, 1024));

    let c = engine(&["x = 1 ** 5000000000", "y = (-1) ** 5000000001", "z = 0 ** 5000000000"]);
    assert_eq!(c.variables(), Variables::new(1, -1, 0));
}

// =============================================================================
// Structural operators
// =============================================================================

#[test]
fn test_pop_and_empty_pop() {
    let mut c = engine(&["x += 1", "x *= 10"]);
    assert!(c.apply("__contract__.pop()"));
    assert_eq!(c.variables().x, 2);

    assert!(c.remove_last_line());
    assert!(c.is_empty());
    assert_eq!(c.variables(), Variables::INITIAL);

    assert!(matches!(c.try_remove_last_line(), Err(ContractError::EmptyContract)));
}

#[test]
fn test_remove_by_variable_value() {
    // x == 1 after replay, so line 1 goes.
    let mut c = engine(&["z += 5", "y += 100", "z *= 2"]);
    assert_eq!(c.variables().x, 1);

    assert!(c.apply("__contract__.remove(x)"));
    assert_eq!(c.line_sources().collect::<Vec<_>>(), vec!["z += 5", "z *= 2"]);
    assert_eq!(c.variables(), Variables::new(1, 1, 12));
    assert_eq!(order(&c), vec![0, 1]);
}

#[test]
fn test_remove_out_of_range_rejected() {
    let mut c = engine(&["x = -3"]);
    let before = c.snapshot();

    assert!(matches!(
        c.try_apply("__contract__.remove(x)"),
        Err(ContractError::PositionOutOfRange { position: -3, len: 1 })
    ));
    assert!(!c.apply("__contract__.remove(7)"));
    assert_eq!(c.snapshot(), before);
}

#[test]
fn test_clear_resets_everything() {
    let mut c = engine(&["x = 50", "y = -4"]);
    assert!(c.apply("__contract__.clear()"));

    assert!(c.is_empty());
    assert!(c.execution_order().is_empty());
    assert_eq!(c.variables(), Variables::INITIAL);
}

#[test]
fn test_optimize_restores_physical_order() {
    let mut c = engine(&["x = x + 1", "y = x", "x = x * 2"]);
    assert!(c.invert_order());
    assert!(c.apply("__contract__.optimize()"));

    assert_eq!(order(&c), vec![0, 1, 2]);
    assert_eq!(c.variables(), Variables::new(4, 2, 1));
}

#[test]
fn test_clean_then_invert_matches_invert_alone() {
    let mut c = engine(&["x += 1", "y = 7", "x *= 3", "z = x"]);
    c.try_set_execution_order([3, 0, 2]).unwrap();

    let mut inverted_only = c.clone();
    assert!(inverted_only.invert_order());

    assert!(c.apply("__contract__.clean()"));
    assert_eq!(c.len(), 3);
    assert_eq!(c.line_sources().collect::<Vec<_>>(), vec!["x += 1", "x *= 3", "z = x"]);
    assert_eq!(order(&c), vec![2, 0, 1]);

    assert!(c.invert_order());
    assert_eq!(c.variables(), inverted_only.variables());
}

#[test]
fn test_unknown_directive_is_rejected() {
    let mut c = engine(&["x += 1"]);
    assert!(!c.apply("__contract__.shuffle()"));
    assert!(!c.apply("__contract__.remove(w)"));
    assert_eq!(c.len(), 1);
}

// =============================================================================
// Predicates
// =============================================================================

#[test]
fn test_victory_predicates() {
    let mut c = engine(&["x = 5"]);
    assert!(c.evaluate_predicate("x >= 5"));
    assert!(c.evaluate_predicate("x==5"));
    assert!(!c.evaluate_predicate("bogus"));
    assert!(!c.evaluate_predicate("w >= 1"));
    assert!(!c.evaluate_predicate("x >= five"));

    assert!(c.append_line("x -= 1"));
    assert!(!c.evaluate_predicate("x >= 5"));
    assert!(c.evaluate_predicate("y != 4"));
    assert!(!c.evaluate_predicate("z <= -0"));
}
