//! QA tests for basic game flow through the controller API.
//!
//! These tests verify the round cycle end to end:
//! - Rolling, re-rolling and selecting dice
//! - Committing categories and advancing rounds
//! - Game over under both termination rules
//!
//! Run with: `cargo test -p thirty-core --test qa_basic_flow`

use thirty_core::testing::{assert_available, assert_consumed, assert_invariants, assert_round};
use thirty_core::{
    Category, ControllerError, GameConfig, GameController, GameOverRule, Instruction, Phase,
    RerollPolicy, ScoreError, TestHarness, MAX_ROLLS,
};

// =============================================================================
// TEST 1: Single round
// =============================================================================

#[test]
fn test_first_round_scores_low() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.controller.phase(), Phase::AwaitingFirstRoll);

    harness.roll_with([1, 2, 5, 5, 6, 4]).unwrap();
    assert_eq!(harness.faces(), vec![1, 2, 5, 5, 6, 4]);
    assert_invariants(&harness);

    harness.select(&[0, 1]).unwrap();
    assert_eq!(harness.selected_faces(), vec![1, 2]);

    let outcome = harness.commit(Category::Low).unwrap();
    assert_eq!(outcome.score, 3);
    assert_eq!(outcome.round, 1);

    assert_consumed(&harness, Category::Low, 3);
    assert!(!harness.controller.available_categories().contains(&Category::Low));
    assert_round(&harness, 2);
    assert_eq!(harness.controller.roll_count(), 0);
    assert_eq!(harness.controller.phase(), Phase::AwaitingFirstRoll);
    assert_invariants(&harness);
}

// =============================================================================
// TEST 2: Re-rolls only touch selected dice
// =============================================================================

#[test]
fn test_reroll_keeps_unselected_faces() {
    let mut harness = TestHarness::new();
    harness.roll_with([6, 6, 1, 2, 6, 3]).unwrap();

    // Throw the low dice back.
    harness.select(&[2, 3, 5]).unwrap();
    harness.roll_with([6, 5, 4]).unwrap();
    assert_eq!(harness.faces(), vec![6, 6, 6, 5, 6, 4]);
    assert!(harness.selected_faces().is_empty());

    harness.select(&[3]).unwrap();
    harness.roll_with([1]).unwrap();
    assert_eq!(harness.faces(), vec![6, 6, 6, 1, 6, 4]);
    assert_eq!(harness.controller.phase(), Phase::AwaitingCategoryCommit);

    harness.select(&[0, 1, 2, 4]).unwrap();
    let outcome = harness.commit(Category::Numeric(12)).unwrap();
    assert_eq!(outcome.score, 24);
    assert_invariants(&harness);
}

#[test]
fn test_reroll_with_keep_policy() {
    let config = GameConfig::new().with_reroll_policy(RerollPolicy::Unselected);
    let mut harness = TestHarness::with_config(config);

    harness.roll_with([5, 5, 1, 1, 1, 1]).unwrap();
    harness.select(&[0, 1]).unwrap();
    harness.roll_with([2, 3, 4, 6]).unwrap();

    assert_eq!(harness.faces(), vec![5, 5, 2, 3, 4, 6]);
}

// =============================================================================
// TEST 3: Roll limit
// =============================================================================

#[test]
fn test_roll_limit_enforced() {
    let mut harness = TestHarness::new();
    for _ in 0..MAX_ROLLS {
        assert!(harness.controller.can_roll());
        harness.roll_with([3; 6]).unwrap();
        assert_invariants(&harness);
    }

    assert!(!harness.controller.can_roll());
    assert_eq!(
        harness.roll_with([1; 6]),
        Err(ControllerError::RollLimitReached)
    );
    assert_eq!(harness.controller.roll_count(), MAX_ROLLS);
    assert_eq!(harness.controller.instruction(), Instruction::RoundOver);
}

#[test]
fn test_cannot_select_before_rolling() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.select(&[0]), Err(ControllerError::NotRolledYet));
    assert!(harness.selected_faces().is_empty());
    assert_invariants(&harness);
}

// =============================================================================
// TEST 4: Rejections leave state unchanged
// =============================================================================

#[test]
fn test_invalid_commits_are_recoverable() {
    let mut harness = TestHarness::new();
    harness.roll_with([1, 2, 3, 4, 5, 6]).unwrap();

    assert_eq!(
        harness.commit(Category::Low),
        Err(ControllerError::Score(ScoreError::NoSelection))
    );

    harness.select(&[0, 3]).unwrap();
    assert_eq!(
        harness.commit(Category::Low),
        Err(ControllerError::Score(ScoreError::InvalidForLow))
    );
    assert_eq!(
        harness.commit(Category::Numeric(4)),
        Err(ControllerError::Score(ScoreError::NoValidPartition(4)))
    );

    assert_round(&harness, 1);
    assert_available(&harness, Category::Low);
    assert_eq!(harness.selected_faces(), vec![1, 4]);

    let outcome = harness.commit(Category::Numeric(5)).unwrap();
    assert_eq!(outcome.score, 5);
}

#[test]
fn test_category_used_once() {
    let mut harness = TestHarness::new();
    harness
        .play_round([4, 4, 1, 1, 1, 1], &[0, 1], Category::Numeric(8))
        .unwrap();

    let err = harness
        .play_round([4, 4, 1, 1, 1, 1], &[0, 1], Category::Numeric(8))
        .unwrap_err();
    assert!(!err.is_user_facing());
    assert_consumed(&harness, Category::Numeric(8), 8);
    assert_round(&harness, 2);
}

// =============================================================================
// TEST 5: Whole game
// =============================================================================

#[test]
fn test_full_game() {
    let mut harness = TestHarness::new();

    let rounds: Vec<([u8; 6], Vec<usize>, Category)> = vec![
        ([1, 1, 2, 3, 6, 6], vec![0, 1, 2, 3], Category::Low),
        ([2, 2, 1, 3, 6, 6], vec![0, 1, 2, 3], Category::Numeric(4)),
        ([5, 4, 1, 6, 6, 6], vec![0, 1, 2], Category::Numeric(5)),
        ([6, 6, 6, 1, 1, 1], vec![0, 1, 2], Category::Numeric(6)),
        ([3, 4, 5, 2, 1, 1], vec![0, 1, 2, 3], Category::Numeric(7)),
        ([4, 4, 6, 2, 1, 1], vec![0, 1, 2, 3], Category::Numeric(8)),
        ([6, 3, 5, 4, 1, 1], vec![0, 1, 2, 3], Category::Numeric(9)),
        ([5, 5, 6, 4, 1, 1], vec![0, 1, 2, 3], Category::Numeric(10)),
        ([5, 6, 1, 1, 1, 1], vec![0, 1], Category::Numeric(11)),
        ([6, 6, 6, 6, 6, 6], vec![0, 1, 2, 3, 4, 5], Category::Numeric(12)),
    ];

    let mut expected_total = 0;
    for (i, (faces, selection, category)) in rounds.into_iter().enumerate() {
        assert_round(&harness, i + 1);
        let outcome = harness.play_round(faces, &selection, category).unwrap();
        expected_total += outcome.score;
        assert_eq!(outcome.total, expected_total);
        assert_eq!(outcome.game_over, i == 9);
        assert_invariants(&harness);
    }

    assert_eq!(harness.total_score(), 7 + 8 + 10 + 18 + 14 + 16 + 18 + 20 + 11 + 36);
    assert!(harness.controller.is_game_over());
    assert_eq!(harness.controller.phase(), Phase::GameOver);
    assert!(harness.controller.available_categories().is_empty());

    assert_eq!(harness.roll_with([1; 6]), Err(ControllerError::GameOver));
    assert_eq!(
        harness.commit(Category::Low),
        Err(ControllerError::GameOver)
    );

    let export = harness.controller.export();
    assert_eq!(export.total, harness.total_score());
    assert_eq!(export.scores.len(), 10);
}

#[test]
fn test_short_game_ends_after_three() {
    let config = GameConfig::new().with_max_rounds(3);
    let mut harness = TestHarness::with_config(config);

    harness
        .play_round([1, 2, 6, 6, 6, 6], &[0, 1], Category::Low)
        .unwrap();
    harness
        .play_round([6, 1, 1, 1, 1, 1], &[0], Category::Numeric(6))
        .unwrap();
    let last = harness
        .play_round([6, 6, 1, 1, 1, 1], &[0, 1], Category::Numeric(12))
        .unwrap();

    assert!(last.game_over);
    assert!(harness.controller.is_game_over());
    assert_round(&harness, 4);
    assert_eq!(harness.controller.available_categories().len(), 7);
    assert_eq!(harness.roll_with([1; 6]), Err(ControllerError::GameOver));
}

#[test]
fn test_ledger_rule_ignores_round_cap() {
    let config = GameConfig::new()
        .with_max_rounds(3)
        .with_game_over_rule(GameOverRule::LedgerExhausted);
    let mut harness = TestHarness::with_config(config);

    for target in 4..=6 {
        let faces = [target / 2, target - target / 2, 6, 6, 6, 6];
        harness
            .play_round(faces, &[0, 1], Category::Numeric(target))
            .unwrap();
    }

    assert!(!harness.controller.is_game_over());
    assert!(harness.controller.can_roll());
    assert_round(&harness, 4);
}

// =============================================================================
// TEST 6: Seeded controllers
// =============================================================================

#[test]
fn test_seeded_games_repeat() {
    let mut a = GameController::seeded(GameConfig::default(), 99);
    let mut b = GameController::seeded(GameConfig::default(), 99);

    for _ in 0..MAX_ROLLS {
        a.roll().unwrap();
        b.roll().unwrap();
        a.toggle_die(0).unwrap();
        b.toggle_die(0).unwrap();
    }

    assert_eq!(a.dice(), b.dice());
}

// =============================================================================
// TEST 7: Dead rounds
// =============================================================================

#[test]
fn test_scratch_when_nothing_fits() {
    let mut harness = TestHarness::new();
    harness
        .play_round([1, 1, 1, 1, 1, 1], &[0], Category::Low)
        .unwrap();

    for _ in 0..MAX_ROLLS {
        harness.roll_with([1; 6]).unwrap();
    }
    harness.select(&[0, 1]).unwrap();
    assert!(harness.controller.scoring_options().is_empty());

    let outcome = harness
        .controller
        .scratch_round(Category::Numeric(12))
        .unwrap();
    assert_eq!(outcome.score, 0);
    assert_consumed(&harness, Category::Numeric(12), 0);
    assert_round(&harness, 3);
    assert_invariants(&harness);
}
