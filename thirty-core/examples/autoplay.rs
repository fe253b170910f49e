//! Play a whole game with a greedy strategy.
//!
//! Usage: `cargo run -p thirty-core --example autoplay -- [seed]`

use std::error::Error;
use thirty_core::{Category, GameConfig, GameController, Score, ScoreCalculator, DICE_PER_ROUND};

/// Stop re-rolling once a selection scores at least this much.
const GOOD_ENOUGH: Score = 15;

struct Choice {
    category: Category,
    score: Score,
    /// Bit `i` set means die `i` is part of the scoring selection.
    mask: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);

    println!("=== Thirty autoplay (seed {seed}) ===\n");

    let mut game = GameController::seeded(GameConfig::default(), seed);

    while !game.is_game_over() {
        let round = game.round_number();
        game.roll()?;
        println!("Round {round}: rolled {}", faces_str(&game));

        let best = loop {
            let best = best_choice(&game);
            let done = best.as_ref().is_some_and(|c| c.score >= GOOD_ENOUGH);
            if done || !game.can_roll() {
                break best;
            }

            // Selected dice are the ones thrown again.
            let keep = best.as_ref().map_or(0, |c| c.mask);
            for i in (0..DICE_PER_ROUND).filter(|i| keep & (1u8 << *i) == 0) {
                game.toggle_die(i)?;
            }
            game.roll()?;
            println!("         re-rolled {}", faces_str(&game));
        };

        let outcome = match best {
            Some(choice) => {
                for i in (0..DICE_PER_ROUND).filter(|i| choice.mask & (1u8 << *i) != 0) {
                    game.toggle_die(i)?;
                }
                game.commit_round(choice.category)?
            }
            None => {
                let Some(&category) = game.available_categories().last() else {
                    break;
                };
                println!("         nothing fits, scratching {category}");
                game.scratch_round(category)?
            }
        };

        println!(
            "         scored {} in {} (total {})\n",
            outcome.score, outcome.category, outcome.total
        );
    }

    println!("=== Final scores ===");
    let export = game.export();
    for row in export.rows() {
        println!("  {:>4}: {:>3}", row.label, row.score);
    }
    println!("  Total: {}", export.total);

    Ok(())
}

/// The highest-scoring (selection, category) pair for the current dice.
fn best_choice<S: thirty_core::RandomSource>(game: &GameController<S>) -> Option<Choice> {
    let faces: Vec<u8> = game.dice().iter().map(|d| d.face()).collect();
    let mut best: Option<Choice> = None;

    for mask in 1u8..(1u8 << DICE_PER_ROUND) {
        let selected: Vec<u8> = faces
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1u8 << *i) != 0)
            .map(|(_, &f)| f)
            .collect();

        for &category in game.available_categories() {
            let Ok(score) = ScoreCalculator::calculate(category, &selected) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Choice {
                    category,
                    score,
                    mask,
                });
            }
        }
    }

    best
}

fn faces_str<S: thirty_core::RandomSource>(game: &GameController<S>) -> String {
    game.dice()
        .iter()
        .map(|d| d.face().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
