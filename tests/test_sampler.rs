use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use spingo_trainer::action::ActionLabel;
use spingo_trainer::cards::{HandCode, ALL_HANDS};
use spingo_trainer::sampler::*;
use spingo_trainer::tables::Grid;

const DRAWS: usize = 20_000;

/// Full grid where only pairs are played; everything else folds.
fn pairs_only(variable: &[&str]) -> Grid {
    let variable: Vec<HandCode> = variable.iter().map(|h| h.parse().unwrap()).collect();
    ALL_HANDS
        .iter()
        .map(|h| {
            let action = if variable.contains(h) {
                ActionLabel::Variable
            } else if h.is_pair() {
                ActionLabel::Open
            } else {
                ActionLabel::Fold
            };
            (*h, action)
        })
        .collect()
}

fn frequency<F>(grid: &Grid, difficulty: Difficulty, seed: u64, hit: F) -> f64
where
    F: Fn(&HandCode) -> bool,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let hits = (0..DRAWS)
        .filter(|_| hit(&sample_hand(grid, difficulty, &mut rng)))
        .count();
    hits as f64 / DRAWS as f64
}

fn in_pool(pool: &[HandCode]) -> impl Fn(&HandCode) -> bool + '_ {
    move |h| pool.contains(h)
}

#[test]
fn test_pool_sizes() {
    let pools = HandPools::from_grid(&pairs_only(&[]));
    assert_eq!(pools.all.len(), 169);
    assert_eq!(pools.non_fold.len(), 13);
    // ceil(13 * 0.45) = 6
    assert_eq!(pools.top_non_fold.len(), 6);
    assert_eq!(pools.bottom_non_fold.len(), 6);
    assert_eq!(pools.top_non_fold[0].to_string(), "AA");
    assert_eq!(pools.bottom_non_fold[0].to_string(), "22");
}

#[test]
fn test_easy_favours_strong_hands() {
    let grid = pairs_only(&[]);
    let pools = HandPools::from_grid(&grid);
    let freq = frequency(&grid, Difficulty::Easy, 1, in_pool(&pools.top_non_fold));
    assert_abs_diff_eq!(freq, 0.85 + 0.15 * 6.0 / 169.0, epsilon = 0.02);
}

#[test]
fn test_medium_leans_to_playable_hands() {
    let grid = pairs_only(&[]);
    let pools = HandPools::from_grid(&grid);
    let freq = frequency(&grid, Difficulty::Medium, 2, in_pool(&pools.non_fold));
    assert_abs_diff_eq!(freq, 0.6 + 0.4 * 13.0 / 169.0, epsilon = 0.02);
}

#[test]
fn test_hard_targets_weak_edge() {
    let grid = pairs_only(&[]);
    let pools = HandPools::from_grid(&grid);
    let freq = frequency(&grid, Difficulty::Hard, 3, in_pool(&pools.bottom_non_fold));
    assert_abs_diff_eq!(freq, 0.7 + 0.3 * 6.0 / 13.0, epsilon = 0.02);
    assert_eq!(frequency(&grid, Difficulty::Hard, 4, |h| h.is_pair()), 1.0);
}

#[test]
fn test_hard_prefers_variable_hands() {
    let grid = pairs_only(&["A5s", "K9o", "T8s"]);
    let freq = frequency(&grid, Difficulty::Hard, 5, |h| grid.get(h) == Some(ActionLabel::Variable));
    assert!(freq > 0.5, "variable share {}", freq);
}

#[test]
fn test_empty_grid_samples_whole_hand_space() {
    let grid = Grid::default();
    let mut rng = StdRng::seed_from_u64(6);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let seen: HashSet<HandCode> = (0..5_000).map(|_| sample_hand(&grid, difficulty, &mut rng)).collect();
        assert!(seen.len() > 150, "{} saw {} hands", difficulty, seen.len());
    }
}

#[test]
fn test_sampled_hands_belong_to_grid() {
    let grid = pairs_only(&["A5s"]);
    let mut rng = StdRng::seed_from_u64(7);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        for _ in 0..500 {
            let hand = sample_hand(&grid, difficulty, &mut rng);
            assert!(grid.get(&hand).is_some());
        }
    }
}
