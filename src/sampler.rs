use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::ActionLabel;
use crate::cards::{HandCode, ALL_HANDS};
use crate::tables::Grid;

const TOP_SHARE: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    /// Anything other than `easy` or `hard` is `medium`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        })
    }
}

/// Rough preflop strength used to split a range into top and bottom slices.
///
/// Pairs sit above every unpaired hand.
pub fn hand_strength(hand: &HandCode) -> u32 {
    let high = hand.high().strength();
    let low = hand.low().strength();
    if hand.is_pair() {
        return 1000 + high * 25;
    }
    let suited_bonus = if hand.is_suited() { 20 } else { 0 };
    high * 22 + low * 12 + suited_bonus
}

/// Candidate pools carved out of one grid.
#[derive(Debug, Clone)]
pub struct HandPools {
    pub all: Vec<HandCode>,
    pub non_fold: Vec<HandCode>,
    pub variable: Vec<HandCode>,
    pub top_non_fold: Vec<HandCode>,
    pub bottom_non_fold: Vec<HandCode>,
}

impl HandPools {
    pub fn from_grid(grid: &Grid) -> HandPools {
        let all: Vec<HandCode> = if grid.is_empty() {
            ALL_HANDS.clone()
        } else {
            grid.hands().collect()
        };
        let action_of = |h: &HandCode| grid.get(h).unwrap_or(ActionLabel::Fold);

        let non_fold: Vec<HandCode> = all
            .iter()
            .copied()
            .filter(|h| action_of(h) != ActionLabel::Fold)
            .collect();
        let variable: Vec<HandCode> = all
            .iter()
            .copied()
            .filter(|h| action_of(h) == ActionLabel::Variable)
            .collect();

        let chunk = ((non_fold.len() as f64 * TOP_SHARE).ceil() as usize).max(1);

        let mut desc = non_fold.clone();
        desc.sort_by_key(|h| std::cmp::Reverse(hand_strength(h)));
        let top_non_fold = desc.into_iter().take(chunk).collect();

        let mut asc = non_fold.clone();
        asc.sort_by_key(hand_strength);
        let bottom_non_fold = asc.into_iter().take(chunk).collect();

        HandPools {
            all,
            non_fold,
            variable,
            top_non_fold,
            bottom_non_fold,
        }
    }
}

fn pick_from<R: Rng + ?Sized>(rng: &mut R, hands: &[HandCode], fallback: &[HandCode]) -> Option<HandCode> {
    hands
        .choose(rng)
        .or_else(|| fallback.choose(rng))
        .copied()
}

/// Draws one quiz hand from `grid`, biased by difficulty.
///
/// - easy: mostly the stronger half of the playable range.
/// - hard: mixed-strategy hands and the weak edge of the range.
/// - medium: playable hands more often than not.
pub fn sample_hand<R: Rng + ?Sized>(grid: &Grid, difficulty: Difficulty, rng: &mut R) -> HandCode {
    let pools = HandPools::from_grid(grid);

    let picked = match difficulty {
        Difficulty::Easy => {
            if rng.gen_bool(0.85) {
                pick_from(rng, &pools.top_non_fold, &pools.non_fold)
            } else {
                pick_from(rng, &pools.all, &ALL_HANDS)
            }
        }
        Difficulty::Hard => {
            if rng.gen_bool(0.5) && !pools.variable.is_empty() {
                pick_from(rng, &pools.variable, &pools.all)
            } else if rng.gen_bool(0.7) {
                pick_from(rng, &pools.bottom_non_fold, &pools.non_fold)
            } else {
                pick_from(rng, &pools.non_fold, &pools.all)
            }
        }
        Difficulty::Medium => {
            if rng.gen_bool(0.6) {
                pick_from(rng, &pools.non_fold, &pools.all)
            } else {
                pick_from(rng, &pools.all, &ALL_HANDS)
            }
        }
    };

    match picked {
        Some(hand) => hand,
        None => pick_from(rng, &ALL_HANDS, &[]).unwrap_or(ALL_HANDS[0]),
    }
}
