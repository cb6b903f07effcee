use std::str::FromStr;

use rand::Rng;

use crate::action::ActionLabel;
use crate::cards::HandCode;
use crate::engine::{Engine, SpotChoice, TableLookup};
use crate::error::{TrainerError, TrainerResult};
use crate::profile::Profile;
use crate::sampler::{sample_hand, Difficulty};
use crate::spots::{Format, SpotDescriptor};
use crate::tables::STACK_DEPTHS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthChoice {
    Exact(u32),
    Random,
}

impl FromStr for DepthChoice {
    type Err = TrainerError;

    fn from_str(s: &str) -> TrainerResult<DepthChoice> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("RANDOM") {
            return Ok(DepthChoice::Random);
        }
        s.trim_end_matches("bb")
            .parse::<u32>()
            .map(DepthChoice::Exact)
            .map_err(|_| TrainerError::InvalidValue(format!("invalid depth '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRequest {
    pub format: Format,
    pub spot: SpotChoice,
    pub depth: DepthChoice,
    pub difficulty: Difficulty,
    pub profile: Profile,
}

impl Default for QuizRequest {
    fn default() -> Self {
        QuizRequest {
            format: Format::ThreeWay,
            spot: SpotChoice::Random,
            depth: DepthChoice::Random,
            difficulty: Difficulty::Medium,
            profile: Profile::Gto,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub spot: SpotDescriptor,
    pub effective_bb: u32,
    pub hand: HandCode,
    pub expected: ActionLabel,
    /// Every action the table uses, in display priority order.
    pub actions: Vec<ActionLabel>,
    pub profile: Profile,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: ActionLabel) -> bool {
        answer == self.expected
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizOutcome {
    Ready(QuizQuestion),
    Blocked {
        reason: String,
    },
    NotFound {
        spot: SpotDescriptor,
        effective_bb: u32,
    },
    HandMissing {
        spot: SpotDescriptor,
        hand: HandCode,
        effective_bb: u32,
    },
}

/// Draws a spot, a depth and a hand, and records the table's answer.
pub fn generate_question<R: Rng + ?Sized>(engine: &Engine, request: &QuizRequest, rng: &mut R) -> QuizOutcome {
    let effective_bb = match request.depth {
        DepthChoice::Exact(bb) => bb,
        DepthChoice::Random => STACK_DEPTHS[rng.gen_range(0..STACK_DEPTHS.len())],
    };

    let lookup = engine.table_for(request.format, request.spot, effective_bb, request.profile, rng);
    let (spot, table) = match lookup {
        TableLookup::Found { spot, table } => (spot, table),
        TableLookup::Blocked { reason } => return QuizOutcome::Blocked { reason },
        TableLookup::NotFound { spot, effective_bb } => return QuizOutcome::NotFound { spot, effective_bb },
    };

    let hand = sample_hand(&table.grid, request.difficulty, rng);
    let Some(expected) = table.grid.get(&hand) else {
        log::warn!("sampled hand {} has no entry in table '{}'", hand, table.label);
        return QuizOutcome::HandMissing {
            spot,
            hand,
            effective_bb,
        };
    };

    QuizOutcome::Ready(QuizQuestion {
        spot,
        effective_bb,
        hand,
        expected,
        actions: table.grid.actions().into_iter().collect(),
        profile: request.profile,
    })
}

/// One graded answer, ready to be folded into persistent statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvent {
    pub spot_key: String,
    pub is_correct: bool,
    pub selected: ActionLabel,
    pub expected: ActionLabel,
    /// Session streak after this answer.
    pub streak: u32,
}

/// Counters for the current run of questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSession {
    pub total: u32,
    pub correct: u32,
    pub streak: u32,
}

impl QuizSession {
    pub fn new() -> QuizSession {
        QuizSession::default()
    }

    pub fn answer(&mut self, question: &QuizQuestion, selected: ActionLabel) -> AnswerEvent {
        let is_correct = question.is_correct(selected);
        self.total += 1;
        if is_correct {
            self.correct += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        AnswerEvent {
            spot_key: question.spot.key().to_string(),
            is_correct,
            selected,
            expected: question.expected,
            streak: self.streak,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}
