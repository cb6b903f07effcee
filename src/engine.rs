use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::action::ActionLabel;
use crate::cards::HandCode;
use crate::error::{TrainerError, TrainerResult};
use crate::profile::Profile;
use crate::spots::{resolve_spot, Format, SpotDescriptor, SpotId, SpotResolution, SpotSelection};
use crate::store::StrategyStore;
use crate::tables::{Family, StrategyTable};

/// Which spot to answer for: a named one or a uniform draw among the
/// format's spots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotChoice {
    Spot(SpotId),
    Random,
}

impl FromStr for SpotChoice {
    type Err = TrainerError;

    fn from_str(s: &str) -> TrainerResult<SpotChoice> {
        if s.trim().eq_ignore_ascii_case("RANDOM") {
            return Ok(SpotChoice::Random);
        }
        SpotId::from_key(s).map(SpotChoice::Spot)
    }
}

/// Outcome of a table lookup for one spot and depth.
#[derive(Debug, Clone, PartialEq)]
pub enum TableLookup<'a> {
    Found {
        spot: SpotDescriptor,
        table: &'a StrategyTable,
    },
    Blocked {
        reason: String,
    },
    NotFound {
        spot: SpotDescriptor,
        effective_bb: u32,
    },
}

/// Answer to "what should hero do here".
///
/// Only `Action` carries a recommendation; every other variant is an
/// expected outcome the caller has to present.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Action {
        action: ActionLabel,
        hand: HandCode,
        spot: SpotDescriptor,
        source: Family,
        profile: Profile,
        effective_bb: u32,
    },
    /// The action sequence has no covered spot.
    Blocked { reason: String },
    /// No table exists for this spot at this exact depth.
    NotFound {
        spot: SpotDescriptor,
        effective_bb: u32,
        profile: Profile,
    },
    /// The table exists but does not list the hand.
    HandMissing {
        spot: SpotDescriptor,
        hand: HandCode,
        effective_bb: u32,
        profile: Profile,
    },
    /// Hand or rank selection could not be understood.
    InvalidInput { reason: String },
}

impl Decision {
    pub fn action(&self) -> Option<ActionLabel> {
        match self {
            Decision::Action { action, .. } => Some(*action),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Action { action, hand, spot, .. } => {
                write!(f, "{} with {} in {}", action.display_name(), hand, spot.label)
            }
            Decision::Blocked { reason } => write!(f, "{}", reason),
            Decision::NotFound { spot, effective_bb, .. } => {
                write!(f, "No table for {} at {}bb.", spot.label, effective_bb)
            }
            Decision::HandMissing { hand, spot, .. } => {
                write!(f, "Hand {} is missing from the {} table.", hand, spot.label)
            }
            Decision::InvalidInput { reason } => write!(f, "{}", reason),
        }
    }
}

/// Resolves spots, finds profile tables and reads hands off their grids.
#[derive(Debug, Clone)]
pub struct Engine {
    store: StrategyStore,
}

impl Engine {
    pub fn new(store: StrategyStore) -> Engine {
        Engine { store }
    }

    pub fn store(&self) -> &StrategyStore {
        &self.store
    }

    /// Finds the profile's table for a spot choice at an exact depth.
    pub fn table_for<R: Rng + ?Sized>(
        &self,
        format: Format,
        choice: SpotChoice,
        effective_bb: u32,
        profile: Profile,
        rng: &mut R,
    ) -> TableLookup<'_> {
        let spot = match choice {
            SpotChoice::Spot(id) if id.format() == format => id,
            SpotChoice::Spot(id) => {
                return TableLookup::Blocked {
                    reason: format!("Spot {} is not a {} spot.", id, format),
                }
            }
            SpotChoice::Random => match SpotId::all(format).choose(rng) {
                Some(id) => *id,
                None => {
                    return TableLookup::Blocked {
                        reason: format!("No spots configured for {}.", format),
                    }
                }
            },
        };
        self.table_for_descriptor(spot.descriptor(), effective_bb, profile)
    }

    pub fn table_for_descriptor(
        &self,
        spot: SpotDescriptor,
        effective_bb: u32,
        profile: Profile,
    ) -> TableLookup<'_> {
        match self.store.lookup(profile, &spot, effective_bb) {
            Some(table) => TableLookup::Found { spot, table },
            None => {
                log::debug!("no {} table for {} at {}bb", profile, spot.key(), effective_bb);
                TableLookup::NotFound { spot, effective_bb }
            }
        }
    }

    /// Recommended action for a hand in a chosen (or random) spot.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        format: Format,
        choice: SpotChoice,
        effective_bb: u32,
        hand: HandCode,
        profile: Profile,
        rng: &mut R,
    ) -> Decision {
        let lookup = self.table_for(format, choice, effective_bb, profile, rng);
        decide(lookup, hand, profile)
    }

    /// Recommended action for an already resolved spot.
    pub fn resolve_descriptor(
        &self,
        spot: SpotDescriptor,
        effective_bb: u32,
        hand: HandCode,
        profile: Profile,
    ) -> Decision {
        let lookup = self.table_for_descriptor(spot, effective_bb, profile);
        decide(lookup, hand, profile)
    }

    /// Full path from the seat picker: seats and prior actions, then hand,
    /// then table.
    pub fn resolve_selection(
        &self,
        format: Format,
        selection: &SpotSelection,
        hand: Option<HandCode>,
        effective_bb: u32,
        profile: Profile,
    ) -> Decision {
        if selection.hero.is_none() {
            return Decision::Blocked {
                reason: "Pick a hero position to get an action.".to_string(),
            };
        }
        let Some(hand) = hand else {
            return Decision::InvalidInput {
                reason: "Pick both cards to get an action.".to_string(),
            };
        };
        match resolve_spot(format, selection) {
            SpotResolution::Ready(spot) => self.resolve_descriptor(spot, effective_bb, hand, profile),
            SpotResolution::Blocked { reason } => Decision::Blocked { reason },
        }
    }
}

fn decide(lookup: TableLookup<'_>, hand: HandCode, profile: Profile) -> Decision {
    match lookup {
        TableLookup::Found { spot, table } => match table.grid.get(&hand) {
            Some(action) => Decision::Action {
                action,
                hand,
                spot,
                source: table.family(),
                profile,
                effective_bb: table.effective_bb,
            },
            None => {
                log::warn!(
                    "dataset integrity: hand {} missing from table '{}' ({} profile)",
                    hand,
                    table.label,
                    profile
                );
                Decision::HandMissing {
                    spot,
                    hand,
                    effective_bb: table.effective_bb,
                    profile,
                }
            }
        },
        TableLookup::Blocked { reason } => Decision::Blocked { reason },
        TableLookup::NotFound { spot, effective_bb } => Decision::NotFound {
            spot,
            effective_bb,
            profile,
        },
    }
}
