use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::action::ActionLabel;
use crate::error::TrainerError;
use crate::tables::{Dataset, Discriminators, Grid, StrategyTable};

/// Opponent profile used to collapse mixed solver outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Profile {
    #[default]
    #[serde(rename = "gto")]
    Gto,
    #[serde(rename = "rec_passif")]
    RecPassif,
    #[serde(rename = "rec_aggro")]
    RecAggro,
}

pub const ALL_PROFILES: [Profile; 3] = [Profile::Gto, Profile::RecPassif, Profile::RecAggro];

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Gto => "gto",
            Profile::RecPassif => "rec_passif",
            Profile::RecAggro => "rec_aggro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Profile::Gto => "Reg (GTO)",
            Profile::RecPassif => "Recreational passive",
            Profile::RecAggro => "Recreational aggressive",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Profile::Gto => "theoretical ranges",
            Profile::RecPassif => "value/iso + tight vs shove",
            Profile::RecAggro => "call more vs shove, limp less",
        }
    }

    /// Unknown names fall back to `gto`.
    pub fn normalize(name: &str) -> Profile {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gto" => Ok(Profile::Gto),
            "rec_passif" => Ok(Profile::RecPassif),
            "rec_aggro" => Ok(Profile::RecAggro),
            _ => Err(TrainerError::InvalidValue(format!("unknown profile '{}'", s))),
        }
    }
}

/// Strategic role of a table, which decides how a profile rewrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Open,
    VsOpen,
    VsLimp,
    CallOpenShove,
    Unknown,
}

impl Category {
    /// Three-way families map directly; heads-up tables are classified by
    /// their scenario tag.
    pub fn of(discriminators: &Discriminators) -> Category {
        match discriminators {
            Discriminators::Open { .. } => Category::Open,
            Discriminators::VsOpen { .. } => Category::VsOpen,
            Discriminators::VsLimp { .. } => Category::VsLimp,
            Discriminators::CallOpenShove { .. } => Category::CallOpenShove,
            Discriminators::HeadsUp { scenario } => match scenario.as_str() {
                "BTN_SB_OPEN" => Category::Open,
                "BB_vs_OPEN" => Category::VsOpen,
                "BB_vs_LIMP" => Category::VsLimp,
                "CALL_OPEN_SHOVE" => Category::CallOpenShove,
                _ => Category::Unknown,
            },
        }
    }
}

fn first_available(available: &BTreeSet<ActionLabel>, options: &[ActionLabel]) -> Option<ActionLabel> {
    options.iter().copied().find(|a| available.contains(a))
}

/// Proposed replacement for one hand's action, before the legality check.
fn propose(
    action: ActionLabel,
    category: Category,
    available: &BTreeSet<ActionLabel>,
    profile: Profile,
) -> ActionLabel {
    use crate::action::ActionLabel::*;

    match profile {
        Profile::Gto => action,
        Profile::RecPassif => {
            if action == Variable && matches!(category, Category::CallOpenShove | Category::VsOpen) {
                return if available.contains(&Fold) { Fold } else { action };
            }
            if category == Category::VsLimp && matches!(action, Check | Variable) && available.contains(&IsoNai) {
                return IsoNai;
            }
            if action == Variable {
                return first_available(available, &[Open, IsoNai, Call]).unwrap_or(action);
            }
            action
        }
        Profile::RecAggro => {
            if action == Variable && matches!(category, Category::CallOpenShove | Category::VsOpen) {
                return if available.contains(&Call) { Call } else { action };
            }
            if category == Category::Open && action == Limp {
                return first_available(available, &[Open, OpenShove]).unwrap_or(action);
            }
            action
        }
    }
}

/// Rewrites a grid for a profile.
///
/// The result only ever holds actions already present in `grid`: an illegal
/// proposal becomes `fold` when the table has one and is otherwise dropped.
pub fn transform(grid: &Grid, category: Category, profile: Profile) -> Grid {
    if profile == Profile::Gto {
        return grid.clone();
    }
    let available = grid.actions();
    grid.map_actions(|_, action| {
        let proposed = propose(action, category, &available, profile);
        if available.contains(&proposed) {
            proposed
        } else if available.contains(&ActionLabel::Fold) {
            ActionLabel::Fold
        } else {
            action
        }
    })
}

pub fn transform_table(table: &StrategyTable, profile: Profile) -> StrategyTable {
    let category = Category::of(&table.discriminators);
    table.with_grid(transform(&table.grid, category, profile))
}

/// Derives a whole dataset for a profile. `gto` returns an identical copy.
pub fn transform_dataset(base: &Dataset, profile: Profile) -> Dataset {
    let tables = base
        .tables()
        .par_iter()
        .map(|t| transform_table(t, profile))
        .collect();
    Dataset::new(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::HandCode;
    use crate::action::ActionLabel::*;

    fn grid(entries: &[(&str, ActionLabel)]) -> Grid {
        entries
            .iter()
            .map(|(h, a)| (h.parse::<HandCode>().unwrap(), *a))
            .collect()
    }

    fn action_of(g: &Grid, hand: &str) -> ActionLabel {
        g.get(&hand.parse().unwrap()).unwrap()
    }

    #[test]
    fn passif_folds_variable_vs_shove() {
        let g = grid(&[("AA", Call), ("72o", Variable), ("32o", Fold)]);
        let out = transform(&g, Category::CallOpenShove, Profile::RecPassif);
        assert_eq!(action_of(&out, "72o"), Fold);
        assert_eq!(action_of(&out, "AA"), Call);
    }

    #[test]
    fn passif_keeps_variable_without_fold() {
        let g = grid(&[("AA", ThreeBetAi), ("T9s", Variable)]);
        let out = transform(&g, Category::VsOpen, Profile::RecPassif);
        assert_eq!(action_of(&out, "T9s"), Variable);
    }

    #[test]
    fn passif_isolates_limps() {
        let g = grid(&[("AA", IsoNai), ("K7o", Check), ("T9s", Variable)]);
        let out = transform(&g, Category::VsLimp, Profile::RecPassif);
        assert_eq!(action_of(&out, "K7o"), IsoNai);
        assert_eq!(action_of(&out, "T9s"), IsoNai);
    }

    #[test]
    fn passif_check_without_iso_stays_check() {
        let g = grid(&[("AA", IsoAi), ("K7o", Check)]);
        let out = transform(&g, Category::VsLimp, Profile::RecPassif);
        assert_eq!(action_of(&out, "K7o"), Check);
    }

    #[test]
    fn passif_generic_variable_prefers_open() {
        let g = grid(&[("AA", Open), ("K7o", Call), ("T9s", Variable), ("72o", Fold)]);
        let out = transform(&g, Category::Open, Profile::RecPassif);
        assert_eq!(action_of(&out, "T9s"), Open);

        let g = grid(&[("AA", Call), ("T9s", Variable), ("72o", Fold)]);
        let out = transform(&g, Category::Unknown, Profile::RecPassif);
        assert_eq!(action_of(&out, "T9s"), Call);
    }

    #[test]
    fn aggro_calls_variable_vs_open() {
        let g = grid(&[("AA", ThreeBetAi), ("T9s", Variable), ("72o", Fold), ("KQs", Call)]);
        let out = transform(&g, Category::VsOpen, Profile::RecAggro);
        assert_eq!(action_of(&out, "T9s"), Call);
    }

    #[test]
    fn aggro_without_call_leaves_variable() {
        let g = grid(&[("AA", Shove), ("T9s", Variable), ("72o", Fold)]);
        let out = transform(&g, Category::CallOpenShove, Profile::RecAggro);
        assert_eq!(action_of(&out, "T9s"), Variable);
    }

    #[test]
    fn aggro_turns_limps_into_opens() {
        let g = grid(&[("AA", Limp), ("K7o", Limp), ("22", OpenShove), ("72o", Fold)]);
        let out = transform(&g, Category::Open, Profile::RecAggro);
        assert_eq!(action_of(&out, "K7o"), OpenShove);

        let g = grid(&[("AA", Open), ("K7o", Limp), ("22", OpenShove)]);
        let out = transform(&g, Category::Open, Profile::RecAggro);
        assert_eq!(action_of(&out, "K7o"), Open);
    }

    #[test]
    fn aggro_keeps_limp_outside_open_category() {
        let g = grid(&[("AA", Open), ("K7o", Limp)]);
        let out = transform(&g, Category::VsLimp, Profile::RecAggro);
        assert_eq!(action_of(&out, "K7o"), Limp);
    }

    #[test]
    fn gto_is_identity() {
        let g = grid(&[("AA", Open), ("T9s", Variable), ("K7o", Limp)]);
        for category in [Category::Open, Category::VsOpen, Category::VsLimp, Category::CallOpenShove] {
            assert_eq!(transform(&g, category, Profile::Gto), g);
        }
    }

    #[test]
    fn heads_up_category_comes_from_scenario() {
        let d = Discriminators::HeadsUp {
            scenario: "CALL_OPEN_SHOVE".to_string(),
        };
        assert_eq!(Category::of(&d), Category::CallOpenShove);
        let d = Discriminators::HeadsUp {
            scenario: "SOMETHING_ELSE".to_string(),
        };
        assert_eq!(Category::of(&d), Category::Unknown);
    }

    #[test]
    fn unknown_profile_normalizes_to_gto() {
        assert_eq!(Profile::normalize("rec_aggro"), Profile::RecAggro);
        assert_eq!(Profile::normalize("shark"), Profile::Gto);
    }
}
