use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{TrainerError, TrainerResult};
use crate::tables::{Family, TableQuery};

// ---------------------------------------------------------------------------
// Table format, seats, visible actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    #[default]
    #[serde(rename = "3W")]
    ThreeWay,
    #[serde(rename = "HU")]
    HeadsUp,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::ThreeWay => "3W",
            Format::HeadsUp => "HU",
        }
    }

    pub fn seats(self) -> &'static [Seat] {
        match self {
            Format::ThreeWay => &[Seat::Btn, Seat::Sb, Seat::Bb],
            Format::HeadsUp => &[Seat::BtnSb, Seat::Bb],
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = TrainerError;

    fn from_str(s: &str) -> TrainerResult<Format> {
        match s.trim().to_ascii_uppercase().as_str() {
            "3W" | "3WAY" | "3-WAY" => Ok(Format::ThreeWay),
            "HU" | "HEADS-UP" | "HEADSUP" => Ok(Format::HeadsUp),
            _ => Err(TrainerError::InvalidValue(format!("unknown format '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    Btn,
    Sb,
    Bb,
    /// Heads-up button, which also posts the small blind.
    BtnSb,
}

impl Seat {
    pub fn as_str(self) -> &'static str {
        match self {
            Seat::Btn => "BTN",
            Seat::Sb => "SB",
            Seat::Bb => "BB",
            Seat::BtnSb => "BTN/SB",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Seat {
    type Err = TrainerError;

    fn from_str(s: &str) -> TrainerResult<Seat> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BTN" | "BU" => Ok(Seat::Btn),
            "SB" => Ok(Seat::Sb),
            "BB" => Ok(Seat::Bb),
            "BTN/SB" | "BTN_SB" | "BTNSB" => Ok(Seat::BtnSb),
            _ => Err(TrainerError::InvalidValue(format!("unknown position '{}'", s))),
        }
    }
}

/// Action a player took before hero, in the vocabulary of the seat picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatAction {
    Fold,
    Limp,
    Open,
    Shove,
    /// Flat call of an open. Only appears in spot histories; as an input it
    /// normalizes to `Limp`.
    Call,
}

impl SeatAction {
    /// Parses raw input, folding `call` into `limp` and `raise` into `open`.
    pub fn parse(raw: &str) -> Option<SeatAction> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fold" => Some(SeatAction::Fold),
            "limp" | "call" => Some(SeatAction::Limp),
            "open" | "raise" => Some(SeatAction::Open),
            "shove" => Some(SeatAction::Shove),
            _ => None,
        }
    }

    fn normalized(self) -> SeatAction {
        match self {
            SeatAction::Call => SeatAction::Limp,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatAction::Fold => "fold",
            SeatAction::Limp => "limp",
            SeatAction::Open => "open",
            SeatAction::Shove => "shove",
            SeatAction::Call => "call",
        }
    }
}

impl fmt::Display for SeatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Spot catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpotId {
    OpenBtn,
    OpenSbBtnFold,
    BbVsBtnOpen,
    SbVsBtnOpen,
    BbVsSbOpen,
    BbVsBtnOpenSbCall,
    BbVsBtnLimp,
    SbVsBtnLimp,
    BbVsSbLimp,
    BbVsDoubleLimp,
    SbVsBtnShove,
    BbVsBtnShove,
    BbVsSbShove,
    BbVsTwoShoves,
    HuOpen,
    HuBbVsOpen,
    HuBbVsLimp,
    HuCallOpenShove,
}

pub struct SpotDef {
    pub id: SpotId,
    pub key: &'static str,
    pub label: &'static str,
    pub format: Format,
    pub hero: Seat,
    pub previous_actions: &'static [(Seat, SeatAction)],
    pub query: TableQuery,
}

use self::SeatAction as A;

pub static SPOTS: [SpotDef; 18] = [
    SpotDef {
        id: SpotId::OpenBtn,
        key: "3W_OPEN_BTN",
        label: "Open 3Way BTN",
        format: Format::ThreeWay,
        hero: Seat::Btn,
        previous_actions: &[],
        query: TableQuery::Open { position: "BTN" },
    },
    SpotDef {
        id: SpotId::OpenSbBtnFold,
        key: "3W_OPEN_SB_BTN_FOLD",
        label: "Open 3Way SB (BTN fold)",
        format: Format::ThreeWay,
        hero: Seat::Sb,
        previous_actions: &[(Seat::Btn, A::Fold)],
        query: TableQuery::Open { position: "SB" },
    },
    SpotDef {
        id: SpotId::BbVsBtnOpen,
        key: "3W_DEF_OPEN_BB_VS_BTN_OPEN",
        label: "Def 3W vs OPEN: BB vs BTN open",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Btn, A::Open)],
        query: TableQuery::VsOpen { hero_position: "BB", vs_prefix: "BTN " },
    },
    SpotDef {
        id: SpotId::SbVsBtnOpen,
        key: "3W_DEF_OPEN_SB_VS_BTN_OPEN",
        label: "Def 3W vs OPEN: SB vs BTN open",
        format: Format::ThreeWay,
        hero: Seat::Sb,
        previous_actions: &[(Seat::Btn, A::Open)],
        query: TableQuery::VsOpen { hero_position: "SB", vs_prefix: "BTN " },
    },
    SpotDef {
        id: SpotId::BbVsSbOpen,
        key: "3W_DEF_OPEN_BB_VS_SB_OPEN",
        label: "Def 3W vs OPEN: BB vs SB open",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Sb, A::Open)],
        query: TableQuery::VsOpen { hero_position: "BB", vs_prefix: "SB " },
    },
    SpotDef {
        id: SpotId::BbVsBtnOpenSbCall,
        key: "3W_DEF_OPEN_BB_VS_BU_OPEN_SB_CALL",
        label: "Def 3W vs OPEN: BB vs BU open + SB call",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Btn, A::Open), (Seat::Sb, A::Call)],
        query: TableQuery::VsOpen { hero_position: "BB", vs_prefix: "Open BU + Call SB " },
    },
    SpotDef {
        id: SpotId::BbVsBtnLimp,
        key: "3W_DEF_LIMP_BB_VS_BTN_LIMP",
        label: "Def 3W vs LIMP: BB vs BTN limp",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Btn, A::Limp)],
        query: TableQuery::VsLimp { spot: "bb_vs_btn_limp" },
    },
    SpotDef {
        id: SpotId::SbVsBtnLimp,
        key: "3W_DEF_LIMP_SB_VS_BTN_LIMP",
        label: "Def 3W vs LIMP: SB vs BTN limp",
        format: Format::ThreeWay,
        hero: Seat::Sb,
        previous_actions: &[(Seat::Btn, A::Limp)],
        query: TableQuery::VsLimp { spot: "sb_vs_btn_limp" },
    },
    SpotDef {
        id: SpotId::BbVsSbLimp,
        key: "3W_DEF_LIMP_BB_VS_SB_LIMP",
        label: "Def 3W vs LIMP: BB vs SB limp",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Sb, A::Limp)],
        query: TableQuery::VsLimp { spot: "bb_vs_sb_limp" },
    },
    SpotDef {
        id: SpotId::BbVsDoubleLimp,
        key: "3W_DEF_LIMP_BB_VS_DOUBLE_LIMP",
        label: "Def 3W vs LIMP: BB vs double limp",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Btn, A::Limp), (Seat::Sb, A::Limp)],
        query: TableQuery::VsLimp { spot: "bb_vs_limp" },
    },
    SpotDef {
        id: SpotId::SbVsBtnShove,
        key: "3W_CALL_OPEN_SHOVE_SB_VS_BTN",
        label: "3W CALL OPEN SHOVE: SB vs BTN",
        format: Format::ThreeWay,
        hero: Seat::Sb,
        previous_actions: &[(Seat::Btn, A::Shove)],
        query: TableQuery::CallOpenShove { position: "SB", spot_id: "sb_vs_btn" },
    },
    SpotDef {
        id: SpotId::BbVsBtnShove,
        key: "3W_CALL_OPEN_SHOVE_BB_VS_BTN",
        label: "3W CALL OPEN SHOVE: BB vs BTN",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Btn, A::Shove)],
        query: TableQuery::CallOpenShove { position: "BB", spot_id: "bb_vs_btn" },
    },
    SpotDef {
        id: SpotId::BbVsSbShove,
        key: "3W_CALL_OPEN_SHOVE_BB_VS_SB",
        label: "3W CALL OPEN SHOVE: BB vs SB",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Sb, A::Shove)],
        query: TableQuery::CallOpenShove { position: "BB", spot_id: "bb_vs_sb" },
    },
    SpotDef {
        id: SpotId::BbVsTwoShoves,
        key: "3W_CALL_OPEN_SHOVE_BB_VS_2_SHOVE",
        label: "3W CALL OPEN SHOVE: BB vs 2 shove",
        format: Format::ThreeWay,
        hero: Seat::Bb,
        previous_actions: &[(Seat::Btn, A::Shove), (Seat::Sb, A::Shove)],
        query: TableQuery::CallOpenShove { position: "BB", spot_id: "bb_vs_2_shove" },
    },
    SpotDef {
        id: SpotId::HuOpen,
        key: "HU_BTN_SB_OPEN",
        label: "HU BTN/SB OPEN",
        format: Format::HeadsUp,
        hero: Seat::BtnSb,
        previous_actions: &[],
        query: TableQuery::HeadsUp { scenario: "BTN_SB_OPEN" },
    },
    SpotDef {
        id: SpotId::HuBbVsOpen,
        key: "HU_BB_VS_OPEN",
        label: "HU BB vs OPEN",
        format: Format::HeadsUp,
        hero: Seat::Bb,
        previous_actions: &[(Seat::BtnSb, A::Open)],
        query: TableQuery::HeadsUp { scenario: "BB_vs_OPEN" },
    },
    SpotDef {
        id: SpotId::HuBbVsLimp,
        key: "HU_BB_VS_LIMP",
        label: "HU BB vs LIMP",
        format: Format::HeadsUp,
        hero: Seat::Bb,
        previous_actions: &[(Seat::BtnSb, A::Limp)],
        query: TableQuery::HeadsUp { scenario: "BB_vs_LIMP" },
    },
    SpotDef {
        id: SpotId::HuCallOpenShove,
        key: "HU_CALL_OPEN_SHOVE",
        label: "HU CALL OPEN SHOVE",
        format: Format::HeadsUp,
        hero: Seat::Bb,
        previous_actions: &[(Seat::BtnSb, A::Shove)],
        query: TableQuery::HeadsUp { scenario: "CALL_OPEN_SHOVE" },
    },
];

impl SpotId {
    pub fn def(self) -> &'static SpotDef {
        // The catalogue is declared in variant order.
        &SPOTS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }

    pub fn label(self) -> &'static str {
        self.def().label
    }

    pub fn format(self) -> Format {
        self.def().format
    }

    pub fn query(self) -> TableQuery {
        self.def().query
    }

    pub fn family(self) -> Family {
        self.def().query.family()
    }

    pub fn from_key(key: &str) -> TrainerResult<SpotId> {
        SPOTS
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(key.trim()))
            .map(|s| s.id)
            .ok_or_else(|| TrainerError::UnknownSpot(key.to_string()))
    }

    /// Every spot playable in a format, in catalogue order.
    pub fn all(format: Format) -> Vec<SpotId> {
        SPOTS.iter().filter(|s| s.format == format).map(|s| s.id).collect()
    }

    /// Canonical descriptor of this spot with its catalogue history.
    pub fn descriptor(self) -> SpotDescriptor {
        let def = self.def();
        SpotDescriptor {
            spot: self,
            format: def.format,
            hero: def.hero,
            label: def.label.to_string(),
            previous_actions: complete_history(def.format, def.hero, def.previous_actions),
        }
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 3-way BB spots list both BTN and SB, with silent seats filled as folds.
fn complete_history(format: Format, hero: Seat, actions: &[(Seat, SeatAction)]) -> Vec<(Seat, SeatAction)> {
    if format != Format::ThreeWay || hero != Seat::Bb {
        return actions.to_vec();
    }
    let action_of = |seat: Seat| {
        actions
            .iter()
            .find(|(s, _)| *s == seat)
            .map(|(_, a)| *a)
            .unwrap_or(SeatAction::Fold)
    };
    vec![(Seat::Btn, action_of(Seat::Btn)), (Seat::Sb, action_of(Seat::Sb))]
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A node of the preflop tree, ready for table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotDescriptor {
    /// Spot whose table answers this situation.
    pub spot: SpotId,
    pub format: Format,
    pub hero: Seat,
    pub label: String,
    pub previous_actions: Vec<(Seat, SeatAction)>,
}

impl SpotDescriptor {
    pub fn key(&self) -> &'static str {
        self.spot.key()
    }

    pub fn history(&self) -> String {
        if self.previous_actions.is_empty() {
            return "-".to_string();
        }
        self.previous_actions
            .iter()
            .map(|(seat, action)| format!("{}: {}", seat, action))
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotResolution {
    Ready(SpotDescriptor),
    Blocked { reason: String },
}

impl SpotResolution {
    fn blocked(reason: &str) -> SpotResolution {
        SpotResolution::Blocked {
            reason: reason.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SpotResolution::Ready(_))
    }
}

/// Seat picks coming from the selection screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpotSelection {
    pub hero: Option<Seat>,
    pub btn: Option<SeatAction>,
    pub sb: Option<SeatAction>,
    /// Heads-up opponent (BTN/SB) action when hero is BB.
    pub opponent: Option<SeatAction>,
}

const SB_CASES: [(SeatAction, SpotId, &str); 4] = [
    (A::Fold, SpotId::OpenSbBtnFold, "SB Open (BTN fold)"),
    (A::Open, SpotId::SbVsBtnOpen, "SB vs BTN Open"),
    (A::Limp, SpotId::SbVsBtnLimp, "SB vs BTN Limp"),
    (A::Shove, SpotId::SbVsBtnShove, "SB vs BTN Shove"),
];

/// Covered (BTN, SB) pairs when hero is BB. Anything else is blocked.
pub const BB_CASES: [((SeatAction, SeatAction), SpotId, &str); 10] = [
    ((A::Open, A::Fold), SpotId::BbVsBtnOpen, "BB vs BTN Open"),
    ((A::Fold, A::Open), SpotId::BbVsSbOpen, "BB vs SB Open"),
    ((A::Open, A::Limp), SpotId::BbVsBtnOpenSbCall, "BB vs BTN Open + SB Call"),
    ((A::Limp, A::Fold), SpotId::BbVsBtnLimp, "BB vs BTN Limp"),
    ((A::Fold, A::Limp), SpotId::BbVsSbLimp, "BB vs SB Limp"),
    ((A::Limp, A::Limp), SpotId::BbVsDoubleLimp, "BB vs Double Limp"),
    ((A::Shove, A::Fold), SpotId::BbVsBtnShove, "BB vs BTN Shove"),
    ((A::Fold, A::Shove), SpotId::BbVsSbShove, "BB vs SB Shove"),
    ((A::Shove, A::Shove), SpotId::BbVsTwoShoves, "BB vs 2 Shoves"),
    // Played off the SB-vs-BTN shove table.
    (
        (A::Shove, A::Limp),
        SpotId::SbVsBtnShove,
        "BB vs BTN Shove + SB Limp (equivalent SB vs BTN Shove)",
    ),
];

const HU_BB_CASES: [(SeatAction, SpotId, &str); 3] = [
    (A::Open, SpotId::HuBbVsOpen, "HU BB vs Open"),
    (A::Limp, SpotId::HuBbVsLimp, "HU BB vs Limp"),
    (A::Shove, SpotId::HuCallOpenShove, "HU BB vs Shove"),
];

fn ready(spot: SpotId, hero: Seat, label: &str, previous_actions: Vec<(Seat, SeatAction)>) -> SpotResolution {
    let format = spot.format();
    SpotResolution::Ready(SpotDescriptor {
        spot,
        format,
        hero,
        label: label.to_string(),
        previous_actions: complete_history(format, hero, &previous_actions),
    })
}

/// Resolves a 3-way seat selection into a spot.
pub fn resolve_three_way(hero: Seat, btn: Option<SeatAction>, sb: Option<SeatAction>) -> SpotResolution {
    let btn = btn.map(SeatAction::normalized);
    let sb = sb.map(SeatAction::normalized);

    match hero {
        Seat::Btn => ready(SpotId::OpenBtn, hero, "BTN Open", Vec::new()),
        Seat::Sb => {
            let case = btn.and_then(|b| SB_CASES.iter().find(|(a, _, _)| *a == b));
            match case {
                Some((action, spot, label)) => ready(*spot, hero, label, vec![(Seat::Btn, *action)]),
                None => SpotResolution::blocked(
                    "Pick a covered BTN action (open, limp, shove or fold) for SB.",
                ),
            }
        }
        Seat::Bb => {
            let pair = btn.zip(sb);
            let case = pair.and_then(|p| BB_CASES.iter().find(|(k, _, _)| *k == p));
            match case {
                Some(((b, s), spot, label)) => {
                    // Limping behind an open is a flat call.
                    let sb_shown = if *b == A::Open && *s == A::Limp { A::Call } else { *s };
                    ready(*spot, hero, label, vec![(Seat::Btn, *b), (Seat::Sb, sb_shown)])
                }
                None => SpotResolution::blocked(
                    "Pick a covered BTN/SB combination (open, limp or shove) for BB.",
                ),
            }
        }
        Seat::BtnSb => SpotResolution::blocked("BTN/SB is a heads-up seat."),
    }
}

/// Resolves a heads-up seat selection into a spot.
pub fn resolve_heads_up(hero: Seat, opponent: Option<SeatAction>) -> SpotResolution {
    match hero {
        Seat::BtnSb => ready(SpotId::HuOpen, hero, "HU BTN/SB Open", Vec::new()),
        Seat::Bb => {
            let Some(action) = opponent.map(SeatAction::normalized) else {
                return SpotResolution::blocked(
                    "In HU BB, pick the opponent action: open, limp or shove.",
                );
            };
            match HU_BB_CASES.iter().find(|(a, _, _)| *a == action) {
                Some((action, spot, label)) => ready(*spot, hero, label, vec![(Seat::BtnSb, *action)]),
                None => SpotResolution::blocked("Unsupported HU action."),
            }
        }
        _ => SpotResolution::blocked("Unsupported HU position."),
    }
}

/// Resolves a full selection for a format.
pub fn resolve_spot(format: Format, selection: &SpotSelection) -> SpotResolution {
    let Some(hero) = selection.hero else {
        return SpotResolution::blocked("Pick a hero position to get an action.");
    };
    match format {
        Format::ThreeWay => resolve_three_way(hero, selection.btn, selection.sb),
        Format::HeadsUp => resolve_heads_up(hero, selection.opponent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_in_variant_order() {
        for spot in SPOTS.iter() {
            assert_eq!(spot.id.def().key, spot.key);
        }
    }

    #[test]
    fn keys_round_trip() {
        for spot in SPOTS.iter() {
            assert_eq!(SpotId::from_key(spot.key).unwrap(), spot.id);
        }
        assert!(SpotId::from_key("3W_NOPE").is_err());
    }

    #[test]
    fn spot_counts_per_format() {
        assert_eq!(SpotId::all(Format::ThreeWay).len(), 14);
        assert_eq!(SpotId::all(Format::HeadsUp).len(), 4);
    }

    #[test]
    fn raw_actions_are_normalized() {
        assert_eq!(SeatAction::parse("call"), Some(SeatAction::Limp));
        assert_eq!(SeatAction::parse("raise"), Some(SeatAction::Open));
        assert_eq!(SeatAction::parse("3bet"), None);
    }

    #[test]
    fn bb_descriptor_backfills_folds() {
        let d = SpotId::BbVsSbOpen.descriptor();
        assert_eq!(
            d.previous_actions,
            vec![(Seat::Btn, SeatAction::Fold), (Seat::Sb, SeatAction::Open)]
        );
        assert_eq!(d.history(), "BTN: fold, SB: open");
    }

    #[test]
    fn sb_descriptor_is_not_backfilled() {
        let d = SpotId::SbVsBtnOpen.descriptor();
        assert_eq!(d.previous_actions, vec![(Seat::Btn, SeatAction::Open)]);
    }

    #[test]
    fn sb_with_missing_btn_action_is_blocked() {
        assert!(!resolve_three_way(Seat::Sb, None, None).is_ready());
    }

    #[test]
    fn btn_seat_in_heads_up_is_blocked() {
        assert!(!resolve_heads_up(Seat::Btn, None).is_ready());
        assert!(!resolve_three_way(Seat::BtnSb, None, None).is_ready());
    }

    #[test]
    fn missing_hero_is_blocked() {
        let sel = SpotSelection::default();
        assert!(!resolve_spot(Format::ThreeWay, &sel).is_ready());
    }
}
