use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::action::ActionLabel;
use crate::cards::HandCode;
use crate::error::{TrainerError, TrainerResult};

/// Effective stack depths (in big blinds) covered by the solver tables.
pub const STACK_DEPTHS: [u32; 5] = [25, 20, 15, 10, 5];

pub fn is_covered_depth(depth: u32) -> bool {
    STACK_DEPTHS.contains(&depth)
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Hand code to action mapping for one spot at one depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(BTreeMap<HandCode, ActionLabel>);

impl Grid {
    pub fn get(&self, hand: &HandCode) -> Option<ActionLabel> {
        self.0.get(hand).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in grid order (AA, AKs, AKo, ...).
    pub fn iter(&self) -> impl Iterator<Item = (HandCode, ActionLabel)> + '_ {
        self.0.iter().map(|(h, a)| (*h, *a))
    }

    pub fn hands(&self) -> impl Iterator<Item = HandCode> + '_ {
        self.0.keys().copied()
    }

    /// Distinct actions present in the grid, in display priority order.
    pub fn actions(&self) -> BTreeSet<ActionLabel> {
        self.0.values().copied().collect()
    }

    /// Rebuilds the grid with every action passed through `f`.
    pub fn map_actions<F>(&self, mut f: F) -> Grid
    where
        F: FnMut(HandCode, ActionLabel) -> ActionLabel,
    {
        Grid(self.0.iter().map(|(h, a)| (*h, f(*h, *a))).collect())
    }
}

impl FromIterator<(HandCode, ActionLabel)> for Grid {
    fn from_iter<I: IntoIterator<Item = (HandCode, ActionLabel)>>(iter: I) -> Self {
        Grid(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Families and discriminators
// ---------------------------------------------------------------------------

/// The five strategic families, one dataset file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Open3Way,
    VsOpen3Way,
    VsLimp3Way,
    CallOpenShove3Way,
    HeadsUp,
}

pub const ALL_FAMILIES: [Family; 5] = [
    Family::Open3Way,
    Family::VsOpen3Way,
    Family::VsLimp3Way,
    Family::CallOpenShove3Way,
    Family::HeadsUp,
];

impl Family {
    pub fn file_name(self) -> &'static str {
        match self {
            Family::Open3Way => "open_3way_tables.json",
            Family::VsOpen3Way => "def_3w_vs_open_tables.json",
            Family::VsLimp3Way => "def_3w_vs_limp_tables.json",
            Family::CallOpenShove3Way => "3w_call_open_shove_tables.json",
            Family::HeadsUp => "hu_tables.json",
        }
    }

    /// Source label shown next to a recommendation.
    pub fn source_label(self) -> &'static str {
        match self {
            Family::Open3Way => "Open 3Way",
            Family::VsOpen3Way => "Def 3W vs OPEN",
            Family::VsLimp3Way => "Def 3W vs LIMP",
            Family::CallOpenShove3Way => "3W CALL OPEN SHOVE",
            Family::HeadsUp => "HU",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_label())
    }
}

/// What distinguishes one table from its siblings within a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminators {
    Open { position: String },
    VsOpen { hero_position: String, vs: String },
    VsLimp { spot: String },
    CallOpenShove { position: String, spot_id: String },
    HeadsUp { scenario: String },
}

impl Discriminators {
    pub fn family(&self) -> Family {
        match self {
            Discriminators::Open { .. } => Family::Open3Way,
            Discriminators::VsOpen { .. } => Family::VsOpen3Way,
            Discriminators::VsLimp { .. } => Family::VsLimp3Way,
            Discriminators::CallOpenShove { .. } => Family::CallOpenShove3Way,
            Discriminators::HeadsUp { .. } => Family::HeadsUp,
        }
    }
}

impl fmt::Display for Discriminators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminators::Open { position } => write!(f, "{}", position),
            Discriminators::VsOpen { hero_position, vs } => write!(f, "{} vs {}", hero_position, vs),
            Discriminators::VsLimp { spot } => write!(f, "{}", spot),
            Discriminators::CallOpenShove { position, spot_id } => {
                write!(f, "{} {}", position, spot_id)
            }
            Discriminators::HeadsUp { scenario } => write!(f, "{}", scenario),
        }
    }
}

/// Selector a spot uses to find its table inside a dataset.
///
/// Vs-open tables carry a free-form opponent descriptor (`"BTN 2.2x"`), so
/// they are matched on its prefix. Everything else is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableQuery {
    Open { position: &'static str },
    VsOpen { hero_position: &'static str, vs_prefix: &'static str },
    VsLimp { spot: &'static str },
    CallOpenShove { position: &'static str, spot_id: &'static str },
    HeadsUp { scenario: &'static str },
}

impl TableQuery {
    pub fn family(&self) -> Family {
        match self {
            TableQuery::Open { .. } => Family::Open3Way,
            TableQuery::VsOpen { .. } => Family::VsOpen3Way,
            TableQuery::VsLimp { .. } => Family::VsLimp3Way,
            TableQuery::CallOpenShove { .. } => Family::CallOpenShove3Way,
            TableQuery::HeadsUp { .. } => Family::HeadsUp,
        }
    }

    pub fn matches(&self, discriminators: &Discriminators) -> bool {
        match (self, discriminators) {
            (TableQuery::Open { position }, Discriminators::Open { position: p }) => position == p,
            (
                TableQuery::VsOpen { hero_position, vs_prefix },
                Discriminators::VsOpen { hero_position: h, vs },
            ) => hero_position == h && vs.starts_with(vs_prefix),
            (TableQuery::VsLimp { spot }, Discriminators::VsLimp { spot: s }) => spot == s,
            (
                TableQuery::CallOpenShove { position, spot_id },
                Discriminators::CallOpenShove { position: p, spot_id: s },
            ) => position == p && spot_id == s,
            (TableQuery::HeadsUp { scenario }, Discriminators::HeadsUp { scenario: s }) => {
                scenario == s
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyTable {
    pub discriminators: Discriminators,
    pub effective_bb: u32,
    pub label: String,
    pub grid: Grid,
}

impl StrategyTable {
    pub fn new(discriminators: Discriminators, effective_bb: u32, label: Option<String>, grid: Grid) -> Self {
        let label = label.unwrap_or_else(|| {
            format!(
                "{} {} {}bb",
                discriminators.family().source_label(),
                discriminators,
                effective_bb
            )
        });
        StrategyTable {
            discriminators,
            effective_bb,
            label,
            grid,
        }
    }

    pub fn family(&self) -> Family {
        self.discriminators.family()
    }

    /// Same table with a different grid.
    pub fn with_grid(&self, grid: Grid) -> StrategyTable {
        StrategyTable {
            discriminators: self.discriminators.clone(),
            effective_bb: self.effective_bb,
            label: self.label.clone(),
            grid,
        }
    }
}

#[derive(Deserialize)]
struct TableFile<R> {
    tables: Vec<R>,
}

#[derive(Deserialize)]
struct OpenRecord {
    position: String,
    effective_bb: u32,
    #[serde(default, alias = "title")]
    label: Option<String>,
    #[serde(default)]
    grid: Grid,
}

#[derive(Deserialize)]
struct VsOpenRecord {
    hero_position: String,
    #[serde(default)]
    vs: String,
    effective_bb: u32,
    #[serde(default, alias = "title")]
    label: Option<String>,
    #[serde(default)]
    grid: Grid,
}

#[derive(Deserialize)]
struct VsLimpRecord {
    spot: String,
    effective_bb: u32,
    #[serde(default, alias = "title")]
    label: Option<String>,
    #[serde(default)]
    grid: Grid,
}

#[derive(Deserialize)]
struct CallOpenShoveRecord {
    position: String,
    spot_id: String,
    effective_bb: u32,
    #[serde(default, alias = "title")]
    label: Option<String>,
    #[serde(default)]
    grid: Grid,
}

#[derive(Deserialize)]
struct HeadsUpRecord {
    scenario: String,
    effective_bb: u32,
    #[serde(default, alias = "title")]
    label: Option<String>,
    #[serde(default)]
    grid: Grid,
}

impl From<OpenRecord> for StrategyTable {
    fn from(r: OpenRecord) -> Self {
        StrategyTable::new(Discriminators::Open { position: r.position }, r.effective_bb, r.label, r.grid)
    }
}

impl From<VsOpenRecord> for StrategyTable {
    fn from(r: VsOpenRecord) -> Self {
        let d = Discriminators::VsOpen {
            hero_position: r.hero_position,
            vs: r.vs,
        };
        StrategyTable::new(d, r.effective_bb, r.label, r.grid)
    }
}

impl From<VsLimpRecord> for StrategyTable {
    fn from(r: VsLimpRecord) -> Self {
        StrategyTable::new(Discriminators::VsLimp { spot: r.spot }, r.effective_bb, r.label, r.grid)
    }
}

impl From<CallOpenShoveRecord> for StrategyTable {
    fn from(r: CallOpenShoveRecord) -> Self {
        let d = Discriminators::CallOpenShove {
            position: r.position,
            spot_id: r.spot_id,
        };
        StrategyTable::new(d, r.effective_bb, r.label, r.grid)
    }
}

impl From<HeadsUpRecord> for StrategyTable {
    fn from(r: HeadsUpRecord) -> Self {
        StrategyTable::new(Discriminators::HeadsUp { scenario: r.scenario }, r.effective_bb, r.label, r.grid)
    }
}

fn parse_records<R>(json: &str) -> TrainerResult<Vec<StrategyTable>>
where
    R: DeserializeOwned + Into<StrategyTable>,
{
    let file: TableFile<R> = serde_json::from_str(json)?;
    Ok(file.tables.into_iter().map(Into::into).collect())
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Every strategy table of one profile, across the five families.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    tables: Vec<StrategyTable>,
}

impl Dataset {
    pub fn new(tables: Vec<StrategyTable>) -> Dataset {
        Dataset { tables }
    }

    /// Parses one family's document (`{"tables": [...]}`).
    pub fn parse_family(family: Family, json: &str) -> TrainerResult<Vec<StrategyTable>> {
        match family {
            Family::Open3Way => parse_records::<OpenRecord>(json),
            Family::VsOpen3Way => parse_records::<VsOpenRecord>(json),
            Family::VsLimp3Way => parse_records::<VsLimpRecord>(json),
            Family::CallOpenShove3Way => parse_records::<CallOpenShoveRecord>(json),
            Family::HeadsUp => parse_records::<HeadsUpRecord>(json),
        }
    }

    /// Builds a dataset from in-memory documents. Families may be omitted.
    pub fn from_json_sources<'a, I>(sources: I) -> TrainerResult<Dataset>
    where
        I: IntoIterator<Item = (Family, &'a str)>,
    {
        let mut tables = Vec::new();
        for (family, json) in sources {
            tables.extend(Dataset::parse_family(family, json)?);
        }
        Ok(Dataset { tables })
    }

    /// Loads the five family files from a data directory.
    pub fn from_dir(dir: &Path) -> TrainerResult<Dataset> {
        let mut tables = Vec::new();
        for family in ALL_FAMILIES {
            let path = dir.join(family.file_name());
            if !path.is_file() {
                return Err(TrainerError::DatasetNotFound(path.display().to_string()));
            }
            let json = std::fs::read_to_string(&path)?;
            let parsed = Dataset::parse_family(family, &json)?;
            log::debug!("loaded {} tables from {}", parsed.len(), path.display());
            tables.extend(parsed);
        }
        log::info!("loaded {} strategy tables from {}", tables.len(), dir.display());
        Ok(Dataset { tables })
    }

    pub fn tables(&self) -> &[StrategyTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Exact-depth lookup; no nearest-depth fallback.
    pub fn find(&self, query: &TableQuery, effective_bb: u32) -> Option<&StrategyTable> {
        self.tables
            .iter()
            .find(|t| t.effective_bb == effective_bb && query.matches(&t.discriminators))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS_OPEN_JSON: &str = r#"{
        "tables": [
            {"hero_position": "BB", "vs": "BTN 2x", "effective_bb": 20,
             "grid": {"AA": "3bet_ai", "72o": "fold", "T9s": "variable"}},
            {"hero_position": "BB", "vs": "Open BU + Call SB 2x", "effective_bb": 20,
             "grid": {"AA": "3bet_ai"}, "extra": 42}
        ]
    }"#;

    #[test]
    fn vs_open_matches_on_descriptor_prefix() {
        let ds = Dataset::from_json_sources([(Family::VsOpen3Way, VS_OPEN_JSON)]).unwrap();
        let query = TableQuery::VsOpen {
            hero_position: "BB",
            vs_prefix: "BTN ",
        };
        let table = ds.find(&query, 20).unwrap();
        assert_eq!(table.grid.len(), 3);

        let squeeze = TableQuery::VsOpen {
            hero_position: "BB",
            vs_prefix: "Open BU + Call SB ",
        };
        assert_eq!(ds.find(&squeeze, 20).unwrap().grid.len(), 1);
    }

    #[test]
    fn depth_must_match_exactly() {
        let ds = Dataset::from_json_sources([(Family::VsOpen3Way, VS_OPEN_JSON)]).unwrap();
        let query = TableQuery::VsOpen {
            hero_position: "BB",
            vs_prefix: "BTN ",
        };
        assert!(ds.find(&query, 15).is_none());
        assert!(ds.find(&query, 21).is_none());
    }

    #[test]
    fn actions_are_listed_in_priority_order() {
        let ds = Dataset::from_json_sources([(Family::VsOpen3Way, VS_OPEN_JSON)]).unwrap();
        let actions: Vec<_> = ds.tables()[0].grid.actions().into_iter().collect();
        assert_eq!(
            actions,
            vec![ActionLabel::Fold, ActionLabel::ThreeBetAi, ActionLabel::Variable]
        );
    }

    #[test]
    fn unknown_action_fails_to_parse() {
        let json = r#"{"tables": [{"scenario": "BTN_SB_OPEN", "effective_bb": 5, "grid": {"AA": "minraise"}}]}"#;
        assert!(Dataset::parse_family(Family::HeadsUp, json).is_err());
    }

    #[test]
    fn malformed_hand_key_fails_to_parse() {
        let json = r#"{"tables": [{"scenario": "BTN_SB_OPEN", "effective_bb": 5, "grid": {"KAs": "open"}}]}"#;
        assert!(Dataset::parse_family(Family::HeadsUp, json).is_err());
    }

    #[test]
    fn default_label_names_family_and_depth() {
        let json = r#"{"tables": [{"scenario": "BB_vs_LIMP", "effective_bb": 10, "grid": {}}]}"#;
        let tables = Dataset::parse_family(Family::HeadsUp, json).unwrap();
        assert_eq!(tables[0].label, "HU BB_vs_LIMP 10bb");
    }

    #[test]
    fn missing_directory_reports_dataset_not_found() {
        let err = Dataset::from_dir(Path::new("/nonexistent/spingo-data")).unwrap_err();
        assert!(matches!(err, TrainerError::DatasetNotFound(_)));
    }
}
