use spingo_trainer::action::ActionLabel::{self, *};
use spingo_trainer::cards::{HandCode, ALL_HANDS};
use spingo_trainer::profile::*;
use spingo_trainer::tables::{Dataset, Discriminators, Grid, StrategyTable};

fn grid(entries: &[(&str, ActionLabel)]) -> Grid {
    entries
        .iter()
        .map(|(h, a)| (h.parse::<HandCode>().unwrap(), *a))
        .collect()
}

fn hu(scenario: &str, g: Grid) -> StrategyTable {
    StrategyTable::new(
        Discriminators::HeadsUp {
            scenario: scenario.to_string(),
        },
        20,
        None,
        g,
    )
}

/// Every category with a mix of the actions the rules look at.
fn sample_tables() -> Vec<StrategyTable> {
    vec![
        hu("BTN_SB_OPEN", grid(&[("AA", Open), ("T9s", Limp), ("72o", Fold), ("A2o", Variable)])),
        hu("BB_vs_OPEN", grid(&[("AA", ThreeBetAi), ("KQo", Call), ("T8o", Variable), ("72o", Fold)])),
        hu("BB_vs_LIMP", grid(&[("AA", IsoNai), ("K9o", Check), ("63s", Variable)])),
        hu("CALL_OPEN_SHOVE", grid(&[("AA", Call), ("72o", Variable), ("32o", Fold)])),
        StrategyTable::new(
            Discriminators::VsLimp {
                spot: "bb_vs_limp".to_string(),
            },
            15,
            None,
            grid(&[("AA", IsoAi), ("J7s", Variable), ("52o", Check)]),
        ),
    ]
}

#[test]
fn test_gto_is_identity() {
    for table in sample_tables() {
        assert_eq!(transform_table(&table, Profile::Gto), table);
    }
}

#[test]
fn test_transforms_never_add_actions() {
    for table in sample_tables() {
        for profile in ALL_PROFILES {
            let out = transform_table(&table, profile);
            assert!(out.grid.actions().is_subset(&table.grid.actions()), "{} {}", table.label, profile);
            assert_eq!(out.grid.len(), table.grid.len());
        }
    }
}

#[test]
fn test_transforms_are_deterministic() {
    for table in sample_tables() {
        for profile in ALL_PROFILES {
            assert_eq!(transform_table(&table, profile), transform_table(&table, profile));
        }
    }
}

#[test]
fn test_passif_folds_variable_vs_shove() {
    let table = hu("CALL_OPEN_SHOVE", grid(&[("AA", Call), ("72o", Variable), ("32o", Fold)]));
    let out = transform_table(&table, Profile::RecPassif);
    assert_eq!(out.grid.get(&"72o".parse().unwrap()), Some(Fold));
    assert_eq!(out.grid.get(&"AA".parse().unwrap()), Some(Call));
}

#[test]
fn test_aggro_calls_variable_vs_open() {
    let table = hu("BB_vs_OPEN", grid(&[("KQo", Call), ("T8o", Variable), ("72o", Fold)]));
    let out = transform_table(&table, Profile::RecAggro);
    assert_eq!(out.grid.get(&"T8o".parse().unwrap()), Some(Call));
}

#[test]
fn test_passif_isolates_checks_vs_limp() {
    let table = hu("BB_vs_LIMP", grid(&[("AA", IsoNai), ("K9o", Check), ("63s", Variable)]));
    let out = transform_table(&table, Profile::RecPassif);
    assert_eq!(out.grid.get(&"K9o".parse().unwrap()), Some(IsoNai));
    assert_eq!(out.grid.get(&"63s".parse().unwrap()), Some(IsoNai));
}

#[test]
fn test_aggro_raises_limps_when_opening() {
    let table = hu("BTN_SB_OPEN", grid(&[("AA", Open), ("T9s", Limp), ("72o", Fold)]));
    let out = transform_table(&table, Profile::RecAggro);
    assert_eq!(out.grid.get(&"T9s".parse().unwrap()), Some(Open));
}

#[test]
fn test_passif_variable_elsewhere_takes_first_available() {
    let table = hu("BTN_SB_OPEN", grid(&[("AA", Open), ("A2o", Variable), ("72o", Fold)]));
    let out = transform_table(&table, Profile::RecPassif);
    assert_eq!(out.grid.get(&"A2o".parse().unwrap()), Some(Open));
}

#[test]
fn test_unavailable_proposal_is_dropped() {
    // No fold and no call: variable has nowhere to go.
    let table = hu("BB_vs_OPEN", grid(&[("AA", ThreeBetAi), ("T8o", Variable)]));
    let out = transform_table(&table, Profile::RecAggro);
    assert_eq!(out.grid.get(&"T8o".parse().unwrap()), Some(Variable));
}

#[test]
fn test_heads_up_categories() {
    let cat = |s: &str| {
        Category::of(&Discriminators::HeadsUp {
            scenario: s.to_string(),
        })
    };
    assert_eq!(cat("BTN_SB_OPEN"), Category::Open);
    assert_eq!(cat("BB_vs_OPEN"), Category::VsOpen);
    assert_eq!(cat("BB_vs_LIMP"), Category::VsLimp);
    assert_eq!(cat("CALL_OPEN_SHOVE"), Category::CallOpenShove);
    assert_eq!(cat("SOMETHING_ELSE"), Category::Unknown);
}

#[test]
fn test_full_grid_dataset_transform() {
    let full: Grid = ALL_HANDS
        .iter()
        .enumerate()
        .map(|(i, h)| (*h, if i % 3 == 0 { Variable } else if i % 3 == 1 { Call } else { Fold }))
        .collect();
    let base = Dataset::new(vec![hu("CALL_OPEN_SHOVE", full)]);
    let passif = transform_dataset(&base, Profile::RecPassif);
    let aggro = transform_dataset(&base, Profile::RecAggro);
    assert_eq!(passif.len(), 1);
    assert!(!passif.tables()[0].grid.actions().contains(&Variable));
    assert!(!aggro.tables()[0].grid.actions().contains(&Variable));
    assert_eq!(transform_dataset(&base, Profile::Gto), base);
}

#[test]
fn test_unknown_profile_normalizes_to_gto() {
    assert_eq!(Profile::normalize("rec_passif"), Profile::RecPassif);
    assert_eq!(Profile::normalize("nit"), Profile::Gto);
    assert_eq!(Profile::normalize(""), Profile::Gto);
}
