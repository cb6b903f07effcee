use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;

use crate::action::ActionLabel;
use crate::cards::{HandCode, RANKS_DESC};
use crate::spots::SpotDescriptor;
use crate::stats::QuizStats;
use crate::tables::StrategyTable;

const TOTAL_COMBOS: f64 = 1326.0;

fn paint(text: &str, action: ActionLabel) -> String {
    match action {
        ActionLabel::Fold => text.dimmed().to_string(),
        ActionLabel::Check | ActionLabel::Limp | ActionLabel::LimpFold => text.yellow().bold().to_string(),
        ActionLabel::Variable => text.magenta().bold().to_string(),
        a if a.is_all_in() => text.red().bold().to_string(),
        _ => text.green().bold().to_string(),
    }
}

pub fn styled_action(action: ActionLabel) -> String {
    paint(action.display_name(), action)
}

/// 13x13 hand grid, suited hands above the diagonal, coloured by action.
pub fn action_grid(table: &StrategyTable, title: &str) -> String {
    let mut grid = Table::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    for &r in &RANKS_DESC {
        header.push(Cell::new(r.to_char()).set_alignment(CellAlignment::Center));
    }
    grid.set_header(header);

    for (i, &r1) in RANKS_DESC.iter().enumerate() {
        let mut row = vec![Cell::new(r1.to_char().to_string().bold().to_string())];
        for (j, &r2) in RANKS_DESC.iter().enumerate() {
            let hand = HandCode::from_ranks(r1, r2, i < j);
            let text = hand.to_string();
            let cell = match table.grid.get(&hand) {
                Some(action) => Cell::new(paint(&text, action)),
                None => Cell::new(text.dimmed().strikethrough().to_string()),
            };
            row.push(cell.set_alignment(CellAlignment::Center));
        }
        grid.add_row(row);
    }

    format!("  {}\n{}\n{}", title.bold(), grid, action_legend(table))
}

/// One line per action with its share of all 1326 combos.
pub fn action_legend(table: &StrategyTable) -> String {
    let mut combos_by_action: Vec<(ActionLabel, u32)> = table
        .grid
        .iter()
        .map(|(hand, action)| (action, hand.combos()))
        .into_group_map()
        .into_iter()
        .map(|(action, combos)| (action, combos.iter().sum()))
        .collect();
    combos_by_action.sort_by_key(|(action, _)| *action);

    combos_by_action
        .iter()
        .map(|(action, combos)| {
            format!(
                "  {:<28} {:>5.1}%",
                styled_action(*action),
                *combos as f64 / TOTAL_COMBOS * 100.0
            )
        })
        .join("\n")
}

pub fn spot_header(spot: &SpotDescriptor, effective_bb: u32) -> String {
    format!(
        "{}  {}  hero {}  {}bb  [{}]",
        spot.format.to_string().cyan().bold(),
        spot.label.bold(),
        spot.hero.to_string().bold(),
        effective_bb,
        spot.history().dimmed()
    )
}

pub fn stats_table(stats: &QuizStats) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Spot", "Answers", "Correct", "Accuracy"]);
    for (spot, s) in &stats.by_spot {
        let accuracy = if s.total == 0 {
            0.0
        } else {
            s.correct as f64 / s.total as f64 * 100.0
        };
        table.add_row(vec![
            Cell::new(spot),
            Cell::new(s.total).set_alignment(CellAlignment::Right),
            Cell::new(s.correct).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", accuracy)).set_alignment(CellAlignment::Right),
        ]);
    }
    format!(
        "  {} {}/{} ({:.1}%)   {} {}\n{}",
        "Correct:".bold(),
        stats.correct_answers,
        stats.total_answers,
        stats.accuracy() * 100.0,
        "Best streak:".bold(),
        stats.best_streak,
        table
    )
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
