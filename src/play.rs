use std::io::{self, BufRead, Write};

use colored::Colorize;
use rand::Rng;

use crate::action::ActionLabel;
use crate::display::{spot_header, styled_action};
use crate::engine::{Engine, SpotChoice};
use crate::quiz::{generate_question, DepthChoice, QuizOutcome, QuizQuestion, QuizRequest, QuizSession};
use crate::stats::QuizStats;

/// Consecutive questions without a table before the session gives up.
const MAX_EMPTY_DRAWS: u32 = 25;

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn prompt(message: &str, reader: &mut dyn BufRead, writer: &mut dyn Write) -> String {
    write!(writer, "{}: ", message).ok();
    writer.flush().ok();

    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => "q".to_string(),
        Ok(_) => line.trim().to_string(),
    }
}

/// Numbered action menu. Accepts the number, the wire name or the display
/// name; `None` means the player quit.
fn prompt_action(
    actions: &[ActionLabel],
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Option<ActionLabel> {
    for (i, action) in actions.iter().enumerate() {
        writeln!(writer, "    {}  {}", format!("{}.", i + 1).bold(), styled_action(*action)).ok();
    }
    loop {
        let answer = prompt("  Your action", reader, writer);
        let lower = answer.to_lowercase();
        if lower == "q" {
            return None;
        }
        if let Ok(n) = lower.parse::<usize>() {
            if (1..=actions.len()).contains(&n) {
                return Some(actions[n - 1]);
            }
        }
        let named = actions
            .iter()
            .find(|a| a.as_str() == lower || a.display_name().to_lowercase() == lower);
        if let Some(action) = named {
            return Some(*action);
        }
        writeln!(writer, "  {} pick 1-{} or 'q'", "?".yellow(), actions.len()).ok();
    }
}

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

pub fn quiz_command<G: Rng + ?Sized>(engine: &Engine, request: &QuizRequest, stats: &mut QuizStats, rng: &mut G) -> QuizSession {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    run_quiz_session(engine, request, stats, rng, &mut reader, &mut writer)
}

/// Asks questions until the player quits, folding every answer into `stats`.
pub fn run_quiz_session<G: Rng + ?Sized>(
    engine: &Engine,
    request: &QuizRequest,
    stats: &mut QuizStats,
    rng: &mut G,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> QuizSession {
    writeln!(writer).ok();
    writeln!(writer, "{}", "Spin & Go preflop quiz".cyan().bold()).ok();
    writeln!(
        writer,
        "Format {}, profile {}, difficulty {}. Type {} to quit.\n",
        request.format,
        request.profile.label(),
        request.difficulty.as_str(),
        "'q'".bold()
    )
    .ok();

    let mut session = QuizSession::new();
    let mut empty_draws = 0;
    // A fixed spot at a fixed depth redraws the same table every time.
    let max_empty_draws = if matches!(request.spot, SpotChoice::Spot(_)) && matches!(request.depth, DepthChoice::Exact(_)) {
        1
    } else {
        MAX_EMPTY_DRAWS
    };

    loop {
        let question = match generate_question(engine, request, rng) {
            QuizOutcome::Ready(question) => question,
            QuizOutcome::Blocked { reason } => {
                writeln!(writer, "  {} {}", "!".red().bold(), reason).ok();
                break;
            }
            QuizOutcome::NotFound { spot, effective_bb } => {
                empty_draws += 1;
                writeln!(writer, "  {} no table for {} at {}bb", "-".dimmed(), spot.label, effective_bb).ok();
                if empty_draws >= max_empty_draws {
                    writeln!(writer, "  {} no covered table for this selection", "!".red().bold()).ok();
                    break;
                }
                continue;
            }
            QuizOutcome::HandMissing { spot, hand, .. } => {
                empty_draws += 1;
                writeln!(writer, "  {} {} is missing from {}", "-".dimmed(), hand, spot.label).ok();
                if empty_draws >= max_empty_draws {
                    break;
                }
                continue;
            }
        };
        empty_draws = 0;

        if !ask(&question, &mut session, stats, reader, writer) {
            break;
        }
    }

    writeln!(
        writer,
        "\n  Session: {}/{} correct ({:.0}%)\n",
        session.correct,
        session.total,
        session.accuracy() * 100.0
    )
    .ok();
    session
}

/// Returns false when the player quits.
fn ask(
    question: &QuizQuestion,
    session: &mut QuizSession,
    stats: &mut QuizStats,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> bool {
    writeln!(writer, "\n  {}", spot_header(&question.spot, question.effective_bb)).ok();
    writeln!(writer, "  Hand: {}", question.hand.to_string().bold()).ok();

    let Some(selected) = prompt_action(&question.actions, reader, writer) else {
        return false;
    };
    let event = session.answer(question, selected);
    stats.record(&event);

    if event.is_correct {
        writeln!(writer, "  {} (streak {})", "Correct".green().bold(), event.streak).ok();
    } else {
        writeln!(
            writer,
            "  {} expected {}",
            "Wrong:".red().bold(),
            styled_action(event.expected)
        )
        .ok();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ALL_HANDS;
    use crate::spots::{Format, SpotId};
    use crate::store::StrategyStore;
    use crate::tables::{Dataset, Discriminators, StrategyTable};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_fold_engine() -> Engine {
        let grid = ALL_HANDS.iter().map(|h| (*h, ActionLabel::Fold)).collect();
        let table = StrategyTable::new(
            Discriminators::HeadsUp {
                scenario: "BB_vs_OPEN".to_string(),
            },
            10,
            None,
            grid,
        );
        Engine::new(StrategyStore::new(Dataset::new(vec![table])))
    }

    fn request(depth: u32) -> QuizRequest {
        QuizRequest {
            format: Format::HeadsUp,
            spot: SpotChoice::Spot(SpotId::HuBbVsOpen),
            depth: DepthChoice::Exact(depth),
            ..QuizRequest::default()
        }
    }

    fn run(engine: &Engine, req: &QuizRequest, input: &[u8], stats: &mut QuizStats) -> (QuizSession, String) {
        let mut reader = input;
        let mut output = Vec::new();
        let mut rng = StdRng::seed_from_u64(7);
        let session = run_quiz_session(engine, req, stats, &mut rng, &mut reader, &mut output);
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn quit_immediately() {
        let mut stats = QuizStats::default();
        let (session, out) = run(&all_fold_engine(), &request(10), b"q\n", &mut stats);
        assert!(out.contains("preflop quiz"));
        assert_eq!(session.total, 0);
        assert_eq!(stats.total_answers, 0);
    }

    #[test]
    fn answers_are_graded_and_recorded() {
        let mut stats = QuizStats::default();
        let (session, out) = run(&all_fold_engine(), &request(10), b"fold\n1\nq\n", &mut stats);
        assert!(out.contains("Correct"));
        assert_eq!(session.total, 2);
        assert_eq!(session.correct, 2);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.by_spot["HU_BB_VS_OPEN"].total, 2);
    }

    #[test]
    fn uncovered_depth_ends_session() {
        let mut stats = QuizStats::default();
        let (session, out) = run(&all_fold_engine(), &request(12), b"", &mut stats);
        assert!(out.contains("no covered table"));
        assert_eq!(out.matches("no table for").count(), 1);
        assert_eq!(session.total, 0);
    }

    #[test]
    fn random_depth_keeps_drawing() {
        let mut stats = QuizStats::default();
        let req = QuizRequest {
            depth: DepthChoice::Random,
            ..request(10)
        };
        let (session, out) = run(&all_fold_engine(), &req, b"q\n", &mut stats);
        assert!(out.contains("Your action"));
        assert_eq!(session.total, 0);
    }

    #[test]
    fn empty_answer_asks_again() {
        let mut stats = QuizStats::default();
        let (session, out) = run(&all_fold_engine(), &request(10), b"\n1\nq\n", &mut stats);
        assert!(out.contains("pick 1-"));
        assert_eq!(session.total, 1);
    }
}
