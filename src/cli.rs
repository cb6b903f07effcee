use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cards::{canonicalize, parse_hand, HandCode};
use crate::config::TrainerConfig;
use crate::display::{action_grid, print_error, print_section, print_success, print_warning, spot_header, stats_table, styled_action};
use crate::engine::{Decision, Engine, SpotChoice, TableLookup};
use crate::error::{TrainerError, TrainerResult};
use crate::play::quiz_command;
use crate::profile::{Profile, ALL_PROFILES};
use crate::quiz::{DepthChoice, QuizRequest};
use crate::sampler::Difficulty;
use crate::spots::{Format, Seat, SeatAction, SpotId, SpotSelection};
use crate::stats::QuizStats;
use crate::store::StrategyStore;

#[derive(Parser)]
#[command(name = "spingo", version = "1.0.0", about = "Spin & Go preflop trainer: 3-way and heads-up charts by stack depth.")]
struct Cli {
    /// Directory holding the five strategy table files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Config file (defaults to ~/.spingo/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommended action for a hand in a preflop spot
    Action {
        /// Table format (3W or HU)
        format: String,
        /// Hero position (BTN, SB, BB, BTN/SB)
        hero: String,
        /// Hand as a code or two cards (e.g., AKs, 72o, AhKh)
        hand: Option<String>,
        /// First rank when picking ranks instead of a hand (e.g., As, Roi, 10)
        #[arg(long)]
        rank1: Option<String>,
        /// Second rank
        #[arg(long)]
        rank2: Option<String>,
        /// Suited, with --rank1/--rank2
        #[arg(short, long)]
        suited: bool,
        /// BTN action in 3-way (fold, limp, open, shove)
        #[arg(long)]
        btn: Option<String>,
        /// SB action in 3-way (fold, limp, open, shove)
        #[arg(long)]
        sb: Option<String>,
        /// Heads-up opponent action when hero is BB (open, limp, shove)
        #[arg(long)]
        vs: Option<String>,
        /// Effective stack in big blinds
        #[arg(long)]
        bb: Option<u32>,
        /// Opponent profile (gto, rec_passif, rec_aggro)
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// List the spot catalogue
    Spots {
        /// Only this format (3W or HU)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Render the 13x13 chart of a spot
    Grid {
        /// Spot key (see `spingo spots`)
        spot: String,
        /// Effective stack in big blinds
        #[arg(long)]
        bb: Option<u32>,
        /// Opponent profile (gto, rec_passif, rec_aggro)
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Interactive quiz
    Quiz {
        /// Table format (3W or HU)
        #[arg(short, long)]
        format: Option<String>,
        /// Spot key or RANDOM
        #[arg(long, default_value = "RANDOM")]
        spot: String,
        /// Effective stack (e.g., 15 or 15bb) or RANDOM
        #[arg(long, default_value = "RANDOM")]
        bb: String,
        /// easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<String>,
        /// Opponent profile (gto, rec_passif, rec_aggro)
        #[arg(short, long)]
        profile: Option<String>,
        /// Seed for reproducible questions
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show quiz statistics
    Stats {
        /// Clear all recorded answers
        #[arg(long)]
        reset: bool,
    },
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    let config_path = cli.config.clone().unwrap_or_else(TrainerConfig::default_path);
    let config = match TrainerConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("{}: {}", config_path.display(), e));
            return;
        }
    };
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref());

    let result = match cli.command {
        Commands::Action {
            format,
            hero,
            hand,
            rank1,
            rank2,
            suited,
            btn,
            sb,
            vs,
            bb,
            profile,
        } => {
            let hand = HandInput {
                hand,
                rank1,
                rank2,
                suited,
            };
            let seats = SeatInput { hero, btn, sb, vs };
            cmd_action(&config, &data_dir, &format, &seats, &hand, bb, profile.as_deref())
        }
        Commands::Spots { format } => cmd_spots(format.as_deref()),
        Commands::Grid { spot, bb, profile } => cmd_grid(&config, &data_dir, &spot, bb, profile.as_deref()),
        Commands::Quiz {
            format,
            spot,
            bb,
            difficulty,
            profile,
            seed,
        } => {
            let request = quiz_request(&config, format.as_deref(), &spot, &bb, difficulty.as_deref(), profile.as_deref());
            request.and_then(|request| cmd_quiz(&config, &data_dir, &request, seed))
        }
        Commands::Stats { reset } => cmd_stats(&config, reset),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

struct HandInput {
    hand: Option<String>,
    rank1: Option<String>,
    rank2: Option<String>,
    suited: bool,
}

impl HandInput {
    /// `Ok(None)` when no hand was given at all.
    fn resolve(&self) -> TrainerResult<Option<HandCode>> {
        if let Some(hand) = &self.hand {
            return parse_hand(hand).map(Some);
        }
        match (&self.rank1, &self.rank2) {
            (Some(a), Some(b)) => canonicalize(a, b, self.suited)
                .map(Some)
                .ok_or_else(|| TrainerError::InvalidHandNotation(format!("{} {}", a, b))),
            _ => Ok(None),
        }
    }
}

struct SeatInput {
    hero: String,
    btn: Option<String>,
    sb: Option<String>,
    vs: Option<String>,
}

fn seat_action(raw: Option<&str>) -> TrainerResult<Option<SeatAction>> {
    match raw {
        None => Ok(None),
        Some(raw) => SeatAction::parse(raw)
            .map(Some)
            .ok_or_else(|| TrainerError::InvalidValue(format!("unknown seat action '{}'", raw))),
    }
}

impl SeatInput {
    fn selection(&self) -> TrainerResult<SpotSelection> {
        Ok(SpotSelection {
            hero: Some(self.hero.parse::<Seat>()?),
            btn: seat_action(self.btn.as_deref())?,
            sb: seat_action(self.sb.as_deref())?,
            opponent: seat_action(self.vs.as_deref())?,
        })
    }
}

fn pick_profile(flag: Option<&str>, config: &TrainerConfig) -> Profile {
    flag.map(Profile::normalize).unwrap_or(config.profile)
}

fn load_engine(data_dir: &Path) -> TrainerResult<Engine> {
    let store = StrategyStore::load(data_dir)?;
    Ok(Engine::new(store))
}

fn quiz_request(
    config: &TrainerConfig,
    format: Option<&str>,
    spot: &str,
    bb: &str,
    difficulty: Option<&str>,
    profile: Option<&str>,
) -> TrainerResult<QuizRequest> {
    let format = match format {
        Some(f) => f.parse::<Format>()?,
        None => config.format,
    };
    let difficulty = match difficulty {
        Some(d) => d.parse::<Difficulty>().unwrap_or_default(),
        None => config.difficulty,
    };
    Ok(QuizRequest {
        format,
        spot: spot.parse::<SpotChoice>()?,
        depth: bb.parse::<DepthChoice>()?,
        difficulty,
        profile: pick_profile(profile, config),
    })
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_action(
    config: &TrainerConfig,
    data_dir: &Path,
    format: &str,
    seats: &SeatInput,
    hand: &HandInput,
    bb: Option<u32>,
    profile: Option<&str>,
) -> TrainerResult<()> {
    let format = format.parse::<Format>()?;
    let selection = seats.selection()?;
    let profile = pick_profile(profile, config);
    let effective_bb = bb.unwrap_or(config.effective_bb);
    let hand = match hand.resolve() {
        Ok(hand) => hand,
        Err(e) => {
            print_error(&e.to_string());
            return Ok(());
        }
    };

    let engine = load_engine(data_dir)?;
    let decision = engine.resolve_selection(format, &selection, hand, effective_bb, profile);
    match &decision {
        Decision::Action {
            action,
            hand,
            spot,
            source,
            profile,
            effective_bb,
        } => {
            println!("\n  {}", spot_header(spot, *effective_bb));
            println!("  {} {}", "Hand:".bold(), hand.to_string().bold());
            println!("  {} {}", "Source:".bold(), source.source_label());
            println!("  {} {}", "Profile:".bold(), profile.label());
            print_section("Action", &styled_action(*action));
        }
        Decision::NotFound { .. } | Decision::HandMissing { .. } => print_warning(&decision.to_string()),
        Decision::Blocked { .. } | Decision::InvalidInput { .. } => print_error(&decision.to_string()),
    }
    Ok(())
}

fn cmd_spots(format: Option<&str>) -> TrainerResult<()> {
    let formats = match format {
        Some(f) => vec![f.parse::<Format>()?],
        None => vec![Format::ThreeWay, Format::HeadsUp],
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Spot", "Hero", "Source"]);
    for format in formats {
        for id in SpotId::all(format) {
            let spot = id.descriptor();
            table.add_row(vec![
                Cell::new(spot.key()),
                Cell::new(&spot.label),
                Cell::new(spot.hero),
                Cell::new(id.family().source_label()),
            ]);
        }
    }
    println!("{}", table);

    let profiles = ALL_PROFILES
        .iter()
        .map(|p| format!("{} ({})", p.as_str(), p.description()))
        .join("\n  ");
    print_section("Profiles", &profiles);
    Ok(())
}

fn cmd_grid(
    config: &TrainerConfig,
    data_dir: &Path,
    spot: &str,
    bb: Option<u32>,
    profile: Option<&str>,
) -> TrainerResult<()> {
    let id = SpotId::from_key(spot)?;
    let profile = pick_profile(profile, config);
    let effective_bb = bb.unwrap_or(config.effective_bb);
    let engine = load_engine(data_dir)?;

    match engine.table_for_descriptor(id.descriptor(), effective_bb, profile) {
        TableLookup::Found { spot, table } => {
            let title = format!("{} ({})", table.label, profile.label());
            println!("\n  {}", spot_header(&spot, effective_bb));
            println!("{}", action_grid(table, &title));
        }
        TableLookup::NotFound { spot, effective_bb } => {
            print_warning(&format!("No table for {} at {}bb.", spot.label, effective_bb));
        }
        TableLookup::Blocked { reason } => print_error(&reason),
    }
    Ok(())
}

fn cmd_quiz(config: &TrainerConfig, data_dir: &Path, request: &QuizRequest, seed: Option<u64>) -> TrainerResult<()> {
    let engine = load_engine(data_dir)?;
    let stats_path = config.resolve_stats_path();
    let mut stats = QuizStats::load(&stats_path);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let session = quiz_command(&engine, request, &mut stats, &mut rng);
    if session.total > 0 {
        stats.save(&stats_path)?;
        log::info!("saved {} answers to {}", session.total, stats_path.display());
    }
    Ok(())
}

fn cmd_stats(config: &TrainerConfig, reset: bool) -> TrainerResult<()> {
    let path = config.resolve_stats_path();
    let mut stats = QuizStats::load(&path);
    if reset {
        stats.reset();
        stats.save(&path)?;
        print_success("Statistics cleared.");
        return Ok(());
    }
    print_section("Quiz statistics", &path.display().to_string());
    println!("{}", stats_table(&stats));
    Ok(())
}
