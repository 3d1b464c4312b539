//! Mech Duel headless runner
//!
//! Runs one battle between two loadouts and prints a summary. Loadouts are
//! JSON files or built-in sample names.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Parser;

use mech_duel::error::{Result, RunnerError};
use mech_duel::sim::{ArenaType, BattleSummary, Side, SideTally};
use mech_duel::{BattleEngine, BattleOptions, BattleResult, Loadout, LoadoutError, Tuning};

/// Deterministic mech duel simulator
#[derive(Parser, Debug)]
#[command(name = "mech-duel", version)]
#[command(about = "Run a deterministic mech battle and report the outcome")]
struct Args {
    /// Player loadout: JSON file or sample name (starter, juggernaut, skirmisher)
    #[arg(long, default_value = "starter")]
    player: String,

    /// Enemy loadout: JSON file or sample name
    #[arg(long, default_value = "juggernaut")]
    enemy: String,

    /// Random seed for reproducible battles
    #[arg(long)]
    seed: Option<u64>,

    /// Arena: open, pillars, urban or wasteland (random if omitted)
    #[arg(long)]
    arena: Option<String>,

    /// Tick budget before the battle is decided on remaining hp
    #[arg(long)]
    max_ticks: Option<u32>,

    /// Write the full result (every frame) as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Suppress the summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let player = load_loadout(&args.player)?;
    let enemy = load_loadout(&args.enemy)?;

    let mut tuning = Tuning::default();
    if let Some(max_ticks) = args.max_ticks {
        tuning.max_ticks = max_ticks;
    }
    let options = BattleOptions {
        seed: args.seed,
        arena: args.arena.clone(),
        tuning,
    };

    let result = BattleEngine::new(player.clone(), enemy.clone(), options).run();

    if !args.quiet {
        print_summary(&player, &enemy, &result);
    }

    if let Some(path) = &args.output {
        write_result(path, &result)?;
        log::info!("Wrote {} frames to {}", result.frames.len(), path.display());
    }
    Ok(())
}

/// A path to a JSON file, or the name of a built-in sample
fn load_loadout(arg: &str) -> std::result::Result<Loadout, LoadoutError> {
    let path = Path::new(arg);
    if path.extension().is_some_and(|ext| ext == "json") || path.is_file() {
        return Loadout::from_json_file(path);
    }
    Loadout::sample(arg).ok_or_else(|| LoadoutError::UnknownSample(arg.to_string()))
}

fn write_result(path: &Path, result: &BattleResult) -> Result<()> {
    let file = File::create(path).map_err(|source| RunnerError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer(BufWriter::new(file), result)?;
    Ok(())
}

fn print_summary(player: &Loadout, enemy: &Loadout, result: &BattleResult) {
    let summary = BattleSummary::from_result(result);
    let arena: ArenaType = result.arena_type;

    println!("=== MECH DUEL ===");
    println!(
        "{} vs {} | arena {} | seed {}",
        player.name,
        enemy.name,
        arena.as_str(),
        result.seed
    );
    println!(
        "Winner: {} ({:?}) after {} ticks ({:.1}s)",
        result.winner.as_str(),
        result.win_condition,
        summary.duration,
        summary.seconds()
    );
    println!();
    for (side, name) in [(Side::Player, &player.name), (Side::Enemy, &enemy.name)] {
        print_tally(side, name, summary.side(side));
    }
    println!("Projectiles lost to walls: {}", summary.wall_impacts);
}

fn print_tally(side: Side, name: &str, tally: &SideTally) {
    println!("[{}] {}", side.as_str(), name);
    println!("  hp remaining   {:>6.1}%", tally.hp_remaining * 100.0);
    println!("  shots          {:>6}", tally.shots);
    println!(
        "  hits           {:>6} ranged, {} melee ({:.0}% landed)",
        tally.hits,
        tally.melee_hits,
        tally.accuracy() * 100.0
    );
    println!("  raw damage     {:>8.0}", tally.raw_damage);
    println!("  shield blocks  {:>6}", tally.blocks);
    println!("  staggers dealt {:>6}", tally.staggers_inflicted);
}
