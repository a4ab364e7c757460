/// Headless harness: print generated maps, run both agents on a seeded
/// session, or batch many seeded sessions to compare how often each search
/// strategy ends in the village.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use zonewalk_core::agents::{AgentSnapshot, TickOutcome, TieBreakPolicy};
use zonewalk_core::config::SessionConfig;
use zonewalk_core::generator::Layout;
use zonewalk_core::grid::Cell;
use zonewalk_core::session::Session;
use zonewalk_core::zone::ZoneType;

#[derive(Parser, Debug)]
#[command(name = "zonewalk-sim", about = "Zoned terrain generator and local-search agent harness")]
struct Args {
    /// JSON file with session config overrides; missing fields take defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one generated map as ASCII (or the layout as JSON).
    Map {
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Run both agents on one session and report where they ended.
    Run {
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, default_value_t = 1000)]
        ticks: u64,
        /// Initial annealing temperature (defaults to the configured one).
        #[arg(long)]
        temperature: Option<f64>,
        /// Hill climber only takes strictly better neighbours.
        #[arg(long)]
        strict: bool,
    },
    /// Run many seeded sessions in parallel and summarise the outcomes.
    Trials {
        #[arg(short, long, default_value_t = 100)]
        runs: u64,
        #[arg(short, long, default_value_t = 1000)]
        ticks: u64,
        #[arg(short, long, default_value_t = 0)]
        base_seed: u64,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let base = load_config(args.config.as_ref())?;

    match args.command {
        Command::Map { seed, json } => {
            let session = Session::new(with_seed(&base, seed)).context("building session")?;
            if json {
                println!("{}", serde_json::to_string_pretty(session.layout())?);
            } else {
                print!("{}", render_ascii(session.layout()));
            }
        }
        Command::Run { seed, ticks, temperature, strict } => {
            let mut config = with_seed(&base, seed);
            if strict {
                config.agents.tie_break = TieBreakPolicy::StrictImprovementOnly;
            }
            let report = run_session(config, ticks, temperature)?;
            print!("{}", render_ascii_with_agents(&report));
            println!("{}", serde_json::to_string_pretty(&report.result)?);
        }
        Command::Trials { runs, ticks, base_seed, json } => {
            let summary = run_trials(&base, runs, ticks, base_seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SessionConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn with_seed(base: &SessionConfig, seed: Option<u64>) -> SessionConfig {
    let mut config = base.clone();
    if seed.is_some() {
        config.layout.seed = seed;
    }
    config
}

// ── Single run ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone)]
struct RunResult {
    seed: Option<u64>,
    hill_start: Cell,
    anneal_start: Cell,
    hill_climber: AgentSnapshot,
    annealer: AgentSnapshot,
    /// Tick on which the hill climber became stuck, if it did.
    stuck_at: Option<u64>,
}

struct RunReport {
    layout: Layout,
    trail: Vec<Cell>,
    result: RunResult,
}

fn run_session(config: SessionConfig, ticks: u64, temperature: Option<f64>) -> Result<RunReport> {
    let seed = config.layout.seed;
    let mut session = Session::new(config).context("building session")?;
    let hill_start = session.start_hill_climb();
    let anneal_start = session.start_annealing(temperature).context("starting annealer")?;

    let mut trail = vec![hill_start];
    let mut stuck_at = None;
    for tick in 1..=ticks {
        match session.tick_hill_climb() {
            Some(TickOutcome::Moved { to, .. }) => trail.push(to),
            Some(TickOutcome::BecameStuck) => stuck_at = Some(tick),
            _ => {}
        }
        session.tick_annealing();
    }

    let snapshot = session.snapshot();
    let (Some(hill_climber), Some(annealer)) = (snapshot.hill_climber, snapshot.annealer) else {
        anyhow::bail!("agents stopped unexpectedly");
    };
    info!(?stuck_at, hill = hill_climber.score, anneal = annealer.score, "run finished");
    Ok(RunReport {
        layout: session.layout().clone(),
        trail,
        result: RunResult { seed, hill_start, anneal_start, hill_climber, annealer, stuck_at },
    })
}

// ── Batch trials ──────────────────────────────────────────────────────────────

#[derive(Serialize, Debug, Clone, Copy)]
struct TrialOutcome {
    seed: u64,
    hill_score: i32,
    hill_stuck: bool,
    anneal_score: i32,
}

#[derive(Serialize, Debug)]
struct TrialSummary {
    runs: u64,
    ticks: u64,
    stuck_rate: f64,
    hill_village_rate: f64,
    anneal_village_rate: f64,
    mean_hill_score: f64,
    mean_anneal_score: f64,
    trials: Vec<TrialOutcome>,
}

fn run_trials(base: &SessionConfig, runs: u64, ticks: u64, base_seed: u64) -> Result<TrialSummary> {
    let trials: Vec<TrialOutcome> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i);
            let report = run_session(with_seed(base, Some(seed)), ticks, None)?;
            let r = report.result;
            Ok(TrialOutcome {
                seed,
                hill_score: r.hill_climber.score,
                hill_stuck: r.hill_climber.stuck,
                anneal_score: r.annealer.score,
            })
        })
        .collect::<Result<_>>()?;

    let n = trials.len().max(1) as f64;
    let rate = |pred: &dyn Fn(&TrialOutcome) -> bool| trials.iter().filter(|t| pred(t)).count() as f64 / n;
    let village = ZoneType::Village.score();
    Ok(TrialSummary {
        runs,
        ticks,
        stuck_rate: rate(&|t| t.hill_stuck),
        hill_village_rate: rate(&|t| t.hill_score == village),
        anneal_village_rate: rate(&|t| t.anneal_score == village),
        mean_hill_score: trials.iter().map(|t| t.hill_score as f64).sum::<f64>() / n,
        mean_anneal_score: trials.iter().map(|t| t.anneal_score as f64).sum::<f64>() / n,
        trials,
    })
}

fn print_summary(s: &TrialSummary) {
    println!("runs: {}  ticks/run: {}", s.runs, s.ticks);
    println!("hill climb : stuck {:5.1}%  in village {:5.1}%  mean score {:6.2}",
        s.stuck_rate * 100.0, s.hill_village_rate * 100.0, s.mean_hill_score);
    println!("annealing  : {:>13}  in village {:5.1}%  mean score {:6.2}",
        "", s.anneal_village_rate * 100.0, s.mean_anneal_score);
}

// ── ASCII rendering ───────────────────────────────────────────────────────────

fn zone_glyph(zone: ZoneType) -> char {
    match zone {
        ZoneType::Transition => '.',
        ZoneType::Village    => 'V',
        ZoneType::Drought    => 'D',
        ZoneType::Mountain   => 'M',
    }
}

fn render_ascii(layout: &Layout) -> String {
    render_with(layout, |_| None)
}

fn render_ascii_with_agents(report: &RunReport) -> String {
    let hill = report.result.hill_climber.position;
    let anneal = report.result.annealer.position;
    render_with(&report.layout, |cell| {
        if cell == hill {
            Some('@')
        } else if cell == anneal {
            Some('&')
        } else if report.trail.contains(&cell) {
            Some('+')
        } else {
            None
        }
    })
}

/// Zones, with big houses as `B`, small houses as `h` and `overlay` on top.
fn render_with(layout: &Layout, overlay: impl Fn(Cell) -> Option<char>) -> String {
    let grid = &layout.grid;
    let mut out = String::with_capacity((grid.cols() + 1) * grid.rows());
    for cell in grid.coords() {
        let glyph = overlay(cell).unwrap_or_else(|| {
            if layout.small_houses.contains(&cell) {
                'h'
            } else if layout.is_occupied(cell) {
                'B'
            } else {
                grid.get(cell).map_or(' ', zone_glyph)
            }
        });
        out.push(glyph);
        if cell.x as usize + 1 == grid.cols() {
            out.push('\n');
        }
    }
    out
}
