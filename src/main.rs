use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use crossterm::tty::IsTty;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sbp::render::paint;
use sbp::{random_walk, solve, Goal, Outcome, SearchConfig, SearchLimits, State, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Search for a solution and print it.
    Solve,
    /// Apply random moves, printing every step.
    Walk,
    /// List the legal moves of the loaded state.
    Moves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Bfs,
    Dfs,
    Ids,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Bfs => Strategy::BreadthFirst,
            StrategyArg::Dfs => Strategy::DepthFirst,
            StrategyArg::Ids => Strategy::IterativeDeepening,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "sbp", version, about = "Sliding-block puzzle solver")]
struct Cli {
    /// Grid file: a `width,height,` line followed by one line per row.
    path: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Solve)]
    mode: Mode,

    #[arg(long, value_enum, default_value_t = StrategyArg::Bfs)]
    strategy: StrategyArg,

    /// Solved when the goal piece (id 2) has its top-left cell at ROW,COL.
    /// Without it, a board is solved when no cell holds -1.
    #[arg(long, value_name = "ROW,COL", value_parser = parse_goal)]
    goal: Option<Goal>,

    /// Stop after expanding this many states.
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Ignore solutions longer than this.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Move cap for the random walk.
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Seed for the random walk.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_goal(s: &str) -> Result<Goal, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{row}': {e}"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{col}': {e}"))?;
    Ok(Goal::Target { row, col })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let state = State::from_file(&cli.path)
        .with_context(|| format!("failed to load puzzle from {}", cli.path.display()))?;
    let colored = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_tty(),
    };
    let goal = cli.goal.unwrap_or_default();

    match cli.mode {
        Mode::Solve => run_solve(&cli, state, goal, colored),
        Mode::Walk => run_walk(&cli, state, goal),
        Mode::Moves => run_moves(state, goal, colored),
    }
}

fn run_solve(cli: &Cli, start: State, goal: Goal, colored: bool) -> Result<()> {
    let config = SearchConfig {
        strategy: cli.strategy.into(),
        limits: SearchLimits {
            max_nodes: cli.max_nodes,
            max_depth: cli.max_depth,
        },
        goal,
    };
    let report = solve(&start, &config).context("search failed")?;

    match report.outcome {
        Outcome::Solved(solution) => {
            let mut replay = start.clone();
            println!("{}", paint(&replay, colored));
            for mv in &solution.moves {
                replay.apply_move(*mv).context("solution replay failed")?;
                println!("{}\n{}", mv, paint(&replay, colored));
            }
            eprintln!("Found a solution with {} moves", solution.moves.len());
        }
        Outcome::Exhausted => {
            eprintln!(
                "No solution: all {} reachable states explored",
                report.stats.expanded
            );
        }
        Outcome::Truncated => {
            warn!("search stopped by --max-nodes/--max-depth");
            eprintln!(
                "No solution within the given limits ({} states expanded)",
                report.stats.expanded
            );
        }
    }
    Ok(())
}

fn run_walk(cli: &Cli, mut state: State, goal: Goal) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = random_walk(&mut state, cli.steps, &goal, &mut rng, &mut out)
        .context("random walk failed")?;
    out.flush()?;
    eprintln!(
        "Walked {} moves, {}",
        report.steps,
        if report.completed {
            "reached a complete state"
        } else {
            "not complete"
        }
    );
    Ok(())
}

fn run_moves(mut state: State, goal: Goal, colored: bool) -> Result<()> {
    if goal.is_reached(&state) {
        println!("This puzzle is already complete.");
    }
    println!("{}", paint(&state, colored));

    println!("State moves");
    for mv in state.possible_moves() {
        println!("{}", mv);
    }

    state.normalize();
    println!("Normalized");
    println!("{}", paint(&state, colored));
    Ok(())
}
