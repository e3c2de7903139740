//! CLI entry point for the puzzle solvers.
//!
//! Usage:
//!   puzzle-search monkey [--config <file>] [--strategy dfs|bfs]
//!   puzzle-search blocks [--config <file>] [--strategy dfs|bfs]
//!   puzzle-search grid [--config <file>] [--size N] [--source R,C] [--destination R,C] [--water R,C]...
//!   puzzle-search jug [--config <file>] [--capacity-a N] [--capacity-b N] [--target N]
//!   puzzle-search tictactoe [--computer-first]   (transcript on stderr with --format json)
//!
//! Global options:
//!   --format text|json   Output format (default: text)
//!   --log-level <level>  Log filter when RUST_LOG is unset (default: warn)
//!
//! Exit codes: 0 plan found, 1 no plan exists, 2 invalid input.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use puzzle_search::puzzles::blocks::{BlocksConfig, BlocksWorld};
use puzzle_search::puzzles::grid::{Cell, GridConfig, GridPath};
use puzzle_search::puzzles::jug::{JugConfig, WaterJug};
use puzzle_search::puzzles::monkey::{MonkeyBanana, MonkeyConfig};
use puzzle_search::puzzles::tictactoe::{play_interactive, Board};
use puzzle_search::puzzles::load_config;
use puzzle_search::{
    best_first, breadth_first, depth_first, verify_plan, Plan, SearchError, SearchProblem, Solution,
};

#[derive(Parser)]
#[command(name = "puzzle-search")]
#[command(about = "State-space search solvers for classic planning puzzles")]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Depth-first with backtracking
    Dfs,
    /// Breadth-first (shortest plan)
    Bfs,
    /// Best-first on g + h (grid only)
    Astar,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan how the monkey gets the banana
    Monkey {
        /// JSON puzzle config
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Strategy::Dfs)]
        strategy: Strategy,
    },

    /// Rearrange a blocks-world stack into the goal configuration
    Blocks {
        /// JSON puzzle config
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Strategy::Bfs)]
        strategy: Strategy,
    },

    /// Find a path across a grid avoiding water cells
    Grid {
        /// JSON puzzle config
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Grid side length
        #[arg(long)]
        size: Option<usize>,

        /// Start cell as ROW,COL
        #[arg(long)]
        source: Option<Cell>,

        /// Target cell as ROW,COL
        #[arg(long)]
        destination: Option<Cell>,

        /// Impassable cell as ROW,COL (repeatable)
        #[arg(long = "water", value_name = "ROW,COL")]
        water: Vec<Cell>,

        #[arg(long, value_enum, default_value_t = Strategy::Astar)]
        strategy: Strategy,
    },

    /// Measure a target amount with two jugs
    Jug {
        /// JSON puzzle config
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Capacity of jug A
        #[arg(long)]
        capacity_a: Option<u32>,

        /// Capacity of jug B
        #[arg(long)]
        capacity_b: Option<u32>,

        /// Amount to measure
        #[arg(long)]
        target: Option<u32>,

        #[arg(long, value_enum, default_value_t = Strategy::Bfs)]
        strategy: Strategy,
    },

    /// Play tic-tac-toe against the minimax engine
    Tictactoe {
        /// Let the engine (X) open the game
        #[arg(long)]
        computer_first: bool,
    },
}

/// Output format for a search result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    puzzle: String,
    strategy: String,
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<serde_json::Value>,
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}

/// How a run ended, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// A plan was found, or an interactive game finished.
    Solved,
    /// The search space was exhausted without reaching a goal.
    NoPlan,
}

fn exit_code(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Solved) => 0,
        Ok(Outcome::NoPlan) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(&cli.log_level) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let stdin = io::stdin();
    let result = run(&cli, stdin.lock(), &mut io::stdout().lock(), &mut io::stderr());
    if let Err(err) = &result {
        error!(error = %err, "puzzle-search failed");
        eprintln!("Error: {err:#}");
    }
    ExitCode::from(exit_code(&result))
}

/// Dispatch one subcommand. Results go to `out`; in JSON mode the
/// tic-tac-toe transcript goes to `diag` so `out` stays valid JSON.
fn run<R: BufRead>(
    cli: &Cli,
    input: R,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<Outcome> {
    match &cli.command {
        Commands::Monkey { config, strategy } => {
            let config: MonkeyConfig = load_or_default(config.as_deref())?;
            let problem = MonkeyBanana::new(config).context("invalid monkey-banana config")?;
            let result = search_uninformed(&problem, *strategy)?;
            report(out, cli.format, "monkey", *strategy, &problem, result, |_| None)
        }

        Commands::Blocks { config, strategy } => {
            let config: BlocksConfig = load_or_default(config.as_deref())?;
            let problem = BlocksWorld::new(&config).context("invalid blocks-world config")?;
            let result = search_uninformed(&problem, *strategy)?;
            report(out, cli.format, "blocks", *strategy, &problem, result, |_| None)
        }

        Commands::Grid {
            config,
            size,
            source,
            destination,
            water,
            strategy,
        } => {
            let mut config: GridConfig = load_or_default(config.as_deref())?;
            if let Some(size) = size {
                config.size = *size;
            }
            if let Some(source) = source {
                config.source = *source;
            }
            if let Some(destination) = destination {
                config.destination = *destination;
            }
            if !water.is_empty() {
                config.water = water.clone();
            }

            let problem = GridPath::new(&config).context("invalid grid config")?;
            let result = match strategy {
                Strategy::Astar => best_first(&problem),
                other => search_uninformed(&problem, *other)?,
            };
            report(out, cli.format, "grid", *strategy, &problem, result, |plan| {
                Some(problem.render(plan))
            })
        }

        Commands::Jug {
            config,
            capacity_a,
            capacity_b,
            target,
            strategy,
        } => {
            let mut config: JugConfig = load_or_default(config.as_deref())?;
            if let Some(capacity) = capacity_a {
                config.capacity_a = *capacity;
            }
            if let Some(capacity) = capacity_b {
                config.capacity_b = *capacity;
            }
            if let Some(target) = target {
                config.target = *target;
            }

            let problem = WaterJug::new(config).context("invalid water-jug config")?;
            let result = search_uninformed(&problem, *strategy)?;
            report(out, cli.format, "jug", *strategy, &problem, result, |_| None)
        }

        Commands::Tictactoe { computer_first } => {
            let outcome = {
                let transcript: &mut dyn Write = match cli.format {
                    OutputFormat::Text => &mut *out,
                    OutputFormat::Json => &mut *diag,
                };
                play_interactive(Board::empty(), *computer_first, input, transcript)
                    .context("tic-tac-toe session failed")?
            };
            info!(?outcome, "game finished");
            if cli.format == OutputFormat::Json {
                write_json(out, &serde_json::json!({ "outcome": outcome }))?;
            }
            Ok(Outcome::Solved)
        }
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => load_config(path).with_context(|| format!("failed to load config {path:?}")),
        None => Ok(T::default()),
    }
}

fn search_uninformed<P: SearchProblem>(
    problem: &P,
    strategy: Strategy,
) -> Result<Result<Solution<P::State, P::Action>, SearchError>> {
    match strategy {
        Strategy::Dfs => Ok(depth_first(problem)),
        Strategy::Bfs => Ok(breadth_first(problem)),
        Strategy::Astar => bail!("the astar strategy needs a heuristic; only the grid puzzle has one"),
    }
}

/// Write a search result and report whether a plan was found.
fn report<P>(
    out: &mut dyn Write,
    format: OutputFormat,
    puzzle: &str,
    strategy: Strategy,
    problem: &P,
    result: Result<Solution<P::State, P::Action>, SearchError>,
    picture: impl FnOnce(&Plan<P::State, P::Action>) -> Option<String>,
) -> Result<Outcome>
where
    P: SearchProblem,
    P::State: Serialize + Display,
    P::Action: Serialize + Display,
{
    let solution = match result {
        Ok(solution) => solution,
        Err(err) if err.is_exhausted() => {
            info!(puzzle, ?strategy, "no plan exists");
            match format {
                OutputFormat::Text => writeln!(out, "No solution found: {err}")?,
                OutputFormat::Json => write_json(
                    out,
                    &SolveOutput {
                        puzzle: puzzle.to_string(),
                        strategy: strategy_name(strategy),
                        solved: false,
                        reason: Some(err.to_string()),
                        solution: None,
                    },
                )?,
            }
            return Ok(Outcome::NoPlan);
        }
        Err(err) => return Err(err.into()),
    };

    if !verify_plan(problem, &solution.plan)? {
        bail!("search returned a plan that does not replay to a goal");
    }

    match format {
        OutputFormat::Text => {
            writeln!(out, "--- Plan Found ---")?;
            writeln!(out, "{}", solution.plan)?;
            writeln!(out, "Total cost: {}", solution.cost)?;
            writeln!(
                out,
                "States expanded: {}, generated: {}",
                solution.stats.expanded, solution.stats.generated
            )?;
            if let Some(picture) = picture(&solution.plan) {
                write!(out, "\n{picture}")?;
            }
        }
        OutputFormat::Json => write_json(
            out,
            &SolveOutput {
                puzzle: puzzle.to_string(),
                strategy: strategy_name(strategy),
                solved: true,
                reason: None,
                solution: Some(serde_json::to_value(&solution)?),
            },
        )?,
    }

    Ok(Outcome::Solved)
}

fn strategy_name(strategy: Strategy) -> String {
    match strategy {
        Strategy::Dfs => "dfs",
        Strategy::Bfs => "bfs",
        Strategy::Astar => "astar",
    }
    .to_string()
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
