use crate::experiment::ExperimentConfig;
use crate::generator::GenerationMethod;
use crate::heuristic::Heuristic;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Optimal 8-puzzle solving with branch and bound, and a comparison of four
/// lower-bound heuristics.
#[derive(Parser, Debug)]
#[command(name = "bnb-puzzle", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Solve one puzzle, e.g. `solve 1,0,2,3,4,5,6,7,8` or `solve 102345678`.
    Solve {
        tiles: String,
        #[arg(short = 'H', long, value_enum, default_value_t = HeuristicArg::All)]
        heuristic: HeuristicArg,
    },
    /// Run every heuristic over a batch of random solvable puzzles.
    Run {
        #[arg(short = 'n', long, default_value_t = 50)]
        puzzles: usize,
        #[arg(short, long, value_enum, default_value_t = MethodArg::Walk)]
        method: MethodArg,
        /// Fixes the batch for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "results.json")]
        output: PathBuf,
    },
    /// Summarise a saved results file and write a text report.
    Analyze {
        #[arg(default_value = "results.json")]
        file: PathBuf,
        #[arg(short, long, default_value = "report.txt")]
        report: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicArg {
    H1,
    H2,
    H3,
    H4,
    All,
}

impl HeuristicArg {
    pub fn heuristics(&self) -> Vec<Heuristic> {
        match self {
            HeuristicArg::H1 => vec![Heuristic::Trivial],
            HeuristicArg::H2 => vec![Heuristic::MisplacedTiles],
            HeuristicArg::H3 => vec![Heuristic::Manhattan],
            HeuristicArg::H4 => vec![Heuristic::LinearConflict],
            HeuristicArg::All => Heuristic::ALL.to_vec(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    /// Random walk of 50 to 100 moves from the goal.
    Walk,
    /// Random permutation kept only when solvable.
    Shuffle,
}

impl From<MethodArg> for GenerationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Walk => GenerationMethod::RandomWalk,
            MethodArg::Shuffle => GenerationMethod::Shuffle,
        }
    }
}

impl Command {
    /// Experiment settings for `run`, `None` for other commands.
    pub fn experiment_config(&self) -> Option<ExperimentConfig> {
        match self {
            Command::Run {
                puzzles,
                method,
                seed,
                ..
            } => Some(ExperimentConfig {
                puzzle_count: *puzzles,
                method: (*method).into(),
                seed: *seed,
            }),
            _ => None,
        }
    }
}
