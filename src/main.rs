use anyhow::{bail, Context, Result};
use bnb_puzzle::config::{Cli, Command, HeuristicArg};
use bnb_puzzle::experiment::{ExperimentConfig, ExperimentResults, ExperimentRunner};
use bnb_puzzle::puzzle::PuzzleState;
use bnb_puzzle::report;
use bnb_puzzle::solver::BranchAndBound;
use clap::Parser;
use log::{error, info};
use std::io;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Solve { tiles, heuristic } => solve(tiles, *heuristic),
        Command::Run { output, .. } => {
            let config = cli.command.experiment_config().unwrap_or_default();
            run(config, output)
        }
        Command::Analyze { file, report } => analyze(file, report),
    }
}

fn solve(tiles: &str, heuristic: HeuristicArg) -> Result<()> {
    let puzzle: PuzzleState = tiles
        .parse()
        .with_context(|| format!("Invalid puzzle {:?}", tiles))?;

    println!("Initial Puzzle:\n{}", puzzle);
    if !puzzle.is_solvable() {
        println!(
            "Puzzle is not solvable ({} inversions)\n",
            puzzle.inversion_count()
        );
    }

    let mut printed_path = false;
    for h in heuristic.heuristics() {
        let solution = BranchAndBound::new(h).solve(&puzzle);

        if !printed_path {
            if let (Some(path), Some(moves)) = (&solution.path, solution.moves()) {
                println!("Found optimal solution with: {} moves", moves.len());
                for (item, state) in moves.iter().zip(path.iter().skip(1)) {
                    println!("{}\n{}", item, state);
                }
                printed_path = true;
            }
        }

        println!("{}\n", solution.statistics);
    }

    Ok(())
}

fn run(config: ExperimentConfig, output: &Path) -> Result<()> {
    let mut runner = ExperimentRunner::new(config);
    let count = runner.generate_puzzles().len();
    if count == 0 {
        bail!("No puzzles were generated");
    }

    info!("Starting experiments...");
    runner.run_experiment();

    let results = runner.to_results();
    let reports = results.reports();
    let mut stdout = io::stdout();
    report::print_summary(&mut stdout, &reports, count)?;
    report::print_detailed(&mut stdout, &reports)?;

    results.save(output)
}

fn analyze(file: &Path, report_path: &Path) -> Result<()> {
    let results = ExperimentResults::load(file).map_err(|e| {
        error!("No usable results file, run an experiment first");
        e
    })?;
    if results.is_empty() {
        bail!("{} holds no results", file.display());
    }

    let reports = results.reports();
    let count = reports.iter().map(|r| r.total_count).max().unwrap_or(0);
    report::print_summary(&mut io::stdout(), &reports, count)?;
    report::write_report(report_path, &reports)
}
