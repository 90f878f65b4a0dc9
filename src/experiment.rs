use crate::generator::{GenerationMethod, PuzzleGenerator};
use crate::heuristic::Heuristic;
use crate::puzzle::PuzzleState;
use crate::solver::BranchAndBound;
use crate::stats::{HeuristicReport, SearchStatistics, StatisticsRecord};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const PROGRESS_EVERY: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub puzzle_count: usize,
    pub method: GenerationMethod,
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            puzzle_count: 50,
            method: GenerationMethod::RandomWalk,
            seed: None,
        }
    }
}

/// Runs every heuristic over one shared batch of puzzles.
pub struct ExperimentRunner {
    config: ExperimentConfig,
    puzzles: Option<Vec<PuzzleState>>,
    results: Vec<(Heuristic, Vec<SearchStatistics>)>,
}

impl ExperimentRunner {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            puzzles: None,
            results: Vec::new(),
        }
    }

    /// Uses a fixed batch instead of generating one.
    pub fn with_puzzles(puzzles: Vec<PuzzleState>) -> Self {
        Self {
            config: ExperimentConfig {
                puzzle_count: puzzles.len(),
                ..ExperimentConfig::default()
            },
            puzzles: Some(puzzles),
            results: Vec::new(),
        }
    }

    pub fn puzzles(&self) -> Option<&[PuzzleState]> {
        self.puzzles.as_deref()
    }

    pub fn generate_puzzles(&mut self) -> &[PuzzleState] {
        info!("Generating {} puzzle instances...", self.config.puzzle_count);
        let mut generator = match self.config.seed {
            Some(seed) => PuzzleGenerator::seeded(seed),
            None => PuzzleGenerator::from_entropy(),
        };
        let puzzles = generator.generate(self.config.method, self.config.puzzle_count);
        info!("Generated {} unique puzzles", puzzles.len());
        self.puzzles.insert(puzzles)
    }

    pub fn run_experiment(&mut self) -> &[(Heuristic, Vec<SearchStatistics>)] {
        if self.puzzles.is_none() {
            self.generate_puzzles();
        }
        let puzzles = self.puzzles.as_deref().unwrap_or_default();
        let total = puzzles.len();

        let mut results = Vec::with_capacity(Heuristic::ALL.len());
        for heuristic in Heuristic::ALL {
            info!("Testing {}...", heuristic.name());
            let solver = BranchAndBound::new(heuristic);
            let mut statistics = Vec::with_capacity(total);

            for (i, puzzle) in puzzles.iter().enumerate() {
                statistics.push(solver.solve(puzzle).statistics);
                if (i + 1) % PROGRESS_EVERY == 0 {
                    info!("  Completed {}/{} puzzles", i + 1, total);
                }
            }

            let successful = statistics.iter().filter(|s| s.solution_found).count();
            info!("  Success rate: {}/{}", successful, total);
            results.push((heuristic, statistics));
        }

        self.results = results;
        &self.results
    }

    pub fn results(&self) -> &[(Heuristic, Vec<SearchStatistics>)] {
        &self.results
    }

    pub fn to_results(&self) -> ExperimentResults {
        ExperimentResults::from_statistics(&self.results)
    }
}

/// Per-heuristic entry of the results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicResults {
    pub successful_count: usize,
    pub total_count: usize,
    pub statistics: Vec<StatisticsRecord>,
}

/// Results file contents, keyed by heuristic display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentResults {
    pub by_heuristic: BTreeMap<String, HeuristicResults>,
}

impl ExperimentResults {
    pub fn from_statistics(results: &[(Heuristic, Vec<SearchStatistics>)]) -> Self {
        let by_heuristic = results
            .iter()
            .map(|(heuristic, stats)| {
                let entry = HeuristicResults {
                    successful_count: stats.iter().filter(|s| s.solution_found).count(),
                    total_count: stats.len(),
                    statistics: stats.iter().map(StatisticsRecord::from).collect(),
                };
                (heuristic.name().to_string(), entry)
            })
            .collect();

        Self { by_heuristic }
    }

    pub fn is_empty(&self) -> bool {
        self.by_heuristic.is_empty()
    }

    pub fn reports(&self) -> Vec<HeuristicReport> {
        self.by_heuristic
            .iter()
            .map(|(name, entry)| HeuristicReport::from_records(name, &entry.statistics))
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to encode results")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        info!("Results saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read results from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed results file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bnb-puzzle-{}-{}.json", name, std::process::id()))
    }

    fn small_runner() -> ExperimentRunner {
        let puzzles = vec![
            PuzzleState::new([1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap(),
            PuzzleState::new([1, 2, 5, 3, 4, 0, 6, 7, 8]).unwrap(),
            PuzzleState::new([1, 2, 3, 4, 5, 6, 8, 7, 0]).unwrap(),
        ];
        ExperimentRunner::with_puzzles(puzzles)
    }

    #[test_log::test]
    fn runs_every_heuristic_in_order() {
        let mut runner = small_runner();
        let results = runner.run_experiment();

        let order: Vec<Heuristic> = results.iter().map(|(h, _)| *h).collect();
        assert_eq!(order, Heuristic::ALL.to_vec());
        for (heuristic, stats) in results {
            assert_eq!(stats.len(), 3);
            assert!(stats.iter().all(|s| s.heuristic == *heuristic));
            let lengths: Vec<u32> = stats.iter().map(|s| s.solution_length).collect();
            assert_eq!(lengths, vec![1, 3, 0]);
            assert!(!stats[2].solution_found);
        }
    }

    #[test]
    fn generates_when_no_batch_given() {
        let mut runner = ExperimentRunner::new(ExperimentConfig {
            puzzle_count: 3,
            method: GenerationMethod::RandomWalk,
            seed: Some(9),
        });
        assert_eq!(runner.generate_puzzles().len(), 3);
        assert!(runner.puzzles().unwrap().iter().all(|p| p.is_solvable()));
    }

    #[test]
    fn results_file_shape() {
        let mut runner = small_runner();
        runner.run_experiment();
        let results = runner.to_results();

        let value = serde_json::to_value(&results).unwrap();
        let entry = &value["H3: Manhattan Distance"];
        assert_eq!(entry["successful_count"], 2);
        assert_eq!(entry["total_count"], 3);

        let first = &entry["statistics"][0];
        for key in [
            "solution_found",
            "solution_length",
            "nodes_expanded",
            "optimal_cost",
            "execution_time",
            "average_lower_bound",
            "ratio",
        ] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn save_then_load() {
        let mut runner = small_runner();
        runner.run_experiment();
        let results = runner.to_results();

        let path = temp_path("roundtrip");
        results.save(&path).unwrap();
        let loaded = ExperimentResults::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(
            loaded.by_heuristic.keys().collect::<Vec<_>>(),
            results.by_heuristic.keys().collect::<Vec<_>>()
        );
        for (name, entry) in &results.by_heuristic {
            let other = &loaded.by_heuristic[name];
            assert_eq!(other.successful_count, entry.successful_count);
            assert_eq!(other.total_count, entry.total_count);
            for (a, b) in entry.statistics.iter().zip(&other.statistics) {
                assert_eq!(a.solution_found, b.solution_found);
                assert_eq!(a.solution_length, b.solution_length);
                assert_eq!(a.nodes_expanded, b.nodes_expanded);
                assert_eq!(a.optimal_cost, b.optimal_cost);
                assert!((a.execution_time - b.execution_time).abs() < 1e-9);
                assert!((a.ratio - b.ratio).abs() < 1e-9);
            }
        }

        let reports = loaded.reports();
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].name, Heuristic::Trivial.name());
        assert_eq!(reports[0].successful_count, 2);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ExperimentResults::load(&temp_path("missing")).unwrap_err();
        assert!(err.to_string().contains("Failed to read results"));
    }
}
