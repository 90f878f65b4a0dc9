use crate::heuristic::Heuristic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Metrics for one `solve` call. Mutated only while that call runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    pub heuristic: Heuristic,
    pub solution_found: bool,
    pub solution_length: u32,
    pub optimal_cost: u32,
    /// Dequeued nodes that were not already closed, pruned ones included.
    pub nodes_expanded: u64,
    pub execution_time: Duration,
    pub lower_bound_sum: u64,
    pub lower_bound_count: u64,
}

impl SearchStatistics {
    pub fn new(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            solution_found: false,
            solution_length: 0,
            optimal_cost: 0,
            nodes_expanded: 0,
            execution_time: Duration::ZERO,
            lower_bound_sum: 0,
            lower_bound_count: 0,
        }
    }

    #[inline]
    pub fn on_node_expanded(&mut self, lower_bound: u32) {
        self.nodes_expanded = self.nodes_expanded.saturating_add(1);
        self.lower_bound_sum = self.lower_bound_sum.saturating_add(lower_bound as u64);
        self.lower_bound_count = self.lower_bound_count.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self, cost: u32) {
        self.solution_found = true;
        self.solution_length = cost;
        self.optimal_cost = cost;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.execution_time = duration;
    }

    pub fn average_lower_bound(&self) -> f64 {
        if self.lower_bound_count == 0 {
            return 0.0;
        }
        self.lower_bound_sum as f64 / self.lower_bound_count as f64
    }

    /// Bound tightness; 0 for an already solved puzzle.
    pub fn ratio(&self) -> f64 {
        if self.optimal_cost == 0 {
            return 0.0;
        }
        self.average_lower_bound() / self.optimal_cost as f64
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heuristic.name())?;
        if self.solution_found {
            writeln!(f, "  Solution length:     {}", self.solution_length)?;
        } else {
            writeln!(f, "  Solution length:     none")?;
        }
        writeln!(f, "  Nodes expanded:      {}", self.nodes_expanded)?;
        writeln!(f, "  Execution time:      {:.6}s", self.execution_time.as_secs_f64())?;
        writeln!(f, "  Average lower bound: {:.4}", self.average_lower_bound())?;
        write!(f, "  Ratio:               {:.4}", self.ratio())
    }
}

/// One entry of the `statistics` list in a results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub solution_found: bool,
    pub solution_length: u32,
    pub nodes_expanded: u64,
    pub optimal_cost: u32,
    /// Seconds.
    pub execution_time: f64,
    pub average_lower_bound: f64,
    pub ratio: f64,
}

impl From<&SearchStatistics> for StatisticsRecord {
    fn from(stats: &SearchStatistics) -> Self {
        Self {
            solution_found: stats.solution_found,
            solution_length: stats.solution_length,
            nodes_expanded: stats.nodes_expanded,
            optimal_cost: stats.optimal_cost,
            execution_time: stats.execution_time.as_secs_f64(),
            average_lower_bound: stats.average_lower_bound(),
            ratio: stats.ratio(),
        }
    }
}

/// Descriptive statistics over one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation, 0 for a single value.
    pub std_dev: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        let std_dev = if n > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[n - 1],
            std_dev,
        })
    }
}

/// Aggregate over the successful runs of one heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicReport {
    pub name: String,
    pub successful_count: usize,
    pub total_count: usize,
    pub time: Option<Summary>,
    pub ratio: Option<Summary>,
    pub nodes: Option<Summary>,
    pub cost: Option<Summary>,
}

impl HeuristicReport {
    pub fn from_records(name: &str, records: &[StatisticsRecord]) -> Self {
        let successful: Vec<&StatisticsRecord> =
            records.iter().filter(|r| r.solution_found).collect();
        let metric = |f: fn(&StatisticsRecord) -> f64| {
            Summary::from_values(&successful.iter().map(|&r| f(r)).collect::<Vec<_>>())
        };

        Self {
            name: name.to_string(),
            successful_count: successful.len(),
            total_count: records.len(),
            time: metric(|r| r.execution_time),
            ratio: metric(|r| r.ratio),
            nodes: metric(|r| r.nodes_expanded as f64),
            cost: metric(|r| r.optimal_cost as f64),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.successful_count as f64 / self.total_count as f64
    }

    pub fn has_solutions(&self) -> bool {
        self.successful_count > 0
    }

    pub fn avg_time(&self) -> f64 {
        self.time.map_or(0.0, |s| s.mean)
    }

    pub fn avg_ratio(&self) -> f64 {
        self.ratio.map_or(0.0, |s| s.mean)
    }

    pub fn avg_nodes(&self) -> f64 {
        self.nodes.map_or(0.0, |s| s.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(found: bool, cost: u32, nodes: u64, time: f64, ratio: f64) -> StatisticsRecord {
        StatisticsRecord {
            solution_found: found,
            solution_length: cost,
            nodes_expanded: nodes,
            optimal_cost: cost,
            execution_time: time,
            average_lower_bound: ratio * cost as f64,
            ratio,
        }
    }

    #[test]
    fn ratio_is_zero_without_cost() {
        let mut stats = SearchStatistics::new(Heuristic::Manhattan);
        assert_eq!(stats.average_lower_bound(), 0.0);
        assert_eq!(stats.ratio(), 0.0);

        stats.on_solution_found(0);
        assert!(stats.solution_found);
        assert_eq!(stats.ratio(), 0.0);
    }

    #[test]
    fn derived_values() {
        let mut stats = SearchStatistics::new(Heuristic::Manhattan);
        stats.on_node_expanded(4);
        stats.on_node_expanded(2);
        stats.on_node_expanded(0);
        stats.on_solution_found(4);

        assert_eq!(stats.nodes_expanded, 3);
        assert_eq!(stats.average_lower_bound(), 2.0);
        assert_eq!(stats.ratio(), 0.5);

        let rec = StatisticsRecord::from(&stats);
        assert_eq!(rec.solution_length, 4);
        assert_eq!(rec.optimal_cost, 4);
        assert_eq!(rec.ratio, 0.5);
        assert_eq!(rec.average_lower_bound, 2.0);
    }

    #[test]
    fn summary_odd_and_even() {
        let s = Summary::from_values(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        assert_eq!(s.std_dev, 1.0);

        let s = Summary::from_values(&[4.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.median, 2.5);

        let single = Summary::from_values(&[7.0]).unwrap();
        assert_eq!(single.std_dev, 0.0);
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn report_ignores_failed_runs() {
        let records = vec![
            record(true, 10, 100, 0.5, 0.4),
            record(false, 0, 0, 0.1, 0.0),
            record(true, 20, 300, 1.5, 0.6),
        ];
        let report = HeuristicReport::from_records("H3: Manhattan Distance", &records);

        assert_eq!(report.successful_count, 2);
        assert_eq!(report.total_count, 3);
        assert!((report.success_rate() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.avg_nodes(), 200.0);
        assert_eq!(report.avg_time(), 1.0);
        assert!((report.avg_ratio() - 0.5).abs() < 1e-12);
        assert_eq!(report.cost.unwrap().max, 20.0);
    }

    #[test]
    fn report_without_solutions() {
        let report = HeuristicReport::from_records("H1: Trivial (h=0)", &[record(false, 0, 0, 0.1, 0.0)]);
        assert!(!report.has_solutions());
        assert_eq!(report.avg_time(), 0.0);
        assert!(report.nodes.is_none());
    }
}
