use crate::heuristic::Heuristic;
use crate::stats::{HeuristicReport, Summary};
use anyhow::{Context, Result};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use log::info;
use std::fmt::{self, Write as _};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const WIDE: usize = 80;
const WIDER: usize = 100;

fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

fn heading<W: Write>(out: &mut W, title: &str, width: usize) -> io::Result<()> {
    queue!(
        out,
        Print(format!("{}\n", rule('=', width))),
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
        Print(format!("{}\n", title)),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print(format!("{}\n", rule('=', width))),
    )
}

fn format_error(err: fmt::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Mean time, ratio and node count per heuristic, one row each.
pub fn summary_table(reports: &[HeuristicReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<30} {:<15} {:<15} {:<15}",
        "Heuristic", "Avg Time (s)", "Avg Ratio", "Avg Nodes"
    )?;
    writeln!(out, "{}", rule('-', 75))?;
    for report in reports {
        if report.has_solutions() {
            writeln!(
                out,
                "{:<30} {:<15.6} {:<15.4} {:<15.1}",
                report.name,
                report.avg_time(),
                report.avg_ratio(),
                report.avg_nodes()
            )?;
        } else {
            writeln!(out, "{:<30} {:<15} {:<15} {:<15}", report.name, "FAILED", "N/A", "N/A")?;
        }
    }
    Ok(out)
}

fn summary_block(
    out: &mut String,
    label: &str,
    summary: &Summary,
    precision: usize,
    spread: bool,
) -> fmt::Result {
    writeln!(out, "\n  {}:", label)?;
    writeln!(
        out,
        "    Mean: {:.p$}, Median: {:.p$}",
        summary.mean,
        summary.median,
        p = precision
    )?;
    writeln!(out, "    Min:  {:.p$}, Max:  {:.p$}", summary.min, summary.max, p = precision)?;
    if spread {
        writeln!(out, "    StdDev: {:.p$}", summary.std_dev, p = precision)?;
    }
    Ok(())
}

/// Mean, median, range and spread of every metric, per heuristic.
pub fn detailed_stats(reports: &[HeuristicReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for report in reports {
        if !report.has_solutions() {
            writeln!(out, "\n{}: NO SUCCESSFUL SOLUTIONS", report.name)?;
            continue;
        }

        writeln!(out, "\n{}", report.name)?;
        write!(out, "{}", rule('-', WIDER))?;
        if let Some(time) = &report.time {
            summary_block(&mut out, "Execution Time (seconds)", time, 6, true)?;
        }
        if let Some(ratio) = &report.ratio {
            summary_block(&mut out, "Average Lower Bound / Optimal Cost Ratio", ratio, 4, true)?;
        }
        if let Some(nodes) = &report.nodes {
            summary_block(&mut out, "Nodes Expanded", nodes, 1, true)?;
        }
        if let Some(cost) = &report.cost {
            summary_block(&mut out, "Optimal Solution Cost (moves)", cost, 1, false)?;
        }
        writeln!(
            out,
            "\n  Success Rate: {:.1}% ({}/{})",
            report.success_rate() * 100.0,
            report.successful_count,
            report.total_count
        )?;
    }
    Ok(out)
}

fn description(heuristic: Heuristic) -> &'static str {
    match heuristic {
        Heuristic::Trivial => {
            "  - Always returns 0\n  - Uninformed search ordered by path cost\n  - Baseline for comparison"
        }
        Heuristic::MisplacedTiles => {
            "  - Counts tiles not on their goal cell, blank ignored\n  - Range: 0 to 8\n  - Admissible and consistent"
        }
        Heuristic::Manhattan => {
            "  - Sum of |row diff| + |col diff| of every tile to its goal cell\n  - Range: 0 to 24\n  - Admissible and consistent"
        }
        Heuristic::LinearConflict => {
            "  - Manhattan distance + 2 x (number of linear conflicts)\n  - Two tiles in their goal row or column in reverse order\n  - Dominates Manhattan distance"
        }
    }
}

fn best_by<F: Fn(&HeuristicReport) -> f64>(
    reports: &[HeuristicReport],
    metric: F,
    prefer_high: bool,
) -> Option<&HeuristicReport> {
    reports
        .iter()
        .filter(|r| r.has_solutions() && metric(*r) > 0.0)
        .min_by(|a, b| {
            let ord = metric(*a).total_cmp(&metric(*b));
            if prefer_high {
                ord.reverse()
            } else {
                ord
            }
        })
}

/// Plain-text experiment report.
pub fn text_report(reports: &[HeuristicReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", rule('=', WIDE))?;
    writeln!(out, "8-PUZZLE BRANCH AND BOUND SOLVER - EXPERIMENT REPORT")?;
    writeln!(out, "{}\n", rule('=', WIDE))?;

    writeln!(out, "SUMMARY TABLE")?;
    writeln!(out, "{}", rule('-', WIDE))?;
    out.push_str(&summary_table(reports)?);
    writeln!(out, "\n{}\n", rule('=', WIDE))?;

    writeln!(out, "HEURISTIC DESCRIPTIONS")?;
    writeln!(out, "{}", rule('-', WIDE))?;
    for heuristic in Heuristic::ALL {
        writeln!(out, "\n{}\n{}", heuristic.name(), description(heuristic))?;
    }
    writeln!(out, "\n{}\n", rule('=', WIDE))?;

    writeln!(out, "PERFORMANCE ANALYSIS")?;
    writeln!(out, "{}", rule('-', WIDE))?;
    if let Some(r) = best_by(reports, HeuristicReport::avg_time, false) {
        writeln!(out, "Fastest heuristic: {}", r.name)?;
        writeln!(out, "  Average time: {:.6} seconds\n", r.avg_time())?;
    }
    if let Some(r) = best_by(reports, HeuristicReport::avg_ratio, true) {
        writeln!(out, "Tightest lower bound: {}", r.name)?;
        writeln!(out, "  Average ratio: {:.4}\n", r.avg_ratio())?;
    }
    if let Some(r) = best_by(reports, HeuristicReport::avg_nodes, false) {
        writeln!(out, "Fewest nodes expanded: {}", r.name)?;
        writeln!(out, "  Average nodes: {:.1}\n", r.avg_nodes())?;
    }
    writeln!(out, "{}", rule('=', WIDE))?;
    Ok(out)
}

pub fn write_report(path: &Path, reports: &[HeuristicReport]) -> Result<()> {
    let text = text_report(reports).context("Failed to format report")?;
    fs::write(path, text)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report saved to {}", path.display());
    Ok(())
}

pub fn print_summary<W: Write>(
    out: &mut W,
    reports: &[HeuristicReport],
    puzzle_count: usize,
) -> io::Result<()> {
    heading(out, "EXPERIMENT SUMMARY", WIDE)?;
    queue!(out, Print(format!("Number of puzzle instances tested: {}\n\n", puzzle_count)))?;

    let table = summary_table(reports).map_err(format_error)?;
    for line in table.lines() {
        if line.contains("FAILED") {
            queue!(out, SetForegroundColor(Color::Red), Print(line), ResetColor, Print("\n"))?;
        } else {
            queue!(out, Print(line), Print("\n"))?;
        }
    }
    for report in reports.iter().filter(|r| r.has_solutions()) {
        queue!(
            out,
            Print(format!(
                "  {} success rate: {:.1}%\n",
                report.name,
                report.success_rate() * 100.0
            ))
        )?;
    }
    queue!(out, Print(format!("{}\n\n", rule('=', WIDE))))?;
    out.flush()
}

pub fn print_detailed<W: Write>(out: &mut W, reports: &[HeuristicReport]) -> io::Result<()> {
    heading(out, "DETAILED STATISTICS", WIDER)?;
    queue!(out, Print(detailed_stats(reports).map_err(format_error)?))?;
    queue!(out, Print(format!("\n{}\n\n", rule('=', WIDER))))?;
    out.flush()
}
