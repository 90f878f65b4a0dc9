//! Optimal 8-puzzle solving by branch and bound, with four interchangeable
//! lower-bound heuristics and a batch driver that compares them.

pub mod config;
pub mod error;
pub mod experiment;
pub mod generator;
pub mod heuristic;
pub mod puzzle;
pub mod report;
pub mod solver;
pub mod stats;
