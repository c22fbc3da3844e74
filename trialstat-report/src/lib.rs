#![warn(missing_docs)]
//! Trialstat Report - Result Records and Output
//!
//! Generates the run artifacts:
//! - Text report (human-readable, appended block by block so partial output
//!   survives a mid-run failure)
//! - Comparisons table (machine-readable CSV, one row per comparison)
//! - JSON report (full run, machine-readable)

mod csv;
mod json;
mod record;
mod text;

pub use crate::csv::write_comparisons_csv;
pub use json::generate_json_report;
pub use record::{
    AnalysisReport, FriedmanBlock, GroupComparison, GroupStats, MannWhitneyBlock,
    PairwiseComparison, ReportMeta, RunSummary, SkipReason, SkippedUnit, VariableBlock,
};
pub use text::{format_block, ReportError, TextReport};
