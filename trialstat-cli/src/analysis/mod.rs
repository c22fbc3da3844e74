//! Analysis Orchestration
//!
//! Runs one analysis pipeline end to end and collects results. Both
//! pipelines share the same shape:
//!
//! ```text
//! CSV input file(s)
//!       │
//!       ▼
//! ┌─────────────┐
//! │   loader    │  Decode, parse, build observation tables
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  analysis   │  One explicit outcome per variable (or variable × round)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  reporting  │  Append text blocks, accumulate comparison records
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  artifacts  │  Comparisons CSV, optional JSON report, optional plots
//! └─────────────┘
//! ```
//!
//! Every skip is a value, not an exception: analysis functions return
//! `Tested`/`Skipped` outcomes and the runner logs and accounts for them.
//!
//! ## Modules
//!
//! - [`friedman`] - Repeated-measures pipeline (Friedman + Nemenyi)
//! - [`mann_whitney`] - Two-cohort pipeline (Mann-Whitney U)
//! - [`outcome`] - Mapping from statistical errors to skip reasons

mod friedman;
mod mann_whitney;
mod outcome;

pub use friedman::{analyze_variable, run_friedman, FriedmanAnalysis, FriedmanRun};
pub use mann_whitney::{analyze_cell, run_mann_whitney, CellAnalysis, MannWhitneyRun};
pub use outcome::skip_reason;
