#![warn(missing_docs)]
//! # Trialstat
//!
//! Non-parametric statistical analysis for clinical-trial evaluation data:
//! - **Friedman + Nemenyi**: repeated-measures testing across evaluation
//!   rounds with family-wise-corrected post-hoc pairwise comparisons
//! - **Mann-Whitney U**: two independent cohorts compared per variable and
//!   round, with median/quartile/IQR descriptives
//! - **Per-variable isolation**: degenerate columns skip with a logged
//!   reason; one bad variable never aborts a run
//! - **Durable reporting**: text blocks are flushed as they are produced,
//!   comparison records land in one CSV, and the full run can be exported
//!   as JSON
//! - **Comparison charts**: paired box plots with median and linear trends
//!
//! ## Quick Start
//!
//! ```ignore
//! use trialstat::{analysis, load_observation_table};
//!
//! let table = load_observation_table("evaluations.csv".as_ref())?;
//! for variable in table.variables() {
//!     match analysis::analyze_variable(&table, variable) {
//!         analysis::FriedmanAnalysis::Tested { block, .. } => {
//!             println!("{}: p = {:.4}", block.variable, block.p_value);
//!         }
//!         analysis::FriedmanAnalysis::Skipped(reason) => {
//!             eprintln!("{variable} skipped: {reason}");
//!         }
//!     }
//! }
//! ```

// Re-export the data model
pub use trialstat_core::{
    load_observation_table, DataError, ObservationTable, WideMatrix, PATIENT_COLUMN, ROUND_COLUMN,
};

// Re-export statistical primitives
pub use trialstat_stats::{
    friedman_test, mann_whitney_u, nemenyi_friedman, quantile, studentized_range_sf, summarize,
    FriedmanResult, GroupSummary, MannWhitneyResult, PosthocMatrix, StatsError,
};

// Re-export report types and writers
pub use trialstat_report::{
    generate_json_report, write_comparisons_csv, AnalysisReport, FriedmanBlock, GroupComparison,
    GroupStats, MannWhitneyBlock, PairwiseComparison, ReportMeta, RunSummary, SkipReason,
    TextReport, VariableBlock,
};

// Re-export plotting
pub use trialstat_plot::{render_comparison_plots, ImageFormat, PlotError, PlotOptions};

/// Analysis orchestration: per-variable pipelines with explicit outcomes
pub mod analysis {
    pub use trialstat_cli::analysis::{
        analyze_cell, analyze_variable, run_friedman, run_mann_whitney, CellAnalysis,
        FriedmanAnalysis, FriedmanRun, MannWhitneyRun,
    };
}

/// Run the trialstat CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     trialstat::run()
/// }
/// ```
pub use trialstat_cli::run;
